//! Minimal DOM abstraction for the lightbox gallery and its plugins.
//!
//! This crate provides the small element-handle layer the gallery plugins
//! are written against: an in-memory node arena, a chainable [`Selection`]
//! over it, structured [`markup::Markup`] fragments for embeds, and a
//! namespaced event registry so independent plugin modules can attach and
//! tear down listeners without stepping on each other.

pub mod attributes;
pub mod document;
pub mod element;
pub mod events;
pub mod markup;
pub mod media;
pub mod node;
pub mod selection;
pub mod tree;

pub use attributes::AttributeMap;
pub use document::Document;
pub use element::{ElementData, TagName};
pub use events::{Event, EventCallback, EventKey};
pub use markup::{Markup, MarkupNode};
pub use media::MediaState;
pub use node::{Node, NodeData, NodeId, NodeType};
pub use selection::{Offset, Selection};
pub use tree::DomTree;
