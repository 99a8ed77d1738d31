//! Gallery boundary.
//!
//! The plugin observes the gallery through lifecycle events on its root
//! node and steers it through the [`GalleryCore`] trait; it never reaches
//! into gallery internals.

use crate::markup::Html5Video;
use lightbox_dom::Selection;
use serde::{Deserialize, Serialize};

/// Lifecycle event names dispatched by the gallery core on its root node.
pub mod lifecycle_events {
    /// A slide's media reference classified as video.
    pub const HAS_VIDEO: &str = "hasVideo";
    /// A slide's container markup was appended to the document.
    pub const AFTER_APPEND_SLIDE: &str = "afterAppendSlide";
    /// A slide transition is about to start.
    pub const BEFORE_SLIDE: &str = "beforeSlide";
    /// A slide transition settled.
    pub const AFTER_SLIDE: &str = "afterSlide";
    /// The user activated the current slide (gesture-aware path).
    pub const SLIDE_CLICK: &str = "slideClick";
    /// A video embed was appended into a slide.
    pub const APPEND_VIDEO: &str = "appendVideo";
}

/// One gallery item as configured by the embedding page.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GalleryItem {
    /// Media reference; a provider URL, a file path, or empty.
    #[serde(default)]
    pub src: String,
    /// Inline HTML5 video configuration as a JSON string.
    #[serde(default)]
    pub video: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub alt: Option<String>,
}

/// Payload of [`lifecycle_events::HAS_VIDEO`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HasVideoDetail {
    pub index: usize,
    pub src: String,
    #[serde(rename = "html5Video")]
    pub html5_video: Option<Html5Video>,
    #[serde(rename = "hasPoster")]
    pub has_poster: bool,
}

/// Payload of the slide-transition events.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SlideDetail {
    pub index: usize,
    #[serde(rename = "prevIndex")]
    pub prev_index: usize,
}

/// What the plugin needs from the hosting gallery.
pub trait GalleryCore: Send + Sync {
    /// The root node carrying lifecycle events.
    fn root(&self) -> Selection;
    /// The outer container holding slide markup.
    fn outer(&self) -> Selection;
    /// The slide container at `index`; empty when not yet built.
    fn slide_item(&self, index: usize) -> Selection;
    fn current_index(&self) -> usize;
    fn item(&self, index: usize) -> Option<GalleryItem>;
    fn item_count(&self) -> usize;
    fn go_to_next_slide(&self);
    fn css_transitions_enabled(&self) -> bool;
    fn swipe_enabled(&self) -> bool;
    fn drag_enabled(&self) -> bool;
    /// Whether the gallery has finished opening.
    fn is_open(&self) -> bool;
}
