//! Shared document handle.

use crate::element::{ElementData, TagName};
use crate::events::{Event, EventRegistry};
use crate::markup::Markup;
use crate::node::NodeId;
use crate::selection::Selection;
use crate::tree::DomTree;
use parking_lot::RwLock;
use serde_json::Value;
use std::sync::Arc;

struct DocumentInner {
    tree: RwLock<DomTree>,
    events: RwLock<EventRegistry>,
}

/// A document: one DOM tree plus the listener table shared by every
/// [`Selection`] over it.
///
/// Cloning is cheap; clones refer to the same tree.
#[derive(Clone)]
pub struct Document {
    inner: Arc<DocumentInner>,
}

impl Document {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(DocumentInner {
                tree: RwLock::new(DomTree::new()),
                events: RwLock::new(EventRegistry::new()),
            }),
        }
    }

    /// The root document node.
    pub fn root(&self) -> NodeId {
        self.inner.tree.read().root()
    }

    pub(crate) fn tree(&self) -> parking_lot::RwLockReadGuard<'_, DomTree> {
        self.inner.tree.read()
    }

    pub(crate) fn tree_mut(&self) -> parking_lot::RwLockWriteGuard<'_, DomTree> {
        self.inner.tree.write()
    }

    pub(crate) fn events(&self) -> parking_lot::RwLockReadGuard<'_, EventRegistry> {
        self.inner.events.read()
    }

    pub(crate) fn events_mut(&self) -> parking_lot::RwLockWriteGuard<'_, EventRegistry> {
        self.inner.events.write()
    }

    /// Create a detached element and return a selection over it.
    pub fn create_element(&self, tag: &str) -> Selection {
        let id = self
            .tree_mut()
            .create_element(ElementData::new(TagName::new(tag)));
        Selection::from_node(self.clone(), id)
    }

    /// Instantiate a markup fragment under the document root.
    pub fn append_markup(&self, markup: &Markup) -> Selection {
        let id = {
            let mut tree = self.tree_mut();
            let id = tree.instantiate(markup);
            let root = tree.root();
            tree.append_child(root, id);
            id
        };
        Selection::from_node(self.clone(), id)
    }

    /// Resolve a selector immediately.
    ///
    /// `#id` resolves at most one node; `.class` and tag selectors resolve
    /// an ordered collection. There is no lazy re-querying.
    pub fn select(&self, selector: &str) -> Selection {
        Selection::query(self.clone(), selector, None)
    }

    /// A selection over a single known node.
    pub fn select_node(&self, node: NodeId) -> Selection {
        Selection::from_node(self.clone(), node)
    }

    /// Dispatch an event on a node to the listeners for its primary name.
    ///
    /// The listener list is snapshotted before any callback runs, so
    /// mutation of the registry from inside a callback does not affect the
    /// ongoing dispatch.
    pub fn dispatch(&self, node: NodeId, name: &str, detail: Value) {
        let callbacks = self.events().snapshot(node, name);
        if callbacks.is_empty() {
            return;
        }
        tracing::trace!(name, listeners = callbacks.len(), "dispatching event");
        let event = Event::new(name, Some(node), detail);
        for callback in callbacks {
            callback(&event);
        }
    }

    /// Remove every listener in this document under a namespace (or nested
    /// under it).
    pub fn off_namespace(&self, ns: &str) {
        self.events_mut().remove_namespace_all(ns);
    }

    /// Mark a media element's playback as complete and fire its native
    /// `ended` event.
    pub fn finish_media(&self, node: NodeId) {
        self.tree_mut().media_update(node, |state| state.finish());
        self.dispatch(node, "ended", Value::Null);
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
