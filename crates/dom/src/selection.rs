//! Chainable element handle.
//!
//! A [`Selection`] wraps zero or more live nodes of one document. Reads act
//! on the first element and return a documented default when the selection
//! is empty (`""`, `false`, `0`, a zero [`Offset`]); writes act on every
//! element and are no-ops on an empty selection. No operation panics on an
//! empty or stale selection.

use crate::document::Document;
use crate::events::{EventCallback, EventKey};
pub use crate::events::Event;
use crate::markup::Markup;
use crate::node::NodeId;
use serde_json::Value;
use smallvec::SmallVec;
use std::sync::Arc;

/// Document-relative position of an element.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Offset {
    pub left: f64,
    pub top: f64,
}

/// Inline style properties that receive vendor-prefixed copies.
const VENDOR_PREFIXED: [&str; 4] = [
    "transform",
    "transition",
    "transition-duration",
    "transition-timing-function",
];

const VENDOR_PREFIXES: [&str; 4] = ["-webkit-", "-moz-", "-ms-", "-o-"];

/// An ownership-free handle over one element or an ordered collection.
#[derive(Clone)]
pub struct Selection {
    doc: Document,
    nodes: SmallVec<[NodeId; 4]>,
}

impl Selection {
    pub(crate) fn from_node(doc: Document, node: NodeId) -> Self {
        let mut nodes = SmallVec::new();
        nodes.push(node);
        Self { doc, nodes }
    }

    pub(crate) fn from_nodes(doc: Document, nodes: SmallVec<[NodeId; 4]>) -> Self {
        Self { doc, nodes }
    }

    /// Resolve a selector immediately, optionally scoped to a subtree.
    pub(crate) fn query(doc: Document, selector: &str, scope: Option<NodeId>) -> Self {
        let selector = selector.trim();
        let nodes: SmallVec<[NodeId; 4]> = {
            let tree = doc.tree();
            let scope = scope.unwrap_or_else(|| tree.root());
            if let Some(id) = selector.strip_prefix('#') {
                tree.find_element_by_id(id)
                    .filter(|&node| {
                        let mut current = Some(node);
                        while let Some(c) = current {
                            if c == scope {
                                return true;
                            }
                            current = tree.parent(c);
                        }
                        false
                    })
                    .into_iter()
                    .collect()
            } else if let Some(class) = selector.strip_prefix('.') {
                tree.find_by_class(scope, class).into_iter().collect()
            } else {
                tree.find_by_tag(scope, selector).into_iter().collect()
            }
        };
        Self { doc, nodes }
    }

    /// The document this selection belongs to.
    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The first node, if any.
    pub fn get(&self) -> Option<NodeId> {
        self.nodes.first().copied()
    }

    /// Narrow to the first element.
    pub fn first(&self) -> Selection {
        Self {
            doc: self.doc.clone(),
            nodes: self.nodes.iter().take(1).copied().collect(),
        }
    }

    /// Narrow to the element at `index`; empty when out of range.
    pub fn eq(&self, index: usize) -> Selection {
        Self {
            doc: self.doc.clone(),
            nodes: self.nodes.get(index).into_iter().copied().collect(),
        }
    }

    /// The first element's parent; empty when detached or the selection is
    /// empty.
    pub fn parent(&self) -> Selection {
        let parent = self
            .get()
            .and_then(|node| self.doc.tree().parent(node));
        Self {
            doc: self.doc.clone(),
            nodes: parent.into_iter().collect(),
        }
    }

    /// Resolve a selector within the first element's subtree.
    pub fn find(&self, selector: &str) -> Selection {
        match self.get() {
            Some(scope) => Selection::query(self.doc.clone(), selector, Some(scope)),
            None => Self {
                doc: self.doc.clone(),
                nodes: SmallVec::new(),
            },
        }
    }

    // Attributes -----------------------------------------------------------

    /// Read an attribute from the first element; `""` when absent.
    pub fn attr(&self, name: &str) -> String {
        self.get()
            .and_then(|node| {
                self.doc
                    .tree()
                    .get_element(node)
                    .and_then(|e| e.get_attribute(name))
            })
            .unwrap_or_default()
    }

    /// Set an attribute on every element.
    pub fn set_attr(&self, name: &str, value: &str) -> &Self {
        let mut tree = self.doc.tree_mut();
        for &node in &self.nodes {
            tree.set_attribute(node, name, value);
        }
        drop(tree);
        self
    }

    pub fn remove_attr(&self, name: &str) -> &Self {
        let mut tree = self.doc.tree_mut();
        for &node in &self.nodes {
            if let Some(elem) = tree.get_element_mut(node) {
                elem.remove_attribute(name);
            }
        }
        drop(tree);
        self
    }

    /// Check the first element for an attribute; `false` when empty.
    pub fn has_attribute(&self, name: &str) -> bool {
        self.get()
            .and_then(|node| {
                self.doc
                    .tree()
                    .get_element(node)
                    .map(|e| e.has_attribute(name))
            })
            .unwrap_or(false)
    }

    // Classes --------------------------------------------------------------

    /// Add one or more space-separated classes to every element.
    pub fn add_class(&self, classes: &str) -> &Self {
        let mut tree = self.doc.tree_mut();
        for &node in &self.nodes {
            if let Some(elem) = tree.get_element_mut(node) {
                for class in classes.split_whitespace() {
                    elem.add_class(class);
                }
            }
        }
        drop(tree);
        self
    }

    /// Remove one or more space-separated classes from every element.
    pub fn remove_class(&self, classes: &str) -> &Self {
        let mut tree = self.doc.tree_mut();
        for &node in &self.nodes {
            if let Some(elem) = tree.get_element_mut(node) {
                for class in classes.split_whitespace() {
                    elem.remove_class(class);
                }
            }
        }
        drop(tree);
        self
    }

    /// Check the first element for a class; `false` when empty.
    pub fn has_class(&self, class: &str) -> bool {
        self.get()
            .and_then(|node| self.doc.tree().get_element(node).map(|e| e.has_class(class)))
            .unwrap_or(false)
    }

    pub fn toggle_class(&self, class: &str) -> &Self {
        if self.has_class(class) {
            self.remove_class(class)
        } else {
            self.add_class(class)
        }
    }

    // Style ----------------------------------------------------------------

    /// Set an inline style property on every element.
    ///
    /// Transform/transition-family properties also receive their
    /// `-webkit-`/`-moz-`/`-ms-`/`-o-` prefixed copies.
    pub fn css(&self, property: &str, value: &str) -> &Self {
        let prefixed = VENDOR_PREFIXED.contains(&property);
        let mut tree = self.doc.tree_mut();
        for &node in &self.nodes {
            if let Some(elem) = tree.get_element_mut(node) {
                elem.set_style(property, value);
                if prefixed {
                    for prefix in VENDOR_PREFIXES {
                        elem.set_style(&format!("{}{}", prefix, property), value);
                    }
                }
            }
        }
        drop(tree);
        self
    }

    /// Read an inline style property from the first element; `""` when
    /// unset or empty.
    pub fn style(&self, property: &str) -> String {
        self.get()
            .and_then(|node| {
                self.doc
                    .tree()
                    .get_element(node)
                    .and_then(|e| e.style(property))
                    .map(str::to_string)
            })
            .unwrap_or_default()
    }

    /// The first element's position from its inline `left`/`top` styles;
    /// a zero offset when empty or unset.
    pub fn offset(&self) -> Offset {
        let parse = |v: String| v.trim_end_matches("px").trim().parse::<f64>().unwrap_or(0.0);
        Offset {
            left: parse(self.style("left")),
            top: parse(self.style("top")),
        }
    }

    // Content --------------------------------------------------------------

    /// Serialize the first element's children to HTML text; `""` when
    /// empty.
    pub fn html(&self) -> String {
        self.get()
            .map(|node| self.doc.tree().inner_html(node))
            .unwrap_or_default()
    }

    /// Replace every element's content with an instantiated fragment.
    pub fn set_html(&self, markup: &Markup) -> &Self {
        self.empty();
        self.append(markup)
    }

    /// Append an instantiated copy of the fragment to every element.
    pub fn append(&self, markup: &Markup) -> &Self {
        let mut tree = self.doc.tree_mut();
        for &node in &self.nodes {
            let child = tree.instantiate(markup);
            tree.append_child(node, child);
        }
        drop(tree);
        self
    }

    /// Prepend an instantiated copy of the fragment to every element.
    pub fn prepend(&self, markup: &Markup) -> &Self {
        let mut tree = self.doc.tree_mut();
        for &node in &self.nodes {
            let child = tree.instantiate(markup);
            tree.prepend_child(node, child);
        }
        drop(tree);
        self
    }

    /// Relocate another selection's first node under this selection's first
    /// element. Listeners attached to the moved node survive the move.
    pub fn append_node(&self, other: &Selection) -> &Self {
        if let (Some(parent), Some(child)) = (self.get(), other.get()) {
            self.doc.tree_mut().append_child(parent, child);
        }
        self
    }

    /// Remove every child of every element.
    pub fn empty(&self) -> &Self {
        let mut tree = self.doc.tree_mut();
        for &node in &self.nodes {
            tree.remove_children(node);
        }
        drop(tree);
        self
    }

    /// Remove every element (and subtree) from the tree, dropping their
    /// listeners.
    pub fn remove(&self) {
        for &node in &self.nodes {
            let subtree: Vec<NodeId> = {
                let tree = self.doc.tree();
                std::iter::once(node).chain(tree.descendants(node)).collect()
            };
            {
                let mut events = self.doc.events_mut();
                for id in subtree {
                    events.remove_node(id);
                }
            }
            self.doc.tree_mut().remove(node);
        }
    }

    // Events ---------------------------------------------------------------

    /// Register a listener on every element for each space-separated event
    /// token. The token's dot-namespace scopes later removal; dispatch
    /// ignores it.
    pub fn on(&self, events: &str, callback: impl Fn(&Event) + Send + Sync + 'static) -> &Self {
        let callback: EventCallback = Arc::new(callback);
        let keys = EventKey::parse_list(events);
        let mut registry = self.doc.events_mut();
        for &node in &self.nodes {
            for key in &keys {
                registry.add(node, key, callback.clone());
            }
        }
        drop(registry);
        self
    }

    /// Remove listeners on every element for each event token. A bare name
    /// removes all namespaces of that name; `name.ns` removes only that
    /// pair.
    pub fn off(&self, events: &str) -> &Self {
        let keys = EventKey::parse_list(events);
        let mut registry = self.doc.events_mut();
        for &node in &self.nodes {
            for key in &keys {
                registry.remove(node, key);
            }
        }
        drop(registry);
        self
    }

    /// Remove every listener on every element under a namespace (or nested
    /// under it).
    pub fn off_namespace(&self, ns: &str) -> &Self {
        let mut registry = self.doc.events_mut();
        for &node in &self.nodes {
            registry.remove_namespace(node, ns);
        }
        drop(registry);
        self
    }

    /// Dispatch an event on the first element. Any namespace suffix in
    /// `event` is stripped before dispatch.
    pub fn trigger(&self, event: &str, detail: Value) -> &Self {
        if let Some(node) = self.get() {
            let key = EventKey::parse(event);
            self.doc.dispatch(node, &key.name, detail);
        }
        self
    }

    // Media ----------------------------------------------------------------

    /// Start native playback on the first element; no-op for non-media
    /// nodes.
    pub fn media_play(&self) -> &Self {
        if let Some(node) = self.get() {
            self.doc.tree_mut().media_update(node, |state| state.play());
        }
        self
    }

    /// Pause native playback on the first element.
    pub fn media_pause(&self) -> &Self {
        if let Some(node) = self.get() {
            self.doc.tree_mut().media_update(node, |state| state.pause());
        }
        self
    }

    /// Whether the first element is paused; `true` when empty or not a
    /// media element.
    pub fn media_paused(&self) -> bool {
        self.get()
            .and_then(|node| self.doc.tree().media_state(node))
            .map(|state| state.paused)
            .unwrap_or(true)
    }

    /// Whether the first element has finished playback; `false` when empty.
    pub fn media_ended(&self) -> bool {
        self.get()
            .and_then(|node| self.doc.tree().media_state(node))
            .map(|state| state.ended)
            .unwrap_or(false)
    }

    /// The first element's tag name; `""` when empty.
    pub fn tag_name(&self) -> String {
        self.get()
            .and_then(|node| {
                self.doc
                    .tree()
                    .get_element(node)
                    .map(|e| e.tag_name.as_str().to_string())
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn doc_with_slide() -> (Document, Selection) {
        let doc = Document::new();
        let slide = doc.append_markup(
            &Markup::new("div").class("lg-item").child(
                Markup::new("div")
                    .class("lg-video-cont")
                    .child(Markup::new("div").class("lg-video")),
            ),
        );
        (doc, slide)
    }

    #[test]
    fn test_empty_selection_defaults() {
        let doc = Document::new();
        let missing = doc.select("#missing");

        assert!(missing.is_empty());
        assert_eq!(missing.attr("id"), "");
        assert_eq!(missing.html(), "");
        assert_eq!(missing.style("display"), "");
        assert_eq!(missing.offset(), Offset::default());
        assert!(!missing.has_class("lg-item"));
        assert!(!missing.has_attribute("src"));
        assert!(missing.media_paused());
        assert!(!missing.media_ended());
        assert_eq!(missing.find(".lg-video").len(), 0);
        assert!(missing.parent().is_empty());
    }

    #[test]
    fn test_empty_selection_writes_are_noops() {
        let doc = Document::new();
        let missing = doc.select(".nothing");

        missing
            .set_attr("id", "x")
            .add_class("a")
            .remove_class("a")
            .css("max-width", "855px")
            .append(&Markup::new("div"))
            .empty()
            .trigger("click", Value::Null);
        missing.remove();
    }

    #[test]
    fn test_find_and_chaining() {
        let (_doc, slide) = doc_with_slide();
        let cont = slide.find(".lg-video-cont").first();
        assert_eq!(cont.len(), 1);

        cont.add_class("lg-has-iframe").css("max-width", "855px");
        assert!(cont.has_class("lg-has-iframe"));
        assert_eq!(cont.style("max-width"), "855px");

        assert_eq!(slide.find(".lg-video").parent().get(), cont.get());
    }

    #[test]
    fn test_css_vendor_prefixes() {
        let (_doc, slide) = doc_with_slide();
        slide.css("transform", "translate3d(0, 0, 0)");
        assert_eq!(slide.style("transform"), "translate3d(0, 0, 0)");
        assert_eq!(slide.style("-webkit-transform"), "translate3d(0, 0, 0)");
        assert_eq!(slide.style("-o-transform"), "translate3d(0, 0, 0)");

        slide.css("max-width", "855px");
        assert_eq!(slide.style("-webkit-max-width"), "");
    }

    #[test]
    fn test_append_applies_to_all_reads_first() {
        let doc = Document::new();
        doc.append_markup(&Markup::new("div").class("lg-item"));
        doc.append_markup(&Markup::new("div").class("lg-item"));

        let items = doc.select(".lg-item");
        assert_eq!(items.len(), 2);

        items.append(&Markup::new("img").attr("src", "poster.jpg"));
        assert_eq!(doc.select("img").len(), 2);

        items.set_attr("data-state", "ready");
        assert_eq!(items.eq(1).attr("data-state"), "ready");
    }

    #[test]
    fn test_namespace_removal_completeness() {
        let (_doc, slide) = doc_with_slide();
        let count = Arc::new(AtomicUsize::new(0));

        for ns in ["click.lg.a", "click.lg.b", "click.lg.c"] {
            let count = Arc::clone(&count);
            slide.on(ns, move |_| {
                count.fetch_add(1, Ordering::SeqCst);
            });
        }

        slide.off("click");
        slide.trigger("click", Value::Null);
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_off_is_namespace_scoped() {
        let (_doc, slide) = doc_with_slide();
        let video_hits = Arc::new(AtomicUsize::new(0));
        let other_hits = Arc::new(AtomicUsize::new(0));

        let hits = Arc::clone(&video_hits);
        slide.on("click.lg.video", move |_| {
            hits.fetch_add(1, Ordering::SeqCst);
        });
        let hits = Arc::clone(&other_hits);
        slide.on("click.lg.zoom", move |_| {
            hits.fetch_add(1, Ordering::SeqCst);
        });

        slide.off("click.lg.video");
        slide.trigger("click", Value::Null);

        assert_eq!(video_hits.load(Ordering::SeqCst), 0);
        assert_eq!(other_hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_multi_event_registration() {
        let (_doc, slide) = doc_with_slide();
        let count = Arc::new(AtomicUsize::new(0));
        let inner = Arc::clone(&count);
        slide.on("load.lg error.lg", move |_| {
            inner.fetch_add(1, Ordering::SeqCst);
        });

        slide.trigger("load", Value::Null);
        slide.trigger("error", Value::Null);
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_trigger_strips_namespace_and_carries_detail() {
        let (_doc, slide) = doc_with_slide();
        let seen = Arc::new(AtomicUsize::new(0));
        let inner = Arc::clone(&seen);
        slide.on("hasVideo.lg.video", move |event| {
            assert_eq!(event.detail["index"], 3);
            inner.fetch_add(1, Ordering::SeqCst);
        });

        slide.trigger("hasVideo.lg", serde_json::json!({ "index": 3 }));
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_append_node_relocates() {
        let (doc, slide) = doc_with_slide();
        slide.append(&Markup::new("img").class("lg-object lg-has-poster"));
        let poster = slide.find(".lg-object").first();
        let video_cont = slide.find(".lg-video").first();

        video_cont.append_node(&poster);
        assert_eq!(poster.parent().get(), video_cont.get());
        assert_eq!(doc.select(".lg-object").len(), 1);
    }

    #[test]
    fn test_remove_drops_listeners() {
        let (doc, slide) = doc_with_slide();
        slide.append(&Markup::new("video").class("lg-video-object"));
        let video = slide.find(".lg-video-object").first();
        let node = video.get().unwrap();
        let count = Arc::new(AtomicUsize::new(0));
        let inner = Arc::clone(&count);
        video.on("ended.lg", move |_| {
            inner.fetch_add(1, Ordering::SeqCst);
        });

        video.remove();
        doc.dispatch(node, "ended", Value::Null);
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }
}
