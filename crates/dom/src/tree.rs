//! DOM tree implementation.

use crate::element::{ElementData, TagName};
use crate::markup::{Markup, MarkupNode};
use crate::media::MediaState;
use crate::node::{Node, NodeData, NodeId};
use slotmap::{SecondaryMap, SlotMap};
use std::collections::HashMap;

/// The DOM tree structure.
pub struct DomTree {
    /// All nodes in the tree.
    nodes: SlotMap<NodeId, Node>,
    /// Root node (document).
    root: NodeId,
    /// ID to node mapping for fast lookups.
    id_map: HashMap<String, NodeId>,
    /// Playback state of native media elements.
    media: SecondaryMap<NodeId, MediaState>,
}

impl DomTree {
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert_with_key(Node::new_document);
        Self {
            nodes,
            root,
            id_map: HashMap::new(),
            media: SecondaryMap::new(),
        }
    }

    /// Get the root document node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Get a node by ID.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Get a mutable node by ID.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    /// Get element data for a node.
    pub fn get_element(&self, id: NodeId) -> Option<&ElementData> {
        self.nodes.get(id).and_then(|n| n.as_element())
    }

    /// Get mutable element data for a node.
    pub fn get_element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        self.nodes.get_mut(id).and_then(|n| n.as_element_mut())
    }

    /// Create an element node, detached from the tree.
    pub fn create_element(&mut self, data: ElementData) -> NodeId {
        let elem_id = data.id().map(str::to_string);
        let is_media = data.tag_name == TagName::video();
        let id = self.nodes.insert_with_key(|id| Node::new_element(id, data));
        if let Some(elem_id) = elem_id {
            self.id_map.insert(elem_id, id);
        }
        if is_media {
            self.media.insert(id, MediaState::default());
        }
        id
    }

    /// Create a text node.
    pub fn create_text(&mut self, content: String) -> NodeId {
        self.nodes.insert_with_key(|id| Node::new_text(id, content))
    }

    /// Instantiate a markup fragment into detached nodes, returning the root.
    pub fn instantiate(&mut self, markup: &Markup) -> NodeId {
        let mut data = ElementData::new(markup.tag.clone());
        for class in &markup.classes {
            data.add_class(class);
        }
        for (name, value) in markup.attributes.iter() {
            data.set_attribute(name, value);
        }
        let id = self.create_element(data);
        for child in &markup.children {
            let child_id = match child {
                MarkupNode::Element(el) => self.instantiate(el),
                MarkupNode::Text(text) => self.create_text(text.clone()),
            };
            self.append_child(id, child_id);
        }
        id
    }

    /// Append a child to a parent node.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if self.nodes.get(parent).is_none() || self.nodes.get(child).is_none() {
            return;
        }
        self.remove_from_parent(child);

        if let Some(last_child) = self.nodes.get(parent).and_then(Node::last_child) {
            if let Some(last) = self.nodes.get_mut(last_child) {
                last.next_sibling = Some(child);
            }
            if let Some(child_node) = self.nodes.get_mut(child) {
                child_node.prev_sibling = Some(last_child);
            }
        }

        if let Some(parent_node) = self.nodes.get_mut(parent) {
            parent_node.children.push(child);
        }
        if let Some(child_node) = self.nodes.get_mut(child) {
            child_node.parent = Some(parent);
            child_node.next_sibling = None;
        }

        self.update_id_map(child);
    }

    /// Insert a child as the first child of a parent node.
    pub fn prepend_child(&mut self, parent: NodeId, child: NodeId) {
        match self.first_child(parent) {
            None => self.append_child(parent, child),
            Some(reference) => self.insert_before(parent, child, reference),
        }
    }

    fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: NodeId) {
        if self.nodes.get(child).is_none() {
            return;
        }
        self.remove_from_parent(child);

        let Some(pos) = self
            .nodes
            .get(parent)
            .and_then(|p| p.children.iter().position(|&id| id == reference))
        else {
            return;
        };

        if let Some(parent_node) = self.nodes.get_mut(parent) {
            parent_node.children.insert(pos, child);
        }

        let prev = self.nodes.get(reference).and_then(|n| n.prev_sibling);
        if let Some(prev_id) = prev {
            if let Some(prev_node) = self.nodes.get_mut(prev_id) {
                prev_node.next_sibling = Some(child);
            }
        }
        if let Some(child_node) = self.nodes.get_mut(child) {
            child_node.parent = Some(parent);
            child_node.prev_sibling = prev;
            child_node.next_sibling = Some(reference);
        }
        if let Some(ref_node) = self.nodes.get_mut(reference) {
            ref_node.prev_sibling = Some(child);
        }

        self.update_id_map(child);
    }

    /// Remove a node from its parent, keeping it alive.
    pub fn remove_from_parent(&mut self, node: NodeId) {
        let (parent, prev, next) = {
            let Some(node_data) = self.nodes.get(node) else {
                return;
            };
            (node_data.parent, node_data.prev_sibling, node_data.next_sibling)
        };

        if let Some(parent_id) = parent {
            if let Some(parent_node) = self.nodes.get_mut(parent_id) {
                parent_node.children.retain(|id| *id != node);
            }
        }
        if let Some(prev_id) = prev {
            if let Some(prev_node) = self.nodes.get_mut(prev_id) {
                prev_node.next_sibling = next;
            }
        }
        if let Some(next_id) = next {
            if let Some(next_node) = self.nodes.get_mut(next_id) {
                next_node.prev_sibling = prev;
            }
        }
        if let Some(node_data) = self.nodes.get_mut(node) {
            node_data.parent = None;
            node_data.prev_sibling = None;
            node_data.next_sibling = None;
        }
    }

    /// Remove a node and its subtree from the tree.
    pub fn remove(&mut self, node: NodeId) {
        self.remove_from_parent(node);

        let mut to_remove = vec![node];
        let mut i = 0;
        while i < to_remove.len() {
            if let Some(n) = self.nodes.get(to_remove[i]) {
                to_remove.extend(n.children.iter().copied());
            }
            i += 1;
        }

        for &id in &to_remove {
            if let Some(elem_id) = self.nodes.get(id).and_then(|n| n.as_element()).and_then(ElementData::id) {
                self.id_map.remove(elem_id);
            }
        }
        for id in to_remove {
            self.nodes.remove(id);
            self.media.remove(id);
        }
    }

    /// Remove all children of a node.
    pub fn remove_children(&mut self, node: NodeId) {
        let children: Vec<NodeId> = self
            .nodes
            .get(node)
            .map(|n| n.children.iter().copied().collect())
            .unwrap_or_default();
        for child in children {
            self.remove(child);
        }
    }

    /// Get parent node.
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node).and_then(|n| n.parent)
    }

    /// Get first child.
    pub fn first_child(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node).and_then(Node::first_child)
    }

    /// Get all children.
    pub fn children(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .get(node)
            .into_iter()
            .flat_map(|n| n.children.iter().copied())
    }

    /// Get descendants (pre-order).
    pub fn descendants(&self, node: NodeId) -> DescendantIterator<'_> {
        let mut stack = Vec::new();
        if let Some(n) = self.nodes.get(node) {
            for &child in n.children.iter().rev() {
                stack.push(child);
            }
        }
        DescendantIterator { tree: self, stack }
    }

    /// Find element by ID anywhere in the tree.
    pub fn find_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.id_map.get(id).copied().filter(|&node| {
            // Stale map entries for detached-then-dropped nodes are skipped.
            self.nodes.contains_key(node)
        })
    }

    /// Find descendants of `scope` carrying a class.
    pub fn find_by_class(&self, scope: NodeId, class: &str) -> Vec<NodeId> {
        self.descendants(scope)
            .filter(|&id| {
                self.get_element(id)
                    .map(|e| e.has_class(class))
                    .unwrap_or(false)
            })
            .collect()
    }

    /// Find descendants of `scope` with a tag name.
    pub fn find_by_tag(&self, scope: NodeId, tag: &str) -> Vec<NodeId> {
        let tag_lower = tag.to_ascii_lowercase();
        self.descendants(scope)
            .filter(|&id| {
                self.get_element(id)
                    .map(|e| e.tag_name.as_str() == tag_lower)
                    .unwrap_or(false)
            })
            .collect()
    }

    /// Serialize an element's children to HTML text.
    pub fn inner_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        for child in self.children(node) {
            self.serialize_into(child, &mut out);
        }
        out
    }

    fn serialize_into(&self, node: NodeId, out: &mut String) {
        let Some(n) = self.nodes.get(node) else {
            return;
        };
        match &n.data {
            NodeData::Text { content } => out.push_str(&crate::attributes::html_escape(content)),
            NodeData::Element(elem) => {
                out.push('<');
                out.push_str(elem.tag_name.as_str());
                for name in ["class", "style"] {
                    if let Some(value) = elem.get_attribute(name) {
                        out.push_str(&format!(
                            " {}=\"{}\"",
                            name,
                            crate::attributes::html_escape(&value)
                        ));
                    }
                }
                if !elem.attributes.is_empty() {
                    out.push(' ');
                    out.push_str(&elem.attributes.to_html());
                }
                out.push('>');
                if elem.tag_name.is_void() {
                    return;
                }
                for child in n.children.iter() {
                    self.serialize_into(*child, out);
                }
                out.push_str("</");
                out.push_str(elem.tag_name.as_str());
                out.push('>');
            }
            NodeData::Document => {
                for child in n.children.iter() {
                    self.serialize_into(*child, out);
                }
            }
        }
    }

    /// Set an attribute on a node, keeping the id lookup map current.
    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        let old_id = if name == "id" {
            self.get_element(node).and_then(ElementData::id).map(str::to_string)
        } else {
            None
        };
        let Some(elem) = self.get_element_mut(node) else {
            return;
        };
        elem.set_attribute(name, value);
        if name == "id" {
            if let Some(old) = old_id {
                self.id_map.remove(&old);
            }
            self.id_map.insert(value.to_string(), node);
        }
    }

    /// Get the media state of a node, if it is a media element.
    pub fn media_state(&self, node: NodeId) -> Option<MediaState> {
        self.media.get(node).copied()
    }

    /// Mutate the media state of a node; no-op for non-media nodes.
    pub fn media_update(&mut self, node: NodeId, f: impl FnOnce(&mut MediaState)) {
        if let Some(state) = self.media.get_mut(node) {
            f(state);
        }
    }

    fn update_id_map(&mut self, node: NodeId) {
        if let Some(id) = self
            .nodes
            .get(node)
            .and_then(|n| n.as_element())
            .and_then(ElementData::id)
            .map(str::to_string)
        {
            self.id_map.insert(id, node);
        }
    }

    /// Get total number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty (only root).
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over descendant nodes (pre-order traversal).
pub struct DescendantIterator<'a> {
    tree: &'a DomTree,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for DescendantIterator<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        if let Some(node) = self.tree.nodes.get(current) {
            for &child in node.children.iter().rev() {
                self.stack.push(child);
            }
        }
        Some(current)
    }
}
