//! Namespaced event registration and dispatch.
//!
//! Listener registrations are keyed by the full `(node, event name,
//! namespace)` triple so one module's teardown can never detach another
//! module's listeners for the same event name. `"load.lg.video"` parses to
//! the primary name `load` under the namespace `lg.video`; dispatch ignores
//! namespaces, removal honors them.

use crate::node::NodeId;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// A dispatched event.
#[derive(Clone, Debug)]
pub struct Event {
    /// Primary event name, without any namespace suffix.
    pub name: Arc<str>,
    /// Node the event was triggered on.
    pub target: Option<NodeId>,
    /// Arbitrary payload supplied by the trigger site.
    pub detail: Value,
}

impl Event {
    pub fn new(name: &str, target: Option<NodeId>, detail: Value) -> Self {
        Self {
            name: Arc::from(name),
            target,
            detail,
        }
    }
}

/// Event listener callback type.
pub type EventCallback = Arc<dyn Fn(&Event) + Send + Sync>;

/// A `"name.ns"` token split into its parts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventKey {
    pub name: String,
    /// Empty when the token carries no namespace.
    pub namespace: String,
}

impl EventKey {
    /// Parse a single token; everything after the first dot is the namespace.
    pub fn parse(token: &str) -> Self {
        match token.split_once('.') {
            Some((name, namespace)) => Self {
                name: name.to_string(),
                namespace: namespace.to_string(),
            },
            None => Self {
                name: token.to_string(),
                namespace: String::new(),
            },
        }
    }

    /// Parse a space-separated event list.
    pub fn parse_list(tokens: &str) -> Vec<Self> {
        tokens.split_whitespace().map(Self::parse).collect()
    }
}

struct Registered {
    namespace: String,
    callback: EventCallback,
}

/// Per-document listener table.
#[derive(Default)]
pub struct EventRegistry {
    listeners: HashMap<NodeId, HashMap<String, Vec<Registered>>>,
}

impl EventRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for one parsed event token.
    pub fn add(&mut self, node: NodeId, key: &EventKey, callback: EventCallback) {
        self.listeners
            .entry(node)
            .or_default()
            .entry(key.name.clone())
            .or_default()
            .push(Registered {
                namespace: key.namespace.clone(),
                callback,
            });
    }

    /// Remove listeners for one parsed event token.
    ///
    /// With a namespace, only that `(name, namespace)` pair is removed; a
    /// bare name removes every listener for the name across all namespaces.
    pub fn remove(&mut self, node: NodeId, key: &EventKey) {
        let Some(by_name) = self.listeners.get_mut(&node) else {
            return;
        };
        if key.namespace.is_empty() {
            by_name.remove(&key.name);
        } else if let Some(list) = by_name.get_mut(&key.name) {
            list.retain(|r| r.namespace != key.namespace);
        }
    }

    /// Remove every listener on a node whose namespace is `ns` or nested
    /// under it (`ns.sub`).
    pub fn remove_namespace(&mut self, node: NodeId, ns: &str) {
        if let Some(by_name) = self.listeners.get_mut(&node) {
            for list in by_name.values_mut() {
                list.retain(|r| !namespace_matches(&r.namespace, ns));
            }
        }
    }

    /// Remove every listener in the document whose namespace is `ns` or
    /// nested under it. Bulk module teardown.
    pub fn remove_namespace_all(&mut self, ns: &str) {
        for by_name in self.listeners.values_mut() {
            for list in by_name.values_mut() {
                list.retain(|r| !namespace_matches(&r.namespace, ns));
            }
        }
    }

    /// Drop every listener attached to a node. Used when the node leaves
    /// the tree.
    pub fn remove_node(&mut self, node: NodeId) {
        self.listeners.remove(&node);
    }

    /// Snapshot the callbacks for a primary name, across all namespaces.
    ///
    /// Dispatch runs over the snapshot, so listeners registered during
    /// dispatch do not run in the same dispatch.
    pub fn snapshot(&self, node: NodeId, name: &str) -> Vec<EventCallback> {
        self.listeners
            .get(&node)
            .and_then(|by_name| by_name.get(name))
            .map(|list| list.iter().map(|r| r.callback.clone()).collect())
            .unwrap_or_default()
    }

    /// Number of listeners for a primary name on a node.
    pub fn count(&self, node: NodeId, name: &str) -> usize {
        self.listeners
            .get(&node)
            .and_then(|by_name| by_name.get(name))
            .map(|list| list.len())
            .unwrap_or(0)
    }
}

fn namespace_matches(registered: &str, ns: &str) -> bool {
    registered == ns
        || (registered.len() > ns.len()
            && registered.starts_with(ns)
            && registered.as_bytes()[ns.len()] == b'.')
}
