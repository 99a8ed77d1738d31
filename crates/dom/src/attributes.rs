//! DOM attribute handling.

use indexmap::IndexMap;

/// Map of element attributes preserving insertion order.
///
/// Boolean attributes (`allowfullscreen`, `controls`, ...) are stored with an
/// empty value and rendered bare.
#[derive(Clone, Debug, Default)]
pub struct AttributeMap {
    attrs: IndexMap<String, String>,
}

impl AttributeMap {
    pub fn new() -> Self {
        Self {
            attrs: IndexMap::new(),
        }
    }

    /// Set an attribute value.
    pub fn set(&mut self, name: &str, value: &str) {
        self.attrs.insert(name.to_ascii_lowercase(), value.to_string());
    }

    /// Set a boolean attribute.
    pub fn set_bool(&mut self, name: &str) {
        self.set(name, "");
    }

    /// Get an attribute value.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.attrs.get(&name.to_ascii_lowercase()).map(|s| s.as_str())
    }

    /// Remove an attribute.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.attrs.shift_remove(&name.to_ascii_lowercase())
    }

    /// Check if attribute exists.
    pub fn contains(&self, name: &str) -> bool {
        self.attrs.contains_key(&name.to_ascii_lowercase())
    }

    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    /// Iterate over attributes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attrs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Convert to an HTML attribute string.
    pub fn to_html(&self) -> String {
        let mut result = String::new();
        for (name, value) in &self.attrs {
            if !result.is_empty() {
                result.push(' ');
            }
            if value.is_empty() {
                result.push_str(name);
            } else {
                result.push_str(name);
                result.push_str("=\"");
                result.push_str(&html_escape(value));
                result.push('"');
            }
        }
        result
    }
}

/// Escape HTML special characters.
pub fn html_escape(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            _ => result.push(c),
        }
    }
    result
}
