//! DOM element implementation.

use crate::attributes::AttributeMap;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use smallvec::SmallVec;
use std::collections::HashMap;
use std::sync::Arc;

/// Interned HTML tag name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TagName(Arc<str>);

impl TagName {
    pub fn new(name: &str) -> Self {
        static INTERNED: Lazy<RwLock<HashMap<String, Arc<str>>>> =
            Lazy::new(|| RwLock::new(HashMap::new()));

        let lower = name.to_ascii_lowercase();

        {
            let cache = INTERNED.read();
            if let Some(s) = cache.get(&lower) {
                return TagName(s.clone());
            }
        }

        let mut cache = INTERNED.write();
        let s = cache
            .entry(lower.clone())
            .or_insert_with(|| Arc::from(lower.as_str()))
            .clone();
        TagName(s)
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    // Tag names the gallery and its plugins create.
    pub fn div() -> Self {
        Self::new("div")
    }
    pub fn img() -> Self {
        Self::new("img")
    }
    pub fn iframe() -> Self {
        Self::new("iframe")
    }
    pub fn video() -> Self {
        Self::new("video")
    }
    pub fn source() -> Self {
        Self::new("source")
    }

    /// Check if this is a void element (no closing tag when serialized).
    pub fn is_void(&self) -> bool {
        matches!(self.as_str(), "img" | "source" | "br" | "hr" | "input")
    }
}

impl std::fmt::Display for TagName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for TagName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for TagName {
    fn eq(&self, other: &str) -> bool {
        self.0.as_ref() == other.to_ascii_lowercase()
    }
}

/// Element data: tag name, attributes, class list and inline style.
///
/// `class` and `style` are held structured rather than as attribute text;
/// the serializer reassembles them.
#[derive(Clone, Debug)]
pub struct ElementData {
    pub tag_name: TagName,
    pub attributes: AttributeMap,
    pub classes: SmallVec<[String; 4]>,
    pub style: IndexMap<String, String>,
}

impl ElementData {
    pub fn new(tag_name: TagName) -> Self {
        Self {
            tag_name,
            attributes: AttributeMap::new(),
            classes: SmallVec::new(),
            style: IndexMap::new(),
        }
    }

    /// Set an attribute. `class` and `style` route to their structured forms.
    pub fn set_attribute(&mut self, name: &str, value: &str) {
        match name {
            "class" => {
                self.classes = value.split_whitespace().map(str::to_string).collect();
            }
            "style" => {
                self.style = parse_inline_style(value);
            }
            _ => self.attributes.set(name, value),
        }
    }

    /// Get an attribute. `class` and `style` are synthesized.
    pub fn get_attribute(&self, name: &str) -> Option<String> {
        match name {
            "class" => {
                if self.classes.is_empty() {
                    None
                } else {
                    Some(self.classes.join(" "))
                }
            }
            "style" => {
                if self.style.is_empty() {
                    None
                } else {
                    Some(render_inline_style(&self.style))
                }
            }
            _ => self.attributes.get(name).map(str::to_string),
        }
    }

    pub fn remove_attribute(&mut self, name: &str) {
        match name {
            "class" => self.classes.clear(),
            "style" => self.style.clear(),
            _ => {
                self.attributes.remove(name);
            }
        }
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        match name {
            "class" => !self.classes.is_empty(),
            "style" => !self.style.is_empty(),
            _ => self.attributes.contains(name),
        }
    }

    /// The element id, if any.
    pub fn id(&self) -> Option<&str> {
        self.attributes.get("id")
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn add_class(&mut self, class: &str) {
        if !class.is_empty() && !self.has_class(class) {
            self.classes.push(class.to_string());
        }
    }

    pub fn remove_class(&mut self, class: &str) {
        self.classes.retain(|c| c != class);
    }

    /// Set an inline style property.
    pub fn set_style(&mut self, property: &str, value: &str) {
        self.style.insert(property.to_string(), value.to_string());
    }

    /// Get an inline style property value, if set.
    pub fn style(&self, property: &str) -> Option<&str> {
        self.style.get(property).map(String::as_str)
    }
}

fn parse_inline_style(value: &str) -> IndexMap<String, String> {
    let mut style = IndexMap::new();
    for declaration in value.split(';') {
        if let Some((prop, val)) = declaration.split_once(':') {
            let prop = prop.trim();
            let val = val.trim();
            if !prop.is_empty() && !val.is_empty() {
                style.insert(prop.to_string(), val.to_string());
            }
        }
    }
    style
}

fn render_inline_style(style: &IndexMap<String, String>) -> String {
    style
        .iter()
        .map(|(p, v)| format!("{}: {};", p, v))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_name_interning() {
        let a = TagName::new("IFRAME");
        let b = TagName::iframe();
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "iframe");
    }

    #[test]
    fn test_class_attribute_roundtrip() {
        let mut data = ElementData::new(TagName::div());
        data.set_attribute("class", "lg-video-object lg-youtube");
        assert!(data.has_class("lg-youtube"));

        data.add_class("lg-object");
        assert_eq!(
            data.get_attribute("class").as_deref(),
            Some("lg-video-object lg-youtube lg-object")
        );

        data.remove_class("lg-youtube");
        assert!(!data.has_class("lg-youtube"));
    }

    #[test]
    fn test_inline_style() {
        let mut data = ElementData::new(TagName::div());
        data.set_attribute("style", "display: none; max-width: 855px");
        assert_eq!(data.style("display"), Some("none"));

        data.set_style("display", "block");
        assert_eq!(
            data.get_attribute("style").as_deref(),
            Some("display: block; max-width: 855px;")
        );
    }
}
