//! Structured markup fragments.
//!
//! Plugins build embeds as [`Markup`] trees instead of raw HTML strings; a
//! fragment renders to HTML text and instantiates into the node arena when
//! appended. Building a fragment has no side effects on any document.

use crate::attributes::{html_escape, AttributeMap};
use crate::element::TagName;

/// One node of a markup fragment.
#[derive(Clone, Debug)]
pub enum MarkupNode {
    Element(Markup),
    Text(String),
}

/// An embeddable element fragment.
#[derive(Clone, Debug)]
pub struct Markup {
    pub tag: TagName,
    pub attributes: AttributeMap,
    pub classes: Vec<String>,
    pub children: Vec<MarkupNode>,
}

impl Markup {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: TagName::new(tag),
            attributes: AttributeMap::new(),
            classes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.set(name, value);
        self
    }

    pub fn bool_attr(mut self, name: &str) -> Self {
        self.attributes.set_bool(name);
        self
    }

    /// Add one or more space-separated classes. Empty input is ignored.
    pub fn class(mut self, classes: &str) -> Self {
        for class in classes.split_whitespace() {
            if !self.classes.iter().any(|c| c == class) {
                self.classes.push(class.to_string());
            }
        }
        self
    }

    pub fn child(mut self, child: Markup) -> Self {
        self.children.push(MarkupNode::Element(child));
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.children.push(MarkupNode::Text(text.to_string()));
        self
    }

    /// Render the fragment to HTML text.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out);
        out
    }

    fn render_into(&self, out: &mut String) {
        out.push('<');
        out.push_str(self.tag.as_str());
        if !self.classes.is_empty() {
            out.push_str(" class=\"");
            out.push_str(&html_escape(&self.classes.join(" ")));
            out.push('"');
        }
        if !self.attributes.is_empty() {
            out.push(' ');
            out.push_str(&self.attributes.to_html());
        }
        out.push('>');
        if self.tag.is_void() {
            return;
        }
        for child in &self.children {
            match child {
                MarkupNode::Element(el) => el.render_into(out),
                MarkupNode::Text(text) => out.push_str(&html_escape(text)),
            }
        }
        out.push_str("</");
        out.push_str(self.tag.as_str());
        out.push('>');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_nested() {
        let markup = Markup::new("video")
            .class("lg-video-object lg-html5")
            .bool_attr("controls")
            .child(
                Markup::new("source")
                    .attr("src", "video.mp4")
                    .attr("type", "video/mp4"),
            )
            .text("Your browser does not support HTML5 video.");

        assert_eq!(
            markup.render(),
            "<video class=\"lg-video-object lg-html5\" controls>\
             <source src=\"video.mp4\" type=\"video/mp4\">\
             Your browser does not support HTML5 video.</video>"
        );
    }

    #[test]
    fn test_render_is_pure() {
        let markup = Markup::new("iframe").attr("id", "lg-youtube0");
        assert_eq!(markup.render(), markup.render());
    }

    #[test]
    fn test_duplicate_classes_collapse() {
        let markup = Markup::new("div").class("a b").class("b c");
        assert_eq!(markup.render(), "<div class=\"a b c\"></div>");
    }
}
