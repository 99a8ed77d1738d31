//! Embed markup generation.
//!
//! Pure construction of provider embeds: the same inputs always produce
//! the same fragment, and nothing here touches a document. Insertion (and
//! not inserting twice for one slide) is the caller's responsibility.

use crate::provider::VideoInfo;
use crate::settings::VideoSettings;
use lightbox_dom::Markup;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::form_urlencoded;

/// One `<source>` descriptor of an inline HTML5 configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Html5Source {
    pub src: String,
    #[serde(rename = "type")]
    pub mime_type: String,
}

/// Inline HTML5 video configuration, as carried in a gallery item's JSON
/// `video` field. Keys other than `source` pass through as literal
/// `<video>` attributes.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Html5Video {
    #[serde(default)]
    pub source: Vec<Html5Source>,
    #[serde(flatten)]
    pub attrs: Map<String, Value>,
}

/// URL-encode a player-parameter map as `k=v&k=v`.
pub fn encode_params(params: &Map<String, Value>) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in params {
        serializer.append_pair(key, &value_as_text(value));
    }
    serializer.finish()
}

/// Render a JSON scalar the way it reads in an attribute or query string.
fn value_as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn embed_url(base: String, fixed: &str, params: &Map<String, Value>) -> String {
    let extra = encode_params(params);
    match (fixed.is_empty(), extra.is_empty()) {
        (true, true) => base,
        (true, false) => format!("{}?{}", base, extra),
        (false, true) => format!("{}?{}", base, fixed),
        (false, false) => format!("{}?{}&{}", base, fixed, extra),
    }
}

fn iframe_base(id: &str, title: Option<&str>, add_class: &str) -> Markup {
    let mut markup = Markup::new("iframe")
        .attr("allow", "autoplay")
        .attr("id", id)
        .class("lg-video-object")
        .class(add_class)
        .attr("allowtransparency", "true")
        .attr("frameborder", "0")
        .attr("scrolling", "no")
        .bool_attr("allowfullscreen")
        .bool_attr("mozallowfullscreen")
        .bool_attr("webkitallowfullscreen")
        .bool_attr("oallowfullscreen")
        .bool_attr("msallowfullscreen");
    if let Some(title) = title {
        markup = markup.attr("title", title);
    }
    markup
}

/// Produce the embeddable fragment for a classified slide.
///
/// Returns `None` for a slide classified as no video, or for an HTML5
/// slide without an inline configuration.
pub fn video_markup(
    info: &VideoInfo,
    settings: &VideoSettings,
    title: Option<&str>,
    add_class: &str,
    index: usize,
    html5: Option<&Html5Video>,
) -> Option<Markup> {
    match info {
        VideoInfo::Youtube { id, .. } => {
            let src = embed_url(
                format!("//www.youtube.com/embed/{}", id),
                "wmode=opaque&autoplay=0&enablejsapi=1",
                &settings.youtube_player_params,
            );
            Some(
                iframe_base(&format!("lg-youtube{}", index), title, add_class)
                    .class("lg-youtube")
                    .attr("src", &src),
            )
        }
        VideoInfo::Vimeo { id, .. } => {
            let src = embed_url(
                format!("//player.vimeo.com/video/{}", id),
                "",
                &settings.vimeo_player_params,
            );
            Some(
                iframe_base(&format!("lg-vimeo{}", index), title, add_class)
                    .class("lg-vimeo")
                    .attr("src", &src),
            )
        }
        VideoInfo::Wistia { id } => {
            let src = embed_url(
                format!("//fast.wistia.net/embed/iframe/{}", id),
                "",
                &settings.wistia_player_params,
            );
            Some(
                iframe_base(&format!("lg-wistia{}", index), title, add_class)
                    .class("wistia_embed lg-wistia")
                    .attr("src", &src)
                    .attr("name", "wistia_embed"),
            )
        }
        VideoInfo::Html5 => {
            let html5 = html5?;
            let mut markup = Markup::new("video").class("lg-video-object lg-html5");
            if settings.videojs {
                markup = markup.class("video-js");
            }
            markup = markup.class(add_class);
            for (key, value) in &html5.attrs {
                let text = value_as_text(value);
                if text.is_empty() || value == &Value::Bool(true) {
                    markup = markup.bool_attr(key);
                } else {
                    markup = markup.attr(key, &text);
                }
            }
            for source in &html5.source {
                markup = markup.child(
                    Markup::new("source")
                        .attr("src", &source.src)
                        .attr("type", &source.mime_type),
                );
            }
            Some(markup.text("Your browser does not support HTML5 video."))
        }
        VideoInfo::None => None,
    }
}
