//! Video provider classification.
//!
//! A slide's media reference is matched against the known provider URL
//! shapes; a slide that matches none of them but carries an inline HTML5
//! source list is native video, anything else is a plain image.

use once_cell::sync::Lazy;
use regex::Regex;

/// YouTube domain/path variants: `youtube.com/watch?v=`, `youtu.be/`,
/// `youtube.com/embed/`, the `-nocookie` host, with or without `www.`.
static YOUTUBE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)//(?:www\.)?youtu(?:\.be|be\.com|be-nocookie\.com)/(?:watch\?v=|embed/)?([a-zA-Z0-9\-_%]+)")
        .expect("youtube pattern")
});

/// Vimeo numeric id, optionally followed by a private-link hash segment.
static VIMEO: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)//(?:www\.)?(?:player\.)?vimeo\.com/(?:video/)?([0-9]+)(?:/(\w+))?")
        .expect("vimeo pattern")
});

/// Wistia `medias`/`embed` path forms on `wistia.com` or `wi.st`.
static WISTIA: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)https?://(?:.+)?(?:wistia\.com|wi\.st)/(?:medias|embed(?:/iframe|/medias)?)/([0-9a-z\-_]+)")
        .expect("wistia pattern")
});

/// Classification result for one slide, computed at most once.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VideoInfo {
    /// Inline HTML5 source list; played through a native `<video>`.
    Html5,
    Youtube {
        url: String,
        id: String,
    },
    Vimeo {
        url: String,
        id: String,
        /// Private-link hash, when present.
        hash: Option<String>,
    },
    Wistia {
        id: String,
    },
    /// Not a video; the slide is treated as an image.
    None,
}

impl VideoInfo {
    /// Whether this slide embeds through a provider iframe.
    pub fn is_iframe(&self) -> bool {
        matches!(
            self,
            VideoInfo::Youtube { .. } | VideoInfo::Vimeo { .. } | VideoInfo::Wistia { .. }
        )
    }

    /// Whether this slide holds any video at all.
    pub fn is_video(&self) -> bool {
        !matches!(self, VideoInfo::None)
    }

    /// Deterministic element id for the slide's embed: `lg-<provider><index>`.
    pub fn element_id(&self, index: usize) -> Option<String> {
        match self {
            VideoInfo::Youtube { .. } => Some(format!("lg-youtube{}", index)),
            VideoInfo::Vimeo { .. } => Some(format!("lg-vimeo{}", index)),
            VideoInfo::Wistia { .. } => Some(format!("lg-wistia{}", index)),
            VideoInfo::Html5 | VideoInfo::None => None,
        }
    }
}

/// Classify a slide's media reference.
///
/// Exactly one branch matches; providers are probed in a fixed order and
/// an inline HTML5 configuration only applies when no provider URL
/// matched. Never panics, whatever the input string looks like.
pub fn classify(src: Option<&str>, has_html5_config: bool) -> VideoInfo {
    if let Some(src) = src {
        if let Some(caps) = YOUTUBE.captures(src) {
            return VideoInfo::Youtube {
                url: caps[0].to_string(),
                id: caps[1].to_string(),
            };
        }
        if let Some(caps) = VIMEO.captures(src) {
            return VideoInfo::Vimeo {
                url: caps[0].to_string(),
                id: caps[1].to_string(),
                hash: caps.get(2).map(|m| m.as_str().to_string()),
            };
        }
        if let Some(caps) = WISTIA.captures(src) {
            return VideoInfo::Wistia {
                id: caps[1].to_string(),
            };
        }
    }
    if has_html5_config {
        VideoInfo::Html5
    } else {
        VideoInfo::None
    }
}
