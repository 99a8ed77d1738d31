//! Video plugin settings.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Configuration surface of the video plugin, merged over defaults.
///
/// Player-parameter maps are arbitrary key/value pairs, URL-encoded
/// verbatim into the provider embed URL.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VideoSettings {
    /// Autoplay the first slide's video when the gallery opens on it.
    pub autoplay_first_video: bool,
    /// Autoplay the current slide's video after each slide change.
    pub autoplay_video_on_slide: bool,
    /// Advance to the next slide once a video reaches its end.
    pub goto_next_slide_on_video_end: bool,
    /// Maximum display width of the video container.
    pub video_max_width: String,
    /// Route HTML5 playback through the videojs wrapper.
    pub videojs: bool,
    /// Passthrough options handed to the videojs wrapper.
    pub videojs_options: Value,
    pub youtube_player_params: Map<String, Value>,
    pub vimeo_player_params: Map<String, Value>,
    pub wistia_player_params: Map<String, Value>,
}

impl Default for VideoSettings {
    fn default() -> Self {
        Self {
            autoplay_first_video: true,
            autoplay_video_on_slide: false,
            goto_next_slide_on_video_end: true,
            video_max_width: "855px".to_string(),
            videojs: false,
            videojs_options: Value::Object(Map::new()),
            youtube_player_params: Map::new(),
            vimeo_player_params: Map::new(),
            wistia_player_params: Map::new(),
        }
    }
}
