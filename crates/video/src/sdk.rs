//! Provider player SDK surfaces.
//!
//! Each iframe provider exposes its own construction shape: YouTube hands
//! the player back through a readiness callback, Vimeo constructs
//! synchronously from the embed node, Wistia queues a handle request that
//! resolves whenever its script decides to. The traits here keep those
//! shapes, while every constructed player converges on the same
//! [`PlayerControl`] capability set.

use lightbox_dom::NodeId;
use serde_json::Value;
use std::sync::Arc;

/// SDK-level failure. Playback never propagates these; they are logged and
/// the gallery keeps navigating.
#[derive(Debug, thiserror::Error)]
pub enum SdkError {
    #[error("{0} player SDK is not loaded")]
    NotLoaded(&'static str),
    #[error("player construction failed: {0}")]
    Construction(String),
}

/// Runs when a deferred player construction completes.
pub type ReadyCallback = Box<dyn FnOnce(PlayerHandle) + Send>;

/// Runs when a provider player reports the end of playback.
pub type EndedCallback = Arc<dyn Fn() + Send + Sync>;

/// The uniform capability set of a constructed provider player.
pub trait PlayerControl: Send + Sync {
    fn play(&self);
    fn pause(&self);
    /// Subscribe to the player's end-of-playback signal.
    fn on_ended(&self, callback: EndedCallback);
}

pub type PlayerHandle = Arc<dyn PlayerControl>;

/// YouTube iframe API: construction is asynchronous, keyed by the embed
/// iframe's element id.
pub trait YoutubeSdk: Send + Sync {
    fn create_player(&self, iframe_id: &str, on_ready: ReadyCallback) -> Result<(), SdkError>;
}

/// Vimeo player API: constructs synchronously from the embed node.
pub trait VimeoSdk: Send + Sync {
    fn create_player(&self, iframe: NodeId) -> Result<PlayerHandle, SdkError>;
}

/// Wistia queue API: handle requests resolve out of band, keyed by the
/// embed iframe's element id.
pub trait WistiaSdk: Send + Sync {
    fn queue(&self, iframe_id: &str, on_ready: ReadyCallback) -> Result<(), SdkError>;
}

/// videojs wrapper over a native `<video>` element.
pub trait VideojsSdk: Send + Sync {
    fn attach(&self, video: NodeId, options: &Value) -> Result<PlayerHandle, SdkError>;
}

/// The provider SDKs available to a gallery instance.
///
/// All slots are optional; a slide whose provider has no registered SDK
/// plays uncontrolled inside its iframe.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    pub youtube: Option<Arc<dyn YoutubeSdk>>,
    pub vimeo: Option<Arc<dyn VimeoSdk>>,
    pub wistia: Option<Arc<dyn WistiaSdk>>,
    pub videojs: Option<Arc<dyn VideojsSdk>>,
}

impl ProviderRegistry {
    pub fn youtube(&self) -> Result<&Arc<dyn YoutubeSdk>, SdkError> {
        self.youtube.as_ref().ok_or(SdkError::NotLoaded("youtube"))
    }

    pub fn vimeo(&self) -> Result<&Arc<dyn VimeoSdk>, SdkError> {
        self.vimeo.as_ref().ok_or(SdkError::NotLoaded("vimeo"))
    }

    pub fn wistia(&self) -> Result<&Arc<dyn WistiaSdk>, SdkError> {
        self.wistia.as_ref().ok_or(SdkError::NotLoaded("wistia"))
    }

    pub fn videojs(&self) -> Result<&Arc<dyn VideojsSdk>, SdkError> {
        self.videojs.as_ref().ok_or(SdkError::NotLoaded("videojs"))
    }
}
