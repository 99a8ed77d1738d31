//! Video slide support for the lightbox gallery.
//!
//! Classifies slide media against the known providers (YouTube, Vimeo,
//! Wistia, inline HTML5), builds their embed markup, and keeps playback
//! synchronized with the gallery's slide transitions: leave a slide and
//! its video pauses, arrive on one and it can autoplay, finish one and
//! the gallery can advance.

pub mod gallery;
pub mod lifecycle;
pub mod markup;
pub mod playback;
pub mod provider;
pub mod scheduler;
pub mod sdk;
pub mod settings;

pub use gallery::{lifecycle_events, GalleryCore, GalleryItem, HasVideoDetail, SlideDetail};
pub use lifecycle::VideoPlugin;
pub use markup::{video_markup, Html5Source, Html5Video};
pub use playback::{PlaybackAction, PlaybackController};
pub use provider::{classify, VideoInfo};
pub use scheduler::Scheduler;
pub use sdk::{
    EndedCallback, PlayerControl, PlayerHandle, ProviderRegistry, ReadyCallback, SdkError,
    VideojsSdk, VimeoSdk, WistiaSdk, YoutubeSdk,
};
pub use settings::VideoSettings;
