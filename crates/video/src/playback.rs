//! Cross-provider playback control.
//!
//! One controller per gallery instance tracks, per slide, the provider
//! player binding and at most one pending command. Bindings are created
//! lazily on the first command that needs one; while a binding is still
//! connecting, later commands overwrite the pending slot so only the
//! latest intent runs once the player arrives.

use crate::provider::VideoInfo;
use crate::sdk::{EndedCallback, PlayerHandle, ProviderRegistry, SdkError};
use crate::settings::VideoSettings;
use lightbox_dom::Selection;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Weak};

/// A playback command against one slide's player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackAction {
    Play,
    Pause,
}

enum Binding {
    /// No player constructed for this slide yet.
    Idle,
    /// Construction in flight; commands park in the pending slot.
    Connecting,
    Ready(PlayerHandle),
}

struct SlideSlot {
    generation: u64,
    binding: Binding,
    pending: Option<PlaybackAction>,
    ended_hook: Option<EndedCallback>,
}

impl SlideSlot {
    fn new(generation: u64) -> Self {
        Self {
            generation,
            binding: Binding::Idle,
            pending: None,
            ended_hook: None,
        }
    }
}

/// Per-gallery playback controller.
pub struct PlaybackController {
    registry: ProviderRegistry,
    slides: Mutex<HashMap<usize, SlideSlot>>,
}

impl PlaybackController {
    pub fn new(registry: ProviderRegistry) -> Self {
        Self {
            registry,
            slides: Mutex::new(HashMap::new()),
        }
    }

    /// Register the end-of-playback hook for a slide's provider player.
    ///
    /// Attached to the player on binding completion, or immediately when
    /// the binding is already live.
    pub fn set_ended_hook(&self, index: usize, hook: EndedCallback) {
        let mut slides = self.slides.lock();
        let slot = slides.entry(index).or_insert_with(|| SlideSlot::new(0));
        if let Binding::Ready(handle) = &slot.binding {
            handle.on_ended(hook.clone());
        }
        slot.ended_hook = Some(hook);
    }

    /// Issue a playback command against a slide.
    ///
    /// HTML5 slides act synchronously on the native element (or through
    /// videojs when configured). Iframe slides route through the provider
    /// SDK, constructing the player on first use. SDK failures are logged
    /// and swallowed; navigation must keep working without players.
    pub fn control(
        self: &Arc<Self>,
        slide: &Selection,
        index: usize,
        info: &VideoInfo,
        action: PlaybackAction,
        settings: &VideoSettings,
    ) {
        match info {
            VideoInfo::Html5 => self.control_html5(slide, index, action, settings),
            VideoInfo::Youtube { .. } | VideoInfo::Vimeo { .. } | VideoInfo::Wistia { .. } => {
                self.control_iframe(slide, index, info, action)
            }
            VideoInfo::None => {}
        }
    }

    fn control_html5(
        self: &Arc<Self>,
        slide: &Selection,
        index: usize,
        action: PlaybackAction,
        settings: &VideoSettings,
    ) {
        let video = slide.find(".lg-html5").first();
        if video.is_empty() {
            tracing::debug!(index, "no html5 element in slide; dropping command");
            return;
        }
        if settings.videojs {
            self.control_videojs(&video, index, action, &settings.videojs_options);
            return;
        }
        match action {
            PlaybackAction::Play => video.media_play(),
            PlaybackAction::Pause => video.media_pause(),
        };
    }

    fn control_videojs(
        self: &Arc<Self>,
        video: &Selection,
        index: usize,
        action: PlaybackAction,
        options: &Value,
    ) {
        let handle = {
            let mut slides = self.slides.lock();
            let slot = slides.entry(index).or_insert_with(|| SlideSlot::new(0));
            match &slot.binding {
                Binding::Ready(handle) => Some(handle.clone()),
                _ => None,
            }
        };
        if let Some(handle) = handle {
            apply(&handle, action);
            return;
        }

        let node = match video.get() {
            Some(node) => node,
            None => return,
        };
        let attached = self
            .registry
            .videojs()
            .and_then(|sdk| sdk.attach(node, options));
        match attached {
            Ok(handle) => {
                let mut slides = self.slides.lock();
                let slot = slides.entry(index).or_insert_with(|| SlideSlot::new(0));
                if let Some(hook) = &slot.ended_hook {
                    handle.on_ended(hook.clone());
                }
                slot.binding = Binding::Ready(handle.clone());
                drop(slides);
                apply(&handle, action);
            }
            Err(err) => report(index, "videojs", &err),
        }
    }

    fn control_iframe(
        self: &Arc<Self>,
        slide: &Selection,
        index: usize,
        info: &VideoInfo,
        action: PlaybackAction,
    ) {
        // Fast path: binding already live.
        {
            let mut slides = self.slides.lock();
            let slot = slides.entry(index).or_insert_with(|| SlideSlot::new(0));
            match &slot.binding {
                Binding::Ready(handle) => {
                    let handle = handle.clone();
                    drop(slides);
                    apply(&handle, action);
                    return;
                }
                Binding::Connecting => {
                    // Last write wins while the player connects.
                    slot.pending = Some(action);
                    return;
                }
                Binding::Idle => {
                    slot.pending = Some(action);
                    slot.binding = Binding::Connecting;
                }
            }
        }
        if let Err(err) = self.connect(slide, index, info) {
            report(index, provider_name(info), &err);
            let mut slides = self.slides.lock();
            if let Some(slot) = slides.get_mut(&index) {
                slot.binding = Binding::Idle;
                slot.pending = None;
            }
        }
    }

    /// Kick off player construction for a slide. At most one construction
    /// runs per slide; the pending slot holds the command to replay.
    fn connect(self: &Arc<Self>, slide: &Selection, index: usize, info: &VideoInfo) -> Result<(), SdkError> {
        let generation = self
            .slides
            .lock()
            .get(&index)
            .map(|slot| slot.generation)
            .unwrap_or(0);
        match info {
            VideoInfo::Youtube { .. } => {
                let iframe_id = format!("lg-youtube{}", index);
                let this = Arc::downgrade(self);
                self.registry.youtube()?.create_player(
                    &iframe_id,
                    Box::new(move |handle| {
                        ready(&this, index, generation, handle);
                    }),
                )
            }
            VideoInfo::Vimeo { .. } => {
                let iframe = slide
                    .find(&format!("#lg-vimeo{}", index))
                    .get()
                    .ok_or_else(|| SdkError::Construction("vimeo embed not in slide".into()))?;
                let handle = self.registry.vimeo()?.create_player(iframe)?;
                self.binding_ready(index, generation, handle);
                Ok(())
            }
            VideoInfo::Wistia { .. } => {
                let iframe_id = format!("lg-wistia{}", index);
                let this = Arc::downgrade(self);
                self.registry.wistia()?.queue(
                    &iframe_id,
                    Box::new(move |handle| {
                        ready(&this, index, generation, handle);
                    }),
                )
            }
            VideoInfo::Html5 | VideoInfo::None => Ok(()),
        }
    }

    /// Complete a slide's binding: attach the ended hook, drain the
    /// pending command. Stale completions (the slide was invalidated or
    /// rebuilt since construction started) are dropped.
    fn binding_ready(&self, index: usize, generation: u64, handle: PlayerHandle) {
        let drained = {
            let mut slides = self.slides.lock();
            let slot = match slides.get_mut(&index) {
                Some(slot) if slot.generation == generation => slot,
                _ => {
                    tracing::debug!(index, "dropping stale player binding");
                    return;
                }
            };
            if let Some(hook) = &slot.ended_hook {
                handle.on_ended(hook.clone());
            }
            slot.binding = Binding::Ready(handle.clone());
            slot.pending.take()
        };
        if let Some(action) = drained {
            apply(&handle, action);
        }
    }

    /// Drop a slide's binding and pending command; late completions for
    /// the old binding become stale.
    pub fn invalidate(&self, index: usize) {
        let mut slides = self.slides.lock();
        if let Some(slot) = slides.get_mut(&index) {
            slot.generation += 1;
            slot.binding = Binding::Idle;
            slot.pending = None;
            slot.ended_hook = None;
        }
    }

    /// Drop every binding; used on gallery teardown.
    pub fn reset(&self) {
        self.slides.lock().clear();
    }
}

fn ready(this: &Weak<PlaybackController>, index: usize, generation: u64, handle: PlayerHandle) {
    if let Some(controller) = this.upgrade() {
        controller.binding_ready(index, generation, handle);
    }
}

fn apply(handle: &PlayerHandle, action: PlaybackAction) {
    match action {
        PlaybackAction::Play => handle.play(),
        PlaybackAction::Pause => handle.pause(),
    }
}

fn provider_name(info: &VideoInfo) -> &'static str {
    match info {
        VideoInfo::Youtube { .. } => "youtube",
        VideoInfo::Vimeo { .. } => "vimeo",
        VideoInfo::Wistia { .. } => "wistia",
        VideoInfo::Html5 => "html5",
        VideoInfo::None => "none",
    }
}

fn report(index: usize, provider: &str, err: &SdkError) {
    tracing::error!(index, provider, error = %err, "player command failed");
}
