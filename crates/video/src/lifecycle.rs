//! Slide lifecycle coordination.
//!
//! The plugin's listeners on the gallery root translate slide-transition
//! lifecycle events into playback commands: pause what the viewer is
//! leaving, build and start what they arrive at, and keep poster slides
//! inert until activated. All listeners live under the `lg.video`
//! namespace so teardown removes exactly this plugin's hooks.

use crate::gallery::{lifecycle_events, GalleryCore, HasVideoDetail, SlideDetail};
use crate::markup::{video_markup, Html5Video};
use crate::playback::{PlaybackAction, PlaybackController};
use crate::provider::{classify, VideoInfo};
use crate::scheduler::Scheduler;
use crate::sdk::ProviderRegistry;
use crate::settings::VideoSettings;
use lightbox_dom::Selection;
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;

/// Delay between a slide transition settling and autoplay kicking in.
const SETTLE_DELAY: Duration = Duration::from_millis(100);

/// Event-registration namespace owned by this plugin.
const NAMESPACE: &str = "lg.video";

fn ns(name: &str) -> String {
    format!("{}.{}", name, NAMESPACE)
}

/// The video plugin instance bound to one gallery.
pub struct VideoPlugin {
    core: Arc<dyn GalleryCore>,
    settings: VideoSettings,
    playback: Arc<PlaybackController>,
    scheduler: Arc<Scheduler>,
    /// Per-slide classification, computed once and never revisited.
    info_cache: Mutex<HashMap<usize, VideoInfo>>,
}

impl VideoPlugin {
    pub fn new(
        core: Arc<dyn GalleryCore>,
        settings: VideoSettings,
        registry: ProviderRegistry,
        scheduler: Arc<Scheduler>,
    ) -> Arc<Self> {
        let plugin = Arc::new(Self {
            core,
            settings,
            playback: Arc::new(PlaybackController::new(registry)),
            scheduler,
            info_cache: Mutex::new(HashMap::new()),
        });
        plugin.register_listeners();
        plugin
    }

    /// The memoized provider classification for a slide.
    pub fn slide_video_info(&self, index: usize) -> VideoInfo {
        if let Some(info) = self.info_cache.lock().get(&index) {
            return info.clone();
        }
        let item = self.core.item(index);
        let info = match &item {
            Some(item) => classify(Some(&item.src), item.video.is_some()),
            None => VideoInfo::None,
        };
        self.info_cache.lock().insert(index, info.clone());
        info
    }

    fn html5_config(&self, index: usize) -> Option<Html5Video> {
        let raw = self.core.item(index)?.video?;
        match serde_json::from_str(&raw) {
            Ok(config) => Some(config),
            Err(err) => {
                tracing::warn!(index, error = %err, "invalid html5 video configuration");
                None
            }
        }
    }

    fn register_listeners(self: &Arc<Self>) {
        let root = self.core.root();

        let this = Arc::downgrade(self);
        root.on(&ns(lifecycle_events::HAS_VIDEO), move |event| {
            with(&this, |plugin| plugin.on_has_video(&event.detail));
        });

        let this = Arc::downgrade(self);
        root.on(&ns(lifecycle_events::AFTER_APPEND_SLIDE), move |event| {
            with(&this, |plugin| plugin.on_after_append_slide(&event.detail));
        });

        let this = Arc::downgrade(self);
        root.on(&ns(lifecycle_events::BEFORE_SLIDE), move |event| {
            with(&this, |plugin| plugin.on_before_slide(&event.detail));
        });

        let this = Arc::downgrade(self);
        root.on(&ns(lifecycle_events::AFTER_SLIDE), move |event| {
            with(&this, |plugin| plugin.on_after_slide(&event.detail));
        });

        let gesture_aware = self.core.css_transitions_enabled()
            && self.core.item_count() > 1
            && (self.core.swipe_enabled() || self.core.drag_enabled());
        if gesture_aware {
            let this = Arc::downgrade(self);
            root.on(&ns(lifecycle_events::SLIDE_CLICK), move |_| {
                with(&this, |plugin| {
                    let index = plugin.core.current_index();
                    plugin.load_video_on_poster_click(&plugin.core.slide_item(index), index);
                });
            });
        } else {
            let this = Arc::downgrade(self);
            self.core
                .outer()
                .find(".lg-item")
                .first()
                .on(&ns("click"), move |_| {
                    with(&this, |plugin| {
                        let index = plugin.core.current_index();
                        plugin.load_video_on_poster_click(&plugin.core.slide_item(index), index);
                    });
                });
        }
    }

    fn on_has_video(self: &Arc<Self>, detail: &Value) {
        let detail: HasVideoDetail = match serde_json::from_value(detail.clone()) {
            Ok(detail) => detail,
            Err(err) => {
                tracing::warn!(error = %err, "malformed hasVideo payload");
                return;
            }
        };
        let slide = self.core.slide_item(detail.index);

        if !detail.has_poster {
            // Poster-less media goes straight into the slide.
            self.append_videos(&slide, detail.index, "lg-object");
            self.watch_ended(&slide, detail.index);
        }

        if self.settings.autoplay_first_video && !self.core.is_open() {
            if detail.has_poster {
                self.load_video_on_poster_click(&slide, detail.index);
            } else {
                self.play_video(detail.index);
            }
        }
    }

    fn on_after_append_slide(self: &Arc<Self>, detail: &Value) {
        let index = match detail.get("index").and_then(Value::as_u64) {
            Some(index) => index as usize,
            None => return,
        };
        let video_cont = self.core.slide_item(index).find(".lg-video-cont").first();
        if !video_cont.has_class("lg-has-iframe") {
            video_cont.css("max-width", &self.settings.video_max_width);
        }
    }

    fn on_before_slide(self: &Arc<Self>, detail: &Value) {
        let detail: SlideDetail = match serde_json::from_value(detail.clone()) {
            Ok(detail) => detail,
            Err(_) => return,
        };

        if self.core.is_open() {
            self.control_video(detail.prev_index, PlaybackAction::Pause);
        }

        // The download affordance only makes sense for slides the viewer
        // could save; iframe embeds hide it, everything else restores it.
        let outer = self.core.outer();
        if self.slide_video_info(detail.index).is_iframe() {
            outer.add_class("lg-hide-download");
        } else {
            outer.remove_class("lg-hide-download");
        }
    }

    fn on_after_slide(self: &Arc<Self>, detail: &Value) {
        let detail: SlideDetail = match serde_json::from_value(detail.clone()) {
            Ok(detail) => detail,
            Err(_) => return,
        };
        self.core
            .slide_item(detail.prev_index)
            .remove_class("lg-video-playing");

        if self.settings.autoplay_video_on_slide && self.core.is_open() {
            let this = Arc::downgrade(self);
            let index = detail.index;
            self.scheduler.defer(
                SETTLE_DELAY,
                Box::new(move || {
                    with(&this, |plugin| {
                        let slide = plugin.core.slide_item(index);
                        if slide.find(".lg-object").first().has_class("lg-has-poster") {
                            plugin.load_video_on_poster_click(&slide, index);
                        } else {
                            plugin.play_video(index);
                        }
                    });
                }),
            );
        }
    }

    /// Activate a poster slide, or resume it when already activated.
    ///
    /// The first activation builds the embed, starts playback, and moves
    /// the poster behind the player; the guard on `lg-has-video` makes the
    /// build run at most once per slide.
    pub fn load_video_on_poster_click(self: &Arc<Self>, slide: &Selection, index: usize) {
        let video_element = slide.find(".lg-object").first();
        let poster_visible = video_element.has_class("lg-has-poster")
            && video_element.style("display") != "none";
        if !poster_visible {
            return;
        }

        if !slide.has_class("lg-has-video") {
            slide.add_class("lg-video-playing lg-has-video");
            self.append_videos(slide, index, "");
            self.watch_ended(slide, index);
            self.play_video(index);

            // The poster stays in the tree, stacked behind the player.
            slide.find(".lg-video").first().append_node(&video_element);

            if self.slide_video_info(index).is_iframe() {
                slide.remove_class("lg-complete");
                let embed = slide.find(".lg-video-object").first();
                let slide = slide.clone();
                embed.on(&format!("{} {}", ns("load"), ns("error")), move |_| {
                    slide.add_class("lg-complete");
                });
            }
        } else {
            self.play_video(index);
            slide.add_class("lg-video-playing");
        }
    }

    /// Build the slide's embed markup and insert it into the video
    /// container, announcing the insertion on the gallery root.
    fn append_videos(&self, slide: &Selection, index: usize, add_class: &str) {
        let info = self.slide_video_info(index);
        let item = self.core.item(index);
        let title = item.as_ref().and_then(|i| i.alt.clone().or_else(|| i.title.clone()));
        let html5 = self.html5_config(index);

        let markup = match video_markup(
            &info,
            &self.settings,
            title.as_deref(),
            add_class,
            index,
            html5.as_ref(),
        ) {
            Some(markup) => markup,
            None => return,
        };
        slide.find(".lg-video").first().append(&markup);

        self.core.root().trigger(
            lifecycle_events::APPEND_VIDEO,
            json!({
                "index": index,
                "src": item.map(|i| i.src).unwrap_or_default(),
            }),
        );
    }

    /// Arrange slide advancement when the slide's video finishes.
    fn watch_ended(self: &Arc<Self>, slide: &Selection, index: usize) {
        if !self.settings.goto_next_slide_on_video_end {
            return;
        }
        let this = Arc::downgrade(self);
        let advance = move || {
            with(&this, |plugin| {
                // Background slides finishing must not steal navigation.
                if plugin.core.current_index() == index {
                    plugin.core.go_to_next_slide();
                }
            });
        };

        let info = self.slide_video_info(index);
        if info == VideoInfo::Html5 {
            slide
                .find(".lg-video-object")
                .first()
                .on(&ns("ended"), move |_| advance());
        } else if info.is_iframe() {
            self.playback.set_ended_hook(index, Arc::new(advance));
        }
    }

    /// Issue a play command against a slide.
    pub fn play_video(self: &Arc<Self>, index: usize) {
        self.control_video(index, PlaybackAction::Play);
    }

    fn control_video(self: &Arc<Self>, index: usize, action: PlaybackAction) {
        let info = self.slide_video_info(index);
        if !info.is_video() {
            return;
        }
        let slide = self.core.slide_item(index);
        self.playback
            .control(&slide, index, &info, action, &self.settings);
    }

    /// Detach every listener and player binding this plugin owns.
    pub fn destroy(&self) {
        self.core.root().document().off_namespace(NAMESPACE);
        self.playback.reset();
    }
}

fn with(plugin: &Weak<VideoPlugin>, f: impl FnOnce(&Arc<VideoPlugin>)) {
    if let Some(plugin) = plugin.upgrade() {
        f(&plugin);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gallery::GalleryItem;
    use crate::sdk::{PlayerControl, PlayerHandle, ReadyCallback, SdkError, YoutubeSdk};
    use lightbox_dom::{Document, Markup};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    struct MockGallery {
        root: Selection,
        outer: Selection,
        items: Vec<GalleryItem>,
        slides: Vec<Selection>,
        index: AtomicUsize,
        open: AtomicBool,
        advances: AtomicUsize,
        gestures: bool,
    }

    impl MockGallery {
        /// Build a document with one `.lg-item > .lg-video-cont > .lg-video`
        /// container per item; `poster` items also carry a poster image.
        fn new(items: Vec<(GalleryItem, bool)>) -> Arc<Self> {
            let doc = Document::new();
            let root = doc.append_markup(&Markup::new("div").class("lg-container"));
            let outer = doc.append_markup(&Markup::new("div").class("lg-outer"));

            let mut slides = Vec::new();
            let mut gallery_items = Vec::new();
            for (item, poster) in items {
                let mut markup = Markup::new("div").class("lg-item").child(
                    Markup::new("div")
                        .class("lg-video-cont")
                        .child(Markup::new("div").class("lg-video")),
                );
                if poster {
                    markup = markup.child(
                        Markup::new("img")
                            .class("lg-object lg-has-poster")
                            .attr("src", "poster.jpg"),
                    );
                }
                outer.append(&markup);
                slides.push(outer.find(".lg-item").eq(slides.len()));
                gallery_items.push(item);
            }

            Arc::new(Self {
                root,
                outer,
                items: gallery_items,
                slides,
                index: AtomicUsize::new(0),
                open: AtomicBool::new(false),
                advances: AtomicUsize::new(0),
                gestures: true,
            })
        }

        fn fire_has_video(&self, index: usize) {
            let item = &self.items[index];
            let has_poster = self.slides[index]
                .find(".lg-object")
                .first()
                .has_class("lg-has-poster");
            let html5: Option<Value> = item
                .video
                .as_ref()
                .and_then(|raw| serde_json::from_str(raw).ok());
            self.root.trigger(
                lifecycle_events::HAS_VIDEO,
                json!({
                    "index": index,
                    "src": item.src,
                    "html5Video": html5,
                    "hasPoster": has_poster,
                }),
            );
        }

        fn fire_slide_change(&self, from: usize, to: usize) {
            let detail = json!({ "index": to, "prevIndex": from });
            self.root.trigger(lifecycle_events::BEFORE_SLIDE, detail.clone());
            self.index.store(to, Ordering::SeqCst);
            self.root.trigger(lifecycle_events::AFTER_SLIDE, detail);
        }
    }

    impl GalleryCore for MockGallery {
        fn root(&self) -> Selection {
            self.root.clone()
        }
        fn outer(&self) -> Selection {
            self.outer.clone()
        }
        fn slide_item(&self, index: usize) -> Selection {
            self.slides
                .get(index)
                .cloned()
                .unwrap_or_else(|| self.root.find(".nothing"))
        }
        fn current_index(&self) -> usize {
            self.index.load(Ordering::SeqCst)
        }
        fn item(&self, index: usize) -> Option<GalleryItem> {
            self.items.get(index).cloned()
        }
        fn item_count(&self) -> usize {
            self.items.len()
        }
        fn go_to_next_slide(&self) {
            self.advances.fetch_add(1, Ordering::SeqCst);
            let next = (self.current_index() + 1) % self.items.len().max(1);
            self.index.store(next, Ordering::SeqCst);
        }
        fn css_transitions_enabled(&self) -> bool {
            self.gestures
        }
        fn swipe_enabled(&self) -> bool {
            self.gestures
        }
        fn drag_enabled(&self) -> bool {
            false
        }
        fn is_open(&self) -> bool {
            self.open.load(Ordering::SeqCst)
        }
    }

    #[derive(Default)]
    struct MockPlayer {
        plays: AtomicUsize,
        pauses: AtomicUsize,
        ended: Mutex<Option<crate::sdk::EndedCallback>>,
    }

    impl MockPlayer {
        fn finish(&self) {
            if let Some(hook) = self.ended.lock().clone() {
                hook();
            }
        }
    }

    impl PlayerControl for MockPlayer {
        fn play(&self) {
            self.plays.fetch_add(1, Ordering::SeqCst);
        }
        fn pause(&self) {
            self.pauses.fetch_add(1, Ordering::SeqCst);
        }
        fn on_ended(&self, callback: crate::sdk::EndedCallback) {
            *self.ended.lock() = Some(callback);
        }
    }

    /// YouTube SDK that hands players back immediately.
    #[derive(Default)]
    struct InstantYoutube {
        creations: AtomicUsize,
        player: Mutex<Option<Arc<MockPlayer>>>,
    }

    impl YoutubeSdk for InstantYoutube {
        fn create_player(&self, _iframe_id: &str, on_ready: ReadyCallback) -> Result<(), SdkError> {
            self.creations.fetch_add(1, Ordering::SeqCst);
            let player = Arc::new(MockPlayer::default());
            *self.player.lock() = Some(player.clone());
            let handle: PlayerHandle = player;
            on_ready(handle);
            Ok(())
        }
    }

    fn html5_item() -> GalleryItem {
        GalleryItem {
            src: String::new(),
            video: Some(
                json!({
                    "source": [{ "src": "movie.mp4", "type": "video/mp4" }],
                    "controls": true
                })
                .to_string(),
            ),
            title: None,
            alt: None,
        }
    }

    fn youtube_item() -> GalleryItem {
        GalleryItem {
            src: "https://youtu.be/EIUJfXk3_3w".into(),
            video: None,
            title: Some("Puffin".into()),
            alt: None,
        }
    }

    fn build(
        gallery: &Arc<MockGallery>,
        settings: VideoSettings,
        registry: ProviderRegistry,
    ) -> (Arc<VideoPlugin>, Arc<Scheduler>) {
        let scheduler = Arc::new(Scheduler::new());
        let gallery: Arc<dyn GalleryCore> = gallery.clone();
        let plugin = VideoPlugin::new(gallery, settings, registry, scheduler.clone());
        (plugin, scheduler)
    }

    #[test]
    fn test_html5_without_poster_appends_and_autoplays() {
        let gallery = MockGallery::new(vec![(html5_item(), false)]);
        let (_plugin, _scheduler) =
            build(&gallery, VideoSettings::default(), ProviderRegistry::default());

        gallery.fire_has_video(0);

        let slide = gallery.slide_item(0);
        assert_eq!(slide.find(".lg-html5").len(), 1);
        assert_eq!(slide.find("iframe").len(), 0);
        assert!(!slide.find(".lg-html5").media_paused());
        assert!(slide.find(".lg-html5").has_class("lg-object"));
    }

    #[test]
    fn test_autoplay_first_video_disabled() {
        let gallery = MockGallery::new(vec![(html5_item(), false)]);
        let settings = VideoSettings {
            autoplay_first_video: false,
            ..VideoSettings::default()
        };
        let (_plugin, _scheduler) = build(&gallery, settings, ProviderRegistry::default());

        gallery.fire_has_video(0);

        let slide = gallery.slide_item(0);
        assert_eq!(slide.find(".lg-html5").len(), 1);
        assert!(slide.find(".lg-html5").media_paused());
    }

    #[test]
    fn test_poster_click_builds_youtube_embed_once() {
        let sdk = Arc::new(InstantYoutube::default());
        let gallery = MockGallery::new(vec![(youtube_item(), true), (html5_item(), false)]);
        gallery.open.store(true, Ordering::SeqCst);
        let registry = ProviderRegistry {
            youtube: Some(sdk.clone()),
            ..Default::default()
        };
        let (_plugin, _scheduler) = build(&gallery, VideoSettings::default(), registry);

        gallery.root.trigger(lifecycle_events::SLIDE_CLICK, Value::Null);

        let slide = gallery.slide_item(0);
        assert!(slide.has_class("lg-has-video"));
        assert!(slide.has_class("lg-video-playing"));
        assert_eq!(slide.find("iframe").len(), 1);
        assert_eq!(slide.find("iframe").attr("id"), "lg-youtube0");
        assert_eq!(sdk.creations.load(Ordering::SeqCst), 1);

        let player = sdk.player.lock().clone().unwrap();
        assert_eq!(player.plays.load(Ordering::SeqCst), 1);

        // The poster moved behind the player.
        let poster = slide.find(".lg-object").first();
        assert_eq!(
            poster.parent().get(),
            slide.find(".lg-video").first().get()
        );

        // A second activation resumes, without rebuilding.
        gallery.root.trigger(lifecycle_events::SLIDE_CLICK, Value::Null);
        assert_eq!(slide.find("iframe").len(), 1);
        assert_eq!(sdk.creations.load(Ordering::SeqCst), 1);
        assert_eq!(player.plays.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_before_slide_pauses_previous_and_toggles_download() {
        let sdk = Arc::new(InstantYoutube::default());
        let gallery = MockGallery::new(vec![(youtube_item(), true), (html5_item(), false)]);
        gallery.open.store(true, Ordering::SeqCst);
        let registry = ProviderRegistry {
            youtube: Some(sdk.clone()),
            ..Default::default()
        };
        let (_plugin, _scheduler) = build(&gallery, VideoSettings::default(), registry);

        gallery.root.trigger(lifecycle_events::SLIDE_CLICK, Value::Null);
        let player = sdk.player.lock().clone().unwrap();

        // Entering the iframe slide hides the download affordance.
        gallery.fire_slide_change(1, 0);
        assert!(gallery.outer.has_class("lg-hide-download"));

        // Leaving it pauses the player and restores the affordance.
        gallery.fire_slide_change(0, 1);
        assert_eq!(player.pauses.load(Ordering::SeqCst), 1);
        assert!(!gallery.outer.has_class("lg-hide-download"));
    }

    #[test]
    fn test_after_slide_autoplays_after_settle_delay() {
        let gallery = MockGallery::new(vec![(youtube_item(), true), (html5_item(), false)]);
        gallery.open.store(true, Ordering::SeqCst);
        let settings = VideoSettings {
            autoplay_video_on_slide: true,
            autoplay_first_video: false,
            ..VideoSettings::default()
        };
        let (_plugin, scheduler) = build(&gallery, settings, ProviderRegistry::default());

        gallery.fire_has_video(1);
        let slide = gallery.slide_item(1);
        assert!(slide.find(".lg-html5").media_paused());

        gallery.fire_slide_change(0, 1);
        // Playback waits out the transition settle delay.
        assert!(slide.find(".lg-html5").media_paused());
        scheduler.advance(SETTLE_DELAY);
        assert!(!slide.find(".lg-html5").media_paused());
    }

    #[test]
    fn test_after_slide_clears_playing_marker_on_previous() {
        let gallery = MockGallery::new(vec![(youtube_item(), true), (html5_item(), false)]);
        gallery.open.store(true, Ordering::SeqCst);
        let (_plugin, _scheduler) =
            build(&gallery, VideoSettings::default(), ProviderRegistry::default());

        gallery.slide_item(0).add_class("lg-video-playing");
        gallery.fire_slide_change(0, 1);
        assert!(!gallery.slide_item(0).has_class("lg-video-playing"));
    }

    #[test]
    fn test_after_append_slide_sets_max_width() {
        let gallery = MockGallery::new(vec![(html5_item(), false), (youtube_item(), false)]);
        let (_plugin, _scheduler) =
            build(&gallery, VideoSettings::default(), ProviderRegistry::default());

        gallery
            .root
            .trigger(lifecycle_events::AFTER_APPEND_SLIDE, json!({ "index": 0 }));
        let cont = gallery.slide_item(0).find(".lg-video-cont").first();
        assert_eq!(cont.style("max-width"), "855px");

        // Iframe containers size themselves.
        gallery
            .slide_item(1)
            .find(".lg-video-cont")
            .add_class("lg-has-iframe");
        gallery
            .root
            .trigger(lifecycle_events::AFTER_APPEND_SLIDE, json!({ "index": 1 }));
        let cont = gallery.slide_item(1).find(".lg-video-cont").first();
        assert_eq!(cont.style("max-width"), "");
    }

    #[test]
    fn test_html5_ended_advances_current_slide_only() {
        let gallery = MockGallery::new(vec![(html5_item(), false), (youtube_item(), true)]);
        let (_plugin, _scheduler) =
            build(&gallery, VideoSettings::default(), ProviderRegistry::default());

        gallery.fire_has_video(0);
        let video = gallery.slide_item(0).find(".lg-video-object").first();
        let doc = gallery.root.document().clone();

        doc.finish_media(video.get().unwrap());
        assert_eq!(gallery.advances.load(Ordering::SeqCst), 1);

        // Now on slide 1; the background video finishing must not navigate.
        video.media_play();
        doc.finish_media(video.get().unwrap());
        assert_eq!(gallery.advances.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_iframe_ended_advances_slide() {
        let sdk = Arc::new(InstantYoutube::default());
        let gallery = MockGallery::new(vec![(youtube_item(), true), (html5_item(), false)]);
        gallery.open.store(true, Ordering::SeqCst);
        let registry = ProviderRegistry {
            youtube: Some(sdk.clone()),
            ..Default::default()
        };
        let (_plugin, _scheduler) = build(&gallery, VideoSettings::default(), registry);

        gallery.root.trigger(lifecycle_events::SLIDE_CLICK, Value::Null);
        let player = sdk.player.lock().clone().unwrap();

        player.finish();
        assert_eq!(gallery.advances.load(Ordering::SeqCst), 1);
        assert_eq!(gallery.current_index(), 1);
    }

    #[test]
    fn test_missing_sdk_keeps_gallery_navigable() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("lightbox_video=debug")
            .try_init();
        let gallery = MockGallery::new(vec![(youtube_item(), true), (html5_item(), false)]);
        gallery.open.store(true, Ordering::SeqCst);
        let (_plugin, _scheduler) =
            build(&gallery, VideoSettings::default(), ProviderRegistry::default());

        // Activation builds the embed; the play command fails quietly.
        gallery.root.trigger(lifecycle_events::SLIDE_CLICK, Value::Null);
        assert_eq!(gallery.slide_item(0).find("iframe").len(), 1);

        gallery.fire_slide_change(0, 1);
        gallery.fire_slide_change(1, 0);
        assert_eq!(gallery.current_index(), 0);
    }

    #[test]
    fn test_poster_click_without_poster_is_inert() {
        let gallery = MockGallery::new(vec![(youtube_item(), false), (html5_item(), false)]);
        gallery.open.store(true, Ordering::SeqCst);
        let (plugin, _scheduler) =
            build(&gallery, VideoSettings::default(), ProviderRegistry::default());

        plugin.load_video_on_poster_click(&gallery.slide_item(0), 0);
        assert!(!gallery.slide_item(0).has_class("lg-has-video"));
        assert_eq!(gallery.slide_item(0).find("iframe").len(), 0);
    }

    #[test]
    fn test_destroy_removes_listeners() {
        let gallery = MockGallery::new(vec![(youtube_item(), true), (html5_item(), false)]);
        gallery.open.store(true, Ordering::SeqCst);
        let (plugin, _scheduler) =
            build(&gallery, VideoSettings::default(), ProviderRegistry::default());

        plugin.destroy();

        gallery.root.trigger(lifecycle_events::SLIDE_CLICK, Value::Null);
        assert!(!gallery.slide_item(0).has_class("lg-has-video"));

        gallery.fire_slide_change(1, 0);
        assert!(!gallery.outer.has_class("lg-hide-download"));
    }

    #[test]
    fn test_classification_is_memoized() {
        let gallery = MockGallery::new(vec![(youtube_item(), true)]);
        let (plugin, _scheduler) =
            build(&gallery, VideoSettings::default(), ProviderRegistry::default());

        let first = plugin.slide_video_info(0);
        let second = plugin.slide_video_info(0);
        assert_eq!(first, second);
        assert!(matches!(first, VideoInfo::Youtube { .. }));
        assert!(matches!(plugin.slide_video_info(99), VideoInfo::None));
    }
}
