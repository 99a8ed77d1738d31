//! Native media element state.
//!
//! `<video>` elements carry a small playback state so HTML5 control is
//! synchronous, unlike the iframe providers which go through their SDKs.

/// Playback state of a native media element.
#[derive(Clone, Copy, Debug)]
pub struct MediaState {
    /// Paused flag; a freshly created element starts paused.
    pub paused: bool,
    /// Set once playback has reached the end of the source.
    pub ended: bool,
}

impl Default for MediaState {
    fn default() -> Self {
        Self {
            paused: true,
            ended: false,
        }
    }
}

impl MediaState {
    pub fn play(&mut self) {
        self.paused = false;
        self.ended = false;
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Mark playback complete. The element stays paused afterwards.
    pub fn finish(&mut self) {
        self.paused = true;
        self.ended = true;
    }
}
