//! A transport that only moves when told to.
//!
//! Used by the headless CLI and by tests; a real media backend implements
//! [`Playback`] directly.

use scrub_core::{MediaTime, Playback};
use tracing::debug;

/// Transport state without a clock of its own.
#[derive(Debug, Clone, Default)]
pub struct ManualPlayback {
    position: MediaTime,
    playing: bool,
}

impl ManualPlayback {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Playback for ManualPlayback {
    fn is_playing(&self) -> bool {
        self.playing
    }

    fn play(&mut self) {
        self.playing = true;
        debug!(position = %self.position, "Playback started");
    }

    fn pause(&mut self) {
        self.playing = false;
        debug!(position = %self.position, "Playback paused");
    }

    fn position(&self) -> MediaTime {
        self.position
    }

    fn seek(&mut self, time: MediaTime) {
        self.position = if time.is_negative() { MediaTime::ZERO } else { time };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_play_pause_keeps_position() {
        let mut transport = ManualPlayback::new();
        transport.seek(MediaTime::new(5, 2));
        transport.play();
        assert!(transport.is_playing());
        transport.pause();
        assert!(!transport.is_playing());
        assert_eq!(transport.position(), MediaTime::new(5, 2));
    }

    #[test]
    fn test_seek_clamps_negative() {
        let mut transport = ManualPlayback::new();
        transport.seek(MediaTime::new(-3, 1));
        assert_eq!(transport.position(), MediaTime::ZERO);
    }
}
