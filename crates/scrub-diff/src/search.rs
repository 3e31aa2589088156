//! Next/previous-difference search.
//!
//! Starting from an anchor frame, frames are decoded one at a time in the
//! requested direction and compared against the anchor picture. The scan
//! stops at the first frame that differs, at the end of the range, at the
//! first frame that fails to decode, or when cancelled.
//!
//! The loop runs synchronously on the caller's thread. A [`ScanCancel`]
//! handle is polled once per frame for callers that need to abort long
//! scans.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use scrub_core::{FrameIndex, FrameSource, PixelBuffer, Playback, Result};
use tracing::{debug, info, warn};

use crate::engine::DiffEngine;

/// Scan direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Why a scan stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanStop {
    /// A differing frame was found.
    Found,
    /// The whole range matched the anchor.
    Exhausted,
    /// A frame failed to decode; the scan ends there.
    DecodeMiss,
    /// The cancel handle was triggered.
    Cancelled,
    /// The anchor frame itself could not be decoded.
    NoAnchor,
    /// Nothing to scan (backwards from frame 0, or an anchor past the end).
    NoOp,
}

/// Result of a search: where the scan ended and, if a difference was
/// found, the highlight of the changed pixels.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub frame: FrameIndex,
    pub highlight: Option<PixelBuffer>,
    pub stop: ScanStop,
}

impl SearchHit {
    fn stopped(frame: FrameIndex, stop: ScanStop) -> Self {
        Self {
            frame,
            highlight: None,
            stop,
        }
    }

    pub fn found(&self) -> bool {
        self.stop == ScanStop::Found
    }

    /// Whether a scan actually ran (as opposed to an early no-op).
    pub fn scanned(&self) -> bool {
        !matches!(self.stop, ScanStop::NoAnchor | ScanStop::NoOp)
    }
}

/// Handle for cancelling an in-progress scan.
#[derive(Debug, Clone)]
pub struct ScanCancel(Arc<AtomicBool>);

impl ScanCancel {
    /// Create a new cancel handle.
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    /// Signal cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Clear a previous cancellation so the handle can be reused.
    pub fn reset(&self) {
        self.0.store(false, Ordering::Relaxed);
    }

    /// Check if cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

impl Default for ScanCancel {
    fn default() -> Self {
        Self::new()
    }
}

/// Sequential difference search over a [`FrameSource`].
#[derive(Debug, Clone, Default)]
pub struct DiffSearch {
    engine: DiffEngine,
    cancel: Option<ScanCancel>,
}

impl DiffSearch {
    pub fn new(engine: DiffEngine) -> Self {
        Self {
            engine,
            cancel: None,
        }
    }

    /// Poll `cancel` once per scanned frame.
    pub fn with_cancel(mut self, cancel: ScanCancel) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn engine(&self) -> &DiffEngine {
        &self.engine
    }

    /// Find the nearest frame after `anchor` whose picture differs, then
    /// pause playback.
    pub fn find_next<S, P>(
        &self,
        source: &mut S,
        playback: &mut P,
        anchor: FrameIndex,
    ) -> Result<SearchHit>
    where
        S: FrameSource + ?Sized,
        P: Playback + ?Sized,
    {
        let hit = self.scan(source, anchor, Direction::Forward)?;
        Self::pause_after(playback, &hit);
        Ok(hit)
    }

    /// Find the nearest frame before `anchor` whose picture differs, then
    /// pause playback.
    pub fn find_previous<S, P>(
        &self,
        source: &mut S,
        playback: &mut P,
        anchor: FrameIndex,
    ) -> Result<SearchHit>
    where
        S: FrameSource + ?Sized,
        P: Playback + ?Sized,
    {
        let hit = self.scan(source, anchor, Direction::Backward)?;
        Self::pause_after(playback, &hit);
        Ok(hit)
    }

    /// Run the scan without touching playback.
    ///
    /// The only error is a shape mismatch between the anchor and a
    /// candidate frame.
    pub fn scan<S>(
        &self,
        source: &mut S,
        anchor: FrameIndex,
        direction: Direction,
    ) -> Result<SearchHit>
    where
        S: FrameSource + ?Sized,
    {
        let hit = match direction {
            Direction::Forward => self.scan_forward(source, anchor)?,
            Direction::Backward => self.scan_backward(source, anchor)?,
        };
        info!(
            anchor,
            frame = hit.frame,
            stop = ?hit.stop,
            ?direction,
            "Difference search finished"
        );
        Ok(hit)
    }

    fn scan_forward<S>(&self, source: &mut S, anchor: FrameIndex) -> Result<SearchHit>
    where
        S: FrameSource + ?Sized,
    {
        let last = source.frame_count().max(1) - 1;
        if anchor > last {
            debug!(anchor, last, "Anchor past the last frame");
            return Ok(SearchHit::stopped(anchor, ScanStop::NoOp));
        }
        let Some(reference) = source.get_frame(anchor) else {
            debug!(anchor, "Anchor frame unavailable");
            return Ok(SearchHit::stopped(anchor, ScanStop::NoAnchor));
        };

        let mut scanned = anchor;
        for frame in (anchor..last).map(|f| f + 1) {
            if let Some(hit) = self.step(source, &reference, frame, scanned)? {
                return Ok(hit);
            }
            scanned = frame;
        }
        Ok(SearchHit::stopped(last, ScanStop::Exhausted))
    }

    fn scan_backward<S>(&self, source: &mut S, anchor: FrameIndex) -> Result<SearchHit>
    where
        S: FrameSource + ?Sized,
    {
        if anchor == 0 {
            return Ok(SearchHit::stopped(0, ScanStop::NoOp));
        }
        // A decode gap exactly at the anchor: start one frame earlier.
        let (start, reference) = match source.get_frame(anchor) {
            Some(buffer) => (anchor, buffer),
            None => match source.get_frame(anchor - 1) {
                Some(buffer) => (anchor - 1, buffer),
                None => {
                    debug!(anchor, "Anchor frame and its predecessor unavailable");
                    return Ok(SearchHit::stopped(anchor, ScanStop::NoAnchor));
                }
            },
        };

        let mut scanned = start;
        for frame in (0..start).rev() {
            if let Some(hit) = self.step(source, &reference, frame, scanned)? {
                return Ok(hit);
            }
            scanned = frame;
        }
        Ok(SearchHit::stopped(0, ScanStop::Exhausted))
    }

    /// Examine one candidate frame. `Some` ends the scan.
    ///
    /// The candidate buffer is dropped before returning on every path.
    fn step<S>(
        &self,
        source: &mut S,
        reference: &PixelBuffer,
        frame: FrameIndex,
        scanned: FrameIndex,
    ) -> Result<Option<SearchHit>>
    where
        S: FrameSource + ?Sized,
    {
        if self.cancel.as_ref().is_some_and(ScanCancel::is_cancelled) {
            debug!(frame = scanned, "Difference search cancelled");
            return Ok(Some(SearchHit::stopped(scanned, ScanStop::Cancelled)));
        }
        let Some(candidate) = source.get_frame(frame) else {
            warn!(frame, "Frame failed to decode, ending difference search");
            return Ok(Some(SearchHit::stopped(scanned, ScanStop::DecodeMiss)));
        };
        if !self.engine.differs(reference, &candidate)? {
            return Ok(None);
        }
        let highlight = self.engine.highlight(reference, &candidate)?;
        Ok(Some(SearchHit {
            frame,
            highlight: Some(highlight),
            stop: ScanStop::Found,
        }))
    }

    fn pause_after<P: Playback + ?Sized>(playback: &mut P, hit: &SearchHit) {
        if hit.scanned() && playback.is_playing() {
            debug!("Pausing playback after difference search");
            playback.pause();
        }
    }
}
