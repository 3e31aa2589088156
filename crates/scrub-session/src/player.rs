//! The player session: one open video plus everything the user does to it.

use scrub_bookmarks::{BookmarkRegistry, BookmarkRow, EditTrigger};
use scrub_core::{
    FrameClock, FrameIndex, FrameRate, FrameSource, MediaTime, PixelBuffer, Playback, Result,
};
use scrub_diff::{DiffEngine, DiffSearch, Direction, ScanCancel, SearchHit};
use tracing::{debug, info};

use crate::config::PlayerConfig;

/// Step size of a skip command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipSpeed {
    /// One frame.
    Small,
    /// `medium_increment` frames.
    Medium,
    /// `large_increment` frames.
    Large,
}

struct OpenMedia<S, P> {
    source: S,
    playback: P,
    clock: FrameClock,
    duration: Option<MediaTime>,
}

/// Caps the frame count a search sees at the player's frame count.
struct Bounded<'a, S: ?Sized> {
    inner: &'a mut S,
    count: FrameIndex,
}

impl<S: FrameSource + ?Sized> FrameSource for Bounded<'_, S> {
    fn frame_count(&self) -> FrameIndex {
        self.count
    }

    fn get_frame(&mut self, index: FrameIndex) -> Option<PixelBuffer> {
        if index >= self.count {
            return None;
        }
        self.inner.get_frame(index)
    }
}

/// Player state for a single video.
///
/// The bookmark registry lives as long as the player and is reset, not
/// recreated, when another video is opened.
pub struct Player<S, P> {
    config: PlayerConfig,
    search: DiffSearch,
    bookmarks: BookmarkRegistry,
    media: Option<OpenMedia<S, P>>,
    highlight: Option<PixelBuffer>,
    selected_bookmark: Option<usize>,
}

impl<S: FrameSource, P: Playback> Player<S, P> {
    pub fn new(config: PlayerConfig) -> Self {
        let search = DiffSearch::new(DiffEngine::with_marker(config.highlight_color));
        Self {
            config,
            search,
            bookmarks: BookmarkRegistry::new(),
            media: None,
            highlight: None,
            selected_bookmark: None,
        }
    }

    /// Let `cancel` abort difference searches from another thread.
    pub fn with_cancel(mut self, cancel: ScanCancel) -> Self {
        self.search = self.search.with_cancel(cancel);
        self
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    // ── Media ───────────────────────────────────────────────────

    /// Open a video. `duration` is the media length when known.
    pub fn open(
        &mut self,
        source: S,
        playback: P,
        rate: FrameRate,
        duration: Option<MediaTime>,
    ) {
        self.bookmarks.clear();
        self.highlight = None;
        self.selected_bookmark = None;
        info!(frames = source.frame_count(), %rate, "Opened video");
        self.media = Some(OpenMedia {
            source,
            playback,
            clock: FrameClock::new(rate),
            duration,
        });
        if self.config.auto_play {
            self.play();
        }
    }

    /// Close the current video, handing back its source and transport.
    pub fn close(&mut self) -> Option<(S, P)> {
        self.highlight = None;
        self.selected_bookmark = None;
        let media = self.media.take()?;
        info!("Closed video");
        Some((media.source, media.playback))
    }

    pub fn is_open(&self) -> bool {
        self.media.is_some()
    }

    /// Clock of the open video; 1 fps when nothing is open.
    pub fn clock(&self) -> FrameClock {
        self.media
            .as_ref()
            .map_or_else(|| FrameClock::new(FrameRate::ONE), |m| m.clock)
    }

    pub fn source(&self) -> Option<&S> {
        self.media.as_ref().map(|m| &m.source)
    }

    pub fn playback(&self) -> Option<&P> {
        self.media.as_ref().map(|m| &m.playback)
    }

    pub fn playback_mut(&mut self) -> Option<&mut P> {
        self.media.as_mut().map(|m| &mut m.playback)
    }

    /// Frames addressable in the open video, never less than 1.
    pub fn frame_count(&self) -> FrameIndex {
        let Some(media) = &self.media else {
            return 1;
        };
        let count = media.source.frame_count();
        let count = match media.duration {
            Some(_) => count.min(media.clock.frame_duration(media.duration)),
            None => count,
        };
        count.max(1)
    }

    pub fn last_frame(&self) -> FrameIndex {
        self.frame_count() - 1
    }

    pub fn current_frame(&self) -> FrameIndex {
        self.media
            .as_ref()
            .map_or(0, |m| m.clock.time_to_frame(m.playback.position()))
    }

    /// Seek to `frame`, clamped into range. Drops the highlight and the
    /// bookmark selection.
    pub fn seek_frame(&mut self, frame: FrameIndex) {
        let target = frame.min(self.last_frame());
        self.invalidate();
        if let Some(media) = self.media.as_mut() {
            let time = media.clock.frame_to_time(target);
            media.playback.seek(time);
            debug!(frame = target, %time, "Seek");
        }
    }

    fn invalidate(&mut self) {
        self.highlight = None;
        self.selected_bookmark = None;
    }

    // ── Transport ───────────────────────────────────────────────

    pub fn is_playing(&self) -> bool {
        self.media.as_ref().is_some_and(|m| m.playback.is_playing())
    }

    pub fn play(&mut self) {
        self.invalidate();
        if let Some(media) = self.media.as_mut() {
            media.playback.play();
        }
    }

    pub fn pause(&mut self) {
        if let Some(media) = self.media.as_mut() {
            media.playback.pause();
        }
    }

    pub fn toggle_play(&mut self) {
        if self.is_playing() {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Pause and rewind to the first frame.
    pub fn stop(&mut self) {
        self.pause();
        self.seek_frame(0);
    }

    /// Rewind to the first frame and play.
    pub fn restart(&mut self) {
        self.seek_frame(0);
        self.play();
    }

    /// Jump to the last frame and pause.
    pub fn end(&mut self) {
        self.seek_frame(self.last_frame());
        self.pause();
    }

    fn increment(&self, speed: SkipSpeed) -> FrameIndex {
        match speed {
            SkipSpeed::Small => 1,
            SkipSpeed::Medium => self.config.medium_increment,
            SkipSpeed::Large => self.config.large_increment,
        }
    }

    pub fn skip_back(&mut self, speed: SkipSpeed) {
        let target = self.current_frame().saturating_sub(self.increment(speed));
        self.seek_frame(target);
    }

    pub fn skip_forward(&mut self, speed: SkipSpeed) {
        let target = self.current_frame().saturating_add(self.increment(speed));
        self.seek_frame(target);
    }

    // ── Difference search ───────────────────────────────────────

    /// Search forward from the current frame and seek to where the scan
    /// ended. `Ok(None)` when nothing is open.
    pub fn find_next_difference(&mut self) -> Result<Option<SearchHit>> {
        self.find_difference(Direction::Forward)
    }

    /// Search backward from the current frame and seek to where the scan
    /// ended. `Ok(None)` when nothing is open.
    pub fn find_previous_difference(&mut self) -> Result<Option<SearchHit>> {
        self.find_difference(Direction::Backward)
    }

    fn find_difference(&mut self, direction: Direction) -> Result<Option<SearchHit>> {
        self.invalidate();
        let anchor = self.current_frame();
        let count = self.frame_count();
        let Some(media) = self.media.as_mut() else {
            return Ok(None);
        };

        let mut source = Bounded {
            inner: &mut media.source,
            count,
        };
        let hit = match direction {
            Direction::Forward => self.search.find_next(&mut source, &mut media.playback, anchor)?,
            Direction::Backward => {
                self.search
                    .find_previous(&mut source, &mut media.playback, anchor)?
            }
        };

        if hit.scanned() {
            self.seek_frame(hit.frame);
            self.highlight = hit.highlight.clone();
        }
        Ok(Some(hit))
    }

    /// The last search's highlight, if still valid and shown.
    pub fn highlight(&self) -> Option<&PixelBuffer> {
        if self.config.show_difference {
            self.highlight.as_ref()
        } else {
            None
        }
    }

    /// Decoded picture at the current frame.
    pub fn current_frame_buffer(&mut self) -> Option<PixelBuffer> {
        let frame = self.current_frame();
        self.media.as_mut()?.source.get_frame(frame)
    }

    // ── Bookmarks ───────────────────────────────────────────────

    pub fn bookmarks(&self) -> &BookmarkRegistry {
        &self.bookmarks
    }

    /// Bookmark the current frame. Returns its row index, or `None` when
    /// nothing is open or the frame is already bookmarked.
    pub fn bookmark_current_frame(&mut self) -> Option<usize> {
        if !self.is_open() {
            return None;
        }
        let frame = self.current_frame();
        let index = self.bookmarks.add(frame)?;
        info!(frame, "Bookmark added");
        Some(index)
    }

    pub fn remove_bookmark(&mut self, frame: FrameIndex) -> bool {
        let removed = self.bookmarks.remove(frame).is_some();
        if removed {
            self.selected_bookmark = None;
        }
        removed
    }

    pub fn clear_bookmarks(&mut self) {
        self.bookmarks.clear();
        self.selected_bookmark = None;
    }

    /// Seek to the bookmark at row `index` and select it.
    pub fn select_bookmark(&mut self, index: usize) -> bool {
        let Some(frame) = self.bookmarks.get(index).map(|b| b.frame()) else {
            return false;
        };
        self.seek_frame(frame);
        self.selected_bookmark = Some(index);
        true
    }

    pub fn selected_bookmark(&self) -> Option<usize> {
        self.selected_bookmark
    }

    pub fn start_bookmark_edit(&mut self, frame: FrameIndex) -> bool {
        self.bookmarks.start_edit(frame)
    }

    pub fn set_bookmark_label(&mut self, text: impl Into<String>) -> bool {
        self.bookmarks.set_pending_label(text)
    }

    pub fn finish_bookmark_edit(&mut self, trigger: EditTrigger) -> Option<FrameIndex> {
        self.bookmarks.finish_edit_with(trigger)
    }

    /// Commit any open edit when the bookmark window goes away.
    pub fn bookmark_window_closed(&mut self) -> Option<FrameIndex> {
        self.bookmarks.finish_edit_with(EditTrigger::WindowClosed)
    }

    pub fn bookmark_rows(&self) -> Vec<BookmarkRow> {
        self.bookmarks
            .rows(&self.clock(), self.config.show_bookmark_times)
    }

    // ── Preferences ─────────────────────────────────────────────

    pub fn toggle_show_difference(&mut self) -> bool {
        self.config.show_difference = !self.config.show_difference;
        self.config.show_difference
    }

    pub fn toggle_bookmark_times(&mut self) -> bool {
        self.config.show_bookmark_times = !self.config.show_bookmark_times;
        self.config.show_bookmark_times
    }

    pub fn toggle_auto_play(&mut self) -> bool {
        self.config.auto_play = !self.config.auto_play;
        self.config.auto_play
    }
}
