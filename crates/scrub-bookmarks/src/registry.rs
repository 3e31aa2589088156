//! Bookmark registry with derived time lapses and a single edit session.

use scrub_core::{FrameClock, FrameIndex, Timecode};
use serde::Serialize;
use tracing::debug;

// ── Bookmark ────────────────────────────────────────────────────

/// A named marker at a frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bookmark {
    frame: FrameIndex,
    label: String,
    /// Frames since the previous bookmark; `None` for the first one.
    time_lapse: Option<FrameIndex>,
}

impl Bookmark {
    fn new(frame: FrameIndex) -> Self {
        Self {
            frame,
            label: String::new(),
            time_lapse: None,
        }
    }

    pub fn frame(&self) -> FrameIndex {
        self.frame
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn time_lapse(&self) -> Option<FrameIndex> {
        self.time_lapse
    }
}

// ── Edit session ────────────────────────────────────────────────

/// Rename session state. Only one bookmark can be under edit.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditState {
    #[default]
    Idle,
    Editing {
        frame: FrameIndex,
        /// Text typed so far; becomes the label on commit.
        pending: String,
    },
}

/// What ended an edit. Every trigger commits the pending text.
///
/// `Cancel` commits as well; Escape behaves like Enter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditTrigger {
    Confirm,
    Cancel,
    FocusLost,
    /// The bookmark list window closed with an edit open.
    WindowClosed,
    /// Another bookmark started editing.
    Superseded,
}

// ── Display projection ──────────────────────────────────────────

/// One line of the bookmark list as the presentation layer shows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookmarkRow {
    pub frame: FrameIndex,
    pub label: String,
    /// `"(+N)"`, hidden for the first row or when times are switched off.
    pub time_lapse: Option<String>,
    pub timecode: Timecode,
    pub editing: bool,
}

// ── Registry ────────────────────────────────────────────────────

/// Bookmarks sorted ascending by frame, unique per frame.
///
/// After every operation each entry's `time_lapse` equals the distance to
/// its predecessor and at most one entry is under edit.
#[derive(Debug, Clone, Default)]
pub struct BookmarkRegistry {
    entries: Vec<Bookmark>,
    edit: EditState,
}

impl BookmarkRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bookmark `frame`. Returns the insertion index, or `None` if the
    /// frame was already bookmarked.
    pub fn add(&mut self, frame: FrameIndex) -> Option<usize> {
        if self.contains(frame) {
            return None;
        }
        let index = self.entries.partition_point(|b| b.frame < frame);
        self.entries.insert(index, Bookmark::new(frame));

        // Only the new entry and its successor have new neighbours.
        self.refresh_lapse(index);
        self.refresh_lapse(index + 1);

        debug!(frame, index, "Bookmark added");
        Some(index)
    }

    /// Remove the bookmark at `frame`, if any.
    ///
    /// Removing the bookmark under edit ends the edit without a commit.
    pub fn remove(&mut self, frame: FrameIndex) -> Option<Bookmark> {
        let index = self.index_of(frame)?;
        let removed = self.entries.remove(index);
        self.refresh_lapse(index);

        if self.editing_frame() == Some(frame) {
            debug!(frame, "Bookmark under edit removed, dropping edit");
            self.edit = EditState::Idle;
        }
        debug!(frame, index, "Bookmark removed");
        Some(removed)
    }

    /// Drop every bookmark and any open edit.
    pub fn clear(&mut self) {
        debug!(count = self.entries.len(), "Bookmarks cleared");
        self.entries.clear();
        self.edit = EditState::Idle;
    }

    /// Begin renaming the bookmark at `frame`, committing any edit already
    /// open. Returns `false` if `frame` is not bookmarked.
    pub fn start_edit(&mut self, frame: FrameIndex) -> bool {
        let Some(index) = self.index_of(frame) else {
            return false;
        };
        self.finish_edit_with(EditTrigger::Superseded);

        let pending = self.entries[index].label.clone();
        self.edit = EditState::Editing { frame, pending };
        debug!(frame, "Bookmark edit started");
        true
    }

    /// Replace the text of the open edit. No-op when idle.
    pub fn set_pending_label(&mut self, text: impl Into<String>) -> bool {
        match &mut self.edit {
            EditState::Editing { pending, .. } => {
                *pending = text.into();
                true
            }
            EditState::Idle => false,
        }
    }

    /// Commit the open edit. Returns the frame whose label changed.
    pub fn finish_edit(&mut self) -> Option<FrameIndex> {
        self.finish_edit_with(EditTrigger::Confirm)
    }

    /// Commit the open edit, recording what ended it.
    pub fn finish_edit_with(&mut self, trigger: EditTrigger) -> Option<FrameIndex> {
        let EditState::Editing { frame, pending } = std::mem::take(&mut self.edit) else {
            return None;
        };
        let index = self.index_of(frame)?;
        self.entries[index].label = pending;
        debug!(frame, ?trigger, "Bookmark edit committed");
        Some(frame)
    }

    pub fn edit_state(&self) -> &EditState {
        &self.edit
    }

    pub fn editing_frame(&self) -> Option<FrameIndex> {
        match self.edit {
            EditState::Editing { frame, .. } => Some(frame),
            EditState::Idle => None,
        }
    }

    pub fn pending_label(&self) -> Option<&str> {
        match &self.edit {
            EditState::Editing { pending, .. } => Some(pending),
            EditState::Idle => None,
        }
    }

    pub fn lookup_by_frame(&self, frame: FrameIndex) -> Option<&Bookmark> {
        self.index_of(frame).map(|index| &self.entries[index])
    }

    pub fn index_of(&self, frame: FrameIndex) -> Option<usize> {
        self.entries.binary_search_by_key(&frame, |b| b.frame).ok()
    }

    pub fn contains(&self, frame: FrameIndex) -> bool {
        self.index_of(frame).is_some()
    }

    pub fn get(&self, index: usize) -> Option<&Bookmark> {
        self.entries.get(index)
    }

    pub fn bookmarks(&self) -> &[Bookmark] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bookmark> {
        self.entries.iter()
    }

    pub fn frames(&self) -> impl Iterator<Item = FrameIndex> + '_ {
        self.entries.iter().map(|b| b.frame)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Display rows in frame order.
    pub fn rows(&self, clock: &FrameClock, show_times: bool) -> Vec<BookmarkRow> {
        let editing = self.editing_frame();
        self.entries
            .iter()
            .map(|b| BookmarkRow {
                frame: b.frame,
                label: b.label.clone(),
                time_lapse: b
                    .time_lapse
                    .filter(|_| show_times)
                    .map(|lapse| format!("(+{})", lapse)),
                timecode: clock.timecode(b.frame),
                editing: editing == Some(b.frame),
            })
            .collect()
    }

    /// Recompute `time_lapse` of the entry at `index` from its predecessor.
    fn refresh_lapse(&mut self, index: usize) {
        if index >= self.entries.len() {
            return;
        }
        let previous = index
            .checked_sub(1)
            .map(|prev| self.entries[prev].frame);
        let frame = self.entries[index].frame;
        self.entries[index].time_lapse = previous.map(|prev| frame - prev);
    }
}

impl<'a> IntoIterator for &'a BookmarkRegistry {
    type Item = &'a Bookmark;
    type IntoIter = std::slice::Iter<'a, Bookmark>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

// ── Tests ───────────────────────────────────────────────────────
