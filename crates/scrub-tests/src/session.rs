//! Integration tests for the player session.
//!
//! Drives scrub-session the way the presentation layer does: open a clip,
//! move around, search, bookmark and label.

use scrub_bookmarks::{EditState, EditTrigger};
use scrub_core::{FrameRate, MediaTime, MemorySource, PixelBuffer, PixelFormat};
use scrub_diff::{ScanCancel, ScanStop};
use scrub_session::{ManualPlayback, Player, PlayerConfig, SkipSpeed};

// ── Helpers ────────────────────────────────────────────────────

type ClipPlayer = Player<MemorySource, ManualPlayback>;

fn frame(level: u8) -> PixelBuffer {
    PixelBuffer::filled(8, 8, PixelFormat::Rgba8, [level, level, level, 255])
}

/// Shot changes at frames 25 and 60 of a 90-frame clip at 25 fps.
fn build_player(config: PlayerConfig) -> ClipPlayer {
    let clip = MemorySource::new((0..90u32).map(|f| match f {
        0..=24 => frame(0),
        25..=59 => frame(100),
        _ => frame(200),
    }));
    let mut player = Player::new(config);
    player.open(
        clip,
        ManualPlayback::new(),
        FrameRate::FPS_25,
        Some(MediaTime::new(90, 25)),
    );
    player
}

// ── Search through the session ─────────────────────────────────

#[test]
fn jump_between_shots() {
    let mut player = build_player(PlayerConfig::default());
    assert_eq!(player.frame_count(), 90);

    player.find_next_difference().unwrap();
    assert_eq!(player.current_frame(), 25);
    player.find_next_difference().unwrap();
    assert_eq!(player.current_frame(), 60);

    let hit = player.find_next_difference().unwrap().unwrap();
    assert_eq!(hit.stop, ScanStop::Exhausted);
    assert_eq!(player.current_frame(), 89);
    assert!(player.highlight().is_none());

    player.find_previous_difference().unwrap();
    assert_eq!(player.current_frame(), 59);
    assert!(player.highlight().is_some());
}

#[test]
fn search_pauses_running_playback() {
    let mut player = build_player(PlayerConfig {
        auto_play: true,
        ..Default::default()
    });
    assert!(player.is_playing());
    player.find_next_difference().unwrap();
    assert!(!player.is_playing());
}

#[test]
fn backward_search_at_start_keeps_playing() {
    let mut player = build_player(PlayerConfig::default());
    player.play();
    let hit = player.find_previous_difference().unwrap().unwrap();
    assert_eq!(hit.stop, ScanStop::NoOp);
    assert!(player.is_playing());
    assert_eq!(player.current_frame(), 0);
}

#[test]
fn cancelled_search_stays_at_anchor() {
    let cancel = ScanCancel::new();
    let mut player = build_player(PlayerConfig::default()).with_cancel(cancel.clone());
    player.seek_frame(10);

    cancel.cancel();
    let hit = player.find_next_difference().unwrap().unwrap();
    assert_eq!(hit.stop, ScanStop::Cancelled);
    assert_eq!(player.current_frame(), 10);

    cancel.reset();
    player.find_next_difference().unwrap();
    assert_eq!(player.current_frame(), 25);
}

#[test]
fn highlight_hidden_by_preference() {
    let mut player = build_player(PlayerConfig {
        show_difference: false,
        ..Default::default()
    });
    let hit = player.find_next_difference().unwrap().unwrap();
    assert!(hit.highlight.is_some());
    assert!(player.highlight().is_none());
}

#[test]
fn highlight_uses_configured_marker() {
    let mut player = build_player(PlayerConfig {
        highlight_color: [0, 255, 0],
        ..Default::default()
    });
    player.find_next_difference().unwrap();
    let highlight = player.highlight().unwrap();
    assert_eq!(highlight.pixel(3, 3), &[0, 255, 0, 255][..]);
}

// ── Bookmarks through the session ──────────────────────────────

#[test]
fn bookmark_every_shot_and_label_them() {
    let mut player = build_player(PlayerConfig::default());
    player.bookmark_current_frame();
    player.find_next_difference().unwrap();
    player.bookmark_current_frame();
    player.find_next_difference().unwrap();
    player.bookmark_current_frame();

    let frames: Vec<u32> = player.bookmarks().frames().collect();
    assert_eq!(frames, vec![0, 25, 60]);

    assert!(player.start_bookmark_edit(25));
    player.set_bookmark_label("interview");
    // Opening another row commits the first.
    assert!(player.start_bookmark_edit(60));
    player.set_bookmark_label("b-roll");
    assert_eq!(player.finish_bookmark_edit(EditTrigger::Confirm), Some(60));

    let rows = player.bookmark_rows();
    assert_eq!(rows[1].label, "interview");
    assert_eq!(rows[2].label, "b-roll");
    assert_eq!(rows[2].time_lapse.as_deref(), Some("(+35)"));
    assert_eq!(rows[1].timecode.to_string(), "00:00:01:00");
}

#[test]
fn removing_middle_bookmark_updates_lapse() {
    let mut player = build_player(PlayerConfig::default());
    for target in [5, 30, 70] {
        player.seek_frame(target);
        player.bookmark_current_frame();
    }
    assert!(player.remove_bookmark(30));
    assert!(!player.remove_bookmark(30));
    assert_eq!(player.bookmarks().lookup_by_frame(70).unwrap().time_lapse(), Some(65));
}

#[test]
fn select_bookmark_clears_highlight() {
    let mut player = build_player(PlayerConfig::default());
    player.seek_frame(50);
    player.bookmark_current_frame();
    player.seek_frame(0);
    player.find_next_difference().unwrap();
    assert!(player.highlight().is_some());

    assert!(player.select_bookmark(0));
    assert_eq!(player.current_frame(), 50);
    assert!(player.highlight().is_none());
}

#[test]
fn window_close_commits_pending_label() {
    let mut player = build_player(PlayerConfig::default());
    player.seek_frame(12);
    player.bookmark_current_frame();
    player.start_bookmark_edit(12);
    player.set_bookmark_label("typo here");

    assert_eq!(player.bookmark_window_closed(), Some(12));
    assert_eq!(player.bookmarks().edit_state(), &EditState::Idle);
    assert_eq!(player.bookmarks().lookup_by_frame(12).unwrap().label(), "typo here");
}

#[test]
fn reopen_starts_with_empty_registry() {
    let mut player = build_player(PlayerConfig::default());
    player.skip_forward(SkipSpeed::Large);
    player.bookmark_current_frame();
    assert_eq!(player.bookmarks().len(), 1);

    let (clip, transport) = player.close().unwrap();
    assert_eq!(player.frame_count(), 1);
    player.open(clip, transport, FrameRate::FPS_25, None);
    assert!(player.bookmarks().is_empty());
}
