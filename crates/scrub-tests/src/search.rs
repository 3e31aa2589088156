//! Integration tests for difference search over whole clips.
//!
//! Exercises scrub-core sources and clocks together with scrub-diff.

use scrub_core::{FrameClock, FrameRate, MemorySource, PixelBuffer, PixelFormat, Playback};
use scrub_diff::{DiffEngine, DiffSearch, ScanStop};
use scrub_session::ManualPlayback;

// ── Helpers ────────────────────────────────────────────────────

const WIDTH: u32 = 16;
const HEIGHT: u32 = 9;

fn plain() -> PixelBuffer {
    PixelBuffer::filled(WIDTH, HEIGHT, PixelFormat::Bgra8, [40, 40, 40, 255])
}

/// Plain frame with a 2x2 patch at (5, 3).
fn patched() -> PixelBuffer {
    PixelBuffer::from_fn(WIDTH, HEIGHT, PixelFormat::Bgra8, |x, y| {
        if (5..7).contains(&x) && (3..5).contains(&y) {
            [200, 40, 40, 255]
        } else {
            [40, 40, 40, 255]
        }
    })
}

/// 100 identical frames except frame 42.
fn single_change_clip() -> MemorySource {
    MemorySource::new((0..100).map(|f| if f == 42 { patched() } else { plain() }))
}

/// Three shots: frames 0-39, 40-69, 70-99.
fn three_shot_clip() -> MemorySource {
    MemorySource::new((0..100u32).map(|f| {
        let level = match f {
            0..=39 => 10,
            40..=69 => 120,
            _ => 230,
        };
        PixelBuffer::filled(WIDTH, HEIGHT, PixelFormat::Rgb8, [level, level, level, 0])
    }))
}

fn search() -> DiffSearch {
    DiffSearch::new(DiffEngine::new())
}

// ── Single changed frame ───────────────────────────────────────

#[test]
fn next_from_start_finds_changed_frame() {
    let mut clip = single_change_clip();
    let mut transport = ManualPlayback::new();
    transport.play();

    let hit = search().find_next(&mut clip, &mut transport, 0).unwrap();
    assert_eq!(hit.frame, 42);
    assert_eq!(hit.stop, ScanStop::Found);
    assert!(!transport.is_playing());

    let highlight = hit.highlight.unwrap();
    let opaque: Vec<(u32, u32)> = (0..HEIGHT)
        .flat_map(|y| (0..WIDTH).map(move |x| (x, y)))
        .filter(|&(x, y)| highlight.pixel(x, y)[3] == 255)
        .collect();
    assert_eq!(opaque, vec![(5, 3), (6, 3), (5, 4), (6, 4)]);
}

#[test]
fn previous_from_end_finds_changed_frame() {
    let mut clip = single_change_clip();
    let mut transport = ManualPlayback::new();
    let hit = search().find_previous(&mut clip, &mut transport, 99).unwrap();
    assert_eq!(hit.frame, 42);
    assert!(hit.highlight.is_some());
}

#[test]
fn next_from_changed_frame_stops_right_after() {
    let mut clip = single_change_clip();
    let mut transport = ManualPlayback::new();
    let hit = search().find_next(&mut clip, &mut transport, 42).unwrap();
    assert_eq!(hit.frame, 43);
    assert_eq!(hit.stop, ScanStop::Found);
}

#[test]
fn next_past_change_runs_to_last_frame() {
    let mut clip = single_change_clip();
    let mut transport = ManualPlayback::new();
    let hit = search().find_next(&mut clip, &mut transport, 43).unwrap();
    assert_eq!(hit.frame, 99);
    assert_eq!(hit.stop, ScanStop::Exhausted);
    assert!(hit.highlight.is_none());
}

// ── Shot boundaries ────────────────────────────────────────────

#[test]
fn forward_walk_visits_every_shot_start() {
    let mut clip = three_shot_clip();
    let mut transport = ManualPlayback::new();
    let search = search();

    let mut anchor = 0;
    let mut starts = Vec::new();
    loop {
        let hit = search.find_next(&mut clip, &mut transport, anchor).unwrap();
        if !hit.found() {
            assert_eq!(hit.frame, 99);
            break;
        }
        starts.push(hit.frame);
        anchor = hit.frame;
    }
    assert_eq!(starts, vec![40, 70]);
}

#[test]
fn backward_walk_visits_every_shot_end() {
    let mut clip = three_shot_clip();
    let mut transport = ManualPlayback::new();
    let search = search();

    let mut anchor = 99;
    let mut ends = Vec::new();
    loop {
        let hit = search.find_previous(&mut clip, &mut transport, anchor).unwrap();
        if !hit.found() {
            assert_eq!(hit.frame, 0);
            break;
        }
        ends.push(hit.frame);
        anchor = hit.frame;
    }
    assert_eq!(ends, vec![69, 39]);
}

// ── Decode gaps ────────────────────────────────────────────────

#[test]
fn gap_in_clip_ends_scan_before_change() {
    let frames = (0..10).map(|f| match f {
        6 => None,
        8 => Some(patched()),
        _ => Some(plain()),
    });
    let mut clip = MemorySource::with_gaps(frames);
    let mut transport = ManualPlayback::new();
    transport.play();

    let hit = search().find_next(&mut clip, &mut transport, 2).unwrap();
    assert_eq!(hit.stop, ScanStop::DecodeMiss);
    assert_eq!(hit.frame, 5);
    assert!(!transport.is_playing());
}

// ── Clock and search together ──────────────────────────────────

#[test]
fn hit_frame_round_trips_through_clock() {
    let clock = FrameClock::new(FrameRate::FPS_29_97);
    let mut clip = single_change_clip();
    let mut transport = ManualPlayback::new();

    transport.seek(clock.frame_to_time(10));
    let anchor = clock.time_to_frame(transport.position());
    assert_eq!(anchor, 10);

    let hit = search().find_next(&mut clip, &mut transport, anchor).unwrap();
    transport.seek(clock.frame_to_time(hit.frame));
    assert_eq!(clock.time_to_frame(transport.position()), 42);
}
