//! Property-based tests for the diff engine.
//!
//! 1. A buffer never differs from itself
//! 2. `differs` is symmetric
//! 3. The highlight is opaque exactly where colour channels differ
//! 4. `differs` agrees with the highlight having any opaque pixel

use proptest::prelude::*;
use scrub_core::{PixelBuffer, PixelFormat};
use scrub_diff::DiffEngine;

fn format_strategy() -> impl Strategy<Value = PixelFormat> {
    prop_oneof![
        Just(PixelFormat::Rgb8),
        Just(PixelFormat::Bgr8),
        Just(PixelFormat::Rgba8),
        Just(PixelFormat::Bgra8),
    ]
}

/// Two buffers of the same shape whose samples differ sparsely, with
/// random row padding.
fn buffer_pair() -> impl Strategy<Value = (PixelBuffer, PixelBuffer)> {
    (1u32..12, 1u32..12, 0usize..5, format_strategy()).prop_flat_map(|(w, h, pad, format)| {
        let stride = w as usize * format.bytes_per_pixel() + pad;
        let len = stride * h as usize;
        (
            proptest::collection::vec(0u8..4, len),
            proptest::collection::vec(proptest::bool::weighted(0.05), len),
            proptest::collection::vec(any::<u8>(), len),
        )
            .prop_map(move |(base, flips, noise)| {
                let other: Vec<u8> = base
                    .iter()
                    .zip(&flips)
                    .zip(&noise)
                    .map(|((&v, &flip), &n)| if flip { n } else { v })
                    .collect();
                (
                    PixelBuffer::new(w, h, stride, format, base).unwrap(),
                    PixelBuffer::new(w, h, stride, format, other).unwrap(),
                )
            })
    })
}

proptest! {
    #[test]
    fn differs_is_reflexive((a, _b) in buffer_pair()) {
        prop_assert!(!DiffEngine::new().differs(&a, &a).unwrap());
    }

    #[test]
    fn differs_is_symmetric((a, b) in buffer_pair()) {
        let engine = DiffEngine::new();
        prop_assert_eq!(engine.differs(&a, &b).unwrap(), engine.differs(&b, &a).unwrap());
    }

    #[test]
    fn highlight_matches_colour_differences((a, b) in buffer_pair()) {
        let engine = DiffEngine::new();
        let hl = engine.highlight(&a, &b).unwrap();
        prop_assert_eq!((hl.width(), hl.height()), (a.width(), a.height()));

        let mut any_opaque = false;
        for y in 0..a.height() {
            for x in 0..a.width() {
                let changed = a.color(x, y) != b.color(x, y);
                let alpha = hl.pixel(x, y)[3];
                prop_assert_eq!(alpha == 255, changed, "pixel ({}, {})", x, y);
                if !changed {
                    prop_assert_eq!(hl.pixel(x, y), &[0u8, 0, 0, 0][..]);
                }
                any_opaque |= changed;
            }
        }
        prop_assert_eq!(engine.differs(&a, &b).unwrap(), any_opaque);
    }
}
