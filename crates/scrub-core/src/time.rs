//! Time representation for frame-accurate seeking
//!
//! Media positions are rational numbers of seconds so that converting a
//! frame index to a time and back never accumulates floating-point error.
//! The playback engine downstream still works in floating time, which is
//! why [`FrameClock::frame_to_time`] nudges every seek slightly past the
//! start of the frame.

use num_rational::Rational64;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

/// Zero-based position of a decoded frame.
pub type FrameIndex = u32;

/// A rational time value representing a point in media time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MediaTime {
    /// Time value as a rational number (seconds)
    value: Rational64,
}

impl MediaTime {
    /// Create a new MediaTime of `numerator / denominator` seconds.
    ///
    /// A zero denominator yields [`MediaTime::ZERO`].
    #[inline]
    pub fn new(numerator: i64, denominator: i64) -> Self {
        if denominator == 0 {
            return Self::ZERO;
        }
        Self {
            value: Rational64::new(numerator, denominator),
        }
    }

    /// Create a MediaTime from whole milliseconds.
    #[inline]
    pub fn from_millis(millis: i64) -> Self {
        Self::new(millis, 1000)
    }

    /// Create a MediaTime from seconds as a float.
    /// Note: May introduce small precision errors.
    pub fn from_seconds_f64(seconds: f64) -> Self {
        const PRECISION: i64 = 1_000_000;
        if !seconds.is_finite() {
            return Self::ZERO;
        }
        Self {
            value: Rational64::new((seconds * PRECISION as f64).round() as i64, PRECISION),
        }
    }

    /// Convert to seconds as f64.
    #[inline]
    pub fn to_seconds_f64(self) -> f64 {
        *self.value.numer() as f64 / *self.value.denom() as f64
    }

    /// Zero time constant.
    pub const ZERO: Self = Self {
        value: Rational64::new_raw(0, 1),
    };

    /// Check if this time lies before the start of the media.
    #[inline]
    pub fn is_negative(self) -> bool {
        *self.value.numer() < 0
    }

    #[inline]
    fn rational(self) -> Rational64 {
        self.value
    }

    #[inline]
    fn from_rational(value: Rational64) -> Self {
        Self { value }
    }
}

impl Default for MediaTime {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Add for MediaTime {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self {
            value: self.value + rhs.value,
        }
    }
}

impl Sub for MediaTime {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self {
            value: self.value - rhs.value,
        }
    }
}

impl fmt::Display for MediaTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}s", self.to_seconds_f64())
    }
}

/// Frame rate as a rational number (e.g., 30000/1001 for 29.97 fps).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameRate {
    /// Numerator (e.g., 30000)
    pub numerator: u32,
    /// Denominator (e.g., 1001)
    pub denominator: u32,
}

impl FrameRate {
    /// Create a new frame rate.
    #[inline]
    pub const fn new(numerator: u32, denominator: u32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// Build a rate from the floating value a demuxer reports.
    ///
    /// Kept to millisecond precision; non-finite or negative input yields
    /// a zero rate, which [`FrameRate::effective`] treats as 1 fps.
    pub fn from_fps_f64(fps: f64) -> Self {
        if !fps.is_finite() || fps <= 0.0 {
            return Self::new(0, 1);
        }
        let millis = (fps * 1000.0).round().min(u32::MAX as f64) as u32;
        let rate = Rational64::new(millis as i64, 1000);
        Self::new(*rate.numer() as u32, *rate.denom() as u32)
    }

    /// Convert to frames per second as f64.
    #[inline]
    pub fn to_fps_f64(self) -> f64 {
        if self.denominator == 0 {
            return 0.0;
        }
        self.numerator as f64 / self.denominator as f64
    }

    /// The rate actually used for conversions: `max(rate, 1)`.
    ///
    /// An unknown or sub-1 fps rate would make frame indices degenerate.
    #[inline]
    pub fn effective(self) -> Self {
        if self.denominator == 0 || self.numerator < self.denominator {
            Self::ONE
        } else {
            self
        }
    }

    /// Duration of a single frame at the effective rate.
    #[inline]
    pub fn frame_duration(self) -> MediaTime {
        let rate = self.effective();
        MediaTime::new(rate.denominator as i64, rate.numerator as i64)
    }

    /// Integer frame count per second used by timecodes (rounded up).
    pub fn nominal_fps(self) -> u32 {
        let rate = self.effective();
        rate.numerator.div_ceil(rate.denominator)
    }

    fn as_rational(self) -> Rational64 {
        let rate = self.effective();
        Rational64::new(rate.numerator as i64, rate.denominator as i64)
    }

    /// Common frame rates
    pub const ONE: Self = Self::new(1, 1);
    pub const FPS_23_976: Self = Self::new(24000, 1001);
    pub const FPS_24: Self = Self::new(24, 1);
    pub const FPS_25: Self = Self::new(25, 1);
    pub const FPS_29_97: Self = Self::new(30000, 1001);
    pub const FPS_30: Self = Self::new(30, 1);
    pub const FPS_50: Self = Self::new(50, 1);
    pub const FPS_59_94: Self = Self::new(60000, 1001);
    pub const FPS_60: Self = Self::new(60, 1);
}

impl Default for FrameRate {
    fn default() -> Self {
        Self::FPS_24
    }
}

impl fmt::Display for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fps = self.to_fps_f64();
        if (fps - fps.round()).abs() < 0.001 {
            write!(f, "{} fps", fps.round() as u32)
        } else {
            write!(f, "{:.3} fps", fps)
        }
    }
}

/// Converts between continuous media time and integer frame indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FrameClock {
    rate: FrameRate,
}

impl FrameClock {
    /// Upper bound of the seek offset, in milliseconds.
    pub const SEEK_EPSILON_MILLIS: i64 = 1;

    pub fn new(rate: FrameRate) -> Self {
        Self { rate }
    }

    /// The rate this clock was built with (before flooring at 1 fps).
    pub fn rate(&self) -> FrameRate {
        self.rate
    }

    /// `floor(time * max(rate, 1))`, clamped into the frame index range.
    pub fn time_to_frame(&self, time: MediaTime) -> FrameIndex {
        if time.is_negative() {
            return 0;
        }
        let (time, rate) = (time.rational(), self.rate.as_rational());
        // Widened: a position near i64::MAX times the rate overflows i64.
        let numer = i128::from(*time.numer()) * i128::from(*rate.numer());
        let denom = i128::from(*time.denom()) * i128::from(*rate.denom());
        FrameIndex::try_from(numer / denom).unwrap_or(FrameIndex::MAX)
    }

    /// Seek target for `frame`: its start time plus [`FrameClock::seek_epsilon`].
    ///
    /// Not an exact inverse of [`FrameClock::time_to_frame`]; the result
    /// maps back to the same frame index.
    pub fn frame_to_time(&self, frame: FrameIndex) -> MediaTime {
        let start = Rational64::from_integer(frame as i64) / self.rate.as_rational();
        MediaTime::from_rational(start) + self.seek_epsilon()
    }

    /// `min(1 ms, half a frame)`. Above 1000 fps a whole millisecond would
    /// land on the following frame.
    pub fn seek_epsilon(&self) -> MediaTime {
        let millis = MediaTime::from_millis(Self::SEEK_EPSILON_MILLIS);
        let half_frame = MediaTime::from_rational(self.rate.frame_duration().rational() / 2);
        millis.min(half_frame)
    }

    /// Number of frames in media of `total` length, or 1 when the length
    /// is unknown (no media).
    pub fn frame_duration(&self, total: Option<MediaTime>) -> FrameIndex {
        match total {
            Some(duration) => self.time_to_frame(duration),
            None => 1,
        }
    }

    /// Display timecode of `frame` at this clock's nominal rate.
    pub fn timecode(&self, frame: FrameIndex) -> Timecode {
        let fps = self.rate.nominal_fps();
        let total_seconds = frame / fps;
        Timecode {
            hours: total_seconds / 3600,
            minutes: (total_seconds / 60 % 60) as u8,
            seconds: (total_seconds % 60) as u8,
            frames: frame % fps,
        }
    }
}

/// Non-drop-frame `HH:MM:SS:FF` timecode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Timecode {
    pub hours: u32,
    pub minutes: u8,
    pub seconds: u8,
    pub frames: u32,
}

impl fmt::Display for Timecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}:{:02}",
            self.hours, self.minutes, self.seconds, self.frames
        )
    }
}
