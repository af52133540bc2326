use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;

/// Absorbs float drift from summed step times when snapping to frames.
const FRAME_EPSILON: f64 = 1e-6;

/// Run time of a timeline step, in fractional seconds. Never negative.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct Duration {
    seconds: f64,
}

impl Duration {
    /// Create a duration from seconds. Negative and NaN inputs clamp to zero.
    pub fn from_seconds(s: f64) -> Self {
        Self {
            seconds: if s.is_nan() { 0.0 } else { s.max(0.0) },
        }
    }

    pub fn zero() -> Self {
        Self { seconds: 0.0 }
    }

    pub fn as_seconds(&self) -> f64 {
        self.seconds
    }

    pub fn is_zero(&self) -> bool {
        self.seconds == 0.0
    }

    /// Number of frames this duration spans at the given frame rate.
    pub fn frame_count(&self, fps: f64) -> u64 {
        (self.seconds * fps - FRAME_EPSILON).ceil().max(0.0) as u64
    }
}

impl Default for Duration {
    fn default() -> Self {
        Duration::zero()
    }
}

impl From<f64> for Duration {
    fn from(seconds: f64) -> Self {
        Duration::from_seconds(seconds)
    }
}

impl From<Duration> for f64 {
    fn from(d: Duration) -> Self {
        d.seconds
    }
}

impl Add for Duration {
    type Output = Duration;
    fn add(self, rhs: Duration) -> Duration {
        Duration::from_seconds(self.seconds + rhs.seconds)
    }
}

impl std::iter::Sum for Duration {
    fn sum<I: Iterator<Item = Duration>>(iter: I) -> Duration {
        iter.fold(Duration::zero(), |acc, d| acc + d)
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.seconds < 1.0 {
            write!(f, "{:.0}ms", self.seconds * 1000.0)
        } else {
            write!(f, "{:.2}s", self.seconds)
        }
    }
}

/// Offset of a step from the start of its scene.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Timestamp {
    seconds: f64,
}

impl Timestamp {
    pub fn zero() -> Self {
        Self { seconds: 0.0 }
    }

    pub fn as_seconds(&self) -> f64 {
        self.seconds
    }

    /// First frame covered by this timestamp.
    pub fn to_frame(&self, fps: f64) -> u64 {
        (self.seconds * fps + FRAME_EPSILON).floor().max(0.0) as u64
    }
}

impl Add<Duration> for Timestamp {
    type Output = Timestamp;
    fn add(self, rhs: Duration) -> Timestamp {
        Timestamp {
            seconds: self.seconds + rhs.as_seconds(),
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total_ms = (self.seconds * 1000.0).round() as u64;
        let minutes = total_ms / 60_000;
        let secs = (total_ms % 60_000) / 1_000;
        let ms = total_ms % 1_000;
        write!(f, "{:02}:{:02}.{:03}", minutes, secs, ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_clamps() {
        assert!(Duration::from_seconds(-2.0).is_zero());
        assert!(Duration::from_seconds(f64::NAN).is_zero());
        assert!((Duration::from_seconds(2.5).as_seconds() - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_duration_sum_and_frames() {
        let total: Duration = [1.0, 2.0, 0.5].into_iter().map(Duration::from).sum();
        assert!((total.as_seconds() - 3.5).abs() < 1e-9);
        assert_eq!(total.frame_count(30.0), 105);
    }

    #[test]
    fn test_duration_serde_as_number() {
        let json = serde_json::to_string(&Duration::from_seconds(4.0)).unwrap();
        assert_eq!(json, "4.0");
        let back: Duration = serde_json::from_str("1.5").unwrap();
        assert!((back.as_seconds() - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_duration_display() {
        assert_eq!(format!("{}", Duration::from_seconds(2.0)), "2.00s");
        assert_eq!(format!("{}", Duration::from_seconds(0.25)), "250ms");
    }

    #[test]
    fn test_timestamp_advance_and_display() {
        let ts = Timestamp::zero() + Duration::from_seconds(61.5);
        assert_eq!(format!("{}", ts), "01:01.500");
        assert_eq!(ts.to_frame(30.0), 1845);
    }

    #[test]
    fn test_frames_ignore_float_drift() {
        let total: Duration = [0.1, 0.1, 0.1].into_iter().map(Duration::from).sum();
        assert_eq!(total.frame_count(10.0), 3);
        let ts = Timestamp::zero() + Duration::from_seconds(0.1) + Duration::from_seconds(0.2);
        assert_eq!(ts.to_frame(10.0), 3);
        assert_eq!(Duration::zero().frame_count(30.0), 0);
    }
}
