/// Listening progress domain type
use serde::{Deserialize, Serialize};

/// Share of an episode that counts as "finished"
///
/// 98% leaves room for outros and trailing credits.
pub const FINISHED_THRESHOLD: f64 = 0.98;

/// Whether `progress` seconds into a `duration`-second episode counts as finished
///
/// An unknown (zero, negative or NaN) duration is never finished.
pub fn is_finished(progress: f64, duration: f64) -> bool {
    duration > 0.0 && progress / duration >= FINISHED_THRESHOLD
}

/// Durable playback position and completion marker for one episode
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressRecord {
    /// Position in seconds
    pub progress: f64,

    /// Whether the episode was listened to the end
    pub finished: bool,

    /// When the record was written (epoch milliseconds)
    pub timestamp: i64,
}

impl ProgressRecord {
    /// Build the record written for `progress` out of `duration` seconds
    ///
    /// Non-finite values collapse to 0 and the position is clamped into
    /// `[0, duration]` once the duration is known, so the stored mapping always
    /// serializes to valid JSON.
    pub fn from_position(progress: f64, duration: f64, timestamp: i64) -> Self {
        let duration = finite_or_zero(duration);
        let mut progress = finite_or_zero(progress).max(0.0);
        if duration > 0.0 {
            progress = progress.min(duration);
        }

        Self {
            progress,
            finished: is_finished(progress, duration),
            timestamp,
        }
    }

    /// Whether the record carries a position worth resuming from
    pub fn has_progress(&self) -> bool {
        self.progress > 0.0
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn default_is_zero_value() {
        let record = ProgressRecord::default();
        assert_eq!(record.progress, 0.0);
        assert!(!record.finished);
        assert_eq!(record.timestamp, 0);
    }

    #[test]
    fn threshold_is_inclusive() {
        assert!(is_finished(98.0, 100.0));
        assert!(is_finished(294.0, 300.0));
        assert!(!is_finished(97.9, 100.0));
    }

    #[test]
    fn unknown_duration_is_never_finished() {
        assert!(!is_finished(10.0, 0.0));
        assert!(!is_finished(10.0, -1.0));
        assert!(!is_finished(10.0, f64::NAN));
    }

    #[test]
    fn from_position_clamps_to_duration() {
        let record = ProgressRecord::from_position(250.0, 200.0, 7);
        assert_eq!(record.progress, 200.0);
        assert!(record.finished);
        assert_eq!(record.timestamp, 7);
    }

    #[test]
    fn from_position_sanitizes_non_finite_values() {
        let record = ProgressRecord::from_position(f64::NAN, 100.0, 1);
        assert_eq!(record.progress, 0.0);
        assert!(!record.finished);

        let record = ProgressRecord::from_position(-3.0, f64::INFINITY, 1);
        assert_eq!(record.progress, 0.0);

        // Survives a JSON round trip even when fed garbage
        let json = serde_json::to_string(&record).unwrap();
        let back: ProgressRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn unknown_duration_keeps_raw_position() {
        let record = ProgressRecord::from_position(42.0, 0.0, 1);
        assert_eq!(record.progress, 42.0);
        assert!(!record.finished);
        assert!(record.has_progress());
    }

    proptest! {
        #[test]
        fn finished_matches_ratio(progress in 0.0f64..10_000.0, duration in 0.001f64..10_000.0) {
            let record = ProgressRecord::from_position(progress, duration, 0);
            let clamped = progress.min(duration);
            prop_assert_eq!(record.finished, clamped / duration >= FINISHED_THRESHOLD);
            prop_assert!(record.progress <= duration);
            prop_assert!(record.progress >= 0.0);
        }
    }
}
