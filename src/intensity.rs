//! Time-decay intensity scoring.
//!
//! Each record gets a recency score in [floor, 1.0]: full intensity at the
//! reference instant, decaying linearly over a configurable window, floored
//! so old points never become invisible. The reference "now" is part of the
//! configuration rather than wall-clock time, which keeps output
//! deterministic for a fixed dataset.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Seconds per day, for fractional day ages.
const SECONDS_PER_DAY: f64 = 86_400.0;

/// Configuration for recency scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntensityConfig {
    /// Fixed reference instant all ages are measured against
    pub reference_now: DateTime<Utc>,
    /// Days from full intensity down to the floor.
    /// Default: 180.0 (~6 months)
    pub window_days: f64,
    /// Minimum intensity; records older than the window stay at this value.
    /// Default: 0.3
    pub floor: f64,
}

impl IntensityConfig {
    /// Create a config with the default window and floor.
    pub fn with_reference(reference_now: DateTime<Utc>) -> Self {
        Self {
            reference_now,
            window_days: 180.0,
            floor: 0.3,
        }
    }

    /// Recency intensity for a timestamp.
    ///
    /// Age in fractional days is clamped to >= 0 (a timestamp after the
    /// reference scores as age 0), then `1 - age / window` is clamped to
    /// [floor, 1.0].
    ///
    /// # Example
    /// ```
    /// use migration_map::IntensityConfig;
    ///
    /// let config = IntensityConfig::default();
    /// let score = config.intensity(config.reference_now);
    /// assert_eq!(score, 1.0);
    /// ```
    pub fn intensity(&self, timestamp: DateTime<Utc>) -> f64 {
        let age_seconds = (self.reference_now - timestamp).num_milliseconds() as f64 / 1000.0;
        let age_days = (age_seconds / SECONDS_PER_DAY).max(0.0);
        (1.0 - age_days / self.window_days).clamp(self.floor, 1.0)
    }
}

impl Default for IntensityConfig {
    fn default() -> Self {
        // Matches the demo dataset's most recent records
        Self::with_reference(Utc.with_ymd_and_hms(2024, 7, 31, 0, 0, 0).unwrap())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn config() -> IntensityConfig {
        IntensityConfig::default()
    }

    #[test]
    fn test_intensity_at_reference_is_full() {
        let c = config();
        assert!((c.intensity(c.reference_now) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_intensity_at_window_edge_is_floor() {
        let c = config();
        let ts = c.reference_now - Duration::days(180);
        assert!((c.intensity(ts) - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_intensity_beyond_window_stays_at_floor() {
        let c = config();
        assert_eq!(c.intensity(c.reference_now - Duration::days(181)), 0.3);
        assert_eq!(c.intensity(c.reference_now - Duration::days(5000)), 0.3);
    }

    #[test]
    fn test_future_timestamp_clamps_to_full() {
        let c = config();
        assert_eq!(c.intensity(c.reference_now + Duration::days(10)), 1.0);
    }

    #[test]
    fn test_intensity_monotone_over_window() {
        let c = config();
        let mut prev = f64::INFINITY;
        for age in 0..=180 {
            let score = c.intensity(c.reference_now - Duration::days(age));
            assert!(score <= prev, "intensity rose at age {} days", age);
            prev = score;
        }
    }

    #[test]
    fn test_fractional_age() {
        let c = config();
        // 90 days is exactly halfway through the window
        let score = c.intensity(c.reference_now - Duration::days(90));
        assert!((score - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_custom_window_and_floor() {
        let mut c = IntensityConfig::default();
        c.window_days = 10.0;
        c.floor = 0.5;

        assert_eq!(c.intensity(c.reference_now - Duration::days(20)), 0.5);
        assert!((c.intensity(c.reference_now - Duration::days(2)) - 0.8).abs() < 1e-9);
    }
}
