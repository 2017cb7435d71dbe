//! # Migration Map
//!
//! Animal movement classification, recency scoring and migration path maps.
//!
//! This library transforms raw wildlife tracking records into the structures
//! a Leaflet.js map needs:
//! - Keyword-based species class classification
//! - Time-decay color intensity scoring against a fixed reference instant
//! - Per-individual migration path aggregation
//! - Static HTML map rendering
//!
//! ## Features
//!
//! - **`parallel`** - Enable parallel record annotation with rayon
//! - **`http`** - Enable HTTP client for Movebank fetching
//! - **`full`** - Enable all features
//!
//! ## Quick Start
//!
//! ```rust
//! use migration_map::{demo_records, run_pipeline, PipelineConfig};
//!
//! let records = demo_records();
//! let result = run_pipeline(records, &PipelineConfig::default());
//!
//! for path in &result.paths {
//!     println!("{}: {} points ({})", path.individual_id, path.point_count, path.animal_class);
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// Unified error handling
pub mod error;
pub use error::{MigrationMapError, Result};

// Keyword-based species class classification
pub mod classify;
pub use classify::{extract_species, ClassEntry, ClassTable};

// Hex color parsing and recency blending
pub mod color;
pub use color::blend_with_white;

// Time-decay intensity scoring
pub mod intensity;
pub use intensity::IntensityConfig;

// Per-individual path aggregation
pub mod aggregate;
pub use aggregate::{aggregate, class_counts};

// End-to-end record pipeline (filter, annotate, aggregate)
pub mod pipeline;
#[cfg(feature = "parallel")]
pub use pipeline::annotate_records_parallel;
pub use pipeline::{annotate_record, run_pipeline, PipelineConfig, PipelineResult, PipelineStats};

// Offline fallback dataset
pub mod demo;
pub use demo::demo_records;

// Leaflet HTML map rendering
pub mod render;
pub use render::{render_map, write_map};

// HTTP module for Movebank fetching
#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "http")]
pub use http::MovebankClient;

// ============================================================================
// Core Types
// ============================================================================

/// One raw observation of a tracked individual.
///
/// Produced by the record source (Movebank or the demo dataset) and never
/// mutated afterwards.
///
/// # Example
/// ```
/// use migration_map::RawRecord;
/// use chrono::{TimeZone, Utc};
///
/// let record = RawRecord::new(
///     71.0,
///     -8.0,
///     Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap(),
///     "tern_001",
/// );
/// assert!(record.is_valid());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: DateTime<Utc>,
    /// Stable identifier of the tracked animal
    pub individual_id: String,
    /// Free-text study name (may be empty)
    #[serde(default)]
    pub study_label: String,
    /// Free-text species hint (may be empty)
    #[serde(default)]
    pub species_label: String,
}

impl RawRecord {
    /// Create a record with empty study/species labels.
    pub fn new(
        latitude: f64,
        longitude: f64,
        timestamp: DateTime<Utc>,
        individual_id: &str,
    ) -> Self {
        Self {
            latitude,
            longitude,
            timestamp,
            individual_id: individual_id.to_string(),
            study_label: String::new(),
            species_label: String::new(),
        }
    }

    /// Check that the record can enter the pipeline: finite, in-range
    /// coordinates and a non-empty individual id.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude >= -90.0
            && self.latitude <= 90.0
            && self.longitude >= -180.0
            && self.longitude <= 180.0
            && !self.individual_id.is_empty()
    }
}

/// Coarse taxonomic bucket driving display color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimalClass {
    Bird,
    Mammal,
    Reptile,
    Fish,
    Amphibian,
    Insect,
    Unknown,
}

impl AnimalClass {
    /// All classes, in classification priority order (`Unknown` last).
    pub const ALL: [AnimalClass; 7] = [
        AnimalClass::Bird,
        AnimalClass::Mammal,
        AnimalClass::Reptile,
        AnimalClass::Fish,
        AnimalClass::Amphibian,
        AnimalClass::Insect,
        AnimalClass::Unknown,
    ];

    /// Lowercase name, matching the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            AnimalClass::Bird => "bird",
            AnimalClass::Mammal => "mammal",
            AnimalClass::Reptile => "reptile",
            AnimalClass::Fish => "fish",
            AnimalClass::Amphibian => "amphibian",
            AnimalClass::Insect => "insect",
            AnimalClass::Unknown => "unknown",
        }
    }

    /// Index into per-class count arrays.
    pub fn index(&self) -> usize {
        match self {
            AnimalClass::Bird => 0,
            AnimalClass::Mammal => 1,
            AnimalClass::Reptile => 2,
            AnimalClass::Fish => 3,
            AnimalClass::Amphibian => 4,
            AnimalClass::Insect => 5,
            AnimalClass::Unknown => 6,
        }
    }
}

impl fmt::Display for AnimalClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A raw record augmented with classification and recency annotations.
///
/// Derived once per pipeline run; `intensity` depends only on the record's
/// timestamp and the configured reference instant, never on other records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedRecord {
    pub latitude: f64,
    pub longitude: f64,
    /// ISO-8601 when serialized
    pub timestamp: DateTime<Utc>,
    pub individual_id: String,
    /// Display species name (e.g. "Arctic Tern")
    pub species: String,
    pub animal_class: AnimalClass,
    /// Recency score in [0.3, 1.0] (1.0 = at the reference instant)
    pub intensity: f64,
    /// Class color blended toward white by recency, "#rrggbb"
    pub display_color: String,
    /// Unblended class color, "#rrggbb"
    pub base_color: String,
}

/// The chronologically ordered journey of one tracked individual.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndividualPath {
    pub individual_id: String,
    /// Majority class among this individual's records
    pub animal_class: AnimalClass,
    /// Display species name from the earliest record
    pub species: String,
    /// Class color for the polyline, "#rrggbb"
    pub base_color: String,
    /// Records sorted ascending by timestamp (stable)
    pub records: Vec<AnnotatedRecord>,
    pub point_count: u32,
}

/// Per-class individual counts for the map legend.
///
/// Indexed by [`AnimalClass::index`]; counts distinct individuals, not
/// tracking points.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassCounts {
    counts: [u32; 7],
}

impl ClassCounts {
    pub fn get(&self, class: AnimalClass) -> u32 {
        self.counts[class.index()]
    }

    pub fn add(&mut self, class: AnimalClass) {
        self.counts[class.index()] += 1;
    }

    /// Total individuals across all classes.
    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }
}

/// Bounding box over a set of records.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl Bounds {
    /// Compute bounds from annotated records. Returns `None` for empty input.
    pub fn from_records(records: &[AnnotatedRecord]) -> Option<Self> {
        if records.is_empty() {
            return None;
        }
        let mut min_lat = f64::MAX;
        let mut max_lat = f64::MIN;
        let mut min_lng = f64::MAX;
        let mut max_lng = f64::MIN;

        for r in records {
            min_lat = min_lat.min(r.latitude);
            max_lat = max_lat.max(r.latitude);
            min_lng = min_lng.min(r.longitude);
            max_lng = max_lng.max(r.longitude);
        }

        Some(Self {
            min_lat,
            max_lat,
            min_lng,
            max_lng,
        })
    }

    /// Center point as (lat, lng).
    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lng + self.max_lng) / 2.0,
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_record_validation() {
        assert!(RawRecord::new(51.5, -0.1, ts(2024, 7, 1), "fox_001").is_valid());
        assert!(!RawRecord::new(91.0, 0.0, ts(2024, 7, 1), "fox_001").is_valid());
        assert!(!RawRecord::new(0.0, 181.0, ts(2024, 7, 1), "fox_001").is_valid());
        assert!(!RawRecord::new(f64::NAN, 0.0, ts(2024, 7, 1), "fox_001").is_valid());
        assert!(!RawRecord::new(51.5, -0.1, ts(2024, 7, 1), "").is_valid());
    }

    #[test]
    fn test_class_serde_lowercase() {
        let json = serde_json::to_string(&AnimalClass::Bird).unwrap();
        assert_eq!(json, "\"bird\"");
        let class: AnimalClass = serde_json::from_str("\"amphibian\"").unwrap();
        assert_eq!(class, AnimalClass::Amphibian);
    }

    #[test]
    fn test_class_counts() {
        let mut counts = ClassCounts::default();
        counts.add(AnimalClass::Bird);
        counts.add(AnimalClass::Bird);
        counts.add(AnimalClass::Fish);

        assert_eq!(counts.get(AnimalClass::Bird), 2);
        assert_eq!(counts.get(AnimalClass::Fish), 1);
        assert_eq!(counts.get(AnimalClass::Insect), 0);
        assert_eq!(counts.total(), 3);
    }

    #[test]
    fn test_bounds_center() {
        let record = |lat: f64, lng: f64| AnnotatedRecord {
            latitude: lat,
            longitude: lng,
            timestamp: ts(2024, 7, 1),
            individual_id: "fox_001".to_string(),
            species: "Red Fox".to_string(),
            animal_class: AnimalClass::Mammal,
            intensity: 1.0,
            display_color: "#4ecdc4".to_string(),
            base_color: "#4ecdc4".to_string(),
        };

        let bounds = Bounds::from_records(&[record(10.0, 20.0), record(30.0, 40.0)]).unwrap();
        assert_eq!(bounds.center(), (20.0, 30.0));
        assert!(Bounds::from_records(&[]).is_none());
    }
}
