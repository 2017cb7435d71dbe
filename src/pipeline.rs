//! End-to-end record pipeline.
//!
//! A single synchronous pass over an in-memory batch:
//! 1. Filter records that fail validation (skip, never abort)
//! 2. Annotate each survivor (classify, score recency, blend color)
//! 3. Aggregate into per-individual paths and legend counts
//!
//! Every step is a pure function of its record and the configuration, so
//! annotation can run in parallel (`parallel` feature) without changing the
//! result; grouping stays sequential to preserve first-seen order.

use log::{debug, info};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::{
    aggregate::{aggregate, class_counts},
    classify::extract_species,
    AnnotatedRecord, Bounds, ClassCounts, ClassTable, IndividualPath, IntensityConfig, RawRecord,
};

/// Configuration for one pipeline run.
///
/// Built once at startup and passed explicitly; holds the classification
/// table and the recency scoring parameters.
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    pub class_table: ClassTable,
    pub intensity: IntensityConfig,
}

/// Counters from one pipeline run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    /// Records supplied to the pipeline
    pub total_records: u32,
    /// Records that passed validation
    pub valid_records: u32,
    /// Records skipped as invalid
    pub skipped_records: u32,
    /// Distinct individuals in the output
    pub individual_count: u32,
}

/// Output of one pipeline run: everything the renderer needs.
#[derive(Debug, Clone)]
pub struct PipelineResult {
    /// One path per individual, in first-seen order
    pub paths: Vec<IndividualPath>,
    /// Per-class individual counts for the legend
    pub class_counts: ClassCounts,
    /// Bounding box over all plotted records (`None` when empty)
    pub bounds: Option<Bounds>,
    pub stats: PipelineStats,
}

/// Annotate one valid record: classify, score recency, blend color.
pub fn annotate_record(record: &RawRecord, config: &PipelineConfig) -> AnnotatedRecord {
    let animal_class = config
        .class_table
        .classify(&record.study_label, &record.species_label);
    let intensity = config.intensity.intensity(record.timestamp);
    let base_color = config.class_table.color_for(animal_class).to_string();
    let display_color = crate::color::blend_with_white(&base_color, intensity);

    let species = if record.species_label.is_empty() {
        extract_species(&record.study_label)
    } else {
        record.species_label.clone()
    };

    AnnotatedRecord {
        latitude: record.latitude,
        longitude: record.longitude,
        timestamp: record.timestamp,
        individual_id: record.individual_id.clone(),
        species,
        animal_class,
        intensity,
        display_color,
        base_color,
    }
}

/// Annotate a batch of valid records in parallel.
///
/// Classification and scoring are pure per-record functions, so the result
/// order matches the input order exactly.
#[cfg(feature = "parallel")]
pub fn annotate_records_parallel(
    records: &[RawRecord],
    config: &PipelineConfig,
) -> Vec<AnnotatedRecord> {
    records
        .par_iter()
        .map(|r| annotate_record(r, config))
        .collect()
}

/// Run the full pipeline over a batch of raw records.
///
/// Invalid records are skipped and counted, never fatal; an empty input
/// (or an all-invalid one) yields an empty-but-valid result.
pub fn run_pipeline(records: Vec<RawRecord>, config: &PipelineConfig) -> PipelineResult {
    let total = records.len() as u32;

    let valid: Vec<RawRecord> = records
        .into_iter()
        .filter(|r| {
            let ok = r.is_valid();
            if !ok {
                debug!(
                    "[Pipeline] Skipping invalid record for '{}' at ({}, {})",
                    r.individual_id, r.latitude, r.longitude
                );
            }
            ok
        })
        .collect();

    let skipped = total - valid.len() as u32;

    #[cfg(feature = "parallel")]
    let annotated = annotate_records_parallel(&valid, config);
    #[cfg(not(feature = "parallel"))]
    let annotated: Vec<AnnotatedRecord> = valid.iter().map(|r| annotate_record(r, config)).collect();

    let bounds = Bounds::from_records(&annotated);
    let paths = aggregate(annotated, &config.class_table);
    let counts = class_counts(&paths);

    let stats = PipelineStats {
        total_records: total,
        valid_records: valid.len() as u32,
        skipped_records: skipped,
        individual_count: paths.len() as u32,
    };

    info!(
        "[Pipeline] {} records in, {} valid, {} skipped, {} individuals",
        stats.total_records, stats.valid_records, stats.skipped_records, stats.individual_count
    );

    PipelineResult {
        paths,
        class_counts: counts,
        bounds,
        stats,
    }
}
