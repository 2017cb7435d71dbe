//! Per-individual path aggregation.
//!
//! Groups annotated records by individual id and orders each group
//! chronologically, producing one [`IndividualPath`] per tracked animal.
//! Output order is the first-seen order of individual ids in the input, so
//! legends and rendering stay deterministic across runs.

use std::collections::HashMap;

use crate::{AnimalClass, AnnotatedRecord, ClassCounts, ClassTable, IndividualPath};

/// Group annotated records into per-individual migration paths.
///
/// - One path per distinct `individual_id`, in first-seen input order.
/// - Records within a path are stable-sorted ascending by timestamp, so
///   equal timestamps keep their input order.
/// - The path's class is the majority class among its records; ties fall to
///   the class of the chronologically earliest record.
/// - A single-record path is valid (a marker with no line segment), and an
///   empty input yields an empty Vec, not an error.
pub fn aggregate(records: Vec<AnnotatedRecord>, table: &ClassTable) -> Vec<IndividualPath> {
    let mut order: Vec<String> = Vec::new();
    let mut by_individual: HashMap<String, Vec<AnnotatedRecord>> = HashMap::new();

    for record in records {
        if !by_individual.contains_key(&record.individual_id) {
            order.push(record.individual_id.clone());
        }
        by_individual
            .entry(record.individual_id.clone())
            .or_default()
            .push(record);
    }

    order
        .into_iter()
        .map(|individual_id| {
            let mut group = by_individual
                .remove(&individual_id)
                .unwrap_or_default();
            group.sort_by_key(|r| r.timestamp);

            let animal_class = majority_class(&group);
            let species = group
                .first()
                .map(|r| r.species.clone())
                .unwrap_or_default();

            IndividualPath {
                individual_id,
                animal_class,
                species,
                base_color: table.color_for(animal_class).to_string(),
                point_count: group.len() as u32,
                records: group,
            }
        })
        .collect()
}

/// Majority class of a chronologically sorted group.
///
/// When two classes tie on count, the earliest record whose class holds the
/// maximum count wins.
fn majority_class(sorted: &[AnnotatedRecord]) -> AnimalClass {
    let mut counts = [0u32; 7];
    for record in sorted {
        counts[record.animal_class.index()] += 1;
    }
    let max = counts.iter().max().copied().unwrap_or(0);

    sorted
        .iter()
        .find(|r| counts[r.animal_class.index()] == max)
        .map(|r| r.animal_class)
        .unwrap_or(AnimalClass::Unknown)
}

/// Per-class counts of individuals (not points) for the legend.
pub fn class_counts(paths: &[IndividualPath]) -> ClassCounts {
    let mut counts = ClassCounts::default();
    for path in paths {
        counts.add(path.animal_class);
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn ts(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, day, hour, 0, 0).unwrap()
    }

    fn record(id: &str, class: AnimalClass, timestamp: DateTime<Utc>, lat: f64) -> AnnotatedRecord {
        AnnotatedRecord {
            latitude: lat,
            longitude: -30.0,
            timestamp,
            individual_id: id.to_string(),
            species: "Gray Whale".to_string(),
            animal_class: class,
            intensity: 0.8,
            display_color: "#7eded8".to_string(),
            base_color: "#4ecdc4".to_string(),
        }
    }

    #[test]
    fn test_empty_input() {
        let paths = aggregate(vec![], &ClassTable::default());
        assert!(paths.is_empty());

        let counts = class_counts(&paths);
        for class in AnimalClass::ALL {
            assert_eq!(counts.get(class), 0);
        }
    }

    #[test]
    fn test_out_of_order_records_are_sorted() {
        let records = vec![
            record("whale_001", AnimalClass::Mammal, ts(3, 0), 45.0),
            record("whale_001", AnimalClass::Mammal, ts(1, 0), 55.0),
            record("whale_001", AnimalClass::Mammal, ts(2, 0), 50.0),
        ];

        let paths = aggregate(records, &ClassTable::default());
        assert_eq!(paths.len(), 1);

        let path = &paths[0];
        assert_eq!(path.point_count, 3);
        assert_eq!(path.records[0].timestamp, ts(1, 0));
        assert_eq!(path.records[1].timestamp, ts(2, 0));
        assert_eq!(path.records[2].timestamp, ts(3, 0));
    }

    #[test]
    fn test_sort_is_stable_on_equal_timestamps() {
        let records = vec![
            record("whale_001", AnimalClass::Mammal, ts(1, 0), 1.0),
            record("whale_001", AnimalClass::Mammal, ts(1, 0), 2.0),
            record("whale_001", AnimalClass::Mammal, ts(1, 0), 3.0),
        ];

        let paths = aggregate(records, &ClassTable::default());
        let lats: Vec<f64> = paths[0].records.iter().map(|r| r.latitude).collect();
        assert_eq!(lats, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_first_seen_order_is_preserved() {
        let records = vec![
            record("A", AnimalClass::Bird, ts(5, 0), 10.0),
            record("B", AnimalClass::Fish, ts(1, 0), 20.0),
            record("A", AnimalClass::Bird, ts(2, 0), 11.0),
        ];

        let paths = aggregate(records, &ClassTable::default());
        assert_eq!(paths.len(), 2);
        assert_eq!(paths[0].individual_id, "A");
        assert_eq!(paths[1].individual_id, "B");
    }

    #[test]
    fn test_single_record_path() {
        let records = vec![record("tern_001", AnimalClass::Bird, ts(1, 0), 71.0)];
        let paths = aggregate(records, &ClassTable::default());

        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].point_count, 1);
        assert_eq!(paths[0].animal_class, AnimalClass::Bird);
    }

    #[test]
    fn test_majority_class_wins() {
        let records = vec![
            record("x", AnimalClass::Fish, ts(1, 0), 1.0),
            record("x", AnimalClass::Mammal, ts(2, 0), 2.0),
            record("x", AnimalClass::Mammal, ts(3, 0), 3.0),
        ];

        let paths = aggregate(records, &ClassTable::default());
        assert_eq!(paths[0].animal_class, AnimalClass::Mammal);
        assert_eq!(paths[0].base_color, "#4ecdc4");
    }

    #[test]
    fn test_majority_tie_falls_to_earliest_record() {
        // Fish appears first chronologically even though it is supplied last
        let records = vec![
            record("x", AnimalClass::Mammal, ts(2, 0), 1.0),
            record("x", AnimalClass::Mammal, ts(4, 0), 2.0),
            record("x", AnimalClass::Fish, ts(1, 0), 3.0),
            record("x", AnimalClass::Fish, ts(3, 0), 4.0),
        ];

        let paths = aggregate(records, &ClassTable::default());
        assert_eq!(paths[0].animal_class, AnimalClass::Fish);
    }

    #[test]
    fn test_class_counts_count_individuals() {
        let records = vec![
            record("a", AnimalClass::Bird, ts(1, 0), 1.0),
            record("a", AnimalClass::Bird, ts(2, 0), 2.0),
            record("b", AnimalClass::Bird, ts(1, 0), 3.0),
            record("c", AnimalClass::Unknown, ts(1, 0), 4.0),
        ];

        let paths = aggregate(records, &ClassTable::default());
        let counts = class_counts(&paths);

        assert_eq!(counts.get(AnimalClass::Bird), 2);
        assert_eq!(counts.get(AnimalClass::Unknown), 1);
        assert_eq!(counts.total(), 3);
    }
}
