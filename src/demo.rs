//! Offline fallback dataset.
//!
//! Six individuals covering all six animal classes, each with a five-point
//! migration track through the first half of 2024. Used by the binary when
//! Movebank is unreachable and by tests that need a realistic batch.

use chrono::{TimeZone, Utc};

use crate::RawRecord;

fn record(
    latitude: f64,
    longitude: f64,
    (month, day, hour): (u32, u32, u32),
    individual_id: &str,
    study_label: &str,
    species_label: &str,
) -> RawRecord {
    RawRecord {
        latitude,
        longitude,
        timestamp: Utc.with_ymd_and_hms(2024, month, day, hour, 0, 0).unwrap(),
        individual_id: individual_id.to_string(),
        study_label: study_label.to_string(),
        species_label: species_label.to_string(),
    }
}

/// Demo tracking records: 6 individuals, 30 points, all classes represented.
pub fn demo_records() -> Vec<RawRecord> {
    let tern = |lat, lng, when| {
        record(lat, lng, when, "tern_001", "Arctic Tern Migration Study", "Arctic Tern")
    };
    let whale = |lat, lng, when| {
        record(lat, lng, when, "whale_001", "Gray Whale Tracking", "Gray Whale")
    };
    let turtle = |lat, lng, when| {
        record(lat, lng, when, "turtle_001", "Loggerhead Turtle Nesting", "Loggerhead Turtle")
    };
    let tuna = |lat, lng, when| {
        record(lat, lng, when, "tuna_001", "Atlantic Bluefin Tuna Survey", "Atlantic Bluefin Tuna")
    };
    let frog = |lat, lng, when| {
        record(lat, lng, when, "frog_001", "European Tree Frog Movements", "European Tree Frog")
    };
    let monarch = |lat, lng, when| {
        record(lat, lng, when, "monarch_001", "Monarch Butterfly Migration", "Monarch Butterfly")
    };

    vec![
        // Arctic Tern (bird), north Atlantic southbound
        tern(71.0, -8.0, (1, 15, 10)),
        tern(65.0, -18.0, (3, 1, 12)),
        tern(55.0, -25.0, (5, 15, 14)),
        tern(40.0, -35.0, (6, 1, 16)),
        tern(20.0, -45.0, (7, 15, 18)),
        // Gray Whale (mammal), Alaska to Baja
        whale(60.0, -165.0, (1, 15, 8)),
        whale(55.0, -155.0, (2, 15, 10)),
        whale(45.0, -125.0, (4, 1, 12)),
        whale(35.0, -120.0, (5, 15, 14)),
        whale(25.0, -115.0, (7, 15, 16)),
        // Loggerhead Turtle (reptile), western Atlantic
        turtle(30.0, -80.0, (2, 1, 9)),
        turtle(28.0, -75.0, (3, 15, 11)),
        turtle(25.0, -70.0, (5, 1, 13)),
        turtle(20.0, -65.0, (6, 10, 15)),
        turtle(15.0, -60.0, (7, 20, 17)),
        // Bluefin Tuna (fish), mid Atlantic
        tuna(45.0, -50.0, (1, 10, 8)),
        tuna(40.0, -45.0, (2, 20, 10)),
        tuna(35.0, -40.0, (4, 15, 12)),
        tuna(30.0, -35.0, (6, 5, 14)),
        tuna(25.0, -30.0, (7, 25, 16)),
        // European Tree Frog (amphibian), Low Countries
        frog(52.0, 5.0, (3, 1, 8)),
        frog(51.5, 4.5, (4, 1, 10)),
        frog(51.0, 4.0, (5, 1, 12)),
        frog(50.5, 3.5, (6, 1, 14)),
        frog(50.0, 3.0, (7, 1, 16)),
        // Monarch Butterfly (insect), central flyway
        monarch(50.0, -95.0, (2, 15, 8)),
        monarch(45.0, -90.0, (3, 30, 10)),
        monarch(40.0, -85.0, (5, 15, 12)),
        monarch(35.0, -100.0, (6, 20, 14)),
        monarch(25.0, -105.0, (7, 30, 16)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AnimalClass, ClassTable};

    #[test]
    fn test_demo_records_shape() {
        let records = demo_records();
        assert_eq!(records.len(), 30);
        assert!(records.iter().all(|r| r.is_valid()));
    }

    #[test]
    fn test_demo_records_cover_all_classes() {
        let table = ClassTable::default();
        let mut seen = [false; 7];

        for r in demo_records() {
            seen[table.classify(&r.study_label, &r.species_label).index()] = true;
        }

        for class in &AnimalClass::ALL[..6] {
            assert!(seen[class.index()], "missing class {}", class);
        }
        assert!(!seen[AnimalClass::Unknown.index()]);
    }
}
