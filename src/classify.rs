//! Keyword-based species class classification.
//!
//! Classification is a fixed, ordered table of (class, color, keywords)
//! entries. The priority order is explicit — bird, mammal, reptile, fish,
//! amphibian, insect — so a label matching keywords from two classes (e.g.
//! "turtle" and "marine") always resolves the same way across runs. A label
//! matching nothing classifies as `Unknown`, which is a valid class, not an
//! error.
//!
//! ## Example
//! ```rust
//! use migration_map::{AnimalClass, ClassTable};
//!
//! let table = ClassTable::default();
//! assert_eq!(table.classify("Arctic Tern Migration Study", ""), AnimalClass::Bird);
//! assert_eq!(table.classify("", ""), AnimalClass::Unknown);
//! ```

use once_cell::sync::Lazy;

use crate::AnimalClass;

/// Display color for records that match no class.
pub const UNKNOWN_COLOR: &str = "#74b9ff";

/// One classification entry: a class, its display color and its keywords.
#[derive(Debug, Clone)]
pub struct ClassEntry {
    pub class: AnimalClass,
    /// Display color, "#rrggbb"
    pub color: String,
    /// Case-insensitive substrings that select this class
    pub keywords: Vec<String>,
}

impl ClassEntry {
    pub fn new(class: AnimalClass, color: &str, keywords: &[&str]) -> Self {
        Self {
            class,
            color: color.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// Ordered classification table.
///
/// Entries are tried in order and the first keyword hit wins, so the Vec
/// order IS the priority order. Constructed once at startup and passed
/// explicitly into the pipeline; alternate tables can be supplied for
/// testing or other taxonomies.
#[derive(Debug, Clone)]
pub struct ClassTable {
    entries: Vec<ClassEntry>,
}

static DEFAULT_TABLE: Lazy<ClassTable> = Lazy::new(|| {
    ClassTable::new(vec![
        ClassEntry::new(
            AnimalClass::Bird,
            "#ff6b6b",
            &[
                "bird", "avian", "eagle", "hawk", "falcon", "owl", "swan", "crane", "stork",
                "tern", "albatross", "petrel", "gull", "duck", "goose",
            ],
        ),
        ClassEntry::new(
            AnimalClass::Mammal,
            "#4ecdc4",
            &[
                "mammal", "whale", "dolphin", "seal", "bear", "wolf", "deer", "elk", "caribou",
                "moose", "bat", "elephant", "fox",
            ],
        ),
        ClassEntry::new(
            AnimalClass::Reptile,
            "#45b7d1",
            &["turtle", "snake", "lizard", "reptile", "crocodile", "iguana"],
        ),
        ClassEntry::new(
            AnimalClass::Fish,
            "#96ceb4",
            &["fish", "shark", "tuna", "salmon", "marine"],
        ),
        ClassEntry::new(
            AnimalClass::Amphibian,
            "#ffeaa7",
            &["frog", "toad", "salamander", "newt", "amphibian"],
        ),
        ClassEntry::new(
            AnimalClass::Insect,
            "#dda0dd",
            &["butterfly", "monarch", "bee", "moth", "dragonfly", "insect"],
        ),
    ])
});

impl ClassTable {
    /// Create a table from ordered entries.
    pub fn new(entries: Vec<ClassEntry>) -> Self {
        Self { entries }
    }

    /// Classify a record from its free-text study and species labels.
    ///
    /// Both labels are lower-cased and concatenated; the first entry (in
    /// priority order) with a keyword occurring as a substring wins.
    /// Empty or unmatched text yields [`AnimalClass::Unknown`]; this never
    /// fails.
    pub fn classify(&self, study_label: &str, species_label: &str) -> AnimalClass {
        let text = format!("{} {}", study_label, species_label).to_lowercase();

        for entry in &self.entries {
            if entry.keywords.iter().any(|k| text.contains(k.as_str())) {
                return entry.class;
            }
        }

        AnimalClass::Unknown
    }

    /// Display color for a class ("#rrggbb").
    pub fn color_for(&self, class: AnimalClass) -> &str {
        self.entries
            .iter()
            .find(|e| e.class == class)
            .map(|e| e.color.as_str())
            .unwrap_or(UNKNOWN_COLOR)
    }

    pub fn entries(&self) -> &[ClassEntry] {
        &self.entries
    }
}

impl Default for ClassTable {
    fn default() -> Self {
        DEFAULT_TABLE.clone()
    }
}

/// Well-known study-name patterns and the display species they imply.
const SPECIES_PATTERNS: [(&str, &str); 12] = [
    ("arctic tern", "Arctic Tern"),
    ("gray whale", "Gray Whale"),
    ("humpback whale", "Humpback Whale"),
    ("loggerhead", "Loggerhead Turtle"),
    ("bald eagle", "Bald Eagle"),
    ("golden eagle", "Golden Eagle"),
    ("brown bear", "Brown Bear"),
    ("polar bear", "Polar Bear"),
    ("caribou", "Caribou"),
    ("elk", "Elk"),
    ("white shark", "Great White Shark"),
    ("bluefin tuna", "Bluefin Tuna"),
];

/// Extract a display species name from a free-text study label.
///
/// Falls back to the first two words of the label, then to
/// "Unknown Species".
pub fn extract_species(study_label: &str) -> String {
    let lower = study_label.to_lowercase();
    for (pattern, species) in SPECIES_PATTERNS {
        if lower.contains(pattern) {
            return species.to_string();
        }
    }

    let words: Vec<&str> = study_label.split_whitespace().collect();
    if words.len() >= 2 {
        return format!("{} {}", words[0], words[1]);
    }

    "Unknown Species".to_string()
}
