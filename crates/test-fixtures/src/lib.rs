//! Test fixture loader for recorded navigation sequences.
//!
//! Sequences live in `sequences/*.json` next to this crate. Each file is an
//! [`AccessSequence`]: the keys a user visited in order, plus the
//! predictions expected after learning from them.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One recorded navigation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequenceStep {
    pub key: String,
    #[serde(default = "default_context")]
    pub context: String,
}

fn default_context() -> String {
    "navigation".to_string()
}

/// A prediction the sequence should produce.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpectedPrediction {
    pub key: String,
    pub confidence: f64,
}

/// A `predict(from, top_n, min_confidence)` call and its expected result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpectedQuery {
    pub from: String,
    pub top_n: usize,
    pub min_confidence: f64,
    pub predictions: Vec<ExpectedPrediction>,
}

/// A named navigation sequence with expectations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessSequence {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub steps: Vec<SequenceStep>,
    #[serde(default)]
    pub expected: Vec<ExpectedQuery>,
}

impl AccessSequence {
    pub fn keys(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.key.as_str()).collect()
    }
}

/// Root directory of the fixture data.
fn fixtures_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

fn read_json<T: DeserializeOwned>(path: &Path) -> T {
    let raw = std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("cannot read fixture {}: {e}", path.display()));
    serde_json::from_str(&raw)
        .unwrap_or_else(|e| panic!("malformed fixture {}: {e}", path.display()))
}

/// Load and deserialize a JSON fixture, relative to the crate root.
///
/// # Panics
/// Panics if the file is missing or does not match `T`.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    read_json(&fixtures_root().join(relative_path))
}

/// Load `sequences/<name>.json`.
pub fn load_sequence(name: &str) -> AccessSequence {
    load_fixture(&format!("sequences/{name}.json"))
}

/// Check that a fixture file exists.
pub fn fixture_exists(relative_path: &str) -> bool {
    fixtures_root().join(relative_path).exists()
}

/// JSON files directly under `subdir`, sorted. Empty when `subdir` is missing.
pub fn list_fixtures(subdir: &str) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(fixtures_root().join(subdir)) else {
        return Vec::new();
    };
    let mut files: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();
    files
}

/// Every sequence under `sequences/`.
pub fn all_sequences() -> Vec<AccessSequence> {
    list_fixtures("sequences")
        .iter()
        .map(|path| read_json(path))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_files_exist() {
        for f in [
            "sequences/alternating.json",
            "sequences/hub_and_spoke.json",
            "sequences/tie_break.json",
            "sequences/dashboard_session.json",
        ] {
            assert!(fixture_exists(f), "Missing fixture: {}", f);
        }
    }

    #[test]
    fn all_sequences_parse_and_are_non_empty() {
        let sequences = all_sequences();
        assert_eq!(sequences.len(), 4);
        for seq in &sequences {
            assert!(!seq.steps.is_empty(), "{} has no steps", seq.name);
            assert!(!seq.expected.is_empty(), "{} has no expectations", seq.name);
        }
    }

    #[test]
    fn missing_context_defaults_to_navigation() {
        let seq = load_sequence("alternating");
        assert!(seq.steps.iter().all(|s| s.context == "navigation"));
    }
}
