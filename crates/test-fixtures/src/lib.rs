//! Test fixture loader for Syllabus golden datasets, plus scripted
//! collaborator fakes shared by integration tests across crates.

pub mod fakes;

use serde::de::DeserializeOwned;
use std::path::PathBuf;

use syllabus_core::models::{BasicInfo, Request, RetrievalFeatures};

/// Root directory of the test-fixtures crate.
fn fixtures_root() -> PathBuf {
    // Works from any crate in the workspace: walk up until a sibling
    // `test-fixtures` directory is visible.
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let mut path = PathBuf::from(&manifest_dir);

    if path.ends_with("test-fixtures") {
        return path;
    }
    while !path.join("test-fixtures").exists() {
        if !path.pop() {
            panic!(
                "Could not find test-fixtures directory from CARGO_MANIFEST_DIR={}",
                manifest_dir
            );
        }
    }
    path.join("test-fixtures")
}

/// Load and deserialize a JSON fixture file.
///
/// # Panics
/// Panics if the file doesn't exist or can't be deserialized.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let path = fixtures_root().join(relative_path);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
}

/// Load a fixture file as raw JSON Value.
pub fn load_fixture_value(relative_path: &str) -> serde_json::Value {
    load_fixture(relative_path)
}

/// Check that a fixture file exists.
pub fn fixture_exists(relative_path: &str) -> bool {
    fixtures_root().join(relative_path).exists()
}

/// List all JSON files in a fixture subdirectory, sorted by name.
pub fn list_fixtures(subdir: &str) -> Vec<PathBuf> {
    let dir = fixtures_root().join(subdir);
    if !dir.exists() {
        return Vec::new();
    }
    let mut files: Vec<PathBuf> = std::fs::read_dir(&dir)
        .unwrap_or_else(|e| panic!("Failed to read directory {}: {}", dir.display(), e))
        .filter_map(|entry| {
            let entry = entry.ok()?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                Some(path)
            } else {
                None
            }
        })
        .collect();
    files.sort();
    files
}

// ── Builders ──

/// Golden request with every basic-info field filled and no CP/ATP.
pub fn sample_request() -> Request {
    load_fixture("golden/requests/generation_request.json")
}

/// Golden request carrying both CP and ATP.
pub fn supplied_request() -> Request {
    load_fixture("golden/requests/supplied_request.json")
}

pub fn sample_basic_info() -> BasicInfo {
    sample_request().basic_info
}

/// Features whose top-k similarities all equal `mu_k`, with an explicit margin.
pub fn features_with(mu_k: f64, margin: f64) -> RetrievalFeatures {
    RetrievalFeatures {
        similarities: vec![mu_k; 5],
        margin: Some(margin),
        token_length: 8,
        entity_count: 1,
        specificity: 0.9,
        ..Default::default()
    }
}

/// High-quality retrieval: tight, diverse, well-separated hits with spans.
pub fn strong_features() -> RetrievalFeatures {
    load_fixture("golden/confidence/strong_features.json")
}
