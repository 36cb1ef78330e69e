//! JSON fixture loader.
//!
//! Loads recorded upstream payloads and other golden files for tests.

use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Load a JSON fixture relative to the manifest dir of the crate under test.
///
/// # Example
/// ```no_run
/// use mixology_testing::fixture::Fixture;
/// let val = Fixture::load("tests/fixtures/margarita.json");
/// ```
pub struct Fixture;

impl Fixture {
    fn path(relative_path: &str) -> PathBuf {
        std::env::var("CARGO_MANIFEST_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| std::env::current_dir().unwrap())
            .join(relative_path)
    }

    /// Load and parse a fixture file.
    ///
    /// Panics if the file is missing or invalid JSON.
    pub fn load(relative_path: &str) -> Value {
        let full_path = Self::path(relative_path);
        let contents = std::fs::read_to_string(&full_path)
            .unwrap_or_else(|e| panic!("fixture not found at {}: {}", full_path.display(), e));
        serde_json::from_str(&contents)
            .unwrap_or_else(|e| panic!("invalid JSON in fixture {}: {}", relative_path, e))
    }

    /// Load a fixture and deserialize it into `T`.
    pub fn load_as<T: DeserializeOwned>(relative_path: &str) -> T {
        serde_json::from_value(Self::load(relative_path))
            .unwrap_or_else(|e| panic!("fixture {} does not match type: {}", relative_path, e))
    }
}
