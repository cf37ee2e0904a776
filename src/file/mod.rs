//! Loading trees from JSON/YAML and writing them back.

pub mod loader;
pub mod saver;

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Text format of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Json,
    Yaml,
}

impl Format {
    /// Guesses the format from a file name, looking through a `.gz` suffix.
    ///
    /// - `data.json` → Json
    /// - `data.yml.gz` → Yaml
    /// - `data.txt` → None
    ///
    /// # Returns
    ///
    /// `None` for any other extension; callers then fall back to guessing
    /// (loading) or to the configured format (saving).
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let path_str = path.as_ref().to_string_lossy();
        let base = path_str.strip_suffix(".gz").unwrap_or(&path_str);

        if base.ends_with(".json") {
            Some(Format::Json)
        } else if base.ends_with(".yaml") || base.ends_with(".yml") {
            Some(Format::Yaml)
        } else {
            None
        }
    }
}
