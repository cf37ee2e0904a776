//! Configuration for pathdict.
//!
//! Holds the default path parsing settings and the output format used by the
//! command-line tool. Configuration is read from TOML; every field has a
//! default, so a partial file is fine.
//!
//! # Example
//!
//! ```
//! use pathdict::config::Config;
//! use pathdict::path::PathMode;
//!
//! let config = Config::default();
//! assert_eq!(config.separator, "/");
//! assert_eq!(config.mode, PathMode::Interpreted);
//!
//! let custom = Config::from_toml_str("separator = \".\"\nmode = \"literal\"").unwrap();
//! assert_eq!(custom.separator, ".");
//! assert_eq!(custom.mode, PathMode::Literal);
//! assert_eq!(custom.indent_size, 2);
//! ```

use crate::file::Format;
use crate::path::{PathExpr, PathMode, DEFAULT_SEPARATOR};
use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Configuration for handles created from it and for the CLI.
///
/// # Fields
///
/// * `separator` - String that splits path input into segments (default: "/")
/// * `mode` - "interpreted" or "literal" path parsing (default: "interpreted")
/// * `format` - Output format of the CLI, "json" or "yaml" (default: "json")
/// * `indent_size` - Spaces per indentation level for JSON output (default: 2)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_separator")]
    pub separator: String,

    #[serde(default)]
    pub mode: PathMode,

    #[serde(default)]
    pub format: Format,

    #[serde(default = "default_indent_size")]
    pub indent_size: usize,
}

fn default_separator() -> String {
    DEFAULT_SEPARATOR.to_string()
}

fn default_indent_size() -> usize {
    2
}

impl Default for Config {
    fn default() -> Self {
        Self {
            separator: default_separator(),
            mode: PathMode::default(),
            format: Format::default(),
            indent_size: default_indent_size(),
        }
    }
}

impl Config {
    /// Returns the path to the config file.
    ///
    /// Uses `~/.config/pathdict/config.toml` on all platforms.
    ///
    /// # Returns
    ///
    /// `None` when the home directory cannot be determined.
    pub fn config_path() -> Option<std::path::PathBuf> {
        dirs::home_dir().map(|mut path| {
            path.push(".config");
            path.push("pathdict");
            path.push("config.toml");
            path
        })
    }

    /// Loads configuration from the default config file.
    ///
    /// # Returns
    ///
    /// The parsed configuration, or `Config::default()` if the file doesn't
    /// exist or can't be read. A file that exists but doesn't parse is logged
    /// as a warning and also yields the defaults.
    pub fn load() -> Self {
        let config_path = match Self::config_path() {
            Some(path) => path,
            None => return Self::default(),
        };

        if !config_path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&config_path) {
            Ok(contents) => Self::from_toml_str(&contents).unwrap_or_else(|err| {
                tracing::warn!(path = %config_path.display(), error = %err, "ignoring invalid config");
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Parses configuration from TOML text.
    ///
    /// # Arguments
    ///
    /// * `contents` - TOML document; missing fields take their defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML or a field has the wrong
    /// type or an unknown variant (e.g. `mode = "sideways"`).
    pub fn from_toml_str(contents: &str) -> anyhow::Result<Self> {
        toml::from_str(contents).context("Failed to parse config")
    }

    /// Saves configuration to the default config file.
    ///
    /// Creates the config directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The home directory cannot be determined
    /// - The config directory cannot be created
    /// - Serializing or writing the file fails
    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, toml_string)?;

        Ok(())
    }

    /// The empty path carrying this configuration's parsing settings.
    ///
    /// # Examples
    ///
    /// ```
    /// use pathdict::config::Config;
    ///
    /// let config = Config { separator: ".".to_string(), ..Config::default() };
    /// let root = config.root_path();
    /// assert!(root.is_empty());
    /// assert_eq!(root.separator(), ".");
    /// ```
    pub fn root_path(&self) -> PathExpr {
        PathExpr::root(self.separator.clone(), self.mode)
    }
}
