//! Writing trees back out as JSON or YAML.

use super::Format;
use crate::config::Config;
use crate::document::node::Value;
use crate::document::tree::Tree;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Serializes `value` as text.
///
/// # Arguments
///
/// * `value` - Any value, including a scalar
/// * `format` - JSON or YAML
/// * `indent_size` - Spaces per level for JSON; YAML uses the serializer's own
///   layout
///
/// # Returns
///
/// The text, always ending in a newline. Opaque leaves are written as their
/// debug text.
///
/// # Errors
///
/// Returns an error if the serializer fails or the JSON output is not UTF-8.
pub fn to_string(value: &Value, format: Format, indent_size: usize) -> Result<String> {
    let mut text = match format {
        Format::Json => {
            let indent = " ".repeat(indent_size);
            let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
            let mut buffer = Vec::new();
            let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
            value
                .serialize(&mut serializer)
                .context("Failed to serialize JSON")?;
            String::from_utf8(buffer).context("Serialized JSON is not UTF-8")?
        }
        Format::Yaml => serde_yaml::to_string(value).context("Failed to serialize YAML")?,
    };

    if !text.ends_with('\n') {
        text.push('\n');
    }
    Ok(text)
}

/// Saves a tree to `path`.
///
/// # Arguments
///
/// * `path` - Target file
/// * `tree` - Tree whose whole root is written
/// * `config` - Supplies the fallback format and the JSON indentation
///
/// The format follows the file extension, falling back to `config.format`.
/// A `.gz` suffix compresses the output. The write goes to a temporary file
/// that is then renamed over the target, so the target is never partially
/// written.
///
/// # Examples
///
/// ```no_run
/// use pathdict::config::Config;
/// use pathdict::document::{Tree, Value};
/// use pathdict::file::saver::save_file;
///
/// let tree = Tree::new(Value::from(serde_json::json!({"a": 1}))).unwrap();
/// save_file("output.json", &tree, &Config::default()).unwrap();
/// ```
///
/// # Errors
///
/// This function will return an error if:
/// - Serialization fails
/// - Writing or compressing the temp file fails
/// - Renaming the temp file to the target fails
pub fn save_file<P: AsRef<Path>>(path: P, tree: &Tree, config: &Config) -> Result<()> {
    let path = path.as_ref();
    let format = Format::from_path(path).unwrap_or(config.format);
    let should_compress = path.to_string_lossy().ends_with(".gz");

    let text = to_string(&tree.borrow(), format, config.indent_size)?;
    debug!(path = %path.display(), ?format, compress = should_compress, "saving document");

    write_file_atomic(path, text.as_bytes(), should_compress)
}

fn write_file_atomic<P: AsRef<Path>>(path: P, data: &[u8], compress: bool) -> Result<()> {
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    let path = path.as_ref();
    let temp_path = path.with_extension("tmp");

    if compress {
        let file = fs::File::create(&temp_path).context("Failed to create temp file")?;
        let mut encoder = GzEncoder::new(file, Compression::default());
        encoder
            .write_all(data)
            .context("Failed to write compressed data")?;
        encoder.finish().context("Failed to finish compression")?;
    } else {
        fs::write(&temp_path, data).context("Failed to write temp file")?;
    }

    fs::rename(&temp_path, path).context("Failed to rename temp file")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_to_string_json_indent() {
        let value = Value::from(json!({"a": [1]}));
        let text = to_string(&value, Format::Json, 4).unwrap();
        assert_eq!(text, "{\n    \"a\": [\n        1\n    ]\n}\n");
    }

    #[test]
    fn test_to_string_keeps_key_order() {
        let value = Value::from(json!({"b": 1, "a": 2}));
        let text = to_string(&value, Format::Yaml, 2).unwrap();
        assert_eq!(text, "b: 1\na: 2\n");
    }

    #[test]
    fn test_write_file_atomic_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        write_file_atomic(&path, b"{}", false).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
        assert!(!dir.path().join("out.tmp").exists());
    }
}
