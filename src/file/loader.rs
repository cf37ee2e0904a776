//! Loading trees from JSON or YAML.
//!
//! Files are parsed by extension (`.json`, `.yaml`, `.yml`, optionally with a
//! trailing `.gz`). Files without a known extension and stdin are tried as
//! JSON first, then YAML. Gzipped stdin is detected by its magic bytes.

use super::Format;
use crate::document::node::Value;
use crate::document::tree::Tree;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::debug;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Loads and parses a document from the filesystem.
///
/// # Arguments
///
/// * `path` - File to read. `.json`, `.yaml` and `.yml` pick the parser (also
///   under a trailing `.gz`); any other name is tried as JSON, then YAML.
///
/// # Returns
///
/// A new [`Tree`] owning the parsed document.
///
/// # Examples
///
/// ```no_run
/// use pathdict::file::loader::load_file;
///
/// let tree = load_file("users.yaml").unwrap();
/// ```
///
/// # Errors
///
/// Fails if the file cannot be read or decompressed, does not parse, or its
/// root is not a map or sequence.
pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Tree> {
    let path_ref = path.as_ref();

    let is_gzipped = path_ref
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext == "gz")
        .unwrap_or(false);

    let content = if is_gzipped {
        read_gzipped_file(path_ref)?
    } else {
        fs::read_to_string(path_ref)
            .with_context(|| format!("Failed to read {}", path_ref.display()))?
    };

    match Format::from_path(path_ref) {
        Some(format) => {
            debug!(path = %path_ref.display(), ?format, "loading document");
            parse_str(&content, format)
        }
        None => parse_guessing(&content)
            .with_context(|| format!("Failed to parse {}", path_ref.display())),
    }
}

/// Loads and parses a document from standard input.
///
/// Reads until EOF. Input starting with the gzip magic bytes is decompressed
/// first; the text is then tried as JSON, then YAML.
///
/// # Errors
///
/// Fails if stdin cannot be read, is not valid UTF-8 (after decompression),
/// or is neither JSON nor YAML.
pub fn load_from_stdin() -> Result<Tree> {
    use std::io::{self, Read};

    let mut buffer = Vec::new();
    io::stdin()
        .read_to_end(&mut buffer)
        .context("Failed to read from stdin")?;

    let content = if buffer.starts_with(&GZIP_MAGIC) {
        decompress_gzip_bytes(&buffer)?
    } else {
        String::from_utf8(buffer).context("Invalid UTF-8 in stdin")?
    };

    parse_guessing(&content).context("Failed to parse stdin")
}

/// Parses `content` in the given format into a tree.
///
/// # Arguments
///
/// * `content` - Document text
/// * `format` - Parser to use; there is no fallback
///
/// # Errors
///
/// Returns an error if the text does not parse, or if its root is a scalar
/// rather than a map or sequence.
pub fn parse_str(content: &str, format: Format) -> Result<Tree> {
    let value = match format {
        Format::Json => {
            let parsed: serde_json::Value =
                serde_json::from_str(content).context("Failed to parse JSON")?;
            Value::from(parsed)
        }
        Format::Yaml => {
            let parsed: serde_yaml::Value =
                serde_yaml::from_str(content).context("Failed to parse YAML")?;
            Value::from(parsed)
        }
    };
    Ok(Tree::new(value)?)
}

/// Tries JSON, then YAML.
fn parse_guessing(content: &str) -> Result<Tree> {
    if let Ok(tree) = parse_str(content, Format::Json) {
        return Ok(tree);
    }
    parse_str(content, Format::Yaml).context("input is neither valid JSON nor valid YAML")
}

fn read_gzipped_file<P: AsRef<Path>>(path: P) -> Result<String> {
    use flate2::read::GzDecoder;
    use std::io::Read;

    let file = fs::File::open(path).context("Failed to open gzipped file")?;
    let mut decoder = GzDecoder::new(file);
    let mut content = String::new();
    decoder
        .read_to_string(&mut content)
        .context("Failed to decompress gzipped file - file may be corrupted")?;
    Ok(content)
}

fn decompress_gzip_bytes(bytes: &[u8]) -> Result<String> {
    use flate2::read::GzDecoder;
    use std::io::Read;

    let mut decoder = GzDecoder::new(bytes);
    let mut content = String::new();
    decoder
        .read_to_string(&mut content)
        .context("Failed to decompress gzipped stdin")?;
    Ok(content)
}
