use pathdict::config::Config;
use pathdict::document::{Tree, Value};
use pathdict::file::Format;
use pathdict::handle::Handle;
use pathdict::path::PathMode;
use serde_json::json;

#[test]
fn test_config_defaults() {
    let config = Config::default();

    assert_eq!(config.separator, "/");
    assert_eq!(config.mode, PathMode::Interpreted);
    assert_eq!(config.format, Format::Json);
    assert_eq!(config.indent_size, 2);
}

#[test]
fn test_partial_toml_fills_defaults() {
    let config = Config::from_toml_str("format = \"yaml\"").unwrap();
    assert_eq!(config.format, Format::Yaml);
    assert_eq!(config.separator, "/");
    assert_eq!(config.mode, PathMode::Interpreted);
}

#[test]
fn test_invalid_toml_is_error() {
    assert!(Config::from_toml_str("mode = \"sideways\"").is_err());
    assert!(Config::from_toml_str("indent_size = \"wide\"").is_err());
}

#[test]
fn test_config_path_location() {
    if let Some(path) = Config::config_path() {
        assert!(path.ends_with(".config/pathdict/config.toml"));
    }
}

#[test]
fn test_handle_with_config_uses_separator() {
    let tree = Tree::new(Value::from(json!({"a": {"b": 1}, "c/d": 2}))).unwrap();
    let config = Config::from_toml_str("separator = \".\"").unwrap();
    let mut handle = Handle::with_config(&tree, &config);

    assert_eq!(handle.at("a.b").one().unwrap().get().unwrap(), Some(Value::from(1)));
    assert_eq!(handle.at("c/d").one().unwrap().get().unwrap(), Some(Value::from(2)));
}

#[test]
fn test_handle_with_literal_config() {
    let tree = Tree::new(Value::from(json!({"a/*": 1}))).unwrap();
    let config = Config {
        mode: PathMode::Literal,
        ..Default::default()
    };
    let mut handle = Handle::with_config(&tree, &config);

    let selection = handle.at("a/*");
    assert!(!selection.is_many());
    assert_eq!(selection.one().unwrap().get().unwrap(), Some(Value::from(1)));
}
