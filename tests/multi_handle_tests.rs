use pathdict::document::{Number, Tree, Value};
use pathdict::handle::{GatherAs, Handle};
use pathdict::path::PathError;
use serde_json::json;

fn make_tree(value: serde_json::Value) -> Tree {
    Tree::new(Value::from(value)).unwrap()
}

fn users() -> Tree {
    make_tree(json!({"users": {"1": {"age": 22}, "2": {"age": 49}}}))
}

fn increment(value: Value) -> Value {
    match value {
        Value::Number(n) => Value::from(n.add(Number::Integer(1))),
        other => other,
    }
}

#[test]
fn test_one_wildcard_expands_per_key_in_order() {
    let mut h = Handle::new(&make_tree(json!({"c": 1, "a": 2, "b": 3})));
    let paths: Vec<String> = h
        .at("*")
        .many()
        .paths()
        .unwrap()
        .iter()
        .map(|p| p.to_string())
        .collect();
    assert_eq!(paths, vec!["c", "a", "b"]);
}

#[test]
fn test_wildcard_on_empty_map_matches_nothing() {
    let mut h = Handle::new(&make_tree(json!({"m": {}})));
    let m = h.at("m/*").many();
    assert!(m.paths().unwrap().is_empty());
    assert!(m.gather().unwrap().is_empty());
    assert_eq!(m.sum().unwrap(), Number::Integer(0));
}

#[test]
fn test_wildcard_through_missing_key_matches_nothing() {
    let mut h = Handle::new(&make_tree(json!({"m": {}})));
    assert!(h.at("absent/*").many().paths().unwrap().is_empty());
}

#[test]
fn test_wildcard_over_leaf_is_structural_error() {
    let mut h = Handle::new(&make_tree(json!({"m": 3})));
    assert!(matches!(
        h.at("m/*").many().paths(),
        Err(PathError::StructuralMismatch { .. })
    ));
}

#[test]
fn test_wildcard_over_sequence_uses_indices() {
    let mut h = Handle::new(&make_tree(json!({"l": [{"v": 1}, {"v": 2}]})));
    let m = h.at("l/*/v").many();
    let rendered: Vec<String> = m.paths().unwrap().iter().map(|p| p.to_string()).collect();
    assert_eq!(rendered, vec!["l/0/v", "l/1/v"]);
    assert_eq!(m.sum().unwrap(), Number::Integer(3));
}

#[test]
fn test_at_wildcard_keeps_handle_position() {
    let tree = users();
    let mut h = Handle::new(&tree);
    h.at("users/1").one().unwrap();

    let m = h.at("users/*/age").many();
    assert!(m.tree().ptr_eq(&tree));
    assert_eq!(h.path().keys(), vec!["users", "1"]);
}

#[test]
fn test_gather_then_map_in_place() {
    let tree = users();
    let mut h = Handle::new(&tree);

    let ages = h.at("users/*/age").many().gather().unwrap();
    assert_eq!(ages, vec![Value::from(22), Value::from(49)]);

    h.at("users/*/age").many().map(increment).unwrap();

    let ages = h.at("users/*/age").many().gather().unwrap();
    assert_eq!(ages, vec![Value::from(23), Value::from(50)]);
    assert_eq!(
        tree.snapshot(),
        Value::from(json!({"users": {"1": {"age": 23}, "2": {"age": 50}}}))
    );
}

#[test]
fn test_set_every_match() {
    let tree = users();
    let mut h = Handle::new(&tree);
    h.at("users/*/active").many().set(true).unwrap();
    assert_eq!(
        tree.snapshot(),
        Value::from(json!({"users": {
            "1": {"age": 22, "active": true},
            "2": {"age": 49, "active": true}
        }}))
    );
}

#[test]
fn test_multi_filter_is_detached() {
    let tree = users();
    let mut h = Handle::new(&tree);

    let adults = h
        .at("users/*/age")
        .many()
        .filter(|m| m.value().as_i64().unwrap_or(0) > 30, GatherAs::List, false)
        .unwrap();

    assert_eq!(adults.get().unwrap(), Some(Value::from(json!([49]))));
    assert!(!adults.tree().ptr_eq(&tree));
    assert_eq!(
        tree.snapshot(),
        Value::from(json!({"users": {"1": {"age": 22}, "2": {"age": 49}}}))
    );
}

#[test]
fn test_multi_filter_as_map_keeps_paths() {
    let mut h = Handle::new(&users());
    let young = h
        .at("users/*/age")
        .many()
        .filter(|m| m.value().as_i64().unwrap_or(0) < 30, GatherAs::Map, false)
        .unwrap();
    assert_eq!(
        young.get().unwrap(),
        Some(Value::from(json!({r#"["users","1","age"]"#: 22})))
    );
}

#[test]
fn test_gather_as_parses_from_str() {
    let mut h = Handle::new(&users());
    let shape: GatherAs = "dict".parse().unwrap();
    let gathered = h.at("users/*/age").many().gather_as(shape, false).unwrap();
    assert_eq!(
        gathered,
        Value::from(json!({
            r#"["users","1","age"]"#: 22,
            r#"["users","2","age"]"#: 49
        }))
    );
    assert!("tuple".parse::<GatherAs>().is_err());
}

#[test]
fn test_gather_paths_pairs() {
    let mut h = Handle::new(&users());
    let pairs = h.at("users/*/age").many().gather_paths().unwrap();
    let keys: Vec<Vec<String>> = pairs.iter().map(|(p, _)| p.keys()).collect();
    assert_eq!(
        keys,
        vec![vec!["users", "1", "age"], vec!["users", "2", "age"]]
    );
}

#[test]
fn test_multi_reduce() {
    let mut h = Handle::new(&users());
    let total = h
        .at("users/*/age")
        .many()
        .reduce(
            |m, acc| acc + m.value().as_i64().unwrap_or(0),
            0,
            GatherAs::List,
            false,
        )
        .unwrap();
    assert_eq!(total, 71);
}

#[test]
fn test_concrete_selection_fans_out_to_itself() {
    let mut h = Handle::new(&users());
    let m = h.at("users/1/age").many();
    assert_eq!(m.gather().unwrap(), vec![Value::from(22)]);
}

#[test]
fn test_one_on_wildcard_is_invalid_argument() {
    let mut h = Handle::new(&users());
    assert!(matches!(
        h.at("users/*").one(),
        Err(PathError::InvalidArgument { .. })
    ));
}

#[test]
fn test_wildcard_over_empty_key_never_touches_parent() {
    let tree = make_tree(json!({"m": {"": 1, "a": 2}}));
    let mut h = Handle::new(&tree);

    let paths = h.at("m/*").many().paths().unwrap();
    let keys: Vec<Vec<String>> = paths.iter().map(|p| p.keys()).collect();
    assert_eq!(keys, vec![vec!["m", ""], vec!["m", "a"]]);

    h.at("m/*").many().map(increment).unwrap();
    assert_eq!(tree.snapshot(), Value::from(json!({"m": {"": 2, "a": 3}})));
}

#[test]
fn test_gather_handle_over_map_shape() {
    let mut h = Handle::new(&users());
    let mut gathered = h.at("users/*/age").many().gather_handle(GatherAs::Map, false).unwrap();
    assert_eq!(gathered.len().unwrap(), 2);
    assert_eq!(
        gathered
            .at_with(r#"["users","2","age"]"#, None, Some(pathdict::path::PathMode::Literal))
            .one()
            .unwrap()
            .get()
            .unwrap(),
        Some(Value::from(49))
    );
}
