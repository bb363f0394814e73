//! Integration tests for map search, statistics and JSON export

use bloks_core::tree::map_entries;
use bloks_core::{
    find_map, parse, to_json, to_json_string, ErrorCategory, Parser, ParserError, TreeStats, Value,
};
use pretty_assertions::assert_eq;
use serde_json::json;

fn basic(input: &str) -> Value {
    Parser::new().with_basic_processors().parse(input).unwrap()
}

const SCREEN: &str = r#"(bk.action.screen,
    (bk.action.map.Make,
        (bk.action.array.Make, "a", "b"),
        (bk.action.array.Make, 1, 2)),
    (#content,
        (bk.action.map.Make,
            (bk.action.array.Make, "title", "b"),
            (bk.action.array.Make, "Inbox", 99))))"#;

// ============================================================================
// Map Search Tests
// ============================================================================

#[test]
fn test_find_map_on_processed_tree() {
    let tree = basic(SCREEN);
    let map = find_map("b", &tree).unwrap();
    assert_eq!(map.get("b"), Some(&&Value::Number(2.0)));
    assert_eq!(map.get("a"), Some(&&Value::Number(1.0)));
    assert_eq!(map.len(), 2);
}

#[test]
fn test_find_map_ignores_unprocessed_map_make() {
    let tree = parse(
        r#"(root, (bk.action.map.Make, (bk.action.array.Make, "a", "b"), (bk.action.array.Make, 1, 2)))"#,
    )
    .unwrap();
    assert_eq!(find_map("b", &tree), None);
    assert_eq!(find_map("b", &parse(SCREEN).unwrap()), None);
}

#[test]
fn test_find_map_matches_map_name_directly() {
    let tree = parse(r#"(root, (map, (keys, "b"), (values, 2)))"#).unwrap();
    let map = find_map("b", &tree).unwrap();
    assert_eq!(map.get("b"), Some(&&Value::Number(2.0)));
}

#[test]
fn test_find_map_absent_key() {
    let tree = basic(SCREEN);
    assert!(find_map("missing", &tree).is_none());
}

#[test]
fn test_find_map_descends_into_children() {
    let tree = basic(SCREEN);
    let map = find_map("title", &tree).unwrap();
    assert_eq!(map.get("title"), Some(&&Value::from("Inbox")));
    assert_eq!(map.get("b"), Some(&&Value::Number(99.0)));
}

#[test]
fn test_find_map_prefers_outer_map() {
    let tree = basic(
        r#"(bk.action.map.Make,
            (bk.action.array.Make, "k", "inner"),
            (bk.action.array.Make, "outer",
                (bk.action.map.Make,
                    (bk.action.array.Make, "k"),
                    (bk.action.array.Make, "nested"))))"#,
    );
    let map = find_map("k", &tree).unwrap();
    assert_eq!(map.get("k"), Some(&&Value::from("outer")));
}

#[test]
fn test_find_map_skips_non_string_keys() {
    let tree = basic(
        r#"(bk.action.map.Make, (bk.action.array.Make, 1, "x", null), (bk.action.array.Make, "one", "ex", "nil"))"#,
    );
    let map = find_map("x", &tree).unwrap();
    assert_eq!(map.len(), 1);
    assert_eq!(map.get("x"), Some(&&Value::from("ex")));
}

#[test]
fn test_find_map_requires_equal_lengths() {
    let tree = basic(r#"(bk.action.map.Make, (bk.action.array.Make, "a", "b"), (bk.action.array.Make, 1))"#);
    assert!(find_map("a", &tree).is_none());
}

#[test]
fn test_find_map_requires_two_blok_args() {
    let tree = basic(r#"(bk.action.map.Make, "a", 1)"#);
    assert!(find_map("a", &tree).is_none());

    // A malformed map node is still searched through.
    let tree = basic(
        r#"(bk.action.map.Make,
            (bk.action.map.Make, (bk.action.array.Make, "a"), (bk.action.array.Make, 1)),
            (bk.action.array.Make), (bk.action.array.Make))"#,
    );
    let map = find_map("a", &tree).unwrap();
    assert_eq!(map.get("a"), Some(&&Value::Number(1.0)));
}

#[test]
fn test_find_map_on_scalar_root() {
    assert!(find_map("a", &Value::from("a")).is_none());
}

#[test]
fn test_map_entries_duplicate_key_last_wins() {
    let tree = basic(r#"(bk.action.map.Make, (bk.action.array.Make, "a", "a"), (bk.action.array.Make, 1, 2))"#);
    let map = map_entries(tree.as_blok().unwrap()).unwrap();
    assert_eq!(map.get("a"), Some(&&Value::Number(2.0)));
}

// ============================================================================
// Statistics Tests
// ============================================================================

#[test]
fn test_tree_stats() {
    let tree = parse(r#"(a, (#b, "s", 1, true), (a, null), 2)"#).unwrap();
    let stats = TreeStats::collect(&tree);
    assert_eq!(stats.bloks, 3);
    assert_eq!(stats.local_bloks, 1);
    assert_eq!(stats.strings, 1);
    assert_eq!(stats.numbers, 2);
    assert_eq!(stats.bools, 1);
    assert_eq!(stats.nulls, 1);
    assert_eq!(stats.max_depth, 2);
    assert_eq!(stats.total(), 8);
    assert_eq!(stats.names.get("a"), Some(&2));
    assert_eq!(stats.names.get("b"), Some(&1));
}

#[test]
fn test_tree_stats_scalar() {
    let stats = TreeStats::collect(&Value::Null);
    assert_eq!(stats.max_depth, 0);
    assert_eq!(stats.total(), 1);
}

// ============================================================================
// JSON Export Tests
// ============================================================================

#[test]
fn test_to_json_structure() {
    let tree = parse(r#"(a, 1, "x", null, true, (#b, 2.5))"#).unwrap();
    assert_eq!(
        to_json(&tree).unwrap(),
        json!(["a", 1, "x", null, true, ["b", 2.5]])
    );
}

#[test]
fn test_to_json_drops_local_flag() {
    assert_eq!(
        to_json(&parse("(#a, 1)").unwrap()).unwrap(),
        to_json(&parse("(a, 1)").unwrap()).unwrap()
    );
}

#[test]
fn test_to_json_scalars() {
    assert_eq!(to_json(&Value::Null).unwrap(), json!(null));
    assert_eq!(to_json(&Value::Bool(false)).unwrap(), json!(false));
    assert_eq!(to_json(&Value::from("q")).unwrap(), json!("q"));
}

#[test]
fn test_to_json_rejects_non_finite_numbers() {
    let tree = parse("(a, 1e999, -1e999)").unwrap();
    let err = to_json_string(&tree, false).unwrap_err();
    assert!(matches!(err, ParserError::Internal { .. }), "{:?}", err);
    assert_eq!(err.category(), ErrorCategory::Internal);
    assert_eq!(err.offset(), None);

    assert!(matches!(
        to_json(&Value::Number(f64::NAN)),
        Err(ParserError::Internal { .. })
    ));
    assert!(to_json_string(&Value::blok("a", vec![Value::Number(f64::NEG_INFINITY)]), true).is_err());
}

#[test]
fn test_to_json_integral_numbers() {
    let tree = parse("(a, 42, -7, 0, 2.5, 1e3)").unwrap();
    assert_eq!(
        to_json_string(&tree, false).unwrap(),
        r#"["a",42,-7,0,2.5,1000]"#
    );
}

#[test]
fn test_to_json_string_compact() {
    let tree = parse(r#"(a, 1, "x\ny")"#).unwrap();
    assert_eq!(to_json_string(&tree, false).unwrap(), r#"["a",1,"x\ny"]"#);
}

#[test]
fn test_to_json_string_pretty() {
    let tree = parse("(a, (b))").unwrap();
    assert_eq!(
        to_json_string(&tree, true).unwrap(),
        "[\n  \"a\",\n  [\n    \"b\"\n  ]\n]"
    );
}

#[test]
fn test_to_json_of_processed_tree() {
    let tree = basic(r#"(bk.action.array.Make, (bk.action.bool.Const, "0"), (bk.action.i32.Const, 3))"#);
    assert_eq!(to_json(&tree).unwrap(), json!(["array", false, 3]));
}
