//! Tests for variable-scope filtering

use indexmap::IndexMap;
use tplkit::{create_scope, ignored_scope_variables, Value, IGNORED_SCOPE_VARIABLES};

fn bindings(entries: &[(&str, &str)]) -> IndexMap<String, Value> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), Value::from(*v)))
        .collect()
}

// ============================================================
// Reserved Name Stripping
// ============================================================

#[test]
fn given_reserved_names_when_creating_scope_then_they_are_stripped() {
    let defined = bindings(&[("name", "x"), ("_SERVER", "host"), ("_POST", "body")]);

    let scope = create_scope(defined);

    assert_eq!(scope.len(), 1);
    assert_eq!(scope.get("name"), Some(&Value::from("x")));
    assert!(!scope.contains_key("_SERVER"));
    assert!(!scope.contains_key("_POST"));
}

#[test]
fn given_every_reserved_name_when_creating_scope_then_only_caller_names_survive() {
    let mut defined: IndexMap<String, Value> = IndexMap::new();
    for name in IGNORED_SCOPE_VARIABLES {
        defined.insert(name.to_string(), Value::Null);
    }
    defined.insert("keep".to_string(), Value::from(1i64));

    let scope = create_scope(defined);

    assert_eq!(scope.len(), 1);
    assert_eq!(scope.get("keep"), Some(&Value::from(1i64)));
}

#[test]
fn given_no_reserved_names_when_creating_scope_then_bindings_pass_unchanged() {
    let defined = bindings(&[("a", "1"), ("b", "2")]);

    let scope = create_scope(defined.clone());

    assert_eq!(scope, defined);
}

#[test]
fn given_interleaved_bindings_when_creating_scope_then_order_is_preserved() {
    let defined = bindings(&[("z", "1"), ("_GET", "q"), ("a", "2"), ("m", "3")]);

    let scope = create_scope(defined);

    let keys: Vec<_> = scope.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["z", "a", "m"]);
}

#[test]
fn given_engine_internal_names_when_creating_scope_then_they_are_stripped() {
    let defined = bindings(&[("__scope", "s"), ("__arguments", "a"), ("user", "u")]);

    let scope = create_scope(defined);

    let keys: Vec<_> = scope.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["user"]);
}

#[test]
fn given_non_value_bindings_when_creating_scope_then_filter_is_type_agnostic() {
    let mut defined: IndexMap<String, String> = IndexMap::new();
    defined.insert("path".to_string(), "/tmp".to_string());
    defined.insert("_ENV".to_string(), "leak".to_string());

    let scope = create_scope(defined);

    assert_eq!(scope.len(), 1);
    assert_eq!(scope.get("path").map(String::as_str), Some("/tmp"));
}

// ============================================================
// Reserved Set
// ============================================================

#[test]
fn given_reserved_set_then_superglobals_and_internals_are_present() {
    let set = ignored_scope_variables();

    assert!(set.contains("GLOBALS"));
    assert!(set.contains("_SESSION"));
    assert!(set.contains("__block"));
    assert_eq!(set.len(), IGNORED_SCOPE_VARIABLES.len());
}
