//! Purpose: Regression coverage for parse-failure category mapping.
//! Exports: Integration tests only.
//! Role: Verify stable category labels reported when the strict decode tier fails.
//! Invariants: Category mapping remains deterministic for representative errors.
//! Invariants: Tests avoid payload leakage; assertions target category/hint text only.
//! Notes: Uses source include to exercise internal helper logic without widening API surface.

#[path = "../src/json/parse.rs"]
#[allow(dead_code)]
mod parse;

use parse::ParseFailureCategory;
use serde_json::Value;

#[test]
fn category_mapping_handles_syntax_and_truncation() {
    let syntax_err = parse::from_str::<Value>(r#"{"a":}"#).unwrap_err();
    assert_eq!(
        parse::categorize_error(&syntax_err),
        ParseFailureCategory::Syntax
    );

    let eof_err = parse::from_str::<Value>(r#"{"title": "cut"#).unwrap_err();
    assert_eq!(
        parse::categorize_error(&eof_err),
        ParseFailureCategory::Truncated
    );
}

#[test]
fn raw_control_character_is_its_own_category() {
    let err = parse::from_str::<Value>("{\"content\":\"Line1\nLine2\"}").unwrap_err();
    assert_eq!(
        parse::categorize_error(&err),
        ParseFailureCategory::ControlCharacter
    );
}

#[test]
fn category_mapping_handles_data_and_depth() {
    let data_err = parse::from_str::<String>("{}").unwrap_err();
    assert_eq!(
        parse::categorize_error(&data_err),
        ParseFailureCategory::Data
    );

    let depth = 256usize;
    let payload = format!("{}0{}", "[".repeat(depth), "]".repeat(depth));
    let depth_err = parse::from_str::<Value>(&payload).unwrap_err();
    assert_eq!(
        parse::categorize_error(&depth_err),
        ParseFailureCategory::DepthLimit
    );
}

#[test]
fn hint_contains_category_and_context() {
    let err = parse::from_str::<Value>("{\"a\":\"x\ty\"}").unwrap_err();
    let hint = parse::hint_for_error(&err, "test.context");
    assert!(hint.contains("parse category: control-character"));
    assert!(hint.contains("context: test.context"));
}

#[test]
fn unknown_category_fallback_is_stable() {
    assert_eq!(
        parse::categorize_message("opaque parser issue"),
        ParseFailureCategory::Unknown
    );
    assert_eq!(ParseFailureCategory::Shape.label(), "shape");
}
