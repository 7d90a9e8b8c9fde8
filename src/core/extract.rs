//! Purpose: Recover known fields from text that does not parse as a whole document.
//! Exports: `extract_fields`, `EXTRACTED_FIELDS`.
//! Role: Fourth decode tier; needs only each field's local span to be well-formed.
//! Invariants: The first textual match of `"<field>":` wins, even if it belongs to a nested object.
//! Invariants: List fields are read from the first bracketed span following the key; `]` inside quoted items does not end it.
//! Invariants: A list with no quoted items is not a recovered field.
use std::sync::OnceLock;

use regex::Regex;

use crate::core::fields::{self, FieldValue, FlatFieldSet};
use crate::core::sanitize::sanitize;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Shape {
    Text,
    List,
}

pub const EXTRACTED_FIELDS: &[&str] = &[
    fields::PROJECT_TITLE,
    fields::PROJECT_DESCRIPTION,
    fields::TITLE,
    fields::SUBTITLE,
    fields::AUTHOR,
    fields::EXCERPT,
    fields::CONTENT,
    fields::CATEGORY,
    fields::TAGS,
    fields::SUGGESTED_SECTIONS,
    fields::META_TITLE,
    fields::META_DESCRIPTION,
];

struct FieldPattern {
    name: &'static str,
    shape: Shape,
    regex: Regex,
}

fn shape_of(name: &str) -> Shape {
    if name == fields::TAGS || name == fields::SUGGESTED_SECTIONS {
        Shape::List
    } else {
        Shape::Text
    }
}

fn field_patterns() -> &'static [FieldPattern] {
    static PATTERNS: OnceLock<Vec<FieldPattern>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        EXTRACTED_FIELDS
            .iter()
            .map(|&name| {
                let shape = shape_of(name);
                let key = regex::escape(name);
                let pattern = match shape {
                    Shape::Text => format!(r#"(?s)"{key}"\s*:\s*"((?:[^"\\]|\\.)*)""#),
                    Shape::List => format!(
                        r#"(?s)"{key}"\s*:\s*\[((?:"(?:[^"\\]|\\.)*"|[^\]"])*)\]"#
                    ),
                };
                FieldPattern {
                    name,
                    shape,
                    regex: Regex::new(&pattern).expect("valid field pattern"),
                }
            })
            .collect()
    })
}

fn quoted_item_re() -> &'static Regex {
    static QUOTED_ITEM_RE: OnceLock<Regex> = OnceLock::new();
    QUOTED_ITEM_RE
        .get_or_init(|| Regex::new(r#"(?s)"((?:[^"\\]|\\.)*)""#).expect("valid item pattern"))
}

pub fn extract_fields(text: &str) -> FlatFieldSet {
    let mut found = FlatFieldSet::new();
    for pattern in field_patterns() {
        let Some(captures) = pattern.regex.captures(text) else {
            continue;
        };
        let Some(span) = captures.get(1) else {
            continue;
        };
        let value = match pattern.shape {
            Shape::Text => FieldValue::Text(unescape_span(span.as_str())),
            Shape::List => {
                let items: Vec<String> = quoted_item_re()
                    .captures_iter(span.as_str())
                    .filter_map(|item| item.get(1))
                    .map(|item| unescape_span(item.as_str()))
                    .collect();
                if items.is_empty() {
                    continue;
                }
                FieldValue::List(items)
            }
        };
        found.insert(pattern.name, value);
    }
    found
}

fn unescape_span(span: &str) -> String {
    let repaired = sanitize(&format!("\"{span}\""));
    match crate::json::parse::from_str::<String>(&repaired) {
        Ok(text) => text,
        Err(_) => span.replace("\\\"", "\"").replace("\\n", "\n"),
    }
}
