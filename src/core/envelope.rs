//! Purpose: Locate the single text payload inside an upstream response envelope.
//! Exports: `CandidateText`, `resolve`.
//! Role: First pipeline stage; turns an untyped `RawResponse` into decodable text.
//! Invariants: A returned candidate is non-empty after trimming; absence is `None`, never a fabricated string.
//! Invariants: Arrays are scanned in original order and the first acceptable match wins (no backtracking).
//! Notes: Chunks without a `type` discriminator are still accepted when they carry text.
use std::fmt;

use serde_json::{Map, Value};

use crate::core::raw::RawResponse;

const TEXT_CHUNK_TYPES: &[&str] = &["output_text", "text"];

/// Extracted payload text, not yet validated as a structured document.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CandidateText(String);

impl CandidateText {
    pub fn new(text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            None
        } else {
            Some(Self(text))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CandidateText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn resolve(raw: &RawResponse) -> Option<CandidateText> {
    match raw {
        RawResponse::Array(items) => resolve_list(items),
        RawResponse::Object(map) => resolve_object(map),
        RawResponse::String(text) => accept(text),
        RawResponse::Null => None,
    }
}

fn resolve_list(items: &[Value]) -> Option<CandidateText> {
    match items.first()? {
        Value::Object(first) => resolve_first_item(first),
        Value::String(text) => accept(text),
        _ => None,
    }
}

fn resolve_first_item(item: &Map<String, Value>) -> Option<CandidateText> {
    if let Some(Value::Array(output)) = item.get("output") {
        if let Some(found) = scan_output(output) {
            return Some(found);
        }
    }

    match item.get("content") {
        Some(Value::Array(chunks)) => {
            if let Some(found) = scan_chunks(chunks) {
                return Some(found);
            }
        }
        Some(Value::String(text)) => {
            if let Some(found) = accept(text) {
                return Some(found);
            }
        }
        _ => {}
    }

    direct_text(item)
}

fn resolve_object(map: &Map<String, Value>) -> Option<CandidateText> {
    match map.get("output") {
        Some(Value::String(text)) => {
            if let Some(found) = accept(text) {
                return Some(found);
            }
        }
        Some(Value::Array(output)) => {
            if let Some(found) = scan_output(output) {
                return Some(found);
            }
        }
        _ => {}
    }

    // Last resort: a bare `content` string or object. Direct text and chunk
    // lists are only honoured on the first list element.
    match map.get("content") {
        Some(Value::String(text)) => accept(text),
        Some(Value::Object(inner)) => serde_json::to_string(inner)
            .ok()
            .and_then(CandidateText::new),
        _ => None,
    }
}

/// Items carrying a `content` chunk list win over items carrying direct text.
fn scan_output(output: &[Value]) -> Option<CandidateText> {
    let from_chunks = output.iter().find_map(|item| match item.get("content") {
        Some(Value::Array(chunks)) => scan_chunks(chunks),
        _ => None,
    });
    if from_chunks.is_some() {
        return from_chunks;
    }
    output
        .iter()
        .filter_map(Value::as_object)
        .find_map(direct_text)
}

fn scan_chunks(chunks: &[Value]) -> Option<CandidateText> {
    chunks.iter().filter_map(Value::as_object).find_map(text_chunk)
}

fn text_chunk(chunk: &Map<String, Value>) -> Option<CandidateText> {
    match chunk.get("type") {
        None | Some(Value::Null) => {}
        Some(Value::String(kind)) if TEXT_CHUNK_TYPES.contains(&kind.as_str()) => {}
        Some(_) => return None,
    }
    direct_text(chunk)
}

fn direct_text(map: &Map<String, Value>) -> Option<CandidateText> {
    match map.get("text")? {
        Value::String(text) => accept(text),
        // {"text": {"value": "..."}}
        Value::Object(inner) => match inner.get("value") {
            Some(Value::String(text)) => accept(text),
            _ => None,
        },
        _ => None,
    }
}

fn accept(text: &str) -> Option<CandidateText> {
    CandidateText::new(text)
}
