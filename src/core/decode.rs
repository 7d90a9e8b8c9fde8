//! Purpose: Decode candidate text into a flat field set through ordered fallback tiers.
//! Exports: `Tier`, `DecodeStatus`, `Decoded`, `Decoder`, `decode`.
//! Role: Third pipeline stage; never fails, always yields a best-effort field set.
//! Invariants: Tiers run strictly in order; a later tier runs only when every earlier tier failed.
//! Invariants: The sanitizer is not invoked when the strict parse succeeds.
//! Invariants: The empty tier yields exactly one field: the placeholder title.
//! Notes: Which tier won is returned as data; logging is the caller's decision.
use serde::Serialize;
use serde_json::Value;

use crate::core::config::DEFAULT_PLACEHOLDER_TITLE;
use crate::core::extract::extract_fields;
use crate::core::fields::{self, FlatFieldSet};
use crate::core::sanitize::{ControlCharSanitizer, Sanitizer};
use crate::json::parse::{self, ParseFailureCategory};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tier {
    Strict,
    Sanitized,
    DoubleEncoded,
    Extracted,
    Empty,
}

impl Tier {
    pub fn label(self) -> &'static str {
        match self {
            Tier::Strict => "strict",
            Tier::Sanitized => "sanitized",
            Tier::DoubleEncoded => "double-encoded",
            Tier::Extracted => "extracted",
            Tier::Empty => "empty",
        }
    }

    pub fn status(self) -> DecodeStatus {
        match self {
            Tier::Strict => DecodeStatus::Clean,
            Tier::Sanitized | Tier::DoubleEncoded | Tier::Extracted => DecodeStatus::Degraded,
            Tier::Empty => DecodeStatus::Empty,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DecodeStatus {
    Clean,
    Degraded,
    Empty,
}

impl DecodeStatus {
    pub fn label(self) -> &'static str {
        match self {
            DecodeStatus::Clean => "clean",
            DecodeStatus::Degraded => "degraded",
            DecodeStatus::Empty => "empty",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Decoded {
    pub fields: FlatFieldSet,
    pub tier: Tier,
    /// Why the strict parse was rejected; `None` when it won.
    pub strict_failure: Option<ParseFailureCategory>,
}

impl Decoded {
    pub fn status(&self) -> DecodeStatus {
        self.tier.status()
    }
}

#[derive(Clone, Debug)]
pub struct Decoder<S = ControlCharSanitizer> {
    sanitizer: S,
    placeholder_title: String,
}

impl Default for Decoder<ControlCharSanitizer> {
    fn default() -> Self {
        Self::with_sanitizer(ControlCharSanitizer)
    }
}

impl<S: Sanitizer> Decoder<S> {
    pub fn with_sanitizer(sanitizer: S) -> Self {
        Self {
            sanitizer,
            placeholder_title: DEFAULT_PLACEHOLDER_TITLE.to_string(),
        }
    }

    pub fn with_placeholder_title(mut self, title: impl Into<String>) -> Self {
        self.placeholder_title = title.into();
        self
    }

    pub fn sanitizer(&self) -> &S {
        &self.sanitizer
    }

    pub fn decode(&self, candidate: &str) -> Decoded {
        let strict_failure = match parse_object(candidate) {
            Ok(fields) => {
                return Decoded {
                    fields,
                    tier: Tier::Strict,
                    strict_failure: None,
                };
            }
            Err(category) => Some(category),
        };

        let degraded = |fields, tier| Decoded {
            fields,
            tier,
            strict_failure,
        };

        if let Ok(fields) = parse_object(&self.sanitizer.sanitize(candidate)) {
            return degraded(fields, Tier::Sanitized);
        }

        if let Some(fields) = self.unwrap_double_encoded(candidate) {
            return degraded(fields, Tier::DoubleEncoded);
        }

        let extracted = extract_fields(candidate);
        if !extracted.is_empty() {
            return degraded(extracted, Tier::Extracted);
        }

        let mut placeholder = FlatFieldSet::new();
        placeholder.insert(fields::TITLE, self.placeholder_title.as_str());
        degraded(placeholder, Tier::Empty)
    }

    fn unwrap_double_encoded(&self, candidate: &str) -> Option<FlatFieldSet> {
        let trimmed = candidate.trim();
        if trimmed.len() < 2 || !trimmed.starts_with('"') || !trimmed.ends_with('"') {
            return None;
        }
        let inner = parse::from_str::<String>(trimmed)
            .or_else(|_| parse::from_str::<String>(&self.sanitizer.sanitize(trimmed)))
            .ok()?;
        parse_object(&inner)
            .or_else(|_| parse_object(&self.sanitizer.sanitize(&inner)))
            .ok()
    }
}

/// Decode with the production sanitizer and default placeholder.
pub fn decode(candidate: &str) -> Decoded {
    Decoder::default().decode(candidate)
}

fn parse_object(text: &str) -> Result<FlatFieldSet, ParseFailureCategory> {
    match parse::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Ok(FlatFieldSet::from_object(&map)),
        Ok(_) => Err(ParseFailureCategory::Shape),
        Err(err) => Err(parse::categorize_error(&err)),
    }
}
