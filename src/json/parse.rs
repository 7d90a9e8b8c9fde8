//! Purpose: Provide the internal JSON decode entrypoint and parse-failure categories.
//! Exports: `from_str`, `ParseFailureCategory`, `categorize_error`, `categorize_message`, `hint_for_error`.
//! Role: Parser boundary so decode tiers share one strict parser and one diagnostic vocabulary.
//! Invariants: Decoding is strict serde_json; repair happens in callers, never here.
//! Invariants: Category labels are stable strings used in reports and notices.
//! Notes: Kept free of crate-internal imports so tests can include it by path.

use serde::de::DeserializeOwned;

pub(crate) fn from_str<T: DeserializeOwned>(input: &str) -> Result<T, serde_json::Error> {
    serde_json::from_str(input)
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ParseFailureCategory {
    Syntax,
    ControlCharacter,
    Truncated,
    Data,
    DepthLimit,
    Io,
    /// Parsed, but not a JSON object.
    Shape,
    Unknown,
}

impl ParseFailureCategory {
    pub fn label(self) -> &'static str {
        match self {
            ParseFailureCategory::Syntax => "syntax",
            ParseFailureCategory::ControlCharacter => "control-character",
            ParseFailureCategory::Truncated => "truncated",
            ParseFailureCategory::Data => "data",
            ParseFailureCategory::DepthLimit => "depth-limit",
            ParseFailureCategory::Io => "io",
            ParseFailureCategory::Shape => "shape",
            ParseFailureCategory::Unknown => "unknown",
        }
    }
}

pub fn categorize_error(err: &serde_json::Error) -> ParseFailureCategory {
    use serde_json::error::Category;
    match err.classify() {
        Category::Eof => ParseFailureCategory::Truncated,
        Category::Data => ParseFailureCategory::Data,
        Category::Io => ParseFailureCategory::Io,
        Category::Syntax => match categorize_message(&err.to_string()) {
            ParseFailureCategory::Unknown => ParseFailureCategory::Syntax,
            other => other,
        },
    }
}

pub fn categorize_message(message: &str) -> ParseFailureCategory {
    let lower = message.to_ascii_lowercase();
    if lower.contains("control character") {
        ParseFailureCategory::ControlCharacter
    } else if lower.contains("recursion limit") {
        ParseFailureCategory::DepthLimit
    } else if lower.contains("eof while parsing") {
        ParseFailureCategory::Truncated
    } else {
        ParseFailureCategory::Unknown
    }
}

pub fn hint_for_error(err: &serde_json::Error, context: &str) -> String {
    format!(
        "parse category: {}; context: {context}",
        categorize_error(err).label()
    )
}
