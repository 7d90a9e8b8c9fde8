//! Purpose: Define the stable public Rust API boundary for the normalization pipeline.
//! Exports: Pipeline stages, record types, and the `Normalizer` orchestrator.
//! Role: Public, additive-only surface used by the CLI, the HTTP front end, and embedders.
//! Invariants: Callers reach pipeline internals only through these re-exports.
//! Invariants: Every exported function is pure apart from `tracing` events.

mod pipeline;

pub use crate::core::config::{
    DEFAULT_AUTHOR, DEFAULT_PLACEHOLDER_TITLE, DEFAULT_UNTITLED_PROJECT_TITLE, NormalizeConfig,
};
pub use crate::core::decode::{DecodeStatus, Decoded, Decoder, Tier, decode};
pub use crate::core::envelope::{CandidateText, resolve};
#[doc(hidden)]
pub use crate::core::error::to_exit_code;
pub use crate::core::error::{Error, ErrorKind};
pub use crate::core::extract::{EXTRACTED_FIELDS, extract_fields};
pub use crate::core::fields::{FieldValue, FlatFieldSet};
pub use crate::core::project::{
    ContainerRecord, ContentRecord, ProjectionMode, Projector, project,
};
pub use crate::core::raw::RawResponse;
pub use crate::core::sanitize::{ControlCharSanitizer, Sanitizer, sanitize};
pub use crate::json::parse::ParseFailureCategory;
pub use pipeline::{DecodeReport, Ingested, Normalizer, Rendered};
