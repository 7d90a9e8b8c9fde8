//! Purpose: Orchestrate resolve → decode → project for the ingestion and read-only paths.
//! Exports: `Normalizer`, `Ingested`, `Rendered`, `DecodeReport`.
//! Role: The one seam callers use; owns defaults and emits tracing events.
//! Invariants: Empty bodies and missing envelopes are errors; bad payload text never is.
//! Invariants: Stateless between calls; a shared `Normalizer` is safe to use from many threads.
use serde::Serialize;
use tracing::{debug, warn};

use crate::core::config::NormalizeConfig;
use crate::core::decode::{DecodeStatus, Decoded, Decoder, Tier};
use crate::core::envelope;
use crate::core::error::{Error, ErrorKind};
use crate::core::project::{ContainerRecord, ContentRecord, ProjectionMode, Projector};
use crate::core::raw::RawResponse;
use crate::core::sanitize::{ControlCharSanitizer, Sanitizer};

/// Which tier produced the fields, for quality monitoring.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct DecodeReport {
    pub tier: Tier,
    pub status: DecodeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strict_failure: Option<&'static str>,
}

impl DecodeReport {
    fn of(decoded: &Decoded) -> Self {
        Self {
            tier: decoded.tier,
            status: decoded.status(),
            strict_failure: decoded.strict_failure.map(|category| category.label()),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct Ingested {
    pub container: ContainerRecord,
    pub content: ContentRecord,
    #[serde(rename = "decode")]
    pub report: DecodeReport,
}

#[derive(Clone, Debug, Serialize)]
pub struct Rendered {
    pub content: ContentRecord,
    #[serde(rename = "decode")]
    pub report: DecodeReport,
}

#[derive(Clone, Debug)]
pub struct Normalizer<S = ControlCharSanitizer> {
    decoder: Decoder<S>,
    projector: Projector,
}

impl Default for Normalizer<ControlCharSanitizer> {
    fn default() -> Self {
        Self::new(&NormalizeConfig::default())
    }
}

impl Normalizer<ControlCharSanitizer> {
    pub fn new(config: &NormalizeConfig) -> Self {
        Self::with_sanitizer(ControlCharSanitizer, config)
    }
}

impl<S: Sanitizer> Normalizer<S> {
    pub fn with_sanitizer(sanitizer: S, config: &NormalizeConfig) -> Self {
        Self {
            decoder: Decoder::with_sanitizer(sanitizer)
                .with_placeholder_title(config.placeholder_title.as_str()),
            projector: Projector::from(config),
        }
    }

    /// Ingest an upstream body as received over the wire.
    pub fn ingest_body(&self, body: &str) -> Result<Ingested, Error> {
        if body.trim().is_empty() {
            return Err(Error::new(ErrorKind::EmptyBody)
                .with_message("upstream response body is empty")
                .with_hint("The generation service returned nothing; retry the generation call."));
        }
        self.ingest(&RawResponse::from_body(body))
    }

    pub fn ingest(&self, raw: &RawResponse) -> Result<Ingested, Error> {
        let Some(candidate) = envelope::resolve(raw) else {
            warn!(shape = raw_shape(raw), "no text payload in upstream envelope");
            return Err(Error::new(ErrorKind::EnvelopeNotFound)
                .with_message("no text payload found in upstream response")
                .with_hint("The generation service returned an unexpected envelope; retry or inspect the raw response."));
        };

        let decoded = self.decoder.decode(candidate.as_str());
        let report = DecodeReport::of(&decoded);
        debug!(
            tier = report.tier.label(),
            status = report.status.label(),
            fields = decoded.fields.len(),
            "decoded ingestion candidate"
        );

        let (container, content) = self
            .projector
            .project(decoded.fields, ProjectionMode::Ingestion);
        let Some(container) = container else {
            return Err(Error::new(ErrorKind::Internal)
                .with_message("ingestion projection produced no container"));
        };
        Ok(Ingested {
            container,
            content,
            report,
        })
    }

    /// Re-decode a stored content blob for display; never mutates or fails.
    pub fn render(&self, stored: &str) -> Rendered {
        let decoded = self.decoder.decode(stored);
        let report = DecodeReport::of(&decoded);
        debug!(
            tier = report.tier.label(),
            status = report.status.label(),
            "decoded stored content"
        );
        let (_, content) = self
            .projector
            .project(decoded.fields, ProjectionMode::ReadOnly);
        Rendered { content, report }
    }
}

fn raw_shape(raw: &RawResponse) -> &'static str {
    match raw {
        RawResponse::Object(_) => "object",
        RawResponse::Array(_) => "array",
        RawResponse::String(_) => "string",
        RawResponse::Null => "null",
    }
}
