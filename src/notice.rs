//! Purpose: Define a stable, structured schema for non-fatal stderr notices.
//! Exports: `Notice`, `notice_json`, `decode_notice`.
//! Role: Shared contract helper for decode-quality diagnostics (degraded or empty decodes).
//! Invariants: Notices are non-fatal and never alter stdout payloads.
//! Invariants: JSON schema is stable once published; fields are additive-only.
use serde_json::{Map, Value, json};

use crate::api::{DecodeReport, DecodeStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: String,
    pub time: String,
    pub cmd: String,
    pub source: String,
    pub message: String,
    pub details: Map<String, Value>,
}

pub fn notice_json(notice: &Notice) -> Value {
    let mut inner = Map::new();
    inner.insert("kind".to_string(), json!(notice.kind));
    inner.insert("time".to_string(), json!(notice.time));
    inner.insert("cmd".to_string(), json!(notice.cmd));
    inner.insert("source".to_string(), json!(notice.source));
    inner.insert("message".to_string(), json!(notice.message));
    inner.insert("details".to_string(), Value::Object(notice.details.clone()));

    let mut outer = Map::new();
    outer.insert("notice".to_string(), Value::Object(inner));
    Value::Object(outer)
}

/// Build a notice for a decode that did not win on the strict tier; clean decodes yield `None`.
pub fn decode_notice(report: &DecodeReport, cmd: &str, source: &str, time: &str) -> Option<Notice> {
    let (kind, message) = match report.status {
        DecodeStatus::Clean => return None,
        DecodeStatus::Degraded => (
            "decode-degraded",
            format!("payload recovered by the {} tier", report.tier.label()),
        ),
        DecodeStatus::Empty => (
            "decode-empty",
            "no fields recoverable; placeholder record returned".to_string(),
        ),
    };

    let mut details = Map::new();
    details.insert("tier".to_string(), json!(report.tier.label()));
    if let Some(category) = report.strict_failure {
        details.insert("strict_failure".to_string(), json!(category));
    }

    Some(Notice {
        kind: kind.to_string(),
        time: time.to_string(),
        cmd: cmd.to_string(),
        source: source.to_string(),
        message,
        details,
    })
}

#[cfg(test)]
mod tests {
    use super::{Notice, decode_notice, notice_json};
    use crate::api::{DecodeReport, DecodeStatus, Tier};
    use serde_json::{Map, Value};

    #[test]
    fn notice_json_has_required_fields() {
        let mut details = Map::new();
        details.insert("tier".to_string(), Value::from("extracted"));

        let notice = Notice {
            kind: "decode-degraded".to_string(),
            time: "2026-02-01T00:00:00Z".to_string(),
            cmd: "ingest".to_string(),
            source: "response.json".to_string(),
            message: "payload recovered by the extracted tier".to_string(),
            details,
        };

        let value = notice_json(&notice);
        let obj = value
            .get("notice")
            .and_then(|v| v.as_object())
            .expect("notice object");

        assert_eq!(
            obj.get("kind").and_then(|v| v.as_str()),
            Some("decode-degraded")
        );
        assert_eq!(
            obj.get("time").and_then(|v| v.as_str()),
            Some("2026-02-01T00:00:00Z")
        );
        assert_eq!(obj.get("cmd").and_then(|v| v.as_str()), Some("ingest"));
        assert_eq!(
            obj.get("source").and_then(|v| v.as_str()),
            Some("response.json")
        );
        assert!(obj.get("details").and_then(|v| v.as_object()).is_some());
    }

    #[test]
    fn clean_decode_has_no_notice() {
        let report = DecodeReport {
            tier: Tier::Strict,
            status: DecodeStatus::Clean,
            strict_failure: None,
        };
        assert!(decode_notice(&report, "render", "-", "t").is_none());
    }

    #[test]
    fn degraded_and_empty_decodes_are_flagged() {
        let degraded = DecodeReport {
            tier: Tier::Sanitized,
            status: DecodeStatus::Degraded,
            strict_failure: Some("control-character"),
        };
        let notice = decode_notice(&degraded, "ingest", "-", "t").expect("notice");
        assert_eq!(notice.kind, "decode-degraded");
        assert_eq!(notice.details["strict_failure"], "control-character");

        let empty = DecodeReport {
            tier: Tier::Empty,
            status: DecodeStatus::Empty,
            strict_failure: Some("syntax"),
        };
        let notice = decode_notice(&empty, "render", "blob.json", "t").expect("notice");
        assert_eq!(notice.kind, "decode-empty");
        assert_eq!(notice.details["tier"], "empty");
    }
}
