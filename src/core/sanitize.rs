//! Purpose: Escape raw control characters that appear inside JSON string literals.
//! Exports: `Sanitizer`, `ControlCharSanitizer`, `sanitize`.
//! Role: Repair step used by the decoder after a strict parse fails.
//! Invariants: Characters outside string literals pass through unchanged (formatting whitespace survives).
//! Invariants: Idempotent; already-valid JSON text is returned unchanged.
//! Invariants: Single pass, O(n), one output buffer pre-sized to the input.

/// Text repair strategy applied between decode tiers.
pub trait Sanitizer {
    fn sanitize(&self, text: &str) -> String;
}

/// Production sanitizer: rewrites `\n`, `\r`, `\t` inside strings and drops other control codes.
#[derive(Clone, Copy, Debug, Default)]
pub struct ControlCharSanitizer;

impl Sanitizer for ControlCharSanitizer {
    fn sanitize(&self, text: &str) -> String {
        sanitize(text)
    }
}

/// A backslash inside a string escapes exactly the next kept character, so `\\"` closes the string.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum ScanState {
    Outside,
    Inside { escaped: bool },
}

pub fn sanitize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut state = ScanState::Outside;

    for ch in text.chars() {
        state = match state {
            ScanState::Outside => {
                out.push(ch);
                if ch == '"' {
                    ScanState::Inside { escaped: false }
                } else {
                    ScanState::Outside
                }
            }
            ScanState::Inside { .. } if (ch as u32) < 0x20 => {
                match ch {
                    '\n' => out.push_str("\\n"),
                    '\r' => out.push_str("\\r"),
                    '\t' => out.push_str("\\t"),
                    // Dropped; a pending backslash still applies to the next kept char.
                    _ => continue,
                }
                ScanState::Inside { escaped: false }
            }
            ScanState::Inside { escaped: true } => {
                out.push(ch);
                ScanState::Inside { escaped: false }
            }
            ScanState::Inside { escaped: false } => {
                out.push(ch);
                match ch {
                    '\\' => ScanState::Inside { escaped: true },
                    '"' => ScanState::Outside,
                    _ => ScanState::Inside { escaped: false },
                }
            }
        };
    }

    out
}
