// src/models.rs
use crate::errors::{PlaygroundError, Result};
use percent_encoding::percent_decode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Source location of a reported error. `(0, 0)` when the verifier gave none.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Position {
    pub line: u32,
    #[serde(rename = "char")]
    pub column: u32,
}

impl Position {
    pub const ORIGIN: Position = Position { line: 0, column: 0 };

    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct VerificationError {
    pub message: String,
    #[serde(rename = "Position")]
    pub position: Position,
}

/// The one result written back for a `/verify` request.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct VerificationResponse {
    pub verified: bool,
    pub timeout: bool,
    pub errors: Vec<VerificationError>,
    /// Seconds.
    pub duration: f64,
    /// Passed through untouched from the verifier's `stats.json`.
    pub stats: serde_json::Value,
}

impl VerificationResponse {
    /// Verdict derived from a list of errors; duration and stats are
    /// stamped later by the runner.
    pub fn from_errors(errors: Vec<VerificationError>) -> Self {
        Self {
            verified: errors.is_empty(),
            timeout: false,
            errors,
            duration: 0.0,
            stats: serde_json::Value::Null,
        }
    }

    pub fn timed_out(limit: Duration) -> Self {
        Self {
            verified: false,
            timeout: true,
            errors: Vec::new(),
            duration: limit.as_secs_f64(),
            stats: serde_json::Value::Null,
        }
    }

    pub fn with_run_data(mut self, elapsed: Duration, stats: serde_json::Value) -> Self {
        self.duration = elapsed.as_secs_f64();
        self.stats = stats;
        self
    }

    /// Encode to the JSON wire format.
    pub fn encode(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}

/// Form fields accepted by `POST /verify`.
///
/// Decoded by hand rather than through `serde_urlencoded` so that `body`
/// keeps its exact bytes, valid UTF-8 or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyForm {
    pub body: Vec<u8>,
    /// Reserved for selecting a verifier version; currently ignored.
    pub version: Option<String>,
    /// Reserved for extra verifier flags; currently ignored.
    pub options: Option<String>,
}

impl VerifyForm {
    /// Parse an `application/x-www-form-urlencoded` payload. The first
    /// occurrence of a field wins; unknown fields are ignored.
    pub fn parse(payload: &[u8]) -> Result<Self> {
        let mut body = None;
        let mut version = None;
        let mut options = None;

        for pair in payload.split(|b| *b == b'&').filter(|p| !p.is_empty()) {
            let (key, value) = match pair.iter().position(|b| *b == b'=') {
                Some(idx) => (&pair[..idx], &pair[idx + 1..]),
                None => (pair, &[][..]),
            };

            match &*String::from_utf8_lossy(&form_decode(key)) {
                "body" if body.is_none() => body = Some(form_decode(value)),
                "version" if version.is_none() => {
                    version = Some(String::from_utf8_lossy(&form_decode(value)).into_owned())
                }
                "options" if options.is_none() => {
                    options = Some(String::from_utf8_lossy(&form_decode(value)).into_owned())
                }
                _ => {}
            }
        }

        let body = body.ok_or_else(|| PlaygroundError::InvalidRequest("missing field `body`".to_string()))?;
        Ok(Self { body, version, options })
    }
}

fn form_decode(raw: &[u8]) -> Vec<u8> {
    let spaced: Vec<u8> = raw.iter().map(|b| if *b == b'+' { b' ' } else { *b }).collect();
    percent_decode(&spaced).collect()
}

#[derive(Debug, Clone)]
pub struct VerificationRequest {
    pub source: Vec<u8>,
    pub options: Option<String>,
}

impl VerificationRequest {
    pub fn new(source: impl Into<Vec<u8>>) -> Self {
        Self { source: source.into(), options: None }
    }
}

impl From<VerifyForm> for VerificationRequest {
    fn from(form: VerifyForm) -> Self {
        Self {
            source: form.body,
            options: form.options,
        }
    }
}
