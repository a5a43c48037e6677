//! # Decision codes returned to the engine.
//!
//! Every Problem-class callback has a per-event decision table: the sink
//! answers with a short literal string, the adapter decodes it into a
//! typed decision, and the engine obeys it. Unrecognized answers are
//! logged and mapped to that event's documented default, never silently
//! escalated.
//!
//! ## Decision tables
//! ```text
//! transfer / commit / script problem:
//!     ""  or "R" → Retry        "C" → Abort        "I" → Ignore
//!
//! media change:
//!     ""  → Retry               "I" → IgnoreId     "C" → Abort
//!     "E" → Eject               "S" → Ignore
//!     any other non-empty string → ChangeUrl(url) if it parses as a URL,
//!                                  otherwise Retry
//! ```

use std::collections::BTreeMap;

use tracing::warn;

use crate::value::Value;

/// Decision for transfer, commit, scan-db and script problems.
///
/// The engine default differs per channel and is supplied by the caller
/// of [`ProblemResponse::decode`]; see the report traits (for example
/// [`InstallReport`](crate::InstallReport)) for the documented
/// per-channel defaults.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProblemResponse {
    /// Try the failed step again.
    Retry,
    /// Abort the whole operation.
    Abort,
    /// Skip the failed item and continue.
    Ignore,
}

impl ProblemResponse {
    /// Decodes a sink answer against the shared problem table.
    ///
    /// `""` and `"R"` map to `Retry`, `"C"` to `Abort`, `"I"` to `Ignore`.
    /// Anything else is logged and replaced by `default`.
    pub fn decode(answer: &str, default: ProblemResponse) -> ProblemResponse {
        match answer {
            "" | "R" => ProblemResponse::Retry,
            "C" => ProblemResponse::Abort,
            "I" => ProblemResponse::Ignore,
            other => {
                warn!(answer = other, ?default, "unrecognized problem answer; using default");
                default
            }
        }
    }
}

/// Decision for a media-change request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MediaChangeDecision {
    /// Retry with the same medium (engine default).
    Retry,
    /// Abort the operation.
    Abort,
    /// Eject the medium and ask again.
    Eject,
    /// Skip the affected item.
    Ignore,
    /// Skip everything that lives on the requested medium id.
    IgnoreId,
    /// Retry from a different location.
    ChangeUrl(String),
}

impl Default for MediaChangeDecision {
    /// The engine default when no handler is active: `Retry`.
    fn default() -> Self {
        MediaChangeDecision::Retry
    }
}

impl MediaChangeDecision {
    /// Decodes a sink answer against the media-change table.
    ///
    /// Any non-empty answer outside the literal codes is treated as a
    /// replacement URL; an answer that does not look like a URL falls
    /// back to `Retry` (logged).
    pub fn decode(answer: &str) -> MediaChangeDecision {
        match answer {
            "" => MediaChangeDecision::Retry,
            "I" => MediaChangeDecision::IgnoreId,
            "C" => MediaChangeDecision::Abort,
            "E" => MediaChangeDecision::Eject,
            "S" => MediaChangeDecision::Ignore,
            other if looks_like_url(other) => MediaChangeDecision::ChangeUrl(other.to_owned()),
            other => {
                warn!(answer = other, "media-change answer is neither a code nor a URL; retrying");
                MediaChangeDecision::Retry
            }
        }
    }
}

/// Minimal URL shape check: `scheme "://" rest` with a non-empty scheme
/// of `[A-Za-z0-9+.-]` and a non-empty remainder. The bridge forwards the
/// string as-is; full validation belongs to the engine's media layer.
fn looks_like_url(s: &str) -> bool {
    match s.split_once("://") {
        Some((scheme, rest)) => {
            !scheme.is_empty()
                && !rest.is_empty()
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    }
}

/// Answer to an authentication request.
///
/// Decoded from a sink map with keys `username`, `password` and
/// `continue`. Missing or wrong-typed keys fall back to `""` / `false`
/// and are logged.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthAnswer {
    pub username: String,
    pub password: String,
    /// Whether the engine should proceed with these credentials
    /// (map key `continue`).
    pub proceed: bool,
}

impl AuthAnswer {
    /// Decodes the sink's answer map. Field-level fallbacks are applied
    /// independently, so one bad key does not discard the others.
    pub fn decode(map: &BTreeMap<String, Value>) -> AuthAnswer {
        AuthAnswer {
            username: str_field(map, "username"),
            password: str_field(map, "password"),
            proceed: bool_field(map, "continue"),
        }
    }
}

fn str_field(map: &BTreeMap<String, Value>, key: &str) -> String {
    match map.get(key) {
        Some(Value::Str(s)) => s.clone(),
        Some(other) => {
            warn!(key, actual = other.tag(), "authentication field has wrong type; using \"\"");
            String::new()
        }
        None => {
            warn!(key, "authentication field missing; using \"\"");
            String::new()
        }
    }
}

fn bool_field(map: &BTreeMap<String, Value>, key: &str) -> bool {
    match map.get(key) {
        Some(Value::Bool(b)) => *b,
        Some(other) => {
            warn!(key, actual = other.tag(), "authentication field has wrong type; using false");
            false
        }
        None => {
            warn!(key, "authentication field missing; using false");
            false
        }
    }
}
