//! Client error taxonomy and backend error-body normalization.
//!
//! Three kinds of failure reach display code, and they stay distinct:
//! local validation (no request was issued), transport failure (no usable
//! response), and backend-reported errors (a response with an error
//! status). The backend reports errors as `{"detail": ...}` where `detail`
//! may be a plain string, a single validation object, or a list of
//! validation objects; [`normalize_detail`] folds all three shapes into one
//! message so display code never branches on the wire shape.
//!
//! A job that finishes with status `failed` is *not* an error value — it is
//! a terminal poll outcome (see [`crate::poller::PollOutcome`]).

use thiserror::Error;

/// Fallback shown when a response carries no usable error detail.
pub const GENERIC_ERROR: &str = "Request failed. Please try again.";

/// Failure of a single backend call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Rejected locally before any request was issued.
    #[error("{0}")]
    Validation(String),

    /// No usable response (connect failure, timeout, body decode). The
    /// user-facing message stays generic; the original detail is retained
    /// in the error source chain for diagnostics.
    #[error("no response from server")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with an error status. `message` has already
    /// been normalized from the response body.
    #[error("{message}")]
    Backend { status: u16, message: String },
}

impl ApiError {
    /// Status code of a backend-reported error, if that is what this is.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Backend { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Fold a `detail` payload into one displayable message.
///
/// Accepted shapes: a non-empty string, an object with a `msg` field, or a
/// list of such objects (messages joined with `". "`). Anything else is
/// `None` and the caller falls back to [`GENERIC_ERROR`].
pub fn normalize_detail(detail: &serde_json::Value) -> Option<String> {
    match detail {
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        serde_json::Value::Object(map) => map
            .get("msg")
            .and_then(|m| m.as_str())
            .map(|m| m.to_string()),
        serde_json::Value::Array(items) => {
            let msgs: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(|m| m.as_str()))
                .collect();
            if msgs.is_empty() {
                None
            } else {
                Some(msgs.join(". "))
            }
        }
        _ => None,
    }
}

/// Build a [`ApiError::Backend`] from a response status and raw body text.
pub fn backend_error(status: u16, body: &str) -> ApiError {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("detail").and_then(normalize_detail))
        .unwrap_or_else(|| GENERIC_ERROR.to_string());
    ApiError::Backend { status, message }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn string_detail_passes_through() {
        assert_eq!(
            normalize_detail(&json!("Email already registered")).as_deref(),
            Some("Email already registered")
        );
    }

    #[test]
    fn empty_string_detail_is_rejected() {
        assert_eq!(normalize_detail(&json!("")), None);
    }

    #[test]
    fn single_object_detail_uses_msg() {
        assert_eq!(
            normalize_detail(&json!({"msg": "field required", "loc": ["body", "email"]}))
                .as_deref(),
            Some("field required")
        );
    }

    #[test]
    fn list_detail_joins_messages() {
        let detail = json!([
            {"msg": "username too short", "loc": ["body", "username"]},
            {"msg": "email invalid", "loc": ["body", "email"]}
        ]);
        assert_eq!(
            normalize_detail(&detail).as_deref(),
            Some("username too short. email invalid")
        );
    }

    #[test]
    fn list_without_msgs_is_rejected() {
        assert_eq!(normalize_detail(&json!([{"loc": ["body"]}])), None);
        assert_eq!(normalize_detail(&json!([])), None);
    }

    #[test]
    fn backend_error_falls_back_on_garbage() {
        let err = backend_error(500, "<html>Internal Server Error</html>");
        assert_eq!(err.to_string(), GENERIC_ERROR);
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn backend_error_extracts_detail() {
        let err = backend_error(422, r#"{"detail": [{"msg": "a"}, {"msg": "b"}]}"#);
        assert_eq!(err.to_string(), "a. b");
    }

    #[test]
    fn backend_error_without_detail_is_generic() {
        let err = backend_error(502, r#"{"error": "bad gateway"}"#);
        assert_eq!(err.to_string(), GENERIC_ERROR);
    }
}
