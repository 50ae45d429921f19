//! Call results — the uniform outcome handed back to the host.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::types::{Error, ErrorKind, TransportError};

/// Outcome of one tool call. `payload` is meaningful when `ok` is true,
/// `error_message` and `error_kind` when it is false.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallResult {
    pub ok: bool,
    pub payload: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
}

impl CallResult {
    pub fn success(payload: impl Into<String>) -> Self {
        Self {
            ok: true,
            payload: payload.into(),
            error_message: None,
            error_kind: None,
        }
    }

    pub fn failure(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            ok: false,
            payload: String::new(),
            error_message: Some(message.into()),
            error_kind: Some(kind),
        }
    }

    pub fn from_error(err: &Error) -> Self {
        Self::failure(err.error_kind(), err.to_string())
    }

    /// Convert a transport outcome. The backend payload is passed through
    /// unparsed; invalid UTF-8 sequences are replaced rather than rejected.
    pub fn wrap(outcome: std::result::Result<Bytes, TransportError>) -> Self {
        match outcome {
            Ok(bytes) => Self::success(String::from_utf8_lossy(&bytes).into_owned()),
            Err(err) => Self::from_error(&Error::Transport(err)),
        }
    }

    /// Text shown to the caller: the payload on success, the error otherwise.
    pub fn text(&self) -> &str {
        if self.ok {
            &self.payload
        } else {
            self.error_message.as_deref().unwrap_or("unknown error")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_success_passes_payload_through() {
        let body = r#"{"status":"success","data":"{\"id\":1}"}"#;
        let result = CallResult::wrap(Ok(Bytes::from(body)));
        assert!(result.ok);
        assert_eq!(result.payload, body);
        assert_eq!(result.error_message, None);
        assert_eq!(result.text(), body);
    }

    #[test]
    fn test_wrap_non_json_payload_is_not_rejected() {
        let result = CallResult::wrap(Ok(Bytes::from_static(b"<html>login</html>")));
        assert!(result.ok);
        assert_eq!(result.payload, "<html>login</html>");
    }

    #[test]
    fn test_wrap_transport_error() {
        let result = CallResult::wrap(Err(TransportError::Request(
            "connection refused".to_string(),
        )));
        assert!(!result.ok);
        assert_eq!(result.error_kind, Some(ErrorKind::Transport));
        assert_eq!(
            result.text(),
            "transport error: request failed: connection refused"
        );
    }

    #[test]
    fn test_wrap_cancellation() {
        let result = CallResult::wrap(Err(TransportError::Cancelled));
        assert_eq!(result.error_kind, Some(ErrorKind::Cancelled));
    }

    #[test]
    fn test_serialized_shape() {
        let value = serde_json::to_value(CallResult::failure(ErrorKind::UnknownTool, "unknown tool: x")).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "ok": false,
                "payload": "",
                "error_message": "unknown tool: x",
                "error_kind": "unknown_tool"
            })
        );
    }
}
