//! Error types for the concierge
//!
//! Failures are mapped onto the channel's `{"error": ...}` frame.
//! Messages are sanitized first, since provider errors can echo request
//! details back to us.

use crate::llm::provider::LlmError;
use crate::transport::frames::OutboundFrame;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Frame text for inbound frames that carry no usable `message`
pub const NO_MESSAGE_PROVIDED: &str = "No message provided";

/// Frame text for inbound frames that are not JSON at all
pub const INVALID_JSON_FRAME: &str = "Invalid JSON frame";

/// Main error type for concierge operations
#[derive(Debug, Error)]
pub enum ConciergeError {
    #[error("LLM provider error: {0}")]
    Llm(#[from] LlmError),

    #[error("Invalid frame: {message}")]
    InvalidFrame { message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("Transport error: {message}")]
    Transport { message: String },
}

impl ConciergeError {
    /// Convert to the error frame sent back over the channel
    pub fn to_error_frame(&self) -> OutboundFrame {
        let message = match self {
            ConciergeError::InvalidFrame { message } => message.clone(),
            other => other.to_string(),
        };

        OutboundFrame::error(sanitize_error_message(&message))
    }

    /// Create invalid frame error
    pub fn invalid_frame<S: Into<String>>(message: S) -> Self {
        Self::InvalidFrame {
            message: message.into(),
        }
    }

    /// Create transport error
    pub fn transport<S: Into<String>>(message: S) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }
}

static SECRET_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(password|token|key|secret)[=:]\s*\S+").expect("secret pattern is valid")
});

static BEARER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)bearer\s+\S+").expect("bearer pattern is valid"));

static SENSITIVE_PATH_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"/[a-zA-Z0-9._/-]+/(secrets?|\.ssh|\.aws|\.config)/[a-zA-Z0-9._/-]+")
        .expect("path pattern is valid")
});

const MAX_ERROR_MESSAGE_LEN: usize = 500;

/// Sanitize error messages before they leave the process
pub fn sanitize_error_message(message: &str) -> String {
    let sanitized = SECRET_PATTERN.replace_all(message, "${1}=***");
    let sanitized = BEARER_PATTERN.replace_all(&sanitized, "Bearer ***");
    let mut sanitized = SENSITIVE_PATH_PATTERN
        .replace_all(&sanitized, "/***REDACTED***/")
        .into_owned();

    if sanitized.len() > MAX_ERROR_MESSAGE_LEN {
        let truncate_suffix = "...[truncated]";
        let mut cut = MAX_ERROR_MESSAGE_LEN - truncate_suffix.len();
        while !sanitized.is_char_boundary(cut) {
            cut -= 1;
        }
        sanitized.truncate(cut);
        sanitized.push_str(truncate_suffix);
    }

    sanitized
}

/// Result type for concierge operations
pub type ConciergeResult<T> = Result<T, ConciergeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_llm_error_converts_and_renders() {
        let error: ConciergeError = LlmError::NetworkError("connection reset".to_string()).into();
        assert_eq!(
            error.to_string(),
            "LLM provider error: Network error: connection reset"
        );

        let frame = error.to_error_frame();
        assert_eq!(
            serde_json::to_value(&frame).unwrap(),
            serde_json::json!({"error": "LLM provider error: Network error: connection reset"})
        );
    }

    #[test]
    fn test_invalid_frame_renders_bare_message() {
        let frame = ConciergeError::invalid_frame(NO_MESSAGE_PROVIDED).to_error_frame();
        assert_eq!(
            serde_json::to_string(&frame).unwrap(),
            r#"{"error":"No message provided"}"#
        );
    }

    #[test]
    fn test_constructors() {
        assert_eq!(
            ConciergeError::transport("socket closed").to_string(),
            "Transport error: socket closed"
        );
    }

    #[test]
    fn test_error_message_sanitization() {
        let sanitized =
            sanitize_error_message("Failed to authenticate: password=secret123 token=abc456");

        assert!(!sanitized.contains("secret123"));
        assert!(!sanitized.contains("abc456"));
        assert!(sanitized.contains("password=***"));
        assert!(sanitized.contains("token=***"));
    }

    #[test]
    fn test_bearer_tokens_are_masked() {
        let sanitized = sanitize_error_message("sent Authorization: Bearer sk-live-123");
        assert!(!sanitized.contains("sk-live-123"));
        assert!(sanitized.contains("Bearer ***"));
    }

    #[test]
    fn test_file_path_redaction() {
        let sanitized = sanitize_error_message("Failed to read /home/user/.ssh/id_rsa");
        assert!(sanitized.contains("/***REDACTED***/"));
        assert!(!sanitized.contains("id_rsa"));
    }

    #[test]
    fn test_long_message_truncation() {
        let sanitized = sanitize_error_message(&"x".repeat(600));
        assert!(sanitized.len() <= 500);
        assert!(sanitized.ends_with("...[truncated]"));
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        let sanitized = sanitize_error_message(&"💪".repeat(200));
        assert!(sanitized.len() <= 500);
        assert!(sanitized.ends_with("...[truncated]"));
    }

    #[test]
    fn test_sanitize_exactly_500_chars() {
        let sanitized = sanitize_error_message(&"x".repeat(500));
        assert_eq!(sanitized.len(), 500);
        assert!(!sanitized.contains("truncated"));
    }
}
