use serde::Deserialize;

pub type Result<T, E = ClientError> = std::result::Result<T, E>;

/// Everything a client operation can fail with
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Bad credentials or an expired token. The session is cleared.
    #[error("authentication failed: {0}")]
    Unauthorized(String),
    /// Signed in, but the role does not allow this
    #[error("access denied: {0}")]
    Forbidden(String),
    #[error("not found: {0}")]
    NotFound(String),
    /// Caught locally; no request was sent
    #[error("{0}")]
    Validation(String),
    #[error("cannot {action} while status is `{from}`")]
    InvalidTransition { from: String, action: &'static str },
    #[error("{name} is {size} bytes; the limit is {limit} bytes")]
    FileTooLarge { name: String, size: u64, limit: u64 },
    #[error("not signed in")]
    NotSignedIn,
    #[error("server returned {status}: {detail}")]
    Api { status: u16, detail: String },
    #[error("http request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("invalid JSON payload: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),
}

impl ClientError {
    /// Map a non-success response to the taxonomy, preferring the backend's
    /// `detail` string over a generic message.
    pub fn from_response(status: u16, body: &str) -> Self {
        let detail = extract_detail(body).unwrap_or_else(|| generic_message(status).to_string());
        match status {
            401 => ClientError::Unauthorized(detail),
            403 => ClientError::Forbidden(detail),
            404 => ClientError::NotFound(detail),
            _ => ClientError::Api { status, detail },
        }
    }

    pub fn is_auth_failure(&self) -> bool {
        matches!(self, ClientError::Unauthorized(_))
    }

    /// Short message suitable for showing next to the action that failed
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Api { detail, .. } => detail.clone(),
            ClientError::Network(_) => "Could not reach the server. Please try again.".to_string(),
            ClientError::Decode(_) => "The server sent an unexpected response.".to_string(),
            other => other.to_string(),
        }
    }
}

fn extract_detail(body: &str) -> Option<String> {
    #[derive(Deserialize)]
    struct Detail {
        detail: serde_json::Value,
    }

    // Validation errors carry a list here; only plain strings are shown.
    match serde_json::from_str::<Detail>(body).ok()?.detail {
        serde_json::Value::String(text) if !text.trim().is_empty() => Some(text),
        _ => None,
    }
}

fn generic_message(status: u16) -> &'static str {
    match status {
        400 => "The request was rejected.",
        401 => "Please sign in again.",
        403 => "You do not have access to this page.",
        404 => "The requested item was not found.",
        422 => "Some fields are invalid.",
        500..=599 => "The server encountered an error.",
        _ => "Something went wrong.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_detail_is_preferred() {
        let err = ClientError::from_response(400, r#"{"detail":"You have already applied for this property"}"#);
        assert_eq!(err.user_message(), "You have already applied for this property");
    }

    #[test]
    fn list_detail_falls_back_to_generic() {
        let err = ClientError::from_response(422, r#"{"detail":[{"loc":["body","price"],"msg":"field required"}]}"#);
        assert_eq!(err.user_message(), "Some fields are invalid.");
    }

    #[test]
    fn status_codes_map_to_kinds() {
        assert!(ClientError::from_response(401, "").is_auth_failure());
        assert!(matches!(ClientError::from_response(403, "nope"), ClientError::Forbidden(_)));
        assert!(matches!(ClientError::from_response(404, "{}"), ClientError::NotFound(_)));
        assert!(matches!(ClientError::from_response(502, ""), ClientError::Api { status: 502, .. }));
    }
}
