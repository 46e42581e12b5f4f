use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("invalid backend url {url:?}: {reason}")]
    BadUrl { url: String, reason: String },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("backend returned {status}: {detail}")]
    Status { status: StatusCode, detail: String },
}

impl ApiError {
    /// Toast-friendly text: the backend's own words when it sent any,
    /// the transport error otherwise.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status { detail, .. } => detail.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_surfaces_backend_detail() {
        let e = ApiError::Status {
            status: StatusCode::NOT_FOUND,
            detail: "User 'Alice' not found".to_string(),
        };
        assert_eq!(e.user_message(), "User 'Alice' not found");
        assert!(e.to_string().contains("404"));
    }

    #[test]
    fn test_bad_url_message_names_the_url() {
        let e = ApiError::BadUrl {
            url: "not a url".to_string(),
            reason: "relative URL without a base".to_string(),
        };
        assert!(e.to_string().contains("not a url"));
    }
}
