use serde::{Deserialize, Serialize};

use crate::shared::detection::DetectionResult;

/// Body of `POST /api/predict`.
#[derive(Clone, Debug, Deserialize)]
pub struct AnalyzeResponse {
    #[serde(default)]
    pub results: Vec<DetectionResult>,
}

/// Body of the registration endpoints.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RegisterReceipt {
    pub status: String,
    #[serde(default)]
    pub message: String,
    /// Images the backend holds for the identity after this call; only the
    /// multi-image endpoint reports it.
    #[serde(default)]
    pub total_images: Option<u32>,
}

impl RegisterReceipt {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

/// One identity the backend knows, as listed by `GET /api/users`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RegisteredUser {
    pub name: String,
    #[serde(default)]
    pub image_count: u32,
    /// ISO-8601 timestamp, or the `"N/A"` sentinel when the backend has
    /// no record of an update.
    #[serde(default = "unknown_date")]
    pub updated_at: String,
    /// Base64 data URL of a stored face crop; may be absent.
    #[serde(default)]
    pub thumbnail: Option<String>,
}

fn unknown_date() -> String {
    "N/A".to_string()
}

impl RegisteredUser {
    /// Avatar fallback: the first two characters of the name, uppercased.
    pub fn initials(&self) -> String {
        self.name.chars().take(2).flat_map(char::to_uppercase).collect()
    }

    /// The date portion of `updated_at`, `None` for the sentinel.
    pub fn updated_date(&self) -> Option<&str> {
        if self.updated_at.is_empty() || self.updated_at == "N/A" {
            return None;
        }
        Some(self.updated_at.get(..10).unwrap_or(&self.updated_at))
    }
}

/// Body of `GET /api/users`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserList {
    #[serde(default)]
    pub users: Vec<RegisteredUser>,
    #[serde(default)]
    pub total: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_list_deserializes_backend_shape() {
        let json = r#"{
            "users": [
                {"name": "Alice", "image_count": 3, "updated_at": "2026-08-20T14:03:55.120000", "thumbnail": "data:image/jpeg;base64,/9j/4AAQ"},
                {"name": "Bob", "image_count": 1, "updated_at": "N/A"}
            ],
            "total": 2
        }"#;
        let list: UserList = serde_json::from_str(json).unwrap();
        assert_eq!(list.total, 2);
        assert_eq!(list.users[0].name, "Alice");
        assert!(list.users[0].thumbnail.is_some());
        assert!(list.users[1].thumbnail.is_none());
    }

    #[test]
    fn test_receipt_success_flag() {
        let ok: RegisterReceipt = serde_json::from_str(
            r#"{"status": "success", "message": "Registered 2 images for Bob", "total_images": 2}"#,
        )
        .unwrap();
        assert!(ok.is_success());
        assert_eq!(ok.total_images, Some(2));

        let err: RegisterReceipt =
            serde_json::from_str(r#"{"status": "error", "message": "No face detected"}"#).unwrap();
        assert!(!err.is_success());
        assert_eq!(err.total_images, None);
    }

    #[test]
    fn test_initials_take_first_two_chars() {
        let user = |name: &str| RegisteredUser {
            name: name.to_string(),
            image_count: 0,
            updated_at: "N/A".to_string(),
            thumbnail: None,
        };
        assert_eq!(user("alice").initials(), "AL");
        assert_eq!(user("B").initials(), "B");
        assert_eq!(user("김철수").initials(), "김철");
    }

    #[test]
    fn test_updated_date_strips_time_and_hides_sentinel() {
        let mut user = RegisteredUser {
            name: "Alice".to_string(),
            image_count: 1,
            updated_at: "2026-08-20T14:03:55.120000".to_string(),
            thumbnail: None,
        };
        assert_eq!(user.updated_date(), Some("2026-08-20"));
        user.updated_at = "N/A".to_string();
        assert_eq!(user.updated_date(), None);
    }

    #[test]
    fn test_analyze_response_defaults_to_empty() {
        let body: AnalyzeResponse = serde_json::from_str(r#"{"results": []}"#).unwrap();
        assert!(body.results.is_empty());
    }
}
