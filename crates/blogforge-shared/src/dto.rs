//! Data Transfer Objects - request/response types for the API.

use serde::{Deserialize, Serialize};

/// Request to register a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Request to login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response containing a user's public information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub image: Option<String>,
    pub created_at: String,
}

/// Response containing authentication tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

/// `tags` as sent by clients: a list, or a single bare string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagsField {
    Many(Vec<String>),
    One(String),
}

impl TagsField {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Self::Many(tags) => tags,
            Self::One(tag) => vec![tag],
        }
    }
}

/// Body of a post submission.
///
/// Every field is optional on the wire so a missing field becomes a field
/// error instead of a deserialization failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreatePostRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub tags: Option<TagsField>,
}

impl CreatePostRequest {
    /// True when any field is absent or empty.
    pub fn has_missing_fields(&self) -> bool {
        let blank = |s: &Option<String>| s.as_deref().is_none_or(str::is_empty);
        let no_tags = match &self.tags {
            None => true,
            Some(TagsField::Many(tags)) => tags.is_empty(),
            Some(TagsField::One(tag)) => tag.is_empty(),
        };
        blank(&self.title) || blank(&self.description) || blank(&self.content) || no_tags
    }
}

/// `?page=&page_size=` for listings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageQuery {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

/// `?id=` for the cache probe.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostIdQuery {
    pub id: Option<String>,
}

/// Where a cache probe found its post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheInfo {
    pub cached: bool,
    pub key: String,
    pub ttl: u64,
}

/// Response of the cache diagnostic endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheProbeResponse<T> {
    pub message: String,
    pub source: String,
    pub post: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache: Option<CacheInfo>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_accept_single_string() {
        let req: CreatePostRequest =
            serde_json::from_str(r#"{"title":"t","description":"d","content":"c","tags":"rust"}"#)
                .unwrap();

        assert!(!req.has_missing_fields());
        assert_eq!(req.tags.unwrap().into_vec(), vec!["rust".to_string()]);
    }

    #[test]
    fn test_missing_fields_detected() {
        let req: CreatePostRequest =
            serde_json::from_str(r#"{"title":"t","content":"c","tags":["rust"]}"#).unwrap();
        assert!(req.has_missing_fields());

        let req: CreatePostRequest =
            serde_json::from_str(r#"{"title":"t","description":"d","content":"c","tags":[]}"#)
                .unwrap();
        assert!(req.has_missing_fields());
    }
}
