//! Cache key and value encoding for post records.

use std::time::Duration;

use uuid::Uuid;

use crate::domain::Post;
use crate::ports::CacheError;

/// Single namespace for post entries. Both the write and read paths go
/// through [`post_key`].
pub const POST_KEY_PREFIX: &str = "post";

/// Lifetime of a cached post, counted from the write. Reads do not extend it.
pub const POST_CACHE_TTL: Duration = Duration::from_secs(3600);

pub fn post_key(id: Uuid) -> String {
    format!("{POST_KEY_PREFIX}:{id}")
}

pub fn encode(post: &Post) -> Result<String, CacheError> {
    serde_json::to_string(post).map_err(|e| CacheError::Serialization(e.to_string()))
}

pub fn decode(raw: &str) -> Result<Post, CacheError> {
    serde_json::from_str(raw).map_err(|e| CacheError::Serialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_key_format() {
        let id = Uuid::parse_str("8f2d3c52-5b7e-4c1a-9d0e-2a4b6c8d0e1f").unwrap();
        assert_eq!(post_key(id), "post:8f2d3c52-5b7e-4c1a-9d0e-2a4b6c8d0e1f");
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(decode("{not json"), Err(CacheError::Serialization(_))));
    }
}
