//! Post write, read and listing paths.

use std::sync::Arc;

use uuid::Uuid;

use super::post_cache::{self, POST_CACHE_TTL};
use crate::domain::{CreatePostInput, MAX_PAGE_SIZE, Pagination, Post, PostPage, UserPost};
use crate::error::PostError;
use crate::ports::{Cache, PostRepository};
use crate::validation::validate_post;

/// Where a returned post came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostSource {
    Cache,
    Store,
}

/// Result of a read-path lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostLookup {
    Found { post: Post, source: PostSource },
    NotFound,
}

impl PostLookup {
    pub fn into_post(self) -> Option<Post> {
        match self {
            PostLookup::Found { post, .. } => Some(post),
            PostLookup::NotFound => None,
        }
    }
}

/// A freshly persisted post and whether its cache entry was written.
#[derive(Debug, Clone)]
pub struct CreatedPost {
    pub post: Post,
    pub cached: bool,
}

/// Posts backed by the persistent store, with the cache in front of single
/// post reads.
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    cache: Arc<dyn Cache>,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostRepository>, cache: Arc<dyn Cache>) -> Self {
        Self { posts, cache }
    }

    /// Validate, persist, then write the post through to the cache.
    pub async fn create_post(
        &self,
        author_id: Uuid,
        input: CreatePostInput,
    ) -> Result<CreatedPost, PostError> {
        let new_post = validate_post(author_id, input).map_err(PostError::Validation)?;

        let post = self.posts.create(new_post).await.map_err(|e| {
            tracing::error!(author_id = %author_id, error = %e, "Failed to persist post");
            PostError::Persistence(e)
        })?;

        tracing::info!(post_id = %post.id, author_id = %author_id, "Post created");

        let cached = self.populate(&post).await;
        Ok(CreatedPost { post, cached })
    }

    /// Read-through lookup. A missing, empty or malformed id is "not found"
    /// without touching either store.
    pub async fn get_post(&self, id: Option<&str>) -> Result<PostLookup, PostError> {
        let Some(id) = id.map(str::trim).filter(|s| !s.is_empty()) else {
            return Ok(PostLookup::NotFound);
        };
        let Ok(id) = Uuid::parse_str(id) else {
            tracing::debug!(post_id = %id, "Post id is not a UUID");
            return Ok(PostLookup::NotFound);
        };

        if let Some(post) = self.cached(id).await {
            return Ok(PostLookup::Found {
                post,
                source: PostSource::Cache,
            });
        }

        let Some(post) = self.posts.find_by_id(id).await? else {
            return Ok(PostLookup::NotFound);
        };

        self.populate(&post).await;
        Ok(PostLookup::Found {
            post,
            source: PostSource::Store,
        })
    }

    /// One page of posts, newest first. Never touches the cache.
    /// `page_size` is clamped to `1..=MAX_PAGE_SIZE`.
    ///
    /// A store failure yields [`PostPage::empty`], which looks the same as an
    /// empty blog.
    pub async fn list_posts(&self, page: u64, page_size: u64) -> PostPage {
        let page = page.max(1);
        let page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        let skip = Pagination::offset(page, page_size);

        let result = futures::try_join!(self.posts.list(skip, page_size), self.posts.count());

        match result {
            Ok((posts, total)) => PostPage {
                posts,
                pagination: Pagination::new(page, page_size, total),
            },
            Err(e) => {
                tracing::error!(page, page_size, error = %e, "Failed to list posts");
                PostPage::empty()
            }
        }
    }

    /// The author's own posts for their dashboard.
    pub async fn posts_by_author(&self, author_id: Uuid) -> Vec<UserPost> {
        match self.posts.find_by_author(author_id).await {
            Ok(posts) => posts,
            Err(e) => {
                tracing::error!(author_id = %author_id, error = %e, "Failed to load author posts");
                Vec::new()
            }
        }
    }

    async fn cached(&self, id: Uuid) -> Option<Post> {
        let key = post_cache::post_key(id);
        let raw = match self.cache.get(&key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!(key = %key, "Post cache miss");
                return None;
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Post cache read failed");
                return None;
            }
        };

        match post_cache::decode(&raw) {
            Ok(post) => {
                tracing::debug!(key = %key, "Post cache hit");
                Some(post)
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Discarding malformed cached post");
                None
            }
        }
    }

    /// Best-effort cache write. Returns whether the entry was stored.
    async fn populate(&self, post: &Post) -> bool {
        let key = post_cache::post_key(post.id);
        let written = match post_cache::encode(post) {
            Ok(value) => self.cache.set(&key, &value, Some(POST_CACHE_TTL)).await,
            Err(e) => Err(e),
        };

        match written {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Post cache write failed");
                false
            }
        }
    }
}
