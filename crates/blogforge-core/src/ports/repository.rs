use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{AuthorRanking, NewPost, Post, PostSummary, User, UserPost};
use crate::error::RepoError;

/// Generic repository trait for entities that map one-to-one onto a table.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Insert a new entity. A unique-key clash is `RepoError::Constraint`.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;
}

/// Post repository.
///
/// Every read that returns a [`Post`] or [`PostSummary`] joins the author.
/// Listings are ordered newest first.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Insert a validated post; the store assigns id and timestamps.
    async fn create(&self, post: NewPost) -> Result<Post, RepoError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError>;

    /// One window of all posts.
    async fn list(&self, skip: u64, take: u64) -> Result<Vec<PostSummary>, RepoError>;

    /// Total number of posts.
    async fn count(&self) -> Result<u64, RepoError>;

    async fn find_by_author(&self, author_id: Uuid) -> Result<Vec<UserPost>, RepoError>;

    async fn count_by_author(&self, author_id: Uuid) -> Result<u64, RepoError>;

    /// Posts created at or after `since`.
    async fn created_since(
        &self,
        since: DateTime<Utc>,
        limit: u64,
    ) -> Result<Vec<PostSummary>, RepoError>;

    /// Distinct tags used across an author's posts.
    async fn author_tags(&self, author_id: Uuid) -> Result<Vec<String>, RepoError>;

    /// Posts carrying at least one of `tags`, excluding `exclude_author`'s own.
    async fn sharing_tags(
        &self,
        tags: &[String],
        exclude_author: Uuid,
        limit: u64,
    ) -> Result<Vec<PostSummary>, RepoError>;

    /// The most recently created post.
    async fn latest(&self) -> Result<Option<PostSummary>, RepoError>;

    /// Authors with a post since `since`, ranked by their total post count.
    async fn top_authors(
        &self,
        since: DateTime<Utc>,
        limit: u64,
    ) -> Result<Vec<AuthorRanking>, RepoError>;
}
