//! Explore page: trending, for-you, following, leaderboard and stats.

use std::sync::Arc;

use chrono::{TimeDelta, Utc};
use uuid::Uuid;

use crate::domain::{AuthorRanking, Feed, PostSummary, UserStats};
use crate::error::RepoError;
use crate::ports::PostRepository;

pub const FEED_LIMIT: u64 = 10;
pub const LEADERBOARD_LIMIT: u64 = 5;

const TRENDING_WINDOW_DAYS: i64 = 7;
const LEADERBOARD_WINDOW_DAYS: i64 = 30;

const FOLLOWING_MESSAGE: &str = "Follow feature coming soon! Start following your favorite authors.";

pub struct ExploreService {
    posts: Arc<dyn PostRepository>,
}

impl ExploreService {
    pub fn new(posts: Arc<dyn PostRepository>) -> Self {
        Self { posts }
    }

    /// Newest posts from the last seven days.
    ///
    /// TODO: rank by engagement once view counts are recorded.
    pub async fn trending(&self, limit: u64) -> Result<Feed, RepoError> {
        let since = Utc::now() - TimeDelta::days(TRENDING_WINDOW_DAYS);
        let posts = self.posts.created_since(since, limit).await?;
        Ok(Feed::posts(posts))
    }

    /// Posts from other authors that share a tag with the viewer's own posts.
    /// Anonymous viewers and viewers without posts get the trending feed.
    pub async fn for_you(&self, viewer: Option<Uuid>, limit: u64) -> Result<Feed, RepoError> {
        let Some(viewer) = viewer else {
            return self.trending(limit).await;
        };

        let tags = self.posts.author_tags(viewer).await?;
        if tags.is_empty() {
            tracing::debug!(viewer = %viewer, "No tags to match, using trending feed");
            return self.trending(limit).await;
        }

        let posts = self.posts.sharing_tags(&tags, viewer, limit).await?;
        Ok(Feed::posts(posts))
    }

    /// Following has no follow graph behind it yet.
    pub async fn following(&self, _viewer: Uuid) -> Feed {
        Feed::not_implemented(FOLLOWING_MESSAGE)
    }

    pub async fn top_authors(&self, limit: u64) -> Result<Vec<AuthorRanking>, RepoError> {
        let since = Utc::now() - TimeDelta::days(LEADERBOARD_WINDOW_DAYS);
        self.posts.top_authors(since, limit).await
    }

    pub async fn user_stats(&self, user_id: Uuid) -> Result<UserStats, RepoError> {
        let total = self.posts.count_by_author(user_id).await?;
        Ok(UserStats::with_post_count(total))
    }

    pub async fn featured_post(&self) -> Result<Option<PostSummary>, RepoError> {
        self.posts.latest().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Stat;
    use crate::services::testing::FakePostRepository;

    fn titles(feed: &Feed) -> Vec<&str> {
        feed.items().iter().map(|p| p.title.as_str()).collect()
    }

    #[tokio::test]
    async fn test_trending_skips_old_posts() {
        let repo = Arc::new(FakePostRepository::with_author());
        let old = repo.insert_post("Old", &["Rust"]);
        repo.insert_post("Fresh", &["Rust"]);
        repo.age_post(old.id, TimeDelta::days(8));

        let svc = ExploreService::new(repo.clone());
        let feed = svc.trending(FEED_LIMIT).await.unwrap();
        assert_eq!(titles(&feed), ["Fresh"]);
    }

    #[tokio::test]
    async fn test_for_you_anonymous_is_trending() {
        let repo = Arc::new(FakePostRepository::with_author());
        repo.insert_post("Fresh", &["Rust"]);
        let svc = ExploreService::new(repo.clone());

        let feed = svc.for_you(None, FEED_LIMIT).await.unwrap();
        assert_eq!(titles(&feed), ["Fresh"]);
    }

    #[tokio::test]
    async fn test_for_you_matches_tags_of_other_authors() {
        let repo = Arc::new(FakePostRepository::with_author());
        let viewer = repo.author_id();
        let other = repo.add_author("Grace");

        repo.insert_post("My rust post", &["Rust"]);
        repo.insert_post_by(other, "Their rust post", &["Rust", "Async"]);
        repo.insert_post_by(other, "Their go post", &["Go"]);

        let svc = ExploreService::new(repo.clone());
        let feed = svc.for_you(Some(viewer), FEED_LIMIT).await.unwrap();
        assert_eq!(titles(&feed), ["Their rust post"]);
    }

    #[tokio::test]
    async fn test_for_you_without_own_posts_is_trending() {
        let repo = Arc::new(FakePostRepository::with_author());
        let other = repo.add_author("Grace");
        repo.insert_post_by(other, "Theirs", &["Go"]);

        let svc = ExploreService::new(repo.clone());
        let feed = svc.for_you(Some(repo.author_id()), FEED_LIMIT).await.unwrap();
        assert_eq!(titles(&feed), ["Theirs"]);
    }

    #[tokio::test]
    async fn test_following_is_not_implemented() {
        let svc = ExploreService::new(Arc::new(FakePostRepository::with_author()));
        let feed = svc.following(Uuid::new_v4()).await;
        assert!(matches!(feed, Feed::NotImplemented { .. }));
        assert!(feed.items().is_empty());
    }

    #[tokio::test]
    async fn test_leaderboard_ranks_by_post_count() {
        let repo = Arc::new(FakePostRepository::with_author());
        let grace = repo.add_author("Grace");
        let idle = repo.add_author("Idle");
        repo.insert_post("One", &["Rust"]);
        repo.insert_post_by(grace, "Two", &["Rust"]);
        repo.insert_post_by(grace, "Three", &["Rust"]);
        let stale = repo.insert_post_by(idle, "Stale", &["Rust"]);
        repo.age_post(stale.id, TimeDelta::days(45));

        let svc = ExploreService::new(repo.clone());
        let ranking = svc.top_authors(LEADERBOARD_LIMIT).await.unwrap();
        let names: Vec<_> = ranking.iter().map(|r| r.author.name.as_str()).collect();
        assert_eq!(names, ["Grace", "Ada"]);
        assert_eq!(ranking[0].post_count, 2);
    }

    #[tokio::test]
    async fn test_user_stats_marks_untracked_metrics() {
        let repo = Arc::new(FakePostRepository::with_author());
        repo.insert_post("One", &["Rust"]);
        let svc = ExploreService::new(repo.clone());

        let stats = svc.user_stats(repo.author_id()).await.unwrap();
        assert_eq!(stats.total_posts, 1);
        assert_eq!(stats.xp, Stat::NotImplemented);
        assert_eq!(stats.streak, Stat::NotImplemented);
    }

    #[tokio::test]
    async fn test_featured_post_is_latest() {
        let repo = Arc::new(FakePostRepository::with_author());
        let svc = ExploreService::new(repo.clone());
        assert!(svc.featured_post().await.unwrap().is_none());

        repo.insert_post("First", &["Rust"]);
        repo.insert_post("Second", &["Rust"]);
        let featured = svc.featured_post().await.unwrap().unwrap();
        assert_eq!(featured.title, "Second");
    }
}
