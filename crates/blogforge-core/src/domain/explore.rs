//! Explore page types - feeds, leaderboard and personal stats.

use serde::{Deserialize, Serialize};

use super::{Author, PostSummary};

/// A post feed, or a marker that the feed has no backing feature yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Feed {
    Posts { posts: Vec<PostSummary> },
    NotImplemented { message: String },
}

impl Feed {
    pub fn posts(posts: Vec<PostSummary>) -> Self {
        Feed::Posts { posts }
    }

    pub fn not_implemented(message: impl Into<String>) -> Self {
        Feed::NotImplemented {
            message: message.into(),
        }
    }

    /// Posts in the feed; empty for an unimplemented feed.
    pub fn items(&self) -> &[PostSummary] {
        match self {
            Feed::Posts { posts } => posts,
            Feed::NotImplemented { .. } => &[],
        }
    }
}

/// A statistic that is either measured or not tracked at all yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Stat<T> {
    Available(T),
    NotImplemented,
}

/// Numbers shown on the signed-in user's stats card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStats {
    pub total_posts: u64,
    pub total_views: Stat<u64>,
    pub streak: Stat<u32>,
    pub xp: Stat<u64>,
}

impl UserStats {
    pub fn with_post_count(total_posts: u64) -> Self {
        Self {
            total_posts,
            total_views: Stat::NotImplemented,
            streak: Stat::NotImplemented,
            xp: Stat::NotImplemented,
        }
    }
}

/// Leaderboard row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorRanking {
    pub author: Author,
    pub post_count: u64,
}
