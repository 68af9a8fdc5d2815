//! Application services - the operations handlers call.

mod explore;
pub mod post_cache;
mod posts;

#[cfg(test)]
mod testing;

pub use explore::{ExploreService, FEED_LIMIT, LEADERBOARD_LIMIT};
pub use posts::{CreatedPost, PostLookup, PostService, PostSource};
