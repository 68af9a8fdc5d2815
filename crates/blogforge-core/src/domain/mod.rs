//! Domain entities - the core business objects.

mod explore;
mod pagination;
mod post;
mod user;

pub use explore::{AuthorRanking, Feed, Stat, UserStats};
pub use pagination::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, PostPage, Pagination};
pub use post::{Author, AuthorSummary, CreatePostInput, NewPost, Post, PostSummary, UserPost};
pub use user::User;
