//! In-memory users and posts - used when `DATABASE_URL` is not set.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use blogforge_core::domain::{AuthorRanking, NewPost, Post, PostSummary, User, UserPost};
use blogforge_core::error::RepoError;
use blogforge_core::ports::{BaseRepository, PostRepository, UserRepository};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    /// Insertion order; listings sort by `created_at`.
    posts: Vec<Post>,
}

impl Tables {
    fn newest_first(&self) -> Vec<&Post> {
        let mut posts: Vec<&Post> = self.posts.iter().collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        posts
    }
}

/// Process-local store shared by the user and post repositories.
///
/// Data is lost on process restart.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn users(&self) -> InMemoryUserRepository {
        InMemoryUserRepository {
            tables: self.tables.clone(),
        }
    }

    pub fn posts(&self) -> InMemoryPostRepository {
        InMemoryPostRepository {
            tables: self.tables.clone(),
        }
    }
}

pub struct InMemoryUserRepository {
    tables: Arc<RwLock<Tables>>,
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn insert(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        Ok(self
            .tables
            .read()
            .await
            .users
            .values()
            .find(|u| u.email == email)
            .cloned())
    }
}

pub struct InMemoryPostRepository {
    tables: Arc<RwLock<Tables>>,
}

fn to_user_post(post: &Post) -> UserPost {
    UserPost {
        id: post.id,
        title: post.title.clone(),
        description: post.description.clone(),
        tags: post.tags.clone(),
        created_at: post.created_at,
        updated_at: post.updated_at,
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn create(&self, new_post: NewPost) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        let author = tables
            .users
            .get(&new_post.author_id)
            .map(User::as_author)
            .ok_or(RepoError::NotFound)?;

        // Keep creation times strictly increasing so "newest first" is total.
        let mut now = Utc::now();
        if let Some(last) = tables.posts.iter().map(|p| p.created_at).max() {
            if now <= last {
                now = last + chrono::TimeDelta::microseconds(1);
            }
        }

        let post = Post {
            id: Uuid::new_v4(),
            author_id: new_post.author_id,
            title: new_post.title,
            description: new_post.description,
            content: new_post.content,
            tags: new_post.tags,
            author,
            created_at: now,
            updated_at: now,
        };
        tables.posts.push(post.clone());
        Ok(post)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.posts.iter().find(|p| p.id == id).cloned())
    }

    async fn list(&self, skip: u64, take: u64) -> Result<Vec<PostSummary>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .newest_first()
            .into_iter()
            .skip(skip as usize)
            .take(take as usize)
            .map(Post::summary)
            .collect())
    }

    async fn count(&self) -> Result<u64, RepoError> {
        Ok(self.tables.read().await.posts.len() as u64)
    }

    async fn find_by_author(&self, author_id: Uuid) -> Result<Vec<UserPost>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .newest_first()
            .into_iter()
            .filter(|p| p.author_id == author_id)
            .map(to_user_post)
            .collect())
    }

    async fn count_by_author(&self, author_id: Uuid) -> Result<u64, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.posts.iter().filter(|p| p.author_id == author_id).count() as u64)
    }

    async fn created_since(
        &self,
        since: DateTime<Utc>,
        limit: u64,
    ) -> Result<Vec<PostSummary>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .newest_first()
            .into_iter()
            .filter(|p| p.created_at >= since)
            .take(limit as usize)
            .map(Post::summary)
            .collect())
    }

    async fn author_tags(&self, author_id: Uuid) -> Result<Vec<String>, RepoError> {
        let tables = self.tables.read().await;
        let mut tags: Vec<String> = Vec::new();
        for tag in tables
            .posts
            .iter()
            .filter(|p| p.author_id == author_id)
            .flat_map(|p| &p.tags)
        {
            if !tags.contains(tag) {
                tags.push(tag.clone());
            }
        }
        Ok(tags)
    }

    async fn sharing_tags(
        &self,
        tags: &[String],
        exclude_author: Uuid,
        limit: u64,
    ) -> Result<Vec<PostSummary>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .newest_first()
            .into_iter()
            .filter(|p| p.author_id != exclude_author && p.tags.iter().any(|t| tags.contains(t)))
            .take(limit as usize)
            .map(Post::summary)
            .collect())
    }

    async fn latest(&self) -> Result<Option<PostSummary>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.newest_first().first().map(|p| p.summary()))
    }

    async fn top_authors(
        &self,
        since: DateTime<Utc>,
        limit: u64,
    ) -> Result<Vec<AuthorRanking>, RepoError> {
        let tables = self.tables.read().await;

        let mut counts: HashMap<Uuid, (u64, bool)> = HashMap::new();
        for post in &tables.posts {
            let entry = counts.entry(post.author_id).or_default();
            entry.0 += 1;
            entry.1 |= post.created_at >= since;
        }

        let mut rankings: Vec<AuthorRanking> = counts
            .into_iter()
            .filter(|(_, (_, recent))| *recent)
            .filter_map(|(id, (count, _))| {
                tables.users.get(&id).map(|u| AuthorRanking {
                    author: u.as_author(),
                    post_count: count,
                })
            })
            .collect();
        rankings.sort_by(|a, b| {
            b.post_count
                .cmp(&a.post_count)
                .then_with(|| a.author.name.cmp(&b.author.name))
        });
        rankings.truncate(limit as usize);
        Ok(rankings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_post(author_id: Uuid, title: &str, tags: &[&str]) -> NewPost {
        NewPost {
            author_id,
            title: title.to_string(),
            description: "desc".to_string(),
            content: "body".to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    async fn seeded() -> (InMemoryStore, User) {
        let store = InMemoryStore::new();
        let user = User::new("Ada".into(), "ada@example.com".into(), "hash".into());
        store.users().insert(user.clone()).await.unwrap();
        (store, user)
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let (store, _) = seeded().await;
        let again = User::new("Other".into(), "ada@example.com".into(), "hash".into());
        let err = store.users().insert(again).await.unwrap_err();
        assert!(matches!(err, RepoError::Constraint(_)));
    }

    #[tokio::test]
    async fn test_create_embeds_author() {
        let (store, user) = seeded().await;
        let post = store
            .posts()
            .create(new_post(user.id, "Hello", &["Rust"]))
            .await
            .unwrap();

        assert_eq!(post.author.name, "Ada");
        assert_eq!(post.author.email.as_deref(), Some("ada@example.com"));
        let found = PostRepository::find_by_id(&store.posts(), post.id).await.unwrap();
        assert_eq!(found, Some(post));
    }

    #[tokio::test]
    async fn test_create_for_unknown_author_fails() {
        let store = InMemoryStore::new();
        let err = store
            .posts()
            .create(new_post(Uuid::new_v4(), "Orphan", &["Rust"]))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::NotFound));
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let (store, user) = seeded().await;
        let posts = store.posts();
        for title in ["a", "b", "c"] {
            posts.create(new_post(user.id, title, &["Rust"])).await.unwrap();
        }

        let page: Vec<_> = posts
            .list(1, 2)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(page, ["b", "a"]);
        assert_eq!(posts.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_author_tags_are_distinct() {
        let (store, user) = seeded().await;
        let posts = store.posts();
        posts.create(new_post(user.id, "a", &["Rust", "Web"])).await.unwrap();
        posts.create(new_post(user.id, "b", &["Web", "CSS"])).await.unwrap();

        let tags = posts.author_tags(user.id).await.unwrap();
        assert_eq!(tags, ["Rust", "Web", "CSS"]);
    }
}
