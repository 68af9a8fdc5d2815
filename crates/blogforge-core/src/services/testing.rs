//! Counting test doubles for the cache and post repository ports.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use uuid::Uuid;

use crate::domain::{Author, AuthorRanking, NewPost, Post, PostSummary, UserPost};
use crate::error::RepoError;
use crate::ports::{Cache, CacheError, PostRepository};

#[derive(Default)]
pub struct FakeCache {
    entries: Mutex<HashMap<String, (String, Option<Duration>)>>,
    gets: AtomicUsize,
    sets: AtomicUsize,
    fail_reads: bool,
    fail_writes: bool,
}

impl FakeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_reads() -> Self {
        Self {
            fail_reads: true,
            ..Self::default()
        }
    }

    pub fn failing_writes() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    pub fn get_calls(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    pub fn set_calls(&self) -> usize {
        self.sets.load(Ordering::SeqCst)
    }

    pub fn ttl_of(&self, key: &str) -> Option<Duration> {
        self.entries.lock().unwrap().get(key).and_then(|(_, ttl)| *ttl)
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).map(|(v, _)| v.clone())
    }

    pub fn put_raw(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), (value.to_string(), None));
    }
}

#[async_trait]
impl Cache for FakeCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads {
            return Err(CacheError::Connection("cache offline".to_string()));
        }
        Ok(self.raw(key))
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), CacheError> {
        self.sets.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes {
            return Err(CacheError::Operation("cache offline".to_string()));
        }
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), (value.to_string(), ttl));
        Ok(())
    }
}

/// Vec-backed post store with one or more registered authors.
pub struct FakePostRepository {
    authors: Mutex<Vec<Author>>,
    posts: Mutex<Vec<Post>>,
    finds: AtomicUsize,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    clock: Mutex<DateTime<Utc>>,
}

impl FakePostRepository {
    pub fn with_author() -> Self {
        Self {
            authors: Mutex::new(vec![Author {
                id: Uuid::new_v4(),
                name: "Ada".to_string(),
                email: Some("ada@example.com".to_string()),
                image: None,
            }]),
            posts: Mutex::new(Vec::new()),
            finds: AtomicUsize::new(0),
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
            clock: Mutex::new(Utc::now() - TimeDelta::days(1)),
        }
    }

    pub fn author_id(&self) -> Uuid {
        self.authors.lock().unwrap()[0].id
    }

    pub fn add_author(&self, name: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.authors.lock().unwrap().push(Author {
            id,
            name: name.to_string(),
            email: None,
            image: None,
        });
        id
    }

    pub fn len(&self) -> usize {
        self.posts.lock().unwrap().len()
    }

    pub fn find_calls(&self) -> usize {
        self.finds.load(Ordering::SeqCst)
    }

    pub fn reset_calls(&self) {
        self.finds.store(0, Ordering::SeqCst);
    }

    pub fn fail_reads(&self) {
        self.fail_reads.store(true, Ordering::SeqCst);
    }

    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    /// Insert a post by the first author, one second newer than the last.
    pub fn insert_post(&self, title: &str, tags: &[&str]) -> Post {
        self.insert_post_by(self.author_id(), title, tags)
    }

    pub fn insert_post_by(&self, author_id: Uuid, title: &str, tags: &[&str]) -> Post {
        let new_post = NewPost {
            author_id,
            title: title.to_string(),
            description: format!("About {title}"),
            content: format!("# {title}"),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        };
        self.store(new_post)
    }

    /// Move an existing post's creation time back by `age`.
    pub fn age_post(&self, id: Uuid, age: TimeDelta) {
        let mut posts = self.posts.lock().unwrap();
        if let Some(post) = posts.iter_mut().find(|p| p.id == id) {
            post.created_at = Utc::now() - age;
            post.updated_at = post.created_at;
        }
    }

    fn store(&self, new_post: NewPost) -> Post {
        let author = self
            .authors
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.id == new_post.author_id)
            .cloned()
            .expect("unknown author");
        let created_at = {
            let mut clock = self.clock.lock().unwrap();
            *clock += TimeDelta::seconds(1);
            *clock
        };
        let post = Post {
            id: Uuid::new_v4(),
            author_id: author.id,
            title: new_post.title,
            description: new_post.description,
            content: new_post.content,
            tags: new_post.tags,
            author,
            created_at,
            updated_at: created_at,
        };
        self.posts.lock().unwrap().push(post.clone());
        post
    }

    fn check_reads(&self) -> Result<(), RepoError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(RepoError::Connection("database offline".to_string()));
        }
        Ok(())
    }

    fn newest_first(&self) -> Vec<Post> {
        let mut posts = self.posts.lock().unwrap().clone();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        posts
    }
}

#[async_trait]
impl PostRepository for FakePostRepository {
    async fn create(&self, post: NewPost) -> Result<Post, RepoError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(RepoError::Query("insert failed".to_string()));
        }
        Ok(self.store(post))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        self.finds.fetch_add(1, Ordering::SeqCst);
        self.check_reads()?;
        Ok(self.posts.lock().unwrap().iter().find(|p| p.id == id).cloned())
    }

    async fn list(&self, skip: u64, take: u64) -> Result<Vec<PostSummary>, RepoError> {
        self.check_reads()?;
        Ok(self
            .newest_first()
            .iter()
            .skip(skip as usize)
            .take(take as usize)
            .map(Post::summary)
            .collect())
    }

    async fn count(&self) -> Result<u64, RepoError> {
        self.check_reads()?;
        Ok(self.len() as u64)
    }

    async fn find_by_author(&self, author_id: Uuid) -> Result<Vec<UserPost>, RepoError> {
        self.check_reads()?;
        Ok(self
            .newest_first()
            .into_iter()
            .filter(|p| p.author_id == author_id)
            .map(|p| UserPost {
                id: p.id,
                title: p.title,
                description: p.description,
                tags: p.tags,
                created_at: p.created_at,
                updated_at: p.updated_at,
            })
            .collect())
    }

    async fn count_by_author(&self, author_id: Uuid) -> Result<u64, RepoError> {
        self.check_reads()?;
        Ok(self
            .posts
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.author_id == author_id)
            .count() as u64)
    }

    async fn created_since(
        &self,
        since: DateTime<Utc>,
        limit: u64,
    ) -> Result<Vec<PostSummary>, RepoError> {
        self.check_reads()?;
        Ok(self
            .newest_first()
            .iter()
            .filter(|p| p.created_at >= since)
            .take(limit as usize)
            .map(Post::summary)
            .collect())
    }

    async fn author_tags(&self, author_id: Uuid) -> Result<Vec<String>, RepoError> {
        self.check_reads()?;
        let mut tags: Vec<String> = Vec::new();
        for post in self.posts.lock().unwrap().iter() {
            if post.author_id != author_id {
                continue;
            }
            for tag in &post.tags {
                if !tags.contains(tag) {
                    tags.push(tag.clone());
                }
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
        self.check_reads()?;
        Ok(self
            .newest_first()
            .iter()
            .filter(|p| p.author_id != exclude_author)
            .filter(|p| p.tags.iter().any(|t| tags.contains(t)))
            .take(limit as usize)
            .map(Post::summary)
            .collect())
    }

    async fn latest(&self) -> Result<Option<PostSummary>, RepoError> {
        self.check_reads()?;
        Ok(self.newest_first().first().map(Post::summary))
    }

    async fn top_authors(
        &self,
        since: DateTime<Utc>,
        limit: u64,
    ) -> Result<Vec<AuthorRanking>, RepoError> {
        self.check_reads()?;
        let posts = self.posts.lock().unwrap().clone();
        let mut rankings: Vec<AuthorRanking> = self
            .authors
            .lock()
            .unwrap()
            .iter()
            .filter(|a| posts.iter().any(|p| p.author_id == a.id && p.created_at >= since))
            .map(|a| AuthorRanking {
                author: a.clone(),
                post_count: posts.iter().filter(|p| p.author_id == a.id).count() as u64,
            })
            .collect();
        rankings.sort_by(|a, b| b.post_count.cmp(&a.post_count));
        rankings.truncate(limit as usize);
        Ok(rankings)
    }
}
