use chrono::Utc;
use sea_orm::{DatabaseBackend, MockDatabase};
use uuid::Uuid;

use blogforge_core::domain::{NewPost, User};
use blogforge_core::ports::{BaseRepository, PostRepository};

use crate::database::entity::{post, user};
use crate::database::postgres_repo::{PostgresPostRepository, PostgresUserRepository};

fn author_row(id: Uuid) -> user::Model {
    let now = Utc::now();
    user::Model {
        id,
        name: "Ada".to_owned(),
        email: "ada@example.com".to_owned(),
        password_hash: "hash".to_owned(),
        image: None,
        created_at: now.into(),
        updated_at: now.into(),
    }
}

fn post_row(id: Uuid, author_id: Uuid) -> post::Model {
    let now = Utc::now();
    post::Model {
        id,
        author_id,
        title: "Test Post".to_owned(),
        description: "Summary".to_owned(),
        content: "Content".to_owned(),
        tags: vec!["Rust".to_owned()],
        created_at: now.into(),
        updated_at: now.into(),
    }
}

#[tokio::test]
async fn test_find_post_by_id_joins_author() {
    let post_id = Uuid::new_v4();
    let author_id = Uuid::new_v4();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![(post_row(post_id, author_id), author_row(author_id))]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let post = repo.find_by_id(post_id).await.unwrap().unwrap();

    assert_eq!(post.id, post_id);
    assert_eq!(post.title, "Test Post");
    assert_eq!(post.tags, vec!["Rust".to_string()]);
    assert_eq!(post.author.id, author_id);
    assert_eq!(post.author.email.as_deref(), Some("ada@example.com"));
}

#[tokio::test]
async fn test_find_missing_post() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<(post::Model, user::Model)>::new()])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    assert!(repo.find_by_id(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_find_user_by_id() {
    let user_id = Uuid::new_v4();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![author_row(user_id)]])
        .into_connection();

    let repo = PostgresUserRepository::new(db);
    let user: Option<User> = repo.find_by_id(user_id).await.unwrap();
    assert_eq!(user.unwrap().name, "Ada");
}

#[tokio::test]
async fn test_create_post_returns_author() {
    let post_id = Uuid::new_v4();
    let author_id = Uuid::new_v4();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![author_row(author_id)]])
        .append_query_results([vec![post_row(post_id, author_id)]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let created = repo
        .create(NewPost {
            author_id,
            title: "Test Post".to_owned(),
            description: "Summary".to_owned(),
            content: "Content".to_owned(),
            tags: vec!["Rust".to_owned()],
        })
        .await
        .unwrap();

    assert_eq!(created.id, post_id);
    assert_eq!(created.author.name, "Ada");
}
