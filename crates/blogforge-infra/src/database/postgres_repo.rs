//! PostgreSQL repository implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, Query};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbConn, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

use blogforge_core::domain::{AuthorRanking, NewPost, Post, PostSummary, User, UserPost};
use blogforge_core::error::RepoError;
use blogforge_core::ports::{PostRepository, UserRepository};

use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => {
            let head: String = local.chars().take(1).collect();
            if local.chars().count() > 1 {
                format!("{head}***@{domain}")
            } else {
                format!("***@{domain}")
            }
        }
        None => "***".to_string(),
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        // Mask email for logging to avoid PII in logs
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }
}

/// PostgreSQL post repository. Every post read joins its author row.
pub struct PostgresPostRepository {
    db: DbConn,
}

impl PostgresPostRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    fn orphan(post_id: Uuid) -> RepoError {
        RepoError::Query(format!("Post {post_id} has no author"))
    }

    fn summaries(
        rows: Vec<(post::Model, Option<user::Model>)>,
    ) -> Result<Vec<PostSummary>, RepoError> {
        rows.into_iter()
            .map(|(post, author)| {
                let author = author.ok_or_else(|| Self::orphan(post.id))?;
                Ok(post.into_summary(author))
            })
            .collect()
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn create(&self, new_post: NewPost) -> Result<Post, RepoError> {
        let author = UserEntity::find_by_id(new_post.author_id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .ok_or(RepoError::NotFound)?;

        let now = Utc::now().fixed_offset();
        let model = post::ActiveModel {
            id: Set(Uuid::new_v4()),
            author_id: Set(new_post.author_id),
            title: Set(new_post.title),
            description: Set(new_post.description),
            content: Set(new_post.content),
            tags: Set(new_post.tags),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(map_db_err)?;

        Ok(model.into_post(author))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let row = PostEntity::find_by_id(id)
            .find_also_related(UserEntity)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        match row {
            None => Ok(None),
            Some((post, Some(author))) => Ok(Some(post.into_post(author))),
            Some((post, None)) => Err(Self::orphan(post.id)),
        }
    }

    async fn list(&self, skip: u64, take: u64) -> Result<Vec<PostSummary>, RepoError> {
        let rows = PostEntity::find()
            .find_also_related(UserEntity)
            .order_by_desc(post::Column::CreatedAt)
            .offset(skip)
            .limit(take)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Self::summaries(rows)
    }

    async fn count(&self) -> Result<u64, RepoError> {
        PostEntity::find().count(&self.db).await.map_err(map_db_err)
    }

    async fn find_by_author(&self, author_id: Uuid) -> Result<Vec<UserPost>, RepoError> {
        let rows = PostEntity::find()
            .filter(post::Column::AuthorId.eq(author_id))
            .order_by_desc(post::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count_by_author(&self, author_id: Uuid) -> Result<u64, RepoError> {
        PostEntity::find()
            .filter(post::Column::AuthorId.eq(author_id))
            .count(&self.db)
            .await
            .map_err(map_db_err)
    }

    async fn created_since(
        &self,
        since: DateTime<Utc>,
        limit: u64,
    ) -> Result<Vec<PostSummary>, RepoError> {
        let rows = PostEntity::find()
            .find_also_related(UserEntity)
            .filter(post::Column::CreatedAt.gte(since.fixed_offset()))
            .order_by_desc(post::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Self::summaries(rows)
    }

    async fn author_tags(&self, author_id: Uuid) -> Result<Vec<String>, RepoError> {
        let tag_lists: Vec<Vec<String>> = PostEntity::find()
            .select_only()
            .column(post::Column::Tags)
            .filter(post::Column::AuthorId.eq(author_id))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        let mut tags: Vec<String> = Vec::new();
        for tag in tag_lists.into_iter().flatten() {
            if !tags.contains(&tag) {
                tags.push(tag);
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
        let rows = PostEntity::find()
            .find_also_related(UserEntity)
            .filter(Expr::cust_with_values(
                r#""posts"."tags" && ?"#,
                [tags.to_vec()],
            ))
            .filter(post::Column::AuthorId.ne(exclude_author))
            .order_by_desc(post::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Self::summaries(rows)
    }

    async fn latest(&self) -> Result<Option<PostSummary>, RepoError> {
        let row = PostEntity::find()
            .find_also_related(UserEntity)
            .order_by_desc(post::Column::CreatedAt)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(Self::summaries(row.into_iter().collect())?.pop())
    }

    async fn top_authors(
        &self,
        since: DateTime<Utc>,
        limit: u64,
    ) -> Result<Vec<AuthorRanking>, RepoError> {
        let recent_authors = Query::select()
            .distinct()
            .column(post::Column::AuthorId)
            .from(PostEntity)
            .and_where(post::Column::CreatedAt.gte(since.fixed_offset()))
            .to_owned();

        let counts: Vec<(Uuid, i64)> = PostEntity::find()
            .select_only()
            .column(post::Column::AuthorId)
            .column_as(Expr::col((PostEntity, post::Column::Id)).count(), "post_count")
            .filter(post::Column::AuthorId.in_subquery(recent_authors))
            .group_by(post::Column::AuthorId)
            .order_by_desc(Expr::cust("post_count"))
            .limit(limit)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        let ids: Vec<Uuid> = counts.iter().map(|(id, _)| *id).collect();
        let mut authors = UserEntity::find()
            .filter(user::Column::Id.is_in(ids))
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        let rankings = counts
            .into_iter()
            .filter_map(|(id, count)| {
                let idx = authors.iter().position(|a| a.id == id)?;
                Some(AuthorRanking {
                    author: authors.swap_remove(idx).into_author(),
                    post_count: count.max(0) as u64,
                })
            })
            .collect();
        Ok(rankings)
    }
}
