//! Post entity for SeaORM.

use sea_orm::entity::prelude::*;

use blogforge_core::domain::{Post, PostSummary, UserPost};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub description: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub tags: Vec<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AuthorId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Author,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Join with the author row into a full domain post.
    pub fn into_post(self, author: super::user::Model) -> Post {
        Post {
            id: self.id,
            author_id: self.author_id,
            title: self.title,
            description: self.description,
            content: self.content,
            tags: self.tags,
            author: author.into_author(),
            created_at: self.created_at.into(),
            updated_at: self.updated_at.into(),
        }
    }

    pub fn into_summary(self, author: super::user::Model) -> PostSummary {
        PostSummary {
            id: self.id,
            title: self.title,
            description: self.description,
            tags: self.tags,
            created_at: self.created_at.into(),
            updated_at: self.updated_at.into(),
            author: author.into_author().summary(),
        }
    }
}

impl From<Model> for UserPost {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            tags: model.tags,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}
