use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::{JournalCategory, PublishStatus};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "journal_entries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    #[sea_orm(unique)]
    pub slug: String,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub author_name: Option<String>,
    pub image_url: Option<String>,
    pub category: JournalCategory,
    pub status: PublishStatus,
    #[sea_orm(default_value = false)]
    pub featured: bool,
    pub published_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
