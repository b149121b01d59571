use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_collections")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub name: String,
    pub description: Option<String>,
    #[sea_orm(default_value = false)]
    pub is_public: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user_collection_artwork::Entity")]
    UserCollectionArtwork,
}

impl Related<super::user_collection_artwork::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserCollectionArtwork.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
