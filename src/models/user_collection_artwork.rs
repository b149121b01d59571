use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_collection_artworks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_collection_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub artwork_id: i32,
    pub added_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user_collection::Entity",
        from = "Column::UserCollectionId",
        to = "super::user_collection::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    UserCollection,
    #[sea_orm(
        belongs_to = "super::artwork::Entity",
        from = "Column::ArtworkId",
        to = "super::artwork::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Artwork,
}

impl Related<super::user_collection::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserCollection.def()
    }
}

impl Related<super::artwork::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Artwork.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
