use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::ExhibitionStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "exhibitions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    #[sea_orm(unique)]
    pub slug: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub image_url: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub status: ExhibitionStatus,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::exhibition_artwork::Entity")]
    ExhibitionArtwork,
}

impl Related<super::exhibition_artwork::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ExhibitionArtwork.def()
    }
}

impl Related<super::artwork::Entity> for Entity {
    fn to() -> RelationDef {
        super::exhibition_artwork::Relation::Artwork.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::exhibition_artwork::Relation::Exhibition.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
