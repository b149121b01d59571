use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "artists")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub bio: Option<String>,
    pub statement: Option<String>,
    pub nationality: Option<String>,
    pub image_url: Option<String>,
    pub audio_url: Option<String>, // narration
    pub website_url: Option<String>,
    pub instagram_url: Option<String>,
    pub twitter_url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::artwork::Entity")]
    Artwork,
    #[sea_orm(has_many = "super::interview::Entity")]
    Interview,
    #[sea_orm(has_many = "super::artist_follow::Entity")]
    ArtistFollow,
}

impl Related<super::artwork::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Artwork.def()
    }
}

impl Related<super::interview::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Interview.def()
    }
}

impl Related<super::artist_follow::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ArtistFollow.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
