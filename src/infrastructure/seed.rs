//! Demo content for local development (`SEED_DEMO=1`).

use sea_orm::*;

use crate::domain::DomainError;
use crate::infrastructure::auth::hash_password;
use crate::infrastructure::session::grant_role;
use crate::models::{
    ExhibitionStatus, JournalCategory, PublishStatus, Role, artist, artwork, collection, collector,
    exhibition, exhibition_artwork, interview, journal_entry, user,
};

pub const DEMO_ADMIN_EMAIL: &str = "admin@gallery.local";
pub const DEMO_USER_EMAIL: &str = "visitor@gallery.local";
const DEMO_PASSWORD: &str = "gallery-demo";

async fn demo_user(db: &DatabaseConnection, email: &str, name: &str) -> Result<i32, DomainError> {
    if let Some(existing) = user::Entity::find()
        .filter(user::Column::Email.eq(email))
        .one(db)
        .await?
    {
        return Ok(existing.id);
    }

    let now = chrono::Utc::now().to_rfc3339();
    let created = user::ActiveModel {
        email: Set(email.to_owned()),
        password_hash: Set(hash_password(DEMO_PASSWORD).map_err(DomainError::Internal)?),
        display_name: Set(Some(name.to_owned())),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;
    grant_role(db, created.id, Role::User).await?;
    Ok(created.id)
}

/// Seed users, artists, artworks and editorial content. Content is skipped
/// when artists already exist, so running it twice is harmless.
pub async fn seed_demo_data(db: &DatabaseConnection) -> Result<(), DomainError> {
    // 1. Users
    let admin_id = demo_user(db, DEMO_ADMIN_EMAIL, "Gallery Admin").await?;
    grant_role(db, admin_id, Role::Admin).await?;
    demo_user(db, DEMO_USER_EMAIL, "Visitor").await?;

    if artist::Entity::find().count(db).await? > 0 {
        tracing::info!("Demo content already present, skipping");
        return Ok(());
    }

    let now = chrono::Utc::now().to_rfc3339();

    // 2. Artists
    let artists = [
        ("Mira Sol", "Japan", "Light studies rendered as generative fields."),
        ("Tomás Vega", "Mexico", "Hand-drawn loops and pixel-perfect animation."),
        ("Ada Quill", "United Kingdom", "Algorithmic ink on virtual paper."),
    ];
    let mut artist_ids = Vec::new();
    for (name, nationality, statement) in artists {
        let created = artist::ActiveModel {
            name: Set(name.to_owned()),
            nationality: Set(Some(nationality.to_owned())),
            statement: Set(Some(statement.to_owned())),
            created_at: Set(now.clone()),
            updated_at: Set(now.clone()),
            ..Default::default()
        }
        .insert(db)
        .await?;
        artist_ids.push(created.id);
    }

    // 3. Collection
    let drop = collection::ActiveModel {
        name: Set("First Light".to_owned()),
        curator_statement: Set(Some("Works about dawn, glare and afterimages.".to_owned())),
        release_date: Set(Some("2024-03-01".to_owned())),
        status: Set(PublishStatus::Published),
        created_at: Set(now.clone()),
        updated_at: Set(now.clone()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    // 4. Artworks
    let artworks = [
        ("Dawn Field", 0, "Generative", true),
        ("Glare Study II", 0, "Generative", false),
        ("Loop for a Quiet Street", 1, "Animation", true),
        ("Pixel Garden", 1, "Pixel art", false),
        ("Ink Weather", 2, "Plotter drawing", true),
    ];
    let mut artwork_ids = Vec::new();
    for (title, artist_idx, medium, featured) in artworks {
        let created = artwork::ActiveModel {
            title: Set(title.to_owned()),
            artist_id: Set(artist_ids[artist_idx]),
            collection_id: Set((artist_idx == 0).then_some(drop.id)),
            medium: Set(Some(medium.to_owned())),
            year: Set(Some(2024)),
            edition: Set(Some("1 of 1".to_owned())),
            featured: Set(featured),
            created_at: Set(now.clone()),
            updated_at: Set(now.clone()),
            ..Default::default()
        }
        .insert(db)
        .await?;
        artwork_ids.push(created.id);
    }

    // 5. Editorial
    journal_entry::ActiveModel {
        title: Set("Why Light Still Matters".to_owned()),
        slug: Set("why-light-still-matters".to_owned()),
        excerpt: Set(Some("Notes from the First Light drop.".to_owned())),
        author_name: Set(Some("Gallery Team".to_owned())),
        category: Set(JournalCategory::Essay),
        status: Set(PublishStatus::Published),
        featured: Set(true),
        published_at: Set(Some(now.clone())),
        created_at: Set(now.clone()),
        updated_at: Set(now.clone()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    interview::ActiveModel {
        artist_id: Set(artist_ids[0]),
        title: Set("Mira Sol on Working with Glare".to_owned()),
        slug: Set("mira-sol-on-working-with-glare".to_owned()),
        status: Set(PublishStatus::Published),
        interview_date: Set(Some("2024-02-20".to_owned())),
        created_at: Set(now.clone()),
        updated_at: Set(now.clone()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    let show = exhibition::ActiveModel {
        title: Set("Afterimage".to_owned()),
        slug: Set("afterimage".to_owned()),
        location: Set(Some("Online".to_owned())),
        start_date: Set(Some("2024-03-01".to_owned())),
        status: Set(ExhibitionStatus::Current),
        created_at: Set(now.clone()),
        updated_at: Set(now.clone()),
        ..Default::default()
    }
    .insert(db)
    .await?;
    for (position, artwork_id) in artwork_ids.iter().enumerate() {
        exhibition_artwork::Entity::insert(exhibition_artwork::ActiveModel {
            exhibition_id: Set(show.id),
            artwork_id: Set(*artwork_id),
            display_order: Set(position as i32),
        })
        .exec_without_returning(db)
        .await?;
    }

    collector::ActiveModel {
        name: Set("R. Okafor".to_owned()),
        location: Set(Some("Lagos".to_owned())),
        featured_quote: Set(Some("I collect what I can't stop looking at.".to_owned())),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;

    tracing::info!(
        "Seeded {} artists and {} artworks",
        artist_ids.len(),
        artwork_ids.len()
    );
    Ok(())
}
