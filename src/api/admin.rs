//! Admin CRUD for every content table, plus file uploads.
//!
//! Every handler takes an [`AdminSession`], so anonymous callers get 401 and
//! signed-in non-admins 403 before any work is done. Admin lists include drafts.

use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;

use crate::domain::{Artist, ArtistInput, Artwork, ArtworkFilter, ArtworkInput, DomainError, StoredObject};
use crate::infrastructure::AppState;
use crate::infrastructure::session::AdminSession;
use crate::models::{collector, exhibition, journal_entry, newsletter_subscriber};
use crate::services::collection_service::{self, CollectionDto, CollectionInput};
use crate::services::collector_service::{self, CollectorInput};
use crate::services::exhibition_service::{self, ExhibitionDetail, ExhibitionInput};
use crate::services::interview_service::{self, InterviewDto, InterviewInput};
use crate::services::journal_service::{self, JournalInput};
use crate::services::media_service::{self, MediaKind, PendingUpload};
use crate::services::{artist_service, artwork_service, newsletter_service};

type Created<T> = (StatusCode, Json<T>);

fn created<T>(value: T) -> Created<T> {
    (StatusCode::CREATED, Json(value))
}

/// Text fields and files of a multipart body
#[derive(Default)]
struct MultipartForm {
    fields: HashMap<String, String>,
    files: HashMap<String, PendingUpload>,
}

impl MultipartForm {
    async fn read(mut multipart: Multipart) -> Result<Self, DomainError> {
        let mut form = MultipartForm::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| DomainError::validation(format!("invalid multipart body: {}", e)))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let content_type = field
                        .content_type()
                        .unwrap_or("application/octet-stream")
                        .to_string();
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| DomainError::validation(format!("failed to read {}: {}", name, e)))?;
                    // browsers send an empty part for an untouched file input
                    if file_name.is_empty() && bytes.is_empty() {
                        continue;
                    }
                    form.files.insert(
                        name,
                        PendingUpload {
                            file_name,
                            content_type,
                            bytes: bytes.to_vec(),
                        },
                    );
                }
                None => {
                    let text = field
                        .text()
                        .await
                        .map_err(|e| DomainError::validation(format!("failed to read {}: {}", name, e)))?;
                    form.fields.insert(name, text);
                }
            }
        }
        Ok(form)
    }

    fn payload<T: DeserializeOwned>(&self) -> Result<T, DomainError> {
        let raw = self
            .fields
            .get("payload")
            .ok_or_else(|| DomainError::validation("payload field is required"))?;
        serde_json::from_str(raw)
            .map_err(|e| DomainError::validation(format!("invalid payload: {}", e)))
    }
}

// Uploads

pub async fn upload(
    State(state): State<AppState>,
    _admin: AdminSession,
    multipart: Multipart,
) -> Result<Created<StoredObject>, DomainError> {
    let mut form = MultipartForm::read(multipart).await?;
    let bucket = form
        .fields
        .get("bucket")
        .cloned()
        .ok_or_else(|| DomainError::validation("bucket field is required"))?;
    let file = form
        .files
        .remove("file")
        .ok_or_else(|| DomainError::validation("file field is required"))?;

    let stored = media_service::upload_file(&state, bucket.trim(), &file, MediaKind::Any).await?;
    Ok(created(stored))
}

// Artists

pub async fn list_artists(
    State(state): State<AppState>,
    _admin: AdminSession,
) -> Result<Json<Vec<Artist>>, DomainError> {
    Ok(Json(artist_service::list_artists(&state).await?))
}

pub async fn get_artist(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<i32>,
) -> Result<Json<Artist>, DomainError> {
    Ok(Json(artist_service::get_artist(&state, id).await?))
}

pub async fn create_artist(
    State(state): State<AppState>,
    _admin: AdminSession,
    Json(payload): Json<ArtistInput>,
) -> Result<Created<Artist>, DomainError> {
    Ok(created(artist_service::create_artist(&state, payload).await?))
}

/// Multipart: `payload` (artist JSON), optional `image` and `audio` files
pub async fn create_artist_with_media(
    State(state): State<AppState>,
    _admin: AdminSession,
    multipart: Multipart,
) -> Result<Created<Artist>, DomainError> {
    let mut form = MultipartForm::read(multipart).await?;
    let input: ArtistInput = form.payload()?;
    let image = form.files.remove("image");
    let audio = form.files.remove("audio");
    Ok(created(
        media_service::create_artist_with_media(&state, input, image, audio).await?,
    ))
}

pub async fn update_artist(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<i32>,
    Json(payload): Json<ArtistInput>,
) -> Result<Json<Artist>, DomainError> {
    Ok(Json(artist_service::update_artist(&state, id, payload).await?))
}

pub async fn delete_artist(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<i32>,
) -> Result<StatusCode, DomainError> {
    artist_service::delete_artist(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Artworks

pub async fn list_artworks(
    State(state): State<AppState>,
    _admin: AdminSession,
    Query(filter): Query<ArtworkFilter>,
) -> Result<Json<Vec<Artwork>>, DomainError> {
    Ok(Json(artwork_service::list_artworks(&state, filter).await?))
}

pub async fn get_artwork(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<i32>,
) -> Result<Json<Artwork>, DomainError> {
    Ok(Json(artwork_service::get_artwork(&state, id).await?))
}

pub async fn create_artwork(
    State(state): State<AppState>,
    _admin: AdminSession,
    Json(payload): Json<ArtworkInput>,
) -> Result<Created<Artwork>, DomainError> {
    Ok(created(artwork_service::create_artwork(&state, payload).await?))
}

/// Multipart: `payload` (artwork JSON) and an optional `image` file
pub async fn create_artwork_with_image(
    State(state): State<AppState>,
    _admin: AdminSession,
    multipart: Multipart,
) -> Result<Created<Artwork>, DomainError> {
    let mut form = MultipartForm::read(multipart).await?;
    let input: ArtworkInput = form.payload()?;
    let image = form.files.remove("image");
    Ok(created(
        media_service::create_artwork_with_image(&state, input, image).await?,
    ))
}

pub async fn update_artwork(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<i32>,
    Json(payload): Json<ArtworkInput>,
) -> Result<Json<Artwork>, DomainError> {
    Ok(Json(artwork_service::update_artwork(&state, id, payload).await?))
}

pub async fn delete_artwork(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<i32>,
) -> Result<StatusCode, DomainError> {
    artwork_service::delete_artwork(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Collections

pub async fn list_collections(
    State(state): State<AppState>,
    _admin: AdminSession,
) -> Result<Json<Vec<CollectionDto>>, DomainError> {
    Ok(Json(collection_service::list_all_collections(&state).await?))
}

pub async fn get_collection(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<i32>,
) -> Result<Json<CollectionDto>, DomainError> {
    Ok(Json(collection_service::get_collection(&state, id).await?))
}

pub async fn create_collection(
    State(state): State<AppState>,
    _admin: AdminSession,
    Json(payload): Json<CollectionInput>,
) -> Result<Created<CollectionDto>, DomainError> {
    Ok(created(
        collection_service::create_collection(&state, payload).await?,
    ))
}

pub async fn update_collection(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<i32>,
    Json(payload): Json<CollectionInput>,
) -> Result<Json<CollectionDto>, DomainError> {
    Ok(Json(
        collection_service::update_collection(&state, id, payload).await?,
    ))
}

pub async fn delete_collection(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<i32>,
) -> Result<StatusCode, DomainError> {
    collection_service::delete_collection(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Journal

pub async fn list_journal(
    State(state): State<AppState>,
    _admin: AdminSession,
) -> Result<Json<Vec<journal_entry::Model>>, DomainError> {
    Ok(Json(journal_service::list_all(&state).await?))
}

pub async fn get_journal_entry(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<i32>,
) -> Result<Json<journal_entry::Model>, DomainError> {
    Ok(Json(journal_service::get_journal_entry(&state, id).await?))
}

pub async fn create_journal_entry(
    State(state): State<AppState>,
    _admin: AdminSession,
    Json(payload): Json<JournalInput>,
) -> Result<Created<journal_entry::Model>, DomainError> {
    Ok(created(
        journal_service::create_journal_entry(&state, payload).await?,
    ))
}

pub async fn update_journal_entry(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<i32>,
    Json(payload): Json<JournalInput>,
) -> Result<Json<journal_entry::Model>, DomainError> {
    Ok(Json(
        journal_service::update_journal_entry(&state, id, payload).await?,
    ))
}

pub async fn delete_journal_entry(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<i32>,
) -> Result<StatusCode, DomainError> {
    journal_service::delete_journal_entry(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Interviews

pub async fn list_interviews(
    State(state): State<AppState>,
    _admin: AdminSession,
) -> Result<Json<Vec<InterviewDto>>, DomainError> {
    Ok(Json(interview_service::list_all_interviews(&state).await?))
}

pub async fn get_interview(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<i32>,
) -> Result<Json<InterviewDto>, DomainError> {
    Ok(Json(interview_service::get_interview(&state, id).await?))
}

pub async fn create_interview(
    State(state): State<AppState>,
    _admin: AdminSession,
    Json(payload): Json<InterviewInput>,
) -> Result<Created<InterviewDto>, DomainError> {
    Ok(created(
        interview_service::create_interview(&state, payload).await?,
    ))
}

pub async fn update_interview(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<i32>,
    Json(payload): Json<InterviewInput>,
) -> Result<Json<InterviewDto>, DomainError> {
    Ok(Json(
        interview_service::update_interview(&state, id, payload).await?,
    ))
}

pub async fn delete_interview(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<i32>,
) -> Result<StatusCode, DomainError> {
    interview_service::delete_interview(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Exhibitions

pub async fn list_exhibitions(
    State(state): State<AppState>,
    _admin: AdminSession,
) -> Result<Json<Vec<exhibition::Model>>, DomainError> {
    Ok(Json(
        exhibition_service::list_exhibitions(&state, None).await?,
    ))
}

pub async fn get_exhibition(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<i32>,
) -> Result<Json<ExhibitionDetail>, DomainError> {
    Ok(Json(exhibition_service::get_exhibition(&state, id).await?))
}

pub async fn create_exhibition(
    State(state): State<AppState>,
    _admin: AdminSession,
    Json(payload): Json<ExhibitionInput>,
) -> Result<Created<exhibition::Model>, DomainError> {
    Ok(created(
        exhibition_service::create_exhibition(&state, payload).await?,
    ))
}

pub async fn update_exhibition(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<i32>,
    Json(payload): Json<ExhibitionInput>,
) -> Result<Json<exhibition::Model>, DomainError> {
    Ok(Json(
        exhibition_service::update_exhibition(&state, id, payload).await?,
    ))
}

pub async fn delete_exhibition(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<i32>,
) -> Result<StatusCode, DomainError> {
    exhibition_service::delete_exhibition(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct ExhibitionArtworksRequest {
    pub artwork_ids: Vec<i32>,
}

pub async fn set_exhibition_artworks(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<i32>,
    Json(payload): Json<ExhibitionArtworksRequest>,
) -> Result<Json<ExhibitionDetail>, DomainError> {
    Ok(Json(
        exhibition_service::set_exhibition_artworks(&state, id, payload.artwork_ids).await?,
    ))
}

// Collectors

pub async fn list_collectors(
    State(state): State<AppState>,
    _admin: AdminSession,
) -> Result<Json<Vec<collector::Model>>, DomainError> {
    Ok(Json(collector_service::list_collectors(&state).await?))
}

pub async fn get_collector(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<i32>,
) -> Result<Json<collector::Model>, DomainError> {
    Ok(Json(collector_service::get_collector(&state, id).await?))
}

pub async fn create_collector(
    State(state): State<AppState>,
    _admin: AdminSession,
    Json(payload): Json<CollectorInput>,
) -> Result<Created<collector::Model>, DomainError> {
    Ok(created(
        collector_service::create_collector(&state, payload).await?,
    ))
}

pub async fn update_collector(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<i32>,
    Json(payload): Json<CollectorInput>,
) -> Result<Json<collector::Model>, DomainError> {
    Ok(Json(
        collector_service::update_collector(&state, id, payload).await?,
    ))
}

pub async fn delete_collector(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<i32>,
) -> Result<StatusCode, DomainError> {
    collector_service::delete_collector(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Newsletter

pub async fn list_subscribers(
    State(state): State<AppState>,
    _admin: AdminSession,
) -> Result<Json<Vec<newsletter_subscriber::Model>>, DomainError> {
    Ok(Json(newsletter_service::list_subscribers(&state).await?))
}

pub async fn delete_subscriber(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<i32>,
) -> Result<StatusCode, DomainError> {
    newsletter_service::delete_subscriber(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
