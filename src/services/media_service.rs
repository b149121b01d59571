//! Media Service - image and audio uploads for admin writes
//!
//! Files are stored before the row that references them is written. When the
//! write (or a later upload in the same request) fails, every file stored for
//! that request is deleted again before the error is returned.

use std::future::Future;

use super::{artist_service, artwork_service};
use crate::domain::{Artist, ArtistInput, Artwork, ArtworkInput, DomainError, StoredObject};
use crate::infrastructure::AppState;

pub const ARTWORK_BUCKET: &str = "artworks";
pub const ARTIST_BUCKET: &str = "artists";
pub const AUDIO_BUCKET: &str = "audio";

/// Buckets the generic upload endpoint accepts
pub const BUCKETS: &[&str] = &[
    ARTWORK_BUCKET,
    ARTIST_BUCKET,
    AUDIO_BUCKET,
    "collections",
    "collectors",
    "exhibitions",
    "interviews",
    "journal",
    "avatars",
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MediaKind {
    Image,
    Audio,
    /// Either of the above
    Any,
}

impl MediaKind {
    fn accepts(self, content_type: &str) -> bool {
        let is_image = content_type.starts_with("image/");
        let is_audio = content_type.starts_with("audio/");
        match self {
            MediaKind::Image => is_image,
            MediaKind::Audio => is_audio,
            MediaKind::Any => is_image || is_audio,
        }
    }
}

/// A file received in a request, not yet stored.
#[derive(Debug, Clone)]
pub struct PendingUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

pub fn validate_upload(
    state: &AppState,
    upload: &PendingUpload,
    kind: MediaKind,
) -> Result<(), DomainError> {
    if upload.bytes.is_empty() {
        return Err(DomainError::validation(format!(
            "{} is empty",
            upload.file_name
        )));
    }
    if upload.bytes.len() > state.config.max_upload_bytes {
        return Err(DomainError::validation(format!(
            "{} exceeds the {} byte upload limit",
            upload.file_name, state.config.max_upload_bytes
        )));
    }
    if !kind.accepts(&upload.content_type) {
        return Err(DomainError::validation(format!(
            "unsupported content type '{}'",
            upload.content_type
        )));
    }
    Ok(())
}

/// Store one file in `bucket`.
pub async fn upload_file(
    state: &AppState,
    bucket: &str,
    upload: &PendingUpload,
    kind: MediaKind,
) -> Result<StoredObject, DomainError> {
    if !BUCKETS.contains(&bucket) {
        return Err(DomainError::validation(format!("unknown bucket '{}'", bucket)));
    }
    validate_upload(state, upload, kind)?;
    state
        .storage
        .put(bucket, &upload.file_name, &upload.content_type, &upload.bytes)
        .await
}

async fn rollback(state: &AppState, stored: &[StoredObject]) {
    for object in stored {
        match state.storage.delete(&object.bucket, &object.path).await {
            Ok(()) => tracing::warn!(
                "Rolled back upload {}/{} after a failed write",
                object.bucket,
                object.path
            ),
            Err(e) => tracing::error!(
                "Failed to roll back upload {}/{}: {}",
                object.bucket,
                object.path,
                e
            ),
        }
    }
}

/// Store every upload, then run `write` with the stored objects (in the same order).
pub async fn upload_then_write<T, F, Fut>(
    state: &AppState,
    uploads: Vec<(&'static str, MediaKind, PendingUpload)>,
    write: F,
) -> Result<T, DomainError>
where
    F: FnOnce(Vec<StoredObject>) -> Fut,
    Fut: Future<Output = Result<T, DomainError>>,
{
    let mut stored: Vec<StoredObject> = Vec::with_capacity(uploads.len());
    for (bucket, kind, upload) in &uploads {
        match upload_file(state, bucket, upload, *kind).await {
            Ok(object) => stored.push(object),
            Err(e) => {
                rollback(state, &stored).await;
                return Err(e);
            }
        }
    }

    match write(stored.clone()).await {
        Ok(value) => Ok(value),
        Err(e) => {
            rollback(state, &stored).await;
            Err(e)
        }
    }
}

/// Create an artwork, storing its image first when one is given.
pub async fn create_artwork_with_image(
    state: &AppState,
    input: ArtworkInput,
    image: Option<PendingUpload>,
) -> Result<Artwork, DomainError> {
    let uploads = image
        .map(|file| vec![(ARTWORK_BUCKET, MediaKind::Image, file)])
        .unwrap_or_default();

    upload_then_write(state, uploads, |stored| async move {
        let mut input = input;
        if let Some(image) = stored.into_iter().next() {
            input.image_url = Some(image.public_url);
        }
        artwork_service::create_artwork(state, input).await
    })
    .await
}

/// Create an artist with an optional portrait and narration track.
pub async fn create_artist_with_media(
    state: &AppState,
    input: ArtistInput,
    image: Option<PendingUpload>,
    audio: Option<PendingUpload>,
) -> Result<Artist, DomainError> {
    let has_image = image.is_some();
    let mut uploads = Vec::new();
    if let Some(file) = image {
        uploads.push((ARTIST_BUCKET, MediaKind::Image, file));
    }
    if let Some(file) = audio {
        uploads.push((AUDIO_BUCKET, MediaKind::Audio, file));
    }

    upload_then_write(state, uploads, |stored| async move {
        let mut input = input;
        let mut stored = stored.into_iter();
        if has_image {
            input.image_url = stored.next().map(|o| o.public_url);
        }
        if let Some(audio) = stored.next() {
            input.audio_url = Some(audio.public_url);
        }
        artist_service::create_artist(state, input).await
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::config::Config;
    use crate::infrastructure::db::init_db;

    async fn test_state(dir: &tempfile::TempDir) -> AppState {
        let config = Config::for_tests(dir.path().to_path_buf());
        let db = init_db(&config.database_url).await.unwrap();
        AppState::new(db, config)
    }

    fn png(name: &str) -> PendingUpload {
        PendingUpload {
            file_name: name.to_string(),
            content_type: "image/png".to_string(),
            bytes: vec![0x89, b'P', b'N', b'G'],
        }
    }

    fn stored_files(dir: &tempfile::TempDir, bucket: &str) -> usize {
        std::fs::read_dir(dir.path().join(bucket))
            .map(|entries| entries.count())
            .unwrap_or(0)
    }

    #[tokio::test]
    async fn failed_write_removes_uploaded_image() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir).await;

        let input = ArtworkInput {
            title: "Orphan".to_string(),
            artist_id: 999,
            ..Default::default()
        };
        let err = create_artwork_with_image(&state, input, Some(png("orphan.png")))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(stored_files(&dir, ARTWORK_BUCKET), 0);
    }

    #[tokio::test]
    async fn successful_write_keeps_image_and_links_it() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir).await;

        let artist = artist_service::create_artist(
            &state,
            ArtistInput {
                name: "Mira Sol".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let artwork = create_artwork_with_image(
            &state,
            ArtworkInput {
                title: "Tide".to_string(),
                artist_id: artist.id,
                ..Default::default()
            },
            Some(png("tide.png")),
        )
        .await
        .unwrap();

        let url = artwork.image_url.unwrap();
        assert!(url.starts_with("/storage/artworks/"));
        assert_eq!(stored_files(&dir, ARTWORK_BUCKET), 1);
    }

    #[tokio::test]
    async fn bad_second_upload_rolls_back_the_first() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir).await;

        let not_audio = PendingUpload {
            file_name: "notes.txt".to_string(),
            content_type: "text/plain".to_string(),
            bytes: b"hello".to_vec(),
        };
        let err = create_artist_with_media(
            &state,
            ArtistInput {
                name: "Kai".to_string(),
                ..Default::default()
            },
            Some(png("kai.png")),
            Some(not_audio),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(stored_files(&dir, ARTIST_BUCKET), 0);
    }

    #[tokio::test]
    async fn oversized_and_empty_files_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir).await;

        let big = PendingUpload {
            bytes: vec![0; state.config.max_upload_bytes + 1],
            ..png("big.png")
        };
        assert!(validate_upload(&state, &big, MediaKind::Image).is_err());

        let empty = PendingUpload {
            bytes: Vec::new(),
            ..png("empty.png")
        };
        assert!(validate_upload(&state, &empty, MediaKind::Image).is_err());
        assert!(validate_upload(&state, &png("ok.png"), MediaKind::Audio).is_err());
        assert!(validate_upload(&state, &png("ok.png"), MediaKind::Any).is_ok());
    }
}
