use std::env;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
const DEFAULT_CACHE_MAX_ENTRIES: usize = 4096;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub profile: String,
    /// Root directory of the local object store
    pub storage_dir: PathBuf,
    /// URL prefix under which stored objects are served
    pub public_storage_url: String,
    pub cache_ttl: Duration,
    /// Upper bound on cached query results
    pub cache_max_entries: usize,
    pub max_upload_bytes: usize,
    pub gallery_name: String,
    pub contact_email: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_env_with_profile(None)
    }

    /// Like [`Config::from_env`], with a profile that overrides `PROFILE`.
    pub fn from_env_with_profile(profile: Option<String>) -> Self {
        let profile = profile
            .or_else(|| env::var("PROFILE").ok())
            .unwrap_or_else(|| "default".to_string());

        let database_url = env::var("DATABASE_URL").unwrap_or_else(|_| {
            if profile == "default" {
                "sqlite://gallery.db?mode=rwc".to_string()
            } else {
                format!("sqlite://gallery_{}.db?mode=rwc", profile)
            }
        });

        Self {
            database_url,
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .ok()
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_else(Vec::new),
            storage_dir: env::var("STORAGE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("storage")),
            public_storage_url: env::var("PUBLIC_STORAGE_URL")
                .unwrap_or_else(|_| "/storage".to_string()),
            cache_ttl: Duration::from_secs(
                env::var("CACHE_TTL_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(60),
            ),
            cache_max_entries: env::var("CACHE_MAX_ENTRIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(DEFAULT_CACHE_MAX_ENTRIES),
            max_upload_bytes: env::var("MAX_UPLOAD_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
            gallery_name: env::var("GALLERY_NAME").unwrap_or_else(|_| "Gallery".to_string()),
            contact_email: env::var("CONTACT_EMAIL").ok(),
            profile,
        }
    }

    /// Settings for tests and embedded use: in-memory database, temp storage.
    pub fn for_tests(storage_dir: PathBuf) -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            port: 0,
            cors_allowed_origins: Vec::new(),
            profile: "test".to_string(),
            storage_dir,
            public_storage_url: "/storage".to_string(),
            cache_ttl: Duration::from_secs(60),
            cache_max_entries: DEFAULT_CACHE_MAX_ENTRIES,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            gallery_name: "Test Gallery".to_string(),
            contact_email: None,
        }
    }
}
