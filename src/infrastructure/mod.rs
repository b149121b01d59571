//! Infrastructure layer - Framework implementations
//!
//! This layer contains:
//! - Database connection and migrations (db)
//! - HTTP server setup (server)
//! - Configuration loading (config)
//! - Authentication and sessions (auth, session)
//! - Query cache (cache)
//! - Object storage (storage)
//! - Repository implementations (repositories)
//! - Application state (state)

pub mod auth;
pub mod cache;
pub mod config;
pub mod db;
pub mod repositories;
pub mod seed;
pub mod server;
pub mod session;
pub mod state;
pub mod storage;

pub use repositories::*;
pub use state::AppState;
