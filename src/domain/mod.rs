//! Domain layer - Pure business abstractions
//!
//! This layer contains NO framework dependencies (no Axum).
//! Only trait definitions, DTOs and domain error types.

pub mod errors;
pub mod repositories;
pub mod storage;

pub use errors::DomainError;
pub use repositories::*;
pub use storage::{ObjectStore, StoredObject};
