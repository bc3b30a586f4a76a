// src/application/mod.rs
//
// Application Layer
//
// ARCHITECTURE:
// - Sits above services; the embedding UI talks only to this layer
// - Aggregates repository reads into catalog snapshots
// - Translates internal errors into user-facing responses

pub mod error_handling;
pub mod state;

pub use error_handling::{ErrorResponse, ErrorType, ToErrorResponse};
pub use state::{AppState, CatalogSnapshot};
