//! Document store access.
//!
//! The fetcher only needs one capability from a store: read every document of a
//! collection. Backends implement [`DocumentStore`] and are injected by the caller:
//! - [`ArangoStore`] talks to ArangoDB over its HTTP cursor API.
//! - [`JsonDirStore`] reads exported collections from disk.
//! - [`MemoryStore`] holds records in-process for tests and demos.

mod arango;
mod json_dir;
mod memory;

use std::path::PathBuf;

use thiserror::Error;

pub use arango::{ArangoStore, CursorSession, StoreCredentials};
pub use json_dir::JsonDirStore;
pub use memory::MemoryStore;

use crate::config::{StoreBackend, StoreSettings};

/// One document as returned by the store: field name to scalar value.
pub type RawRecord = serde_json::Map<String, serde_json::Value>;

/// Read access to a document collection.
pub trait DocumentStore {
    /// Short backend label used in logs.
    fn backend_name(&self) -> &'static str;

    /// Retrieve every document in `collection` of `database`.
    fn fetch_all(&self, database: &str, collection: &str) -> Result<Vec<RawRecord>, StoreError>;
}

/// Failures reported by a store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Connection-level failure (DNS, refused, timeout, TLS).
    #[error("Store transport error at {url}: {message}")]
    Transport { url: String, message: String },
    /// The server answered with a non-success status.
    #[error("Store returned HTTP {status} for {url}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },
    /// The server reported a query-level error in its JSON body.
    #[error("Store query failed (code {code}): {message}")]
    Query { code: i64, message: String },
    /// A response body could not be read or decoded.
    #[error("Invalid store response from {url}: {message}")]
    InvalidResponse { url: String, message: String },
    /// The configured base URL is not usable.
    #[error("Invalid store url {url}: {message}")]
    InvalidUrl { url: String, message: String },
    /// Collection not present in the store.
    #[error("Collection {collection} not found in database {database}")]
    MissingCollection { database: String, collection: String },
    /// Local IO error while reading an exported collection.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Exported collection file is not valid JSON.
    #[error("Invalid JSON in {path}: {message}")]
    Json { path: PathBuf, message: String },
}

/// Construct the store backend selected in the settings.
pub fn open_store(settings: &StoreSettings) -> Result<Box<dyn DocumentStore>, StoreError> {
    match settings.backend {
        StoreBackend::Arango => {
            let credentials = StoreCredentials {
                username: settings.username.clone(),
                password: settings.resolved_password(),
            };
            Ok(Box::new(ArangoStore::new(&settings.url, credentials)?))
        }
        StoreBackend::JsonDir => {
            let root = settings
                .data_dir
                .clone()
                .unwrap_or_else(|| PathBuf::from("data"));
            Ok(Box::new(JsonDirStore::new(root)))
        }
    }
}
