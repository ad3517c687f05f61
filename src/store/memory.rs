use std::collections::BTreeMap;

use super::{DocumentStore, RawRecord, StoreError};

/// In-process store keyed by `(database, collection)`.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    collections: BTreeMap<(String, String), Vec<RawRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the contents of a collection.
    pub fn insert_collection(
        &mut self,
        database: impl Into<String>,
        collection: impl Into<String>,
        records: Vec<RawRecord>,
    ) {
        self.collections
            .insert((database.into(), collection.into()), records);
    }

    pub fn with_collection(
        mut self,
        database: impl Into<String>,
        collection: impl Into<String>,
        records: Vec<RawRecord>,
    ) -> Self {
        self.insert_collection(database, collection, records);
        self
    }
}

impl DocumentStore for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    fn fetch_all(&self, database: &str, collection: &str) -> Result<Vec<RawRecord>, StoreError> {
        self.collections
            .get(&(database.to_string(), collection.to_string()))
            .cloned()
            .ok_or_else(|| StoreError::MissingCollection {
                database: database.to_string(),
                collection: collection.to_string(),
            })
    }
}
