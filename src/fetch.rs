use std::time::Instant;

use tracing::{info, warn};

use crate::error::PipelineError;
use crate::store::{DocumentStore, RawRecord};

/// Retrieve every record of one category collection.
///
/// Store failures are reported as [`PipelineError::UpstreamUnavailable`] without retry.
pub fn fetch_collection(
    store: &dyn DocumentStore,
    database: &str,
    collection_id: &str,
) -> Result<Vec<RawRecord>, PipelineError> {
    let started = Instant::now();
    info!(
        backend = store.backend_name(),
        database,
        collection = collection_id,
        "Fetching collection"
    );
    match store.fetch_all(database, collection_id) {
        Ok(records) => {
            info!(
                collection = collection_id,
                records = records.len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Fetched collection"
            );
            Ok(records)
        }
        Err(err) => {
            warn!(
                collection = collection_id,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Fetch failed: {err}"
            );
            Err(PipelineError::UpstreamUnavailable(err))
        }
    }
}
