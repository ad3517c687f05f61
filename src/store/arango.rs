use base64::Engine;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, warn};
use url::Url;

use super::{DocumentStore, RawRecord, StoreError};
use crate::http_client::{self, MAX_RESPONSE_BYTES};

/// Documents requested per cursor round trip.
pub const CURSOR_BATCH_SIZE: usize = 4000;
const COLLECTION_QUERY: &str = "FOR x IN @@collection RETURN x";
const ERROR_COLLECTION_NOT_FOUND: i64 = 1203;
const ERROR_SNIPPET_BYTES: usize = 2048;

/// Basic-auth credentials passed through to the store.
#[derive(Clone)]
pub struct StoreCredentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for StoreCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl StoreCredentials {
    fn authorization_header(&self) -> String {
        let raw = format!("{}:{}", self.username, self.password);
        format!(
            "Basic {}",
            base64::engine::general_purpose::STANDARD.encode(raw)
        )
    }
}

/// ArangoDB client using the HTTP cursor API.
#[derive(Debug, Clone)]
pub struct ArangoStore {
    base: Url,
    authorization: String,
}

impl ArangoStore {
    /// Create a client for the server at `base_url` (e.g. `http://127.0.0.1:8529`).
    pub fn new(base_url: &str, credentials: StoreCredentials) -> Result<Self, StoreError> {
        let base = Url::parse(base_url).map_err(|err| StoreError::InvalidUrl {
            url: base_url.to_string(),
            message: err.to_string(),
        })?;
        if base.cannot_be_a_base() || !matches!(base.scheme(), "http" | "https") {
            return Err(StoreError::InvalidUrl {
                url: base_url.to_string(),
                message: "expected an http(s) base url".to_string(),
            });
        }
        Ok(Self {
            base,
            authorization: credentials.authorization_header(),
        })
    }

    /// Open a cursor session scoped to one database.
    ///
    /// The session owns at most one server-side cursor and deletes it on drop if the
    /// cursor was not fully consumed.
    pub fn open_session(&self, database: &str) -> CursorSession<'_> {
        CursorSession {
            store: self,
            database: database.to_string(),
            open_cursor: None,
        }
    }

    fn endpoint(&self, database: &str, cursor_id: Option<&str>) -> Result<Url, StoreError> {
        let mut url = self.base.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| StoreError::InvalidUrl {
                url: self.base.to_string(),
                message: "url cannot carry a path".to_string(),
            })?;
            segments.pop_if_empty();
            segments.extend(["_db", database, "_api", "cursor"]);
            if let Some(id) = cursor_id {
                segments.push(id);
            }
        }
        Ok(url)
    }
}

impl DocumentStore for ArangoStore {
    fn backend_name(&self) -> &'static str {
        "arango"
    }

    fn fetch_all(&self, database: &str, collection: &str) -> Result<Vec<RawRecord>, StoreError> {
        let mut session = self.open_session(database);
        session.query_collection(collection)
    }
}

/// A live connection scope against one database.
pub struct CursorSession<'a> {
    store: &'a ArangoStore,
    database: String,
    open_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CursorBatch {
    #[serde(default)]
    result: Vec<Value>,
    #[serde(default, rename = "hasMore")]
    has_more: bool,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    error: bool,
    #[serde(default, rename = "errorNum")]
    error_num: i64,
    #[serde(default, rename = "errorMessage")]
    error_message: String,
}

impl CursorSession<'_> {
    /// Read every document of `collection`, following the cursor until exhausted.
    pub fn query_collection(&mut self, collection: &str) -> Result<Vec<RawRecord>, StoreError> {
        let url = self.store.endpoint(&self.database, None)?;
        let body = json!({
            "query": COLLECTION_QUERY,
            "bindVars": { "@collection": collection },
            "batchSize": CURSOR_BATCH_SIZE,
        });
        let mut batch = self
            .send("POST", &url, Some(body))
            .map_err(|err| self.classify_missing(err, collection))?;

        let mut records = Vec::new();
        loop {
            let has_more = batch.has_more;
            // Track the cursor before reading the batch so a bad document still releases it.
            self.open_cursor = if has_more { batch.id.take() } else { None };
            append_documents(&mut records, batch.result, &url)?;
            debug!(
                collection,
                fetched = records.len(),
                has_more,
                "Received cursor batch"
            );
            if !has_more {
                break;
            }
            let Some(id) = self.open_cursor.clone() else {
                return Err(StoreError::InvalidResponse {
                    url: url.to_string(),
                    message: "cursor reported more results without an id".to_string(),
                });
            };
            let next_url = self.store.endpoint(&self.database, Some(&id))?;
            batch = self.send("PUT", &next_url, None)?;
        }
        Ok(records)
    }

    fn send(&self, method: &str, url: &Url, body: Option<Value>) -> Result<CursorBatch, StoreError> {
        let request = http_client::agent()
            .request(method, url.as_str())
            .set("Authorization", &self.store.authorization)
            .set("Accept", "application/json");
        let result = match body {
            Some(body) => request.send_json(body),
            None => request.call(),
        };
        let response = result.map_err(|err| map_call_error(url, err))?;
        let bytes = http_client::read_response_bytes(response, MAX_RESPONSE_BYTES).map_err(
            |err| StoreError::InvalidResponse {
                url: url.to_string(),
                message: err.to_string(),
            },
        )?;
        let batch: CursorBatch =
            serde_json::from_slice(&bytes).map_err(|err| StoreError::InvalidResponse {
                url: url.to_string(),
                message: err.to_string(),
            })?;
        if batch.error {
            return Err(StoreError::Query {
                code: batch.error_num,
                message: batch.error_message,
            });
        }
        Ok(batch)
    }

    fn classify_missing(&self, err: StoreError, collection: &str) -> StoreError {
        let missing = match &err {
            StoreError::Status { status: 404, body, .. } => {
                arango_error_num(body) == Some(ERROR_COLLECTION_NOT_FOUND)
            }
            StoreError::Query { code, .. } => *code == ERROR_COLLECTION_NOT_FOUND,
            _ => false,
        };
        if missing {
            StoreError::MissingCollection {
                database: self.database.clone(),
                collection: collection.to_string(),
            }
        } else {
            err
        }
    }
}

impl Drop for CursorSession<'_> {
    fn drop(&mut self) {
        let Some(id) = self.open_cursor.take() else {
            return;
        };
        let url = match self.store.endpoint(&self.database, Some(&id)) {
            Ok(url) => url,
            Err(err) => {
                warn!("Cannot release cursor {id}: {err}");
                return;
            }
        };
        let result = http_client::agent()
            .delete(url.as_str())
            .set("Authorization", &self.store.authorization)
            .call();
        match result {
            Ok(_) => debug!("Released cursor {id}"),
            Err(err) => warn!("Failed to release cursor {id}: {err}"),
        }
    }
}

fn append_documents(
    records: &mut Vec<RawRecord>,
    documents: Vec<Value>,
    url: &Url,
) -> Result<(), StoreError> {
    records.reserve(documents.len());
    for document in documents {
        match document {
            Value::Object(map) => records.push(map),
            other => {
                return Err(StoreError::InvalidResponse {
                    url: url.to_string(),
                    message: format!("expected a document object, got {other}"),
                });
            }
        }
    }
    Ok(())
}

fn map_call_error(url: &Url, err: ureq::Error) -> StoreError {
    match err {
        ureq::Error::Status(status, response) => StoreError::Status {
            url: url.to_string(),
            status,
            body: http_client::read_error_snippet(response, ERROR_SNIPPET_BYTES),
        },
        ureq::Error::Transport(transport) => StoreError::Transport {
            url: url.to_string(),
            message: transport.to_string(),
        },
    }
}

fn arango_error_num(body: &str) -> Option<i64> {
    serde_json::from_str::<Value>(body)
        .ok()?
        .get("errorNum")?
        .as_i64()
}
