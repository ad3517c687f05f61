use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use serde_json::Value;

use super::{DocumentStore, RawRecord, StoreError};

/// Reads collections exported to disk as `<root>/<database>/<collection>.json`
/// (a JSON array of documents) or `<collection>.jsonl` (one document per line).
#[derive(Debug, Clone)]
pub struct JsonDirStore {
    root: PathBuf,
}

impl JsonDirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl DocumentStore for JsonDirStore {
    fn backend_name(&self) -> &'static str {
        "json_dir"
    }

    fn fetch_all(&self, database: &str, collection: &str) -> Result<Vec<RawRecord>, StoreError> {
        let dir = self.root.join(database);
        let array_path = dir.join(format!("{collection}.json"));
        if array_path.is_file() {
            return load_json_array(&array_path);
        }
        let lines_path = dir.join(format!("{collection}.jsonl"));
        if lines_path.is_file() {
            return load_json_lines(&lines_path);
        }
        Err(StoreError::MissingCollection {
            database: database.to_string(),
            collection: collection.to_string(),
        })
    }
}

fn load_json_array(path: &Path) -> Result<Vec<RawRecord>, StoreError> {
    let bytes = std::fs::read(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let value: Value = serde_json::from_slice(&bytes).map_err(|err| StoreError::Json {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;
    let Value::Array(documents) = value else {
        return Err(StoreError::Json {
            path: path.to_path_buf(),
            message: "expected a top-level array of documents".to_string(),
        });
    };
    documents
        .into_iter()
        .enumerate()
        .map(|(idx, document)| into_record(path, document, idx))
        .collect()
}

fn load_json_lines(path: &Path) -> Result<Vec<RawRecord>, StoreError> {
    let file = File::open(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = BufReader::new(file);
    let mut out = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if line.trim().is_empty() {
            continue;
        }
        let document: Value = serde_json::from_str(&line).map_err(|err| StoreError::Json {
            path: path.to_path_buf(),
            message: format!("line {}: {err}", idx + 1),
        })?;
        out.push(into_record(path, document, idx)?);
    }
    Ok(out)
}

fn into_record(path: &Path, document: Value, idx: usize) -> Result<RawRecord, StoreError> {
    match document {
        Value::Object(map) => Ok(map),
        _ => Err(StoreError::Json {
            path: path.to_path_buf(),
            message: format!("document {} is not an object", idx + 1),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn reads_array_export() {
        let dir = tempdir().unwrap();
        let db = dir.path().join("AE_Items");
        std::fs::create_dir_all(&db).unwrap();
        std::fs::write(
            db.join("Toys.json"),
            r#"[{"Title":"Robot","Rating":4.5},{"Title":"Kite","Rating":3.0}]"#,
        )
        .unwrap();

        let store = JsonDirStore::new(dir.path());
        let records = store.fetch_all("AE_Items", "Toys").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["Title"], "Robot");
    }

    #[test]
    fn reads_line_export_and_skips_blank_lines() {
        let dir = tempdir().unwrap();
        let db = dir.path().join("AE_Items");
        std::fs::create_dir_all(&db).unwrap();
        std::fs::write(db.join("Pet.jsonl"), "{\"Title\":\"Bowl\"}\n\n{\"Title\":\"Leash\"}\n")
            .unwrap();

        let store = JsonDirStore::new(dir.path());
        let records = store.fetch_all("AE_Items", "Pet").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1]["Title"], "Leash");
    }

    #[test]
    fn missing_collection_is_reported() {
        let dir = tempdir().unwrap();
        let store = JsonDirStore::new(dir.path());
        let err = store.fetch_all("AE_Items", "Shoes").unwrap_err();
        assert!(matches!(err, StoreError::MissingCollection { .. }));
    }

    #[test]
    fn non_object_documents_are_rejected() {
        let dir = tempdir().unwrap();
        let db = dir.path().join("AE_Items");
        std::fs::create_dir_all(&db).unwrap();
        std::fs::write(db.join("Bags.json"), "[1, 2]").unwrap();

        let store = JsonDirStore::new(dir.path());
        let err = store.fetch_all("AE_Items", "Bags").unwrap_err();
        assert!(matches!(err, StoreError::Json { .. }));
    }
}
