use std::path::Path;

use aelens::store::RawRecord;
use serde_json::{Value, json};

pub const DATABASE: &str = "AE_Items";

/// Synthetic listing documents with store bookkeeping fields.
pub fn listings(count: usize) -> Vec<RawRecord> {
    (0..count)
        .map(|i| {
            let x = i as f64;
            let value = json!({
                "_key": format!("{}", 1000 + i),
                "_id": format!("Toys/{}", 1000 + i),
                "_rev": "_rev0",
                "Title": format!("Toy #{i} (deluxe)"),
                "Store": format!("Store {}", i % 3),
                "URL": format!("https://example.com/item/{i}"),
                "PriceMin": 2.0 + x,
                "PriceMax": 6.0 + 1.5 * x,
                "Sold": 20.0 * (x + 1.0),
                "Shipping": (i % 3) as f64,
                "Rating": 3.2 + ((i * 7) % 10) as f64 * 0.15,
            });
            into_record(value)
        })
        .collect()
}

pub fn into_record(value: Value) -> RawRecord {
    value
        .as_object()
        .cloned()
        .expect("listing fixture is a JSON object")
}

/// Write `records` as `<root>/<database>/<collection>.json`.
pub fn write_collection(root: &Path, database: &str, collection: &str, records: &[RawRecord]) {
    let dir = root.join(database);
    std::fs::create_dir_all(&dir).expect("create database dir");
    let bytes = serde_json::to_vec_pretty(records).expect("serialize records");
    std::fs::write(dir.join(format!("{collection}.json")), bytes).expect("write collection");
}
