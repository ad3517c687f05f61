//! Cleaning fetched documents into a fixed-schema item table.
//!
//! The schema is declared here rather than inferred: the first record is checked for
//! every required field, store bookkeeping fields are discarded, titles are
//! sanitized, and numeric fields are coerced (failures become missing values).

mod sanitize;

use serde_json::{Number, Value};
use thiserror::Error;
use tracing::debug;

use crate::store::RawRecord;

pub use sanitize::sanitize_title;

/// Store-internal identifier fields dropped from every record.
pub const STORE_INTERNAL_FIELDS: [&str; 3] = ["_key", "_id", "_rev"];

/// Free-text columns, in schema order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextColumn {
    Title,
    Store,
    Url,
}

impl TextColumn {
    pub const ALL: [TextColumn; 3] = [TextColumn::Title, TextColumn::Store, TextColumn::Url];

    /// Field name as stored in documents.
    pub fn name(self) -> &'static str {
        match self {
            TextColumn::Title => "Title",
            TextColumn::Store => "Store",
            TextColumn::Url => "URL",
        }
    }
}

/// Numeric columns, in schema order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NumericColumn {
    PriceMin,
    PriceMax,
    Sold,
    Shipping,
    Rating,
}

impl NumericColumn {
    pub const ALL: [NumericColumn; 5] = [
        NumericColumn::PriceMin,
        NumericColumn::PriceMax,
        NumericColumn::Sold,
        NumericColumn::Shipping,
        NumericColumn::Rating,
    ];

    /// Field name as stored in documents.
    pub fn name(self) -> &'static str {
        match self {
            NumericColumn::PriceMin => "PriceMin",
            NumericColumn::PriceMax => "PriceMax",
            NumericColumn::Sold => "Sold",
            NumericColumn::Shipping => "Shipping",
            NumericColumn::Rating => "Rating",
        }
    }
}

/// Any column of the item table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Text(TextColumn),
    Numeric(NumericColumn),
}

impl Column {
    /// Every column in schema order.
    pub const ALL: [Column; 8] = [
        Column::Text(TextColumn::Title),
        Column::Text(TextColumn::Store),
        Column::Text(TextColumn::Url),
        Column::Numeric(NumericColumn::PriceMin),
        Column::Numeric(NumericColumn::PriceMax),
        Column::Numeric(NumericColumn::Sold),
        Column::Numeric(NumericColumn::Shipping),
        Column::Numeric(NumericColumn::Rating),
    ];

    pub fn name(self) -> &'static str {
        match self {
            Column::Text(column) => column.name(),
            Column::Numeric(column) => column.name(),
        }
    }
}

/// Failures while building the table.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    /// A required field is absent from the first fetched record.
    #[error("Fetched records do not match the item schema: missing field {field}")]
    SchemaMismatch { field: &'static str },
}

/// One cleaned product listing. `None` marks a missing value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemRow {
    pub title: Option<String>,
    pub store: Option<String>,
    pub url: Option<String>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    pub sold: Option<f64>,
    pub shipping: Option<f64>,
    pub rating: Option<f64>,
}

impl ItemRow {
    pub fn numeric(&self, column: NumericColumn) -> Option<f64> {
        match column {
            NumericColumn::PriceMin => self.price_min,
            NumericColumn::PriceMax => self.price_max,
            NumericColumn::Sold => self.sold,
            NumericColumn::Shipping => self.shipping,
            NumericColumn::Rating => self.rating,
        }
    }

    pub fn text(&self, column: TextColumn) -> Option<&str> {
        match column {
            TextColumn::Title => self.title.as_deref(),
            TextColumn::Store => self.store.as_deref(),
            TextColumn::Url => self.url.as_deref(),
        }
    }

    /// Whether the cell for `column` holds a value.
    pub fn has_value(&self, column: Column) -> bool {
        match column {
            Column::Text(column) => self.text(column).is_some(),
            Column::Numeric(column) => self.numeric(column).is_some(),
        }
    }

    fn numeric_mut(&mut self, column: NumericColumn) -> &mut Option<f64> {
        match column {
            NumericColumn::PriceMin => &mut self.price_min,
            NumericColumn::PriceMax => &mut self.price_max,
            NumericColumn::Sold => &mut self.sold,
            NumericColumn::Shipping => &mut self.shipping,
            NumericColumn::Rating => &mut self.rating,
        }
    }

    fn text_mut(&mut self, column: TextColumn) -> &mut Option<String> {
        match column {
            TextColumn::Title => &mut self.title,
            TextColumn::Store => &mut self.store,
            TextColumn::Url => &mut self.url,
        }
    }
}

/// Cleaned, fixed-schema table of listings for one category.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemTable {
    rows: Vec<ItemRow>,
}

impl ItemTable {
    /// Wrap already-clean rows.
    pub fn from_rows(rows: Vec<ItemRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[ItemRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Values of one numeric column, row-aligned.
    pub fn numeric_column(&self, column: NumericColumn) -> Vec<Option<f64>> {
        self.rows.iter().map(|row| row.numeric(column)).collect()
    }

    /// Re-emit rows as documents carrying the schema fields only.
    pub fn to_records(&self) -> Vec<RawRecord> {
        self.rows.iter().map(row_to_record).collect()
    }
}

/// Build an [`ItemTable`] from fetched documents.
///
/// An empty input yields an empty table. The input records are not modified.
pub fn build(records: &[RawRecord]) -> Result<ItemTable, TableError> {
    let Some(first) = records.first() else {
        debug!("No records fetched; building empty table");
        return Ok(ItemTable::default());
    };
    validate_schema(first)?;

    let rows: Vec<ItemRow> = records.iter().map(clean_record).collect();
    debug!(rows = rows.len(), "Built item table");
    Ok(ItemTable { rows })
}

fn validate_schema(record: &RawRecord) -> Result<(), TableError> {
    for column in Column::ALL {
        let field = column.name();
        if !record.contains_key(field) {
            return Err(TableError::SchemaMismatch { field });
        }
    }
    Ok(())
}

fn clean_record(record: &RawRecord) -> ItemRow {
    let mut row = ItemRow::default();
    for (field, value) in record {
        if STORE_INTERNAL_FIELDS.contains(&field.as_str()) {
            continue;
        }
        if let Some(column) = TextColumn::ALL.into_iter().find(|c| c.name() == field.as_str()) {
            let text = coerce_text(value);
            *row.text_mut(column) = match column {
                TextColumn::Title => text.map(|title| sanitize_title(&title)),
                _ => text,
            };
        } else if let Some(column) = NumericColumn::ALL.into_iter().find(|c| c.name() == field.as_str()) {
            *row.numeric_mut(column) = coerce_numeric(value);
        }
    }
    row
}

/// Numbers and numeric strings become `f64`; everything else is missing.
fn coerce_numeric(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}

fn coerce_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

fn row_to_record(row: &ItemRow) -> RawRecord {
    let mut record = RawRecord::new();
    for column in TextColumn::ALL {
        let value = row
            .text(column)
            .map(|text| Value::String(text.to_string()))
            .unwrap_or(Value::Null);
        record.insert(column.name().to_string(), value);
    }
    for column in NumericColumn::ALL {
        let value = row
            .numeric(column)
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or(Value::Null);
        record.insert(column.name().to_string(), value);
    }
    record
}
