//! Descriptive views over an item table: preview rows, summary statistics, missing
//! value counts, correlations and histograms.

mod correlation;
mod describe;
mod histogram;

pub use correlation::{CorrelationMatrix, correlation, pearson};
pub use describe::{ColumnSummary, describe, quantile};
pub use histogram::{Histogram, HistogramBin, histogram};

use crate::table::{Column, ItemRow, ItemTable};

/// Rows shown in the table preview.
pub const HEAD_ROWS: usize = 10;
/// Bins per numeric histogram.
pub const HISTOGRAM_BINS: usize = 10;

/// First `n` rows of the table.
pub fn head(table: &ItemTable, n: usize) -> &[ItemRow] {
    let rows = table.rows();
    &rows[..n.min(rows.len())]
}

/// Missing values in one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NullCount {
    pub column: Column,
    pub missing: usize,
}

/// Missing values per column, for all columns in schema order.
pub fn null_counts(table: &ItemTable) -> Vec<NullCount> {
    Column::ALL
        .into_iter()
        .map(|column| NullCount {
            column,
            missing: table
                .rows()
                .iter()
                .filter(|row| !row.has_value(column))
                .count(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{NumericColumn, TextColumn};

    fn table() -> ItemTable {
        let full = ItemRow {
            title: Some("a".into()),
            store: Some("s".into()),
            url: Some("u".into()),
            price_min: Some(1.0),
            price_max: Some(2.0),
            sold: Some(3.0),
            shipping: Some(0.0),
            rating: Some(4.5),
        };
        let sparse = ItemRow {
            title: Some("b".into()),
            rating: None,
            url: None,
            ..full.clone()
        };
        ItemTable::from_rows(vec![full.clone(), sparse, full])
    }

    #[test]
    fn head_is_bounded() {
        let table = table();
        assert_eq!(head(&table, 2).len(), 2);
        assert_eq!(head(&table, HEAD_ROWS).len(), 3);
        assert!(head(&ItemTable::default(), HEAD_ROWS).is_empty());
    }

    #[test]
    fn counts_missing_values_per_column() {
        let counts = null_counts(&table());
        assert_eq!(counts.len(), 8);
        let missing = |column: Column| {
            counts
                .iter()
                .find(|count| count.column == column)
                .map(|count| count.missing)
        };
        assert_eq!(missing(Column::Text(TextColumn::Url)), Some(1));
        assert_eq!(missing(Column::Numeric(NumericColumn::Rating)), Some(1));
        assert_eq!(missing(Column::Text(TextColumn::Title)), Some(0));
    }
}
