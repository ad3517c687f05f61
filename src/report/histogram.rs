use crate::table::{ItemTable, NumericColumn};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Equal-width histogram of one numeric column.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub column: NumericColumn,
    pub bins: Vec<HistogramBin>,
}

impl Histogram {
    pub fn max_count(&self) -> usize {
        self.bins.iter().map(|bin| bin.count).max().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.bins.iter().map(|bin| bin.count).sum()
    }
}

/// Bin the present values of `column` into `bins` equal-width bins.
///
/// The last bin includes its upper edge. A constant column spans `value ± 0.5`.
/// No values, or zero bins, yields no bins.
pub fn histogram(table: &ItemTable, column: NumericColumn, bins: usize) -> Histogram {
    let values: Vec<f64> = table.numeric_column(column).into_iter().flatten().collect();
    let empty = Histogram {
        column,
        bins: Vec::new(),
    };
    if bins == 0 {
        return empty;
    }
    let Some((mut lo, mut hi)) = values.iter().fold(None, |acc: Option<(f64, f64)>, &v| {
        Some(acc.map_or((v, v), |(lo, hi)| (lo.min(v), hi.max(v))))
    }) else {
        return empty;
    };
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bins as f64;
    let mut out: Vec<HistogramBin> = (0..bins)
        .map(|idx| HistogramBin {
            lower: lo + width * idx as f64,
            upper: if idx + 1 == bins {
                hi
            } else {
                lo + width * (idx + 1) as f64
            },
            count: 0,
        })
        .collect();
    for value in values {
        let idx = (((value - lo) / width) as usize).min(bins - 1);
        out[idx].count += 1;
    }
    Histogram { column, bins: out }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::ItemRow;

    fn ratings(values: &[Option<f64>]) -> ItemTable {
        ItemTable::from_rows(
            values
                .iter()
                .map(|rating| ItemRow {
                    rating: *rating,
                    ..ItemRow::default()
                })
                .collect(),
        )
    }

    #[test]
    fn counts_into_equal_width_bins() {
        let table = ratings(&[Some(1.0), Some(2.0), Some(2.5), Some(5.0), None]);
        let hist = histogram(&table, NumericColumn::Rating, 4);
        assert_eq!(hist.bins.len(), 4);
        assert_eq!(hist.bins[0].lower, 1.0);
        assert_eq!(hist.bins[3].upper, 5.0);
        let counts: Vec<usize> = hist.bins.iter().map(|bin| bin.count).collect();
        assert_eq!(counts, vec![1, 2, 0, 1]);
        assert_eq!(hist.total(), 4);
        assert_eq!(hist.max_count(), 2);
    }

    #[test]
    fn constant_column_gets_unit_span() {
        let hist = histogram(&ratings(&[Some(3.0), Some(3.0)]), NumericColumn::Rating, 10);
        assert_eq!(hist.bins[0].lower, 2.5);
        assert_eq!(hist.bins[9].upper, 3.5);
        assert_eq!(hist.total(), 2);
    }

    #[test]
    fn no_values_no_bins() {
        assert!(histogram(&ratings(&[None]), NumericColumn::Rating, 10).bins.is_empty());
        assert!(histogram(&ratings(&[Some(1.0)]), NumericColumn::Rating, 0).bins.is_empty());
    }
}
