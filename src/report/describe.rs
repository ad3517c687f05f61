use crate::table::{ItemTable, NumericColumn};

/// Summary statistics of one numeric column over its present values.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    pub column: NumericColumn,
    pub count: usize,
    pub mean: Option<f64>,
    /// Sample standard deviation; needs at least two values.
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub median: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

impl ColumnSummary {
    pub fn from_values(column: NumericColumn, values: &[f64]) -> Self {
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        let count = sorted.len();
        let mean = (count > 0).then(|| sorted.iter().sum::<f64>() / count as f64);
        let std = mean.filter(|_| count > 1).map(|mean| {
            let ss: f64 = sorted.iter().map(|v| (v - mean).powi(2)).sum();
            (ss / (count - 1) as f64).sqrt()
        });
        Self {
            column,
            count,
            mean,
            std,
            min: sorted.first().copied(),
            q25: quantile(&sorted, 0.25),
            median: quantile(&sorted, 0.5),
            q75: quantile(&sorted, 0.75),
            max: sorted.last().copied(),
        }
    }
}

/// Summary statistics for every numeric column, in schema order.
pub fn describe(table: &ItemTable) -> Vec<ColumnSummary> {
    NumericColumn::ALL
        .into_iter()
        .map(|column| {
            let values: Vec<f64> = table.numeric_column(column).into_iter().flatten().collect();
            ColumnSummary::from_values(column, &values)
        })
        .collect()
}

/// Linearly interpolated quantile of ascending `sorted` values.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let position = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::ItemRow;

    #[test]
    fn quantiles_interpolate() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile(&sorted, 0.0), Some(1.0));
        assert_eq!(quantile(&sorted, 0.25), Some(1.75));
        assert_eq!(quantile(&sorted, 0.5), Some(2.5));
        assert_eq!(quantile(&sorted, 1.0), Some(4.0));
        assert_eq!(quantile(&[], 0.5), None);
    }

    #[test]
    fn summary_statistics() {
        let summary = ColumnSummary::from_values(NumericColumn::Sold, &[4.0, 2.0, 6.0, 8.0]);
        assert_eq!(summary.count, 4);
        assert_eq!(summary.mean, Some(5.0));
        let std = summary.std.unwrap();
        assert!((std - (20.0f64 / 3.0).sqrt()).abs() < 1e-12);
        assert_eq!(summary.min, Some(2.0));
        assert_eq!(summary.median, Some(5.0));
        assert_eq!(summary.max, Some(8.0));
    }

    #[test]
    fn single_value_has_no_std() {
        let summary = ColumnSummary::from_values(NumericColumn::Rating, &[4.0]);
        assert_eq!(summary.mean, Some(4.0));
        assert_eq!(summary.std, None);
        let empty = ColumnSummary::from_values(NumericColumn::Rating, &[]);
        assert_eq!(empty.count, 0);
        assert_eq!(empty.mean, None);
    }

    #[test]
    fn describe_skips_missing_values() {
        let table = ItemTable::from_rows(vec![
            ItemRow {
                rating: Some(4.0),
                ..ItemRow::default()
            },
            ItemRow::default(),
        ]);
        let summaries = describe(&table);
        assert_eq!(summaries.len(), 5);
        let rating = summaries
            .iter()
            .find(|s| s.column == NumericColumn::Rating)
            .unwrap();
        assert_eq!(rating.count, 1);
        assert!(summaries.iter().filter(|s| s.count == 0).count() == 4);
    }
}
