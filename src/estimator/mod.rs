//! Rating estimator: fits a random-forest regressor on normalized listing numbers and
//! turns a user query into an estimated star rating.

mod normalize;
mod query;
mod split;

use std::time::Instant;

use ndarray::{Array2, Axis};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::ml::forest::{ForestOptions, RandomForestModel, RegressionDataset, train_random_forest};
use crate::ml::metrics::{RegressionMetrics, round_to, target_has_variance};
use crate::table::{ItemTable, NumericColumn};

pub use normalize::{l2_normalize, l2_normalize_rows};
pub use query::UserQuery;
pub use split::{TrainTestSplit, test_len, train_test_split};

/// Column order of the numeric block fed to the model.
pub const NUMERIC_BLOCK: [NumericColumn; 5] = [
    NumericColumn::PriceMin,
    NumericColumn::PriceMax,
    NumericColumn::Sold,
    NumericColumn::Rating,
    NumericColumn::Shipping,
];
/// Block positions used as features: price min, price max, sold, shipping.
pub const FEATURE_POSITIONS: [usize; 4] = [0, 1, 2, 4];
/// Block position of the rating target.
pub const TARGET_POSITION: usize = 3;

/// Upper end of the rating scale.
const RATING_SCALE: f64 = 5.0;
/// Decimal places kept in the reported score.
const SCORE_DECIMALS: i32 = 4;

/// Estimator failures.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EstimatorError {
    #[error("Not enough complete rows to train: {rows} available, {required} required")]
    InsufficientData { rows: usize, required: usize },
    #[error("Invalid value {value:?} for {field}")]
    InvalidInput { field: &'static str, value: String },
    #[error("Model training failed: {0}")]
    Training(String),
}

/// Estimator hyperparameters, loaded from the `[estimator]` config table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimatorOptions {
    #[serde(default = "default_trees")]
    pub trees: usize,
    #[serde(default)]
    pub seed: u64,
    #[serde(default = "default_test_fraction")]
    pub test_fraction: f64,
    #[serde(default = "default_min_rows")]
    pub min_rows: usize,
}

impl Default for EstimatorOptions {
    fn default() -> Self {
        Self {
            trees: default_trees(),
            seed: 0,
            test_fraction: default_test_fraction(),
            min_rows: default_min_rows(),
        }
    }
}

impl EstimatorOptions {
    /// Clamp values into their supported ranges.
    pub fn normalized(mut self) -> Self {
        self.trees = self.trees.max(1);
        self.test_fraction = if self.test_fraction.is_finite() {
            self.test_fraction.clamp(0.05, 0.5)
        } else {
            default_test_fraction()
        };
        self.min_rows = self.min_rows.max(2);
        self
    }

    fn forest_options(&self) -> ForestOptions {
        ForestOptions {
            n_trees: self.trees.max(1),
            seed: self.seed,
            ..ForestOptions::default()
        }
    }
}

fn default_trees() -> usize {
    200
}

fn default_test_fraction() -> f64 {
    0.2
}

fn default_min_rows() -> usize {
    5
}

/// A trained rating model.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingModel {
    forest: RandomForestModel,
}

impl RatingModel {
    pub fn from_forest(forest: RandomForestModel) -> Self {
        Self { forest }
    }

    /// Raw model output for an already-normalized feature row.
    pub fn predict_normalized(&self, features: &[f64]) -> f64 {
        self.forest.predict(features)
    }
}

/// Dense numeric block built from complete rows only.
#[derive(Debug, Clone)]
pub struct NumericBlock {
    /// One row per complete table row, columns in [`NUMERIC_BLOCK`] order.
    pub values: Array2<f64>,
    /// Table row index of each block row.
    pub source_rows: Vec<usize>,
    /// Table rows skipped for missing values.
    pub skipped: usize,
}

impl NumericBlock {
    pub fn from_table(table: &ItemTable) -> Self {
        let mut flat = Vec::with_capacity(table.len() * NUMERIC_BLOCK.len());
        let mut source_rows = Vec::with_capacity(table.len());
        for (idx, row) in table.rows().iter().enumerate() {
            let values: Option<Vec<f64>> = NUMERIC_BLOCK.iter().map(|c| row.numeric(*c)).collect();
            if let Some(values) = values {
                flat.extend(values);
                source_rows.push(idx);
            }
        }
        let skipped = table.len() - source_rows.len();
        let values = Array2::from_shape_vec((source_rows.len(), NUMERIC_BLOCK.len()), flat)
            .unwrap_or_else(|_| Array2::zeros((0, NUMERIC_BLOCK.len())));
        Self {
            values,
            source_rows,
            skipped,
        }
    }

    pub fn rows(&self) -> usize {
        self.values.nrows()
    }
}

/// Outcome of [`fit`].
#[derive(Debug, Clone)]
pub struct FitReport {
    pub model: RatingModel,
    /// R² on the test partition, as a percentage rounded to four decimals.
    ///
    /// `None` when the held-out ratings have fewer than two distinct values, where R²
    /// carries no information.
    pub score_percent: Option<f64>,
    pub metrics: RegressionMetrics,
    /// Block row indices of each partition.
    pub split: TrainTestSplit,
    /// Complete rows used for fitting.
    pub rows_used: usize,
    /// Rows excluded for missing numeric values.
    pub rows_skipped: usize,
}

/// Fit the rating model on `table` and score it on a held-out partition.
pub fn fit(table: &ItemTable, options: &EstimatorOptions) -> Result<FitReport, EstimatorError> {
    let started = Instant::now();
    let block = NumericBlock::from_table(table);
    if block.skipped > 0 {
        warn!(
            skipped = block.skipped,
            total = table.len(),
            "Excluding rows with missing numeric values from fit"
        );
    }
    let required = options.min_rows.max(2);
    let n = block.rows();
    if n < required {
        return Err(EstimatorError::InsufficientData { rows: n, required });
    }

    let normalized = l2_normalize_rows(block.values);
    let x = normalized.select(Axis(1), &FEATURE_POSITIONS);
    let y = normalized.column(TARGET_POSITION).to_vec();
    let split = train_test_split(n, options.test_fraction, options.seed);
    debug!(
        train = split.train.len(),
        test = split.test.len(),
        "Split numeric block"
    );

    let train = subset(&x, &y, &split.train);
    let forest = train_random_forest(&train, &options.forest_options())
        .map_err(EstimatorError::Training)?;
    let test = subset(&x, &y, &split.test);
    let predicted = forest.predict_rows(&test.x);
    let metrics = RegressionMetrics::compute(&test.y, &predicted);
    let score_percent =
        target_has_variance(&test.y).then(|| round_to(metrics.r2 * 100.0, SCORE_DECIMALS));
    if score_percent.is_none() {
        warn!(
            test_rows = test.y.len(),
            "Held-out ratings are constant; score unavailable"
        );
    }

    info!(
        rows = n,
        trees = forest.trees.len(),
        max_depth = forest.trees.iter().map(|tree| tree.depth()).max().unwrap_or(0),
        score = ?score_percent,
        mae = metrics.mae,
        rmse = metrics.rmse,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Fitted rating model"
    );
    Ok(FitReport {
        model: RatingModel::from_forest(forest),
        score_percent,
        metrics,
        split,
        rows_used: n,
        rows_skipped: block.skipped,
    })
}

/// Estimate a star rating for `query`.
///
/// The four query values are normalized as their own vector, unlike training rows,
/// which were normalized together with the rating column.
pub fn predict(model: &RatingModel, query: &UserQuery) -> Result<f64, EstimatorError> {
    let features = query.parse()?;
    let normalized = l2_normalize(&features);
    let raw = model.predict_normalized(normalized.as_slice().unwrap_or(&features));
    Ok((1.0 - raw) * RATING_SCALE)
}

/// Text shown for an estimate.
pub fn format_estimate(estimate: f64) -> String {
    format!("{estimate:.2}")
}

fn subset(x: &Array2<f64>, y: &[f64], rows: &[usize]) -> RegressionDataset {
    RegressionDataset {
        feature_len: x.ncols(),
        x: rows.iter().map(|&row| x.row(row).to_vec()).collect(),
        y: rows.iter().map(|&row| y[row]).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::ItemRow;

    fn row(price_min: f64, price_max: f64, sold: f64, shipping: f64, rating: f64) -> ItemRow {
        ItemRow {
            title: Some("item".to_string()),
            store: Some("store".to_string()),
            url: Some("https://example.com".to_string()),
            price_min: Some(price_min),
            price_max: Some(price_max),
            sold: Some(sold),
            shipping: Some(shipping),
            rating: Some(rating),
        }
    }

    fn sample_table(n: usize) -> ItemTable {
        ItemTable::from_rows(
            (0..n)
                .map(|i| {
                    let i = i as f64;
                    row(5.0 + i, 10.0 + 2.0 * i, 50.0 + 7.0 * i, i % 3.0, 3.0 + (i % 5.0) * 0.4)
                })
                .collect(),
        )
    }

    fn quick_options() -> EstimatorOptions {
        EstimatorOptions {
            trees: 20,
            ..EstimatorOptions::default()
        }
    }

    #[test]
    fn block_uses_rating_in_fourth_position() {
        let table = ItemTable::from_rows(vec![row(1.0, 2.0, 3.0, 4.0, 5.0)]);
        let block = NumericBlock::from_table(&table);
        assert_eq!(block.values.row(0).to_vec(), vec![1.0, 2.0, 3.0, 5.0, 4.0]);
        assert_eq!(FEATURE_POSITIONS.map(|p| NUMERIC_BLOCK[p]), [
            NumericColumn::PriceMin,
            NumericColumn::PriceMax,
            NumericColumn::Sold,
            NumericColumn::Shipping,
        ]);
        assert_eq!(NUMERIC_BLOCK[TARGET_POSITION], NumericColumn::Rating);
    }

    #[test]
    fn incomplete_rows_are_skipped() {
        let mut rows = sample_table(6).rows().to_vec();
        rows[2].sold = None;
        let block = NumericBlock::from_table(&ItemTable::from_rows(rows));
        assert_eq!(block.rows(), 5);
        assert_eq!(block.skipped, 1);
        assert_eq!(block.source_rows, vec![0, 1, 3, 4, 5]);
    }

    #[test]
    fn fit_partitions_and_scores() {
        let report = fit(&sample_table(10), &quick_options()).unwrap();
        assert_eq!(report.split.test.len(), 2);
        assert_eq!(report.split.train.len(), 8);
        assert_eq!(report.rows_used, 10);
        let score = report.score_percent.unwrap();
        assert!(score.is_finite());
        assert!(score <= 100.0);
        assert_eq!(score, round_to(score, 4));
    }

    #[test]
    fn single_held_out_row_has_no_score() {
        for offset in 0..4 {
            let rows = (0..5)
                .map(|i| {
                    let i = (i + offset) as f64;
                    row(4.0 + i, 9.0 + 3.0 * i, 20.0 * i, i % 2.0, 2.0 + (i % 4.0) * 0.7)
                })
                .collect();
            let report = fit(&ItemTable::from_rows(rows), &quick_options()).unwrap();
            assert_eq!(report.split.test.len(), 1);
            assert_eq!(report.score_percent, None);
            assert_eq!(report.metrics.support, 1);
        }
    }

    #[test]
    fn constant_held_out_ratings_have_no_score() {
        // Power-of-two multiples of one listing normalize to identical rows.
        let rows = (0..10)
            .map(|k| {
                let k = 2f64.powi(k);
                row(10.0 * k, 20.0 * k, 30.0 * k, k, 4.0 * k)
            })
            .collect();
        let report = fit(&ItemTable::from_rows(rows), &quick_options()).unwrap();
        assert_eq!(report.split.test.len(), 2);
        assert_eq!(report.score_percent, None);
    }

    #[test]
    fn fit_is_deterministic() {
        let table = sample_table(12);
        let a = fit(&table, &quick_options()).unwrap();
        let b = fit(&table, &quick_options()).unwrap();
        assert_eq!(a.score_percent, b.score_percent);
        assert_eq!(a.model, b.model);
    }

    #[test]
    fn too_few_rows_is_insufficient_data() {
        assert_eq!(
            fit(&ItemTable::default(), &quick_options()).unwrap_err(),
            EstimatorError::InsufficientData { rows: 0, required: 5 }
        );
        assert!(matches!(
            fit(&sample_table(4), &quick_options()),
            Err(EstimatorError::InsufficientData { rows: 4, .. })
        ));
        assert!(fit(&sample_table(5), &quick_options()).is_ok());
    }

    #[test]
    fn predict_maps_model_output_to_rating_scale() {
        let report = fit(&sample_table(10), &quick_options()).unwrap();
        let query = UserQuery::default();
        let estimate = predict(&report.model, &query).unwrap();
        assert!(estimate.is_finite());
        assert_eq!(predict(&report.model, &query).unwrap(), estimate);

        let features = l2_normalize(&query.parse().unwrap());
        let raw = report.model.predict_normalized(features.as_slice().unwrap());
        assert_eq!(estimate, (1.0 - raw) * 5.0);
    }

    #[test]
    fn predict_rejects_bad_query() {
        let report = fit(&sample_table(10), &quick_options()).unwrap();
        let query = UserQuery::new("abc", "50", "100", "1");
        assert!(matches!(
            predict(&report.model, &query),
            Err(EstimatorError::InvalidInput { field: "min_price", .. })
        ));
    }

    #[test]
    fn options_are_clamped() {
        let options = EstimatorOptions {
            trees: 0,
            seed: 3,
            test_fraction: f64::NAN,
            min_rows: 0,
        }
        .normalized();
        assert_eq!(options.trees, 1);
        assert_eq!(options.test_fraction, 0.2);
        assert_eq!(options.min_rows, 2);
    }

    #[test]
    fn estimate_formats_two_places() {
        assert_eq!(format_estimate(3.14159), "3.14");
        assert_eq!(format_estimate(4.0), "4.00");
    }
}
