//! One dashboard refresh: fetch, build, describe, fit, predict.

use std::time::Instant;

use tracing::{info, warn};

use crate::catalog::{self, CategoryEntry};
use crate::config::AppSettings;
use crate::error::PipelineError;
use crate::estimator::{self, EstimatorError, FitReport, UserQuery};
use crate::fetch::fetch_collection;
use crate::report::{
    self, ColumnSummary, CorrelationMatrix, HISTOGRAM_BINS, Histogram, NullCount,
};
use crate::store::DocumentStore;
use crate::table::{self, ItemTable, NumericColumn};

/// Data description sections shown alongside the estimate.
#[derive(Debug, Clone)]
pub struct DataDescription {
    pub summaries: Vec<ColumnSummary>,
    pub null_counts: Vec<NullCount>,
    pub correlation: CorrelationMatrix,
    pub histograms: Vec<Histogram>,
}

impl DataDescription {
    pub fn of(table: &ItemTable) -> Self {
        Self {
            summaries: report::describe(table),
            null_counts: report::null_counts(table),
            correlation: report::correlation(table),
            histograms: NumericColumn::ALL
                .into_iter()
                .map(|column| report::histogram(table, column, HISTOGRAM_BINS))
                .collect(),
        }
    }
}

/// Everything the presentation layer renders for one selection.
#[derive(Debug, Clone)]
pub struct DashboardSnapshot {
    pub category: &'static CategoryEntry,
    pub table: ItemTable,
    pub description: DataDescription,
    pub fit: Result<FitReport, EstimatorError>,
    /// Fails with the fit error when fitting failed.
    pub estimate: Result<f64, EstimatorError>,
}

impl DashboardSnapshot {
    /// Preview rows for the table section.
    pub fn head(&self) -> &[table::ItemRow] {
        report::head(&self.table, report::HEAD_ROWS)
    }

    pub fn score_percent(&self) -> Option<f64> {
        self.fit.as_ref().ok().and_then(|report| report.score_percent)
    }

    /// Re-run only the prediction against this snapshot's fitted model.
    pub fn update_estimate(&mut self, query: &UserQuery) {
        self.estimate = estimate_for(&self.fit, query);
    }
}

fn estimate_for(
    fit: &Result<FitReport, EstimatorError>,
    query: &UserQuery,
) -> Result<f64, EstimatorError> {
    match fit {
        Ok(report) => estimator::predict(&report.model, query),
        Err(err) => Err(err.clone()),
    }
}

/// Resolve a category by display name or collection id.
pub fn resolve_category(category: &str) -> Result<&'static CategoryEntry, PipelineError> {
    catalog::resolve(category).ok_or_else(|| PipelineError::InvalidInput {
        field: "category",
        value: category.to_string(),
    })
}

/// Build a snapshot for `category` and `query`.
///
/// Fetch and table failures abort the whole snapshot. Fit and predict failures are
/// kept in their own fields so the data sections still render.
pub fn run(
    store: &dyn DocumentStore,
    settings: &AppSettings,
    category: &str,
    query: &UserQuery,
) -> Result<DashboardSnapshot, PipelineError> {
    let started = Instant::now();
    let entry = resolve_category(category)?;
    let raw = fetch_collection(store, &settings.store.database, entry.collection_id)?;
    let table = table::build(&raw)?;
    let description = DataDescription::of(&table);

    let fit = estimator::fit(&table, &settings.estimator);
    if let Err(err) = &fit {
        warn!(category = entry.display_name, "Fit failed: {err}");
    }
    let estimate = estimate_for(&fit, query);
    if fit.is_ok()
        && let Err(err) = &estimate
    {
        warn!(category = entry.display_name, "Prediction failed: {err}");
    }

    info!(
        category = entry.display_name,
        rows = table.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Dashboard snapshot ready"
    );
    Ok(DashboardSnapshot {
        category: entry,
        table,
        description,
        fit,
        estimate,
    })
}
