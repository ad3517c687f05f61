//! Library exports for the dashboard, the estimate CLI, benchmarks and tests.
/// Application directory resolution.
pub mod app_dirs;
/// Product category catalog.
pub mod catalog;
/// Persistent settings.
pub mod config;
/// egui dashboard shell.
pub mod dashboard;
/// Pipeline error taxonomy.
pub mod error;
/// Rating estimator.
pub mod estimator;
/// Collection fetching.
pub mod fetch;
pub(crate) mod http_client;
/// Logging setup.
pub mod logging;
/// Regression models and metrics.
pub mod ml;
/// Dashboard refresh pipeline.
pub mod pipeline;
/// Descriptive statistics over item tables.
pub mod report;
/// Document store backends.
pub mod store;
/// Item table construction.
pub mod table;

pub use error::PipelineError;
