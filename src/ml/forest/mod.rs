//! Random-forest regressor built from bootstrap-sampled CART trees.
//!
//! - Each tree sees a bootstrap resample of the training rows.
//! - Splits minimize the summed squared error of the two children.
//! - Prediction is the mean of all tree outputs.

mod model;
mod train;

pub use model::{RandomForestModel, RegressionTree, TreeNode};
pub use train::{ForestOptions, RegressionDataset, train_random_forest};
