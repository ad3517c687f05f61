use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::model::{RandomForestModel, RegressionTree, TreeNode};

/// Training hyperparameters for the forest.
#[derive(Debug, Clone)]
pub struct ForestOptions {
    /// Number of trees in the ensemble.
    pub n_trees: usize,
    /// Seed for bootstrap sampling.
    pub seed: u64,
    /// Resample rows with replacement per tree.
    pub bootstrap: bool,
    /// Depth limit; `None` grows until leaves are pure.
    pub max_depth: Option<usize>,
    /// Minimum samples a node needs before it may split.
    pub min_samples_split: usize,
    /// Minimum samples on each side of a split.
    pub min_samples_leaf: usize,
}

impl Default for ForestOptions {
    fn default() -> Self {
        Self {
            n_trees: 200,
            seed: 0,
            bootstrap: true,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
        }
    }
}

/// In-memory regression dataset.
#[derive(Debug, Clone)]
pub struct RegressionDataset {
    /// Number of `f64` values in each feature vector.
    pub feature_len: usize,
    /// Feature matrix, row-major.
    pub x: Vec<Vec<f64>>,
    /// Targets aligned with `x`.
    pub y: Vec<f64>,
}

/// Train a random-forest regressor.
pub fn train_random_forest(
    dataset: &RegressionDataset,
    options: &ForestOptions,
) -> Result<RandomForestModel, String> {
    if dataset.x.len() != dataset.y.len() {
        return Err("Mismatched X/Y lengths".to_string());
    }
    if dataset.x.is_empty() {
        return Err("Empty dataset".to_string());
    }
    if dataset.feature_len == 0 || dataset.feature_len > u16::MAX as usize {
        return Err(format!("Unsupported feature length {}", dataset.feature_len));
    }
    if let Some(row) = dataset.x.iter().position(|row| row.len() != dataset.feature_len) {
        return Err(format!(
            "Row {row} has {} features, expected {}",
            dataset.x[row].len(),
            dataset.feature_len
        ));
    }
    if options.n_trees == 0 {
        return Err("Need at least 1 tree".to_string());
    }

    let n = dataset.x.len();
    let mut rng = StdRng::seed_from_u64(options.seed);
    let mut trees = Vec::with_capacity(options.n_trees);
    for _ in 0..options.n_trees {
        let mut tree_rng = StdRng::seed_from_u64(rng.random::<u64>());
        let samples: Vec<usize> = if options.bootstrap {
            (0..n).map(|_| tree_rng.random_range(0..n)).collect()
        } else {
            (0..n).collect()
        };
        trees.push(grow_tree(dataset, samples, options));
    }

    let model = RandomForestModel {
        feature_len: dataset.feature_len,
        seed: options.seed,
        trees,
    };
    model.validate()?;
    Ok(model)
}

struct BestSplit {
    feature: usize,
    threshold: f64,
    /// Position in the feature-sorted samples where the right child starts.
    cut: usize,
    sorted: Vec<usize>,
}

/// Node awaiting a split decision.
struct PendingNode {
    idx: usize,
    samples: Vec<usize>,
    depth: usize,
}

/// Grow one tree from an explicit work stack; unpruned trees on skewed targets can be
/// as deep as the sample count.
fn grow_tree(dataset: &RegressionDataset, samples: Vec<usize>, options: &ForestOptions) -> RegressionTree {
    let min_split = options.min_samples_split.max(2);
    let min_leaf = options.min_samples_leaf.max(1);
    let mut nodes = vec![leaf(&dataset.y, &samples)];
    let mut pending = vec![PendingNode {
        idx: 0,
        samples,
        depth: 0,
    }];
    while let Some(PendingNode {
        idx,
        samples,
        depth,
    }) = pending.pop()
    {
        let depth_exhausted = options.max_depth.is_some_and(|max| depth >= max);
        if depth_exhausted || samples.len() < min_split || is_pure(&dataset.y, &samples) {
            continue;
        }
        let Some(BestSplit {
            feature,
            threshold,
            cut,
            mut sorted,
        }) = best_split(dataset, &samples, min_leaf)
        else {
            continue;
        };
        let right_samples = sorted.split_off(cut);
        let left = nodes.len();
        let right = left + 1;
        nodes.push(leaf(&dataset.y, &sorted));
        nodes.push(leaf(&dataset.y, &right_samples));
        nodes[idx] = TreeNode::Split {
            feature: feature as u16,
            threshold,
            left: left as u32,
            right: right as u32,
        };
        pending.push(PendingNode {
            idx: right,
            samples: right_samples,
            depth: depth + 1,
        });
        pending.push(PendingNode {
            idx: left,
            samples: sorted,
            depth: depth + 1,
        });
    }
    RegressionTree { nodes }
}

fn leaf(y: &[f64], samples: &[usize]) -> TreeNode {
    TreeNode::Leaf {
        value: mean_target(y, samples),
        samples: samples.len() as u32,
    }
}

/// Lowest summed child squared error over all features and cut points.
fn best_split(dataset: &RegressionDataset, samples: &[usize], min_leaf: usize) -> Option<BestSplit> {
    let n = samples.len();
    let mut best: Option<(f64, BestSplit)> = None;
    for feature in 0..dataset.feature_len {
        let mut sorted = samples.to_vec();
        sorted.sort_by(|&a, &b| dataset.x[a][feature].total_cmp(&dataset.x[b][feature]));

        let total_sum: f64 = sorted.iter().map(|&i| dataset.y[i]).sum();
        let total_sq: f64 = sorted.iter().map(|&i| dataset.y[i] * dataset.y[i]).sum();
        let mut left_sum = 0.0;
        let mut left_sq = 0.0;
        let mut feature_best: Option<(f64, usize)> = None;
        for cut in 1..n {
            let y = dataset.y[sorted[cut - 1]];
            left_sum += y;
            left_sq += y * y;
            if cut < min_leaf || n - cut < min_leaf {
                continue;
            }
            let lo = dataset.x[sorted[cut - 1]][feature];
            let hi = dataset.x[sorted[cut]][feature];
            if lo >= hi {
                continue;
            }
            let left_n = cut as f64;
            let right_n = (n - cut) as f64;
            let right_sum = total_sum - left_sum;
            let right_sq = total_sq - left_sq;
            let sse = (left_sq - left_sum * left_sum / left_n)
                + (right_sq - right_sum * right_sum / right_n);
            if feature_best.is_none_or(|(best_sse, _)| sse < best_sse) {
                feature_best = Some((sse, cut));
            }
        }

        if let Some((sse, cut)) = feature_best
            && best.as_ref().is_none_or(|(best_sse, _)| sse < *best_sse)
        {
            let lo = dataset.x[sorted[cut - 1]][feature];
            let hi = dataset.x[sorted[cut]][feature];
            let threshold = split_threshold(lo, hi);
            best = Some((
                sse,
                BestSplit {
                    feature,
                    threshold,
                    cut,
                    sorted,
                },
            ));
        }
    }
    best.map(|(_, split)| split)
}

/// Midpoint between neighbouring values, kept strictly below `hi`.
fn split_threshold(lo: f64, hi: f64) -> f64 {
    let mid = lo + (hi - lo) / 2.0;
    if mid >= hi || !mid.is_finite() { lo } else { mid }
}

fn mean_target(y: &[f64], samples: &[usize]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().map(|&i| y[i]).sum::<f64>() / samples.len() as f64
}

fn is_pure(y: &[f64], samples: &[usize]) -> bool {
    let Some(&first) = samples.first() else {
        return true;
    };
    samples.iter().all(|&i| y[i] == y[first])
}
