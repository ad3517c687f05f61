/// One node of a regression tree, stored in a flat arena.
#[derive(Debug, Clone, PartialEq)]
pub enum TreeNode {
    /// Terminal node predicting the mean target of its samples.
    Leaf { value: f64, samples: u32 },
    /// Internal node sending `feature <= threshold` left.
    Split {
        feature: u16,
        threshold: f64,
        left: u32,
        right: u32,
    },
}

/// Binary regression tree with the root at index 0.
#[derive(Debug, Clone, PartialEq)]
pub struct RegressionTree {
    pub nodes: Vec<TreeNode>,
}

impl RegressionTree {
    /// Predict the tree value for a feature vector.
    pub fn predict(&self, features: &[f64]) -> f64 {
        let mut idx = 0usize;
        loop {
            match self.nodes.get(idx) {
                Some(TreeNode::Leaf { value, .. }) => return *value,
                Some(TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let value = features.get(*feature as usize).copied().unwrap_or(0.0);
                    idx = if value <= *threshold {
                        *left as usize
                    } else {
                        *right as usize
                    };
                }
                None => return 0.0,
            }
        }
    }

    /// Longest root-to-leaf path, counted in edges.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut pending = vec![(0usize, 0usize)];
        while let Some((idx, depth)) = pending.pop() {
            match self.nodes.get(idx) {
                Some(TreeNode::Split { left, right, .. }) => {
                    pending.push((*left as usize, depth + 1));
                    pending.push((*right as usize, depth + 1));
                }
                _ => deepest = deepest.max(depth),
            }
        }
        deepest
    }

    fn validate(&self, feature_len: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("Tree has no nodes".to_string());
        }
        let n = self.nodes.len();
        for (idx, node) in self.nodes.iter().enumerate() {
            if let TreeNode::Split {
                feature,
                left,
                right,
                ..
            } = node
            {
                if *feature as usize >= feature_len {
                    return Err(format!(
                        "Node {idx} splits on feature {feature} but only {feature_len} exist"
                    ));
                }
                // Children are always appended after their parent.
                for child in [*left as usize, *right as usize] {
                    if child <= idx || child >= n {
                        return Err(format!("Node {idx} has invalid child index {child}"));
                    }
                }
            }
        }
        Ok(())
    }
}

/// Averaging ensemble of regression trees.
#[derive(Debug, Clone, PartialEq)]
pub struct RandomForestModel {
    /// Number of `f64` values per feature vector.
    pub feature_len: usize,
    /// Seed the forest was trained with.
    pub seed: u64,
    pub trees: Vec<RegressionTree>,
}

impl RandomForestModel {
    /// Validate structural invariants of the model.
    pub fn validate(&self) -> Result<(), String> {
        if self.trees.is_empty() {
            return Err("Model must contain at least one tree".to_string());
        }
        if self.feature_len == 0 {
            return Err("Model must expect at least one feature".to_string());
        }
        for (tree_idx, tree) in self.trees.iter().enumerate() {
            tree.validate(self.feature_len)
                .map_err(|err| format!("Tree {tree_idx}: {err}"))?;
        }
        Ok(())
    }

    /// Mean prediction across all trees.
    pub fn predict(&self, features: &[f64]) -> f64 {
        if self.trees.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.trees.iter().map(|tree| tree.predict(features)).sum();
        sum / self.trees.len() as f64
    }

    pub fn predict_rows(&self, rows: &[Vec<f64>]) -> Vec<f64> {
        rows.iter().map(|row| self.predict(row)).collect()
    }
}
