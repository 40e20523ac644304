//! Random-forest artifact: binary decision trees voting with leaf class probabilities.

use super::{LabelModel, ModelError, ProbabilityModel};
use ndarray::{Array2, ArrayView1, ArrayView2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    /// `x[feature] <= threshold` continues at `left`, otherwise `right`
    Split {
        feature: usize,
        threshold: f32,
        left: usize,
        right: usize,
    },
    /// Class weights `[negative, positive]`
    Leaf { value: [f32; 2] },
}

/// Nodes are stored flat; node 0 is the root and children always follow their parent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestModel {
    pub n_features: usize,
    pub trees: Vec<DecisionTree>,
}

impl DecisionTree {
    /// Normalized `[p0, p1]` of the leaf reached by `x`.
    fn leaf_proba(&self, x: ArrayView1<'_, f32>) -> [f32; 2] {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => idx = if x[*feature] <= *threshold { *left } else { *right },
                TreeNode::Leaf { value } => {
                    let total = value[0] + value[1];
                    return if total > 0.0 {
                        [value[0] / total, value[1] / total]
                    } else {
                        [0.5, 0.5]
                    };
                }
            }
        }
    }

    fn validate(&self, n_features: usize) -> Result<(), ModelError> {
        if self.nodes.is_empty() {
            return Err(ModelError::Corrupt("tree without nodes".into()));
        }
        for (idx, node) in self.nodes.iter().enumerate() {
            match node {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if *feature >= n_features {
                        return Err(ModelError::Corrupt(format!(
                            "split on feature {} of {}",
                            feature, n_features
                        )));
                    }
                    if !threshold.is_finite() {
                        return Err(ModelError::Corrupt(format!("node {}: non-finite threshold", idx)));
                    }
                    for &child in [left, right] {
                        if child <= idx || child >= self.nodes.len() {
                            return Err(ModelError::Corrupt(format!(
                                "node {}: child index {} out of order",
                                idx, child
                            )));
                        }
                    }
                }
                TreeNode::Leaf { value } => {
                    if value.iter().any(|v| !v.is_finite() || *v < 0.0) {
                        return Err(ModelError::Corrupt(format!("node {}: invalid leaf weights", idx)));
                    }
                }
            }
        }
        Ok(())
    }
}

impl ForestModel {
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.n_features == 0 {
            return Err(ModelError::Corrupt("forest declares zero features".into()));
        }
        if self.trees.is_empty() {
            return Err(ModelError::Corrupt("forest without trees".into()));
        }
        self.trees.iter().try_for_each(|t| t.validate(self.n_features))
    }

    /// Randomly structured forest for smoke tests; carries no detection ability.
    /// With zero features every tree is a single leaf.
    pub fn placeholder(n_features: usize, n_trees: usize, max_depth: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let trees = (0..n_trees)
            .map(|_| {
                let mut nodes = Vec::new();
                grow(&mut rng, &mut nodes, 0, max_depth, n_features);
                DecisionTree { nodes }
            })
            .collect();
        Self { n_features, trees }
    }
}

fn grow(rng: &mut StdRng, nodes: &mut Vec<TreeNode>, depth: usize, max_depth: usize, n_features: usize) -> usize {
    let idx = nodes.len();
    let p1 = rng.gen::<f32>();
    nodes.push(TreeNode::Leaf { value: [1.0 - p1, p1] });
    if depth < max_depth && n_features > 0 {
        let feature = rng.gen_range(0..n_features);
        let threshold = rng.gen::<f32>();
        let left = grow(rng, nodes, depth + 1, max_depth, n_features);
        let right = grow(rng, nodes, depth + 1, max_depth, n_features);
        nodes[idx] = TreeNode::Split {
            feature,
            threshold,
            left,
            right,
        };
    }
    idx
}

impl LabelModel for ForestModel {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict(&self, x: ArrayView2<'_, f32>) -> Result<Vec<u8>, ModelError> {
        let proba = self.predict_proba(x)?;
        Ok(proba.rows().into_iter().map(|p| u8::from(p[1] > p[0])).collect())
    }
}

impl ProbabilityModel for ForestModel {
    fn predict_proba(&self, x: ArrayView2<'_, f32>) -> Result<Array2<f32>, ModelError> {
        if x.ncols() != self.n_features {
            return Err(ModelError::DimensionMismatch {
                expected: self.n_features,
                actual: x.ncols(),
            });
        }
        let n_trees = self.trees.len() as f32;
        let mut out = Array2::<f32>::zeros((x.nrows(), 2));
        for (row, mut acc) in x.rows().into_iter().zip(out.rows_mut()) {
            for tree in &self.trees {
                let [p0, p1] = tree.leaf_proba(row);
                acc[0] += p0;
                acc[1] += p1;
            }
            acc /= n_trees;
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    /// x[0] <= 0.5 → mostly benign, otherwise mostly malicious
    fn stump(benign: [f32; 2], malicious: [f32; 2]) -> DecisionTree {
        DecisionTree {
            nodes: vec![
                TreeNode::Split {
                    feature: 0,
                    threshold: 0.5,
                    left: 1,
                    right: 2,
                },
                TreeNode::Leaf { value: benign },
                TreeNode::Leaf { value: malicious },
            ],
        }
    }

    #[test]
    fn averages_tree_votes() {
        let forest = ForestModel {
            n_features: 2,
            trees: vec![stump([9.0, 1.0], [1.0, 9.0]), stump([1.0, 0.0], [0.0, 1.0])],
        };
        forest.validate().unwrap();
        let x = array![[0.2f32, 0.0], [0.9, 0.0]];
        let p = forest.predict_proba(x.view()).unwrap();
        assert!((p[[0, 1]] - 0.05).abs() < 1e-6);
        assert!((p[[1, 1]] - 0.95).abs() < 1e-6);
        assert_eq!(forest.predict(x.view()).unwrap(), vec![0, 1]);
    }

    #[test]
    fn threshold_goes_left() {
        let forest = ForestModel {
            n_features: 1,
            trees: vec![stump([1.0, 0.0], [0.0, 1.0])],
        };
        let x = array![[0.5f32]];
        assert_eq!(forest.predict(x.view()).unwrap(), vec![0]);
    }

    #[test]
    fn rejects_backward_children() {
        let forest = ForestModel {
            n_features: 1,
            trees: vec![DecisionTree {
                nodes: vec![TreeNode::Split {
                    feature: 0,
                    threshold: 0.5,
                    left: 0,
                    right: 0,
                }],
            }],
        };
        assert!(matches!(forest.validate(), Err(ModelError::Corrupt(_))));
    }

    #[test]
    fn rejects_out_of_range_feature() {
        let forest = ForestModel {
            n_features: 1,
            trees: vec![DecisionTree {
                nodes: vec![
                    TreeNode::Split {
                        feature: 3,
                        threshold: 0.5,
                        left: 1,
                        right: 2,
                    },
                    TreeNode::Leaf { value: [1.0, 0.0] },
                    TreeNode::Leaf { value: [0.0, 1.0] },
                ],
            }],
        };
        assert!(forest.validate().is_err());
    }

    #[test]
    fn placeholder_without_features_is_leaves_only() {
        let forest = ForestModel::placeholder(0, 3, 4, 42);
        assert_eq!(forest.trees.len(), 3);
        assert!(forest
            .trees
            .iter()
            .all(|t| t.nodes.len() == 1 && matches!(t.nodes[0], TreeNode::Leaf { .. })));
        assert!(forest.validate().is_err());
    }

    #[test]
    fn placeholder_is_valid_and_deterministic() {
        let a = ForestModel::placeholder(10, 8, 4, 42);
        let b = ForestModel::placeholder(10, 8, 4, 42);
        a.validate().unwrap();
        assert_eq!(a.trees.len(), 8);
        assert_eq!(a.trees[0].nodes.len(), 31);
        let x = Array2::from_elem((3, 10), 0.3f32);
        assert_eq!(a.predict_proba(x.view()).unwrap(), b.predict_proba(x.view()).unwrap());
        for p in a.predict_proba(x.view()).unwrap().iter() {
            assert!((0.0..=1.0).contains(p));
        }
    }
}
