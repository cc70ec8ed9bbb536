use crate::utils::error::{CropError, Result};
use linfa::traits::{Fit, Predict};
use linfa::DatasetBase;
use linfa_trees::DecisionTree;
use ndarray::{Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

fn fit_tree(
    features: &Array2<f64>,
    targets: &Array1<usize>,
    max_depth: Option<usize>,
) -> Result<DecisionTree<f64, usize>> {
    let dataset = DatasetBase::from(features.clone()).with_targets(targets.clone());
    DecisionTree::params()
        .max_depth(max_depth)
        .fit(&dataset)
        .map_err(|e| CropError::training(format!("decision tree fit failed: {}", e)))
}

fn predict_one(tree: &DecisionTree<f64, usize>, row: &Array2<f64>) -> Result<usize> {
    let predictions = tree.predict(&DatasetBase::from(row.clone()));
    predictions
        .first()
        .copied()
        .ok_or_else(|| CropError::training("got an empty prediction"))
}

/// A bagged ensemble of decision trees. Each tree votes for a class;
/// probabilities are vote fractions, top-1 is the argmax of the votes.
#[derive(Serialize, Deserialize)]
pub struct VoteForest {
    trees: Vec<DecisionTree<f64, usize>>,
    n_classes: usize,
}

impl VoteForest {
    pub fn fit(
        features: &Array2<f64>,
        targets: &Array1<usize>,
        n_classes: usize,
        n_trees: usize,
        max_depth: Option<usize>,
        seed: u64,
    ) -> Result<Self> {
        if n_trees == 0 {
            return Err(CropError::training("forest needs at least one tree"));
        }
        let n_samples = features.nrows();
        if n_samples == 0 {
            return Err(CropError::training("cannot fit a forest on an empty dataset"));
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let mut trees = Vec::with_capacity(n_trees);
        for _ in 0..n_trees {
            // Bootstrap sample: n rows drawn with replacement.
            let indices: Vec<usize> = (0..n_samples)
                .map(|_| rng.random_range(0..n_samples))
                .collect();
            let sample = features.select(Axis(0), &indices);
            let sample_targets = targets.select(Axis(0), &indices);
            trees.push(fit_tree(&sample, &sample_targets, max_depth)?);
        }

        Ok(Self { trees, n_classes })
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Class probabilities for a single 1×d row: fraction of trees voting
    /// for each class.
    pub fn predict_proba(&self, row: &Array2<f64>) -> Result<Vec<f64>> {
        let mut votes = vec![0usize; self.n_classes];
        for tree in &self.trees {
            let class = predict_one(tree, row)?;
            if class >= self.n_classes {
                return Err(CropError::UnknownClassError { id: class });
            }
            votes[class] += 1;
        }
        let total = self.trees.len() as f64;
        Ok(votes.into_iter().map(|v| v as f64 / total).collect())
    }

    pub fn predict_row(&self, row: &Array2<f64>) -> Result<usize> {
        let probabilities = self.predict_proba(row)?;
        argmax(&probabilities)
            .ok_or_else(|| CropError::training("forest produced no probabilities"))
    }
}

/// A single decision tree. Predicts top-1 only.
#[derive(Serialize, Deserialize)]
pub struct TreeClassifier {
    tree: DecisionTree<f64, usize>,
    n_classes: usize,
}

impl TreeClassifier {
    pub fn fit(
        features: &Array2<f64>,
        targets: &Array1<usize>,
        n_classes: usize,
        max_depth: Option<usize>,
    ) -> Result<Self> {
        let tree = fit_tree(features, targets, max_depth)?;
        Ok(Self { tree, n_classes })
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    pub fn predict_row(&self, row: &Array2<f64>) -> Result<usize> {
        let class = predict_one(&self.tree, row)?;
        if class >= self.n_classes {
            return Err(CropError::UnknownClassError { id: class });
        }
        Ok(class)
    }
}

/// The serialized classifier inside a model artifact. Whether probability
/// estimation is available is a property of the variant, resolved once at
/// load time rather than re-checked per request.
#[derive(Serialize, Deserialize)]
pub enum Classifier {
    Forest(VoteForest),
    Tree(TreeClassifier),
}

impl Classifier {
    pub fn algorithm(&self) -> &'static str {
        match self {
            Classifier::Forest(_) => "voting-forest",
            Classifier::Tree(_) => "decision-tree",
        }
    }

    pub fn n_classes(&self) -> usize {
        match self {
            Classifier::Forest(forest) => forest.n_classes(),
            Classifier::Tree(tree) => tree.n_classes(),
        }
    }

    pub fn supports_probability(&self) -> bool {
        matches!(self, Classifier::Forest(_))
    }

    pub fn predict_row(&self, row: &Array2<f64>) -> Result<usize> {
        match self {
            Classifier::Forest(forest) => forest.predict_row(row),
            Classifier::Tree(tree) => tree.predict_row(row),
        }
    }

    pub fn predict_proba_row(&self, row: &Array2<f64>) -> Result<Vec<f64>> {
        match self {
            Classifier::Forest(forest) => forest.predict_proba(row),
            Classifier::Tree(_) => Err(CropError::training(
                "classifier does not estimate probabilities",
            )),
        }
    }
}

/// Index of the largest value; ties resolve to the lowest index.
pub fn argmax(values: &[f64]) -> Option<usize> {
    if values.is_empty() {
        return None;
    }
    let mut best = 0;
    for (i, value) in values.iter().enumerate() {
        if *value > values[best] {
            best = i;
        }
    }
    Some(best)
}
