use crate::core::recommender::{AgroRecommender, Recommender};
use std::sync::Arc;

/// Shared application state: artifacts loaded once at startup, read-only for
/// the process lifetime.
pub struct RecommenderState {
    pub recommender: Recommender,
}

pub type SharedRecommender = Arc<RecommenderState>;

pub struct AgroState {
    pub recommender: AgroRecommender,
}

pub type SharedAgro = Arc<AgroState>;
