use serde::{Deserialize, Serialize};

use crate::recommender::evaluate::aggregate::Normalization;

/// Default floor a recommendation value must exceed
pub const MIN_RECOMMENDATION_VALUE: f64 = 0.0;
/// Default floor a similarity must exceed
pub const MIN_SIMILARITY_VALUE: f64 = 0.25;

/// Recommender settings.
/// Missing fields fall back to their defaults when deserialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommenderConfig {
    /// recommendations must score strictly above this. Default: 0.0
    pub min_recommendation_value: f64,
    /// similar entities must score strictly above this. Default: 0.25
    pub min_similarity_value: f64,
    /// Default: count normalized
    pub normalization: Normalization,
    /// compare entities on the rayon pool. Default: false
    pub parallel: bool,
    /// cut rankings to this many entries after sorting. Default: no limit
    pub limit: Option<usize>,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            min_recommendation_value: MIN_RECOMMENDATION_VALUE,
            min_similarity_value: MIN_SIMILARITY_VALUE,
            normalization: Normalization::default(),
            parallel: false,
            limit: None,
        }
    }
}

impl RecommenderConfig {
    pub fn with_min_recommendation_value(mut self, value: f64) -> Self {
        self.min_recommendation_value = value;
        self
    }

    pub fn with_min_similarity_value(mut self, value: f64) -> Self {
        self.min_similarity_value = value;
        self
    }

    pub fn with_normalization(mut self, normalization: Normalization) -> Self {
        self.normalization = normalization;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }
}
