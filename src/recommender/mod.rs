pub mod config;
pub mod evaluate;
pub mod matrix;
pub mod store;

use std::hash::Hash;

use num::Num;
use rayon::prelude::*;
use tracing::debug;

use crate::error::{RecommendError, Result};
use crate::recommender::config::RecommenderConfig;
use crate::recommender::evaluate::aggregate::{aggregate, aggregate_par};
use crate::recommender::evaluate::ranking::{RankEntry, Ranking};
use crate::recommender::evaluate::similarity::similarity;
use crate::recommender::matrix::PreferenceMatrix;
use crate::recommender::store::{Entity, EntityKind, EntityResolver, PreferenceStore};

/// Collaborative filtering recommender
///
/// Every query reads a fresh snapshot of the preferences from `store`,
/// builds a matrix for it and throws the matrix away afterwards.
/// Nothing is cached between calls.
///
/// `Recommender<St, Rs>` has the following generic parameters:
/// - `St`: preference store (`PreferenceStore`)
/// - `Rs`: entity resolver (`EntityResolver`), turns ranked ids back into entities
#[derive(Debug, Clone)]
pub struct Recommender<St, Rs> {
    pub store: St,
    pub resolver: Rs,
    pub config: RecommenderConfig,
}

impl<St, Rs> Recommender<St, Rs> {
    /// Create a recommender with the default config
    pub fn new(store: St, resolver: Rs) -> Self {
        Self::with_config(store, resolver, RecommenderConfig::default())
    }

    pub fn with_config(store: St, resolver: Rs, config: RecommenderConfig) -> Self {
        Self { store, resolver, config }
    }

    pub fn config(&self) -> &RecommenderConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: RecommenderConfig) {
        self.config = config;
    }
}

impl<St, Rs> Recommender<St, Rs> {
    /// Build the subject x object matrix for `subjects` and `objects`
    pub fn preference_matrix<S, O>(
        &self,
        subjects: &[S],
        objects: &[O],
    ) -> Result<PreferenceMatrix<S::Id, O::Id, St::Score>>
    where
        S: Entity,
        O: Entity,
        St: PreferenceStore<S, O>,
    {
        PreferenceMatrix::from_store(&self.store, subjects, objects)
    }

    /// Objects `user` has not rated yet, best first.
    /// Values are aggregated from the users similar to `user`.
    pub fn best_items_for_user<S, O>(&self, user: &S, subjects: &[S], objects: &[O]) -> Result<Ranking<O>>
    where
        S: Entity,
        O: Entity,
        St: PreferenceStore<S, O>,
        Rs: EntityResolver<S, O>,
    {
        let matrix = self.preference_matrix(subjects, objects)?;
        let mut ranking = self.recommend(&matrix, &user.id());
        self.finish(&mut ranking, self.config.min_recommendation_value);
        debug!(user = ?user.id(), kept = ranking.len(), "best items for user");
        ranking.try_map(|id| {
            self.resolver
                .resolve_object(&id)
                .map_err(|e| RecommendError::resolve(EntityKind::Object, &id, e))
        })
    }

    /// Other entries of `subjects` ranked by similarity to `user`
    pub fn similar_users<S, O>(&self, user: &S, subjects: &[S], objects: &[O]) -> Result<Ranking<S>>
    where
        S: Entity + Clone,
        O: Entity,
        St: PreferenceStore<S, O>,
    {
        let matrix = self.preference_matrix(subjects, objects)?;
        let mut ranking = self.similar_in(&matrix, &user.id(), subjects);
        self.finish(&mut ranking, self.config.min_similarity_value);
        debug!(user = ?user.id(), kept = ranking.len(), "similar users");
        Ok(ranking)
    }

    /// Subjects that have not rated `item` yet, best first.
    /// Runs the same aggregation on the transposed matrix.
    pub fn best_users_for_item<S, O>(&self, item: &O, subjects: &[S], objects: &[O]) -> Result<Ranking<S>>
    where
        S: Entity,
        O: Entity,
        St: PreferenceStore<S, O>,
        Rs: EntityResolver<S, O>,
    {
        let matrix = self.preference_matrix(subjects, objects)?.transpose();
        let mut ranking = self.recommend(&matrix, &item.id());
        self.finish(&mut ranking, self.config.min_recommendation_value);
        debug!(item = ?item.id(), kept = ranking.len(), "best users for item");
        ranking.try_map(|id| {
            self.resolver
                .resolve_subject(&id)
                .map_err(|e| RecommendError::resolve(EntityKind::Subject, &id, e))
        })
    }

    /// Other entries of `objects` ranked by similarity to `item`
    pub fn similar_items<S, O>(&self, item: &O, subjects: &[S], objects: &[O]) -> Result<Ranking<O>>
    where
        S: Entity,
        O: Entity + Clone,
        St: PreferenceStore<S, O>,
    {
        let matrix = self.preference_matrix(subjects, objects)?.transpose();
        let mut ranking = self.similar_in(&matrix, &item.id(), objects);
        self.finish(&mut ranking, self.config.min_similarity_value);
        debug!(item = ?item.id(), kept = ranking.len(), "similar items");
        Ok(ranking)
    }

    /// Aggregated values for `target`, using the configured normalization
    fn recommend<R, C, N>(&self, matrix: &PreferenceMatrix<R, C, N>, target: &R) -> Ranking<C>
    where
        R: Eq + Hash + std::fmt::Debug + Sync,
        C: Eq + Hash + Clone + Send + Sync,
        N: Num + Copy + Into<f64> + Sync,
    {
        if self.config.parallel {
            aggregate_par(matrix, target, self.config.normalization)
        } else {
            aggregate(matrix, target, self.config.normalization)
        }
    }

    /// Similarity of `target` to every candidate except itself
    fn similar_in<E, C, N>(&self, matrix: &PreferenceMatrix<E::Id, C, N>, target: &E::Id, candidates: &[E]) -> Ranking<E>
    where
        E: Entity + Clone,
        C: Eq + Hash + Sync,
        N: Num + Copy + Into<f64> + Sync,
    {
        let ids: Vec<E::Id> = candidates.iter().map(|c| c.id()).collect();
        let score = |id: &E::Id| {
            if id == target {
                None
            } else {
                Some(similarity(matrix, target, id))
            }
        };
        let scores: Vec<Option<f64>> = if self.config.parallel {
            ids.par_iter().map(score).collect()
        } else {
            ids.iter().map(score).collect()
        };
        candidates
            .iter()
            .zip(scores)
            .filter_map(|(c, s)| s.map(|s| RankEntry::new(c.clone(), s)))
            .collect()
    }

    /// threshold, sort, limit
    fn finish<E>(&self, ranking: &mut Ranking<E>, threshold: f64) {
        ranking.retain_above(threshold).sort_by_score_desc();
        if let Some(limit) = self.config.limit {
            ranking.truncate(limit);
        }
    }
}
