use std::hash::Hash;

use indexmap::IndexMap;
use num::Num;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::recommender::evaluate::ranking::{RankEntry, Ranking};
use crate::recommender::evaluate::similarity::similarity;
use crate::recommender::matrix::{PreferenceMatrix, PreferenceRow};

/// How accumulated `score * similarity` totals are turned into a value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Normalization {
    /// total / number of contributing entities
    /// A similarity weighted sum averaged by contributor count.
    #[default]
    CountNormalized,
    /// total / sum of the contributors' similarities
    /// The textbook similarity weighted mean.
    SimilaritySumNormalized,
}

#[derive(Debug, Clone, Copy, Default)]
struct Tally {
    /// Σ(score * sim)
    weighted_total: f64,
    /// number of contributors
    support: u32,
    /// Σ(sim)
    sim_sum: f64,
}

impl Tally {
    #[inline]
    fn value(&self, normalization: Normalization) -> f64 {
        match normalization {
            Normalization::CountNormalized => self.weighted_total / self.support as f64,
            Normalization::SimilaritySumNormalized => self.weighted_total / self.sim_sum,
        }
    }
}

/// Per counterpart accumulators, in first seen order
struct Accumulator<C> {
    tallies: IndexMap<C, Tally>,
}

impl<C> Default for Accumulator<C> {
    fn default() -> Self {
        Self { tallies: IndexMap::new() }
    }
}

impl<C> Accumulator<C>
where
    C: Eq + Hash + Clone,
{
    /// add every counterpart of `row` that `seen` does not hold
    fn add_row<N>(&mut self, row: &PreferenceRow<C, N>, seen: Option<&PreferenceRow<C, N>>, sim: f64)
    where
        N: Copy + Into<f64>,
    {
        for (col, rec) in row.iter() {
            if seen.is_some_and(|s| s.contains_key(col)) {
                continue;
            }
            let tally = self.tallies.entry(col.clone()).or_default();
            tally.weighted_total += rec.score.into() * sim;
            tally.support += 1;
            tally.sim_sum += sim;
        }
    }

    /// left side keeps its order, counterparts new to it follow
    fn merge(mut self, other: Self) -> Self {
        for (col, t) in other.tallies {
            let tally = self.tallies.entry(col).or_default();
            tally.weighted_total += t.weighted_total;
            tally.support += t.support;
            tally.sim_sum += t.sim_sum;
        }
        self
    }

    fn into_ranking(self, normalization: Normalization) -> Ranking<C> {
        let list = self
            .tallies
            .into_iter()
            .filter(|(_, t)| t.support > 0)
            .map(|(col, t)| RankEntry::new(col, t.value(normalization)))
            .collect();
        Ranking::new(list)
    }
}

/// Recommendation values for `target`.
///
/// Every other row with similarity > 0 to `target` contributes
/// `score * similarity` to each counterpart it rated and `target` did not.
/// The totals are then normalized per `normalization`.
///
/// The matrix must already be in the wanted orientation: rows are the
/// entities being compared, counterparts are what gets recommended.
/// The result is unsorted and never holds a counterpart of `target`'s row.
pub fn aggregate<R, C, N>(matrix: &PreferenceMatrix<R, C, N>, target: &R, normalization: Normalization) -> Ranking<C>
where
    R: Eq + Hash + std::fmt::Debug,
    C: Eq + Hash + Clone,
    N: Num + Copy + Into<f64>,
{
    let seen = matrix.row(target);
    let mut acc = Accumulator::default();
    for (other, row) in matrix.rows() {
        // don't compare me to myself
        if other == target {
            continue;
        }
        let sim = similarity(matrix, target, other);
        trace!(?other, sim, "similarity");
        if sim <= 0.0 {
            continue;
        }
        acc.add_row(row, seen, sim);
    }
    acc.into_ranking(normalization)
}

/// Same as `aggregate`, comparing other rows in parallel.
/// Partitions accumulate on their own and are merged in row order, so the
/// output order matches the sequential version.
pub fn aggregate_par<R, C, N>(matrix: &PreferenceMatrix<R, C, N>, target: &R, normalization: Normalization) -> Ranking<C>
where
    R: Eq + Hash + std::fmt::Debug + Sync,
    C: Eq + Hash + Clone + Send + Sync,
    N: Num + Copy + Into<f64> + Sync,
{
    let seen = matrix.row(target);
    let acc = matrix
        .raw()
        .par_iter()
        .filter(|(other, _)| *other != target)
        .fold(Accumulator::default, |mut acc, (other, row)| {
            let sim = similarity(matrix, target, other);
            trace!(?other, sim, "similarity");
            if sim > 0.0 {
                acc.add_row(row, seen, sim);
            }
            acc
        })
        .reduce(Accumulator::default, Accumulator::merge);
    acc.into_ranking(normalization)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn matrix() -> PreferenceMatrix<&'static str, &'static str, i32> {
        [
            ("user1", "item1", -1), ("user1", "item3", 1), ("user1", "item4", 1), ("user1", "item5", 0),
            ("user2", "item1", 1), ("user2", "item2", 1), ("user2", "item3", -1), ("user2", "item4", -1), ("user2", "item5", 10), ("user2", "item6", 10),
            ("user3", "item1", -1), ("user3", "item2", 1), ("user3", "item4", -1), ("user3", "item5", 10), ("user3", "item6", 10), ("user3", "item7", -1),
            ("user4", "item1", -1), ("user4", "item2", -1), ("user4", "item3", -1), ("user4", "item4", -1), ("user4", "item5", 10), ("user4", "item7", 10), ("user4", "item8", 10),
        ]
        .into_iter()
        .collect()
    }

    fn value_of(r: &Ranking<&str>, key: &str) -> Option<f64> {
        r.list.iter().find(|e| e.entity == key).map(|e| e.score)
    }

    #[test]
    fn excludes_what_target_already_rated() {
        let m = matrix();
        let r = aggregate(&m, &"user1", Normalization::CountNormalized);
        let seen = m.row(&"user1").unwrap();
        assert!(!r.list.is_empty());
        for e in r.list.iter() {
            assert!(!seen.contains_key(e.entity), "{} already rated", e.entity);
        }
        // item2, item6, item7, item8 are the only unseen ones
        let mut keys: Vec<&str> = r.list.iter().map(|e| e.entity).collect();
        keys.sort();
        assert_eq!(keys, vec!["item2", "item6", "item7", "item8"]);
    }

    #[test]
    fn count_normalized_values() {
        let m = matrix();
        let s2 = similarity(&m, &"user1", &"user2");
        let s3 = similarity(&m, &"user1", &"user3");
        let s4 = similarity(&m, &"user1", &"user4");
        assert!(s2 > 0.0 && s3 > 0.0 && s4 > 0.0);

        let r = aggregate(&m, &"user1", Normalization::CountNormalized);
        let item6 = (10.0 * s2 + 10.0 * s3) / 2.0;
        let item8 = 10.0 * s4;
        let item7 = (-1.0 * s3 + 10.0 * s4) / 2.0;
        assert!((value_of(&r, "item6").unwrap() - item6).abs() < EPS);
        assert!((value_of(&r, "item7").unwrap() - item7).abs() < EPS);
        assert!((value_of(&r, "item8").unwrap() - item8).abs() < EPS);
    }

    #[test]
    fn similarity_sum_normalized_values() {
        let m = matrix();
        let s3 = similarity(&m, &"user1", &"user3");
        let s4 = similarity(&m, &"user1", &"user4");
        let r = aggregate(&m, &"user1", Normalization::SimilaritySumNormalized);
        let item7 = (-1.0 * s3 + 10.0 * s4) / (s3 + s4);
        assert!((value_of(&r, "item7").unwrap() - item7).abs() < EPS);
        // a single contributor gives back its raw score
        assert!((value_of(&r, "item8").unwrap() - 10.0).abs() < EPS);
    }

    #[test]
    fn dissimilar_rows_do_not_contribute() {
        // b is the exact opposite of a, similarity 0
        let m: PreferenceMatrix<&str, &str, i32> = [
            ("a", "x", 0), ("a", "y", 10), ("a", "z", 10), ("a", "w", 0),
            ("b", "x", 10), ("b", "y", 0), ("b", "z", 0), ("b", "w", 10), ("b", "new", 10),
        ]
        .into_iter()
        .collect();
        assert!(aggregate(&m, &"a", Normalization::CountNormalized).list.is_empty());
    }

    #[test]
    fn unknown_target_gets_nothing() {
        let m = matrix();
        assert!(aggregate(&m, &"ghost", Normalization::CountNormalized).list.is_empty());
    }

    #[test]
    fn parallel_matches_sequential() {
        let m = matrix();
        for norm in [Normalization::CountNormalized, Normalization::SimilaritySumNormalized] {
            let seq = aggregate(&m, &"user1", norm);
            let par = aggregate_par(&m, &"user1", norm);
            assert_eq!(seq.list.len(), par.list.len());
            for (a, b) in seq.list.iter().zip(par.list.iter()) {
                assert_eq!(a.entity, b.entity);
                assert!((a.score - b.score).abs() < EPS);
            }
        }
    }
}
