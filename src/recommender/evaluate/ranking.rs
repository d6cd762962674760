use std::fmt::{self, Debug, Display};

use serde::{Deserialize, Serialize};

/// One ranked entity with its value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankEntry<E> {
    pub entity: E,
    /// similarity or aggregated recommendation value
    pub score: f64,
}

impl<E> RankEntry<E> {
    #[inline]
    pub fn new(entity: E, score: f64) -> Self {
        Self { entity, score }
    }
}

/// Structure to store ranking results
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Ranking<E> {
    pub list: Vec<RankEntry<E>>,
}

impl<E> Default for Ranking<E> {
    fn default() -> Self {
        Self { list: Vec::new() }
    }
}

impl<E> Ranking<E> {
    pub fn new(list: Vec<RankEntry<E>>) -> Self {
        Ranking { list }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.list.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RankEntry<E>> {
        self.list.iter()
    }

    /// Keep only entries strictly above `threshold`.
    /// NaN never passes.
    pub fn retain_above(&mut self, threshold: f64) -> &mut Self {
        self.list.retain(|e| e.score > threshold);
        self
    }

    /// Sort results by descending score
    /// Stable: equal scores keep their current order.
    pub fn sort_by_score_desc(&mut self) -> &mut Self {
        // Remove NaN scores
        self.list.retain(|e| !e.score.is_nan());
        self.list.sort_by(|a, b| b.score.total_cmp(&a.score));
        self
    }

    /// Sort results by ascending score
    pub fn sort_by_score_asc(&mut self) -> &mut Self {
        self.list.retain(|e| !e.score.is_nan());
        self.list.sort_by(|a, b| a.score.total_cmp(&b.score));
        self
    }

    pub fn truncate(&mut self, len: usize) -> &mut Self {
        self.list.truncate(len);
        self
    }

    /// Map every entity, stopping at the first failure
    pub fn try_map<T, Err, F>(self, mut f: F) -> Result<Ranking<T>, Err>
    where
        F: FnMut(E) -> Result<T, Err>,
    {
        let list = self
            .list
            .into_iter()
            .map(|e| Ok(RankEntry::new(f(e.entity)?, e.score)))
            .collect::<Result<Vec<_>, Err>>()?;
        Ok(Ranking { list })
    }

    /// (score, entity) pairs
    pub fn into_pairs(self) -> Vec<(f64, E)> {
        self.list.into_iter().map(|e| (e.score, e.entity)).collect()
    }
}

impl<E> IntoIterator for Ranking<E> {
    type Item = RankEntry<E>;
    type IntoIter = std::vec::IntoIter<RankEntry<E>>;

    fn into_iter(self) -> Self::IntoIter {
        self.list.into_iter()
    }
}

impl<E> FromIterator<RankEntry<E>> for Ranking<E> {
    fn from_iter<I: IntoIterator<Item = RankEntry<E>>>(iter: I) -> Self {
        Ranking { list: iter.into_iter().collect() }
    }
}

impl<E> Debug for Ranking<E>
where
    E: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            // each entry on a new line
            writeln!(f, "Ranking [")?;
            for e in &self.list {
                writeln!(f, "    {:?}: {:.6}", e.entity, e.score)?;
            }
            write!(f, "]")
        } else {
            f.debug_list()
                .entries(self.list.iter().map(|e| (&e.entity, e.score)))
                .finish()
        }
    }
}

impl<E> Display for Ranking<E>
where
    E: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (rank, e) in self.list.iter().enumerate() {
            writeln!(f, "{:>4}. {:.6}  {:?}", rank + 1, e.score, e.entity)?;
        }
        Ok(())
    }
}
