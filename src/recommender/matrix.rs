use std::hash::Hash;

use indexmap::IndexMap;
use num::Num;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{RecommendError, Result};
use crate::recommender::store::{Entity, PreferenceStore};

/// A single stored preference.
/// Whatever shape the store keeps is adapted into this at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PreferenceRecord<N> {
    pub score: N,
}

impl<N> PreferenceRecord<N> {
    #[inline]
    pub fn new(score: N) -> Self {
        Self { score }
    }
}

impl<N> From<N> for PreferenceRecord<N> {
    #[inline]
    fn from(score: N) -> Self {
        Self { score }
    }
}

/// Row of a preference matrix: counterpart -> record
pub type PreferenceRow<C, N> = IndexMap<C, PreferenceRecord<N>>;

/// Sparse preference matrix
/// row entity -> (counterpart -> record)
///
/// Nothing about the transposed orientation is assumed: `m[a]` containing
/// `b` says nothing about a row `b` until `transpose` is called.
/// Rows and counterparts keep insertion order, which makes every
/// downstream ranking deterministic.
///
/// A matrix is a snapshot. It is built per query and never updated
/// incrementally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreferenceMatrix<R, C, N>
where
    R: Eq + Hash,
    C: Eq + Hash,
{
    rows: IndexMap<R, PreferenceRow<C, N>>,
}

impl<R, C, N> Default for PreferenceMatrix<R, C, N>
where
    R: Eq + Hash,
    C: Eq + Hash,
{
    fn default() -> Self {
        Self { rows: IndexMap::new() }
    }
}

impl<R, C, N> PreferenceMatrix<R, C, N>
where
    R: Eq + Hash,
    C: Eq + Hash,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(rows: usize) -> Self {
        Self { rows: IndexMap::with_capacity(rows) }
    }

    /// Set one record, creating the row if needed.
    /// Returns the record previously stored for the pair.
    pub fn insert(&mut self, row: R, col: C, record: PreferenceRecord<N>) -> Option<PreferenceRecord<N>> {
        self.rows.entry(row).or_default().insert(col, record)
    }

    /// Replace a whole row
    pub fn insert_row(&mut self, row: R, values: PreferenceRow<C, N>) {
        self.rows.insert(row, values);
    }

    #[inline]
    pub fn row(&self, row: &R) -> Option<&PreferenceRow<C, N>> {
        self.rows.get(row)
    }

    #[inline]
    pub fn contains_row(&self, row: &R) -> bool {
        self.rows.contains_key(row)
    }

    #[inline]
    pub fn score(&self, row: &R, col: &C) -> Option<N>
    where
        N: Copy,
    {
        self.rows.get(row).and_then(|r| r.get(col)).map(|rec| rec.score)
    }

    /// Iterate rows in insertion order
    pub fn rows(&self) -> indexmap::map::Iter<'_, R, PreferenceRow<C, N>> {
        self.rows.iter()
    }

    /// Row keys in insertion order
    pub fn row_keys(&self) -> indexmap::map::Keys<'_, R, PreferenceRow<C, N>> {
        self.rows.keys()
    }

    /// number of rows (including empty ones)
    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// number of stored records over all rows
    pub fn record_count(&self) -> usize {
        self.rows.values().map(|r| r.len()).sum()
    }

    /// Every (row, counterpart, record) triple
    pub fn triples(&self) -> impl Iterator<Item = (&R, &C, &PreferenceRecord<N>)> {
        self.rows
            .iter()
            .flat_map(|(r, row)| row.iter().map(move |(c, rec)| (r, c, rec)))
    }

    pub(crate) fn raw(&self) -> &IndexMap<R, PreferenceRow<C, N>> {
        &self.rows
    }
}

impl<R, C, N> PreferenceMatrix<R, C, N>
where
    R: Eq + Hash + Clone,
    C: Eq + Hash + Clone,
    N: Copy,
{
    /// Swap rows and counterparts.
    /// `t[c][r] == self[r][c]` for every stored pair. Rows without any
    /// record do not show up as columns, so they vanish.
    pub fn transpose(&self) -> PreferenceMatrix<C, R, N> {
        let mut rotated: PreferenceMatrix<C, R, N> = PreferenceMatrix::new();
        for (row, values) in self.rows.iter() {
            for (col, rec) in values.iter() {
                rotated.insert(col.clone(), row.clone(), *rec);
            }
        }
        rotated
    }
}

impl<S, O, N> PreferenceMatrix<S, O, N>
where
    S: Eq + Hash + Clone + std::fmt::Debug,
    O: Eq + Hash,
    N: Num + Copy + Into<f64>,
{
    /// Build a subject x object matrix by bulk fetching each subject's
    /// records from the store.
    ///
    /// Every subject gets a row, empty if it rated none of `objects`.
    /// Empty `subjects` or `objects` yield an empty matrix without touching
    /// the store. Store failures are returned as `DataAccess`.
    pub fn from_store<SE, OE, St>(store: &St, subjects: &[SE], objects: &[OE]) -> Result<Self>
    where
        SE: Entity<Id = S>,
        OE: Entity<Id = O>,
        St: PreferenceStore<SE, OE, Score = N> + ?Sized,
    {
        let mut matrix = Self::with_capacity(subjects.len());
        if subjects.is_empty() || objects.is_empty() {
            debug!(subjects = subjects.len(), objects = objects.len(), "empty input, empty preference matrix");
            return Ok(matrix);
        }

        for subject in subjects {
            let id = subject.id();
            let values = store
                .scores_for(objects, subject)
                .map_err(|e| RecommendError::data_access(&id, e))?;
            matrix.insert_row(id, values);
        }

        debug!(rows = matrix.len(), records = matrix.record_count(), "built preference matrix");
        Ok(matrix)
    }
}

impl<R, C, N> FromIterator<(R, C, N)> for PreferenceMatrix<R, C, N>
where
    R: Eq + Hash,
    C: Eq + Hash,
{
    fn from_iter<I: IntoIterator<Item = (R, C, N)>>(iter: I) -> Self {
        let mut matrix = Self::new();
        for (row, col, score) in iter {
            matrix.insert(row, col, PreferenceRecord::new(score));
        }
        matrix
    }
}
