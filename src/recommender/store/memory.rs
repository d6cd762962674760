use std::convert::Infallible;

use ahash::RandomState;
use dashmap::DashMap;
use indexmap::IndexMap;
use num::Num;

use crate::recommender::matrix::PreferenceRecord;
use crate::recommender::store::{Entity, EntityKind, EntityResolver, PreferenceStore};

#[derive(Debug, thiserror::Error)]
pub enum MemoryStoreError {
    #[error("unknown {kind} {id}")]
    UnknownEntity { kind: EntityKind, id: String },
}

/// keep votes and entity catalogs in a thread-safe way
///
/// Works as both the preference store and the entity resolver, so one
/// instance can be lent to a `Recommender` twice.
/// At most one vote is kept per (subject, object) pair.
pub struct MemoryVoteStore<S, O, N>
where
    S: Entity,
    O: Entity,
{
    votes: DashMap<(S::Id, O::Id), N, RandomState>,
    subjects: DashMap<S::Id, S, RandomState>,
    objects: DashMap<O::Id, O, RandomState>,
}

impl<S, O, N> Default for MemoryVoteStore<S, O, N>
where
    S: Entity,
    O: Entity,
{
    fn default() -> Self {
        Self {
            votes: DashMap::with_hasher(RandomState::new()),
            subjects: DashMap::with_hasher(RandomState::new()),
            objects: DashMap::with_hasher(RandomState::new()),
        }
    }
}

impl<S, O, N> MemoryVoteStore<S, O, N>
where
    S: Entity,
    O: Entity,
    N: Copy,
{
    /// Create a new instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Make a subject resolvable by id
    pub fn register_subject(&self, subject: S) {
        self.subjects.insert(subject.id(), subject);
    }

    /// Make an object resolvable by id
    pub fn register_object(&self, object: O) {
        self.objects.insert(object.id(), object);
    }

    /// Store a vote, replacing any earlier vote of the same pair.
    /// Returns the replaced score.
    pub fn record_vote(&self, subject: &S, object: &O, score: N) -> Option<N> {
        self.votes.insert((subject.id(), object.id()), score)
    }

    pub fn remove_vote(&self, subject: &S, object: &O) -> Option<N> {
        self.votes
            .remove(&(subject.id(), object.id()))
            .map(|(_, score)| score)
    }

    pub fn vote(&self, subject: &S, object: &O) -> Option<N> {
        self.votes.get(&(subject.id(), object.id())).map(|v| *v)
    }

    /// number of stored votes
    #[inline]
    pub fn vote_count(&self) -> usize {
        self.votes.len()
    }
}

impl<S, O, N> PreferenceStore<S, O> for MemoryVoteStore<S, O, N>
where
    S: Entity,
    O: Entity,
    N: Num + Copy + Into<f64> + Send + Sync,
{
    type Score = N;
    type Error = Infallible;

    fn scores_for(
        &self,
        objects: &[O],
        subject: &S,
    ) -> Result<IndexMap<O::Id, PreferenceRecord<N>>, Infallible> {
        let subject_id = subject.id();
        let mut found = IndexMap::new();
        for object in objects {
            let key = (subject_id.clone(), object.id());
            if let Some(score) = self.votes.get(&key) {
                found.insert(key.1, PreferenceRecord::new(*score));
            }
        }
        Ok(found)
    }
}

impl<S, O, N> EntityResolver<S, O> for MemoryVoteStore<S, O, N>
where
    S: Entity + Clone,
    O: Entity + Clone,
{
    type Error = MemoryStoreError;

    fn resolve_subject(&self, id: &S::Id) -> Result<S, MemoryStoreError> {
        self.subjects
            .get(id)
            .map(|s| s.value().clone())
            .ok_or_else(|| MemoryStoreError::UnknownEntity {
                kind: EntityKind::Subject,
                id: format!("{:?}", id),
            })
    }

    fn resolve_object(&self, id: &O::Id) -> Result<O, MemoryStoreError> {
        self.objects
            .get(id)
            .map(|o| o.value().clone())
            .ok_or_else(|| MemoryStoreError::UnknownEntity {
                kind: EntityKind::Object,
                id: format!("{:?}", id),
            })
    }
}
