/// This crate is a similarity based collaborative filtering engine.
pub mod recommender;
pub mod utils;
pub mod error;

/// Recommender
/// The top-level struct of this crate, providing the four recommendation queries:
/// - `similar_users`: other subjects ranked by similarity to a subject
/// - `similar_items`: other objects ranked by similarity to an object
/// - `best_items_for_user`: unseen objects ranked for a subject
/// - `best_users_for_item`: subjects ranked for an object they have not rated
///
/// Every query builds a fresh preference matrix from the store, so results
/// always reflect the latest snapshot. Nothing is cached between calls.
///
/// `Recommender<St, Rs>` has the following generic parameters:
/// - `St`: preference store (e.g. `MemoryVoteStore`)
/// - `Rs`: entity resolver (e.g. `MemoryVoteStore`)
///
/// Both collaborators are also implemented for references, so one store can
/// serve as both.
pub use recommender::Recommender;

/// Recommender Configuration
/// Thresholds, normalization variant, parallelism and result limit.
/// Defaults: recommendations must score > 0, similar entities > 0.25.
///
/// # Serialization
/// Supported. Missing fields fall back to their defaults.
pub use recommender::config::RecommenderConfig;

/// Preference Matrix
/// Sparse mapping row entity -> counterpart -> record, built per query.
/// `transpose` swaps rows and counterparts, which turns the user based
/// algorithms into item based ones.
///
/// # Serialization
/// Supported.
pub use recommender::matrix::{PreferenceMatrix, PreferenceRecord};

/// Similarity
/// Pearson correlation over the shared counterparts of two rows, mapped
/// onto [0, 1]. Degenerate input resolves to 0.0 instead of an error.
pub use recommender::evaluate::similarity::{pearson_similarity, similarity};

/// Aggregation
/// Similarity weighted recommendation values for a target row.
/// `Normalization` selects between dividing by the number of contributors
/// (default) and by the sum of their similarities.
pub use recommender::evaluate::aggregate::{aggregate, aggregate_par, Normalization};

/// Ranking and Rank Entry structures
/// - `Ranking`: holds ranked results and provides filtering, sorting and mapping
/// - `RankEntry`: a single result, the entity and its score
pub use recommender::evaluate::ranking::{RankEntry, Ranking};

/// Collaborator traits
/// - `Entity`: anything with an id (implemented for integer ids and `String`)
/// - `PreferenceStore`: bulk lookup of a subject's records
/// - `EntityResolver`: id back to entity
pub use recommender::store::{Entity, EntityKind, EntityResolver, PreferenceStore};

/// In-memory Vote Store
/// Thread-safe store and resolver, implemented using DashMap.
pub use recommender::store::memory::{MemoryStoreError, MemoryVoteStore};

pub use error::{RecommendError, Result};
