use crate::recommender::store::EntityKind;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors surfaced by the recommender.
/// Degenerate statistics are not errors and never show up here.
#[derive(Debug, thiserror::Error)]
pub enum RecommendError {
    /// Bulk fetch of preference records failed.
    /// Not retried.
    #[error("failed to fetch preferences for subject {subject}: {source}")]
    DataAccess {
        subject: String,
        #[source]
        source: BoxError,
    },

    /// A ranked id could not be turned back into an entity.
    #[error("failed to resolve {kind} {id}: {source}")]
    Resolve {
        kind: EntityKind,
        id: String,
        #[source]
        source: BoxError,
    },
}

impl RecommendError {
    pub(crate) fn data_access<E>(subject: &impl std::fmt::Debug, source: E) -> Self
    where
        E: Into<BoxError>,
    {
        RecommendError::DataAccess {
            subject: format!("{:?}", subject),
            source: source.into(),
        }
    }

    pub(crate) fn resolve<E>(kind: EntityKind, id: &impl std::fmt::Debug, source: E) -> Self
    where
        E: Into<BoxError>,
    {
        RecommendError::Resolve {
            kind,
            id: format!("{:?}", id),
            source: source.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RecommendError>;
