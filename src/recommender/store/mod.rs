pub mod memory;

use std::fmt::{self, Debug, Display};
use std::hash::Hash;

use indexmap::IndexMap;
use num::Num;
use serde::{Deserialize, Serialize};

use crate::recommender::matrix::PreferenceRecord;

/// Something that can be identified inside a preference matrix.
///
/// Subjects (users) and objects (items) both implement this.
/// The engine only ever looks at `Id`; the entity itself is handed back
/// to the caller in rankings.
pub trait Entity {
    type Id: Clone + Eq + Hash + Debug + Send + Sync;

    fn id(&self) -> Self::Id;
}

macro_rules! impl_entity_for_id {
    ($($t:ty),* $(,)?) => {
        $(
            impl Entity for $t {
                type Id = $t;

                #[inline]
                fn id(&self) -> Self::Id {
                    self.clone()
                }
            }
        )*
    };
}

impl_entity_for_id!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, String);

/// Which side of the matrix an id belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// The entity issuing preferences (user)
    Subject,
    /// The entity being rated (item)
    Object,
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Subject => write!(f, "subject"),
            EntityKind::Object => write!(f, "object"),
        }
    }
}

/// Bulk access to stored preferences.
///
/// Implementations adapt whatever record shape they keep into
/// `PreferenceRecord`. At most one record per (subject, object) pair.
pub trait PreferenceStore<S, O>
where
    S: Entity,
    O: Entity,
{
    /// Score type of a single preference
    type Score: Num + Copy + Into<f64> + Send + Sync;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetch every record `subject` holds for any of `objects`.
    /// Objects without a record are simply absent from the result.
    fn scores_for(
        &self,
        objects: &[O],
        subject: &S,
    ) -> Result<IndexMap<O::Id, PreferenceRecord<Self::Score>>, Self::Error>;
}

/// Turns ranked ids back into caller facing entities.
pub trait EntityResolver<S, O>
where
    S: Entity,
    O: Entity,
{
    type Error: std::error::Error + Send + Sync + 'static;

    fn resolve_subject(&self, id: &S::Id) -> Result<S, Self::Error>;

    fn resolve_object(&self, id: &O::Id) -> Result<O, Self::Error>;
}

impl<S, O, T> PreferenceStore<S, O> for &T
where
    S: Entity,
    O: Entity,
    T: PreferenceStore<S, O> + ?Sized,
{
    type Score = T::Score;
    type Error = T::Error;

    fn scores_for(
        &self,
        objects: &[O],
        subject: &S,
    ) -> Result<IndexMap<O::Id, PreferenceRecord<Self::Score>>, Self::Error> {
        (**self).scores_for(objects, subject)
    }
}

impl<S, O, T> EntityResolver<S, O> for &T
where
    S: Entity,
    O: Entity,
    T: EntityResolver<S, O> + ?Sized,
{
    type Error = T::Error;

    fn resolve_subject(&self, id: &S::Id) -> Result<S, Self::Error> {
        (**self).resolve_subject(id)
    }

    fn resolve_object(&self, id: &O::Id) -> Result<O, Self::Error> {
        (**self).resolve_object(id)
    }
}
