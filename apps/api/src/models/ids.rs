use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }
    };
}

entity_id!(
    /// Primary key of a row in `students`.
    StudentId
);
entity_id!(
    /// Primary key of a row in `courses`.
    CourseId
);
entity_id!(
    /// Primary key of a row in `skills`. Also defines skill-vector index order.
    SkillId
);
entity_id!(
    /// Primary key of a row in `career_goals`.
    CareerGoalId
);
entity_id!(
    /// Primary key of a row in `clusters`.
    ClusterId
);
