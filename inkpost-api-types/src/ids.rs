use serde::{Deserialize, Serialize};
use std::fmt;

/// Declares a copyable integer-backed identifier for one entity kind.
///
/// Distinct types keep a `PostId` from ever being passed where a `UserId`
/// is expected, while still serializing as the bare database integer.
macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i32);

        impl $name {
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            /// Raw database id
            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "_{}"), self.0)
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self(id)
            }
        }
    };
}

entity_id!(
    /// Identity of a registered user
    UserId,
    "user"
);
entity_id!(
    /// Identity of a team (group) a user can belong to
    TeamId,
    "team"
);
entity_id!(PostId, "post");
entity_id!(CommentId, "comment");
entity_id!(LikeId, "like");
