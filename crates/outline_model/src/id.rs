//! Identifier types for outline entities

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! outline_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Create a new random id
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Get the underlying UUID
            pub fn as_uuid(&self) -> Uuid {
                self.0
            }

            /// Parse an id from its string form
            pub fn from_string(s: &str) -> Option<Self> {
                Uuid::parse_str(s).ok().map(Self)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

outline_id! {
    /// Stable identifier of a bookmark. Survives moves, export and import.
    BookmarkId
}

outline_id! {
    /// Stable identifier of a page link
    LinkId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        assert_ne!(BookmarkId::new(), BookmarkId::new());
        assert_ne!(LinkId::new(), LinkId::new());
    }

    #[test]
    fn test_id_string_roundtrip() {
        let id = BookmarkId::new();
        assert_eq!(BookmarkId::from_string(&id.to_string()), Some(id));
        assert_eq!(BookmarkId::from_string("not-a-uuid"), None);
    }

    #[test]
    fn test_id_serializes_as_plain_string() {
        let id = LinkId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id));
    }
}
