//! Typed string identifiers.
//!
//! Every id is a thin wrapper around a `String` that serializes as a bare JSON
//! string, so files stay readable while the compiler keeps a `ProductId` from
//! being passed where a `CategoryId` is expected.

use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl Deref for $name {
            type Target = str;

            fn deref(&self) -> &str {
                &self.0
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }
    };
}

string_id!(
    /// Identifier of a node inside one guide.
    NodeId
);
string_id!(
    /// Identifier of an answer inside one node.
    AnswerId
);
string_id!(
    /// Identifier a catalog uses to reference a guide file.
    GuideId
);
string_id!(
    /// Catalog key of a product.
    ProductId
);
string_id!(
    /// Catalog key of a problem category within a product.
    CategoryId
);

impl NodeId {
    /// Random UUID v4 id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl AnswerId {
    /// Random UUID v4 id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn given_generated_ids_when_compared_then_they_differ() {
        let a = NodeId::generate();
        let b = NodeId::generate();
        assert_ne!(a, b);
        assert_eq!(a.len(), 36);
    }

    #[test]
    fn given_map_keyed_by_id_when_looking_up_by_str_then_finds_entry() {
        let mut map = BTreeMap::new();
        map.insert(NodeId::from("start"), 1);
        assert_eq!(map.get("start"), Some(&1));
    }

    #[test]
    fn given_id_when_serialized_then_is_plain_string() {
        let id = ProductId::from("smart-toaster");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"smart-toaster\"");
        let back: ProductId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, "smart-toaster");
    }
}
