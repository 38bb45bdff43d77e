//! Newtype wrappers for semantic identifiers.
//!
//! Destinations and resources are both addressed by strings; wrapping them
//! keeps a link target from being passed where an image URI is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Arc<str>);

        impl $name {
            pub fn new(value: impl Into<Arc<str>>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s.into())
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.into())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

string_id!(
    /// Name of a document destination (target of internal links).
    AnchorId
);

string_id!(
    /// URI of an external resource such as an embedded image.
    ResourceUri
);

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_anchor_id_creation() {
        let id1 = AnchorId::new("section-1");
        let id2 = AnchorId::from("section-1");
        let id3 = AnchorId::from(String::from("section-1"));

        assert_eq!(id1, id2);
        assert_eq!(id2, id3);
        assert_eq!(id1.to_string(), "section-1");
    }

    #[test]
    fn test_ids_as_map_keys() {
        let mut images = HashMap::new();
        images.insert(ResourceUri::new("logo.png"), (120.0f32, 40.0f32));
        assert_eq!(images.get(&ResourceUri::from("logo.png")), Some(&(120.0, 40.0)));
    }

    #[test]
    fn test_ids_serialize_as_plain_strings() {
        let json = serde_json::to_string(&AnchorId::new("chapter-2")).unwrap();
        assert_eq!(json, "\"chapter-2\"");

        let uri: ResourceUri = serde_json::from_str("\"images/logo.png\"").unwrap();
        assert_eq!(uri.as_str(), "images/logo.png");
    }
}
