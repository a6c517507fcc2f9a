//! Content Type Catalog
//!
//! The closed set of compendium content types. This is the single source
//! of truth for request validation: a type name is either one of these
//! eight tags or the request is malformed.

use serde::{Deserialize, Serialize};

/// A compendium content type tag.
///
/// The variant order is fixed and load-bearing: type enumeration
/// responses always follow this order, regardless of how packs were
/// loaded. Clients rely on the stable ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Items,
    Spells,
    Monsters,
    Races,
    Classes,
    Backgrounds,
    Features,
    Conditions,
}

impl ContentType {
    /// All content types, in catalog order.
    pub const ALL: [ContentType; 8] = [
        ContentType::Items,
        ContentType::Spells,
        ContentType::Monsters,
        ContentType::Races,
        ContentType::Classes,
        ContentType::Backgrounds,
        ContentType::Features,
        ContentType::Conditions,
    ];

    /// The lowercase tag used in URLs and pack files.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Items => "items",
            ContentType::Spells => "spells",
            ContentType::Monsters => "monsters",
            ContentType::Races => "races",
            ContentType::Classes => "classes",
            ContentType::Backgrounds => "backgrounds",
            ContentType::Features => "features",
            ContentType::Conditions => "conditions",
        }
    }

    /// Parse a tag, returning `None` for anything outside the catalog.
    pub fn parse(name: &str) -> Option<ContentType> {
        ContentType::ALL.iter().copied().find(|t| t.as_str() == name)
    }

    /// Comma-separated list of all valid tags, for error messages.
    pub fn valid_list() -> String {
        ContentType::ALL
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
