//! Domain identifier types with validation
//!
//! Newtype wrappers for collection names and store-assigned document
//! identifiers. Each type validates its input once at construction.

use mongodb::bson::oid::ObjectId;
use mongodb::bson::{doc, Bson, Document};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Collection name newtype wrapper
///
/// Document stores create collections lazily, so this only checks that the
/// name is usable, never that the collection exists.
///
/// # Examples
///
/// ```
/// use inserter::domain::ids::CollectionName;
///
/// let name = CollectionName::new("blocks").unwrap();
/// assert_eq!(name.as_str(), "blocks");
/// assert!(CollectionName::new("").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CollectionName(String);

impl CollectionName {
    /// Creates a new CollectionName from a string
    ///
    /// # Arguments
    ///
    /// * `name` - The collection name
    ///
    /// # Returns
    ///
    /// Returns `Ok(CollectionName)` if the name is valid, `Err` otherwise
    pub fn new(name: impl Into<String>) -> Result<Self, String> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err("Collection name cannot be empty".to_string());
        }

        if name.contains('$') || name.contains('\0') {
            return Err(format!(
                "Collection name '{}' must not contain '$' or NUL characters",
                name.escape_default()
            ));
        }

        if name.starts_with("system.") {
            return Err(format!(
                "Collection name '{name}' uses the reserved 'system.' prefix"
            ));
        }

        Ok(Self(name))
    }

    /// Returns the collection name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CollectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CollectionName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for CollectionName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Document identifier newtype wrapper
///
/// Holds the store-assigned `_id` in portable string form. Use
/// [`DocumentId::from_bson`] to normalize a raw store value.
///
/// # Examples
///
/// ```
/// use inserter::domain::ids::DocumentId;
/// use mongodb::bson::{oid::ObjectId, Bson};
///
/// let oid = ObjectId::parse_str("65a1f0c2e4b0a1b2c3d4e5f6").unwrap();
/// let id = DocumentId::from_bson(&Bson::ObjectId(oid));
/// assert_eq!(id.as_str(), "65a1f0c2e4b0a1b2c3d4e5f6");
///
/// let id = DocumentId::from_bson(&Bson::String("minecraft:stone".into()));
/// assert_eq!(id.as_str(), "minecraft:stone");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentId(String);

impl DocumentId {
    /// Creates a new DocumentId from an already normalized string
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.is_empty() {
            return Err("Document ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Normalizes a store-assigned identifier to its string form
    ///
    /// ObjectIds become 24-character hex, strings pass through, integers use
    /// decimal, and anything else uses its relaxed Extended JSON text.
    pub fn from_bson(value: &Bson) -> Self {
        let text = match value {
            Bson::ObjectId(oid) => oid.to_hex(),
            Bson::String(s) => s.clone(),
            Bson::Int32(n) => n.to_string(),
            Bson::Int64(n) => n.to_string(),
            other => other.clone().into_relaxed_extjson().to_string(),
        };
        Self(text)
    }

    /// Builds an `_id` filter matching the literal string id
    pub fn to_filter(&self) -> Document {
        doc! { "_id": self.0.as_str() }
    }

    /// Builds an `_id` filter for the non-string form this id normalizes from
    ///
    /// A 24-character hex id maps back to an ObjectId and a canonical
    /// decimal maps back to an integer. Text such as `"007"` has no typed
    /// form, so a stored integer 7 is never returned for it.
    pub fn typed_filter(&self) -> Option<Document> {
        if let Ok(oid) = ObjectId::parse_str(&self.0) {
            return Some(doc! { "_id": oid });
        }
        match self.0.parse::<i64>() {
            Ok(n) if n.to_string() == self.0 => Some(doc! { "_id": n }),
            _ => None,
        }
    }

    /// Returns the document ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DocumentId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for DocumentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_name_valid() {
        let name = CollectionName::new("items").unwrap();
        assert_eq!(name.as_str(), "items");
        assert_eq!(name.to_string(), "items");
    }

    #[test]
    fn test_collection_name_rejects_empty_and_reserved() {
        assert!(CollectionName::new("").is_err());
        assert!(CollectionName::new("   ").is_err());
        assert!(CollectionName::new("bad$name").is_err());
        assert!(CollectionName::new("system.users").is_err());
    }

    #[test]
    fn test_document_id_from_object_id() {
        let oid = ObjectId::new();
        let id = DocumentId::from_bson(&Bson::ObjectId(oid));
        assert_eq!(id.as_str().len(), 24);
        assert_eq!(id.as_str(), oid.to_hex());
    }

    #[test]
    fn test_document_id_from_scalars() {
        assert_eq!(DocumentId::from_bson(&Bson::Int32(7)).as_str(), "7");
        assert_eq!(DocumentId::from_bson(&Bson::Int64(42)).as_str(), "42");
        assert_eq!(
            DocumentId::from_bson(&Bson::String("abc".to_string())).as_str(),
            "abc"
        );
        assert_eq!(DocumentId::from_bson(&Bson::Boolean(true)).as_str(), "true");
    }

    #[test]
    fn test_document_id_filter_shapes() {
        let oid = ObjectId::new();
        let id = DocumentId::from_bson(&Bson::ObjectId(oid));
        assert_eq!(id.to_filter().get_str("_id").unwrap(), oid.to_hex());
        assert_eq!(id.typed_filter().unwrap().get_object_id("_id").unwrap(), oid);

        let id = DocumentId::new("minecraft:stone").unwrap();
        assert_eq!(id.to_filter().get_str("_id").unwrap(), "minecraft:stone");
        assert!(id.typed_filter().is_none());
    }

    #[test]
    fn test_typed_filter_only_for_canonical_integers() {
        let id = DocumentId::from_bson(&Bson::Int64(42));
        assert_eq!(id.typed_filter().unwrap().get_i64("_id").unwrap(), 42);

        assert!(DocumentId::new("007").unwrap().typed_filter().is_none());
        assert!(DocumentId::new("+7").unwrap().typed_filter().is_none());
        assert_eq!(
            DocumentId::new("-7").unwrap().typed_filter().unwrap().get_i64("_id").unwrap(),
            -7
        );
    }

    #[test]
    fn test_document_id_empty_rejected() {
        assert!(DocumentId::new("").is_err());
    }
}
