//! Collection references
//!
//! A [`CollectionRef`] names one collection inside one database. It is a
//! pure value: building one performs no I/O and proves nothing about the
//! collection's existence.

use crate::domain::ids::CollectionName;
use std::fmt;

/// Reference to a named collection within a database
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectionRef {
    database: String,
    name: CollectionName,
}

impl CollectionRef {
    /// Creates a reference to `name` within `database`
    pub fn new(database: impl Into<String>, name: CollectionName) -> Self {
        Self {
            database: database.into(),
            name,
        }
    }

    /// Database the collection belongs to
    pub fn database(&self) -> &str {
        &self.database
    }

    /// Collection name
    pub fn name(&self) -> &CollectionName {
        &self.name
    }

    /// Fully qualified `database.collection` namespace
    pub fn namespace(&self) -> String {
        format!("{}.{}", self.database, self.name)
    }
}

impl fmt::Display for CollectionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.database, self.name)
    }
}
