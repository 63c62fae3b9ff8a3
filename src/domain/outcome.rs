//! Operation outcomes
//!
//! Result shapes returned by the façade on success.

use crate::domain::ids::DocumentId;
use serde::Serialize;
use std::fmt;

/// Result of an upsert-one operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum UpsertOutcome {
    /// No document matched the filter; a new one was created
    Inserted {
        /// Identifier of the created document
        id: DocumentId,
    },

    /// An existing document matched the filter
    Updated {
        /// Number of documents matched by the filter
        matched: u64,
        /// Number of documents actually changed (zero when the values were already set)
        modified: u64,
    },
}

impl UpsertOutcome {
    /// Returns true if the upsert created a document
    pub fn is_inserted(&self) -> bool {
        matches!(self, UpsertOutcome::Inserted { .. })
    }

    /// Identifier of the created document, if any
    pub fn inserted_id(&self) -> Option<&DocumentId> {
        match self {
            UpsertOutcome::Inserted { id } => Some(id),
            UpsertOutcome::Updated { .. } => None,
        }
    }
}

impl fmt::Display for UpsertOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpsertOutcome::Inserted { id } => write!(f, "inserted {id}"),
            UpsertOutcome::Updated { matched, modified } => {
                write!(f, "updated (matched {matched}, modified {modified})")
            }
        }
    }
}

/// Raw counters returned by a store's update-one primitive
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateSummary {
    /// Documents matched by the filter
    pub matched_count: u64,

    /// Documents changed by the update
    pub modified_count: u64,

    /// Identifier of the document created by an upsert
    pub upserted_id: Option<mongodb::bson::Bson>,
}
