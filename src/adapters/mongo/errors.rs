//! MongoDB driver error mapping
//!
//! Translates `mongodb::error::Error` into [`StoreError`] so driver types
//! never leave this adapter.

use crate::domain::{BatchWriteFailure, StoreError};
use mongodb::bson::Bson;
use mongodb::error::{Error as MongoError, ErrorKind, WriteFailure};

/// Server error code for unique index violations
const DUPLICATE_KEY_CODE: i32 = 11000;

/// Map a driver error from a single-document write or update
pub(crate) fn map_write_error(err: MongoError) -> StoreError {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error))
            if write_error.code == DUPLICATE_KEY_CODE =>
        {
            StoreError::DuplicateKey(write_error.message.clone())
        }
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => {
            StoreError::Rejected(format!("{} (code {})", write_error.message, write_error.code))
        }
        _ if is_unavailable(&err) => StoreError::Unavailable(err.to_string()),
        _ => StoreError::Rejected(err.to_string()),
    }
}

/// Map a driver error from `insert_many`
///
/// `ids` holds the `_id` of every submitted document in input order. An
/// ordered batch commits everything before the first failing index; an
/// unordered batch commits everything that has no write error.
pub(crate) fn map_insert_many_error(err: MongoError, ids: &[Bson], ordered: bool) -> StoreError {
    match err.kind.as_ref() {
        ErrorKind::InsertMany(insert_error) => {
            let mut failures = insert_error
                .write_errors
                .iter()
                .flatten()
                .map(|write_error| BatchWriteFailure {
                    index: write_error.index,
                    message: write_error.message.clone(),
                    duplicate_key: write_error.code == DUPLICATE_KEY_CODE,
                })
                .collect::<Vec<_>>();
            failures.sort_by_key(|failure| failure.index);

            if failures.is_empty() {
                if let Some(concern) = &insert_error.write_concern_error {
                    return StoreError::Rejected(format!(
                        "Write concern error: {}",
                        concern.message
                    ));
                }
            }

            StoreError::PartialBatch {
                committed: committed_ids(ids, &failures, ordered),
                failures,
            }
        }
        _ => map_write_error(err),
    }
}

fn committed_ids(ids: &[Bson], failures: &[BatchWriteFailure], ordered: bool) -> Vec<Bson> {
    if ordered {
        let stop = failures.first().map_or(ids.len(), |failure| failure.index);
        return ids.iter().take(stop).cloned().collect();
    }
    ids.iter()
        .enumerate()
        .filter(|(index, _)| !failures.iter().any(|failure| failure.index == *index))
        .map(|(_, id)| id.clone())
        .collect()
}

/// Map a driver error from session setup or reads
pub(crate) fn map_session_error(err: MongoError) -> StoreError {
    if is_unavailable(&err) {
        StoreError::Unavailable(err.to_string())
    } else {
        StoreError::Rejected(err.to_string())
    }
}

fn is_unavailable(err: &MongoError) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Io(_)
            | ErrorKind::ServerSelection { .. }
            | ErrorKind::ConnectionPoolCleared { .. }
            | ErrorKind::DnsResolve { .. }
            | ErrorKind::Shutdown
    )
}
