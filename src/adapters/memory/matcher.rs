//! Filter evaluation and `$set` application for the in-memory store
//!
//! Supports the subset of the query language the façade produces: field
//! equality (dotted paths, array membership, `$eq`), `$and` and `$or`.
//! Anything else is rejected instead of being silently misread.

use crate::domain::{Document, StoreError};
use mongodb::bson::Bson;

/// Returns true if `document` satisfies `filter`
pub(crate) fn matches(document: &Document, filter: &Document) -> Result<bool, StoreError> {
    for (key, expected) in filter {
        let ok = match key.as_str() {
            "$or" => any_matches(document, sub_filters(key, expected)?)?,
            "$and" => all_match(document, sub_filters(key, expected)?)?,
            op if op.starts_with('$') => {
                return Err(StoreError::Rejected(format!(
                    "unsupported top-level operator '{op}'"
                )))
            }
            path => field_matches(lookup(document, path), expected)?,
        };
        if !ok {
            return Ok(false);
        }
    }
    Ok(true)
}

fn sub_filters<'a>(op: &str, value: &'a Bson) -> Result<Vec<&'a Document>, StoreError> {
    let Bson::Array(items) = value else {
        return Err(StoreError::Rejected(format!("{op} expects an array")));
    };
    items
        .iter()
        .map(|item| match item {
            Bson::Document(d) => Ok(d),
            _ => Err(StoreError::Rejected(format!(
                "{op} expects an array of documents"
            ))),
        })
        .collect()
}

fn any_matches(document: &Document, filters: Vec<&Document>) -> Result<bool, StoreError> {
    for filter in filters {
        if matches(document, filter)? {
            return Ok(true);
        }
    }
    Ok(false)
}

fn all_match(document: &Document, filters: Vec<&Document>) -> Result<bool, StoreError> {
    for filter in filters {
        if !matches(document, filter)? {
            return Ok(false);
        }
    }
    Ok(true)
}

fn field_matches(actual: Option<&Bson>, expected: &Bson) -> Result<bool, StoreError> {
    if let Bson::Document(operators) = expected {
        if let Some((op, _)) = operators.iter().next() {
            if op.starts_with('$') {
                return operator_matches(actual, operators);
            }
        }
    }
    Ok(equals_or_contains(actual, expected))
}

fn operator_matches(actual: Option<&Bson>, operators: &Document) -> Result<bool, StoreError> {
    for (op, operand) in operators {
        let ok = match op.as_str() {
            "$eq" => equals_or_contains(actual, operand),
            "$ne" => !equals_or_contains(actual, operand),
            "$exists" => actual.is_some() == truthy(operand),
            other => {
                return Err(StoreError::Rejected(format!(
                    "unsupported query operator '{other}'"
                )))
            }
        };
        if !ok {
            return Ok(false);
        }
    }
    Ok(true)
}

fn equals_or_contains(actual: Option<&Bson>, expected: &Bson) -> bool {
    match (actual, expected) {
        // A missing field equals null
        (None, Bson::Null) => true,
        (None, _) => false,
        (Some(Bson::Array(items)), other) if !matches!(other, Bson::Array(_)) => {
            items.iter().any(|item| values_equal(item, other))
        }
        (Some(value), other) => values_equal(value, other),
    }
}

fn truthy(value: &Bson) -> bool {
    match value {
        Bson::Boolean(b) => *b,
        Bson::Null => false,
        Bson::Int32(n) => *n != 0,
        Bson::Int64(n) => *n != 0,
        Bson::Double(n) => *n != 0.0,
        _ => true,
    }
}

/// Structural equality with numeric types compared by value
pub(crate) fn values_equal(a: &Bson, b: &Bson) -> bool {
    // Integers compare exactly; f64 loses precision above 2^53
    if let (Some(x), Some(y)) = (as_integer(a), as_integer(b)) {
        return x == y;
    }
    match (as_number(a), as_number(b)) {
        (Some(x), Some(y)) => return x == y,
        (Some(_), None) | (None, Some(_)) => return false,
        (None, None) => {}
    }

    match (a, b) {
        (Bson::Document(x), Bson::Document(y)) => {
            x.len() == y.len()
                && x
                    .iter()
                    .zip(y.iter())
                    .all(|((ka, va), (kb, vb))| ka == kb && values_equal(va, vb))
        }
        (Bson::Array(x), Bson::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y.iter()).all(|(va, vb)| values_equal(va, vb))
        }
        _ => a == b,
    }
}

fn as_integer(value: &Bson) -> Option<i64> {
    match value {
        Bson::Int32(n) => Some(i64::from(*n)),
        Bson::Int64(n) => Some(*n),
        _ => None,
    }
}

fn as_number(value: &Bson) -> Option<f64> {
    match value {
        Bson::Int32(n) => Some(f64::from(*n)),
        Bson::Int64(n) => Some(*n as f64),
        Bson::Double(n) => Some(*n),
        _ => None,
    }
}

/// Resolve a dotted path such as `properties.hardness`
pub(crate) fn lookup<'a>(document: &'a Document, path: &str) -> Option<&'a Bson> {
    let mut segments = path.split('.');
    let first = segments.next()?;
    let mut current = document.get(first)?;
    for segment in segments {
        current = match current {
            Bson::Document(inner) => inner.get(segment)?,
            Bson::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// Set a dotted path, creating intermediate documents as needed
///
/// Returns true if the stored value changed.
pub(crate) fn set_path(
    document: &mut Document,
    path: &str,
    value: Bson,
) -> Result<bool, StoreError> {
    match path.split_once('.') {
        None => {
            if document.get(path).is_some_and(|current| values_equal(current, &value)) {
                return Ok(false);
            }
            document.insert(path, value);
            Ok(true)
        }
        Some((head, rest)) => {
            if !document.contains_key(head) {
                document.insert(head, Document::new());
            }
            match document.get_mut(head) {
                Some(Bson::Document(inner)) => set_path(inner, rest, value),
                _ => Err(StoreError::Rejected(format!(
                    "cannot create field '{rest}' inside non-document field '{head}'"
                ))),
            }
        }
    }
}

/// Apply an update document, which must be of the form `{"$set": {...}}`
///
/// Returns true if any field changed.
pub(crate) fn apply_update(document: &mut Document, update: &Document) -> Result<bool, StoreError> {
    let fields = set_fields(update)?;
    let mut changed = false;
    for (path, value) in fields {
        if path == "_id" {
            match document.get("_id") {
                Some(id) if !values_equal(id, value) => {
                    return Err(StoreError::Rejected(
                        "the (immutable) field '_id' cannot be modified".to_string(),
                    ));
                }
                Some(_) => {}
                None => {
                    document.insert("_id", value.clone());
                    changed = true;
                }
            }
            continue;
        }
        changed |= set_path(document, path, value.clone())?;
    }
    Ok(changed)
}

fn set_fields(update: &Document) -> Result<&Document, StoreError> {
    if update.is_empty() {
        return Err(StoreError::Rejected("update document must not be empty".to_string()));
    }
    let mut set = None;
    for (op, fields) in update {
        match (op.as_str(), fields) {
            ("$set", Bson::Document(fields)) => set = Some(fields),
            ("$set", _) => {
                return Err(StoreError::Rejected("$set expects a document".to_string()))
            }
            (other, _) if other.starts_with('$') => {
                return Err(StoreError::Rejected(format!(
                    "unsupported update operator '{other}'"
                )))
            }
            (field, _) => {
                return Err(StoreError::Rejected(format!(
                    "update document requires atomic operators, found field '{field}'"
                )))
            }
        }
    }
    set.ok_or_else(|| StoreError::Rejected("update document has no $set".to_string()))
}

/// Equality fields of a filter, as copied into a document created by upsert
pub(crate) fn equality_fields(filter: &Document) -> Vec<(&str, Bson)> {
    let mut fields = Vec::new();
    for (key, value) in filter {
        if key.starts_with('$') {
            continue;
        }
        match value {
            Bson::Document(operators)
                if operators.keys().next().is_some_and(|k| k.starts_with('$')) =>
            {
                if let Some(eq) = operators.get("$eq") {
                    fields.push((key.as_str(), eq.clone()));
                }
            }
            other => fields.push((key.as_str(), other.clone())),
        }
    }
    fields
}
