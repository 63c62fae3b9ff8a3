//! Crate-wide result alias

use super::errors::InserterError;

/// Result of any fallible Inserter operation
///
/// ```
/// use inserter::domain::{InserterError, Result};
///
/// fn require_name(name: &str) -> Result<&str> {
///     if name.is_empty() {
///         return Err(InserterError::Validation("name cannot be empty".to_string()));
///     }
///     Ok(name)
/// }
///
/// assert!(require_name("blocks").is_ok());
/// assert!(require_name("").is_err());
/// ```
pub type Result<T> = std::result::Result<T, InserterError>;
