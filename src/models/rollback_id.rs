//! Human-typable deletion key for a contribution.
//!
//! A rollback id is the contribution's `id` and `sequence` joined with a
//! hyphen. Decoding splits on the first hyphen only, so any further hyphens
//! stay in the sequence part.

use std::fmt;

use crate::errors::AppError;

const SEPARATOR: char = '-';

/// Decoded `(id, sequence)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollbackId {
    pub id: String,
    pub sequence: String,
}

/// Reasons a rollback id cannot be decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RollbackIdError {
    Empty,
    MissingSeparator(String),
}

impl fmt::Display for RollbackIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RollbackIdError::Empty => write!(f, "rollback id is empty"),
            RollbackIdError::MissingSeparator(value) => {
                write!(f, "rollback id {} has no '{}' separator", value, SEPARATOR)
            }
        }
    }
}

impl std::error::Error for RollbackIdError {}

impl From<RollbackIdError> for AppError {
    fn from(err: RollbackIdError) -> Self {
        match err {
            RollbackIdError::Empty => AppError::Validation(err.to_string()),
            RollbackIdError::MissingSeparator(ref value) => {
                AppError::NotFound(format!("Contribution {} not found", value))
            }
        }
    }
}

impl RollbackId {
    pub fn new(id: &str, sequence: &str) -> Self {
        Self {
            id: id.to_string(),
            sequence: sequence.to_string(),
        }
    }

    /// Decode `"{id}-{sequence}"`, honoring only the first hyphen.
    pub fn parse(value: &str) -> Result<Self, RollbackIdError> {
        if value.is_empty() {
            return Err(RollbackIdError::Empty);
        }
        match value.split_once(SEPARATOR) {
            Some((id, sequence)) => Ok(Self::new(id, sequence)),
            None => Err(RollbackIdError::MissingSeparator(value.to_string())),
        }
    }
}

impl fmt::Display for RollbackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.id, SEPARATOR, self.sequence)
    }
}
