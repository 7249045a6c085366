//! Keyword domain model.
//!
//! # Invariants
//! - `content` is unique across the pool.
//! - `update_day` is set exactly when the keyword was consumed by rotation.
//! - At most one keyword carries a given `update_day`.

use crate::model::ModelValidationError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a keyword.
pub type KeywordId = Uuid;

/// Daily challenge keyword.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyword {
    /// Stable global ID.
    pub uuid: KeywordId,
    /// The keyword text. Unique in storage.
    pub content: String,
    /// `true` once consumed by a rotation.
    pub state: bool,
    /// Day key (`YYYY-MM-DD`) of the rotation that consumed this keyword.
    pub update_day: Option<String>,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

impl Keyword {
    /// Validates keyword content before persistence.
    pub fn validate_content(content: &str) -> Result<(), ModelValidationError> {
        if content.trim().is_empty() {
            return Err(ModelValidationError::BlankKeyword);
        }
        Ok(())
    }
}
