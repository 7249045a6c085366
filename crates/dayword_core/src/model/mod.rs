//! Domain model for the daily writing challenge.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Validate write-model input before persistence.
//!
//! # Invariants
//! - Every domain object is identified by a stable uuid.
//! - Denormalized counters (`challenge`, `stamp_count`, `comment_num`,
//!   `like_num`, `scrap_num`) are maintained by repository transactions, not
//!   recomputed on read.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod article;
pub mod keyword;
pub mod social;
pub mod user;

/// Validation failure for write-model input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelValidationError {
    /// Keyword content is empty or whitespace-only.
    BlankKeyword,
    /// Article title is empty or whitespace-only.
    BlankTitle,
    /// Comment content is empty or whitespace-only.
    BlankComment,
}

impl Display for ModelValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankKeyword => write!(f, "keyword content must not be blank"),
            Self::BlankTitle => write!(f, "article title must not be blank"),
            Self::BlankComment => write!(f, "comment content must not be blank"),
        }
    }
}

impl Error for ModelValidationError {}
