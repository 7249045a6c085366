//! Comment, scrap and like domain models.
//!
//! Scraps and likes share one record shape; they differ only in which
//! article counter they maintain, so the distinction is carried by
//! [`InteractionKind`].

use crate::model::article::ArticleId;
use crate::model::user::UserId;
use crate::model::ModelValidationError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a comment.
pub type CommentId = Uuid;

/// Comment read model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Stable global ID.
    pub uuid: CommentId,
    /// Author of the comment.
    pub user_uuid: UserId,
    /// Commented article.
    pub article_uuid: ArticleId,
    pub content: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

impl Comment {
    /// Validates comment content before persistence.
    pub fn validate_content(content: &str) -> Result<(), ModelValidationError> {
        if content.trim().is_empty() {
            return Err(ModelValidationError::BlankComment);
        }
        Ok(())
    }
}

/// Which per-article counter an interaction maintains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    /// Bookmark; maintains `scrap_num`.
    Scrap,
    /// Like; maintains `like_num`.
    Like,
}

/// Scrap/like read model. Unique per `(user, article)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interaction {
    /// Stable global ID.
    pub uuid: Uuid,
    pub kind: InteractionKind,
    pub user_uuid: UserId,
    pub article_uuid: ArticleId,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}
