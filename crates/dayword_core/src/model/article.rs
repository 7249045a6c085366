//! Article domain model and write-model inputs.
//!
//! # Invariants
//! - `key_word` is a denormalized copy of the keyword active on
//!   `created_day` and never changes afterwards.
//! - `state` distinguishes finalized submissions (`true`) from drafts.
//! - Counter fields mirror live comment/like/scrap rows.

use crate::model::user::UserId;
use crate::model::ModelValidationError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for an article.
pub type ArticleId = Uuid;

/// Article read model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    /// Stable global ID.
    pub uuid: ArticleId,
    /// Owner.
    pub user_uuid: UserId,
    /// Denormalized keyword text active at creation time.
    pub key_word: String,
    /// `true` = finalized submission, `false` = temporary draft.
    pub state: bool,
    /// Visible in the public feed.
    pub public: bool,
    pub title: String,
    pub content: String,
    /// Count of live comments referencing this article.
    pub comment_num: i64,
    /// Count of live likes referencing this article.
    pub like_num: i64,
    /// Count of live scraps referencing this article.
    pub scrap_num: i64,
    /// Day key (`YYYY-MM-DD`) of the submission day.
    pub created_day: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds.
    pub updated_at: i64,
}

/// Caller input for submitting or drafting an article.
///
/// Owner, keyword and finalized/draft state are stamped by the repository,
/// never by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleDraft {
    pub title: String,
    pub content: String,
    /// Feed visibility requested by the author.
    pub public: bool,
}

impl ArticleDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>, public: bool) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            public,
        }
    }

    /// Validates draft input before persistence.
    pub fn validate(&self) -> Result<(), ModelValidationError> {
        if self.title.trim().is_empty() {
            return Err(ModelValidationError::BlankTitle);
        }
        Ok(())
    }
}

/// Partial update for an existing article. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticlePatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub public: Option<bool>,
}

impl ArticlePatch {
    /// Returns whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.public.is_none()
    }

    /// Validates patched fields before persistence.
    pub fn validate(&self) -> Result<(), ModelValidationError> {
        if let Some(title) = self.title.as_deref() {
            if title.trim().is_empty() {
                return Err(ModelValidationError::BlankTitle);
            }
        }
        Ok(())
    }
}
