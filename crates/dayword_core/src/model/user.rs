//! User domain model.
//!
//! # Invariants
//! - `challenge` mirrors the count of finalized articles owned by the user.
//! - `stamp_count` grows at most once per day, gated by `state`.
//! - `state` is re-armed to `false` by the daily reset.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a user.
pub type UserId = Uuid;

/// User read model.
///
/// Users are created by the registration layer outside this core; this core
/// only mutates the challenge bookkeeping fields. The subscription set and
/// the owned/draft article lists live in their own tables and are resolved
/// by the repositories on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Stable global ID.
    pub uuid: UserId,
    /// Display name.
    pub nickname: String,
    /// Count of finalized challenge articles.
    pub challenge: i64,
    /// Count of distinct days with a completed challenge.
    pub stamp_count: i64,
    /// Whether today's challenge is already completed.
    pub state: bool,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds.
    pub updated_at: i64,
}

impl User {
    /// Returns whether the next finalized submission should stamp the day.
    pub fn stamps_on_next_submission(&self) -> bool {
        !self.state
    }
}
