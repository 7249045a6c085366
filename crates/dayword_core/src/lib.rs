//! Core domain logic for DayWord, a daily writing challenge service.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::article::{Article, ArticleDraft, ArticleId, ArticlePatch};
pub use model::keyword::{Keyword, KeywordId};
pub use model::social::{Comment, CommentId, Interaction, InteractionKind};
pub use model::user::{User, UserId};
pub use model::ModelValidationError;
pub use repo::challenge_repo::{
    ChallengeRepository, RepoError, RepoResult, SqliteChallengeRepository, TodayChallenge,
};
pub use repo::feed_repo::{
    ArticleDetail, FeedArticle, FeedRepository, SearchField, SqliteFeedRepository, SubFeed,
    PAGE_SIZE,
};

/// Returns the local calendar day key (`YYYY-MM-DD`) used to address the
/// daily keyword. Callers pass this into repository operations explicitly;
/// the core never derives "today" from ambient state.
pub fn current_day() -> String {
    chrono::Local::now().date_naive().to_string()
}

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, current_day, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn current_day_is_an_iso_day_key() {
        let day = current_day();
        assert_eq!(day.len(), 10);
        assert_eq!(day.as_bytes()[4], b'-');
        assert_eq!(day.as_bytes()[7], b'-');
    }
}
