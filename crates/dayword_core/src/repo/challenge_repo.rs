//! Challenge repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Own the daily keyword lifecycle: seeding, rotation, lookup by day.
//! - Own challenge article submission and the per-user stamp bookkeeping.
//!
//! # Invariants
//! - The keyword row with `update_day = today` is the single source of truth
//!   for "today's keyword"; no process-local cache exists.
//! - Rotation is idempotent per day and never selects an already-used
//!   keyword.
//! - Submission updates the article row and the user counters in one
//!   transaction.

use crate::db::DbError;
use crate::model::article::{Article, ArticleDraft, ArticleId};
use crate::model::keyword::{Keyword, KeywordId};
use crate::model::social::{CommentId, InteractionKind};
use crate::model::user::{User, UserId};
use crate::model::ModelValidationError;
use log::info;
use once_cell::sync::Lazy;
use regex::Regex;
use rusqlite::{params, Connection, Row, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

static DAY_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid day key regex"));

pub(crate) const ARTICLE_SELECT_SQL: &str = "SELECT
    uuid,
    user_uuid,
    key_word,
    state,
    public,
    title,
    content,
    comment_num,
    like_num,
    scrap_num,
    created_day,
    created_at,
    updated_at
FROM articles";

pub(crate) const USER_SELECT_SQL: &str = "SELECT
    uuid,
    nickname,
    challenge,
    stamp_count,
    state,
    created_at,
    updated_at
FROM users";

const KEYWORD_SELECT_SQL: &str = "SELECT
    uuid,
    content,
    state,
    update_day,
    created_at
FROM keywords";

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for challenge and feed persistence operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ModelValidationError),
    Db(DbError),
    UserNotFound(UserId),
    ArticleNotFound(ArticleId),
    CommentNotFound(CommentId),
    /// No keyword has been rotated for the given day key.
    NoKeywordForDay(String),
    /// Rotation found no unused keyword to sample.
    KeywordPoolExhausted,
    /// The `(user, article)` pair already carries this interaction.
    AlreadyMarked(InteractionKind),
    /// The `(user, article)` pair carries no such interaction.
    InteractionNotFound(InteractionKind),
    /// Day key input is not `YYYY-MM-DD`.
    InvalidDayKey(String),
    /// Connection schema is missing a required table.
    MissingRequiredTable(&'static str),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::UserNotFound(id) => write!(f, "user not found: {id}"),
            Self::ArticleNotFound(id) => write!(f, "article not found: {id}"),
            Self::CommentNotFound(id) => write!(f, "comment not found: {id}"),
            Self::NoKeywordForDay(day) => write!(f, "no keyword rotated for day {day}"),
            Self::KeywordPoolExhausted => write!(f, "no unused keyword left to rotate"),
            Self::AlreadyMarked(kind) => write!(f, "article already has a {kind:?} by this user"),
            Self::InteractionNotFound(kind) => {
                write!(f, "no {kind:?} by this user on this article")
            }
            Self::InvalidDayKey(value) => {
                write!(f, "invalid day key `{value}`; expected YYYY-MM-DD")
            }
            Self::MissingRequiredTable(table) => {
                write!(f, "repository requires table `{table}`")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ModelValidationError> for RepoError {
    fn from(value: ModelValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Aggregate returned by [`ChallengeRepository::today_challenge`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodayChallenge {
    /// The keyword rotated for the requested day.
    pub keyword: Keyword,
    /// The user's finalized articles matching that keyword.
    pub articles: Vec<Article>,
    /// The requesting user's current record.
    pub user: User,
}

/// Repository interface for keyword lifecycle and challenge submission.
pub trait ChallengeRepository {
    /// Inserts one unused keyword into the pool.
    fn save_keyword(&self, content: &str) -> RepoResult<Keyword>;
    /// Returns all keywords.
    fn list_keywords(&self) -> RepoResult<Vec<Keyword>>;
    /// Marks one uniformly-random unused keyword as the keyword for `today`.
    ///
    /// Idempotent per day: when a keyword already carries `today`, that
    /// keyword is returned unchanged and no second keyword is consumed.
    fn rotate_keyword(&mut self, today: &str) -> RepoResult<Keyword>;
    /// Returns today's keyword, the user's finalized articles for it, and
    /// the user record.
    fn today_challenge(&self, user_id: UserId, today: &str) -> RepoResult<TodayChallenge>;
    /// Finalizes one challenge article and updates the user's counters.
    fn submit_article(
        &mut self,
        user_id: UserId,
        draft: &ArticleDraft,
        today: &str,
    ) -> RepoResult<Article>;
    /// Stores one temporary draft without touching any counter.
    fn save_draft(
        &mut self,
        user_id: UserId,
        draft: &ArticleDraft,
        today: &str,
    ) -> RepoResult<Article>;
    /// Re-arms the daily stamp gate for all users. Returns affected rows.
    fn reset_daily_state(&self) -> RepoResult<usize>;
}

/// SQLite-backed challenge repository.
pub struct SqliteChallengeRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteChallengeRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        for table in ["users", "keywords", "articles"] {
            if !table_exists(conn, table)? {
                return Err(RepoError::MissingRequiredTable(table));
            }
        }
        Ok(Self { conn })
    }
}

impl ChallengeRepository for SqliteChallengeRepository<'_> {
    fn save_keyword(&self, content: &str) -> RepoResult<Keyword> {
        Keyword::validate_content(content)?;

        let uuid = Uuid::new_v4();
        self.conn.execute(
            "INSERT INTO keywords (uuid, content, state) VALUES (?1, ?2, 0);",
            params![uuid.to_string(), content],
        )?;

        load_required_keyword(self.conn, uuid)
    }

    fn list_keywords(&self) -> RepoResult<Vec<Keyword>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{KEYWORD_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut keywords = Vec::new();
        while let Some(row) = rows.next()? {
            keywords.push(parse_keyword_row(row)?);
        }
        Ok(keywords)
    }

    fn rotate_keyword(&mut self, today: &str) -> RepoResult<Keyword> {
        validate_day_key(today)?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        if let Some(current) = keyword_for_day(&tx, today)? {
            info!(
                "event=keyword_rotate module=challenge status=noop day={today} keyword_id={}",
                current.uuid
            );
            tx.commit()?;
            return Ok(current);
        }

        let sampled: Option<String> = {
            let mut stmt = tx.prepare(
                "SELECT uuid FROM keywords WHERE state = 0 ORDER BY RANDOM() LIMIT 1;",
            )?;
            let mut rows = stmt.query([])?;
            match rows.next()? {
                Some(row) => Some(row.get("uuid")?),
                None => None,
            }
        };
        let Some(uuid_text) = sampled else {
            return Err(RepoError::KeywordPoolExhausted);
        };
        let uuid = parse_uuid(&uuid_text, "keywords.uuid")?;

        tx.execute(
            "UPDATE keywords SET state = 1, update_day = ?2 WHERE uuid = ?1;",
            params![uuid_text, today],
        )?;

        let rotated = load_required_keyword(&tx, uuid)?;
        tx.commit()?;
        info!(
            "event=keyword_rotate module=challenge status=ok day={today} keyword_id={}",
            rotated.uuid
        );
        Ok(rotated)
    }

    fn today_challenge(&self, user_id: UserId, today: &str) -> RepoResult<TodayChallenge> {
        validate_day_key(today)?;

        let keyword = keyword_for_day(self.conn, today)?
            .ok_or_else(|| RepoError::NoKeywordForDay(today.to_string()))?;
        let user =
            load_user(self.conn, user_id)?.ok_or(RepoError::UserNotFound(user_id))?;

        let mut stmt = self.conn.prepare(&format!(
            "{ARTICLE_SELECT_SQL}
             WHERE user_uuid = ?1
               AND state = 1
               AND key_word = ?2
             ORDER BY id DESC;"
        ))?;
        let mut rows = stmt.query(params![user_id.to_string(), keyword.content])?;
        let mut articles = Vec::new();
        while let Some(row) = rows.next()? {
            articles.push(parse_article_row(row)?);
        }

        Ok(TodayChallenge {
            keyword,
            articles,
            user,
        })
    }

    fn submit_article(
        &mut self,
        user_id: UserId,
        draft: &ArticleDraft,
        today: &str,
    ) -> RepoResult<Article> {
        insert_challenge_article(self.conn, user_id, draft, today, true)
    }

    fn save_draft(
        &mut self,
        user_id: UserId,
        draft: &ArticleDraft,
        today: &str,
    ) -> RepoResult<Article> {
        insert_challenge_article(self.conn, user_id, draft, today, false)
    }

    fn reset_daily_state(&self) -> RepoResult<usize> {
        let changed = self.conn.execute(
            "UPDATE users
             SET state = 0, updated_at = (strftime('%s', 'now') * 1000)
             WHERE state = 1;",
            [],
        )?;
        info!("event=daily_reset module=challenge status=ok users={changed}");
        Ok(changed)
    }
}

/// Inserts one article and, for finalized submissions, maintains the owner's
/// challenge/stamp counters in the same transaction.
fn insert_challenge_article(
    conn: &mut Connection,
    user_id: UserId,
    draft: &ArticleDraft,
    today: &str,
    finalized: bool,
) -> RepoResult<Article> {
    draft.validate()?;
    validate_day_key(today)?;

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let keyword = keyword_for_day(&tx, today)?
        .ok_or_else(|| RepoError::NoKeywordForDay(today.to_string()))?;
    let user = load_user(&tx, user_id)?.ok_or(RepoError::UserNotFound(user_id))?;

    let uuid = Uuid::new_v4();
    tx.execute(
        "INSERT INTO articles (
            uuid,
            user_uuid,
            key_word,
            state,
            public,
            title,
            content,
            created_day
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
        params![
            uuid.to_string(),
            user_id.to_string(),
            keyword.content,
            flag_to_int(finalized),
            flag_to_int(draft.public),
            draft.title,
            draft.content,
            today,
        ],
    )?;

    if finalized {
        tx.execute(
            "UPDATE users
             SET challenge = challenge + 1,
                 updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1;",
            [user_id.to_string()],
        )?;
        // First finalized submission of the day earns the stamp.
        if user.stamps_on_next_submission() {
            tx.execute(
                "UPDATE users
                 SET stamp_count = stamp_count + 1,
                     state = 1,
                     updated_at = (strftime('%s', 'now') * 1000)
                 WHERE uuid = ?1;",
                [user_id.to_string()],
            )?;
        }
    }

    let article = load_required_article(&tx, uuid)?;
    tx.commit()?;
    Ok(article)
}

fn validate_day_key(day: &str) -> RepoResult<()> {
    if !DAY_KEY_RE.is_match(day) {
        return Err(RepoError::InvalidDayKey(day.to_string()));
    }
    Ok(())
}

pub(crate) fn keyword_for_day(conn: &Connection, day: &str) -> RepoResult<Option<Keyword>> {
    let mut stmt = conn.prepare(&format!("{KEYWORD_SELECT_SQL} WHERE update_day = ?1;"))?;
    let mut rows = stmt.query([day])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_keyword_row(row)?));
    }
    Ok(None)
}

fn load_required_keyword(conn: &Connection, uuid: KeywordId) -> RepoResult<Keyword> {
    let mut stmt = conn.prepare(&format!("{KEYWORD_SELECT_SQL} WHERE uuid = ?1;"))?;
    let mut rows = stmt.query([uuid.to_string()])?;
    if let Some(row) = rows.next()? {
        return Ok(parse_keyword_row(row)?);
    }
    Err(RepoError::InvalidData(format!(
        "keyword {uuid} missing in read-back"
    )))
}

pub(crate) fn load_user(conn: &Connection, user_id: UserId) -> RepoResult<Option<User>> {
    let mut stmt = conn.prepare(&format!("{USER_SELECT_SQL} WHERE uuid = ?1;"))?;
    let mut rows = stmt.query([user_id.to_string()])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_user_row(row)?));
    }
    Ok(None)
}

pub(crate) fn load_required_article(conn: &Connection, uuid: ArticleId) -> RepoResult<Article> {
    let mut stmt = conn.prepare(&format!("{ARTICLE_SELECT_SQL} WHERE uuid = ?1;"))?;
    let mut rows = stmt.query([uuid.to_string()])?;
    if let Some(row) = rows.next()? {
        return Ok(parse_article_row(row)?);
    }
    Err(RepoError::InvalidData(format!(
        "article {uuid} missing in read-back"
    )))
}

fn parse_keyword_row(row: &Row<'_>) -> RepoResult<Keyword> {
    let uuid_text: String = row.get("uuid")?;
    Ok(Keyword {
        uuid: parse_uuid(&uuid_text, "keywords.uuid")?,
        content: row.get("content")?,
        state: parse_flag(row.get("state")?, "keywords.state")?,
        update_day: row.get("update_day")?,
        created_at: row.get("created_at")?,
    })
}

pub(crate) fn parse_user_row(row: &Row<'_>) -> RepoResult<User> {
    let uuid_text: String = row.get("uuid")?;
    Ok(User {
        uuid: parse_uuid(&uuid_text, "users.uuid")?,
        nickname: row.get("nickname")?,
        challenge: row.get("challenge")?,
        stamp_count: row.get("stamp_count")?,
        state: parse_flag(row.get("state")?, "users.state")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

pub(crate) fn parse_article_row(row: &Row<'_>) -> RepoResult<Article> {
    let uuid_text: String = row.get("uuid")?;
    let user_text: String = row.get("user_uuid")?;
    Ok(Article {
        uuid: parse_uuid(&uuid_text, "articles.uuid")?,
        user_uuid: parse_uuid(&user_text, "articles.user_uuid")?,
        key_word: row.get("key_word")?,
        state: parse_flag(row.get("state")?, "articles.state")?,
        public: parse_flag(row.get("public")?, "articles.public")?,
        title: row.get("title")?,
        content: row.get("content")?,
        comment_num: row.get("comment_num")?,
        like_num: row.get("like_num")?,
        scrap_num: row.get("scrap_num")?,
        created_day: row.get("created_day")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

pub(crate) fn parse_uuid(value: &str, field: &str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in {field}")))
}

pub(crate) fn parse_flag(value: i64, field: &str) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid flag value `{other}` in {field}"
        ))),
    }
}

pub(crate) fn flag_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

pub(crate) fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

#[cfg(test)]
mod tests {
    use super::validate_day_key;
    use crate::repo::challenge_repo::RepoError;

    #[test]
    fn day_key_accepts_iso_dates_only() {
        assert!(validate_day_key("2026-08-28").is_ok());
        for bad in ["2026-8-28", "today", "", "2026-08-28T00:00:00"] {
            assert!(matches!(
                validate_day_key(bad),
                Err(RepoError::InvalidDayKey(_))
            ));
        }
    }
}
