//! Feed repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Assemble the public feed, subscription feeds and article search.
//! - Own comment/scrap/like persistence and the article counters they
//!   maintain.
//!
//! # Invariants
//! - Feed views only ever expose `public = 1` articles.
//! - Feed ordering is newest-first by the monotone article row id.
//! - Counter maintenance and the row insert/delete it belongs to commit in
//!   one transaction.
//! - A `(user, article)` pair carries at most one scrap and one like.

use crate::model::article::{Article, ArticleId, ArticlePatch};
use crate::model::social::{Comment, CommentId, Interaction, InteractionKind};
use crate::model::user::{User, UserId};
use crate::repo::challenge_repo::{
    flag_to_int, keyword_for_day, load_required_article, parse_article_row, parse_flag,
    parse_user_row, parse_uuid, table_exists, RepoError, RepoResult, ARTICLE_SELECT_SQL,
};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row, TransactionBehavior};
use uuid::Uuid;

/// Fixed feed page size.
pub const PAGE_SIZE: u32 = 10;

const FEED_SELECT_SQL: &str = "SELECT
    a.uuid AS uuid,
    a.user_uuid AS user_uuid,
    a.key_word AS key_word,
    a.state AS state,
    a.public AS public,
    a.title AS title,
    a.content AS content,
    a.comment_num AS comment_num,
    a.like_num AS like_num,
    a.scrap_num AS scrap_num,
    a.created_day AS created_day,
    a.created_at AS created_at,
    a.updated_at AS updated_at,
    u.uuid AS author_uuid,
    u.nickname AS author_nickname,
    u.challenge AS author_challenge,
    u.stamp_count AS author_stamp_count,
    u.state AS author_state,
    u.created_at AS author_created_at,
    u.updated_at AS author_updated_at
FROM articles a
INNER JOIN users u ON u.uuid = a.user_uuid";

const COMMENT_SELECT_SQL: &str = "SELECT
    uuid,
    user_uuid,
    article_uuid,
    content,
    created_at
FROM comments";

/// Which article fields a text search matches against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    Title,
    Content,
    TitleContent,
}

impl SearchField {
    /// Parses the wire-level field selector.
    ///
    /// Returns `None` for unrecognized selectors so the caller can reject
    /// them as a validation error instead of silently matching nothing.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "title" => Some(Self::Title),
            "content" => Some(Self::Content),
            "title+content" => Some(Self::TitleContent),
            _ => None,
        }
    }
}

/// Feed item with its author populated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedArticle {
    pub article: Article,
    pub author: User,
}

/// Subscription feed page plus the caller's resolved subscription list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubFeed {
    pub articles: Vec<FeedArticle>,
    /// The caller's full subscription list, not filtered to the page.
    pub authors: Vec<User>,
}

/// Single-article view with author and comments populated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleDetail {
    pub article: Article,
    pub author: User,
    pub comments: Vec<Comment>,
}

/// Repository interface for feed assembly and social interactions.
pub trait FeedRepository {
    /// Public articles, newest first, page of [`PAGE_SIZE`]. Pages are
    /// 1-based; page 0 is treated as page 1.
    fn main_feed(&self, page: u32) -> RepoResult<Vec<FeedArticle>>;
    /// Public articles by the user's subscribed authors, same pagination.
    fn sub_feed(&self, user_id: UserId, page: u32) -> RepoResult<SubFeed>;
    /// Same restricted to one author; `authors` stays the full list.
    fn sub_feed_one(&self, user_id: UserId, author_id: UserId, page: u32)
        -> RepoResult<SubFeed>;
    /// Existence check for one subscription pair.
    fn is_subscribed(&self, user_id: UserId, author_id: UserId) -> RepoResult<bool>;
    /// Resolves all subscribed users.
    fn list_subscriptions(&self, user_id: UserId) -> RepoResult<Vec<User>>;
    /// Adds one author to the user's subscription set. Idempotent.
    fn subscribe(&self, user_id: UserId, author_id: UserId) -> RepoResult<()>;
    /// Removes every matching subscription entry.
    fn unsubscribe(&self, user_id: UserId, author_id: UserId) -> RepoResult<()>;
    /// Case-sensitive substring search over public articles, newest first.
    fn search_articles(&self, field: SearchField, text: &str) -> RepoResult<Vec<FeedArticle>>;
    /// Loads one public article with author and comments. `None` covers both
    /// "missing" and "private".
    fn get_article(&self, id: ArticleId) -> RepoResult<Option<ArticleDetail>>;
    /// Deletes one article and cascades comments, marks and user counters in
    /// one transaction. Returns the deleted article.
    fn delete_article(&mut self, user_id: UserId, id: ArticleId) -> RepoResult<Article>;
    /// Merges patch fields into one article and returns the updated row.
    fn update_article(&self, id: ArticleId, patch: &ArticlePatch) -> RepoResult<Article>;
    /// Loads one comment by id.
    fn find_comment(&self, id: CommentId) -> RepoResult<Option<Comment>>;
    /// Stores one comment and increments the article's comment counter.
    fn save_comment(
        &mut self,
        user_id: UserId,
        article_id: ArticleId,
        content: &str,
    ) -> RepoResult<Comment>;
    /// Replaces one comment's content.
    fn update_comment(&self, id: CommentId, content: &str) -> RepoResult<Comment>;
    /// Deletes one comment and decrements the owning article's counter.
    fn delete_comment(&mut self, id: CommentId) -> RepoResult<Comment>;
    /// Loads the user's scrap on one article, if any.
    fn find_scrap(&self, user_id: UserId, article_id: ArticleId)
        -> RepoResult<Option<Interaction>>;
    /// Stores one scrap and increments `scrap_num`.
    fn save_scrap(&mut self, user_id: UserId, article_id: ArticleId) -> RepoResult<Interaction>;
    /// Deletes one scrap and decrements `scrap_num`.
    fn delete_scrap(&mut self, user_id: UserId, article_id: ArticleId)
        -> RepoResult<Interaction>;
    /// Loads the user's like on one article, if any.
    fn find_like(&self, user_id: UserId, article_id: ArticleId)
        -> RepoResult<Option<Interaction>>;
    /// Stores one like and increments `like_num`.
    fn save_like(&mut self, user_id: UserId, article_id: ArticleId) -> RepoResult<Interaction>;
    /// Deletes one like and decrements `like_num`.
    fn delete_like(&mut self, user_id: UserId, article_id: ArticleId)
        -> RepoResult<Interaction>;
}

/// SQLite-backed feed repository.
pub struct SqliteFeedRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteFeedRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        for table in [
            "users",
            "keywords",
            "articles",
            "comments",
            "scraps",
            "likes",
            "subscriptions",
        ] {
            if !table_exists(conn, table)? {
                return Err(RepoError::MissingRequiredTable(table));
            }
        }
        Ok(Self { conn })
    }
}

impl FeedRepository for SqliteFeedRepository<'_> {
    fn main_feed(&self, page: u32) -> RepoResult<Vec<FeedArticle>> {
        let mut stmt = self.conn.prepare(&format!(
            "{FEED_SELECT_SQL}
             WHERE a.public = 1
             ORDER BY a.id DESC
             LIMIT ?1 OFFSET ?2;"
        ))?;
        let mut rows = stmt.query(params![i64::from(PAGE_SIZE), page_offset(page)])?;
        collect_feed_rows(&mut rows)
    }

    fn sub_feed(&self, user_id: UserId, page: u32) -> RepoResult<SubFeed> {
        let mut stmt = self.conn.prepare(&format!(
            "{FEED_SELECT_SQL}
             WHERE a.public = 1
               AND a.user_uuid IN (
                 SELECT author_uuid FROM subscriptions WHERE user_uuid = ?1
               )
             ORDER BY a.id DESC
             LIMIT ?2 OFFSET ?3;"
        ))?;
        let mut rows = stmt.query(params![
            user_id.to_string(),
            i64::from(PAGE_SIZE),
            page_offset(page)
        ])?;
        let articles = collect_feed_rows(&mut rows)?;
        let authors = self.list_subscriptions(user_id)?;
        Ok(SubFeed { articles, authors })
    }

    fn sub_feed_one(
        &self,
        user_id: UserId,
        author_id: UserId,
        page: u32,
    ) -> RepoResult<SubFeed> {
        let mut stmt = self.conn.prepare(&format!(
            "{FEED_SELECT_SQL}
             WHERE a.public = 1
               AND a.user_uuid = ?1
             ORDER BY a.id DESC
             LIMIT ?2 OFFSET ?3;"
        ))?;
        let mut rows = stmt.query(params![
            author_id.to_string(),
            i64::from(PAGE_SIZE),
            page_offset(page)
        ])?;
        let articles = collect_feed_rows(&mut rows)?;
        let authors = self.list_subscriptions(user_id)?;
        Ok(SubFeed { articles, authors })
    }

    fn is_subscribed(&self, user_id: UserId, author_id: UserId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM subscriptions WHERE user_uuid = ?1 AND author_uuid = ?2
            );",
            params![user_id.to_string(), author_id.to_string()],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn list_subscriptions(&self, user_id: UserId) -> RepoResult<Vec<User>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                u.uuid AS uuid,
                u.nickname AS nickname,
                u.challenge AS challenge,
                u.stamp_count AS stamp_count,
                u.state AS state,
                u.created_at AS created_at,
                u.updated_at AS updated_at
             FROM subscriptions s
             INNER JOIN users u ON u.uuid = s.author_uuid
             WHERE s.user_uuid = ?1
             ORDER BY s.created_at ASC, u.uuid ASC;",
        )?;
        let mut rows = stmt.query([user_id.to_string()])?;
        let mut authors = Vec::new();
        while let Some(row) = rows.next()? {
            authors.push(parse_user_row(row)?);
        }
        Ok(authors)
    }

    fn subscribe(&self, user_id: UserId, author_id: UserId) -> RepoResult<()> {
        self.conn.execute(
            "INSERT OR IGNORE INTO subscriptions (user_uuid, author_uuid) VALUES (?1, ?2);",
            params![user_id.to_string(), author_id.to_string()],
        )?;
        Ok(())
    }

    fn unsubscribe(&self, user_id: UserId, author_id: UserId) -> RepoResult<()> {
        self.conn.execute(
            "DELETE FROM subscriptions WHERE user_uuid = ?1 AND author_uuid = ?2;",
            params![user_id.to_string(), author_id.to_string()],
        )?;
        Ok(())
    }

    fn search_articles(&self, field: SearchField, text: &str) -> RepoResult<Vec<FeedArticle>> {
        let condition = match field {
            SearchField::Title => "instr(a.title, ?1) > 0",
            SearchField::Content => "instr(a.content, ?1) > 0",
            SearchField::TitleContent => "(instr(a.title, ?1) > 0 OR instr(a.content, ?1) > 0)",
        };
        let mut stmt = self.conn.prepare(&format!(
            "{FEED_SELECT_SQL}
             WHERE a.public = 1
               AND {condition}
             ORDER BY a.id DESC;"
        ))?;
        let mut rows = stmt.query([text])?;
        collect_feed_rows(&mut rows)
    }

    fn get_article(&self, id: ArticleId) -> RepoResult<Option<ArticleDetail>> {
        let mut stmt = self.conn.prepare(&format!(
            "{FEED_SELECT_SQL}
             WHERE a.uuid = ?1
               AND a.public = 1;"
        ))?;
        let mut rows = stmt.query([id.to_string()])?;
        let Some(row) = rows.next()? else {
            return Ok(None);
        };
        let article = parse_article_row(row)?;
        let author = parse_feed_author(row)?;
        let comments = load_article_comments(self.conn, id)?;
        Ok(Some(ArticleDetail {
            article,
            author,
            comments,
        }))
    }

    fn delete_article(&mut self, user_id: UserId, id: ArticleId) -> RepoResult<Article> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let article = load_article_any(&tx, id)?.ok_or(RepoError::ArticleNotFound(id))?;

        tx.execute(
            "DELETE FROM comments WHERE article_uuid = ?1;",
            [id.to_string()],
        )?;
        tx.execute(
            "DELETE FROM scraps WHERE article_uuid = ?1;",
            [id.to_string()],
        )?;
        tx.execute(
            "DELETE FROM likes WHERE article_uuid = ?1;",
            [id.to_string()],
        )?;

        let changed = tx.execute(
            "UPDATE users
             SET challenge = challenge - 1,
                 updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1;",
            [user_id.to_string()],
        )?;
        if changed == 0 {
            return Err(RepoError::UserNotFound(user_id));
        }

        // Deleting the user's last article for that day's keyword takes the
        // stamp back and re-arms the daily gate.
        if let Some(keyword) = keyword_for_day(&tx, &article.created_day)? {
            let remaining: i64 = tx.query_row(
                "SELECT COUNT(*) FROM articles WHERE user_uuid = ?1 AND key_word = ?2;",
                params![user_id.to_string(), keyword.content],
                |row| row.get(0),
            )?;
            if remaining == 1 {
                tx.execute(
                    "UPDATE users
                     SET state = 0,
                         stamp_count = stamp_count - 1,
                         updated_at = (strftime('%s', 'now') * 1000)
                     WHERE uuid = ?1;",
                    [user_id.to_string()],
                )?;
            }
        }

        tx.execute("DELETE FROM articles WHERE uuid = ?1;", [id.to_string()])?;
        tx.commit()?;
        Ok(article)
    }

    fn update_article(&self, id: ArticleId, patch: &ArticlePatch) -> RepoResult<Article> {
        patch.validate()?;

        if patch.is_empty() {
            return load_article_any(self.conn, id)?.ok_or(RepoError::ArticleNotFound(id));
        }

        let mut assignments = Vec::new();
        let mut bind_values: Vec<Value> = Vec::new();
        if let Some(title) = patch.title.as_ref() {
            assignments.push("title = ?");
            bind_values.push(Value::Text(title.clone()));
        }
        if let Some(content) = patch.content.as_ref() {
            assignments.push("content = ?");
            bind_values.push(Value::Text(content.clone()));
        }
        if let Some(public) = patch.public {
            assignments.push("public = ?");
            bind_values.push(Value::Integer(flag_to_int(public)));
        }
        assignments.push("updated_at = (strftime('%s', 'now') * 1000)");

        let sql = format!(
            "UPDATE articles SET {} WHERE uuid = ?;",
            assignments.join(", ")
        );
        bind_values.push(Value::Text(id.to_string()));

        let changed = self.conn.execute(&sql, params_from_iter(bind_values))?;
        if changed == 0 {
            return Err(RepoError::ArticleNotFound(id));
        }

        load_required_article(self.conn, id)
    }

    fn find_comment(&self, id: CommentId) -> RepoResult<Option<Comment>> {
        load_comment(self.conn, id)
    }

    fn save_comment(
        &mut self,
        user_id: UserId,
        article_id: ArticleId,
        content: &str,
    ) -> RepoResult<Comment> {
        Comment::validate_content(content)?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let changed = tx.execute(
            "UPDATE articles
             SET comment_num = comment_num + 1,
                 updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1;",
            [article_id.to_string()],
        )?;
        if changed == 0 {
            return Err(RepoError::ArticleNotFound(article_id));
        }

        let uuid = Uuid::new_v4();
        tx.execute(
            "INSERT INTO comments (uuid, user_uuid, article_uuid, content)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                uuid.to_string(),
                user_id.to_string(),
                article_id.to_string(),
                content,
            ],
        )?;

        let comment = load_comment(&tx, uuid)?.ok_or_else(|| {
            RepoError::InvalidData(format!("comment {uuid} missing in read-back"))
        })?;
        tx.commit()?;
        Ok(comment)
    }

    fn update_comment(&self, id: CommentId, content: &str) -> RepoResult<Comment> {
        Comment::validate_content(content)?;

        let changed = self.conn.execute(
            "UPDATE comments SET content = ?2 WHERE uuid = ?1;",
            params![id.to_string(), content],
        )?;
        if changed == 0 {
            return Err(RepoError::CommentNotFound(id));
        }

        load_comment(self.conn, id)?
            .ok_or_else(|| RepoError::InvalidData(format!("comment {id} missing in read-back")))
    }

    fn delete_comment(&mut self, id: CommentId) -> RepoResult<Comment> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let comment = load_comment(&tx, id)?.ok_or(RepoError::CommentNotFound(id))?;

        tx.execute(
            "UPDATE articles
             SET comment_num = comment_num - 1,
                 updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1;",
            [comment.article_uuid.to_string()],
        )?;
        tx.execute("DELETE FROM comments WHERE uuid = ?1;", [id.to_string()])?;

        tx.commit()?;
        Ok(comment)
    }

    fn find_scrap(
        &self,
        user_id: UserId,
        article_id: ArticleId,
    ) -> RepoResult<Option<Interaction>> {
        load_mark(self.conn, InteractionKind::Scrap, user_id, article_id)
    }

    fn save_scrap(&mut self, user_id: UserId, article_id: ArticleId) -> RepoResult<Interaction> {
        save_mark(self.conn, InteractionKind::Scrap, user_id, article_id)
    }

    fn delete_scrap(
        &mut self,
        user_id: UserId,
        article_id: ArticleId,
    ) -> RepoResult<Interaction> {
        delete_mark(self.conn, InteractionKind::Scrap, user_id, article_id)
    }

    fn find_like(
        &self,
        user_id: UserId,
        article_id: ArticleId,
    ) -> RepoResult<Option<Interaction>> {
        load_mark(self.conn, InteractionKind::Like, user_id, article_id)
    }

    fn save_like(&mut self, user_id: UserId, article_id: ArticleId) -> RepoResult<Interaction> {
        save_mark(self.conn, InteractionKind::Like, user_id, article_id)
    }

    fn delete_like(
        &mut self,
        user_id: UserId,
        article_id: ArticleId,
    ) -> RepoResult<Interaction> {
        delete_mark(self.conn, InteractionKind::Like, user_id, article_id)
    }
}

/// Converts a 1-based page number into a row offset. Page 0 counts as page 1.
pub fn page_offset(page: u32) -> i64 {
    (i64::from(page.max(1)) - 1) * i64::from(PAGE_SIZE)
}

fn collect_feed_rows(rows: &mut rusqlite::Rows<'_>) -> RepoResult<Vec<FeedArticle>> {
    let mut items = Vec::new();
    while let Some(row) = rows.next()? {
        items.push(FeedArticle {
            article: parse_article_row(row)?,
            author: parse_feed_author(row)?,
        });
    }
    Ok(items)
}

fn parse_feed_author(row: &Row<'_>) -> RepoResult<User> {
    let uuid_text: String = row.get("author_uuid")?;
    Ok(User {
        uuid: parse_uuid(&uuid_text, "users.uuid")?,
        nickname: row.get("author_nickname")?,
        challenge: row.get("author_challenge")?,
        stamp_count: row.get("author_stamp_count")?,
        state: parse_flag(row.get("author_state")?, "users.state")?,
        created_at: row.get("author_created_at")?,
        updated_at: row.get("author_updated_at")?,
    })
}

fn load_article_any(conn: &Connection, id: ArticleId) -> RepoResult<Option<Article>> {
    let mut stmt = conn.prepare(&format!("{ARTICLE_SELECT_SQL} WHERE uuid = ?1;"))?;
    let mut rows = stmt.query([id.to_string()])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_article_row(row)?));
    }
    Ok(None)
}

fn load_article_comments(conn: &Connection, article_id: ArticleId) -> RepoResult<Vec<Comment>> {
    let mut stmt = conn.prepare(&format!(
        "{COMMENT_SELECT_SQL}
         WHERE article_uuid = ?1
         ORDER BY id ASC;"
    ))?;
    let mut rows = stmt.query([article_id.to_string()])?;
    let mut comments = Vec::new();
    while let Some(row) = rows.next()? {
        comments.push(parse_comment_row(row)?);
    }
    Ok(comments)
}

fn load_comment(conn: &Connection, id: CommentId) -> RepoResult<Option<Comment>> {
    let mut stmt = conn.prepare(&format!("{COMMENT_SELECT_SQL} WHERE uuid = ?1;"))?;
    let mut rows = stmt.query([id.to_string()])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_comment_row(row)?));
    }
    Ok(None)
}

fn parse_comment_row(row: &Row<'_>) -> RepoResult<Comment> {
    let uuid_text: String = row.get("uuid")?;
    let user_text: String = row.get("user_uuid")?;
    let article_text: String = row.get("article_uuid")?;
    Ok(Comment {
        uuid: parse_uuid(&uuid_text, "comments.uuid")?,
        user_uuid: parse_uuid(&user_text, "comments.user_uuid")?,
        article_uuid: parse_uuid(&article_text, "comments.article_uuid")?,
        content: row.get("content")?,
        created_at: row.get("created_at")?,
    })
}

fn mark_table(kind: InteractionKind) -> &'static str {
    match kind {
        InteractionKind::Scrap => "scraps",
        InteractionKind::Like => "likes",
    }
}

fn mark_counter(kind: InteractionKind) -> &'static str {
    match kind {
        InteractionKind::Scrap => "scrap_num",
        InteractionKind::Like => "like_num",
    }
}

fn load_mark(
    conn: &Connection,
    kind: InteractionKind,
    user_id: UserId,
    article_id: ArticleId,
) -> RepoResult<Option<Interaction>> {
    let table = mark_table(kind);
    let mut stmt = conn.prepare(&format!(
        "SELECT uuid, user_uuid, article_uuid, created_at
         FROM {table}
         WHERE user_uuid = ?1 AND article_uuid = ?2;"
    ))?;
    let mut rows = stmt.query(params![user_id.to_string(), article_id.to_string()])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_mark_row(row, kind)?));
    }
    Ok(None)
}

fn save_mark(
    conn: &mut Connection,
    kind: InteractionKind,
    user_id: UserId,
    article_id: ArticleId,
) -> RepoResult<Interaction> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    // The UNIQUE (user_uuid, article_uuid) constraint backs this check; the
    // explicit probe turns the violation into a semantic error before the
    // counter is touched.
    if load_mark(&tx, kind, user_id, article_id)?.is_some() {
        return Err(RepoError::AlreadyMarked(kind));
    }

    let counter = mark_counter(kind);
    let changed = tx.execute(
        &format!(
            "UPDATE articles
             SET {counter} = {counter} + 1,
                 updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1;"
        ),
        [article_id.to_string()],
    )?;
    if changed == 0 {
        return Err(RepoError::ArticleNotFound(article_id));
    }

    let table = mark_table(kind);
    let uuid = Uuid::new_v4();
    tx.execute(
        &format!(
            "INSERT INTO {table} (uuid, user_uuid, article_uuid) VALUES (?1, ?2, ?3);"
        ),
        params![
            uuid.to_string(),
            user_id.to_string(),
            article_id.to_string()
        ],
    )?;

    let mark = load_mark(&tx, kind, user_id, article_id)?.ok_or_else(|| {
        RepoError::InvalidData(format!("{table} row {uuid} missing in read-back"))
    })?;
    tx.commit()?;
    Ok(mark)
}

fn delete_mark(
    conn: &mut Connection,
    kind: InteractionKind,
    user_id: UserId,
    article_id: ArticleId,
) -> RepoResult<Interaction> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let mark =
        load_mark(&tx, kind, user_id, article_id)?.ok_or(RepoError::InteractionNotFound(kind))?;

    let counter = mark_counter(kind);
    tx.execute(
        &format!(
            "UPDATE articles
             SET {counter} = {counter} - 1,
                 updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1;"
        ),
        [article_id.to_string()],
    )?;
    tx.execute(
        &format!("DELETE FROM {} WHERE uuid = ?1;", mark_table(kind)),
        [mark.uuid.to_string()],
    )?;

    tx.commit()?;
    Ok(mark)
}

fn parse_mark_row(row: &Row<'_>, kind: InteractionKind) -> RepoResult<Interaction> {
    let uuid_text: String = row.get("uuid")?;
    let user_text: String = row.get("user_uuid")?;
    let article_text: String = row.get("article_uuid")?;
    let table = mark_table(kind);
    Ok(Interaction {
        uuid: parse_uuid(&uuid_text, &format!("{table}.uuid"))?,
        kind,
        user_uuid: parse_uuid(&user_text, &format!("{table}.user_uuid"))?,
        article_uuid: parse_uuid(&article_text, &format!("{table}.article_uuid"))?,
        created_at: row.get("created_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::{page_offset, SearchField};

    #[test]
    fn page_offset_is_zero_for_first_page_and_page_zero() {
        assert_eq!(page_offset(0), 0);
        assert_eq!(page_offset(1), 0);
        assert_eq!(page_offset(2), 10);
        assert_eq!(page_offset(5), 40);
    }

    #[test]
    fn search_field_parses_known_selectors_only() {
        assert_eq!(SearchField::parse("title"), Some(SearchField::Title));
        assert_eq!(SearchField::parse("content"), Some(SearchField::Content));
        assert_eq!(
            SearchField::parse("title+content"),
            Some(SearchField::TitleContent)
        );
        assert_eq!(SearchField::parse("author"), None);
        assert_eq!(SearchField::parse(""), None);
    }
}
