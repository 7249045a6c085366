use dayword_core::db::open_db_in_memory;
use dayword_core::{
    ArticleDraft, ChallengeRepository, RepoError, SqliteChallengeRepository, UserId,
};
use rusqlite::{params, Connection};
use uuid::Uuid;

const DAY: &str = "2026-08-28";
const NEXT_DAY: &str = "2026-08-29";

fn seed_user(conn: &Connection, nickname: &str) -> UserId {
    let id = Uuid::new_v4();
    conn.execute(
        "INSERT INTO users (uuid, nickname) VALUES (?1, ?2);",
        params![id.to_string(), nickname],
    )
    .unwrap();
    id
}

fn rotate(conn: &mut Connection, content: &str, day: &str) {
    let mut repo = SqliteChallengeRepository::try_new(conn).unwrap();
    repo.save_keyword(content).unwrap();
    repo.rotate_keyword(day).unwrap();
}

#[test]
fn first_submission_of_day_stamps_user() {
    let mut conn = open_db_in_memory().unwrap();
    let user_id = seed_user(&conn, "writer");
    rotate(&mut conn, "apple", DAY);

    let mut repo = SqliteChallengeRepository::try_new(&mut conn).unwrap();
    let article = repo
        .submit_article(user_id, &ArticleDraft::new("on apples", "body", true), DAY)
        .unwrap();
    assert!(article.state);
    assert!(article.public);
    assert_eq!(article.key_word, "apple");
    assert_eq!(article.created_day, DAY);
    assert_eq!(article.user_uuid, user_id);

    let challenge = repo.today_challenge(user_id, DAY).unwrap();
    assert_eq!(challenge.user.challenge, 1);
    assert_eq!(challenge.user.stamp_count, 1);
    assert!(challenge.user.state);
    assert_eq!(challenge.articles.len(), 1);
    assert_eq!(challenge.keyword.content, "apple");
}

#[test]
fn second_submission_same_day_does_not_restamp() {
    let mut conn = open_db_in_memory().unwrap();
    let user_id = seed_user(&conn, "writer");
    rotate(&mut conn, "apple", DAY);

    let mut repo = SqliteChallengeRepository::try_new(&mut conn).unwrap();
    repo.submit_article(user_id, &ArticleDraft::new("first", "body", true), DAY)
        .unwrap();
    repo.submit_article(user_id, &ArticleDraft::new("second", "body", true), DAY)
        .unwrap();

    let challenge = repo.today_challenge(user_id, DAY).unwrap();
    assert_eq!(challenge.user.challenge, 2);
    assert_eq!(challenge.user.stamp_count, 1);
    assert!(challenge.user.state);
    assert_eq!(challenge.articles.len(), 2);
}

#[test]
fn submission_requires_a_rotated_keyword() {
    let mut conn = open_db_in_memory().unwrap();
    let user_id = seed_user(&conn, "writer");

    let mut repo = SqliteChallengeRepository::try_new(&mut conn).unwrap();
    let err = repo
        .submit_article(user_id, &ArticleDraft::new("title", "body", true), DAY)
        .unwrap_err();
    assert!(matches!(err, RepoError::NoKeywordForDay(day) if day == DAY));
}

#[test]
fn submission_requires_an_existing_user() {
    let mut conn = open_db_in_memory().unwrap();
    rotate(&mut conn, "apple", DAY);

    let ghost = Uuid::new_v4();
    let mut repo = SqliteChallengeRepository::try_new(&mut conn).unwrap();
    let err = repo
        .submit_article(ghost, &ArticleDraft::new("title", "body", true), DAY)
        .unwrap_err();
    assert!(matches!(err, RepoError::UserNotFound(id) if id == ghost));
}

#[test]
fn submission_rejects_blank_title() {
    let mut conn = open_db_in_memory().unwrap();
    let user_id = seed_user(&conn, "writer");
    rotate(&mut conn, "apple", DAY);

    let mut repo = SqliteChallengeRepository::try_new(&mut conn).unwrap();
    let err = repo
        .submit_article(user_id, &ArticleDraft::new("  ", "body", true), DAY)
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
}

#[test]
fn draft_save_touches_no_counter() {
    let mut conn = open_db_in_memory().unwrap();
    let user_id = seed_user(&conn, "writer");
    rotate(&mut conn, "apple", DAY);

    let mut repo = SqliteChallengeRepository::try_new(&mut conn).unwrap();
    let draft = repo
        .save_draft(user_id, &ArticleDraft::new("draft", "wip", false), DAY)
        .unwrap();
    assert!(!draft.state);
    assert_eq!(draft.key_word, "apple");

    let challenge = repo.today_challenge(user_id, DAY).unwrap();
    assert_eq!(challenge.user.challenge, 0);
    assert_eq!(challenge.user.stamp_count, 0);
    assert!(!challenge.user.state);
    // Finalized-only view: the draft does not show up as a completion.
    assert!(challenge.articles.is_empty());
}

#[test]
fn daily_reset_rearms_the_stamp_gate() {
    let mut conn = open_db_in_memory().unwrap();
    let user_id = seed_user(&conn, "writer");
    rotate(&mut conn, "apple", DAY);

    {
        let mut repo = SqliteChallengeRepository::try_new(&mut conn).unwrap();
        repo.submit_article(user_id, &ArticleDraft::new("day one", "body", true), DAY)
            .unwrap();
        let affected = repo.reset_daily_state().unwrap();
        assert_eq!(affected, 1);

        let challenge = repo.today_challenge(user_id, DAY).unwrap();
        assert!(!challenge.user.state);
        assert_eq!(challenge.user.stamp_count, 1);
    }

    // Next day: new keyword, first submission stamps again.
    rotate(&mut conn, "banana", NEXT_DAY);
    let mut repo = SqliteChallengeRepository::try_new(&mut conn).unwrap();
    repo.submit_article(
        user_id,
        &ArticleDraft::new("day two", "body", true),
        NEXT_DAY,
    )
    .unwrap();

    let challenge = repo.today_challenge(user_id, NEXT_DAY).unwrap();
    assert_eq!(challenge.user.challenge, 2);
    assert_eq!(challenge.user.stamp_count, 2);
    assert!(challenge.user.state);
    assert_eq!(challenge.articles.len(), 1);
    assert_eq!(challenge.keyword.content, "banana");
}

#[test]
fn today_challenge_requires_rotation_and_user() {
    let mut conn = open_db_in_memory().unwrap();
    let user_id = seed_user(&conn, "writer");

    {
        let repo = SqliteChallengeRepository::try_new(&mut conn).unwrap();
        let err = repo.today_challenge(user_id, DAY).unwrap_err();
        assert!(matches!(err, RepoError::NoKeywordForDay(_)));
    }

    rotate(&mut conn, "apple", DAY);
    let ghost = Uuid::new_v4();
    let repo = SqliteChallengeRepository::try_new(&mut conn).unwrap();
    let err = repo.today_challenge(ghost, DAY).unwrap_err();
    assert!(matches!(err, RepoError::UserNotFound(id) if id == ghost));
}
