use dayword_core::db::open_db_in_memory;
use dayword_core::{
    Article, ArticleDraft, ArticlePatch, ChallengeRepository, FeedRepository, RepoError,
    SqliteChallengeRepository, SqliteFeedRepository, UserId,
};
use rusqlite::{params, Connection};
use uuid::Uuid;

const DAY: &str = "2026-08-28";

fn seed_user(conn: &Connection, nickname: &str) -> UserId {
    let id = Uuid::new_v4();
    conn.execute(
        "INSERT INTO users (uuid, nickname) VALUES (?1, ?2);",
        params![id.to_string(), nickname],
    )
    .unwrap();
    id
}

fn rotate(conn: &mut Connection, content: &str) {
    let mut repo = SqliteChallengeRepository::try_new(conn).unwrap();
    repo.save_keyword(content).unwrap();
    repo.rotate_keyword(DAY).unwrap();
}

fn submit(conn: &mut Connection, user_id: UserId, title: &str, public: bool) -> Article {
    let mut repo = SqliteChallengeRepository::try_new(conn).unwrap();
    repo.submit_article(user_id, &ArticleDraft::new(title, "body", public), DAY)
        .unwrap()
}

#[test]
fn main_feed_lists_public_articles_newest_first_with_author() {
    let mut conn = open_db_in_memory().unwrap();
    let alice = seed_user(&conn, "alice");
    let bob = seed_user(&conn, "bob");
    rotate(&mut conn, "apple");

    let first = submit(&mut conn, alice, "older", true);
    let hidden = submit(&mut conn, alice, "private", false);
    let second = submit(&mut conn, bob, "newer", true);

    let feed = SqliteFeedRepository::try_new(&mut conn).unwrap();
    let page = feed.main_feed(1).unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(page[0].article.uuid, second.uuid);
    assert_eq!(page[0].author.nickname, "bob");
    assert_eq!(page[1].article.uuid, first.uuid);
    assert_eq!(page[1].author.nickname, "alice");
    assert!(page.iter().all(|item| item.article.uuid != hidden.uuid));

    // A submitted article shows up in the feed exactly when it is public.
    assert!(feed.get_article(hidden.uuid).unwrap().is_none());
}

#[test]
fn main_feed_paginates_at_ten() {
    let mut conn = open_db_in_memory().unwrap();
    let alice = seed_user(&conn, "alice");
    rotate(&mut conn, "apple");
    for idx in 0..12 {
        submit(&mut conn, alice, &format!("article {idx}"), true);
    }

    let feed = SqliteFeedRepository::try_new(&mut conn).unwrap();
    assert_eq!(feed.main_feed(1).unwrap().len(), 10);
    assert_eq!(feed.main_feed(2).unwrap().len(), 2);
    assert_eq!(feed.main_feed(3).unwrap().len(), 0);
    // Page 0 is clamped to the first page.
    assert_eq!(feed.main_feed(0).unwrap().len(), 10);
}

#[test]
fn sub_feed_shows_only_subscribed_authors() {
    let mut conn = open_db_in_memory().unwrap();
    let alice = seed_user(&conn, "alice");
    let bob = seed_user(&conn, "bob");
    let carol = seed_user(&conn, "carol");
    rotate(&mut conn, "apple");

    let by_alice = submit(&mut conn, alice, "from alice", true);
    submit(&mut conn, bob, "from bob", true);

    let feed = SqliteFeedRepository::try_new(&mut conn).unwrap();
    feed.subscribe(carol, alice).unwrap();

    let sub = feed.sub_feed(carol, 1).unwrap();
    assert_eq!(sub.articles.len(), 1);
    assert_eq!(sub.articles[0].article.uuid, by_alice.uuid);
    assert_eq!(sub.authors.len(), 1);
    assert_eq!(sub.authors[0].uuid, alice);
}

#[test]
fn sub_feed_one_restricts_articles_but_returns_full_subscription_list() {
    let mut conn = open_db_in_memory().unwrap();
    let alice = seed_user(&conn, "alice");
    let bob = seed_user(&conn, "bob");
    let carol = seed_user(&conn, "carol");
    rotate(&mut conn, "apple");

    let by_alice = submit(&mut conn, alice, "from alice", true);
    submit(&mut conn, bob, "from bob", true);

    let feed = SqliteFeedRepository::try_new(&mut conn).unwrap();
    feed.subscribe(carol, alice).unwrap();
    feed.subscribe(carol, bob).unwrap();

    let sub = feed.sub_feed_one(carol, alice, 1).unwrap();
    assert_eq!(sub.articles.len(), 1);
    assert_eq!(sub.articles[0].article.uuid, by_alice.uuid);
    let author_ids: Vec<_> = sub.authors.iter().map(|author| author.uuid).collect();
    assert!(author_ids.contains(&alice));
    assert!(author_ids.contains(&bob));
}

#[test]
fn subscribe_then_unsubscribe_leaves_no_entry() {
    let mut conn = open_db_in_memory().unwrap();
    let alice = seed_user(&conn, "alice");
    let carol = seed_user(&conn, "carol");

    let feed = SqliteFeedRepository::try_new(&mut conn).unwrap();
    feed.subscribe(carol, alice).unwrap();
    feed.subscribe(carol, alice).unwrap();
    assert!(feed.is_subscribed(carol, alice).unwrap());
    assert_eq!(feed.list_subscriptions(carol).unwrap().len(), 1);

    feed.unsubscribe(carol, alice).unwrap();
    assert!(!feed.is_subscribed(carol, alice).unwrap());
    assert!(feed.list_subscriptions(carol).unwrap().is_empty());
}

#[test]
fn get_article_hides_private_and_missing_alike() {
    let mut conn = open_db_in_memory().unwrap();
    let alice = seed_user(&conn, "alice");
    rotate(&mut conn, "apple");

    let public = submit(&mut conn, alice, "public", true);
    let private = submit(&mut conn, alice, "private", false);

    let feed = SqliteFeedRepository::try_new(&mut conn).unwrap();
    let detail = feed.get_article(public.uuid).unwrap().unwrap();
    assert_eq!(detail.article.uuid, public.uuid);
    assert_eq!(detail.author.uuid, alice);
    assert!(detail.comments.is_empty());

    assert!(feed.get_article(private.uuid).unwrap().is_none());
    assert!(feed.get_article(Uuid::new_v4()).unwrap().is_none());
}

#[test]
fn update_article_merges_patched_fields_only() {
    let mut conn = open_db_in_memory().unwrap();
    let alice = seed_user(&conn, "alice");
    rotate(&mut conn, "apple");
    let article = submit(&mut conn, alice, "original title", false);

    let feed = SqliteFeedRepository::try_new(&mut conn).unwrap();
    let patch = ArticlePatch {
        title: Some("new title".to_string()),
        content: None,
        public: Some(true),
    };
    let updated = feed.update_article(article.uuid, &patch).unwrap();
    assert_eq!(updated.title, "new title");
    assert_eq!(updated.content, article.content);
    assert!(updated.public);

    let err = feed
        .update_article(Uuid::new_v4(), &patch)
        .unwrap_err();
    assert!(matches!(err, RepoError::ArticleNotFound(_)));
}
