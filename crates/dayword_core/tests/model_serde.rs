use dayword_core::{Article, InteractionKind, Keyword};
use uuid::Uuid;

#[test]
fn article_serializes_with_stable_field_names() {
    let article = Article {
        uuid: Uuid::new_v4(),
        user_uuid: Uuid::new_v4(),
        key_word: "apple".to_string(),
        state: true,
        public: true,
        title: "on apples".to_string(),
        content: "body".to_string(),
        comment_num: 0,
        like_num: 2,
        scrap_num: 1,
        created_day: "2026-08-28".to_string(),
        created_at: 1_756_300_000_000,
        updated_at: 1_756_300_000_000,
    };

    let json = serde_json::to_value(&article).unwrap();
    assert_eq!(json["key_word"], "apple");
    assert_eq!(json["created_day"], "2026-08-28");
    assert_eq!(json["like_num"], 2);
    assert_eq!(json["public"], true);
}

#[test]
fn keyword_roundtrips_through_json() {
    let keyword = Keyword {
        uuid: Uuid::new_v4(),
        content: "apple".to_string(),
        state: true,
        update_day: Some("2026-08-28".to_string()),
        created_at: 1_756_300_000_000,
    };

    let json = serde_json::to_string(&keyword).unwrap();
    let parsed: Keyword = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, keyword);
}

#[test]
fn interaction_kind_uses_snake_case_names() {
    assert_eq!(
        serde_json::to_string(&InteractionKind::Scrap).unwrap(),
        "\"scrap\""
    );
    assert_eq!(
        serde_json::to_string(&InteractionKind::Like).unwrap(),
        "\"like\""
    );
}
