use dayword_core::{init_logging, logging_status};

#[test]
fn init_logging_is_idempotent_for_same_config_and_rejects_conflicts() {
    let first_dir = tempfile::tempdir().unwrap();
    let second_dir = tempfile::tempdir().unwrap();
    let first = first_dir.path().to_str().unwrap().to_string();
    let second = second_dir.path().to_str().unwrap().to_string();

    init_logging("info", &first).expect("first init should succeed");
    init_logging("info", &first).expect("same config should be idempotent");

    let level_error = init_logging("debug", &first).expect_err("level conflict should fail");
    assert!(level_error.contains("refusing to switch"));

    let dir_error = init_logging("info", &second).expect_err("directory conflict should fail");
    assert!(dir_error.contains("refusing to switch"));

    let (active_level, active_dir) = logging_status().expect("logging should be active");
    assert_eq!(active_level, "info");
    assert_eq!(active_dir, first_dir.path());
}
