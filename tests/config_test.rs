use logbook_rpg::config::Config;
use logbook_rpg::error::Error;
use logbook_rpg::model::QuestBook;
use std::path::PathBuf;

// Environment variables are process-global, so every env case lives in one
// test to keep them from racing.
#[test]
fn config_from_env() {
    unsafe {
        std::env::set_var("LOGBOOK_DATA_DIR", "/tmp/logbook-test");
        std::env::set_var("LOGBOOK_QUESTS", "/tmp/logbook-test/quests.toml");
        std::env::set_var("LOG_LEVEL", "debug");
        std::env::remove_var("OTEL_ENDPOINT");
    }

    let config = Config::from_env().unwrap();
    assert_eq!(config.data_dir, PathBuf::from("/tmp/logbook-test"));
    assert_eq!(
        config.quest_file,
        Some(PathBuf::from("/tmp/logbook-test/quests.toml"))
    );
    assert_eq!(config.log_level, "debug");
    assert!(config.otel_endpoint.is_none());

    // Blank values count as unset.
    unsafe {
        std::env::set_var("LOGBOOK_QUESTS", "  ");
        std::env::remove_var("LOG_LEVEL");
    }

    let config = Config::from_env().unwrap();
    assert!(config.quest_file.is_none());
    assert_eq!(config.log_level, "warn");
    assert_eq!(config.quest_book().unwrap(), QuestBook::builtin());

    unsafe {
        std::env::remove_var("LOGBOOK_DATA_DIR");
        std::env::remove_var("LOGBOOK_QUESTS");
    }
}

#[test]
fn quest_book_loads_from_toml_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("quests.toml");
    std::fs::write(
        &path,
        r#"
[[quest]]
id = "stretch"
title = "Morning stretch"
time = "06h30"
xp = 10

[[quest]]
id = "inbox"
title = "Inbox zero"
xp = 15

[boss]
id = "deep_work"
title = "Deep work block"
xp = 75
"#,
    )
    .unwrap();

    let config = Config {
        data_dir: dir.path().to_path_buf(),
        quest_file: Some(path),
        otel_endpoint: None,
        log_level: "warn".to_string(),
    };
    let book = config.quest_book().unwrap();

    assert_eq!(book.quests().len(), 2);
    assert_eq!(book.quests()[0].time.as_deref(), Some("06h30"));
    assert_eq!(book.quests()[1].time, None);
    assert_eq!(book.boss().id, "deep_work");
    assert_eq!(logbook_rpg::derive::daily_xp_possible(&book), 100);
}

#[test]
fn quest_book_rejects_bad_definitions() {
    let duplicate = r#"
[[quest]]
id = "a"
title = "A"
xp = 10

[boss]
id = "a"
title = "Boss"
xp = 50
"#;
    assert!(matches!(QuestBook::from_toml(duplicate), Err(Error::Config(_))));

    let zero_xp = r#"
[boss]
id = "boss"
title = "Boss"
xp = 0
"#;
    assert!(matches!(QuestBook::from_toml(zero_xp), Err(Error::Config(_))));

    let missing_boss = r#"
[[quest]]
id = "a"
title = "A"
xp = 10
"#;
    assert!(matches!(QuestBook::from_toml(missing_boss), Err(Error::Config(_))));
}

#[test]
fn missing_quest_file_is_a_config_error() {
    let config = Config {
        data_dir: PathBuf::from("/tmp"),
        quest_file: Some(PathBuf::from("/definitely/not/here.toml")),
        otel_endpoint: None,
        log_level: "warn".to_string(),
    };
    assert!(matches!(config.quest_book(), Err(Error::Config(_))));
}
