//! Tests for the persistence adapter.

use logbook_rpg::model::ProgressionState;
use logbook_rpg::storage::{FileSlot, MemorySlot, SLOT_NAME, Slot, Storage};

fn storage_with(raw: &str) -> Storage {
    Storage::with_slot(MemorySlot::with_contents(raw))
}

#[test]
fn missing_record_loads_defaults() {
    let storage = Storage::in_memory();
    assert_eq!(storage.load(), ProgressionState::default());
}

#[test]
fn complete_record_loads_every_field() {
    let state = storage_with(
        r#"{"xp":1250,"streak":9,"completedQuests":{"main_quest":true,"side_quest":false},"bossObjective":"Ship the API"}"#,
    )
    .load();

    assert_eq!(state.total_xp, 1250);
    assert_eq!(state.streak, 9);
    assert!(state.is_completed("main_quest"));
    assert!(!state.is_completed("side_quest"));
    assert_eq!(state.boss_objective, "Ship the API");
}

#[test]
fn missing_streak_defaults_to_zero() {
    let state = storage_with(
        r#"{"xp":300,"completedQuests":{"daily_task":true},"bossObjective":"Review PRs"}"#,
    )
    .load();

    assert_eq!(state.streak, 0);
    assert_eq!(state.total_xp, 300);
    assert!(state.is_completed("daily_task"));
    assert_eq!(state.boss_objective, "Review PRs");
}

#[test]
fn null_fields_default_quietly() {
    let state = storage_with(r#"{"xp":null,"streak":2,"completedQuests":null,"bossObjective":null}"#)
        .load();
    assert_eq!(state.total_xp, 0);
    assert_eq!(state.streak, 2);
    assert!(state.completed_quests.is_empty());
    assert_eq!(state.boss_objective, "");
}

#[test]
fn corrupt_record_loads_defaults() {
    let state = storage_with("{\"xp\": 12").load();
    assert_eq!(state, ProgressionState::default());
}

#[test]
fn save_writes_wire_field_names() {
    let slot = MemorySlot::new();
    let mut storage = Storage::with_slot(slot.clone());
    let mut state = ProgressionState {
        total_xp: 70,
        streak: 3,
        boss_objective: "Ship the API".to_string(),
        ..Default::default()
    };
    state.completed_quests.insert("main_quest".to_string(), true);

    storage.save(&state).unwrap();

    let saved: serde_json::Value = serde_json::from_str(&slot.contents().unwrap()).unwrap();
    assert_eq!(
        saved,
        serde_json::json!({
            "xp": 70,
            "streak": 3,
            "completedQuests": {"main_quest": true},
            "bossObjective": "Ship the API",
        })
    );
    assert_eq!(storage.load(), state);
}

#[test]
fn file_storage_round_trips_and_overwrites() {
    let dir = tempfile::tempdir().unwrap();
    let mut storage = Storage::open(dir.path()).unwrap();
    assert_eq!(storage.load(), ProgressionState::default());

    let mut state = ProgressionState {
        total_xp: 50,
        ..Default::default()
    };
    storage.save(&state).unwrap();
    state.total_xp = 80;
    state.streak = 1;
    storage.save(&state).unwrap();

    let reopened = Storage::open(dir.path()).unwrap();
    assert_eq!(reopened.load(), state);

    let file = dir.path().join(format!("{SLOT_NAME}.json"));
    assert!(file.exists());
    let leftovers: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.path() != file)
        .collect();
    assert!(leftovers.is_empty(), "temp files left behind: {leftovers:?}");
}

#[test]
fn file_slot_creates_missing_parent_dirs() {
    let dir = tempfile::tempdir().unwrap();
    let mut slot = FileSlot::new(dir.path().join("nested/deeper/slot.json"));

    assert_eq!(slot.read().unwrap(), None);
    slot.write("{}").unwrap();
    assert_eq!(slot.read().unwrap().as_deref(), Some("{}"));
}

#[test]
fn corrupt_file_loads_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let slot = FileSlot::in_dir(dir.path());
    std::fs::write(slot.path(), "not json at all").unwrap();

    let storage = Storage::with_slot(slot);
    assert_eq!(storage.load(), ProgressionState::default());
}
