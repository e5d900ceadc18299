//! Tests for derived progression values.

use logbook_rpg::derive::*;
use logbook_rpg::model::{ProgressionState, QuestBook, QuestDefinition};

fn state_with(completed: &[&str]) -> ProgressionState {
    let mut state = ProgressionState::default();
    for id in completed {
        state.completed_quests.insert(id.to_string(), true);
    }
    state
}

#[test]
fn level_steps_every_thousand_xp() {
    assert_eq!(level(0), 1);
    assert_eq!(level(999), 1);
    assert_eq!(level(1000), 2);
    assert_eq!(level(2500), 3);
}

#[test]
fn level_progress_within_level() {
    assert_eq!(xp_into_level(2500), 500);
    assert_eq!(xp_to_next_level(2500), 500);
    assert_eq!(xp_to_next_level(0), 1000);
    assert_eq!(xp_to_next_level(1999), 1);
}

#[test]
fn daily_totals_for_builtin_book() {
    let book = QuestBook::builtin();
    let state = state_with(&["main_quest", "daily_task"]);

    assert_eq!(daily_xp_possible(&book), 200);
    assert_eq!(daily_xp_earned(&state, &book), 70);
    assert_eq!(daily_progress_percent(&state, &book), 35);
}

#[test]
fn boss_counts_toward_daily_xp() {
    let book = QuestBook::builtin();
    let state = state_with(&["boss_fight"]);
    assert_eq!(daily_xp_earned(&state, &book), 100);
    assert_eq!(daily_progress_percent(&state, &book), 50);
}

#[test]
fn everything_done_is_exactly_one_hundred_percent() {
    let book = QuestBook::builtin();
    let state = state_with(&["main_quest", "side_quest", "daily_task", "boss_fight"]);
    assert_eq!(daily_progress_percent(&state, &book), 100);
}

#[test]
fn false_flags_and_unknown_ids_earn_nothing() {
    let book = QuestBook::builtin();
    let mut state = state_with(&["ghost_quest"]);
    state.completed_quests.insert("main_quest".to_string(), false);

    assert_eq!(daily_xp_earned(&state, &book), 0);
    assert_eq!(daily_progress_percent(&state, &book), 0);
}

#[test]
fn percent_rounds_to_nearest() {
    let book = QuestBook::new(
        vec![
            QuestDefinition::new("a", "A", 1),
            QuestDefinition::new("b", "B", 1),
        ],
        QuestDefinition::new("boss", "Boss", 1),
    )
    .unwrap();

    // 1/3 -> 33, 2/3 -> 67
    assert_eq!(daily_progress_percent(&state_with(&["a"]), &book), 33);
    assert_eq!(daily_progress_percent(&state_with(&["a", "b"]), &book), 67);
}

#[test]
fn progress_snapshot_bundles_everything() {
    let book = QuestBook::builtin();
    let mut state = state_with(&["side_quest", "boss_fight"]);
    state.total_xp = 1130;
    state.streak = 7;

    let progress = Progress::compute(&state, &book);

    assert_eq!(
        progress,
        Progress {
            level: 2,
            total_xp: 1130,
            xp_into_level: 130,
            xp_to_next_level: 870,
            streak: 7,
            daily_xp_earned: 130,
            daily_xp_possible: 200,
            daily_progress_percent: 65,
            boss_defeated: true,
        }
    );
}
