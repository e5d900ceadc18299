//! Metric instruments.
//!
//! Created from the globally registered `MeterProvider`; without an OTLP
//! endpoint they are no-ops.

use opentelemetry::metrics::{Counter, Meter, UpDownCounter};

fn meter() -> Meter {
    opentelemetry::global::meter("logbook-rpg")
}

/// Counter: quest completion flips.
/// Labels: `quest_id`, `completed` ("true" | "false").
pub fn quest_toggles() -> Counter<u64> {
    meter()
        .u64_counter("logbook.quest.toggles")
        .with_description("Number of quest completion toggles")
        .build()
}

/// Counter: boss engagements.
/// Labels: `result` ("defeated" | "revived" | "rejected").
pub fn boss_engagements() -> Counter<u64> {
    meter()
        .u64_counter("logbook.boss.engagements")
        .with_description("Number of boss engage attempts")
        .build()
}

/// Counter: daily reset prompts.
/// Labels: `confirmed` ("true" | "false").
pub fn daily_resets() -> Counter<u64> {
    meter()
        .u64_counter("logbook.daily.resets")
        .with_description("Number of daily cycle reset prompts")
        .build()
}

/// Counter: streak changes.
/// Labels: `action` ("increment" | "reset").
pub fn streak_changes() -> Counter<u64> {
    meter()
        .u64_counter("logbook.streak.changes")
        .with_description("Number of streak increments and resets")
        .build()
}

/// Up/down counter: net XP gained through this process.
pub fn xp_delta() -> UpDownCounter<i64> {
    meter()
        .i64_up_down_counter("logbook.xp.delta")
        .with_description("Net XP change")
        .build()
}
