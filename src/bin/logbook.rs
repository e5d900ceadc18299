//! logbook CLI — play the daily quest logbook from a terminal.

use clap::{Parser, Subcommand};
use logbook_rpg::config::Config;
use logbook_rpg::derive::Progress;
use logbook_rpg::engine::Tracker;
use logbook_rpg::error::Error;
use logbook_rpg::model::{ProgressionState, QuestDefinition};
use logbook_rpg::prompt::{FixedPrompter, Prompter, TerminalPrompter};
use logbook_rpg::telemetry::{TelemetryConfig, init_telemetry};
use serde::Serialize;
use std::io::{self, BufRead, Write};
use tracing::warn;

#[derive(Parser)]
#[command(name = "logbook", about = "Gamified daily quest logbook")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show level, XP, streak and today's quests
    Status {
        /// Print machine-readable JSON
        #[arg(long)]
        json: bool,
    },
    /// List the quest book
    Quests,
    /// Toggle a daily quest
    Toggle {
        /// Quest id (see `quests`)
        id: String,
    },
    /// Boss fight actions
    Boss {
        #[command(subcommand)]
        action: BossAction,
    },
    /// Streak actions
    Streak {
        #[command(subcommand)]
        action: StreakAction,
    },
    /// Restart the daily cycle (keeps XP and streak)
    Reset {
        /// Skip the confirmation prompt (one-shot mode only)
        #[arg(long)]
        yes: bool,
    },
    /// Interactive session reading commands line by line
    Shell,
}

#[derive(Subcommand)]
enum BossAction {
    /// Defeat the boss, or undo a defeat
    Engage {
        /// Fight objective; defaults to the stored one
        objective: Vec<String>,
    },
    /// Set the fight objective
    Objective {
        /// Objective text
        #[arg(required = true)]
        text: Vec<String>,
    },
}

#[derive(Subcommand)]
enum StreakAction {
    /// Add one day
    Inc,
    /// Back to zero
    Reset,
}

/// Shell lines parse with the same grammar, minus the outer binary name.
#[derive(Parser)]
#[command(name = "logbook", no_binary_name = true)]
struct ShellLine {
    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = Config::from_env()?;

    let _guard = init_telemetry(TelemetryConfig {
        endpoint: config.otel_endpoint.clone(),
        service_name: "logbook".to_string(),
        default_filter: format!("warn,logbook_rpg={}", config.log_level),
    })?;

    match cli.command {
        Command::Reset { yes: true } => {
            let mut tracker = Tracker::open(&config, FixedPrompter::yes())?;
            dispatch(&mut tracker, Command::Reset { yes: true })
        }
        Command::Shell => {
            let mut tracker = Tracker::open(&config, TerminalPrompter)?;
            shell(&mut tracker)
        }
        command => {
            let mut tracker = Tracker::open(&config, TerminalPrompter)?;
            dispatch(&mut tracker, command)
        }
    }
}

fn dispatch(tracker: &mut Tracker, command: Command) -> anyhow::Result<()> {
    let result = match command {
        Command::Status { json } => return cmd_status(tracker, json),
        Command::Quests => {
            cmd_quests(tracker);
            return Ok(());
        }
        Command::Toggle { id } => tracker.toggle(&id).map(|event| {
            let done = tracker.state().is_completed(&id);
            println!(
                "{} {id} ({:+} XP, total {})",
                if done { "Completed" } else { "Reopened" },
                event.kind.xp_delta(),
                tracker.state().total_xp
            );
        }),
        Command::Boss {
            action: BossAction::Engage { objective },
        } => {
            let objective = objective.join(" ");
            let objective = (!objective.is_empty()).then_some(objective.as_str());
            tracker.engage_boss(objective).map(|engagement| {
                if engagement.celebrate {
                    banner(tracker, "BOSS DEFEATED");
                }
                println!(
                    "{:+} XP, total {}",
                    engagement.event.kind.xp_delta(),
                    tracker.state().total_xp
                );
            })
        }
        Command::Boss {
            action: BossAction::Objective { text },
        } => tracker
            .set_boss_objective(&text.join(" "))
            .map(|_| println!("Objective: {}", tracker.state().boss_objective)),
        Command::Streak {
            action: StreakAction::Inc,
        } => tracker
            .increment_streak()
            .map(|_| println!("Streak: {} days", tracker.state().streak)),
        Command::Streak {
            action: StreakAction::Reset,
        } => tracker
            .reset_streak()
            .map(|_| println!("Streak reset")),
        Command::Reset { .. } => tracker.reset_daily_cycle().map(|event| match event {
            Some(_) => println!("Daily cycle restarted"),
            None => println!("Cancelled"),
        }),
        Command::Shell => {
            println!("Already in a shell");
            return Ok(());
        }
    };

    match result {
        Ok(()) => Ok(()),
        // Only a rejected boss engage alerts through the prompter.
        Err(Error::Validation(_)) => Ok(()),
        Err(e) => Err(e.into()),
    }
}

fn shell(tracker: &mut Tracker) -> anyhow::Result<()> {
    println!("logbook shell — type `help` for commands, `quit` to leave");
    loop {
        tracker.viewport().refresh();
        if let Some(remaining) = tracker.celebration().remaining() {
            println!("🎉 celebrating ({}s left)", remaining.as_secs());
        }
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = tokio::task::block_in_place(read_line)? else {
            return Ok(());
        };
        let line = line.trim();
        match line {
            "" => continue,
            "quit" | "exit" => return Ok(()),
            _ => {}
        }

        match ShellLine::try_parse_from(line.split_whitespace()) {
            Ok(parsed) => {
                if let Err(e) = dispatch(tracker, parsed.command) {
                    TerminalPrompter.alert(&e.to_string());
                }
            }
            Err(e) => {
                if let Err(err) = e.print() {
                    warn!(error = %err, "failed to print usage");
                }
            }
        }
    }
}

fn read_line() -> io::Result<Option<String>> {
    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line)? {
        0 => Ok(None),
        _ => Ok(Some(line)),
    }
}

#[derive(Serialize)]
struct StatusView<'a> {
    progress: Progress,
    state: &'a ProgressionState,
    celebrating: bool,
}

fn cmd_status(tracker: &Tracker, json: bool) -> anyhow::Result<()> {
    let progress = tracker.progress();

    if json {
        let view = StatusView {
            progress,
            state: tracker.state(),
            celebrating: tracker.celebration().is_active(),
        };
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    println!(
        "Level {}  ·  {} XP  ({}/1000, {} to next)",
        progress.level, progress.total_xp, progress.xp_into_level, progress.xp_to_next_level
    );
    println!("Streak {} days", progress.streak);
    println!(
        "Today  {} / {} XP  {}  {}%",
        progress.daily_xp_earned,
        progress.daily_xp_possible,
        bar(progress.daily_progress_percent, 20),
        progress.daily_progress_percent
    );
    println!();

    let state = tracker.state();
    for quest in tracker.book().quests() {
        print_quest(quest, state.is_completed(&quest.id), "");
    }
    let boss = tracker.book().boss();
    print_quest(boss, progress.boss_defeated, "BOSS ");
    if !state.boss_objective.is_empty() {
        println!("      objective: {}", state.boss_objective);
    }
    Ok(())
}

fn cmd_quests(tracker: &Tracker) {
    println!("{:<14}  {:<36}  {:<14}  XP", "ID", "TITLE", "TIME");
    println!("{}", "-".repeat(72));
    let book = tracker.book();
    for quest in book.quests().iter().chain(std::iter::once(book.boss())) {
        println!(
            "{:<14}  {:<36}  {:<14}  {}",
            quest.id,
            quest.title,
            quest.time.as_deref().unwrap_or("-"),
            quest.xp
        );
    }
}

fn print_quest(quest: &QuestDefinition, done: bool, prefix: &str) {
    println!(
        "{prefix}[{}] {:<14}  {:<36}  {:<14}  +{} XP",
        if done { "x" } else { " " },
        quest.id,
        quest.title,
        quest.time.as_deref().unwrap_or(""),
        quest.xp
    );
}

fn bar(percent: u8, width: usize) -> String {
    let filled = usize::from(percent) * width / 100;
    format!("[{}{}]", "#".repeat(filled), ".".repeat(width - filled))
}

fn banner(tracker: &Tracker, text: &str) {
    let Some(overlay) = tracker.celebration().overlay(tracker.viewport()) else {
        return;
    };
    let width = usize::from(overlay.width).max(text.len() + 4);
    println!("{}", "*".repeat(width));
    println!("{text:^width$}");
    println!("{}", "*".repeat(width));
}
