use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use mockable::Clock;
use thiserror::Error;

use crate::database::{Database, DatabaseError};
use crate::models::{Period, PeriodError, TaskItem, TaskList};
use crate::tasks::{CompletionEngine, ItemManager, ListManager, TaskError};
use crate::utils::format_relative;

#[derive(Parser)]
#[command(name = "boring")]
#[command(about = "Boring Tasks - recurring task lists that move on when you do (or skip) them")]
#[command(version)]
pub struct Cli {
    /// Custom config file path
    #[arg(short, long)]
    pub config: Option<String>,

    /// Use development mode (uses separate dev config/database)
    #[arg(long)]
    pub dev: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Lists and items are addressed by the 1-based position shown by `lists` and `items`
#[derive(Subcommand)]
pub enum Commands {
    /// Launch interactive TUI (default if no subcommand)
    Tui,
    /// Show all lists
    Lists {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Create a list
    AddList {
        /// List title
        title: String,
    },
    /// Delete lists (and everything in them)
    DeleteList {
        /// Positions of the lists to delete
        #[arg(required = true)]
        positions: Vec<usize>,
    },
    /// Show the items of a list
    Items {
        /// List position
        list: usize,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Add an item to a list
    AddItem {
        /// List position
        list: usize,
        /// Item title
        title: String,
        /// Recurrence period in days
        #[arg(long, short, default_value_t = 1)]
        period: u32,
    },
    /// Delete items from a list
    DeleteItem {
        /// List position
        list: usize,
        /// Positions of the items to delete
        #[arg(required = true)]
        positions: Vec<usize>,
    },
    /// Mark an item done; its due date moves on by one period
    Done {
        /// List position
        list: usize,
        /// Item position
        item: usize,
    },
    /// Skip an item; its due date moves on by one period with no score
    Skip {
        /// List position
        list: usize,
        /// Item position
        item: usize,
    },
    /// Show an item's done/skip history
    History {
        /// List position
        list: usize,
        /// Item position
        item: usize,
    },
    /// Set the score an item's "done" entries carry
    Score {
        /// List position
        list: usize,
        /// Item position
        item: usize,
        /// New score
        score: i64,
    },
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] DatabaseError),
    #[error("{0}")]
    TaskError(#[from] TaskError),
    #[error("Invalid period: {0}")]
    PeriodError(#[from] PeriodError),
    #[error("No {kind} at position {position} (there are {count})")]
    InvalidPosition {
        kind: &'static str,
        position: usize,
        count: usize,
    },
    #[error("Failed to write JSON: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Convert a 1-based position to an index into `records`
fn to_index<T>(records: &[T], position: usize, kind: &'static str) -> Result<usize, CliError> {
    position
        .checked_sub(1)
        .filter(|index| *index < records.len())
        .ok_or(CliError::InvalidPosition {
            kind,
            position,
            count: records.len(),
        })
}

fn lookup_list<C: Clock>(position: usize, db: &Database, clock: &C) -> Result<TaskList, CliError> {
    let lists = ListManager::new(db, clock).list_all()?;
    let index = to_index(&lists, position, "list")?;
    Ok(lists[index].clone())
}

fn lookup_item<C: Clock>(
    list_position: usize,
    item_position: usize,
    db: &Database,
    clock: &C,
) -> Result<(TaskList, TaskItem), CliError> {
    let list = lookup_list(list_position, db, clock)?;
    let items = ItemManager::new(db, clock).list_for(&list)?;
    let index = to_index(&items, item_position, "item")?;
    Ok((list, items[index].clone()))
}

fn describe_item(position: usize, item: &TaskItem, now: DateTime<Utc>) -> String {
    let marker = if item.is_overdue(now) { "!" } else { " " };
    format!(
        "{:>3}.{} {}  due {} ({})  every {} day(s)",
        position,
        marker,
        item.title,
        format_relative(item.due, now),
        item.due.format("%Y-%m-%d %H:%M"),
        item.period.days()
    )
}

/// Handle the lists command
pub fn handle_lists<C: Clock>(json: bool, db: &Database, clock: &C) -> Result<(), CliError> {
    let lists = ListManager::new(db, clock).list_all()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&lists)?);
        return Ok(());
    }

    if lists.is_empty() {
        println!("No lists yet. Create one with `boring add-list <title>`.");
    }
    for (index, list) in lists.iter().enumerate() {
        println!("{:>3}. {}", index + 1, list.title);
    }
    Ok(())
}

/// Handle the add-list command
pub fn handle_add_list<C: Clock>(title: String, db: &Database, clock: &C) -> Result<(), CliError> {
    let list = ListManager::new(db, clock).create(&title)?;
    println!("List created successfully: {}", list.title);
    Ok(())
}

/// Handle the delete-list command
pub fn handle_delete_list<C: Clock>(positions: Vec<usize>, db: &Database, clock: &C) -> Result<(), CliError> {
    let manager = ListManager::new(db, clock);
    let lists = manager.list_all()?;
    let indices = positions
        .into_iter()
        .map(|position| to_index(&lists, position, "list"))
        .collect::<Result<Vec<_>, _>>()?;

    let removed = manager.delete(&indices)?;
    println!("Deleted {} list(s)", removed);
    Ok(())
}

/// Handle the items command
pub fn handle_items<C: Clock>(list: usize, json: bool, db: &Database, clock: &C) -> Result<(), CliError> {
    let list = lookup_list(list, db, clock)?;
    let items = ItemManager::new(db, clock).list_for(&list)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    let now = clock.utc();
    println!("{}", list.title);
    if items.is_empty() {
        println!("  (no items)");
    }
    for (index, item) in items.iter().enumerate() {
        println!("{}", describe_item(index + 1, item, now));
    }
    Ok(())
}

/// Handle the add-item command
pub fn handle_add_item<C: Clock>(
    list: usize,
    title: String,
    period: u32,
    db: &Database,
    clock: &C,
) -> Result<(), CliError> {
    let period = Period::from_days(period)?;
    let list = lookup_list(list, db, clock)?;
    let item = ItemManager::new(db, clock).create(&list, &title, period)?;
    println!(
        "Item created successfully: {} (due {})",
        item.title,
        item.due.format("%Y-%m-%d %H:%M")
    );
    Ok(())
}

/// Handle the delete-item command
pub fn handle_delete_item<C: Clock>(
    list: usize,
    positions: Vec<usize>,
    db: &Database,
    clock: &C,
) -> Result<(), CliError> {
    let list = lookup_list(list, db, clock)?;
    let manager = ItemManager::new(db, clock);
    let items = manager.list_for(&list)?;
    let indices = positions
        .into_iter()
        .map(|position| to_index(&items, position, "item"))
        .collect::<Result<Vec<_>, _>>()?;

    let removed = manager.delete(&list, &indices)?;
    println!("Deleted {} item(s) from {}", removed, list.title);
    Ok(())
}

/// Handle the done and skip commands
pub fn handle_complete<C: Clock>(
    list: usize,
    item: usize,
    skip: bool,
    db: &Database,
    clock: &C,
) -> Result<(), CliError> {
    let (_, mut item) = lookup_item(list, item, db, clock)?;
    let engine = CompletionEngine::new(db, clock);
    let activity = if skip {
        engine.skip(&mut item)?
    } else {
        engine.done(&mut item)?
    };
    println!(
        "{} marked {}; next due {}",
        item.title,
        activity.kind,
        item.due.format("%Y-%m-%d %H:%M")
    );
    Ok(())
}

/// Handle the history command
pub fn handle_history<C: Clock>(list: usize, item: usize, db: &Database, clock: &C) -> Result<(), CliError> {
    let (_, item) = lookup_item(list, item, db, clock)?;
    let history = ItemManager::new(db, clock).history(&item)?;

    println!("{}", item.title);
    if history.is_empty() {
        println!("  (no history)");
    }
    for activity in history {
        println!(
            "  {}  {:<4}  score {}",
            activity.date.format("%Y-%m-%d %H:%M"),
            activity.kind,
            activity.score
        );
    }
    Ok(())
}

/// Handle the score command
pub fn handle_score<C: Clock>(
    list: usize,
    item: usize,
    score: i64,
    db: &Database,
    clock: &C,
) -> Result<(), CliError> {
    let (_, mut item) = lookup_item(list, item, db, clock)?;
    ItemManager::new(db, clock).set_score(&mut item, score)?;
    println!("{} now scores {}", item.title, item.score);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_are_one_based() {
        let records = ["a", "b"];
        assert_eq!(to_index(&records, 1, "list").unwrap(), 0);
        assert_eq!(to_index(&records, 2, "list").unwrap(), 1);
        assert!(matches!(
            to_index(&records, 0, "list"),
            Err(CliError::InvalidPosition { position: 0, count: 2, .. })
        ));
        assert!(matches!(
            to_index(&records, 3, "item"),
            Err(CliError::InvalidPosition { kind: "item", position: 3, .. })
        ));
    }

    #[test]
    fn cli_parses_subcommands() {
        let cli = Cli::try_parse_from(["boring", "--dev", "add-item", "2", "Trash", "--period", "3"]).unwrap();
        assert!(cli.dev);
        match cli.command {
            Some(Commands::AddItem { list, title, period }) => {
                assert_eq!((list, title.as_str(), period), (2, "Trash", 3));
            }
            _ => panic!("expected add-item"),
        }

        assert!(Cli::try_parse_from(["boring", "delete-list"]).is_err());
        assert!(Cli::try_parse_from(["boring"]).unwrap().command.is_none());
    }

    #[test]
    fn item_lines_follow_the_injected_clock() {
        let db = Database::open_in_memory().unwrap();
        let mut clock = crate::test_support::FixedClock::ymd(2024, 1, 1);
        handle_add_list("Chores".to_string(), &db, &clock).unwrap();
        handle_add_item(1, "Trash".to_string(), 7, &db, &clock).unwrap();
        let (_, item) = lookup_item(1, 1, &db, &clock).unwrap();

        let upcoming = describe_item(1, &item, clock.utc());
        assert!(upcoming.starts_with("  1.  Trash"));
        assert!(upcoming.contains("2024-01-08"));

        clock.now = clock.now + chrono::Duration::days(10);
        let overdue = describe_item(1, &item, clock.utc());
        assert!(overdue.starts_with("  1.! Trash"));
    }

    #[test]
    fn done_and_skip_handlers_move_the_due_date() {
        let db = Database::open_in_memory().unwrap();
        let clock = crate::test_support::FixedClock::ymd(2024, 1, 1);
        handle_add_list("Chores".to_string(), &db, &clock).unwrap();
        handle_add_item(1, "Trash".to_string(), 7, &db, &clock).unwrap();

        handle_complete(1, 1, false, &db, &clock).unwrap();
        handle_complete(1, 1, true, &db, &clock).unwrap();

        let (_, item) = lookup_item(1, 1, &db, &clock).unwrap();
        assert_eq!(item.due, clock.now + chrono::Duration::days(21));
        assert!(matches!(
            handle_complete(1, 2, false, &db, &clock),
            Err(CliError::InvalidPosition { kind: "item", .. })
        ));
    }

    #[test]
    fn zero_period_is_rejected() {
        let db = Database::open_in_memory().unwrap();
        let clock = crate::test_support::FixedClock::ymd(2024, 1, 1);
        handle_add_list("Chores".to_string(), &db, &clock).unwrap();

        assert!(matches!(
            handle_add_item(1, "Trash".to_string(), 0, &db, &clock),
            Err(CliError::PeriodError(PeriodError::Zero))
        ));
    }
}
