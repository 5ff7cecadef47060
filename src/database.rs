use chrono::{DateTime, Utc};
use rusqlite::Connection;
use std::path::PathBuf;
use std::sync::mpsc::Receiver;
use thiserror::Error;

use crate::changes::{ChangeFeed, StoreEvent};
use crate::models::{Period, TaskActivity, TaskItem, TaskList};

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    SqliteError(#[from] rusqlite::Error),
    #[error("Failed to create database directory: {0}")]
    DirectoryError(String),
    #[error("{0} has not been saved yet")]
    UnsavedRecord(&'static str),
    #[error("No {table} row with id {id}")]
    NotFound { table: &'static str, id: i64 },
}

/// SQLite-backed store for lists, items and their activity history.
///
/// Every write runs in its own transaction and, once committed, is announced
/// on the change feed so open views can refresh.
pub struct Database {
    conn: Connection,
    changes: ChangeFeed,
}

const ITEM_COLUMNS: &str = "id, list_id, title, due, period, score, created_at";

impl Database {
    /// Create a new database connection and initialize the schema
    pub fn new(path: &str) -> Result<Self, DatabaseError> {
        let db_path = PathBuf::from(path);

        // Create parent directory if it doesn't exist
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| DatabaseError::DirectoryError(e.to_string()))?;
            }
        }

        let conn = Connection::open(&db_path)?;
        Self::from_connection(conn)
    }

    /// Open a private, throwaway database
    pub fn open_in_memory() -> Result<Self, DatabaseError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, DatabaseError> {
        let db = Database {
            conn,
            changes: ChangeFeed::new(),
        };
        db.initialize_schema()?;
        Ok(db)
    }

    /// Initialize the database schema (tables and indexes)
    fn initialize_schema(&self) -> Result<(), DatabaseError> {
        // Cascading deletes rely on foreign key enforcement, which SQLite
        // leaves off per connection unless asked
        self.conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS task_lists (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                title           TEXT NOT NULL,
                created_at      TEXT NOT NULL
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS task_items (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                list_id         INTEGER NOT NULL REFERENCES task_lists(id) ON DELETE CASCADE,
                title           TEXT NOT NULL,
                due             TEXT NOT NULL,
                period          TEXT NOT NULL,
                score           INTEGER NOT NULL DEFAULT 0,
                created_at      TEXT NOT NULL
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS task_activities (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                item_id         INTEGER NOT NULL REFERENCES task_items(id) ON DELETE CASCADE,
                date            TEXT NOT NULL,
                kind            TEXT NOT NULL CHECK (kind IN ('done', 'skip')),
                score           INTEGER NOT NULL DEFAULT 0
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_task_items_list_id ON task_items(list_id)",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_task_activities_item_id ON task_activities(item_id)",
            [],
        )?;

        Ok(())
    }

    /// Get a reference to the underlying connection
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Receive a `StoreEvent` for every committed write from now on
    pub fn subscribe(&self) -> Receiver<StoreEvent> {
        self.changes.subscribe()
    }

    /// Insert a task list and return its ID
    pub fn insert_list(&self, list: &TaskList) -> Result<i64, DatabaseError> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO task_lists (title, created_at) VALUES (?1, ?2)",
            rusqlite::params![list.title, list.created_at],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;
        self.changes.publish(StoreEvent::ListsChanged);
        Ok(id)
    }

    fn row_to_list(row: &rusqlite::Row) -> Result<TaskList, rusqlite::Error> {
        Ok(TaskList {
            id: Some(row.get(0)?),
            title: row.get(1)?,
            created_at: row.get(2)?,
        })
    }

    /// Get all task lists in insertion order
    pub fn get_all_lists(&self) -> Result<Vec<TaskList>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, created_at FROM task_lists ORDER BY id ASC"
        )?;
        let lists = stmt.query_map([], Self::row_to_list)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(lists)
    }

    /// Delete several lists in one transaction.
    /// Their items and activity history go with them.
    pub fn delete_lists(&self, ids: &[i64]) -> Result<(), DatabaseError> {
        if ids.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        for id in ids {
            tx.execute("DELETE FROM task_lists WHERE id = ?1", rusqlite::params![id])?;
        }
        tx.commit()?;

        self.changes.publish(StoreEvent::ListsChanged);
        for id in ids {
            self.changes.publish(StoreEvent::ItemsChanged { list_id: *id });
        }
        Ok(())
    }

    /// Insert a task item and return its ID
    pub fn insert_item(&self, item: &TaskItem) -> Result<i64, DatabaseError> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO task_items (list_id, title, due, period, score, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
                item.list_id,
                item.title,
                item.due,
                item.period.to_stored(),
                item.score,
                item.created_at
            ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;
        self.changes.publish(StoreEvent::ItemsChanged { list_id: item.list_id });
        Ok(id)
    }

    fn row_to_item(row: &rusqlite::Row) -> Result<TaskItem, rusqlite::Error> {
        let period: String = row.get(4)?;
        Ok(TaskItem {
            id: Some(row.get(0)?),
            list_id: row.get(1)?,
            title: row.get(2)?,
            due: row.get(3)?,
            period: Period::parse_lenient(&period),
            score: row.get(5)?,
            created_at: row.get(6)?,
        })
    }

    /// Get the items belonging to one list, in insertion order
    pub fn get_items_for_list(&self, list_id: i64) -> Result<Vec<TaskItem>, DatabaseError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {ITEM_COLUMNS} FROM task_items WHERE list_id = ?1 ORDER BY id ASC"
        ))?;
        let items = stmt.query_map(rusqlite::params![list_id], Self::row_to_item)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }

    /// Get a single item by ID
    pub fn get_item(&self, id: i64) -> Result<TaskItem, DatabaseError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {ITEM_COLUMNS} FROM task_items WHERE id = ?1"
        ))?;
        match stmt.query_row(rusqlite::params![id], Self::row_to_item) {
            Ok(item) => Ok(item),
            Err(rusqlite::Error::QueryReturnedNoRows) => {
                Err(DatabaseError::NotFound { table: "task_items", id })
            }
            Err(e) => Err(DatabaseError::from(e)),
        }
    }

    /// Delete several items of one list in one transaction
    pub fn delete_items(&self, list_id: i64, ids: &[i64]) -> Result<(), DatabaseError> {
        if ids.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        for id in ids {
            tx.execute(
                "DELETE FROM task_items WHERE id = ?1 AND list_id = ?2",
                rusqlite::params![id, list_id],
            )?;
        }
        tx.commit()?;
        self.changes.publish(StoreEvent::ItemsChanged { list_id });
        Ok(())
    }

    /// Update an item's score
    pub fn update_item_score(&self, item: &TaskItem, score: i64) -> Result<(), DatabaseError> {
        let id = item.id.ok_or(DatabaseError::UnsavedRecord("Task item"))?;

        let tx = self.conn.unchecked_transaction()?;
        let updated = tx.execute(
            "UPDATE task_items SET score = ?1 WHERE id = ?2",
            rusqlite::params![score, id],
        )?;
        if updated == 0 {
            return Err(DatabaseError::NotFound { table: "task_items", id });
        }
        tx.commit()?;
        self.changes.publish(StoreEvent::ItemsChanged { list_id: item.list_id });
        Ok(())
    }

    /// Append an activity to an item's history and move its due date, atomically.
    /// Returns the ID of the new activity row.
    pub fn record_activity(
        &self,
        item: &TaskItem,
        new_due: DateTime<Utc>,
        activity: &TaskActivity,
    ) -> Result<i64, DatabaseError> {
        let id = item.id.ok_or(DatabaseError::UnsavedRecord("Task item"))?;

        // Dropping the transaction without commit rolls it back
        let tx = self.conn.unchecked_transaction()?;
        let updated = tx.execute(
            "UPDATE task_items SET due = ?1 WHERE id = ?2",
            rusqlite::params![new_due, id],
        )?;
        if updated == 0 {
            return Err(DatabaseError::NotFound { table: "task_items", id });
        }
        tx.execute(
            "INSERT INTO task_activities (item_id, date, kind, score) VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![id, activity.date, activity.kind.as_str(), activity.score],
        )?;
        let activity_id = tx.last_insert_rowid();
        tx.commit()?;

        self.changes.publish(StoreEvent::ItemsChanged { list_id: item.list_id });
        self.changes.publish(StoreEvent::HistoryChanged { item_id: id });
        Ok(activity_id)
    }

    fn row_to_activity(row: &rusqlite::Row) -> Result<TaskActivity, rusqlite::Error> {
        let kind: String = row.get(3)?;
        Ok(TaskActivity {
            id: Some(row.get(0)?),
            item_id: row.get(1)?,
            date: row.get(2)?,
            kind: kind.parse().map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
            })?,
            score: row.get(4)?,
        })
    }

    /// Get an item's history, oldest first
    pub fn get_history(&self, item_id: i64) -> Result<Vec<TaskActivity>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, item_id, date, kind, score
             FROM task_activities WHERE item_id = ?1 ORDER BY date ASC, id ASC"
        )?;
        let history = stmt.query_map(rusqlite::params![item_id], Self::row_to_activity)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(history)
    }
}
