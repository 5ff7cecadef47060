#![allow(dead_code)]

use boring_tasks::Database;
use chrono::{DateTime, Local, TimeZone, Utc};
use tempfile::TempDir;

/// Clock frozen at `now`
pub struct FixedClock {
    pub now: DateTime<Utc>,
}

impl FixedClock {
    pub fn at(year: i32, month: u32, day: u32, hour: u32) -> Self {
        Self {
            now: Utc.with_ymd_and_hms(year, month, day, hour, 0, 0).unwrap(),
        }
    }
}

impl mockable::Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.now
    }
}

/// A database file inside a fresh temp directory; keep the `TempDir` alive for the test
pub fn file_database() -> (TempDir, Database) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data").join("tasks.db");
    let db = Database::new(path.to_str().unwrap()).unwrap();
    (dir, db)
}
