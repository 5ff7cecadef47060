pub mod changes;
pub mod cli;
pub mod config;
pub mod database;
pub mod logging;
pub mod models;
pub mod tasks;
pub mod tui;
pub mod utils;

pub use changes::StoreEvent;
pub use config::Config;
pub use database::Database;
pub use models::{ActivityKind, Period, TaskActivity, TaskItem, TaskList};
pub use tasks::{CompletionEngine, ItemManager, ListManager, TaskError};
pub use utils::Profile;

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{DateTime, Local, TimeZone, Utc};

    /// Clock frozen at `now`; tests move it by assigning the field
    pub struct FixedClock {
        pub now: DateTime<Utc>,
    }

    impl FixedClock {
        pub fn ymd(year: i32, month: u32, day: u32) -> Self {
            Self {
                now: Utc.with_ymd_and_hms(year, month, day, 9, 0, 0).unwrap(),
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
}
