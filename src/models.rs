use chrono::{DateTime, Days, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Recurrence interval of a task item, in whole days (always at least one)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Period {
    days: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeriodError {
    #[error("Period must be at least one day")]
    Zero,
    #[error("Invalid period '{0}', expected a day count such as 7 or 7D")]
    Unparseable(String),
}

impl Period {
    /// Used when a stored period cannot be read back as a positive day count
    pub const FALLBACK: Period = Period { days: 1 };

    pub fn from_days(days: u32) -> Result<Self, PeriodError> {
        if days == 0 {
            return Err(PeriodError::Zero);
        }
        Ok(Self { days })
    }

    pub fn days(&self) -> u32 {
        self.days
    }

    /// Read a stored period such as "7D".
    /// A trailing unit letter is stripped and the remaining digits are parsed;
    /// anything that does not yield a positive count falls back to one day.
    pub fn parse_lenient(stored: &str) -> Self {
        stored.parse().unwrap_or(Self::FALLBACK)
    }

    /// Store representation, e.g. "7D"
    pub fn to_stored(&self) -> String {
        self.to_string()
    }
}

impl FromStr for Period {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = match trimmed.chars().last() {
            Some(unit) if unit.is_ascii_alphabetic() => &trimmed[..trimmed.len() - unit.len_utf8()],
            _ => trimmed,
        };
        let days = digits
            .parse::<u32>()
            .map_err(|_| PeriodError::Unparseable(s.to_string()))?;
        Self::from_days(days)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}D", self.days)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Done,
    Skip,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown activity kind: {0}")]
pub struct ParseActivityKindError(pub String);

impl ActivityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityKind::Done => "done",
            ActivityKind::Skip => "skip",
        }
    }
}

impl FromStr for ActivityKind {
    type Err = ParseActivityKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "done" => Ok(ActivityKind::Done),
            "skip" => Ok(ActivityKind::Skip),
            other => Err(ParseActivityKindError(other.to_string())),
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskList {
    pub id: Option<i64>,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskItem {
    pub id: Option<i64>,
    pub list_id: i64,
    pub title: String,
    pub due: DateTime<Utc>,
    pub period: Period,
    pub score: i64,
    pub created_at: DateTime<Utc>,
}

/// One entry in an item's history. Never modified after it is written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskActivity {
    pub id: Option<i64>,
    pub item_id: i64,
    pub date: DateTime<Utc>,
    pub kind: ActivityKind,
    pub score: i64,
}

impl TaskList {
    pub fn new(title: String, now: DateTime<Utc>) -> Self {
        Self {
            id: None,
            title,
            created_at: now,
        }
    }
}

impl TaskItem {
    /// A fresh item is first due one period after `now`.
    /// Returns `None` if the due date would overflow.
    pub fn new(list_id: i64, title: String, period: Period, now: DateTime<Utc>) -> Option<Self> {
        let due = now.checked_add_days(Days::new(u64::from(period.days())))?;
        Some(Self {
            id: None,
            list_id,
            title,
            due,
            period,
            score: 0,
            created_at: now,
        })
    }

    /// Due date after one more period has elapsed
    pub fn next_due(&self) -> Option<DateTime<Utc>> {
        self.due.checked_add_days(Days::new(u64::from(self.period.days())))
    }

    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.due < now
    }
}

impl TaskActivity {
    /// Done carries the item's current score, skip always scores zero
    pub fn record(item_id: i64, kind: ActivityKind, item_score: i64, now: DateTime<Utc>) -> Self {
        let score = match kind {
            ActivityKind::Done => item_score,
            ActivityKind::Skip => 0,
        };
        Self {
            id: None,
            item_id,
            date: now,
            kind,
            score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 9, 0, 0).unwrap()
    }

    #[test]
    fn period_parses_day_suffix() {
        assert_eq!("7D".parse::<Period>().unwrap().days(), 7);
        assert_eq!("30".parse::<Period>().unwrap().days(), 30);
        assert_eq!(" 2d ".parse::<Period>().unwrap().days(), 2);
    }

    #[test]
    fn period_rejects_zero_and_garbage() {
        assert_eq!("0D".parse::<Period>(), Err(PeriodError::Zero));
        assert!(matches!("BAD".parse::<Period>(), Err(PeriodError::Unparseable(_))));
        assert!(matches!("-3D".parse::<Period>(), Err(PeriodError::Unparseable(_))));
        assert!(matches!("".parse::<Period>(), Err(PeriodError::Unparseable(_))));
    }

    #[test]
    fn lenient_parse_falls_back_to_one_day() {
        for stored in ["BAD", "", "D", "0D", "-1D", "7DD", "1.5D"] {
            assert_eq!(Period::parse_lenient(stored), Period::FALLBACK, "{stored:?}");
        }
        assert_eq!(Period::parse_lenient("14D").days(), 14);
    }

    #[test]
    fn period_store_format() {
        let period = Period::from_days(7).unwrap();
        assert_eq!(period.to_stored(), "7D");
        assert_eq!(Period::parse_lenient(&period.to_stored()), period);
    }

    #[test]
    fn new_item_is_due_one_period_out() {
        let now = at(2024, 3, 1);
        let item = TaskItem::new(1, "Trash".to_string(), Period::from_days(3).unwrap(), now).unwrap();
        assert_eq!(item.due, at(2024, 3, 4));
        assert_eq!(item.score, 0);
        assert_eq!(item.id, None);
    }

    #[test]
    fn next_due_crosses_month_and_year() {
        let mut item = TaskItem::new(1, "Rent".to_string(), Period::from_days(1).unwrap(), at(2023, 12, 30)).unwrap();
        assert_eq!(item.next_due(), Some(at(2024, 1, 1)));
        item.period = Period::from_days(7).unwrap();
        item.due = at(2024, 2, 26);
        assert_eq!(item.next_due(), Some(at(2024, 3, 4)));
    }

    #[test]
    fn overdue_is_strictly_before_now() {
        let item = TaskItem::new(1, "Plants".to_string(), Period::from_days(2).unwrap(), at(2024, 1, 1)).unwrap();
        assert!(!item.is_overdue(at(2024, 1, 2)));
        assert!(!item.is_overdue(item.due));
        assert!(item.is_overdue(at(2024, 1, 4)));
    }

    #[test]
    fn activity_score_depends_on_kind() {
        let now = at(2024, 1, 1);
        assert_eq!(TaskActivity::record(5, ActivityKind::Done, 12, now).score, 12);
        assert_eq!(TaskActivity::record(5, ActivityKind::Skip, 12, now).score, 0);
    }

    #[test]
    fn activity_kind_round_trips_through_text() {
        assert_eq!("done".parse::<ActivityKind>(), Ok(ActivityKind::Done));
        assert_eq!(ActivityKind::Skip.to_string(), "skip");
        assert!("later".parse::<ActivityKind>().is_err());
    }
}
