use mockable::Clock;

use super::{resolve_positions, validate_title, TaskError};
use crate::database::Database;
use crate::models::TaskList;

pub struct ListManager<'a, C: Clock> {
    db: &'a Database,
    clock: &'a C,
}

impl<'a, C: Clock> ListManager<'a, C> {
    pub fn new(db: &'a Database, clock: &'a C) -> Self {
        Self { db, clock }
    }

    /// All lists, in the order they were created
    pub fn list_all(&self) -> Result<Vec<TaskList>, TaskError> {
        Ok(self.db.get_all_lists()?)
    }

    /// Create and save a new list
    pub fn create(&self, title: &str) -> Result<TaskList, TaskError> {
        let title = validate_title(title)?;
        let mut list = TaskList::new(title, self.clock.utc());
        let id = self.db.insert_list(&list)?;
        list.id = Some(id);
        tracing::info!(list_id = id, title = %list.title, "created list");
        Ok(list)
    }

    /// Delete the lists at the given positions of `list_all()` in one save.
    /// Items under a deleted list are deleted with it.
    /// Returns how many lists were removed.
    pub fn delete(&self, indices: &[usize]) -> Result<usize, TaskError> {
        let lists = self.list_all()?;
        let ids = resolve_positions(&lists, indices)?
            .into_iter()
            .map(|list| list.id.ok_or(TaskError::Unsaved("Task list")))
            .collect::<Result<Vec<_>, _>>()?;

        self.db.delete_lists(&ids)?;
        tracing::info!(?ids, "deleted lists");
        Ok(ids.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::ItemManager;
    use crate::test_support::FixedClock;
    use crate::models::Period;

    #[test]
    fn create_persists_and_returns_saved_list() {
        let db = Database::open_in_memory().unwrap();
        let clock = FixedClock::ymd(2024, 5, 1);
        let lists = ListManager::new(&db, &clock);

        let chores = lists.create("  Chores ").unwrap();
        assert!(chores.id.is_some());
        assert_eq!(chores.title, "Chores");
        assert_eq!(chores.created_at, clock.now);
        assert_eq!(lists.list_all().unwrap(), vec![chores]);
    }

    #[test]
    fn blank_title_is_rejected_without_saving() {
        let db = Database::open_in_memory().unwrap();
        let clock = FixedClock::ymd(2024, 5, 1);
        let lists = ListManager::new(&db, &clock);

        assert!(matches!(lists.create("   "), Err(TaskError::EmptyTitle)));
        assert!(lists.list_all().unwrap().is_empty());
    }

    #[test]
    fn delete_removes_lists_at_positions() {
        let db = Database::open_in_memory().unwrap();
        let clock = FixedClock::ymd(2024, 5, 1);
        let lists = ListManager::new(&db, &clock);
        for title in ["Chores", "Garden", "Car", "Pets"] {
            lists.create(title).unwrap();
        }

        assert_eq!(lists.delete(&[3, 1]).unwrap(), 2);

        let titles: Vec<_> = lists.list_all().unwrap().into_iter().map(|l| l.title).collect();
        assert_eq!(titles, ["Chores", "Car"]);
    }

    #[test]
    fn out_of_range_position_deletes_nothing() {
        let db = Database::open_in_memory().unwrap();
        let clock = FixedClock::ymd(2024, 5, 1);
        let lists = ListManager::new(&db, &clock);
        lists.create("Chores").unwrap();
        lists.create("Garden").unwrap();

        assert!(matches!(
            lists.delete(&[0, 5]),
            Err(TaskError::IndexOutOfRange { index: 5, len: 2 })
        ));
        assert_eq!(lists.list_all().unwrap().len(), 2);
    }

    #[test]
    fn deleting_a_list_takes_its_items() {
        let db = Database::open_in_memory().unwrap();
        let clock = FixedClock::ymd(2024, 5, 1);
        let lists = ListManager::new(&db, &clock);
        let items = ItemManager::new(&db, &clock);
        let chores = lists.create("Chores").unwrap();
        let garden = lists.create("Garden").unwrap();
        items.create(&chores, "Trash", Period::from_days(3).unwrap()).unwrap();
        items.create(&garden, "Water", Period::from_days(2).unwrap()).unwrap();

        lists.delete(&[0]).unwrap();

        assert!(items.list_for(&chores).unwrap().is_empty());
        assert_eq!(items.list_for(&garden).unwrap().len(), 1);
    }
}
