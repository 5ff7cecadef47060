use mockable::Clock;

use super::{resolve_positions, validate_title, TaskError};
use crate::database::Database;
use crate::models::{Period, TaskActivity, TaskItem, TaskList};

pub struct ItemManager<'a, C: Clock> {
    db: &'a Database,
    clock: &'a C,
}

impl<'a, C: Clock> ItemManager<'a, C> {
    pub fn new(db: &'a Database, clock: &'a C) -> Self {
        Self { db, clock }
    }

    /// Items whose parent is `list`, in the order they were created
    pub fn list_for(&self, list: &TaskList) -> Result<Vec<TaskItem>, TaskError> {
        let list_id = list.id.ok_or(TaskError::Unsaved("Task list"))?;
        Ok(self.db.get_items_for_list(list_id)?)
    }

    /// Create and save an item under `list`, first due one period from now
    pub fn create(&self, list: &TaskList, title: &str, period: Period) -> Result<TaskItem, TaskError> {
        let list_id = list.id.ok_or(TaskError::Unsaved("Task list"))?;
        let title = validate_title(title)?;
        let mut item = TaskItem::new(list_id, title, period, self.clock.utc())
            .ok_or(TaskError::DueDateOverflow { days: period.days() })?;

        let id = self.db.insert_item(&item)?;
        item.id = Some(id);
        tracing::info!(item_id = id, list_id, title = %item.title, %period, "created item");
        Ok(item)
    }

    /// Delete the items of `list` at the given positions of `list_for(list)` in one save
    pub fn delete(&self, list: &TaskList, indices: &[usize]) -> Result<usize, TaskError> {
        let list_id = list.id.ok_or(TaskError::Unsaved("Task list"))?;
        let items = self.list_for(list)?;
        let ids = resolve_positions(&items, indices)?
            .into_iter()
            .map(|item| item.id.ok_or(TaskError::Unsaved("Task item")))
            .collect::<Result<Vec<_>, _>>()?;

        self.db.delete_items(list_id, &ids)?;
        tracing::info!(list_id, ?ids, "deleted items");
        Ok(ids.len())
    }

    /// The item's done/skip history, oldest first
    pub fn history(&self, item: &TaskItem) -> Result<Vec<TaskActivity>, TaskError> {
        let item_id = item.id.ok_or(TaskError::Unsaved("Task item"))?;
        Ok(self.db.get_history(item_id)?)
    }

    /// Change the score that future "done" activities will carry
    pub fn set_score(&self, item: &mut TaskItem, score: i64) -> Result<(), TaskError> {
        self.db.update_item_score(item, score)?;
        item.score = score;
        Ok(())
    }
}
