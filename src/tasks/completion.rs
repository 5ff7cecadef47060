use mockable::Clock;

use super::TaskError;
use crate::database::Database;
use crate::models::{ActivityKind, TaskActivity, TaskItem};

/// Marks items done or skipped.
///
/// Both actions append an activity and push the due date out by one period.
/// The caller's `TaskItem` is only updated once the store has committed, so a
/// failed save never leaves a view showing a due date the store doesn't have.
pub struct CompletionEngine<'a, C: Clock> {
    db: &'a Database,
    clock: &'a C,
}

impl<'a, C: Clock> CompletionEngine<'a, C> {
    pub fn new(db: &'a Database, clock: &'a C) -> Self {
        Self { db, clock }
    }

    pub fn done(&self, item: &mut TaskItem) -> Result<TaskActivity, TaskError> {
        self.complete(item, ActivityKind::Done)
    }

    pub fn skip(&self, item: &mut TaskItem) -> Result<TaskActivity, TaskError> {
        self.complete(item, ActivityKind::Skip)
    }

    pub fn complete(&self, item: &mut TaskItem, kind: ActivityKind) -> Result<TaskActivity, TaskError> {
        let item_id = item.id.ok_or(TaskError::Unsaved("Task item"))?;
        let new_due = item.next_due().ok_or(TaskError::DueDateOverflow {
            days: item.period.days(),
        })?;
        let mut activity = TaskActivity::record(item_id, kind, item.score, self.clock.utc());

        match self.db.record_activity(item, new_due, &activity) {
            Ok(activity_id) => {
                activity.id = Some(activity_id);
                item.due = new_due;
                tracing::info!(item_id, %kind, due = %new_due, "recorded activity");
                Ok(activity)
            }
            Err(e) => {
                tracing::warn!(item_id, %kind, error = %e, "failed to record activity");
                Err(e.into())
            }
        }
    }
}
