mod common;

use boring_tasks::{ActivityKind, CompletionEngine, Database, ItemManager, ListManager, Period, TaskError};
use chrono::{Duration, TimeZone, Utc};
use common::{file_database, FixedClock};

#[test]
fn weekly_item_done_moves_due_one_week() {
    let (_dir, db) = file_database();
    let clock = FixedClock::at(2023, 12, 25, 9);
    let list = ListManager::new(&db, &clock).create("Chores").unwrap();
    let items = ItemManager::new(&db, &clock);
    let mut item = items.create(&list, "Trash", Period::from_days(7).unwrap()).unwrap();
    assert_eq!(item.due, Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap());

    let activity = CompletionEngine::new(&db, &clock).done(&mut item).unwrap();

    assert_eq!(item.due, Utc.with_ymd_and_hms(2024, 1, 8, 9, 0, 0).unwrap());
    assert_eq!(activity.kind, ActivityKind::Done);
    let history = items.history(&item).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].kind, ActivityKind::Done);
}

#[test]
fn unreadable_period_skips_by_one_day() {
    let (_dir, db) = file_database();
    let clock = FixedClock::at(2024, 1, 1, 12);
    let list = ListManager::new(&db, &clock).create("Chores").unwrap();
    let created = ItemManager::new(&db, &clock)
        .create(&list, "Water plants", Period::from_days(5).unwrap())
        .unwrap();
    let id = created.id.unwrap();

    // Period written by something other than this crate
    let due = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    db.conn()
        .execute(
            "UPDATE task_items SET period = 'BAD', due = ?1 WHERE id = ?2",
            rusqlite::params![due, id],
        )
        .unwrap();

    let mut item = db.get_item(id).unwrap();
    assert_eq!(item.period, Period::FALLBACK);

    let activity = CompletionEngine::new(&db, &clock).skip(&mut item).unwrap();

    assert_eq!(item.due, Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap());
    assert_eq!(db.get_item(id).unwrap().due, item.due);
    assert_eq!(activity.kind, ActivityKind::Skip);
    assert_eq!(activity.score, 0);
    assert_eq!(db.get_history(id).unwrap(), vec![activity]);
}

#[test]
fn new_item_is_due_one_period_after_creation() {
    let (_dir, db) = file_database();
    let clock = FixedClock::at(2024, 2, 27, 18);
    let list = ListManager::new(&db, &clock).create("Chores").unwrap();

    let item = ItemManager::new(&db, &clock)
        .create(&list, "Trash", Period::from_days(3).unwrap())
        .unwrap();

    // Leap day in between
    assert_eq!(item.due, clock.now + Duration::days(3));
    assert_eq!(item.due, Utc.with_ymd_and_hms(2024, 3, 1, 18, 0, 0).unwrap());
    assert_eq!(item.score, 0);
    assert_eq!(item.created_at, clock.now);
}

#[test]
fn deleting_list_cascades_to_items_and_history() {
    let (_dir, db) = file_database();
    let clock = FixedClock::at(2024, 1, 1, 9);
    let lists = ListManager::new(&db, &clock);
    let chores = lists.create("Chores").unwrap();
    let garden = lists.create("Garden").unwrap();
    let items = ItemManager::new(&db, &clock);
    let mut trash = items.create(&chores, "Trash", Period::from_days(1).unwrap()).unwrap();
    let weeds = items.create(&garden, "Weeds", Period::from_days(7).unwrap()).unwrap();
    CompletionEngine::new(&db, &clock).done(&mut trash).unwrap();

    assert_eq!(lists.delete(&[0]).unwrap(), 1);

    let remaining: Vec<_> = lists.list_all().unwrap().into_iter().map(|l| l.title).collect();
    assert_eq!(remaining, ["Garden"]);
    assert!(db.get_items_for_list(chores.id.unwrap()).unwrap().is_empty());
    assert!(db.get_history(trash.id.unwrap()).unwrap().is_empty());
    assert_eq!(items.list_for(&garden).unwrap(), vec![weeds]);
}

#[test]
fn data_survives_reopening_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.db");
    let clock = FixedClock::at(2024, 1, 1, 9);

    {
        let db = Database::new(path.to_str().unwrap()).unwrap();
        let list = ListManager::new(&db, &clock).create("Chores").unwrap();
        let mut item = ItemManager::new(&db, &clock)
            .create(&list, "Trash", Period::from_days(2).unwrap())
            .unwrap();
        CompletionEngine::new(&db, &clock).done(&mut item).unwrap();
    }

    let db = Database::new(path.to_str().unwrap()).unwrap();
    let lists = ListManager::new(&db, &clock).list_all().unwrap();
    let items = ItemManager::new(&db, &clock).list_for(&lists[0]).unwrap();
    assert_eq!(items[0].period.days(), 2);
    assert_eq!(items[0].due, clock.now + Duration::days(4));
    assert_eq!(db.get_history(items[0].id.unwrap()).unwrap().len(), 1);
}

#[test]
fn out_of_range_delete_changes_nothing() {
    let (_dir, db) = file_database();
    let clock = FixedClock::at(2024, 1, 1, 9);
    let lists = ListManager::new(&db, &clock);
    lists.create("Chores").unwrap();

    assert!(matches!(
        lists.delete(&[0, 1]),
        Err(TaskError::IndexOutOfRange { index: 1, len: 1 })
    ));
    assert_eq!(lists.list_all().unwrap().len(), 1);
}
