//! Operations on lists, items and their completion history.
//!
//! Each manager borrows the [`Database`](crate::Database) for the duration of a
//! call and returns plain model values; views refresh themselves from the
//! store's change feed rather than from these return values.

pub mod completion;
pub mod error;
pub mod items;
pub mod lists;

pub use completion::CompletionEngine;
pub use error::TaskError;
pub use items::ItemManager;
pub use lists::ListManager;

/// Resolve display positions against a snapshot.
/// Every position is checked before any is used; duplicates collapse.
fn resolve_positions<'a, T>(records: &'a [T], indices: &[usize]) -> Result<Vec<&'a T>, TaskError> {
    let mut positions = indices.to_vec();
    positions.sort_unstable();
    positions.dedup();

    positions
        .into_iter()
        .map(|index| {
            records.get(index).ok_or(TaskError::IndexOutOfRange {
                index,
                len: records.len(),
            })
        })
        .collect()
}

fn validate_title(title: &str) -> Result<String, TaskError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(TaskError::EmptyTitle);
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_are_checked_up_front() {
        let records = ["a", "b", "c"];
        assert_eq!(resolve_positions(&records, &[2, 0, 2]).unwrap(), [&"a", &"c"]);
        assert!(matches!(
            resolve_positions(&records, &[0, 3]),
            Err(TaskError::IndexOutOfRange { index: 3, len: 3 })
        ));
    }

    #[test]
    fn titles_are_trimmed_and_required() {
        assert_eq!(validate_title("  Trash ").unwrap(), "Trash");
        assert!(matches!(validate_title(" \t"), Err(TaskError::EmptyTitle)));
    }
}
