use super::errors::TaskStoreError;
use super::types::{Task, TaskId, TaskRef};

pub fn find_task<'a>(tasks: &'a [Task], id: &TaskId) -> Option<&'a Task> {
    tasks.iter().find(|task| &task.id == id)
}

/// Resolves a reference to a position in `tasks`.
pub fn resolve(tasks: &[Task], task: &TaskRef) -> Result<usize, TaskStoreError> {
    match task {
        TaskRef::Index(index) if *index < tasks.len() => Ok(*index),
        TaskRef::Index(index) => Err(TaskStoreError::IndexOutOfRange {
            index: *index,
            len: tasks.len(),
        }),
        TaskRef::Id(id) => tasks
            .iter()
            .position(|t| &t.id == id)
            .ok_or_else(|| TaskStoreError::TaskNotFound(id.clone())),
    }
}

/// Gives a fresh id to every task that has none. Returns how many were filled in.
pub fn assign_missing_ids(tasks: &mut [Task]) -> usize {
    let mut assigned = 0;
    for task in tasks.iter_mut().filter(|t| t.id.is_unassigned()) {
        task.id = TaskId::new();
        assigned += 1;
    }
    assigned
}
