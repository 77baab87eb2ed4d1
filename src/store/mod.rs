mod file;
#[cfg(test)]
mod memory;
mod query;
pub(crate) use self::file::FileStore;
#[cfg(test)]
pub(crate) use self::memory::MemoryStore;
pub(crate) use self::query::DayQuery;
use crate::calendar::{is_same_day, DayRange, LocalZone};
use crate::task::{ColorTag, Task, TaskId};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;
use thiserror::Error;
use time::{Date, Duration, OffsetDateTime};

/// A transactional collection of task records.
///
/// `insert()` and `delete()` only stage changes; they become visible to
/// `get()` and `query()` once `save()` succeeds.  `rollback()` throws away
/// whatever has been staged since the last successful save.
pub(crate) trait ObjectStore {
    /// Stage `task`, replacing any record with the same ID
    fn insert(&mut self, task: Task);

    fn delete(&mut self, id: TaskId);

    fn save(&mut self) -> Result<(), PersistenceError>;

    fn rollback(&mut self);

    fn get(&self, id: TaskId) -> Option<Task>;

    fn query<P, F>(&self, predicate: P, order: F) -> Vec<Task>
    where
        P: FnMut(&Task) -> bool,
        F: FnMut(&Task, &Task) -> Ordering;
}

/// Committed and staged versions of a set of tasks, shared by the
/// `ObjectStore` implementations
#[derive(Clone, Debug, Default, Eq, PartialEq)]
struct Records {
    committed: BTreeMap<TaskId, Task>,
    staged: BTreeMap<TaskId, Task>,
}

impl Records {
    fn new<I: IntoIterator<Item = Task>>(tasks: I) -> Records {
        let committed = tasks
            .into_iter()
            .map(|t| (t.id, t))
            .collect::<BTreeMap<_, _>>();
        Records {
            staged: committed.clone(),
            committed,
        }
    }

    fn insert(&mut self, task: Task) {
        self.staged.insert(task.id, task);
    }

    fn delete(&mut self, id: TaskId) {
        self.staged.remove(&id);
    }

    fn is_dirty(&self) -> bool {
        self.staged != self.committed
    }

    fn staged(&self) -> impl Iterator<Item = &Task> + '_ {
        self.staged.values()
    }

    fn commit(&mut self) {
        self.committed.clone_from(&self.staged);
    }

    fn rollback(&mut self) {
        self.staged.clone_from(&self.committed);
    }

    fn get(&self, id: TaskId) -> Option<Task> {
        self.committed.get(&id).cloned()
    }

    fn query<P, F>(&self, mut predicate: P, order: F) -> Vec<Task>
    where
        P: FnMut(&Task) -> bool,
        F: FnMut(&Task, &Task) -> Ordering,
    {
        let mut tasks = self
            .committed
            .values()
            .filter(|t| predicate(t))
            .cloned()
            .collect::<Vec<_>>();
        tasks.sort_by(order);
        tasks
    }
}

/// The only writer of persisted tasks.
///
/// Every mutating method commits before returning.  If the commit fails, the
/// staged change is rolled back, so neither the store nor any `Task` handed
/// in by the caller is modified.
#[derive(Debug)]
pub(crate) struct TaskStore<O> {
    backend: O,
    // Zone in which task timestamps are assigned to calendar days
    zone: LocalZone,
    revision: u64,
}

impl<O: ObjectStore> TaskStore<O> {
    pub(crate) fn new<Z: Into<LocalZone>>(backend: O, zone: Z) -> TaskStore<O> {
        TaskStore {
            backend,
            zone: zone.into(),
            revision: 0,
        }
    }

    /// A counter that increases with every successful commit
    pub(crate) fn revision(&self) -> u64 {
        self.revision
    }

    /// Returns the tasks scheduled on `day`: incomplete ones first, each
    /// group in chronological order
    pub(crate) fn query_for_day(&self, day: Date) -> Vec<Task> {
        let range = DayRange::new(day, &self.zone);
        self.backend
            .query(|t| range.contains(t.created_at), day_order)
    }

    pub(crate) fn create(
        &mut self,
        title: &str,
        when: OffsetDateTime,
        tag: ColorTag,
    ) -> Result<Task, StoreError> {
        let task = Task::new(validate_title(title)?, when, tag);
        self.backend.insert(task.clone());
        self.commit()?;
        log::info!("Created task {} scheduled at {}", task.id, task.created_at);
        Ok(task)
    }

    /// Change the title, scheduled time, and tag of `task`, returning the
    /// stored result
    pub(crate) fn update(
        &mut self,
        task: &Task,
        title: &str,
        when: OffsetDateTime,
        tag: ColorTag,
    ) -> Result<Task, StoreError> {
        let title = validate_title(title)?;
        let mut updated = self.stored(task.id)?;
        let moved = !is_same_day(self.zone.to_local(updated.created_at), when);
        updated.title = title;
        updated.created_at = when;
        updated.tag = tag;
        self.backend.insert(updated.clone());
        self.commit()?;
        if moved {
            log::info!("Updated task {} and moved it to {}", updated.id, when);
        } else {
            log::info!("Updated task {}", updated.id);
        }
        Ok(updated)
    }

    pub(crate) fn toggle_completed(&mut self, task: &Task) -> Result<Task, StoreError> {
        let mut updated = self.stored(task.id)?;
        updated.completed = !updated.completed;
        self.backend.insert(updated.clone());
        self.commit()?;
        log::info!(
            "Marked task {} as {}",
            updated.id,
            if updated.completed {
                "completed"
            } else {
                "not completed"
            }
        );
        Ok(updated)
    }

    pub(crate) fn delete(&mut self, task: &Task) -> Result<(), StoreError> {
        let id = self.stored(task.id)?.id;
        self.backend.delete(id);
        self.commit()?;
        log::info!("Deleted task {id}");
        Ok(())
    }

    pub(crate) fn delete_all(&mut self) -> Result<(), StoreError> {
        self.stage_delete_all();
        self.commit()?;
        log::info!("Deleted all tasks");
        Ok(())
    }

    /// Replace everything in the store with six demonstration tasks, one per
    /// tag, scheduled on the hour marks following `now`
    pub(crate) fn add_sample_tasks(&mut self, now: OffsetDateTime) -> Result<Vec<Task>, StoreError> {
        self.stage_delete_all();
        let tasks = std::iter::zip(1i64.., ColorTag::ALL)
            .map(|(i, tag)| {
                let when = now.checked_add(Duration::hours(i)).unwrap_or(now);
                Task::new(format!("Task {i}"), when, tag)
            })
            .collect::<Vec<_>>();
        for task in &tasks {
            self.backend.insert(task.clone());
        }
        self.commit()?;
        log::info!("Created {} sample tasks", tasks.len());
        Ok(tasks)
    }

    fn stage_delete_all(&mut self) {
        for task in self.backend.query(|_| true, |a, b| a.id.cmp(&b.id)) {
            self.backend.delete(task.id);
        }
    }

    fn stored(&self, id: TaskId) -> Result<Task, StoreError> {
        self.backend.get(id).ok_or(StoreError::NotFound(id))
    }

    fn commit(&mut self) -> Result<(), PersistenceError> {
        match self.backend.save() {
            Ok(()) => {
                self.revision += 1;
                Ok(())
            }
            Err(e) => {
                self.backend.rollback();
                log::error!("Failed to save tasks: {e}");
                Err(e)
            }
        }
    }
}

/// Incomplete before completed, then earliest first
fn day_order(a: &Task, b: &Task) -> Ordering {
    a.completed
        .cmp(&b.completed)
        .then_with(|| a.created_at.cmp(&b.created_at))
        .then_with(|| a.id.cmp(&b.id))
}

fn validate_title(title: &str) -> Result<String, ValidationError> {
    let title = title.trim();
    if title.is_empty() {
        Err(ValidationError::EmptyTitle)
    } else {
        Ok(title.to_owned())
    }
}

#[derive(Copy, Clone, Debug, Eq, Error, PartialEq)]
pub(crate) enum ValidationError {
    #[error("task title must not be empty")]
    EmptyTitle,
}

#[derive(Debug, Error)]
pub(crate) enum PersistenceError {
    #[error("failed to read {}", .path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse {}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to create directory {}", .path.display())]
    CreateDir { path: PathBuf, source: io::Error },
    #[error("failed to write tasks to {}", .path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error("failed to serialize tasks")]
    Serialize(#[source] serde_json::Error),
    #[error("failed to replace {}", .path.display())]
    Persist {
        path: PathBuf,
        source: tempfile::PersistError,
    },
}

#[derive(Debug, Error)]
pub(crate) enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
    #[error("no task with ID {0}")]
    NotFound(TaskId),
}
