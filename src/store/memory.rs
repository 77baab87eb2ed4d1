use super::{ObjectStore, PersistenceError, Records};
use crate::task::{Task, TaskId};
use std::cmp::Ordering;
use std::io;
use std::path::PathBuf;

/// An `ObjectStore` that lives only in memory and can be told to fail
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct MemoryStore {
    records: Records,
    fail_next_save: bool,
}

impl MemoryStore {
    pub(crate) fn new() -> MemoryStore {
        MemoryStore::default()
    }

    /// Make the next call to `save()` fail without committing anything
    pub(crate) fn fail_next_save(&mut self) {
        self.fail_next_save = true;
    }
}

impl ObjectStore for MemoryStore {
    fn insert(&mut self, task: Task) {
        self.records.insert(task);
    }

    fn delete(&mut self, id: TaskId) {
        self.records.delete(id);
    }

    fn save(&mut self) -> Result<(), PersistenceError> {
        if std::mem::take(&mut self.fail_next_save) {
            return Err(PersistenceError::Write {
                path: PathBuf::from("<memory>"),
                source: io::Error::other("storage is unavailable"),
            });
        }
        self.records.commit();
        Ok(())
    }

    fn rollback(&mut self) {
        self.records.rollback();
    }

    fn get(&self, id: TaskId) -> Option<Task> {
        self.records.get(id)
    }

    fn query<P, F>(&self, predicate: P, order: F) -> Vec<Task>
    where
        P: FnMut(&Task) -> bool,
        F: FnMut(&Task, &Task) -> Ordering,
    {
        self.records.query(predicate, order)
    }
}
