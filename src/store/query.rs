use super::{ObjectStore, TaskStore};
use crate::task::Task;
use time::Date;

/// The task list for one day, refetched on demand.
///
/// The results are considered stale when the day changes or when the store
/// has committed anything since they were fetched; `refresh()` reruns the
/// query only in those cases.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct DayQuery {
    day: Date,
    tasks: Vec<Task>,
    // Store revision the results were computed at; `None` forces a refetch
    revision: Option<u64>,
}

impl DayQuery {
    pub(crate) fn new(day: Date) -> DayQuery {
        DayQuery {
            day,
            tasks: Vec::new(),
            revision: None,
        }
    }

    pub(crate) fn day(&self) -> Date {
        self.day
    }

    pub(crate) fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub(crate) fn set_day(&mut self, day: Date) {
        if day != self.day {
            self.day = day;
            self.revision = None;
        }
    }

    /// Bring the results up to date with `store`.  Returns `true` if they
    /// differ from what was there before.
    pub(crate) fn refresh<O: ObjectStore>(&mut self, store: &TaskStore<O>) -> bool {
        if self.revision == Some(store.revision()) {
            return false;
        }
        let tasks = store.query_for_day(self.day);
        self.revision = Some(store.revision());
        if tasks == self.tasks {
            false
        } else {
            log::trace!("Task list for {} now has {} tasks", self.day, tasks.len());
            self.tasks = tasks;
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::task::ColorTag;
    use time::macros::{date, datetime, offset};

    #[test]
    fn test_refresh() {
        let mut store = TaskStore::new(MemoryStore::new(), offset!(UTC));
        let mut query = DayQuery::new(date!(2024 - 09 - 08));
        // Nothing to show either way
        assert!(!query.refresh(&store));
        assert!(query.tasks().is_empty());

        let walk = store
            .create("Walk", datetime!(2024-09-08 9:00 UTC), ColorTag::Tag1)
            .unwrap();
        assert!(query.refresh(&store));
        assert_eq!(query.tasks(), [walk.clone()]);
        assert!(!query.refresh(&store));

        // A commit that does not touch this day leaves the list alone
        store
            .create("Swim", datetime!(2024-09-09 9:00 UTC), ColorTag::Tag1)
            .unwrap();
        assert!(!query.refresh(&store));

        query.set_day(date!(2024 - 09 - 09));
        assert!(query.refresh(&store));
        assert_eq!(query.tasks().len(), 1);
        assert_eq!(query.tasks()[0].title, "Swim");

        query.set_day(date!(2024 - 09 - 08));
        assert!(query.refresh(&store));
        store.toggle_completed(&walk).unwrap();
        assert!(query.refresh(&store));
        assert!(query.tasks()[0].completed);

        store.delete(&walk).unwrap();
        assert!(query.refresh(&store));
        assert!(query.tasks().is_empty());
    }
}
