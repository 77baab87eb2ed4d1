use crate::editor::Draft;
use crate::store::{ObjectStore, StoreError, TaskStore};
use crate::task::Task;
use time::OffsetDateTime;

/// Whether the task editor is open, and for what
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) enum EditState {
    #[default]
    Idle,
    Creating(Draft),
    Editing {
        task: Task,
        draft: Draft,
    },
}

/// Drives the create/edit flow between the task list, the editor popup, and
/// the store.
///
/// At most one task is being created or edited at a time.  A failed save
/// leaves the editor open with its contents intact so that the user can fix
/// the problem or cancel.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct Coordinator {
    state: EditState,
}

impl Coordinator {
    pub(crate) fn new() -> Coordinator {
        Coordinator::default()
    }

    pub(crate) fn state(&self) -> &EditState {
        &self.state
    }

    pub(crate) fn is_open(&self) -> bool {
        self.state != EditState::Idle
    }

    /// Open the editor on a blank task scheduled at `when`.  Returns `false`
    /// if the editor is already open.
    pub(crate) fn begin_create(&mut self, when: OffsetDateTime) -> bool {
        if self.is_open() {
            return false;
        }
        self.state = EditState::Creating(Draft::new(when));
        true
    }

    /// Open the editor on `task`.  Returns `false` if the editor is already
    /// open.
    pub(crate) fn begin_edit(&mut self, task: Task) -> bool {
        if self.is_open() {
            return false;
        }
        let draft = Draft::from_task(&task);
        self.state = EditState::Editing { task, draft };
        true
    }

    pub(crate) fn cancel(&mut self) {
        if self.is_open() {
            log::debug!("Discarding task draft");
        }
        self.state = EditState::Idle;
    }

    pub(crate) fn draft(&self) -> Option<&Draft> {
        match &self.state {
            EditState::Idle => None,
            EditState::Creating(draft) | EditState::Editing { draft, .. } => Some(draft),
        }
    }

    pub(crate) fn draft_mut(&mut self) -> Option<&mut Draft> {
        match &mut self.state {
            EditState::Idle => None,
            EditState::Creating(draft) | EditState::Editing { draft, .. } => Some(draft),
        }
    }

    /// Commit the draft to `store`.  On success, the editor is closed and the
    /// stored task is returned; `Ok(None)` means there was nothing to save.
    /// On failure, the editor stays open.
    pub(crate) fn save<O: ObjectStore>(
        &mut self,
        store: &mut TaskStore<O>,
    ) -> Result<Option<Task>, StoreError> {
        let task = match &self.state {
            EditState::Idle => return Ok(None),
            EditState::Creating(draft) => store.create(draft.title(), draft.when(), draft.tag())?,
            EditState::Editing { task, draft } => {
                store.update(task, draft.title(), draft.when(), draft.tag())?
            }
        };
        self.state = EditState::Idle;
        Ok(Some(task))
    }
}
