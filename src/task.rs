use serde::{Deserialize, Serialize};
use std::fmt;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub(crate) struct TaskId(Uuid);

impl TaskId {
    pub(crate) fn random() -> TaskId {
        TaskId(Uuid::new_v4())
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One of the six color tags a task can carry
#[derive(
    Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ColorTag {
    #[default]
    Tag1,
    Tag2,
    Tag3,
    Tag4,
    Tag5,
    Tag6,
}

impl ColorTag {
    pub(crate) const ALL: [ColorTag; 6] = [
        ColorTag::Tag1,
        ColorTag::Tag2,
        ColorTag::Tag3,
        ColorTag::Tag4,
        ColorTag::Tag5,
        ColorTag::Tag6,
    ];

    fn index(self) -> usize {
        ColorTag::ALL
            .iter()
            .position(|&t| t == self)
            .unwrap_or_default()
    }

    pub(crate) fn next(self) -> ColorTag {
        ColorTag::ALL[(self.index() + 1) % ColorTag::ALL.len()]
    }

    pub(crate) fn previous(self) -> ColorTag {
        let len = ColorTag::ALL.len();
        ColorTag::ALL[(self.index() + len - 1) % len]
    }
}

/// A to-do item scheduled for a particular moment.
///
/// `created_at` is both when the task was made and the time it is scheduled
/// for; the calendar day it falls on decides which day's list it shows up in.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub(crate) struct Task {
    pub(crate) id: TaskId,
    pub(crate) title: String,
    #[serde(with = "time::serde::rfc3339")]
    pub(crate) created_at: OffsetDateTime,
    #[serde(default)]
    pub(crate) completed: bool,
    #[serde(default)]
    pub(crate) tag: ColorTag,
}

impl Task {
    pub(crate) fn new(title: String, created_at: OffsetDateTime, tag: ColorTag) -> Task {
        Task {
            id: TaskId::random(),
            title,
            created_at,
            completed: false,
            tag,
        }
    }
}
