use super::{ObjectStore, PersistenceError, Records};
use crate::task::{Task, TaskId};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fs;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// An `ObjectStore` kept in a JSON file.
///
/// The file is only ever replaced whole: a save writes to a temporary file
/// in the same directory and then renames it over the original.
#[derive(Debug)]
pub(crate) struct FileStore {
    path: PathBuf,
    records: Records,
}

#[derive(Debug, Default, Deserialize, Serialize)]
struct TaskFile {
    tasks: Vec<Task>,
}

impl FileStore {
    /// Load the tasks in `path`.  A nonexistent file is treated as empty.
    pub(crate) fn open(path: &Path) -> Result<FileStore, PersistenceError> {
        let data = match fs::File::open(path) {
            Ok(fp) => serde_json::from_reader::<_, TaskFile>(BufReader::new(fp)).map_err(
                |source| PersistenceError::Parse {
                    path: path.to_owned(),
                    source,
                },
            )?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("{} does not exist; starting with no tasks", path.display());
                TaskFile::default()
            }
            Err(source) => {
                return Err(PersistenceError::Read {
                    path: path.to_owned(),
                    source,
                })
            }
        };
        log::debug!("Loaded {} tasks from {}", data.tasks.len(), path.display());
        Ok(FileStore {
            path: path.to_owned(),
            records: Records::new(data.tasks),
        })
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self) -> Result<(), PersistenceError> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(|source| PersistenceError::CreateDir {
            path: dir.to_owned(),
            source,
        })?;
        let write_err = |source| PersistenceError::Write {
            path: self.path.clone(),
            source,
        };
        let mut tasks = self.records.staged().cloned().collect::<Vec<_>>();
        tasks.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        let data = TaskFile { tasks };
        let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
        {
            let mut out = BufWriter::new(tmp.as_file_mut());
            serde_json::to_writer_pretty(&mut out, &data).map_err(PersistenceError::Serialize)?;
            out.write_all(b"\n").map_err(write_err)?;
            out.flush().map_err(write_err)?;
        }
        tmp.as_file().sync_all().map_err(write_err)?;
        tmp.persist(&self.path)
            .map_err(|source| PersistenceError::Persist {
                path: self.path.clone(),
                source,
            })?;
        log::debug!(
            "Wrote {} tasks to {}",
            data.tasks.len(),
            self.path.display()
        );
        Ok(())
    }
}

impl ObjectStore for FileStore {
    fn insert(&mut self, task: Task) {
        self.records.insert(task);
    }

    fn delete(&mut self, id: TaskId) {
        self.records.delete(id);
    }

    fn save(&mut self) -> Result<(), PersistenceError> {
        if self.records.is_dirty() {
            self.write()?;
            self.records.commit();
        }
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
