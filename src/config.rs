use crate::calendar::WeekStart;
use std::path::PathBuf;
use thiserror::Error;
use time::Date;

static APP_DIR: &str = "daytasks";

static DATA_FILE_NAME: &str = "tasks.json";

// Used when the platform has no data directory
static FALLBACK_DATA_FILE: &str = "daytasks.json";

static LOG_FILE_NAME: &str = "daytasks.log";

/// Settings for a run of the program, assembled from the command line
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct Config {
    pub(crate) data_file: Option<PathBuf>,
    pub(crate) log_file: Option<PathBuf>,
    pub(crate) week_start: WeekStart,
    pub(crate) start_date: Option<Date>,
}

impl Config {
    pub(crate) fn data_file(&self) -> PathBuf {
        match &self.data_file {
            Some(p) => p.clone(),
            None => default_data_file(dirs::data_dir()),
        }
    }

    /// The log file defaults to sitting next to the data file
    pub(crate) fn log_file(&self) -> PathBuf {
        match &self.log_file {
            Some(p) => p.clone(),
            None => {
                let data_file = self.data_file();
                let log_file = data_file.with_file_name(LOG_FILE_NAME);
                if log_file == data_file {
                    let mut name = data_file.into_os_string();
                    name.push(".log");
                    PathBuf::from(name)
                } else {
                    log_file
                }
            }
        }
    }

    /// Rejects settings that would have logging clobber the task file
    pub(crate) fn check(&self) -> Result<(), ConfigError> {
        let data_file = self.data_file();
        if self.log_file() == data_file {
            Err(ConfigError::SameFile(data_file))
        } else {
            Ok(())
        }
    }
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub(crate) enum ConfigError {
    #[error("data file and log file are both {}", .0.display())]
    SameFile(PathBuf),
}

fn default_data_file(data_dir: Option<PathBuf>) -> PathBuf {
    match data_dir {
        Some(dir) => dir.join(APP_DIR).join(DATA_FILE_NAME),
        None => PathBuf::from(FALLBACK_DATA_FILE),
    }
}
