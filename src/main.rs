mod app;
mod calendar;
mod config;
mod coordinator;
mod editor;
mod help;
mod store;
mod task;
mod tasklist;
mod theme;
use crate::app::App;
use crate::calendar::{Clock, SystemClock, WeekWindow};
use crate::config::Config;
use crate::store::{FileStore, TaskStore};
use anyhow::Context;
use lexopt::{Arg, Parser, ValueExt};
use ratatui::DefaultTerminal;
use std::fs::{self, OpenOptions};
use std::path::Path;
use time::{format_description::FormatItem, macros::format_description, Date};

static YMD_FMT: &[FormatItem<'_>] = format_description!("[year]-[month]-[day]");

#[derive(Clone, Debug, Eq, PartialEq)]
enum Command {
    Run(Config),
    Help,
    Version,
}

impl Command {
    fn from_parser(mut parser: Parser) -> Result<Command, lexopt::Error> {
        let mut config = Config::default();
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('h') | Arg::Long("help") => return Ok(Command::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Command::Version),
                Arg::Short('f') | Arg::Long("data-file") => {
                    config.data_file = Some(parser.value()?.into());
                }
                Arg::Long("log-file") => config.log_file = Some(parser.value()?.into()),
                Arg::Long("week-start") => config.week_start = parser.value()?.parse()?,
                Arg::Value(value) if config.start_date.is_none() => {
                    let value = value.string()?;
                    match Date::parse(&value, &YMD_FMT) {
                        Ok(d) => config.start_date = Some(d),
                        Err(e) => {
                            return Err(lexopt::Error::ParsingFailed {
                                value,
                                error: Box::new(e),
                            })
                        }
                    }
                }
                _ => return Err(arg.unexpected()),
            }
        }
        config
            .check()
            .map_err(|e| lexopt::Error::Custom(Box::new(e)))?;
        Ok(Command::Run(config))
    }

    fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Run(config) => {
                // Must happen while the process is still single-threaded
                let clock =
                    SystemClock::local().context("failed to determine local time zone offset")?;
                let log_file = config.log_file();
                init_logging(&log_file)
                    .with_context(|| format!("failed to set up logging to {}", log_file.display()))?;
                let data_file = config.data_file();
                let backend = FileStore::open(&data_file).context("failed to load tasks")?;
                log::info!("Using task file {}", backend.path().display());
                let store = TaskStore::new(backend, clock.zone());
                let start = config.start_date.unwrap_or_else(|| clock.today());
                let weeks = WeekWindow::around(start, config.week_start)
                    .with_context(|| format!("cannot show the week containing {start}"))?;
                with_terminal(|mut terminal| {
                    terminal.hide_cursor().context("failed to hide cursor")?;
                    App::new(clock, weeks, store).run(&mut terminal)?;
                    Ok(())
                })
            }
            Command::Help => {
                println!("Usage: daytasks [OPTIONS] [YYYY-MM-DD]");
                println!();
                println!("Terminal day planner with a paged week strip and per-day task lists");
                println!();
                println!("Options:");
                println!("  -f, --data-file <PATH>      Read & write tasks in the given file");
                println!("      --log-file <PATH>       Write log records to the given file");
                println!("      --week-start <DAY>      Start weeks on \"sunday\" (default) or \"monday\"");
                println!("  -h, --help                  Display this help message and exit");
                println!("  -V, --version               Show the program version and exit");
                Ok(())
            }
            Command::Version => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    Command::from_parser(Parser::from_env())?.run()
}

/// Send log records to `path`, as the terminal belongs to the UI.  The
/// filter is taken from `RUST_LOG`, defaulting to warnings and above.
fn init_logging(path: &Path) -> anyhow::Result<()> {
    if let Some(dir) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()?;
    Ok(())
}

fn with_terminal<F, T>(func: F) -> anyhow::Result<T>
where
    F: FnOnce(DefaultTerminal) -> anyhow::Result<T>,
{
    let terminal = ratatui::init();
    let r = func(terminal);
    ratatui::restore();
    r
}
