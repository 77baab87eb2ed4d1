use crate::calendar::{Clock, WeekStrip, WeekWindow, DAYS_IN_WEEK, MAIN_WIDTH, STRIP_HEIGHT};
use crate::coordinator::{Coordinator, EditState};
use crate::editor::{DraftInput, Editor};
use crate::help::Help;
use crate::store::{DayQuery, ObjectStore, StoreError, TaskStore};
use crate::task::Task;
use crate::tasklist::TaskList;
use crate::theme::{BASE_STYLE, NOTICE_STYLE, PAGER_STYLE};
use crossterm::event::{read, KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    backend::Backend,
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Paragraph, Widget},
    Terminal,
};
use std::error::Error;
use std::io::{self, Write};
use time::OffsetDateTime;

static HINT: &str = "Press ? for help";

#[derive(Debug)]
pub(crate) struct App<C, O> {
    clock: C,
    weeks: WeekWindow,
    store: TaskStore<O>,
    tasks: DayQuery,
    // Index into `tasks` of the highlighted row
    cursor: usize,
    editor: Coordinator,
    notice: Option<String>,
    state: AppState,
}

impl<C: Clock, O: ObjectStore> App<C, O> {
    pub(crate) fn new(clock: C, weeks: WeekWindow, store: TaskStore<O>) -> App<C, O> {
        let mut app = App {
            clock,
            tasks: DayQuery::new(weeks.selected()),
            weeks,
            store,
            cursor: 0,
            editor: Coordinator::new(),
            notice: None,
            state: AppState::Browsing,
        };
        app.refresh();
        app
    }

    pub(crate) fn run<B: Backend>(mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        while !self.quitting() {
            self.draw(terminal)?;
            if !self.settle() {
                self.beep()?;
            }
            self.handle_input()?;
        }
        Ok(())
    }

    fn draw<B: Backend>(&self, terminal: &mut Terminal<B>) -> io::Result<()> {
        terminal.draw(|frame| frame.render_widget(self, frame.area()))?;
        Ok(())
    }

    // Called once the frame showing the current page has been drawn, which
    // is when a pending boundary expansion takes effect.  Returns `false` if
    // the window could not be extended.
    fn settle(&mut self) -> bool {
        !self.weeks.pending_expand() || self.weeks.on_boundary_reached().is_ok()
    }

    fn handle_input(&mut self) -> io::Result<()> {
        let normal_modifiers = KeyModifiers::NONE | KeyModifiers::SHIFT;
        if let Some(KeyEvent {
            code, modifiers, ..
        }) = read()?.as_key_press_event()
        {
            if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
                self.state = AppState::Quitting;
            } else if !normal_modifiers.contains(modifiers) || !self.handle_key(code) {
                self.beep()?;
            }
        }
        // else: Redraw on resize, and we might as well redraw on other stuff
        // too
        Ok(())
    }

    // Returns `false` if the user pressed an invalid key
    fn handle_key(&mut self, key: KeyCode) -> bool {
        self.notice = None;
        let ok = if self.editor.is_open() {
            self.handle_editor_key(key)
        } else {
            match self.state {
                AppState::Browsing => self.handle_browse_key(key),
                AppState::Helping => {
                    self.state = AppState::Browsing;
                    true
                }
                AppState::Quitting => false,
            }
        };
        self.refresh();
        ok
    }

    fn handle_browse_key(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Char('h') | KeyCode::Left => self.step_day(false),
            KeyCode::Char('l') | KeyCode::Right => self.step_day(true),
            KeyCode::Char(c @ '1'..='7') => self.select_column(c),
            KeyCode::Char('[') | KeyCode::PageUp => self.weeks.page_backwards().is_ok(),
            KeyCode::Char(']') | KeyCode::PageDown => self.weeks.page_forwards().is_ok(),
            KeyCode::Char('0') | KeyCode::Home => self.weeks.reset_to_today(&self.clock).is_ok(),
            KeyCode::Char('j') | KeyCode::Down => self.cursor_down(),
            KeyCode::Char('k') | KeyCode::Up => self.cursor_up(),
            KeyCode::Char(' ') | KeyCode::Enter => self.toggle_current(),
            KeyCode::Char('a') => {
                let when = self.default_when();
                self.editor.begin_create(when)
            }
            KeyCode::Char('e') => self
                .current_task()
                .cloned()
                .is_some_and(|task| self.editor.begin_edit(task)),
            KeyCode::Char('d') | KeyCode::Delete => self.delete_current(),
            KeyCode::Char('m') => {
                let r = self.store.add_sample_tasks(self.clock.now()).map(|_| ());
                self.after_bulk_change(r)
            }
            KeyCode::Char('X') => {
                let r = self.store.delete_all();
                self.after_bulk_change(r)
            }
            KeyCode::Char('?') => {
                self.state = AppState::Helping;
                true
            }
            KeyCode::Char('q') | KeyCode::Esc => {
                self.state = AppState::Quitting;
                true
            }
            _ => false,
        }
    }

    fn handle_editor_key(&mut self, key: KeyCode) -> bool {
        let input = match key {
            KeyCode::Esc => {
                self.editor.cancel();
                return true;
            }
            KeyCode::Enter => return self.save_draft(),
            KeyCode::Tab => DraftInput::NextField,
            KeyCode::BackTab => DraftInput::PreviousField,
            KeyCode::Left => DraftInput::Decrease,
            KeyCode::Right => DraftInput::Increase,
            KeyCode::Up => DraftInput::BigIncrease,
            KeyCode::Down => DraftInput::BigDecrease,
            KeyCode::Backspace => DraftInput::Backspace,
            KeyCode::Char(c) => DraftInput::Char(c),
            _ => return false,
        };
        self.editor
            .draft_mut()
            .is_some_and(|draft| draft.handle_input(input))
    }

    fn beep(&self) -> io::Result<()> {
        io::stdout().write_all(b"\x07")
    }

    fn quitting(&self) -> bool {
        self.state == AppState::Quitting
    }

    /// Bring the task list in line with the selected day and the store
    fn refresh(&mut self) {
        let selected = self.weeks.selected();
        if self.tasks.day() != selected {
            self.tasks.set_day(selected);
            self.cursor = 0;
        }
        // The cursor stays valid while the list is unchanged
        if self.tasks.refresh(&self.store) {
            self.cursor = self
                .cursor
                .min(self.tasks.tasks().len().saturating_sub(1));
        }
    }

    fn current_task(&self) -> Option<&Task> {
        self.tasks.tasks().get(self.cursor)
    }

    // Moves within the week being shown.  If the selected day is on another
    // page, the first (or last) day of the shown week is selected instead.
    fn step_day(&mut self, forwards: bool) -> bool {
        let week = self.weeks.active_week();
        let index = match week.position(self.weeks.selected()) {
            Some(i) if forwards => i.checked_add(1),
            Some(i) => i.checked_sub(1),
            None if forwards => Some(0),
            None => Some(DAYS_IN_WEEK - 1),
        };
        match index.and_then(|i| week.get(i)) {
            Some(date) => self.weeks.select_day(date).is_ok(),
            None => false,
        }
    }

    fn select_column(&mut self, c: char) -> bool {
        let Some(index) = ('1'..='7').position(|d| d == c) else {
            return false;
        };
        match self.weeks.active_week().get(index) {
            Some(date) => self.weeks.select_day(date).is_ok(),
            None => false,
        }
    }

    fn cursor_down(&mut self) -> bool {
        if self.cursor + 1 < self.tasks.tasks().len() {
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    fn cursor_up(&mut self) -> bool {
        match self.cursor.checked_sub(1) {
            Some(c) => {
                self.cursor = c;
                true
            }
            None => false,
        }
    }

    fn toggle_current(&mut self) -> bool {
        let Some(task) = self.current_task().cloned() else {
            return false;
        };
        if let Err(e) = self.store.toggle_completed(&task) {
            self.report(&e);
        }
        true
    }

    fn delete_current(&mut self) -> bool {
        let Some(task) = self.current_task().cloned() else {
            return false;
        };
        if let Err(e) = self.store.delete(&task) {
            self.report(&e);
        }
        true
    }

    fn after_bulk_change(&mut self, r: Result<(), StoreError>) -> bool {
        match r {
            Ok(()) => {
                // Failure was already logged and leaves the window as it was
                let _ = self.weeks.reset_to_today(&self.clock);
            }
            Err(e) => self.report(&e),
        }
        true
    }

    fn save_draft(&mut self) -> bool {
        match self.editor.save(&mut self.store) {
            Ok(Some(task)) => {
                self.follow(&task);
                true
            }
            Ok(None) | Err(StoreError::Validation(_)) => false,
            Err(e) => {
                self.report(&e);
                true
            }
        }
    }

    // Select the day of a just-saved task and put the cursor on it.  The
    // window is rebuilt around that day if it isn't loaded.
    fn follow(&mut self, task: &Task) {
        let day = self.clock.zone().to_local(task.created_at).date();
        let r = if self.weeks.weeks().iter().any(|w| w.contains(day)) {
            self.weeks.select_day(day)
        } else {
            self.weeks.reset_to(day)
        };
        if r.is_ok() {
            self.refresh();
            if let Some(i) = self.tasks.tasks().iter().position(|t| t.id == task.id) {
                self.cursor = i;
            }
        }
    }

    /// New tasks start on the selected day at the current time of day, in
    /// the offset in force on that day
    fn default_when(&self) -> OffsetDateTime {
        self.clock
            .zone()
            .at(self.weeks.selected(), self.clock.now().time())
    }

    fn report(&mut self, e: &StoreError) {
        self.notice = Some(describe(e));
    }
}

impl<C: Clock, O: ObjectStore> Widget for &App<C, O> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, BASE_STYLE);
        let [strip_area, _, list_area, status_area] = Layout::vertical([
            Constraint::Length(STRIP_HEIGHT),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(area);
        WeekStrip::new(&self.weeks, &self.clock).render(strip_area, buf);
        let [list_area] = Layout::horizontal([MAIN_WIDTH])
            .flex(Flex::Center)
            .areas(list_area);
        TaskList::new(self.tasks.tasks(), self.cursor, &self.clock).render(list_area, buf);
        let status = match &self.notice {
            Some(msg) => Paragraph::new(msg.as_str()).style(NOTICE_STYLE),
            None => Paragraph::new(HINT).style(PAGER_STYLE),
        };
        status.centered().render(status_area, buf);
        if let Some(draft) = self.editor.draft() {
            let editing = matches!(self.editor.state(), EditState::Editing { .. });
            Editor::new(draft, editing).render(area, buf);
        } else if self.state == AppState::Helping {
            Help(BASE_STYLE).render(area, buf);
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum AppState {
    Browsing,
    Helping,
    Quitting,
}

/// Render an error and its chain of causes on one line
fn describe(e: &dyn Error) -> String {
    let mut msg = e.to_string();
    let mut source = e.source();
    while let Some(cause) = source {
        msg.push_str(": ");
        msg.push_str(&cause.to_string());
        source = cause.source();
    }
    msg
}
