use super::util::{next_week, previous_week, week_of, Week, WeekStart};
use super::Clock;
use thiserror::Error;
use time::Date;

/// Number of weeks kept loaded at once
pub(crate) const WINDOW_SIZE: usize = 3;

const MIDDLE: usize = WINDOW_SIZE / 2;

const LAST: usize = WINDOW_SIZE - 1;

/// A ring of three consecutive weeks backing a horizontally paged week
/// strip.
///
/// Only one week is shown at a time (the *active* page).  Paging onto the
/// first or last page arms `pending_expand`; once the presentation layer
/// reports that the page has settled, [`WeekWindow::on_boundary_reached()`]
/// rotates a fresh week in on that side and drops the one on the far side, so
/// the active page is back in the middle and the user can keep paging in
/// either direction.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct WeekWindow {
    week_start: WeekStart,
    weeks: [Week; WINDOW_SIZE],
    active: usize,
    pending_expand: bool,
    selected: Date,
}

impl WeekWindow {
    pub(crate) fn around(date: Date, week_start: WeekStart) -> Result<WeekWindow, WindowError> {
        let weeks = weeks_around(date, week_start)?;
        Ok(WeekWindow {
            week_start,
            weeks,
            active: MIDDLE,
            pending_expand: false,
            selected: date,
        })
    }

    pub(crate) fn weeks(&self) -> &[Week; WINDOW_SIZE] {
        &self.weeks
    }

    pub(crate) fn active_index(&self) -> usize {
        self.active
    }

    pub(crate) fn active_week(&self) -> &Week {
        &self.weeks[self.active]
    }

    pub(crate) fn pending_expand(&self) -> bool {
        self.pending_expand
    }

    /// The day whose tasks are being shown
    pub(crate) fn selected(&self) -> Date {
        self.selected
    }

    pub(crate) fn week_start(&self) -> WeekStart {
        self.week_start
    }

    pub(crate) fn reset_to_today<C: Clock>(&mut self, clock: &C) -> Result<(), WindowError> {
        self.reset_to(clock.today())
    }

    /// Rebuilds the window around `date`, makes the middle week active, and
    /// selects `date`.  On failure, nothing is changed.
    pub(crate) fn reset_to(&mut self, date: Date) -> Result<(), WindowError> {
        let weeks = weeks_around(date, self.week_start).inspect_err(|e| {
            log::warn!("Cannot build week window around {date}: {e}");
        })?;
        self.weeks = weeks;
        self.active = MIDDLE;
        self.pending_expand = false;
        self.selected = date;
        Ok(())
    }

    /// Record that the page at `index` is now the one being shown
    pub(crate) fn on_page_changed(&mut self, index: usize) -> Result<(), WindowError> {
        if index >= WINDOW_SIZE {
            return Err(WindowError::NoSuchPage(index));
        }
        self.active = index;
        self.pending_expand = index == 0 || index == LAST;
        Ok(())
    }

    pub(crate) fn page_forwards(&mut self) -> Result<(), WindowError> {
        self.on_page_changed(self.active + 1)
    }

    pub(crate) fn page_backwards(&mut self) -> Result<(), WindowError> {
        match self.active.checked_sub(1) {
            Some(index) => self.on_page_changed(index),
            None => Err(WindowError::NoSuchPage(0)),
        }
    }

    /// Called once the active page has fully settled into view.  If that
    /// page is a boundary page and an expansion is pending, rotates the
    /// window.  Returns whether a rotation took place.
    ///
    /// The pending flag is consumed even when the adjacent week cannot be
    /// computed, so a single boundary visit never triggers more than one
    /// attempt.
    pub(crate) fn on_boundary_reached(&mut self) -> Result<bool, WindowError> {
        if !std::mem::replace(&mut self.pending_expand, false) {
            return Ok(false);
        }
        match self.active {
            0 => {
                let Some(week) = previous_week(&self.weeks[0], self.week_start) else {
                    log::warn!("No week before {}; window left as is", self.weeks[0].first());
                    return Err(WindowError::CalendarComputationEmpty);
                };
                self.weeks.rotate_right(1);
                self.weeks[0] = week;
            }
            LAST => {
                let Some(week) = next_week(&self.weeks[LAST], self.week_start) else {
                    log::warn!("No week after {}; window left as is", self.weeks[LAST].last());
                    return Err(WindowError::CalendarComputationEmpty);
                };
                self.weeks.rotate_left(1);
                self.weeks[LAST] = week;
            }
            _ => return Ok(false),
        }
        self.active = MIDDLE;
        log::debug!(
            "Rotated week window; now {} through {}",
            self.weeks[0].first(),
            self.weeks[LAST].last()
        );
        Ok(true)
    }

    /// Select `date`, which must lie in one of the loaded weeks
    pub(crate) fn select_day(&mut self, date: Date) -> Result<(), WindowError> {
        if self.weeks.iter().any(|w| w.contains(date)) {
            self.selected = date;
            Ok(())
        } else {
            Err(WindowError::DayNotLoaded(date))
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, Error, PartialEq)]
pub(crate) enum WindowError {
    #[error("calendar computation yielded no week")]
    CalendarComputationEmpty,
    #[error("there is no page {0} in the week window")]
    NoSuchPage(usize),
    #[error("{0} is not in a loaded week")]
    DayNotLoaded(Date),
}

fn weeks_around(date: Date, week_start: WeekStart) -> Result<[Week; WINDOW_SIZE], WindowError> {
    let current = week_of(date, week_start).ok_or(WindowError::CalendarComputationEmpty)?;
    let previous =
        previous_week(&current, week_start).ok_or(WindowError::CalendarComputationEmpty)?;
    let next = next_week(&current, week_start).ok_or(WindowError::CalendarComputationEmpty)?;
    Ok([previous, current, next])
}
