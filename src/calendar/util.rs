use super::{Clock, LocalZone};
use std::fmt;
use std::iter::successors;
use std::str::FromStr;
use thiserror::Error;
use time::{Date, OffsetDateTime, Time, UtcOffset, Weekday};
use uuid::Uuid;

pub(crate) const DAYS_IN_WEEK: usize = 7;

/// The day on which every week begins
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub(crate) enum WeekStart {
    #[default]
    Sunday,
    Monday,
}

impl WeekStart {
    /// Returns the number of days between the start of the week and `wd`
    pub(crate) fn index0(self, wd: Weekday) -> u8 {
        match self {
            WeekStart::Sunday => wd.number_days_from_sunday(),
            WeekStart::Monday => wd.number_days_from_monday(),
        }
    }
}

impl fmt::Display for WeekStart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeekStart::Sunday => write!(f, "sunday"),
            WeekStart::Monday => write!(f, "monday"),
        }
    }
}

impl FromStr for WeekStart {
    type Err = ParseWeekStartError;

    fn from_str(s: &str) -> Result<WeekStart, ParseWeekStartError> {
        match s.to_ascii_lowercase().as_str() {
            "sunday" | "sun" => Ok(WeekStart::Sunday),
            "monday" | "mon" => Ok(WeekStart::Monday),
            _ => Err(ParseWeekStartError),
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, Error, PartialEq)]
#[error(r#"invalid week start; expected "sunday" or "monday""#)]
pub(crate) struct ParseWeekStartError;

/// A single day of a [`Week`].
///
/// The `id` only gives each rendered cell a stable identity; two `WeekDay`s
/// compare equal whenever their dates do.
#[derive(Clone, Copy, Debug)]
pub(crate) struct WeekDay {
    pub(crate) id: Uuid,
    pub(crate) date: Date,
}

impl WeekDay {
    fn new(date: Date) -> WeekDay {
        WeekDay {
            id: Uuid::new_v4(),
            date,
        }
    }
}

impl PartialEq for WeekDay {
    fn eq(&self, other: &WeekDay) -> bool {
        self.date == other.date
    }
}

impl Eq for WeekDay {}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
// Invariant: The days are consecutive, and the first one falls on the week
// start the week was built for.
pub(crate) struct Week([WeekDay; DAYS_IN_WEEK]);

impl Week {
    pub(crate) fn days(&self) -> &[WeekDay; DAYS_IN_WEEK] {
        &self.0
    }

    pub(crate) fn first(&self) -> Date {
        self.0[0].date
    }

    pub(crate) fn last(&self) -> Date {
        self.0[DAYS_IN_WEEK - 1].date
    }

    pub(crate) fn contains(&self, date: Date) -> bool {
        (self.first()..=self.last()).contains(&date)
    }

    pub(crate) fn position(&self, date: Date) -> Option<usize> {
        self.0.iter().position(|wd| wd.date == date)
    }

    pub(crate) fn get(&self, index: usize) -> Option<Date> {
        self.0.get(index).map(|wd| wd.date)
    }
}

/// Returns the week containing `date`, or `None` if part of that week lies
/// outside the range of representable dates
pub(crate) fn week_of(date: Date, week_start: WeekStart) -> Option<Week> {
    let back = usize::from(week_start.index0(date.weekday()));
    let first = iter_days_before(date).nth(back)?;
    let days = iter_days_after(first)
        .take(DAYS_IN_WEEK)
        .map(WeekDay::new)
        .collect::<Vec<_>>();
    days.try_into().ok().map(Week)
}

pub(crate) fn next_week(week: &Week, week_start: WeekStart) -> Option<Week> {
    week.last()
        .next_day()
        .and_then(|d| week_of(d, week_start))
}

pub(crate) fn previous_week(week: &Week, week_start: WeekStart) -> Option<Week> {
    week.first()
        .previous_day()
        .and_then(|d| week_of(d, week_start))
}

/// The instant at which `day` begins in `zone`
pub(crate) fn start_of_day(day: Date, zone: &LocalZone) -> OffsetDateTime {
    zone.at(day, Time::MIDNIGHT)
}

/// Tests whether `b` falls on the same calendar day as `a`, as seen from the
/// offset of `a`
pub(crate) fn is_same_day(a: OffsetDateTime, b: OffsetDateTime) -> bool {
    a.date() == b.to_offset(a.offset()).date()
}

pub(crate) fn is_today<C: Clock>(date: Date, clock: &C) -> bool {
    date == clock.today()
}

pub(crate) fn is_current_hour<C: Clock>(when: OffsetDateTime, clock: &C) -> bool {
    let now = clock.now();
    hour_of(when, now.offset()) == hour_of(now, now.offset())
}

pub(crate) fn is_past_hour<C: Clock>(when: OffsetDateTime, clock: &C) -> bool {
    let now = clock.now();
    hour_of(when, now.offset()) < hour_of(now, now.offset())
}

fn hour_of(when: OffsetDateTime, offset: UtcOffset) -> (Date, u8) {
    let when = when.to_offset(offset);
    (when.date(), when.hour())
}

/// The half-open span of instants making up one local calendar day.  Days on
/// which the zone's offset changes are longer or shorter than 24 hours.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct DayRange {
    start: OffsetDateTime,
    // `None` for the last representable day
    end: Option<OffsetDateTime>,
}

impl DayRange {
    pub(crate) fn new(day: Date, zone: &LocalZone) -> DayRange {
        DayRange {
            start: start_of_day(day, zone),
            end: day.next_day().map(|d| start_of_day(d, zone)),
        }
    }

    pub(crate) fn contains(&self, when: OffsetDateTime) -> bool {
        self.start <= when && !matches!(self.end, Some(end) if end <= when)
    }
}

fn iter_days_after(date: Date) -> impl Iterator<Item = Date> {
    successors(Some(date), |&d| d.next_day())
}

fn iter_days_before(date: Date) -> impl Iterator<Item = Date> {
    successors(Some(date), |&d| d.previous_day())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{cet_2024, FixedClock};
    use time::macros::{date, datetime, offset};
    use time::Duration;

    fn dates(week: &Week) -> Vec<Date> {
        week.days().iter().map(|wd| wd.date).collect()
    }

    #[test]
    fn test_week_of_midweek() {
        let week = week_of(date!(2023 - 11 - 16), WeekStart::Sunday).unwrap();
        assert_eq!(
            dates(&week),
            [
                date!(2023 - 11 - 12),
                date!(2023 - 11 - 13),
                date!(2023 - 11 - 14),
                date!(2023 - 11 - 15),
                date!(2023 - 11 - 16),
                date!(2023 - 11 - 17),
                date!(2023 - 11 - 18),
            ]
        );
    }

    #[test]
    fn test_week_of_from_sunday() {
        let week = week_of(date!(2023 - 11 - 12), WeekStart::Sunday).unwrap();
        assert_eq!(week.first(), date!(2023 - 11 - 12));
        assert_eq!(week.last(), date!(2023 - 11 - 18));
    }

    #[test]
    fn test_week_of_from_saturday() {
        let week = week_of(date!(2023 - 11 - 18), WeekStart::Sunday).unwrap();
        assert_eq!(week.first(), date!(2023 - 11 - 12));
        assert_eq!(week.last(), date!(2023 - 11 - 18));
    }

    #[test]
    fn test_week_of_monday_start() {
        let week = week_of(date!(2023 - 11 - 12), WeekStart::Monday).unwrap();
        assert_eq!(week.first(), date!(2023 - 11 - 06));
        assert_eq!(week.first().weekday(), Weekday::Monday);
        assert_eq!(week.last(), date!(2023 - 11 - 12));
    }

    #[test]
    fn test_week_of_across_year() {
        let week = week_of(date!(2024 - 12 - 31), WeekStart::Sunday).unwrap();
        assert_eq!(week.first(), date!(2024 - 12 - 29));
        assert_eq!(week.last(), date!(2025 - 01 - 04));
    }

    #[test]
    fn test_week_shape() {
        for week_start in [WeekStart::Sunday, WeekStart::Monday] {
            let mut date = date!(2023 - 12 - 20);
            for _ in 0..60 {
                let week = week_of(date, week_start).unwrap();
                assert!(week.contains(date));
                assert_eq!(week_start.index0(week.first().weekday()), 0);
                for pair in week.days().windows(2) {
                    assert_eq!(pair[0].date.next_day(), Some(pair[1].date));
                }
                date = date.next_day().unwrap();
            }
        }
    }

    #[test]
    fn test_week_of_end_of_time() {
        // 9999-12-31 is a Friday, so its week would run into year 10000
        assert_eq!(week_of(Date::MAX, WeekStart::Sunday), None);
        assert_eq!(week_of(Date::MAX, WeekStart::Monday), None);
    }

    #[test]
    fn test_next_previous_round_trip() {
        for week_start in [WeekStart::Sunday, WeekStart::Monday] {
            let week = week_of(date!(2024 - 02 - 28), week_start).unwrap();
            let next = next_week(&week, week_start).unwrap();
            let prev = previous_week(&week, week_start).unwrap();
            assert_eq!(next.first(), week.last().next_day().unwrap());
            assert_eq!(prev.last(), week.first().previous_day().unwrap());
            assert_eq!(previous_week(&next, week_start), Some(week));
            assert_eq!(next_week(&prev, week_start), Some(week));
        }
    }

    #[test]
    fn test_weekday_ids_ignored_in_equality() {
        let a = week_of(date!(2024 - 05 - 01), WeekStart::Sunday).unwrap();
        let b = week_of(date!(2024 - 05 - 02), WeekStart::Sunday).unwrap();
        assert_ne!(a.days()[0].id, b.days()[0].id);
        assert_eq!(a, b);
    }

    #[test]
    fn test_start_of_day() {
        assert_eq!(
            start_of_day(date!(2024 - 09 - 08), &LocalZone::fixed(offset!(+2))),
            datetime!(2024-09-08 0:00 +2)
        );
        let zone = cet_2024();
        assert_eq!(
            start_of_day(date!(2024 - 10 - 27), &zone),
            datetime!(2024-10-27 0:00 +2)
        );
        assert_eq!(
            start_of_day(date!(2024 - 10 - 28), &zone),
            datetime!(2024-10-28 0:00 +1)
        );
    }

    #[test]
    fn test_day_range() {
        let range = DayRange::new(date!(2024 - 09 - 08), &LocalZone::fixed(offset!(+2)));
        assert!(!range.contains(datetime!(2024-09-07 23:59:59 +2)));
        assert!(range.contains(datetime!(2024-09-08 0:00 +2)));
        assert!(range.contains(datetime!(2024-09-08 23:59:59 +2)));
        assert!(!range.contains(datetime!(2024-09-09 0:00 +2)));
        // 23:30 UTC on the 7th is already the 8th two hours east
        assert!(range.contains(datetime!(2024-09-07 23:30 UTC)));
        assert!(!range.contains(datetime!(2024-09-08 22:30 UTC)));
    }

    #[test]
    fn test_day_range_last_day() {
        let range = DayRange::new(Date::MAX, &LocalZone::fixed(offset!(UTC)));
        assert!(range.contains(Date::MAX.with_hms(23, 0, 0).unwrap().assume_utc()));
    }

    #[test]
    fn test_day_range_across_offset_change() {
        // Summer time ends at 03:00 on the 27th, so that day lasts 25 hours
        let range = DayRange::new(date!(2024 - 10 - 27), &cet_2024());
        assert!(!range.contains(datetime!(2024-10-26 23:59 +2)));
        assert!(range.contains(datetime!(2024-10-27 0:00 +2)));
        assert!(range.contains(datetime!(2024-10-27 23:59 +1)));
        assert!(!range.contains(datetime!(2024-10-28 0:00 +1)));
    }

    #[test]
    fn test_is_same_day() {
        assert!(is_same_day(
            datetime!(2024-09-08 0:10 +2),
            datetime!(2024-09-07 22:30 UTC)
        ));
        assert!(!is_same_day(
            datetime!(2024-09-08 0:10 UTC),
            datetime!(2024-09-07 22:30 UTC)
        ));
    }

    #[test]
    fn test_clock_predicates() {
        let clock = FixedClock(datetime!(2024-09-08 14:20 +2));
        assert!(is_today(date!(2024 - 09 - 08), &clock));
        assert!(!is_today(date!(2024 - 09 - 09), &clock));
        assert!(is_current_hour(datetime!(2024-09-08 14:00 +2), &clock));
        assert!(is_current_hour(datetime!(2024-09-08 12:59 UTC), &clock));
        assert!(!is_current_hour(datetime!(2024-09-08 15:00 +2), &clock));
        assert!(is_past_hour(datetime!(2024-09-08 13:59 +2), &clock));
        assert!(is_past_hour(datetime!(2024-09-07 18:00 +2), &clock));
        assert!(!is_past_hour(datetime!(2024-09-08 14:00 +2), &clock));
        assert!(!is_past_hour(
            datetime!(2024-09-08 14:00 +2) + Duration::hours(1),
            &clock
        ));
    }

    #[test]
    fn test_parse_week_start() {
        assert_eq!("Sunday".parse::<WeekStart>(), Ok(WeekStart::Sunday));
        assert_eq!("mon".parse::<WeekStart>(), Ok(WeekStart::Monday));
        assert_eq!("friday".parse::<WeekStart>(), Err(ParseWeekStartError));
    }
}
