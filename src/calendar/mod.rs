mod util;
mod weeks;
mod widget;
mod zone;
pub(crate) use self::util::{
    is_current_hour, is_past_hour, is_same_day, DayRange, WeekStart, DAYS_IN_WEEK,
};
pub(crate) use self::weeks::WeekWindow;
pub(crate) use self::widget::{WeekStrip, MAIN_WIDTH, STRIP_HEIGHT};
#[cfg(test)]
pub(crate) use self::zone::cet_2024;
pub(crate) use self::zone::LocalZone;
use time::{error::IndeterminateOffset, Date, OffsetDateTime, UtcOffset};

/// Source of the current instant.  Everything that depends on "now" takes a
/// `Clock` so that it can be pinned in tests.
pub(crate) trait Clock {
    /// The current instant in local time
    fn now(&self) -> OffsetDateTime;

    fn zone(&self) -> LocalZone;

    fn today(&self) -> Date {
        self.now().date()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> OffsetDateTime {
        (**self).now()
    }

    fn zone(&self) -> LocalZone {
        (**self).zone()
    }
}

/// The wall clock in the system time zone
#[derive(Clone, Copy, Debug)]
pub(crate) struct SystemClock {
    zone: LocalZone,
}

impl SystemClock {
    // Must be called before any other threads are spawned, as determining the
    // local offset is unsound otherwise on some platforms.  The offset found
    // here is used whenever a later lookup fails.
    pub(crate) fn local() -> Result<SystemClock, IndeterminateOffset> {
        let offset = UtcOffset::current_local_offset()?;
        Ok(SystemClock {
            zone: LocalZone::system(offset),
        })
    }
}

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        self.zone.to_local(OffsetDateTime::now_utc())
    }

    fn zone(&self) -> LocalZone {
        self.zone
    }
}

#[cfg(test)]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct FixedClock(pub(crate) OffsetDateTime);

#[cfg(test)]
impl Clock for FixedClock {
    fn now(&self) -> OffsetDateTime {
        self.0
    }

    fn zone(&self) -> LocalZone {
        LocalZone::fixed(self.0.offset())
    }
}
