use time::{Date, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset};

type OffsetLookup = fn(OffsetDateTime) -> Option<UtcOffset>;

/// The local time zone, as a mapping from instants to the UTC offset in force
/// at them.  Lookups that fail fall back to a fixed offset.
#[derive(Clone, Copy, Debug)]
pub(crate) struct LocalZone {
    fallback: UtcOffset,
    lookup: OffsetLookup,
}

impl LocalZone {
    pub(crate) fn with_rule(fallback: UtcOffset, lookup: OffsetLookup) -> LocalZone {
        LocalZone { fallback, lookup }
    }

    /// A zone that is always at `offset`
    pub(crate) fn fixed(offset: UtcOffset) -> LocalZone {
        LocalZone::with_rule(offset, |_| None)
    }

    /// The operating system's time zone.  The lookup fails once the process
    /// has more than one thread on some platforms, hence `fallback`.
    pub(crate) fn system(fallback: UtcOffset) -> LocalZone {
        LocalZone::with_rule(fallback, |when| UtcOffset::local_offset_at(when).ok())
    }

    pub(crate) fn offset_at(&self, when: OffsetDateTime) -> UtcOffset {
        (self.lookup)(when).unwrap_or(self.fallback)
    }

    /// Converts `when` to the wall-clock time of this zone
    pub(crate) fn to_local(&self, when: OffsetDateTime) -> OffsetDateTime {
        when.to_offset(self.offset_at(when))
    }

    /// The instant at which the wall clock reads `time` on `day`.  Wall-clock
    /// times skipped or repeated by an offset change resolve to the offset in
    /// force just before the change.
    pub(crate) fn at(&self, day: Date, time: Time) -> OffsetDateTime {
        let local = PrimitiveDateTime::new(day, time);
        let guess = local.assume_offset(self.fallback);
        local.assume_offset(self.offset_at(guess))
    }
}

impl From<UtcOffset> for LocalZone {
    fn from(offset: UtcOffset) -> LocalZone {
        LocalZone::fixed(offset)
    }
}

/// Central European time around the end of summer time in 2024
#[cfg(test)]
pub(crate) fn cet_2024() -> LocalZone {
    use time::macros::{datetime, offset};
    LocalZone::with_rule(offset!(+1), |when| {
        if datetime!(2024-03-31 1:00 UTC) <= when && when < datetime!(2024-10-27 1:00 UTC) {
            Some(offset!(+2))
        } else {
            Some(offset!(+1))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime, offset, time};

    #[test]
    fn test_fixed() {
        let zone = LocalZone::fixed(offset!(-5));
        assert_eq!(
            zone.to_local(datetime!(2024-07-01 12:00 UTC)),
            datetime!(2024-07-01 7:00 -5)
        );
        assert_eq!(
            zone.at(date!(2024 - 07 - 01), time!(9:15)),
            datetime!(2024-07-01 9:15 -5)
        );
    }

    #[test]
    fn test_offset_follows_date() {
        let zone = cet_2024();
        assert_eq!(zone.offset_at(datetime!(2024-10-11 0:30 +2)), offset!(+2));
        assert_eq!(zone.offset_at(datetime!(2024-11-05 0:30 +1)), offset!(+1));
        assert_eq!(
            zone.at(date!(2024 - 10 - 11), Time::MIDNIGHT),
            datetime!(2024-10-11 0:00 +2)
        );
        assert_eq!(
            zone.at(date!(2024 - 10 - 28), Time::MIDNIGHT),
            datetime!(2024-10-28 0:00 +1)
        );
        assert_eq!(
            zone.to_local(datetime!(2024-08-01 22:30 UTC)),
            datetime!(2024-08-02 0:30 +2)
        );
    }
}
