use crate::calendar::OutOfTimeError;
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};

/// What the home widget shows until its next refresh
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct TimelineEntry {
    pub(crate) date: Date,
}

/// A single entry plus the instant after which it goes stale: the start of
/// the following day in the same offset
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Timeline {
    entry: TimelineEntry,
    refresh_at: OffsetDateTime,
}

impl Timeline {
    pub(crate) fn starting_at(now: OffsetDateTime) -> Result<Timeline, OutOfTimeError> {
        let tomorrow = now.date().next_day().ok_or(OutOfTimeError)?;
        let refresh_at =
            PrimitiveDateTime::new(tomorrow, Time::MIDNIGHT).assume_offset(now.offset());
        Ok(Timeline {
            entry: TimelineEntry { date: now.date() },
            refresh_at,
        })
    }

    pub(crate) fn entry(&self) -> TimelineEntry {
        self.entry
    }

    pub(crate) fn refresh_at(&self) -> OffsetDateTime {
        self.refresh_at
    }

    /// Time left until the refresh, or zero if it is already due
    pub(crate) fn delay_from(&self, now: OffsetDateTime) -> std::time::Duration {
        std::time::Duration::try_from(self.refresh_at - now).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    #[test]
    fn test_refresh_at_next_midnight() {
        let now = datetime!(2025-01-22 09:30 +9);
        let timeline = Timeline::starting_at(now).unwrap();
        assert_eq!(timeline.entry().date, date!(2025 - 01 - 22));
        assert_eq!(timeline.refresh_at(), datetime!(2025-01-23 00:00 +9));
        assert_eq!(
            timeline.delay_from(now),
            std::time::Duration::from_secs(14 * 3600 + 30 * 60)
        );
    }

    #[test]
    fn test_refresh_across_year() {
        let timeline = Timeline::starting_at(datetime!(2024-12-31 23:59:59 -5)).unwrap();
        assert_eq!(timeline.entry().date, date!(2024 - 12 - 31));
        assert_eq!(timeline.refresh_at(), datetime!(2025-01-01 00:00 -5));
    }

    #[test]
    fn test_overdue_refresh() {
        let timeline = Timeline::starting_at(datetime!(2025-01-22 09:30 UTC)).unwrap();
        assert_eq!(
            timeline.delay_from(datetime!(2025-01-23 00:00:01 UTC)),
            std::time::Duration::ZERO
        );
    }

    #[test]
    fn test_end_of_time() {
        let now = PrimitiveDateTime::new(Date::MAX, Time::MIDNIGHT).assume_utc();
        assert_eq!(Timeline::starting_at(now), Err(OutOfTimeError));
    }
}
