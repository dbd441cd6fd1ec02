use std::iter::successors;
use thiserror::Error;
use time::{Date, Month, OffsetDateTime, PrimitiveDateTime, UtcOffset, Weekday};

pub(crate) const DAYS_IN_WEEK: usize = 7;

/// A grid slot: a day of the displayed month, or padding
pub(crate) type DayCell = Option<Date>;

/// A value that names a single calendar day once a UTC offset has been agreed
/// on
pub(crate) trait CalendarDay {
    fn calendar_day(&self, offset: UtcOffset) -> Date;
}

impl CalendarDay for Date {
    fn calendar_day(&self, _offset: UtcOffset) -> Date {
        *self
    }
}

impl CalendarDay for PrimitiveDateTime {
    fn calendar_day(&self, _offset: UtcOffset) -> Date {
        self.date()
    }
}

impl CalendarDay for OffsetDateTime {
    fn calendar_day(&self, offset: UtcOffset) -> Date {
        self.to_offset(offset).date()
    }
}

/// Source of the current instant
pub(crate) trait Clock {
    fn now(&self) -> OffsetDateTime;

    /// The UTC offset currently in effect where the clock hangs, if known.
    /// This changes when daylight saving time starts or ends.
    fn local_offset(&self) -> Option<UtcOffset> {
        None
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }

    // Fails once the process has more than one thread on some platforms, in
    // which case the last known offset stays in use.
    fn local_offset(&self) -> Option<UtcOffset> {
        UtcOffset::current_local_offset().ok()
    }
}

// A fixed instant is a clock that never ticks.
impl Clock for OffsetDateTime {
    fn now(&self) -> OffsetDateTime {
        *self
    }
}

/// Day of the week numbered from 1 (Sunday) through 7 (Saturday)
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub(crate) struct WeekdayIndex(u8);

impl WeekdayIndex {
    pub(crate) const SUNDAY: WeekdayIndex = WeekdayIndex(1);
    pub(crate) const SATURDAY: WeekdayIndex = WeekdayIndex(7);

    pub(crate) fn get(self) -> u8 {
        self.0
    }

    /// Zero-based column of this weekday in a Sunday-first grid
    pub(crate) fn column(self) -> usize {
        usize::from(self.get() - 1)
    }

    pub(crate) fn weekday(self) -> Weekday {
        // `Weekday::Saturday.next()` is Sunday, so step forwards from
        // Saturday.
        let mut wd = Weekday::Saturday;
        for _ in 0..self.0 {
            wd = wd.next();
        }
        wd
    }

    /// All seven weekdays in display order
    pub(crate) fn all() -> impl Iterator<Item = WeekdayIndex> {
        (1..=7).map(WeekdayIndex)
    }
}

impl From<Weekday> for WeekdayIndex {
    fn from(wd: Weekday) -> WeekdayIndex {
        WeekdayIndex(wd.number_from_sunday())
    }
}

/// The cells of one month laid out in Sunday-first weeks.
///
/// Invariants:
///
/// - `cells.len()` is a nonzero multiple of seven.
/// - The `Some` cells are every day of `month` of `year` in ascending order.
/// - The first cell is the Sunday of the week containing the first of the
///   month.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct MonthGrid {
    year: i32,
    month: Month,
    cells: Vec<DayCell>,
}

impl MonthGrid {
    pub(crate) fn year(&self) -> i32 {
        self.year
    }

    pub(crate) fn month(&self) -> Month {
        self.month
    }

    pub(crate) fn cells(&self) -> &[DayCell] {
        &self.cells
    }

    pub(crate) fn weeks(&self) -> std::slice::ChunksExact<'_, DayCell> {
        self.cells().chunks_exact(DAYS_IN_WEEK)
    }

    pub(crate) fn week_count(&self) -> usize {
        self.cells.len() / DAYS_IN_WEEK
    }

    pub(crate) fn days(&self) -> impl Iterator<Item = Date> + '_ {
        let end = self.cells.len() - self.trailing_blanks();
        self.cells[self.leading_blanks()..end].iter().flatten().copied()
    }

    pub(crate) fn leading_blanks(&self) -> usize {
        self.cells.iter().take_while(|c| c.is_none()).count()
    }

    pub(crate) fn trailing_blanks(&self) -> usize {
        self.cells.iter().rev().take_while(|c| c.is_none()).count()
    }

    /// Returns the `(week, column)` at which `date` is drawn, or `None` if
    /// `date` is not in this month
    pub(crate) fn position(&self, date: Date) -> Option<(usize, usize)> {
        let i = self.leading_blanks() + self.days().position(|d| d == date)?;
        Some((i / DAYS_IN_WEEK, i % DAYS_IN_WEEK))
    }
}

/// Computes month grids and answers day comparisons in a single agreed UTC
/// offset, with "today" taken from a [`Clock`]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct MonthGridCalculator<C> {
    clock: C,
    offset: UtcOffset,
}

impl MonthGridCalculator<OffsetDateTime> {
    /// A calculator for which "today" is always `date`
    pub(crate) fn frozen_at(date: Date) -> Self {
        MonthGridCalculator::new(date.midnight().assume_utc(), UtcOffset::UTC)
    }
}

impl<C: Clock> MonthGridCalculator<C> {
    pub(crate) fn new(clock: C, offset: UtcOffset) -> Self {
        MonthGridCalculator { clock, offset }
    }

    pub(crate) fn offset(&self) -> UtcOffset {
        self.offset
    }

    /// Picks up a change in the clock's local UTC offset, so that "today" and
    /// midnight follow daylight saving time in long-running sessions
    pub(crate) fn refresh_offset(&mut self) {
        if let Some(offset) = self.clock.local_offset() {
            if offset != self.offset {
                log::info!("UTC offset changed from {} to {offset}", self.offset);
                self.offset = offset;
            }
        }
    }

    pub(crate) fn now(&self) -> OffsetDateTime {
        self.clock.now().to_offset(self.offset)
    }

    pub(crate) fn today(&self) -> Date {
        self.now().date()
    }

    pub(crate) fn month_grid<D: CalendarDay>(&self, reference: D) -> MonthGrid {
        month_grid(reference.calendar_day(self.offset))
    }

    pub(crate) fn week_days<D: CalendarDay>(
        &self,
        reference: D,
    ) -> Result<[Date; DAYS_IN_WEEK], OutOfTimeError> {
        week_days(reference.calendar_day(self.offset))
    }

    pub(crate) fn is_today<D: CalendarDay>(&self, date: D) -> bool {
        date.calendar_day(self.offset) == self.today()
    }

    pub(crate) fn is_same_day<A: CalendarDay, B: CalendarDay>(&self, a: A, b: B) -> bool {
        a.calendar_day(self.offset) == b.calendar_day(self.offset)
    }

    pub(crate) fn weekday_index<D: CalendarDay>(&self, date: D) -> WeekdayIndex {
        weekday_index(date.calendar_day(self.offset))
    }
}

pub(crate) fn month_grid(reference: Date) -> MonthGrid {
    let first = first_of_month(reference);
    let month = first.month();
    let leading = usize::from(first.weekday().number_days_from_sunday());
    let mut cells = Vec::with_capacity(6 * DAYS_IN_WEEK);
    cells.resize(leading, None);
    cells.extend(iter_days_from(first).take_while(|d| d.month() == month).map(Some));
    let trailing = (DAYS_IN_WEEK - cells.len() % DAYS_IN_WEEK) % DAYS_IN_WEEK;
    cells.resize(cells.len() + trailing, None);
    MonthGrid {
        year: first.year(),
        month,
        cells,
    }
}

pub(crate) fn week_days(reference: Date) -> Result<[Date; DAYS_IN_WEEK], OutOfTimeError> {
    let back = usize::from(reference.weekday().number_days_from_sunday());
    let sunday = successors(Some(reference), |d| d.previous_day())
        .nth(back)
        .ok_or(OutOfTimeError)?;
    let mut iter = iter_days_from(sunday);
    let mut days = [sunday; DAYS_IN_WEEK];
    for slot in &mut days {
        *slot = iter.next().ok_or(OutOfTimeError)?;
    }
    Ok(days)
}

pub(crate) fn weekday_index(date: Date) -> WeekdayIndex {
    WeekdayIndex::from(date.weekday())
}

pub(crate) fn first_of_month(date: Date) -> Date {
    date.replace_day(1)
        .expect("the first day should exist in every month")
}

pub(crate) fn last_of_month(date: Date) -> Date {
    date.replace_day(date.month().length(date.year()))
        .expect("the last day of a month should be a valid day of that month")
}

// Iterates over `date` and every day after it
fn iter_days_from(date: Date) -> impl Iterator<Item = Date> {
    successors(Some(date), |d| d.next_day())
}

#[derive(Copy, Clone, Debug, Eq, Error, PartialEq)]
#[error("reached the end of time")]
pub(crate) struct OutOfTimeError;
