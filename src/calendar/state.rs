use super::grid::{first_of_month, last_of_month, OutOfTimeError};
use time::{Date, Duration};

/// The month on display and the day the user has selected.
///
/// The displayed month can be paged independently of the selection; moving
/// the selection into another month brings that month on display.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct CalendarState {
    // Always the first day of a month
    displayed: Date,
    selected: Date,
}

impl CalendarState {
    pub(crate) fn new(selected: Date) -> CalendarState {
        CalendarState {
            displayed: first_of_month(selected),
            selected,
        }
    }

    /// Returns the first day of the displayed month
    pub(crate) fn displayed(&self) -> Date {
        self.displayed
    }

    pub(crate) fn selected(&self) -> Date {
        self.selected
    }

    pub(crate) fn previous_month(&mut self) -> Result<(), OutOfTimeError> {
        let end_of_previous = self.displayed.previous_day().ok_or(OutOfTimeError)?;
        self.displayed = first_of_month(end_of_previous);
        log::debug!("Displaying month starting {}", self.displayed);
        Ok(())
    }

    pub(crate) fn next_month(&mut self) -> Result<(), OutOfTimeError> {
        self.displayed = last_of_month(self.displayed)
            .next_day()
            .ok_or(OutOfTimeError)?;
        log::debug!("Displaying month starting {}", self.displayed);
        Ok(())
    }

    pub(crate) fn select(&mut self, date: Date) {
        self.selected = date;
        self.displayed = first_of_month(date);
        log::debug!("Selected {date}");
    }

    pub(crate) fn move_selection(&mut self, days: i64) -> Result<(), OutOfTimeError> {
        let date = self
            .selected
            .checked_add(Duration::days(days))
            .ok_or(OutOfTimeError)?;
        self.select(date);
        Ok(())
    }
}
