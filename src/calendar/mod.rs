mod grid;
mod state;
mod widget;
pub(crate) use self::grid::{
    Clock, MonthGridCalculator, OutOfTimeError, SystemClock, WeekdayIndex, DAYS_IN_WEEK,
};
pub(crate) use self::state::CalendarState;
pub(crate) use self::widget::{MonthView, MAIN_WIDTH, MAX_HEIGHT};
use ratatui::style::Style;

/// Picks the style in which the days of a given weekday are drawn
pub(crate) trait DateStyler {
    fn weekday_style(&self, weekday: WeekdayIndex) -> Style;
}
