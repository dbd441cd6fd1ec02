use crate::calendar::{DateStyler, WeekdayIndex};
use crate::theme::{BASE_STYLE, SATURDAY_STYLE, SUNDAY_STYLE};
use ratatui::style::Style;

/// Colors Sundays red and Saturdays blue
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct WeekendStyler;

impl DateStyler for WeekendStyler {
    fn weekday_style(&self, weekday: WeekdayIndex) -> Style {
        match weekday {
            WeekdayIndex::SUNDAY => SUNDAY_STYLE,
            WeekdayIndex::SATURDAY => SATURDAY_STYLE,
            _ => BASE_STYLE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Weekday;

    #[test]
    fn test_weekday_style() {
        let style = |wd: Weekday| WeekendStyler.weekday_style(WeekdayIndex::from(wd));
        assert_eq!(style(Weekday::Sunday), SUNDAY_STYLE);
        assert_eq!(style(Weekday::Wednesday), BASE_STYLE);
        assert_eq!(style(Weekday::Saturday), SATURDAY_STYLE);
    }
}
