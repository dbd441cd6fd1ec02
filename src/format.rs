use std::str::FromStr;
use thiserror::Error;
use time::{Date, Month, Weekday};

/// Locale-specific labels for dates and their parts
pub(crate) trait DateFormatter {
    /// Title for a whole month, e.g., "January 2025"
    fn month_year(&self, year: i32, month: Month) -> String;

    fn month(&self, month: Month) -> &'static str;

    fn weekday(&self, weekday: Weekday) -> &'static str;

    /// Abbreviation used for column headers
    fn short_weekday(&self, weekday: Weekday) -> &'static str;

    fn day(&self, date: Date) -> String {
        date.day().to_string()
    }

    /// Long form of a date, e.g., "January 22, 2025"
    fn full_date(&self, date: Date) -> String;

    /// Heading shown above the selected date
    fn selected_heading(&self) -> &'static str;
}

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub(crate) enum Locale {
    #[default]
    English,
    Korean,
}

impl DateFormatter for Locale {
    fn month_year(&self, year: i32, month: Month) -> String {
        match self {
            Locale::English => format!("{} {year}", self.month(month)),
            Locale::Korean => format!("{year}년 {}", self.month(month)),
        }
    }

    fn month(&self, month: Month) -> &'static str {
        let i = usize::from(u8::from(month) - 1);
        match self {
            Locale::English => ENGLISH_MONTHS[i],
            Locale::Korean => KOREAN_MONTHS[i],
        }
    }

    fn weekday(&self, weekday: Weekday) -> &'static str {
        let i = usize::from(weekday.number_days_from_sunday());
        match self {
            Locale::English => ENGLISH_WEEKDAYS[i],
            Locale::Korean => KOREAN_WEEKDAYS[i],
        }
    }

    fn short_weekday(&self, weekday: Weekday) -> &'static str {
        let i = usize::from(weekday.number_days_from_sunday());
        match self {
            Locale::English => ENGLISH_SHORT_WEEKDAYS[i],
            Locale::Korean => KOREAN_SHORT_WEEKDAYS[i],
        }
    }

    fn full_date(&self, date: Date) -> String {
        match self {
            Locale::English => format!(
                "{} {}, {}",
                self.month(date.month()),
                date.day(),
                date.year()
            ),
            Locale::Korean => format!(
                "{}년 {}월 {}일",
                date.year(),
                u8::from(date.month()),
                date.day()
            ),
        }
    }

    fn selected_heading(&self) -> &'static str {
        match self {
            Locale::English => "Selected date",
            Locale::Korean => "선택된 날짜",
        }
    }
}

impl FromStr for Locale {
    type Err = ParseLocaleError;

    fn from_str(s: &str) -> Result<Locale, ParseLocaleError> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "en" | "en_us" => Ok(Locale::English),
            "ko" | "ko_kr" => Ok(Locale::Korean),
            _ => Err(ParseLocaleError(s.to_owned())),
        }
    }
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("unsupported locale {0:?}; expected \"en\" or \"ko\"")]
pub(crate) struct ParseLocaleError(String);

static ENGLISH_MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

static KOREAN_MONTHS: [&str; 12] = [
    "1월", "2월", "3월", "4월", "5월", "6월", "7월", "8월", "9월", "10월", "11월", "12월",
];

static ENGLISH_WEEKDAYS: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

static ENGLISH_SHORT_WEEKDAYS: [&str; 7] = ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"];

static KOREAN_WEEKDAYS: [&str; 7] = [
    "일요일",
    "월요일",
    "화요일",
    "수요일",
    "목요일",
    "금요일",
    "토요일",
];

static KOREAN_SHORT_WEEKDAYS: [&str; 7] = ["일", "월", "화", "수", "목", "금", "토"];

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn test_english() {
        let en = Locale::English;
        assert_eq!(en.month_year(2025, Month::January), "January 2025");
        assert_eq!(en.month(Month::September), "September");
        assert_eq!(en.weekday(Weekday::Wednesday), "Wednesday");
        assert_eq!(en.short_weekday(Weekday::Sunday), "Su");
        assert_eq!(en.day(date!(2025 - 01 - 02)), "2");
        assert_eq!(en.full_date(date!(2025 - 01 - 22)), "January 22, 2025");
    }

    #[test]
    fn test_korean() {
        let ko = Locale::Korean;
        assert_eq!(ko.month_year(2025, Month::January), "2025년 1월");
        assert_eq!(ko.month(Month::December), "12월");
        assert_eq!(ko.weekday(Weekday::Wednesday), "수요일");
        assert_eq!(ko.short_weekday(Weekday::Saturday), "토");
        assert_eq!(ko.full_date(date!(2025 - 01 - 22)), "2025년 1월 22일");
        assert_eq!(ko.selected_heading(), "선택된 날짜");
    }

    #[test]
    fn test_parse_locale() {
        assert_eq!("en".parse::<Locale>(), Ok(Locale::English));
        assert_eq!("en-US".parse::<Locale>(), Ok(Locale::English));
        assert_eq!("ko_KR".parse::<Locale>(), Ok(Locale::Korean));
        assert_eq!("KO".parse::<Locale>(), Ok(Locale::Korean));
        assert_eq!(
            "fr".parse::<Locale>(),
            Err(ParseLocaleError(String::from("fr")))
        );
    }
}
