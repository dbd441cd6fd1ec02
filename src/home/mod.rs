mod timeline;
use self::timeline::Timeline;
use crate::calendar::{
    CalendarState, Clock, DateStyler, MonthGridCalculator, MonthView, OutOfTimeError,
    DAYS_IN_WEEK, MAIN_WIDTH, MAX_HEIGHT,
};
use crate::format::DateFormatter;
use crate::theme::{
    home::{DAY_NUMBER_STYLE, TODAY_STYLE},
    BASE_STYLE, SECONDARY_STYLE, TITLE_STYLE,
};
use crate::weekend::WeekendStyler;
use crossterm::event::{poll, read, KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    backend::Backend,
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    text::{Line, Span, Text},
    widgets::{Paragraph, StatefulWidget, Widget},
    Terminal,
};
use std::fmt;
use std::io;
use std::iter::zip;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use time::{Date, OffsetDateTime};

const SMALL_WIDTH: u16 = 20;

const SMALL_HEIGHT: u16 = 5;

const MEDIUM_HEIGHT: u16 = 4;

/// Line of the medium widget on which the weekday labels are drawn; the day
/// numbers go on the line after
const MEDIUM_WEEKDAY_LINE: u16 = 2;

/// The sizes in which the home widget can be drawn
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) enum WidgetFamily {
    /// Today's month, day number, and weekday
    Small,
    /// The current week
    Medium,
    /// The current month
    Large,
}

impl WidgetFamily {
    pub(crate) fn width(self) -> u16 {
        match self {
            WidgetFamily::Small => SMALL_WIDTH,
            WidgetFamily::Medium | WidgetFamily::Large => MAIN_WIDTH,
        }
    }

    pub(crate) fn height(self) -> u16 {
        match self {
            WidgetFamily::Small => SMALL_HEIGHT,
            WidgetFamily::Medium => MEDIUM_HEIGHT,
            WidgetFamily::Large => MAX_HEIGHT,
        }
    }
}

impl fmt::Display for WidgetFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WidgetFamily::Small => write!(f, "small"),
            WidgetFamily::Medium => write!(f, "medium"),
            WidgetFamily::Large => write!(f, "large"),
        }
    }
}

impl FromStr for WidgetFamily {
    type Err = ParseFamilyError;

    fn from_str(s: &str) -> Result<WidgetFamily, ParseFamilyError> {
        match s.to_ascii_lowercase().as_str() {
            "small" => Ok(WidgetFamily::Small),
            "medium" => Ok(WidgetFamily::Medium),
            "large" => Ok(WidgetFamily::Large),
            _ => Err(ParseFamilyError(s.to_owned())),
        }
    }
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("invalid widget size {0:?}; expected \"small\", \"medium\", or \"large\"")]
pub(crate) struct ParseFamilyError(String);

/// The home widget as drawn for one timeline entry
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct HomeWidget<'a, F> {
    family: WidgetFamily,
    date: Date,
    // Frozen at `date` so that the widget shows the same day for the whole
    // of its timeline entry
    calculator: MonthGridCalculator<OffsetDateTime>,
    formatter: &'a F,
}

impl<'a, F: DateFormatter> HomeWidget<'a, F> {
    pub(crate) fn new(family: WidgetFamily, date: Date, formatter: &'a F) -> Self {
        HomeWidget {
            family,
            date,
            calculator: MonthGridCalculator::frozen_at(date),
            formatter,
        }
    }

    fn render_small(self, area: Rect, buf: &mut Buffer) {
        let text = Text::from_iter([
            Line::styled(self.formatter.month(self.date.month()), SECONDARY_STYLE),
            Line::default(),
            Line::styled(self.formatter.day(self.date), DAY_NUMBER_STYLE),
            Line::default(),
            Line::styled(self.formatter.weekday(self.date.weekday()), SECONDARY_STYLE),
        ]);
        Paragraph::new(text)
            .alignment(Alignment::Center)
            .render(area, buf);
    }

    fn render_medium(self, area: Rect, buf: &mut Buffer) {
        let title = self
            .formatter
            .month_year(self.date.year(), self.date.month());
        Paragraph::new(Line::styled(title, TITLE_STYLE)).render(area, buf);
        let Ok(days) = self.calculator.week_days(self.date) else {
            log::warn!("Week of {} runs past the end of time", self.date);
            return;
        };
        let strip = Rect {
            y: area.y.saturating_add(MEDIUM_WEEKDAY_LINE),
            height: area.height.saturating_sub(MEDIUM_WEEKDAY_LINE),
            ..area
        };
        let columns = Layout::horizontal([Constraint::Fill(1); DAYS_IN_WEEK]).split(strip);
        for (&column, day) in zip(columns.iter(), days) {
            let weekday_style = WeekendStyler.weekday_style(self.calculator.weekday_index(day));
            let label = Line::styled(
                self.formatter.short_weekday(day.weekday()),
                SECONDARY_STYLE.patch(weekday_style),
            );
            let number = Line::from(Span::styled(
                format!(" {:2} ", day.day()),
                if self.calculator.is_today(day) {
                    TODAY_STYLE
                } else {
                    BASE_STYLE
                },
            ));
            Paragraph::new(Text::from_iter([label, number]))
                .alignment(Alignment::Center)
                .render(column, buf);
        }
    }

    fn render_large(self, area: Rect, buf: &mut Buffer) {
        MonthView::new(&self.calculator, &WeekendStyler, self.formatter)
            .highlight_selection(false)
            .show_navigation(false)
            .highlight_today(TODAY_STYLE)
            .render(area, buf, &mut CalendarState::new(self.date));
    }
}

impl<F: DateFormatter> Widget for HomeWidget<'_, F> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let area = Rect {
            width: self.family.width().min(area.width),
            height: self.family.height().min(area.height),
            ..area
        };
        buf.set_style(area, BASE_STYLE);
        match self.family {
            WidgetFamily::Small => self.render_small(area, buf),
            WidgetFamily::Medium => self.render_medium(area, buf),
            WidgetFamily::Large => self.render_large(area, buf),
        }
    }
}

/// Draws the widget for the current day.  If `watch` is true, the widget is
/// redrawn whenever its timeline goes stale, until the user quits.
pub(crate) fn show<B, C, F>(
    terminal: &mut Terminal<B>,
    family: WidgetFamily,
    calculator: &mut MonthGridCalculator<C>,
    formatter: &F,
    watch: bool,
) -> anyhow::Result<()>
where
    B: Backend,
    C: Clock,
    F: DateFormatter,
{
    loop {
        let (timeline, now) = next_timeline(calculator)?;
        let date = timeline.entry().date;
        log::info!(
            "Drawing {family} widget for {date}; next refresh at {} (UTC offset {})",
            timeline.refresh_at(),
            calculator.offset(),
        );
        terminal.draw(|frame| {
            let area = frame.area();
            frame.render_widget(HomeWidget::new(family, date, formatter), area);
            // Leave the cursor on the last line so that the shell prompt
            // comes after the widget
            frame.set_cursor_position((area.x, area.bottom().saturating_sub(1)));
        })?;
        if !watch || quit_requested(timeline.delay_from(now))? {
            break;
        }
    }
    Ok(())
}

// Builds the timeline for the current instant in the offset now in effect, so
// that refreshes land on local midnight across daylight saving changes
fn next_timeline<C: Clock>(
    calculator: &mut MonthGridCalculator<C>,
) -> Result<(Timeline, OffsetDateTime), OutOfTimeError> {
    calculator.refresh_offset();
    let now = calculator.now();
    Ok((Timeline::starting_at(now)?, now))
}

// Waits up to `timeout` for input and returns `true` if the user asked to quit
fn quit_requested(timeout: Duration) -> io::Result<bool> {
    if !poll(timeout)? {
        return Ok(false);
    }
    Ok(read()?.as_key_press_event().is_some_and(
        |KeyEvent {
             code, modifiers, ..
         }| {
            matches!(code, KeyCode::Char('q') | KeyCode::Esc)
                || (modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c'))
        },
    ))
}
