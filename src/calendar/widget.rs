use super::grid::{Clock, MonthGridCalculator, WeekdayIndex};
use super::state::CalendarState;
use super::DateStyler;
use crate::format::DateFormatter;
use crate::theme::{
    NAVIGATION_STYLE, SELECTED_STYLE, TITLE_STYLE, TODAY_MARKER_STYLE, WEEKDAY_STYLE,
};
use ratatui::{prelude::*, widgets::*};
use std::iter::zip;

/// Number of columns per day of week
const DAY_WIDTH: u16 = 5;

/// Width of the calendar in columns: seven days
pub(crate) const MAIN_WIDTH: u16 = 35;

const TITLE_LINE: u16 = 0;

const WEEKDAY_LINE: u16 = 1;

const RULE_LINE: u16 = 2;

/// Number of lines above the first week
const HEADER_LINES: u16 = 3;

/// Number of lines taken up by each week: the day numbers, then the line on
/// which today is marked
const WEEK_LINES: u16 = 2;

/// Columns between the left edge of a day and its today marker
const MARKER_OFFSET: u16 = 2;

/// Number of lines needed to draw a six-week month
pub(crate) const MAX_HEIGHT: u16 = HEADER_LINES + 6 * WEEK_LINES;

const ACS_HLINE: char = '─';
const TODAY_MARKER: &str = "•";
const PREVIOUS_MONTH: &str = "<";
const NEXT_MONTH: &str = ">";

/// Draws the displayed month of a [`CalendarState`], marking the
/// calculator's today and (optionally) highlighting the selected date
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct MonthView<'a, C, S, F> {
    calculator: &'a MonthGridCalculator<C>,
    styler: &'a S,
    formatter: &'a F,
    highlight_selection: bool,
    show_navigation: bool,
    // When set, today's number is drawn in this style instead of being marked
    // on the line below
    today_style: Option<Style>,
}

impl<'a, C, S, F> MonthView<'a, C, S, F> {
    pub(crate) fn new(
        calculator: &'a MonthGridCalculator<C>,
        styler: &'a S,
        formatter: &'a F,
    ) -> Self {
        MonthView {
            calculator,
            styler,
            formatter,
            highlight_selection: true,
            show_navigation: true,
            today_style: None,
        }
    }

    pub(crate) fn highlight_selection(mut self, yes: bool) -> Self {
        self.highlight_selection = yes;
        self
    }

    /// Whether to draw the `<` and `>` month arrows around the title
    pub(crate) fn show_navigation(mut self, yes: bool) -> Self {
        self.show_navigation = yes;
        self
    }

    pub(crate) fn highlight_today(mut self, style: Style) -> Self {
        self.today_style = Some(style);
        self
    }

    /// Number of lines needed to draw a month spanning `weeks` weeks
    pub(crate) fn height_for_weeks(weeks: usize) -> u16 {
        u16::try_from(weeks)
            .map_or(u16::MAX, |w| w.saturating_mul(WEEK_LINES))
            .saturating_add(HEADER_LINES)
    }
}

impl<C: Clock, S: DateStyler, F: DateFormatter> StatefulWidget for MonthView<'_, C, S, F> {
    type State = CalendarState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let left = area.width.saturating_sub(MAIN_WIDTH) / 2;
        let area = Rect {
            x: area.x + left,
            width: MAIN_WIDTH.min(area.width),
            ..area
        };
        let grid = self.calculator.month_grid(state.displayed());
        let selected = self.highlight_selection.then_some(state.selected());
        let mut canvas = BufferCanvas::new(area, buf);
        canvas.draw_title(
            &self.formatter.month_year(grid.year(), grid.month()),
            self.show_navigation,
        );
        for wd in WeekdayIndex::all() {
            canvas.draw_weekday(
                wd,
                self.formatter.short_weekday(wd.weekday()),
                WEEKDAY_STYLE.patch(self.styler.weekday_style(wd)),
            );
        }
        canvas.draw_rule();
        for (week_no, week) in zip(0u16.., grid.weeks()) {
            for (col, &cell) in zip(0u16.., week) {
                let Some(date) = cell else {
                    continue;
                };
                if selected.is_some_and(|sel| self.calculator.is_same_day(sel, date)) {
                    canvas.draw_day(week_no, col, format!("[{:2}]", date.day()), SELECTED_STYLE);
                } else if let Some(style) =
                    self.today_style.filter(|_| self.calculator.is_today(date))
                {
                    canvas.draw_day(week_no, col, format!(" {:2} ", date.day()), style);
                } else {
                    canvas.draw_day(
                        week_no,
                        col,
                        format!(" {:2} ", date.day()),
                        self.styler.weekday_style(self.calculator.weekday_index(date)),
                    );
                }
            }
        }
        if self.today_style.is_none() {
            if let Some((week_no, col)) = grid.position(self.calculator.today()) {
                canvas.draw_today_marker(week_no, col);
            }
        }
    }
}

#[derive(Debug, Eq, PartialEq)]
struct BufferCanvas<'a> {
    area: Rect,
    buf: &'a mut Buffer,
}

impl<'a> BufferCanvas<'a> {
    fn new(area: Rect, buf: &'a mut Buffer) -> Self {
        Self { area, buf }
    }

    fn draw_title(&mut self, title: &str, navigation: bool) {
        let x = MAIN_WIDTH.saturating_sub(text_width(title)) / 2;
        if navigation {
            self.mvprint(TITLE_LINE, 0, PREVIOUS_MONTH, NAVIGATION_STYLE);
            self.mvprint(TITLE_LINE, MAIN_WIDTH - 1, NEXT_MONTH, NAVIGATION_STYLE);
        }
        self.mvprint(TITLE_LINE, x, title, TITLE_STYLE);
    }

    fn draw_weekday(&mut self, wd: WeekdayIndex, label: &str, style: Style) {
        let col = u16::try_from(wd.column()).unwrap_or_default();
        let x = DAY_WIDTH * col + DAY_WIDTH.saturating_sub(text_width(label)) / 2;
        self.mvprint(WEEKDAY_LINE, x, label, style);
    }

    fn draw_rule(&mut self) {
        self.mvprint(
            RULE_LINE,
            0,
            String::from(ACS_HLINE).repeat(MAIN_WIDTH.into()),
            WEEKDAY_STYLE,
        );
    }

    fn draw_day(&mut self, week_no: u16, col: u16, s: String, style: Style) {
        self.mvprint(
            week_no * WEEK_LINES + HEADER_LINES,
            DAY_WIDTH * col,
            s,
            style,
        );
    }

    fn draw_today_marker(&mut self, week_no: usize, col: usize) {
        let (Ok(week_no), Ok(col)) = (u16::try_from(week_no), u16::try_from(col)) else {
            return;
        };
        self.mvprint(
            week_no * WEEK_LINES + HEADER_LINES + 1,
            DAY_WIDTH * col + MARKER_OFFSET,
            TODAY_MARKER,
            TODAY_MARKER_STYLE,
        );
    }

    fn mvprint<T: AsRef<str>>(&mut self, y: u16, x: u16, s: T, style: Style) {
        if y < self.area.height && x < self.area.width {
            let text = Text::styled(s.as_ref(), style);
            let width = u16::try_from(text.width()).unwrap_or(u16::MAX);
            // The Paragraph truncates text that extends beyond the calendar's
            // area, so long as its own Rect stays within the frame.
            Paragraph::new(text).render(
                Rect {
                    x: x + self.area.x,
                    y: y + self.area.y,
                    width: (self.area.width - x).min(width),
                    height: 1,
                },
                self.buf,
            );
        }
    }
}

fn text_width(s: &str) -> u16 {
    u16::try_from(Span::raw(s).width()).unwrap_or(u16::MAX)
}
