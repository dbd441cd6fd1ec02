use crate::calendar::{CalendarState, Clock, MonthGridCalculator, MonthView, OutOfTimeError};
use crate::format::{DateFormatter, Locale};
use crate::help::Help;
use crate::jumpto::{JumpTo, JumpToInput, JumpToOutput, JumpToState};
use crate::theme::{BASE_STYLE, SECONDARY_STYLE, TITLE_STYLE};
use crate::weekend::WeekendStyler;
use crossterm::event::{read, KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    backend::Backend,
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    text::{Line, Text},
    widgets::{Block, Borders, Paragraph, StatefulWidget, Widget},
    Terminal,
};
use std::io::{self, Write};
use time::Date;

/// Width of the selected-date panel beneath the calendar
const PANEL_WIDTH: u16 = 35;

/// Number of lines taken up by the selected-date panel, including its rule
const PANEL_LINES: u16 = 4;

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct App<C> {
    calculator: MonthGridCalculator<C>,
    locale: Locale,
    calendar: CalendarState,
    state: AppState,
}

impl<C: Clock> App<C> {
    pub(crate) fn new(
        calculator: MonthGridCalculator<C>,
        locale: Locale,
        selected: Date,
    ) -> App<C> {
        App {
            calculator,
            locale,
            calendar: CalendarState::new(selected),
            state: AppState::Calendar,
        }
    }

    pub(crate) fn run<B: Backend>(mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        while !self.quitting() {
            self.draw(terminal)?;
            self.handle_input()?;
        }
        Ok(())
    }

    fn draw<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        self.calculator.refresh_offset();
        terminal.draw(|frame| frame.render_widget(self, frame.area()))?;
        Ok(())
    }

    fn handle_input(&mut self) -> io::Result<()> {
        let normal_modifiers = KeyModifiers::NONE | KeyModifiers::SHIFT;
        if let Some(KeyEvent {
            code, modifiers, ..
        }) = read()?.as_key_press_event()
        {
            if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
                self.state = AppState::Quitting;
            } else if !normal_modifiers.contains(modifiers) || !self.handle_key(code) {
                self.beep()?;
            }
        }
        // else: Redraw on resize, and we might as well redraw on other stuff
        // too
        Ok(())
    }

    // Returns `false` if the user pressed an invalid key
    fn handle_key(&mut self, key: KeyCode) -> bool {
        match &mut self.state {
            AppState::Calendar => match key {
                KeyCode::Char('h') | KeyCode::Left => self.navigate(|cal| cal.move_selection(-1)),
                KeyCode::Char('l') | KeyCode::Right => self.navigate(|cal| cal.move_selection(1)),
                KeyCode::Char('k') | KeyCode::Up => self.navigate(|cal| cal.move_selection(-7)),
                KeyCode::Char('j') | KeyCode::Down => self.navigate(|cal| cal.move_selection(7)),
                KeyCode::Char('p') | KeyCode::PageUp => {
                    self.navigate(CalendarState::previous_month)
                }
                KeyCode::Char('n') | KeyCode::PageDown => {
                    self.navigate(CalendarState::next_month)
                }
                KeyCode::Char('0') | KeyCode::Home => {
                    self.calendar.select(self.calculator.today());
                    true
                }
                KeyCode::Char('g') => {
                    self.state = AppState::Jumping(JumpToState::new());
                    true
                }
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.state = AppState::Quitting;
                    true
                }
                KeyCode::Char('?') => {
                    self.state = AppState::Helping;
                    true
                }
                _ => false,
            },
            AppState::Helping => {
                self.state = AppState::Calendar;
                true
            }
            AppState::Jumping(state) => {
                if matches!(key, KeyCode::Char('q' | 'g') | KeyCode::Esc) {
                    self.state = AppState::Calendar;
                    true
                } else {
                    let output = match key {
                        KeyCode::Char('-') => state.handle_input(JumpToInput::Negative),
                        KeyCode::Char('+') => state.handle_input(JumpToInput::Positive),
                        KeyCode::Char('0') => state.handle_input(JumpToInput::Digit(0)),
                        KeyCode::Char('1') => state.handle_input(JumpToInput::Digit(1)),
                        KeyCode::Char('2') => state.handle_input(JumpToInput::Digit(2)),
                        KeyCode::Char('3') => state.handle_input(JumpToInput::Digit(3)),
                        KeyCode::Char('4') => state.handle_input(JumpToInput::Digit(4)),
                        KeyCode::Char('5') => state.handle_input(JumpToInput::Digit(5)),
                        KeyCode::Char('6') => state.handle_input(JumpToInput::Digit(6)),
                        KeyCode::Char('7') => state.handle_input(JumpToInput::Digit(7)),
                        KeyCode::Char('8') => state.handle_input(JumpToInput::Digit(8)),
                        KeyCode::Char('9') => state.handle_input(JumpToInput::Digit(9)),
                        KeyCode::Backspace | KeyCode::Delete => {
                            state.handle_input(JumpToInput::Backspace)
                        }
                        KeyCode::Enter => state.handle_input(JumpToInput::Enter),
                        _ => JumpToOutput::Invalid,
                    };
                    match output {
                        JumpToOutput::Ok => true,
                        JumpToOutput::Invalid => false,
                        JumpToOutput::Select(date) => {
                            self.state = AppState::Calendar;
                            self.calendar.select(date);
                            true
                        }
                    }
                }
            }
            AppState::Quitting => false,
        }
    }

    fn navigate<F>(&mut self, func: F) -> bool
    where
        F: FnOnce(&mut CalendarState) -> Result<(), OutOfTimeError>,
    {
        match func(&mut self.calendar) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Cannot navigate from {}: {e}", self.calendar.selected());
                false
            }
        }
    }

    fn beep(&self) -> io::Result<()> {
        io::stdout().write_all(b"\x07")
    }

    fn quitting(&self) -> bool {
        self.state == AppState::Quitting
    }
}

impl<C: Clock> Widget for &mut App<C> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, BASE_STYLE);
        let weeks = self
            .calculator
            .month_grid(self.calendar.displayed())
            .week_count();
        let [cal_area, panel_area] = Layout::vertical([
            Constraint::Length(MonthView::<C, WeekendStyler, Locale>::height_for_weeks(weeks)),
            Constraint::Length(PANEL_LINES),
        ])
        .areas(area);
        MonthView::new(&self.calculator, &WeekendStyler, &self.locale).render(
            cal_area,
            buf,
            &mut self.calendar,
        );
        SelectedPanel {
            date: self.calendar.selected(),
            locale: self.locale,
        }
        .render(panel_area, buf);
        if self.state == AppState::Helping {
            Help.render(area, buf);
        } else if let AppState::Jumping(ref mut state) = self.state {
            JumpTo.render(area, buf, state);
        }
    }
}

/// Describes the selected date beneath the calendar
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct SelectedPanel {
    date: Date,
    locale: Locale,
}

impl Widget for SelectedPanel {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [area] = Layout::horizontal([PANEL_WIDTH.min(area.width)])
            .flex(Flex::Center)
            .areas(area);
        let text = Text::from_iter([
            Line::styled(self.locale.selected_heading(), SECONDARY_STYLE),
            Line::styled(self.locale.full_date(self.date), TITLE_STYLE),
            Line::styled(self.locale.weekday(self.date.weekday()), SECONDARY_STYLE),
        ]);
        Paragraph::new(text)
            .block(
                Block::new()
                    .borders(Borders::TOP)
                    .border_style(SECONDARY_STYLE),
            )
            .render(area, buf);
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum AppState {
    Calendar,
    Helping,
    Jumping(JumpToState),
    Quitting,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};
    use time::OffsetDateTime;

    fn app(selected: Date) -> App<OffsetDateTime> {
        let now = datetime!(2025-01-22 09:30 UTC);
        App::new(
            MonthGridCalculator::new(now, now.offset()),
            Locale::English,
            selected,
        )
    }

    fn buffer_lines(buf: &Buffer) -> Vec<String> {
        let area = buf.area;
        (area.top()..area.bottom())
            .map(|y| {
                (area.left()..area.right())
                    .map(|x| buf[(x, y)].symbol())
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_arrow_keys_move_selection() {
        let mut app = app(date!(2025 - 01 - 31));
        assert!(app.handle_key(KeyCode::Right));
        assert_eq!(app.calendar.selected(), date!(2025 - 02 - 01));
        assert_eq!(app.calendar.displayed(), date!(2025 - 02 - 01));
        assert!(app.handle_key(KeyCode::Char('k')));
        assert_eq!(app.calendar.selected(), date!(2025 - 01 - 25));
        assert!(app.handle_key(KeyCode::Down));
        assert!(app.handle_key(KeyCode::Char('h')));
        assert_eq!(app.calendar.selected(), date!(2025 - 01 - 31));
    }

    #[test]
    fn test_month_paging() {
        let mut app = app(date!(2025 - 01 - 22));
        assert!(app.handle_key(KeyCode::Char('p')));
        assert_eq!(app.calendar.displayed(), date!(2024 - 12 - 01));
        assert!(app.handle_key(KeyCode::PageDown));
        assert!(app.handle_key(KeyCode::Char('n')));
        assert_eq!(app.calendar.displayed(), date!(2025 - 02 - 01));
        assert_eq!(app.calendar.selected(), date!(2025 - 01 - 22));
        assert!(app.handle_key(KeyCode::Home));
        assert_eq!(app.calendar.displayed(), date!(2025 - 01 - 01));
    }

    #[test]
    fn test_paging_past_end_of_time() {
        let mut app = app(Date::MAX);
        assert!(!app.handle_key(KeyCode::PageDown));
        assert!(!app.handle_key(KeyCode::Right));
        assert_eq!(app.calendar.selected(), Date::MAX);
    }

    #[test]
    fn test_select_today() {
        let mut app = app(date!(2024 - 06 - 15));
        assert!(app.handle_key(KeyCode::Char('0')));
        assert_eq!(app.calendar.selected(), date!(2025 - 01 - 22));
    }

    #[test]
    fn test_jump_to() {
        let mut app = app(date!(2025 - 01 - 22));
        assert!(app.handle_key(KeyCode::Char('g')));
        for c in "20240229".chars() {
            assert!(app.handle_key(KeyCode::Char(c)));
        }
        assert!(!app.handle_key(KeyCode::Char('x')));
        assert!(app.handle_key(KeyCode::Enter));
        assert_eq!(app.state, AppState::Calendar);
        assert_eq!(app.calendar.selected(), date!(2024 - 02 - 29));
        assert_eq!(app.calendar.displayed(), date!(2024 - 02 - 01));
    }

    #[test]
    fn test_jump_to_every_digit() {
        let mut app = app(date!(2025 - 01 - 22));
        assert!(app.handle_key(KeyCode::Char('g')));
        for c in "19870609".chars() {
            assert!(app.handle_key(KeyCode::Char(c)));
        }
        assert!(app.handle_key(KeyCode::Enter));
        assert_eq!(app.calendar.selected(), date!(1987 - 06 - 09));
        assert!(app.handle_key(KeyCode::Char('g')));
        for c in "23451231".chars() {
            assert!(app.handle_key(KeyCode::Char(c)));
        }
        assert!(app.handle_key(KeyCode::Enter));
        assert_eq!(app.calendar.selected(), date!(2345 - 12 - 31));
    }

    #[test]
    fn test_help_and_quit() {
        let mut app = app(date!(2025 - 01 - 22));
        assert!(!app.handle_key(KeyCode::Char('x')));
        assert!(app.handle_key(KeyCode::Char('?')));
        assert_eq!(app.state, AppState::Helping);
        assert!(app.handle_key(KeyCode::Char('x')));
        assert_eq!(app.state, AppState::Calendar);
        assert!(app.handle_key(KeyCode::Esc));
        assert!(app.quitting());
    }

    #[test]
    fn test_render() {
        let mut app = app(date!(2025 - 01 - 10));
        let area = Rect::new(0, 0, 35, 17);
        let mut buffer = Buffer::empty(area);
        app.render(area, &mut buffer);
        let lines = buffer_lines(&buffer);
        assert_eq!(lines[0], "<          January 2025           >");
        assert_eq!(lines[5], "  5    6    7    8    9  [10]  11  ");
        assert_eq!(lines[10], "                 •                 ");
        assert_eq!(lines[13], "───────────────────────────────────");
        assert_eq!(lines[14], "Selected date                      ");
        assert_eq!(lines[15], "January 10, 2025                   ");
        assert_eq!(lines[16], "Friday                             ");
    }
}
