use ratatui::style::{Color, Modifier, Style};

pub(crate) const BASE_STYLE: Style = Style::new().fg(Color::White).bg(Color::Black);

pub(crate) const SUNDAY_STYLE: Style = BASE_STYLE.fg(Color::LightRed);

pub(crate) const SATURDAY_STYLE: Style = BASE_STYLE.fg(Color::LightBlue);

pub(crate) const SELECTED_STYLE: Style = BASE_STYLE
    .fg(Color::LightBlue)
    .add_modifier(Modifier::BOLD);

pub(crate) const TODAY_MARKER_STYLE: Style = BASE_STYLE.fg(Color::LightBlue);

pub(crate) const TITLE_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

pub(crate) const NAVIGATION_STYLE: Style = BASE_STYLE.fg(Color::LightBlue);

pub(crate) const WEEKDAY_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

pub(crate) const SECONDARY_STYLE: Style = BASE_STYLE.fg(Color::Gray);

pub(crate) mod home {
    use super::*;

    pub(crate) const TODAY_STYLE: Style = Style::new()
        .fg(Color::White)
        .bg(Color::Blue)
        .add_modifier(Modifier::BOLD);

    pub(crate) const DAY_NUMBER_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);
}

pub(crate) mod jumpto {
    use super::*;

    pub(crate) const UNFILLED_CELL_STYLE: Style = BASE_STYLE.fg(Color::DarkGray);

    pub(crate) const READY_ENTER_STYLE: Style = BASE_STYLE.add_modifier(Modifier::UNDERLINED);
}
