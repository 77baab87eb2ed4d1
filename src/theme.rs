use crate::task::ColorTag;
use ratatui::style::{Color, Modifier, Style};

pub(crate) const BASE_STYLE: Style = Style::new().fg(Color::White).bg(Color::Black);

pub(crate) const TITLE_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

pub(crate) const WEEKDAY_STYLE: Style = BASE_STYLE.fg(Color::Gray);

pub(crate) const SELECTED_DAY_STYLE: Style = BASE_STYLE
    .fg(Color::LightBlue)
    .add_modifier(Modifier::BOLD);

pub(crate) const TODAY_STYLE: Style = BASE_STYLE.add_modifier(Modifier::UNDERLINED);

pub(crate) const PAGER_STYLE: Style = BASE_STYLE.fg(Color::DarkGray);

pub(crate) const NOTICE_STYLE: Style = BASE_STYLE.fg(Color::LightRed);

pub(crate) fn tag_color(tag: ColorTag) -> Color {
    match tag {
        ColorTag::Tag1 => Color::Blue,
        ColorTag::Tag2 => Color::Green,
        ColorTag::Tag3 => Color::Yellow,
        ColorTag::Tag4 => Color::Rgb(0xFF, 0x95, 0x00),
        ColorTag::Tag5 => Color::Red,
        ColorTag::Tag6 => Color::Magenta,
    }
}

pub(crate) mod tasklist {
    use super::*;

    pub(crate) const EMPTY_STYLE: Style = BASE_STYLE.fg(Color::DarkGray);

    // Keeps the colors of the row it lands on
    pub(crate) const CURSOR_STYLE: Style = Style::new().add_modifier(Modifier::REVERSED);

    pub(crate) const COMPLETED_STYLE: Style = BASE_STYLE
        .fg(Color::DarkGray)
        .add_modifier(Modifier::CROSSED_OUT);

    pub(crate) const CURRENT_HOUR_STYLE: Style = BASE_STYLE
        .fg(Color::LightBlue)
        .add_modifier(Modifier::BOLD);

    pub(crate) const PAST_HOUR_STYLE: Style = BASE_STYLE
        .fg(Color::LightRed)
        .add_modifier(Modifier::BOLD);

    pub(crate) const TIME_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);
}

pub(crate) mod editor {
    use super::*;

    pub(crate) const LABEL_STYLE: Style = BASE_STYLE.fg(Color::Gray);

    pub(crate) const FOCUSED_STYLE: Style = BASE_STYLE.add_modifier(Modifier::REVERSED);

    pub(crate) const PLACEHOLDER_STYLE: Style = BASE_STYLE.fg(Color::DarkGray);

    pub(crate) const DISABLED_STYLE: Style = BASE_STYLE.fg(Color::DarkGray);

    pub(crate) const READY_STYLE: Style = BASE_STYLE.add_modifier(Modifier::UNDERLINED);
}
