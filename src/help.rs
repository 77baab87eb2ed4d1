use ratatui::{
    buffer::Buffer,
    layout::Flex,
    layout::{Alignment, Layout, Rect},
    style::Style,
    text::{Line, Text},
    widgets::{Block, Clear, Paragraph, Widget},
};

static TEXT: &[&str] = &[
    "h, LEFT         Select previous day",
    "l, RIGHT        Select next day",
    "1-7             Select day of week",
    "[, PAGE UP      Show previous week",
    "], PAGE DOWN    Show next week",
    "0, HOME         Jump to today",
    "j, DOWN         Next task",
    "k, UP           Previous task",
    "SPACE, ENTER    Toggle task completed",
    "a               Add task",
    "e               Edit task",
    "d, DELETE       Delete task",
    "m               Replace tasks with samples",
    "X               Delete all tasks",
    "?               Show this help",
    "q, ESC          Quit",
    "",
    "In the editor:",
    "TAB, BACKTAB    Next/previous field",
    "LEFT, RIGHT     Adjust field",
    "UP, DOWN        Adjust field by more",
    "ENTER           Save",
    "ESC             Cancel",
    "",
    "Press the Any Key to dismiss.",
];

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct Help(pub(crate) Style);

impl Widget for Help {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let text = Text::from_iter(TEXT.iter().map(|&s| Line::raw(s)));
        let height = u16::try_from(text.height())
            .unwrap_or(u16::MAX)
            .min(area.height)
            .saturating_add(2);
        let width = u16::try_from(text.width())
            .unwrap_or(u16::MAX)
            .min(area.width)
            .saturating_add(2);
        let para = Paragraph::new(text)
            .block(
                Block::bordered()
                    .title(" Commands ")
                    .title_alignment(Alignment::Center),
            )
            .style(self.0);
        let [help_area] = Layout::horizontal([width]).flex(Flex::Center).areas(area);
        let [help_area] = Layout::vertical([height])
            .flex(Flex::Center)
            .areas(help_area);
        let outer_area = Rect {
            x: help_area.x.saturating_sub(1),
            y: help_area.y,
            width: help_area.width.saturating_add(2),
            height: help_area.height,
        };
        Clear.render(outer_area, buf);
        Block::new().style(self.0).render(outer_area, buf);
        para.render(help_area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::BASE_STYLE;

    #[test]
    fn test_render() {
        let area = Rect::new(0, 0, 80, 30);
        let mut buf = Buffer::empty(area);
        Help(BASE_STYLE).render(area, &mut buf);
        let lines = (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buf[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect::<Vec<_>>();
        assert!(lines[2].contains("─ Commands ─"));
        assert!(lines[3].contains("│h, LEFT         Select previous day"));
        assert!(lines[27].contains("│Press the Any Key to dismiss."));
        assert!(lines[28].contains('└'));
    }
}
