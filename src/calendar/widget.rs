use super::util::{is_today, WeekStart};
use super::weeks::{WeekWindow, WINDOW_SIZE};
use super::Clock;
use crate::theme::{
    BASE_STYLE, PAGER_STYLE, SELECTED_DAY_STYLE, TITLE_STYLE, TODAY_STYLE, WEEKDAY_STYLE,
};
use ratatui::{
    buffer::Buffer,
    layout::{Flex, Layout, Rect},
    style::Style,
    text::Text,
    widgets::{Paragraph, Widget},
};
use time::{format_description::FormatItem, macros::format_description};

static SUNDAY_HEADER: &str = " Su     Mo     Tu     We     Th     Fr     Sa ";

static MONDAY_HEADER: &str = " Mo     Tu     We     Th     Fr     Sa     Su ";

static TITLE_FMT: &[FormatItem<'_>] =
    format_description!("[weekday] [day padding:none] [month repr:long] [year]");

/// Width of the strip in columns
pub(crate) const MAIN_WIDTH: u16 = 46;

/// Number of lines taken up by the strip: title, header, rule, days, and
/// page indicator
pub(crate) const STRIP_HEIGHT: u16 = 5;

const TITLE_LINE: u16 = 0;
const HEADER_LINE: u16 = 1;
const RULE_LINE: u16 = 2;
const DAYS_LINE: u16 = 3;
const PAGER_LINE: u16 = 4;

/// Number of columns per day of week
const DAY_WIDTH: u16 = 7;

const ACS_HLINE: char = '─';
const PAGE_MARK: &str = "○";
const ACTIVE_PAGE_MARK: &str = "●";

/// The selected date, a single week of days, and which of the loaded weeks is
/// being shown
#[derive(Debug)]
pub(crate) struct WeekStrip<'a, C> {
    window: &'a WeekWindow,
    clock: &'a C,
}

impl<'a, C: Clock> WeekStrip<'a, C> {
    pub(crate) fn new(window: &'a WeekWindow, clock: &'a C) -> Self {
        WeekStrip { window, clock }
    }
}

impl<C: Clock> Widget for WeekStrip<'_, C> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [area] = Layout::horizontal([MAIN_WIDTH])
            .flex(Flex::Center)
            .areas(area);
        let mut canvas = BufferCanvas::new(area, buf);
        let selected = self.window.selected();
        canvas.draw_title(&selected.format(TITLE_FMT).unwrap_or_default());
        canvas.draw_header(self.window.week_start());
        for (i, day) in std::iter::zip(0u16.., self.window.active_week().days()) {
            let text = if day.date == selected {
                format!("[{:2}]", day.date.day())
            } else {
                format!(" {:2} ", day.date.day())
            };
            let style = if day.date == selected {
                SELECTED_DAY_STYLE
            } else if is_today(day.date, self.clock) {
                TODAY_STYLE
            } else {
                BASE_STYLE
            };
            canvas.draw_day(i, text, style);
        }
        canvas.draw_pager(self.window.active_index());
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

    fn draw_title(&mut self, title: &str) {
        let width = u16::try_from(title.chars().count()).unwrap_or(u16::MAX);
        self.mvprint(
            TITLE_LINE,
            MAIN_WIDTH.saturating_sub(width) / 2,
            title,
            Some(TITLE_STYLE),
        );
    }

    fn draw_header(&mut self, week_start: WeekStart) {
        let header = match week_start {
            WeekStart::Sunday => SUNDAY_HEADER,
            WeekStart::Monday => MONDAY_HEADER,
        };
        self.mvprint(HEADER_LINE, 0, header, Some(WEEKDAY_STYLE));
        self.hline(RULE_LINE, 0, ACS_HLINE, MAIN_WIDTH);
    }

    fn draw_day(&mut self, index: u16, text: String, style: Style) {
        self.mvprint(DAYS_LINE, DAY_WIDTH * index, text, Some(style));
    }

    fn draw_pager(&mut self, active: usize) {
        let marks = (0..WINDOW_SIZE)
            .map(|i| {
                if i == active {
                    ACTIVE_PAGE_MARK
                } else {
                    PAGE_MARK
                }
            })
            .collect::<Vec<_>>()
            .join(" ");
        let width = u16::try_from(marks.chars().count()).unwrap_or(u16::MAX);
        self.mvprint(
            PAGER_LINE,
            MAIN_WIDTH.saturating_sub(width) / 2,
            marks,
            Some(PAGER_STYLE),
        );
    }

    fn mvprint<S: AsRef<str>>(&mut self, y: u16, x: u16, s: S, style: Option<Style>) {
        if y < self.area.height && x < self.area.width {
            let text = Text::styled(s.as_ref(), style.unwrap_or_default());
            let width = u16::try_from(text.width()).unwrap_or(u16::MAX);
            // Paragraph truncates text that runs past the strip, but the Rect
            // it's given must lie entirely within the frame.
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

    fn hline(&mut self, y: u16, x: u16, ch: char, length: u16) {
        self.mvprint(y, x, String::from(ch).repeat(length.into()), None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::FixedClock;
    use time::macros::{date, datetime};

    fn render_lines(window: &WeekWindow, clock: &FixedClock) -> (Buffer, Vec<String>) {
        let area = Rect::new(0, 0, MAIN_WIDTH, STRIP_HEIGHT);
        let mut buf = Buffer::empty(area);
        WeekStrip::new(window, clock).render(area, &mut buf);
        let lines = (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buf[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect();
        (buf, lines)
    }

    #[test]
    fn test_render_sunday_start() {
        let clock = FixedClock(datetime!(2024-09-10 12:00 UTC));
        let window = WeekWindow::around(date!(2024 - 09 - 11), WeekStart::Sunday).unwrap();
        let (buf, lines) = render_lines(&window, &clock);
        assert_eq!(
            lines,
            [
                "         Wednesday 11 September 2024          ",
                " Su     Mo     Tu     We     Th     Fr     Sa ",
                "──────────────────────────────────────────────",
                "  8      9     10    [11]    12     13     14 ",
                "                    ○ ● ○                     ",
            ]
        );
        assert_eq!(buf[(22, 3)].style().fg, SELECTED_DAY_STYLE.fg);
        assert_eq!(
            buf[(15, 3)].style().add_modifier,
            TODAY_STYLE.add_modifier
        );
    }

    #[test]
    fn test_render_monday_start() {
        let clock = FixedClock(datetime!(2024-09-10 12:00 UTC));
        let window = WeekWindow::around(date!(2024 - 09 - 08), WeekStart::Monday).unwrap();
        let (_, lines) = render_lines(&window, &clock);
        assert_eq!(lines[1], MONDAY_HEADER);
        assert_eq!(lines[3], "  2      3      4      5      6      7    [ 8]");
    }

    #[test]
    fn test_render_paged() {
        let clock = FixedClock(datetime!(2024-09-10 12:00 UTC));
        let mut window = WeekWindow::around(date!(2024 - 09 - 11), WeekStart::Sunday).unwrap();
        window.page_forwards().unwrap();
        let (_, lines) = render_lines(&window, &clock);
        // The selection stays put while another week is shown
        assert_eq!(lines[0].trim(), "Wednesday 11 September 2024");
        assert_eq!(lines[3], " 15     16     17     18     19     20     21 ");
        assert_eq!(lines[4].trim(), "○ ○ ●");
    }
}
