use crate::calendar::{is_current_hour, is_past_hour, Clock};
use crate::task::Task;
use crate::theme::{
    tag_color,
    tasklist::{
        COMPLETED_STYLE, CURRENT_HOUR_STYLE, CURSOR_STYLE, EMPTY_STYLE, PAST_HOUR_STYLE,
        TIME_STYLE,
    },
    BASE_STYLE,
};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph, StatefulWidget, Widget},
};
use time::{format_description::FormatItem, macros::format_description};

static TIME_FMT: &[FormatItem<'_>] = format_description!("[hour]:[minute]");

static EMPTY_TEXT: &str = "No Tasks Found";

const TAG_BAR: &str = "▌";

/// The tasks of the selected day, one per line, with the row under the cursor
/// highlighted
#[derive(Debug)]
pub(crate) struct TaskList<'a, C> {
    tasks: &'a [Task],
    cursor: usize,
    clock: &'a C,
}

impl<'a, C: Clock> TaskList<'a, C> {
    pub(crate) fn new(tasks: &'a [Task], cursor: usize, clock: &'a C) -> Self {
        TaskList {
            tasks,
            cursor,
            clock,
        }
    }

    fn row(&self, task: &Task) -> ListItem<'static> {
        let when = self.clock.zone().to_local(task.created_at);
        let time_style = if task.completed {
            TIME_STYLE
        } else if is_current_hour(when, self.clock) {
            CURRENT_HOUR_STYLE
        } else if is_past_hour(when, self.clock) {
            PAST_HOUR_STYLE
        } else {
            TIME_STYLE
        };
        let tag_style = BASE_STYLE.patch(Style::new().fg(tag_color(task.tag)));
        ListItem::new(Line::from_iter([
            Span::styled(
                format!(" {} ", when.format(TIME_FMT).unwrap_or_default()),
                time_style,
            ),
            Span::styled(format!(" {TAG_BAR}"), tag_style),
            Span::styled(
                if task.completed { "[✓] " } else { "[ ] " },
                if task.completed { tag_style } else { BASE_STYLE },
            ),
            Span::styled(
                task.title.clone(),
                if task.completed {
                    COMPLETED_STYLE
                } else {
                    BASE_STYLE
                },
            ),
        ]))
    }
}

impl<C: Clock> Widget for TaskList<'_, C> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.tasks.is_empty() {
            let [line] = Layout::vertical([Constraint::Length(1)])
                .flex(Flex::Center)
                .areas(area);
            Paragraph::new(EMPTY_TEXT)
                .style(EMPTY_STYLE)
                .centered()
                .render(line, buf);
            return;
        }
        let items = self.tasks.iter().map(|t| self.row(t)).collect::<Vec<_>>();
        let mut state = ListState::default().with_selected(Some(self.cursor));
        StatefulWidget::render(
            List::new(items)
                .style(BASE_STYLE)
                .highlight_style(CURSOR_STYLE),
            area,
            buf,
            &mut state,
        );
    }
}
