use crate::task::{ColorTag, Task};
use crate::theme::{
    editor::{DISABLED_STYLE, FOCUSED_STYLE, LABEL_STYLE, PLACEHOLDER_STYLE, READY_STYLE},
    tag_color, BASE_STYLE,
};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Flex, Layout, Margin, Rect},
    style::Style,
    text::{Line, Span, Text},
    widgets::{Block, Clear, Widget},
};
use time::{format_description::FormatItem, macros::format_description, Duration, OffsetDateTime};

static DATE_FMT: &[FormatItem<'_>] =
    format_description!("[weekday repr:short] [year]-[month]-[day]");

static TIME_FMT: &[FormatItem<'_>] = format_description!("[hour]:[minute]");

const OUTER_WIDTH: u16 = 44;
const OUTER_HEIGHT: u16 = 12;
const LABEL_WIDTH: usize = 7;
const PLACEHOLDER: &str = "Go for a walk";

/// Amount by which the time field moves per step
const TIME_STEP: Duration = Duration::minutes(15);

/// Popup for filling in a task's title, date, time, and tag
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Editor<'a> {
    draft: &'a Draft,
    editing: bool,
}

impl<'a> Editor<'a> {
    /// `editing` is `true` when the draft came from an existing task
    pub(crate) fn new(draft: &'a Draft, editing: bool) -> Self {
        Editor { draft, editing }
    }
}

impl Widget for Editor<'_> {
    /*
     * ............................................
     * .┌─────────────── New Task ───────────────┐.
     * .│ Title  Go for a walk                   │.
     * .│ Date   Sun 2024-09-08                  │.
     * .│ Time   09:00                           │.
     * .│ Tag    [●] ●  ●  ●  ●  ●               │.
     * .│                                        │.
     * .│             [Create Task]              │.
     * .│                                        │.
     * .│                                        │.
     * .└────────────────────────────────────────┘.
     * ............................................
     */

    fn render(self, area: Rect, buf: &mut Buffer) {
        let [outer_area] = Layout::horizontal([OUTER_WIDTH])
            .flex(Flex::Center)
            .areas(area);
        let [outer_area] = Layout::vertical([OUTER_HEIGHT])
            .flex(Flex::Center)
            .areas(outer_area);
        Clear.render(outer_area, buf);
        Block::new().style(BASE_STYLE).render(outer_area, buf);
        let block_area = outer_area.inner(Margin::new(1, 1));
        Block::bordered()
            .title(if self.editing {
                " Edit Task "
            } else {
                " New Task "
            })
            .title_alignment(Alignment::Center)
            .render(block_area, buf);
        let text_area = block_area.inner(Margin::new(2, 1));
        self.draft.to_text(self.editing).render(text_area, buf);
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) enum Field {
    #[default]
    Title,
    Date,
    Time,
    Tag,
}

impl Field {
    fn next(self) -> Field {
        match self {
            Field::Title => Field::Date,
            Field::Date => Field::Time,
            Field::Time => Field::Tag,
            Field::Tag => Field::Title,
        }
    }

    fn previous(self) -> Field {
        match self {
            Field::Title => Field::Tag,
            Field::Date => Field::Title,
            Field::Time => Field::Date,
            Field::Tag => Field::Time,
        }
    }
}

/// The contents of the task editor
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Draft {
    title: String,
    when: OffsetDateTime,
    tag: ColorTag,
    focus: Field,
}

impl Draft {
    pub(crate) fn new(when: OffsetDateTime) -> Draft {
        Draft {
            title: String::new(),
            when,
            tag: ColorTag::default(),
            focus: Field::default(),
        }
    }

    pub(crate) fn from_task(task: &Task) -> Draft {
        Draft {
            title: task.title.clone(),
            when: task.created_at,
            tag: task.tag,
            focus: Field::default(),
        }
    }

    pub(crate) fn title(&self) -> &str {
        &self.title
    }

    pub(crate) fn when(&self) -> OffsetDateTime {
        self.when
    }

    pub(crate) fn tag(&self) -> ColorTag {
        self.tag
    }

    pub(crate) fn can_save(&self) -> bool {
        !self.title.trim().is_empty()
    }

    /// Apply a keystroke.  Returns `false` if it means nothing for the
    /// focused field.
    pub(crate) fn handle_input(&mut self, input: DraftInput) -> bool {
        match (input, self.focus) {
            (DraftInput::NextField, _) => {
                self.focus = self.focus.next();
                true
            }
            (DraftInput::PreviousField, _) => {
                self.focus = self.focus.previous();
                true
            }
            (DraftInput::Char(c), Field::Title) if !c.is_control() => {
                self.title.push(c);
                true
            }
            (DraftInput::Backspace, Field::Title) => self.title.pop().is_some(),
            (DraftInput::Increase, Field::Date) => self.shift(Duration::DAY),
            (DraftInput::Decrease, Field::Date) => self.shift(-Duration::DAY),
            (DraftInput::BigIncrease, Field::Date) => self.shift(Duration::WEEK),
            (DraftInput::BigDecrease, Field::Date) => self.shift(-Duration::WEEK),
            (DraftInput::Increase, Field::Time) => self.shift(TIME_STEP),
            (DraftInput::Decrease, Field::Time) => self.shift(-TIME_STEP),
            (DraftInput::BigIncrease, Field::Time) => self.shift(Duration::HOUR),
            (DraftInput::BigDecrease, Field::Time) => self.shift(-Duration::HOUR),
            (DraftInput::Increase | DraftInput::BigIncrease, Field::Tag) => {
                self.tag = self.tag.next();
                true
            }
            (DraftInput::Decrease | DraftInput::BigDecrease, Field::Tag) => {
                self.tag = self.tag.previous();
                true
            }
            _ => false,
        }
    }

    fn shift(&mut self, by: Duration) -> bool {
        match self.when.checked_add(by) {
            Some(when) => {
                self.when = when;
                true
            }
            None => false,
        }
    }

    fn to_text(&self, editing: bool) -> Text<'static> {
        let title = if self.title.is_empty() {
            Span::styled(PLACEHOLDER, PLACEHOLDER_STYLE)
        } else {
            Span::styled(self.title.clone(), self.field_style(Field::Title))
        };
        let mut tags = vec![label("Tag")];
        for tag in ColorTag::ALL {
            let style = Style::new().fg(tag_color(tag));
            tags.push(if tag == self.tag {
                Span::styled("[●]", self.field_style(Field::Tag).patch(style))
            } else {
                Span::styled(" ● ", BASE_STYLE.patch(style))
            });
        }
        let button = if editing {
            "[Save Task]"
        } else {
            "[Create Task]"
        };
        Text::from_iter([
            Line::from_iter([label("Title"), title]),
            Line::from_iter([
                label("Date"),
                Span::styled(
                    self.when.format(DATE_FMT).unwrap_or_default(),
                    self.field_style(Field::Date),
                ),
            ]),
            Line::from_iter([
                label("Time"),
                Span::styled(
                    self.when.format(TIME_FMT).unwrap_or_default(),
                    self.field_style(Field::Time),
                ),
            ]),
            Line::from_iter(tags),
            Line::styled("", BASE_STYLE),
            Line::from(Span::styled(
                button,
                if self.can_save() {
                    READY_STYLE
                } else {
                    DISABLED_STYLE
                },
            ))
            .centered(),
        ])
    }

    fn field_style(&self, field: Field) -> Style {
        if self.focus == field {
            FOCUSED_STYLE
        } else {
            BASE_STYLE
        }
    }
}

fn label(name: &str) -> Span<'static> {
    Span::styled(format!("{name:LABEL_WIDTH$}"), LABEL_STYLE)
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum DraftInput {
    Char(char),
    Backspace,
    NextField,
    PreviousField,
    Increase,
    Decrease,
    BigIncrease,
    BigDecrease,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn type_str(draft: &mut Draft, s: &str) {
        for c in s.chars() {
            assert!(draft.handle_input(DraftInput::Char(c)));
        }
    }

    #[test]
    fn test_title_entry() {
        let mut draft = Draft::new(datetime!(2024-09-08 9:00 +2));
        assert!(!draft.can_save());
        assert!(!draft.handle_input(DraftInput::Backspace));
        type_str(&mut draft, "Walkk");
        assert!(draft.handle_input(DraftInput::Backspace));
        assert_eq!(draft.title(), "Walk");
        assert!(draft.can_save());
    }

    #[test]
    fn test_whitespace_title_cannot_save() {
        let mut draft = Draft::new(datetime!(2024-09-08 9:00 +2));
        type_str(&mut draft, "   ");
        assert!(!draft.can_save());
    }

    #[test]
    fn test_adjust_fields() {
        let mut draft = Draft::new(datetime!(2024-09-08 9:00 +2));
        assert!(!draft.handle_input(DraftInput::Increase));
        assert!(draft.handle_input(DraftInput::NextField));
        assert_eq!(draft.focus, Field::Date);
        assert!(draft.handle_input(DraftInput::Increase));
        assert_eq!(draft.when(), datetime!(2024-09-09 9:00 +2));
        assert!(!draft.handle_input(DraftInput::Char('x')));
        assert!(draft.handle_input(DraftInput::NextField));
        assert!(draft.handle_input(DraftInput::Decrease));
        assert!(draft.handle_input(DraftInput::BigIncrease));
        assert_eq!(draft.when(), datetime!(2024-09-09 9:45 +2));
        assert!(draft.handle_input(DraftInput::NextField));
        assert!(draft.handle_input(DraftInput::Decrease));
        assert_eq!(draft.tag(), ColorTag::Tag6);
        assert!(draft.handle_input(DraftInput::NextField));
        assert_eq!(draft.focus, Field::Title);
        assert!(draft.handle_input(DraftInput::PreviousField));
        assert_eq!(draft.focus, Field::Tag);
    }

    #[test]
    fn test_from_task() {
        let task = Task::new(
            String::from("Read"),
            datetime!(2024-09-08 21:30 +2),
            ColorTag::Tag3,
        );
        let draft = Draft::from_task(&task);
        assert_eq!(draft.title(), "Read");
        assert_eq!(draft.when(), task.created_at);
        assert_eq!(draft.tag(), ColorTag::Tag3);
        assert_eq!(draft.focus, Field::Title);
    }

    #[test]
    fn test_render() {
        let mut draft = Draft::new(datetime!(2024-09-08 9:00 +2));
        type_str(&mut draft, "Walk");
        let area = Rect::new(0, 0, 50, 14);
        let mut buf = Buffer::empty(area);
        Editor::new(&draft, false).render(area, &mut buf);
        let lines = (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buf[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect::<Vec<_>>();
        assert!(lines[2].contains(" New Task "));
        assert!(lines[3].contains("│ Title  Walk"));
        assert!(lines[4].contains("│ Date   Sun 2024-09-08"));
        assert!(lines[5].contains("│ Time   09:00"));
        assert!(lines[6].contains("│ Tag    [●]"));
        assert_eq!(lines[7].trim(), format!("│{}│", " ".repeat(40)));
        assert!(lines[8].contains("[Create Task]"));
        assert!(lines[11].contains('└'));
    }
}
