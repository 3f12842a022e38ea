use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Flex, Layout, Rect},
    style::Style,
    text::{Line, Text},
    widgets::{Block, Clear, Paragraph, Widget},
};

/// Key bindings of the calendar view and what they do
static BINDINGS: &[(&str, &str)] = &[
    ("h, LEFT", "Previous month"),
    ("l, RIGHT", "Next month"),
    ("0, HOME", "Jump to the current month"),
    ("g", "Input month to jump to"),
    ("?", "Show this help"),
    ("q, ESC", "Quit"),
];

const KEY_COLUMN: usize = 16;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct Help(pub(crate) Style);

impl Help {
    fn text() -> Text<'static> {
        let mut lines = BINDINGS
            .iter()
            .map(|(keys, action)| Line::raw(format!("{keys:KEY_COLUMN$}{action}")))
            .collect::<Vec<_>>();
        lines.push(Line::raw(""));
        lines.push(Line::raw("Press the Any Key to dismiss."));
        Text::from(lines)
    }
}

impl Widget for Help {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let text = Help::text();
        // Leave room for the border on every side
        let height = u16::try_from(text.height())
            .unwrap_or(u16::MAX)
            .saturating_add(2)
            .min(area.height);
        let width = u16::try_from(text.width())
            .unwrap_or(u16::MAX)
            .saturating_add(2)
            .min(area.width);
        let [popup] = Layout::horizontal([width]).flex(Flex::Center).areas(area);
        let [popup] = Layout::vertical([height]).flex(Flex::Center).areas(popup);
        Clear.render(popup, buf);
        Paragraph::new(text)
            .block(
                Block::bordered()
                    .title(" Commands ")
                    .title_alignment(Alignment::Center),
            )
            .style(self.0)
            .render(popup, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::buffer_lines;
    use crate::theme::BASE_STYLE;

    #[test]
    fn test_render_centered() {
        let area = Rect::new(0, 0, 50, 12);
        let mut buffer = Buffer::empty(area);
        Help(BASE_STYLE).render(area, &mut buffer);
        let lines = buffer_lines(&buffer);
        assert_eq!(lines.len(), 12);
        assert!(lines[0].trim().is_empty());
        assert!(lines[1].contains(" Commands "));
        assert_eq!(
            lines[2].trim(),
            "│h, LEFT         Previous month           │"
        );
        assert_eq!(lines[10].trim(), "└─────────────────────────────────────────┘");
        assert!(lines[11].trim().is_empty());
    }
}
