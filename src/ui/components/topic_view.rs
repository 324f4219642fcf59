use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Padding, Paragraph, Widget, Wrap};

use crate::curriculum::Topic;
use crate::ui::theme::Theme;

/// Lesson content for the topic being viewed.
pub struct TopicView<'a> {
    pub topic: &'a Topic,
    pub lesson_title: &'a str,
    pub scroll: u16,
    pub theme: &'a Theme,
}

impl<'a> TopicView<'a> {
    pub fn new(topic: &'a Topic, lesson_title: &'a str, scroll: u16, theme: &'a Theme) -> Self {
        Self {
            topic,
            lesson_title,
            scroll,
            theme,
        }
    }

    fn lines(&self) -> Vec<Line<'a>> {
        let colors = &self.theme.colors;
        let mut lines = vec![
            Line::from(Span::styled(
                self.topic.title.as_str(),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        lines.extend(
            self.topic
                .content
                .lines()
                .map(|l| Line::from(Span::styled(l, Style::default().fg(colors.fg())))),
        );

        if self.topic.has_challenge() {
            let (text, color) = if self.topic.is_completed() {
                ("✓ Challenge completed", colors.success())
            } else {
                ("▶ This topic has a challenge. Press → to attempt it.", colors.warning())
            };
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(text, Style::default().fg(color))));
        }
        lines
    }

    fn block(&self) -> Block<'a> {
        let colors = &self.theme.colors;
        Block::bordered()
            .title(format!(" {} ", self.lesson_title))
            .title_style(Style::default().fg(colors.accent_dim()))
            .border_style(Style::default().fg(colors.border()))
            .padding(Padding::horizontal(1))
            .style(Style::default().bg(colors.bg()))
    }

    fn paragraph(&self) -> Paragraph<'a> {
        Paragraph::new(self.lines()).wrap(Wrap { trim: false })
    }

    /// Largest scroll offset that still leaves the last wrapped row in view.
    pub fn max_scroll(&self, area: Rect) -> u16 {
        let inner = self.block().inner(area);
        if inner.width == 0 {
            return 0;
        }
        let rows = self.paragraph().line_count(inner.width);
        u16::try_from(rows)
            .unwrap_or(u16::MAX)
            .saturating_sub(inner.height)
    }
}

impl Widget for TopicView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let scroll = self.scroll.min(self.max_scroll(area));
        self.paragraph()
            .block(self.block())
            .scroll((scroll, 0))
            .render(area, buf);
    }
}
