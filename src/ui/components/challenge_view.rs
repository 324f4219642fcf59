use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Padding, Paragraph, Widget, Wrap};

use crate::curriculum::Topic;
use crate::session::input::TextBuffer;
use crate::session::navigation::MSG_TRY_AGAIN;
use crate::ui::theme::Theme;

/// Prompt, optional exhibit, answer box and feedback for a challenge.
pub struct ChallengeView<'a> {
    pub topic: &'a Topic,
    pub input: &'a TextBuffer,
    pub message: Option<&'a str>,
    pub theme: &'a Theme,
}

impl<'a> ChallengeView<'a> {
    pub fn new(
        topic: &'a Topic,
        input: &'a TextBuffer,
        message: Option<&'a str>,
        theme: &'a Theme,
    ) -> Self {
        Self {
            topic,
            input,
            message,
            theme,
        }
    }

    fn input_line(&self) -> Line<'a> {
        let colors = &self.theme.colors;
        let (before, cursor, after) = self.input.render_parts();
        let cursor_style = Style::default()
            .fg(colors.text_cursor_fg())
            .bg(colors.text_cursor_bg());
        let text_style = Style::default().fg(colors.fg());

        let cursor_text = cursor.map(String::from).unwrap_or_else(|| " ".to_string());
        Line::from(vec![
            Span::styled("> ", Style::default().fg(colors.accent())),
            Span::styled(before, text_style),
            Span::styled(cursor_text, cursor_style),
            Span::styled(after, text_style),
        ])
    }

    fn message_line(&self) -> Line<'a> {
        let colors = &self.theme.colors;
        match self.message {
            Some(msg) if msg == MSG_TRY_AGAIN => {
                Line::from(Span::styled(msg, Style::default().fg(colors.error())))
            }
            Some(msg) => Line::from(Span::styled(
                msg,
                Style::default()
                    .fg(colors.success())
                    .add_modifier(Modifier::BOLD),
            )),
            None => Line::from(""),
        }
    }
}

impl Widget for ChallengeView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let block = Block::bordered()
            .title(format!(" Challenge · {} ", self.topic.title))
            .title_style(Style::default().fg(colors.accent()))
            .border_style(Style::default().fg(colors.border_focused()))
            .padding(Padding::horizontal(1))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let has_exhibit = !self.topic.exhibit.trim().is_empty();
        let constraints = if has_exhibit {
            vec![
                Constraint::Min(3),
                Constraint::Percentage(50),
                Constraint::Length(3),
                Constraint::Length(1),
            ]
        } else {
            vec![
                Constraint::Min(3),
                Constraint::Length(0),
                Constraint::Length(3),
                Constraint::Length(1),
            ]
        };
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(inner);

        Paragraph::new(self.topic.challenge.as_str())
            .style(Style::default().fg(colors.fg()))
            .wrap(Wrap { trim: false })
            .render(rows[0], buf);

        if has_exhibit {
            let exhibit_block = Block::bordered()
                .border_style(Style::default().fg(colors.border()))
                .style(Style::default().bg(colors.exhibit_bg()));
            Paragraph::new(self.topic.exhibit.as_str())
                .style(Style::default().fg(colors.fg()))
                .block(exhibit_block)
                .wrap(Wrap { trim: false })
                .render(rows[1], buf);
        }

        let input_block = Block::bordered()
            .title(" Your answer ")
            .border_style(Style::default().fg(colors.accent_dim()));
        Paragraph::new(self.input_line())
            .block(input_block)
            .render(rows[2], buf);

        Paragraph::new(self.message_line()).render(rows[3], buf);
    }
}
