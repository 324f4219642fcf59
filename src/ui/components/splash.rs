use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Padding, Paragraph, Widget, Wrap};

use crate::telemetry::SummaryState;
use crate::ui::theme::Theme;

pub const INTRO_TITLE: &str = "ShellHacked 2024 - a Digital Literacy Lesson";

/// Start screen. Shows `notice` instead of the prompt when there is nothing to start.
pub struct IntroScreen<'a> {
    pub total_topics: usize,
    pub notice: Option<&'a str>,
    pub theme: &'a Theme,
}

impl Widget for IntroScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                INTRO_TITLE,
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Learn to spot weak passwords, phishing and privacy traps.",
                Style::default().fg(colors.fg()),
            )),
            Line::from(""),
        ];
        match self.notice {
            Some(notice) => lines.push(Line::from(Span::styled(
                notice,
                Style::default().fg(colors.warning()),
            ))),
            None => {
                lines.push(Line::from(Span::styled(
                    format!("{} topics ahead.", self.total_topics),
                    Style::default().fg(colors.text_dim()),
                )));
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    "Press Enter to begin",
                    Style::default().fg(colors.accent()),
                )));
            }
        }

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(
                Block::bordered()
                    .border_style(Style::default().fg(colors.border()))
                    .padding(Padding::uniform(1))
                    .style(Style::default().bg(colors.bg())),
            )
            .render(area, buf);
    }
}

pub struct CompletionScreen<'a> {
    pub progress: f64,
    pub summary: &'a SummaryState,
    pub theme: &'a Theme,
}

impl CompletionScreen<'_> {
    fn summary_line(&self) -> Option<String> {
        match self.summary {
            SummaryState::NotConfigured => None,
            SummaryState::Idle | SummaryState::Pending => Some("Fetching summary…".to_string()),
            SummaryState::Ready(summary) => Some(format!(
                "Here's what this quiz collected from its players: {}",
                summary.describe()
            )),
            SummaryState::Unavailable => Some("Summary unavailable.".to_string()),
        }
    }
}

impl Widget for CompletionScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Congratulations! You've completed all the lessons.",
                Style::default()
                    .fg(colors.success())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                format!("Progress: {:.0}%", self.progress * 100.0),
                Style::default().fg(colors.fg()),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "The biggest lesson: don't run programs you don't trust.",
                Style::default().fg(colors.warning()),
            )),
            Line::from(Span::styled(
                "A binary of unknown origin can give an attacker control of your computer.",
                Style::default().fg(colors.fg()),
            )),
        ];
        if let Some(summary) = self.summary_line() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                summary,
                Style::default().fg(colors.text_dim()),
            )));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Be safe online. Press Enter to exit.",
            Style::default().fg(colors.accent()),
        )));

        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(
                Block::bordered()
                    .border_style(Style::default().fg(colors.border_focused()))
                    .padding(Padding::uniform(1))
                    .style(Style::default().bg(colors.bg())),
            )
            .render(area, buf);
    }
}
