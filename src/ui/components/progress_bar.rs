use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Block, Widget};

use crate::ui::theme::Theme;

/// Curriculum completion bar. `ratio` is the animated value, not the target.
pub struct ProgressBar<'a> {
    pub ratio: f64,
    pub position: Option<(usize, usize)>,
    pub theme: &'a Theme,
}

impl<'a> ProgressBar<'a> {
    pub fn new(ratio: f64, theme: &'a Theme) -> Self {
        Self {
            ratio: if ratio.is_finite() { ratio.clamp(0.0, 1.0) } else { 0.0 },
            position: None,
            theme,
        }
    }

    /// Show "topic n of m" in the title. `ordinal` is zero-based.
    pub fn with_position(mut self, ordinal: usize, total: usize) -> Self {
        self.position = Some((ordinal + 1, total));
        self
    }

    pub fn filled_width(&self, width: u16) -> u16 {
        ((self.ratio * width as f64).round() as u16).min(width)
    }
}

impl Widget for ProgressBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let title = match self.position {
            Some((n, total)) => format!(" Progress · topic {n} of {total} "),
            None => " Progress ".to_string(),
        };
        let block = Block::bordered()
            .title(title)
            .border_style(Style::default().fg(colors.border()));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let filled_width = self.filled_width(inner.width);
        for x in inner.x..inner.x + inner.width {
            let style = if x < inner.x + filled_width {
                Style::default().fg(colors.bg()).bg(colors.bar_filled())
            } else {
                Style::default().fg(colors.fg()).bg(colors.bar_empty())
            };
            buf[(x, inner.y)].set_style(style);
        }

        let label = format!("{:.0}%", self.ratio * 100.0);
        let label_x = inner.x + (inner.width.saturating_sub(label.len() as u16)) / 2;
        buf.set_string(label_x, inner.y, &label, Style::default().fg(colors.fg()));
    }
}
