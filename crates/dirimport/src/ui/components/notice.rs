//! Modal notice that must be acknowledged before the form accepts input again.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

/// State backing the notice overlay. At most one notice is shown at a time.
#[derive(Debug, Default, Clone)]
pub struct NoticeState {
    current: Option<ActiveNotice>,
    raised: usize,
}

#[derive(Debug, Clone)]
struct ActiveNotice {
    title: String,
    message: String,
}

impl NoticeState {
    /// Show a notice, replacing any that is still open.
    pub fn raise<T: Into<String>, M: Into<String>>(&mut self, title: T, message: M) {
        self.current = Some(ActiveNotice {
            title: title.into(),
            message: message.into(),
        });
        self.raised += 1;
    }

    /// Close the notice. Returns `false` when none was open.
    pub fn acknowledge(&mut self) -> bool {
        self.current.take().is_some()
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    pub fn message(&self) -> Option<&str> {
        self.current.as_ref().map(|notice| notice.message.as_str())
    }

    /// How many notices have been raised since the form opened.
    pub fn raised_count(&self) -> usize {
        self.raised
    }
}

/// Visual component that renders the notice overlay.
#[derive(Debug, Default)]
pub struct Notice;

impl Notice {
    /// Draw the notice centered in `area` if one is open.
    pub fn render(&self, frame: &mut Frame<'_>, area: Rect, state: &NoticeState) {
        let Some(notice) = &state.current else {
            return;
        };

        let width = area.width.saturating_sub(4).min(64);
        let message_lines = notice
            .message
            .lines()
            .map(|line| (line.chars().count() as u16 / width.saturating_sub(4).max(1)) + 1)
            .sum::<u16>();
        let height = (message_lines + 4).min(area.height);
        let popup = Rect {
            x: area.x + (area.width - width) / 2,
            y: area.y + (area.height - height) / 2,
            width,
            height,
        };

        frame.render_widget(Clear, popup);

        let color = Color::Yellow;
        let block = Block::default()
            .title(notice.title.clone())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color).add_modifier(Modifier::BOLD));
        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(inner);

        let lines: Vec<Line> = notice
            .message
            .lines()
            .map(|line| Line::from(line.to_owned()))
            .collect();
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), layout[0]);

        let footer = Paragraph::new(Line::styled(
            "[ OK ]  enter to continue",
            Style::default().fg(color),
        ));
        frame.render_widget(footer, layout[1]);
    }
}
