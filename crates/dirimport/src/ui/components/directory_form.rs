//! Directory list form: one editable row per entry plus the action buttons.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::entries::DirectoryEntryList;
use crate::domain::model::{DirectoryEntry, EntryId};
use crate::infra::labels::{LabelKey, Labels};

const ROW_PREFIX_WIDTH: u16 = 5;
const REMOVE_GLYPH: &str = " ✕ ";
const REMOVE_WIDTH: u16 = 4;

/// The control that currently receives key input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormFocus {
    Input(EntryId),
    Remove(EntryId),
    AddButton,
    NextButton,
}

/// Focus and scroll position of the form.
#[derive(Debug, Clone)]
pub struct DirectoryFormState {
    focus: FormFocus,
    scroll: usize,
}

impl DirectoryFormState {
    pub fn new(entries: &DirectoryEntryList) -> Self {
        let mut state = Self {
            focus: FormFocus::AddButton,
            scroll: 0,
        };
        state.focus_first_input(entries);
        state
    }

    pub fn focus(&self) -> FormFocus {
        self.focus
    }

    pub fn set_focus(&mut self, focus: FormFocus) {
        self.focus = focus;
    }

    /// Row targeted by the current focus, whether its input or its remove control.
    pub fn focused_entry(&self) -> Option<EntryId> {
        match self.focus {
            FormFocus::Input(id) | FormFocus::Remove(id) => Some(id),
            FormFocus::AddButton | FormFocus::NextButton => None,
        }
    }

    /// Put the cursor in the first directory field. Returns `false` when there are no rows.
    pub fn focus_first_input(&mut self, entries: &DirectoryEntryList) -> bool {
        match entries.first_id() {
            Some(id) => {
                self.focus = FormFocus::Input(id);
                self.scroll = 0;
                true
            }
            None => {
                self.focus = FormFocus::AddButton;
                false
            }
        }
    }

    pub fn focus_next(&mut self, entries: &DirectoryEntryList) {
        self.step(entries, 1);
    }

    pub fn focus_previous(&mut self, entries: &DirectoryEntryList) {
        self.step(entries, -1);
    }

    fn step(&mut self, entries: &DirectoryEntryList, delta: isize) {
        let order = focus_order(entries);
        let current = order
            .iter()
            .position(|focus| *focus == self.focus)
            .unwrap_or(0);
        let len = order.len() as isize;
        let next = (current as isize + delta).rem_euclid(len) as usize;
        self.focus = order[next];
    }

    /// Move focus after the row at `removed_index` was taken out of the list:
    /// the row that slid into its place, else the one above, else the add button.
    pub fn focus_after_removal(&mut self, entries: &DirectoryEntryList, removed_index: usize) {
        let target = entries
            .id_at(removed_index)
            .or_else(|| removed_index.checked_sub(1).and_then(|idx| entries.id_at(idx)));
        self.focus = match target {
            Some(id) => FormFocus::Input(id),
            None => FormFocus::AddButton,
        };
    }

    fn focused_row_index(&self, entries: &DirectoryEntryList) -> Option<usize> {
        self.focused_entry().and_then(|id| entries.position(id))
    }
}

fn focus_order(entries: &DirectoryEntryList) -> Vec<FormFocus> {
    let mut order = Vec::with_capacity(entries.len() * 2 + 2);
    for entry in entries.entries() {
        order.push(FormFocus::Input(entry.id()));
        order.push(FormFocus::Remove(entry.id()));
    }
    order.push(FormFocus::AddButton);
    order.push(FormFocus::NextButton);
    order
}

/// First visible row so that `focused` stays on screen.
fn scroll_offset(current: usize, focused: Option<usize>, visible: usize, total: usize) -> usize {
    if visible == 0 || total <= visible {
        return 0;
    }
    let max_offset = total - visible;
    let offset = match focused {
        Some(row) if row < current => row,
        Some(row) if row >= current + visible => row + 1 - visible,
        _ => current,
    };
    offset.min(max_offset)
}

/// Renders the directory list form.
#[derive(Debug, Default)]
pub struct DirectoryForm;

impl DirectoryForm {
    /// Draw the form into `area`, replacing whatever was there.
    pub fn render(
        &self,
        frame: &mut Frame<'_>,
        area: Rect,
        entries: &DirectoryEntryList,
        state: &mut DirectoryFormState,
        labels: &Labels,
        show_cursor: bool,
    ) {
        let block = Block::default()
            .title(labels.get(LabelKey::EnterDir).to_owned())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(inner);

        self.render_rows(frame, layout[0], entries, state, show_cursor);
        self.render_buttons(frame, layout[2], state, labels);
    }

    fn render_rows(
        &self,
        frame: &mut Frame<'_>,
        area: Rect,
        entries: &DirectoryEntryList,
        state: &mut DirectoryFormState,
        show_cursor: bool,
    ) {
        if entries.is_empty() {
            let placeholder = Paragraph::new("No directories").style(
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            );
            frame.render_widget(placeholder, area);
            return;
        }

        let visible = area.height as usize;
        state.scroll = scroll_offset(
            state.scroll,
            state.focused_row_index(entries),
            visible,
            entries.len(),
        );

        let input_width = area
            .width
            .saturating_sub(ROW_PREFIX_WIDTH + REMOVE_WIDTH)
            .max(1) as usize;

        let mut lines = Vec::with_capacity(visible);
        for (row, entry) in entries
            .entries()
            .iter()
            .enumerate()
            .skip(state.scroll)
            .take(visible)
        {
            let input_focused = state.focus == FormFocus::Input(entry.id());
            let remove_focused = state.focus == FormFocus::Remove(entry.id());
            let (text, first_column) = visible_text(entry, input_width);

            if input_focused && show_cursor {
                let column = (entry.cursor_column() - first_column) as u16;
                let y = area.y + (row - state.scroll) as u16;
                frame.set_cursor(area.x + ROW_PREFIX_WIDTH + column, y);
            }

            let input_style = if input_focused {
                Style::default().fg(Color::White).bg(Color::Rgb(40, 44, 52))
            } else {
                Style::default().fg(Color::Gray).bg(Color::Rgb(24, 24, 24))
            };
            let remove_style = if remove_focused {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Red)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Red)
            };

            lines.push(Line::from(vec![
                Span::styled(
                    format!("{:>3}. ", row + 1),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(format!("{text:<input_width$}"), input_style),
                Span::raw(" "),
                Span::styled(REMOVE_GLYPH, remove_style),
            ]));
        }

        frame.render_widget(Paragraph::new(lines), area);
    }

    fn render_buttons(
        &self,
        frame: &mut Frame<'_>,
        area: Rect,
        state: &DirectoryFormState,
        labels: &Labels,
    ) {
        let line = Line::from(vec![
            button(
                labels.get(LabelKey::AddDir),
                state.focus == FormFocus::AddButton,
            ),
            Span::raw("  "),
            button(
                labels.get(LabelKey::Next),
                state.focus == FormFocus::NextButton,
            ),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }
}

fn button(label: &str, focused: bool) -> Span<'static> {
    let style = if focused {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Cyan)
    };
    Span::styled(format!("[ {label} ]"), style)
}

/// Slice of the entry that fits `width` columns while keeping the cursor visible.
/// Returns the text and the index of its first character.
fn visible_text(entry: &DirectoryEntry, width: usize) -> (String, usize) {
    let cursor = entry.cursor_column();
    let first = (cursor + 1).saturating_sub(width);
    let text = entry.path().chars().skip(first).take(width).collect();
    (text, first)
}

#[cfg(test)]
mod tests {
    use super::*;

    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::buffer::Buffer;

    fn buffer_text(buffer: &Buffer) -> String {
        let width = buffer.area.width as usize;
        buffer
            .content
            .chunks(width)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn draw(
        entries: &DirectoryEntryList,
        state: &mut DirectoryFormState,
        width: u16,
        height: u16,
    ) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        let labels = Labels::default();
        terminal
            .draw(|frame| {
                let area = frame.size();
                DirectoryForm.render(frame, area, entries, state, &labels, true);
            })
            .unwrap();
        buffer_text(terminal.backend().buffer())
    }

    #[test]
    fn renders_rows_buttons_and_caption() {
        let entries = DirectoryEntryList::with_values(["/data/a", "/data/b"]);
        let mut state = DirectoryFormState::new(&entries);
        let text = draw(&entries, &mut state, 70, 8);

        assert!(text.contains("Enter one or more directories to import"));
        assert!(text.contains("1. /data/a"));
        assert!(text.contains("2. /data/b"));
        assert!(text.contains("[ Add another directory ]"));
        assert!(text.contains("[ Next » ]"));
        assert_eq!(text.matches('✕').count(), 2);
    }

    #[test]
    fn renders_placeholder_for_empty_list() {
        let entries = DirectoryEntryList::with_rows(0);
        let mut state = DirectoryFormState::new(&entries);
        assert_eq!(state.focus(), FormFocus::AddButton);
        let text = draw(&entries, &mut state, 50, 6);
        assert!(text.contains("No directories"));
    }

    #[test]
    fn scrolls_to_keep_focused_row_visible() {
        let values: Vec<String> = (1..=10).map(|n| format!("/dir/{n}")).collect();
        let entries = DirectoryEntryList::with_values(values);
        let mut state = DirectoryFormState::new(&entries);
        state.set_focus(FormFocus::Input(entries.id_at(9).unwrap()));

        // 7 rows tall: 2 borders, 3 list rows, spacer, buttons.
        let text = draw(&entries, &mut state, 60, 7);
        assert!(text.contains("/dir/10"));
        assert!(!text.contains("/dir/1 "));
        assert_eq!(state.scroll, 7);
    }

    #[test]
    fn tab_order_visits_inputs_remove_controls_and_buttons() {
        let entries = DirectoryEntryList::with_rows(2);
        let first = entries.id_at(0).unwrap();
        let second = entries.id_at(1).unwrap();
        let mut state = DirectoryFormState::new(&entries);

        let mut seen = vec![state.focus()];
        for _ in 0..6 {
            state.focus_next(&entries);
            seen.push(state.focus());
        }
        assert_eq!(
            seen,
            vec![
                FormFocus::Input(first),
                FormFocus::Remove(first),
                FormFocus::Input(second),
                FormFocus::Remove(second),
                FormFocus::AddButton,
                FormFocus::NextButton,
                FormFocus::Input(first),
            ]
        );

        state.focus_previous(&entries);
        assert_eq!(state.focus(), FormFocus::NextButton);
    }

    #[test]
    fn focus_after_removal_prefers_following_row() {
        let mut entries = DirectoryEntryList::with_rows(3);
        let middle = entries.id_at(1).unwrap();
        let last = entries.id_at(2).unwrap();
        let mut state = DirectoryFormState::new(&entries);

        entries.remove_row(middle);
        state.focus_after_removal(&entries, 1);
        assert_eq!(state.focus(), FormFocus::Input(last));

        entries.remove_row(last);
        state.focus_after_removal(&entries, 1);
        assert_eq!(state.focus(), FormFocus::Input(entries.id_at(0).unwrap()));

        let only = entries.id_at(0).unwrap();
        entries.remove_row(only);
        state.focus_after_removal(&entries, 0);
        assert_eq!(state.focus(), FormFocus::AddButton);
    }

    #[test]
    fn long_values_scroll_with_the_cursor() {
        let entries = DirectoryEntryList::with_values(["/a/very/long/directory/path"]);
        let entry = &entries.entries()[0];
        let (text, first) = visible_text(entry, 10);
        assert_eq!(text.chars().count(), 9);
        assert_eq!(first, entry.cursor_column() + 1 - 10);
        assert!(entry.path().ends_with(&text));
    }
}
