//! Application loop for the TUI.

use std::io::{self, Write};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};
use ratatui::{Frame, Terminal};
use tracing::{debug, info};

use crate::app::controller::ImportingController;
use crate::app::entries::DirectoryEntryList;
use crate::app::submission::SubmissionWorkflow;
use crate::domain::errors::SubmitError;
use crate::domain::model::EntryId;
use crate::infra::config::{Config, Keybindings};
use crate::infra::keys::{FormAction, Keymap};
use crate::infra::labels::{LabelKey, Labels};
use crate::ui::components::directory_form::{DirectoryForm, DirectoryFormState, FormFocus};
use crate::ui::components::notice::{Notice, NoticeState};

const TICK_RATE: Duration = Duration::from_millis(120);
const NOTICE_TITLE: &str = "Warning";

/// How an interactive session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiOutcome {
    Submitted { directories: usize },
    Cancelled,
}

/// Hosts the directory form, its notice overlay, and the submission workflow.
pub struct UiApp<C: ImportingController> {
    labels: Labels,
    keymap: Keymap,
    key_labels: Keybindings,
    entries: DirectoryEntryList,
    workflow: SubmissionWorkflow<C>,
    form_state: DirectoryFormState,
    form: DirectoryForm,
    notice_state: NoticeState,
    notice: Notice,
    status: Option<StatusMessage>,
    outcome: Option<UiOutcome>,
}

impl<C: ImportingController> UiApp<C> {
    /// Build the app around `controller`, the only collaborator a submission reaches.
    pub fn new(config: &Config, entries: DirectoryEntryList, controller: C) -> Result<Self> {
        let keymap = config.keybindings.resolve()?;
        let form_state = DirectoryFormState::new(&entries);
        Ok(Self {
            labels: config.labels.clone(),
            keymap,
            key_labels: config.keybindings.clone(),
            entries,
            workflow: SubmissionWorkflow::new(controller),
            form_state,
            form: DirectoryForm,
            notice_state: NoticeState::default(),
            notice: Notice,
            status: None,
            outcome: None,
        })
    }

    pub fn entries(&self) -> &DirectoryEntryList {
        &self.entries
    }

    pub fn workflow(&self) -> &SubmissionWorkflow<C> {
        &self.workflow
    }

    pub fn notice_state(&self) -> &NoticeState {
        &self.notice_state
    }

    pub fn form_state(&self) -> &DirectoryFormState {
        &self.form_state
    }

    pub fn outcome(&self) -> Option<UiOutcome> {
        self.outcome
    }

    pub fn into_controller(self) -> C {
        self.workflow.into_controller()
    }

    /// Give the first directory field input focus. Called when the form becomes the active view.
    pub fn focus(&mut self) {
        self.form_state.focus_first_input(&self.entries);
    }

    /// Launch the terminal UI and enter the event loop.
    pub fn run(&mut self) -> Result<UiOutcome> {
        let mut terminal = match enter_terminal() {
            Ok(terminal) => terminal,
            Err(err) => {
                restore_terminal(&mut io::stdout());
                return Err(err);
            }
        };

        self.focus();
        let event_loop_result = self.event_loop(&mut terminal);

        restore_terminal(terminal.backend_mut());
        let _ = terminal.show_cursor();

        event_loop_result?;
        Ok(self.outcome.unwrap_or(UiOutcome::Cancelled))
    }

    fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            terminal.draw(|frame| self.render(frame))?;
            self.tick();

            if self.outcome.is_some() {
                break;
            }

            if event::poll(TICK_RATE)? {
                let ev = event::read()?;
                self.handle_event(ev)?;
            }
        }
        Ok(())
    }

    pub fn render(&mut self, frame: &mut Frame<'_>) {
        let size = frame.size();
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(5),
                Constraint::Length(2),
                Constraint::Length(1),
            ])
            .split(size);

        let show_cursor = !self.notice_state.is_open();
        self.form.render(
            frame,
            layout[0],
            &self.entries,
            &mut self.form_state,
            &self.labels,
            show_cursor,
        );

        let hints = Paragraph::new(self.hint_line())
            .wrap(Wrap { trim: true })
            .style(Style::default().fg(Color::Gray));
        frame.render_widget(hints, layout[1]);

        self.render_status(frame, layout[2]);
        self.notice.render(frame, size, &self.notice_state);
    }

    fn hint_line(&self) -> Line<'static> {
        let key = |text: &str| Span::styled(text.to_owned(), Style::default().fg(Color::Cyan));
        let mut spans = vec![
            key("tab"),
            Span::raw(" next field · "),
            key(self.key_labels.add_row()),
            Span::raw(" add · "),
            key(self.key_labels.remove_row()),
            Span::raw(" remove · "),
            key(self.key_labels.submit()),
            Span::raw(" submit · "),
            key(self.key_labels.quit()),
            Span::raw(" quit"),
        ];
        if matches!(self.form_state.focus(), FormFocus::Remove(_)) {
            spans.push(Span::raw(" · "));
            spans.push(Span::styled(
                format!("↵ {}", self.labels.get(LabelKey::RemoveDirectory)),
                Style::default().fg(Color::Red),
            ));
        }
        Line::from(spans)
    }

    fn render_status(&mut self, frame: &mut Frame<'_>, area: Rect) {
        let message = self.status.as_ref().map(|status| {
            let style = match status.level {
                StatusLevel::Info => Style::default().fg(Color::Gray),
                StatusLevel::Error => Style::default().fg(Color::Red),
            };
            Line::styled(status.text.clone(), style)
        });

        let line = message.unwrap_or_else(|| {
            Line::styled(
                format!("{} row(s)", self.entries.len()),
                Style::default().fg(Color::DarkGray),
            )
        });
        frame.render_widget(Paragraph::new(line), area);
    }

    fn tick(&mut self) {
        if let Some(status) = &self.status
            && status.is_expired()
        {
            self.status = None;
        }
    }

    pub fn handle_event(&mut self, event: Event) -> Result<()> {
        match event {
            Event::Key(key) => self.handle_key_event(key)?,
            Event::Paste(text) => self.handle_paste(&text),
            Event::Resize(..) | Event::Mouse(_) => {}
            Event::FocusGained | Event::FocusLost => {}
        }
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        if key.kind == KeyEventKind::Release {
            return Ok(());
        }

        // The notice is a gate: nothing reaches the form until it is dismissed.
        if self.notice_state.is_open() {
            self.handle_notice_key(key);
            return Ok(());
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.cancel();
            return Ok(());
        }

        if let Some(action) = self.keymap.action_for(&key) {
            self.perform(action);
            return Ok(());
        }

        match key.code {
            KeyCode::Tab | KeyCode::Down => self.form_state.focus_next(&self.entries),
            KeyCode::BackTab | KeyCode::Up => self.form_state.focus_previous(&self.entries),
            KeyCode::Enter => self.activate_focused(),
            KeyCode::Char(' ') if !matches!(self.form_state.focus(), FormFocus::Input(_)) => {
                self.activate_focused();
            }
            _ => {
                if let FormFocus::Input(id) = self.form_state.focus() {
                    self.edit_entry(id, key);
                }
            }
        }
        Ok(())
    }

    fn handle_notice_key(&mut self, key: KeyEvent) {
        if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
            self.notice_state.acknowledge();
            self.workflow.acknowledge();
            debug!("validation notice acknowledged");
        }
    }

    fn handle_paste(&mut self, text: &str) {
        if self.notice_state.is_open() {
            return;
        }
        if let FormFocus::Input(id) = self.form_state.focus()
            && let Some(entry) = self.entries.get_mut(id)
        {
            for ch in text.chars().filter(|ch| !ch.is_control()) {
                entry.insert_char(ch);
            }
        }
    }

    fn perform(&mut self, action: FormAction) {
        match action {
            FormAction::AddRow => self.add_row(),
            FormAction::RemoveRow => {
                if let Some(id) = self.form_state.focused_entry() {
                    self.remove_row(id);
                }
            }
            FormAction::Submit => self.submit(),
            FormAction::Quit => self.cancel(),
        }
    }

    fn activate_focused(&mut self) {
        match self.form_state.focus() {
            FormFocus::Input(_) | FormFocus::NextButton => self.submit(),
            FormFocus::Remove(id) => self.remove_row(id),
            FormFocus::AddButton => self.add_row(),
        }
    }

    fn edit_entry(&mut self, id: EntryId, key: KeyEvent) {
        let Some(entry) = self.entries.get_mut(id) else {
            return;
        };
        match key.code {
            KeyCode::Char(ch)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                entry.insert_char(ch);
            }
            KeyCode::Backspace => entry.backspace(),
            KeyCode::Delete => entry.delete(),
            KeyCode::Left => entry.move_left(),
            KeyCode::Right => entry.move_right(),
            KeyCode::Home => entry.move_home(),
            KeyCode::End => entry.move_end(),
            _ => {}
        }
    }

    fn add_row(&mut self) {
        let id = self.entries.add_row();
        self.form_state.set_focus(FormFocus::Input(id));
        self.set_status(
            StatusLevel::Info,
            format!("Added row {}", self.entries.len()),
        );
    }

    fn remove_row(&mut self, id: EntryId) {
        let Some(index) = self.entries.position(id) else {
            return;
        };
        if self.entries.remove_row(id) {
            self.form_state.focus_after_removal(&self.entries, index);
            self.set_status(StatusLevel::Info, format!("Removed row {}", index + 1));
        }
    }

    fn submit(&mut self) {
        match self.workflow.submit(&self.entries) {
            Ok(directories) => {
                info!(directories, "directory form submitted");
                self.outcome = Some(UiOutcome::Submitted { directories });
            }
            Err(SubmitError::EmptyDirectoryList) => {
                self.notice_state
                    .raise(NOTICE_TITLE, self.labels.empty_directory_warning());
            }
            Err(err) => self.set_status(StatusLevel::Error, err.to_string()),
        }
    }

    fn cancel(&mut self) {
        info!("directory form cancelled");
        self.outcome = Some(UiOutcome::Cancelled);
    }

    fn set_status<S: Into<String>>(&mut self, level: StatusLevel, message: S) {
        self.status = Some(StatusMessage::new(level, message.into()));
    }
}

fn enter_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)
        .context("failed to enter alternate screen")?;
    Terminal::new(CrosstermBackend::new(stdout)).context("failed to initialize terminal")
}

/// Undo everything `enter_terminal` may have set up. Safe to call after a partial setup.
fn restore_terminal<W: Write>(writer: &mut W) {
    disable_raw_mode().ok();
    let _ = execute!(writer, DisableBracketedPaste, LeaveAlternateScreen);
}

#[derive(Debug)]
struct StatusMessage {
    level: StatusLevel,
    text: String,
    expires_at: Instant,
}

impl StatusMessage {
    fn new(level: StatusLevel, text: String) -> Self {
        Self {
            level,
            text,
            expires_at: Instant::now() + Duration::from_secs(4),
        }
    }

    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

#[derive(Debug, Clone, Copy)]
enum StatusLevel {
    Info,
    Error,
}
