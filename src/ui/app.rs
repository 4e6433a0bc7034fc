use std::mem;

use crossterm::event::KeyCode;
use log::debug;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap};
use ratatui::Frame;

use crate::controller::{Outcome, PendingDelete, UserController};
use crate::db::UserStore;
use crate::error::ActionError;

use super::forms::{build_line, push_char, Focus, FormField};
use super::helpers::{centered_rect, failure_text};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Form panel: three field lines plus the border.
const FORM_HEIGHT: u16 = 5;

/// Modal layers drawn on top of the form and list.
enum Mode {
    Normal,
    ConfirmDelete(PendingDelete),
    Notice(Notice),
}

/// Blocking dialog; every key press except Ctrl chords dismisses it.
struct Notice {
    title: &'static str,
    message: String,
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state shared across the TUI.
pub struct App<S> {
    controller: UserController<S>,
    focus: Focus,
    cursor: usize,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl<S: UserStore> App<S> {
    pub fn new(controller: UserController<S>) -> Self {
        Self {
            controller,
            focus: Focus::List,
            cursor: 0,
            mode: Mode::Normal,
            status: None,
        }
    }

    pub fn controller(&self) -> &UserController<S> {
        &self.controller
    }

    /// Initial population of the list. A failure is shown as a notice and
    /// leaves the list empty.
    pub fn load(&mut self) {
        if let Err(err) = self.controller.load() {
            self.mode = Mode::Notice(Notice {
                title: "Database Error",
                message: format!("Error loading users: {err}"),
            });
        }
        self.clamp_cursor();
    }

    /// Handle a key without modifiers. Returns `true` when the app should exit.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit),
            Mode::ConfirmDelete(pending) => self.handle_confirm_delete(code, pending),
            Mode::Notice(notice) => match code {
                KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') => Mode::Normal,
                _ => Mode::Notice(notice),
            },
        };

        exit
    }

    /// Handle a Ctrl chord. The form triggers live here so plain letters can
    /// be typed into the fields.
    pub fn handle_ctrl(&mut self, ch: char) -> bool {
        if matches!(ch, 'q' | 'c') {
            return true;
        }
        if !matches!(self.mode, Mode::Normal) {
            return false;
        }
        match ch {
            'a' => self.add_user(),
            'u' => self.update_user(),
            'd' => self.begin_delete(),
            'l' => self.clear_fields(),
            _ => {}
        }
        false
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Mode {
        match code {
            KeyCode::Esc => *exit = true,
            KeyCode::Tab => self.focus = self.focus.next(),
            KeyCode::BackTab => self.focus = self.focus.prev(),
            _ => match self.focus {
                Focus::List => self.handle_list_key(code, exit),
                Focus::Name | Focus::Email => self.handle_field_key(code),
            },
        }
        Mode::Normal
    }

    fn handle_list_key(&mut self, code: KeyCode, exit: &mut bool) {
        let count = self.controller.users().len();
        match code {
            KeyCode::Char('q') => *exit = true,
            KeyCode::Up => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Down => {
                if self.cursor + 1 < count {
                    self.cursor += 1;
                }
            }
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = count.saturating_sub(1),
            KeyCode::Enter => {
                if self.controller.select_row(self.cursor) {
                    self.clear_status();
                    debug!("event=row_selected index={}", self.cursor);
                }
            }
            _ => {}
        }
    }

    fn handle_field_key(&mut self, code: KeyCode) {
        let value = match self.focus {
            Focus::Name => self.controller.name_mut(),
            Focus::Email => self.controller.email_mut(),
            Focus::List => return,
        };
        match code {
            KeyCode::Char(ch) => {
                push_char(value, ch);
            }
            KeyCode::Backspace => {
                value.pop();
            }
            KeyCode::Enter => self.focus = self.focus.next(),
            _ => {}
        }
    }

    fn handle_confirm_delete(&mut self, code: KeyCode, pending: PendingDelete) -> Mode {
        let confirmed = match code {
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => true,
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => false,
            _ => return Mode::ConfirmDelete(pending),
        };
        match self.controller.resolve_delete(pending, confirmed) {
            Ok(Some(outcome)) => self.succeed(outcome),
            Ok(None) => {
                self.set_status("Deletion cancelled.", StatusKind::Info);
                Mode::Normal
            }
            Err(err) => self.fail(&err, "deleting"),
        }
    }

    fn add_user(&mut self) {
        self.mode = match self.controller.create() {
            Ok(outcome) => self.succeed(outcome),
            Err(err) => self.fail(&err, "adding"),
        };
    }

    fn update_user(&mut self) {
        self.mode = match self.controller.update() {
            Ok(outcome) => self.succeed(outcome),
            Err(err) => self.fail(&err, "updating"),
        };
    }

    fn begin_delete(&mut self) {
        self.mode = match self.controller.request_delete() {
            Ok(pending) => {
                self.clear_status();
                Mode::ConfirmDelete(pending)
            }
            Err(err) => self.fail(&ActionError::from(err), "deleting"),
        };
    }

    fn clear_fields(&mut self) {
        self.controller.clear();
        self.focus = Focus::Name;
        self.clear_status();
    }

    fn succeed(&mut self, outcome: Outcome) -> Mode {
        self.clamp_cursor();
        self.focus = Focus::List;
        self.set_status(outcome.message(), StatusKind::Info);
        Mode::Normal
    }

    fn fail(&mut self, err: &ActionError, verb: &str) -> Mode {
        if matches!(err, ActionError::Reload(_)) {
            self.focus = Focus::List;
        }
        let (title, message) = failure_text(err, verb);
        self.set_status(message.clone(), StatusKind::Error);
        Mode::Notice(Notice { title, message })
    }

    fn clamp_cursor(&mut self) {
        let count = self.controller.users().len();
        if self.cursor >= count {
            self.cursor = count.saturating_sub(1);
        }
    }

    fn set_status<T: Into<String>>(&mut self, text: T, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(FORM_HEIGHT),
                Constraint::Min(3),
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .split(area);

        self.draw_form(frame, chunks[0]);
        self.draw_user_table(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);

        match &self.mode {
            Mode::ConfirmDelete(pending) => self.draw_confirm_delete(frame, area, pending),
            Mode::Notice(notice) => self.draw_notice(frame, area, notice),
            Mode::Normal => {}
        }
    }

    fn draw_form(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().title("User").borders(Borders::ALL);
        let inner = block.inner(area);
        let buffer = self.controller.buffer();

        let lines: Vec<Line> = FormField::ALL
            .iter()
            .map(|field| build_line(*field, buffer, self.focus))
            .collect();
        frame.render_widget(Paragraph::new(lines).block(block), area);

        if !matches!(self.mode, Mode::Normal) {
            return;
        }
        let cursor = FormField::ALL
            .iter()
            .enumerate()
            .find(|(_, field)| field.focus() == Some(self.focus));
        if let Some((row, field)) = cursor {
            let len = field.value(buffer).chars().count() + field.prefix().len();
            frame.set_cursor_position((
                inner.x + cursor_column(len, inner.width),
                inner.y + row as u16,
            ));
        }
    }

    fn draw_user_table(&self, frame: &mut Frame, area: Rect) {
        let mut block = Block::default()
            .title(format!("Users ({})", self.controller.users().len()))
            .borders(Borders::ALL);
        if self.focus == Focus::List {
            block = block.border_style(Style::default().fg(Color::Cyan));
        }

        if self.controller.users().is_empty() {
            let message = Paragraph::new("No users yet. Fill in the form and press Ctrl+A.")
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(message, area);
            return;
        }

        let selected = self.controller.selection();
        let rows = self
            .controller
            .users()
            .iter()
            .enumerate()
            .map(|(idx, user)| {
                let row = Row::new(vec![
                    Cell::from(user.id.to_string()),
                    Cell::from(user.name.clone()),
                    Cell::from(user.email.clone()),
                ]);
                if Some(idx) == selected {
                    row.style(Style::default().fg(Color::Yellow))
                } else {
                    row
                }
            });

        let header = Row::new(vec!["ID", "Name", "Email"])
            .style(Style::default().add_modifier(Modifier::BOLD));
        let table = Table::new(
            rows,
            [
                Constraint::Length(6),
                Constraint::Percentage(40),
                Constraint::Percentage(60),
            ],
        )
        .header(header)
        .block(block)
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");

        let mut state = TableState::default();
        if self.focus == Focus::List {
            state.select(Some(self.cursor));
        }
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let paragraph = Paragraph::new(vec![status_line, self.footer_instructions()])
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        match self.mode {
            Mode::ConfirmDelete(_) => Line::from(vec![
                Span::styled("[Y]", key_style),
                Span::raw(" Delete   "),
                Span::styled("[N/Esc]", key_style),
                Span::raw(" Keep"),
            ]),
            Mode::Notice(_) => Line::from(vec![
                Span::styled("[Enter]", key_style),
                Span::raw(" Dismiss"),
            ]),
            Mode::Normal => Line::from(vec![
                Span::styled("[Tab]", key_style),
                Span::raw(" Field   "),
                Span::styled("[Enter]", key_style),
                Span::raw(" Select   "),
                Span::styled("[^A]", key_style),
                Span::raw(" Add   "),
                Span::styled("[^U]", key_style),
                Span::raw(" Update   "),
                Span::styled("[^D]", key_style),
                Span::raw(" Delete   "),
                Span::styled("[^L]", key_style),
                Span::raw(" Clear   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Quit"),
            ]),
        }
    }

    fn draw_confirm_delete(&self, frame: &mut Frame, area: Rect, pending: &PendingDelete) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Confirm Deletion")
            .borders(Borders::ALL);
        let lines = vec![
            Line::from(format!(
                "Are you sure you want to delete user #{} ({})?",
                pending.id, pending.name
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Press Y to confirm or N / Esc to cancel.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup_area);
    }

    fn draw_notice(&self, frame: &mut Frame, area: Rect, notice: &Notice) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(notice.title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red));
        let lines = vec![
            Line::from(notice.message.clone()),
            Line::from(""),
            Line::from(Span::styled(
                "Press Enter to continue.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup_area);
    }
}

/// Column offset for a text cursor after `len` characters, kept inside a
/// panel `width` cells wide.
fn cursor_column(len: usize, width: u16) -> u16 {
    u16::try_from(len)
        .unwrap_or(u16::MAX)
        .min(width.saturating_sub(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryUserStore;
    use crate::models::User;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn app_with(store: &MemoryUserStore) -> App<&MemoryUserStore> {
        let mut app = App::new(UserController::new(store));
        app.load();
        app
    }

    fn type_text<S: UserStore>(app: &mut App<S>, text: &str) {
        for ch in text.chars() {
            app.handle_key(KeyCode::Char(ch));
        }
    }

    fn rendered(app: &App<&MemoryUserStore>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|frame| app.draw(frame)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn typing_into_fields_and_adding_creates_a_user() {
        let store = MemoryUserStore::new();
        let mut app = app_with(&store);

        app.handle_key(KeyCode::Tab);
        type_text(&mut app, "Ann");
        app.handle_key(KeyCode::Enter);
        type_text(&mut app, "ann@x.comm");
        app.handle_key(KeyCode::Backspace);
        assert!(!app.handle_ctrl('a'));

        assert_eq!(store.snapshot(), vec![User::new(1, "Ann", "ann@x.com")]);
        assert_eq!(app.controller().buffer().name, "");
        assert_eq!(app.focus, Focus::List);
        assert!(matches!(app.mode, Mode::Normal));
    }

    #[test]
    fn letters_in_the_list_do_not_edit_fields() {
        let store = MemoryUserStore::with_users([("Ann", "ann@x.com")]);
        let mut app = app_with(&store);

        assert!(!app.handle_key(KeyCode::Char('x')));
        assert_eq!(app.controller().buffer().name, "");
        assert!(app.handle_key(KeyCode::Char('q')));
    }

    #[test]
    fn enter_on_list_selects_row_under_cursor() {
        let store = MemoryUserStore::with_users([("Ann", "ann@x.com"), ("Bo", "bo@x.com")]);
        let mut app = app_with(&store);

        app.handle_key(KeyCode::Down);
        app.handle_key(KeyCode::Down);
        app.handle_key(KeyCode::Enter);

        assert_eq!(app.controller().selection(), Some(1));
        assert_eq!(app.controller().buffer().id, Some(2));
    }

    #[test]
    fn empty_fields_open_an_input_notice() {
        let store = MemoryUserStore::new();
        let mut app = app_with(&store);
        let calls_before = store.calls();

        app.handle_ctrl('a');

        match &app.mode {
            Mode::Notice(notice) => {
                assert_eq!(notice.title, "Input Error");
                assert_eq!(notice.message, "Name and Email cannot be empty.");
            }
            _ => panic!("expected a notice"),
        }
        assert_eq!(store.calls(), calls_before);

        // Triggers stay inert until the notice is dismissed.
        app.handle_ctrl('a');
        assert_eq!(store.calls(), calls_before);
        app.handle_key(KeyCode::Enter);
        assert!(matches!(app.mode, Mode::Normal));
    }

    #[test]
    fn delete_asks_before_removing() {
        let store = MemoryUserStore::with_users([("Ann", "ann@x.com")]);
        let mut app = app_with(&store);
        app.handle_key(KeyCode::Enter);

        app.handle_ctrl('d');
        assert!(matches!(app.mode, Mode::ConfirmDelete(_)));
        app.handle_key(KeyCode::Char('n'));
        assert_eq!(store.snapshot().len(), 1);
        assert_eq!(app.controller().buffer().id, Some(1));

        app.handle_ctrl('d');
        app.handle_key(KeyCode::Char('y'));
        assert!(store.snapshot().is_empty());
        assert!(app.controller().users().is_empty());
        assert_eq!(app.cursor, 0);
    }

    #[test]
    fn store_failure_on_update_is_reported_with_context() {
        let store = MemoryUserStore::with_users([("Ann", "ann@x.com")]);
        let mut app = app_with(&store);
        app.handle_key(KeyCode::Enter);
        store.fail_next("database is locked");

        app.handle_ctrl('u');

        match &app.mode {
            Mode::Notice(notice) => {
                assert_eq!(notice.title, "Database Error");
                assert_eq!(notice.message, "Error updating user: database is locked");
            }
            _ => panic!("expected a notice"),
        }
        assert_eq!(app.controller().buffer().id, Some(1));
    }

    #[test]
    fn failed_initial_load_shows_notice() {
        let store = MemoryUserStore::new();
        store.fail_next("unable to open database file");
        let app = app_with(&store);

        match &app.mode {
            Mode::Notice(notice) => assert_eq!(
                notice.message,
                "Error loading users: unable to open database file"
            ),
            _ => panic!("expected a notice"),
        }
    }

    #[test]
    fn clear_resets_form_and_focuses_name() {
        let store = MemoryUserStore::with_users([("Ann", "ann@x.com")]);
        let mut app = app_with(&store);
        app.handle_key(KeyCode::Enter);

        app.handle_ctrl('l');

        assert_eq!(app.controller().selection(), None);
        assert_eq!(app.controller().buffer().id, None);
        assert_eq!(app.focus, Focus::Name);
    }

    #[test]
    fn ctrl_q_quits_from_any_mode() {
        let store = MemoryUserStore::new();
        let mut app = app_with(&store);
        app.handle_ctrl('a');
        assert!(app.handle_ctrl('q'));
    }

    #[test]
    fn draw_shows_form_and_rows() {
        let store = MemoryUserStore::with_users([("Ann", "ann@x.com")]);
        let mut app = app_with(&store);
        app.handle_key(KeyCode::Enter);

        let screen = rendered(&app);
        assert!(screen.contains("Users (1)"));
        assert!(screen.contains("ann@x.com"));
        assert!(screen.contains("Name:  Ann"));
    }

    #[test]
    fn cursor_column_stays_inside_the_panel() {
        assert_eq!(cursor_column(10, 78), 10);
        assert_eq!(cursor_column(500, 78), 77);
        assert_eq!(cursor_column(70_000, 78), 77);
        assert_eq!(cursor_column(3, 0), 0);
    }

    #[test]
    fn draw_with_overlong_name_does_not_panic() {
        let store = MemoryUserStore::new();
        let mut app = app_with(&store);
        app.handle_key(KeyCode::Tab);
        type_text(&mut app, &"n".repeat(300));

        let screen = rendered(&app);
        assert!(screen.contains("Name:  nnn"));
    }

    #[test]
    fn draw_empty_list_hint() {
        let store = MemoryUserStore::new();
        let app = app_with(&store);

        let screen = rendered(&app);
        assert!(screen.contains("No users yet."));
    }
}
