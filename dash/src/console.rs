//! Interactive moderation console using ratatui + crossterm.
//!
//! Renders one screen's table, filter bar, selection and dialogs on top of a
//! [`ModerationController`]. Requests run as tokio tasks and report back over
//! an mpsc channel; the event loop is the only owner of controller state.

use std::io::{self, Stdout};
use std::time::Duration;

use campus::controller::filter::SORT_ORDER;
use campus::controller::{
    ActionOutcome, ActionRequest, Dialog, DialogField, FetchTicket, ModerationApi,
    PreparedAction, Target,
};
use campus::screen::Screen;
use campus::types::{DashboardSummary, Page};
use campus::{
    ActionKind, CampusError, CampusHttpClient, ModerationController, Notice, NoticeLevel,
    ScreenClient,
};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap};
use rust_decimal::Decimal;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::commands::Record;
use crate::error::DashError;
use crate::logging::LogBuffer;

/// Target render interval (10 FPS).
const RENDER_INTERVAL: Duration = Duration::from_millis(100);

/// Log lines shown under the table.
const LOG_PANEL_LINES: usize = 6;

// ---------------------------------------------------------------------------
// Internal types
// ---------------------------------------------------------------------------

/// Completed request, sent back to the event loop.
enum Msg<T> {
    Fetched(FetchTicket, campus::Result<Page<T>>),
    Acted(PreparedAction, campus::Result<ActionOutcome<T>>),
    Summary(campus::Result<Option<DashboardSummary>>),
}

/// Request the event loop must start.
#[derive(Debug, Clone, PartialEq)]
enum Effect {
    Fetch(FetchTicket),
    Perform(PreparedAction),
    Summary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Normal,
    Search,
}

struct Console<T> {
    controller: ModerationController<T>,
    cursor: usize,
    mode: Mode,
    quit: bool,
}

impl<T: Record> Console<T> {
    fn new(screen: &'static Screen, page_size: u32) -> Result<Self, DashError> {
        Ok(Self {
            controller: ModerationController::new(screen, page_size)?,
            cursor: 0,
            mode: Mode::Normal,
            quit: false,
        })
    }

    fn screen(&self) -> &'static Screen {
        self.controller.screen()
    }

    fn start(&mut self) -> Vec<Effect> {
        let mut effects = vec![Effect::Fetch(self.controller.begin_fetch())];
        if self.controller.take_summary_refresh() {
            effects.push(Effect::Summary);
        }
        effects
    }

    fn rows(&self) -> &[T] {
        self.controller
            .page()
            .map(|p| p.items.as_slice())
            .unwrap_or(&[])
    }

    fn current_id(&self) -> Option<String> {
        self.rows().get(self.cursor).map(|r| r.id().to_string())
    }

    fn clamp_cursor(&mut self) {
        let len = self.rows().len();
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }

    // --- messages ---

    fn handle_msg(&mut self, msg: Msg<T>) -> Vec<Effect> {
        let mut effects = Vec::new();
        match msg {
            Msg::Fetched(ticket, result) => {
                let outcome = self.controller.settle_fetch(&ticket, result);
                debug!(id = ticket.id, ?outcome, "fetch settled");
            }
            Msg::Acted(action, result) => {
                if let Ok(rec) = self.controller.settle_action(&action, result) {
                    if rec.needs_refetch {
                        effects.push(Effect::Fetch(self.controller.begin_fetch()));
                    }
                }
                if self.controller.take_summary_refresh() {
                    effects.push(Effect::Summary);
                }
            }
            Msg::Summary(result) => self.controller.apply_summary(result),
        }
        self.clamp_cursor();
        effects
    }

    // --- keys ---

    fn handle_key(&mut self, code: KeyCode) -> Vec<Effect> {
        let effects = if self.controller.dialog().is_open() {
            self.dialog_key(code)
        } else if self.mode == Mode::Search {
            self.search_key(code)
        } else {
            self.normal_key(code)
        };
        self.clamp_cursor();
        effects
    }

    fn normal_key(&mut self, code: KeyCode) -> Vec<Effect> {
        let mut effects = Vec::new();
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.quit = true,
            KeyCode::Down | KeyCode::Char('j') => self.cursor += 1,
            KeyCode::Up | KeyCode::Char('k') => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right | KeyCode::Char('l') => {
                effects.extend(self.controller.next_page().map(Effect::Fetch));
                self.cursor = 0;
            }
            KeyCode::Left | KeyCode::Char('h') => {
                effects.extend(self.controller.prev_page().map(Effect::Fetch));
                self.cursor = 0;
            }
            KeyCode::Char(' ') => {
                if let Some(id) = self.current_id() {
                    self.controller.toggle_select(&id);
                }
            }
            KeyCode::Char('a') => self.controller.toggle_select_all(),
            KeyCode::Char('s') if self.screen().default_status.is_some() => {
                let next = self.controller.filters().next_status_value();
                effects.extend(self.controller.edit_filter("status", next).map(Effect::Fetch));
            }
            KeyCode::Char('o') if self.screen().default_sort.is_some() => {
                let order = self.controller.filters().applied().sort_order().toggled();
                effects.extend(
                    self.controller
                        .edit_filter(SORT_ORDER, order.as_str())
                        .map(Effect::Fetch),
                );
            }
            KeyCode::Char('/') => self.mode = Mode::Search,
            KeyCode::Char('r') => {
                effects.push(Effect::Fetch(self.controller.begin_fetch()));
                if self.screen().summary_path.is_some() {
                    effects.push(Effect::Summary);
                }
            }
            KeyCode::Char('R') => {
                effects.push(Effect::Fetch(self.controller.reset_filters()));
                self.cursor = 0;
            }
            KeyCode::Char('c') => self.controller.dismiss_notice(),
            KeyCode::Enter => {
                if let Some(id) = self.current_id() {
                    self.controller.dialog_mut().view(id);
                }
            }
            KeyCode::Char('y') => self.open_for_current(ActionKind::Approve),
            KeyCode::Char('x') => self.open_for_current(ActionKind::Reject),
            KeyCode::Char('g') => self.open_for_current(ActionKind::Grade),
            KeyCode::Char('d') => self.open_for_current(ActionKind::Delete),
            KeyCode::Char('Y') => self.open_for_selection(ActionKind::Approve),
            KeyCode::Char('X') => self.open_for_selection(ActionKind::Reject),
            _ => {}
        }
        effects
    }

    fn open_for_current(&mut self, kind: ActionKind) {
        let Some(id) = self.current_id() else {
            return;
        };
        if !self.screen().supports(kind) {
            self.controller.set_notice(Notice::info(format!(
                "{} does not support {kind}",
                self.screen().title
            )));
            return;
        }
        let dialog = self.controller.dialog_mut();
        match kind {
            ActionKind::Approve => dialog.confirm_approve(vec![id]),
            ActionKind::Reject => dialog.confirm_reject(vec![id]),
            ActionKind::Grade => dialog.grade(id),
            ActionKind::Delete => dialog.confirm_delete(id),
            ActionKind::Edit => {}
        }
    }

    fn open_for_selection(&mut self, kind: ActionKind) {
        if !self.screen().bulk {
            self.controller.set_notice(Notice::info(format!(
                "{} has no bulk actions",
                self.screen().title
            )));
            return;
        }
        let ids = self.controller.selection().ids();
        if ids.is_empty() {
            self.controller
                .set_notice(Notice::info("Select rows with space or 'a' first"));
            return;
        }
        let dialog = self.controller.dialog_mut();
        match kind {
            ActionKind::Reject => dialog.confirm_reject(ids),
            _ => dialog.confirm_approve(ids),
        }
    }

    fn search_key(&mut self, code: KeyCode) -> Vec<Effect> {
        let mut search = self
            .controller
            .filters()
            .draft("search")
            .unwrap_or_default()
            .to_string();
        match code {
            KeyCode::Enter => {
                self.mode = Mode::Normal;
                self.cursor = 0;
                return vec![Effect::Fetch(self.controller.apply_filters())];
            }
            KeyCode::Esc => self.mode = Mode::Normal,
            KeyCode::Backspace => {
                search.pop();
                self.controller.edit_filter("search", search);
            }
            KeyCode::Char(c) => {
                search.push(c);
                self.controller.edit_filter("search", search);
            }
            _ => {}
        }
        Vec::new()
    }

    fn dialog_key(&mut self, code: KeyCode) -> Vec<Effect> {
        match code {
            KeyCode::Esc => self.controller.dialog_mut().cancel(),
            KeyCode::Tab => self.controller.dialog_mut().next_field(),
            KeyCode::Backspace => self.controller.dialog_mut().backspace(),
            KeyCode::Enter => return self.confirm_dialog(),
            KeyCode::Char(c) => self.controller.dialog_mut().input(c),
            _ => {}
        }
        Vec::new()
    }

    fn confirm_dialog(&mut self) -> Vec<Effect> {
        match dialog_request(self.controller.dialog().state()) {
            Ok(Some((target, request))) => match self.controller.prepare_action(target, request) {
                Ok(action) => vec![Effect::Perform(action)],
                // notice already set by the controller
                Err(_) => Vec::new(),
            },
            Ok(None) => {
                self.controller.dialog_mut().cancel();
                Vec::new()
            }
            Err(err) => {
                self.controller.set_notice(Notice::from_error(&err));
                Vec::new()
            }
        }
    }
}

/// Turn the open dialog's input into an action. `Ok(None)` for dialogs that
/// only display something.
fn dialog_request(dialog: &Dialog) -> Result<Option<(Target, ActionRequest)>, CampusError> {
    let target = |ids: &[String]| match ids {
        [one] => Target::One(one.clone()),
        many => Target::Many(many.to_vec()),
    };
    let request = match dialog {
        Dialog::Closed | Dialog::Viewing { .. } => return Ok(None),
        Dialog::ConfirmingApprove { targets } => {
            (target(targets), ActionRequest::Approve { note: None })
        }
        Dialog::ConfirmingReject {
            targets,
            reason,
            detail,
            ..
        } => (
            target(targets),
            ActionRequest::Reject {
                reason: reason.clone(),
                detailed_reason: Some(detail.clone()),
            },
        ),
        Dialog::ConfirmingDelete { id } => (Target::One(id.clone()), ActionRequest::Delete),
        Dialog::Grading {
            id,
            marks,
            feedback,
            ..
        } => {
            let marks: Decimal = marks.trim().parse().map_err(|_| {
                CampusError::Validation(format!("Marks must be a number, got '{marks}'"))
            })?;
            (
                Target::One(id.clone()),
                ActionRequest::Grade {
                    marks,
                    max_marks: None,
                    feedback: Some(feedback.clone()),
                },
            )
        }
    };
    Ok(Some(request))
}

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Run the moderation console for `screen` until 'q' or cancellation.
///
/// # Errors
///
/// Returns [`DashError::Terminal`] if the terminal cannot be set up.
pub async fn run_console<T: Record>(
    http: CampusHttpClient,
    screen: &'static Screen,
    page_size: u32,
    logs: LogBuffer,
    cancel: CancellationToken,
) -> Result<(), DashError> {
    let api = ScreenClient::<T>::new(http, screen);
    let mut app = Console::<T>::new(screen, page_size)?;
    let (tx, mut rx) = mpsc::unbounded_channel::<Msg<T>>();

    info!(screen = screen.name, "starting console");
    spawn_effects(&api, &tx, app.start());

    // Set up terminal.
    enable_raw_mode().map_err(|e| DashError::Terminal(format!("enable raw mode: {e}")))?;
    io::stdout()
        .execute(EnterAlternateScreen)
        .map_err(|e| DashError::Terminal(format!("enter alternate screen: {e}")))?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))
        .map_err(|e| DashError::Terminal(format!("create terminal: {e}")))?;

    let mut render_interval = tokio::time::interval(RENDER_INTERVAL);

    loop {
        if app.quit {
            break;
        }

        tokio::select! {
            Some(msg) = rx.recv() => {
                let effects = app.handle_msg(msg);
                spawn_effects(&api, &tx, effects);
            }

            // Render tick, also polls keyboard input.
            _ = render_interval.tick() => {
                while event::poll(Duration::ZERO).unwrap_or(false) {
                    if let Ok(Event::Key(key)) = event::read() {
                        if key.kind == KeyEventKind::Press {
                            let effects = app.handle_key(key.code);
                            spawn_effects(&api, &tx, effects);
                        }
                    }
                }

                if !app.quit {
                    let _ = terminal.draw(|frame| render_ui(frame, &app, &logs));
                }
            }

            _ = cancel.cancelled() => break,
        }
    }

    restore_terminal(&mut terminal);
    info!(screen = screen.name, "console closed");
    Ok(())
}

fn spawn_effects<T: Record>(
    api: &ScreenClient<T>,
    tx: &mpsc::UnboundedSender<Msg<T>>,
    effects: Vec<Effect>,
) {
    for effect in effects {
        let api = api.clone();
        let tx = tx.clone();
        match effect {
            Effect::Fetch(ticket) => {
                tokio::spawn(async move {
                    let result = api.fetch_page(&ticket.query).await;
                    let _ = tx.send(Msg::Fetched(ticket, result));
                });
            }
            Effect::Perform(action) => {
                tokio::spawn(async move {
                    let result = api.perform(&action).await;
                    let _ = tx.send(Msg::Acted(action, result));
                });
            }
            Effect::Summary => {
                tokio::spawn(async move {
                    let result = api.summary().await;
                    let _ = tx.send(Msg::Summary(result));
                });
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Terminal helpers
// ---------------------------------------------------------------------------

/// Restore terminal to normal mode.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) {
    let _ = terminal.show_cursor();
    let _ = disable_raw_mode();
    let _ = io::stdout().execute(LeaveAlternateScreen);
}

/// Rect of `percent_x` by `percent_y` centered in `area`.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

// ---------------------------------------------------------------------------
// UI rendering
// ---------------------------------------------------------------------------

fn render_ui<T: Record>(frame: &mut Frame, app: &Console<T>, logs: &LogBuffer) {
    let area = frame.area();

    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),                          // header
            Constraint::Length(1),                          // filter bar
            Constraint::Min(5),                             // table
            Constraint::Length(1),                          // notice
            Constraint::Length(LOG_PANEL_LINES as u16 + 2), // log
        ])
        .split(area);

    render_header(frame, main_layout[0], app);
    render_filter_bar(frame, main_layout[1], app);
    render_table(frame, main_layout[2], app);
    render_notice(frame, main_layout[3], app);
    render_log(frame, main_layout[4], logs);

    if app.controller.dialog().is_open() {
        render_dialog(frame, area, app);
    }
}

fn render_header<T: Record>(frame: &mut Frame, area: Rect, app: &Console<T>) {
    let mut text = format!(" {} ", app.screen().title.to_uppercase());
    if let Some(s) = app.controller.summary() {
        text.push_str(&format!(
            "| pending {} | approved {} | rejected {} | total {} ",
            s.pending, s.approved, s.rejected, s.total
        ));
    }
    text.push_str("| 'q' to quit");
    let header = Paragraph::new(text)
        .style(Style::default().fg(Color::White).bg(Color::Blue).bold())
        .alignment(Alignment::Center);
    frame.render_widget(header, area);
}

fn render_filter_bar<T: Record>(frame: &mut Frame, area: Rect, app: &Console<T>) {
    let filters = app.controller.filters();
    let applied = filters.applied();
    let mut spans = Vec::new();

    if app.screen().default_status.is_some() {
        let status = applied
            .status_filter()
            .map(|s| s.as_str())
            .unwrap_or("all");
        spans.push(Span::raw(format!(" status: {status} ")));
    }
    if let Some(field) = applied.sort_by() {
        spans.push(Span::raw(format!("| sort: {field} {} ", applied.sort_order())));
    }

    let search = filters.draft("search").unwrap_or_default();
    let search_style = if app.mode == Mode::Search {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let dirty = if filters.is_dirty() { "*" } else { "" };
    spans.push(Span::styled(format!("| search: {search}{dirty} "), search_style));

    if let Some(page) = app.controller.page() {
        spans.push(Span::raw(format!(
            "| page {}/{} ({} total) ",
            page.current_page,
            page.total_pages.max(1),
            page.total_count
        )));
    }
    let selected = app.controller.selection().len();
    if selected > 0 {
        spans.push(Span::raw(format!("| {selected} selected ")));
    }
    if app.controller.is_loading() {
        spans.push(Span::styled("| loading…", Style::default().fg(Color::DarkGray)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_table<T: Record>(frame: &mut Frame, area: Rect, app: &Console<T>) {
    let columns = T::columns();
    let header = Row::new(
        std::iter::once(Cell::from(""))
            .chain(columns.iter().map(|c| Cell::from(c.to_uppercase()))),
    )
    .style(Style::default().fg(Color::Cyan).bold());

    let rows: Vec<Row> = app
        .rows()
        .iter()
        .map(|item| {
            let id = item.id();
            let mark = if app.controller.is_busy(id) {
                "…"
            } else if app.controller.selection().contains(id) {
                "[x]"
            } else {
                "[ ]"
            };
            Row::new(std::iter::once(mark.to_string()).chain(item.cells()))
        })
        .collect();

    let widths: Vec<Constraint> = std::iter::once(Constraint::Length(3))
        .chain(columns.iter().map(|_| Constraint::Fill(1)))
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" {} ", app.screen().title));
    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut state = TableState::default();
    if !app.rows().is_empty() {
        state.select(Some(app.cursor));
    }
    frame.render_stateful_widget(table, area, &mut state);
}

fn render_notice<T: Record>(frame: &mut Frame, area: Rect, app: &Console<T>) {
    let Some(notice) = app.controller.notice() else {
        let help = " y approve  x reject  g grade  d delete  space select  a all  \
                    Y/X bulk  s status  o order  / search  r refresh";
        frame.render_widget(
            Paragraph::new(help).style(Style::default().fg(Color::DarkGray)),
            area,
        );
        return;
    };
    let color = match notice.level {
        NoticeLevel::Info => Color::White,
        NoticeLevel::Success => Color::Green,
        NoticeLevel::Warning => Color::Yellow,
        NoticeLevel::Error => Color::Red,
    };
    let mut text = format!(" {}", notice.text);
    if notice.requires_login {
        text.push_str(" (restart with a fresh token)");
    }
    frame.render_widget(
        Paragraph::new(text).style(Style::default().fg(color)),
        area,
    );
}

fn render_log(frame: &mut Frame, area: Rect, logs: &LogBuffer) {
    let lines: Vec<Line> = logs
        .tail(LOG_PANEL_LINES)
        .into_iter()
        .map(Line::from)
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Log ");
    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn field_line(label: &str, value: &str, focused: bool) -> Line<'static> {
    let style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let cursor = if focused { "_" } else { "" };
    Line::from(vec![
        Span::raw(format!(" {label}: ")),
        Span::styled(format!("{value}{cursor}"), style),
    ])
}

fn render_dialog<T: Record>(frame: &mut Frame, area: Rect, app: &Console<T>) {
    let (title, mut lines) = match app.controller.dialog().state() {
        Dialog::Closed => return,
        Dialog::Viewing { id } => {
            let lines = match app.rows().iter().find(|r| r.id() == id) {
                Some(item) => T::columns()
                    .iter()
                    .zip(item.cells())
                    .map(|(col, cell)| Line::from(format!(" {col:>10}: {cell}")))
                    .collect(),
                None => vec![Line::from(" no longer on this page")],
            };
            (" Details ", lines)
        }
        Dialog::ConfirmingApprove { targets } => (
            " Approve ",
            vec![Line::from(format!(" Approve {} item(s)?", targets.len()))],
        ),
        Dialog::ConfirmingReject {
            targets,
            reason,
            detail,
            field,
        } => (
            " Reject ",
            vec![
                Line::from(format!(" Reject {} item(s)", targets.len())),
                Line::from(""),
                field_line("Reason", reason, *field == DialogField::Primary),
                field_line("Detail", detail, *field == DialogField::Secondary),
            ],
        ),
        Dialog::ConfirmingDelete { id } => {
            (" Delete ", vec![Line::from(format!(" Delete {id}? This cannot be undone."))])
        }
        Dialog::Grading {
            id,
            marks,
            feedback,
            field,
        } => (
            " Grade ",
            vec![
                Line::from(format!(" Grade {id}")),
                Line::from(""),
                field_line("Marks", marks, *field == DialogField::Primary),
                field_line("Feedback", feedback, *field == DialogField::Secondary),
            ],
        ),
    };
    lines.push(Line::from(""));
    lines.push(Line::styled(
        " Enter confirm  Esc cancel  Tab next field",
        Style::default().fg(Color::DarkGray),
    ));

    let popup = centered_rect(60, 40, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(title);
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        popup,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus::screen::{EXAMS, PROMOTIONS, SUBMISSIONS};
    use campus::types::{BulkActionResult, PromotionRequest, Submission};
    use campus::ModerationStatus;

    fn promotion(id: &str) -> PromotionRequest {
        PromotionRequest {
            id: id.into(),
            student_name: format!("Student {id}"),
            email: String::new(),
            batch: None,
            current_year: Some(1),
            status: ModerationStatus::Pending,
            rejection_reason: None,
            created_at: None,
        }
    }

    fn loaded(ids: &[&str]) -> Console<PromotionRequest> {
        let mut app = Console::new(&PROMOTIONS, 10).unwrap();
        let effects = app.start();
        let Effect::Fetch(ticket) = effects[0].clone() else {
            panic!("expected fetch first");
        };
        let page = Page {
            items: ids.iter().map(|id| promotion(id)).collect(),
            current_page: 1,
            total_pages: 1,
            total_count: ids.len() as u64,
            limit: 10,
        };
        app.handle_msg(Msg::Fetched(ticket, Ok(page)));
        app
    }

    fn type_text<T: Record>(app: &mut Console<T>, text: &str) {
        for c in text.chars() {
            app.handle_key(KeyCode::Char(c));
        }
    }

    #[test]
    fn test_start_fetches_page_and_summary() {
        let mut app = Console::<PromotionRequest>::new(&PROMOTIONS, 10).unwrap();
        let effects = app.start();
        assert!(matches!(effects[0], Effect::Fetch(_)));
        assert_eq!(effects[1], Effect::Summary);

        let mut exams = Console::<campus::types::Exam>::new(&EXAMS, 10).unwrap();
        assert_eq!(exams.start().len(), 1);
    }

    #[test]
    fn test_status_key_refetches_page_one() {
        let mut app = loaded(&["a", "b"]);
        let effects = app.handle_key(KeyCode::Char('s'));
        match &effects[..] {
            [Effect::Fetch(ticket)] => {
                assert_eq!(ticket.query.page(), 1);
                assert_eq!(ticket.query.status_filter(), Some(ModerationStatus::Approved));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_search_is_staged_until_enter() {
        let mut app = loaded(&["a"]);
        app.handle_key(KeyCode::Char('/'));
        type_text(&mut app, "asha");
        assert_eq!(app.controller.filters().draft("search"), Some("asha"));
        assert!(app.controller.filters().is_dirty());

        let effects = app.handle_key(KeyCode::Enter);
        match &effects[..] {
            [Effect::Fetch(ticket)] => {
                assert_eq!(
                    ticket.query.filters().get("search").map(String::as_str),
                    Some("asha")
                );
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(app.mode, Mode::Normal);
    }

    #[test]
    fn test_reject_flow_closes_dialog_on_success() {
        let mut app = loaded(&["a", "b"]);
        app.handle_key(KeyCode::Char('j'));
        app.handle_key(KeyCode::Char('x'));
        assert!(app.controller.dialog().is_open());

        // blank reason stays open with a warning and sends nothing
        assert!(app.handle_key(KeyCode::Enter).is_empty());
        assert!(app.controller.dialog().is_open());
        assert_eq!(app.controller.notice().unwrap().level, NoticeLevel::Warning);

        type_text(&mut app, "Invalid documents");
        let effects = app.handle_key(KeyCode::Enter);
        let [Effect::Perform(action)] = &effects[..] else {
            panic!("unexpected {effects:?}");
        };
        assert_eq!(action.target(), "b");

        let outcome = ActionOutcome::single(ActionKind::Reject, "b", None);
        let follow_up = app.handle_msg(Msg::Acted(action.clone(), Ok(outcome)));
        assert!(!app.controller.dialog().is_open());
        assert_eq!(app.rows().len(), 1);
        assert_eq!(app.cursor, 0);
        assert_eq!(follow_up, vec![Effect::Summary]);
    }

    #[test]
    fn test_bulk_needs_selection() {
        let mut app = loaded(&["a", "b", "c"]);
        app.handle_key(KeyCode::Char('Y'));
        assert!(!app.controller.dialog().is_open());

        app.handle_key(KeyCode::Char('a'));
        app.handle_key(KeyCode::Char('Y'));
        let effects = app.handle_key(KeyCode::Enter);
        let [Effect::Perform(action)] = &effects[..] else {
            panic!("unexpected {effects:?}");
        };
        assert!(action.bulk);
        assert_eq!(action.targets.len(), 3);

        let mut result = BulkActionResult::all_succeeded(&["a".to_string(), "c".to_string()]);
        result.failed_ids.insert("b".into(), "not processed".into());
        app.handle_msg(Msg::Acted(
            action.clone(),
            Ok(ActionOutcome::bulk(ActionKind::Approve, result)),
        ));
        assert_eq!(app.controller.selection().ids(), vec!["b".to_string()]);
    }

    fn submission_console(max_marks: Option<Decimal>) -> Console<Submission> {
        let mut app = Console::<Submission>::new(&SUBMISSIONS, 10).unwrap();
        let Effect::Fetch(ticket) = app.start()[0].clone() else {
            panic!("expected fetch");
        };
        let sub = Submission {
            id: "s1".into(),
            student_name: "Kiran".into(),
            task_title: "REST API".into(),
            repo_url: None,
            status: ModerationStatus::Pending,
            marks: None,
            max_marks,
            feedback: None,
            submitted_at: None,
        };
        app.handle_msg(Msg::Fetched(
            ticket,
            Ok(Page {
                items: vec![sub],
                current_page: 1,
                total_pages: 1,
                total_count: 1,
                limit: 10,
            }),
        ));
        app
    }

    #[test]
    fn test_grade_above_task_maximum_is_refused() {
        let mut app = submission_console(Some(Decimal::TEN));
        app.handle_key(KeyCode::Char('g'));
        type_text(&mut app, "50");
        assert!(app.handle_key(KeyCode::Enter).is_empty());
        assert_eq!(app.controller.notice().unwrap().level, NoticeLevel::Warning);
        assert!(!app.controller.is_busy("s1"));

        app.handle_key(KeyCode::Backspace);
        app.handle_key(KeyCode::Backspace);
        type_text(&mut app, "9");
        match &app.handle_key(KeyCode::Enter)[..] {
            [Effect::Perform(action)] => assert!(matches!(
                action.request,
                ActionRequest::Grade { max_marks: Some(max), .. } if max == Decimal::TEN
            )),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_grade_rejects_unparsable_marks() {
        let mut app = submission_console(None);

        app.handle_key(KeyCode::Char('g'));
        type_text(&mut app, "abc");
        assert!(app.handle_key(KeyCode::Enter).is_empty());
        assert_eq!(app.controller.notice().unwrap().level, NoticeLevel::Warning);

        for _ in 0..3 {
            app.handle_key(KeyCode::Backspace);
        }
        type_text(&mut app, "87.5");
        let effects = app.handle_key(KeyCode::Enter);
        assert!(matches!(&effects[..], [Effect::Perform(_)]));
    }

    #[test]
    fn test_unsupported_action_is_not_opened() {
        let mut app = loaded(&["a"]);
        app.handle_key(KeyCode::Char('g'));
        assert!(!app.controller.dialog().is_open());
        assert_eq!(app.controller.notice().unwrap().level, NoticeLevel::Info);
    }

    #[test]
    fn test_cursor_clamped_and_quit() {
        let mut app = loaded(&["a", "b"]);
        for _ in 0..5 {
            app.handle_key(KeyCode::Down);
        }
        assert_eq!(app.cursor, 1);
        app.handle_key(KeyCode::Char('q'));
        assert!(app.quit);
    }
}
