//! Ratatui-based terminal UI.
//!
//! The TUI renders one borrower sub-form at a time for data entry, then the
//! result cards after a submission and the prediction history on demand.
//! All three views consume the same view models as the non-interactive
//! front-end; this module is presentation only.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

use crate::api::HttpScoringClient;
use crate::app::pipeline::{self, SubmitOutcome};
use crate::cli::TuiArgs;
use crate::config::AppConfig;
use crate::domain::RiskClass;
use crate::error::AppError;
use crate::form::{BorrowerForm, Widget, generate_forms};
use crate::render::{LogRow, ResultCard};
use crate::schema::Registry;

const DEFAULT_LOG_LIMIT: usize = 100;

/// Start the TUI.
pub fn run(config: &AppConfig, args: TuiArgs) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::runtime(format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(config, args.borrowers.max(1));
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode()
            .map_err(|e| AppError::runtime(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::runtime(format!(
                "Failed to enter alternate screen: {e}"
            )));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    Form,
    Results,
    Logs,
}

struct App {
    registry: Registry,
    client: HttpScoringClient,
    identity: String,

    borrower_count: usize,
    forms: Vec<BorrowerForm>,
    current_form: usize,
    selected_control: usize,

    editing: bool,
    edit_buffer: String,

    view: View,
    cards: Vec<ResultCard>,
    log_rows: Vec<LogRow>,
    scroll: usize,

    status: String,
}

impl App {
    fn new(config: &AppConfig, borrower_count: usize) -> Self {
        let registry = Registry::standard();
        let forms = generate_forms(&registry, borrower_count);
        Self {
            registry,
            client: HttpScoringClient::new(&config.api_url),
            identity: config.identity.clone(),
            borrower_count,
            forms,
            current_form: 0,
            selected_control: 0,
            editing: false,
            edit_buffer: String::new(),
            view: View::Form,
            cards: Vec::new(),
            log_rows: Vec::new(),
            scroll: 0,
            status: "Fill in the form, then press s to submit.".to_string(),
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::runtime(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::runtime(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::runtime(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the app should quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.editing {
            self.handle_edit(code);
            return false;
        }

        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Tab => {
                let next = match self.view {
                    View::Form => View::Results,
                    View::Results => View::Logs,
                    View::Logs => View::Form,
                };
                if next == View::Logs {
                    self.fetch_logs();
                }
                self.view = next;
                self.scroll = 0;
            }
            KeyCode::Char('l') => {
                self.fetch_logs();
                self.view = View::Logs;
                self.scroll = 0;
            }
            KeyCode::Char('s') => self.submit(),
            KeyCode::Char('r') => {
                self.regenerate();
                self.status = "Regenerated forms with defaults.".to_string();
            }
            KeyCode::Char('+') => {
                self.borrower_count = self.borrower_count.saturating_add(1);
                self.regenerate();
                self.status = format!("borrowers: {}", self.borrower_count);
            }
            KeyCode::Char('-') => {
                self.borrower_count = self.borrower_count.saturating_sub(1).max(1);
                self.regenerate();
                self.status = format!("borrowers: {}", self.borrower_count);
            }
            KeyCode::Up => self.move_selection(-1),
            KeyCode::Down => self.move_selection(1),
            KeyCode::Left => self.adjust_control(-1),
            KeyCode::Right => self.adjust_control(1),
            KeyCode::PageUp => self.switch_form(-1),
            KeyCode::PageDown => self.switch_form(1),
            KeyCode::Enter => self.activate_control(),
            _ => {}
        }

        false
    }

    fn handle_edit(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => {
                self.editing = false;
                self.status = "Edit canceled.".to_string();
            }
            KeyCode::Enter => {
                self.editing = false;
                let value = self.edit_buffer.clone();
                if let Some(control) = self.selected_control_mut() {
                    control.set_value(value);
                }
                self.status = "Value applied.".to_string();
            }
            KeyCode::Backspace => {
                self.edit_buffer.pop();
            }
            KeyCode::Char(c) => {
                let numeric = self
                    .selected_control_ref()
                    .is_some_and(|control| matches!(control.widget, Widget::Numeric { .. }));
                if !numeric || c.is_ascii_digit() || c == '.' || c == '-' {
                    self.edit_buffer.push(c);
                }
            }
            _ => {}
        }
    }

    fn move_selection(&mut self, delta: isize) {
        match self.view {
            View::Form => {
                let len = self
                    .forms
                    .get(self.current_form)
                    .map(|f| f.controls.len())
                    .unwrap_or(0);
                if len == 0 {
                    return;
                }
                let next = self.selected_control as isize + delta;
                self.selected_control = next.clamp(0, len as isize - 1) as usize;
            }
            View::Results | View::Logs => {
                let next = self.scroll as isize + delta;
                self.scroll = next.max(0) as usize;
            }
        }
    }

    fn switch_form(&mut self, delta: isize) {
        if self.view != View::Form || self.forms.is_empty() {
            return;
        }
        let len = self.forms.len() as isize;
        let next = (self.current_form as isize + delta).rem_euclid(len) as usize;
        self.current_form = next;
        self.selected_control = 0;
        self.status = format!("Borrower {}/{}", next + 1, self.forms.len());
    }

    /// Left/Right: cycle a selection through its domain, or nudge a numeric
    /// entry by its advertised step granularity.
    fn adjust_control(&mut self, delta: isize) {
        if self.view != View::Form {
            return;
        }
        let Some(control) = self.selected_control_mut() else {
            return;
        };

        if matches!(control.widget, Widget::Select { .. }) {
            control.cycle_option(delta);
            return;
        }

        let Some(step) = control.step() else { return };
        let Ok(current) = control.value.trim().parse::<f64>() else {
            return;
        };
        let next = current + step * delta as f64;
        let rendered = if step < 1.0 {
            format!("{next:.2}")
        } else {
            next.to_string()
        };
        control.set_value(rendered);
    }

    fn activate_control(&mut self) {
        if self.view != View::Form {
            return;
        }
        let Some(control) = self.selected_control_mut() else {
            return;
        };

        if matches!(control.widget, Widget::Select { .. }) {
            control.cycle_option(1);
            return;
        }

        let value = control.value.clone();
        self.edit_buffer = value;
        self.editing = true;
        self.status = "Editing value. Enter to apply, Esc to cancel.".to_string();
    }

    fn submit(&mut self) {
        self.status = "Submitting batch...".to_string();
        match pipeline::run_submission(&self.client, &self.identity, &mut self.forms) {
            SubmitOutcome::Validation { message } => {
                self.view = View::Form;
                self.status = message;
            }
            SubmitOutcome::Transport { message } | SubmitOutcome::Service { message } => {
                self.status = message;
            }
            SubmitOutcome::Success { cards } => {
                self.status = format!("Scored {} borrower(s).", cards.len());
                self.cards = cards;
                self.view = View::Results;
                self.scroll = 0;
            }
        }
    }

    fn fetch_logs(&mut self) {
        self.status = "Fetching history...".to_string();
        match pipeline::run_log_fetch(&self.client, &self.identity, DEFAULT_LOG_LIMIT) {
            Ok(rows) => {
                self.status = format!("{} history entries.", rows.len());
                self.log_rows = rows;
            }
            Err(err) => {
                self.log_rows.clear();
                self.status = err.to_string();
            }
        }
    }

    /// Discard current forms and build fresh ones; nothing survives the
    /// regeneration.
    fn regenerate(&mut self) {
        self.forms = generate_forms(&self.registry, self.borrower_count);
        self.current_form = 0;
        self.selected_control = 0;
        self.view = View::Form;
    }

    fn selected_control_mut(&mut self) -> Option<&mut crate::form::Control> {
        self.forms
            .get_mut(self.current_form)
            .and_then(|f| f.controls.get_mut(self.selected_control))
    }

    fn selected_control_ref(&self) -> Option<&crate::form::Control> {
        self.forms
            .get(self.current_form)
            .and_then(|f| f.controls.get(self.selected_control))
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(size);

        self.draw_header(frame, chunks[0]);
        match self.view {
            View::Form => self.draw_form(frame, chunks[1]),
            View::Results => self.draw_results(frame, chunks[1]),
            View::Logs => self.draw_logs(frame, chunks[1]),
        }
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let view_name = match self.view {
            View::Form => "form",
            View::Results => "results",
            View::Logs => "history",
        };
        let lines = vec![
            Line::from(vec![
                Span::styled("creditpath", Style::default().fg(Color::Cyan)),
                Span::raw(" — loan default risk screening"),
            ]),
            Line::from(Span::styled(
                format!(
                    "user: {} | borrowers: {} | view: {view_name}",
                    self.identity, self.borrower_count,
                ),
                Style::default().fg(Color::Gray),
            )),
        ];

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_form(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(4)])
            .split(area);

        let Some(form) = self.forms.get(self.current_form) else {
            return;
        };

        let items: Vec<ListItem> = form
            .controls
            .iter()
            .map(|control| {
                let marker = match &control.widget {
                    Widget::Select { .. } => "⇄",
                    Widget::Numeric { fractional_step: true } => "± 0.01",
                    Widget::Numeric { fractional_step: false } => "± 1",
                    Widget::Text => " ",
                };
                let mut style = Style::default();
                let mut label = format!("{:<22} {:<16} {marker}", control.name, control.value);
                if control.invalid {
                    style = style.fg(Color::Red).add_modifier(Modifier::BOLD);
                    label.push_str("  (required)");
                }
                ListItem::new(label).style(style)
            })
            .collect();

        let title = format!("Borrower {}/{}", form.index, self.forms.len());
        let list = List::new(items)
            .block(Block::default().title(title).borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ratatui::widgets::ListState::default();
        state.select(Some(self.selected_control));
        frame.render_stateful_widget(list, chunks[0], &mut state);

        self.draw_control_detail(frame, chunks[1]);
    }

    fn draw_control_detail(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();

        if self.editing {
            lines.push(Line::from(Span::styled(
                format!("edit: {}▏", self.edit_buffer),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )));
        } else if let Some(control) = self.selected_control_ref() {
            match &control.widget {
                Widget::Select { options, .. } => {
                    lines.push(Line::from(Span::styled(
                        format!("options: {}", options.join(" | ")),
                        Style::default().fg(Color::Gray),
                    )));
                }
                Widget::Numeric { .. } => {
                    lines.push(Line::from(Span::styled(
                        "numeric entry — Enter to type, ←/→ to nudge",
                        Style::default().fg(Color::Gray),
                    )));
                }
                Widget::Text => {
                    lines.push(Line::from(Span::styled(
                        "free text — Enter to type",
                        Style::default().fg(Color::Gray),
                    )));
                }
            }
        }

        let p = Paragraph::new(Text::from(lines))
            .block(Block::default().title("Field").borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_results(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Results").borders(Borders::ALL);

        if self.cards.is_empty() {
            let msg = Paragraph::new("No results yet. Submit a batch with s.")
                .style(Style::default().fg(Color::Yellow))
                .block(block);
            frame.render_widget(msg, area);
            return;
        }

        let items: Vec<ListItem> = self
            .cards
            .iter()
            .skip(self.scroll)
            .map(|card| {
                let color = risk_color(card.class);
                let text = Text::from(vec![
                    Line::from(Span::styled(
                        format!(
                            "Borrower {} — {} risk",
                            card.borrower_no,
                            card.class.display_name()
                        ),
                        Style::default().fg(color).add_modifier(Modifier::BOLD),
                    )),
                    Line::from(format!(
                        "  default probability: {:.3}",
                        card.default_probability
                    )),
                    Line::from(format!("  risk level: {}", card.risk_level)),
                    Line::from(format!("  action: {}", card.recommended_action)),
                    Line::from(""),
                ]);
                ListItem::new(text)
            })
            .collect();

        frame.render_widget(List::new(items).block(block), area);
    }

    fn draw_logs(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("History").borders(Borders::ALL);

        if self.log_rows.is_empty() {
            let msg = Paragraph::new("No history entries.")
                .style(Style::default().fg(Color::Yellow))
                .block(block);
            frame.render_widget(msg, area);
            return;
        }

        let mut items: Vec<ListItem> = Vec::with_capacity(self.log_rows.len() + 1);
        items.push(ListItem::new(Span::styled(
            format!(
                "{:<20} {:<12} {:>6}  {:<12} action",
                "timestamp", "loan_id", "prob", "risk"
            ),
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for row in self.log_rows.iter().skip(self.scroll) {
            items.push(ListItem::new(Span::styled(
                format!(
                    "{:<20} {:<12} {:>6.3}  {:<12} {}",
                    row.timestamp,
                    row.loan_id,
                    row.default_probability,
                    row.risk_level,
                    row.recommended_action
                ),
                Style::default().fg(risk_color(row.class)),
            )));
        }

        frame.render_widget(List::new(items).block(block), area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select  ←/→ adjust  Enter edit  PgUp/PgDn borrower  +/- count  s submit  l history  Tab view  r reset  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn risk_color(class: RiskClass) -> Color {
    match class {
        RiskClass::Low => Color::Green,
        RiskClass::Medium => Color::Yellow,
        RiskClass::High => Color::Red,
    }
}
