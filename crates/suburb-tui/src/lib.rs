// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod bindings;

pub use bindings::{Bindings, EventBinder, MAX_QUICK_LINKS, UiAction};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;
use suburb_app::{
    AppCommand, AppState, Focus, HistoryRow, HistoryVisibility, RowStatus, SearchDispatcher,
    SearchFailure, SearchId, SearchOutcome, SearchRequest,
};
use tracing::{info, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(120);
const STATUS_TTL: Duration = Duration::from_secs(4);
const PENDING_MARK: &str = "searching…";
const HISTORY_COLUMNS: [&str; 7] = ["#", "search", "sites", "pages", "prices", "average", "time"];

pub trait SearchRuntime {
    fn run_search(&mut self, request: &SearchRequest) -> SearchOutcome;

    /// Starts the search and reports back on `tx`. The default runs inline.
    fn spawn_search(&mut self, request: SearchRequest, tx: Sender<InternalEvent>) -> Result<()> {
        let outcome = self.run_search(&request);
        tx.send(InternalEvent::SearchFinished {
            id: request.id,
            outcome,
        })
        .map_err(|_| anyhow::anyhow!("search event channel closed"))?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InternalEvent {
    ClearStatus { token: u64 },
    SearchFinished { id: SearchId, outcome: SearchOutcome },
}

#[derive(Debug, Clone)]
struct ViewData {
    dispatcher: SearchDispatcher,
    bindings: Bindings,
    input: String,
    status_token: u64,
}

impl ViewData {
    fn new(bindings: Bindings) -> Self {
        Self {
            dispatcher: SearchDispatcher::new(),
            bindings,
            input: String::new(),
            status_token: 0,
        }
    }
}

pub fn run_app<R: SearchRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    binder: EventBinder,
) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData::new(binder.bind());
    let (internal_tx, internal_rx) = mpsc::channel();
    state.focus = Focus::Input;
    info!(
        quick_links = view_data.bindings.quick_links().len(),
        "search screen ready"
    );

    let mut result = Ok(());
    loop {
        process_internal_events(state, &mut view_data, &internal_tx, &internal_rx);

        if let Err(error) = terminal.draw(|frame| render(frame, state, &view_data)) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = match event::poll(POLL_INTERVAL).context("poll event") {
            Ok(has_event) => has_event,
            Err(error) => {
                result = Err(error);
                break;
            }
        };
        if has_event {
            match event::read().context("read event") {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    if handle_key_event(state, runtime, &mut view_data, &internal_tx, key) {
                        break;
                    }
                }
                Ok(_) => {}
                Err(error) => {
                    result = Err(error);
                    break;
                }
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    info!(searches = view_data.dispatcher.history().len(), "search screen closed");
    result
}

fn process_internal_events(
    state: &mut AppState,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                state.dispatch(AppCommand::ClearStatus);
            }
            InternalEvent::ClearStatus { .. } => {}
            InternalEvent::SearchFinished { id, outcome } => {
                handle_search_finished(state, view_data, tx, id, outcome);
            }
        }
    }
}

fn handle_search_finished(
    state: &mut AppState,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    id: SearchId,
    outcome: SearchOutcome,
) {
    let failed = matches!(outcome, SearchOutcome::Failed(_));
    let applied = view_data.dispatcher.complete(id, outcome).map(|_| ());
    match applied {
        Ok(()) if failed => {
            emit_status(state, view_data, tx, format!("search {id} failed"));
        }
        Ok(()) => {}
        Err(error) => {
            warn!(search_id = %id, %error, "ignoring search response");
        }
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(STATUS_TTL);
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn emit_status(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    state.dispatch(AppCommand::SetStatus(message.into()));
    view_data.status_token = view_data.status_token.saturating_add(1);
    schedule_status_clear(internal_tx, view_data.status_token);
}

fn handle_key_event<R: SearchRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    let Some(action) = view_data
        .bindings
        .resolve(state.focus, state.selected_link, key)
    else {
        return false;
    };

    let link_count = view_data.bindings.quick_links().len();
    match action {
        UiAction::Quit => return true,
        UiAction::ToggleFocus => {
            state.dispatch(AppCommand::ToggleFocus);
        }
        UiAction::SubmitInput => {
            let text = std::mem::take(&mut view_data.input);
            submit_search(state, runtime, view_data, internal_tx, text);
        }
        UiAction::InsertChar(ch) => view_data.input.push(ch),
        UiAction::DeleteChar => {
            view_data.input.pop();
        }
        UiAction::ClearInput => view_data.input.clear(),
        UiAction::NextLink => {
            state.dispatch(AppCommand::NextLink { link_count });
        }
        UiAction::PrevLink => {
            state.dispatch(AppCommand::PrevLink { link_count });
        }
        UiAction::ActivateQuickLink(index) => {
            if let Some(link) = view_data.bindings.quick_link(index) {
                let text = link.text.clone();
                submit_search(state, runtime, view_data, internal_tx, text);
            }
        }
    }
    false
}

fn submit_search<R: SearchRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    text: String,
) {
    let request = view_data.dispatcher.submit(text);
    let id = request.id;
    if let Err(error) = runtime.spawn_search(request, internal_tx.clone()) {
        handle_search_finished(
            state,
            view_data,
            internal_tx,
            id,
            SearchOutcome::Failed(SearchFailure {
                status: None,
                message: error.to_string(),
            }),
        );
    }
}

fn render(frame: &mut ratatui::Frame<'_>, state: &AppState, view_data: &ViewData) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(2),
        ])
        .split(frame.area());

    render_input(frame, layout[0], state, view_data);
    render_quick_links(frame, layout[1], state, view_data);

    if view_data.dispatcher.visibility() == HistoryVisibility::Visible {
        render_history(frame, layout[2], view_data);
    } else {
        let hint = Paragraph::new("type a suburb and press enter, or pick a quick link")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(hint, layout[2]);
    }

    let status = Paragraph::new(status_text(state))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(status, layout[3]);
}

fn render_input(frame: &mut ratatui::Frame<'_>, area: Rect, state: &AppState, view_data: &ViewData) {
    let focused = state.focus == Focus::Input;
    let border = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let input = Paragraph::new(view_data.input.as_str()).block(
        Block::default()
            .title("search")
            .borders(Borders::ALL)
            .border_style(border),
    );
    frame.render_widget(input, area);

    if focused {
        let width = view_data.input.chars().count() as u16;
        let x = area
            .x
            .saturating_add(1)
            .saturating_add(width)
            .min(area.right().saturating_sub(2));
        frame.set_cursor_position((x, area.y.saturating_add(1)));
    }
}

fn render_quick_links(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    state: &AppState,
    view_data: &ViewData,
) {
    let focused = state.focus == Focus::QuickLinks;
    let mut spans = Vec::new();
    for (index, link) in view_data.bindings.quick_links().iter().enumerate() {
        if index > 0 {
            spans.push(Span::raw("  "));
        }
        let mut style = Style::default();
        if focused && index == state.selected_link {
            style = style
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD);
        }
        spans.push(Span::styled(quick_link_label(index, &link.label), style));
    }

    let border = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let links = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .title("quick search")
            .borders(Borders::ALL)
            .border_style(border),
    );
    frame.render_widget(links, area);
}

fn quick_link_label(index: usize, label: &str) -> String {
    format!("{} {label}", index + 1)
}

fn render_history(frame: &mut ratatui::Frame<'_>, area: Rect, view_data: &ViewData) {
    let header = Row::new(HISTORY_COLUMNS.iter().map(|label| {
        Cell::from(*label).style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
    }));

    let rows = view_data.dispatcher.history().rows().map(|row| {
        let style = match row.status {
            RowStatus::Pending => Style::default().fg(Color::DarkGray),
            RowStatus::Resolved => Style::default(),
            RowStatus::Failed => Style::default().fg(Color::Red),
        };
        Row::new(history_row_cells(row).into_iter().map(Cell::from)).style(style)
    });

    let widths = [
        Constraint::Length(4),
        Constraint::Min(24),
        Constraint::Length(6),
        Constraint::Length(6),
        Constraint::Length(7),
        Constraint::Length(14),
        Constraint::Length(9),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .block(
            Block::default()
                .title(history_title(view_data))
                .borders(Borders::ALL),
        );
    frame.render_widget(table, area);
}

fn history_title(view_data: &ViewData) -> String {
    let history = view_data.dispatcher.history();
    let pending = history
        .rows()
        .filter(|row| row.status == RowStatus::Pending)
        .count();
    if pending == 0 {
        format!("history ({})", history.len())
    } else {
        format!("history ({}, {pending} pending)", history.len())
    }
}

fn history_row_cells(row: &HistoryRow) -> Vec<String> {
    let time = row
        .submitted_at
        .format(&time::macros::format_description!(
            "[hour]:[minute]:[second]"
        ))
        .unwrap_or_default();

    if row.status == RowStatus::Pending {
        return vec![
            row.id.to_string(),
            row.display_text.clone(),
            String::new(),
            String::new(),
            String::new(),
            PENDING_MARK.to_owned(),
            time,
        ];
    }

    let time = match row.elapsed_seconds {
        Some(elapsed) => format!("{time} {elapsed:.1}s"),
        None => time,
    };
    vec![
        row.id.to_string(),
        row.display_text.clone(),
        row.site_count.to_string(),
        row.page_count.to_string(),
        row.price_count.to_string(),
        row.price_display(),
        time,
    ]
}

fn status_text(state: &AppState) -> String {
    let keys = match state.focus {
        Focus::Input => "enter search | tab links | alt+1-9 quick | ctrl+u clear | ctrl+q quit",
        Focus::QuickLinks => "enter search | h/l move | tab input | alt+1-9 quick | ctrl+q quit",
    };
    match &state.status_line {
        Some(status) => format!("{status} | {keys}"),
        None => keys.to_owned(),
    }
}
