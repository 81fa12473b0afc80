//! Terminal frontend: crossterm-managed screen plus the ratatui renderer.

use crate::error::AppError;
use crate::view::state::DisplayState;
use crate::view::Renderer;

use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Clear, Dataset, Gauge, GraphType, List,
    ListItem, ListState, Paragraph, Row, Table, TableState,
};
use ratatui::{Frame, Terminal};
use std::io;

use crate::view::state::{SortColumn, DOWN_GLYPH, UP_GLYPH};

/// Owns raw mode and the alternate screen; restores both on drop so every
/// exit path leaves the shell usable.
pub struct TerminalGuard;

impl TerminalGuard {
    pub fn enter() -> Result<Self, AppError> {
        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        let _ = disable_raw_mode();
    }
}

/// ratatui-backed renderer for the asset view.
pub struct TuiRenderer {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TuiRenderer {
    pub fn new() -> Result<Self, AppError> {
        let backend = CrosstermBackend::new(io::stdout());
        Ok(Self {
            terminal: Terminal::new(backend)?,
        })
    }
}

impl Renderer for TuiRenderer {
    fn render(&mut self, state: &DisplayState) -> Result<(), AppError> {
        self.terminal.draw(|frame| {
            if state.overlay_active {
                draw_overlay(frame, state);
            } else {
                draw_view(frame, state);
            }
        })?;
        Ok(())
    }
}

// ─── Primary layout ──────────────────────────────────────────────────────────

fn draw_view(frame: &mut Frame, state: &DisplayState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Percentage(40),
            Constraint::Min(0),
        ])
        .split(frame.area());

    draw_price_line(frame, rows[0], state);
    draw_chart(frame, rows[1], state);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(34),
            Constraint::Percentage(33),
            Constraint::Percentage(33),
        ])
        .split(rows[2]);

    draw_details(frame, columns[0], state);
    draw_favourites(frame, columns[1], state);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(columns[2]);
    draw_volume_gauge(frame, right[0], state);
    draw_supply(frame, right[1], state);
}

fn draw_price_line(frame: &mut Frame, area: Rect, state: &DisplayState) {
    let change_style = if state.change.starts_with(DOWN_GLYPH) {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::Green)
    };

    let line = Line::from(vec![
        Span::styled(
            state.live_price.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw("   24h "),
        Span::styled(state.change.clone(), change_style),
    ]);

    let title = if state.name.is_empty() {
        " Price ".to_string()
    } else {
        format!(" {} ({}) ", state.name, state.symbol)
    };

    frame.render_widget(
        Paragraph::new(line).block(Block::default().borders(Borders::ALL).title(title)),
        area,
    );
}

fn draw_chart(frame: &mut Frame, area: Rect, state: &DisplayState) {
    let points: Vec<(f64, f64)> = state
        .chart_series
        .iter()
        .enumerate()
        .map(|(i, value)| (i as f64, *value))
        .collect();

    let span = state
        .chart_series
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max)
        .max(1e-9);

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Cyan))
        .data(&points);

    let title = format!(
        " Price History ({}) {} ",
        state.interval.label(),
        state.asset_value_label
    );

    let chart = Chart::new(vec![dataset])
        .block(Block::default().borders(Borders::ALL).title(title))
        .x_axis(Axis::default().bounds([0.0, (points.len().max(2) - 1) as f64]))
        .y_axis(
            Axis::default()
                .bounds([0.0, span])
                .labels(vec![
                    state.chart_min_label.clone(),
                    state.chart_max_label.clone(),
                ]),
        );

    frame.render_widget(chart, area);
}

fn draw_details(frame: &mut Frame, area: Rect, state: &DisplayState) {
    let updated = state
        .retrieved_at
        .map(|at| at.format("%H:%M:%S").to_string())
        .unwrap_or_default();

    let rows = vec![
        Row::new(vec!["Name".to_string(), state.name.clone()]),
        Row::new(vec!["Symbol".to_string(), state.symbol.clone()]),
        Row::new(vec!["Rank".to_string(), state.rank.clone()]),
        Row::new(vec!["Market Cap".to_string(), state.market_cap.clone()]),
        Row::new(vec!["VWAP 24Hr".to_string(), state.vwap.clone()]),
        Row::new(vec!["Explorer".to_string(), state.explorer.clone()]),
        Row::new(vec!["Updated".to_string(), updated]),
    ];

    let table = Table::new(rows, [Constraint::Length(12), Constraint::Min(0)])
        .block(Block::default().borders(Borders::ALL).title(" Details "));

    frame.render_widget(table, area);
}

fn draw_favourites(frame: &mut Frame, area: Rect, state: &DisplayState) {
    let price_header = format!("Price ({})", state.currency.label());
    let mut headers = [String::from("Symbol"), price_header];

    if let Some(spec) = state.sort {
        let glyph = if spec.ascending { UP_GLYPH } else { DOWN_GLYPH };
        let idx = match spec.column {
            SortColumn::Symbol => 0,
            SortColumn::Price => 1,
        };
        headers[idx] = format!("{} {}", headers[idx], glyph);
    }

    let rows: Vec<Row> = state
        .favourites
        .iter()
        .map(|row| Row::new(vec![row.symbol.clone(), format!("{:.2}", row.price)]))
        .collect();

    let table = Table::new(rows, [Constraint::Percentage(50), Constraint::Percentage(50)])
        .header(Row::new(headers.to_vec()).style(Style::default().add_modifier(Modifier::BOLD)))
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .block(Block::default().borders(Borders::ALL).title(" Favourites "));

    let mut table_state = TableState::default().with_selected(Some(state.favourites_cursor));
    frame.render_stateful_widget(table, area, &mut table_state);
}

fn draw_volume_gauge(frame: &mut Frame, area: Rect, state: &DisplayState) {
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(" Volume / Market Cap "))
        .gauge_style(Style::default().fg(Color::Yellow))
        .percent(state.volume_percent);

    frame.render_widget(gauge, area);
}

fn draw_supply(frame: &mut Frame, area: Rect, state: &DisplayState) {
    let title = if state.supply_unit.is_empty() {
        " Supply ".to_string()
    } else {
        format!(" Supply ({}) ", state.supply_unit)
    };

    // Bar values are integers; keep two decimals in the printed value.
    let bars = [
        ("Supply", state.supply_values[0]),
        ("Max", state.supply_values[1]),
    ]
    .map(|(label, value)| {
        Bar::default()
            .label(Line::from(label))
            .value((value * 100.0).max(0.0) as u64)
            .text_value(format!("{:.2}", value))
    });

    let chart = BarChart::default()
        .block(Block::default().borders(Borders::ALL).title(title))
        .bar_width(9)
        .bar_gap(3)
        .bar_style(Style::default().fg(Color::Magenta))
        .data(BarGroup::default().bars(&bars));

    frame.render_widget(chart, area);
}

// ─── Currency overlay ────────────────────────────────────────────────────────

fn draw_overlay(frame: &mut Frame, state: &DisplayState) {
    let area = centered_rect(40, 60, frame.area());

    let items: Vec<ListItem> = state
        .overlay
        .rows
        .iter()
        .map(|currency| {
            ListItem::new(format!(
                "{:<5} {:<3} {:>12.6}",
                currency.code, currency.symbol, currency.rate_usd
            ))
        })
        .collect();

    let list = List::new(items)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .block(Block::default().borders(Borders::ALL).title(" Select Currency "));

    let mut list_state = ListState::default().with_selected(Some(state.overlay.selected));

    frame.render_widget(Clear, area);
    frame.render_stateful_widget(list, area, &mut list_state);
}

/// Center a `percent_x` × `percent_y` rectangle inside `area`.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
