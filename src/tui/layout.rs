//! TUI layout and widget rendering.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, Block, Borders, Cell, Chart, Dataset, Paragraph, Row, Table};

use super::runtime::App;
use super::style;
use crate::tasks::types::PROGRESS_DONE;

/// Ticks of history shown in the voltage chart.
const CHART_WINDOW: u64 = 60;

/// Width of the text progress bar in the task table.
const BAR_WIDTH: usize = 20;

/// Renders the full TUI frame.
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Min(10),   // chart
            Constraint::Length(8), // tables
            Constraint::Length(1), // message
            Constraint::Length(1), // footer
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    render_chart(frame, app, chunks[1]);

    let tables = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[2]);
    render_cells(frame, app, tables[0]);
    render_tasks(frame, app, tables[1]);

    render_message(frame, app, chunks[3]);
    render_footer(frame, chunks[4]);
}

/// Header bar: run state, tick counter, speed, averages.
fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let (icon, label) = if app.session.is_running() {
        ("▶", "RUNNING")
    } else {
        ("‖", "PAUSED")
    };
    let summary = app.session.summary();
    let avg_v = summary
        .avg_voltage
        .map_or_else(|| "-".to_string(), |v| format!("{v:.2}V"));

    let header = Line::from(vec![
        Span::styled(
            " CELL-SIM ",
            Style::default()
                .fg(style::HEADER_FG)
                .bg(style::HEADER_BG)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(
            " │ t={} │ {}ms │ {icon} {label} │ cells={} avg={avg_v} │ tasks={} done={} ",
            summary.ticks,
            app.tick_interval_ms(),
            summary.active_cells,
            summary.tasks,
            summary.completed_tasks,
        )),
    ]);
    frame.render_widget(Paragraph::new(header), area);
}

/// Per-cell voltage over the most recent ticks.
fn render_chart(frame: &mut Frame, app: &App, area: Rect) {
    let session = &app.session;
    let started = session.started_at();
    let x_hi = session.tick_count().max(1);
    let x_lo = x_hi.saturating_sub(CHART_WINDOW);

    let series: Vec<Vec<(f64, f64)>> = session
        .cells()
        .cells()
        .iter()
        .map(|cell| {
            session
                .history()
                .iter()
                .filter(|h| h.cell_id == cell.cell_id)
                .map(|h| ((h.timestamp - started).num_seconds() as f64, h.voltage))
                .filter(|&(x, _)| x >= x_lo as f64)
                .collect()
        })
        .collect();

    let y_bounds = style::auto_bounds_y(&series);

    let datasets: Vec<Dataset> = session
        .cells()
        .cells()
        .iter()
        .zip(&series)
        .enumerate()
        .map(|(i, (cell, data))| {
            Dataset::default()
                .name(cell.cell_id.as_str())
                .marker(symbols::Marker::Braille)
                .style(Style::default().fg(style::SERIES_COLORS[i % style::SERIES_COLORS.len()]))
                .data(data)
        })
        .collect();

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .title(" Cell Voltage ")
                .borders(Borders::ALL),
        )
        .x_axis(
            Axis::default()
                .title("tick")
                .bounds([x_lo as f64, x_hi as f64])
                .labels(vec![x_lo.to_string(), x_hi.to_string()]),
        )
        .y_axis(
            Axis::default()
                .title("V")
                .bounds(y_bounds)
                .labels(vec![
                    format!("{:.2}", y_bounds[0]),
                    format!("{:.2}", y_bounds[1]),
                ]),
        );

    frame.render_widget(chart, area);
}

/// Live readings of every cell.
fn render_cells(frame: &mut Frame, app: &App, area: Rect) {
    let header = Row::new(["id", "type", "V", "A", "°C", "Ah"])
        .style(Style::default().fg(style::TABLE_HEADER_FG));
    let rows = app.session.cells().cells().iter().map(|c| {
        Row::new(vec![
            Cell::from(c.cell_id.clone()),
            Cell::from(c.chemistry.as_str())
                .style(Style::default().fg(style::chemistry_color(c.chemistry))),
            Cell::from(format!("{:.2}", c.voltage)),
            Cell::from(format!("{:.2}", c.current)),
            Cell::from(format!("{:.1}", c.temp)),
            Cell::from(format!("{:.2}", c.capacity)),
        ])
    });
    let table = Table::new(
        rows,
        [
            Constraint::Length(12),
            Constraint::Length(4),
            Constraint::Length(5),
            Constraint::Length(5),
            Constraint::Length(5),
            Constraint::Length(6),
        ],
    )
    .header(header)
    .block(Block::default().title(" Cells ").borders(Borders::ALL));
    frame.render_widget(table, area);
}

/// Task queue with progress bars.
fn render_tasks(frame: &mut Frame, app: &App, area: Rect) {
    let rows = app.session.tasks().tasks().iter().map(|t| {
        Row::new(vec![
            Cell::from(t.task_id.clone()),
            Cell::from(t.kind.name()),
            Cell::from(progress_bar(t.progress))
                .style(Style::default().fg(style::task_color(t.status))),
        ])
    });
    let table = Table::new(
        rows,
        [
            Constraint::Length(8),
            Constraint::Length(6),
            Constraint::Min(BAR_WIDTH as u16 + 5),
        ],
    )
    .block(Block::default().title(" Tasks ").borders(Borders::ALL));
    frame.render_widget(table, area);
}

fn progress_bar(progress: u8) -> String {
    let filled = usize::from(progress) * BAR_WIDTH / usize::from(PROGRESS_DONE);
    format!(
        "{}{} {progress:>3}%",
        "█".repeat(filled),
        "░".repeat(BAR_WIDTH - filled)
    )
}

fn render_message(frame: &mut Frame, app: &App, area: Rect) {
    let text = app.message.as_deref().unwrap_or("");
    let line = Line::from(Span::styled(
        format!(" {text}"),
        Style::default().fg(style::MESSAGE_FG),
    ));
    frame.render_widget(Paragraph::new(line), area);
}

/// Footer with keybinding hints.
fn render_footer(frame: &mut Frame, area: Rect) {
    let footer = Paragraph::new(Line::from(Span::styled(
        " q:Quit  Space:Run  t:Tick  l/n:Add LFP/NMC  c:Clear  h:Clear hist  a:Task  s:Start  d:Del done  e:Export  +/-:Speed  r:Restart",
        Style::default().fg(style::FOOTER_FG),
    )));
    frame.render_widget(footer, area);
}
