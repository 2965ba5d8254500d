use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, BorderType, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use super::dashboard::{Dashboard, Series};
use crate::line::{format_elapsed, join_rpms};

pub struct Theme;

impl Theme {
    pub const TITLE: Color = Color::Rgb(0, 255, 0);
    pub const LABEL: Color = Color::White;
    pub const VALUE: Color = Color::Rgb(0, 255, 255);
    pub const GRAPH: Color = Color::Rgb(255, 255, 0);
    pub const BORDER: Color = Color::Rgb(68, 68, 68);
    pub const HELP: Color = Color::Rgb(136, 136, 136);

    pub fn title() -> Style {
        Style::default().fg(Self::TITLE).add_modifier(Modifier::BOLD)
    }

    pub fn label() -> Style {
        Style::default().fg(Self::LABEL).add_modifier(Modifier::BOLD)
    }

    pub fn value() -> Style {
        Style::default().fg(Self::VALUE)
    }

    pub fn help() -> Style {
        Style::default().fg(Self::HELP).add_modifier(Modifier::DIM)
    }
}

/// Draws the whole screen.
pub fn draw(f: &mut Frame, view: &Dashboard, workers: usize) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(8),
            Constraint::Length(1),
        ])
        .split(f.size());

    f.render_widget(header(view, workers), rows[0]);
    f.render_widget(stats(view), rows[1]);
    graphs(f, view, rows[2]);
    f.render_widget(help(), rows[3]);
}

pub fn header(view: &Dashboard, workers: usize) -> Paragraph<'static> {
    let text = format!(
        " BURNMON [{}/{}] Workers: {workers}",
        format_elapsed(view.elapsed),
        format_elapsed(view.duration)
    );
    Paragraph::new(Span::styled(text, Theme::title()))
}

/// `(label, value)` pairs for the stats line; absent metrics are skipped.
pub fn stat_segments(view: &Dashboard) -> Vec<(&'static str, String)> {
    let snapshot = &view.snapshot;
    let mut segments = vec![("Ops", format!("{} M/s", view.current_ops))];

    if snapshot.has_frequency() {
        segments.push((
            "CPU",
            format!(
                "{} MHz ({:.0}%)",
                snapshot.cpu_freq_cur_mhz, snapshot.cpu_freq_pct
            ),
        ));
    }
    if snapshot.has_temperature() {
        segments.push(("Temp", format!("{:.1}°C", snapshot.temperature_c)));
    }
    if snapshot.has_fans() {
        segments.push(("Fans", join_rpms(&snapshot.fan_rpms)));
    }

    segments
}

pub fn stats(view: &Dashboard) -> Paragraph<'static> {
    let mut spans = vec![Span::raw(" ")];
    for (i, (label, value)) in stat_segments(view).into_iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" │ "));
        }
        spans.push(Span::styled(format!("{label}: "), Theme::label()));
        spans.push(Span::styled(value, Theme::value()));
    }
    Paragraph::new(Line::from(spans))
}

pub fn help() -> Paragraph<'static> {
    Paragraph::new(Span::styled(
        " Controls: [+] increase workers │ [-] decrease workers │ [q] quit",
        Theme::help(),
    ))
}

/// Lays out the four charts in a 2x2 grid.
fn graphs(f: &mut Frame, view: &Dashboard, area: Rect) {
    let halves = |direction: Direction, area: Rect| {
        Layout::default()
            .direction(direction)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area)
    };
    let rows = halves(Direction::Vertical, area);
    let top = halves(Direction::Horizontal, rows[0]);
    let bottom = halves(Direction::Horizontal, rows[1]);

    panel(f, top[0], "Operations (M/s)", &view.ops, view.ops_upper_bound());
    panel(f, top[1], "CPU Frequency (%)", &view.cpu_pct, 100.0);
    panel(f, bottom[0], "Temperature (°C)", &view.temperature, 100.0);
    panel(f, bottom[1], "Fan Speed (RPM avg)", &view.fan_rpm, view.fan_upper_bound());
}

fn panel(f: &mut Frame, area: Rect, title: &str, series: &Series, upper: f64) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Theme::BORDER))
        .title(Span::styled(title.to_owned(), Theme::label()));

    // a line needs two points.
    if series.len() < 2 {
        let waiting = Paragraph::new("Waiting for data...")
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(waiting, area);
        return;
    }

    let points = series.xy();
    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Theme::GRAPH))
        .data(&points);

    let x_max = series.capacity().saturating_sub(1) as f64;
    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(Axis::default().bounds([0.0, x_max]))
        .y_axis(
            Axis::default()
                .bounds([0.0, upper])
                .labels(vec![
                    Span::raw("0"),
                    Span::raw(format!("{:.0}", upper / 2.0)),
                    Span::raw(format!("{upper:.0}")),
                ]),
        );
    f.render_widget(chart, area);
}
