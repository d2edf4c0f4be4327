//! Draw coverage plots in the terminal.

use std::{io, time::Duration};

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{
        self, disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
        SetTitle,
    },
    tty::IsTty,
};
use log::debug;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::Constraint,
    style::{Modifier, Style},
    symbols::Marker,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, LegendPosition},
    Frame, Terminal,
};

use super::{CoveragePlot, PlotBackend, PlotError};

/// The number of labels on the frequency axis.
const NUM_X_LABELS: usize = 5;

/// Plots drawn on an interactive terminal. Only obtainable through
/// [`TerminalBackend::detect`], which checks that there is a terminal to draw
/// on.
#[derive(Debug)]
pub struct TerminalBackend {
    _detected: (),
}

impl TerminalBackend {
    pub fn detect() -> Result<TerminalBackend, PlotError> {
        if !io::stdout().is_tty() {
            return Err(PlotError::BackendUnavailable(
                "stdout is not a terminal".to_string(),
            ));
        }
        let (width, height) = terminal::size().map_err(|e| {
            PlotError::BackendUnavailable(format!("couldn't get the terminal size: {e}"))
        })?;
        debug!("Terminal is {width}x{height}");

        Ok(TerminalBackend { _detected: () })
    }
}

impl PlotBackend for TerminalBackend {
    /// Draw the plot until the user presses q, Esc or Enter.
    fn show(&mut self, plot: &CoveragePlot) -> Result<(), PlotError> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, SetTitle(&plot.title))?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.hide_cursor()?;

        let result = main_loop(&mut terminal, plot);

        // Put the terminal back even if drawing failed.
        terminal.show_cursor()?;
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        result
    }
}

fn main_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    plot: &CoveragePlot,
) -> Result<(), PlotError> {
    loop {
        terminal.draw(|frame| draw(frame, plot))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press
                    && matches!(key.code, KeyCode::Char('q') | KeyCode::Esc | KeyCode::Enter)
                {
                    return Ok(());
                }
            }
        }
    }
}

fn x_labels(bounds: [f64; 2]) -> Vec<Span<'static>> {
    let step = (bounds[1] - bounds[0]) / (NUM_X_LABELS - 1) as f64;
    (0..NUM_X_LABELS)
        .map(|i| Span::raw(format!("{:.3}", bounds[0] + step * i as f64)))
        .collect()
}

/// Draw the plot over the whole frame.
pub fn draw(frame: &mut Frame, plot: &CoveragePlot) {
    let datasets = plot
        .rows
        .iter()
        .flat_map(|row| {
            row.segments.iter().enumerate().map(move |(i, segment)| {
                let dataset = Dataset::default()
                    .marker(Marker::Braille)
                    .graph_type(GraphType::Line)
                    .style(Style::default().fg(row.colour))
                    .data(&segment[..]);
                if row.legend_segment == Some(i) {
                    dataset.name(row.legend_label())
                } else {
                    dataset
                }
            })
        })
        .collect::<Vec<_>>();

    let y_labels = plot
        .y_labels
        .iter()
        .map(|label| Span::raw(label.clone()))
        .collect::<Vec<_>>();

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(
                    plot.title.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                ))
                .title_bottom("q: quit"),
        )
        .x_axis(
            Axis::default()
                .title(plot.x_label())
                .bounds(plot.x_bounds)
                .labels(x_labels(plot.x_bounds)),
        )
        .y_axis(Axis::default().bounds(plot.y_bounds).labels(y_labels))
        .legend_position(Some(LegendPosition::TopRight))
        .hidden_legend_constraints((Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)));

    frame.render_widget(chart, frame.area());
}
