//! Plot the frequency coverage of one or more measurement sets.
//!
//! Gathering the coverage ([`CoveragePlotter::coverage_plot`]) is kept apart
//! from displaying it ([`PlotBackend::show`]); a [`CoveragePlot`] holds
//! everything that will be drawn.

pub mod terminal;

use std::path::{Path, PathBuf};

use indicatif::ProgressBar;
use log::{debug, info, warn};
use ndarray::Array2;
use ratatui::style::Color;
use thiserror::Error;
use vec1::{vec1, Vec1};

use crate::{read::ms::MsInfo, units::FrequencyUnit, MsError, UnitError};

pub const PLOT_TITLE: &str = "Frequency Coverage";

#[derive(Error, Debug)]
pub enum PlotError {
    #[error("Plotting is unavailable: {0}")]
    BackendUnavailable(String),

    #[error(transparent)]
    Ms(#[from] MsError),

    #[error(transparent)]
    Unit(#[from] UnitError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Something that can display a [`CoveragePlot`]. A backend value should only
/// exist if it is actually able to display plots, i.e. checking that is the
/// job of the backend's constructor.
pub trait PlotBackend {
    /// Display the plot. This may block until the user is done with it.
    fn show(&mut self, plot: &CoveragePlot) -> Result<(), PlotError>;
}

/// Which of a measurement set's segments is labelled in the legend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegendHandle {
    First,
    Last,
}

#[derive(Debug, Clone)]
pub struct PlotStyle {
    /// Measurement sets are coloured by cycling through these.
    pub palette: Vec1<Color>,

    pub legend_handle: LegendHandle,
}

impl Default for PlotStyle {
    fn default() -> Self {
        PlotStyle {
            palette: vec1![
                Color::Blue,
                Color::Green,
                Color::Red,
                Color::Cyan,
                Color::Magenta,
                Color::Yellow
            ],
            legend_handle: LegendHandle::First,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Only plot SPWs used with a STATE matching this pattern. Ignored if
    /// `quick` is set.
    pub intent: String,

    /// Only plot SPWs used with a FIELD matching this pattern. Ignored if
    /// `quick` is set.
    pub field: String,

    /// Match `intent` and `field` against whole strings, rather than wrapping
    /// them in wildcards.
    pub exact_match: bool,

    /// Plot all SPWs defined in each measurement set, skipping the scan of the
    /// main table.
    pub quick: bool,

    /// The frequency unit to plot in, e.g. "GHz". Case insensitive.
    pub unit: String,

    /// Label the y axis with measurement set paths rather than their indices.
    pub dataset_labels_on_axis: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            intent: "OBSERVE_TARGET".to_string(),
            field: "*".to_string(),
            exact_match: false,
            quick: false,
            unit: FrequencyUnit::default().to_string(),
            dataset_labels_on_axis: false,
        }
    }
}

/// The coverage of one measurement set, drawn as a row of horizontal segments.
#[derive(Debug, Clone)]
pub struct CoverageRow {
    /// The 1-indexed position of this measurement set, which is also its y
    /// coordinate.
    pub index: usize,

    pub ms: PathBuf,

    pub colour: Color,

    /// Each SPW's (lower, y), (upper, y) in the plot's unit.
    pub segments: Vec<[(f64, f64); 2]>,

    /// The index into `segments` that represents this row in the legend. `None`
    /// if there are no segments.
    pub legend_segment: Option<usize>,
}

impl CoverageRow {
    pub fn legend_label(&self) -> String {
        format!("{}: {}", self.index, self.ms.display())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub colour: Color,
}

#[derive(Debug, Clone)]
pub struct CoveragePlot {
    pub title: String,

    pub unit: FrequencyUnit,

    pub rows: Vec<CoverageRow>,

    pub x_bounds: [f64; 2],

    pub y_bounds: [f64; 2],

    /// Labels for every integer y value from `y_bounds[0]` to `y_bounds[1]`.
    pub y_labels: Vec<String>,
}

impl CoveragePlot {
    pub fn x_label(&self) -> String {
        format!("Frequency ({})", self.unit)
    }

    /// One entry per measurement set that has something drawn. Entries keep
    /// their measurement set's index even if an earlier one has no entry.
    pub fn legend(&self) -> Vec<LegendEntry> {
        self.rows
            .iter()
            .filter(|row| row.legend_segment.is_some())
            .map(|row| LegendEntry {
                label: row.legend_label(),
                colour: row.colour,
            })
            .collect()
    }
}

/// Get the coverage \[Hz\] of the SPWs of a measurement set that `options`
/// asks for.
fn ms_coverage(ms: &Path, options: &RenderOptions) -> Result<Array2<f64>, PlotError> {
    let ms_info = MsInfo::open(ms)?;
    let coverage = if options.quick {
        ms_info.spw_coverage(None)?
    } else {
        let spws = ms_info.spw_ids_used(&options.intent, &options.field, options.exact_match)?;
        ms_info.spw_coverage(Some(&spws))?
    };
    Ok(coverage)
}

/// Pad the span of the segments so that none of them touch the edges of the
/// plot.
fn x_bounds(rows: &[CoverageRow]) -> [f64; 2] {
    let (min, max) = rows
        .iter()
        .flat_map(|row| row.segments.iter())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), [lower, upper]| {
            (min.min(lower.0), max.max(upper.0))
        });
    if !min.is_finite() || !max.is_finite() {
        return [0.0, 1.0];
    }

    let span = max - min;
    let pad = if span > 0.0 { span * 0.05 } else { 1.0 };
    [min - pad, max + pad]
}

pub struct CoveragePlotter<B: PlotBackend> {
    backend: B,

    ms_list: Vec1<PathBuf>,

    style: PlotStyle,

    progress_bar: Option<ProgressBar>,
}

impl<B: PlotBackend> CoveragePlotter<B> {
    pub fn new(backend: B, ms_list: Vec1<PathBuf>) -> CoveragePlotter<B> {
        CoveragePlotter {
            backend,
            ms_list,
            style: PlotStyle::default(),
            progress_bar: None,
        }
    }

    pub fn with_style(self, style: PlotStyle) -> CoveragePlotter<B> {
        CoveragePlotter { style, ..self }
    }

    /// Report progress through the measurement sets on this progress bar.
    pub fn with_progress_bar(self, progress_bar: ProgressBar) -> CoveragePlotter<B> {
        CoveragePlotter {
            progress_bar: Some(progress_bar),
            ..self
        }
    }

    pub fn ms_list(&self) -> &Vec1<PathBuf> {
        &self.ms_list
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Gather the coverage of all measurement sets and lay it out, without
    /// displaying anything.
    pub fn coverage_plot(&self, options: &RenderOptions) -> Result<CoveragePlot, PlotError> {
        // Resolve the unit before doing any table work.
        let unit = FrequencyUnit::parse(&options.unit)?;
        let divisor = unit.divisor();
        if options.quick {
            debug!("Quick mode; plotting all SPWs");
        } else {
            debug!(
                "Plotting SPWs with intent '{}' and field '{}'",
                options.intent, options.field
            );
        }

        let mut rows = Vec::with_capacity(self.ms_list.len());
        for (i, ms) in self.ms_list.iter().enumerate() {
            let index = i + 1;
            let coverage = ms_coverage(ms, options)? / divisor;
            let y = index as f64;
            let segments: Vec<[(f64, f64); 2]> = coverage
                .outer_iter()
                .map(|edges| [(edges[0], y), (edges[1], y)])
                .collect();

            match (segments.first(), segments.last()) {
                (Some(first), Some(last)) => info!(
                    "{index}: {} has {} SPWs; first {:.6}-{:.6} {unit}, last {:.6}-{:.6} {unit}",
                    ms.display(),
                    segments.len(),
                    first[0].0,
                    first[1].0,
                    last[0].0,
                    last[1].0
                ),
                _ => warn!("{index}: {} has no SPWs to plot", ms.display()),
            }

            let legend_segment = match (self.style.legend_handle, segments.len()) {
                (_, 0) => None,
                (LegendHandle::First, _) => Some(0),
                (LegendHandle::Last, n) => Some(n - 1),
            };
            rows.push(CoverageRow {
                index,
                ms: ms.clone(),
                colour: self.style.palette[i % self.style.palette.len()],
                segments,
                legend_segment,
            });

            if let Some(progress_bar) = self.progress_bar.as_ref() {
                progress_bar.inc(1);
            }
        }
        if let Some(progress_bar) = self.progress_bar.as_ref() {
            progress_bar.abandon_with_message("Finished reading");
        }

        let num_ms = self.ms_list.len();
        let mut y_labels = Vec::with_capacity(num_ms + 2);
        y_labels.push(String::new());
        y_labels.extend(rows.iter().map(|row| {
            if options.dataset_labels_on_axis {
                row.ms.display().to_string()
            } else {
                row.index.to_string()
            }
        }));
        y_labels.push(String::new());

        Ok(CoveragePlot {
            title: PLOT_TITLE.to_string(),
            unit,
            x_bounds: x_bounds(&rows),
            y_bounds: [0.0, (num_ms + 1) as f64],
            y_labels,
            rows,
        })
    }

    /// Gather the coverage of all measurement sets and display it with the
    /// backend.
    pub fn render(&mut self, options: &RenderOptions) -> Result<CoveragePlot, PlotError> {
        let plot = self.coverage_plot(options)?;
        self.backend.show(&plot)?;
        Ok(plot)
    }
}
