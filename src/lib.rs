//! Inspect the spectral windows of measurement sets and plot their frequency
//! coverage.

pub mod plot;
pub mod read;
pub mod units;

#[cfg(test)]
pub(crate) mod test_util;

pub use plot::{
    terminal::TerminalBackend, CoveragePlot, CoveragePlotter, LegendHandle, PlotBackend,
    PlotError, PlotStyle, RenderOptions,
};
pub use read::{ms::MsInfo, MsError, SpwId};
pub use units::{unit_to_divisor, FrequencyUnit, UnitError};
