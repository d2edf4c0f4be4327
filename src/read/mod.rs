mod error;
pub mod ms;
pub mod pattern;

pub use error::MsError;
pub use pattern::{Pattern, PatternError};

/// A spectral window identifier; the row index into a measurement set's
/// SPECTRAL_WINDOW table.
pub type SpwId = usize;

/// The subtables that every measurement set must have for us to work with it.
pub const REQUIRED_SUBTABLES: [&str; 4] = ["SPECTRAL_WINDOW", "DATA_DESCRIPTION", "FIELD", "STATE"];
