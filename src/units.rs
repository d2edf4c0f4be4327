//! Frequency display units.

use std::str::FromStr;

use strum_macros::{Display, EnumIter, EnumString};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum UnitError {
    #[error("Unrecognised frequency unit '{0}'; expected one of Hz, kHz, MHz, GHz, THz")]
    Unknown(String),
}

/// A unit that frequencies \[Hz\] can be displayed in. Parsing is
/// case-insensitive, e.g. "ghz", "GHZ" and "GHz" are all [`FrequencyUnit::GHz`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(ascii_case_insensitive)]
pub enum FrequencyUnit {
    #[strum(to_string = "Hz")]
    Hz,
    #[strum(to_string = "kHz")]
    KHz,
    #[strum(to_string = "MHz")]
    MHz,
    #[strum(to_string = "GHz")]
    GHz,
    #[strum(to_string = "THz")]
    THz,
}

impl FrequencyUnit {
    /// The number of Hz in one of this unit.
    pub fn divisor(self) -> f64 {
        match self {
            FrequencyUnit::Hz => 1e0,
            FrequencyUnit::KHz => 1e3,
            FrequencyUnit::MHz => 1e6,
            FrequencyUnit::GHz => 1e9,
            FrequencyUnit::THz => 1e12,
        }
    }

    pub fn parse(unit: &str) -> Result<FrequencyUnit, UnitError> {
        FrequencyUnit::from_str(unit).map_err(|_| UnitError::Unknown(unit.to_string()))
    }
}

impl Default for FrequencyUnit {
    fn default() -> Self {
        FrequencyUnit::GHz
    }
}

/// Look up the divisor that converts Hz into `unit`.
pub fn unit_to_divisor(unit: &str) -> Result<f64, UnitError> {
    FrequencyUnit::parse(unit).map(FrequencyUnit::divisor)
}
