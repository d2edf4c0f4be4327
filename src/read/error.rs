use std::path::PathBuf;

use thiserror::Error;

use super::PatternError;

#[derive(Error, Debug)]
pub enum MsError {
    #[error("Measurement set '{0}' does not exist")]
    NotFound(PathBuf),

    #[error("Measurement set '{ms}' is missing its required {subtable} table")]
    MissingSubtable { ms: PathBuf, subtable: &'static str },

    #[error("Could not open {name} table of measurement set '{ms}'")]
    TableNotFound { ms: PathBuf, name: String },

    #[error(transparent)]
    Pattern(#[from] PatternError),

    #[error("casacore table error: {0}")]
    Table(#[from] rubbl_casatables::TableError),
}
