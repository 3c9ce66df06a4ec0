use std::io;
use std::path::PathBuf;

use strip_map::{ColorError, GeometryError, NoteNameError, OrderError, StripTypeError};
use thiserror::Error;

/// Everything that can be wrong with a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be opened or read.
    #[error("cannot open configuration file {}: {source}", .path.display())]
    OpenFile {
        path:   PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("missing key {0}")]
    MissingKey(&'static str),
    #[error("{key}: '{value}' is not a valid {expected}")]
    InvalidValue {
        key:      &'static str,
        value:    String,
        expected: &'static str,
    },
    #[error("{key} must be a non-null positive number, got {value}")]
    NotPositive { key: &'static str, value: String },
    #[error("{key}: {source}")]
    Note {
        key:    &'static str,
        #[source]
        source: NoteNameError,
    },
    #[error("{key}: {source}")]
    Color {
        key:    &'static str,
        #[source]
        source: ColorError,
    },
    #[error("{key}: {source}")]
    StripType {
        key:    &'static str,
        #[source]
        source: StripTypeError,
    },
    #[error("{key}: {source}")]
    Order {
        key:    &'static str,
        #[source]
        source: OrderError,
    },
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

impl ConfigError {
    /// True when the file itself was unreadable, as opposed to readable but
    /// invalid.  The binary reports the two with different exit codes.
    pub fn is_open_file(&self) -> bool {
        matches!(self, ConfigError::OpenFile { .. })
    }
}
