use std::path::{Path, PathBuf};

use thiserror::Error;

// ---------------------------------------------------------------------------
// Error taxonomy
// ---------------------------------------------------------------------------

/// Every failure the batch run can produce.
///
/// File-level variants carry the path of the offending input (or output) so
/// the diagnostic always names the file that stopped the run.
#[derive(Error, Debug)]
pub enum BatchError {
    /// The file exists but is not a decodable image.
    #[error("failed to decode image '{path}': {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The grayscale image could not be encoded to the output format.
    #[error("failed to encode image '{path}': {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The file is not valid delimited text with a header row.
    #[error("failed to parse table '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// The file holds no header row at all.
    #[error("'{path}' is empty: no columns to parse")]
    EmptyTable { path: PathBuf },

    /// A `signal` cell could not be read as a number.
    #[error("'{path}': row {row}: signal value '{value}' is not a number")]
    InvalidSignalValue {
        path: PathBuf,
        row: usize,
        value: String,
    },

    /// The table has no column with the required name.
    #[error("'{path}' has no '{column}' column")]
    Schema { path: PathBuf, column: String },

    /// Directory or file access failed.
    #[error("filesystem error at '{path}': {source}")]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file or values are unusable.
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Broad error category, used for reporting and by callers matching on the
/// kind without caring about the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Decode,
    Encode,
    Parse,
    Schema,
    Filesystem,
    Config,
}

impl BatchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BatchError::Decode { .. } => ErrorKind::Decode,
            BatchError::Encode { .. } => ErrorKind::Encode,
            BatchError::Parse { .. }
            | BatchError::EmptyTable { .. }
            | BatchError::InvalidSignalValue { .. } => ErrorKind::Parse,
            BatchError::Schema { .. } => ErrorKind::Schema,
            BatchError::Filesystem { .. } => ErrorKind::Filesystem,
            BatchError::Config(_) => ErrorKind::Config,
        }
    }

    pub(crate) fn filesystem(path: &Path, source: std::io::Error) -> Self {
        BatchError::Filesystem {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Route a csv error: I/O problems are filesystem errors, the rest are
    /// parse errors.
    pub(crate) fn from_csv(path: &Path, source: csv::Error) -> Self {
        if source.is_io_error() {
            return BatchError::filesystem(path, std::io::Error::from(source));
        }
        BatchError::Parse {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorKind::Decode => "DecodeError",
            ErrorKind::Encode => "EncodeError",
            ErrorKind::Parse => "ParseError",
            ErrorKind::Schema => "SchemaError",
            ErrorKind::Filesystem => "FilesystemError",
            ErrorKind::Config => "ConfigError",
        };
        f.write_str(name)
    }
}

/// Result type for batch operations.
pub type Result<T> = std::result::Result<T, BatchError>;
