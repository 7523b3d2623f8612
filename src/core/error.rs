use std::path::PathBuf;
use thiserror::Error;

/// Matrix axis named in a dimension mismatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Rows,
    Cols,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::Rows => write!(f, "rows"),
            Axis::Cols => write!(f, "columns"),
        }
    }
}

/// Coarse failure taxonomy, independent of the message payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    OpenFailure,
    NotFound,
    WrongRank,
    WrongClass,
    ComplexNotSupported,
    DimensionMismatch,
    IoFailure,
    AllocationFailure,
    InvalidFormat,
    InvalidArgument,
    Parse,
}

#[derive(Error, Debug)]
pub enum MatError {
    #[error("Not possible to open file \"{}\": {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Variable \"{name}\" not found on file \"{}\"", path.display())]
    NotFound { name: String, path: PathBuf },

    #[error(
        "Array \"{name}\" has not the required rank 2 (rank is {rank}) in file \"{}\"",
        path.display()
    )]
    WrongRank {
        name: String,
        path: PathBuf,
        rank: usize,
    },

    #[error(
        "2D array \"{name}\" has not the required {expected} class (found {actual}) in file \"{}\"",
        path.display()
    )]
    WrongClass {
        name: String,
        path: PathBuf,
        expected: String,
        actual: String,
    },

    #[error("2D array \"{name}\" in file \"{}\" must not be complex", path.display())]
    ComplexNotSupported { name: String, path: PathBuf },

    #[error(
        "Cannot read {requested} {axis} of matrix \"{name}({rows},{cols})\" from file \"{}\"",
        path.display()
    )]
    DimensionMismatch {
        name: String,
        path: PathBuf,
        axis: Axis,
        requested: usize,
        rows: usize,
        cols: usize,
    },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Memory allocation error: {0}")]
    Allocation(#[from] std::collections::TryReserveError),

    #[error("Invalid MAT-file data: {0}")]
    InvalidFormat(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error(
        "Error \"{message}\" in line {line}: Cannot parse file \"{}\"",
        path.display()
    )]
    Json {
        path: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Cannot read {kind} value \"{value}\" from file \"{}\"", path.display())]
    ParseValue {
        kind: &'static str,
        value: String,
        path: PathBuf,
    },
}

impl MatError {
    /// Wrap an I/O error with a human-readable context line
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        MatError::Io {
            context: context.into(),
            source,
        }
    }

    /// Taxonomy bucket of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            MatError::Open { .. } => ErrorKind::OpenFailure,
            MatError::NotFound { .. } => ErrorKind::NotFound,
            MatError::WrongRank { .. } => ErrorKind::WrongRank,
            MatError::WrongClass { .. } => ErrorKind::WrongClass,
            MatError::ComplexNotSupported { .. } => ErrorKind::ComplexNotSupported,
            MatError::DimensionMismatch { .. } => ErrorKind::DimensionMismatch,
            MatError::Io { .. } => ErrorKind::IoFailure,
            MatError::Allocation(_) => ErrorKind::AllocationFailure,
            MatError::InvalidFormat(_) => ErrorKind::InvalidFormat,
            MatError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            MatError::Json { .. } | MatError::ParseValue { .. } => ErrorKind::Parse,
        }
    }
}

pub type Result<T> = std::result::Result<T, MatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_mismatch_message() {
        let err = MatError::DimensionMismatch {
            name: "table".to_string(),
            path: PathBuf::from("data.mat"),
            axis: Axis::Cols,
            requested: 5,
            rows: 3,
            cols: 4,
        };
        assert_eq!(
            err.to_string(),
            "Cannot read 5 columns of matrix \"table(3,4)\" from file \"data.mat\""
        );
        assert_eq!(err.kind(), ErrorKind::DimensionMismatch);
    }

    #[test]
    fn test_kind_mapping() {
        let err = MatError::io("read failed", std::io::Error::other("boom"));
        assert_eq!(err.kind(), ErrorKind::IoFailure);
        assert!(err.to_string().starts_with("read failed"));

        let err = MatError::WrongRank {
            name: "cube".to_string(),
            path: PathBuf::from("cube.mat"),
            rank: 3,
        };
        assert_eq!(err.kind(), ErrorKind::WrongRank);
        assert!(err.to_string().contains("\"cube.mat\""));
    }
}
