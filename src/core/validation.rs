//! Descriptor validation
//!
//! Every read checks the stored variable's descriptor against what the caller
//! expects before a single element is transferred. Checks run in a fixed
//! order and stop at the first failure:
//!
//! 1. existence
//! 2. rank (must be 2)
//! 3. numeric class (double for matrices, char for string arrays)
//! 4. realness
//! 5. dimensions (exact for matrices, at-most-rows for string arrays)

use crate::error::{Axis, MatError, Result};
use crate::variable::{NumericClass, VariableDescriptor};
use std::path::Path;

/// What the caller is about to do with the variable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    /// Numeric matrix transfer; stored shape must equal `rows x cols`
    Exact { rows: usize, cols: usize },
    /// String array transfer; at most the stored number of rows may be requested
    AtMostRows { rows: usize },
    /// Shape query; only existence and rank are checked
    RankOnly,
}

impl AccessMode {
    fn expected_class(&self) -> Option<NumericClass> {
        match self {
            AccessMode::Exact { .. } => Some(NumericClass::Double),
            AccessMode::AtMostRows { .. } => Some(NumericClass::Char),
            AccessMode::RankOnly => None,
        }
    }
}

/// Validate a looked-up descriptor and return the stored `(rows, cols)`
///
/// `descriptor` is `None` when the container has no variable called `name`.
///
/// # Errors
///
/// `NotFound`, `WrongRank`, `WrongClass`, `ComplexNotSupported` or
/// `DimensionMismatch`, whichever check fails first.
pub fn validate(
    descriptor: Option<&VariableDescriptor>,
    name: &str,
    path: &Path,
    mode: AccessMode,
) -> Result<(usize, usize)> {
    let desc = descriptor.ok_or_else(|| MatError::NotFound {
        name: name.to_string(),
        path: path.to_path_buf(),
    })?;

    let (rows, cols) = desc.shape().ok_or_else(|| MatError::WrongRank {
        name: name.to_string(),
        path: path.to_path_buf(),
        rank: desc.rank(),
    })?;

    let Some(expected) = mode.expected_class() else {
        return Ok((rows, cols));
    };

    if desc.class != expected {
        return Err(MatError::WrongClass {
            name: name.to_string(),
            path: path.to_path_buf(),
            expected: expected.to_string(),
            actual: desc.class.to_string(),
        });
    }

    if desc.is_complex {
        return Err(MatError::ComplexNotSupported {
            name: name.to_string(),
            path: path.to_path_buf(),
        });
    }

    let mismatch = |axis, requested| MatError::DimensionMismatch {
        name: name.to_string(),
        path: path.to_path_buf(),
        axis,
        requested,
        rows,
        cols,
    };

    match mode {
        AccessMode::Exact {
            rows: want_rows,
            cols: want_cols,
        } => {
            if want_rows != rows {
                return Err(mismatch(Axis::Rows, want_rows));
            }
            if want_cols != cols {
                return Err(mismatch(Axis::Cols, want_cols));
            }
        }
        AccessMode::AtMostRows { rows: want_rows } => {
            if want_rows > rows {
                return Err(mismatch(Axis::Rows, want_rows));
            }
        }
        AccessMode::RankOnly => {}
    }

    Ok((rows, cols))
}

/// Validate a variable name before it is written
///
/// Names must be non-empty and must not contain NUL, which terminates the
/// stored name.
pub fn validate_variable_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(MatError::InvalidArgument(
            "variable name cannot be empty".to_string(),
        ));
    }

    if name.contains('\0') {
        return Err(MatError::InvalidArgument(format!(
            "variable name {:?} contains a NUL byte",
            name
        )));
    }

    Ok(())
}
