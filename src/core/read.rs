//! Read pipeline
//!
//! open → locate → validate → raw read → transpose → hand over.
//!
//! The container is opened at the start of each call and dropped on every
//! exit path, so a failed read never leaves the file open. Nothing is
//! written to caller-owned memory until every step has succeeded.

use crate::container::{Backend, Container, OpenMode};
use crate::error::{MatError, Result};
use crate::transpose::transpose;
use crate::validation::{validate, AccessMode};
use crate::variable::VariableDescriptor;
use std::path::Path;
use tracing::debug;

/// Allocate a zeroed scratch buffer, reporting allocation failure as an error
pub(crate) fn scratch(len: usize) -> Result<Vec<f64>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)?;
    buf.resize(len, 0.0);
    Ok(buf)
}

/// Look up and validate a variable, returning it with its stored shape
fn locate<C: Container>(
    container: &mut C,
    name: &str,
    path: &Path,
    mode: AccessMode,
) -> Result<(VariableDescriptor, (usize, usize))> {
    let desc = container.var_info(name)?;
    let shape = validate(desc.as_ref(), name, path, mode)?;
    let desc = desc.ok_or_else(|| MatError::NotFound {
        name: name.to_string(),
        path: path.to_path_buf(),
    })?;
    Ok((desc, shape))
}

fn element_count(rows: usize, cols: usize) -> Result<usize> {
    rows.checked_mul(cols).ok_or_else(|| {
        MatError::InvalidArgument(format!("{}x{} matrix size overflows", rows, cols))
    })
}

/// Descriptors of every variable in the file
pub fn list_variables<B: Backend>(backend: &B, path: &Path) -> Result<Vec<VariableDescriptor>> {
    let mut container = backend.open(path, OpenMode::ReadOnly)?;
    container.variables()
}

/// Stored `(rows, cols)` of a rank-2 variable
pub fn matrix_dimensions<B: Backend>(backend: &B, path: &Path, name: &str) -> Result<(usize, usize)> {
    let mut container = backend.open(path, OpenMode::ReadOnly)?;
    let (_, shape) = locate(&mut container, name, path, AccessMode::RankOnly)?;
    Ok(shape)
}

/// Read a real double matrix of exactly `rows x cols`, returned row-major
pub fn read_matrix<B: Backend>(
    backend: &B,
    path: &Path,
    name: &str,
    rows: usize,
    cols: usize,
) -> Result<Vec<f64>> {
    let len = element_count(rows, cols)?;

    let mut container = backend.open(path, OpenMode::ReadOnly)?;
    let (desc, _) = locate(&mut container, name, path, AccessMode::Exact { rows, cols })?;

    let mut data = scratch(len)?;
    container.read_data(&desc, &mut data).map_err(|e| match e {
        MatError::Io { source, .. } => MatError::io(
            format!(
                "Error when reading numeric data of matrix \"{}({},{})\" from file \"{}\"",
                name,
                rows,
                cols,
                container.path().display()
            ),
            source,
        ),
        other => other,
    })?;
    drop(container);

    // Stored column-major
    transpose(&mut data, rows, cols);
    debug!("Read {}x{} matrix \"{}\" from {:?}", rows, cols, name, path);
    Ok(data)
}

/// Read a matrix into a caller-owned row-major buffer
///
/// `out` is left untouched unless the whole read succeeds.
pub fn read_matrix_into<B: Backend>(
    backend: &B,
    path: &Path,
    name: &str,
    out: &mut [f64],
    rows: usize,
    cols: usize,
) -> Result<()> {
    if out.len() != element_count(rows, cols)? {
        return Err(MatError::InvalidArgument(format!(
            "buffer holds {} elements, {}x{} matrix needs {}",
            out.len(),
            rows,
            cols,
            rows * cols
        )));
    }

    let data = read_matrix(backend, path, name, rows, cols)?;
    out.copy_from_slice(&data);
    Ok(())
}

/// Read the first `rows` rows of a character array as strings
///
/// Fewer rows than stored may be requested. Every string has the stored
/// column count as its length.
pub fn read_string_column<B: Backend>(
    backend: &B,
    path: &Path,
    name: &str,
    rows: usize,
) -> Result<Vec<String>> {
    let mut container = backend.open(path, OpenMode::ReadOnly)?;
    let (desc, (stored_rows, cols)) =
        locate(&mut container, name, path, AccessMode::AtMostRows { rows })?;

    let mut data = scratch(element_count(stored_rows, cols)?)?;
    container.read_data(&desc, &mut data)?;
    drop(container);

    let mut strings = Vec::new();
    strings.try_reserve_exact(rows)?;
    for i in 0..rows {
        let mut s = String::new();
        s.try_reserve_exact(cols)?;
        // Row i of a column-major array, without transposing the rest
        for j in 0..cols {
            s.push(to_char(data[i + j * stored_rows], name, path)?);
        }
        strings.push(s);
    }

    debug!(
        "Read {} of {} rows of string array \"{}\" from {:?}",
        rows, stored_rows, name, path
    );
    Ok(strings)
}

fn to_char(code: f64, name: &str, path: &Path) -> Result<char> {
    let valid = code.fract() == 0.0 && (0.0..=u32::MAX as f64).contains(&code);
    valid
        .then(|| char::from_u32(code as u32))
        .flatten()
        .ok_or_else(|| {
            MatError::io(
                format!(
                    "Cannot read string data of array \"{}\" from file \"{}\"",
                    name,
                    path.display()
                ),
                std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    format!("{} is not a character code", code),
                ),
            )
        })
}
