//! Write pipeline
//!
//! create-or-append → delete old variable → transpose-copy → write.
//!
//! Appending means "add or replace in an existing file": a variable that
//! already carries the name is removed first. The caller's row-major buffer
//! is copied into a column-major scratch buffer and never modified.

use crate::container::{Backend, Compression, Container, OpenMode};
use crate::error::{MatError, Result};
use crate::read::scratch;
use crate::transpose::transpose;
use crate::validation::validate_variable_name;
use crate::variable::VariableDescriptor;
use std::path::Path;
use tracing::debug;

/// Write options of one call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    /// Keep the existing file and replace/add the variable
    pub append: bool,
    pub compression: Compression,
}

/// Store a row-major `rows x cols` matrix as a real double variable
pub fn write_matrix<B: Backend>(
    backend: &B,
    path: &Path,
    name: &str,
    data: &[f64],
    rows: usize,
    cols: usize,
    options: WriteOptions,
) -> Result<()> {
    validate_variable_name(name)?;
    let len = rows.checked_mul(cols).filter(|&len| len == data.len()).ok_or_else(|| {
        MatError::InvalidArgument(format!(
            "{} elements given for {}x{} matrix \"{}\"",
            data.len(),
            rows,
            cols,
            name
        ))
    })?;

    let mut container = if options.append {
        backend.open(path, OpenMode::ReadWrite)?
    } else {
        backend.create(path)?
    };

    if options.append && container.delete(name)? {
        debug!("Replacing variable \"{}\" in {:?}", name, path);
    }

    let mut column_major = scratch(len)?;
    column_major.copy_from_slice(data);
    // Row-major rows x cols is column-major cols x rows
    transpose(&mut column_major, cols, rows);

    let descriptor = VariableDescriptor::matrix(name, rows, cols);
    container
        .write(&descriptor, &column_major, options.compression)
        .map_err(|e| match e {
            MatError::Io { source, .. } => MatError::io(
                format!(
                    "Cannot write variable \"{}\" to \"{}\"",
                    name,
                    container.path().display()
                ),
                source,
            ),
            other => other,
        })?;

    drop(column_major);
    drop(descriptor);
    drop(container);

    debug!(
        "Wrote {}x{} matrix \"{}\" to {:?} (append: {})",
        rows, cols, name, path, options.append
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::Mat4Backend;
    use tempfile::TempDir;

    const APPEND: WriteOptions = WriteOptions {
        append: true,
        compression: Compression::Zlib,
    };

    #[test]
    fn test_stored_column_major() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("m.mat");
        let options = WriteOptions {
            append: false,
            compression: Compression::None,
        };

        let data = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        write_matrix(&Mat4Backend, &path, "m", &data, 2, 3, options).unwrap();

        let mut container = Mat4Backend.open(&path, OpenMode::ReadOnly).unwrap();
        let desc = container.var_info("m").unwrap().unwrap();
        assert_eq!(desc.dims, vec![2, 3]);
        let mut raw = [0.0; 6];
        container.read_data(&desc, &mut raw).unwrap();
        assert_eq!(raw, [1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
    }

    #[test]
    fn test_append_requires_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.mat");
        let err = write_matrix(&Mat4Backend, &path, "x", &[1.0], 1, 1, APPEND).unwrap_err();
        assert!(matches!(err, MatError::Open { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn test_rejects_bad_arguments() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.mat");
        let options = WriteOptions {
            append: false,
            compression: Compression::Zlib,
        };

        let err = write_matrix(&Mat4Backend, &path, "x", &[1.0, 2.0], 2, 2, options).unwrap_err();
        assert!(matches!(err, MatError::InvalidArgument(_)));
        let err = write_matrix(&Mat4Backend, &path, "", &[1.0], 1, 1, options).unwrap_err();
        assert!(matches!(err, MatError::InvalidArgument(_)));
        // Nothing was created
        assert!(!path.exists());
    }
}
