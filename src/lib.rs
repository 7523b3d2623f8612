//! # extern-data - MAT-file and JSON tables for simulation hosts
//!
//! `extern-data` moves 2D numeric tables and character arrays between a
//! simulation host and level-4 MAT-files, and looks up scalar values in JSON
//! configuration files.
//!
//! MAT-files store arrays column-major; hosts work row-major. Every read
//! validates the stored variable (rank, class, realness, dimensions) before
//! any data is trusted, then transposes in place. Every write transposes a
//! copy, so the caller's buffer is never touched.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use extern_data::{MatFile, Result};
//!
//! # fn main() -> Result<()> {
//! let mat = MatFile::new("table.mat");
//!
//! // 2x3 row-major
//! mat.write_matrix("t", &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2, 3, false)?;
//!
//! let (rows, cols) = mat.matrix_dimensions("t")?;
//! let table = mat.read_matrix("t", rows, cols)?;
//! assert_eq!(table, [1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Configuration
//!
//! ```rust,no_run
//! use extern_data::{Compression, MatFileBuilder, Result};
//!
//! # fn main() -> Result<()> {
//! let mat = MatFileBuilder::new()
//!     .path("/data/tables.mat")
//!     .verbose(true)
//!     .compression(Compression::None)
//!     .build()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐
//! │ host adapter │   │  JsonFile    │
//! └──────┬───────┘   └──────────────┘
//!        │
//! ┌──────▼───────┐
//! │   MatFile    │  path + config, container opened per call
//! └──────┬───────┘
//!        │
//! ┌──────▼──────────────────────────┐
//! │ read / write pipelines          │
//! │   validation   transpose        │
//! └──────┬──────────────────────────┘
//!        │ Container / Backend traits
//! ┌──────▼───────┐
//! │  Mat4File    │  level-4 record codec
//! └──────────────┘
//! ```

pub mod core;
pub mod host;
pub mod json;

// Re-export core modules internally so crate:: paths in core still work
#[allow(unused_imports)]
pub(crate) use self::core::{
    container, error, header, io, read, transpose, validation, variable, write,
};

pub use crate::core::{
    container::{Backend, Compression, Container, OpenMode},
    error::{Axis, ErrorKind, MatError, Result},
    io::{Mat4Backend, Mat4File},
    transpose::{transpose, try_transpose},
    validation::AccessMode,
    variable::{NumericClass, Precision, VariableDescriptor},
};
pub use host::{Host, HostMatFile, RecordingHost, TracingHost};
pub use json::JsonFile;

use crate::core::write::WriteOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Per-handle settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatFileConfig {
    /// Log an informational line whenever the file is opened
    pub verbose: bool,

    /// Compression requested for written variables
    pub compression: Compression,
}

impl Default for MatFileConfig {
    fn default() -> Self {
        MatFileConfig {
            verbose: false,
            compression: Compression::Zlib,
        }
    }
}

/// Handle to one MAT-file
///
/// Holds only the path and settings. Each operation opens the file, does its
/// work and closes it again, so no file handle outlives a call.
#[derive(Debug, Clone)]
pub struct MatFile<B: Backend = Mat4Backend> {
    path: PathBuf,
    config: MatFileConfig,
    backend: B,
}

impl MatFile<Mat4Backend> {
    /// Handle with default settings
    ///
    /// The file does not need to exist until the first operation.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self::with_backend(path, MatFileConfig::default(), Mat4Backend)
    }

    /// Handle with explicit settings
    pub fn with_config<P: AsRef<Path>>(path: P, config: MatFileConfig) -> Self {
        Self::with_backend(path, config, Mat4Backend)
    }
}

impl<B: Backend> MatFile<B> {
    /// Handle using a custom container backend
    pub fn with_backend<P: AsRef<Path>>(path: P, config: MatFileConfig, backend: B) -> Self {
        MatFile {
            path: path.as_ref().to_path_buf(),
            config,
            backend,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &MatFileConfig {
        &self.config
    }

    fn announce(&self, operation: &str) {
        if self.config.verbose {
            info!("... {} \"{}\"", operation, self.path.display());
        } else {
            debug!("{} {:?}", operation, self.path);
        }
    }

    /// Descriptors of all variables in the file
    pub fn variables(&self) -> Result<Vec<VariableDescriptor>> {
        self.announce("listing");
        read::list_variables(&self.backend, &self.path)
    }

    /// Stored `(rows, cols)` of a 2D variable
    ///
    /// # Errors
    ///
    /// `Open`, `NotFound` or `WrongRank`.
    pub fn matrix_dimensions(&self, name: &str) -> Result<(usize, usize)> {
        self.announce("loading");
        read::matrix_dimensions(&self.backend, &self.path, name)
    }

    /// Read a real double matrix of exactly `rows x cols`, row-major
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// # use extern_data::MatFile;
    /// let mat = MatFile::new("table.mat");
    /// let table = mat.read_matrix("t", 2, 3)?;
    /// assert_eq!(table.len(), 6);
    /// # Ok::<(), extern_data::MatError>(())
    /// ```
    pub fn read_matrix(&self, name: &str, rows: usize, cols: usize) -> Result<Vec<f64>> {
        self.announce("loading");
        read::read_matrix(&self.backend, &self.path, name, rows, cols)
    }

    /// Read a matrix into a caller-owned row-major buffer
    ///
    /// `out` is untouched when the read fails.
    pub fn read_matrix_into(
        &self,
        name: &str,
        out: &mut [f64],
        rows: usize,
        cols: usize,
    ) -> Result<()> {
        self.announce("loading");
        read::read_matrix_into(&self.backend, &self.path, name, out, rows, cols)
    }

    /// Read the first `rows` rows of a character array
    pub fn read_string_column(&self, name: &str, rows: usize) -> Result<Vec<String>> {
        self.announce("loading");
        read::read_string_column(&self.backend, &self.path, name, rows)
    }

    /// Write a row-major `rows x cols` matrix
    ///
    /// With `append == false` the file is created or truncated. With
    /// `append == true` the file must exist; a variable of the same name is
    /// replaced.
    pub fn write_matrix(
        &self,
        name: &str,
        data: &[f64],
        rows: usize,
        cols: usize,
        append: bool,
    ) -> Result<()> {
        self.announce(if append { "appending to" } else { "writing" });
        let options = WriteOptions {
            append,
            compression: self.config.compression,
        };
        write::write_matrix(&self.backend, &self.path, name, data, rows, cols, options)
    }
}

/// Builder for [`MatFile`]
///
/// # Examples
///
/// ```rust,no_run
/// use extern_data::MatFileBuilder;
///
/// # fn main() -> extern_data::Result<()> {
/// let mat = MatFileBuilder::new()
///     .path("results.mat")
///     .verbose(true)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct MatFileBuilder {
    path: Option<PathBuf>,
    config: MatFileConfig,
}

impl MatFileBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the file path (required)
    pub fn path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.config.verbose = verbose;
        self
    }

    pub fn compression(mut self, compression: Compression) -> Self {
        self.config.compression = compression;
        self
    }

    /// Build the handle
    pub fn build(self) -> Result<MatFile> {
        let path = self
            .path
            .ok_or_else(|| MatError::InvalidArgument("path must be set".to_string()))?;
        Ok(MatFile::with_config(path, self.config))
    }
}
