//! Host-facing entry points
//!
//! Simulation hosts do not consume `Result`s. They expect every call to
//! return a plain value and to report problems through their own error
//! channel, which has two severities:
//!
//! - **fatal** ([`Host::error`]) for malformed or missing data, allocation
//!   failure and I/O failure; the host aborts its current operation
//! - **non-fatal** ([`Host::message`]) for informational output and absent
//!   optional values; the caller continues
//!
//! [`HostMatFile`] and [`HostJsonFile`] wrap the typed API and translate each
//! failure into a report plus a neutral return value.

use crate::container::Backend;
use crate::io::Mat4Backend;
use crate::json::JsonFile;
use crate::{MatFile, MatFileConfig};
use std::path::Path;
use tracing::{error, info};

/// Error and message sink of the host runtime
pub trait Host {
    /// Report a fatal error
    fn error(&mut self, message: &str);

    /// Report a non-fatal message
    fn message(&mut self, message: &str);
}

/// Host that forwards everything to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingHost;

impl Host for TracingHost {
    fn error(&mut self, message: &str) {
        error!("{}", message);
    }

    fn message(&mut self, message: &str) {
        info!("{}", message);
    }
}

/// Host that keeps every report, for inspection
#[derive(Debug, Clone, Default)]
pub struct RecordingHost {
    pub errors: Vec<String>,
    pub messages: Vec<String>,
}

impl Host for RecordingHost {
    fn error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }

    fn message(&mut self, message: &str) {
        self.messages.push(message.to_string());
    }
}

/// MAT-file handle as seen by the host
pub struct HostMatFile<H: Host, B: Backend = Mat4Backend> {
    mat: MatFile<B>,
    host: H,
}

impl<H: Host> HostMatFile<H> {
    /// Construct a handle for `path`
    ///
    /// Nothing is opened yet; with `verbose` the host is told which file
    /// will be used.
    pub fn construct<P: AsRef<Path>>(path: P, verbose: bool, mut host: H) -> Self {
        if verbose {
            host.message(&format!("... loading \"{}\"", path.as_ref().display()));
        }
        let config = MatFileConfig {
            verbose,
            ..MatFileConfig::default()
        };
        HostMatFile {
            mat: MatFile::with_config(path, config),
            host,
        }
    }
}

impl<H: Host, B: Backend> HostMatFile<H, B> {
    /// Wrap an existing typed handle
    pub fn from_mat_file(mat: MatFile<B>, host: H) -> Self {
        HostMatFile { mat, host }
    }

    pub fn mat_file(&self) -> &MatFile<B> {
        &self.mat
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    /// Stored `(rows, cols)`, or `(0, 0)` after a fatal report
    pub fn get_matrix_dimensions(&mut self, name: &str) -> (usize, usize) {
        match self.mat.matrix_dimensions(name) {
            Ok(dims) => dims,
            Err(e) => {
                self.host.error(&e.to_string());
                (0, 0)
            }
        }
    }

    /// Fill `buffer` with the row-major matrix; failures are reported and
    /// leave `buffer` untouched
    pub fn read_matrix(&mut self, name: &str, buffer: &mut [f64], rows: usize, cols: usize) {
        if let Err(e) = self.mat.read_matrix_into(name, buffer, rows, cols) {
            self.host.error(&e.to_string());
        }
    }

    /// First `rows` strings of a character array, or none after a fatal report
    pub fn read_string_column(&mut self, name: &str, rows: usize) -> Vec<String> {
        self.mat.read_string_column(name, rows).unwrap_or_else(|e| {
            self.host.error(&e.to_string());
            Vec::new()
        })
    }

    /// Write a row-major matrix; returns `1` on success and `0` after a fatal
    /// report
    pub fn write_matrix(
        &mut self,
        name: &str,
        buffer: &[f64],
        rows: usize,
        cols: usize,
        append: bool,
    ) -> i32 {
        match self.mat.write_matrix(name, buffer, rows, cols, append) {
            Ok(()) => 1,
            Err(e) => {
                self.host.error(&e.to_string());
                0
            }
        }
    }
}

/// JSON file handle as seen by the host
///
/// Lookups return the value plus an `exists` flag. A missing key is a
/// non-fatal message; an unparsable value is fatal.
pub struct HostJsonFile<H: Host> {
    json: Option<JsonFile>,
    host: H,
}

impl<H: Host> HostJsonFile<H> {
    /// Load and parse `path`; a parse failure is reported and leaves an
    /// empty handle whose lookups find nothing
    pub fn construct<P: AsRef<Path>>(path: P, verbose: bool, mut host: H) -> Self {
        if verbose {
            host.message(&format!("... loading \"{}\"", path.as_ref().display()));
        }
        let json = match JsonFile::open(path, false) {
            Ok(json) => Some(json),
            Err(e) => {
                host.error(&e.to_string());
                None
            }
        };
        HostJsonFile { json, host }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    fn lookup<T>(
        &mut self,
        name: &str,
        get: impl FnOnce(&JsonFile, &str) -> crate::Result<Option<T>>,
    ) -> Option<T> {
        let json = self.json.as_ref()?;
        match get(json, name) {
            Ok(Some(value)) => Some(value),
            Ok(None) => {
                self.host.message(&format!(
                    "Cannot read element \"{}\" from file \"{}\"",
                    name,
                    json.path().display()
                ));
                None
            }
            Err(e) => {
                self.host.error(&e.to_string());
                None
            }
        }
    }

    /// `(value, exists)`; `0.0` when absent
    pub fn get_double(&mut self, name: &str) -> (f64, bool) {
        match self.lookup(name, JsonFile::get_double) {
            Some(value) => (value, true),
            None => (0.0, false),
        }
    }

    /// `(value, exists)`; `0` when absent
    pub fn get_int(&mut self, name: &str) -> (i64, bool) {
        match self.lookup(name, JsonFile::get_int) {
            Some(value) => (value, true),
            None => (0, false),
        }
    }

    /// `(value, exists)`; empty when absent
    pub fn get_string(&mut self, name: &str) -> (String, bool) {
        match self.lookup(name, JsonFile::get_string) {
            Some(value) => (value, true),
            None => (String::new(), false),
        }
    }
}
