//! Binary container interface
//!
//! The read and write pipelines never touch bytes directly. They talk to a
//! [`Container`] obtained from a [`Backend`], which hides the file encoding.
//! The crate ships [`Mat4Backend`](crate::io::Mat4Backend); tests plug in
//! in-memory fakes through the same traits.

use crate::error::Result;
use crate::variable::VariableDescriptor;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Compression requested for written variables
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Compression {
    /// Store data as-is
    None,
    /// Deflate the data section where the format supports it
    #[default]
    Zlib,
}

/// How an existing container is opened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    ReadOnly,
    ReadWrite,
}

/// An opened container file
///
/// Dropping the container releases the underlying file handle.
pub trait Container {
    /// Path the container was opened from
    fn path(&self) -> &Path;

    /// Descriptors of all stored variables, in file order
    fn variables(&mut self) -> Result<Vec<VariableDescriptor>>;

    /// Look up a variable's descriptor without reading its data
    ///
    /// Returns `Ok(None)` if no variable has that name.
    fn var_info(&mut self, name: &str) -> Result<Option<VariableDescriptor>>;

    /// Read the real part of a variable, column-major, into `out`
    ///
    /// `out.len()` must equal the descriptor's element count.
    fn read_data(&mut self, var: &VariableDescriptor, out: &mut [f64]) -> Result<()>;

    /// Remove a variable; returns whether it existed
    fn delete(&mut self, name: &str) -> Result<bool>;

    /// Append a variable whose column-major data is `data`
    fn write(
        &mut self,
        var: &VariableDescriptor,
        data: &[f64],
        compression: Compression,
    ) -> Result<()>;
}

/// Opens and creates containers of one file format
pub trait Backend {
    type Container: Container;

    /// Open an existing file
    fn open(&self, path: &Path, mode: OpenMode) -> Result<Self::Container>;

    /// Create a new, empty file, replacing any existing one
    fn create(&self, path: &Path) -> Result<Self::Container>;
}
