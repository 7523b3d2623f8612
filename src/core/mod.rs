//! Array marshalling core
//!
//! - [`transpose`] - in-place cycle-following transposition
//! - [`validation`] - descriptor checks run before any data transfer
//! - [`read`] / [`write`] - the per-call pipelines
//! - [`container`] - interface to the binary container
//! - [`header`] / [`io`] - the level-4 MAT-file backend

pub mod container;
pub mod error;
pub mod header;
pub mod io;
pub mod read;
pub mod transpose;
pub mod validation;
pub mod variable;
pub mod write;
