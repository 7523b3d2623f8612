//! Structural metadata of a stored array

use serde::{Deserialize, Serialize};

/// Numeric class of a stored array as seen by the pipelines
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NumericClass {
    /// Full double-precision numeric matrix
    Double,
    /// Character array, one code point per element
    Char,
    /// Anything else (sparse, integer classes of richer formats, ...)
    Other(String),
}

impl std::fmt::Display for NumericClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NumericClass::Double => write!(f, "double precision"),
            NumericClass::Char => write!(f, "character"),
            NumericClass::Other(name) => write!(f, "{}", name),
        }
    }
}

/// On-disk element type of the data section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum Precision {
    F64 = 0,
    F32 = 1,
    I32 = 2,
    I16 = 3,
    U16 = 4,
    U8 = 5,
}

impl Precision {
    /// Convert from the MAT v4 `P` digit
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Precision::F64),
            1 => Some(Precision::F32),
            2 => Some(Precision::I32),
            3 => Some(Precision::I16),
            4 => Some(Precision::U16),
            5 => Some(Precision::U8),
            _ => None,
        }
    }

    /// Size of one element in bytes
    pub fn size(self) -> usize {
        match self {
            Precision::F64 => 8,
            Precision::F32 | Precision::I32 => 4,
            Precision::I16 | Precision::U16 => 2,
            Precision::U8 => 1,
        }
    }
}

/// Variable descriptor
///
/// Describes a stored array before any of its data is transferred. Readers
/// validate it against the caller's expectations; writers build one for the
/// array they are about to store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDescriptor {
    /// Variable name inside the container
    pub name: String,

    /// Per-axis extents; `dims.len()` is the rank
    pub dims: Vec<usize>,

    /// Numeric class
    pub class: NumericClass,

    /// True if an imaginary part is stored
    pub is_complex: bool,

    /// Element type of the stored data
    pub precision: Precision,
}

impl VariableDescriptor {
    /// Descriptor of a real double-precision matrix
    pub fn matrix(name: impl Into<String>, rows: usize, cols: usize) -> Self {
        VariableDescriptor {
            name: name.into(),
            dims: vec![rows, cols],
            class: NumericClass::Double,
            is_complex: false,
            precision: Precision::F64,
        }
    }

    /// Dimensionality count
    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    /// Total number of elements
    pub fn len(&self) -> usize {
        self.dims.iter().product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `(rows, cols)` of a rank-2 descriptor, `None` otherwise
    pub fn shape(&self) -> Option<(usize, usize)> {
        match self.dims.as_slice() {
            [rows, cols] => Some((*rows, *cols)),
            _ => None,
        }
    }
}
