//! MAT v4 record header
//!
//! Every variable in a level-4 MAT-file starts with five 32-bit integers:
//!
//! ```text
//! ┌──────────┬─────────┬─────────┬─────────┬──────────┐
//! │ type     │ mrows   │ ncols   │ imagf   │ namlen   │
//! │ MOPT     │ i32     │ i32     │ 0 | 1   │ incl NUL │
//! └──────────┴─────────┴─────────┴─────────┴──────────┘
//! ```
//!
//! `type` packs four decimal digits `M*1000 + O*100 + P*10 + T`:
//! - `M` byte order (0 little-endian, 1 big-endian)
//! - `O` reserved, always 0
//! - `P` element precision (see [`Precision`])
//! - `T` matrix type (0 full, 1 text, 2 sparse)
//!
//! The header is followed by the NUL-terminated name, the real part and,
//! if `imagf` is set, the imaginary part.

use crate::error::{MatError, Result};
use crate::variable::{NumericClass, Precision};

/// Size of the fixed header in bytes
pub const HEADER_SIZE: usize = 20;

/// Byte order of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    Little,
    Big,
}

impl ByteOrder {
    fn digit(self) -> i32 {
        match self {
            ByteOrder::Little => 0,
            ByteOrder::Big => 1,
        }
    }

    pub fn read_i32(self, bytes: [u8; 4]) -> i32 {
        match self {
            ByteOrder::Little => i32::from_le_bytes(bytes),
            ByteOrder::Big => i32::from_be_bytes(bytes),
        }
    }

    fn write_i32(self, value: i32) -> [u8; 4] {
        match self {
            ByteOrder::Little => value.to_le_bytes(),
            ByteOrder::Big => value.to_be_bytes(),
        }
    }

    /// Decode one element of the given precision into a double
    pub fn decode(self, precision: Precision, bytes: &[u8]) -> f64 {
        macro_rules! num {
            ($t:ty, $n:expr) => {{
                let mut raw = [0u8; $n];
                raw.copy_from_slice(&bytes[..$n]);
                match self {
                    ByteOrder::Little => <$t>::from_le_bytes(raw) as f64,
                    ByteOrder::Big => <$t>::from_be_bytes(raw) as f64,
                }
            }};
        }

        match precision {
            Precision::F64 => num!(f64, 8),
            Precision::F32 => num!(f32, 4),
            Precision::I32 => num!(i32, 4),
            Precision::I16 => num!(i16, 2),
            Precision::U16 => num!(u16, 2),
            Precision::U8 => bytes[0] as f64,
        }
    }
}

/// Matrix type digit `T`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MatrixType {
    Full = 0,
    Text = 1,
    Sparse = 2,
}

impl MatrixType {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(MatrixType::Full),
            1 => Some(MatrixType::Text),
            2 => Some(MatrixType::Sparse),
            _ => None,
        }
    }

    /// Class reported to the pipelines
    pub fn class(self) -> NumericClass {
        match self {
            MatrixType::Full => NumericClass::Double,
            MatrixType::Text => NumericClass::Char,
            MatrixType::Sparse => NumericClass::Other("sparse".to_string()),
        }
    }

    /// Matrix type used to store a class
    pub fn for_class(class: &NumericClass) -> Option<Self> {
        match class {
            NumericClass::Double => Some(MatrixType::Full),
            NumericClass::Char => Some(MatrixType::Text),
            NumericClass::Other(_) => None,
        }
    }
}

/// Decoded record header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    pub byte_order: ByteOrder,
    pub precision: Precision,
    pub matrix_type: MatrixType,
    pub rows: usize,
    pub cols: usize,
    pub is_complex: bool,
    /// Name length including the terminating NUL
    pub name_len: usize,
}

impl RecordHeader {
    /// Header for a little-endian double-precision record
    pub fn new(matrix_type: MatrixType, rows: usize, cols: usize, name_len: usize) -> Self {
        RecordHeader {
            byte_order: ByteOrder::Little,
            precision: Precision::F64,
            matrix_type,
            rows,
            cols,
            is_complex: false,
            name_len,
        }
    }

    /// Bytes of the data section (real plus imaginary part)
    pub fn data_len(&self) -> Result<usize> {
        let parts = if self.is_complex { 2 } else { 1 };
        self.rows
            .checked_mul(self.cols)
            .and_then(|n| n.checked_mul(self.precision.size()))
            .and_then(|n| n.checked_mul(parts))
            .ok_or_else(|| {
                MatError::InvalidFormat(format!(
                    "{}x{} record size overflows",
                    self.rows, self.cols
                ))
            })
    }

    /// Serialize to the fixed 20-byte layout
    pub fn to_bytes(&self) -> Result<[u8; HEADER_SIZE]> {
        let to_i32 = |value: usize, what: &str| {
            i32::try_from(value).map_err(|_| {
                MatError::InvalidArgument(format!("{} {} exceeds the MAT v4 limit", what, value))
            })
        };

        let type_code = self.byte_order.digit() * 1000
            + (self.precision as i32) * 10
            + self.matrix_type as i32;

        let fields = [
            type_code,
            to_i32(self.rows, "row count")?,
            to_i32(self.cols, "column count")?,
            self.is_complex as i32,
            to_i32(self.name_len, "name length")?,
        ];

        let mut bytes = [0u8; HEADER_SIZE];
        for (chunk, value) in bytes.chunks_exact_mut(4).zip(fields) {
            chunk.copy_from_slice(&self.byte_order.write_i32(value));
        }
        Ok(bytes)
    }

    /// Parse a header, detecting the byte order from the type field
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(MatError::InvalidFormat(format!(
                "record header needs {} bytes, got {}",
                HEADER_SIZE,
                bytes.len()
            )));
        }

        let word = |i: usize| {
            let mut raw = [0u8; 4];
            raw.copy_from_slice(&bytes[i * 4..i * 4 + 4]);
            raw
        };

        let byte_order = [ByteOrder::Little, ByteOrder::Big]
            .into_iter()
            .find(|order| {
                let code = order.read_i32(word(0));
                (0..5000).contains(&code) && code / 1000 == order.digit()
            })
            .ok_or_else(|| {
                MatError::InvalidFormat(format!(
                    "unsupported type field {:02x?}",
                    word(0)
                ))
            })?;

        let type_code = byte_order.read_i32(word(0));
        let reserved = (type_code / 100) % 10;
        let precision_digit = ((type_code / 10) % 10) as u8;
        let type_digit = (type_code % 10) as u8;

        if reserved != 0 {
            return Err(MatError::InvalidFormat(format!(
                "reserved digit is {} in type {}",
                reserved, type_code
            )));
        }

        let precision = Precision::from_u8(precision_digit).ok_or_else(|| {
            MatError::InvalidFormat(format!("unknown precision {}", precision_digit))
        })?;

        let matrix_type = MatrixType::from_u8(type_digit).ok_or_else(|| {
            MatError::InvalidFormat(format!("unknown matrix type {}", type_digit))
        })?;

        let to_usize = |value: i32, what: &str| {
            usize::try_from(value)
                .map_err(|_| MatError::InvalidFormat(format!("negative {}: {}", what, value)))
        };

        let rows = to_usize(byte_order.read_i32(word(1)), "row count")?;
        let cols = to_usize(byte_order.read_i32(word(2)), "column count")?;
        let is_complex = match byte_order.read_i32(word(3)) {
            0 => false,
            1 => true,
            other => {
                return Err(MatError::InvalidFormat(format!(
                    "imaginary flag must be 0 or 1, got {}",
                    other
                )))
            }
        };
        let name_len = to_usize(byte_order.read_i32(word(4)), "name length")?;
        if name_len == 0 {
            return Err(MatError::InvalidFormat(
                "name length must include the terminating NUL".to_string(),
            ));
        }

        Ok(RecordHeader {
            byte_order,
            precision,
            matrix_type,
            rows,
            cols,
            is_complex,
            name_len,
        })
    }
}
