//! Disk I/O for level-4 MAT-files
//!
//! A level-4 file is nothing but a sequence of records (see
//! [`header`](crate::header)); there is no file header and no index. Opening
//! scans the whole file once and keeps the record table for the lifetime of
//! the [`Mat4File`].

use crate::container::{Backend, Compression, Container, OpenMode};
use crate::error::{MatError, Result};
use crate::header::{MatrixType, RecordHeader, HEADER_SIZE};
use crate::variable::{Precision, VariableDescriptor};
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Location of one record inside the file
#[derive(Debug, Clone)]
struct Record {
    header: RecordHeader,
    descriptor: VariableDescriptor,
    /// Offset of the record header
    offset: u64,
    /// Offset of the data section
    data_offset: u64,
    /// Total record size including header and name
    len: u64,
}

/// Backend producing [`Mat4File`] containers
#[derive(Debug, Clone, Copy, Default)]
pub struct Mat4Backend;

impl Backend for Mat4Backend {
    type Container = Mat4File;

    fn open(&self, path: &Path, mode: OpenMode) -> Result<Mat4File> {
        Mat4File::open(path, mode)
    }

    fn create(&self, path: &Path) -> Result<Mat4File> {
        Mat4File::create(path)
    }
}

/// Disk-backed level-4 MAT-file
pub struct Mat4File {
    file: File,
    path: PathBuf,
    records: Vec<Record>,
}

impl Mat4File {
    /// Create an empty file, truncating any existing one
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .map_err(|source| MatError::Open {
                path: path.to_path_buf(),
                source,
            })?;

        debug!("Created MAT-file {:?}", path);
        Ok(Mat4File {
            file,
            path: path.to_path_buf(),
            records: Vec::new(),
        })
    }

    /// Open an existing file and index its records
    pub fn open<P: AsRef<Path>>(path: P, mode: OpenMode) -> Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .read(true)
            .write(mode == OpenMode::ReadWrite)
            .open(path)
            .map_err(|source| MatError::Open {
                path: path.to_path_buf(),
                source,
            })?;

        let mut mat = Mat4File {
            file,
            path: path.to_path_buf(),
            records: Vec::new(),
        };
        mat.scan()?;

        debug!(
            "Opened MAT-file {:?} ({:?}, {} variables)",
            path,
            mode,
            mat.records.len()
        );
        Ok(mat)
    }

    fn io_context(&self, what: &str) -> String {
        format!("Cannot {} \"{}\"", what, self.path.display())
    }

    /// Rebuild the record table from the file contents
    fn scan(&mut self) -> Result<()> {
        let file_len = self
            .file
            .metadata()
            .map_err(|e| MatError::io(self.io_context("stat"), e))?
            .len();

        self.records.clear();
        let mut offset = 0u64;

        while offset < file_len {
            if file_len - offset < HEADER_SIZE as u64 {
                return Err(MatError::InvalidFormat(format!(
                    "truncated record header at offset {} in \"{}\"",
                    offset,
                    self.path.display()
                )));
            }

            let mut raw = [0u8; HEADER_SIZE];
            self.read_at(offset, &mut raw)?;
            let header = RecordHeader::from_bytes(&raw)?;

            let name_offset = offset + HEADER_SIZE as u64;
            let data_offset = name_offset + header.name_len as u64;
            let end = data_offset + header.data_len()? as u64;
            if end > file_len {
                return Err(MatError::InvalidFormat(format!(
                    "record at offset {} extends past the end of \"{}\"",
                    offset,
                    self.path.display()
                )));
            }

            let mut name = vec![0u8; header.name_len];
            self.read_at(name_offset, &mut name)?;
            let name_end = name.iter().position(|&b| b == 0).unwrap_or(name.len());
            name.truncate(name_end);
            let name = String::from_utf8(name).map_err(|_| {
                MatError::InvalidFormat(format!("variable name at offset {} is not UTF-8", offset))
            })?;

            let descriptor = VariableDescriptor {
                name,
                dims: vec![header.rows, header.cols],
                class: header.matrix_type.class(),
                is_complex: header.is_complex,
                precision: header.precision,
            };

            self.records.push(Record {
                header,
                descriptor,
                offset,
                data_offset,
                len: end - offset,
            });
            offset = end;
        }

        Ok(())
    }

    fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<()> {
        let context = self.io_context("read");
        self.file
            .seek(SeekFrom::Start(offset))
            .and_then(|_| self.file.read_exact(buf))
            .map_err(|e| MatError::io(context, e))
    }

    fn find(&self, name: &str) -> Option<&Record> {
        self.records.iter().find(|r| r.descriptor.name == name)
    }
}

impl Container for Mat4File {
    fn path(&self) -> &Path {
        &self.path
    }

    fn variables(&mut self) -> Result<Vec<VariableDescriptor>> {
        Ok(self.records.iter().map(|r| r.descriptor.clone()).collect())
    }

    fn var_info(&mut self, name: &str) -> Result<Option<VariableDescriptor>> {
        Ok(self.find(name).map(|r| r.descriptor.clone()))
    }

    fn read_data(&mut self, var: &VariableDescriptor, out: &mut [f64]) -> Result<()> {
        let record = self
            .find(&var.name)
            .cloned()
            .ok_or_else(|| MatError::NotFound {
                name: var.name.clone(),
                path: self.path.clone(),
            })?;

        let count = record.header.rows * record.header.cols;
        if out.len() != count {
            return Err(MatError::InvalidArgument(format!(
                "buffer holds {} elements, \"{}\" has {}",
                out.len(),
                var.name,
                count
            )));
        }

        let size = record.header.precision.size();
        let mut raw = Vec::new();
        raw.try_reserve_exact(count * size)?;
        raw.resize(count * size, 0u8);
        self.read_at(record.data_offset, &mut raw)?;

        let order = record.header.byte_order;
        for (dst, chunk) in out.iter_mut().zip(raw.chunks_exact(size)) {
            *dst = order.decode(record.header.precision, chunk);
        }
        Ok(())
    }

    fn delete(&mut self, name: &str) -> Result<bool> {
        let Some(record) = self.find(name).cloned() else {
            return Ok(false);
        };

        let file_len = self
            .file
            .metadata()
            .map_err(|e| MatError::io(self.io_context("stat"), e))?
            .len();
        let tail_start = record.offset + record.len;
        let mut tail = vec![0u8; (file_len - tail_start) as usize];
        self.read_at(tail_start, &mut tail)?;

        let context = self.io_context("rewrite");
        self.file
            .seek(SeekFrom::Start(record.offset))
            .and_then(|_| self.file.write_all(&tail))
            .and_then(|_| self.file.set_len(record.offset + tail.len() as u64))
            .and_then(|_| self.file.flush())
            .map_err(|e| MatError::io(context, e))?;

        debug!("Deleted variable \"{}\" from {:?}", name, self.path);
        self.scan()?;
        Ok(true)
    }

    fn write(
        &mut self,
        var: &VariableDescriptor,
        data: &[f64],
        compression: Compression,
    ) -> Result<()> {
        let (rows, cols) = var.shape().ok_or_else(|| MatError::WrongRank {
            name: var.name.clone(),
            path: self.path.clone(),
            rank: var.rank(),
        })?;
        let matrix_type = MatrixType::for_class(&var.class).ok_or_else(|| {
            MatError::InvalidArgument(format!(
                "MAT v4 cannot store {} arrays",
                var.class
            ))
        })?;
        if var.is_complex {
            return Err(MatError::ComplexNotSupported {
                name: var.name.clone(),
                path: self.path.clone(),
            });
        }
        if data.len() != rows * cols {
            return Err(MatError::InvalidArgument(format!(
                "{} elements given for {}x{} variable \"{}\"",
                data.len(),
                rows,
                cols,
                var.name
            )));
        }
        if compression != Compression::None {
            debug!("MAT v4 has no compressed records; storing \"{}\" uncompressed", var.name);
        }

        let header = RecordHeader::new(matrix_type, rows, cols, var.name.len() + 1);
        let total = HEADER_SIZE + header.name_len + data.len() * Precision::F64.size();
        let mut bytes = Vec::new();
        bytes.try_reserve_exact(total)?;
        bytes.extend_from_slice(&header.to_bytes()?);
        bytes.extend_from_slice(var.name.as_bytes());
        bytes.push(0);
        for value in data {
            bytes.extend_from_slice(&value.to_le_bytes());
        }

        let offset = self.records.last().map(|r| r.offset + r.len).unwrap_or(0);
        let context = self.io_context("write to");
        self.file
            .seek(SeekFrom::Start(offset))
            .and_then(|_| self.file.write_all(&bytes))
            .and_then(|_| self.file.flush())
            .map_err(|e| MatError::io(context, e))?;

        debug!(
            "Wrote {}x{} variable \"{}\" to {:?} at offset {}",
            rows, cols, var.name, self.path, offset
        );

        self.records.push(Record {
            header,
            descriptor: VariableDescriptor {
                name: var.name.clone(),
                dims: vec![rows, cols],
                class: matrix_type.class(),
                is_complex: false,
                precision: Precision::F64,
            },
            offset,
            data_offset: offset + (HEADER_SIZE + header.name_len) as u64,
            len: bytes.len() as u64,
        });
        Ok(())
    }
}
