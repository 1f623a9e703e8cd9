//! File and stream handles produced by the upload codecs.

use std::fmt;
use std::fs::File;
use std::io::{self, Cursor, Read, Seek, SeekFrom};

use bytes::Bytes;

use crate::{Bindable, Kind, Shape, TypeDesc, Value};

/// A readable, seekable byte stream.
pub trait ReadSeek: Read + Seek + Send {}

impl<T: Read + Seek + Send> ReadSeek for T {}

/// Stream opened from an uploaded part.
#[derive(Debug)]
pub enum FileStream {
    /// Part held in memory.
    Memory(Cursor<Bytes>),
    /// Part already backed by a file on disk.
    Disk(File),
}

impl Read for FileStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Self::Memory(cursor) => cursor.read(buf),
            Self::Disk(file) => file.read(buf),
        }
    }
}

impl Seek for FileStream {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match self {
            Self::Memory(cursor) => cursor.seek(pos),
            Self::Disk(file) => file.seek(pos),
        }
    }
}

/// An uploaded file bound to an open handle.
///
/// Disk-backed uploads are opened in place; in-memory uploads are staged to
/// a temporary file owned by the [`ParameterSet`](crate::ParameterSet) and
/// removed by its purge. The zero value holds no handle.
#[derive(Debug, Default)]
pub struct BoundFile(pub Option<File>);

impl BoundFile {
    /// Returns the handle, if the upload could be bound.
    #[must_use]
    pub fn file(&self) -> Option<&File> {
        self.0.as_ref()
    }

    /// Consumes the binding and returns the handle.
    #[must_use]
    pub fn into_inner(self) -> Option<File> {
        self.0
    }

    /// Returns true when no upload was bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }
}

impl Bindable for BoundFile {
    fn describe() -> TypeDesc {
        TypeDesc::new::<Self>(Kind::Opaque, Shape::Opaque)
    }

    fn from_value(value: Value) -> Self {
        match value {
            Value::File(file) => Self(Some(file)),
            _ => Self(None),
        }
    }

    fn to_value(&self) -> Value {
        self.0
            .as_ref()
            .and_then(|file| file.try_clone().ok())
            .map_or(Value::Nil, Value::File)
    }

    fn zero() -> Self {
        Self(None)
    }
}

/// An uploaded file bound to its raw stream.
#[derive(Default)]
pub struct BoundReader(pub Option<Box<dyn ReadSeek>>);

impl BoundReader {
    /// Consumes the binding and returns the stream.
    #[must_use]
    pub fn into_inner(self) -> Option<Box<dyn ReadSeek>> {
        self.0
    }

    /// Returns true when no upload was bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    /// Reads the remaining stream into memory.
    pub fn read_all(&mut self) -> io::Result<Vec<u8>> {
        let mut buf = Vec::new();
        if let Some(reader) = self.0.as_mut() {
            reader.read_to_end(&mut buf)?;
        }
        Ok(buf)
    }
}

impl fmt::Debug for BoundReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BoundReader")
            .field(&self.0.as_ref().map(|_| ".."))
            .finish()
    }
}

impl Bindable for BoundReader {
    fn describe() -> TypeDesc {
        TypeDesc::new::<Self>(Kind::Opaque, Shape::Opaque)
    }

    fn from_value(value: Value) -> Self {
        match value {
            Value::Reader(reader) => Self(Some(reader)),
            Value::File(file) => Self(Some(Box::new(file))),
            _ => Self(None),
        }
    }

    // Streams are consumed on read and cannot be duplicated.
    fn to_value(&self) -> Value {
        Value::Nil
    }

    fn zero() -> Self {
        Self(None)
    }
}
