//! Codecs binding multipart uploads to byte buffers, files and streams.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};

use crate::binder::DecodeContext;
use crate::codec::Codec;
use crate::{BindError, BindResult, FileStream, TypeDesc, Value};

/// Reads the first openable upload fully into memory.
#[derive(Debug, Clone, Copy, Default)]
pub struct BytesCodec;

impl Codec for BytesCodec {
    fn decode(&self, cx: &DecodeContext<'_>, name: &str, ty: &TypeDesc) -> BindResult<Value> {
        let Some(mut stream) = open_first(cx, name)? else {
            return Ok(ty.zero());
        };
        let mut buf = Vec::new();
        stream
            .read_to_end(&mut buf)
            .map_err(|e| BindError::FileOpen {
                name: name.to_string(),
                source: Some(e),
            })?;
        Ok(Value::Bytes(buf.into()))
    }
}

/// Binds the first openable upload to an open file handle.
///
/// Disk-backed uploads are opened in place. In-memory uploads are copied to
/// a temporary file that is registered with the parameter set before the
/// copy starts, so a failed copy still leaves the file for purge.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileCodec;

impl Codec for FileCodec {
    fn decode(&self, cx: &DecodeContext<'_>, name: &str, ty: &TypeDesc) -> BindResult<Value> {
        match open_first(cx, name)? {
            None => Ok(ty.zero()),
            Some(FileStream::Disk(file)) => Ok(Value::File(file)),
            Some(FileStream::Memory(mut cursor)) => {
                let file = stage(cx, &mut cursor).map_err(|source| BindError::FileCopy {
                    name: name.to_string(),
                    source,
                })?;
                Ok(Value::File(file))
            }
        }
    }
}

/// Hands out the first openable upload's stream.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReaderCodec;

impl Codec for ReaderCodec {
    fn decode(&self, cx: &DecodeContext<'_>, name: &str, ty: &TypeDesc) -> BindResult<Value> {
        Ok(open_first(cx, name)?.map_or_else(|| ty.zero(), |stream| Value::Reader(Box::new(stream))))
    }
}

/// Opens the first part under `name` that opens.
///
/// `Ok(None)` means there is no upload under the key at all.
fn open_first(cx: &DecodeContext<'_>, name: &str) -> BindResult<Option<FileStream>> {
    let parts = cx.params().files_for(name);
    if parts.is_empty() {
        return Ok(None);
    }

    let mut last_error = None;
    for part in parts {
        match part.open() {
            Ok(stream) => return Ok(Some(stream)),
            Err(error) => {
                tracing::debug!(
                    target: crate::binder::LOG_TARGET,
                    param = name,
                    file_name = part.file_name().unwrap_or_default(),
                    error = %error,
                    "failed to open uploaded file"
                );
                last_error = Some(error);
            }
        }
    }

    Err(BindError::FileOpen {
        name: name.to_string(),
        source: last_error,
    })
}

fn stage(cx: &DecodeContext<'_>, reader: &mut impl Read) -> io::Result<File> {
    let options = cx.options();
    let mut builder = tempfile::Builder::new();
    builder.prefix(&options.temp_prefix);
    let named = match &options.temp_dir {
        Some(dir) => builder.tempfile_in(dir)?,
        None => builder.tempfile()?,
    };

    let (mut file, path) = named.into_parts();
    let path = path.keep().map_err(|e| e.error)?;
    cx.params().register_temp_file(path);

    io::copy(reader, &mut file)?;
    file.seek(SeekFrom::Start(0))?;
    Ok(file)
}
