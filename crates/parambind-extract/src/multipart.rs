//! `multipart/form-data` bodies.
//!
//! Text parts become form values; parts with a `filename` become in-memory
//! [`FilePart`]s. The binder stages them to disk only when a handler asks
//! for a file handle.

use bytes::Bytes;
use parambind::FilePart;
use std::io;

use crate::{ExtractionError, ExtractionSource, LOG_TARGET};

/// Values and files read from a multipart body, in arrival order.
#[derive(Debug, Default)]
pub(crate) struct MultipartForm {
    pub values: Vec<(String, String)>,
    pub files: Vec<(String, FilePart)>,
}

impl MultipartForm {
    pub fn len(&self) -> usize {
        self.values.len() + self.files.len()
    }
}

/// Reads every part of a multipart body.
///
/// A missing boundary or a malformed part is logged and ends the read with
/// whatever was collected so far. More than `max_fields` parts is an error.
pub(crate) async fn read_multipart(
    content_type: &str,
    body: Bytes,
    max_fields: usize,
) -> Result<MultipartForm, ExtractionError> {
    let mut form = MultipartForm::default();

    let boundary = match multer::parse_boundary(content_type) {
        Ok(boundary) => boundary,
        Err(error) => {
            tracing::warn!(
                target: LOG_TARGET,
                error = %error,
                "skipping multipart body without a usable boundary"
            );
            return Ok(form);
        }
    };

    let stream = futures_util::stream::once(async move { Ok::<_, io::Error>(body) });
    let mut multipart = multer::Multipart::new(stream, boundary);

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(error) => {
                tracing::warn!(
                    target: LOG_TARGET,
                    error = %error,
                    "stopping at malformed multipart part"
                );
                break;
            }
        };

        if form.len() >= max_fields {
            return Err(ExtractionError::too_many_fields(
                ExtractionSource::Body,
                max_fields,
                form.len() + 1,
            ));
        }

        let Some(name) = field.name().map(str::to_string) else {
            tracing::debug!(target: LOG_TARGET, "skipping multipart part without a name");
            continue;
        };
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(ToString::to_string);

        let data = match field.bytes().await {
            Ok(data) => data,
            Err(error) => {
                tracing::warn!(
                    target: LOG_TARGET,
                    param = %name,
                    error = %error,
                    "stopping at unreadable multipart part"
                );
                break;
            }
        };

        match file_name {
            Some(file_name) => {
                let mut part = FilePart::from_bytes(data).with_file_name(file_name);
                if let Some(content_type) = content_type {
                    part = part.with_content_type(content_type);
                }
                form.files.push((name, part));
            }
            None => {
                let value = String::from_utf8_lossy(&data).into_owned();
                form.values.push((name, value));
            }
        }
    }

    Ok(form)
}
