//! The flat parameter model consumed by the binder.

use std::fs::File;
use std::io::{self, Cursor};
use std::path::PathBuf;

use bytes::Bytes;
use indexmap::IndexMap;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;

use crate::{BindError, BindResult, FileStream};

/// Where an uploaded part's content lives.
#[derive(Debug, Clone)]
pub enum FileSource {
    /// Buffered in memory.
    Memory(Bytes),
    /// Already written to disk.
    Disk(PathBuf),
}

/// An uploaded file under a parameter key.
#[derive(Debug, Clone)]
pub struct FilePart {
    file_name: Option<String>,
    content_type: Option<String>,
    source: FileSource,
}

impl FilePart {
    /// Creates an in-memory part.
    pub fn from_bytes(data: impl Into<Bytes>) -> Self {
        Self {
            file_name: None,
            content_type: None,
            source: FileSource::Memory(data.into()),
        }
    }

    /// Creates a part backed by a file on disk.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned());
        Self {
            file_name,
            content_type: None,
            source: FileSource::Disk(path),
        }
    }

    /// Sets the client-supplied file name.
    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }

    /// Sets the declared content type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Client-supplied file name.
    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// Declared content type.
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Content location.
    pub fn source(&self) -> &FileSource {
        &self.source
    }

    /// Opens a fresh stream over the part's content.
    pub fn open(&self) -> io::Result<FileStream> {
        match &self.source {
            FileSource::Memory(bytes) => Ok(FileStream::Memory(Cursor::new(bytes.clone()))),
            FileSource::Disk(path) => File::open(path).map(FileStream::Disk),
        }
    }
}

/// Outcome of [`ParameterSet::purge`].
#[derive(Debug, Default)]
pub struct PurgeReport {
    /// Temporary files removed from disk.
    pub removed: Vec<PathBuf>,
    /// Files that could not be removed.
    pub failures: Vec<(PathBuf, io::Error)>,
}

impl PurgeReport {
    /// Returns true when every staged file was removed.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Flat key/value view of inbound request data.
///
/// Keys keep their arrival order, which fixes the order of unindexed slice
/// elements. Temporary files staged while decoding are recorded here and
/// stay on disk until [`purge`](Self::purge) is called.
///
/// # Example
///
/// ```rust
/// use parambind::ParameterSet;
///
/// let params: ParameterSet = [("ul[]", "str"), ("ul[]", "array")].into_iter().collect();
/// assert_eq!(params.get("ul[]").unwrap(), ["str", "array"]);
/// ```
#[derive(Debug, Default)]
pub struct ParameterSet {
    values: IndexMap<String, Vec<String>>,
    files: IndexMap<String, Vec<FilePart>>,
    json: Option<Bytes>,
    temp_files: Mutex<Vec<PathBuf>>,
}

impl ParameterSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A set holding a single value under the empty key.
    pub(crate) fn direct_value(raw: &str) -> Self {
        let mut params = Self::new();
        params.add(String::new(), raw);
        params
    }

    /// A set holding a single upload under the empty key.
    pub(crate) fn direct_file(part: &FilePart) -> Self {
        let mut params = Self::new();
        params.add_file(String::new(), part.clone());
        params
    }

    /// Appends a value to a key.
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.entry(key.into()).or_default().push(value.into());
    }

    /// Replaces every value of a key.
    pub fn set(&mut self, key: impl Into<String>, values: Vec<String>) {
        self.values.insert(key.into(), values);
    }

    /// Appends an uploaded part to a key.
    pub fn add_file(&mut self, key: impl Into<String>, part: FilePart) {
        self.files.entry(key.into()).or_default().push(part);
    }

    /// All values of a key.
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.values.get(key).map(Vec::as_slice)
    }

    /// First value of a key.
    pub fn first(&self, key: &str) -> Option<&str> {
        self.values.get(key)?.first().map(String::as_str)
    }

    /// All uploaded parts of a key.
    pub fn files_for(&self, key: &str) -> &[FilePart] {
        self.files.get(key).map_or(&[], Vec::as_slice)
    }

    /// Returns true if the key has values or files.
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key) || self.files.contains_key(key)
    }

    /// Value keys and their values, in arrival order.
    pub fn values(&self) -> &IndexMap<String, Vec<String>> {
        &self.values
    }

    /// File keys and their parts, in arrival order.
    pub fn files(&self) -> &IndexMap<String, Vec<FilePart>> {
        &self.files
    }

    /// Returns true if there are no values and no files.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.files.is_empty()
    }

    /// Keeps a raw JSON body.
    pub fn set_json(&mut self, body: impl Into<Bytes>) {
        self.json = Some(body.into());
    }

    /// The raw JSON body, if the request carried one.
    pub fn json(&self) -> Option<&[u8]> {
        self.json.as_deref()
    }

    /// Decodes the JSON body into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`BindError::MissingJson`] if there is no body and
    /// [`BindError::Json`] if it does not decode.
    pub fn bind_json<T: DeserializeOwned>(&self) -> BindResult<T> {
        let body = self.json.as_deref().ok_or(BindError::MissingJson)?;
        Ok(serde_json::from_slice(body)?)
    }

    /// Records a temporary file for removal on purge.
    pub fn register_temp_file(&self, path: impl Into<PathBuf>) {
        self.temp_files.lock().push(path.into());
    }

    /// Paths of the staged temporary files.
    pub fn temp_files(&self) -> Vec<PathBuf> {
        self.temp_files.lock().clone()
    }

    /// Takes over the temporary files staged in `other`.
    pub fn adopt_temp_files(&self, other: &Self) {
        let adopted = std::mem::take(&mut *other.temp_files.lock());
        if !adopted.is_empty() {
            self.temp_files.lock().extend(adopted);
        }
    }

    /// Removes every staged temporary file.
    ///
    /// Failures are logged and collected; removal continues with the next
    /// file. The staged list is emptied either way, so a second purge is a
    /// no-op.
    pub fn purge(&self) -> PurgeReport {
        let staged = std::mem::take(&mut *self.temp_files.lock());
        let mut report = PurgeReport::default();

        for path in staged {
            match std::fs::remove_file(&path) {
                Ok(()) => report.removed.push(path),
                Err(error) => {
                    tracing::warn!(
                        target: "parambind::params",
                        path = %path.display(),
                        error = %error,
                        "failed to remove temporary file"
                    );
                    report.failures.push((path, error));
                }
            }
        }

        if !report.removed.is_empty() {
            tracing::debug!(
                target: "parambind::params",
                removed = report.removed.len(),
                "purged temporary files"
            );
        }
        report
    }
}

impl<K, V> FromIterator<(K, V)> for ParameterSet
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        params.extend(iter);
        params
    }
}

impl<K, V> Extend<(K, V)> for ParameterSet
where
    K: Into<String>,
    V: Into<String>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.add(key, value);
        }
    }
}
