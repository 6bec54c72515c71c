//! Domain models for directory entries and import requests.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::domain::errors::{RequestParseError, SubmitError};

/// Stable identity of a row in the directory list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(u64);

impl EntryId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

/// One user-supplied candidate path, together with its edit cursor.
///
/// The path is kept exactly as typed. Trimming happens only when a request is
/// built from a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    id: EntryId,
    path: String,
    /// Byte index into `path`, always on a UTF-8 boundary.
    cursor: usize,
}

impl DirectoryEntry {
    pub(crate) fn new(id: EntryId) -> Self {
        Self {
            id,
            path: String::new(),
            cursor: 0,
        }
    }

    pub fn id(&self) -> EntryId {
        self.id
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Whether the value would be dropped at submission time.
    pub fn is_blank(&self) -> bool {
        self.path.trim().is_empty()
    }

    /// Replace the value and park the cursor at its end.
    pub fn set_path<S: Into<String>>(&mut self, path: S) {
        self.path = path.into();
        self.cursor = self.path.len();
    }

    pub fn insert_char(&mut self, ch: char) {
        self.path.insert(self.cursor, ch);
        self.cursor += ch.len_utf8();
    }

    /// Delete the character before the cursor.
    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let prev = self.path[..self.cursor]
            .chars()
            .last()
            .map(char::len_utf8)
            .unwrap_or(1);
        let start = self.cursor - prev;
        self.path.drain(start..self.cursor);
        self.cursor = start;
    }

    /// Delete the character under the cursor.
    pub fn delete(&mut self) {
        if let Some(next) = self.path[self.cursor..].chars().next() {
            let end = self.cursor + next.len_utf8();
            self.path.drain(self.cursor..end);
        }
    }

    pub fn move_left(&mut self) {
        if let Some(prev) = self.path[..self.cursor].chars().last() {
            self.cursor -= prev.len_utf8();
        }
    }

    pub fn move_right(&mut self) {
        if let Some(next) = self.path[self.cursor..].chars().next() {
            self.cursor += next.len_utf8();
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.path.len();
    }

    /// Number of characters before the cursor, used to place the terminal cursor.
    pub fn cursor_column(&self) -> usize {
        self.path[..self.cursor].chars().count()
    }
}

/// The validated document handed to the importing controller.
///
/// A request always carries at least one directory, each trimmed and
/// non-empty, in the order the rows were displayed. Duplicates are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryRequest {
    directories: Vec<String>,
}

impl DirectoryRequest {
    /// Build a request from raw row values, trimming each one and dropping blanks.
    pub fn from_raw<I, S>(values: I) -> Result<Self, SubmitError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let directories: Vec<String> = values
            .into_iter()
            .filter_map(|value| {
                let trimmed = value.as_ref().trim();
                (!trimmed.is_empty()).then(|| trimmed.to_owned())
            })
            .collect();

        if directories.is_empty() {
            return Err(SubmitError::EmptyDirectoryList);
        }
        Ok(Self { directories })
    }

    pub fn directories(&self) -> &[String] {
        &self.directories
    }

    pub fn len(&self) -> usize {
        self.directories.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.directories.is_empty()
    }

    pub fn into_directories(self) -> Vec<String> {
        self.directories
    }
}

#[derive(Serialize)]
struct RequestDocumentRef<'a> {
    #[serde(rename = "directoryJsonObj")]
    directory_json_obj: Vec<DirectoryItemRef<'a>>,
}

#[derive(Serialize)]
struct DirectoryItemRef<'a> {
    directory: &'a str,
}

#[derive(Deserialize)]
struct RequestDocument {
    #[serde(rename = "directoryJsonObj")]
    directory_json_obj: Vec<DirectoryItem>,
}

#[derive(Deserialize)]
struct DirectoryItem {
    directory: String,
}

impl Serialize for DirectoryRequest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        RequestDocumentRef {
            directory_json_obj: self
                .directories
                .iter()
                .map(|directory| DirectoryItemRef { directory })
                .collect(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for DirectoryRequest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let document = RequestDocument::deserialize(deserializer)?;
        DirectoryRequest::from_document(document).map_err(serde::de::Error::custom)
    }
}

impl DirectoryRequest {
    fn from_document(document: RequestDocument) -> Result<Self, RequestParseError> {
        if document.directory_json_obj.is_empty() {
            return Err(RequestParseError::Empty);
        }

        let mut directories = Vec::with_capacity(document.directory_json_obj.len());
        for (index, item) in document.directory_json_obj.into_iter().enumerate() {
            if item.directory.trim().is_empty() {
                return Err(RequestParseError::BlankDirectory { index });
            }
            if item.directory.trim() != item.directory {
                return Err(RequestParseError::UntrimmedDirectory { index });
            }
            directories.push(item.directory);
        }
        Ok(Self { directories })
    }
}
