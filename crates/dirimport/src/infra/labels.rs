//! Lookup keys for user-facing text and their built-in defaults.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Every piece of form text that can be overridden from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelKey {
    EnterDir,
    AddDir,
    Next,
    EmptyDir,
    WarningDirPath,
    RemoveDirectory,
}

impl LabelKey {
    pub const ALL: [LabelKey; 6] = [
        LabelKey::EnterDir,
        LabelKey::AddDir,
        LabelKey::Next,
        LabelKey::EmptyDir,
        LabelKey::WarningDirPath,
        LabelKey::RemoveDirectory,
    ];

    /// Lookup key as used in the `[labels]` config table.
    pub fn key(self) -> &'static str {
        match self {
            LabelKey::EnterDir => "files-import/enter-dir",
            LabelKey::AddDir => "files-import/add-dir",
            LabelKey::Next => "files-import/next",
            LabelKey::EmptyDir => "files-import/empty-dir",
            LabelKey::WarningDirPath => "files-import/warning-dir-path",
            LabelKey::RemoveDirectory => "files-import/remove-directory",
        }
    }

    fn fallback(self) -> &'static str {
        match self {
            LabelKey::EnterDir => "Enter one or more directories to import",
            LabelKey::AddDir => "Add another directory",
            LabelKey::Next => "Next »",
            LabelKey::EmptyDir => "No directory was specified.",
            LabelKey::WarningDirPath => "Please enter the path of at least one directory.",
            LabelKey::RemoveDirectory => "Remove this directory",
        }
    }
}

/// Label table keyed by lookup key. Missing keys resolve to built-in text.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Labels {
    entries: BTreeMap<String, String>,
}

impl Labels {
    pub fn get(&self, key: LabelKey) -> &str {
        self.entries
            .get(key.key())
            .map(String::as_str)
            .unwrap_or_else(|| key.fallback())
    }

    pub fn set<S: Into<String>>(&mut self, key: LabelKey, text: S) {
        self.entries.insert(key.key().to_owned(), text.into());
    }

    /// Overlay entries replace base entries with the same key.
    pub fn merge(mut self, overlay: Labels) -> Labels {
        self.entries.extend(overlay.entries);
        self
    }

    /// Message shown when a submission has no usable directories: the
    /// instruction first, then what went wrong.
    pub fn empty_directory_warning(&self) -> String {
        format!(
            "{}\n{}",
            self.get(LabelKey::WarningDirPath),
            self.get(LabelKey::EmptyDir)
        )
    }
}
