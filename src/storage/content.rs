//! Published class content and its JSON persistence
//!
//! The whole document is loaded once at startup, mutated in memory by admin
//! commits and written back in full after every commit. The on-disk key names
//! (`gdz`, `dz`, `tema`, `test_date`) are kept so an existing `data.json`
//! keeps working.

use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};

use crate::core::error::StorageError;

/// Placeholder shown for homework and topic until the admin sets them.
pub const NOT_SET_YET: &str = "Пока нет";

fn not_set_yet() -> String {
    NOT_SET_YET.to_string()
}

fn null_as_not_set<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(not_set_yet))
}

/// Scanned answer key: a Telegram file id plus an optional caption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerKey {
    #[serde(rename = "photo")]
    pub image_ref: String,
    /// Empty when the admin skipped the caption.
    #[serde(rename = "text", default)]
    pub caption: String,
}

/// Everything students can read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentDocument {
    #[serde(rename = "gdz")]
    pub answer_key: Option<AnswerKey>,
    #[serde(rename = "dz", deserialize_with = "null_as_not_set")]
    pub homework: String,
    #[serde(rename = "tema", deserialize_with = "null_as_not_set")]
    pub last_topic: String,
    pub test_date: Option<String>,
}

impl Default for ContentDocument {
    fn default() -> Self {
        Self {
            answer_key: None,
            homework: not_set_yet(),
            last_topic: not_set_yet(),
            test_date: None,
        }
    }
}

/// The single process-wide content document together with its file.
#[derive(Debug)]
pub struct ContentStore {
    path: PathBuf,
    doc: ContentDocument,
}

impl ContentStore {
    /// Loads the document from `path`.
    ///
    /// Never fails: a missing or unreadable file yields the defaults, which
    /// are indistinguishable from "nothing published yet".
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let doc = match read_document(&path) {
            Ok(doc) => {
                log::info!("Loaded content from {}", path.display());
                doc
            }
            Err(StorageError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No content file at {}, starting with defaults", path.display());
                ContentDocument::default()
            }
            Err(e) => {
                log::warn!("Ignoring unreadable content file {}: {}", path.display(), e);
                ContentDocument::default()
            }
        };
        Self { path, doc }
    }

    /// Writes the full in-memory document, replacing the previous file.
    ///
    /// The document goes to a sibling temp file first and is renamed over the
    /// target, so readers never observe a half-written file.
    pub fn save(&self) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(&self.doc)?;
        let tmp_path = temp_path_for(&self.path);
        fs_err::write(&tmp_path, json)?;
        fs_err::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    /// Applies `mutate` to the in-memory document and persists the result.
    ///
    /// The in-memory change stays applied even if the save fails.
    pub fn commit<F>(&mut self, mutate: F) -> Result<(), StorageError>
    where
        F: FnOnce(&mut ContentDocument),
    {
        mutate(&mut self.doc);
        self.save()
    }

    pub fn document(&self) -> &ContentDocument {
        &self.doc
    }

    pub fn answer_key(&self) -> Option<&AnswerKey> {
        self.doc.answer_key.as_ref()
    }

    pub fn homework(&self) -> &str {
        &self.doc.homework
    }

    pub fn last_topic(&self) -> &str {
        &self.doc.last_topic
    }

    pub fn test_date(&self) -> Option<&str> {
        self.doc.test_date.as_deref()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn read_document(path: &Path) -> Result<ContentDocument, StorageError> {
    let raw = fs_err::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
