//! JSON-backed pattern store.
//!
//! The store is a single JSON object mapping pattern names to serialized
//! matrices (see [`crate::format`]). Entry order is preserved across saves;
//! new names are appended.
//!
//! Saving is a read-modify-write: the mapping is updated in memory and the
//! whole object is written to a temporary file next to the store, then renamed
//! over it, so an interrupted save never leaves a half-written store behind.

use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tempfile::NamedTempFile;

use crate::format::{Format, FormatError};
use crate::grid::Matrix;

/// Why a save was cancelled by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbortReason {
    /// The pattern had no set cells and the user declined to save it.
    EmptyPattern,
    /// The name was taken and the user chose not to resolve it.
    NameConflict(String),
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbortReason::EmptyPattern => write!(f, "empty pattern not saved"),
            AbortReason::NameConflict(name) => {
                write!(f, "pattern '{name}' already exists, nothing saved")
            }
        }
    }
}

/// Errors from loading or saving the store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store file is missing or cannot be read.
    #[error("cannot read pattern store {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file is not a JSON object.
    #[error("pattern store {} is corrupt: {detail}", path.display())]
    Malformed {
        path: PathBuf,
        detail: String,
        /// Line and column of a JSON syntax error, both 1-based.
        at: Option<(usize, usize)>,
    },

    /// Writing the updated store failed; the previous file is untouched.
    #[error("cannot write pattern store {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no pattern named '{0}' in the store")]
    PatternNotFound(String),

    #[error("pattern '{name}': {source}")]
    Format {
        name: String,
        #[source]
        source: FormatError,
    },

    /// The user cancelled the save. Not a failure.
    #[error("save aborted: {0}")]
    SaveAborted(AbortReason),
}

impl StoreError {
    /// `true` for user-directed cancellations, which end the session cleanly.
    pub fn is_abort(&self) -> bool {
        matches!(self, StoreError::SaveAborted(_))
    }
}

/// How to resolve saving under a name that already exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Overwrite,
    RenameTo(String),
    Abort,
}

/// Questions the store asks the user while saving.
pub trait SavePrompt {
    /// The pattern has no set cells: save it anyway?
    fn confirm_empty(&mut self) -> bool;

    /// `name` is already in the store: what now?
    fn resolve_conflict(&mut self, name: &str) -> Resolution;
}

#[derive(Debug, Clone)]
pub struct PatternStore {
    path: PathBuf,
    entries: Map<String, Value>,
}

impl PatternStore {
    /// Read and parse the store at `path`.
    ///
    /// A missing file is an error; see [`PatternStore::create`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let content = fs::read_to_string(&path).map_err(|source| StoreError::Unreadable {
            path: path.clone(),
            source,
        })?;
        let value: Value = serde_json::from_str(&content).map_err(|e| StoreError::Malformed {
            path: path.clone(),
            detail: e.to_string(),
            at: Some((e.line(), e.column())),
        })?;
        let Value::Object(entries) = value else {
            return Err(StoreError::Malformed {
                path,
                detail: "top level is not a JSON object".to_string(),
                at: None,
            });
        };
        log::debug!("loaded {} pattern(s) from {}", entries.len(), path.display());
        Ok(Self { path, entries })
    }

    /// Write an empty store at `path` unless a file already exists there,
    /// then load it.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if !path.exists() {
            let store = Self {
                path: path.to_path_buf(),
                entries: Map::new(),
            };
            store.write()?;
            log::debug!("created empty pattern store {}", path.display());
        }
        Self::load(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Raw serialized value of a pattern.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.get(name)
    }

    /// Decode the pattern `name`, detecting its format from its shape.
    pub fn pattern(&self, name: &str, width_hint: Option<usize>) -> Result<Matrix, StoreError> {
        let value = self
            .get(name)
            .ok_or_else(|| StoreError::PatternNotFound(name.to_string()))?;
        let format_err = |source| StoreError::Format {
            name: name.to_string(),
            source,
        };
        let format = Format::detect(value).ok_or_else(|| format_err(FormatError::NotRows))?;
        format.decode(value, width_hint).map_err(format_err)
    }

    /// Store `matrix` under `name` and write the store back to disk.
    ///
    /// Empty patterns and taken names go through `prompt`; declining either
    /// returns [`StoreError::SaveAborted`] and leaves the file untouched.
    /// Returns the name the pattern was actually saved under.
    pub fn save(
        &mut self,
        name: &str,
        matrix: &Matrix,
        format: Format,
        prompt: &mut dyn SavePrompt,
    ) -> Result<String, StoreError> {
        if matrix.is_empty() && !prompt.confirm_empty() {
            return Err(StoreError::SaveAborted(AbortReason::EmptyPattern));
        }

        let encoded = format.encode(matrix).map_err(|source| StoreError::Format {
            name: name.to_string(),
            source,
        })?;

        let target = self.resolve_name(name, prompt)?;
        let previous = self.entries.insert(target.clone(), encoded);

        if let Err(e) = self.write() {
            // Keep memory in step with the untouched file.
            match previous {
                Some(old) => {
                    self.entries.insert(target, old);
                }
                None => {
                    self.entries.shift_remove(&target);
                }
            }
            return Err(e);
        }
        log::debug!(
            "saved pattern '{target}' ({}x{}, {format}) to {}",
            matrix.width(),
            matrix.height(),
            self.path.display()
        );
        Ok(target)
    }

    fn resolve_name(&self, name: &str, prompt: &mut dyn SavePrompt) -> Result<String, StoreError> {
        let mut candidate = name.to_string();
        while self.contains(&candidate) {
            match prompt.resolve_conflict(&candidate) {
                Resolution::Overwrite => {
                    log::debug!("overwriting pattern '{candidate}'");
                    break;
                }
                Resolution::RenameTo(new_name) => {
                    log::debug!("renaming '{candidate}' to '{new_name}'");
                    candidate = new_name;
                }
                Resolution::Abort => {
                    return Err(StoreError::SaveAborted(AbortReason::NameConflict(candidate)));
                }
            }
        }
        Ok(candidate)
    }

    /// Serialize the mapping into a sibling temp file and rename it over the
    /// store.
    fn write(&self) -> Result<(), StoreError> {
        let write_err = |source| StoreError::Write {
            path: self.path.clone(),
            source,
        };
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };

        let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
        serde_json::to_writer(&mut tmp, &self.entries).map_err(|e| write_err(e.into()))?;
        tmp.flush().map_err(write_err)?;
        tmp.as_file().sync_all().map_err(write_err)?;
        // The temp file is created private; keep the store's own mode.
        if let Ok(meta) = fs::metadata(&self.path) {
            tmp.as_file().set_permissions(meta.permissions()).map_err(write_err)?;
        }
        tmp.persist(&self.path).map_err(|e| write_err(e.error))?;
        Ok(())
    }
}

/// Fresh read-modify-write of the store at `path`.
pub fn save(
    path: impl AsRef<Path>,
    name: &str,
    matrix: &Matrix,
    format: Format,
    prompt: &mut dyn SavePrompt,
) -> Result<String, StoreError> {
    let mut store = PatternStore::load(path)?;
    store.save(name, matrix, format, prompt)
}
