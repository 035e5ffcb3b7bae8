//! Checkpoint files: each checkpoint table as `{stem}_{checkpoint}.csv`
//! and `.json`, plus the JSON loading shared by the keyword and reference
//! files.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::{ExportError, ExportResult, LoadError, LoadResult};
use crate::types::table::{Checkpoint, Table};

/// Extensions every checkpoint is written under.
pub const FORMATS: [&str; 2] = ["csv", "json"];

/// One expected checkpoint file and what is on disk for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckpointFile {
    pub checkpoint: Checkpoint,
    pub filename: String,
    pub exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
}

/// Checkpoint tables under one directory, named by a portal's stem.
#[derive(Debug, Clone)]
pub struct CheckpointStore {
    dir: PathBuf,
    stem: String,
}

impl CheckpointStore {
    pub fn new(dir: impl Into<PathBuf>, stem: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            stem: stem.into(),
        }
    }

    fn file_name(&self, checkpoint: Checkpoint, extension: &str) -> String {
        format!("{}_{}.{}", self.stem, checkpoint, extension)
    }

    pub fn path(&self, checkpoint: Checkpoint, extension: &str) -> PathBuf {
        self.dir.join(self.file_name(checkpoint, extension))
    }

    /// Write both formats, returning the paths written.
    pub fn write(&self, checkpoint: Checkpoint, table: &Table) -> ExportResult<Vec<PathBuf>> {
        fs::create_dir_all(&self.dir).map_err(|source| io_error(&self.dir, source))?;

        let csv_path = self.path(checkpoint, "csv");
        let file = fs::File::create(&csv_path).map_err(|source| io_error(&csv_path, source))?;
        table.write_csv(file)?;

        let json_path = self.path(checkpoint, "json");
        fs::write(&json_path, table.to_json_string()?)
            .map_err(|source| io_error(&json_path, source))?;

        debug!(
            checkpoint = %checkpoint,
            rows = table.len(),
            csv = %csv_path.display(),
            "Checkpoint written"
        );
        Ok(vec![csv_path, json_path])
    }

    /// Read a checkpoint back from its CSV file. `None` when the file
    /// does not exist.
    pub fn read(&self, checkpoint: Checkpoint) -> LoadResult<Option<Table>> {
        let path = self.path(checkpoint, "csv");
        let file = match fs::File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(LoadError::Io {
                    path: path.display().to_string(),
                    source,
                })
            }
        };

        let table = Table::read_csv(file).map_err(|source| LoadError::Csv {
            path: path.display().to_string(),
            source,
        })?;
        debug!(checkpoint = %checkpoint, rows = table.len(), "Checkpoint read");
        Ok(Some(table))
    }

    /// Every file the store writes, in checkpoint order, with size and
    /// modification time for those present.
    pub fn files(&self) -> Vec<CheckpointFile> {
        Checkpoint::ALL
            .into_iter()
            .flat_map(|checkpoint| FORMATS.map(|ext| (checkpoint, ext)))
            .map(|(checkpoint, ext)| {
                let filename = self.file_name(checkpoint, ext);
                let metadata = fs::metadata(self.dir.join(&filename))
                    .ok()
                    .filter(|m| m.is_file());

                CheckpointFile {
                    checkpoint,
                    filename,
                    exists: metadata.is_some(),
                    size_bytes: metadata.as_ref().map(|m| m.len()),
                    last_modified: metadata
                        .and_then(|m| m.modified().ok())
                        .map(DateTime::<Utc>::from),
                }
            })
            .collect()
    }
}

/// Read and deserialize a JSON file.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> LoadResult<T> {
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| LoadError::Json {
        path: path.display().to_string(),
        source,
    })
}

fn io_error(path: &Path, source: std::io::Error) -> ExportError {
    ExportError::Io {
        path: path.display().to_string(),
        source,
    }
}
