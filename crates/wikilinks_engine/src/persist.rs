use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("target has no parent directory: {0:?}")]
    NoParent(PathBuf),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Atomically replaces files inside `{dir}` by writing a temp file in the
/// same directory and renaming it over the target.
pub struct AtomicFileWriter {
    dir: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Writer for the directory that holds `path`.
    pub fn for_file(path: &Path) -> Result<Self, PersistError> {
        let dir = path
            .parent()
            .ok_or_else(|| PersistError::NoParent(path.to_path_buf()))?;
        let dir = if dir.as_os_str().is_empty() {
            PathBuf::from(".")
        } else {
            dir.to_path_buf()
        };
        Ok(Self::new(dir))
    }

    /// Writes `content` to `{dir}/{filename}`. An existing file keeps its
    /// permissions.
    pub fn write(&self, filename: impl AsRef<Path>, content: &str) -> Result<PathBuf, PersistError> {
        let target = self.dir.join(filename);
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        if let Ok(meta) = fs::metadata(&target) {
            tmp.as_file().set_permissions(meta.permissions())?;
        }
        tmp.as_file_mut().sync_all()?;

        tmp.persist(&target).map_err(|e| PersistError::Io(e.error))?;
        Ok(target)
    }
}

/// Replaces the contents of `path` atomically.
pub fn replace_file(path: &Path, content: &str) -> Result<(), PersistError> {
    let filename = path
        .file_name()
        .ok_or_else(|| PersistError::NoParent(path.to_path_buf()))?;
    AtomicFileWriter::for_file(path)?.write(filename, content)?;
    Ok(())
}
