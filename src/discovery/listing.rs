use std::fs;
use std::path::{Path, PathBuf};

use crate::core::error::{Result, SweepError};
use crate::reporting::logging;

/// Supplies the set of files a batch works on.
pub trait FileDiscovery {
    fn discover(&self) -> Vec<PathBuf>;
}

/// Lists the regular files directly inside one directory.
#[derive(Debug, Clone)]
pub struct DirectoryListing {
    dir: PathBuf,
}

impl DirectoryListing {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// List the directory, sorted by path. Subdirectories are skipped.
    pub fn list(&self) -> Result<Vec<PathBuf>> {
        let to_error = |source| SweepError::FileAccess {
            path: self.dir.display().to_string(),
            source,
        };

        let mut files = Vec::new();
        for entry in fs::read_dir(&self.dir).map_err(to_error)? {
            let path = entry.map_err(to_error)?.path();
            if path.is_file() {
                files.push(path);
            }
        }

        files.sort();
        Ok(files)
    }
}

impl FileDiscovery for DirectoryListing {
    /// An unreadable directory yields an empty batch.
    fn discover(&self) -> Vec<PathBuf> {
        self.list().unwrap_or_else(|e| {
            logging::log_discovery_failure(&e);
            Vec::new()
        })
    }
}
