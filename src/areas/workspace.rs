use crate::artifacts::index::index_entry::EntryMetadata;
use crate::errors::{Error, Result};
use bytes::Bytes;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const IGNORED_PATHS: [&str; 3] = [".git", ".", ".."];

/// A child of a listed directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub is_dir: bool,
}

/// Read-only view of the files under a repository root
#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Workspace {
            path: path.as_ref().into(),
        }
    }

    /// Resolve a path relative to the workspace root
    pub fn resolve(&self, relative_path: &Path) -> PathBuf {
        self.path.join(relative_path)
    }

    /// A path under a regular file (`file.txt/.`) is not a directory
    pub fn is_dir(&self, relative_path: &Path) -> Result<bool> {
        let full_path = self.resolve(relative_path);

        match std::fs::symlink_metadata(&full_path) {
            Ok(metadata) => Ok(metadata.is_dir()),
            Err(e) if e.kind() == std::io::ErrorKind::NotADirectory => Ok(false),
            Err(e) => Err(Self::not_found(e, full_path)),
        }
    }

    /// Immediate children of a directory, sorted by name, `.git` excluded
    pub fn list_dir(&self, relative_path: &Path) -> Result<Vec<DirEntry>> {
        let dir_path = self.resolve(relative_path);

        if !self.is_dir(relative_path)? {
            return Err(Error::NotADirectory { path: dir_path });
        }

        WalkDir::new(&dir_path)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => {
                    let name = entry.file_name().to_string_lossy().into_owned();
                    if IGNORED_PATHS.contains(&name.as_str()) {
                        None
                    } else {
                        Some(Ok(DirEntry {
                            name,
                            is_dir: entry.file_type().is_dir(),
                        }))
                    }
                }
                Err(e) => Some(Err(Error::from(std::io::Error::from(e)))),
            })
            .collect()
    }

    pub fn read_file(&self, relative_path: &Path) -> Result<Bytes> {
        let file_path = self.resolve(relative_path);

        let content = std::fs::read(&file_path).map_err(|e| Self::not_found(e, file_path))?;

        Ok(content.into())
    }

    pub fn stat_file(&self, relative_path: &Path) -> Result<EntryMetadata> {
        let file_path = self.resolve(relative_path);
        let metadata = std::fs::metadata(&file_path).map_err(|e| Self::not_found(e, file_path.clone()))?;

        if !metadata.is_file() {
            return Err(Error::NotAFile { path: file_path });
        }

        Ok((&metadata).into())
    }

    fn not_found(error: std::io::Error, path: PathBuf) -> Error {
        match error.kind() {
            std::io::ErrorKind::NotFound => Error::PathNotFound { path },
            _ => error.into(),
        }
    }
}
