//! Filesystem boundary for the navigator and aggregator.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;

use crate::domain::errors::FsError;
use crate::domain::model::EntryKind;

/// Entry returned by [`FileSystem::read_directory`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntryInfo {
    pub name: OsString,
    pub kind: EntryKind,
}

/// Entry produced by [`FileSystem::walk_tree`]. `path` is absolute when the root is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkEntry {
    pub path: PathBuf,
    pub kind: EntryKind,
}

/// Read-only view of the filesystem used by the core.
///
/// Every call is synchronous. Errors carry the path they were raised for.
pub trait FileSystem {
    fn read_directory(&self, path: &Path) -> Result<Vec<DirEntryInfo>, FsError>;

    /// Follows symlinks.
    fn stat(&self, path: &Path) -> Result<EntryKind, FsError>;

    fn read_file_bytes(&self, path: &Path) -> Result<Vec<u8>, FsError>;

    /// Depth-first walk including `root` itself. Failed entries are yielded as errors
    /// and the walk carries on with their siblings.
    fn walk_tree(&self, root: &Path) -> Vec<Result<WalkEntry, FsError>>;
}

/// [`FileSystem`] backed by `std::fs` and the `ignore` walker.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFileSystem;

impl LocalFileSystem {
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for LocalFileSystem {
    fn read_directory(&self, path: &Path) -> Result<Vec<DirEntryInfo>, FsError> {
        let entries = fs::read_dir(path).map_err(|err| FsError::from_io(path, &err))?;
        let mut result = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|err| FsError::from_io(path, &err))?;
            let file_type = entry
                .file_type()
                .map_err(|err| FsError::from_io(entry.path(), &err))?;
            result.push(DirEntryInfo {
                name: entry.file_name(),
                kind: kind_of(&file_type),
            });
        }
        Ok(result)
    }

    fn stat(&self, path: &Path) -> Result<EntryKind, FsError> {
        let metadata = fs::metadata(path).map_err(|err| FsError::from_io(path, &err))?;
        Ok(kind_of(&metadata.file_type()))
    }

    fn read_file_bytes(&self, path: &Path) -> Result<Vec<u8>, FsError> {
        fs::read(path).map_err(|err| FsError::from_io(path, &err))
    }

    fn walk_tree(&self, root: &Path) -> Vec<Result<WalkEntry, FsError>> {
        let walker = WalkBuilder::new(root)
            .standard_filters(false)
            .follow_links(false)
            .sort_by_file_name(|a, b| a.cmp(b))
            .build();

        walker
            .map(|result| match result {
                Ok(entry) => {
                    let kind = match entry.file_type() {
                        Some(file_type) if file_type.is_symlink() => fs::metadata(entry.path())
                            .map(|meta| match kind_of(&meta.file_type()) {
                                // Linked directories are not descended into.
                                EntryKind::Directory => EntryKind::Other,
                                other => other,
                            })
                            .unwrap_or(EntryKind::Other),
                        Some(file_type) => kind_of(&file_type),
                        None => EntryKind::Other,
                    };
                    Ok(WalkEntry {
                        path: entry.into_path(),
                        kind,
                    })
                }
                Err(err) => Err(walk_error(root, err)),
            })
            .collect()
    }
}

fn kind_of(file_type: &fs::FileType) -> EntryKind {
    if file_type.is_dir() {
        EntryKind::Directory
    } else if file_type.is_file() {
        EntryKind::File
    } else {
        EntryKind::Other
    }
}

fn walk_error(root: &Path, err: ignore::Error) -> FsError {
    match err {
        ignore::Error::WithPath { path, err } => FsError::new(path, err.to_string()),
        ignore::Error::WithDepth { err, .. } => walk_error(root, *err),
        other => FsError::new(root, other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use anyhow::Result;

    #[test]
    fn read_directory_classifies_entries() -> Result<()> {
        let temp = tempfile::tempdir()?;
        fs::create_dir(temp.path().join("src"))?;
        fs::write(temp.path().join("README.md"), b"readme")?;

        let mut entries = LocalFileSystem.read_directory(temp.path())?;
        entries.sort_by(|a, b| a.name.cmp(&b.name));

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "README.md");
        assert_eq!(entries[0].kind, EntryKind::File);
        assert_eq!(entries[1].name, "src");
        assert_eq!(entries[1].kind, EntryKind::Directory);
        Ok(())
    }

    #[test]
    fn read_directory_reports_missing_path() {
        let temp = tempfile::tempdir().unwrap();
        let missing = temp.path().join("gone");

        let err = LocalFileSystem.read_directory(&missing).unwrap_err();
        assert_eq!(err.path, missing);
    }

    #[test]
    fn walk_includes_hidden_and_ignored_files_in_name_order() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let root = temp.path();
        fs::create_dir_all(root.join("b/inner"))?;
        fs::write(root.join(".gitignore"), b"*.log\n")?;
        fs::write(root.join("a.log"), b"log")?;
        fs::write(root.join(".hidden"), b"h")?;
        fs::write(root.join("b/inner/z.txt"), b"z")?;
        fs::write(root.join("c.txt"), b"c")?;

        let files: Vec<String> = LocalFileSystem
            .walk_tree(root)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.kind == EntryKind::File)
            .map(|entry| {
                entry
                    .path
                    .strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect();

        assert_eq!(
            files,
            vec![".gitignore", ".hidden", "a.log", "b/inner/z.txt", "c.txt"]
        );
        Ok(())
    }
}
