//! Directory navigation and listing.

use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

use crate::domain::errors::{AccessError, BrowseError};
use crate::domain::model::{EntryKind, ListedEntry, Listing};
use crate::infra::fs::FileSystem;

/// Location and file-name filter of one view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigatorState {
    pub current_dir: PathBuf,
    pub prefix: String,
}

/// Tracks the current directory of a view and moves it around.
///
/// The navigator never clears selections itself; [`crate::app::view::BrowserView`] pairs it
/// with a selection set and resets that on every move.
#[derive(Debug, Clone)]
pub struct Navigator {
    state: NavigatorState,
}

impl Navigator {
    /// Root the navigator at `root`. Relative roots are made absolute against the working
    /// directory and `.`/`..` components are folded away, so that selection keys and parent
    /// lookups stay meaningful.
    pub fn new(root: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        let root = root.into();
        let current_dir = normalize(&std::path::absolute(&root).unwrap_or(root));
        Self {
            state: NavigatorState {
                current_dir,
                prefix: prefix.into(),
            },
        }
    }

    pub fn state(&self) -> &NavigatorState {
        &self.state
    }

    pub fn current_dir(&self) -> &Path {
        &self.state.current_dir
    }

    pub fn prefix(&self) -> &str {
        &self.state.prefix
    }

    pub fn list(&self, fs: &dyn FileSystem) -> Result<Listing, BrowseError> {
        list_directory(fs, &self.state.current_dir, &self.state.prefix)
    }

    /// Move into `folder`. Fails without moving when it is not an accessible directory.
    pub fn enter(&mut self, fs: &dyn FileSystem, folder: &Path) -> Result<(), BrowseError> {
        match fs.stat(folder) {
            Ok(EntryKind::Directory) => {
                tracing::debug!(from = %self.state.current_dir.display(), to = %folder.display(), "enter");
                self.state.current_dir = folder.to_path_buf();
                Ok(())
            }
            Ok(_) => Err(BrowseError::FileAccess(AccessError::Access {
                path: folder.to_path_buf(),
                cause: "not a directory".to_owned(),
            })),
            Err(err) => Err(BrowseError::FileAccess(AccessError::Access {
                path: folder.to_path_buf(),
                cause: err.message,
            })),
        }
    }

    /// Parent of the current directory, or `None` at a root.
    pub fn parent_dir(&self) -> Option<PathBuf> {
        let current = &self.state.current_dir;
        if is_root(current) {
            return None;
        }
        current
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .map(Path::to_path_buf)
    }

    /// Move to the parent directory. Returns `false` and stays put at a root.
    pub fn parent(&mut self) -> bool {
        match self.parent_dir() {
            Some(parent) => {
                tracing::debug!(from = %self.state.current_dir.display(), to = %parent.display(), "parent");
                self.state.current_dir = parent;
                true
            }
            None => false,
        }
    }
}

/// Fold `.` and `..` components without touching the filesystem. `..` at a root stays there.
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => normalized.push(component),
            },
            other => normalized.push(other),
        }
    }
    normalized
}

/// Read `directory` and split it into name-sorted folders and prefix-filtered files.
///
/// Folders are never filtered. Anything that is not a directory is listed as a file.
pub fn list_directory(
    fs: &dyn FileSystem,
    directory: &Path,
    prefix: &str,
) -> Result<Listing, BrowseError> {
    let entries = fs
        .read_directory(directory)
        .map_err(BrowseError::DirectoryRead)?;

    let mut folders = Vec::new();
    let mut files = Vec::new();
    for entry in entries {
        let listed = ListedEntry {
            name: entry.name.to_string_lossy().into_owned(),
            path: directory.join(&entry.name),
            kind: entry.kind,
        };
        if entry.kind.is_dir() {
            folders.push((entry.name, listed));
        } else if matches_prefix(&entry.name, prefix) {
            files.push((entry.name, listed));
        }
    }

    folders.sort_by(|a, b| a.0.cmp(&b.0));
    files.sort_by(|a, b| a.0.cmp(&b.0));

    Ok(Listing {
        directory: directory.to_path_buf(),
        folders: folders.into_iter().map(|(_, entry)| entry).collect(),
        files: files.into_iter().map(|(_, entry)| entry).collect(),
    })
}

/// Exact, case-sensitive byte prefix test. An empty prefix matches everything.
pub fn matches_prefix(name: &OsStr, prefix: &str) -> bool {
    prefix.is_empty() || name.as_encoded_bytes().starts_with(prefix.as_bytes())
}

/// `/`, a drive root such as `C:\`, or any path the host reports as parentless.
pub fn is_root(path: &Path) -> bool {
    let raw = path.as_os_str().as_encoded_bytes();
    if raw == b"/" {
        return true;
    }
    if raw.len() == 3 && raw[0].is_ascii_alphabetic() && raw[1] == b':' && raw[2] == b'\\' {
        return true;
    }
    path.parent().is_none()
}
