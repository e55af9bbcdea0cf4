//! Building the clipboard payload from a selection.

use std::path::Path;

use crate::app::selection::SelectionSet;
use crate::domain::errors::{AccessError, BrowseError};
use crate::domain::model::{ClipboardPayload, EntryKind};
use crate::infra::clipboard::ClipboardSink;
use crate::infra::fs::FileSystem;

/// Payload plus the non-fatal errors hit while building it.
#[derive(Debug, Clone, Default)]
pub struct Aggregation {
    pub payload: ClipboardPayload,
    pub errors: Vec<AccessError>,
}

impl Aggregation {
    pub fn block_count(&self) -> usize {
        self.payload.len()
    }
}

/// Read every selected path into a payload.
///
/// Selected files become one block named after their base name. Selected folders are walked
/// depth-first and every regular file below them becomes a block named by its path relative
/// to the folder. Any per-path failure is recorded and skipped. When no block at all could be
/// produced the result is [`BrowseError::NoSelection`], carrying the recorded errors.
pub fn aggregate(
    selection: &SelectionSet,
    fs: &dyn FileSystem,
) -> Result<Aggregation, BrowseError> {
    let mut aggregation = Aggregation::default();

    for path in selection.selected() {
        match fs.stat(path) {
            Err(err) => aggregation.errors.push(AccessError::Access {
                path: path.to_path_buf(),
                cause: err.message,
            }),
            Ok(EntryKind::Directory) => append_tree(&mut aggregation, fs, path),
            Ok(EntryKind::File) => append_file(&mut aggregation, fs, path, base_name(path)),
            Ok(EntryKind::Other) => aggregation.errors.push(AccessError::Access {
                path: path.to_path_buf(),
                cause: "not a regular file".to_owned(),
            }),
        }
    }

    if aggregation.payload.is_empty() {
        return Err(BrowseError::NoSelection {
            errors: aggregation.errors,
        });
    }
    tracing::debug!(
        blocks = aggregation.block_count(),
        errors = aggregation.errors.len(),
        "aggregated selection"
    );
    Ok(aggregation)
}

/// Hand the payload text to the clipboard. No retry.
pub fn commit(
    payload: &ClipboardPayload,
    clipboard: &mut dyn ClipboardSink,
) -> Result<(), BrowseError> {
    clipboard
        .write(&payload.to_text())
        .map_err(|err| BrowseError::ClipboardWrite(format!("{err:#}")))
}

fn append_tree(aggregation: &mut Aggregation, fs: &dyn FileSystem, root: &Path) {
    for entry in fs.walk_tree(root) {
        match entry {
            Ok(entry) if entry.kind == EntryKind::File => {
                let display = display_name(root, &entry.path);
                append_file(aggregation, fs, &entry.path, display);
            }
            Ok(_) => {}
            Err(err) => aggregation.errors.push(AccessError::Access {
                path: err.path,
                cause: err.message,
            }),
        }
    }
}

fn append_file(aggregation: &mut Aggregation, fs: &dyn FileSystem, path: &Path, display: String) {
    match fs.read_file_bytes(path) {
        Ok(contents) => aggregation.payload.push(display, path, contents),
        Err(err) => aggregation.errors.push(AccessError::Read {
            path: path.to_path_buf(),
            cause: err.message,
        }),
    }
}

/// Path of `file` relative to `root`, or its base name when that is not computable.
fn display_name(root: &Path, file: &Path) -> String {
    match file.strip_prefix(root) {
        Ok(relative) if !relative.as_os_str().is_empty() => {
            relative.to_string_lossy().into_owned()
        }
        _ => base_name(file),
    }
}

fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
