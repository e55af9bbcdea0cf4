//! Per-view selection state.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::domain::model::Listing;

/// Path → selected flag, remembered in first-interaction order.
///
/// Only paths the user touched are present; absence reads as "not selected". Nothing is
/// checked against the filesystem here, stale paths surface at aggregation time.
#[derive(Debug, Default, Clone)]
pub struct SelectionSet {
    order: Vec<PathBuf>,
    flags: HashMap<PathBuf, bool>,
}

impl SelectionSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set or clear the flag for `path`. A known path keeps its position.
    pub fn toggle(&mut self, path: impl Into<PathBuf>, selected: bool) {
        let path = path.into();
        match self.flags.get_mut(&path) {
            Some(flag) => *flag = selected,
            None => {
                self.order.push(path.clone());
                self.flags.insert(path, selected);
            }
        }
    }

    /// Whether `path` is currently flagged.
    pub fn is_selected(&self, path: &Path) -> bool {
        self.flags.get(path).copied().unwrap_or(false)
    }

    /// Flag every folder and file of `listing`. Paths outside it are left alone.
    pub fn select_all_visible(&mut self, listing: &Listing) -> usize {
        let mut count = 0;
        for entry in listing.iter() {
            self.toggle(entry.path.clone(), true);
            count += 1;
        }
        count
    }

    /// Forget every path.
    pub fn clear(&mut self) {
        self.order.clear();
        self.flags.clear();
    }

    /// Every tracked path with its flag, in first-interaction order.
    pub fn iter(&self) -> impl Iterator<Item = (&Path, bool)> {
        self.order
            .iter()
            .map(|path| (path.as_path(), self.flags.get(path).copied().unwrap_or(false)))
    }

    /// Paths currently flagged, in first-interaction order.
    pub fn selected(&self) -> impl Iterator<Item = &Path> {
        self.iter()
            .filter_map(|(path, selected)| selected.then_some(path))
    }

    /// Number of flagged paths.
    pub fn selected_count(&self) -> usize {
        self.flags.values().filter(|selected| **selected).count()
    }

    /// Number of tracked paths, flagged or not.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether no path has been touched since creation or the last clear.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
