//! One independent browsing context: a navigator, its selection, and an optional preview.

use std::path::{Path, PathBuf};

use crate::app::aggregate::{aggregate, commit};
use crate::app::navigator::Navigator;
use crate::app::preview::{PreviewDocument, load_preview};
use crate::app::selection::SelectionSet;
use crate::domain::errors::{AccessError, BrowseError};
use crate::domain::model::{EntryKind, Listing};
use crate::infra::clipboard::ClipboardSink;
use crate::infra::fs::FileSystem;
use crate::infra::notify::Notifier;

/// A row or button action, carrying its target path as data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewCommand {
    Toggle { path: PathBuf, selected: bool },
    SelectAllVisible,
    Enter(PathBuf),
    Parent,
    /// Open a folder, or a file's preview, in a new view.
    OpenInNewView(PathBuf),
    OpenParentInNewView,
    /// Open in place: folders are entered, files previewed.
    OpenFile(PathBuf),
    ClosePreview,
    Copy,
}

/// What the owner of the view has to do after a command.
#[derive(Debug)]
pub enum ViewOutcome {
    Stay,
    Spawn(Box<BrowserView>),
}

/// Collaborators a command may touch.
pub struct ViewContext<'a> {
    pub fs: &'a dyn FileSystem,
    pub clipboard: &'a mut dyn ClipboardSink,
    pub notifier: &'a mut dyn Notifier,
}

/// Navigator and selection set created together and owned exclusively by one view.
#[derive(Debug, Clone)]
pub struct BrowserView {
    navigator: Navigator,
    selection: SelectionSet,
    preview: Option<PreviewDocument>,
    preview_max_lines: usize,
}

impl BrowserView {
    pub fn new(root: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            navigator: Navigator::new(root, prefix),
            selection: SelectionSet::new(),
            preview: None,
            preview_max_lines: 0,
        }
    }

    pub fn with_preview_max_lines(mut self, lines: usize) -> Self {
        self.preview_max_lines = lines;
        self
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn preview(&self) -> Option<&PreviewDocument> {
        self.preview.as_ref()
    }

    pub fn current_dir(&self) -> &Path {
        self.navigator.current_dir()
    }

    pub fn is_selected(&self, path: &Path) -> bool {
        self.selection.is_selected(path)
    }

    pub fn listing(&self, fs: &dyn FileSystem) -> Result<Listing, BrowseError> {
        self.navigator.list(fs)
    }

    /// A fresh view rooted at `root`, sharing nothing with `self` but the prefix filter.
    pub fn open_independent(&self, root: impl Into<PathBuf>) -> BrowserView {
        BrowserView::new(root, self.navigator.prefix())
            .with_preview_max_lines(self.preview_max_lines)
    }

    pub fn toggle(&mut self, path: impl Into<PathBuf>, selected: bool) {
        self.selection.toggle(path, selected);
    }

    /// Flag everything in the current listing. Returns how many entries were flagged.
    pub fn select_all_visible(&mut self, fs: &dyn FileSystem) -> Result<usize, BrowseError> {
        let listing = self.navigator.list(fs)?;
        Ok(self.selection.select_all_visible(&listing))
    }

    /// Move into `folder`, clearing the selection.
    pub fn enter(&mut self, fs: &dyn FileSystem, folder: &Path) -> Result<(), BrowseError> {
        self.navigator.enter(fs, folder)?;
        self.after_move();
        Ok(())
    }

    /// Move to the parent, clearing the selection. `false` at a root, where nothing changes.
    pub fn parent(&mut self) -> bool {
        let moved = self.navigator.parent();
        if moved {
            self.after_move();
        }
        moved
    }

    /// Aggregate the selection and write it to the clipboard.
    ///
    /// Every per-path error and the final outcome go to `notifier`. The selection is kept.
    pub fn copy_selected(
        &self,
        fs: &dyn FileSystem,
        clipboard: &mut dyn ClipboardSink,
        notifier: &mut dyn Notifier,
    ) -> Result<usize, BrowseError> {
        let aggregation = match aggregate(&self.selection, fs) {
            Ok(aggregation) => aggregation,
            Err(err) => {
                if let BrowseError::NoSelection { errors } = &err {
                    report_access_errors(notifier, errors);
                }
                notifier.error(err.to_string());
                return Err(err);
            }
        };
        report_access_errors(notifier, &aggregation.errors);

        if let Err(err) = commit(&aggregation.payload, clipboard) {
            notifier.error(err.to_string());
            return Err(err);
        }

        let blocks = aggregation.block_count();
        tracing::info!(blocks, dir = %self.current_dir().display(), "copied selection");
        notifier.success(format!("Copied {blocks} file blocks to clipboard"));
        Ok(blocks)
    }

    /// Open `path` in place: folders are entered, files are previewed.
    pub fn open(&mut self, fs: &dyn FileSystem, path: &Path) -> Result<(), BrowseError> {
        match stat_for_open(fs, path)? {
            EntryKind::Directory => self.enter(fs, path),
            _ => {
                self.preview = Some(load_preview(fs, path, self.preview_max_lines)?);
                Ok(())
            }
        }
    }

    /// Build the view that "open in new view" on `path` produces.
    pub fn spawn_for(&self, fs: &dyn FileSystem, path: &Path) -> Result<BrowserView, BrowseError> {
        match stat_for_open(fs, path)? {
            EntryKind::Directory => Ok(self.open_independent(path)),
            _ => {
                let root = path.parent().unwrap_or(self.current_dir());
                let mut view = self.open_independent(root);
                view.preview = Some(load_preview(fs, path, self.preview_max_lines)?);
                Ok(view)
            }
        }
    }

    pub fn close_preview(&mut self) {
        self.preview = None;
    }

    /// Apply a command, reporting failures through the notifier.
    pub fn dispatch(&mut self, command: ViewCommand, ctx: &mut ViewContext<'_>) -> ViewOutcome {
        tracing::debug!(?command, dir = %self.current_dir().display(), "dispatch");
        let result = match command {
            ViewCommand::Toggle { path, selected } => {
                self.toggle(path, selected);
                Ok(ViewOutcome::Stay)
            }
            ViewCommand::SelectAllVisible => self
                .select_all_visible(ctx.fs)
                .map(|_| ViewOutcome::Stay),
            ViewCommand::Enter(path) => self.enter(ctx.fs, &path).map(|_| ViewOutcome::Stay),
            ViewCommand::Parent => {
                self.parent();
                Ok(ViewOutcome::Stay)
            }
            ViewCommand::OpenInNewView(path) => self
                .spawn_for(ctx.fs, &path)
                .map(|view| ViewOutcome::Spawn(Box::new(view))),
            ViewCommand::OpenParentInNewView => Ok(match self.navigator.parent_dir() {
                Some(parent) => ViewOutcome::Spawn(Box::new(self.open_independent(parent))),
                None => ViewOutcome::Stay,
            }),
            ViewCommand::OpenFile(path) => self.open(ctx.fs, &path).map(|_| ViewOutcome::Stay),
            ViewCommand::ClosePreview => {
                self.close_preview();
                Ok(ViewOutcome::Stay)
            }
            // copy_selected already notified
            ViewCommand::Copy => {
                let _ = self.copy_selected(ctx.fs, ctx.clipboard, ctx.notifier);
                Ok(ViewOutcome::Stay)
            }
        };

        result.unwrap_or_else(|err| {
            ctx.notifier.error(err.to_string());
            ViewOutcome::Stay
        })
    }

    fn after_move(&mut self) {
        self.selection.clear();
        self.preview = None;
    }
}

fn stat_for_open(fs: &dyn FileSystem, path: &Path) -> Result<EntryKind, BrowseError> {
    fs.stat(path).map_err(|err| {
        BrowseError::FileAccess(AccessError::Access {
            path: path.to_path_buf(),
            cause: err.message,
        })
    })
}

fn report_access_errors(notifier: &mut dyn Notifier, errors: &[AccessError]) {
    for error in errors {
        notifier.error(error.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    use anyhow::Result;

    use crate::infra::clipboard::MemoryClipboard;
    use crate::infra::fs::LocalFileSystem;
    use crate::infra::notify::{NotificationLevel, NotificationLog};

    struct Harness {
        clipboard: MemoryClipboard,
        log: NotificationLog,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                clipboard: MemoryClipboard::new(),
                log: NotificationLog::default(),
            }
        }

        fn dispatch(&mut self, view: &mut BrowserView, command: ViewCommand) -> ViewOutcome {
            let mut ctx = ViewContext {
                fs: &LocalFileSystem,
                clipboard: &mut self.clipboard,
                notifier: &mut self.log,
            };
            view.dispatch(command, &mut ctx)
        }
    }

    fn workspace() -> Result<tempfile::TempDir> {
        let temp = tempfile::tempdir()?;
        let root = temp.path();
        fs::create_dir_all(root.join("docs"))?;
        fs::write(root.join("docs/guide.md"), b"guide")?;
        fs::write(root.join("notes.txt"), b"notes")?;
        Ok(temp)
    }

    #[test]
    fn views_on_the_same_directory_do_not_share_selection() -> Result<()> {
        let temp = workspace()?;
        let mut first = BrowserView::new(temp.path(), "");
        let second = first.open_independent(temp.path());

        first.toggle(temp.path().join("notes.txt"), true);

        assert!(first.is_selected(&temp.path().join("notes.txt")));
        assert!(!second.is_selected(&temp.path().join("notes.txt")));
        assert!(second.selection().is_empty());
        Ok(())
    }

    #[test]
    fn navigation_clears_selection() -> Result<()> {
        let temp = workspace()?;
        let mut view = BrowserView::new(temp.path(), "");
        view.toggle(temp.path().join("notes.txt"), true);

        view.enter(&LocalFileSystem, &temp.path().join("docs"))?;
        assert!(view.selection().is_empty());

        view.toggle(temp.path().join("docs/guide.md"), true);
        assert!(view.parent());
        assert!(view.selection().is_empty());
        assert_eq!(view.current_dir(), temp.path());
        Ok(())
    }

    #[test]
    fn copy_keeps_selection_and_reports_block_count() -> Result<()> {
        let temp = workspace()?;
        let mut view = BrowserView::new(temp.path(), "");
        let mut harness = Harness::new();

        harness.dispatch(&mut view, ViewCommand::SelectAllVisible);
        harness.dispatch(&mut view, ViewCommand::Copy);

        assert_eq!(
            harness.clipboard.last(),
            Some("--- guide.md ---\nguide\n--- notes.txt ---\nnotes\n")
        );
        let latest = harness.log.latest().unwrap();
        assert_eq!(latest.level, NotificationLevel::Success);
        assert_eq!(latest.message, "Copied 2 file blocks to clipboard");
        assert_eq!(view.selection().selected_count(), 2);
        Ok(())
    }

    #[test]
    fn each_unreadable_path_is_reported_once() -> Result<()> {
        let temp = workspace()?;
        let mut view = BrowserView::new(temp.path(), "");
        let mut harness = Harness::new();
        let gone = temp.path().join("gone.txt");
        fs::write(&gone, b"gone")?;

        harness.dispatch(&mut view, ViewCommand::SelectAllVisible);
        fs::remove_file(&gone)?;
        harness.dispatch(&mut view, ViewCommand::Copy);

        let errors: Vec<&str> = harness
            .log
            .entries()
            .iter()
            .filter(|entry| entry.level == NotificationLevel::Error)
            .map(|entry| entry.message.as_str())
            .collect();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("Error accessing "));
        assert!(errors[0].contains("gone.txt"));
        assert_eq!(
            harness.log.latest().map(|entry| entry.message.as_str()),
            Some("Copied 2 file blocks to clipboard")
        );
        Ok(())
    }

    #[test]
    fn copy_without_selection_never_touches_clipboard() -> Result<()> {
        let temp = workspace()?;
        let mut view = BrowserView::new(temp.path(), "");
        let mut harness = Harness::new();

        harness.dispatch(&mut view, ViewCommand::Copy);

        assert!(harness.clipboard.writes.is_empty());
        assert_eq!(harness.log.messages(), vec!["No files selected"]);
        Ok(())
    }

    #[test]
    fn clipboard_failure_is_notified() -> Result<()> {
        let temp = workspace()?;
        let mut view = BrowserView::new(temp.path(), "");
        view.toggle(temp.path().join("notes.txt"), true);
        let mut clipboard = MemoryClipboard::failing("clipboard locked");
        let mut log = NotificationLog::default();

        let err = view
            .copy_selected(&LocalFileSystem, &mut clipboard, &mut log)
            .unwrap_err();

        assert!(matches!(err, BrowseError::ClipboardWrite(_)));
        assert_eq!(
            log.messages(),
            vec!["Failed to copy to clipboard: clipboard locked"]
        );
        Ok(())
    }

    #[test]
    fn open_in_new_view_spawns_independent_view() -> Result<()> {
        let temp = tempfile::tempdir()?;
        fs::create_dir(temp.path().join("docs"))?;
        fs::write(temp.path().join("docs/test_a.md"), b"a")?;
        let mut view = BrowserView::new(temp.path(), "test_");
        view.toggle(temp.path().join("docs"), true);
        let mut harness = Harness::new();

        let outcome = harness.dispatch(
            &mut view,
            ViewCommand::OpenInNewView(temp.path().join("docs")),
        );

        let ViewOutcome::Spawn(spawned) = outcome else {
            panic!("expected a spawned view");
        };
        assert_eq!(spawned.current_dir(), temp.path().join("docs"));
        assert_eq!(spawned.navigator().prefix(), "test_");
        assert!(spawned.selection().is_empty());
        assert_eq!(view.current_dir(), temp.path());
        assert!(view.is_selected(&temp.path().join("docs")));
        Ok(())
    }

    #[test]
    fn opening_a_file_previews_it_in_place_or_in_a_new_view() -> Result<()> {
        let temp = workspace()?;
        let file = temp.path().join("notes.txt");
        let mut view = BrowserView::new(temp.path(), "");
        let mut harness = Harness::new();

        harness.dispatch(&mut view, ViewCommand::OpenFile(file.clone()));
        assert_eq!(view.preview().map(|doc| doc.lines.clone()), Some(vec!["notes".to_owned()]));
        harness.dispatch(&mut view, ViewCommand::ClosePreview);
        assert!(view.preview().is_none());

        let ViewOutcome::Spawn(spawned) =
            harness.dispatch(&mut view, ViewCommand::OpenInNewView(file.clone()))
        else {
            panic!("expected a spawned view");
        };
        assert_eq!(spawned.current_dir(), temp.path());
        assert_eq!(spawned.preview().map(|doc| doc.path.clone()), Some(file));
        Ok(())
    }

    #[test]
    fn entering_a_missing_folder_is_reported_and_ignored() -> Result<()> {
        let temp = workspace()?;
        let mut view = BrowserView::new(temp.path(), "");
        view.toggle(temp.path().join("notes.txt"), true);
        let mut harness = Harness::new();

        harness.dispatch(&mut view, ViewCommand::Enter(temp.path().join("missing")));

        assert_eq!(view.current_dir(), temp.path());
        assert!(view.is_selected(&temp.path().join("notes.txt")));
        let latest = harness.log.latest().unwrap();
        assert_eq!(latest.level, NotificationLevel::Error);
        assert!(latest.message.starts_with("Error accessing "));
        Ok(())
    }
}
