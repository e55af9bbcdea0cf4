//! Directory listing component and cursor state.

use std::path::PathBuf;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};

use crate::app::view::BrowserView;
use crate::domain::model::Listing;
use crate::infra::fs::FileSystem;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Parent,
    Folder,
    File,
}

/// One rendered line of the listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRow {
    pub kind: RowKind,
    pub name: String,
    pub path: PathBuf,
}

impl ListingRow {
    pub fn is_checkable(&self) -> bool {
        !matches!(self.kind, RowKind::Parent)
    }
}

/// Rows of the current directory plus the cursor over them.
#[derive(Debug, Default, Clone)]
pub struct ListingState {
    directory: PathBuf,
    rows: Vec<ListingRow>,
    selected: usize,
    error: Option<String>,
}

impl ListingState {
    /// Re-read the view's directory. The cursor stays on the same row index unless the
    /// directory changed, in which case it returns to the top.
    pub fn refresh(&mut self, view: &BrowserView, fs: &dyn FileSystem) {
        let directory = view.current_dir().to_path_buf();
        let moved = directory != self.directory;
        let parent = view.navigator().parent_dir();

        match view.listing(fs) {
            Ok(listing) => {
                self.rows = build_rows(&listing, parent);
                self.error = None;
            }
            Err(err) => {
                self.rows = parent
                    .map(|path| vec![parent_row(path)])
                    .unwrap_or_default();
                self.error = Some(err.to_string());
            }
        }

        self.directory = directory;
        if moved {
            self.selected = 0;
        }
        self.clamp();
    }

    pub fn directory(&self) -> &std::path::Path {
        &self.directory
    }

    pub fn rows(&self) -> &[ListingRow] {
        &self.rows
    }

    /// Inline message replacing the listing when the directory could not be read.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn selected_row(&self) -> Option<&ListingRow> {
        self.rows.get(self.selected)
    }

    pub fn selected_index(&self) -> Option<usize> {
        (!self.rows.is_empty()).then_some(self.selected)
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.rows.len() {
            self.selected += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.rows.len().saturating_sub(1);
    }

    pub fn page_down(&mut self, step: usize) {
        self.selected = self.selected.saturating_add(step);
        self.clamp();
    }

    pub fn page_up(&mut self, step: usize) {
        self.selected = self.selected.saturating_sub(step);
    }

    fn clamp(&mut self) {
        if self.selected >= self.rows.len() {
            self.selected = self.rows.len().saturating_sub(1);
        }
    }
}

fn build_rows(listing: &Listing, parent: Option<PathBuf>) -> Vec<ListingRow> {
    let mut rows = Vec::with_capacity(listing.len() + 1);
    if let Some(parent) = parent {
        rows.push(parent_row(parent));
    }
    rows.extend(listing.folders.iter().map(|entry| ListingRow {
        kind: RowKind::Folder,
        name: entry.name.clone(),
        path: entry.path.clone(),
    }));
    rows.extend(listing.files.iter().map(|entry| ListingRow {
        kind: RowKind::File,
        name: entry.name.clone(),
        path: entry.path.clone(),
    }));
    rows
}

fn parent_row(path: PathBuf) -> ListingRow {
    ListingRow {
        kind: RowKind::Parent,
        name: "..".into(),
        path,
    }
}

/// Ratatui component drawing a [`ListingState`] with checkboxes taken from the view.
#[derive(Debug, Default)]
pub struct ListingView;

impl ListingView {
    pub fn render(
        &self,
        frame: &mut Frame<'_>,
        area: Rect,
        state: &ListingState,
        view: &BrowserView,
    ) {
        let mut title = state.directory().display().to_string();
        if !view.navigator().prefix().is_empty() {
            title.push_str(&format!(" · prefix {}", view.navigator().prefix()));
        }
        let block = Block::default().borders(Borders::ALL).title(title);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let (list_area, error_area) = match state.error() {
            Some(_) => {
                let layout = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([
                        Constraint::Length(state.rows().len() as u16),
                        Constraint::Min(1),
                    ])
                    .split(inner);
                (layout[0], Some(layout[1]))
            }
            None => (inner, None),
        };

        if let (Some(message), Some(error_area)) = (state.error(), error_area) {
            let paragraph = Paragraph::new(message.to_owned())
                .style(Style::default().fg(Color::Red))
                .wrap(Wrap { trim: true });
            frame.render_widget(paragraph, error_area);
        } else if state.rows().is_empty() {
            let placeholder = Paragraph::new("Empty directory").style(
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            );
            frame.render_widget(placeholder, list_area);
            return;
        }

        let items: Vec<ListItem> = state
            .rows()
            .iter()
            .enumerate()
            .map(|(index, row)| {
                let mut item = ListItem::new(row_line(row, view.is_selected(&row.path)));
                if index % 2 == 1 {
                    item = item.style(Style::default().bg(Color::Rgb(24, 24, 24)));
                }
                item
            })
            .collect();

        let mut list_state = ListState::default();
        list_state.select(state.selected_index());

        let highlight_style = Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD);

        let list = List::new(items)
            .highlight_style(highlight_style)
            .highlight_symbol("▸ ");
        frame.render_stateful_widget(list, list_area, &mut list_state);
    }
}

fn row_line(row: &ListingRow, checked: bool) -> Line<'static> {
    let checkbox = match (row.is_checkable(), checked) {
        (false, _) => Span::raw("    "),
        (true, true) => Span::styled("[x] ", Style::default().fg(Color::Green)),
        (true, false) => Span::styled("[ ] ", Style::default().fg(Color::DarkGray)),
    };
    let name = match row.kind {
        RowKind::Parent => Span::styled("..", Style::default().fg(Color::Yellow)),
        RowKind::Folder => Span::styled(
            format!("{}/", row.name),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        RowKind::File => Span::raw(row.name.clone()),
    };
    let name = if checked {
        name.patch_style(Style::default().add_modifier(Modifier::BOLD))
    } else {
        name
    };
    Line::from(vec![checkbox, name])
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;

    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use crate::infra::fs::LocalFileSystem;

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer.get(x, y).symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn rows_put_parent_and_folders_before_files() {
        let temp = tempfile::tempdir().unwrap();
        fs::create_dir(temp.path().join("src")).unwrap();
        fs::write(temp.path().join("a.txt"), b"a").unwrap();
        let view = BrowserView::new(temp.path(), "");

        let mut state = ListingState::default();
        state.refresh(&view, &LocalFileSystem);

        let kinds: Vec<RowKind> = state.rows().iter().map(|row| row.kind).collect();
        assert_eq!(kinds, vec![RowKind::Parent, RowKind::Folder, RowKind::File]);
        assert_eq!(state.selected_row().map(|row| row.kind), Some(RowKind::Parent));

        state.select_last();
        assert_eq!(state.selected_row().map(|row| row.name.as_str()), Some("a.txt"));
        state.select_next();
        assert_eq!(state.selected_index(), Some(2));
    }

    #[test]
    fn renders_checkbox_state_from_selection() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join("picked.txt"), b"a").unwrap();
        fs::write(temp.path().join("skipped.txt"), b"b").unwrap();
        let mut view = BrowserView::new(temp.path(), "");
        view.toggle(temp.path().join("picked.txt"), true);

        let mut state = ListingState::default();
        state.refresh(&view, &LocalFileSystem);

        let mut terminal = Terminal::new(TestBackend::new(80, 8)).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.size();
                ListingView.render(frame, area, &state, &view);
            })
            .unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("[x] picked.txt"));
        assert!(text.contains("[ ] skipped.txt"));
    }

    #[test]
    fn unreadable_directory_shows_inline_error() {
        let temp = tempfile::tempdir().unwrap();
        let gone = temp.path().join("gone");
        fs::create_dir(&gone).unwrap();
        let view = BrowserView::new(&gone, "");
        fs::remove_dir(&gone).unwrap();

        let mut state = ListingState::default();
        state.refresh(&view, &LocalFileSystem);

        assert!(state.error().is_some_and(|e| e.starts_with("Error reading directory")));
        assert_eq!(state.rows().len(), 1);

        let mut terminal = Terminal::new(TestBackend::new(100, 8)).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.size();
                ListingView.render(frame, area, &state, &view);
            })
            .unwrap();
        assert!(buffer_text(&terminal).contains("Error reading directory"));
    }
}
