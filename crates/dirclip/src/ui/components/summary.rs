//! Selection summary component.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph, Wrap};

use crate::app::view::BrowserView;
use crate::domain::model::EntryKind;
use crate::infra::fs::FileSystem;

/// Lists the paths ticked in the active view.
#[derive(Debug, Default)]
pub struct Summary;

impl Summary {
    pub fn new() -> Self {
        Self
    }

    /// Render the summary inside the provided area.
    pub fn render(
        &self,
        frame: &mut Frame<'_>,
        area: Rect,
        view: &BrowserView,
        fs: &dyn FileSystem,
    ) {
        let count = view.selection().selected_count();
        let block = Block::default()
            .title(format!("Selected ({count})"))
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        if count == 0 {
            let placeholder = Paragraph::new("Nothing selected · space to tick")
                .wrap(Wrap { trim: true })
                .style(Style::default().fg(Color::DarkGray));
            frame.render_widget(placeholder, inner);
            return;
        }

        let root = view.current_dir();
        let items: Vec<ListItem> = view
            .selection()
            .selected()
            .map(|path| {
                let label = path
                    .strip_prefix(root)
                    .unwrap_or(path)
                    .display()
                    .to_string();
                let marker = match fs.stat(path) {
                    Ok(EntryKind::Directory) => "▸ ",
                    _ => "• ",
                };
                ListItem::new(Line::from(vec![
                    Span::styled(marker, Style::default().fg(Color::Yellow)),
                    Span::raw(label),
                ]))
            })
            .collect();
        frame.render_widget(List::new(items), inner);
    }
}
