//! Preview component rendering an opened file with line numbers.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::app::preview::PreviewDocument;

/// Ratatui component responsible for displaying an opened file.
#[derive(Debug, Default)]
pub struct Preview;

impl Preview {
    pub fn render(
        &self,
        document: &PreviewDocument,
        scroll: u16,
        area: Rect,
        buf: &mut Buffer,
    ) {
        let title = format!(
            "{} ({} bytes) · esc to close",
            document.title(),
            document.total_bytes
        );

        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(area);
        block.render(area, buf);

        let width = document.lines.len().max(1).to_string().len();
        let mut lines = Vec::with_capacity(document.lines.len() + 2);
        if let Some(notice) = &document.notice {
            lines.push(Line::styled(
                notice.clone(),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ));
        }

        for (idx, line) in document.lines.iter().enumerate() {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("{:>width$} │ ", idx + 1),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw(line.clone()),
            ]));
        }

        if document.truncated {
            lines.push(Line::styled(
                "… truncated",
                Style::default().fg(Color::Yellow),
            ));
        }

        if document.lines.is_empty() && document.notice.is_none() {
            lines.push(Line::styled(
                "(empty file)",
                Style::default().fg(Color::DarkGray),
            ));
        }

        let paragraph = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((scroll, 0));
        ratatui::widgets::Widget::render(paragraph, inner, buf);
    }
}
