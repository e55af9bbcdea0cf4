//! Application loop for the TUI.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Tabs, Wrap};
use ratatui::{Frame, Terminal};

use crate::app::view::{BrowserView, ViewCommand, ViewContext, ViewOutcome};
use crate::infra::clipboard::{ClipboardSink, SystemClipboard};
use crate::infra::config::Config;
use crate::infra::fs::LocalFileSystem;
use crate::infra::notify::{NotificationLevel, NotificationLog};
use crate::ui::components::listing::{ListingState, ListingView, RowKind};
use crate::ui::components::preview::Preview;
use crate::ui::components::summary::Summary;

const TICK_RATE: Duration = Duration::from_millis(120);
const STATUS_TTL: Duration = Duration::from_secs(4);
const PAGE_STEP: usize = 10;

/// A view together with the presentation state that belongs to it.
struct ViewTab {
    view: BrowserView,
    listing: ListingState,
    preview_scroll: u16,
}

impl ViewTab {
    fn new(view: BrowserView, fs: &LocalFileSystem) -> Self {
        let mut listing = ListingState::default();
        listing.refresh(&view, fs);
        Self {
            view,
            listing,
            preview_scroll: 0,
        }
    }

    fn label(&self) -> String {
        let dir = self.view.current_dir();
        dir.file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| dir.display().to_string())
    }
}

/// Primary entry point for running the interactive TUI.
pub struct UiApp {
    fs: LocalFileSystem,
    clipboard: Box<dyn ClipboardSink>,
    notifications: NotificationLog,
    tabs: Vec<ViewTab>,
    active: usize,
    listing_component: ListingView,
    preview_component: Preview,
    summary_component: Summary,
    should_quit: bool,
}

impl UiApp {
    /// One initial view rooted at `root`, copying through the system clipboard.
    pub fn new(config: Config, root: PathBuf, prefix: String) -> Self {
        let clipboard = SystemClipboard::new(config.clipboard.shell_fallback());
        Self::with_clipboard(&config, root, prefix, Box::new(clipboard))
    }

    pub fn with_clipboard(
        config: &Config,
        root: PathBuf,
        prefix: String,
        clipboard: Box<dyn ClipboardSink>,
    ) -> Self {
        let fs = LocalFileSystem::new();
        let view =
            BrowserView::new(root, prefix).with_preview_max_lines(config.defaults.preview_max_lines());
        let tabs = vec![ViewTab::new(view, &fs)];
        Self {
            fs,
            clipboard,
            notifications: NotificationLog::default(),
            tabs,
            active: 0,
            listing_component: ListingView,
            preview_component: Preview,
            summary_component: Summary::new(),
            should_quit: false,
        }
    }

    /// Launch the terminal UI and enter the event loop.
    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode().context("failed to enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("failed to initialize terminal")?;
        terminal.hide_cursor().ok();

        let event_loop_result = self.event_loop(&mut terminal);

        disable_raw_mode().ok();
        let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
        let _ = terminal.show_cursor();

        if let Err(err) = self.clipboard.persist() {
            tracing::warn!(error = %err, "clipboard contents may not outlive dirclip");
        }

        event_loop_result
    }

    pub fn notifications(&self) -> &NotificationLog {
        &self.notifications
    }

    pub fn view_count(&self) -> usize {
        self.tabs.len()
    }

    pub fn active_view(&self) -> &BrowserView {
        &self.tabs[self.active].view
    }

    pub fn active_listing(&self) -> &ListingState {
        &self.tabs[self.active].listing
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            terminal.draw(|frame| self.render(frame))?;

            if self.should_quit {
                break;
            }

            if event::poll(TICK_RATE)? {
                match event::read()? {
                    Event::Key(key) if key.kind != KeyEventKind::Release => {
                        self.handle_key_event(key)
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }

    pub fn render(&self, frame: &mut Frame<'_>) {
        let size = frame.size();
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(3),
                Constraint::Length(2),
            ])
            .split(size);

        let main_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(40), Constraint::Length(36)])
            .split(layout[1]);

        let right_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(5), Constraint::Length(7)])
            .split(main_chunks[1]);

        self.render_tabs(frame, layout[0]);

        let tab = &self.tabs[self.active];
        match tab.view.preview() {
            Some(document) => self.preview_component.render(
                document,
                tab.preview_scroll,
                main_chunks[0],
                frame.buffer_mut(),
            ),
            None => self.listing_component.render(
                frame,
                main_chunks[0],
                &tab.listing,
                &tab.view,
            ),
        }

        self.summary_component
            .render(frame, right_chunks[0], &tab.view, &self.fs);
        frame.render_widget(key_hints(), right_chunks[1]);

        self.render_status(frame, layout[2]);
    }

    fn render_tabs(&self, frame: &mut Frame<'_>, area: Rect) {
        let titles: Vec<Line> = self
            .tabs
            .iter()
            .enumerate()
            .map(|(index, tab)| Line::from(format!("{} {}", index + 1, tab.label())))
            .collect();
        let tabs = Tabs::new(titles)
            .select(self.active)
            .style(Style::default().fg(Color::Gray))
            .highlight_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_widget(tabs, area);
    }

    fn render_status(&self, frame: &mut Frame<'_>, area: Rect) {
        let message = self
            .notifications
            .latest()
            .filter(|notification| !notification.is_older_than(STATUS_TTL))
            .map(|notification| {
                let style = match notification.level {
                    NotificationLevel::Info => Style::default().fg(Color::Gray),
                    NotificationLevel::Success => Style::default().fg(Color::Green),
                    NotificationLevel::Error => Style::default().fg(Color::Red),
                };
                Line::from(vec![
                    Span::styled(
                        format!("{}: ", notification.title()),
                        style.add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(notification.message.clone(), style),
                ])
            });

        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let line = message.unwrap_or_else(|| {
            Line::styled(
                "Ready · space tick · y copy · q quit",
                Style::default().fg(Color::DarkGray),
            )
        });
        frame.render_widget(Paragraph::new(line), inner);
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            if matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q')) {
                self.should_quit = true;
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Tab => self.switch_view(1),
            KeyCode::BackTab => self.switch_view(-1),
            KeyCode::Char('w') => self.close_active_view(),
            _ if self.tabs[self.active].view.preview().is_some() => self.handle_preview_key(key),
            _ => self.handle_listing_key(key),
        }
    }

    fn handle_preview_key(&mut self, key: KeyEvent) {
        let tab = &mut self.tabs[self.active];
        match key.code {
            KeyCode::Esc | KeyCode::Char('h') | KeyCode::Left | KeyCode::Backspace => {
                tab.preview_scroll = 0;
                self.dispatch(ViewCommand::ClosePreview);
            }
            KeyCode::Char('j') | KeyCode::Down => {
                tab.preview_scroll = tab.preview_scroll.saturating_add(1)
            }
            KeyCode::Char('k') | KeyCode::Up => {
                tab.preview_scroll = tab.preview_scroll.saturating_sub(1)
            }
            KeyCode::PageDown => {
                tab.preview_scroll = tab.preview_scroll.saturating_add(PAGE_STEP as u16)
            }
            KeyCode::PageUp => {
                tab.preview_scroll = tab.preview_scroll.saturating_sub(PAGE_STEP as u16)
            }
            KeyCode::Char('g') | KeyCode::Home => tab.preview_scroll = 0,
            _ => {}
        }
    }

    fn handle_listing_key(&mut self, key: KeyEvent) {
        let listing = &mut self.tabs[self.active].listing;
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => listing.select_next(),
            KeyCode::Char('k') | KeyCode::Up => listing.select_previous(),
            KeyCode::Char('g') | KeyCode::Home => listing.select_first(),
            KeyCode::Char('G') | KeyCode::End => listing.select_last(),
            KeyCode::PageDown => listing.page_down(PAGE_STEP),
            KeyCode::PageUp => listing.page_up(PAGE_STEP),
            KeyCode::Char('r') => self.refresh_active(),
            KeyCode::Char('a') => self.dispatch(ViewCommand::SelectAllVisible),
            KeyCode::Char('y') | KeyCode::Char('c') => self.dispatch(ViewCommand::Copy),
            KeyCode::Char('h') | KeyCode::Left | KeyCode::Backspace => {
                self.dispatch(ViewCommand::Parent)
            }
            KeyCode::Char(' ') => {
                if let Some(command) = self.row_command(RowAction::Toggle) {
                    self.dispatch(command);
                }
            }
            KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => {
                if let Some(command) = self.row_command(RowAction::OpenHere) {
                    self.dispatch(command);
                }
            }
            KeyCode::Char('o') => {
                if let Some(command) = self.row_command(RowAction::OpenNewView) {
                    self.dispatch(command);
                }
            }
            _ => {}
        }
    }

    /// Translate an action on the highlighted row into a command carrying that row's path.
    fn row_command(&self, action: RowAction) -> Option<ViewCommand> {
        let tab = &self.tabs[self.active];
        let row = tab.listing.selected_row()?;
        let command = match (action, row.kind) {
            (RowAction::Toggle, RowKind::Parent) => return None,
            (RowAction::Toggle, _) => ViewCommand::Toggle {
                path: row.path.clone(),
                selected: !tab.view.is_selected(&row.path),
            },
            (RowAction::OpenHere, RowKind::Parent) => ViewCommand::Parent,
            (RowAction::OpenHere, RowKind::Folder) => ViewCommand::Enter(row.path.clone()),
            (RowAction::OpenHere, RowKind::File) => ViewCommand::OpenFile(row.path.clone()),
            (RowAction::OpenNewView, RowKind::Parent) => ViewCommand::OpenParentInNewView,
            (RowAction::OpenNewView, _) => ViewCommand::OpenInNewView(row.path.clone()),
        };
        Some(command)
    }

    fn dispatch(&mut self, command: ViewCommand) {
        let tab = &mut self.tabs[self.active];
        let mut ctx = ViewContext {
            fs: &self.fs,
            clipboard: self.clipboard.as_mut(),
            notifier: &mut self.notifications,
        };
        let outcome = tab.view.dispatch(command, &mut ctx);
        tab.listing.refresh(&tab.view, &self.fs);

        if let ViewOutcome::Spawn(view) = outcome {
            let tab = ViewTab::new(*view, &self.fs);
            self.active += 1;
            self.tabs.insert(self.active, tab);
        }
    }

    fn refresh_active(&mut self) {
        let tab = &mut self.tabs[self.active];
        tab.listing.refresh(&tab.view, &self.fs);
    }

    fn switch_view(&mut self, step: isize) {
        let count = self.tabs.len() as isize;
        self.active = (self.active as isize + step).rem_euclid(count) as usize;
        self.refresh_active();
    }

    fn close_active_view(&mut self) {
        if self.tabs.len() == 1 {
            self.should_quit = true;
            return;
        }
        self.tabs.remove(self.active);
        if self.active >= self.tabs.len() {
            self.active = self.tabs.len() - 1;
        }
        self.refresh_active();
    }
}

#[derive(Debug, Clone, Copy)]
enum RowAction {
    Toggle,
    OpenHere,
    OpenNewView,
}

fn key_hints() -> Paragraph<'static> {
    let key = Style::default().fg(Color::Cyan);
    Paragraph::new(vec![
        Line::from(vec![
            Span::styled("j/k", key),
            Span::raw(" move · "),
            Span::styled("space", key),
            Span::raw(" tick"),
        ]),
        Line::from(vec![
            Span::styled("a", key),
            Span::raw(" tick all · "),
            Span::styled("y", key),
            Span::raw(" copy"),
        ]),
        Line::from(vec![
            Span::styled("↵", key),
            Span::raw(" open · "),
            Span::styled("o", key),
            Span::raw(" new view"),
        ]),
        Line::from(vec![
            Span::styled("h", key),
            Span::raw(" parent · "),
            Span::styled("tab", key),
            Span::raw(" views · "),
            Span::styled("w", key),
            Span::raw(" close"),
        ]),
    ])
    .block(Block::default().borders(Borders::ALL).title("Keys"))
    .wrap(Wrap { trim: true })
    .style(Style::default().fg(Color::Gray))
}
