// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Panorama-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Panorama and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Terminal UI.
//!
//! Hosts a [`ViewTreeManager`] in a ratatui + crossterm panel, including a built-in demo forest.

use std::{
    error::Error,
    io,
    time::{Duration, Instant},
};

use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    layout::Flex,
    prelude::*,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};

use crate::drag::{DragGesture, DragHint, DropTarget};
use crate::keys::{shortcut_for, Shortcut};
use crate::manager::{ManagerConfig, ViewError, ViewTreeManager};
use crate::model::{DiagramId, IdError, OwnerId, Pan, View, ViewId, ViewportDelta};
use crate::notice::NoticeLevel;
use crate::ops::{self, MoveDirection};
use crate::sort::TreeRow;
use crate::store::{MemoryStore, ViewStore};

mod theme;

use theme::TuiTheme;

const FOOTER_LABEL_COLOR: Color = Color::Gray;
const FOOTER_KEY_COLOR: Color = Color::Cyan;
const FOOTER_BRAND_COLOR: Color = Color::White;
const FOOTER_BRAND: &str = "🅿 🅰 🅽 🅾 🆁 🅰 🅼 🅰 ";
const COLLAPSED_PANEL_WIDTH: u16 = 3;
const TOAST_TTL: Duration = Duration::from_secs(2);
const ZOOM_STEP: f64 = 1.25;
const PAN_STEP: f64 = 10.0;
// Drag displacement is measured in layout units, roughly one glyph per terminal cell.
const COLUMN_UNITS: f64 = 8.0;
const ROW_UNITS: f64 = 16.0;

pub const DEMO_DIAGRAM_ID: &str = "checkout-flow";
pub const DEMO_OWNER_ID: &str = "demo";

/// Runs the panel against an in-memory store seeded with [`demo_views`].
pub fn run_demo() -> Result<(), Box<dyn Error>> {
    let diagram_id = DiagramId::new(DEMO_DIAGRAM_ID)?;
    let owner_id = OwnerId::new(DEMO_OWNER_ID)?;
    let store = MemoryStore::with_views(&diagram_id, &owner_id, demo_views()?);
    run(store, diagram_id, owner_id, ManagerConfig::default())
}

/// Runs the interactive panel until the user quits.
///
/// Manager futures are driven on a current-thread runtime, one input event at a time.
pub fn run<S: ViewStore>(
    store: S,
    diagram_id: DiagramId,
    owner_id: OwnerId,
    config: ManagerConfig,
) -> Result<(), Box<dyn Error>> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    let theme = TuiTheme::from_env()?;

    let mut manager = ViewTreeManager::with_config(store, diagram_id, owner_id, config);
    // Load failures are queued as a notice and show up as the first toast.
    let _ = runtime.block_on(manager.load());
    let mut app = App::new(manager, theme);

    let mut terminal = TerminalSession::new()?;
    while !app.should_quit {
        terminal.draw(|frame| draw(frame, &mut app))?;

        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    runtime.block_on(app.handle_key(key));
                }
                Event::Mouse(mouse) => runtime.block_on(app.handle_mouse(mouse)),
                _ => {}
            }
        }
    }

    Ok(())
}

fn draw<S: ViewStore>(frame: &mut Frame<'_>, app: &mut App<S>) {
    app.expire_toast();
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);
    let header_area = layout[0];
    let main_area = layout[1];
    let status_area = layout[2];

    frame.render_widget(Paragraph::new(viewport_header_line(app)), header_area);

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(panel_width(main_area, app.panel_collapsed)),
            Constraint::Min(0),
        ])
        .split(main_area);
    let panel_area = panes[0];
    let detail_area = panes[1];

    if app.panel_collapsed {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(app.theme.panel_border_style(false));
        frame.render_widget(Paragraph::new("▸").block(block), panel_area);
        app.list_area = Rect::default();
    } else {
        render_tree(frame, app, panel_area);
    }

    let detail = Paragraph::new(Text::from(detail_lines(app)))
        .style(app.theme.base_style())
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(view_title("Viewport", None)),
        );
    frame.render_widget(detail, detail_area);

    let toast = app.toast.clone();
    let footer = match &app.input {
        InputMode::Normal => footer_help_line(app, toast.as_ref()),
        InputMode::Prompt(prompt) => prompt_footer_line(prompt, toast.as_ref(), &app.theme),
        InputMode::Search(search) => search_footer_line(search, toast.as_ref(), &app.theme),
        InputMode::ConfirmDelete(view_id) => {
            let name = app.manager.view(view_id).map(View::name).unwrap_or("?");
            confirm_footer_line(name, &app.theme)
        }
    };
    frame.render_widget(Paragraph::new(footer), status_area);

    match &app.input {
        InputMode::Normal => {
            let brand = Paragraph::new(footer_brand_line()).alignment(Alignment::Right);
            frame.render_widget(brand, status_area);
        }
        InputMode::Prompt(prompt) => {
            let prefix = prompt.kind.label().chars().count() + 2;
            let cursor_x = status_area
                .x
                .saturating_add((prefix + prompt.buffer.chars().count()) as u16)
                .min(status_area.right().saturating_sub(1));
            frame.set_cursor_position((cursor_x, status_area.y));
        }
        InputMode::Search(_) | InputMode::ConfirmDelete(_) => {}
    }

    if app.show_help {
        render_help(frame, main_area);
    }
}

fn render_tree<S: ViewStore>(frame: &mut Frame<'_>, app: &mut App<S>, area: Rect) {
    let rows = app.manager.rows();
    let cursor = app.list_state.selected();
    let nest_target = app.drag.as_ref().and_then(|gesture| match gesture.hint() {
        DragHint::Nest { target } => Some(target.clone()),
        DragHint::Reorder => None,
    });

    let items = rows
        .iter()
        .enumerate()
        .map(|(row_idx, row)| {
            let view = &app.manager.views()[row.index];
            let style = if nest_target.as_ref() == Some(view.view_id()) {
                app.theme.drop_target_style()
            } else if cursor == Some(row_idx) {
                app.theme.cursor_style()
            } else {
                app.theme.base_style()
            };
            ListItem::new(tree_row_line(view, row, style, &app.theme))
        })
        .collect::<Vec<_>>();

    let tail = format!(
        "— {} · {}",
        app.manager.views().len(),
        app.manager.sort_mode().label()
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .title(view_title("Views", Some(tail.as_str())))
        .border_style(app.theme.panel_border_style(true));
    app.list_area = block.inner(area);

    let list = List::new(items).block(block).highlight_style(Style::default());
    frame.render_stateful_widget(list, area, &mut app.list_state);
}

// Extracted title/row/footer/help rendering helpers.
include!("chrome.rs");

#[derive(Debug, Clone)]
struct Toast {
    message: String,
    level: NoticeLevel,
    expires_at: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PromptKind {
    Save,
    Rename,
    Comment,
}

impl PromptKind {
    fn label(self) -> &'static str {
        match self {
            Self::Save => "Save view as",
            Self::Rename => "Rename to",
            Self::Comment => "Comment",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Prompt {
    kind: PromptKind,
    target: Option<ViewId>,
    buffer: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct SearchState {
    query: String,
    /// View array indices, best match first.
    results: Vec<usize>,
    index: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
enum InputMode {
    #[default]
    Normal,
    Prompt(Prompt),
    Search(SearchState),
    ConfirmDelete(ViewId),
}

struct App<S> {
    manager: ViewTreeManager<S>,
    theme: TuiTheme,
    list_state: ListState,
    /// Inner area of the tree list from the last draw, for mouse hit testing.
    list_area: Rect,
    input: InputMode,
    drag: Option<DragGesture>,
    panel_collapsed: bool,
    show_help: bool,
    toast: Option<Toast>,
    should_quit: bool,
}

impl<S: ViewStore> App<S> {
    fn new(manager: ViewTreeManager<S>, theme: TuiTheme) -> Self {
        let mut app = Self {
            manager,
            theme,
            list_state: ListState::default(),
            list_area: Rect::default(),
            input: InputMode::Normal,
            drag: None,
            panel_collapsed: false,
            show_help: false,
            toast: None,
            should_quit: false,
        };
        app.absorb_notices();
        app.sync_cursor_to_selection();
        app
    }

    async fn handle_key(&mut self, key: KeyEvent) {
        match std::mem::take(&mut self.input) {
            InputMode::Normal => self.handle_normal_key(key).await,
            InputMode::Prompt(prompt) => self.handle_prompt_key(prompt, key).await,
            InputMode::Search(search) => self.handle_search_key(search, key),
            InputMode::ConfirmDelete(view_id) => self.handle_confirm_key(view_id, key).await,
        }
        self.absorb_notices();
    }

    async fn handle_normal_key(&mut self, key: KeyEvent) {
        if self.show_help {
            match key.code {
                KeyCode::Esc | KeyCode::Char('?') => self.show_help = false,
                KeyCode::Char('q') => self.should_quit = true,
                _ => {}
            }
            return;
        }

        if let Some(shortcut) = shortcut_for(key) {
            match shortcut {
                Shortcut::Undo => self.manager.undo().await,
                Shortcut::Redo => self.manager.redo().await,
            };
            self.sync_cursor_to_selection();
            return;
        }
        if key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::SUPER | KeyModifiers::ALT)
        {
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Char('p') => self.panel_collapsed = !self.panel_collapsed,
            KeyCode::Char('j') | KeyCode::Down => self.cursor_by(1),
            KeyCode::Char('k') | KeyCode::Up => self.cursor_by(-1),
            KeyCode::Home => self.cursor_to(0),
            KeyCode::End => self.cursor_to(usize::MAX),
            KeyCode::Enter => self.load_cursor_view(),
            KeyCode::Char('J') => self.move_selected(MoveDirection::Down).await,
            KeyCode::Char('K') => self.move_selected(MoveDirection::Up).await,
            KeyCode::Char('H') => self.move_selected(MoveDirection::Left).await,
            KeyCode::Char('L') => self.move_selected(MoveDirection::Right).await,
            KeyCode::Char('n') => self.open_prompt(PromptKind::Save, None, String::new()),
            KeyCode::Char('r') => {
                if let Some(view) = self.manager.selected_view() {
                    let (view_id, name) = (view.view_id().clone(), view.name().to_owned());
                    self.open_prompt(PromptKind::Rename, Some(view_id), name);
                } else {
                    self.warn_no_selection();
                }
            }
            KeyCode::Char('c') => match self.manager.selected().cloned() {
                Some(view_id) => self.open_prompt(PromptKind::Comment, Some(view_id), String::new()),
                None => self.warn_no_selection(),
            },
            KeyCode::Char('x') => match self.manager.selected().cloned() {
                Some(view_id) => self.input = InputMode::ConfirmDelete(view_id),
                None => self.warn_no_selection(),
            },
            KeyCode::Char(' ') => match self.manager.selected().cloned() {
                Some(view_id) => {
                    let _ = self.manager.toggle_group(&view_id);
                    self.sync_cursor_to_selection();
                }
                None => self.warn_no_selection(),
            },
            KeyCode::Char('u') => match self.manager.selected().cloned() {
                Some(view_id) => {
                    if self.manager.refresh_view(&view_id).await.is_ok() {
                        self.set_toast(NoticeLevel::Success, "View updated from viewport");
                    }
                }
                None => self.warn_no_selection(),
            },
            KeyCode::Char('o') => {
                let sort = self.manager.cycle_sort_mode();
                self.set_toast(NoticeLevel::Info, format!("Sort: {}", sort.label()));
                self.sync_cursor_to_selection();
            }
            KeyCode::Char('/') => self.input = InputMode::Search(SearchState::default()),
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.manager.zoom_at(ZOOM_STEP, Pan::default());
            }
            KeyCode::Char('-') => self.manager.zoom_at(1.0 / ZOOM_STEP, Pan::default()),
            KeyCode::Left => self.manager.pan_by(-PAN_STEP, 0.0),
            KeyCode::Right => self.manager.pan_by(PAN_STEP, 0.0),
            KeyCode::PageUp => self.manager.pan_by(0.0, -PAN_STEP),
            KeyCode::PageDown => self.manager.pan_by(0.0, PAN_STEP),
            _ => {}
        }
    }

    async fn handle_prompt_key(&mut self, mut prompt: Prompt, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {}
            KeyCode::Enter => self.submit_prompt(prompt).await,
            KeyCode::Backspace => {
                prompt.buffer.pop();
                self.input = InputMode::Prompt(prompt);
            }
            KeyCode::Char(ch) => {
                prompt.buffer.push(ch);
                self.input = InputMode::Prompt(prompt);
            }
            _ => self.input = InputMode::Prompt(prompt),
        }
    }

    async fn submit_prompt(&mut self, prompt: Prompt) {
        let result = match (prompt.kind, &prompt.target) {
            (PromptKind::Save, _) => match self.manager.save_view(&prompt.buffer).await {
                Ok(view_id) => {
                    let _ = self.manager.select(&view_id);
                    Ok(())
                }
                Err(err) => Err(err),
            },
            (PromptKind::Rename, Some(view_id)) => {
                self.manager.rename_view(view_id, &prompt.buffer).await
            }
            (PromptKind::Comment, Some(view_id)) => self
                .manager
                .add_comment(&prompt.buffer, Some(view_id.clone()))
                .await
                .map(|_| ()),
            (PromptKind::Rename | PromptKind::Comment, None) => Ok(()),
        };

        // Blank input keeps the prompt open so the user can type a name.
        if matches!(result, Err(ViewError::EmptyName | ViewError::EmptyComment)) {
            self.input = InputMode::Prompt(prompt);
        }
        self.sync_cursor_to_selection();
    }

    fn handle_search_key(&mut self, mut search: SearchState, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Enter => return,
            KeyCode::Backspace => {
                search.query.pop();
                self.update_search(&mut search);
            }
            KeyCode::Char(ch) => {
                search.query.push(ch);
                self.update_search(&mut search);
            }
            KeyCode::Down if !search.results.is_empty() => {
                search.index = (search.index + 1) % search.results.len();
                self.jump_to_search_result(&search);
            }
            KeyCode::Up if !search.results.is_empty() => {
                search.index = search
                    .index
                    .checked_sub(1)
                    .unwrap_or(search.results.len() - 1);
                self.jump_to_search_result(&search);
            }
            _ => {}
        }
        self.input = InputMode::Search(search);
    }

    async fn handle_confirm_key(&mut self, view_id: ViewId, key: KeyEvent) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('x') => {
                let _ = self.manager.delete_view(&view_id).await;
                self.sync_cursor_to_selection();
            }
            _ => self.set_toast(NoticeLevel::Info, "Delete cancelled"),
        }
    }

    async fn handle_mouse(&mut self, mouse: MouseEvent) {
        if self.panel_collapsed || self.show_help || self.input != InputMode::Normal {
            return;
        }

        let pointer = pointer_units(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let Some(row) = self.row_at(mouse.column, mouse.row) else {
                    return;
                };
                let rows = self.manager.rows();
                self.select_row(row, &rows);
                if let Some(view_id) = self.manager.selected().cloned() {
                    let threshold = self.manager.config().nest_threshold;
                    self.drag = Some(DragGesture::with_threshold(view_id, pointer, threshold));
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                let hover = self.drop_target_at(mouse.column, mouse.row);
                if let Some(gesture) = self.drag.as_mut() {
                    gesture.update(pointer, hover.as_ref());
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let Some(gesture) = self.drag.take() else {
                    return;
                };
                let drop = self.drop_target_at(mouse.column, mouse.row);
                if let Some(action) = gesture.finish(pointer, drop.as_ref()) {
                    let _ = self.manager.apply_drop(action).await;
                    self.sync_cursor_to_selection();
                }
            }
            MouseEventKind::ScrollDown => self.cursor_by(1),
            MouseEventKind::ScrollUp => self.cursor_by(-1),
            _ => {}
        }
        self.absorb_notices();
    }

    fn open_prompt(&mut self, kind: PromptKind, target: Option<ViewId>, buffer: String) {
        self.input = InputMode::Prompt(Prompt {
            kind,
            target,
            buffer,
        });
    }

    async fn move_selected(&mut self, direction: MoveDirection) {
        let _ = self.manager.move_selected(direction).await;
        self.sync_cursor_to_selection();
    }

    fn load_cursor_view(&mut self) {
        let rows = self.manager.rows();
        let Some(row) = self.list_state.selected().and_then(|idx| rows.get(idx)) else {
            return;
        };
        let view_id = self.manager.views()[row.index].view_id().clone();
        if let Ok(viewport) = self.manager.load_view(&view_id) {
            self.set_toast(
                NoticeLevel::Info,
                format!("Viewport {} {}", zoom_label(viewport.zoom()), pan_label(viewport.pan())),
            );
        }
    }

    fn update_search(&mut self, search: &mut SearchState) {
        search.results = self.manager.search(&search.query);
        search.index = 0;
        self.jump_to_search_result(search);
    }

    fn jump_to_search_result(&mut self, search: &SearchState) {
        let Some(&index) = search.results.get(search.index) else {
            return;
        };
        let Some(view) = self.manager.views().get(index) else {
            return;
        };
        let view_id = view.view_id().clone();
        self.reveal(&view_id);
        let _ = self.manager.select(&view_id);
        self.sync_cursor_to_selection();
    }

    /// Expands every collapsed ancestor of `view_id` so its row is visible.
    fn reveal(&mut self, view_id: &ViewId) {
        let views = self.manager.views();
        let mut collapsed = Vec::new();
        let mut current = self
            .manager
            .view(view_id)
            .and_then(|view| ops::effective_parent(views, view))
            .cloned();
        let mut steps = 0usize;
        while let Some(parent_id) = current {
            steps += 1;
            if steps > views.len() {
                break;
            }
            let Some(parent) = self.manager.view(&parent_id) else {
                break;
            };
            current = ops::effective_parent(views, parent).cloned();
            if !parent.expanded() {
                collapsed.push(parent_id);
            }
        }

        for parent_id in collapsed {
            let _ = self.manager.toggle_group(&parent_id);
        }
    }

    fn cursor_by(&mut self, delta: isize) {
        let rows = self.manager.rows();
        if rows.is_empty() {
            return;
        }
        let current = self.list_state.selected().unwrap_or(0) as isize;
        let next = (current + delta).clamp(0, rows.len() as isize - 1) as usize;
        self.select_row(next, &rows);
    }

    fn cursor_to(&mut self, row: usize) {
        let rows = self.manager.rows();
        if rows.is_empty() {
            return;
        }
        self.select_row(row.min(rows.len() - 1), &rows);
    }

    fn select_row(&mut self, row: usize, rows: &[TreeRow]) {
        let Some(tree_row) = rows.get(row) else {
            return;
        };
        let view_id = self.manager.views()[tree_row.index].view_id().clone();
        if self.manager.select(&view_id).is_ok() {
            self.list_state.select(Some(row));
        }
    }

    /// Puts the cursor on the selected view's row, or selects the row under the cursor.
    fn sync_cursor_to_selection(&mut self) {
        let rows = self.manager.rows();
        if rows.is_empty() {
            self.list_state.select(None);
            return;
        }

        let selected_row = self.manager.selected().and_then(|selected| {
            rows.iter()
                .position(|row| self.manager.views()[row.index].view_id() == selected)
        });
        match selected_row {
            Some(row) => self.list_state.select(Some(row)),
            None => {
                let row = self.list_state.selected().unwrap_or(0).min(rows.len() - 1);
                self.select_row(row, &rows);
            }
        }
    }

    fn row_at(&self, column: u16, row: u16) -> Option<usize> {
        let area = self.list_area;
        if column < area.x || column >= area.right() || row < area.y || row >= area.bottom() {
            return None;
        }
        let row = self.list_state.offset() + usize::from(row - area.y);
        (row < self.manager.rows().len()).then_some(row)
    }

    fn drop_target_at(&self, column: u16, row: u16) -> Option<DropTarget> {
        let row = self.row_at(column, row)?;
        let index = self.manager.rows().get(row)?.index;
        Some(DropTarget {
            view_id: self.manager.views()[index].view_id().clone(),
            index,
        })
    }

    fn warn_no_selection(&mut self) {
        self.set_toast(NoticeLevel::Warning, "Select a view first");
    }

    /// Shows the most severe of the queued notices, latest first among equals.
    fn absorb_notices(&mut self) {
        let notice = self
            .manager
            .drain_notices()
            .into_iter()
            .max_by_key(|notice| severity(notice.level));
        if let Some(notice) = notice {
            self.set_toast(notice.level, notice.message);
        }
    }

    fn set_toast(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.toast = Some(Toast {
            message: message.into(),
            level,
            expires_at: Instant::now() + TOAST_TTL,
        });
    }

    fn expire_toast(&mut self) {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| toast.expires_at <= Instant::now())
        {
            self.toast = None;
        }
    }
}

fn severity(level: NoticeLevel) -> u8 {
    match level {
        NoticeLevel::Info => 0,
        NoticeLevel::Success => 1,
        NoticeLevel::Warning => 2,
        NoticeLevel::Error => 3,
    }
}

fn pointer_units(column: u16, row: u16) -> Pan {
    Pan::new(f64::from(column) * COLUMN_UNITS, f64::from(row) * ROW_UNITS)
}

struct TerminalSession {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self, Box<dyn Error>> {
        enable_raw_mode()?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture).map_err(|err| {
            teardown_terminal();
            err
        })?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).map_err(|err| {
            teardown_terminal();
            err
        })?;
        terminal.clear().map_err(|err| {
            teardown_terminal();
            err
        })?;

        Ok(Self { terminal })
    }

    fn draw(&mut self, draw_fn: impl FnOnce(&mut Frame<'_>)) -> io::Result<()> {
        self.terminal.draw(draw_fn)?;
        Ok(())
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
        teardown_terminal();
    }
}

fn teardown_terminal() {
    let _ = disable_raw_mode();
    let mut stdout = io::stdout();
    let _ = execute!(stdout, DisableMouseCapture, LeaveAlternateScreen);
}

/// A small saved-view forest for a checkout flow diagram.
pub fn demo_views() -> Result<Vec<View>, IdError> {
    const BASE_TIMESTAMP: u64 = 1_767_225_600_000;
    let view = |id: &str, name: &str, zoom: f64, pan: (f64, f64), minutes: u64| {
        ViewId::new(id).map(|view_id| {
            View::new(view_id, name, zoom, Pan::new(pan.0, pan.1))
                .with_timestamp(BASE_TIMESTAMP + minutes * 60_000)
        })
    };
    let child = |view: View, parent: &str| -> Result<View, IdError> {
        Ok(view.with_parent(Some(ViewId::new(parent)?)))
    };

    let mut views = vec![
        view("overview", "Overview", 1.0, (0.0, 0.0), 0)?,
        view("payments", "Payments", 1.6, (-240.0, 80.0), 5)?,
        child(view("card-form", "Card form", 2.4, (-320.0, 120.0), 9)?, "payments")?,
        child(view("fraud-check", "Fraud check", 2.0, (-180.0, 210.0), 14)?, "payments")?,
        view("shipping", "Shipping", 1.4, (260.0, 40.0), 21)?,
        child(view("address", "Address lookup", 2.2, (300.0, 10.0), 25)?, "shipping")?,
        child(view("rates", "Carrier rates", 3.0, (340.0, 160.0), 32)?, "shipping")?,
        view("errors", "Error states", 0.8, (0.0, 420.0), 40)?,
    ];
    if let Some(payments) = views.iter_mut().find(|v| v.view_id().as_str() == "payments") {
        payments.set_expanded(true);
    }
    Ok(views)
}
