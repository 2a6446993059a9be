//! Terminal kiosk: demo screens with the on-screen keyboard docked at the
//! bottom.
//!
//! Mouse presses stand in for touch. A press on a field dispatches a
//! pointer-down and focuses it; a press on the keyboard tray hits a key
//! without moving focus; every release dispatches touch-end on the field
//! under the pointer.

// Terminal coordinates are small
#![allow(clippy::cast_possible_truncation)]

pub mod screens;
pub mod surface;
pub mod text_input;
pub mod theme;

use anyhow::{Context, Result};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout as RatatuiLayout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io;
use std::rc::Rc;
use std::time::Duration;

use crate::config::Config;
use crate::document::{Document, Element, NodeId, Role};
use crate::editing::{self, Declined};
use crate::field::{announce_change, same_field, EditableField, FieldHandle};
use crate::models::{KeyToken, KeyboardLayout};
use crate::store::{KeyOutcome, KeyboardProvider, KeyboardStore, ObserverId};

pub use screens::{Screen, ScreenKind};
pub use surface::{KeyboardSurface, SurfaceAction, SurfacePlan};
pub use text_input::TextInputWidget;
pub use theme::{Theme, ThemeVariant};

/// Everything the kiosk loop needs between frames.
#[derive(Debug)]
pub struct KioskApp {
    /// Loaded configuration
    pub config: Config,
    /// Active colors
    pub theme: Theme,
    document: Rc<Document>,
    provider: KeyboardProvider,
    screen: Option<Screen>,
    surface_node: NodeId,
    surface_plan: SurfacePlan,
    field_areas: Vec<(NodeId, Rect)>,
    observer: ObserverId,
    /// Message shown in the status line
    pub status: String,
    /// Set when the user asked to quit
    pub should_quit: bool,
}

impl KioskApp {
    /// Builds the document, mounts the provider and the first screen.
    pub fn new(config: Config) -> Result<Self> {
        let theme = Theme::from_mode(config.ui.theme_mode);
        let document = Document::new();
        let provider = KeyboardProvider::mount_with_state(
            Rc::clone(&document),
            config.keyboard.initial_state(),
        );
        let surface_node = document
            .append(document.root(), Element::new(Role::KeyboardSurface))
            .context("Failed to mount keyboard surface")?;
        let observer = provider.store().subscribe(|state| {
            tracing::debug!(
                visible = state.visible,
                layout = %state.layout,
                "keyboard state changed"
            );
        });

        let mut app = Self {
            config,
            theme,
            document,
            provider,
            screen: None,
            surface_node,
            surface_plan: SurfacePlan::default(),
            field_areas: Vec::new(),
            observer,
            status: String::from("Tap a field to type"),
            should_quit: false,
        };
        app.switch_screen(ScreenKind::Login)?;
        Ok(app)
    }

    /// The keyboard store shared with every input.
    #[must_use]
    pub fn store(&self) -> KeyboardStore {
        self.provider.store()
    }

    /// The document hosting the screens.
    #[must_use]
    pub const fn document(&self) -> &Rc<Document> {
        &self.document
    }

    /// Currently mounted screen.
    #[must_use]
    pub const fn screen(&self) -> Option<&Screen> {
        self.screen.as_ref()
    }

    /// Unmounts the current screen and mounts `kind`.
    pub fn switch_screen(&mut self, kind: ScreenKind) -> Result<()> {
        if self.screen.as_ref().is_some_and(|s| s.kind() == kind) {
            return Ok(());
        }
        self.screen = None;
        self.field_areas.clear();
        let screen = Screen::mount(kind, &self.document, &self.store())
            .with_context(|| format!("Failed to mount {} screen", kind.title()))?;
        tracing::info!(screen = kind.title(), "switched screen");
        self.screen = Some(screen);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------

    /// Handles a key press.
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return Ok(());
        }

        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab => {
                self.document.focus_next();
            }
            KeyCode::BackTab => {
                self.document.focus_previous();
            }
            KeyCode::F(n @ 1..=4) => {
                self.switch_screen(ScreenKind::ALL[usize::from(n - 1)])?;
            }
            KeyCode::F(5) => {
                let store = self.store();
                if store.is_visible() {
                    store.hide_keyboard();
                } else {
                    store.show_keyboard();
                }
            }
            KeyCode::Left => self.move_caret(-1),
            KeyCode::Right => self.move_caret(1),
            KeyCode::Home => self.move_caret(isize::MIN),
            KeyCode::End => self.move_caret(isize::MAX),
            KeyCode::Enter => self.type_key(&KeyToken::Enter),
            KeyCode::Backspace => self.type_key(&KeyToken::Backspace),
            KeyCode::Char(' ') => self.type_key(&KeyToken::Space),
            KeyCode::Char(c) => self.type_key(&KeyToken::from(c)),
            _ => {}
        }
        Ok(())
    }

    /// Handles a mouse event.
    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        let (column, row) = (mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if self.surface_plan.covers(column, row) {
                    self.document.pointer_down(self.surface_node);
                    if let Some(action) = self.surface_plan.hit_test(column, row).cloned() {
                        let outcome = KeyboardSurface::activate(&action, &self.store());
                        self.report(outcome.as_ref());
                    }
                } else if let Some(node) = self.field_at(column, row) {
                    self.document.pointer_down(node);
                    self.document.focus(node);
                } else {
                    self.document.pointer_down(self.document.root());
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if let Some(node) = self.field_at(column, row) {
                    self.document.touch_end(node);
                }
            }
            _ => {}
        }
    }

    fn field_at(&self, column: u16, row: u16) -> Option<NodeId> {
        self.field_areas
            .iter()
            .find(|(_, area)| surface::contains(*area, column, row))
            .map(|(node, _)| *node)
    }

    /// Routes a physical key.
    ///
    /// Keys for the keyboard's own target go through the store. Fields the
    /// keyboard never captured (opt-out screens) are edited directly with
    /// the full layout.
    fn type_key(&mut self, token: &KeyToken) {
        let Some(handle) = self.focused_field() else {
            self.status = Declined::NoTarget.to_string();
            return;
        };

        let store = self.store();
        let is_target = store.target().is_some_and(|t| same_field(&t, &handle));
        if is_target {
            let outcome = store.press(token);
            self.report(Some(&outcome));
            return;
        }

        let result = {
            let field = handle.borrow();
            let layout = KeyboardLayout::Default;
            editing::apply_key(field.value(), field.selection(), token, layout)
        };
        match result {
            Ok(edit) => {
                handle
                    .borrow_mut()
                    .set_value_and_selection(edit.value.clone(), edit.caret);
                announce_change(&handle);
                self.report(Some(&KeyOutcome::Applied(edit)));
            }
            Err(reason) => self.report(Some(&KeyOutcome::Declined(reason))),
        }
    }

    fn focused_field(&self) -> Option<FieldHandle> {
        self.document
            .focused()
            .and_then(|node| self.document.field(node))
    }

    fn move_caret(&mut self, delta: isize) {
        let Some(input) = self
            .document
            .focused()
            .and_then(|node| self.screen.as_ref()?.input(node))
        else {
            return;
        };
        let field = input.field();
        let mut field = field.borrow_mut();
        let caret = field.caret().saturating_add_signed(delta);
        field.set_selection(caret, caret);
    }

    fn report(&mut self, outcome: Option<&KeyOutcome>) {
        self.status = match outcome {
            Some(KeyOutcome::Applied(edit)) => format!("Typed, caret at {}", edit.caret),
            Some(KeyOutcome::Declined(reason)) => format!("Ignored: {reason}"),
            None => String::from("Keyboard hidden"),
        };
    }

    // ------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------

    /// Draws one frame and records hit areas for the next mouse event.
    pub fn render(&mut self, f: &mut Frame) {
        let full_bg = Block::default().style(Style::default().bg(self.theme.background));
        f.render_widget(full_bg, f.area());

        let state = self.store().snapshot();
        let keyboard_height = KeyboardSurface::height(state).min(f.area().height / 2);
        let chunks = RatatuiLayout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(3),
                Constraint::Length(3),
                Constraint::Length(keyboard_height),
            ])
            .split(f.area());

        self.render_tabs(f, chunks[0]);
        self.render_fields(f, chunks[1]);
        self.render_status(f, chunks[2]);
        self.surface_plan = KeyboardSurface::render(f, chunks[3], state, &self.theme);
    }

    fn render_tabs(&self, f: &mut Frame, area: Rect) {
        let active = self.screen.as_ref().map(Screen::kind);
        let mut spans = Vec::new();
        for (idx, kind) in ScreenKind::ALL.into_iter().enumerate() {
            let style = if Some(kind) == active {
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(self.theme.text_muted)
            };
            spans.push(Span::styled(format!(" F{} {} ", idx + 1, kind.title()), style));
        }

        let tabs = Paragraph::new(Line::from(spans)).block(
            Block::default()
                .title(format!(" {} ", crate::constants::APP_NAME))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(self.theme.primary)),
        );
        f.render_widget(tabs, area);
    }

    fn render_fields(&mut self, f: &mut Frame, area: Rect) {
        self.field_areas.clear();
        let Some(screen) = self.screen.as_ref() else {
            return;
        };

        let panel_style = if screen.kind().opts_out() {
            Style::default().fg(self.theme.muted_panel)
        } else {
            Style::default().fg(self.theme.primary)
        };
        let title = if screen.kind().opts_out() {
            format!(" {} (physical keyboard only) ", screen.kind().title())
        } else {
            format!(" {} ", screen.kind().title())
        };
        let panel = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(panel_style);
        let inner = panel.inner(area);
        f.render_widget(panel, area);

        let mut y = inner.y;
        let bottom = inner.y + inner.height;
        for input in screen.inputs() {
            let height = TextInputWidget::height(input);
            if y + height > bottom {
                break;
            }
            let field_area = Rect::new(inner.x, y, inner.width, height);
            TextInputWidget::render(f, field_area, input, &self.theme);
            self.field_areas.push((input.node(), field_area));
            y += height;
        }
    }

    fn render_status(&self, f: &mut Frame, area: Rect) {
        let state = self.store().snapshot();
        let keyboard = if state.visible {
            format!("keyboard: {}", state.layout)
        } else {
            String::from("keyboard: hidden")
        };
        let form = self
            .screen
            .as_ref()
            .map(|s| {
                s.form_values()
                    .iter()
                    .map(|(label, value)| format!("{label}={value:?}"))
                    .collect::<Vec<_>>()
                    .join("  ")
            })
            .unwrap_or_default();

        let line = Line::from(vec![
            Span::styled(keyboard, Style::default().fg(self.theme.accent)),
            Span::raw("  "),
            Span::styled(self.status.clone(), Style::default().fg(self.theme.text)),
            Span::raw("  "),
            Span::styled(form, Style::default().fg(self.theme.text_muted)),
        ]);
        let status = Paragraph::new(line)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .title(" Tab: next field  F5: keyboard  Esc: quit ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(self.theme.text_muted)),
            );
        f.render_widget(status, area);
    }
}

impl Drop for KioskApp {
    fn drop(&mut self) {
        self.screen = None;
        self.provider.store().unsubscribe(self.observer);
    }
}

/// Initialize terminal for TUI
pub fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;
    Ok(terminal)
}

/// Restore terminal to normal state
pub fn restore_terminal(mut terminal: Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;
    Ok(())
}

/// Main event loop
pub fn run_kiosk<B: Backend>(app: &mut KioskApp, terminal: &mut Terminal<B>) -> Result<()> {
    loop {
        terminal.draw(|f| app.render(f))?;

        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) => app.handle_key(key)?,
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    tracing::info!("kiosk closed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;
    use ratatui::backend::TestBackend;

    fn app() -> KioskApp {
        let mut config = Config::new();
        config.ui.theme_mode = crate::config::ThemeMode::Dark;
        KioskApp::new(config).unwrap()
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn click(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn draw(app: &mut KioskApp) {
        let mut terminal = Terminal::new(TestBackend::new(80, 40)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();
    }

    #[test]
    fn test_tab_focus_shows_numeric_pad_for_phone() {
        let mut app = app();
        app.handle_key(press(KeyCode::Tab)).unwrap();

        let store = app.store();
        assert!(store.is_visible());
        assert_eq!(store.layout(), KeyboardLayout::Numeric);

        app.handle_key(press(KeyCode::Char('4'))).unwrap();
        app.handle_key(press(KeyCode::Char('x'))).unwrap();
        let phone = app.screen().unwrap().inputs()[0].value();
        assert_eq!(phone, "4");
        assert!(app.status.starts_with("Ignored"));
    }

    #[test]
    fn test_click_field_then_surface_key() {
        let mut app = app();
        draw(&mut app);

        let (node, area) = app.field_areas[1];
        app.handle_mouse(click(MouseEventKind::Down(MouseButton::Left), area.x + 2, area.y + 1));
        app.handle_mouse(click(MouseEventKind::Up(MouseButton::Left), area.x + 2, area.y + 1));
        assert_eq!(app.document().focused(), Some(node));
        assert_eq!(app.store().layout(), KeyboardLayout::Default);

        draw(&mut app);
        let q = app
            .surface_plan
            .buttons
            .iter()
            .find(|b| b.label == "q")
            .map(|b| b.area)
            .unwrap();
        app.handle_mouse(click(MouseEventKind::Down(MouseButton::Left), q.x + 1, q.y + 1));

        assert_eq!(app.screen().unwrap().inputs()[1].value(), "q");
        assert_eq!(app.document().focused(), Some(node));
    }

    #[test]
    fn test_admin_screen_types_without_keyboard() {
        let mut app = app();
        app.handle_key(press(KeyCode::F(4))).unwrap();
        app.handle_key(press(KeyCode::Tab)).unwrap();
        app.handle_key(press(KeyCode::Char('a'))).unwrap();

        assert!(!app.store().is_visible());
        assert_eq!(app.screen().unwrap().inputs()[0].value(), "a");
    }

    #[test]
    fn test_switching_screen_detaches_target() {
        let mut app = app();
        app.handle_key(press(KeyCode::Tab)).unwrap();
        app.handle_key(press(KeyCode::F(2))).unwrap();

        assert_eq!(app.screen().unwrap().kind(), ScreenKind::Search);
        assert!(app.document().focused().is_none());
        app.handle_key(press(KeyCode::Char('a'))).unwrap();
        assert_eq!(app.status, Declined::NoTarget.to_string());
    }

    #[test]
    fn test_escape_quits() {
        let mut app = app();
        app.handle_key(press(KeyCode::Esc)).unwrap();
        assert!(app.should_quit);
    }
}
