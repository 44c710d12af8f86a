use anyhow::Result;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use ratatui::Terminal;
use ratatui::backend::Backend;
use ratatui::layout::{Position, Rect};
use std::time::{Duration, Instant};

use crate::app::keymap::KeyAction;
use crate::app::overlay::OverlayControl;
use crate::app::{AppState, InputMode};
use crate::ui;

/// How long the loop waits for input before running the next tick.
const TICK: Duration = Duration::from_millis(50);

/// What the loop should do after an event.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut AppState) -> Result<()> {
    app.start_load();

    loop {
        app.tick(Instant::now());
        terminal.draw(|f| ui::render(f, app))?;

        if !event::poll(TICK)? {
            continue;
        }
        let flow = match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => handle_key(app, key, Instant::now()),
            Event::Mouse(mouse) => handle_mouse(app, mouse),
            _ => Flow::Continue,
        };
        if flow == Flow::Quit {
            break;
        }
    }

    app.shutdown();
    Ok(())
}

pub fn handle_key(app: &mut AppState, key: KeyEvent, now: Instant) -> Flow {
    app.status_message = None;
    match app.input_mode {
        InputMode::Normal => handle_normal_key(app, key),
        InputMode::Search => {
            handle_search_key(app, key, now);
            Flow::Continue
        }
        InputMode::Overlay => {
            handle_overlay_key(app, key);
            Flow::Continue
        }
    }
}

fn handle_normal_key(app: &mut AppState, key: KeyEvent) -> Flow {
    let Some(action) = app.keymap.resolve(&key) else {
        return Flow::Continue;
    };
    match action {
        KeyAction::Quit => return Flow::Quit,
        KeyAction::StartSearch => app.input_mode = InputMode::Search,
        KeyAction::CycleStatusFilter => app.cycle_status_filter(),
        KeyAction::ToggleSort => app.toggle_sort(),
        KeyAction::CyclePageSize => app.cycle_page_size(),
        KeyAction::PrevPage => app.prev_page(),
        KeyAction::NextPage => app.next_page(),
        KeyAction::MoveUp => app.move_selection(-1),
        KeyAction::MoveDown => app.move_selection(1),
        KeyAction::OpenDetail => app.open_selected(),
        KeyAction::ToggleTheme => {
            let mode = app.theme_context().toggle();
            app.status_message = Some(format!("theme: {}", mode.as_str()));
        }
        KeyAction::Retry => {
            if !app.is_loading() {
                app.start_load();
            }
        }
        KeyAction::ToggleHelp => app.show_help = !app.show_help,
    }
    Flow::Continue
}

fn handle_search_key(app: &mut AppState, key: KeyEvent, now: Instant) {
    match key.code {
        KeyCode::Esc | KeyCode::Enter | KeyCode::Down => app.input_mode = InputMode::Normal,
        KeyCode::Backspace => app.search.pop_char(now),
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.search.input(String::new(), now)
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.search.push_char(c, now)
        }
        _ => {}
    }
}

fn handle_overlay_key(app: &mut AppState, key: KeyEvent) {
    let controls = app.overlay_controls();
    match key.code {
        KeyCode::Esc => app.close_detail(),
        KeyCode::BackTab => app.overlay.focus_prev(controls),
        KeyCode::Tab if key.modifiers.contains(KeyModifiers::SHIFT) => {
            app.overlay.focus_prev(controls)
        }
        KeyCode::Tab => app.overlay.focus_next(controls),
        KeyCode::Enter | KeyCode::Char(' ') => {
            if let Some(control) = app.overlay.focused(controls) {
                activate(app, control);
            }
        }
        _ => {}
    }
}

fn activate(app: &mut AppState, control: OverlayControl) {
    if control.closes() {
        app.close_detail();
        return;
    }
    if let crate::app::loader::DetailState::Loaded(detail) = app.detail.state() {
        app.status_message = Some(format!("mailto:{}", detail.email));
    }
}

pub fn handle_mouse(app: &mut AppState, mouse: MouseEvent) -> Flow {
    if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
        return Flow::Continue;
    }
    let pos = Position::new(mouse.column, mouse.row);
    match app.input_mode {
        InputMode::Overlay => {
            // a click on the backdrop closes the overlay
            if !app.layout.overlay.is_some_and(|r| r.contains(pos)) {
                app.close_detail();
            }
        }
        InputMode::Normal | InputMode::Search => {
            let hit = row_at(app.layout.rows, pos).map(|r| r + app.table_state.offset());
            if let Some(idx) = hit {
                if idx < app.view.page.len() {
                    app.input_mode = InputMode::Normal;
                    app.selected_row = idx;
                    app.open_selected();
                }
            }
        }
    }
    Flow::Continue
}

fn row_at(rows: Rect, pos: Position) -> Option<usize> {
    rows.contains(pos).then(|| (pos.y - rows.y) as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::keymap::Keymap;
    use crate::app::theme::{ThemeMode, ThemeStore};
    use crate::error::FetchError;
    use crate::source::{DataSource, UserSummary};
    use std::sync::Arc;

    struct NoSource;

    impl DataSource for NoSource {
        fn fetch(&self) -> Result<String, FetchError> {
            Err(FetchError::Status(404))
        }
        fn describe(&self) -> String {
            "none".into()
        }
    }

    fn mk_app() -> AppState {
        let mut app = AppState::new(
            Arc::new(NoSource),
            Some(ThemeStore::in_memory(ThemeMode::Light)),
            Keymap::default(),
        );
        let users = ["Anna Lee", "Bob", "Cleo"]
            .iter()
            .enumerate()
            .map(|(i, n)| UserSummary {
                id: i.to_string(),
                name: n.to_string(),
                email: format!("{i}@co.com"),
                avatar: None,
                status: "Active".into(),
                bio: None,
                joined_at: None,
                last_seen: None,
            })
            .collect();
        app.finish_load(Ok(users));
        app
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn typing_is_debounced_before_filtering() {
        let mut app = mk_app();
        let t0 = Instant::now();
        handle_key(&mut app, press(KeyCode::Char('/')), t0);
        assert_eq!(app.input_mode, InputMode::Search);
        for c in "bo".chars() {
            handle_key(&mut app, press(KeyCode::Char(c)), t0);
        }
        app.tick(t0 + Duration::from_millis(100));
        assert_eq!(app.view.filtered.len(), 3);
        assert_eq!(app.search.raw(), "bo");

        app.tick(t0 + Duration::from_millis(300));
        assert_eq!(app.view.filtered.len(), 1);
        assert_eq!(app.filters.search_text, "bo");
    }

    #[test]
    fn quit_only_from_normal_mode() {
        let mut app = mk_app();
        let now = Instant::now();
        handle_key(&mut app, press(KeyCode::Char('/')), now);
        assert_eq!(handle_key(&mut app, press(KeyCode::Char('q')), now), Flow::Continue);
        handle_key(&mut app, press(KeyCode::Esc), now);
        assert_eq!(handle_key(&mut app, press(KeyCode::Char('q')), now), Flow::Quit);
    }

    #[test]
    fn overlay_traps_tab_and_closes_on_escape() {
        let mut app = mk_app();
        let now = Instant::now();
        handle_key(&mut app, press(KeyCode::Down), now);
        handle_key(&mut app, press(KeyCode::Enter), now);
        assert!(app.overlay.is_open());
        // only the close control exists while loading, so tab stays on it
        handle_key(&mut app, press(KeyCode::Tab), now);
        assert_eq!(
            app.overlay.focused(app.overlay_controls()),
            Some(OverlayControl::Close)
        );
        // normal-mode keys are swallowed by the overlay
        assert_eq!(handle_key(&mut app, press(KeyCode::Char('q')), now), Flow::Continue);
        handle_key(&mut app, press(KeyCode::Esc), now);
        assert!(!app.overlay.is_open());
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn backdrop_click_closes_and_row_click_opens() {
        let mut app = mk_app();
        app.layout.rows = Rect::new(1, 5, 40, 10);
        let click = |col, row| MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: col,
            row,
            modifiers: KeyModifiers::NONE,
        };
        handle_mouse(&mut app, click(3, 7));
        assert_eq!(app.overlay.user_id(), Some("2"));

        app.layout.overlay = Some(Rect::new(20, 2, 30, 10));
        handle_mouse(&mut app, click(25, 5));
        assert!(app.overlay.is_open());
        handle_mouse(&mut app, click(0, 0));
        assert!(!app.overlay.is_open());
    }

    #[test]
    fn row_click_accounts_for_table_scroll() {
        let mut app = mk_app();
        app.layout.rows = Rect::new(1, 5, 40, 2);
        *app.table_state.offset_mut() = 1;
        handle_mouse(
            &mut app,
            MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column: 3,
                row: 6,
                modifiers: KeyModifiers::NONE,
            },
        );
        assert_eq!(app.selected_row, 2);
        assert_eq!(app.overlay.user_id(), Some("2"));
    }

    #[test]
    fn theme_key_toggles_scoped_store() {
        let mut app = mk_app();
        handle_key(&mut app, press(KeyCode::Char('t')), Instant::now());
        assert_eq!(app.theme.as_ref().map(|t| t.mode()), Some(ThemeMode::Dark));
        assert_eq!(app.status_message.as_deref(), Some("theme: dark"));
    }
}
