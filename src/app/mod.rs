//! Application state types and entry glue.
//!
//! [`AppState`] is the single owner of everything the dashboard shows: the bulk
//! list, the filter state and its computed page, the loaders, the overlay and the
//! theme. Widgets read it; key and mouse handlers in [`update`] mutate it.
//!
pub mod debounce;
pub mod keymap;
pub mod loader;
pub mod overlay;
pub mod theme;
pub mod update;

use std::sync::Arc;
use std::time::Instant;

use ratatui::layout::Rect;
use ratatui::widgets::TableState;

use crate::error::FetchError;
use crate::search::{self, FilterState, PAGE_SIZES, PageView};
use crate::source::{DataSource, UserSummary};
use debounce::Debouncer;
use keymap::Keymap;
use loader::{BulkLoader, DetailLoader};
use overlay::{Overlay, OverlayControl, Trigger};
use theme::{Palette, ThemeContext, ThemeStore};

/// Current input mode for key handling.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    Overlay,
}

/// Screen areas recorded during the last draw, for mouse hit-testing.
#[derive(Clone, Copy, Debug, Default)]
pub struct LayoutCache {
    /// Data rows of the users table (below the header row).
    pub rows: Rect,
    /// The detail overlay, when it is shown.
    pub overlay: Option<Rect>,
}

pub struct AppState {
    pub started_at: Instant,
    pub users_all: Vec<UserSummary>,
    pub filters: FilterState,
    pub view: PageView,
    pub search: Debouncer,
    /// Index of the highlighted row within the current page.
    pub selected_row: usize,
    /// Scroll offset of the users table; its selection mirrors `selected_row`.
    pub table_state: TableState,
    pub input_mode: InputMode,
    pub bulk: BulkLoader,
    pub load_error: Option<FetchError>,
    pub detail: DetailLoader,
    pub overlay: Overlay,
    pub theme: Option<ThemeStore>,
    pub keymap: Keymap,
    pub show_help: bool,
    pub status_message: Option<String>,
    pub layout: LayoutCache,
}

impl AppState {
    /// Build the state around `source`. Nothing is fetched until [`AppState::start_load`].
    pub fn new(source: Arc<dyn DataSource>, theme: Option<ThemeStore>, keymap: Keymap) -> Self {
        Self {
            started_at: Instant::now(),
            users_all: Vec::new(),
            filters: FilterState::default(),
            view: PageView::default(),
            search: Debouncer::default(),
            selected_row: 0,
            table_state: TableState::default(),
            input_mode: InputMode::Normal,
            bulk: BulkLoader::new(Arc::clone(&source)),
            load_error: None,
            detail: DetailLoader::new(source),
            overlay: Overlay::default(),
            theme,
            keymap,
            show_help: true,
            status_message: None,
            layout: LayoutCache::default(),
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.filters.page_size = page_size.max(1);
        self.refresh();
        self
    }

    pub fn theme_context(&mut self) -> ThemeContext<'_> {
        ThemeContext::scope(self.theme.as_mut())
    }

    pub fn palette(&self) -> Palette {
        self.theme
            .as_ref()
            .map(|t| t.palette())
            .unwrap_or_else(|| ThemeContext::scope(None).palette())
    }

    pub fn is_loading(&self) -> bool {
        self.bulk.is_loading()
    }

    /// Fetch the users list. Prior data and error are cleared before the request goes out.
    pub fn start_load(&mut self) {
        self.load_error = None;
        self.users_all.clear();
        self.refresh();
        self.bulk.start();
    }

    pub fn finish_load(&mut self, result: Result<Vec<UserSummary>, FetchError>) {
        match result {
            Ok(users) => {
                tracing::info!(count = users.len(), "users loaded");
                self.users_all = users;
                self.load_error = None;
            }
            Err(e) => {
                tracing::error!(error = %e, "loading users failed");
                self.users_all.clear();
                self.load_error = Some(e);
            }
        }
        self.refresh();
    }

    /// Recompute the visible page, pulling the current page back into range.
    pub fn refresh(&mut self) {
        self.view = search::apply_clamped(&self.users_all, &mut self.filters);
        self.selected_row = self
            .selected_row
            .min(self.view.page.len().saturating_sub(1));
    }

    pub fn commit_search(&mut self, text: String) {
        tracing::debug!(search = %text, "search committed");
        self.filters.search_text = text;
        self.filters.current_page = 1;
        self.selected_row = 0;
        self.refresh();
    }

    pub fn cycle_status_filter(&mut self) {
        self.filters.status_filter = self.filters.status_filter.next();
        self.filters.current_page = 1;
        self.selected_row = 0;
        self.refresh();
    }

    pub fn toggle_sort(&mut self) {
        self.filters.sort_key = self.filters.sort_key.toggled();
        self.filters.current_page = 1;
        self.selected_row = 0;
        self.refresh();
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.filters.page_size = page_size.max(1);
        self.filters.current_page = 1;
        self.selected_row = 0;
        self.refresh();
    }

    pub fn cycle_page_size(&mut self) {
        let idx = PAGE_SIZES
            .iter()
            .position(|s| *s == self.filters.page_size)
            .map(|i| (i + 1) % PAGE_SIZES.len())
            .unwrap_or(0);
        self.set_page_size(PAGE_SIZES[idx]);
    }

    pub fn next_page(&mut self) {
        if self.filters.current_page < self.view.total_pages {
            self.filters.current_page += 1;
            self.selected_row = 0;
            self.refresh();
        }
    }

    pub fn prev_page(&mut self) {
        if self.filters.current_page > 1 {
            self.filters.current_page -= 1;
            self.selected_row = 0;
            self.refresh();
        }
    }

    pub fn move_selection(&mut self, delta: isize) {
        let len = self.view.page.len();
        if len == 0 {
            self.selected_row = 0;
            return;
        }
        self.selected_row = self
            .selected_row
            .saturating_add_signed(delta)
            .min(len - 1);
    }

    pub fn selected_user(&self) -> Option<&UserSummary> {
        self.view.page.get(self.selected_row)
    }

    /// Open the detail overlay for the highlighted row.
    pub fn open_selected(&mut self) {
        if let Some(id) = self.selected_user().map(|u| u.id.clone()) {
            self.open_detail(&id);
        }
    }

    pub fn open_detail(&mut self, user_id: &str) {
        tracing::debug!(user_id, "opening detail overlay");
        self.overlay.open(
            user_id,
            Trigger {
                user_id: user_id.to_string(),
            },
        );
        self.detail.open(user_id);
        self.input_mode = InputMode::Overlay;
    }

    /// Hide the overlay; focus returns to the trigger row on the next tick.
    pub fn close_detail(&mut self) {
        self.overlay.close();
        self.detail.close();
        self.input_mode = InputMode::Normal;
    }

    pub fn overlay_controls(&self) -> &'static [OverlayControl] {
        overlay::controls_for(self.detail.state())
    }

    /// Re-select the row that opened the overlay, if one is waiting.
    pub fn restore_focus(&mut self) {
        let Some(trigger) = self.overlay.take_restore() else {
            return;
        };
        match self.view.page.iter().position(|u| u.id == trigger.user_id) {
            Some(idx) => self.selected_row = idx,
            None => tracing::debug!(user_id = %trigger.user_id, "trigger row no longer visible"),
        }
    }

    /// One scheduling tick: deferred focus, debounce deadline, finished fetches.
    pub fn tick(&mut self, now: Instant) {
        self.restore_focus();
        if let Some(text) = self.search.poll(now) {
            self.commit_search(text);
        }
        if let Some(result) = self.bulk.poll() {
            self.finish_load(result);
        }
        self.detail.poll();
    }

    /// Release scheduled work before the view goes away.
    pub fn shutdown(&mut self) {
        self.search.cancel();
        self.detail.close();
        tracing::info!(uptime_ms = self.started_at.elapsed().as_millis() as u64, "dashboard closed");
    }
}

/// Re-export the application event loop entry function.
pub use update::run_app as run;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::StatusFilter;
    use theme::ThemeMode;

    struct NoSource;

    impl DataSource for NoSource {
        fn fetch(&self) -> Result<String, FetchError> {
            Err(FetchError::Status(503))
        }
        fn describe(&self) -> String {
            "none".into()
        }
    }

    fn mk_user(id: usize, status: &str) -> UserSummary {
        UserSummary {
            id: id.to_string(),
            name: format!("user{:02}", id),
            email: format!("u{id}@co.com"),
            avatar: None,
            status: status.to_string(),
            bio: None,
            joined_at: None,
            last_seen: None,
        }
    }

    fn mk_app(users: Vec<UserSummary>) -> AppState {
        let mut app = AppState::new(
            Arc::new(NoSource),
            Some(ThemeStore::in_memory(ThemeMode::Light)),
            Keymap::default(),
        );
        app.finish_load(Ok(users));
        app
    }

    #[test]
    fn filtering_down_clamps_current_page() {
        let users = (0..12)
            .map(|i| mk_user(i, if i < 5 { "Active" } else { "Inactive" }))
            .collect();
        let mut app = mk_app(users);
        app.next_page();
        assert_eq!(app.filters.current_page, 2);

        // shrink the set without going through a page reset
        app.filters.status_filter = StatusFilter::Active;
        app.refresh();
        assert_eq!(app.view.total_pages, 1);
        assert_eq!(app.filters.current_page, 1);
        assert_eq!(app.view.page.len(), 5);
    }

    #[test]
    fn filter_sort_and_page_size_reset_to_first_page() {
        let mut app = mk_app((0..25).map(|i| mk_user(i, "Active")).collect());
        app.next_page();
        app.toggle_sort();
        assert_eq!(app.filters.current_page, 1);
        app.next_page();
        app.cycle_status_filter();
        assert_eq!(app.filters.current_page, 1);
        app.cycle_status_filter();
        app.cycle_status_filter();
        app.next_page();
        app.cycle_page_size();
        assert_eq!(app.filters.page_size, 20);
        assert_eq!(app.filters.current_page, 1);
        app.cycle_page_size();
        assert_eq!(app.filters.page_size, 5);
    }

    #[test]
    fn paging_stops_at_the_ends() {
        let mut app = mk_app((0..12).map(|i| mk_user(i, "Active")).collect());
        app.prev_page();
        assert_eq!(app.filters.current_page, 1);
        app.next_page();
        app.next_page();
        assert_eq!(app.filters.current_page, 2);
    }

    #[test]
    fn failed_load_keeps_error_and_empties_list() {
        let mut app = mk_app(vec![mk_user(1, "Active")]);
        app.finish_load(Err(FetchError::Status(500)));
        assert!(app.users_all.is_empty());
        assert_eq!(app.load_error, Some(FetchError::Status(500)));
        app.start_load();
        assert!(app.load_error.is_none());
        assert!(app.is_loading());
    }

    #[test]
    fn closing_overlay_restores_trigger_row_on_next_tick() {
        let mut app = mk_app((0..5).map(|i| mk_user(i, "Active")).collect());
        app.move_selection(3);
        app.open_selected();
        assert_eq!(app.input_mode, InputMode::Overlay);
        assert_eq!(app.overlay.user_id(), Some("3"));

        app.move_selection(-3);
        app.close_detail();
        assert!(!app.overlay.is_open());
        assert_eq!(app.selected_row, 0);
        app.tick(Instant::now());
        assert_eq!(app.selected_row, 3);
    }

    #[test]
    fn detached_theme_renders_light() {
        let mut app = mk_app(vec![]);
        app.theme = None;
        assert_eq!(app.palette(), Palette::light());
        assert_eq!(app.theme_context().toggle(), ThemeMode::Light);
    }
}
