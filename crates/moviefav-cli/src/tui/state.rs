//! Browser application state.
//!
//! All mutable state lives in [`AppState`] and is changed only by the
//! event handlers of the TUI loop.

use moviefav_api::omdb::MovieSummary;
use moviefav_db::{AddOutcome, FavouritesStore};

use crate::pagination::{PageControls, PageNav, Paginator};
use crate::search::{ApplyOutcome, SearchCompletion, SearchRequest, SearchState};

/// Notice shown when adding a movie that is already a favourite.
pub const DUPLICATE_NOTICE: &str = "This movie is already in your favourites!";

/// Identifies which list has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivePane {
    /// Search results.
    Results,
    /// Favourites.
    Favourites,
}

/// Input mode for the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Navigation and actions.
    Normal,
    /// Typing into the search box.
    Search,
}

/// State for the movie browser TUI.
#[derive(Debug)]
pub struct AppState {
    /// Query, results and results page.
    pub search: SearchState,
    /// Persisted favourites.
    pub favourites: FavouritesStore,
    /// Page state over favourites.
    pub favourites_pager: Paginator,
    /// Focused list.
    pub active_pane: ActivePane,
    /// Current input mode.
    pub input_mode: InputMode,
    /// Highlight within the visible results page.
    pub results_cursor: usize,
    /// Highlight within the visible favourites page.
    pub favourites_cursor: usize,
    /// Blocking notice; while set, input only dismisses it.
    pub notice: Option<String>,
}

impl AppState {
    /// Creates the state around hydrated favourites.
    #[must_use]
    pub fn new(favourites: FavouritesStore) -> Self {
        Self {
            search: SearchState::new(),
            favourites,
            favourites_pager: Paginator::default(),
            active_pane: ActivePane::Results,
            input_mode: InputMode::Normal,
            results_cursor: 0,
            favourites_cursor: 0,
            notice: None,
        }
    }

    /// Results on the current page.
    #[must_use]
    pub fn visible_results(&self) -> &[MovieSummary] {
        self.search.visible()
    }

    /// Favourites on the current page.
    #[must_use]
    pub fn visible_favourites(&self) -> &[MovieSummary] {
        self.favourites_pager.slice(self.favourites.items())
    }

    /// Controls for the results pagination bar.
    #[must_use]
    pub fn results_controls(&self) -> PageControls {
        self.search.pager().controls(self.search.results().len())
    }

    /// Controls for the favourites pagination bar.
    #[must_use]
    pub fn favourites_controls(&self) -> PageControls {
        self.favourites_pager.controls(self.favourites.len())
    }

    /// Highlighted movie in the active pane.
    #[must_use]
    pub fn highlighted(&self) -> Option<&MovieSummary> {
        match self.active_pane {
            ActivePane::Results => self.visible_results().get(self.results_cursor),
            ActivePane::Favourites => self.visible_favourites().get(self.favourites_cursor),
        }
    }

    /// Switches the focused list.
    pub const fn switch_pane(&mut self) {
        self.active_pane = match self.active_pane {
            ActivePane::Results => ActivePane::Favourites,
            ActivePane::Favourites => ActivePane::Results,
        };
    }

    /// Moves the highlight up within the visible page.
    pub const fn move_up(&mut self) {
        let cursor = self.cursor_mut();
        *cursor = cursor.saturating_sub(1);
    }

    /// Moves the highlight down within the visible page.
    pub fn move_down(&mut self) {
        let visible = match self.active_pane {
            ActivePane::Results => self.visible_results().len(),
            ActivePane::Favourites => self.visible_favourites().len(),
        };
        let cursor = self.cursor_mut();
        if cursor.saturating_add(1) < visible {
            *cursor = cursor.saturating_add(1);
        }
    }

    /// Applies page navigation to the focused list.
    pub fn paginate(&mut self, nav: PageNav) {
        let changed = match self.active_pane {
            ActivePane::Results => {
                let len = self.search.results().len();
                self.search.pager_mut().apply(nav, len)
            }
            ActivePane::Favourites => {
                let len = self.favourites.len();
                self.favourites_pager.apply(nav, len)
            }
        };
        if changed {
            *self.cursor_mut() = 0;
        }
    }

    /// Adds the highlighted search result to favourites.
    ///
    /// A duplicate raises [`DUPLICATE_NOTICE`]; a storage failure raises a
    /// notice with the error.
    pub fn add_highlighted(&mut self) {
        if self.active_pane != ActivePane::Results {
            return;
        }
        let Some(movie) = self.visible_results().get(self.results_cursor).cloned() else {
            return;
        };
        match self.favourites.add(movie) {
            Ok(AddOutcome::Added) => {}
            Ok(AddOutcome::Duplicate) => self.notice = Some(String::from(DUPLICATE_NOTICE)),
            Err(e) => {
                tracing::warn!(error = %e, "failed to add favourite");
                self.notice = Some(format!("Failed to save favourites: {e:#}"));
            }
        }
    }

    /// Removes the highlighted favourite.
    pub fn remove_highlighted(&mut self) {
        if self.active_pane != ActivePane::Favourites {
            return;
        }
        let Some(imdb_id) = self
            .visible_favourites()
            .get(self.favourites_cursor)
            .map(|m| m.imdb_id.clone())
        else {
            return;
        };
        if let Err(e) = self.favourites.remove(&imdb_id) {
            tracing::warn!(error = %e, "failed to remove favourite");
            self.notice = Some(format!("Failed to save favourites: {e:#}"));
            return;
        }
        self.favourites_pager.clamp_to(self.favourites.len());
        let visible = self.visible_favourites().len();
        if self.favourites_cursor >= visible {
            self.favourites_cursor = visible.saturating_sub(1);
        }
    }

    /// Enters search editing mode.
    pub const fn begin_search(&mut self) {
        self.input_mode = InputMode::Search;
        self.active_pane = ActivePane::Results;
    }

    /// Leaves search editing mode.
    pub const fn end_search(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    /// Appends to the query; returns the lookup to run.
    pub fn search_push(&mut self, ch: char) -> SearchRequest {
        self.search.push_char(ch)
    }

    /// Deletes from the query; returns the lookup to run, if any.
    pub fn search_pop(&mut self) -> Option<SearchRequest> {
        self.search.pop_char()
    }

    /// Applies a finished lookup.
    pub fn apply_search(&mut self, completion: SearchCompletion) -> ApplyOutcome {
        let outcome = self.search.apply(completion);
        if let ApplyOutcome::Replaced(count) = outcome {
            tracing::debug!(count, token = self.search.latest_token(), "search results replaced");
            self.results_cursor = 0;
        }
        outcome
    }

    /// Clears the blocking notice.
    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// Cursor of the focused list.
    const fn cursor_mut(&mut self) -> &mut usize {
        match self.active_pane {
            ActivePane::Results => &mut self.results_cursor,
            ActivePane::Favourites => &mut self.favourites_cursor,
        }
    }
}
