//! Movie browser TUI main loop.
//!
//! Uses `ratatui` + `crossterm` for rendering. Searches run as tokio tasks
//! and report back through a channel drained by the loop.

/// Browser state types.
pub mod state;
mod ui;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use moviefav_api::omdb::OmdbApi;
use moviefav_db::FavouritesStore;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

use self::state::{ActivePane, AppState, InputMode};
use crate::pagination::PageNav;
use crate::search::{SearchCompletion, SearchRequest, resolve};

/// Sleep between polls when no input is pending.
const IDLE_TICK: Duration = Duration::from_millis(30);

/// What the loop must do after a key press.
#[derive(Debug, PartialEq, Eq)]
enum KeyAction {
    /// Nothing beyond the state change.
    None,
    /// Leave the browser.
    Quit,
    /// Start a lookup.
    Search(SearchRequest),
    /// Open a URL with the system opener.
    Open(String),
}

/// Runs the movie browser until the user quits.
///
/// # Errors
///
/// Returns an error if terminal setup or event handling fails.
pub async fn run_browser<A>(api: Arc<A>, favourites: FavouritesStore) -> Result<()>
where
    A: OmdbApi + Send + Sync + 'static,
{
    let mut state = AppState::new(favourites);
    let (tx, mut rx) = unbounded_channel();

    // Lookup for the initial empty query.
    let initial = state.search.set_query(String::new());
    dispatch(&api, initial, &tx);

    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen)
        .context("failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;

    let result = run_event_loop(&mut terminal, &mut state, &api, &tx, &mut rx).await;

    // Cleanup (always attempt even if event loop failed)
    disable_raw_mode().context("failed to disable raw mode")?;
    crossterm::execute!(io::stdout(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;

    result
}

/// Main event loop.
async fn run_event_loop<A>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut AppState,
    api: &Arc<A>,
    tx: &UnboundedSender<SearchCompletion>,
    rx: &mut UnboundedReceiver<SearchCompletion>,
) -> Result<()>
where
    A: OmdbApi + Send + Sync + 'static,
{
    loop {
        while let Ok(completion) = rx.try_recv() {
            state.apply_search(completion);
        }

        terminal
            .draw(|frame| ui::draw(frame, state))
            .context("failed to draw TUI")?;

        if !event::poll(Duration::ZERO).context("failed to poll events")? {
            tokio::time::sleep(IDLE_TICK).await;
            continue;
        }

        if let Event::Key(key) = event::read().context("failed to read event")?
            && key.kind == KeyEventKind::Press
        {
            match handle_key(state, key) {
                KeyAction::None => {}
                KeyAction::Quit => return Ok(()),
                KeyAction::Search(request) => dispatch(api, request, tx),
                KeyAction::Open(url) => {
                    if let Err(e) = open::that(&url) {
                        tracing::debug!(error = %e, url, "failed to open poster");
                    }
                }
            }
        }
    }
}

/// Spawns the lookup for `request`; its completion arrives on `tx`.
fn dispatch<A>(api: &Arc<A>, request: SearchRequest, tx: &UnboundedSender<SearchCompletion>)
where
    A: OmdbApi + Send + Sync + 'static,
{
    let api = Arc::clone(api);
    let tx = tx.clone();
    tokio::spawn(async move {
        let completion = resolve(api.as_ref(), &request).await;
        if tx.send(completion).is_err() {
            tracing::debug!(token = request.token, "browser closed before search finished");
        }
    });
}

/// Routes a key press to the handler for the current mode.
fn handle_key(state: &mut AppState, key: KeyEvent) -> KeyAction {
    if state.notice.is_some() {
        state.dismiss_notice();
        return KeyAction::None;
    }

    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return KeyAction::Quit;
    }

    match state.input_mode {
        InputMode::Search => handle_search_input(state, key.code),
        InputMode::Normal => handle_normal_input(state, key.code),
    }
}

/// Handles key input while editing the query.
fn handle_search_input(state: &mut AppState, key: KeyCode) -> KeyAction {
    match key {
        KeyCode::Esc | KeyCode::Enter => {
            state.end_search();
            KeyAction::None
        }
        KeyCode::Backspace => state
            .search_pop()
            .map_or(KeyAction::None, KeyAction::Search),
        KeyCode::Char(c) => KeyAction::Search(state.search_push(c)),
        _ => KeyAction::None,
    }
}

/// Handles key input in normal mode.
fn handle_normal_input(state: &mut AppState, key: KeyCode) -> KeyAction {
    match key {
        KeyCode::Char('q') | KeyCode::Esc => return KeyAction::Quit,
        KeyCode::Char('/') => state.begin_search(),
        KeyCode::Tab | KeyCode::BackTab => state.switch_pane(),
        KeyCode::Up | KeyCode::Char('k') => state.move_up(),
        KeyCode::Down | KeyCode::Char('j') => state.move_down(),
        KeyCode::Enter => match state.active_pane {
            ActivePane::Results => state.add_highlighted(),
            ActivePane::Favourites => state.remove_highlighted(),
        },
        KeyCode::Char('a') => state.add_highlighted(),
        KeyCode::Char('d' | 'x') => state.remove_highlighted(),
        KeyCode::Home | KeyCode::Char('g') => state.paginate(PageNav::First),
        KeyCode::Left | KeyCode::Char('h') => state.paginate(PageNav::Prev),
        KeyCode::Right | KeyCode::Char('l') => state.paginate(PageNav::Next),
        KeyCode::End | KeyCode::Char('G') => state.paginate(PageNav::Last),
        KeyCode::Char(c @ '1'..='9') => {
            if let Some(page) = c.to_digit(10).and_then(|d| usize::try_from(d).ok()) {
                state.paginate(PageNav::Jump(page));
            }
        }
        KeyCode::Char('o') => {
            if let Some(url) = state.highlighted().and_then(|m| m.poster()) {
                return KeyAction::Open(String::from(url));
            }
        }
        _ => {}
    }
    KeyAction::None
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use moviefav_api::omdb::OmdbSearchResponse;

    use super::*;
    use crate::search::tests::{MockOmdb, movies};

    fn make_state() -> AppState {
        let conn = moviefav_db::open_in_memory().unwrap();
        AppState::new(FavouritesStore::hydrate(conn).unwrap())
    }

    fn press(state: &mut AppState, code: KeyCode) -> KeyAction {
        handle_key(state, KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn load_results(state: &mut AppState, n: usize) {
        let request = state.search.set_query("q");
        state.apply_search(SearchCompletion {
            token: request.token,
            result: Ok(OmdbSearchResponse {
                search: Some(movies("tt", n)),
                ..OmdbSearchResponse::default()
            }),
        });
    }

    #[test]
    fn test_typing_issues_searches() {
        // Arrange
        let mut state = make_state();
        press(&mut state, KeyCode::Char('/'));

        // Act
        let first = press(&mut state, KeyCode::Char('a'));
        let second = press(&mut state, KeyCode::Char('b'));

        // Assert
        assert!(matches!(first, KeyAction::Search(_)));
        let KeyAction::Search(request) = second else {
            panic!("expected a search");
        };
        assert_eq!(request.params.unwrap().query, "ab");
        assert_eq!(state.search.query(), "ab");
    }

    #[test]
    fn test_backspace_on_empty_query_does_not_search() {
        // Arrange
        let mut state = make_state();
        press(&mut state, KeyCode::Char('/'));

        // Act
        let action = press(&mut state, KeyCode::Backspace);

        // Assert
        assert_eq!(action, KeyAction::None);
    }

    #[test]
    fn test_letters_in_search_mode_are_not_commands() {
        // Arrange
        let mut state = make_state();
        press(&mut state, KeyCode::Char('/'));

        // Act
        let action = press(&mut state, KeyCode::Char('q'));

        // Assert
        assert!(matches!(action, KeyAction::Search(_)));
        press(&mut state, KeyCode::Esc);
        assert_eq!(state.input_mode, InputMode::Normal);
        assert_eq!(press(&mut state, KeyCode::Char('q')), KeyAction::Quit);
    }

    #[test]
    fn test_notice_blocks_other_input() {
        // Arrange
        let mut state = make_state();
        load_results(&mut state, 3);
        press(&mut state, KeyCode::Enter);
        press(&mut state, KeyCode::Enter);
        assert!(state.notice.is_some());

        // Act
        let action = press(&mut state, KeyCode::Char('q'));

        // Assert
        assert_eq!(action, KeyAction::None);
        assert!(state.notice.is_none());
        assert_eq!(state.favourites.len(), 1);
    }

    #[test]
    fn test_ctrl_c_quits_from_search_mode() {
        // Arrange
        let mut state = make_state();
        press(&mut state, KeyCode::Char('/'));

        // Act
        let action = handle_key(
            &mut state,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        );

        // Assert
        assert_eq!(action, KeyAction::Quit);
    }

    #[test]
    fn test_page_keys() {
        // Arrange
        let mut state = make_state();
        load_results(&mut state, 12);

        // Act & Assert
        press(&mut state, KeyCode::Char('l'));
        assert_eq!(state.search.pager().current_page(), 2);
        press(&mut state, KeyCode::Char('G'));
        assert_eq!(state.search.pager().current_page(), 3);
        press(&mut state, KeyCode::Right);
        assert_eq!(state.search.pager().current_page(), 3);
        press(&mut state, KeyCode::Char('h'));
        assert_eq!(state.search.pager().current_page(), 2);
        press(&mut state, KeyCode::Char('g'));
        assert_eq!(state.search.pager().current_page(), 1);
        press(&mut state, KeyCode::Char('3'));
        assert_eq!(state.search.pager().current_page(), 3);
        press(&mut state, KeyCode::Char('9'));
        assert_eq!(state.search.pager().current_page(), 3);
    }

    #[test]
    fn test_add_and_remove_keys() {
        // Arrange
        let mut state = make_state();
        load_results(&mut state, 3);

        // Act
        press(&mut state, KeyCode::Char('a'));
        press(&mut state, KeyCode::Tab);
        press(&mut state, KeyCode::Char('d'));

        // Assert
        assert!(state.favourites.is_empty());
    }

    #[test]
    fn test_open_poster() {
        // Arrange
        let mut state = make_state();
        load_results(&mut state, 1);

        // Act
        let action = press(&mut state, KeyCode::Char('o'));

        // Assert
        assert_eq!(
            action,
            KeyAction::Open(String::from("https://img.example/tt0.jpg"))
        );
    }

    #[tokio::test]
    async fn test_dispatch_delivers_completion() {
        // Arrange
        let mut mock = MockOmdb::default();
        mock.responses.insert(String::from("alien"), movies("tt", 2));
        let api = Arc::new(mock);
        let (tx, mut rx) = unbounded_channel();
        let mut state = make_state();
        let request = state.search.set_query("alien");

        // Act
        dispatch(&api, request, &tx);
        let completion = rx.recv().await.unwrap();

        // Assert
        state.apply_search(completion);
        assert_eq!(state.search.results().len(), 2);
    }
}
