//! TUI rendering logic for the movie browser.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap};

use moviefav_api::omdb::MovieSummary;

use super::state::{ActivePane, AppState, InputMode};
use crate::pagination::PageControls;

/// Draws the movie browser UI.
#[allow(clippy::indexing_slicing)]
pub fn draw(frame: &mut Frame, state: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // heading + search box
            Constraint::Min(7),    // results
            Constraint::Length(1), // results pagination
            Constraint::Min(7),    // favourites
            Constraint::Length(1), // favourites pagination
            Constraint::Length(4), // footer
        ])
        .split(frame.area());

    draw_header(frame, chunks[0], state);
    draw_movie_list(
        frame,
        chunks[1],
        " Movies ",
        state.visible_results(),
        state.active_pane == ActivePane::Results,
        state.results_cursor,
    );
    frame.render_widget(
        Paragraph::new(pagination_line(&state.results_controls())),
        chunks[2],
    );
    draw_movie_list(
        frame,
        chunks[3],
        " Favourites ",
        state.visible_favourites(),
        state.active_pane == ActivePane::Favourites,
        state.favourites_cursor,
    );
    frame.render_widget(
        Paragraph::new(pagination_line(&state.favourites_controls())),
        chunks[4],
    );
    draw_footer(frame, chunks[5], state);

    if let Some(ref notice) = state.notice {
        draw_notice(frame, notice);
    }
}

/// Draws the heading with the search box and counts.
#[allow(clippy::indexing_slicing)]
fn draw_header(frame: &mut Frame, area: Rect, state: &AppState) {
    let header_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let search_style = if state.input_mode == InputMode::Search {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let search = Paragraph::new(state.search.query())
        .style(search_style)
        .block(Block::default().borders(Borders::ALL).title(" Search: / "));
    frame.render_widget(search, header_chunks[0]);

    let count_text = format!(
        "Results: {}  Favourites: {}",
        state.search.results().len(),
        state.favourites.len()
    );
    let count = Paragraph::new(count_text)
        .block(Block::default().borders(Borders::ALL).title(" moviefav "));
    frame.render_widget(count, header_chunks[1]);
}

/// Draws one movie list with its heading.
fn draw_movie_list(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    movies: &[MovieSummary],
    is_active: bool,
    cursor: usize,
) {
    let border_style = if is_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    let items: Vec<ListItem> = movies
        .iter()
        .enumerate()
        .map(|(i, movie)| {
            let highlighted = is_active && i == cursor;
            let marker = if highlighted { "\u{25b8} " } else { "  " };
            let style = if highlighted {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(vec![
                Span::raw(String::from(marker)),
                Span::styled(movie_label(movie), style),
            ]))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(String::from(title)),
    );
    frame.render_widget(list, area);
}

/// One-line card text for a movie.
fn movie_label(movie: &MovieSummary) -> String {
    format!(
        "{} ({})  {}  [{}]",
        movie.title,
        movie.year,
        movie.imdb_id,
        movie.media_type.as_deref().unwrap_or("-")
    )
}

/// Builds the `« ‹ 1 2 3 › »` bar for one list.
pub fn pagination_line(controls: &PageControls) -> Line<'static> {
    let enabled = Style::default();
    let disabled = Style::default()
        .fg(Color::DarkGray)
        .add_modifier(Modifier::DIM);
    let active = Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let pick = |on: bool| if on { enabled } else { disabled };

    let mut spans = vec![
        Span::raw(" "),
        Span::styled("\u{ab}", pick(controls.first_enabled)),
        Span::raw(" "),
        Span::styled("\u{2039}", pick(controls.prev_enabled)),
        Span::raw(" "),
    ];
    for page in controls.pages() {
        let style = if page == controls.current {
            active
        } else {
            enabled
        };
        spans.push(Span::styled(format!(" {page} "), style));
    }
    spans.extend([
        Span::raw(" "),
        Span::styled("\u{203a}", pick(controls.next_enabled)),
        Span::raw(" "),
        Span::styled("\u{bb}", pick(controls.last_enabled)),
    ]);
    Line::from(spans)
}

/// Draws the footer with key hints and the highlighted poster URL.
fn draw_footer(frame: &mut Frame, area: Rect, state: &AppState) {
    let help_text = if state.input_mode == InputMode::Search {
        "Type to search | Backspace: delete | Enter/Esc: done"
    } else {
        match state.active_pane {
            ActivePane::Results => {
                "Tab: pane  \u{2191}\u{2193}/j/k: move  Enter/a: add favourite  g/h/l/G: first/prev/next/last  1-9: page  o: poster  /: search  q: quit"
            }
            ActivePane::Favourites => {
                "Tab: pane  \u{2191}\u{2193}/j/k: move  Enter/d/x: remove  g/h/l/G: first/prev/next/last  1-9: page  o: poster  q: quit"
            }
        }
    };

    let poster = state
        .highlighted()
        .and_then(MovieSummary::poster)
        .map_or_else(|| String::from("Poster: -"), |url| format!("Poster: {url}"));

    let footer = Paragraph::new(vec![Line::from(help_text), Line::from(poster)])
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}

/// Draws the blocking notice popup.
fn draw_notice(frame: &mut Frame, notice: &str) {
    let area = centered_rect(frame.area(), 50, 5);
    let popup = Paragraph::new(vec![
        Line::from(String::from(notice)),
        Line::from(""),
        Line::from(Span::styled(
            "Press any key to continue",
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(" Notice "),
    );
    frame.render_widget(Clear, area);
    frame.render_widget(popup, area);
}

/// A `width`% wide, `height` rows tall rectangle centered in `area`.
fn centered_rect(area: Rect, width_percent: u16, height: u16) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(height),
            Constraint::Fill(1),
        ])
        .split(area);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(50_u16.saturating_sub(width_percent / 2)),
            Constraint::Percentage(width_percent),
            Constraint::Fill(1),
        ])
        .split(vertical[1]);
    horizontal[1]
}
