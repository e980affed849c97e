//! Terminal UI rendering
//!
//! Built with ratatui. Everything drawn here comes from the `App` and the
//! session snapshot it holds; rendering never mutates state.

pub mod theme;

pub use theme::Theme;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, InputMode};
use crate::models::DetailRecord;
use crate::session::View;

/// Main render function - dispatches to view-specific renderers
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    frame.render_widget(Clear, area);
    frame.render_widget(Block::default().style(Style::default().bg(Theme::BACKGROUND)), area);

    let error_height = if app.snapshot.error.is_some() { 2 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),            // Header
            Constraint::Min(1),               // Content
            Constraint::Length(error_height), // Error banner
            Constraint::Length(1),            // Status bar
        ])
        .split(area);

    render_header(frame, chunks[0], app);
    match app.view() {
        View::List => render_results(frame, chunks[1], app),
        View::Detail => render_detail(frame, chunks[1], app),
    }
    if let Some(ref error) = app.snapshot.error {
        render_error(frame, chunks[2], app, error);
    }
    render_status_bar(frame, chunks[3], app);

    if app.confirm_exit {
        render_popup(frame, area, " EXIT ", "Leave moviefinder? (y/n)");
    }
}

/// Render the header with title and search box
fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let header_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(20), // Logo
            Constraint::Min(1),     // Search box
        ])
        .split(area);

    let logo = Paragraph::new(Line::from(vec![
        Span::styled(
            "MOVIE",
            Style::default().fg(Theme::PRIMARY).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            "FINDER",
            Style::default().fg(Theme::SECONDARY).add_modifier(Modifier::BOLD),
        ),
    ]))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Theme::border()),
    );
    frame.render_widget(logo, header_chunks[0]);

    let editing = app.input_mode == InputMode::Editing;
    let search_text = if editing {
        let split = app
            .input
            .char_indices()
            .nth(app.cursor)
            .map(|(i, _)| i)
            .unwrap_or(app.input.len());
        let (before, after) = app.input.split_at(split);
        format!("⌕ {}│{}", before, after)
    } else if app.input.is_empty() {
        "⌕ Type / to search...".to_string()
    } else {
        format!("⌕ {}", app.input)
    };

    let search_box = Paragraph::new(search_text)
        .style(if editing {
            Theme::input().fg(Theme::PRIMARY)
        } else {
            Theme::input()
        })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(if editing {
                    Theme::border_focused()
                } else {
                    Theme::border()
                })
                .title(Span::styled(" SEARCH ", Theme::title())),
        );
    frame.render_widget(search_box, header_chunks[1]);
}

/// Render the result list
fn render_results(frame: &mut Frame, area: Rect, app: &App) {
    let state = &app.snapshot;
    let title = match state.total_results {
        Some(total) if total as usize > state.results.len() => {
            format!(" RESULTS ({} of {}) ", state.results.len(), total)
        }
        _ => format!(" RESULTS ({}) ", state.results.len()),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::border())
        .title(Span::styled(title, Theme::title()));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if state.search_loading {
        let loading = Paragraph::new("⟳ Searching...")
            .style(Theme::loading())
            .alignment(Alignment::Center);
        frame.render_widget(loading, inner);
        return;
    }

    if state.results.is_empty() {
        let empty = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled("Search the Open Movie Database", Theme::text())),
            Line::from(""),
            Line::from(vec![
                Span::styled("  /  ", Theme::keybind()),
                Span::styled("Edit query", Theme::dimmed()),
            ]),
            Line::from(vec![
                Span::styled("  ↵  ", Theme::keybind()),
                Span::styled("Search / open details", Theme::dimmed()),
            ]),
            Line::from(vec![
                Span::styled(" ESC ", Theme::keybind()),
                Span::styled("Quit", Theme::dimmed()),
            ]),
        ])
        .alignment(Alignment::Center);
        frame.render_widget(empty, inner);
        return;
    }

    let height = inner.height as usize;
    let mut viewport = app.list.clone();
    viewport.scroll_into_view(height);

    let items: Vec<ListItem> = state
        .results
        .iter()
        .enumerate()
        .skip(viewport.offset)
        .take(height)
        .map(|(i, result)| {
            let is_selected = i == viewport.selected;
            let marker = if is_selected { "▸ " } else { "  " };

            let mut spans = vec![
                Span::styled(
                    marker,
                    if is_selected {
                        Theme::accent()
                    } else {
                        Theme::dimmed()
                    },
                ),
                Span::styled(
                    result.title.as_str(),
                    if is_selected {
                        Theme::highlighted()
                    } else {
                        Theme::text()
                    },
                ),
                Span::styled(format!(" ({})", result.year), Theme::year()),
            ];
            if let Some(media_type) = result.media_type {
                spans.push(Span::raw(" "));
                spans.push(Span::styled(
                    format!("[{}]", media_type.to_string().to_uppercase()),
                    Theme::secondary(),
                ));
            }

            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items).style(Theme::text());
    frame.render_widget(list, inner);
}

/// Render the selected record
fn render_detail(frame: &mut Frame, area: Rect, app: &App) {
    let Some(ref detail) = app.snapshot.selected else {
        return;
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::border_focused())
        .title(Span::styled(format!(" {} ", detail.display_title()), Theme::title()));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let content = Paragraph::new(detail_lines(detail)).wrap(Wrap { trim: false });
    frame.render_widget(content, inner);
}

fn detail_lines(detail: &DetailRecord) -> Vec<Line<'_>> {
    let mut lines = vec![Line::from("")];

    for (label, value) in detail.fields() {
        let value_style = if label == "IMDb rating" {
            value.parse::<f32>().map(Theme::rating).unwrap_or_else(|_| Theme::text())
        } else {
            Theme::text()
        };
        lines.push(Line::from(vec![
            Span::styled(format!(" {:<12}", label), Theme::keybind()),
            Span::styled(value, value_style),
        ]));
    }

    if let Some(ref plot) = detail.plot {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(format!(" {}", plot), Theme::text())));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(" ESC ", Theme::keybind()),
        Span::styled("Back to results", Theme::dimmed()),
    ]));
    lines
}

/// Render the error slot; retry progress is a warning, not a failure
fn render_error(frame: &mut Frame, area: Rect, app: &App, error: &str) {
    let retrying = app.snapshot.search_retries > 0 || app.snapshot.detail_retries > 0;
    let (icon, style) = if retrying {
        ("⟳", Theme::warning())
    } else {
        ("✗", Theme::error())
    };

    let banner = Paragraph::new(format!(" {} {}", icon, error))
        .style(style)
        .wrap(Wrap { trim: true });
    frame.render_widget(banner, area);
}

/// Render status bar at bottom
fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let mode_indicator = match app.input_mode {
        InputMode::Normal => Span::styled(
            " NORMAL ",
            Style::default().fg(Theme::BACKGROUND).bg(Theme::PRIMARY),
        ),
        InputMode::Editing => Span::styled(
            " INSERT ",
            Style::default().fg(Theme::BACKGROUND).bg(Theme::ACCENT),
        ),
    };

    let view = match app.view() {
        View::List => " LIST ",
        View::Detail => " DETAIL ",
    };

    let activity = if app.snapshot.detail_loading {
        Span::styled(" ⟳ Loading details ", Theme::loading())
    } else if app.snapshot.search_loading {
        Span::styled(" ⟳ Searching ", Theme::loading())
    } else {
        Span::raw("")
    };

    let help = match (app.input_mode.clone(), app.view()) {
        (InputMode::Editing, _) => " ↵:search  ESC:done ",
        (_, View::Detail) => " ESC:back  ^C:quit ",
        (_, View::List) => " /:search  ↵:details  r:refresh  c:clear  ESC:quit ",
    };

    let status_line = Line::from(vec![
        mode_indicator,
        Span::styled(view, Style::default().fg(Theme::DIM)),
        activity,
        Span::raw(" │ "),
        Span::styled(help, Theme::dimmed()),
    ]);

    let status = Paragraph::new(status_line).style(Theme::status_bar());
    frame.render_widget(status, area);
}

/// Render a centered popup overlay
fn render_popup(frame: &mut Frame, area: Rect, title: &str, message: &str) {
    let popup_width = 44.min(area.width.saturating_sub(4));
    let popup_height = 5;

    let popup_area = Rect {
        x: area.x + (area.width.saturating_sub(popup_width)) / 2,
        y: area.y + (area.height.saturating_sub(popup_height)) / 2,
        width: popup_width,
        height: popup_height.min(area.height),
    };

    frame.render_widget(Clear, popup_area);

    let popup = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(message, Theme::accent())),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(Theme::accent())
            .title(Span::styled(title, Theme::accent()))
            .style(Style::default().bg(Theme::BACKGROUND)),
    );

    frame.render_widget(popup, popup_area);
}
