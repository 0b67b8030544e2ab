//! Terminal UI rendering.
//!
//! All drawing logic lives here, separated from application state ([`App`])
//! and input handling ([`crate::input`]).  Nothing in this module mutates
//! feed state; it only reads [`FeedState`] and the list selection.
//!
//! Layout, top to bottom: feed tabs, the "new items" banner (only when the
//! feed has something to merge), the page, a detail pane for the selected
//! item, and a one-line status bar.

use chrono::Utc;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Tabs, Wrap},
    Frame,
};

use crate::app::App;
use crate::feed::FeedState;
use crate::live::ConnectionState;

/// Draw the complete UI for one frame.
pub fn draw(app: &mut App, frame: &mut Frame) {
    let banner = app.active_feed().and_then(FeedState::pending_banner);
    let [tabs_area, banner_area, list_area, detail_area, status_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(u16::from(banner.is_some())),
        Constraint::Min(3),
        Constraint::Length(6),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    draw_tabs(app, frame, tabs_area);
    if let (Some(count), Some(feed)) = (banner, app.active_feed()) {
        draw_banner(feed, count, frame, banner_area);
    }
    draw_feed_list(app, frame, list_area);
    draw_detail(app, frame, detail_area);
    draw_status_bar(app, frame, status_area);
}

fn draw_tabs(app: &App, frame: &mut Frame, area: Rect) {
    let titles: Vec<Line> = app
        .store()
        .feeds()
        .iter()
        .map(|feed| {
            let mut label = feed.category().label();
            if feed.pending_len() > 0 {
                label.push_str(&format!(" +{}", feed.pending_len()));
            }
            Line::from(label)
        })
        .collect();
    let tabs = Tabs::new(titles)
        .select(app.active_index())
        .highlight_style(Style::default().add_modifier(Modifier::BOLD).fg(Color::Cyan));
    frame.render_widget(tabs, area);
}

fn draw_banner(feed: &FeedState, count: usize, frame: &mut Frame, area: Rect) {
    let noun = if count == 1 { "item" } else { "items" };
    let mut spans = vec![Span::styled(
        format!(" {count} new {noun} (press m to show) "),
        Style::default().fg(Color::Black).bg(Color::Yellow),
    )];
    if let Some(latest) = feed.pending().next() {
        spans.push(Span::styled(
            format!(" latest: {}", latest.title),
            Style::default().fg(Color::Yellow),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render the current page.
fn draw_feed_list(app: &mut App, frame: &mut Frame, area: Rect) {
    let now = Utc::now();
    let (title, list_items): (String, Vec<ListItem>) = match app.active_feed() {
        Some(feed) => {
            let items = feed
                .visible()
                .iter()
                .map(|item| {
                    ListItem::new(Line::from(vec![
                        Span::styled(
                            format!("{:<10}", item.age_label(now)),
                            Style::default().fg(Color::DarkGray),
                        ),
                        Span::raw(" "),
                        Span::styled(item.title.clone(), Style::default().fg(Color::White)),
                        Span::raw("  "),
                        Span::styled(
                            format!("[{}]", item.source),
                            Style::default().fg(Color::Cyan),
                        ),
                    ]))
                })
                .collect();
            (format!(" {} ", feed.category().label()), items)
        }
        None => (" News ".into(), Vec::new()),
    };

    let list = List::new(list_items)
        .block(Block::default().title(title).borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::DarkGray),
        )
        .highlight_symbol("▸ ");

    frame.render_stateful_widget(list, area, &mut app.list_state);
}

fn draw_detail(app: &App, frame: &mut Frame, area: Rect) {
    let selected = app
        .active_feed()
        .zip(app.list_state.selected())
        .and_then(|(feed, i)| feed.visible().get(i));

    let lines = match selected {
        Some(item) => {
            let mut meta = item.source.clone();
            if let Some(id) = &item.id {
                meta.push_str(&format!("  #{id}"));
            }
            if item.image_url.is_some() {
                meta.push_str("  [image]");
            }
            vec![
                Line::from(Span::styled(meta, Style::default().fg(Color::DarkGray))),
                Line::from(item.plain_summary()),
                Line::from(Span::styled(
                    item.link.clone(),
                    Style::default().fg(Color::Blue),
                )),
            ]
        }
        None => Vec::new(),
    };
    let detail = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(detail, area);
}

/// Render the bottom status bar.
fn draw_status_bar(app: &App, frame: &mut Frame, area: Rect) {
    let (dot, dot_style) = match app.connection() {
        ConnectionState::Connected => ("● live", Style::default().fg(Color::Green)),
        ConnectionState::Connecting => ("◌ connecting", Style::default().fg(Color::Yellow)),
        ConnectionState::Disconnected => ("○ offline", Style::default().fg(Color::Red)),
    };
    let (page, loading) = app.active_feed().map_or((String::new(), false), |feed| {
        let prev = if feed.has_prev_page() { "‹ " } else { "  " };
        let next = if feed.has_next_page() { " ›" } else { "  " };
        (
            format!("{prev}Page {}/{}{next}", feed.page(), feed.total_pages()),
            feed.is_loading(),
        )
    });

    let mut spans = vec![
        Span::raw(" "),
        Span::styled(dot, dot_style),
        Span::raw("  "),
        Span::styled(page, Style::default().fg(Color::Green)),
    ];
    if loading {
        spans.push(Span::styled(" loading…", Style::default().fg(Color::Magenta)));
    }
    spans.extend([
        Span::raw("  "),
        Span::styled(app.status.clone(), Style::default().fg(Color::Yellow)),
        Span::raw("  q: quit  ←/→: page  Tab: feed  m: merge  r: reload"),
    ]);
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
