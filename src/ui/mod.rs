pub mod chart;
pub mod components;
pub mod detail;
pub mod users;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::debounce::DebounceState;
use crate::app::theme::ThemeMode;
use crate::app::{AppState, InputMode};

pub fn render(f: &mut Frame, app: &mut AppState) {
    let p = app.palette();
    f.render_widget(
        Block::default().style(Style::default().bg(p.background).fg(p.text)),
        f.area(),
    );

    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(6),
            Constraint::Length(1),
            Constraint::Length(if app.show_help { 1 } else { 0 }),
            Constraint::Length(1),
        ])
        .split(f.area());
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
        .split(root[1]);

    render_header(f, root[0], app);
    users::render_users_table(f, body[0], app);
    chart::render_status_chart(f, body[1], app);
    users::render_pagination(f, root[2], app);
    if app.show_help {
        components::render_help_line(f, root[3], app);
    }
    components::render_status_bar(f, root[4], app);

    detail::render_detail_overlay(f, f.area(), app);
}

/// Title plus the search prompt and the filter, sort and theme selectors.
fn render_header(f: &mut Frame, area: Rect, app: &mut AppState) {
    let p = app.palette();
    let theme = app.theme_context().theme();
    let searching = app.input_mode == InputMode::Search;
    let pending = app.search.state() == DebounceState::Pending;

    let label = Style::default().fg(p.muted);
    let value = Style::default().fg(p.header_fg).add_modifier(Modifier::BOLD);
    let prompt_style = if searching {
        Style::default().fg(p.highlight_fg).bg(p.highlight_bg)
    } else {
        Style::default().fg(p.text)
    };

    let mut controls = vec![
        Span::styled("Search: ", label),
        Span::styled(
            format!("{}{}", app.search.raw(), if searching { "▏" } else { "" }),
            prompt_style,
        ),
    ];
    if pending {
        controls.push(Span::styled(" ⟳", Style::default().fg(p.accent)));
    }
    controls.extend([
        Span::raw("   "),
        Span::styled("Status: ", label),
        Span::styled(app.filters.status_filter.label(), value),
        Span::raw("   "),
        Span::styled("Sort: ", label),
        Span::styled(app.filters.sort_key.label(), value),
        Span::raw("   "),
        Span::styled("Theme: ", label),
        Span::styled(
            match theme {
                ThemeMode::Light => "Light",
                ThemeMode::Dark => "Dark",
            },
            value,
        ),
    ]);

    let header = Paragraph::new(vec![Line::from(controls)])
        .block(
            Block::default()
                .title(Line::from(vec![
                    Span::styled(
                        " Users Dashboard ",
                        Style::default().fg(p.title).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(format!("· {} ", app.bulk.source().describe()), label),
                ]))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(p.border)),
        )
        .style(Style::default().bg(p.header_bg));
    f.render_widget(header, area);
}
