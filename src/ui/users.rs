use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};

use crate::app::AppState;
use crate::search::PAGE_SIZES;
use crate::stats::status_color;
use crate::ui::components::render_message_panel;

/// Users table, or the loading / error / empty panel in its place.
pub fn render_users_table(f: &mut Frame, area: Rect, app: &mut AppState) {
    let p = app.palette();
    app.layout.rows = Rect::default();

    if app.is_loading() {
        let block = Block::default()
            .title("Users")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(p.border));
        let inner = block.inner(area);
        let placeholder: Vec<Line> = (0..inner.height.min(6 * 2))
            .map(|i| {
                if i % 2 == 0 {
                    Line::from(Span::styled(
                        "░".repeat(inner.width.saturating_sub(2) as usize),
                        Style::default().fg(p.border),
                    ))
                } else {
                    Line::raw("")
                }
            })
            .collect();
        f.render_widget(block, area);
        f.render_widget(Paragraph::new(placeholder), inner);
        return;
    }

    if let Some(err) = &app.load_error {
        let msg = err.to_string();
        render_message_panel(
            f,
            area,
            &p,
            ("Something went wrong", Style::default().fg(p.error)),
            &[msg.as_str(), "", "Press r to retry"],
        );
        return;
    }

    if app.view.filtered.is_empty() {
        render_message_panel(
            f,
            area,
            &p,
            ("No users found", Style::default().fg(p.title)),
            &["Try adjusting your search or filters."],
        );
        return;
    }

    // border + header row
    app.layout.rows = Rect {
        x: area.x + 1,
        y: area.y + 2,
        width: area.width.saturating_sub(2),
        height: area.height.saturating_sub(3),
    };
    let rows = app.view.page.iter().enumerate().map(|(i, u)| {
        let style = if i == app.selected_row {
            Style::default()
                .fg(p.highlight_fg)
                .bg(p.highlight_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(p.text)
        };
        Row::new(vec![
            Cell::from(u.name.clone()),
            Cell::from(u.email.clone()),
            Cell::from(Span::styled(
                u.status.clone(),
                Style::default().fg(status_color(&u.status)),
            )),
        ])
        .style(style)
    });

    let widths = [
        Constraint::Percentage(35),
        Constraint::Percentage(45),
        Constraint::Percentage(20),
    ];
    let header = Row::new(vec!["NAME", "EMAIL", "STATUS"])
        .style(Style::default().fg(p.title).add_modifier(Modifier::BOLD));

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title("Users")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(p.border)),
        )
        .column_spacing(1);

    // the stateful render scrolls the offset so the selected row stays visible
    app.table_state.select(Some(app.selected_row));
    f.render_stateful_widget(table, area, &mut app.table_state);
}

/// "Page X of Y" with previous/next hints and the page size selector.
pub fn render_pagination(f: &mut Frame, area: Rect, app: &AppState) {
    if app.is_loading() || app.load_error.is_some() || app.view.filtered.is_empty() {
        return;
    }
    let p = app.palette();
    let enabled = Style::default().fg(p.accent).add_modifier(Modifier::BOLD);
    let disabled = Style::default().fg(p.muted).add_modifier(Modifier::DIM);
    let at_first = app.filters.current_page <= 1;
    let at_last = app.filters.current_page >= app.view.total_pages;

    let mut spans = vec![Span::styled("page size: ", Style::default().fg(p.text))];
    for size in PAGE_SIZES {
        let label = format!(" {size} ");
        if size == app.filters.page_size {
            spans.push(Span::styled(
                label,
                Style::default().fg(p.highlight_fg).bg(p.highlight_bg),
            ));
        } else {
            spans.push(Span::styled(label, Style::default().fg(p.muted)));
        }
    }
    spans.push(Span::raw("    "));
    spans.push(Span::styled(
        "◀ Previous",
        if at_first { disabled } else { enabled },
    ));
    spans.push(Span::styled(
        format!(
            "   Page {} of {}   ",
            app.filters.current_page, app.view.total_pages
        ),
        Style::default().fg(p.text),
    ));
    spans.push(Span::styled("Next ▶", if at_last { disabled } else { enabled }));

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
