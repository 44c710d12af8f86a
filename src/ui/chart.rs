use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::AppState;
use crate::stats::{segment_widths, status_color, status_counts, tooltip};
use crate::ui::components::render_message_panel;

/// Status breakdown of the filtered users as a proportional bar plus legend.
pub fn render_status_chart(f: &mut Frame, area: Rect, app: &AppState) {
    let p = app.palette();
    if app.is_loading() {
        render_message_panel(
            f,
            area,
            &p,
            ("Loading chart data...", Style::default().fg(p.text)),
            &[],
        );
        return;
    }
    if app.view.filtered.is_empty() {
        render_message_panel(
            f,
            area,
            &p,
            ("No data available", Style::default().fg(p.text)),
            &["Adjust your filters to see user status distribution"],
        );
        return;
    }

    let block = Block::default()
        .title("Users by Status")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(p.border));
    let inner = block.inner(area);

    let buckets = status_counts(&app.view.filtered);
    let total = app.view.filtered.len();
    let widths = segment_widths(&buckets, inner.width);

    let bar: Vec<Span> = buckets
        .iter()
        .zip(&widths)
        .map(|(b, w)| {
            Span::styled(
                "█".repeat(*w as usize),
                Style::default().fg(status_color(&b.label)),
            )
        })
        .collect();

    let mut lines = vec![Line::from(bar.clone()), Line::from(bar), Line::raw("")];
    for bucket in &buckets {
        lines.push(Line::from(vec![
            Span::styled("■ ", Style::default().fg(status_color(&bucket.label))),
            Span::styled(
                tooltip(bucket, total),
                Style::default().fg(p.text).add_modifier(Modifier::BOLD),
            ),
        ]));
    }

    f.render_widget(block, area);
    f.render_widget(Paragraph::new(lines), inner);
}
