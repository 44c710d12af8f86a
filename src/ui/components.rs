//! Shared UI components (status bar, help line, message panels, modal helpers).
//!
use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::app::keymap::{KeyAction, Keymap};
use crate::app::theme::Palette;
use crate::app::{AppState, InputMode};

/// Render the bottom status bar with mode, counts and the latest message.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let p = app.palette();
    let mode = match app.input_mode {
        InputMode::Normal => "NORMAL",
        InputMode::Search => "SEARCH",
        InputMode::Overlay => "DETAIL",
    };
    let mut msg = format!(
        "mode: {mode}  users:{}  visible:{}  rows/page:{}",
        app.users_all.len(),
        app.view.filtered.len(),
        app.filters.page_size,
    );
    if let Some(status) = &app.status_message {
        msg.push_str("  ");
        msg.push_str(status);
    }
    let bar = Paragraph::new(msg).style(Style::default().fg(p.status_fg).bg(p.status_bg));
    f.render_widget(bar, area);
}

/// One-line summary of the main keys, built from the active keymap.
pub fn help_line(keymap: &Keymap) -> String {
    let entries = [
        (KeyAction::StartSearch, "search"),
        (KeyAction::CycleStatusFilter, "status"),
        (KeyAction::ToggleSort, "sort"),
        (KeyAction::CyclePageSize, "page size"),
        (KeyAction::PrevPage, "prev"),
        (KeyAction::NextPage, "next"),
        (KeyAction::OpenDetail, "details"),
        (KeyAction::ToggleTheme, "theme"),
        (KeyAction::Retry, "reload"),
        (KeyAction::Quit, "quit"),
    ];
    entries
        .iter()
        .filter_map(|(action, label)| keymap.key_for(*action).map(|k| format!("{k}: {label}")))
        .collect::<Vec<_>>()
        .join("  ")
}

pub fn render_help_line(f: &mut Frame, area: Rect, app: &AppState) {
    let p = app.palette();
    let line = Paragraph::new(help_line(&app.keymap)).style(Style::default().fg(p.muted));
    f.render_widget(line, area);
}

/// A bordered, centered panel with a bold heading and body lines.
pub fn render_message_panel(
    f: &mut Frame,
    area: Rect,
    palette: &Palette,
    heading: (&str, Style),
    body: &[&str],
) {
    let mut lines = vec![
        Line::raw(""),
        Line::from(Span::styled(
            heading.0.to_string(),
            heading.1.add_modifier(Modifier::BOLD),
        )),
    ];
    for text in body {
        lines.push(Line::from(Span::styled(
            text.to_string(),
            Style::default().fg(palette.muted),
        )));
    }
    let panel = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.border)),
        );
    f.render_widget(panel, area);
}

/// Compute a centered rectangle of a fixed size within an area.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}
