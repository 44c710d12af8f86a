//! Detail overlay rendering.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::AppState;
use crate::app::loader::DetailState;
use crate::app::overlay::OverlayControl;
use crate::app::theme::Palette;
use crate::stats::status_color;
use crate::ui::components::centered_rect;

/// Split a timestamp into a display date ("Jan 2, 2023") and time ("10:00 AM").
/// Unparsable input is returned as-is with an empty time.
pub fn format_timestamp(raw: &str) -> (String, String) {
    const DATE: &str = "%b %-d, %Y";
    const TIME: &str = "%I:%M %p";
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return (dt.format(DATE).to_string(), dt.format(TIME).to_string());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return (dt.format(DATE).to_string(), dt.format(TIME).to_string());
    }
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return (d.format(DATE).to_string(), String::new());
    }
    (raw.to_string(), String::new())
}

fn control_style(p: &Palette, focused: bool) -> Style {
    if focused {
        Style::default()
            .fg(p.highlight_fg)
            .bg(p.highlight_bg)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(p.accent)
    }
}

pub fn render_detail_overlay(f: &mut Frame, area: Rect, app: &mut AppState) {
    if !app.overlay.is_open() {
        app.layout.overlay = None;
        return;
    }
    let p = app.palette();
    let controls = app.overlay_controls();
    let focused = app.overlay.focused(controls);
    let is_focused = |c: OverlayControl| focused == Some(c);

    let height = area.height.saturating_sub(4).min(22);
    let rect = centered_rect(64, height, area);
    app.layout.overlay = Some(rect);

    let block = Block::default()
        .title(" User Details ")
        .title(
            Line::from(Span::styled(" [×] ", control_style(&p, is_focused(OverlayControl::Close))))
                .alignment(Alignment::Right),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(p.accent))
        .style(Style::default().bg(p.background).fg(p.text));

    let label = Style::default().fg(p.muted).add_modifier(Modifier::BOLD);
    let mut lines: Vec<Line> = vec![Line::raw("")];
    match app.detail.state() {
        DetailState::Idle | DetailState::Loading => {
            lines.push(
                Line::from(Span::styled(
                    "Loading user details...",
                    Style::default().fg(p.muted),
                ))
                .alignment(Alignment::Center),
            );
        }
        DetailState::Failed(err) => {
            lines.push(Line::from(Span::styled(
                "Error loading user",
                Style::default().fg(p.error).add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(Span::styled(
                err.to_string(),
                Style::default().fg(p.error),
            )));
            lines.push(Line::raw(""));
            lines.push(Line::from(Span::styled(
                " Close ",
                control_style(&p, is_focused(OverlayControl::ErrorClose)),
            )));
        }
        DetailState::Loaded(user) => {
            let (joined_date, joined_time) = format_timestamp(&user.joined_at);
            let (seen_date, seen_time) = format_timestamp(&user.last_seen);
            lines.push(
                Line::from(Span::styled(
                    user.name.clone(),
                    Style::default().fg(p.title).add_modifier(Modifier::BOLD),
                ))
                .alignment(Alignment::Center),
            );
            lines.push(
                Line::from(Span::styled(
                    user.status.clone(),
                    Style::default().fg(status_color(&user.status)),
                ))
                .alignment(Alignment::Center),
            );
            lines.push(Line::raw(""));
            lines.push(Line::from(Span::styled("Email", label)));
            lines.push(Line::from(Span::styled(
                user.email.clone(),
                control_style(&p, is_focused(OverlayControl::Email)).add_modifier(Modifier::UNDERLINED),
            )));
            lines.push(Line::raw(""));
            lines.push(Line::from(Span::styled("Bio", label)));
            lines.push(Line::raw(user.bio.clone()));
            lines.push(Line::raw(""));
            lines.push(Line::from(vec![
                Span::styled("Joined Date  ", label),
                Span::raw(format!("{joined_date} {joined_time}")),
            ]));
            lines.push(Line::from(vec![
                Span::styled("Last Seen    ", label),
                Span::raw(format!("{seen_date} {seen_time}")),
            ]));
            if let Some(avatar) = &user.avatar {
                lines.push(Line::from(vec![
                    Span::styled("Avatar       ", label),
                    Span::styled(avatar.clone(), Style::default().fg(p.muted)),
                ]));
            }
            lines.push(Line::raw(""));
            lines.push(
                Line::from(Span::styled(
                    "  Close  ",
                    control_style(&p, is_focused(OverlayControl::CloseButton)),
                ))
                .alignment(Alignment::Center),
            );
        }
    }

    let body = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    f.render_widget(Clear, rect);
    f.render_widget(body, rect);
}
