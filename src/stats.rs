//! Status breakdown of the visible (filtered) users, for the chart.

use ratatui::style::Color;

use crate::source::UserSummary;

pub const UNKNOWN_STATUS: &str = "Unknown";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusBucket {
    pub label: String,
    pub count: usize,
}

/// Count users per status, in order of first appearance. Empty statuses count as "Unknown".
pub fn status_counts(users: &[UserSummary]) -> Vec<StatusBucket> {
    let mut buckets: Vec<StatusBucket> = Vec::new();
    for user in users {
        let label = if user.status.is_empty() {
            UNKNOWN_STATUS
        } else {
            user.status.as_str()
        };
        match buckets.iter_mut().find(|b| b.label == label) {
            Some(bucket) => bucket.count += 1,
            None => buckets.push(StatusBucket {
                label: label.to_string(),
                count: 1,
            }),
        }
    }
    buckets
}

pub fn status_color(label: &str) -> Color {
    match label {
        "Active" => Color::Rgb(0x10, 0xb9, 0x81),
        "Inactive" => Color::Rgb(0xef, 0x44, 0x44),
        UNKNOWN_STATUS => Color::Rgb(0x9c, 0xa3, 0xaf),
        _ => Color::Rgb(0x63, 0x66, 0xf1),
    }
}

/// Share of `total` in percent, rounded to one decimal.
pub fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (count as f64 * 1000.0 / total as f64).round() / 10.0
}

/// `"<label>: <count> (<pct>%)"`, relative to the visible total.
pub fn tooltip(bucket: &StatusBucket, total: usize) -> String {
    format!(
        "{}: {} ({:.1}%)",
        bucket.label,
        bucket.count,
        percentage(bucket.count, total)
    )
}

/// Split `width` cells across buckets in proportion to their counts. Every non-empty
/// bucket gets at least one cell when there is room; the sum is exactly `width`.
pub fn segment_widths(buckets: &[StatusBucket], width: u16) -> Vec<u16> {
    let total: usize = buckets.iter().map(|b| b.count).sum();
    if total == 0 || width == 0 {
        return vec![0; buckets.len()];
    }
    let mut widths: Vec<u16> = buckets
        .iter()
        .map(|b| ((b.count * width as usize) / total) as u16)
        .collect();
    if buckets.len() <= width as usize {
        for w in widths.iter_mut() {
            if *w == 0 {
                *w = 1;
            }
        }
    }
    // hand leftover (or excess) cells to the largest bucket
    let used: u16 = widths.iter().sum();
    if let Some((idx, _)) = buckets.iter().enumerate().max_by_key(|(_, b)| b.count) {
        if used < width {
            widths[idx] += width - used;
        } else {
            widths[idx] = widths[idx].saturating_sub(used - width);
        }
    }
    widths
}
