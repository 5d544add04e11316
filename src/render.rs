/// Plain-text rendering of a session snapshot for the terminal UI
use std::fmt::Write;

use crate::durations::format_duration;
use crate::session::SessionSnapshot;

/// Width of the title column before the duration
const TITLE_WIDTH: usize = 48;

pub fn render(snapshot: &SessionSnapshot) -> String {
    let mut out = String::new();

    if snapshot.is_loading {
        out.push_str("Loading…\n");
    } else if snapshot.parts.is_empty() {
        match &snapshot.error_message {
            Some(error) => {
                let _ = writeln!(out, "Error: {}", error);
            }
            None => out.push_str("Enter a BV identifier or link to start\n"),
        }
    } else {
        out.push_str(&render_parts(snapshot));
        out.push_str(&render_summary(snapshot));
    }

    if let Some(toast) = &snapshot.toast_message {
        let _ = writeln!(out, "» {}", toast);
    }

    out
}

/// Part list with the selected window marked
pub fn render_parts(snapshot: &SessionSnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Parts ({} total):", snapshot.parts.len());

    for (index, part) in snapshot.parts.iter().enumerate() {
        let page = index + 1;
        let marker = if page >= snapshot.from && page <= snapshot.to { '▶' } else { ' ' };
        let label = truncate(&format!("P{}: {}", part.page, part.title), TITLE_WIDTH);
        let _ = writeln!(
            out,
            "{} {:<width$} {:>8}",
            marker,
            label,
            format_duration(part.duration as f64),
            width = TITLE_WIDTH
        );
    }

    out
}

pub fn render_summary(snapshot: &SessionSnapshot) -> String {
    format!(
        "Total (P{}-P{}): {}\nAdjusted ({}x): {}\n",
        snapshot.from,
        snapshot.to,
        format_duration(snapshot.total_duration as f64),
        snapshot.speed,
        format_duration(snapshot.adjusted_total_duration),
    )
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}
