use crate::models::Note;
use std::cmp::Ordering;

/// Newest first. Unparseable timestamps go last; ties fall back to id.
pub(crate) fn cmp_updated_desc(a: &Note, b: &Note) -> Ordering {
    match (a.updated_ts(), b.updated_ts()) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => b.updated_at.cmp(&a.updated_at),
    }
    .then_with(|| a.id.cmp(&b.id))
}

pub(crate) fn sort_notes(notes: &mut [Note]) {
    notes.sort_by(cmp_updated_desc);
}

/// Short label for the sidebar, e.g. `Mar 2, 2024 10:30`.
pub(crate) fn format_updated(ts: &str) -> String {
    match chrono::DateTime::parse_from_rfc3339(ts.trim()) {
        Ok(dt) => dt.format("%b %-d, %Y %H:%M").to_string(),
        Err(_) => ts.to_string(),
    }
}

/// First non-empty line of the content, cut to `max` chars.
pub(crate) fn preview(content: &str, max: usize) -> String {
    let line = content
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or_default();

    if line.chars().count() <= max {
        return line.to_string();
    }
    let cut: String = line.chars().take(max).collect();
    format!("{}…", cut.trim_end())
}
