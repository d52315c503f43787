//! Header & column role inference.
//!
//! Each role resolves through an ordered rule list evaluated
//! first-match-wins over the cleaned, lower-cased headers, so individual
//! rules stay testable and the assignment is deterministic.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::model::Table;

/// Known station-id header spellings, matched exactly (case-insensitive).
const STATION_ID_LABELS: &[&str] = &[
    "station id",
    "station_id",
    "stationid",
    "station number",
    "station",
    "station code",
    "site id",
    "site code",
    "nhs id",
];

const STATION_NAME_LABELS: &[&str] = &["station name", "site name", "name"];

fn lower_headers(table: &Table) -> Vec<String> {
    table.headers().iter().map(|h| h.to_lowercase()).collect()
}

/// Locate the station-identifier column.
///
/// Rule order: exact known label; "station" combined with "id"/"number" (or
/// a bare "station"); "site id"/"site code"; finally content inspection for
/// identifier-shaped columns.
pub fn find_station_id_column(table: &Table) -> Option<usize> {
    let lower = lower_headers(table);

    if let Some(i) = lower
        .iter()
        .position(|h| STATION_ID_LABELS.contains(&h.as_str()))
    {
        return Some(i);
    }
    if let Some(i) = lower.iter().position(|h| {
        (h.contains("station") && (h.contains("id") || h.contains("number"))) || h == "station"
    }) {
        return Some(i);
    }
    if let Some(i) = lower.iter().position(|h| h == "site id" || h == "site code") {
        return Some(i);
    }
    (0..table.column_count()).find(|&c| is_station_id_like(table, c))
}

/// Identifier-shaped column: at least 90% of non-empty values are
/// alphanumeric tokens (plus `-`/`_`/`/`), with a distinct-value ratio
/// strictly between 5% and 90% — rules out constant columns and
/// fully-unique free text while allowing ids with some repeats.
pub fn is_station_id_like(table: &Table, col: usize) -> bool {
    let values: Vec<String> = table
        .column(col)
        .filter(|c| !c.is_blank())
        .map(|c| c.display())
        .collect();
    if values.is_empty() {
        return false;
    }
    let token_like = values
        .iter()
        .filter(|v| {
            v.chars()
                .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '/'))
        })
        .count();
    if (token_like as f64) < 0.9 * values.len() as f64 {
        return false;
    }
    let distinct: BTreeSet<&String> = values.iter().collect();
    let ratio = distinct.len() as f64 / values.len() as f64;
    ratio > 0.05 && ratio < 0.9
}

/// Locate the station-name column: exact known label first, then any header
/// where "station" and "name" co-occur.
pub fn find_station_name_column(table: &Table) -> Option<usize> {
    let lower = lower_headers(table);
    if let Some(i) = lower
        .iter()
        .position(|h| STATION_NAME_LABELS.contains(&h.as_str()))
    {
        return Some(i);
    }
    lower
        .iter()
        .position(|h| h.contains("station") && h.contains("name"))
}

fn category_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b(type|category)\b").unwrap())
}

/// First header matching the whole word "type" or "category".
pub fn find_category_column(table: &Table) -> Option<usize> {
    lower_headers(table)
        .iter()
        .position(|h| category_re().is_match(h))
}

/// The value column is positional: immediately after the category column.
pub fn find_value_column(table: &Table, category_col: usize) -> Option<usize> {
    let next = category_col + 1;
    (next < table.column_count()).then_some(next)
}

pub fn find_status_column(table: &Table) -> Option<usize> {
    lower_headers(table).iter().position(|h| h.contains("status"))
}

pub fn find_date_column(table: &Table) -> Option<usize> {
    lower_headers(table).iter().position(|h| h.contains("date"))
}

pub fn find_note_column(table: &Table) -> Option<usize> {
    lower_headers(table)
        .iter()
        .position(|h| h.contains("comment") || h.contains("note") || h.contains("remark"))
}
