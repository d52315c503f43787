//! Free-form value canonicalization: boolean-ish detection, truthy parsing,
//! asset-type canonicalization, status tests and date-only coercion.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;

use crate::model::{AssetType, AttrValue, Cell};

/// Cell texts (lower-cased, trimmed) that count as a set presence flag.
const TRUTHY: &[&str] = &["yes", "true", "y", "x", "1", "present", "checked"];
/// Explicit negatives; anything else must parse as a number to stay boolean-ish.
const FALSY: &[&str] = &["no", "false", "0", ""];

/// Status values that exclude an observation from presence accounting.
/// Blank/absent status counts as active.
const NEGATIVE_STATUSES: &[&str] = &["mothballed", "removed", "inactive", "decommissioned"];

/// Header tokens that veto asset canonicalization even when an asset word
/// matches (e.g. "Cableway Condition" is an attribute, not a flag).
const ASSET_HEADER_EXCLUSIONS: &[&str] = &[
    "condition", "status", "service", "in service", "functional",
    "id", "identifier", "type", "material", "owner", "region",
    "date", "installed", "comment", "note",
];

/// Collapse internal whitespace runs and trim.
pub fn clean_header(h: &str) -> String {
    h.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub(crate) fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok()
}

/// Whether every distinct non-empty value in a column is truthy, falsy or
/// numeric. A column with no non-empty values is not boolean-ish; one
/// non-coercible distinct value disqualifies the whole column.
pub fn is_boolish_column<'a>(cells: impl IntoIterator<Item = &'a Cell>) -> bool {
    let mut seen = BTreeSet::new();
    for cell in cells {
        if cell.is_blank() {
            continue;
        }
        seen.insert(cell.display().to_lowercase());
    }
    if seen.is_empty() {
        return false;
    }
    seen.iter().all(|v| {
        TRUTHY.contains(&v.as_str()) || FALSY.contains(&v.as_str()) || parse_number(v).is_some()
    })
}

/// Truthy evaluation of a single flag cell: member of the truthy set, or a
/// nonzero number.
pub fn is_truthy(cell: &Cell) -> bool {
    match cell {
        Cell::Empty => false,
        Cell::DateTime(_) => false,
        Cell::Number(n) => *n != 0.0,
        Cell::Text(s) => {
            let v = s.trim().to_lowercase();
            TRUTHY.contains(&v.as_str()) || parse_number(&v).is_some_and(|n| n != 0.0)
        }
    }
}

fn asset_header_patterns() -> &'static [(Regex, AssetType)] {
    static PATTERNS: OnceLock<Vec<(Regex, AssetType)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            (r"\bcableway\b", AssetType::Cableway),
            (r"\bweir\b", AssetType::Weir),
            (r"\bwell\b", AssetType::Well),
            (r"\bmetering\s*bridge\b", AssetType::MeteringBridge),
            (r"\bbridge\b", AssetType::MeteringBridge),
            (r"\bheli(copter)?\s*pad\b", AssetType::HelicopterPad),
            (r"\bshelter\b", AssetType::Shelter),
            (r"\bflume\b", AssetType::Flume),
        ]
        .iter()
        .map(|(pat, canon)| (Regex::new(pat).unwrap(), *canon))
        .collect()
    })
}

/// Map a column header to a canonical asset type (station-centric flags).
/// First pattern wins; an exclusion token anywhere vetoes the header.
///
/// Exclusion tokens match whole words (phrases match as substrings), so
/// "bridge" is not vetoed by the "id" it happens to contain.
pub fn header_to_asset(header: &str) -> Option<AssetType> {
    let s = clean_header(header).to_lowercase();
    let words: BTreeSet<&str> = s
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();
    let excluded = ASSET_HEADER_EXCLUSIONS.iter().any(|tok| {
        if tok.contains(' ') {
            s.contains(tok)
        } else {
            words.contains(tok)
        }
    });
    if excluded {
        return None;
    }
    asset_header_patterns()
        .iter()
        .find(|(re, _)| re.is_match(&s))
        .map(|(_, canon)| *canon)
}

/// Map an asset-centric category label to a canonical asset type.
/// Non-asset categories (e.g. "Installation Type") map to nothing.
pub fn category_to_asset(category: &str) -> Option<AssetType> {
    let s = category.trim().to_lowercase();
    if s.contains("shelter type") {
        return Some(AssetType::Shelter);
    }
    if s.contains("well type") {
        return Some(AssetType::Well);
    }
    if s.contains("cableway") {
        return Some(AssetType::Cableway);
    }
    if s.contains("weir") {
        return Some(AssetType::Weir);
    }
    if s.contains("metering bridge") || s.contains("bridge") {
        return Some(AssetType::MeteringBridge);
    }
    None
}

/// Whether a status cell counts toward presence. Blank/absent is active.
pub fn is_active_status(status: Option<&Cell>) -> bool {
    let Some(cell) = status else { return true };
    let s = cell.display().to_lowercase();
    if s.is_empty() {
        return true;
    }
    !NEGATIVE_STATUSES.contains(&s.as_str())
}

/// Noisy form-tool time columns excluded from station attributes.
pub fn is_excluded_attr_header(header: &str) -> bool {
    let s = clean_header(header).to_lowercase();
    s.contains("start time") || s.contains("completion time")
}

pub fn is_lat_header(header: &str) -> bool {
    let h = header.to_lowercase();
    h.contains("lat") && !h.contains("plate")
}

pub fn is_lon_header(header: &str) -> bool {
    let h = header.to_lowercase();
    (h.contains("lon") || h.contains("lng")) && !h.contains("length")
}

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%b-%Y"];
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Parse free text into a calendar date using a fixed format list.
pub fn parse_date_text(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    None
}

/// Reduce a cell to an attribute value, coercing date-like content to a
/// `YYYY-MM-DD` string. Digit-free or unparseable text passes through.
pub fn coerce_date_only(cell: &Cell) -> AttrValue {
    match cell {
        Cell::DateTime(dt) => AttrValue::Date(dt.date().format("%Y-%m-%d").to_string()),
        Cell::Number(n) => AttrValue::Number(*n),
        Cell::Text(s) => {
            let t = s.trim();
            if t.chars().any(|c| c.is_ascii_digit()) {
                if let Some(d) = parse_date_text(t) {
                    return AttrValue::Date(d.format("%Y-%m-%d").to_string());
                }
            }
            AttrValue::Text(t.to_string())
        }
        Cell::Empty => AttrValue::Text(String::new()),
    }
}

/// Attribute value without date-guessing on text; datetime cells still
/// reduce to their calendar date.
pub fn attr_value(cell: &Cell) -> AttrValue {
    match cell {
        Cell::DateTime(dt) => AttrValue::Date(dt.date().format("%Y-%m-%d").to_string()),
        Cell::Number(n) => AttrValue::Number(*n),
        Cell::Text(s) => AttrValue::Text(s.trim().to_string()),
        Cell::Empty => AttrValue::Text(String::new()),
    }
}
