use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDateTime;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// A single typed cell as handed over by an IO adapter.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    DateTime(NaiveDateTime),
}

impl Cell {
    /// Empty, or text that trims to nothing.
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Text rendering used for identity, counting and display. Integral
    /// numbers render without a trailing `.0` so numeric id columns keep
    /// their identifier shape.
    pub fn display(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.trim().to_string(),
            Cell::Number(n) => fmt_number(*n),
            Cell::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

pub(crate) fn fmt_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

/// A fully-materialized input table: cleaned header strings plus row-major
/// cells. Rows are padded (or truncated) to header width on construction.
#[derive(Debug, Clone)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(headers: Vec<String>, mut rows: Vec<Vec<Cell>>) -> Self {
        let headers: Vec<String> = headers
            .iter()
            .map(|h| crate::coerce::clean_header(h))
            .collect();
        for row in &mut rows {
            row.resize(headers.len(), Cell::Empty);
        }
        Table { headers, rows }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn header(&self, col: usize) -> &str {
        &self.headers[col]
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        &self.rows[row][col]
    }

    pub fn column(&self, col: usize) -> impl Iterator<Item = &Cell> {
        self.rows.iter().map(move |r| &r[col])
    }
}

// ---------------------------------------------------------------------------
// Normalized model
// ---------------------------------------------------------------------------

/// Canonical asset vocabulary used as the comparison key between sources.
///
/// Variant order follows the label's lexicographic order so the derived
/// `Ord` sorts the same way the labels do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum AssetType {
    #[serde(rename = "Cableway")]
    Cableway,
    #[serde(rename = "Flume")]
    Flume,
    #[serde(rename = "Helicopter Pad")]
    HelicopterPad,
    #[serde(rename = "Metering Bridge")]
    MeteringBridge,
    #[serde(rename = "Shelter")]
    Shelter,
    #[serde(rename = "Weir")]
    Weir,
    #[serde(rename = "Well")]
    Well,
}

impl AssetType {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Cableway => "Cableway",
            Self::Flume => "Flume",
            Self::HelicopterPad => "Helicopter Pad",
            Self::MeteringBridge => "Metering Bridge",
            Self::Shelter => "Shelter",
            Self::Weir => "Weir",
            Self::Well => "Well",
        }
    }
}

impl std::fmt::Display for AssetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Attribute value: the open-ended "any extra column" data, typed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AttrValue {
    Text(String),
    Number(f64),
    /// Calendar date in `YYYY-MM-DD` form.
    Date(String),
}

impl AttrValue {
    pub fn display(&self) -> String {
        match self {
            AttrValue::Text(s) => s.clone(),
            AttrValue::Number(n) => fmt_number(*n),
            AttrValue::Date(d) => d.clone(),
        }
    }
}

/// A single thing at a station (e.g. a cableway or a weir).
///
/// At most one Asset per canonical type within a station; re-observing the
/// same type merges attributes, later values win.
#[derive(Debug, Clone, Serialize)]
pub struct Asset {
    #[serde(rename = "type")]
    pub asset_type: AssetType,
    pub attributes: BTreeMap<String, AttrValue>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Station {
    pub station_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub station_name: Option<String>,
    pub attributes: BTreeMap<String, AttrValue>,
    pub assets: Vec<Asset>,
}

impl Station {
    pub fn asset_types(&self) -> BTreeSet<AssetType> {
        self.assets.iter().map(|a| a.asset_type).collect()
    }
}

/// Which of the two source formats an Inventory came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    StationCentric,
    AssetCentric,
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StationCentric => write!(f, "station_centric"),
            Self::AssetCentric => write!(f, "asset_centric"),
        }
    }
}

/// Full normalized representation of one successfully-parsed table.
/// Station order is the first-seen order of identifiers in the source.
#[derive(Debug, Clone, Serialize)]
pub struct Inventory {
    pub source: Source,
    pub stations: Vec<Station>,
}

// ---------------------------------------------------------------------------
// Comparison + report output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct CompareSummary {
    pub stations_compared: usize,
    pub stations_with_discrepancies: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct StationDiff {
    pub station_id: String,
    pub station_name_left: String,
    pub station_name_right: String,
    pub source_left: Source,
    pub source_right: Source,
    pub assets_left: Vec<AssetType>,
    pub assets_right: Vec<AssetType>,
    /// Present on the right but absent on the left.
    pub missing_in_left: Vec<AssetType>,
    /// Present on the left but absent on the right.
    pub missing_in_right: Vec<AssetType>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompareResult {
    pub summary: CompareSummary,
    pub details: Vec<StationDiff>,
}

/// One row of the "present on the right, absent on the left" export view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissingStationRow {
    pub station_id: String,
    pub station_name: String,
    pub province: String,
    pub office: String,
    pub tech_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_type_orders_by_label() {
        let mut types = vec![AssetType::Well, AssetType::Cableway, AssetType::HelicopterPad];
        types.sort();
        assert_eq!(
            types,
            vec![AssetType::Cableway, AssetType::HelicopterPad, AssetType::Well]
        );
    }

    #[test]
    fn asset_type_serializes_as_label() {
        let json = serde_json::to_string(&AssetType::MeteringBridge).unwrap();
        assert_eq!(json, "\"Metering Bridge\"");
    }

    #[test]
    fn cell_display_drops_integral_fraction() {
        assert_eq!(Cell::Number(123.0).display(), "123");
        assert_eq!(Cell::Number(49.123456).display(), "49.123456");
        assert_eq!(Cell::Text("  A1 ".into()).display(), "A1");
    }

    #[test]
    fn table_pads_short_rows() {
        let t = Table::new(
            vec!["A".into(), "B".into(), "C".into()],
            vec![vec![Cell::Text("x".into())]],
        );
        assert_eq!(t.row_count(), 1);
        assert_eq!(*t.cell(0, 2), Cell::Empty);
    }

    #[test]
    fn table_cleans_headers() {
        let t = Table::new(vec!["  Station   ID ".into()], vec![]);
        assert_eq!(t.header(0), "Station ID");
    }
}
