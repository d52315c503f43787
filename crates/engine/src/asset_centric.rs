//! Asset-centric extraction: grouped, conflict-resolved transform over
//! (station, category, value, status) observation rows.

use std::collections::{BTreeMap, HashMap};

use crate::classify::{
    find_category_column, find_date_column, find_note_column, find_station_id_column,
    find_station_name_column, find_status_column, find_value_column,
};
use crate::coerce::{
    attr_value, category_to_asset, coerce_date_only, is_active_status, is_lat_header,
    is_lon_header, parse_number,
};
use crate::error::ExtractError;
use crate::model::{Asset, AssetType, AttrValue, Cell, Inventory, Source, Station, Table};

struct Columns {
    sid: usize,
    sname: Option<usize>,
    category: usize,
    value: Option<usize>,
    status: Option<usize>,
    date: Option<usize>,
    note: Option<usize>,
}

impl Columns {
    fn resolve(table: &Table) -> Result<Self, ExtractError> {
        let sid = find_station_id_column(table).ok_or(ExtractError::MissingStationIdColumn {
            source: Source::AssetCentric,
        })?;
        let category = find_category_column(table).ok_or(ExtractError::MissingCategoryColumn)?;
        Ok(Columns {
            sid,
            sname: find_station_name_column(table),
            category,
            value: find_value_column(table, category),
            status: find_status_column(table),
            date: find_date_column(table),
            note: find_note_column(table),
        })
    }

    fn is_reserved(&self, col: usize) -> bool {
        col == self.sid
            || Some(col) == self.sname
            || col == self.category
            || Some(col) == self.value
            || Some(col) == self.status
            || Some(col) == self.date
            || Some(col) == self.note
    }
}

#[derive(Default)]
struct StationAccum {
    display_id: String,
    name: Option<String>,
    assets: BTreeMap<AssetType, BTreeMap<String, AttrValue>>,
    row_indices: Vec<usize>,
}

/// Extract a normalized Inventory from a one-row-per-observation table.
///
/// First pass: accumulate assets per (station, canonical type), keeping only
/// rows with a mapped category and an active status; later rows overwrite
/// same-named attribute keys. Second pass: aggregate every non-reserved
/// column into station-level attributes with lat/long averaging and the
/// dominant-value rule. Stations with attribute data but zero qualifying
/// asset rows still produce a node.
pub fn extract(table: &Table) -> Result<Inventory, ExtractError> {
    let cols = Columns::resolve(table)?;

    // Group rows by raw (trimmed) station id, first-seen order.
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, StationAccum> = HashMap::new();

    for (ri, row) in table.rows().iter().enumerate() {
        let sid = row[cols.sid].display();
        if sid.is_empty() {
            continue;
        }
        let accum = groups.entry(sid.clone()).or_insert_with(|| {
            order.push(sid.clone());
            StationAccum {
                display_id: sid.clone(),
                ..Default::default()
            }
        });
        accum.row_indices.push(ri);

        if accum.name.is_none() {
            if let Some(nc) = cols.sname {
                let name = row[nc].display();
                if !name.is_empty() {
                    accum.name = Some(name);
                }
            }
        }

        // Presence accounting: mapped category + active status only.
        let Some(asset_type) = category_to_asset(&row[cols.category].display()) else {
            continue;
        };
        if !is_active_status(cols.status.map(|c| &row[c])) {
            continue;
        }

        let attrs = accum.assets.entry(asset_type).or_default();
        if let Some(vc) = cols.value {
            if !row[vc].is_blank() {
                attrs.insert("value".to_string(), attr_value(&row[vc]));
            }
        }
        if let Some(sc) = cols.status {
            if !row[sc].is_blank() {
                attrs.insert("status".to_string(), attr_value(&row[sc]));
            }
        }
        if let Some(dc) = cols.date {
            if !row[dc].is_blank() {
                attrs.insert("date".to_string(), coerce_date_only(&row[dc]));
            }
        }
        if let Some(nc) = cols.note {
            if !row[nc].is_blank() {
                attrs.insert("note".to_string(), attr_value(&row[nc]));
            }
        }
    }

    let candidate_cols: Vec<usize> = (0..table.column_count())
        .filter(|&c| !cols.is_reserved(c))
        .collect();

    let mut stations = Vec::new();
    for sid in order {
        let Some(accum) = groups.remove(&sid) else {
            continue;
        };
        let mut attributes = BTreeMap::new();
        for &col in &candidate_cols {
            if let Some(v) = aggregate_column(table, &accum.row_indices, col) {
                attributes.insert(table.header(col).to_string(), v);
            }
        }
        let assets = accum
            .assets
            .into_iter()
            .map(|(asset_type, attributes)| Asset {
                asset_type,
                attributes,
            })
            .collect();
        stations.push(Station {
            station_id: accum.display_id,
            station_name: accum.name,
            attributes,
            assets,
        });
    }

    Ok(Inventory {
        source: Source::AssetCentric,
        stations,
    })
}

/// Pure reduction over one station's rows for one column.
///
/// Lat/long columns average their numeric values (6 decimal places); a
/// single distinct value is adopted as-is; otherwise the most frequent value
/// must carry a clear majority (>= max(2, 0.6 x non-empty count)) or the
/// attribute is omitted as an irreconcilable conflict.
fn aggregate_column(table: &Table, rows: &[usize], col: usize) -> Option<AttrValue> {
    let header = table.header(col);
    let cells: Vec<&Cell> = rows
        .iter()
        .map(|&r| table.cell(r, col))
        .filter(|c| !c.is_blank())
        .collect();
    if cells.is_empty() {
        return None;
    }

    if is_lat_header(header) || is_lon_header(header) {
        let nums: Vec<f64> = cells
            .iter()
            .filter_map(|c| match c {
                Cell::Number(n) => Some(*n),
                Cell::Text(s) => parse_number(s),
                _ => None,
            })
            .collect();
        if nums.is_empty() {
            return None;
        }
        let mean = nums.iter().sum::<f64>() / nums.len() as f64;
        return Some(AttrValue::Number(round6(mean)));
    }

    let date_ish = header.to_lowercase().contains("date");
    let convert = |cell: &Cell| {
        if date_ish {
            coerce_date_only(cell)
        } else {
            attr_value(cell)
        }
    };

    // Count by rendered value; first-seen wins frequency ties so the
    // reduction is order-independent per group.
    let mut counts: Vec<(String, usize, &Cell)> = Vec::new();
    for &cell in &cells {
        let key = cell.display();
        match counts.iter_mut().find(|(k, _, _)| *k == key) {
            Some(entry) => entry.1 += 1,
            None => counts.push((key, 1, cell)),
        }
    }

    if counts.len() == 1 {
        return Some(convert(counts[0].2));
    }

    let mut best: Option<(usize, usize)> = None;
    for (i, (_, n, _)) in counts.iter().enumerate() {
        if best.map_or(true, |(_, bn)| *n > bn) {
            best = Some((i, *n));
        }
    }
    let (best_idx, best_count) = best?;

    let threshold = (0.6 * cells.len() as f64).max(2.0);
    if best_count as f64 >= threshold {
        Some(convert(counts[best_idx].2))
    } else {
        None
    }
}

fn round6(x: f64) -> f64 {
    (x * 1e6).round() / 1e6
}
