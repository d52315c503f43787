//! Station-centric extraction: one input row = one output station.

use std::collections::BTreeMap;

use crate::classify::{find_station_id_column, find_station_name_column};
use crate::coerce::{
    coerce_date_only, header_to_asset, is_boolish_column, is_excluded_attr_header, is_truthy,
};
use crate::error::ExtractError;
use crate::model::{Asset, AssetType, Inventory, Source, Station, Table};

/// Extract a normalized Inventory from a one-row-per-station table.
///
/// Columns whose header canonicalizes to a known asset type AND whose values
/// are boolean-ish across the whole table become presence flags; everything
/// else (minus the id column and form-tool time columns) becomes a station
/// attribute. Rows are never merged: one input row = one output station.
pub fn extract(table: &Table) -> Result<Inventory, ExtractError> {
    let sid_col = find_station_id_column(table).ok_or(ExtractError::MissingStationIdColumn {
        source: Source::StationCentric,
    })?;
    let sname_col = find_station_name_column(table);

    let mut flag_cols: Vec<(usize, AssetType)> = Vec::new();
    for col in 0..table.column_count() {
        if col == sid_col || Some(col) == sname_col {
            continue;
        }
        if let Some(canon) = header_to_asset(table.header(col)) {
            if is_boolish_column(table.column(col)) {
                flag_cols.push((col, canon));
            }
        }
    }

    let mut stations = Vec::new();
    for row in table.rows() {
        let station_id = row[sid_col].display();
        if station_id.is_empty() {
            continue;
        }
        let station_name = sname_col
            .map(|c| row[c].display())
            .filter(|s| !s.is_empty());

        // Presence flags. Two headers mapping to the same canonical type
        // merge into one asset.
        let mut assets: BTreeMap<AssetType, Asset> = BTreeMap::new();
        for &(col, canon) in &flag_cols {
            if is_truthy(&row[col]) {
                assets.entry(canon).or_insert_with(|| Asset {
                    asset_type: canon,
                    attributes: BTreeMap::new(),
                });
            }
        }

        let mut attributes = BTreeMap::new();
        for col in 0..table.column_count() {
            if col == sid_col || flag_cols.iter().any(|&(fc, _)| fc == col) {
                continue;
            }
            if is_excluded_attr_header(table.header(col)) {
                continue;
            }
            if row[col].is_blank() {
                continue;
            }
            attributes.insert(table.header(col).to_string(), coerce_date_only(&row[col]));
        }

        stations.push(Station {
            station_id,
            station_name,
            attributes,
            assets: assets.into_values().collect(),
        });
    }

    Ok(Inventory {
        source: Source::StationCentric,
        stations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AttrValue, Cell};

    fn table(headers: &[&str], rows: &[&[&str]]) -> Table {
        Table::new(
            headers.iter().map(|h| h.to_string()).collect(),
            rows.iter()
                .map(|r| {
                    r.iter()
                        .map(|v| {
                            if v.is_empty() {
                                Cell::Empty
                            } else {
                                Cell::Text(v.to_string())
                            }
                        })
                        .collect()
                })
                .collect(),
        )
    }

    #[test]
    fn flags_require_asset_header_and_boolish_values() {
        let t = table(
            &["Station ID", "Station Name", "Cableway", "Weir", "Shelter"],
            &[
                // "Shelter" column carries free text, so it is an attribute
                &["S1", "Upper Creek", "Yes", "no", "steel look-in"],
                &["S2", "Lower Creek", "", "1", "wood"],
            ],
        );
        let inv = extract(&t).unwrap();
        assert_eq!(inv.source, Source::StationCentric);
        assert_eq!(inv.stations.len(), 2);

        let s1 = &inv.stations[0];
        assert_eq!(s1.station_id, "S1");
        assert_eq!(s1.station_name.as_deref(), Some("Upper Creek"));
        assert_eq!(
            s1.asset_types().into_iter().collect::<Vec<_>>(),
            vec![AssetType::Cableway]
        );
        assert_eq!(
            s1.attributes.get("Shelter"),
            Some(&AttrValue::Text("steel look-in".into()))
        );

        let s2 = &inv.stations[1];
        assert_eq!(
            s2.asset_types().into_iter().collect::<Vec<_>>(),
            vec![AssetType::Weir]
        );
    }

    #[test]
    fn empty_station_id_rows_skipped() {
        let t = table(
            &["Station ID", "Cableway"],
            &[&["S1", "yes"], &["  ", "yes"], &["", "yes"]],
        );
        let inv = extract(&t).unwrap();
        assert_eq!(inv.stations.len(), 1);
    }

    #[test]
    fn duplicate_canonical_flags_merge() {
        // "Metering Bridge" and "Bridge" both canonicalize to Metering Bridge
        let t = table(
            &["Station ID", "Metering Bridge", "Bridge"],
            &[&["S1", "yes", "x"]],
        );
        let inv = extract(&t).unwrap();
        assert_eq!(inv.stations[0].assets.len(), 1);
        assert_eq!(inv.stations[0].assets[0].asset_type, AssetType::MeteringBridge);
    }

    #[test]
    fn name_column_is_also_an_attribute() {
        let t = table(
            &["Station ID", "Station Name", "Region"],
            &[&["S1", "Upper Creek", "North"]],
        );
        let inv = extract(&t).unwrap();
        let s = &inv.stations[0];
        assert_eq!(
            s.attributes.get("Station Name"),
            Some(&AttrValue::Text("Upper Creek".into()))
        );
        assert_eq!(s.attributes.get("Region"), Some(&AttrValue::Text("North".into())));
    }

    #[test]
    fn time_noise_columns_excluded() {
        let t = table(
            &["Station ID", "Start Time", "Completion Time", "Office"],
            &[&["S1", "09:00", "10:30", "Calgary"]],
        );
        let inv = extract(&t).unwrap();
        let s = &inv.stations[0];
        assert!(!s.attributes.contains_key("Start Time"));
        assert!(!s.attributes.contains_key("Completion Time"));
        assert_eq!(s.attributes.get("Office"), Some(&AttrValue::Text("Calgary".into())));
    }

    #[test]
    fn attribute_dates_reduce_to_calendar_date() {
        let t = table(
            &["Station ID", "Last Visit Date"],
            &[&["S1", "2023-04-12 13:45:00"]],
        );
        let inv = extract(&t).unwrap();
        assert_eq!(
            inv.stations[0].attributes.get("Last Visit Date"),
            Some(&AttrValue::Date("2023-04-12".into()))
        );
    }

    #[test]
    fn missing_station_id_column_is_fatal() {
        let t = table(&["Description", "Remarks"], &[&["a b c", "x y z"]]);
        let err = extract(&t).unwrap_err();
        assert!(matches!(
            err,
            ExtractError::MissingStationIdColumn {
                source: Source::StationCentric
            }
        ));
    }
}
