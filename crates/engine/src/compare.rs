//! Inventory reconciliation: per-station asset-set differences.

use std::collections::{BTreeMap, BTreeSet};

use crate::model::{AssetType, CompareResult, CompareSummary, Inventory, StationDiff};

struct SideEntry {
    display_id: String,
    name: String,
    types: BTreeSet<AssetType>,
}

/// Trim + uppercase: the reconciliation key between sources.
pub fn normalize_station_id(id: &str) -> String {
    id.trim().to_uppercase()
}

fn index_side(inv: &Inventory) -> BTreeMap<String, SideEntry> {
    let mut map: BTreeMap<String, SideEntry> = BTreeMap::new();
    for station in &inv.stations {
        let key = normalize_station_id(&station.station_id);
        let types = station.asset_types();
        match map.get_mut(&key) {
            // Duplicate normalized ids union their asset sets; first-seen
            // display id/name retained.
            Some(entry) => entry.types.extend(types),
            None => {
                map.insert(
                    key,
                    SideEntry {
                        display_id: station.station_id.trim().to_string(),
                        name: station.station_name.clone().unwrap_or_default(),
                        types,
                    },
                );
            }
        }
    }
    map
}

/// Compare asset presence between two normalized inventories.
///
/// Stations are reconciled case-insensitively on trimmed ids; the universe
/// is processed in sorted key order so the output is deterministic. A
/// station contributes a detail record iff at least one side is missing an
/// asset type the other side has. Asset-type equality is exact canonical
/// equality; no fuzzy matching happens here.
pub fn compare_inventories(left: &Inventory, right: &Inventory) -> CompareResult {
    let left_index = index_side(left);
    let right_index = index_side(right);

    let mut keys: BTreeSet<&String> = left_index.keys().collect();
    keys.extend(right_index.keys());

    let empty = BTreeSet::new();
    let mut details = Vec::new();
    for key in &keys {
        let ls = left_index.get(*key);
        let rs = right_index.get(*key);
        let lt = ls.map_or(&empty, |e| &e.types);
        let rt = rs.map_or(&empty, |e| &e.types);

        let missing_in_left: Vec<AssetType> = rt.difference(lt).copied().collect();
        let missing_in_right: Vec<AssetType> = lt.difference(rt).copied().collect();
        if missing_in_left.is_empty() && missing_in_right.is_empty() {
            continue;
        }

        details.push(StationDiff {
            station_id: ls
                .or(rs)
                .map(|e| e.display_id.clone())
                .unwrap_or_default(),
            station_name_left: ls.map(|e| e.name.clone()).unwrap_or_default(),
            station_name_right: rs.map(|e| e.name.clone()).unwrap_or_default(),
            source_left: left.source,
            source_right: right.source,
            assets_left: lt.iter().copied().collect(),
            assets_right: rt.iter().copied().collect(),
            missing_in_left,
            missing_in_right,
        });
    }

    CompareResult {
        summary: CompareSummary {
            stations_compared: keys.len(),
            stations_with_discrepancies: details.len(),
        },
        details,
    }
}
