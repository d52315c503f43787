//! Export view: stations recorded on the asset-centric side but absent from
//! the station-centric side, with heuristically-extracted contact fields.

use std::collections::{BTreeMap, HashSet};

use crate::compare::normalize_station_id;
use crate::model::{AttrValue, Inventory, MissingStationRow};

fn attr_like(attrs: &BTreeMap<String, AttrValue>, keys_like: &[&str]) -> Option<String> {
    attrs.iter().find_map(|(k, v)| {
        let k = k.to_lowercase();
        keys_like
            .iter()
            .any(|key| k.contains(key))
            .then(|| v.display())
    })
}

fn province(attrs: &BTreeMap<String, AttrValue>) -> Option<String> {
    attr_like(attrs, &["province", "prov"])
}

fn office(attrs: &BTreeMap<String, AttrValue>) -> Option<String> {
    attr_like(attrs, &["office"])
}

/// Prefer distinct first/last-name columns joined with a space; fall back to
/// generic technician/contact columns.
fn tech_name(attrs: &BTreeMap<String, AttrValue>) -> Option<String> {
    let first = attr_like(attrs, &["first name", "firstname", "given name"]);
    let last = attr_like(attrs, &["last name", "lastname", "surname", "family name"]);
    if first.is_some() || last.is_some() {
        let joined: Vec<String> = [first, last].into_iter().flatten().collect();
        return Some(joined.join(" "));
    }
    attr_like(attrs, &["technician", "tech name", "tech", "contact name", "name"])
}

/// Rows for every normalized station id present in `right` but absent from
/// `left`, sorted by normalized id. Missing fields render as empty strings.
pub fn missing_station_rows(left: &Inventory, right: &Inventory) -> Vec<MissingStationRow> {
    let left_ids: HashSet<String> = left
        .stations
        .iter()
        .map(|s| normalize_station_id(&s.station_id))
        .collect();

    let mut rows: Vec<MissingStationRow> = right
        .stations
        .iter()
        .filter(|s| !left_ids.contains(&normalize_station_id(&s.station_id)))
        .map(|s| MissingStationRow {
            station_id: s.station_id.clone(),
            station_name: s.station_name.clone().unwrap_or_default(),
            province: province(&s.attributes).unwrap_or_default(),
            office: office(&s.attributes).unwrap_or_default(),
            tech_name: tech_name(&s.attributes).unwrap_or_default(),
        })
        .collect();

    rows.sort_by_key(|r| normalize_station_id(&r.station_id));
    rows
}
