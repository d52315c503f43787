use stationrecon_engine::model::{AssetType, AttrValue, Cell, Source, Table};
use stationrecon_engine::{
    asset_centric, compare_inventories, missing_station_rows, station_centric, ExtractError,
};

fn cell(v: &str) -> Cell {
    if v.is_empty() {
        Cell::Empty
    } else {
        Cell::Text(v.to_string())
    }
}

fn table(headers: &[&str], rows: &[&[&str]]) -> Table {
    Table::new(
        headers.iter().map(|h| h.to_string()).collect(),
        rows.iter()
            .map(|r| r.iter().map(|v| cell(v)).collect())
            .collect(),
    )
}

// -------------------------------------------------------------------------
// Station-centric extraction
// -------------------------------------------------------------------------

#[test]
fn station_centric_end_to_end() {
    let t = table(
        &[
            "Station ID",
            "Station Name",
            "Cableway",
            "Weir",
            "Metering Bridge",
            "Region",
            "Start Time",
        ],
        &[
            &["05BB001", "Bow River", "Yes", "no", "x", "South", "09:12"],
            &["05BB002", "Elbow River", "", "1", "0", "South", "10:03"],
            &["", "orphan row", "yes", "yes", "yes", "South", "11:00"],
        ],
    );
    let inv = station_centric::extract(&t).unwrap();
    assert_eq!(inv.source, Source::StationCentric);
    assert_eq!(inv.stations.len(), 2);

    let s1 = &inv.stations[0];
    assert_eq!(s1.station_id, "05BB001");
    assert!(!s1.station_id.trim().is_empty());
    assert_eq!(
        s1.asset_types().into_iter().collect::<Vec<_>>(),
        vec![AssetType::Cableway, AssetType::MeteringBridge]
    );
    assert_eq!(s1.attributes.get("Region"), Some(&AttrValue::Text("South".into())));
    assert!(!s1.attributes.contains_key("Start Time"));

    let s2 = &inv.stations[1];
    assert_eq!(
        s2.asset_types().into_iter().collect::<Vec<_>>(),
        vec![AssetType::Weir]
    );
}

#[test]
fn station_centric_is_idempotent() {
    let t = table(
        &["Station ID", "Station Name", "Cableway", "Visit Date"],
        &[
            &["S1", "Upper", "yes", "2022-08-01 07:30:00"],
            &["S2", "Lower", "no", ""],
        ],
    );
    let first = station_centric::extract(&t).unwrap();
    let second = station_centric::extract(&t).unwrap();
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn station_centric_schema_failure_is_descriptive() {
    let t = table(&["Description", "Remarks"], &[&["free text", "more text"]]);
    let err = station_centric::extract(&t).unwrap_err();
    assert!(matches!(
        err,
        ExtractError::MissingStationIdColumn {
            source: Source::StationCentric
        }
    ));
    assert!(err.to_string().contains("station-id"));
}

// -------------------------------------------------------------------------
// Asset-centric extraction
// -------------------------------------------------------------------------

const AC_HEADERS: &[&str] = &["Station Number", "Station Name", "Category", "Value", "Status"];

#[test]
fn asset_centric_installation_type_contributes_no_asset() {
    let t = table(
        AC_HEADERS,
        &[
            &["S1", "Upper Creek", "Shelter Type", "Steel", "Active"],
            &["S1", "Upper Creek", "Installation Type", "X", "Active"],
        ],
    );
    let inv = asset_centric::extract(&t).unwrap();
    assert_eq!(inv.stations.len(), 1);
    let s = &inv.stations[0];
    assert_eq!(s.station_id, "S1");
    assert_eq!(s.assets.len(), 1);
    assert_eq!(s.assets[0].asset_type, AssetType::Shelter);
}

#[test]
fn asset_centric_all_removed_yields_station_without_assets() {
    let t = table(
        &["Station Number", "Station Name", "Category", "Value", "Status", "Province"],
        &[
            &["S1", "Upper", "Cableway", "span A", "Removed", "AB"],
            &["S1", "Upper", "Weir", "V-notch", "Removed", "AB"],
            &["S1", "Upper", "Shelter Type", "Steel", "Removed", "AB"],
        ],
    );
    let inv = asset_centric::extract(&t).unwrap();
    assert_eq!(inv.stations.len(), 1);
    let s = &inv.stations[0];
    assert!(s.assets.is_empty());
    assert_eq!(s.attributes.get("Province"), Some(&AttrValue::Text("AB".into())));
}

// -------------------------------------------------------------------------
// Comparator
// -------------------------------------------------------------------------

#[test]
fn compare_end_to_end_case_insensitive() {
    let left_table = table(
        &["Station ID", "Station Name", "Cableway"],
        &[&["A1", "Upper", "yes"]],
    );
    let right_table = table(
        AC_HEADERS,
        &[
            &["a1", "Upper Creek", "Cableway", "20m", "Active"],
            &["a1", "Upper Creek", "Weir", "V-notch", "Active"],
        ],
    );
    let left = station_centric::extract(&left_table).unwrap();
    let right = asset_centric::extract(&right_table).unwrap();

    let result = compare_inventories(&left, &right);
    assert_eq!(result.summary.stations_compared, 1);
    assert_eq!(result.summary.stations_with_discrepancies, 1);

    let d = &result.details[0];
    assert_eq!(d.missing_in_left, vec![AssetType::Weir]);
    assert!(d.missing_in_right.is_empty());
    assert_eq!(d.source_left, Source::StationCentric);
    assert_eq!(d.source_right, Source::AssetCentric);
}

#[test]
fn compare_symmetry() {
    let left_table = table(
        &["Station ID", "Cableway", "Weir"],
        &[&["S1", "yes", "yes"], &["S2", "yes", ""]],
    );
    let right_table = table(
        AC_HEADERS,
        &[
            &["S1", "", "Cableway", "", "Active"],
            &["S3", "", "Weir", "", "Active"],
        ],
    );
    let left = station_centric::extract(&left_table).unwrap();
    let right = asset_centric::extract(&right_table).unwrap();

    let forward = compare_inventories(&left, &right);
    let backward = compare_inventories(&right, &left);
    assert_eq!(forward.details.len(), backward.details.len());
    for (f, b) in forward.details.iter().zip(backward.details.iter()) {
        assert_eq!(f.missing_in_left, b.missing_in_right);
        assert_eq!(f.missing_in_right, b.missing_in_left);
    }
}

// -------------------------------------------------------------------------
// Reporter
// -------------------------------------------------------------------------

#[test]
fn reporter_exports_right_only_stations_sorted() {
    let left_table = table(&["Station ID", "Cableway"], &[&["S-30", "yes"]]);
    let right_table = table(
        &[
            "Station Number",
            "Station Name",
            "Category",
            "Value",
            "Status",
            "Province",
            "Regional Office",
            "Technician",
        ],
        &[
            &["S-20", "Lower", "Cableway", "", "Active", "BC", "Kamloops", "M. Tran"],
            &["S-10", "Upper", "Weir", "", "Active", "AB", "Calgary", "R. Singh"],
            &["S-30", "Mid", "Weir", "", "Active", "AB", "Calgary", ""],
        ],
    );
    let left = station_centric::extract(&left_table).unwrap();
    let right = asset_centric::extract(&right_table).unwrap();

    let rows = missing_station_rows(&left, &right);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].station_id, "S-10");
    assert_eq!(rows[0].province, "AB");
    assert_eq!(rows[0].office, "Calgary");
    assert_eq!(rows[0].tech_name, "R. Singh");
    assert_eq!(rows[1].station_id, "S-20");

    // S-10 appears exactly once
    let count = rows.iter().filter(|r| r.station_id == "S-10").count();
    assert_eq!(count, 1);
}
