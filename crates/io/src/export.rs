// Report export: missing-station rows to xlsx or CSV text.

use std::path::Path;

use rust_xlsxwriter::{Format, Workbook};
use stationrecon_engine::model::MissingStationRow;

const COLUMNS: &[&str] = &["Station ID", "Station Name", "Province", "Office", "Tech Name"];

fn row_fields(row: &MissingStationRow) -> [&str; 5] {
    [
        &row.station_id,
        &row.station_name,
        &row.province,
        &row.office,
        &row.tech_name,
    ]
}

pub fn write_missing_stations_xlsx(
    rows: &[MissingStationRow],
    path: &Path,
) -> Result<(), String> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Missing Stations").map_err(|e| e.to_string())?;

    let header_format = Format::new().set_bold();
    for (col, title) in COLUMNS.iter().enumerate() {
        sheet
            .write_string_with_format(0, col as u16, *title, &header_format)
            .map_err(|e| e.to_string())?;
    }
    for (i, row) in rows.iter().enumerate() {
        for (col, value) in row_fields(row).iter().enumerate() {
            sheet
                .write_string((i + 1) as u32, col as u16, *value)
                .map_err(|e| e.to_string())?;
        }
    }
    sheet.autofit();

    workbook.save(path).map_err(|e| e.to_string())
}

pub fn missing_stations_csv(rows: &[MissingStationRow]) -> Result<String, String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(COLUMNS).map_err(|e| e.to_string())?;
    for row in rows {
        writer
            .write_record(row_fields(row))
            .map_err(|e| e.to_string())?;
    }
    let bytes = writer.into_inner().map_err(|e| e.to_string())?;
    String::from_utf8(bytes).map_err(|e| e.to_string())
}
