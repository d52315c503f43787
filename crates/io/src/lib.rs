//! `stationrecon-io` — spreadsheet adapters for the reconciliation engine:
//! Excel/CSV import into the engine's `Table` abstraction and report export.

pub mod csv;
pub mod export;
pub mod xlsx;
