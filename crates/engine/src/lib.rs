//! `stationrecon-engine` — heuristic normalization and reconciliation of
//! field-station inventories.
//!
//! Pure engine crate: receives fully-materialized tables (header row + typed
//! cells), returns normalized inventories, comparison reports and export
//! rows. No file or network I/O.

pub mod asset_centric;
pub mod classify;
pub mod coerce;
pub mod compare;
pub mod error;
pub mod model;
pub mod report;
pub mod station_centric;

pub use compare::compare_inventories;
pub use error::ExtractError;
pub use model::{Cell, CompareResult, Inventory, MissingStationRow, Table};
pub use report::missing_station_rows;
