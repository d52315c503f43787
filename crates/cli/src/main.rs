// StationRecon CLI - headless inventory normalization and reconciliation.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use stationrecon_engine::model::Inventory;
use stationrecon_engine::{compare_inventories, missing_station_rows, Table};

const EXIT_SUCCESS: u8 = 0;
const EXIT_ERROR: u8 = 1;

#[derive(Parser)]
#[command(name = "strecon")]
#[command(about = "Reconcile two field-station inventory spreadsheets")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum SourceFormat {
    /// One row per station, asset-presence flag columns
    StationCentric,
    /// One row per (station, category, value, status) observation
    AssetCentric,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize one spreadsheet into an Inventory (JSON)
    Normalize {
        file: PathBuf,

        #[arg(long, value_enum)]
        format: SourceFormat,

        /// Write JSON here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Compare two inventories and print the discrepancy report as JSON
    Compare {
        /// Station-centric spreadsheet
        left: PathBuf,

        /// Asset-centric spreadsheet
        right: PathBuf,

        #[arg(long, value_enum, default_value = "station-centric")]
        left_format: SourceFormat,

        #[arg(long, value_enum, default_value = "asset-centric")]
        right_format: SourceFormat,
    },

    /// Export stations present in the asset-centric file but absent from
    /// the station-centric file (.xlsx or .csv by extension)
    MissingStations {
        /// Station-centric spreadsheet
        left: PathBuf,

        /// Asset-centric spreadsheet
        right: PathBuf,

        #[arg(long)]
        output: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(msg) => {
            eprintln!("error: {msg}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn run(cli: Cli) -> Result<(), String> {
    match cli.command {
        Commands::Normalize {
            file,
            format,
            output,
        } => {
            let inventory = load_inventory(&file, format)?;
            let json = to_json(&inventory)?;
            match output {
                Some(path) => std::fs::write(path, json).map_err(|e| e.to_string())?,
                None => println!("{json}"),
            }
            Ok(())
        }
        Commands::Compare {
            left,
            right,
            left_format,
            right_format,
        } => {
            let left = load_inventory(&left, left_format)?;
            let right = load_inventory(&right, right_format)?;
            let result = compare_inventories(&left, &right);
            println!("{}", to_json(&result)?);
            Ok(())
        }
        Commands::MissingStations {
            left,
            right,
            output,
        } => {
            let left = load_inventory(&left, SourceFormat::StationCentric)?;
            let right = load_inventory(&right, SourceFormat::AssetCentric)?;
            let rows = missing_station_rows(&left, &right);
            match extension_of(&output).as_deref() {
                Some("xlsx") => {
                    stationrecon_io::export::write_missing_stations_xlsx(&rows, &output)?
                }
                Some("csv") => {
                    let text = stationrecon_io::export::missing_stations_csv(&rows)?;
                    std::fs::write(&output, text).map_err(|e| e.to_string())?;
                }
                _ => {
                    return Err(format!(
                        "unsupported output extension: {}",
                        output.display()
                    ))
                }
            }
            eprintln!("wrote {} rows to {}", rows.len(), output.display());
            Ok(())
        }
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| e.to_string())
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
}

fn load_table(path: &Path) -> Result<Table, String> {
    match extension_of(path).as_deref() {
        Some("csv") => stationrecon_io::csv::import(path),
        Some("tsv") => stationrecon_io::csv::import_tsv(path),
        Some("xlsx" | "xlsm" | "xlsb" | "xls" | "ods") => {
            stationrecon_io::xlsx::import_table(path)
        }
        _ => Err(format!("unsupported input file type: {}", path.display())),
    }
}

fn load_inventory(path: &Path, format: SourceFormat) -> Result<Inventory, String> {
    let table = load_table(path)?;
    let result = match format {
        SourceFormat::StationCentric => stationrecon_engine::station_centric::extract(&table),
        SourceFormat::AssetCentric => stationrecon_engine::asset_centric::extract(&table),
    };
    result.map_err(|e| e.to_string())
}
