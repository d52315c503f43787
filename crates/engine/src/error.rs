use std::fmt;

use crate::model::Source;

/// Schema inference failures. These are the only fatal extraction errors;
/// row-level anomalies are absorbed into the "excluded from result" policy.
#[derive(Debug)]
pub enum ExtractError {
    /// No column satisfied the station-identifier role.
    MissingStationIdColumn { source: Source },
    /// No header matched the whole word "type" or "category".
    MissingCategoryColumn,
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingStationIdColumn { source } => {
                write!(f, "{source}: could not detect a station-id column")
            }
            Self::MissingCategoryColumn => {
                write!(f, "asset_centric: could not infer a category/type column")
            }
        }
    }
}

impl std::error::Error for ExtractError {}
