use std::fmt::{Display, Formatter};
use std::str::FromStr;

use graphar_error::{GarError, gar_err};

/// The columnar format a property group or adjacency list is stored in.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FileType {
    /// Apache Parquet.
    Parquet,
    /// Apache ORC.
    Orc,
    /// Comma-separated values with a header row.
    Csv,
}

impl FromStr for FileType {
    type Err = GarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "parquet" => Ok(FileType::Parquet),
            "orc" => Ok(FileType::Orc),
            "csv" => Ok(FileType::Csv),
            _ => Err(gar_err!(Parse: "unsupported file type {:?}", s)),
        }
    }
}

impl Display for FileType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FileType::Parquet => write!(f, "parquet"),
            FileType::Orc => write!(f, "orc"),
            FileType::Csv => write!(f, "csv"),
        }
    }
}
