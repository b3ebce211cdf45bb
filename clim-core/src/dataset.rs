use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier string for the temperature series.
pub const NAME_TEMPERATURE: &str = "temperature";

/// Identifier string for the precipitation series.
pub const NAME_PRECIPITATION: &str = "precipitation";

/// The measurement series the chart can display.
///
/// Each variant owns one storage partition named after its identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetType {
    Temperature,
    Precipitation,
}

impl DatasetType {
    pub const ALL: [DatasetType; 2] = [DatasetType::Temperature, DatasetType::Precipitation];

    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetType::Temperature => NAME_TEMPERATURE,
            DatasetType::Precipitation => NAME_PRECIPITATION,
        }
    }

    /// Name of the storage partition holding this series.
    pub fn partition(&self) -> &'static str {
        self.as_str()
    }

    /// Router path that displays this series.
    pub fn route(&self) -> String {
        format!("/{}", self.as_str())
    }

    /// Human-readable title for chart headers and page titles.
    pub fn title(&self) -> &'static str {
        match self {
            DatasetType::Temperature => "Temperature",
            DatasetType::Precipitation => "Precipitation",
        }
    }
}

impl fmt::Display for DatasetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string is not one of the recognized dataset identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDataset(pub String);

impl fmt::Display for UnknownDataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown dataset: {}", self.0)
    }
}

impl std::error::Error for UnknownDataset {}

impl FromStr for DatasetType {
    type Err = UnknownDataset;

    /// Only the exact identifiers are recognized; no case folding.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            NAME_TEMPERATURE => Ok(DatasetType::Temperature),
            NAME_PRECIPITATION => Ok(DatasetType::Precipitation),
            other => Err(UnknownDataset(other.to_string())),
        }
    }
}
