//! ---
//! ems_section: "08-energy-models-optimization"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Error types for scenario bundle access."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use thiserror::Error;

use crate::results::{Level, SourceMetric};

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("result table {metric}/{level} not present in scenario results")]
    MissingTable { metric: SourceMetric, level: Level },
    #[error("local balancing stack {0} has no capacity results")]
    UnknownStack(String),
    #[error("row {name}/{year} has {found} values but table declares {expected} columns")]
    RaggedRow {
        name: String,
        year: u32,
        expected: usize,
        found: usize,
    },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    SerializationFailed(#[from] serde_json::Error),
    #[error("yaml serialization error: {0}")]
    YamlSerializationFailed(#[from] serde_yaml::Error),
}
