//! ---
//! ems_section: "08-energy-models-optimization"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Error types raised while shaping scenario results."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, AnalyticsError>;

/// Broken links between generators, buses, stacks and aggregates.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TopologyError {
    #[error("generator {0} not found in network")]
    UnknownGenerator(String),
    #[error("Lbs not found for bus {bus} ({energy_type})")]
    StackNotFound { bus: String, energy_type: String },
    #[error("Aggr not Found for local balancing stack {0}")]
    AggregateNotFound(String),
}

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("Given json path {} does not exists or its not a json extension", .path.display())]
    LookupResource { path: PathBuf },
    #[error(transparent)]
    Topology(#[from] TopologyError),
    #[error("year axes do not align: {left:?} vs {right:?}")]
    YearMismatch { left: Vec<u32>, right: Vec<u32> },
    #[error("row {label} has {found} values for {expected} years")]
    RowLength {
        label: String,
        expected: usize,
        found: usize,
    },
    #[error("fuel {0} not found in network")]
    UnknownFuel(String),
    #[error("local balancing stack {0} not found in network")]
    UnknownStack(String),
    #[error("static data {}: {reason}", .path.display())]
    StaticData { path: PathBuf, reason: String },
    #[error("Scenario_id {0} not found")]
    ScenarioNotFound(usize),
    #[error("Area ID {0} not found")]
    AreaNotFound(usize),
    #[error("engine error: {0}")]
    Engine(#[from] zefir_engine::EngineError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
