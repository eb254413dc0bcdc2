//! ---
//! ems_section: "08-energy-models-optimization"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Reporting transformation layer over scenario results."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
//! Pure read, transform and respond pipeline: scenario networks and result
//! tables go in, client-facing technology, fuel and aggregate series come out.

pub mod aggregate;
pub mod areas;
pub mod context;
pub mod dispatch;
pub mod errors;
pub mod frame;
pub mod map;
pub mod metrics;
pub mod params;
pub mod payload;
pub mod reshape;
pub mod scenario;
pub mod static_data;
pub mod topology;
pub mod translation;
pub mod transport;

pub use context::{AppContext, ReportSettings, ScenarioContext};
pub use errors::{AnalyticsError, Result, TopologyError};
pub use frame::YearFrame;
pub use params::{AggregateType, ConsumptionType, DataCategory};
pub use translation::NameTranslator;
