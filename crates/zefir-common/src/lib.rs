//! ---
//! ems_section: "01-core-functionality"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Shared configuration and logging primitives."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
//! Shared primitives for the Zefir reporting workspace: configuration
//! loading and tracing initialisation used by the API crate and daemon.

pub mod config;
pub mod logging;

pub use config::{
    ApiConfig, AppConfig, FuelsConfig, LoadedAppConfig, LoggingConfig, NamesConfig, PathsConfig,
    TagsConfig, TranslationPaths,
};
pub use logging::{init_tracing, LogFormat};
