//! ---
//! ems_section: "01-core-functionality"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Application configuration for the reporting API."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::logging::LogFormat;

fn default_logging_directory() -> PathBuf {
    PathBuf::from("target/logs")
}

fn default_log_format() -> LogFormat {
    LogFormat::StructuredJson
}

fn default_api_listen() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8000))
}

fn default_resources_root() -> PathBuf {
    PathBuf::from("resources")
}

fn default_ee_name() -> String {
    "EE".to_owned()
}

fn default_heat_name() -> String {
    "HEAT".to_owned()
}

fn default_cold_name() -> String {
    "COLD".to_owned()
}

fn default_tags_to_drop() -> Vec<String> {
    vec!["KSE".to_owned(), "KSE_CONN".to_owned(), "HD_CONN".to_owned()]
}

fn default_thermo_tag() -> String {
    "thermo".to_owned()
}

fn default_virtual_fuel() -> String {
    "KSE_VIRTUAL_FUEL".to_owned()
}

/// Primary configuration object for the reporting API.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub names: NamesConfig,
    #[serde(default)]
    pub tags: TagsConfig,
    #[serde(default)]
    pub fuels: FuelsConfig,
}

/// Metadata describing where an [`AppConfig`] was loaded from.
#[derive(Debug, Clone)]
pub struct LoadedAppConfig {
    pub config: AppConfig,
    /// `None` when no file was found and built-in defaults are in effect.
    pub source: Option<PathBuf>,
}

impl AppConfig {
    pub const ENV_CONFIG_PATH: &str = "ZEFIR_API_CONFIG";

    /// Load configuration from disk, respecting the `ZEFIR_API_CONFIG` override.
    pub fn load<P: AsRef<Path>>(candidates: &[P]) -> Result<Self> {
        Ok(Self::load_with_source(candidates)?.config)
    }

    /// Load configuration together with the effective source path.
    ///
    /// The environment override wins over every candidate and must point at a
    /// readable file. When neither the override nor any candidate exists the
    /// built-in defaults are returned.
    pub fn load_with_source<P: AsRef<Path>>(candidates: &[P]) -> Result<LoadedAppConfig> {
        if let Ok(env_path) = std::env::var(Self::ENV_CONFIG_PATH) {
            if !env_path.trim().is_empty() {
                let path = PathBuf::from(env_path);
                let config = Self::from_path(&path)?;
                return Ok(LoadedAppConfig {
                    config,
                    source: Some(path),
                });
            }
        }

        for candidate in candidates {
            if candidate.as_ref().exists() {
                let path = candidate.as_ref().to_path_buf();
                let config = Self::from_path(&path)?;
                return Ok(LoadedAppConfig {
                    config,
                    source: Some(path),
                });
            }
        }

        debug!(
            inspected = %candidates
                .iter()
                .map(|p| p.as_ref().display().to_string())
                .collect::<Vec<_>>()
                .join(", "),
            "no configuration file found, using defaults"
        );
        Ok(LoadedAppConfig {
            config: AppConfig::default(),
            source: None,
        })
    }

    fn from_path(path: &Path) -> Result<Self> {
        debug!(config_path = %path.display(), "loading configuration");
        let contents = fs::read_to_string(path)
            .with_context(|| format!("unable to read config file {}", path.display()))?;
        let config = toml::from_str::<AppConfig>(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate structural invariants.
    pub fn validate(&self) -> Result<()> {
        self.names.validate()?;
        self.tags.validate()?;
        self.api.validate()?;
        if self.fuels.virtual_fuel.trim().is_empty() {
            return Err(anyhow!("fuels.virtual_fuel must not be empty"));
        }
        Ok(())
    }
}

impl std::str::FromStr for AppConfig {
    type Err = anyhow::Error;

    fn from_str(content: &str) -> std::result::Result<Self, Self::Err> {
        let config: AppConfig =
            toml::from_str(content).with_context(|| "failed to parse configuration")?;
        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_directory")]
    pub directory: PathBuf,
    #[serde(default = "default_log_format")]
    pub format: LogFormat,
    #[serde(default)]
    pub file_prefix: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: default_logging_directory(),
            format: default_log_format(),
            file_prefix: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_listen")]
    pub listen: SocketAddr,
    /// Origins allowed by CORS. Empty means any origin.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            listen: default_api_listen(),
            cors_origins: Vec::new(),
        }
    }
}

impl ApiConfig {
    pub fn validate(&self) -> Result<()> {
        if let Some(origin) = self.cors_origins.iter().find(|o| o.trim().is_empty()) {
            return Err(anyhow!("api.cors_origins contains an empty entry: {origin:?}"));
        }
        Ok(())
    }
}

/// Locations of every on-disk resource the API reads.
///
/// Relative paths are resolved against the process working directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub fuel_units: PathBuf,
    pub area_mapping: PathBuf,
    /// Holds `<area>/results/<scenario>.{json,yaml}` bundles.
    pub areas_root: PathBuf,
    pub translation: TranslationPaths,
    pub polygons: PathBuf,
    pub points: PathBuf,
    pub static_plots: PathBuf,
    pub static_aggregate_data: PathBuf,
    pub transport: PathBuf,
}

impl PathsConfig {
    /// Default resource layout below `root`.
    pub fn under(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        let translation = root.join("translation");
        Self {
            fuel_units: root.join("fuel_units.json"),
            area_mapping: root.join("area_scenario_mapping.json"),
            areas_root: root.join("areas"),
            translation: TranslationPaths {
                tags: translation.join("tags_translation.json"),
                names: translation.join("names_translation.json"),
                fuels: translation.join("fuel_translation.json"),
                lbs: translation.join("lbs_translation.json"),
                energy: translation.join("energy_translation.json"),
            },
            polygons: root.join("map").join("polygonsFeatures.csv"),
            points: root.join("map").join("pointsFeatures.csv"),
            static_plots: root.join("static_data").join("static_plots"),
            static_aggregate_data: root.join("static_data").join("static_aggr_data"),
            transport: root.join("transport"),
        }
    }

    /// Scenario bundle candidates for an area, in lookup order.
    pub fn scenario_bundle_candidates(&self, area: &str, scenario: &str) -> Vec<PathBuf> {
        let results = self.areas_root.join(area).join("results");
        ["json", "yaml", "yml"]
            .iter()
            .map(|ext| results.join(format!("{scenario}.{ext}")))
            .collect()
    }

    /// Report every required resource file that is missing.
    pub fn missing_resources(&self) -> Vec<PathBuf> {
        let required = [
            &self.fuel_units,
            &self.area_mapping,
            &self.translation.tags,
            &self.translation.names,
            &self.translation.fuels,
            &self.translation.lbs,
            &self.translation.energy,
        ];
        required
            .into_iter()
            .filter(|path| !path.is_file())
            .cloned()
            .collect()
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self::under(default_resources_root())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationPaths {
    pub tags: PathBuf,
    pub names: PathBuf,
    pub fuels: PathBuf,
    pub lbs: PathBuf,
    pub energy: PathBuf,
}

impl Default for TranslationPaths {
    fn default() -> Self {
        PathsConfig::default().translation
    }
}

/// Energy type identifiers used when reading production and usage columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamesConfig {
    #[serde(default = "default_ee_name")]
    pub production_ee: String,
    #[serde(default = "default_heat_name")]
    pub production_heat: String,
    #[serde(default = "default_cold_name")]
    pub production_cold: String,
    #[serde(default = "default_ee_name")]
    pub usage_ee: String,
    #[serde(default = "default_heat_name")]
    pub usage_heat: String,
    #[serde(default = "default_cold_name")]
    pub usage_cold: String,
}

impl Default for NamesConfig {
    fn default() -> Self {
        Self {
            production_ee: default_ee_name(),
            production_heat: default_heat_name(),
            production_cold: default_cold_name(),
            usage_ee: default_ee_name(),
            usage_heat: default_heat_name(),
            usage_cold: default_cold_name(),
        }
    }
}

impl NamesConfig {
    pub fn validate(&self) -> Result<()> {
        let names = [
            ("production_ee", &self.production_ee),
            ("production_heat", &self.production_heat),
            ("production_cold", &self.production_cold),
            ("usage_ee", &self.usage_ee),
            ("usage_heat", &self.usage_heat),
            ("usage_cold", &self.usage_cold),
        ];
        for (key, value) in names {
            if value.trim().is_empty() {
                return Err(anyhow!("names.{key} must not be empty"));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagsConfig {
    /// Primary tags whose technology types are hidden from installed power.
    #[serde(default = "default_tags_to_drop")]
    pub tags_to_drop: Vec<String>,
    #[serde(default = "default_thermo_tag")]
    pub thermo_tag: String,
}

impl Default for TagsConfig {
    fn default() -> Self {
        Self {
            tags_to_drop: default_tags_to_drop(),
            thermo_tag: default_thermo_tag(),
        }
    }
}

impl TagsConfig {
    pub fn validate(&self) -> Result<()> {
        if self.thermo_tag.trim().is_empty() {
            return Err(anyhow!("tags.thermo_tag must not be empty"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuelsConfig {
    /// Accounting-only fuel column excluded from fuel usage.
    #[serde(default = "default_virtual_fuel")]
    pub virtual_fuel: String,
}

impl Default for FuelsConfig {
    fn default() -> Self {
        Self {
            virtual_fuel: default_virtual_fuel(),
        }
    }
}
