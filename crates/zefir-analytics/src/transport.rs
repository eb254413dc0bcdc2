//! ---
//! ems_section: "08-energy-models-optimization"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Per-scenario transport capex and emission tables."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
//! Transport results are produced outside the engine, one directory per
//! scenario holding `capex.csv` and `emission_<type>.csv`. Each file has a
//! `Year` index column and one column per transport technology; tables are
//! transposed into technology rows over years.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tracing::debug;

use crate::errors::{AnalyticsError, Result};
use crate::frame::YearFrame;
use crate::static_data::IndexedTable;

const EMISSION_PREFIX: &str = "emission_";
const CAPEX_FILE: &str = "capex";
const YEAR_COLUMN: &str = "Year";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransportData {
    pub capex: Option<YearFrame>,
    pub emissions: IndexMap<String, YearFrame>,
}

impl TransportData {
    /// Load `<root>/<scenario>`; `None` when the directory does not exist.
    pub fn load(root: impl AsRef<Path>, scenario: &str) -> Result<Option<Self>> {
        let dir = root.as_ref().join(scenario);
        if !dir.is_dir() {
            return Ok(None);
        }
        let mut files: Vec<PathBuf> = fs::read_dir(&dir)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<_>>()?;
        files.sort();

        let mut data = TransportData::default();
        for path in files {
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if let Some(emission_type) = stem.strip_prefix(EMISSION_PREFIX) {
                let frame = read_transposed(&path)?;
                data.emissions.insert(emission_type.to_owned(), frame);
            } else if stem == CAPEX_FILE {
                data.capex = Some(read_transposed(&path)?);
            }
        }
        debug!(
            scenario,
            emission_types = data.emissions.len(),
            capex = data.capex.is_some(),
            "transport data loaded"
        );
        Ok(Some(data))
    }
}

/// Read a `Year`-indexed table as technology rows over years.
pub fn read_transposed(path: &Path) -> Result<YearFrame> {
    let table = IndexedTable::read_csv(path, YEAR_COLUMN)?;
    let years = table
        .labels()
        .into_iter()
        .map(|label| {
            label.trim().parse::<u32>().map_err(|_| AnalyticsError::StaticData {
                path: path.to_path_buf(),
                reason: format!("{label:?} is not a year"),
            })
        })
        .collect::<Result<Vec<_>>>()?;
    let mut frame = YearFrame::new(years);
    for technology in table.columns() {
        let values = table.column(technology).unwrap_or_default();
        frame.insert_row(technology.clone(), values)?;
    }
    Ok(frame)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_directory_is_transposed_per_file() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("base");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("capex.csv"), "Year,BUS,TRAM\n0,1.5,2\n1,3,4\n").unwrap();
        fs::write(dir.join("emission_CO2.csv"), "Year,BUS\n0,10\n1,11\n").unwrap();
        fs::write(dir.join("notes.txt"), "ignored").unwrap();

        let data = TransportData::load(root.path(), "base").unwrap().unwrap();
        let capex = data.capex.unwrap();
        assert_eq!(capex.years(), &[0, 1]);
        assert_eq!(capex.row("TRAM"), Some(&[2.0, 4.0][..]));
        assert_eq!(data.emissions["CO2"].row("BUS"), Some(&[10.0, 11.0][..]));
    }

    #[test]
    fn missing_scenario_directory_is_none() {
        let root = tempfile::tempdir().unwrap();
        assert!(TransportData::load(root.path(), "absent").unwrap().is_none());
    }
}
