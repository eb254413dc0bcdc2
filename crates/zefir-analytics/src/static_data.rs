//! ---
//! ems_section: "08-energy-models-optimization"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Pre-rendered plot tables, static aggregate data and fuel units."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use strum::IntoEnumIterator;
use tracing::debug;

use crate::errors::{AnalyticsError, Result};
use crate::params::{AggregateType, StaticPlotsFile};
use crate::payload::{
    FuelUnitEntry, StaticAggregateDetail, StaticAggregateResponse, StaticConsumptionData,
    StaticPlotSeries, StaticPlotsResponse,
};
use crate::translation::NameTranslator;

/// Numeric CSV table keyed by one string index column.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedTable {
    path: PathBuf,
    columns: Vec<String>,
    rows: Vec<(String, Vec<f64>)>,
}

impl IndexedTable {
    /// Read `path`, taking `index_col` as the row label and every other
    /// column as numeric data.
    pub fn read_csv(path: impl AsRef<Path>, index_col: &str) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = csv::Reader::from_path(path)?;
        let headers = reader.headers()?.clone();
        let index_pos = headers
            .iter()
            .position(|h| h == index_col)
            .ok_or_else(|| static_error(path, format!("index column {index_col} not found")))?;
        let columns = headers
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index_pos)
            .map(|(_, h)| h.to_owned())
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let label = record.get(index_pos).unwrap_or_default().to_owned();
            let values = record
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != index_pos)
                .map(|(_, cell)| {
                    cell.trim().parse::<f64>().map_err(|_| {
                        static_error(path, format!("row {label}: {cell:?} is not a number"))
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            rows.push((label, values));
        }
        debug!(path = %path.display(), rows = rows.len(), "static table loaded");
        Ok(Self {
            path: path.to_path_buf(),
            columns,
            rows,
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn labels(&self) -> Vec<&str> {
        self.rows.iter().map(|(label, _)| label.as_str()).collect()
    }

    pub fn rows(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.rows
            .iter()
            .map(|(label, values)| (label.as_str(), values.as_slice()))
    }

    pub fn sort_by_label(&mut self) {
        self.rows.sort_by(|a, b| a.0.cmp(&b.0));
    }

    /// Values of one column in row order.
    pub fn column(&self, column: &str) -> Option<Vec<f64>> {
        let pos = self.columns.iter().position(|c| c == column)?;
        Some(self.rows.iter().map(|(_, values)| values[pos]).collect())
    }

    fn value(&self, row: &[f64], column: &str) -> Result<f64> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|pos| row[pos])
            .ok_or_else(|| static_error(&self.path, format!("column {column} not found")))
    }
}

fn static_error(path: &Path, reason: impl Into<String>) -> AnalyticsError {
    AnalyticsError::StaticData {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
}

/// Labels shared by every plot table.
///
/// When all tables list the same labels in the same order that order is kept;
/// otherwise every table is sorted and the label sets must coincide.
pub fn common_sorted_labels(tables: &mut [IndexedTable]) -> Result<Vec<String>> {
    let Some(first) = tables.first() else {
        return Ok(Vec::new());
    };
    let first_labels: Vec<String> = first.labels().into_iter().map(str::to_owned).collect();
    if tables.iter().all(|t| t.labels() == first_labels) {
        return Ok(first_labels);
    }
    tables.iter_mut().for_each(IndexedTable::sort_by_label);
    let sorted: Vec<String> = tables[0].labels().into_iter().map(str::to_owned).collect();
    if let Some(odd) = tables.iter().find(|t| t.labels() != sorted) {
        return Err(static_error(
            &odd.path,
            format!("labels differ from {}", tables[0].path.display()),
        ));
    }
    Ok(sorted)
}

fn plot_series(table: &IndexedTable) -> Vec<StaticPlotSeries> {
    table
        .columns()
        .iter()
        .map(|name| StaticPlotSeries {
            name: name.clone(),
            data: table.column(name).unwrap_or_default(),
        })
        .collect()
}

/// Read every plot table below `dir` and align them on common labels.
pub fn static_plots(dir: impl AsRef<Path>) -> Result<StaticPlotsResponse> {
    let dir = dir.as_ref();
    let files: Vec<StaticPlotsFile> = StaticPlotsFile::iter().collect();
    let mut tables = files
        .iter()
        .map(|file| IndexedTable::read_csv(dir.join(file.file_name()), "name"))
        .collect::<Result<Vec<_>>>()?;
    let labels = common_sorted_labels(&mut tables)?;

    let mut series: IndexMap<StaticPlotsFile, Vec<StaticPlotSeries>> = files
        .into_iter()
        .zip(&tables)
        .map(|(file, table)| (file, plot_series(table)))
        .collect();
    let mut take = |file: StaticPlotsFile| series.swap_remove(&file).unwrap_or_default();
    Ok(StaticPlotsResponse {
        labels,
        heat_usage: take(StaticPlotsFile::HeatUsage),
        heated_area: take(StaticPlotsFile::HeatedArea),
        gas_enable: take(StaticPlotsFile::GasEnable),
        heat_enable: take(StaticPlotsFile::HeatEnable),
        ee_usage: take(StaticPlotsFile::EeUsage),
    })
}

/// Per aggregate type, the static consumption figures of each tier.
pub fn static_aggregate_data(dir: impl AsRef<Path>) -> Result<Vec<StaticAggregateResponse>> {
    let dir = dir.as_ref();
    AggregateType::iter()
        .map(|aggregate_type| {
            let table = IndexedTable::read_csv(
                dir.join(format!("{}.csv", aggregate_type.as_ref())),
                "aggr_type",
            )?;
            let data = table
                .rows()
                .map(|(consumption_type, row)| {
                    Ok(StaticAggregateDetail {
                        consumption_type: consumption_type.to_owned(),
                        data: StaticConsumptionData {
                            heat_usage: table.value(row, "heat_usage")?,
                            ee_usage: table.value(row, "ee_usage")?,
                            cold_usage: table.value(row, "cold_usage")?,
                        },
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(StaticAggregateResponse {
                aggr_type: aggregate_type.to_string(),
                data,
            })
        })
        .collect()
}

/// Read the `fuel -> unit` JSON object.
pub fn load_fuel_units(path: impl AsRef<Path>) -> Result<IndexMap<String, String>> {
    let path = path.as_ref();
    let data = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&data)?)
}

/// Fuel units keyed by translated fuel name.
pub fn fuel_unit_entries(
    units: &IndexMap<String, String>,
    translator: &NameTranslator,
) -> Vec<FuelUnitEntry> {
    units
        .iter()
        .map(|(fuel, unit)| FuelUnitEntry {
            fuel_name: translator.fuel(fuel).to_owned(),
            fuel_unit: unit.clone(),
        })
        .collect()
}
