//! ---
//! ems_section: "08-energy-models-optimization"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Stored optimisation result tables and the accessor trait."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::errors::{EngineError, Result};
use crate::model::YearSeries;

/// Result families exposed by the engine's source parameters.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SourceMetric {
    InstalledCapacity,
    GenerationSum,
    GenerationDemand,
    FuelUsage,
    FuelCost,
    CapexOpex,
    Emission,
}

/// Granularity of the first index level: technology type or individual element.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Level {
    Type,
    Element,
}

/// Two-level `(name, year)` indexed numeric table with named value columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultTable {
    pub columns: Vec<String>,
    #[serde(default)]
    pub rows: Vec<ResultRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    pub name: String,
    pub year: u32,
    /// One entry per column; `None` marks a missing value.
    pub values: Vec<Option<f64>>,
}

impl ResultTable {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(
        &mut self,
        name: impl Into<String>,
        year: u32,
        values: Vec<Option<f64>>,
    ) -> Result<()> {
        let row = ResultRow {
            name: name.into(),
            year,
            values,
        };
        self.check_row(&row)?;
        self.rows.push(row);
        Ok(())
    }

    fn check_row(&self, row: &ResultRow) -> Result<()> {
        if row.values.len() != self.columns.len() {
            return Err(EngineError::RaggedRow {
                name: row.name.clone(),
                year: row.year,
                expected: self.columns.len(),
                found: row.values.len(),
            });
        }
        Ok(())
    }

    /// Check every row against the declared column count.
    pub fn validate(&self) -> Result<()> {
        self.rows.iter().try_for_each(|row| self.check_row(row))
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.column_index(column).is_some()
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct years, ascending.
    pub fn years(&self) -> Vec<u32> {
        self.rows
            .iter()
            .map(|r| r.year)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Present `(name, year, value)` cells of one column; `None` when the
    /// column does not exist.
    pub fn column_cells(&self, column: &str) -> Option<Vec<(&str, u32, f64)>> {
        let idx = self.column_index(column)?;
        Some(
            self.rows
                .iter()
                .filter_map(|row| {
                    row.values
                        .get(idx)
                        .copied()
                        .flatten()
                        .map(|v| (row.name.as_str(), row.year, v))
                })
                .collect(),
        )
    }

    /// Copy of the table without the named column; unchanged when absent.
    pub fn without_column(&self, column: &str) -> ResultTable {
        let Some(idx) = self.column_index(column) else {
            return self.clone();
        };
        let mut columns = self.columns.clone();
        columns.remove(idx);
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let mut values = row.values.clone();
                values.remove(idx);
                ResultRow {
                    name: row.name.clone(),
                    year: row.year,
                    values,
                }
            })
            .collect();
        ResultTable { columns, rows }
    }
}

/// Per stack fraction of an aggregate's consumers, per year.
pub type StackFractions = IndexMap<String, YearSeries>;

/// Installed power per element of a stack, per year.
pub type LbsCapacity = IndexMap<String, YearSeries>;

/// Accessor for a scenario's optimisation results.
pub trait ResultSource: Send + Sync + std::fmt::Debug {
    fn source_table(&self, metric: SourceMetric, level: Level) -> Result<ResultTable>;

    /// Consumer fractions per aggregate and stack.
    fn fractions(&self) -> Result<IndexMap<String, StackFractions>>;

    /// Consumer counts per aggregate.
    fn n_consumers(&self) -> Result<IndexMap<String, YearSeries>>;

    fn lbs_capacity(&self, stack: &str) -> Result<LbsCapacity>;
}

/// Results persisted alongside a scenario bundle.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoredResults {
    #[serde(default)]
    pub tables: IndexMap<SourceMetric, IndexMap<Level, ResultTable>>,
    #[serde(default)]
    pub fractions: IndexMap<String, StackFractions>,
    #[serde(default)]
    pub n_consumers: IndexMap<String, YearSeries>,
    #[serde(default)]
    pub lbs_capacity: IndexMap<String, LbsCapacity>,
}

impl StoredResults {
    pub fn insert_table(&mut self, metric: SourceMetric, level: Level, table: ResultTable) {
        self.tables.entry(metric).or_default().insert(level, table);
    }

    pub fn validate(&self) -> Result<()> {
        self.tables
            .values()
            .flat_map(IndexMap::values)
            .try_for_each(ResultTable::validate)
    }
}

impl ResultSource for StoredResults {
    fn source_table(&self, metric: SourceMetric, level: Level) -> Result<ResultTable> {
        self.tables
            .get(&metric)
            .and_then(|levels| levels.get(&level))
            .cloned()
            .ok_or(EngineError::MissingTable { metric, level })
    }

    fn fractions(&self) -> Result<IndexMap<String, StackFractions>> {
        Ok(self.fractions.clone())
    }

    fn n_consumers(&self) -> Result<IndexMap<String, YearSeries>> {
        Ok(self.n_consumers.clone())
    }

    fn lbs_capacity(&self, stack: &str) -> Result<LbsCapacity> {
        self.lbs_capacity
            .get(stack)
            .cloned()
            .ok_or_else(|| EngineError::UnknownStack(stack.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> ResultTable {
        let mut table = ResultTable::new(["EE", "HEAT"]);
        table.push_row("pv", 1, vec![Some(2.0), None]).unwrap();
        table.push_row("pv", 0, vec![Some(1.0), None]).unwrap();
        table.push_row("boiler", 0, vec![None, Some(5.0)]).unwrap();
        table
    }

    #[test]
    fn years_are_distinct_and_sorted() {
        assert_eq!(table().years(), vec![0, 1]);
    }

    #[test]
    fn column_cells_skip_missing_values() {
        let table = table();
        let cells = table.column_cells("HEAT").unwrap();
        assert_eq!(cells, vec![("boiler", 0, 5.0)]);
        assert!(table.column_cells("COLD").is_none());
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let mut table = ResultTable::new(["EE"]);
        let err = table.push_row("pv", 0, vec![Some(1.0), Some(2.0)]).unwrap_err();
        assert!(matches!(err, EngineError::RaggedRow { expected: 1, found: 2, .. }));
    }

    #[test]
    fn without_column_drops_values() {
        let table = table().without_column("EE");
        assert_eq!(table.columns, vec!["HEAT"]);
        assert!(table.rows.iter().all(|r| r.values.len() == 1));
    }

    #[test]
    fn missing_table_reports_metric_and_level() {
        let stored = StoredResults::default();
        let err = stored
            .source_table(SourceMetric::Emission, Level::Element)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "result table emission/element not present in scenario results"
        );
    }
}
