//! ---
//! ems_section: "08-energy-models-optimization"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Pivoting of engine result tables into year frames."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
use std::collections::{BTreeMap, BTreeSet};

use indexmap::IndexMap;
use zefir_engine::model::YearSeries;
use zefir_engine::results::{ResultTable, StackFractions};

use crate::errors::Result;
use crate::frame::{multiply_series, YearFrame};

/// Pivot `(entity, year, value)` cells into a frame; the first value wins on
/// duplicates and absent cells read as zero.
pub fn frame_from_cells<'a, I>(cells: I) -> Result<YearFrame>
where
    I: IntoIterator<Item = (&'a str, u32, f64)>,
{
    let mut grid: BTreeMap<&str, BTreeMap<u32, f64>> = BTreeMap::new();
    let mut years = BTreeSet::new();
    for (entity, year, value) in cells {
        years.insert(year);
        grid.entry(entity).or_default().entry(year).or_insert(value);
    }
    let years: Vec<u32> = years.into_iter().collect();
    let mut frame = YearFrame::new(years.clone());
    for (entity, by_year) in grid {
        let values = years
            .iter()
            .map(|year| by_year.get(year).copied().unwrap_or(0.0))
            .collect();
        frame.insert_row(entity, values)?;
    }
    Ok(frame)
}

/// Pivot one column of a `(name, year)` table into entity rows over years.
///
/// Missing cells are skipped; an absent column yields an empty frame on the
/// table's year axis.
pub fn flatten_two_level_index(table: &ResultTable, column: &str) -> Result<YearFrame> {
    match table.column_cells(column) {
        Some(cells) => frame_from_cells(cells),
        None => Ok(YearFrame::new(table.years())),
    }
}

/// Pivot one column onto a fixed year axis. Cells outside the axis are
/// ignored, the first value wins on duplicates and absent cells read as zero.
pub fn flatten_on_axis(table: &ResultTable, column: &str, years: &[u32]) -> Result<YearFrame> {
    let mut frame = YearFrame::new(years.to_vec());
    let Some(cells) = table.column_cells(column) else {
        return Ok(frame);
    };
    let mut seen = BTreeSet::new();
    let mut grid: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for (entity, year, value) in cells {
        let Some(pos) = years.iter().position(|y| *y == year) else {
            continue;
        };
        if seen.insert((entity, year)) {
            grid.entry(entity).or_insert_with(|| vec![0.0; years.len()])[pos] = value;
        }
    }
    for (entity, values) in grid {
        frame.insert_row(entity, values)?;
    }
    Ok(frame)
}

/// Sum `(label, year, value)` cells over the union of their years.
pub fn frame_from_summed_cells<I>(cells: I) -> Result<YearFrame>
where
    I: IntoIterator<Item = (String, u32, f64)>,
{
    let mut grid: BTreeMap<String, BTreeMap<u32, f64>> = BTreeMap::new();
    let mut years = BTreeSet::new();
    for (label, year, value) in cells {
        years.insert(year);
        *grid.entry(label).or_default().entry(year).or_insert(0.0) += value;
    }
    let years: Vec<u32> = years.into_iter().collect();
    let mut frame = YearFrame::new(years.clone());
    for (label, by_year) in grid {
        let values = years
            .iter()
            .map(|year| by_year.get(year).copied().unwrap_or(0.0))
            .collect();
        frame.insert_row(label, values)?;
    }
    Ok(frame)
}

/// Sum over shared columns of `lhs * rhs` per `(name, year)`.
///
/// Rows present on one side only are kept with a zero sum.
pub fn weighted_row_sums(lhs: &ResultTable, rhs: &ResultTable) -> Result<YearFrame> {
    let mut rhs_cells: BTreeMap<(&str, u32), Vec<(&str, f64)>> = BTreeMap::new();
    for row in &rhs.rows {
        let present = rhs
            .columns
            .iter()
            .zip(&row.values)
            .filter_map(|(column, value)| value.map(|v| (column.as_str(), v)))
            .collect();
        rhs_cells.insert((row.name.as_str(), row.year), present);
    }

    let mut sums: Vec<(&str, u32, f64)> = Vec::new();
    for row in &lhs.rows {
        let Some(rhs_row) = rhs_cells.remove(&(row.name.as_str(), row.year)) else {
            sums.push((row.name.as_str(), row.year, 0.0));
            continue;
        };
        let total = lhs
            .columns
            .iter()
            .zip(&row.values)
            .filter_map(|(column, value)| {
                let lhs_value = (*value)?;
                rhs_row
                    .iter()
                    .find(|(c, _)| *c == column.as_str())
                    .map(|(_, rhs_value)| lhs_value * rhs_value)
            })
            .sum();
        sums.push((row.name.as_str(), row.year, total));
    }
    sums.extend(rhs_cells.into_keys().map(|(name, year)| (name, year, 0.0)));
    frame_from_cells(sums)
}

/// Consumers per stack: each aggregate's stack fractions times its consumer
/// count, on the years both series hold.
pub fn scale_rows_by_aggregate_factor(
    fractions: &IndexMap<String, StackFractions>,
    n_consumers: &IndexMap<String, YearSeries>,
) -> IndexMap<String, StackFractions> {
    let empty = YearSeries::new();
    fractions
        .iter()
        .map(|(aggregate, stacks)| {
            let counts = n_consumers.get(aggregate).unwrap_or(&empty);
            let scaled = stacks
                .iter()
                .map(|(stack, fraction)| (stack.clone(), multiply_series(fraction, counts)))
                .collect();
            (aggregate.clone(), scaled)
        })
        .collect()
}
