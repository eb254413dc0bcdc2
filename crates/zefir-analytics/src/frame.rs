//! ---
//! ems_section: "08-energy-models-optimization"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Labelled year-aligned frames used by every extractor."
//! ems_version: "v0.0.0-prealpha"
//! ems_owner: "tbd"
//! ---
//! [`YearFrame`] is an ordered map of labelled rows sharing one explicit year
//! axis. Every row holds exactly one value per year; operations combining two
//! frames require identical axes and fail with
//! [`AnalyticsError::YearMismatch`] otherwise.

use indexmap::IndexMap;
use zefir_engine::model::YearSeries;

use crate::errors::{AnalyticsError, Result};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct YearFrame {
    years: Vec<u32>,
    rows: IndexMap<String, Vec<f64>>,
}

impl YearFrame {
    pub fn new(years: Vec<u32>) -> Self {
        Self {
            years,
            rows: IndexMap::new(),
        }
    }

    pub fn years(&self) -> &[u32] {
        &self.years
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.rows.keys().map(String::as_str)
    }

    pub fn rows(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.rows.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn row(&self, label: &str) -> Option<&[f64]> {
        self.rows.get(label).map(Vec::as_slice)
    }

    fn check_len(&self, label: &str, values: &[f64]) -> Result<()> {
        if values.len() != self.years.len() {
            return Err(AnalyticsError::RowLength {
                label: label.to_owned(),
                expected: self.years.len(),
                found: values.len(),
            });
        }
        Ok(())
    }

    /// Insert or replace a row.
    pub fn insert_row(&mut self, label: impl Into<String>, values: Vec<f64>) -> Result<()> {
        let label = label.into();
        self.check_len(&label, &values)?;
        self.rows.insert(label, values);
        Ok(())
    }

    /// Add `values` onto an existing row, inserting it when absent.
    pub fn accumulate_row(&mut self, label: impl Into<String>, values: &[f64]) -> Result<()> {
        let label = label.into();
        self.check_len(&label, values)?;
        match self.rows.get_mut(&label) {
            Some(row) => row.iter_mut().zip(values).for_each(|(a, b)| *a += b),
            None => {
                self.rows.insert(label, values.to_vec());
            }
        }
        Ok(())
    }

    /// Relabel rows, dropping those mapped to `None` and summing rows that
    /// end up with the same label. Labels of the result are sorted.
    pub fn relabel_with<F>(&self, mut relabel: F) -> YearFrame
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut merged: IndexMap<String, Vec<f64>> = IndexMap::new();
        for (label, values) in &self.rows {
            let Some(target) = relabel(label) else {
                continue;
            };
            match merged.get_mut(&target) {
                Some(row) => row.iter_mut().zip(values).for_each(|(a, b)| *a += b),
                None => {
                    merged.insert(target, values.clone());
                }
            }
        }
        merged.sort_keys();
        YearFrame {
            years: self.years.clone(),
            rows: merged,
        }
    }

    /// Relabel every row through `mapping` (identity when absent) and sum
    /// rows sharing a target label.
    pub fn translate_and_merge(&self, mapping: &IndexMap<String, String>) -> YearFrame {
        self.relabel_with(|label| {
            Some(
                mapping
                    .get(label)
                    .cloned()
                    .unwrap_or_else(|| label.to_owned()),
            )
        })
    }

    pub fn retain_rows<F>(&mut self, mut keep: F)
    where
        F: FnMut(&str, &[f64]) -> bool,
    {
        self.rows.retain(|label, values| keep(label, values));
    }

    /// Select `years` from every row, in the given order.
    pub fn restrict_years(&self, years: &[u32]) -> Result<YearFrame> {
        let positions = years
            .iter()
            .map(|year| self.years.iter().position(|y| y == year))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| AnalyticsError::YearMismatch {
                left: self.years.clone(),
                right: years.to_vec(),
            })?;
        let rows = self
            .rows
            .iter()
            .map(|(label, values)| (label.clone(), positions.iter().map(|&i| values[i]).collect()))
            .collect();
        Ok(YearFrame {
            years: years.to_vec(),
            rows,
        })
    }

    /// Keep the first `n` years of the axis.
    pub fn truncate_years(&self, n: usize) -> YearFrame {
        let n = n.min(self.years.len());
        YearFrame {
            years: self.years[..n].to_vec(),
            rows: self
                .rows
                .iter()
                .map(|(label, values)| (label.clone(), values[..n].to_vec()))
                .collect(),
        }
    }

    pub fn check_aligned(&self, other: &YearFrame) -> Result<()> {
        if self.years != other.years {
            return Err(AnalyticsError::YearMismatch {
                left: self.years.clone(),
                right: other.years.clone(),
            });
        }
        Ok(())
    }

    /// Element-wise sum of rows present in both frames.
    pub fn add_aligned(&self, other: &YearFrame) -> Result<YearFrame> {
        self.check_aligned(other)?;
        let rows = self
            .rows
            .iter()
            .filter_map(|(label, values)| {
                other.rows.get(label).map(|rhs| {
                    let summed = values.iter().zip(rhs).map(|(a, b)| a + b).collect();
                    (label.clone(), summed)
                })
            })
            .collect();
        Ok(YearFrame {
            years: self.years.clone(),
            rows,
        })
    }

    /// Multiply every row by a per-year factor.
    pub fn scale(&self, factors: &[f64]) -> Result<YearFrame> {
        self.check_len("<factors>", factors)?;
        let rows = self
            .rows
            .iter()
            .map(|(label, values)| {
                let scaled = values.iter().zip(factors).map(|(v, f)| v * f).collect();
                (label.clone(), scaled)
            })
            .collect();
        Ok(YearFrame {
            years: self.years.clone(),
            rows,
        })
    }

    /// Per-year sum over all rows.
    pub fn column_sums(&self) -> Vec<f64> {
        let mut sums = vec![0.0; self.years.len()];
        for values in self.rows.values() {
            sums.iter_mut().zip(values).for_each(|(s, v)| *s += v);
        }
        sums
    }

    pub fn total(&self) -> f64 {
        self.rows.values().flatten().sum()
    }
}

/// Values of `series` at `years`; every year must be present.
pub fn series_on(series: &YearSeries, years: &[u32]) -> Result<Vec<f64>> {
    years
        .iter()
        .map(|year| series.get(year).copied())
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| AnalyticsError::YearMismatch {
            left: years.to_vec(),
            right: series.keys().copied().collect(),
        })
}

/// Product of two series over the years both contain.
pub fn multiply_series(lhs: &YearSeries, rhs: &YearSeries) -> YearSeries {
    lhs.iter()
        .filter_map(|(year, a)| rhs.get(year).map(|b| (*year, a * b)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(rows: &[(&str, [f64; 3])]) -> YearFrame {
        let mut frame = YearFrame::new(vec![0, 1, 2]);
        for (label, values) in rows {
            frame.insert_row(*label, values.to_vec()).unwrap();
        }
        frame
    }

    #[test]
    fn translate_and_merge_sums_collisions() {
        let frame = frame(&[("A", [1.0, 2.0, 3.0]), ("B", [10.0, 20.0, 30.0])]);
        let mapping: IndexMap<String, String> =
            [("A".to_owned(), "X".to_owned()), ("B".to_owned(), "X".to_owned())]
                .into_iter()
                .collect();
        let merged = frame.translate_and_merge(&mapping);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged.row("X"), Some(&[11.0, 22.0, 33.0][..]));
    }

    #[test]
    fn translate_and_merge_keeps_unmapped_labels() {
        let frame = frame(&[("Z", [1.0; 3]), ("A", [2.0; 3])]);
        let merged = frame.translate_and_merge(&IndexMap::new());
        assert_eq!(merged.labels().collect::<Vec<_>>(), vec!["A", "Z"]);
        assert_eq!(merged.translate_and_merge(&IndexMap::new()), merged);
    }

    #[test]
    fn add_aligned_rejects_different_axes() {
        let lhs = frame(&[("A", [1.0; 3])]);
        let rhs = YearFrame::new(vec![0, 1]);
        let err = lhs.add_aligned(&rhs).unwrap_err();
        assert!(matches!(err, AnalyticsError::YearMismatch { .. }));
    }

    #[test]
    fn add_aligned_keeps_common_rows_only() {
        let lhs = frame(&[("A", [1.0; 3]), ("B", [2.0; 3])]);
        let rhs = frame(&[("B", [3.0; 3]), ("C", [4.0; 3])]);
        let sum = lhs.add_aligned(&rhs).unwrap();
        assert_eq!(sum.labels().collect::<Vec<_>>(), vec!["B"]);
        assert_eq!(sum.row("B"), Some(&[5.0; 3][..]));
    }

    #[test]
    fn restrict_years_requires_every_year() {
        let frame = frame(&[("A", [1.0, 2.0, 3.0])]);
        let picked = frame.restrict_years(&[2, 0]).unwrap();
        assert_eq!(picked.row("A"), Some(&[3.0, 1.0][..]));
        assert!(frame.restrict_years(&[5]).is_err());
    }

    #[test]
    fn rows_must_match_axis_length() {
        let mut frame = YearFrame::new(vec![0, 1]);
        assert!(frame.insert_row("A", vec![1.0]).is_err());
        assert!(frame.accumulate_row("A", &[1.0, 2.0, 3.0]).is_err());
    }

    #[test]
    fn column_sums_and_total() {
        let frame = frame(&[("A", [1.0, 2.0, 3.0]), ("B", [1.0, 1.0, 1.0])]);
        assert_eq!(frame.column_sums(), vec![2.0, 3.0, 4.0]);
        assert_eq!(frame.total(), 9.0);
        assert_eq!(frame.truncate_years(2).years(), &[0, 1]);
    }

    #[test]
    fn series_helpers_align_on_years() {
        let a: YearSeries = [(0, 2.0), (1, 3.0), (2, 4.0)].into_iter().collect();
        let b: YearSeries = [(1, 10.0), (2, 10.0), (3, 10.0)].into_iter().collect();
        let product = multiply_series(&a, &b);
        assert_eq!(product.into_iter().collect::<Vec<_>>(), vec![(1, 30.0), (2, 40.0)]);
        assert_eq!(series_on(&a, &[2, 0]).unwrap(), vec![4.0, 2.0]);
        assert!(series_on(&a, &[7]).is_err());
    }
}
