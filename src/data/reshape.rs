//! Derived views: pivot, long format and spotlight.
//!
//! Every function here reads a [`Table`] and builds a fresh value; nothing is
//! cached and the input is never modified.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::error::DataResult;
use super::model::{Table, Value};

// ---------------------------------------------------------------------------
// Matrix – region × survey for one indicator
// ---------------------------------------------------------------------------

/// Wide view of one indicator: one row per region, one column per survey wave.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Matrix {
    pub indicator: String,
    /// Row labels, sorted.
    pub regions: Vec<String>,
    /// Column labels, sorted.
    pub surveys: Vec<String>,
    /// `cells[row][col]`, aligned with `regions` and `surveys`.
    pub cells: Vec<Vec<Value>>,
}

impl Matrix {
    /// Cell for a (region, survey) pair; `None` if either label is unknown or
    /// the value is missing.
    pub fn get(&self, region: &str, survey: &str) -> Value {
        let row = self.regions.iter().position(|r| r == region)?;
        let col = self.surveys.iter().position(|s| s == survey)?;
        self.cells[row][col]
    }

    /// One region's row as `survey → value`.
    pub fn row(&self, region: &str) -> Option<BTreeMap<&str, Value>> {
        let row = self.regions.iter().position(|r| r == region)?;
        Some(
            self.surveys
                .iter()
                .map(String::as_str)
                .zip(self.cells[row].iter().copied())
                .collect(),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

/// Pivot one indicator into a region × survey matrix.
///
/// Regions and surveys are sorted, so record order only matters when a
/// (region, survey) pair occurs more than once; then the later record wins.
/// Pairs with no record are missing.
pub fn pivot_by_indicator(table: &Table, indicator: &str) -> DataResult<Matrix> {
    let idx = table.schema().index_of(indicator)?;

    let mut grid: BTreeMap<(&str, &str), Value> = BTreeMap::new();
    let mut regions = BTreeSet::new();
    let mut surveys = BTreeSet::new();

    for r in table.records() {
        regions.insert(r.region.as_str());
        surveys.insert(r.survey.as_str());
        if grid
            .insert((r.region.as_str(), r.survey.as_str()), r.value_at(idx))
            .is_some()
        {
            log::debug!(
                "duplicate ({}, {}) for '{indicator}', keeping the later record",
                r.region,
                r.survey
            );
        }
    }

    let cells = regions
        .iter()
        .map(|region| {
            surveys
                .iter()
                .map(|survey| grid.get(&(*region, *survey)).copied().flatten())
                .collect()
        })
        .collect();

    Ok(Matrix {
        indicator: indicator.to_string(),
        regions: regions.into_iter().map(str::to_string).collect(),
        surveys: surveys.into_iter().map(str::to_string).collect(),
        cells,
    })
}

// ---------------------------------------------------------------------------
// LongTable – one row per (region, survey, indicator)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LongRow {
    pub region: String,
    pub survey: String,
    pub indicator: String,
    pub value: Value,
}

/// Tidy view across several indicators.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LongTable {
    pub rows: Vec<LongRow>,
}

impl LongTable {
    /// Rows without a value removed. Display policy, not part of the melt.
    pub fn drop_missing(&self) -> LongTable {
        LongTable {
            rows: self
                .rows
                .iter()
                .filter(|r| r.value.is_some())
                .cloned()
                .collect(),
        }
    }

    /// Rows for a single indicator, in order.
    pub fn for_indicator(&self, indicator: &str) -> LongTable {
        LongTable {
            rows: self
                .rows
                .iter()
                .filter(|r| r.indicator == indicator)
                .cloned()
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Melt the requested indicators into one row per (record, indicator).
///
/// Rows come grouped by indicator in request order, records in table order
/// within each group. Repeated names in `indicators` are ignored and missing
/// values are kept.
pub fn long_format(table: &Table, indicators: &[String]) -> DataResult<LongTable> {
    let resolved = table.schema().resolve(indicators)?;

    let mut rows = Vec::with_capacity(resolved.len() * table.len());
    for (name, idx) in &resolved {
        for r in table.records() {
            rows.push(LongRow {
                region: r.region.clone(),
                survey: r.survey.clone(),
                indicator: name.clone(),
                value: r.value_at(*idx),
            });
        }
    }
    Ok(LongTable { rows })
}

// ---------------------------------------------------------------------------
// Spotlight – one region and area, indexed by survey
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpotlightRow {
    pub survey: String,
    /// Aligned with [`Spotlight::indicators`].
    pub values: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Spotlight {
    pub region: String,
    pub area: String,
    pub indicators: Vec<String>,
    pub rows: Vec<SpotlightRow>,
}

impl Spotlight {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Value of `indicator` in the row for `survey`.
    pub fn value(&self, survey: &str, indicator: &str) -> Value {
        let col = self.indicators.iter().position(|i| i == indicator)?;
        self.rows
            .iter()
            .find(|r| r.survey == survey)
            .and_then(|r| r.values.get(col).copied().flatten())
    }
}

/// Records matching `region` and `area` exactly, one row per record with the
/// requested indicators. No match gives an empty spotlight, not an error.
pub fn spotlight(
    table: &Table,
    region: &str,
    area: &str,
    indicators: &[String],
) -> DataResult<Spotlight> {
    let resolved = table.schema().resolve(indicators)?;

    let rows = table
        .records()
        .iter()
        .filter(|r| r.region == region && r.area == area)
        .map(|r| SpotlightRow {
            survey: r.survey.clone(),
            values: resolved.iter().map(|(_, idx)| r.value_at(*idx)).collect(),
        })
        .collect();

    Ok(Spotlight {
        region: region.to_string(),
        area: area.to_string(),
        indicators: resolved.into_iter().map(|(name, _)| name).collect(),
        rows,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::path::Path;

    use super::*;
    use crate::data::error::DataError;
    use crate::data::filter::filter_rows;
    use crate::data::loader::load_from_reader;

    const HEADER: &str = "India/States/UTs,Area,Survey,Literacy,Sex ratio,Anaemia\n";

    const ROWS: &[&str] = &[
        "India,Total,NFHS-3,65.5,1000,55.3",
        "India,Total,NFHS-4,74.0,991,53.1",
        "India,Urban,NFHS-4,83.7,956,50.9",
        "Kerala,Total,NFHS-4,97.9,1049,NA",
        "Bihar,Total,NFHS-3,42.5,1014*,67.4",
        "Bihar,Rural,NFHS-3,38.0,1027,68.1",
    ];

    fn table_from(rows: &[&str]) -> Table {
        let mut text = HEADER.to_string();
        for r in rows {
            text.push_str(r);
            text.push('\n');
        }
        load_from_reader(text.as_bytes(), Path::new("reshape.csv")).unwrap()
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn pivot_two_waves_for_india() {
        let t = table_from(&ROWS[..2]);
        let m = pivot_by_indicator(&filter_rows(&t, "Total", &BTreeSet::new()), "Literacy")
            .unwrap();
        assert_eq!(m.regions, vec!["India"]);
        assert_eq!(m.surveys, vec!["NFHS-3", "NFHS-4"]);
        assert_eq!(m.cells, vec![vec![Some(65.5), Some(74.0)]]);
        let row = m.row("India").unwrap();
        assert_eq!(row["NFHS-3"], Some(65.5));
        assert_eq!(row["NFHS-4"], Some(74.0));
    }

    #[test]
    fn pivot_marks_absent_pairs_missing() {
        let t = filter_rows(&table_from(ROWS), "Total", &BTreeSet::new());
        let m = pivot_by_indicator(&t, "Anaemia").unwrap();
        assert_eq!(m.regions, vec!["Bihar", "India", "Kerala"]);
        assert_eq!(m.get("Kerala", "NFHS-3"), None);
        assert_eq!(m.get("Kerala", "NFHS-4"), None);
        assert_eq!(m.get("Bihar", "NFHS-3"), Some(67.4));
        assert_eq!(m.get("Goa", "NFHS-3"), None);
    }

    #[test]
    fn pivot_ignores_record_order() {
        // (region, survey) is unique once a single area is selected.
        let total = |rows: &[&str]| filter_rows(&table_from(rows), "Total", &BTreeSet::new());
        let forward = total(ROWS);
        let mut reversed_rows = ROWS.to_vec();
        reversed_rows.reverse();
        let reversed = total(&reversed_rows[..]);
        let rotated_rows: Vec<&str> = ROWS[3..].iter().chain(&ROWS[..3]).copied().collect();
        let rotated = total(&rotated_rows[..]);

        for ind in ["Literacy", "Sex ratio", "Anaemia"] {
            let expected = pivot_by_indicator(&forward, ind).unwrap();
            assert_eq!(pivot_by_indicator(&reversed, ind).unwrap(), expected);
            assert_eq!(pivot_by_indicator(&rotated, ind).unwrap(), expected);
        }
    }

    #[test]
    fn pivot_duplicate_pair_last_record_wins() {
        let t = table_from(&[
            "India,Total,NFHS-4,70.0,1,1",
            "India,Total,NFHS-4,74.0,1,1",
        ]);
        let m = pivot_by_indicator(&t, "Literacy").unwrap();
        assert_eq!(m.get("India", "NFHS-4"), Some(74.0));
    }

    #[test]
    fn pivot_commutes_with_area_filter() {
        let t = table_from(ROWS);
        let none = BTreeSet::new();
        let filtered = filter_rows(&t, "Total", &none);
        let a = pivot_by_indicator(&filtered, "Sex ratio").unwrap();
        let b = pivot_by_indicator(&filter_rows(&filtered, "Total", &none), "Sex ratio").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.get("Bihar", "NFHS-3"), Some(1014.0));
    }

    #[test]
    fn pivot_unknown_indicator_fails() {
        let err = pivot_by_indicator(&table_from(ROWS), "Height").unwrap_err();
        assert!(matches!(err, DataError::InvalidIndicator { ref name } if name == "Height"));
    }

    #[test]
    fn pivot_of_empty_table_is_empty() {
        let m = pivot_by_indicator(&table_from(&[]), "Literacy").unwrap();
        assert!(m.is_empty());
        assert!(m.surveys.is_empty());
    }

    #[test]
    fn long_format_keeps_missing_rows() {
        let t = table_from(ROWS);
        let long = long_format(&t, &names(&["Anaemia"])).unwrap();
        assert_eq!(long.len(), ROWS.len());
        assert_eq!(long.rows[3].region, "Kerala");
        assert_eq!(long.rows[3].value, None);
        assert_eq!(long.drop_missing().len(), ROWS.len() - 1);
    }

    #[test]
    fn long_format_subset_matches_single_indicator() {
        let t = table_from(ROWS);
        let both = long_format(&t, &names(&["Literacy", "Anaemia"])).unwrap();
        let single = long_format(&t, &names(&["Literacy"])).unwrap();
        assert_eq!(both.for_indicator("Literacy"), single);
        assert_eq!(both.len(), 2 * ROWS.len());
    }

    #[test]
    fn long_format_groups_by_indicator_in_request_order() {
        let t = table_from(&ROWS[..2]);
        let long = long_format(&t, &names(&["Sex ratio", "Literacy", "Sex ratio"])).unwrap();
        let order: Vec<_> = long
            .rows
            .iter()
            .map(|r| (r.indicator.as_str(), r.survey.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![
                ("Sex ratio", "NFHS-3"),
                ("Sex ratio", "NFHS-4"),
                ("Literacy", "NFHS-3"),
                ("Literacy", "NFHS-4"),
            ]
        );
    }

    #[test]
    fn long_format_with_no_indicators_is_empty() {
        assert!(long_format(&table_from(ROWS), &[]).unwrap().is_empty());
    }

    #[test]
    fn long_format_unknown_indicator_fails() {
        assert!(long_format(&table_from(ROWS), &names(&["Literacy", "Height"])).is_err());
    }

    #[test]
    fn spotlight_matches_region_and_area() {
        let t = table_from(ROWS);
        let s = spotlight(&t, "India", "Total", &names(&["Literacy", "Anaemia"])).unwrap();
        assert_eq!(s.rows.len(), 2);
        assert_eq!(s.rows[0].survey, "NFHS-3");
        assert_eq!(s.value("NFHS-4", "Literacy"), Some(74.0));
        assert_eq!(s.value("NFHS-4", "Anaemia"), Some(53.1));
        assert_eq!(s.value("NFHS-5", "Anaemia"), None);
    }

    #[test]
    fn spotlight_on_absent_combination_is_empty() {
        let t = table_from(ROWS);
        let s = spotlight(&t, "Kerala", "Rural", &names(&["Literacy"])).unwrap();
        assert!(s.is_empty());
        assert_eq!(s.indicators, vec!["Literacy"]);
    }

    #[test]
    fn spotlight_value_tolerates_short_rows() {
        let s = Spotlight {
            region: "India".into(),
            area: "Total".into(),
            indicators: names(&["Literacy", "Anaemia"]),
            rows: vec![SpotlightRow {
                survey: "NFHS-4".into(),
                values: vec![Some(74.0)],
            }],
        };
        assert_eq!(s.value("NFHS-4", "Literacy"), Some(74.0));
        assert_eq!(s.value("NFHS-4", "Anaemia"), None);
    }

    #[test]
    fn spotlight_with_no_indicators_keeps_surveys() {
        let s = spotlight(&table_from(ROWS), "Bihar", "Rural", &[]).unwrap();
        assert_eq!(s.rows.len(), 1);
        assert!(s.rows[0].values.is_empty());
    }

    #[test]
    fn matrix_serializes_missing_as_null() {
        let t = table_from(&ROWS[3..4]);
        let m = pivot_by_indicator(&t, "Anaemia").unwrap();
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json["cells"][0][0], serde_json::Value::Null);
        assert_eq!(json["regions"][0], "Kerala");
    }
}
