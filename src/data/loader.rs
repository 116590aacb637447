use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::sync::Arc;

use super::error::{DataError, DataResult};
use super::model::{KeyLabels, Record, Schema, Table, Value};

/// Number of leading key columns: region, area, survey.
pub const KEY_COLUMNS: usize = 3;

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load and clean an indicator table from a CSV file.
///
/// Layout: a header row, then `region, area, survey` in that order, then one
/// column per indicator. Indicator cells are cleaned with [`clean_cell`].
pub fn load(path: &Path) -> DataResult<Table> {
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => DataError::NotFound {
            path: path.to_path_buf(),
        },
        _ => DataError::unreadable(path, format!("opening file: {e}")),
    })?;
    load_from_reader(file, path)
}

/// Same as [`load`] but reads from any byte source. `origin` only labels errors.
pub fn load_from_reader<R: Read>(reader: R, origin: &Path) -> DataResult<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| DataError::unreadable(origin, format!("reading CSV headers: {e}")))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    if headers.len() < KEY_COLUMNS {
        return Err(DataError::unreadable(
            origin,
            format!(
                "expected region, area and survey columns, found {} column(s)",
                headers.len()
            ),
        ));
    }

    let keys = KeyLabels {
        region: headers[0].clone(),
        area: headers[1].clone(),
        survey: headers[2].clone(),
    };
    let schema = Schema::new(keys, headers[KEY_COLUMNS..].to_vec())
        .map_err(|reason| DataError::unreadable(origin, reason))?;
    let schema = Arc::new(schema);

    let mut records = Vec::new();
    let mut missing_cells = 0usize;

    for result in reader.byte_records() {
        let row = result.map_err(|e| DataError::unreadable(origin, describe_csv_error(&e)))?;
        let line = row.position().map_or(0, |p| p.line());

        let key = |i: usize, label: &str| -> DataResult<String> {
            let raw = row.get(i).unwrap_or_default();
            std::str::from_utf8(raw)
                .map(|s| s.trim().to_string())
                .map_err(|_| {
                    DataError::unreadable(origin, format!("line {line}: {label} is not valid UTF-8"))
                })
        };
        let region = key(0, &schema.keys().region)?;
        let area = key(1, &schema.keys().area)?;
        let survey = key(2, &schema.keys().survey)?;

        // Indicator cells never fail: stray bytes are dropped like any other symbol.
        let values: Vec<Value> = row.iter().skip(KEY_COLUMNS).map(clean_bytes).collect();
        missing_cells += values.iter().filter(|v| v.is_none()).count();

        records.push(Record {
            region,
            area,
            survey,
            values,
        });
    }

    let table =
        Table::new(schema, records).map_err(|reason| DataError::unreadable(origin, reason))?;

    log::info!(
        "Loaded {} records with {} indicators from {}",
        table.len(),
        table.schema().len(),
        origin.display()
    );
    log::debug!("{missing_cells} indicator cells cleaned to missing");

    Ok(table)
}

// ---------------------------------------------------------------------------
// Cell cleaning
// ---------------------------------------------------------------------------

/// Strip everything but ASCII digits and `.`, then parse what is left.
///
/// `"23.4%"` gives `23.4`, `"<0.1"` gives `0.1`, `"NA"` and `"1.2.3"` give
/// `None`. Signs are stripped along with every other symbol.
pub fn clean_cell(raw: &str) -> Value {
    clean_bytes(raw.as_bytes())
}

/// [`clean_cell`] on raw bytes, so cells in a legacy encoding still clean.
pub fn clean_bytes(raw: &[u8]) -> Value {
    let residue: String = raw
        .iter()
        .filter(|b| b.is_ascii_digit() || **b == b'.')
        .map(|b| char::from(*b))
        .collect();
    if residue.is_empty() {
        return None;
    }
    residue.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn describe_csv_error(e: &csv::Error) -> String {
    match e.kind() {
        csv::ErrorKind::UnequalLengths {
            pos,
            expected_len,
            len,
        } => {
            let line = pos.as_ref().map_or(0, |p| p.line());
            format!("line {line}: found {len} fields, expected {expected_len}")
        }
        _ => e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> DataResult<Table> {
        load_from_reader(text.as_bytes(), Path::new("inline.csv"))
    }

    #[test]
    fn clean_cell_strips_annotations() {
        assert_eq!(clean_cell("23.4%"), Some(23.4));
        assert_eq!(clean_cell("<0.1"), Some(0.1));
        assert_eq!(clean_cell("(12.5)"), Some(12.5));
        assert_eq!(clean_cell(" 74.0 *"), Some(74.0));
        assert_eq!(clean_cell("1,024"), Some(1024.0));
        assert_eq!(clean_cell("7"), Some(7.0));
        assert_eq!(clean_cell("-3.5"), Some(3.5));
    }

    #[test]
    fn clean_cell_marks_unusable_residue_missing() {
        assert_eq!(clean_cell("NA"), None);
        assert_eq!(clean_cell(""), None);
        assert_eq!(clean_cell("   "), None);
        assert_eq!(clean_cell("1.2.3"), None);
        assert_eq!(clean_cell("."), None);
        assert_eq!(clean_cell("na."), None);
    }

    #[test]
    fn clean_cell_never_coerces_to_zero() {
        for raw in ["NA", "*", "-", "n/a"] {
            assert_ne!(clean_cell(raw), Some(0.0), "{raw}");
        }
    }

    #[test]
    fn loads_keys_and_cleaned_values() {
        let table = parse(
            "India/States/UTs,Area,Survey,Literacy,Sex ratio\n\
             India, Total ,NFHS-3,65.5%,NA\n\
             India,Total,NFHS-4,74.0,(991)\n",
        )
        .unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.indicators(), ["Literacy", "Sex ratio"]);
        assert_eq!(table.schema().keys().region, "India/States/UTs");

        let first = &table.records()[0];
        assert_eq!(first.area, "Total");
        assert_eq!(table.value(first, "Literacy").unwrap(), Some(65.5));
        assert_eq!(table.value(first, "Sex ratio").unwrap(), None);
        assert_eq!(table.records()[1].values, vec![Some(74.0), Some(991.0)]);
    }

    #[test]
    fn header_only_file_is_an_empty_table() {
        let table = parse("Region,Area,Survey,Literacy\n").unwrap();
        assert!(table.is_empty());
        assert_eq!(table.indicators(), ["Literacy"]);
    }

    #[test]
    fn too_few_columns_is_a_data_source_error() {
        let err = parse("Region,Area\nIndia,Total\n").unwrap_err();
        assert!(err.is_data_source(), "{err}");
        assert!(err.to_string().contains("found 2 column(s)"));
    }

    #[test]
    fn empty_input_is_a_data_source_error() {
        assert!(parse("").unwrap_err().is_data_source());
    }

    #[test]
    fn ragged_row_is_a_data_source_error() {
        let err = parse("Region,Area,Survey,A,B\nIndia,Total,NFHS-4,1\n").unwrap_err();
        assert!(err.is_data_source());
        let msg = err.to_string();
        assert!(msg.ends_with("line 2: found 4 fields, expected 5"), "{msg}");
        assert_eq!(msg.matches("line 2").count(), 1, "{msg}");
    }

    #[test]
    fn duplicate_indicator_header_is_rejected() {
        let err = parse("Region,Area,Survey,A,A\n").unwrap_err();
        assert!(err.is_data_source());
    }

    #[test]
    fn legacy_encoded_footnote_only_touches_its_cell() {
        let table = load_from_reader(
            &b"Region,Area,Survey,A,B\nIndia,Total,NFHS-4,23.4\xb0,1\nKerala,Total,NFHS-4,5,6\n"[..],
            Path::new("latin1.csv"),
        )
        .unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.records()[0].values, vec![Some(23.4), Some(1.0)]);
        assert_eq!(table.records()[1].values, vec![Some(5.0), Some(6.0)]);
    }

    #[test]
    fn invalid_utf8_in_a_key_cell_is_a_data_source_error() {
        let err = load_from_reader(
            &b"Region,Area,Survey,A\nIndia,Tot\xe0l,NFHS-4,1\n"[..],
            Path::new("latin1.csv"),
        )
        .unwrap_err();
        assert!(err.is_data_source());
        assert!(err.to_string().contains("line 2: Area is not valid UTF-8"), "{err}");
    }

    #[test]
    fn clean_bytes_drops_non_ascii() {
        assert_eq!(clean_bytes(b"\xb1 12.5"), Some(12.5));
        assert_eq!(clean_bytes(b"\xb0"), None);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load(Path::new("no/such/nfhs.csv")).unwrap_err();
        assert!(matches!(err, DataError::NotFound { .. }));
        assert_eq!(err.to_string(), "data source not found at no/such/nfhs.csv");
    }
}
