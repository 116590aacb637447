use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

use super::error::{DataError, DataResult};

// ---------------------------------------------------------------------------
// Value – a single cleaned indicator cell
// ---------------------------------------------------------------------------

/// A cleaned indicator cell: a number, or `None` when the raw text held no
/// usable number.
pub type Value = Option<f64>;

/// Display wrapper used by tables and tooltips.
pub struct DisplayValue(pub Value);

impl fmt::Display for DisplayValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(v) => write!(f, "{v:.1}"),
            None => write!(f, "–"),
        }
    }
}

// ---------------------------------------------------------------------------
// Schema – indicator names and their column positions
// ---------------------------------------------------------------------------

/// Header labels of the three key columns, as they appear in the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyLabels {
    pub region: String,
    pub area: String,
    pub survey: String,
}

impl Default for KeyLabels {
    fn default() -> Self {
        Self {
            region: "India/States/UTs".to_string(),
            area: "Area".to_string(),
            survey: "Survey".to_string(),
        }
    }
}

/// Indicator columns of a table, validated once at load time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    keys: KeyLabels,
    indicators: Vec<String>,
    index: HashMap<String, usize>,
}

impl Schema {
    /// Build a schema, rejecting blank or repeated indicator names.
    pub fn new(keys: KeyLabels, indicators: Vec<String>) -> Result<Self, String> {
        let mut index = HashMap::with_capacity(indicators.len());
        for (i, name) in indicators.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(format!("indicator column {} has an empty header", i + 4));
            }
            if index.insert(name.clone(), i).is_some() {
                return Err(format!("indicator column '{name}' appears more than once"));
            }
        }
        Ok(Self {
            keys,
            indicators,
            index,
        })
    }

    pub fn keys(&self) -> &KeyLabels {
        &self.keys
    }

    /// Indicator names in file order.
    pub fn indicators(&self) -> &[String] {
        &self.indicators
    }

    pub fn len(&self) -> usize {
        self.indicators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indicators.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Column position of an indicator.
    pub fn index_of(&self, name: &str) -> DataResult<usize> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| DataError::InvalidIndicator {
                name: name.to_string(),
            })
    }

    /// Resolve several names at once, dropping repeats but keeping request order.
    pub fn resolve(&self, names: &[String]) -> DataResult<Vec<(String, usize)>> {
        let mut seen = BTreeSet::new();
        let mut out = Vec::with_capacity(names.len());
        for name in names {
            let idx = self.index_of(name)?;
            if seen.insert(idx) {
                out.push((name.clone(), idx));
            }
        }
        Ok(out)
    }
}

// ---------------------------------------------------------------------------
// Record – one row of the source file
// ---------------------------------------------------------------------------

/// One row: the grouping keys plus cleaned indicator values in schema order.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub region: String,
    pub area: String,
    pub survey: String,
    pub values: Vec<Value>,
}

impl Record {
    /// Value at a schema position; out-of-range positions read as missing.
    pub fn value_at(&self, idx: usize) -> Value {
        self.values.get(idx).copied().flatten()
    }
}

// ---------------------------------------------------------------------------
// Table – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full cleaned dataset. Never mutated after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    schema: Arc<Schema>,
    records: Vec<Record>,
}

impl Table {
    /// Build a table, checking every record against the schema width.
    pub fn new(schema: Arc<Schema>, records: Vec<Record>) -> Result<Self, String> {
        if let Some((i, r)) = records
            .iter()
            .enumerate()
            .find(|(_, r)| r.values.len() != schema.len())
        {
            return Err(format!(
                "record {i} has {} values but the schema has {} indicators",
                r.values.len(),
                schema.len()
            ));
        }
        Ok(Self { schema, records })
    }

    /// A table sharing this one's schema. Callers only pass records taken
    /// from a table with the same schema.
    pub(crate) fn derive(&self, records: Vec<Record>) -> Self {
        Self {
            schema: Arc::clone(&self.schema),
            records,
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn indicators(&self) -> &[String] {
        self.schema.indicators()
    }

    /// Value of one indicator in one record.
    pub fn value(&self, record: &Record, indicator: &str) -> DataResult<Value> {
        Ok(record.value_at(self.schema.index_of(indicator)?))
    }

    /// Area types in order of first appearance.
    pub fn areas(&self) -> Vec<String> {
        let mut seen = BTreeSet::new();
        self.records
            .iter()
            .filter(|r| seen.insert(r.area.as_str()))
            .map(|r| r.area.clone())
            .collect()
    }

    /// Distinct regions, sorted.
    pub fn regions(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| r.region.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Distinct survey waves, sorted.
    pub fn surveys(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| r.survey.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
