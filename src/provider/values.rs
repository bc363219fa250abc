//! Column values, insert/update records and result rows.

use sea_orm::{DbErr, QueryResult, Value};

/// A single SQLite cell.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl ColumnValue {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Reals, and integers widened to a real.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Real(v) => Some(*v),
            #[allow(clippy::cast_precision_loss)]
            Self::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v.as_str()),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Blob(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    /// Reads column `index` of a raw result row.
    ///
    /// SQLite is dynamically typed, so the storage class of the value decides
    /// the variant rather than the declared column type.
    pub(crate) fn decode(row: &QueryResult, index: usize) -> Result<Self, DbErr> {
        if let Ok(v) = row.try_get_by::<Option<i64>, _>(index) {
            return Ok(v.map_or(Self::Null, Self::Integer));
        }
        if let Ok(v) = row.try_get_by::<Option<f64>, _>(index) {
            return Ok(v.map_or(Self::Null, Self::Real));
        }
        if let Ok(v) = row.try_get_by::<Option<String>, _>(index) {
            return Ok(v.map_or(Self::Null, Self::Text));
        }
        row.try_get_by::<Option<Vec<u8>>, _>(index)
            .map(|v| v.map_or(Self::Null, Self::Blob))
            .map_err(|e| DbErr::Custom(format!("cannot decode column {index}: {e:?}")))
    }
}

impl From<ColumnValue> for Value {
    fn from(value: ColumnValue) -> Self {
        match value {
            ColumnValue::Null => Option::<i64>::None.into(),
            ColumnValue::Integer(v) => v.into(),
            ColumnValue::Real(v) => v.into(),
            ColumnValue::Text(v) => v.into(),
            ColumnValue::Blob(v) => v.into(),
        }
    }
}

impl From<i64> for ColumnValue {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<i32> for ColumnValue {
    fn from(v: i32) -> Self {
        Self::Integer(i64::from(v))
    }
}

impl From<f64> for ColumnValue {
    fn from(v: f64) -> Self {
        Self::Real(v)
    }
}

impl From<&str> for ColumnValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for ColumnValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<Vec<u8>> for ColumnValue {
    fn from(v: Vec<u8>) -> Self {
        Self::Blob(v)
    }
}

impl From<crate::domain::MovieId> for ColumnValue {
    fn from(v: crate::domain::MovieId) -> Self {
        Self::Integer(v.value())
    }
}

impl<T: Into<ColumnValue>> From<Option<T>> for ColumnValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

/// Column/value pairs for one insert or update, in insertion order.
///
/// Putting a column twice keeps the latest value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentValues {
    entries: Vec<(String, ColumnValue)>,
}

impl ContentValues {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&mut self, column: impl Into<String>, value: impl Into<ColumnValue>) {
        let column = column.into();
        let value = value.into();
        if let Some(entry) = self.entries.iter_mut().find(|(c, _)| *c == column) {
            entry.1 = value;
        } else {
            self.entries.push((column, value));
        }
    }

    #[must_use]
    pub fn with(mut self, column: impl Into<String>, value: impl Into<ColumnValue>) -> Self {
        self.put(column, value);
        self
    }

    #[must_use]
    pub fn get(&self, column: &str) -> Option<&ColumnValue> {
        self.entries
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ColumnValue)> {
        self.entries.iter().map(|(c, v)| (c.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One result row, addressable by column label.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    columns: Vec<String>,
    values: Vec<ColumnValue>,
}

impl Row {
    /// # Panics
    ///
    /// Panics if `columns` and `values` differ in length.
    #[must_use]
    pub fn new(columns: Vec<String>, values: Vec<ColumnValue>) -> Self {
        assert_eq!(columns.len(), values.len(), "row shape mismatch");
        Self { columns, values }
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn get(&self, column: &str) -> Option<&ColumnValue> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|i| &self.values[i])
    }

    #[must_use]
    pub fn get_i64(&self, column: &str) -> Option<i64> {
        self.get(column).and_then(ColumnValue::as_i64)
    }

    #[must_use]
    pub fn get_f64(&self, column: &str) -> Option<f64> {
        self.get(column).and_then(ColumnValue::as_f64)
    }

    #[must_use]
    pub fn get_str(&self, column: &str) -> Option<&str> {
        self.get(column).and_then(ColumnValue::as_str)
    }

    #[must_use]
    pub fn get_bytes(&self, column: &str) -> Option<&[u8]> {
        self.get(column).and_then(ColumnValue::as_bytes)
    }

    /// True when the column is absent or holds NULL.
    #[must_use]
    pub fn is_null(&self, column: &str) -> bool {
        self.get(column).is_none_or(ColumnValue::is_null)
    }
}
