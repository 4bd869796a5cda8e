//! Data providers.
//!
//! A provider wraps one value stream behind [`DataProvider`]. It can write
//! its values inline (`"data":[...]` inside a series) or as one named column
//! of a shared dataset table, depending on the pass's encoding decision.

mod serial;
mod tree;

pub use serial::SerialData;
pub use tree::{TreeData, TreeNode};

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

use crate::encoder::EncodeContext;
use crate::error::{Error, Result};
use crate::part::{AsPart, Capabilities, Component, Part, PartId, PartKind};
use crate::property::{write_number, write_string, Properties};

/// Value type of a data stream; also decides the axis type it maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    /// Numbers.
    Number,
    /// Category labels.
    Category,
    /// Calendar dates.
    Date,
    /// Local date-times.
    Time,
    /// UTC instants.
    LegacyDate,
    /// Numbers on a logarithmic axis.
    Logarithmic,
}

impl DataType {
    /// Axis `type` used by the rendering engine.
    #[must_use]
    pub const fn axis_type(self) -> &'static str {
        match self {
            DataType::Number => "value",
            DataType::Category => "category",
            DataType::Date | DataType::Time | DataType::LegacyDate => "time",
            DataType::Logarithmic => "log",
        }
    }
}

/// A single data value.
#[derive(Debug, Clone, PartialEq)]
pub enum DataValue {
    /// A missing value.
    Null,
    /// A numeric value.
    Number(f64),
    /// A text value.
    Text(String),
    /// A calendar date.
    Date(NaiveDate),
    /// A local date-time.
    DateTime(NaiveDateTime),
    /// A UTC instant.
    Instant(DateTime<Utc>),
}

impl DataValue {
    /// Get as f64, or None if not a number.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            DataValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Get as string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            DataValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Write the value as JSON. Dates use ISO-8601.
    pub fn write_json(&self, out: &mut String) -> Result<()> {
        match self {
            DataValue::Null => out.push_str("null"),
            DataValue::Number(n) => write_number(out, *n),
            DataValue::Text(s) => write_string(out, s)?,
            DataValue::Date(d) => write_string(out, &d.format("%Y-%m-%d").to_string())?,
            DataValue::DateTime(t) => {
                write_string(out, &t.format("%Y-%m-%dT%H:%M:%S%.f").to_string())?;
            }
            DataValue::Instant(t) => {
                write_string(out, &t.to_rfc3339_opts(SecondsFormat::AutoSi, true))?;
            }
        }
        Ok(())
    }
}

impl From<f64> for DataValue {
    fn from(v: f64) -> Self {
        DataValue::Number(v)
    }
}

impl From<&str> for DataValue {
    fn from(s: &str) -> Self {
        DataValue::Text(s.to_string())
    }
}

impl From<String> for DataValue {
    fn from(s: String) -> Self {
        DataValue::Text(s)
    }
}

/// Element type of a [`Data`] stream.
pub trait DataItem: Clone + fmt::Debug + Send + Sync + 'static {
    /// Data type of streams of this item.
    const DATA_TYPE: DataType;

    /// Convert to a [`DataValue`].
    fn to_value(&self) -> DataValue;
}

impl DataItem for f64 {
    const DATA_TYPE: DataType = DataType::Number;
    fn to_value(&self) -> DataValue {
        DataValue::Number(*self)
    }
}

impl DataItem for i64 {
    const DATA_TYPE: DataType = DataType::Number;
    fn to_value(&self) -> DataValue {
        DataValue::Number(*self as f64)
    }
}

impl DataItem for String {
    const DATA_TYPE: DataType = DataType::Category;
    fn to_value(&self) -> DataValue {
        DataValue::Text(self.clone())
    }
}

impl DataItem for NaiveDate {
    const DATA_TYPE: DataType = DataType::Date;
    fn to_value(&self) -> DataValue {
        DataValue::Date(*self)
    }
}

impl DataItem for NaiveDateTime {
    const DATA_TYPE: DataType = DataType::Time;
    fn to_value(&self) -> DataValue {
        DataValue::DateTime(*self)
    }
}

impl DataItem for DateTime<Utc> {
    const DATA_TYPE: DataType = DataType::LegacyDate;
    fn to_value(&self) -> DataValue {
        DataValue::Instant(*self)
    }
}

/// A data stream usable by charts.
pub trait DataProvider: Part + AsPart {
    /// Value type.
    fn data_type(&self) -> DataType;

    /// Number of elements.
    fn len(&self) -> usize;

    /// True when there are no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether this provider can be written as a dataset column. Structural:
    /// fixed by the provider's construction, not toggled per pass.
    fn supports_dataset(&self) -> bool {
        true
    }

    /// Write element `index` as JSON.
    fn encode_value(&self, index: usize, out: &mut String) -> Result<()>;

    /// Write every element as a JSON array.
    fn encode_values(&self, out: &mut String) -> Result<()> {
        out.push('[');
        for index in 0..self.len() {
            if index > 0 {
                out.push(',');
            }
            self.encode_value(index, out)?;
        }
        out.push(']');
        Ok(())
    }
}

/// Custom per-value encoder. Its output must be one JSON value.
pub type ValueEncoder<T> = Arc<dyn Fn(&T, usize) -> String + Send + Sync>;

/// A list of values of one [`DataItem`] type.
pub struct Data<T: DataItem> {
    id: PartId,
    name: Option<String>,
    values: Vec<T>,
    data_type: DataType,
    encoder: Option<ValueEncoder<T>>,
}

/// Numeric data.
pub type NumberData = Data<f64>;
/// Category labels.
pub type CategoryData = Data<String>;
/// Calendar dates.
pub type DateData = Data<NaiveDate>;
/// Local date-times.
pub type TimeData = Data<NaiveDateTime>;
/// UTC instants.
pub type InstantData = Data<DateTime<Utc>>;

impl<T: DataItem> Data<T> {
    /// Create a provider over `values`.
    #[must_use]
    pub fn new(values: impl IntoIterator<Item = T>) -> Self {
        Self {
            id: PartId::next(),
            name: None,
            values: values.into_iter().collect(),
            data_type: T::DATA_TYPE,
            encoder: None,
        }
    }

    /// Set a name (used in error messages).
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Encode values with a custom function. Such a provider can only be
    /// written inline, which forces inline encoding for the whole document.
    #[must_use]
    pub fn with_encoder(mut self, encoder: impl Fn(&T, usize) -> String + Send + Sync + 'static) -> Self {
        self.encoder = Some(Arc::new(encoder));
        self
    }

    /// The values.
    #[must_use]
    pub fn values(&self) -> &[T] {
        &self.values
    }
}

impl Data<f64> {
    /// Plot on a logarithmic axis.
    #[must_use]
    pub fn logarithmic(mut self) -> Self {
        self.data_type = DataType::Logarithmic;
        self
    }
}

impl Data<String> {
    /// Category data from anything string-like.
    #[must_use]
    pub fn labels<S: Into<String>>(labels: impl IntoIterator<Item = S>) -> Self {
        Self::new(labels.into_iter().map(Into::into))
    }
}

impl<T: DataItem> fmt::Debug for Data<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Data")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("data_type", &self.data_type)
            .field("len", &self.values.len())
            .field("custom_encoder", &self.encoder.is_some())
            .finish()
    }
}

impl<T: DataItem> Part for Data<T> {
    fn id(&self) -> PartId {
        self.id
    }

    fn kind(&self) -> PartKind {
        PartKind::Data
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::SKIP_ELIGIBLE | Capabilities::DATA_CARRYING
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    // columns are written by the dataset category
    fn encode(&self, _ctx: &EncodeContext<'_>, _props: &mut Properties) -> Result<()> {
        Ok(())
    }

    fn as_data(&self) -> Option<&dyn DataProvider> {
        Some(self)
    }
}

impl<T: DataItem> Component for Data<T> {}

impl<T: DataItem> DataProvider for Data<T> {
    fn data_type(&self) -> DataType {
        self.data_type
    }

    fn len(&self) -> usize {
        self.values.len()
    }

    fn supports_dataset(&self) -> bool {
        self.encoder.is_none()
    }

    fn encode_value(&self, index: usize, out: &mut String) -> Result<()> {
        let Some(value) = self.values.get(index) else {
            out.push_str("null");
            return Ok(());
        };
        match &self.encoder {
            Some(encoder) => {
                let raw = encoder(value, index);
                serde_json::from_str::<serde_json::Value>(&raw).map_err(|e| {
                    Error::encoding(format!("{}: value {index} `{raw}` is not JSON: {e}", self.describe()))
                })?;
                out.push_str(&raw);
                Ok(())
            }
            None => value.to_value().write_json(out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded(provider: &dyn DataProvider) -> String {
        let mut out = String::new();
        provider.encode_values(&mut out).unwrap();
        out
    }

    #[test]
    fn test_numbers_verbatim() {
        let data = NumberData::new([1.0, 2.5, -3.0]);
        assert_eq!(encoded(&data), "[1,2.5,-3]");
        assert_eq!(data.len(), 3);
        assert_eq!(data.data_type(), DataType::Number);
    }

    #[test]
    fn test_categories_escaped_and_quoted() {
        let data = CategoryData::labels(["Banana", "Say \"hi\""]);
        assert_eq!(encoded(&data), r#"["Banana","Say \"hi\""]"#);
        assert_eq!(data.data_type().axis_type(), "category");
    }

    #[test]
    fn test_dates_are_iso_8601() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        let data = DateData::new([day]);
        assert_eq!(encoded(&data), r#"["2024-03-09"]"#);

        let time = day.and_hms_opt(14, 5, 0).unwrap();
        assert_eq!(encoded(&TimeData::new([time])), r#"["2024-03-09T14:05:00"]"#);

        let instant = time.and_utc();
        assert_eq!(encoded(&InstantData::new([instant])), r#"["2024-03-09T14:05:00Z"]"#);
    }

    #[test]
    fn test_empty_provider_encodes_empty_array() {
        let data = NumberData::new([]);
        assert!(data.is_empty());
        assert_eq!(encoded(&data), "[]");
    }

    #[test]
    fn test_logarithmic_axis_type() {
        let data = NumberData::new([10.0, 100.0]).logarithmic();
        assert_eq!(data.data_type(), DataType::Logarithmic);
        assert_eq!(data.data_type().axis_type(), "log");
    }

    #[test]
    fn test_custom_encoder_opts_out_of_dataset() {
        let data = NumberData::new([1.0, 2.0]).with_encoder(|v, i| format!("{{\"value\":{v},\"i\":{i}}}"));
        assert!(!data.supports_dataset());
        assert_eq!(encoded(&data), r#"[{"value":1,"i":0},{"value":2,"i":1}]"#);
    }

    #[test]
    fn test_custom_encoder_output_is_verified() {
        let data = NumberData::new([1.0]).named("broken").with_encoder(|_, _| "{".to_string());
        let mut out = String::new();
        let err = data.encode_values(&mut out).unwrap_err();
        assert!(err.is_encoding());
        assert!(err.to_string().contains("broken"));
    }

    #[test]
    fn test_data_parts_are_skip_eligible() {
        let data = NumberData::new([1.0]);
        assert!(data.capabilities().contains(Capabilities::SKIP_ELIGIBLE));
        assert!(data.capabilities().contains(Capabilities::DATA_CARRYING));
        assert!(data.as_data().is_some());
        assert_eq!(data.kind(), PartKind::Data);
    }

    #[test]
    fn test_data_value_accessors() {
        assert_eq!(DataValue::from(4.0).as_f64(), Some(4.0));
        assert_eq!(DataValue::from("x").as_str(), Some("x"));
        assert_eq!(DataValue::Null.as_f64(), None);
        assert_eq!(DataValue::from(String::from("y")).as_f64(), None);
    }
}
