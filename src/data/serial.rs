//! Arithmetic integer range as a number stream.

use crate::encoder::EncodeContext;
use crate::error::Result;
use crate::part::{Capabilities, Component, Part, PartId, PartKind};
use crate::property::Properties;

use super::{DataProvider, DataType};

/// Integers from `start` to `end` (inclusive) by `step`.
///
/// A zero step is treated as one. A negative step counts down from the larger
/// bound, a positive one counts up from the smaller bound.
#[derive(Debug, Clone)]
pub struct SerialData {
    id: PartId,
    name: Option<String>,
    start: i64,
    end: i64,
    step: i64,
}

impl SerialData {
    /// Create a range `start..=end` with step 1.
    #[must_use]
    pub fn new(start: i64, end: i64) -> Self {
        Self::with_step(start, end, 1)
    }

    /// Create a range with an explicit step.
    #[must_use]
    pub fn with_step(start: i64, end: i64, step: i64) -> Self {
        let step = if step == 0 { 1 } else { step };
        let (low, high) = (start.min(end), start.max(end));
        let (start, end) = if step > 0 { (low, high) } else { (high, low) };
        Self {
            id: PartId::next(),
            name: None,
            start,
            end,
            step,
        }
    }

    /// Set a name (used in error messages).
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Value at `index`.
    #[must_use]
    pub fn value_at(&self, index: usize) -> Option<i64> {
        if index >= self.len() {
            return None;
        }
        let offset = i128::try_from(index).ok()? * i128::from(self.step);
        i64::try_from(i128::from(self.start) + offset).ok()
    }
}

impl Part for SerialData {
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

    fn encode(&self, _ctx: &EncodeContext<'_>, _props: &mut Properties) -> Result<()> {
        Ok(())
    }

    fn as_data(&self) -> Option<&dyn DataProvider> {
        Some(self)
    }
}

impl Component for SerialData {}

impl DataProvider for SerialData {
    fn data_type(&self) -> DataType {
        DataType::Number
    }

    fn len(&self) -> usize {
        // i128 holds the span of any two i64 bounds
        let span = (i128::from(self.end) - i128::from(self.start)) / i128::from(self.step);
        if span < 0 {
            return 0;
        }
        usize::try_from(span + 1).unwrap_or(usize::MAX)
    }

    fn encode_value(&self, index: usize, out: &mut String) -> Result<()> {
        match self.value_at(index) {
            Some(v) => out.push_str(&v.to_string()),
            None => out.push_str("null"),
        }
        Ok(())
    }
}
