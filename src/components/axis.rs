//! Axes and their placement on coordinate systems.
//!
//! An [`Axis`] is plain configuration. It reaches the document through an
//! [`AxisPart`], which places it on one coordinate system. The same axis
//! placed twice on one system collapses to a single emitted node.

use std::sync::Arc;

use crate::data::DataType;
use crate::encoder::EncodeContext;
use crate::error::{Error, Result};
use crate::part::{Capabilities, Customizable, DedupKey, Part, PartId, PartKind, ValidationContext};
use crate::property::Properties;

use super::encode_visible;

/// Direction of an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisKind {
    /// Horizontal axis of a rectangular system.
    X,
    /// Vertical axis of a rectangular system.
    Y,
    /// Angular axis of a polar system.
    Angle,
    /// Radial axis of a polar system.
    Radius,
}

impl AxisKind {
    /// Part kind of the placed axis.
    #[must_use]
    pub const fn part_kind(self) -> PartKind {
        match self {
            AxisKind::X => PartKind::XAxis,
            AxisKind::Y => PartKind::YAxis,
            AxisKind::Angle => PartKind::AngleAxis,
            AxisKind::Radius => PartKind::RadiusAxis,
        }
    }

    /// Key prefix used in cross references (`xAxisIndex`, ...).
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            AxisKind::X => "xAxis",
            AxisKind::Y => "yAxis",
            AxisKind::Angle => "angleAxis",
            AxisKind::Radius => "radiusAxis",
        }
    }
}

/// Axis configuration.
#[derive(Debug, Clone)]
pub struct Axis {
    id: PartId,
    kind: AxisKind,
    data_type: DataType,
    name: Option<String>,
    min: Option<f64>,
    max: Option<f64>,
    inverse: bool,
    visible: bool,
    custom: Properties,
}

impl Axis {
    /// Create an axis of `kind` for values of `data_type`.
    #[must_use]
    pub fn new(kind: AxisKind, data_type: DataType) -> Self {
        Self {
            id: PartId::next(),
            kind,
            data_type,
            name: None,
            min: None,
            max: None,
            inverse: false,
            visible: true,
            custom: Properties::new(),
        }
    }

    /// X axis.
    #[must_use]
    pub fn x(data_type: DataType) -> Self {
        Self::new(AxisKind::X, data_type)
    }

    /// Y axis.
    #[must_use]
    pub fn y(data_type: DataType) -> Self {
        Self::new(AxisKind::Y, data_type)
    }

    /// Angle axis.
    #[must_use]
    pub fn angle(data_type: DataType) -> Self {
        Self::new(AxisKind::Angle, data_type)
    }

    /// Radius axis.
    #[must_use]
    pub fn radius(data_type: DataType) -> Self {
        Self::new(AxisKind::Radius, data_type)
    }

    /// Axis name.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Lower bound.
    #[must_use]
    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    /// Upper bound.
    #[must_use]
    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    /// Reverse the direction.
    #[must_use]
    pub fn inverse(mut self) -> Self {
        self.inverse = true;
        self
    }

    /// Show or hide.
    #[must_use]
    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Identity.
    #[must_use]
    pub fn id(&self) -> PartId {
        self.id
    }

    /// Direction.
    #[must_use]
    pub fn kind(&self) -> AxisKind {
        self.kind
    }

    /// Value type.
    #[must_use]
    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    /// Name, if set.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Name for messages.
    #[must_use]
    pub fn describe(&self) -> String {
        match &self.name {
            Some(name) => format!("{} '{name}'", self.kind.part_kind()),
            None => format!("{} #{}", self.kind.part_kind(), self.id),
        }
    }
}

impl Customizable for Axis {
    fn custom_properties_mut(&mut self) -> &mut Properties {
        &mut self.custom
    }
}

/// An axis placed on one coordinate system.
#[derive(Debug, Clone)]
pub struct AxisPart {
    id: PartId,
    axis: Arc<Axis>,
    coordinate: PartId,
    coordinate_key: &'static str,
}

impl AxisPart {
    /// Place `axis` on the system `coordinate`. `coordinate_key` is the
    /// index key of that system (`gridIndex`, `polarIndex`).
    #[must_use]
    pub fn new(axis: Arc<Axis>, coordinate: PartId, coordinate_key: &'static str) -> Self {
        Self {
            id: PartId::next(),
            axis,
            coordinate,
            coordinate_key,
        }
    }

    /// The placed axis.
    #[must_use]
    pub fn axis(&self) -> &Axis {
        &self.axis
    }
}

impl Part for AxisPart {
    fn id(&self) -> PartId {
        self.id
    }

    fn kind(&self) -> PartKind {
        self.axis.kind.part_kind()
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::VALUE_DEDUP
    }

    fn dedup_key(&self) -> DedupKey {
        DedupKey::AxisInCoordinate {
            axis: self.axis.id,
            coordinate: self.coordinate,
        }
    }

    fn name(&self) -> Option<&str> {
        self.axis.name()
    }

    fn validate(&self, _ctx: &ValidationContext) -> Result<()> {
        if let (Some(min), Some(max)) = (self.axis.min, self.axis.max) {
            if min > max {
                return Err(Error::structural(
                    self.axis.describe(),
                    format!("minimum {min} is above maximum {max}"),
                ));
            }
        }
        Ok(())
    }

    fn encode(&self, ctx: &EncodeContext<'_>, props: &mut Properties) -> Result<()> {
        let axis = &self.axis;
        encode_visible(axis.visible, props, &axis.custom, |props| {
            props
                .set("type", axis.data_type.axis_type())
                .set("name", axis.name.as_deref())
                .set("min", axis.min)
                .set("max", axis.max)
                .set_if("inverse", true, |_| axis.inverse)
                .set_if(self.coordinate_key, ctx.index_of(self.coordinate), |i| {
                    i.is_some_and(|i| i > 0)
                });
            Ok(())
        })
    }
}
