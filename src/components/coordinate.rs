//! Coordinate systems.

use std::sync::Arc;

use crate::encoder::EncodeContext;
use crate::error::{Error, Result};
use crate::part::{Component, Customizable, Part, PartId, PartKind, ValidationContext};
use crate::property::{Position, Properties};
use crate::registry::PartRegistry;

use super::{Axis, AxisKind, AxisPart};

/// Shape of a coordinate system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateKind {
    /// X/Y grid.
    Rectangular,
    /// Angle/radius.
    Polar,
}

impl CoordinateKind {
    /// Value of a series' `coordinateSystem` key.
    #[must_use]
    pub const fn system_name(self) -> &'static str {
        match self {
            CoordinateKind::Rectangular => "cartesian2d",
            CoordinateKind::Polar => "polar",
        }
    }

    /// Index key used by axes placed on this kind of system.
    #[must_use]
    pub const fn index_key(self) -> &'static str {
        match self {
            CoordinateKind::Rectangular => "gridIndex",
            CoordinateKind::Polar => "polarIndex",
        }
    }

    /// Axis kinds a system of this kind needs, in data dimension order.
    #[must_use]
    pub const fn axis_kinds(self) -> [AxisKind; 2] {
        match self {
            CoordinateKind::Rectangular => [AxisKind::X, AxisKind::Y],
            CoordinateKind::Polar => [AxisKind::Angle, AxisKind::Radius],
        }
    }

    /// Data dimension names used in `encode` references.
    #[must_use]
    pub const fn dimensions(self) -> [&'static str; 2] {
        match self {
            CoordinateKind::Rectangular => ["x", "y"],
            CoordinateKind::Polar => ["angle", "radius"],
        }
    }
}

/// A coordinate system and the axes placed on it.
#[derive(Debug, Clone)]
pub struct CoordinateSystem {
    id: PartId,
    kind: CoordinateKind,
    axes: Vec<Arc<Axis>>,
    position: Position,
    custom: Properties,
}

impl CoordinateSystem {
    /// Create a system with no axes.
    #[must_use]
    pub fn new(kind: CoordinateKind) -> Self {
        Self {
            id: PartId::next(),
            kind,
            axes: Vec::new(),
            position: Position::new(),
            custom: Properties::new(),
        }
    }

    /// Rectangular system.
    #[must_use]
    pub fn rectangular() -> Self {
        Self::new(CoordinateKind::Rectangular)
    }

    /// Polar system.
    #[must_use]
    pub fn polar() -> Self {
        Self::new(CoordinateKind::Polar)
    }

    /// Place an axis. Placing the same axis again has no effect.
    #[must_use]
    pub fn axis(mut self, axis: Arc<Axis>) -> Self {
        if !self.contains_axis(&axis) {
            self.axes.push(axis);
        }
        self
    }

    /// Placement.
    #[must_use]
    pub fn position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    /// Shape.
    #[must_use]
    pub fn kind(&self) -> CoordinateKind {
        self.kind
    }

    /// Placed axes.
    #[must_use]
    pub fn axes(&self) -> &[Arc<Axis>] {
        &self.axes
    }

    /// True if `axis` is placed on this system.
    #[must_use]
    pub fn contains_axis(&self, axis: &Axis) -> bool {
        self.axes.iter().any(|a| a.id() == axis.id())
    }

    /// First placed axis of `kind`.
    #[must_use]
    pub fn first_axis(&self, kind: AxisKind) -> Option<&Arc<Axis>> {
        self.axes.iter().find(|a| a.kind() == kind)
    }
}

impl Part for CoordinateSystem {
    fn id(&self) -> PartId {
        self.id
    }

    fn kind(&self) -> PartKind {
        match self.kind {
            CoordinateKind::Rectangular => PartKind::Grid,
            CoordinateKind::Polar => PartKind::Polar,
        }
    }

    fn validate(&self, _ctx: &ValidationContext) -> Result<()> {
        let allowed = self.kind.axis_kinds();
        if let Some(axis) = self.axes.iter().find(|a| !allowed.contains(&a.kind())) {
            return Err(Error::structural(
                self.describe(),
                format!("{} can not be placed on this coordinate system", axis.describe()),
            ));
        }
        for kind in allowed {
            if self.first_axis(kind).is_none() {
                return Err(Error::structural(
                    self.describe(),
                    format!("{} not set", kind.part_kind()),
                ));
            }
        }
        Ok(())
    }

    fn encode(&self, _ctx: &EncodeContext<'_>, props: &mut Properties) -> Result<()> {
        props.splice(&self.position).merge(&self.custom);
        Ok(())
    }
}

impl Component for CoordinateSystem {
    fn add_parts_into(&self, registry: &mut PartRegistry) {
        for axis in &self.axes {
            registry.add(Arc::new(AxisPart::new(
                Arc::clone(axis),
                self.id,
                self.kind.index_key(),
            )));
        }
    }
}

impl Customizable for CoordinateSystem {
    fn custom_properties_mut(&mut self) -> &mut Properties {
        &mut self.custom
    }
}
