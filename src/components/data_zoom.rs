//! Data zoom.

use std::sync::Arc;

use crate::encoder::EncodeContext;
use crate::error::{Error, Result};
use crate::part::{Component, Customizable, Part, PartId, PartKind, ValidationContext};
use crate::property::{Properties, PropertyValue};
use crate::registry::PartRegistry;

use super::{Axis, CoordinateSystem};

/// How the zoom is operated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomKind {
    /// Mouse wheel and drag inside the plot.
    Inside,
    /// A slider bar.
    Slider,
}

impl ZoomKind {
    const fn as_str(self) -> &'static str {
        match self {
            ZoomKind::Inside => "inside",
            ZoomKind::Slider => "slider",
        }
    }
}

/// Zoom over one or more axes of a coordinate system.
#[derive(Debug, Clone)]
pub struct DataZoom {
    id: PartId,
    kind: ZoomKind,
    coordinate: Arc<CoordinateSystem>,
    axes: Vec<Arc<Axis>>,
    start: Option<f64>,
    end: Option<f64>,
    custom: Properties,
}

impl DataZoom {
    /// Create a zoom on `coordinate`; add at least one axis.
    #[must_use]
    pub fn new(kind: ZoomKind, coordinate: Arc<CoordinateSystem>) -> Self {
        Self {
            id: PartId::next(),
            kind,
            coordinate,
            axes: Vec::new(),
            start: None,
            end: None,
            custom: Properties::new(),
        }
    }

    /// Zoom this axis.
    #[must_use]
    pub fn axis(mut self, axis: Arc<Axis>) -> Self {
        self.axes.push(axis);
        self
    }

    /// Initial window start, in percent.
    #[must_use]
    pub fn start(mut self, percent: f64) -> Self {
        self.start = Some(percent);
        self
    }

    /// Initial window end, in percent.
    #[must_use]
    pub fn end(mut self, percent: f64) -> Self {
        self.end = Some(percent);
        self
    }
}

impl Part for DataZoom {
    fn id(&self) -> PartId {
        self.id
    }

    fn kind(&self) -> PartKind {
        PartKind::DataZoom
    }

    fn validate(&self, _ctx: &ValidationContext) -> Result<()> {
        if self.axes.is_empty() {
            return Err(Error::structural(self.describe(), "no axis to zoom"));
        }
        if let Some(axis) = self.axes.iter().find(|a| !self.coordinate.contains_axis(a)) {
            return Err(Error::structural(
                self.describe(),
                format!("{} doesn't belong to the zoomed coordinate system", axis.describe()),
            ));
        }
        Ok(())
    }

    fn encode(&self, ctx: &EncodeContext<'_>, props: &mut Properties) -> Result<()> {
        props.set("type", self.kind.as_str());
        for kind in self.coordinate.kind().axis_kinds() {
            let indices: Vec<PropertyValue> = self
                .axes
                .iter()
                .filter(|a| a.kind() == kind)
                .filter_map(|a| ctx.axis_index(a.id(), self.coordinate.id()))
                .map(PropertyValue::from)
                .collect();
            props.set(format!("{}Index", kind.label()), indices);
        }
        let percent = |v: &Option<f64>| v.is_some_and(|v| (0.0..=100.0).contains(&v));
        props
            .set_if("start", self.start, percent)
            .set_if("end", self.end, percent)
            .merge(&self.custom);
        Ok(())
    }
}

impl Component for DataZoom {
    fn add_parts_into(&self, registry: &mut PartRegistry) {
        let coordinate: Arc<dyn Component> = self.coordinate.clone();
        registry.add_component(coordinate);
    }
}

impl Customizable for DataZoom {
    fn custom_properties_mut(&mut self) -> &mut Properties {
        &mut self.custom
    }
}
