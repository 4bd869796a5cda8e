//! Charts: one series each.

use std::sync::Arc;

use crate::color::Rgba;
use crate::config::DatasetGrouping;
use crate::data::DataProvider;
use crate::encoder::{DatasetRef, EncodeContext};
use crate::error::{Error, Result};
use crate::part::{Component, Customizable, Part, PartId, PartKind, ValidationContext};
use crate::property::{Properties, PropertyValue};
use crate::registry::PartRegistry;

use super::{Axis, AxisKind, CoordinateKind, CoordinateSystem};

/// Series type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartType {
    /// Line chart.
    Line,
    /// Bar chart.
    Bar,
    /// Scatter chart.
    Scatter,
    /// Pie chart.
    Pie,
    /// Funnel chart.
    Funnel,
    /// Tree.
    Tree,
    /// Treemap.
    Treemap,
    /// Sunburst.
    Sunburst,
}

impl ChartType {
    /// Series `type` value.
    #[must_use]
    pub const fn series_type(self) -> &'static str {
        match self {
            ChartType::Line => "line",
            ChartType::Bar => "bar",
            ChartType::Scatter => "scatter",
            ChartType::Pie => "pie",
            ChartType::Funnel => "funnel",
            ChartType::Tree => "tree",
            ChartType::Treemap => "treemap",
            ChartType::Sunburst => "sunburst",
        }
    }

    /// True if the chart is drawn on a coordinate system.
    #[must_use]
    pub const fn requires_coordinate(self) -> bool {
        matches!(self, ChartType::Line | ChartType::Bar | ChartType::Scatter)
    }

    /// Data dimensions when not drawn on a coordinate system.
    #[must_use]
    pub const fn dimensions(self) -> &'static [&'static str] {
        match self {
            ChartType::Line | ChartType::Bar | ChartType::Scatter => &["x", "y"],
            ChartType::Pie | ChartType::Funnel => &["itemName", "value"],
            ChartType::Tree | ChartType::Treemap | ChartType::Sunburst => &["value"],
        }
    }
}

/// A chart, emitted as one series.
#[derive(Debug, Clone)]
pub struct Chart {
    id: PartId,
    chart_type: ChartType,
    name: Option<String>,
    coordinate: Option<Arc<CoordinateSystem>>,
    axes: Vec<Arc<Axis>>,
    data: Vec<Arc<dyn DataProvider>>,
    colors: Vec<Rgba>,
    stack: Option<String>,
    custom: Properties,
}

impl Chart {
    /// Create a chart of `chart_type` with no data.
    #[must_use]
    pub fn new(chart_type: ChartType) -> Self {
        Self {
            id: PartId::next(),
            chart_type,
            name: None,
            coordinate: None,
            axes: Vec::new(),
            data: Vec::new(),
            colors: Vec::new(),
            stack: None,
            custom: Properties::new(),
        }
    }

    /// Line chart.
    #[must_use]
    pub fn line() -> Self {
        Self::new(ChartType::Line)
    }

    /// Bar chart.
    #[must_use]
    pub fn bar() -> Self {
        Self::new(ChartType::Bar)
    }

    /// Scatter chart.
    #[must_use]
    pub fn scatter() -> Self {
        Self::new(ChartType::Scatter)
    }

    /// Pie chart.
    #[must_use]
    pub fn pie() -> Self {
        Self::new(ChartType::Pie)
    }

    /// Series name. Defaults to `Chart <n>`.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Append the provider for the next data dimension.
    #[must_use]
    pub fn data(mut self, provider: Arc<dyn DataProvider>) -> Self {
        self.data.push(provider);
        self
    }

    /// Draw on `coordinate`.
    #[must_use]
    pub fn plot_on(mut self, coordinate: Arc<CoordinateSystem>) -> Self {
        self.coordinate = Some(coordinate);
        self
    }

    /// Use a specific axis of the coordinate system instead of the first one
    /// of its kind.
    #[must_use]
    pub fn axis(mut self, axis: Arc<Axis>) -> Self {
        self.axes.push(axis);
        self
    }

    /// Add a series color.
    #[must_use]
    pub fn color(mut self, color: Rgba) -> Self {
        self.colors.push(color);
        self
    }

    /// Stack with other series of the same stack name.
    #[must_use]
    pub fn stack(mut self, name: impl Into<String>) -> Self {
        self.stack = Some(name.into());
        self
    }

    /// Series type.
    #[must_use]
    pub fn chart_type(&self) -> ChartType {
        self.chart_type
    }

    /// Coordinate system the chart is drawn on. Chart types that are not
    /// drawn on one ignore any system they were given.
    #[must_use]
    pub fn coordinate(&self) -> Option<&Arc<CoordinateSystem>> {
        self.coordinate
            .as_ref()
            .filter(|_| self.chart_type.requires_coordinate())
    }

    /// Data dimensions, taken from the coordinate system when there is one.
    #[must_use]
    pub fn dimensions(&self) -> &'static [&'static str] {
        match self.coordinate() {
            Some(cs) => match cs.kind() {
                CoordinateKind::Rectangular => &["x", "y"],
                CoordinateKind::Polar => &["angle", "radius"],
            },
            _ => self.chart_type.dimensions(),
        }
    }

    fn axis_for(&self, cs: &CoordinateSystem, kind: AxisKind) -> Option<Arc<Axis>> {
        self.axes
            .iter()
            .find(|a| a.kind() == kind)
            .or_else(|| cs.first_axis(kind))
            .cloned()
    }

    fn encode_dataset_refs(&self, ctx: &EncodeContext<'_>, props: &mut Properties) -> Result<()> {
        let mut refs: Vec<(&str, &DatasetRef)> = Vec::new();
        for (dim, provider) in self.dimensions().iter().zip(&self.data) {
            let dataset = ctx.dataset_ref(self.id, provider.id()).ok_or_else(|| {
                Error::structural(self.describe(), format!("{} has no dataset column", provider.describe()))
            })?;
            refs.push((*dim, dataset));
        }
        let Some((_, first)) = refs.first() else {
            return Ok(());
        };
        let index = first.index;
        if let Some((_, other)) = refs.iter().find(|(_, r)| r.index != index) {
            return Err(Error::structural(
                self.describe(),
                format!("data spans dataset blocks {index} and {}", other.index),
            ));
        }

        let mut encode = Properties::new();
        for (dim, dataset) in &refs {
            encode.set(*dim, dataset.column.as_str());
        }
        props
            .set_if("datasetIndex", index, |i| *i > 0)
            .set_object("encode", &encode);
        Ok(())
    }

    fn encode_inline(&self, props: &mut Properties) -> Result<()> {
        let dims = self.dimensions();
        let providers = &self.data[..dims.len().min(self.data.len())];
        let mut out = String::new();
        match (dims, providers) {
            (_, [single]) => single.encode_values(&mut out)?,
            (["itemName", "value"], [names, values]) => {
                out.push('[');
                for i in 0..names.len().min(values.len()) {
                    if i > 0 {
                        out.push(',');
                    }
                    out.push_str("{\"name\":");
                    names.encode_value(i, &mut out)?;
                    out.push_str(",\"value\":");
                    values.encode_value(i, &mut out)?;
                    out.push('}');
                }
                out.push(']');
            }
            _ => {
                let len = providers.iter().map(|p| p.len()).min().unwrap_or(0);
                out.push('[');
                for i in 0..len {
                    if i > 0 {
                        out.push(',');
                    }
                    out.push('[');
                    for (j, provider) in providers.iter().enumerate() {
                        if j > 0 {
                            out.push(',');
                        }
                        provider.encode_value(i, &mut out)?;
                    }
                    out.push(']');
                }
                out.push(']');
            }
        }
        props.set_encoded("data", out);
        Ok(())
    }
}

impl Part for Chart {
    fn id(&self) -> PartId {
        self.id
    }

    fn kind(&self) -> PartKind {
        PartKind::Series
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn fits_dataset(&self, grouping: DatasetGrouping) -> bool {
        // by element count, one chart's providers must share a block
        let dims = self.dimensions().len();
        match grouping {
            DatasetGrouping::ByChart => true,
            DatasetGrouping::ByElementCount => {
                let mut lengths = self.data.iter().take(dims).map(|p| p.len());
                lengths.next().map_or(true, |first| lengths.all(|len| len == first))
            }
        }
    }

    fn validate(&self, _ctx: &ValidationContext) -> Result<()> {
        let dims = self.dimensions();
        if let Some(missing) = dims.get(self.data.len()) {
            return Err(Error::structural(self.describe(), format!("data for {missing} not set")));
        }

        let Some(cs) = self.coordinate() else {
            if self.chart_type.requires_coordinate() {
                return Err(Error::structural(self.describe(), "coordinate system not set"));
            }
            if let Some(axis) = self.axes.first() {
                return Err(Error::structural(
                    self.describe(),
                    format!("{} set without a coordinate system", axis.describe()),
                ));
            }
            return Ok(());
        };

        for (i, axis) in self.axes.iter().enumerate() {
            if !cs.contains_axis(axis) {
                return Err(Error::structural(
                    self.describe(),
                    format!("{} doesn't belong to the coordinate system of this chart", axis.describe()),
                ));
            }
            if self.axes[..i].iter().any(|a| a.kind() == axis.kind()) {
                return Err(Error::structural(
                    self.describe(),
                    format!("more than one {} set", axis.kind().part_kind()),
                ));
            }
        }
        Ok(())
    }

    fn encode(&self, ctx: &EncodeContext<'_>, props: &mut Properties) -> Result<()> {
        let name = match &self.name {
            Some(name) => name.clone(),
            None => format!("Chart {}", ctx.serial_of(self).map_or(1, |s| s + 1)),
        };
        let colors: Vec<PropertyValue> = self.colors.iter().map(|c| (*c).into()).collect();
        props
            .set("name", name)
            .set("color", colors)
            .set("type", self.chart_type.series_type());

        if let Some(cs) = self.coordinate() {
            match cs.kind() {
                CoordinateKind::Rectangular => {
                    for kind in cs.kind().axis_kinds() {
                        let index = self
                            .axis_for(cs, kind)
                            .and_then(|axis| ctx.axis_index(axis.id(), cs.id()));
                        props.set_if(format!("{}Index", kind.label()), index, |i| i.is_some_and(|i| i > 0));
                    }
                }
                CoordinateKind::Polar => {
                    props.set_if("polarIndex", ctx.index_of(cs.id()), |i| i.is_some_and(|i| i > 0));
                }
            }
            props.set("coordinateSystem", cs.kind().system_name());
        }
        props.set("stack", self.stack.as_deref());

        if ctx.dataset_mode() {
            self.encode_dataset_refs(ctx, props)?;
        } else if !ctx.skipping_data() {
            self.encode_inline(props)?;
        }

        props.merge(&self.custom);
        Ok(())
    }
}

impl Component for Chart {
    fn add_parts_into(&self, registry: &mut PartRegistry) {
        if let Some(cs) = self.coordinate() {
            let cs: Arc<dyn Component> = cs.clone();
            registry.add_component(cs);
        }
        for provider in &self.data {
            registry.add_owned(Arc::clone(provider).as_part(), self.id);
        }
    }
}

impl Customizable for Chart {
    fn custom_properties_mut(&mut self) -> &mut Properties {
        &mut self.custom
    }
}
