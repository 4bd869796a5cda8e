//! Concrete parts: document decorations, axes, coordinate systems, charts
//! and data zoom.

mod axis;
mod chart;
mod colors;
mod coordinate;
mod data_zoom;
mod legend;
mod title;
mod toolbox;
mod tooltip;

pub use axis::{Axis, AxisKind, AxisPart};
pub use chart::{Chart, ChartType};
pub use colors::{DefaultColors, DefaultTextStyle};
pub use coordinate::{CoordinateKind, CoordinateSystem};
pub use data_zoom::{DataZoom, ZoomKind};
pub use legend::Legend;
pub use title::Title;
pub use toolbox::{Toolbox, ToolboxButton};
pub use tooltip::{Tooltip, TooltipTrigger};

use crate::error::Result;
use crate::property::Properties;

/// Encode a part that can be hidden: a hidden part writes only
/// `"show":false`, a visible one writes `body` followed by `custom`.
pub(crate) fn encode_visible(
    visible: bool,
    props: &mut Properties,
    custom: &Properties,
    body: impl FnOnce(&mut Properties) -> Result<()>,
) -> Result<()> {
    if !visible {
        props.set("show", false);
        return Ok(());
    }
    body(props)?;
    props.merge(custom);
    Ok(())
}
