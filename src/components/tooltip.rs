//! Tooltip.

use crate::encoder::EncodeContext;
use crate::error::Result;
use crate::part::{Capabilities, Component, Customizable, Part, PartId, PartKind};
use crate::property::Properties;

use super::encode_visible;

/// What triggers the tooltip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TooltipTrigger {
    /// Hovering a data item.
    Item,
    /// Hovering an axis position.
    Axis,
    /// Never.
    None,
}

impl TooltipTrigger {
    const fn as_str(self) -> &'static str {
        match self {
            TooltipTrigger::Item => "item",
            TooltipTrigger::Axis => "axis",
            TooltipTrigger::None => "none",
        }
    }
}

/// Document tooltip. Only one is active per document.
#[derive(Debug, Clone)]
pub struct Tooltip {
    id: PartId,
    trigger: Option<TooltipTrigger>,
    formatter: Option<String>,
    visible: bool,
    custom: Properties,
}

impl Tooltip {
    /// Create a tooltip with engine defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: PartId::next(),
            trigger: None,
            formatter: None,
            visible: true,
            custom: Properties::new(),
        }
    }

    /// Trigger.
    #[must_use]
    pub fn trigger(mut self, trigger: TooltipTrigger) -> Self {
        self.trigger = Some(trigger);
        self
    }

    /// Formatter: a template string, or a `function(...)` literal which is
    /// hoisted out of the document.
    #[must_use]
    pub fn formatter(mut self, formatter: impl Into<String>) -> Self {
        self.formatter = Some(formatter.into());
        self
    }

    /// Show or hide.
    #[must_use]
    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }
}

impl Default for Tooltip {
    fn default() -> Self {
        Self::new()
    }
}

impl Part for Tooltip {
    fn id(&self) -> PartId {
        self.id
    }

    fn kind(&self) -> PartKind {
        PartKind::Tooltip
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::SINGLE_INSTANCE
    }

    fn encode(&self, _ctx: &EncodeContext<'_>, props: &mut Properties) -> Result<()> {
        encode_visible(self.visible, props, &self.custom, |props| {
            props
                .set("trigger", self.trigger.map(TooltipTrigger::as_str))
                .set("formatter", self.formatter.as_deref());
            Ok(())
        })
    }
}

impl Component for Tooltip {}

impl Customizable for Tooltip {
    fn custom_properties_mut(&mut self) -> &mut Properties {
        &mut self.custom
    }
}
