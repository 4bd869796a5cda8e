//! Toolbox with built-in buttons.

use crate::encoder::EncodeContext;
use crate::error::Result;
use crate::part::{Capabilities, Component, Customizable, Part, PartId, PartKind};
use crate::property::{Position, Properties};

use super::encode_visible;

/// A built-in toolbox button.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolboxButton {
    /// Save the chart as an image.
    Download {
        /// Caption.
        caption: String,
        /// Pixel ratio of the saved image; written when above 1.
        resolution: u32,
    },
    /// Show the underlying data as a table.
    DataView {
        /// Caption.
        caption: String,
        /// Disallow edits.
        read_only: bool,
    },
    /// Restore the initial state.
    Restore {
        /// Caption.
        caption: String,
    },
    /// Area zoom.
    Zoom {
        /// Caption of the zoom button.
        caption: String,
        /// Caption of the reset button.
        reset_caption: String,
    },
}

impl ToolboxButton {
    /// Download button with default caption.
    #[must_use]
    pub fn download() -> Self {
        ToolboxButton::Download {
            caption: "Download".into(),
            resolution: 1,
        }
    }

    /// Data view button with default caption.
    #[must_use]
    pub fn data_view() -> Self {
        ToolboxButton::DataView {
            caption: "Data".into(),
            read_only: true,
        }
    }

    /// Restore button with default caption.
    #[must_use]
    pub fn restore() -> Self {
        ToolboxButton::Restore {
            caption: "Restore".into(),
        }
    }

    /// Zoom button with default captions.
    #[must_use]
    pub fn zoom() -> Self {
        ToolboxButton::Zoom {
            caption: "Zoom in".into(),
            reset_caption: "Reset zoom".into(),
        }
    }

    fn tag(&self) -> &'static str {
        match self {
            ToolboxButton::Download { .. } => "saveAsImage",
            ToolboxButton::DataView { .. } => "dataView",
            ToolboxButton::Restore { .. } => "restore",
            ToolboxButton::Zoom { .. } => "dataZoom",
        }
    }

    fn properties(&self) -> Properties {
        let mut props = Properties::new();
        props.set("show", true);
        match self {
            ToolboxButton::Download { caption, resolution } => {
                props
                    .set("title", caption)
                    .set_if("pixelRatio", *resolution, |r| *r > 1);
            }
            ToolboxButton::DataView { caption, read_only } => {
                props.set("title", caption).set("readOnly", *read_only);
            }
            ToolboxButton::Restore { caption } => {
                props.set("title", caption);
            }
            ToolboxButton::Zoom {
                caption,
                reset_caption,
            } => {
                let mut title = Properties::new();
                title.set("zoom", caption).set("back", reset_caption);
                props.set_object("title", &title);
            }
        }
        props
    }
}

/// Toolbox. Only one is active per document.
#[derive(Debug, Clone)]
pub struct Toolbox {
    id: PartId,
    buttons: Vec<ToolboxButton>,
    position: Position,
    vertical: bool,
    visible: bool,
    custom: Properties,
}

impl Toolbox {
    /// Create an empty toolbox.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: PartId::next(),
            buttons: Vec::new(),
            position: Position::new(),
            vertical: false,
            visible: true,
            custom: Properties::new(),
        }
    }

    /// Add a button. A later button with the same function replaces the earlier one.
    #[must_use]
    pub fn button(mut self, button: ToolboxButton) -> Self {
        self.buttons.retain(|b| b.tag() != button.tag());
        self.buttons.push(button);
        self
    }

    /// Placement.
    #[must_use]
    pub fn position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    /// Lay out buttons vertically.
    #[must_use]
    pub fn vertical(mut self) -> Self {
        self.vertical = true;
        self
    }

    /// Show or hide.
    #[must_use]
    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Buttons in insertion order.
    #[must_use]
    pub fn buttons(&self) -> &[ToolboxButton] {
        &self.buttons
    }
}

impl Default for Toolbox {
    fn default() -> Self {
        Self::new()
    }
}

impl Part for Toolbox {
    fn id(&self) -> PartId {
        self.id
    }

    fn kind(&self) -> PartKind {
        PartKind::Toolbox
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::SINGLE_INSTANCE
    }

    fn encode(&self, _ctx: &EncodeContext<'_>, props: &mut Properties) -> Result<()> {
        encode_visible(self.visible, props, &self.custom, |props| {
            let mut tooltip = Properties::new();
            tooltip.set("show", true);

            let mut feature = Properties::new();
            for button in &self.buttons {
                feature.set(button.tag(), button.properties());
            }

            props
                .set_object("tooltip", &tooltip)
                .set_if("orient", "vertical", |_| self.vertical)
                .set_object("feature", &feature)
                .splice(&self.position);
            Ok(())
        })
    }
}

impl Component for Toolbox {}

impl Customizable for Toolbox {
    fn custom_properties_mut(&mut self) -> &mut Properties {
        &mut self.custom
    }
}
