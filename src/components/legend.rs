//! Legend.

use crate::encoder::EncodeContext;
use crate::error::Result;
use crate::part::{Capabilities, Component, Customizable, Part, PartId, PartKind};
use crate::property::{Padding, Position, Properties};

use super::encode_visible;

/// Series legend. Only one is active per document.
#[derive(Debug, Clone)]
pub struct Legend {
    id: PartId,
    position: Position,
    padding: Option<Padding>,
    vertical: bool,
    visible: bool,
    custom: Properties,
}

impl Legend {
    /// Create a horizontal legend at the engine's default place.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: PartId::next(),
            position: Position::new(),
            padding: None,
            vertical: false,
            visible: true,
            custom: Properties::new(),
        }
    }

    /// Placement.
    #[must_use]
    pub fn position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    /// Lay out entries vertically.
    #[must_use]
    pub fn vertical(mut self) -> Self {
        self.vertical = true;
        self
    }

    /// Inner padding.
    #[must_use]
    pub fn padding(mut self, padding: Padding) -> Self {
        self.padding = Some(padding);
        self
    }

    /// Show or hide.
    #[must_use]
    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }
}

impl Default for Legend {
    fn default() -> Self {
        Self::new()
    }
}

impl Part for Legend {
    fn id(&self) -> PartId {
        self.id
    }

    fn kind(&self) -> PartKind {
        PartKind::Legend
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::SINGLE_INSTANCE
    }

    fn encode(&self, _ctx: &EncodeContext<'_>, props: &mut Properties) -> Result<()> {
        encode_visible(self.visible, props, &self.custom, |props| {
            props
                .set_if("orient", "vertical", |_| self.vertical)
                .splice(&self.position);
            if let Some(padding) = &self.padding {
                props.splice(padding);
            }
            Ok(())
        })
    }
}

impl Component for Legend {}

impl Customizable for Legend {
    fn custom_properties_mut(&mut self) -> &mut Properties {
        &mut self.custom
    }
}
