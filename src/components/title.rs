//! Chart title.

use crate::encoder::EncodeContext;
use crate::error::Result;
use crate::part::{Component, Customizable, Part, PartId, PartKind};
use crate::property::{Padding, Position, Properties};

use super::encode_visible;

/// A title block. A document may carry several.
#[derive(Debug, Clone)]
pub struct Title {
    id: PartId,
    text: String,
    subtext: Option<String>,
    position: Position,
    padding: Option<Padding>,
    visible: bool,
    custom: Properties,
}

impl Title {
    /// Create a title.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: PartId::next(),
            text: text.into(),
            subtext: None,
            position: Position::new(),
            padding: None,
            visible: true,
            custom: Properties::new(),
        }
    }

    /// Secondary text under the title.
    #[must_use]
    pub fn subtext(mut self, subtext: impl Into<String>) -> Self {
        self.subtext = Some(subtext.into());
        self
    }

    /// Placement.
    #[must_use]
    pub fn position(mut self, position: Position) -> Self {
        self.position = position;
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

    /// Title text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Part for Title {
    fn id(&self) -> PartId {
        self.id
    }

    fn kind(&self) -> PartKind {
        PartKind::Title
    }

    fn name(&self) -> Option<&str> {
        Some(&self.text)
    }

    fn encode(&self, _ctx: &EncodeContext<'_>, props: &mut Properties) -> Result<()> {
        encode_visible(self.visible, props, &self.custom, |props| {
            props
                .set("text", self.text.as_str())
                .set("subtext", self.subtext.as_deref())
                .splice(&self.position);
            if let Some(padding) = &self.padding {
                props.splice(padding);
            }
            Ok(())
        })
    }
}

impl Component for Title {}

impl Customizable for Title {
    fn custom_properties_mut(&mut self) -> &mut Properties {
        &mut self.custom
    }
}
