//! Document-wide color palette and text style.

use crate::color::{Rgba, DEFAULT_PALETTE};
use crate::encoder::EncodeContext;
use crate::error::Result;
use crate::part::{Capabilities, Component, Part, PartId, PartKind};
use crate::property::{Properties, PropertyValue};

const PALETTE_SIZE: usize = 11;

/// Series color palette. Written as a top-level `"color"` array.
#[derive(Debug, Clone)]
pub struct DefaultColors {
    id: PartId,
    colors: Vec<Rgba>,
}

impl DefaultColors {
    /// Palette starting with `colors`, padded from the default palette.
    #[must_use]
    pub fn new(colors: impl IntoIterator<Item = Rgba>) -> Self {
        Self {
            id: PartId::next(),
            colors: colors.into_iter().collect(),
        }
    }

    /// Colors as written: the given ones, then default colors not already
    /// present, up to eleven entries in total.
    #[must_use]
    pub fn palette(&self) -> Vec<Rgba> {
        let mut palette = self.colors.clone();
        for color in DEFAULT_PALETTE {
            if palette.len() >= PALETTE_SIZE {
                break;
            }
            if !palette.contains(&color) {
                palette.push(color);
            }
        }
        palette
    }
}

impl Default for DefaultColors {
    fn default() -> Self {
        Self::new([])
    }
}

impl Part for DefaultColors {
    fn id(&self) -> PartId {
        self.id
    }

    fn kind(&self) -> PartKind {
        PartKind::Colors
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::SINGLE_INSTANCE
    }

    fn encode(&self, _ctx: &EncodeContext<'_>, props: &mut Properties) -> Result<()> {
        let colors: Vec<PropertyValue> = self.palette().into_iter().map(Into::into).collect();
        props.set("color", colors);
        Ok(())
    }
}

impl Component for DefaultColors {}

/// Default text style for every text in the document.
#[derive(Debug, Clone)]
pub struct DefaultTextStyle {
    id: PartId,
    color: Option<Rgba>,
    font_family: Option<String>,
    font_size: Option<u32>,
    font_weight: Option<String>,
}

impl DefaultTextStyle {
    /// Engine defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: PartId::next(),
            color: None,
            font_family: None,
            font_size: None,
            font_weight: None,
        }
    }

    /// Text color.
    #[must_use]
    pub fn color(mut self, color: Rgba) -> Self {
        self.color = Some(color);
        self
    }

    /// Font family.
    #[must_use]
    pub fn font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = Some(family.into());
        self
    }

    /// Font size in pixels; zero is ignored.
    #[must_use]
    pub fn font_size(mut self, size: u32) -> Self {
        self.font_size = Some(size);
        self
    }

    /// Font weight (`bold`, `lighter`, `600`, ...).
    #[must_use]
    pub fn font_weight(mut self, weight: impl Into<String>) -> Self {
        self.font_weight = Some(weight.into());
        self
    }
}

impl Default for DefaultTextStyle {
    fn default() -> Self {
        Self::new()
    }
}

impl Part for DefaultTextStyle {
    fn id(&self) -> PartId {
        self.id
    }

    fn kind(&self) -> PartKind {
        PartKind::TextStyle
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::SINGLE_INSTANCE
    }

    fn encode(&self, _ctx: &EncodeContext<'_>, props: &mut Properties) -> Result<()> {
        props
            .set("color", self.color)
            .set("fontFamily", self.font_family.as_deref())
            .set_if("fontSize", self.font_size, |s| s.is_some_and(|s| s > 0))
            .set("fontWeight", self.font_weight.as_deref());
        Ok(())
    }
}

impl Component for DefaultTextStyle {}
