//! Shared mix-in groups spliced into several parts.

use super::{Properties, PropertyGroup, PropertyValue};

/// A length along one edge of the drawing area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Size {
    /// Absolute pixels.
    Pixels(i64),
    /// Percentage of the container.
    Percent(f64),
    /// Centered (`center` horizontally, `middle` vertically).
    Center,
}

impl Size {
    fn value(self, vertical: bool) -> PropertyValue {
        match self {
            Size::Pixels(px) => PropertyValue::Int(px),
            Size::Percent(p) => PropertyValue::Str(format!("{p}%")),
            Size::Center if vertical => PropertyValue::Str("middle".into()),
            Size::Center => PropertyValue::Str("center".into()),
        }
    }
}

/// Placement of a part inside the chart area.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Position {
    left: Option<Size>,
    top: Option<Size>,
    right: Option<Size>,
    bottom: Option<Size>,
    width: Option<Size>,
    height: Option<Size>,
}

impl Position {
    /// Create an empty position (engine defaults).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Distance from the left edge.
    #[must_use]
    pub fn left(mut self, size: Size) -> Self {
        self.left = Some(size);
        self
    }

    /// Distance from the top edge.
    #[must_use]
    pub fn top(mut self, size: Size) -> Self {
        self.top = Some(size);
        self
    }

    /// Distance from the right edge.
    #[must_use]
    pub fn right(mut self, size: Size) -> Self {
        self.right = Some(size);
        self
    }

    /// Distance from the bottom edge.
    #[must_use]
    pub fn bottom(mut self, size: Size) -> Self {
        self.bottom = Some(size);
        self
    }

    /// Width.
    #[must_use]
    pub fn width(mut self, size: Size) -> Self {
        self.width = Some(size);
        self
    }

    /// Height.
    #[must_use]
    pub fn height(mut self, size: Size) -> Self {
        self.height = Some(size);
        self
    }
}

impl PropertyGroup for Position {
    fn write_properties(&self, props: &mut Properties) {
        let edges = [
            ("left", self.left, false),
            ("top", self.top, true),
            ("right", self.right, false),
            ("bottom", self.bottom, true),
            ("width", self.width, false),
            ("height", self.height, true),
        ];
        for (name, size, vertical) in edges {
            props.set(name, size.map(|s| s.value(vertical)));
        }
    }
}

/// Inner padding in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Padding {
    top: i64,
    right: i64,
    bottom: i64,
    left: i64,
}

impl Padding {
    /// Same padding on every side.
    #[must_use]
    pub const fn all(px: i64) -> Self {
        Self::new(px, px, px, px)
    }

    /// Padding in CSS order: top, right, bottom, left.
    #[must_use]
    pub const fn new(top: i64, right: i64, bottom: i64, left: i64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }
}

impl PropertyGroup for Padding {
    fn write_properties(&self, props: &mut Properties) {
        if self.top == self.right && self.top == self.bottom && self.top == self.left {
            props.set("padding", self.top);
        } else {
            props.set("padding", vec![self.top, self.right, self.bottom, self.left]);
        }
    }
}
