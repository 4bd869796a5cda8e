//! Parts: serializable units with identity and capability tags.
//!
//! A part never stores pipeline bookkeeping. Serials and dataset references
//! live in the per-pass arena owned by the assembler and are looked up
//! through [`EncodeContext`] while encoding.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use bitflags::bitflags;

use crate::config::DatasetGrouping;
use crate::data::DataProvider;
use crate::encoder::EncodeContext;
use crate::error::Result;
use crate::property::Properties;
use crate::registry::PartRegistry;

static NEXT_PART_ID: AtomicU64 = AtomicU64::new(1);

/// Stable identity of a part, assigned at construction and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PartId(u64);

impl PartId {
    /// Allocate a fresh id.
    #[must_use]
    pub fn next() -> Self {
        PartId(NEXT_PART_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Closed set of part kinds. Categories select parts by kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartKind {
    /// Default color palette.
    Colors,
    /// Default text style.
    TextStyle,
    /// Chart title.
    Title,
    /// Legend.
    Legend,
    /// Toolbox.
    Toolbox,
    /// Tooltip.
    Tooltip,
    /// Data provider.
    Data,
    /// X axis placed on a coordinate system.
    XAxis,
    /// Y axis placed on a coordinate system.
    YAxis,
    /// Angle axis placed on a coordinate system.
    AngleAxis,
    /// Radius axis placed on a coordinate system.
    RadiusAxis,
    /// Rectangular coordinate system.
    Grid,
    /// Polar coordinate system.
    Polar,
    /// Chart (one series).
    Series,
    /// Data zoom.
    DataZoom,
}

impl fmt::Display for PartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PartKind::Colors => "Colors",
            PartKind::TextStyle => "Text style",
            PartKind::Title => "Title",
            PartKind::Legend => "Legend",
            PartKind::Toolbox => "Toolbox",
            PartKind::Tooltip => "Tooltip",
            PartKind::Data => "Data",
            PartKind::XAxis => "X axis",
            PartKind::YAxis => "Y axis",
            PartKind::AngleAxis => "Angle axis",
            PartKind::RadiusAxis => "Radius axis",
            PartKind::Grid => "Rectangular coordinate",
            PartKind::Polar => "Polar coordinate",
            PartKind::Series => "Chart",
            PartKind::DataZoom => "Data zoom",
        };
        f.write_str(name)
    }
}

bitflags! {
    /// Capability tags of a part.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Capabilities: u8 {
        /// Only one part of this kind may be active; a later addition
        /// displaces the earlier one.
        const SINGLE_INSTANCE = 1 << 0;
        /// Dropped from the working set during a skip-data pass.
        const SKIP_ELIGIBLE = 1 << 1;
        /// Shares its serial with value-equal parts (see [`DedupKey`]).
        const VALUE_DEDUP = 1 << 2;
        /// Carries bulk data; must hold a prior serial in a skip-data pass.
        const DATA_CARRYING = 1 << 3;
    }
}

/// Equality key used when grouping parts for serial assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DedupKey {
    /// The part itself.
    Identity(PartId),
    /// An axis placed on one coordinate system.
    AxisInCoordinate {
        /// Wrapped axis.
        axis: PartId,
        /// Owning coordinate system.
        coordinate: PartId,
    },
}

/// Per-pass facts available while validating.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationContext {
    /// The pass omits bulk data.
    pub skipping_data: bool,
}

/// A serializable unit of the option document.
pub trait Part: fmt::Debug + Send + Sync {
    /// Stable identity.
    fn id(&self) -> PartId;

    /// Kind tag; decides the category the part is emitted under.
    fn kind(&self) -> PartKind;

    /// Capability tags.
    fn capabilities(&self) -> Capabilities {
        Capabilities::empty()
    }

    /// Key for value-equality; only consulted with [`Capabilities::VALUE_DEDUP`].
    fn dedup_key(&self) -> DedupKey {
        DedupKey::Identity(self.id())
    }

    /// User-facing name, if any.
    fn name(&self) -> Option<&str> {
        None
    }

    /// Description used in error messages.
    fn describe(&self) -> String {
        match self.name() {
            Some(name) => format!("{} '{}'", self.kind(), name),
            None => format!("{} #{}", self.kind(), self.id()),
        }
    }

    /// Structural checks run before any serial is assigned.
    fn validate(&self, _ctx: &ValidationContext) -> Result<()> {
        Ok(())
    }

    /// Whether the part can reference its data as dataset columns under
    /// `grouping`. Any part answering false switches the pass to inline data.
    fn fits_dataset(&self, _grouping: DatasetGrouping) -> bool {
        true
    }

    /// Write the part's object body.
    fn encode(&self, ctx: &EncodeContext<'_>, props: &mut Properties) -> Result<()>;

    /// Data provider view of this part.
    fn as_data(&self) -> Option<&dyn DataProvider> {
        None
    }
}

/// Converts shared handles of concrete or sub-trait objects to `Arc<dyn Part>`.
pub trait AsPart {
    /// Upcast.
    fn as_part(self: Arc<Self>) -> Arc<dyn Part>;
}

impl<T: Part + 'static> AsPart for T {
    fn as_part(self: Arc<Self>) -> Arc<dyn Part> {
        self
    }
}

/// A part that can be added to a document and pulls in the parts it needs.
pub trait Component: Part + AsPart {
    /// Contribute dependent parts (coordinate systems, axes, data).
    fn add_parts_into(&self, _registry: &mut PartRegistry) {}
}

/// Builder methods for user-supplied custom properties.
///
/// Custom entries are merged after a part's built-in entries, so they
/// override built-ins of the same name.
pub trait Customizable: Sized {
    /// Mutable access to the custom dictionary.
    fn custom_properties_mut(&mut self) -> &mut Properties;

    /// Set a custom property.
    #[must_use]
    fn property(mut self, name: &str, value: impl Into<crate::property::PropertyValue>) -> Self {
        self.custom_properties_mut().set(name, value);
        self
    }

    /// Splice a raw `"k":v` JSON fragment.
    #[must_use]
    fn raw_property(mut self, fragment: &str) -> Self {
        self.custom_properties_mut().set_raw(fragment);
        self
    }
}
