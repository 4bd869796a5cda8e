//! # Chart-Assembly
//!
//! Assembles a graph of chart parts into one ECharts-style option document.
//!
//! Charts, axes, coordinate systems, data providers and document decorations
//! are added to a [`ChartDocument`] in any order. Each assembly pass turns
//! them into a single JSON string in which every cross reference
//! (`"xAxisIndex":1`, `"datasetIndex":2`, ...) points at a section emitted
//! earlier in the document.
//!
//! ## Features
//!
//! - **Conditional properties**: absent values and empty groups never reach the output
//! - **Stable indices**: serials assigned per category, shared by value-equal parts
//! - **Dataset encoding**: data shared as table blocks, or inline per series when any provider opts out
//! - **Partial updates**: skip-data passes that reuse the previous pass's data references
//! - **Function hoisting**: `function(...)` strings moved to reserved top-level keys
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use chart_assembly::prelude::*;
//!
//! let grid = Arc::new(
//!     CoordinateSystem::rectangular()
//!         .axis(Arc::new(Axis::x(DataType::Category)))
//!         .axis(Arc::new(Axis::y(DataType::Number))),
//! );
//! let chart = Chart::line()
//!     .named("Sales")
//!     .plot_on(grid)
//!     .data(Arc::new(CategoryData::labels(["Mon", "Tue", "Wed"])))
//!     .data(Arc::new(NumberData::new([120.0, 200.0, 150.0])));
//!
//! let mut document = ChartDocument::new();
//! document.add(Arc::new(chart));
//! let option = document.assemble()?;
//! assert!(option.contains(r#""dataset":{"source":{"d0":["Mon","Tue","Wed"],"d1":[120,200,150]}}"#));
//! # Ok::<(), chart_assembly::Error>(())
//! ```

#![warn(missing_docs)]
// Allow unwrap() in tests only - banned in production code
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Core Modules
// ============================================================================

/// Conditional property dictionary.
pub mod property;

/// Parts, identities and capability tags.
pub mod part;

/// Color values.
pub mod color;

/// Data providers.
pub mod data;

// ============================================================================
// Assembly Pipeline
// ============================================================================

/// Per-pass part registry.
pub mod registry;

/// Category encoders, serial assignment and dataset grouping.
pub mod encoder;

/// Document assembler.
pub mod assembler;

/// Assembly configuration.
pub mod config;

// ============================================================================
// Chart Parts
// ============================================================================

/// Titles, legends, axes, coordinate systems, charts and data zoom.
pub mod components;

// ============================================================================
// Error Types
// ============================================================================

/// Error types for assembly passes.
pub mod error;

pub use assembler::ChartDocument;
pub use error::{Error, Result};

// ============================================================================
// Prelude
// ============================================================================

/// Commonly used types and traits for convenient imports.
///
/// ```rust
/// use chart_assembly::prelude::*;
/// ```
pub mod prelude {
    pub use crate::assembler::ChartDocument;
    pub use crate::color::Rgba;
    pub use crate::components::{
        Axis, AxisKind, Chart, ChartType, CoordinateKind, CoordinateSystem, DataZoom, DefaultColors,
        DefaultTextStyle, Legend, Title, Toolbox, ToolboxButton, Tooltip, TooltipTrigger, ZoomKind,
    };
    pub use crate::config::{AssemblyConfig, DatasetGrouping};
    pub use crate::data::{
        CategoryData, Data, DataProvider, DataType, DateData, InstantData, NumberData, SerialData,
        TimeData, TreeData, TreeNode,
    };
    pub use crate::error::{Error, Result};
    pub use crate::part::{Component, Customizable, Part, PartId};
    pub use crate::property::{Padding, Position, Properties, PropertyValue, Size};
}
