//! Document assembler.
//!
//! A [`ChartDocument`] owns the top-level components and turns them into one
//! option document per pass:
//!
//! 1. collect parts into a fresh [`PartRegistry`]
//! 2. validate every part
//! 3. under skip-data, check every set-aside data part has a prior serial
//! 4. choose dataset or inline encoding
//! 5. assign serials per category
//! 6. group data providers into dataset blocks
//! 7. encode every category
//! 8. strictly re-parse, hoist functions, and serialize
//!
//! Any failure aborts the pass with no output. The memory of the previous
//! successful pass is only replaced once a pass succeeds.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::color::Rgba;
use crate::components::{DefaultColors, DefaultTextStyle, Legend, Title, Toolbox, Tooltip};
use crate::config::AssemblyConfig;
use crate::encoder::{
    assign_serials, encode_categories, hoist_functions, Category, DatasetPlan, EncodeContext, SerialArena,
};
use crate::error::Result;
use crate::part::{Capabilities, Component, DedupKey, Part, PartId, ValidationContext};
use crate::property::Properties;
use crate::registry::PartRegistry;

/// What a successful pass leaves behind for the next skip-data pass.
#[derive(Debug, Clone, Default)]
struct PassMemory {
    serials: HashMap<DedupKey, usize>,
    plan: DatasetPlan,
    dataset_mode: bool,
}

/// A chart document: components, document-level decorations and settings.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use chart_assembly::prelude::*;
///
/// let x = Arc::new(Axis::x(DataType::Category));
/// let y = Arc::new(Axis::y(DataType::Number));
/// let grid = Arc::new(CoordinateSystem::rectangular().axis(x).axis(y));
/// let chart = Chart::bar()
///     .plot_on(grid)
///     .data(Arc::new(CategoryData::labels(["a", "b"])))
///     .data(Arc::new(NumberData::new([1.0, 2.0])));
///
/// let mut document = ChartDocument::new();
/// document.add(Arc::new(chart));
/// let json = document.assemble().unwrap();
/// assert!(json.contains(r#""series":[{"name":"Chart 1","type":"bar""#));
/// ```
#[derive(Debug)]
pub struct ChartDocument {
    components: Vec<Arc<dyn Component>>,
    title: Option<Arc<Title>>,
    legend: Option<Arc<Legend>>,
    tooltip: Option<Arc<Tooltip>>,
    toolbox: Option<Arc<Toolbox>>,
    colors: Option<Arc<DefaultColors>>,
    text_style: Option<Arc<DefaultTextStyle>>,
    background: Option<Rgba>,
    config: AssemblyConfig,
    memory: Option<PassMemory>,
}

impl Default for ChartDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl ChartDocument {
    /// Create an empty document with a default legend.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(AssemblyConfig::default())
    }

    /// Create an empty document with `config`.
    #[must_use]
    pub fn with_config(config: AssemblyConfig) -> Self {
        Self {
            components: Vec::new(),
            title: None,
            legend: Some(Arc::new(Legend::new())),
            tooltip: None,
            toolbox: None,
            colors: None,
            text_style: None,
            background: None,
            config,
            memory: None,
        }
    }

    /// Settings.
    #[must_use]
    pub fn config(&self) -> &AssemblyConfig {
        &self.config
    }

    /// Add a component. Adding the same component twice has no effect.
    pub fn add(&mut self, component: Arc<dyn Component>) -> &mut Self {
        if !self.components.iter().any(|c| c.id() == component.id()) {
            self.components.push(component);
        }
        self
    }

    /// Remove a component.
    pub fn remove(&mut self, id: PartId) -> &mut Self {
        self.components.retain(|c| c.id() != id);
        self
    }

    /// Remove every component. Document-level decorations stay.
    pub fn remove_all(&mut self) -> &mut Self {
        self.components.clear();
        self
    }

    /// Number of components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// True when no component was added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Document title.
    pub fn set_title(&mut self, title: Option<Title>) -> &mut Self {
        self.title = title.map(Arc::new);
        self
    }

    /// Document legend; `None` removes it.
    pub fn set_legend(&mut self, legend: Option<Legend>) -> &mut Self {
        self.legend = legend.map(Arc::new);
        self
    }

    /// Document tooltip.
    pub fn set_tooltip(&mut self, tooltip: Option<Tooltip>) -> &mut Self {
        self.tooltip = tooltip.map(Arc::new);
        self
    }

    /// Document toolbox.
    pub fn set_toolbox(&mut self, toolbox: Option<Toolbox>) -> &mut Self {
        self.toolbox = toolbox.map(Arc::new);
        self
    }

    /// Series color palette.
    pub fn set_default_colors(&mut self, colors: Option<DefaultColors>) -> &mut Self {
        self.colors = colors.map(Arc::new);
        self
    }

    /// Default text style.
    pub fn set_default_text_style(&mut self, style: Option<DefaultTextStyle>) -> &mut Self {
        self.text_style = style.map(Arc::new);
        self
    }

    /// Background color.
    pub fn set_background(&mut self, color: Option<Rgba>) -> &mut Self {
        self.background = color;
        self
    }

    /// True once a pass has succeeded.
    #[must_use]
    pub fn has_been_assembled(&self) -> bool {
        self.memory.is_some()
    }

    /// Assemble the full document.
    pub fn assemble(&mut self) -> Result<String> {
        self.assemble_with(false)
    }

    /// Assemble, optionally omitting bulk data already sent by the previous
    /// pass. Skip-data is ignored until a pass has succeeded.
    pub fn assemble_with(&mut self, skip_data: bool) -> Result<String> {
        let skipping_data = match (&self.memory, skip_data) {
            (None, true) => {
                warn!("skip-data requested before any successful pass; sending data");
                false
            }
            (_, skip) => skip,
        };

        if self.components.is_empty() {
            debug!("no components; empty document");
            return Ok("{}".to_string());
        }

        let registry = self.collect_parts(skipping_data);
        debug!(
            components = self.components.len(),
            parts = registry.len(),
            skipped = registry.skipped().len(),
            skipping_data,
            "pass started"
        );

        let vctx = ValidationContext { skipping_data };
        for part in registry.parts() {
            part.validate(&vctx)?;
        }

        let mut arena = SerialArena::new();
        if skipping_data {
            self.exclude_skipped(&registry, &mut arena)?;
        }

        let grouping = self.config.dataset_grouping;
        let dataset_mode = match (&self.memory, skipping_data) {
            (Some(memory), true) => memory.dataset_mode,
            _ => match registry.parts().find(|p| {
                !p.as_data().map_or(true, |d| d.supports_dataset()) || !p.fits_dataset(grouping)
            }) {
                Some(part) => {
                    debug!(part = %part.describe(), "part forces inline data");
                    false
                }
                None => true,
            },
        };

        let parts: Vec<Arc<dyn Part>> = registry.parts().cloned().collect();
        let ordered = assign_serials(&parts, &mut arena);

        let plan = match (&self.memory, skipping_data) {
            (Some(memory), true) => memory.plan.clone(),
            _ if dataset_mode => DatasetPlan::build(&ordered, &registry, &arena, grouping),
            _ => DatasetPlan::default(),
        };
        debug!(dataset_mode, blocks = plan.block_count(), "data encoding chosen");

        let ctx = EncodeContext::new(&arena, &plan, dataset_mode, skipping_data);
        let mut document = Properties::new();
        document.set("backgroundColor", self.background);
        encode_categories(&ordered, &ctx, &mut document)?;

        let json = self.finish(&document)?;

        self.memory = Some(PassMemory {
            serials: arena.serials().collect(),
            plan,
            dataset_mode,
        });
        debug!(bytes = json.len(), "pass complete");
        Ok(json)
    }

    fn collect_parts(&self, skipping_data: bool) -> PartRegistry {
        let mut registry = PartRegistry::new(skipping_data);
        for component in &self.components {
            registry.add_component(Arc::clone(component));
        }

        let roots: [Option<Arc<dyn Part>>; 6] = [
            self.colors.clone().map(|p| p as Arc<dyn Part>),
            self.text_style.clone().map(|p| p as Arc<dyn Part>),
            self.title.clone().map(|p| p as Arc<dyn Part>),
            self.tooltip.clone().map(|p| p as Arc<dyn Part>),
            self.legend.clone().map(|p| p as Arc<dyn Part>),
            self.toolbox.clone().map(|p| p as Arc<dyn Part>),
        ];
        registry.add_all(roots.into_iter().flatten());
        registry
    }

    fn exclude_skipped(&self, registry: &PartRegistry, arena: &mut SerialArena) -> Result<()> {
        let memory = self.memory.as_ref();
        for part in registry.skipped() {
            if !part.capabilities().contains(Capabilities::DATA_CARRYING) {
                continue;
            }
            let Some(key) = Category::key_of(part.as_ref()) else {
                continue;
            };
            let prior = memory.and_then(|m| m.serials.get(&key).copied());
            arena.exclude(part.as_ref(), key, prior)?;
        }
        Ok(())
    }

    fn finish(&self, document: &Properties) -> Result<String> {
        let body = document.encode()?;
        let mut value: serde_json::Value = serde_json::from_str(&format!("{{{body}}}"))?;
        if self.config.hoist_functions {
            let hoisted = hoist_functions(&mut value, &self.config.function_root, &self.config.function_prefix);
            if hoisted > 0 {
                debug!(hoisted, "functions hoisted");
            }
        }
        Ok(serde_json::to_string(&value)?)
    }
}
