//! Category encoders.
//!
//! The option document is partitioned into categories (`title`, `xAxis`,
//! `series`, ...). Each category selects parts by kind, hands out serials, and
//! writes its section. Categories run in the fixed order of [`CATEGORIES`], so
//! a section may reference indices of any section emitted before it.

mod dataset;
mod functions;
mod serial;

pub use dataset::{DatasetPlan, DatasetRef};
pub use functions::hoist_functions;
pub use serial::{SerialArena, SerialState};

use std::sync::Arc;

use tracing::trace;

use crate::error::Result;
use crate::part::{DedupKey, Part, PartId, PartKind};
use crate::property::{strip_trailing_comma, Properties};

/// How a category writes its parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emission {
    /// Spliced into the document without a wrapping key.
    Inline,
    /// `"label":{...}` from the single active part.
    Object,
    /// `"label":[{...},...]`.
    Array,
    /// `"label":{"source":{...}}`, or an array of those for several blocks.
    DatasetSource,
}

/// How parts are grouped for serial sharing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DedupRule {
    /// Every part is its own group.
    Identity,
    /// Parts with equal [`Part::dedup_key`] share a serial.
    Value,
}

impl DedupRule {
    /// Arena key of `part` under this rule.
    #[must_use]
    pub fn key(self, part: &dyn Part) -> DedupKey {
        match self {
            DedupRule::Identity => DedupKey::Identity(part.id()),
            DedupRule::Value => part.dedup_key(),
        }
    }
}

/// A named section of the option document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    /// Top-level key.
    pub label: &'static str,
    /// Kind of part selected.
    pub kind: PartKind,
    /// Output shape.
    pub emission: Emission,
    /// Serial grouping.
    pub dedup: DedupRule,
}

const fn category(label: &'static str, kind: PartKind, emission: Emission, dedup: DedupRule) -> Category {
    Category {
        label,
        kind,
        emission,
        dedup,
    }
}

/// Every category, in emission priority order.
pub static CATEGORIES: [Category; 15] = [
    category("color", PartKind::Colors, Emission::Inline, DedupRule::Identity),
    category("textStyle", PartKind::TextStyle, Emission::Object, DedupRule::Identity),
    category("title", PartKind::Title, Emission::Array, DedupRule::Identity),
    category("legend", PartKind::Legend, Emission::Object, DedupRule::Identity),
    category("toolbox", PartKind::Toolbox, Emission::Object, DedupRule::Identity),
    category("tooltip", PartKind::Tooltip, Emission::Object, DedupRule::Identity),
    category("dataset", PartKind::Data, Emission::DatasetSource, DedupRule::Identity),
    category("xAxis", PartKind::XAxis, Emission::Array, DedupRule::Value),
    category("yAxis", PartKind::YAxis, Emission::Array, DedupRule::Value),
    category("angleAxis", PartKind::AngleAxis, Emission::Array, DedupRule::Value),
    category("radiusAxis", PartKind::RadiusAxis, Emission::Array, DedupRule::Value),
    category("grid", PartKind::Grid, Emission::Array, DedupRule::Identity),
    category("polar", PartKind::Polar, Emission::Array, DedupRule::Identity),
    category("series", PartKind::Series, Emission::Array, DedupRule::Identity),
    category("dataZoom", PartKind::DataZoom, Emission::Array, DedupRule::Identity),
];

impl Category {
    /// Category emitting parts of `kind`.
    #[must_use]
    pub fn of(kind: PartKind) -> Option<&'static Category> {
        CATEGORIES.iter().find(|c| c.kind == kind)
    }

    /// Arena key of `part`, or None if no category selects it.
    #[must_use]
    pub fn key_of(part: &dyn Part) -> Option<DedupKey> {
        Self::of(part.kind()).map(|c| c.dedup.key(part))
    }
}

/// Read-only view of the pass state while parts encode.
#[derive(Debug, Clone, Copy)]
pub struct EncodeContext<'a> {
    arena: &'a SerialArena,
    plan: &'a DatasetPlan,
    dataset_mode: bool,
    skipping_data: bool,
}

impl<'a> EncodeContext<'a> {
    /// Create a context.
    #[must_use]
    pub fn new(arena: &'a SerialArena, plan: &'a DatasetPlan, dataset_mode: bool, skipping_data: bool) -> Self {
        Self {
            arena,
            plan,
            dataset_mode,
            skipping_data,
        }
    }

    /// Serial held by `key`.
    #[must_use]
    pub fn serial(&self, key: DedupKey) -> Option<usize> {
        self.arena.serial(key)
    }

    /// Serial of `part` in its category.
    #[must_use]
    pub fn serial_of(&self, part: &dyn Part) -> Option<usize> {
        Category::key_of(part).and_then(|key| self.serial(key))
    }

    /// Index of a part emitted under its identity (coordinate systems, charts).
    #[must_use]
    pub fn index_of(&self, id: PartId) -> Option<usize> {
        self.serial(DedupKey::Identity(id))
    }

    /// Index of `axis` as placed on `coordinate`.
    #[must_use]
    pub fn axis_index(&self, axis: PartId, coordinate: PartId) -> Option<usize> {
        self.serial(DedupKey::AxisInCoordinate { axis, coordinate })
    }

    /// True when data is written as shared dataset blocks.
    #[must_use]
    pub fn dataset_mode(&self) -> bool {
        self.dataset_mode
    }

    /// True when the pass omits bulk data.
    #[must_use]
    pub fn skipping_data(&self) -> bool {
        self.skipping_data
    }

    /// Dataset column of `provider` as referenced by `chart`.
    #[must_use]
    pub fn dataset_ref(&self, chart: PartId, provider: PartId) -> Option<&'a DatasetRef> {
        self.plan.get(chart, provider)
    }

    /// Every dataset column holding `provider`.
    #[must_use]
    pub fn dataset_columns(&self, provider: PartId) -> Vec<&'a DatasetRef> {
        self.plan.columns_of(provider)
    }
}

/// Assign serials category by category and return the parts that received
/// one, sorted by serial. Parts no category selects are dropped.
pub fn assign_serials(parts: &[Arc<dyn Part>], arena: &mut SerialArena) -> Vec<Arc<dyn Part>> {
    for category in &CATEGORIES {
        let keys = parts
            .iter()
            .filter(|p| p.kind() == category.kind)
            .map(|p| category.dedup.key(p.as_ref()));
        let count = arena.assign(keys);
        if count > 0 {
            trace!(category = category.label, serials = count, "serials assigned");
        }
    }

    let mut ordered: Vec<(usize, Arc<dyn Part>)> = parts
        .iter()
        .filter_map(|p| {
            let key = Category::key_of(p.as_ref())?;
            match arena.state(key) {
                SerialState::Assigned(serial) => Some((serial, Arc::clone(p))),
                SerialState::Excluded { .. } | SerialState::Unassigned => None,
            }
        })
        .collect();
    ordered.sort_by_key(|(serial, _)| *serial);
    ordered.into_iter().map(|(_, p)| p).collect()
}

/// Write every category section of `ordered` into `document`.
pub fn encode_categories(ordered: &[Arc<dyn Part>], ctx: &EncodeContext<'_>, document: &mut Properties) -> Result<()> {
    for category in &CATEGORIES {
        if category.emission == Emission::DatasetSource {
            encode_dataset(category, ordered, ctx, document)?;
            continue;
        }

        let mut bodies = Vec::new();
        let mut last_serial = None;
        for part in ordered.iter().filter(|p| p.kind() == category.kind) {
            let serial = ctx.serial_of(part.as_ref());
            // value-equal parts collapse to the first one
            if serial.is_some() && serial == last_serial {
                continue;
            }
            last_serial = serial;
            let mut props = Properties::new();
            part.encode(ctx, &mut props)?;
            bodies.push(props);
        }
        if bodies.is_empty() {
            continue;
        }
        trace!(category = category.label, parts = bodies.len(), "encoding category");

        match category.emission {
            Emission::Inline => {
                for body in &bodies {
                    document.splice(body);
                }
            }
            Emission::Object => {
                if let Some(body) = bodies.last() {
                    document.set_encoded(category.label, wrap(body)?);
                }
            }
            Emission::Array | Emission::DatasetSource => {
                document.set_encoded(category.label, wrap_all(&bodies)?);
            }
        }
    }
    Ok(())
}

fn encode_dataset(
    category: &Category,
    ordered: &[Arc<dyn Part>],
    ctx: &EncodeContext<'_>,
    document: &mut Properties,
) -> Result<()> {
    if !ctx.dataset_mode() || ctx.skipping_data() {
        return Ok(());
    }
    let mut blocks: Vec<Properties> = Vec::new();
    for part in ordered.iter().filter(|p| p.kind() == category.kind) {
        let Some(data) = part.as_data() else { continue };
        let columns = ctx.dataset_columns(part.id());
        let Some(last) = columns.last() else { continue };
        if blocks.len() <= last.index {
            blocks.resize_with(last.index + 1, Properties::new);
        }
        let mut values = String::new();
        data.encode_values(&mut values)?;
        for dataset in columns {
            blocks[dataset.index].set_encoded(dataset.column.clone(), values.clone());
        }
    }
    if blocks.is_empty() {
        return Ok(());
    }
    trace!(blocks = blocks.len(), "encoding dataset");

    let sources = blocks
        .iter()
        .map(|block| Ok(format!("{{\"source\":{}}}", wrap(block)?)))
        .collect::<Result<Vec<_>>>()?;
    let json = match sources.as_slice() {
        [single] => single.clone(),
        _ => format!("[{}]", sources.join(",")),
    };
    document.set_encoded(category.label, json);
    Ok(())
}

/// `{body}`; kept even when empty so array indices stay aligned.
fn wrap(body: &Properties) -> Result<String> {
    let mut out = String::from("{");
    body.encode_into(&mut out)?;
    strip_trailing_comma(&mut out);
    out.push('}');
    Ok(out)
}

fn wrap_all(bodies: &[Properties]) -> Result<String> {
    let mut out = String::from("[");
    for (i, body) in bodies.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&wrap(body)?);
    }
    out.push(']');
    Ok(out)
}
