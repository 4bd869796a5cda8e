//! Per-pass working set of parts.
//!
//! The registry is rebuilt from scratch every pass by asking each top-level
//! component for the parts it depends on. It is dropped when the pass ends.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::part::{Capabilities, Component, Part, PartId};

/// A registered part and the charts that pulled it in.
#[derive(Debug, Clone)]
pub struct RegistryEntry {
    /// The part.
    pub part: Arc<dyn Part>,
    /// Owning charts in the order they were added (used for by-chart
    /// dataset grouping).
    pub owners: Vec<PartId>,
}

/// Ordered, duplicate-free collection of the parts active in one pass.
#[derive(Debug, Default)]
pub struct PartRegistry {
    entries: Vec<RegistryEntry>,
    skipped: Vec<Arc<dyn Part>>,
    skipping_data: bool,
}

impl PartRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new(skipping_data: bool) -> Self {
        Self {
            entries: Vec::new(),
            skipped: Vec::new(),
            skipping_data,
        }
    }

    /// Whether this pass omits bulk data.
    #[must_use]
    pub fn skipping_data(&self) -> bool {
        self.skipping_data
    }

    /// Add a component and, recursively, the parts it depends on.
    pub fn add_component(&mut self, component: Arc<dyn Component>) {
        if self.contains(component.id()) {
            return;
        }
        self.add(Arc::clone(&component).as_part());
        component.add_parts_into(self);
    }

    /// Add a part.
    ///
    /// Skip-eligible parts are set aside while skipping data. A single-instance
    /// part displaces the active part of the same kind, keeping its position.
    pub fn add(&mut self, part: Arc<dyn Part>) {
        self.insert(part, None);
    }

    /// Add a part pulled in by the chart `owner`. A part shared by several
    /// charts records each of them.
    pub fn add_owned(&mut self, part: Arc<dyn Part>, owner: PartId) {
        self.insert(part, Some(owner));
    }

    /// Add several parts.
    pub fn add_all(&mut self, parts: impl IntoIterator<Item = Arc<dyn Part>>) {
        for part in parts {
            self.add(part);
        }
    }

    fn insert(&mut self, part: Arc<dyn Part>, owner: Option<PartId>) {
        let id = part.id();
        if let Some(entry) = self.entries.iter_mut().find(|e| e.part.id() == id) {
            if let Some(owner) = owner.filter(|o| !entry.owners.contains(o)) {
                entry.owners.push(owner);
            }
            return;
        }

        let caps = part.capabilities();
        if self.skipping_data && caps.contains(Capabilities::SKIP_ELIGIBLE) {
            if !self.skipped.iter().any(|p| p.id() == id) {
                trace!(part = %part.describe(), "skipping data part");
                self.skipped.push(part);
            }
            return;
        }

        if caps.contains(Capabilities::SINGLE_INSTANCE) {
            let kind = part.kind();
            if let Some(entry) = self.entries.iter_mut().find(|e| {
                e.part.kind() == kind && e.part.capabilities().contains(Capabilities::SINGLE_INSTANCE)
            }) {
                debug!(
                    displaced = %entry.part.describe(),
                    by = %part.describe(),
                    "single-instance part replaced"
                );
                entry.part = part;
                entry.owners = owner.into_iter().collect();
                return;
            }
        }

        self.entries.push(RegistryEntry {
            part,
            owners: owner.into_iter().collect(),
        });
    }

    /// True if a part with `id` is active.
    #[must_use]
    pub fn contains(&self, id: PartId) -> bool {
        self.entries.iter().any(|e| e.part.id() == id)
    }

    /// Active entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }

    /// Active parts in insertion order.
    pub fn parts(&self) -> impl Iterator<Item = &Arc<dyn Part>> {
        self.entries.iter().map(|e| &e.part)
    }

    /// Parts set aside because the pass skips data.
    #[must_use]
    pub fn skipped(&self) -> &[Arc<dyn Part>] {
        &self.skipped
    }

    /// Owning charts of a registered part.
    #[must_use]
    pub fn owners_of(&self, id: PartId) -> &[PartId] {
        self.entries
            .iter()
            .find(|e| e.part.id() == id)
            .map(|e| e.owners.as_slice())
            .unwrap_or_default()
    }

    /// Number of active parts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no part is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
