//! Dataset grouping.
//!
//! In dataset mode, data providers are batched into shared table blocks. Each
//! block becomes one `{"source":{...}}` entry and each provider one named
//! column in it. Under by-chart grouping a provider shared by several charts
//! gets a column in each of their blocks, so references are looked up by
//! chart and provider.

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::DatasetGrouping;
use crate::part::{DedupKey, Part, PartId};
use crate::registry::PartRegistry;

use super::SerialArena;

/// Where a provider's values live in the dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetRef {
    /// Index of the dataset block.
    pub index: usize,
    /// Column name inside the block.
    pub column: String,
}

/// A provider's column, scoped to the chart whose block holds it. Unscoped
/// columns are shared by every chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct ColumnKey {
    chart: Option<PartId>,
    provider: PartId,
}

/// Dataset block layout of one pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatasetPlan {
    blocks: usize,
    refs: HashMap<ColumnKey, DatasetRef>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum GroupKey {
    Length(usize),
    Owner(PartId),
    Unowned,
}

impl DatasetPlan {
    /// Group `providers` (in serial order) into blocks.
    ///
    /// Providers without a dataset serial are left out. By element count,
    /// blocks follow the first provider of each length. By chart, blocks
    /// follow series order and providers with no owning chart share one
    /// trailing block.
    #[must_use]
    pub fn build(
        providers: &[Arc<dyn Part>],
        registry: &PartRegistry,
        arena: &SerialArena,
        grouping: DatasetGrouping,
    ) -> Self {
        let mut members: Vec<(GroupKey, ColumnKey, usize)> = Vec::new();
        for part in providers {
            let Some(data) = part.as_data() else { continue };
            let provider = part.id();
            let Some(serial) = arena.serial(DedupKey::Identity(provider)) else {
                continue;
            };
            let unscoped = ColumnKey { chart: None, provider };
            match grouping {
                DatasetGrouping::ByElementCount => {
                    members.push((GroupKey::Length(data.len()), unscoped, serial));
                }
                DatasetGrouping::ByChart => {
                    let owners = registry.owners_of(provider);
                    if owners.is_empty() {
                        members.push((GroupKey::Unowned, unscoped, serial));
                    }
                    for &chart in owners {
                        let column = ColumnKey {
                            chart: Some(chart),
                            provider,
                        };
                        members.push((GroupKey::Owner(chart), column, serial));
                    }
                }
            }
        }

        let mut order: Vec<GroupKey> = Vec::new();
        for (key, _, _) in &members {
            if !order.contains(key) {
                order.push(*key);
            }
        }
        // stable: length blocks keep first-seen order
        order.sort_by_key(|key| match key {
            GroupKey::Length(_) => (0, 0),
            GroupKey::Owner(chart) => (0, arena.serial(DedupKey::Identity(*chart)).unwrap_or(usize::MAX)),
            GroupKey::Unowned => (1, 0),
        });

        let refs = members
            .into_iter()
            .filter_map(|(group, key, serial)| {
                let index = order.iter().position(|k| *k == group)?;
                Some((
                    key,
                    DatasetRef {
                        index,
                        column: format!("d{serial}"),
                    },
                ))
            })
            .collect();

        Self {
            blocks: order.len(),
            refs,
        }
    }

    /// Number of blocks.
    #[must_use]
    pub fn block_count(&self) -> usize {
        self.blocks
    }

    /// Column of `provider` as seen by `chart`.
    #[must_use]
    pub fn get(&self, chart: PartId, provider: PartId) -> Option<&DatasetRef> {
        let scoped = ColumnKey {
            chart: Some(chart),
            provider,
        };
        self.refs
            .get(&scoped)
            .or_else(|| self.refs.get(&ColumnKey { chart: None, provider }))
    }

    /// Every column of `provider`, one per block holding it, by block index.
    #[must_use]
    pub fn columns_of(&self, provider: PartId) -> Vec<&DatasetRef> {
        let mut columns: Vec<&DatasetRef> = self
            .refs
            .iter()
            .filter(|(key, _)| key.provider == provider)
            .map(|(_, r)| r)
            .collect();
        columns.sort_by_key(|r| r.index);
        columns
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::NumberData;

    fn setup(lengths: &[usize]) -> (Vec<Arc<dyn Part>>, PartRegistry, SerialArena) {
        let parts: Vec<Arc<dyn Part>> = lengths
            .iter()
            .map(|&n| Arc::new(NumberData::new((0..n).map(|v| v as f64))) as Arc<dyn Part>)
            .collect();
        let mut registry = PartRegistry::new(false);
        registry.add_all(parts.iter().cloned());
        let mut arena = SerialArena::new();
        arena.assign(parts.iter().map(|p| DedupKey::Identity(p.id())));
        (parts, registry, arena)
    }

    #[test]
    fn test_groups_by_element_count() {
        let (parts, registry, arena) = setup(&[4, 4, 3]);
        let plan = DatasetPlan::build(&parts, &registry, &arena, DatasetGrouping::ByElementCount);
        let any_chart = PartId::next();
        assert_eq!(plan.block_count(), 2);
        assert_eq!(plan.get(any_chart, parts[0].id()).unwrap().index, 0);
        assert_eq!(plan.get(any_chart, parts[1].id()).unwrap().index, 0);
        assert_eq!(plan.get(any_chart, parts[2].id()).unwrap().index, 1);
        assert_eq!(plan.get(any_chart, parts[2].id()).unwrap().column, "d2");
    }

    #[test]
    fn test_groups_by_owner_with_trailing_unowned_block() {
        let chart = PartId::next();
        let owned: Arc<dyn Part> = Arc::new(NumberData::new([1.0, 2.0]));
        let loose: Arc<dyn Part> = Arc::new(NumberData::new([3.0, 4.0]));
        let also_owned: Arc<dyn Part> = Arc::new(NumberData::new([5.0]));
        let all = vec![Arc::clone(&loose), Arc::clone(&owned), Arc::clone(&also_owned)];
        let mut arena = SerialArena::new();
        arena.assign(all.iter().map(|p| DedupKey::Identity(p.id())));
        arena.assign([DedupKey::Identity(chart)]);

        let mut registry = PartRegistry::new(false);
        registry.add(Arc::clone(&loose));
        registry.add_owned(Arc::clone(&owned), chart);
        registry.add_owned(Arc::clone(&also_owned), chart);

        let plan = DatasetPlan::build(&all, &registry, &arena, DatasetGrouping::ByChart);
        assert_eq!(plan.block_count(), 2);
        assert_eq!(plan.get(chart, owned.id()).unwrap().index, 0);
        assert_eq!(plan.get(chart, also_owned.id()).unwrap().index, 0);
        assert_eq!(plan.get(chart, loose.id()).unwrap().index, 1);
    }

    #[test]
    fn test_shared_provider_gets_a_column_per_chart() {
        let (first, second) = (PartId::next(), PartId::next());
        let labels: Arc<dyn Part> = Arc::new(NumberData::new([1.0, 2.0, 3.0]));
        let a: Arc<dyn Part> = Arc::new(NumberData::new([4.0, 5.0, 6.0]));
        let b: Arc<dyn Part> = Arc::new(NumberData::new([7.0, 8.0, 9.0]));
        let all = vec![Arc::clone(&labels), Arc::clone(&a), Arc::clone(&b)];
        let mut arena = SerialArena::new();
        arena.assign(all.iter().map(|p| DedupKey::Identity(p.id())));
        arena.assign([DedupKey::Identity(first), DedupKey::Identity(second)]);

        let mut registry = PartRegistry::new(false);
        registry.add_owned(Arc::clone(&labels), first);
        registry.add_owned(Arc::clone(&a), first);
        registry.add_owned(Arc::clone(&labels), second);
        registry.add_owned(Arc::clone(&b), second);

        let plan = DatasetPlan::build(&all, &registry, &arena, DatasetGrouping::ByChart);
        assert_eq!(plan.block_count(), 2);
        assert_eq!(plan.get(first, labels.id()).unwrap().index, 0);
        assert_eq!(plan.get(second, labels.id()).unwrap().index, 1);
        assert_eq!(plan.get(second, b.id()).unwrap().index, 1);
        assert!(plan.get(first, b.id()).is_none());

        let columns = plan.columns_of(labels.id());
        assert_eq!(columns.len(), 2);
        assert_eq!((columns[0].index, columns[1].index), (0, 1));
        assert!(columns.iter().all(|c| c.column == "d0"));
    }

    #[test]
    fn test_by_chart_blocks_follow_series_order() {
        let (first, second) = (PartId::next(), PartId::next());
        let late: Arc<dyn Part> = Arc::new(NumberData::new([1.0]));
        let early: Arc<dyn Part> = Arc::new(NumberData::new([2.0]));
        let all = vec![Arc::clone(&late), Arc::clone(&early)];
        let mut arena = SerialArena::new();
        arena.assign(all.iter().map(|p| DedupKey::Identity(p.id())));
        arena.assign([DedupKey::Identity(first), DedupKey::Identity(second)]);

        let mut registry = PartRegistry::new(false);
        registry.add_owned(Arc::clone(&late), second);
        registry.add_owned(Arc::clone(&early), first);

        let plan = DatasetPlan::build(&all, &registry, &arena, DatasetGrouping::ByChart);
        assert_eq!(plan.get(first, early.id()).unwrap().index, 0);
        assert_eq!(plan.get(second, late.id()).unwrap().index, 1);
    }

    #[test]
    fn test_unassigned_providers_are_left_out() {
        let (parts, registry, _) = setup(&[2]);
        let plan = DatasetPlan::build(&parts, &registry, &SerialArena::new(), DatasetGrouping::ByElementCount);
        assert_eq!(plan.block_count(), 0);
        assert!(plan.get(PartId::next(), parts[0].id()).is_none());
        assert!(plan.columns_of(parts[0].id()).is_empty());
    }
}
