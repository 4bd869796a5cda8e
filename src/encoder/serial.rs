//! Serial arena.
//!
//! Serials are kept outside the parts, keyed by [`DedupKey`], so parts can be
//! shared immutably. A fresh arena is used for every pass.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::part::{DedupKey, Part};

/// Serial state of one key within a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerialState {
    /// Not yet assigned (or matched no category).
    Unassigned,
    /// Left out of this pass; keeps the serial of the last successful pass.
    Excluded {
        /// Serial held before this pass.
        prior: usize,
    },
    /// Assigned in this pass.
    Assigned(usize),
}

/// Per-pass `DedupKey -> SerialState` map.
#[derive(Debug, Clone, Default)]
pub struct SerialArena {
    states: HashMap<DedupKey, SerialState>,
}

impl SerialArena {
    /// Create an empty arena; every key starts unassigned.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// State of `key`.
    #[must_use]
    pub fn state(&self, key: DedupKey) -> SerialState {
        self.states.get(&key).copied().unwrap_or(SerialState::Unassigned)
    }

    /// Serial of `key`: assigned in this pass, or carried by an exclusion.
    #[must_use]
    pub fn serial(&self, key: DedupKey) -> Option<usize> {
        match self.state(key) {
            SerialState::Assigned(serial) | SerialState::Excluded { prior: serial } => Some(serial),
            SerialState::Unassigned => None,
        }
    }

    /// Exclude `part` from this pass. It must hold a serial from a previous pass.
    pub fn exclude(&mut self, part: &dyn Part, key: DedupKey, prior: Option<usize>) -> Result<()> {
        match prior {
            Some(prior) => {
                self.states.insert(key, SerialState::Excluded { prior });
                Ok(())
            }
            None => Err(Error::structural(
                part.describe(),
                "Skipping data but new data found",
            )),
        }
    }

    /// Assign serials to one category's keys, given in first-seen order.
    ///
    /// Equal keys share a serial. Keys that already hold a state are left
    /// alone. Returns the number of distinct serials handed out.
    pub fn assign(&mut self, keys: impl IntoIterator<Item = DedupKey>) -> usize {
        let mut next = 0;
        let mut groups: HashMap<DedupKey, usize> = HashMap::new();
        for key in keys {
            if let Some(&serial) = groups.get(&key) {
                debug_assert_eq!(self.state(key), SerialState::Assigned(serial));
                continue;
            }
            if self.state(key) != SerialState::Unassigned {
                continue;
            }
            groups.insert(key, next);
            self.states.insert(key, SerialState::Assigned(next));
            next += 1;
        }
        next
    }

    /// Every key holding a serial.
    pub fn serials(&self) -> impl Iterator<Item = (DedupKey, usize)> + '_ {
        self.states.keys().filter_map(|&key| self.serial(key).map(|s| (key, s)))
    }
}
