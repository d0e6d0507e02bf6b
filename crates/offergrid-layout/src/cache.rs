//! Pack cache keyed by plan fingerprint and direction.
//!
//! Packing the offers plan is cheap, so the cache never matters for
//! correctness; it only avoids re-running the packer on every render.
//!
//! The plan fingerprint is part of the key, so a changed plan misses instead
//! of returning a stale packing.

use std::collections::hash_map::Entry;

use rustc_hash::FxHashMap;

use crate::FlowDirection;
use crate::packer::{PackError, PackedGrid, pack};
use crate::slot::SlotPlan;

/// Key for pack cache lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PackCacheKey {
    pub plan_fingerprint: u64,
    pub direction: FlowDirection,
}

impl PackCacheKey {
    #[must_use]
    pub fn new(plan: &SlotPlan, direction: FlowDirection) -> Self {
        Self {
            plan_fingerprint: plan.fingerprint(),
            direction,
        }
    }
}

/// Statistics about pack cache performance.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PackCacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

/// Memoized packings.
#[derive(Debug, Default)]
pub struct PackCache {
    entries: FxHashMap<PackCacheKey, PackedGrid>,
    hits: u64,
    misses: u64,
}

impl PackCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the packing for `(plan, direction)`, computing it on a miss.
    ///
    /// Pack errors are not cached.
    pub fn get_or_pack(
        &mut self,
        plan: &SlotPlan,
        direction: FlowDirection,
    ) -> Result<&PackedGrid, PackError> {
        match self.entries.entry(PackCacheKey::new(plan, direction)) {
            Entry::Occupied(occupied) => {
                self.hits += 1;
                Ok(occupied.into_mut())
            }
            Entry::Vacant(vacant) => {
                self.misses += 1;
                let grid = pack(plan, direction)?;
                Ok(vacant.insert(grid))
            }
        }
    }

    #[must_use]
    pub fn stats(&self) -> PackCacheStats {
        PackCacheStats {
            entries: self.entries.len(),
            hits: self.hits,
            misses: self.misses,
        }
    }
}
