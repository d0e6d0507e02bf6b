#![forbid(unsafe_code)]

//! The offers grid component.
//!
//! [`OfferGrid`] owns everything one rendered grid needs: the slot plan, the
//! current packing (recomputed through a [`PackCache`] on direction change),
//! pixel metrics, the persisted [`AssignmentStore`], and the pointer adapter.
//! Placement depends only on plan and direction; content depends only on the
//! assignment. Drags change the latter and never the former.

use offergrid_core::{PointerButton, PointerKind, PointerPosition, Rect};
use offergrid_layout::{
    FlowDirection, GridMetrics, HitMap, PackCache, PackCacheStats, PackError, PackedGrid,
    PlacedSlot, SizeClass, SlotId, SlotPlan,
};
use offergrid_runtime::{
    AssignmentStore, GridConfig, LoadSource, SlotAssignment, StorageBackend, SwapOutcome,
};

use crate::drag_swap::DragSwapState;
use crate::pointer::{GridPointerAdapter, PointerConfig, PointerDispatch};

/// Render model for one slot.
#[derive(Debug, Clone, PartialEq)]
pub struct TileView<'a, T> {
    pub slot: SlotId,
    pub size_class: SizeClass,
    pub placement: PlacedSlot,
    /// Pixel bounds relative to the grid container.
    pub rect: Rect,
    pub content_index: usize,
    /// Item rendered in this slot; `None` only when `items` is empty.
    pub item: Option<&'a T>,
    /// This tile is being dragged.
    pub lifted: bool,
    /// This tile is the current drop target.
    pub drop_target: bool,
}

/// One grid instance.
#[derive(Debug)]
pub struct OfferGrid<B> {
    plan: SlotPlan,
    direction: FlowDirection,
    metrics: GridMetrics,
    cache: PackCache,
    grid: PackedGrid,
    store: AssignmentStore<B>,
    pointer: GridPointerAdapter,
}

impl<B: StorageBackend> OfferGrid<B> {
    /// Pack `plan`, load the assignment from `backend`, and build the hit map.
    ///
    /// Both directions are packed up front so an unplaceable plan fails here
    /// rather than on the first direction switch.
    pub fn new(plan: SlotPlan, config: &GridConfig, backend: B) -> Result<Self, PackError> {
        let mut cache = PackCache::new();
        let other = match config.direction {
            FlowDirection::Ltr => FlowDirection::Rtl,
            FlowDirection::Rtl => FlowDirection::Ltr,
        };
        cache.get_or_pack(&plan, other)?;
        let grid = cache.get_or_pack(&plan, config.direction)?.clone();

        let store = AssignmentStore::load(backend, config.storage_key.clone(), plan.len());
        let pointer = GridPointerAdapter::new(
            plan.len(),
            HitMap::new(&grid, &config.metrics),
            PointerConfig::default(),
        );
        tracing::debug!(
            target: "offergrid.assignment",
            source = store.source().as_str(),
            direction = ?config.direction,
            "offer grid ready"
        );
        Ok(Self {
            plan,
            direction: config.direction,
            metrics: config.metrics,
            cache,
            grid,
            store,
            pointer,
        })
    }

    /// Grid over the standard seven-slot offers plan.
    pub fn offers(config: &GridConfig, backend: B) -> Result<Self, PackError> {
        Self::new(SlotPlan::offers(), config, backend)
    }

    #[must_use]
    pub fn plan(&self) -> &SlotPlan {
        &self.plan
    }

    #[must_use]
    pub const fn direction(&self) -> FlowDirection {
        self.direction
    }

    #[must_use]
    pub const fn metrics(&self) -> GridMetrics {
        self.metrics
    }

    /// Current packing.
    #[must_use]
    pub fn layout(&self) -> &PackedGrid {
        &self.grid
    }

    /// Pack cache counters; direction switches after construction are hits.
    #[must_use]
    pub fn pack_stats(&self) -> PackCacheStats {
        self.cache.stats()
    }

    #[must_use]
    pub fn hit_map(&self) -> &HitMap {
        self.pointer.hit_map()
    }

    #[must_use]
    pub fn assignment(&self) -> &SlotAssignment {
        self.store.assignment()
    }

    #[must_use]
    pub fn load_source(&self) -> &LoadSource {
        self.store.source()
    }

    #[must_use]
    pub fn store(&self) -> &AssignmentStore<B> {
        &self.store
    }

    #[must_use]
    pub const fn drag_state(&self) -> DragSwapState {
        self.pointer.drag_state()
    }

    #[must_use]
    pub fn pointer(&self) -> &GridPointerAdapter {
        &self.pointer
    }

    /// Switch reading direction. Only placements change.
    pub fn set_direction(&mut self, direction: FlowDirection) -> Result<(), PackError> {
        if direction == self.direction {
            return Ok(());
        }
        self.grid = self.cache.get_or_pack(&self.plan, direction)?.clone();
        self.direction = direction;
        self.rebuild_hit_map();
        Ok(())
    }

    /// Replace pixel metrics (container resize).
    pub fn set_metrics(&mut self, metrics: GridMetrics) {
        self.metrics = metrics;
        self.rebuild_hit_map();
    }

    fn rebuild_hit_map(&mut self) {
        self.pointer
            .set_hit_map(HitMap::new(&self.grid, &self.metrics));
    }

    /// Pixel bounds of the whole grid.
    #[must_use]
    pub fn container_rect(&self) -> Rect {
        self.metrics.container_rect(&self.grid)
    }

    /// Swap two slots directly (keyboard or programmatic reordering).
    pub fn swap(&mut self, a: SlotId, b: SlotId) -> SwapOutcome {
        self.store.swap(a, b)
    }

    pub fn pointer_down(
        &mut self,
        pointer_id: u32,
        kind: PointerKind,
        button: PointerButton,
        position: PointerPosition,
        element: Option<SlotId>,
    ) -> PointerDispatch {
        self.pointer
            .pointer_down(pointer_id, kind, button, position, element)
    }

    pub fn pointer_move(
        &mut self,
        pointer_id: u32,
        position: PointerPosition,
        element: Option<SlotId>,
    ) -> PointerDispatch {
        self.pointer.pointer_move(pointer_id, position, element)
    }

    pub fn pointer_up(
        &mut self,
        pointer_id: u32,
        position: PointerPosition,
        element: Option<SlotId>,
    ) -> PointerDispatch {
        self.pointer
            .pointer_up(pointer_id, position, element, &mut self.store)
    }

    pub fn pointer_cancel(&mut self, pointer_id: Option<u32>) -> PointerDispatch {
        self.pointer.pointer_cancel(pointer_id)
    }

    pub fn pointer_leave(&mut self, pointer_id: u32) -> PointerDispatch {
        self.pointer.pointer_leave(pointer_id)
    }

    pub fn blur(&mut self) -> PointerDispatch {
        self.pointer.blur()
    }

    pub fn visibility_hidden(&mut self) -> PointerDispatch {
        self.pointer.visibility_hidden()
    }

    /// Per-slot render model in plan order.
    ///
    /// Slot `i` shows `items[assignment[i] % items.len()]`, so a short item
    /// list repeats instead of leaving holes.
    #[must_use]
    pub fn tiles<'a, T>(&self, items: &'a [T]) -> Vec<TileView<'a, T>> {
        let drag = self.drag_state();
        self.grid
            .slots()
            .iter()
            .map(|placed| {
                let content_index = self
                    .assignment()
                    .content_index(placed.id)
                    .unwrap_or(placed.id.index());
                let item = match items.len() {
                    0 => None,
                    len => items.get(content_index % len),
                };
                TileView {
                    slot: placed.id,
                    size_class: placed.size_class,
                    placement: *placed,
                    rect: self.metrics.slot_rect(placed),
                    content_index,
                    item,
                    lifted: drag.source() == Some(placed.id),
                    drop_target: drag.hover() == Some(placed.id),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use offergrid_core::ContentItem;
    use offergrid_runtime::MemoryStorage;

    fn config() -> GridConfig {
        GridConfig {
            metrics: GridMetrics::new(100, 50, 10),
            ..GridConfig::default()
        }
    }

    fn items(n: u64) -> Vec<ContentItem> {
        (0..n)
            .map(|i| ContentItem::new(i, format!("Offer {i}")))
            .collect()
    }

    #[test]
    fn fresh_grid_shows_identity() {
        let grid = OfferGrid::offers(&config(), MemoryStorage::new()).expect("packs");
        assert_eq!(grid.load_source(), &LoadSource::Missing);
        let items = items(7);
        let tiles = grid.tiles(&items);
        assert_eq!(tiles.len(), 7);
        for (i, tile) in tiles.iter().enumerate() {
            assert_eq!(tile.content_index, i);
            assert_eq!(tile.item.map(|item| item.id.0), Some(i as u64));
            assert!(!tile.lifted && !tile.drop_target);
        }
    }

    #[test]
    fn swap_changes_content_not_placement() {
        let mut grid = OfferGrid::offers(&config(), MemoryStorage::new()).expect("packs");
        let before: Vec<_> = grid.layout().slots().to_vec();
        grid.swap(SlotId::new(0), SlotId::new(6));
        assert_eq!(grid.layout().slots(), before.as_slice());
        let items = items(7);
        let tiles = grid.tiles(&items);
        assert_eq!(tiles[0].item.map(|i| i.title.as_str()), Some("Offer 6"));
        assert_eq!(tiles[0].size_class, SizeClass::Large);
    }

    #[test]
    fn direction_switch_mirrors_without_touching_content() {
        let mut grid = OfferGrid::offers(&config(), MemoryStorage::new()).expect("packs");
        grid.swap(SlotId::new(1), SlotId::new(2));
        let ltr_large = grid.tiles::<ContentItem>(&[])[0].rect;
        grid.set_direction(FlowDirection::Rtl).expect("packs");
        let rtl_large = grid.tiles::<ContentItem>(&[])[0].rect;
        assert_eq!(ltr_large, Rect::new(0, 0, 210, 110));
        assert_eq!(rtl_large, Rect::new(220, 0, 210, 110));
        assert_eq!(grid.assignment().as_slice(), &[0, 2, 1, 3, 4, 5, 6]);
        assert_eq!(
            grid.hit_map().hit_test(PointerPosition::new(400, 20)),
            Some(SlotId::new(0))
        );
    }

    #[test]
    fn short_item_list_cycles() {
        let grid = OfferGrid::offers(&config(), MemoryStorage::new()).expect("packs");
        let items = items(3);
        let ids: Vec<_> = grid
            .tiles(&items)
            .iter()
            .map(|t| t.item.map(|i| i.id.0))
            .collect();
        assert_eq!(
            ids,
            vec![Some(0), Some(1), Some(2), Some(0), Some(1), Some(2), Some(0)]
        );
    }

    #[test]
    fn empty_item_list_renders_placeholders() {
        let grid = OfferGrid::offers(&config(), MemoryStorage::new()).expect("packs");
        assert!(grid.tiles::<ContentItem>(&[]).iter().all(|t| t.item.is_none()));
    }

    #[test]
    fn drag_flags_follow_controller() {
        let mut grid = OfferGrid::offers(&config(), MemoryStorage::new()).expect("packs");
        grid.pointer_down(
            1,
            PointerKind::Mouse,
            PointerButton::Primary,
            PointerPosition::new(20, 20),
            None,
        );
        grid.pointer_move(1, PointerPosition::new(250, 80), None);
        let tiles = grid.tiles::<ContentItem>(&[]);
        assert!(tiles[0].lifted);
        assert!(tiles[2].drop_target);
        assert_eq!(tiles.iter().filter(|t| t.lifted || t.drop_target).count(), 2);
    }

    #[test]
    fn unplaceable_plan_is_rejected() {
        use offergrid_layout::SlotDefinition;
        let plan = SlotPlan::new(
            2,
            Some(1),
            vec![
                SlotDefinition::new(0, SizeClass::Medium, 2, 1),
                SlotDefinition::new(1, SizeClass::Small, 1, 1),
            ],
        )
        .expect("structurally valid");
        assert!(matches!(
            OfferGrid::new(plan, &config(), MemoryStorage::new()),
            Err(PackError::RowLimitExceeded { .. })
        ));
    }

    #[test]
    fn direction_switches_reuse_cached_packings() {
        let mut grid = OfferGrid::offers(&config(), MemoryStorage::new()).expect("packs");
        assert_eq!(grid.pack_stats().misses, 2);
        grid.set_direction(FlowDirection::Rtl).expect("packs");
        grid.set_direction(FlowDirection::Ltr).expect("packs");
        let stats = grid.pack_stats();
        assert_eq!((stats.entries, stats.misses), (2, 2));
        assert_eq!(stats.hits, 2);
    }

    #[test]
    fn only_swaps_change_the_assignment() {
        let mut grid = OfferGrid::offers(&config(), MemoryStorage::new()).expect("packs");
        grid.swap(SlotId::new(3), SlotId::new(4));
        let after_swap = grid.assignment().clone();

        grid.pointer_down(
            1,
            PointerKind::Mouse,
            PointerButton::Primary,
            PointerPosition::new(20, 20),
            None,
        );
        grid.set_direction(FlowDirection::Rtl).expect("packs");
        grid.set_metrics(GridMetrics::new(80, 40, 4));
        grid.blur();
        grid.visibility_hidden();
        grid.pointer_cancel(None);

        assert_eq!(grid.assignment(), &after_swap);
        assert_eq!(grid.drag_state(), DragSwapState::Idle);
        assert_eq!(
            grid.store().backend().get("offers-grid-layout"),
            Some("[0,1,2,4,3,5,6]")
        );
    }
}
