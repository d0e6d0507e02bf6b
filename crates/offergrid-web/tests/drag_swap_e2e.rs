#![forbid(unsafe_code)]

//! End-to-end drag scenarios through the grid component: pointer input in,
//! persisted assignment out, reload back in.
//!
//! Run:
//!   cargo test -p offergrid-web --test drag_swap_e2e

use offergrid_core::{PointerButton, PointerKind, PointerPosition};
use offergrid_layout::{FlowDirection, GridMetrics, SlotId};
use offergrid_runtime::{GridConfig, LoadSource, MemoryStorage, StorageBackend};
use offergrid_web::{DragSwapEffect, DragSwapState, OfferGrid};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

const KEY: &str = "offers-grid-layout";

fn config() -> GridConfig {
    GridConfig {
        metrics: GridMetrics::new(100, 50, 10),
        ..GridConfig::default()
    }
}

/// Center of a slot's pixel rect.
fn center(grid: &OfferGrid<MemoryStorage>, slot: u8) -> PointerPosition {
    let rect = grid.hit_map().rect(SlotId::new(slot)).expect("slot present");
    PointerPosition::new(
        (rect.x + rect.width / 2) as i32,
        (rect.y + rect.height / 2) as i32,
    )
}

fn mouse_drag(grid: &mut OfferGrid<MemoryStorage>, from: u8, to: u8) {
    let start = center(grid, from);
    let end = center(grid, to);
    grid.pointer_down(1, PointerKind::Mouse, PointerButton::Primary, start, None);
    grid.pointer_move(1, end, None);
    grid.pointer_up(1, end, None);
}

fn touch_drag(grid: &mut OfferGrid<MemoryStorage>, from: u8, to: u8) {
    let start = center(grid, from);
    let end = center(grid, to);
    grid.pointer_down(5, PointerKind::Touch, PointerButton::Primary, start, None);
    grid.pointer_move(5, end, None);
    grid.pointer_up(5, end, None);
}

#[test]
fn drag_zero_onto_two_persists_and_reloads() {
    let mut grid = OfferGrid::offers(&config(), MemoryStorage::new()).expect("packs");
    assert_eq!(grid.assignment().as_slice(), &[0, 1, 2, 3, 4, 5, 6]);

    mouse_drag(&mut grid, 0, 2);
    assert_eq!(grid.assignment().as_slice(), &[2, 1, 0, 3, 4, 5, 6]);
    assert_eq!(grid.drag_state(), DragSwapState::Idle);

    let backend = grid.store().backend().clone();
    assert_eq!(
        backend.load(KEY).expect("load").as_deref(),
        Some("[2,1,0,3,4,5,6]")
    );

    let reloaded = OfferGrid::offers(&config(), backend).expect("packs");
    assert_eq!(reloaded.load_source(), &LoadSource::Persisted);
    assert_eq!(reloaded.assignment().as_slice(), &[2, 1, 0, 3, 4, 5, 6]);
}

#[test]
fn cancel_after_hover_leaves_state_unchanged() {
    let mut grid = OfferGrid::offers(&config(), MemoryStorage::new()).expect("packs");
    let start = center(&grid, 2);
    let over = center(&grid, 5);
    grid.pointer_down(1, PointerKind::Mouse, PointerButton::Primary, start, None);
    grid.pointer_move(1, over, None);
    assert_eq!(grid.drag_state().hover(), Some(SlotId::new(5)));

    let dispatch = grid.pointer_cancel(Some(1));
    assert!(matches!(
        dispatch.transition.map(|t| t.effect),
        Some(DragSwapEffect::Canceled { .. })
    ));
    assert_eq!(grid.drag_state(), DragSwapState::Idle);
    assert!(grid.assignment().is_identity());
    assert!(grid.store().backend().is_empty());
}

#[test]
fn touch_and_mouse_produce_identical_results() {
    let mut by_mouse = OfferGrid::offers(&config(), MemoryStorage::new()).expect("packs");
    let mut by_touch = OfferGrid::offers(&config(), MemoryStorage::new()).expect("packs");
    for (from, to) in [(0, 3), (6, 1), (3, 4), (2, 2)] {
        mouse_drag(&mut by_mouse, from, to);
        touch_drag(&mut by_touch, from, to);
    }
    assert_eq!(by_mouse.assignment(), by_touch.assignment());
    assert_eq!(
        by_mouse.store().backend().get(KEY),
        by_touch.store().backend().get(KEY)
    );
}

#[test]
fn drop_onto_itself_does_not_write() {
    let mut grid = OfferGrid::offers(&config(), MemoryStorage::new()).expect("packs");
    mouse_drag(&mut grid, 4, 4);
    assert!(grid.assignment().is_identity());
    assert!(grid.store().backend().is_empty());
}

#[test]
fn swaps_survive_direction_change() {
    let mut grid = OfferGrid::offers(&config(), MemoryStorage::new()).expect("packs");
    mouse_drag(&mut grid, 0, 1);
    grid.set_direction(FlowDirection::Rtl).expect("packs");
    // Same slots, mirrored positions.
    mouse_drag(&mut grid, 1, 6);
    assert_eq!(grid.assignment().as_slice(), &[1, 6, 2, 3, 4, 5, 0]);
}

#[test]
fn corrupt_storage_starts_from_identity() {
    let storage = MemoryStorage::new().with_entry(KEY, "[9,9,9,9,9,9,9]");
    let mut grid = OfferGrid::offers(&config(), storage).expect("packs");
    assert!(matches!(grid.load_source(), LoadSource::Recovered(_)));
    assert!(grid.assignment().is_identity());
    mouse_drag(&mut grid, 5, 6);
    assert_eq!(grid.store().backend().get(KEY), Some("[0,1,2,3,4,6,5]"));
}

fn gesture() -> impl Strategy<Value = (bool, u8, u8, bool)> {
    // (touch, from, to, cancel)
    (any::<bool>(), 0u8..7, 0u8..7, any::<bool>())
}

proptest! {
    #[test]
    fn every_gesture_keeps_a_permutation_and_returns_idle(
        gestures in prop::collection::vec(gesture(), 1..24)
    ) {
        let mut grid = OfferGrid::offers(&config(), MemoryStorage::new()).expect("packs");
        let mut expected = grid.assignment().clone();
        for (touch, from, to, cancel) in gestures {
            let kind = if touch { PointerKind::Touch } else { PointerKind::Mouse };
            let start = center(&grid, from);
            let end = center(&grid, to);
            grid.pointer_down(3, kind, PointerButton::Primary, start, None);
            grid.pointer_move(3, end, None);
            if cancel {
                grid.blur();
            } else {
                grid.pointer_up(3, end, None);
                expected.swap(SlotId::new(from), SlotId::new(to));
            }
            prop_assert_eq!(grid.drag_state(), DragSwapState::Idle);
            prop_assert_eq!(grid.assignment(), &expected);
        }
    }
}
