//! Property invariants for the first-fit packer.
//!
//! Exercises the fixed offers plan and randomly generated plans, asserting
//! disjoint placements, full tiling of the offers grid, determinism, and
//! LTR/RTL mirror symmetry.

use std::collections::BTreeSet;

use offergrid_layout::{
    FlowDirection, OFFER_GRID_COLUMNS, OFFER_GRID_ROWS, PackedGrid, SizeClass, SlotDefinition,
    SlotPlan, pack,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn assert_disjoint(grid: &PackedGrid) {
    let mut seen = BTreeSet::new();
    for placed in grid.slots() {
        for cell in placed.cells() {
            assert!(
                seen.insert(cell),
                "cell {cell:?} claimed twice (second owner {})",
                placed.id
            );
        }
    }
}

fn assert_mirrored(ltr: &PackedGrid, rtl: &PackedGrid) {
    assert_eq!(ltr.slots().len(), rtl.slots().len());
    for (l, r) in ltr.slots().iter().zip(rtl.slots()) {
        assert_eq!(l.id, r.id);
        assert_eq!(l.origin_row, r.origin_row);
        assert_eq!((l.col_span, l.row_span), (r.col_span, r.row_span));
        assert_eq!(
            r.origin_col,
            ltr.columns() - l.origin_col - l.col_span,
            "{} not mirrored",
            l.id
        );
    }
}

#[test]
fn offers_plan_has_no_overlap_in_either_direction() {
    let plan = SlotPlan::offers();
    for direction in [FlowDirection::Ltr, FlowDirection::Rtl] {
        let grid = pack(&plan, direction).expect("offers plan packs");
        assert_disjoint(&grid);
    }
}

#[test]
fn offers_plan_tiles_four_by_three() {
    let plan = SlotPlan::offers();
    for direction in [FlowDirection::Ltr, FlowDirection::Rtl] {
        let grid = pack(&plan, direction).expect("offers plan packs");
        assert_eq!(grid.columns(), OFFER_GRID_COLUMNS);
        assert_eq!(grid.rows(), OFFER_GRID_ROWS);

        let covered: BTreeSet<_> = grid.slots().iter().flat_map(|p| p.cells()).collect();
        let expected: BTreeSet<_> = (0..OFFER_GRID_ROWS)
            .flat_map(|row| (0..OFFER_GRID_COLUMNS).map(move |col| (col, row)))
            .collect();
        assert_eq!(covered, expected);
    }
}

#[test]
fn offers_plan_is_deterministic() {
    let plan = SlotPlan::offers();
    for direction in [FlowDirection::Ltr, FlowDirection::Rtl] {
        let first = pack(&plan, direction).expect("packs");
        let second = pack(&plan, direction).expect("packs");
        assert_eq!(first, second);
    }
}

#[test]
fn offers_plan_mirrors_between_directions() {
    let plan = SlotPlan::offers();
    let ltr = pack(&plan, FlowDirection::Ltr).expect("packs");
    let rtl = pack(&plan, FlowDirection::Rtl).expect("packs");
    assert_mirrored(&ltr, &rtl);
}

#[test]
fn reordering_the_plan_changes_the_layout() {
    let mut slots: Vec<_> = SlotPlan::offers().slots().to_vec();
    slots.swap(0, 1);
    for (index, slot) in slots.iter_mut().enumerate() {
        slot.id = offergrid_layout::SlotId::new(index as u8);
    }
    let reordered = SlotPlan::new(4, None, slots).expect("structurally valid");
    let original = pack(&SlotPlan::offers(), FlowDirection::Ltr).expect("packs");
    let shuffled = pack(&reordered, FlowDirection::Ltr).expect("packs");
    assert_ne!(
        original.slots()[0].origin_col,
        shuffled.slots()[1].origin_col,
        "the large tile should move when it is declared second"
    );
}

fn size_class_strategy() -> impl Strategy<Value = SizeClass> {
    prop_oneof![
        Just(SizeClass::Large),
        Just(SizeClass::Medium),
        Just(SizeClass::Small),
        Just(SizeClass::Poster),
    ]
}

fn plan_strategy() -> impl Strategy<Value = SlotPlan> {
    (1u16..=6).prop_flat_map(|columns| {
        prop::collection::vec((1u16..=columns, 1u16..=3, size_class_strategy()), 1..=16).prop_map(
            move |spans| {
                let slots = spans
                    .into_iter()
                    .enumerate()
                    .map(|(index, (col_span, row_span, class))| {
                        SlotDefinition::new(index as u8, class, col_span, row_span)
                    })
                    .collect();
                SlotPlan::new(columns, None, slots).expect("generated plans are valid")
            },
        )
    })
}

proptest! {
    #[test]
    fn random_plans_never_overlap(plan in plan_strategy()) {
        for direction in [FlowDirection::Ltr, FlowDirection::Rtl] {
            let grid = pack(&plan, direction).expect("unbounded plans always pack");
            assert_disjoint(&grid);
            prop_assert_eq!(grid.slots().len(), plan.len());
            prop_assert!(grid.slots().iter().all(|p| p.end_col() <= plan.columns()));
        }
    }

    #[test]
    fn random_plans_mirror(plan in plan_strategy()) {
        let ltr = pack(&plan, FlowDirection::Ltr).expect("packs");
        let rtl = pack(&plan, FlowDirection::Rtl).expect("packs");
        assert_mirrored(&ltr, &rtl);
        prop_assert_eq!(ltr.rows(), rtl.rows());
    }

    #[test]
    fn random_plans_are_deterministic(plan in plan_strategy()) {
        let a = pack(&plan, FlowDirection::Rtl).expect("packs");
        let b = pack(&plan, FlowDirection::Rtl).expect("packs");
        prop_assert_eq!(a, b);
    }

    #[test]
    fn rows_used_never_exceed_stacked_height(plan in plan_strategy()) {
        let grid = pack(&plan, FlowDirection::Ltr).expect("packs");
        let stacked: u32 = plan.slots().iter().map(|s| u32::from(s.row_span)).sum();
        prop_assert!(u32::from(grid.rows()) <= stacked);
        prop_assert_eq!(
            grid.occupied_cells(),
            plan.total_area()
        );
    }
}
