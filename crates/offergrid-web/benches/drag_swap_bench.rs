#![forbid(unsafe_code)]

use criterion::{Criterion, criterion_group, criterion_main};
use offergrid_core::{PointerButton, PointerKind, PointerPosition};
use offergrid_layout::{FlowDirection, GridMetrics, HitMap, SlotPlan, pack};
use offergrid_runtime::SlotAssignment;
use offergrid_web::{GridPointerAdapter, PointerConfig};
use std::hint::black_box;

fn adapter() -> GridPointerAdapter {
    let grid = pack(&SlotPlan::offers(), FlowDirection::Ltr).expect("offers plan should pack");
    let hits = HitMap::new(&grid, &GridMetrics::default());
    GridPointerAdapter::new(7, hits, PointerConfig::default())
}

fn bench_gestures(c: &mut Criterion) {
    let mut group = c.benchmark_group("web/drag_swap");

    group.bench_function("mouse_drag_16_moves", |b| {
        let mut adapter = adapter();
        let mut assignment = SlotAssignment::identity(7);
        b.iter(|| {
            adapter.pointer_down(
                1,
                PointerKind::Mouse,
                PointerButton::Primary,
                PointerPosition::new(40, 40),
                None,
            );
            for step in 0..16 {
                black_box(adapter.pointer_move(
                    1,
                    PointerPosition::new(40 + step * 50, 40 + step * 20),
                    None,
                ));
            }
            black_box(adapter.pointer_up(1, PointerPosition::new(860, 100), None, &mut assignment));
        });
    });

    group.bench_function("touch_cancel", |b| {
        let mut adapter = adapter();
        b.iter(|| {
            adapter.pointer_down(
                2,
                PointerKind::Touch,
                PointerButton::Primary,
                PointerPosition::new(700, 300),
                None,
            );
            adapter.pointer_move(2, PointerPosition::new(100, 400), None);
            black_box(adapter.pointer_cancel(Some(2)));
        });
    });

    group.finish();
}

criterion_group!(benches, bench_gestures);
criterion_main!(benches);
