#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use offergrid_core::{PointerButton, PointerKind, PointerPosition};
use offergrid_layout::{FlowDirection, SlotId};
use offergrid_runtime::{GridConfig, MemoryStorage, SlotAssignment, SwapOutcome};
use offergrid_web::{DragSwapEffect, OfferGrid};

#[derive(Debug, Arbitrary)]
enum Op {
    Down {
        pointer: u8,
        touch: bool,
        button: i8,
        x: i16,
        y: i16,
        element: Option<u8>,
    },
    Move {
        pointer: u8,
        x: i16,
        y: i16,
        element: Option<u8>,
    },
    Up {
        pointer: u8,
        x: i16,
        y: i16,
        element: Option<u8>,
    },
    Cancel(Option<u8>),
    Leave(u8),
    Blur,
    Hidden,
    Rtl(bool),
}

fuzz_target!(|ops: Vec<Op>| {
    if ops.len() > 256 {
        return;
    }
    let Ok(mut grid) = OfferGrid::offers(&GridConfig::default(), MemoryStorage::new()) else {
        return;
    };
    let mut shadow = SlotAssignment::identity(grid.plan().len());

    for op in ops {
        let position = |x: i16, y: i16| PointerPosition::new(i32::from(x), i32::from(y));
        let dispatch = match op {
            Op::Down {
                pointer,
                touch,
                button,
                x,
                y,
                element,
            } => {
                let kind = if touch {
                    PointerKind::Touch
                } else {
                    PointerKind::Mouse
                };
                let Some(button) = PointerButton::from_dom(i16::from(button)) else {
                    continue;
                };
                grid.pointer_down(
                    u32::from(pointer),
                    kind,
                    button,
                    position(x, y),
                    element.map(SlotId::new),
                )
            }
            Op::Move {
                pointer,
                x,
                y,
                element,
            } => grid.pointer_move(u32::from(pointer), position(x, y), element.map(SlotId::new)),
            Op::Up {
                pointer,
                x,
                y,
                element,
            } => grid.pointer_up(u32::from(pointer), position(x, y), element.map(SlotId::new)),
            Op::Cancel(pointer) => grid.pointer_cancel(pointer.map(u32::from)),
            Op::Leave(pointer) => grid.pointer_leave(u32::from(pointer)),
            Op::Blur => grid.blur(),
            Op::Hidden => grid.visibility_hidden(),
            Op::Rtl(rtl) => {
                let _ = grid.set_direction(FlowDirection::from_rtl(rtl));
                continue;
            }
        };

        if let Some(transition) = dispatch.transition
            && let DragSwapEffect::Dropped {
                source,
                target,
                outcome: SwapOutcome::Swapped { .. },
            } = transition.effect
        {
            assert_ne!(source, target, "swap onto self");
            shadow.swap(source, target);
        }

        // One swap per drop, never a stray mutation.
        assert_eq!(grid.assignment(), &shadow);
        if !grid.drag_state().is_dragging() {
            assert_eq!(grid.pointer().active_pointer_id(), None);
        }
    }
});
