#![forbid(unsafe_code)]

//! Unified mouse/touch adapter for the drag-swap controller.
//!
//! Browser hosts forward raw lifecycle signals; this module turns them into
//! [`DragSwapController`] steps while enforcing:
//! - one active pointer at a time,
//! - hit-testing for touch and pen contacts, whose DOM events keep targeting
//!   the element the gesture started on, and
//! - cancellation on interruption paths (cancel, leaving the viewport, blur,
//!   page hidden).
//!
//! Every dispatch returns a [`PointerLogEntry`] so hosts can trace ignored
//! input as precisely as forwarded input.

use offergrid_core::{PointerButton, PointerKind, PointerPosition};
use offergrid_layout::{HitMap, SlotId};
use offergrid_runtime::SlotSwap;

use crate::drag_swap::{
    DragCancelReason, DragSwapController, DragSwapEffect, DragSwapState, DragSwapTransition,
};

/// Adapter configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerConfig {
    /// Button required to begin a drag. Touch and pen contacts report `Primary`.
    pub activation_button: PointerButton,
    /// Cancel the drag when the pointer leaves the grid viewport. When false,
    /// leaving only clears the hover target.
    pub cancel_on_leave: bool,
}

impl Default for PointerConfig {
    fn default() -> Self {
        Self {
            activation_button: PointerButton::Primary,
            cancel_on_leave: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ActivePointer {
    pointer_id: u32,
    kind: PointerKind,
    last_position: PointerPosition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DispatchContext {
    phase: PointerLifecyclePhase,
    pointer_id: Option<u32>,
    kind: Option<PointerKind>,
    slot: Option<SlotId>,
    position: Option<PointerPosition>,
}

/// Lifecycle phase recorded for one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerLifecyclePhase {
    PointerDown,
    PointerMove,
    PointerUp,
    PointerCancel,
    PointerLeave,
    Blur,
    VisibilityHidden,
}

impl PointerLifecyclePhase {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PointerDown => "pointer_down",
            Self::PointerMove => "pointer_move",
            Self::PointerUp => "pointer_up",
            Self::PointerCancel => "pointer_cancel",
            Self::PointerLeave => "pointer_leave",
            Self::Blur => "blur",
            Self::VisibilityHidden => "visibility_hidden",
        }
    }
}

/// Why an incoming signal was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerIgnoredReason {
    InvalidPointerId,
    ButtonNotAllowed,
    ActivePointerAlreadyInProgress,
    NoActivePointer,
    PointerMismatch,
    NoSlotUnderPointer,
    ControllerRejected,
}

impl PointerIgnoredReason {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidPointerId => "invalid_pointer_id",
            Self::ButtonNotAllowed => "button_not_allowed",
            Self::ActivePointerAlreadyInProgress => "active_pointer_already_in_progress",
            Self::NoActivePointer => "no_active_pointer",
            Self::PointerMismatch => "pointer_mismatch",
            Self::NoSlotUnderPointer => "no_slot_under_pointer",
            Self::ControllerRejected => "controller_rejected",
        }
    }
}

/// Outcome category for one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerLogOutcome {
    Forwarded,
    Ignored(PointerIgnoredReason),
}

/// Structured record of one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerLogEntry {
    pub phase: PointerLifecyclePhase,
    pub pointer_id: Option<u32>,
    pub kind: Option<PointerKind>,
    pub slot: Option<SlotId>,
    pub position: Option<PointerPosition>,
    pub outcome: PointerLogOutcome,
}

/// Result of one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerDispatch {
    pub transition: Option<DragSwapTransition>,
    pub log: PointerLogEntry,
}

impl PointerDispatch {
    fn ignored(context: DispatchContext, reason: PointerIgnoredReason) -> Self {
        let dispatch = Self {
            transition: None,
            log: PointerLogEntry {
                phase: context.phase,
                pointer_id: context.pointer_id,
                kind: context.kind,
                slot: context.slot,
                position: context.position,
                outcome: PointerLogOutcome::Ignored(reason),
            },
        };
        tracing::trace!(
            target: "offergrid.pointer",
            phase = context.phase.as_str(),
            pointer_id = ?context.pointer_id,
            reason = ?reason,
            "pointer signal ignored"
        );
        dispatch
    }

    fn forwarded(context: DispatchContext, transition: DragSwapTransition) -> Self {
        Self {
            transition: Some(transition),
            log: PointerLogEntry {
                phase: context.phase,
                pointer_id: context.pointer_id,
                kind: context.kind,
                slot: context.slot,
                position: context.position,
                outcome: PointerLogOutcome::Forwarded,
            },
        }
    }

    /// Whether this dispatch swapped two slots.
    #[must_use]
    pub fn swapped(&self) -> bool {
        self.transition.is_some_and(|t| t.effect.swapped())
    }
}

/// Pointer adapter for one grid.
#[derive(Debug, Clone)]
pub struct GridPointerAdapter {
    controller: DragSwapController,
    hit_map: HitMap,
    config: PointerConfig,
    active: Option<ActivePointer>,
}

impl GridPointerAdapter {
    #[must_use]
    pub fn new(slot_count: usize, hit_map: HitMap, config: PointerConfig) -> Self {
        Self {
            controller: DragSwapController::new(slot_count),
            hit_map,
            config,
            active: None,
        }
    }

    #[must_use]
    pub const fn config(&self) -> PointerConfig {
        self.config
    }

    #[must_use]
    pub fn active_pointer_id(&self) -> Option<u32> {
        self.active.map(|active| active.pointer_id)
    }

    #[must_use]
    pub const fn drag_state(&self) -> DragSwapState {
        self.controller.state()
    }

    #[must_use]
    pub fn hit_map(&self) -> &HitMap {
        &self.hit_map
    }

    /// Replace slot bounds after a layout change. An active drag continues.
    pub fn set_hit_map(&mut self, hit_map: HitMap) {
        self.hit_map = hit_map;
    }

    /// Resolve the slot under a pointer.
    ///
    /// Mouse hosts may pass the slot of the DOM event target as `element`;
    /// touch and pen ignore it and always hit-test.
    fn resolve(
        &self,
        kind: PointerKind,
        position: PointerPosition,
        element: Option<SlotId>,
    ) -> Option<SlotId> {
        if kind.requires_hit_test() {
            self.hit_map.hit_test(position)
        } else {
            element.or_else(|| self.hit_map.hit_test(position))
        }
    }

    /// Mouse button press or touch start.
    pub fn pointer_down(
        &mut self,
        pointer_id: u32,
        kind: PointerKind,
        button: PointerButton,
        position: PointerPosition,
        element: Option<SlotId>,
    ) -> PointerDispatch {
        let slot = self.resolve(kind, position, element);
        let context = DispatchContext {
            phase: PointerLifecyclePhase::PointerDown,
            pointer_id: Some(pointer_id),
            kind: Some(kind),
            slot,
            position: Some(position),
        };
        if pointer_id == 0 {
            return PointerDispatch::ignored(context, PointerIgnoredReason::InvalidPointerId);
        }
        if button != self.config.activation_button {
            return PointerDispatch::ignored(context, PointerIgnoredReason::ButtonNotAllowed);
        }
        if self.active.is_some() {
            return PointerDispatch::ignored(
                context,
                PointerIgnoredReason::ActivePointerAlreadyInProgress,
            );
        }
        let Some(source) = slot else {
            return PointerDispatch::ignored(context, PointerIgnoredReason::NoSlotUnderPointer);
        };

        let transition = self.controller.begin(source, kind);
        if matches!(transition.effect, DragSwapEffect::Noop { .. }) {
            return PointerDispatch::ignored(context, PointerIgnoredReason::ControllerRejected);
        }
        self.active = Some(ActivePointer {
            pointer_id,
            kind,
            last_position: position,
        });
        PointerDispatch::forwarded(context, transition)
    }

    /// Pointer or touch moved.
    pub fn pointer_move(
        &mut self,
        pointer_id: u32,
        position: PointerPosition,
        element: Option<SlotId>,
    ) -> PointerDispatch {
        let Some(mut active) = self.active else {
            return PointerDispatch::ignored(
                DispatchContext {
                    phase: PointerLifecyclePhase::PointerMove,
                    pointer_id: Some(pointer_id),
                    kind: None,
                    slot: element,
                    position: Some(position),
                },
                PointerIgnoredReason::NoActivePointer,
            );
        };
        let slot = self.resolve(active.kind, position, element);
        let context = DispatchContext {
            phase: PointerLifecyclePhase::PointerMove,
            pointer_id: Some(pointer_id),
            kind: Some(active.kind),
            slot,
            position: Some(position),
        };
        if active.pointer_id != pointer_id {
            return PointerDispatch::ignored(context, PointerIgnoredReason::PointerMismatch);
        }

        active.last_position = position;
        self.active = Some(active);
        let transition = self.controller.hover(slot);
        PointerDispatch::forwarded(context, transition)
    }

    /// Button release or touch end. Swaps through `sink` when dropped on
    /// another slot.
    pub fn pointer_up<S: SlotSwap + ?Sized>(
        &mut self,
        pointer_id: u32,
        position: PointerPosition,
        element: Option<SlotId>,
        sink: &mut S,
    ) -> PointerDispatch {
        let Some(active) = self.active else {
            return PointerDispatch::ignored(
                DispatchContext {
                    phase: PointerLifecyclePhase::PointerUp,
                    pointer_id: Some(pointer_id),
                    kind: None,
                    slot: element,
                    position: Some(position),
                },
                PointerIgnoredReason::NoActivePointer,
            );
        };
        // Touch end reports no element under the finger and its position is
        // where the contact lifted; the hover target tracked by the last move
        // decides the drop.
        let release = match active.kind {
            PointerKind::Mouse => self.resolve(active.kind, position, element),
            PointerKind::Touch | PointerKind::Pen => None,
        };
        let context = DispatchContext {
            phase: PointerLifecyclePhase::PointerUp,
            pointer_id: Some(pointer_id),
            kind: Some(active.kind),
            slot: release,
            position: Some(position),
        };
        if active.pointer_id != pointer_id {
            return PointerDispatch::ignored(context, PointerIgnoredReason::PointerMismatch);
        }

        self.active = None;
        let transition = self.controller.end(release, sink);
        PointerDispatch::forwarded(context, transition)
    }

    /// Browser `pointercancel` / `touchcancel`.
    pub fn pointer_cancel(&mut self, pointer_id: Option<u32>) -> PointerDispatch {
        let reason = match self.active.map(|a| a.kind) {
            Some(PointerKind::Touch) => DragCancelReason::TouchCancel,
            _ => DragCancelReason::PointerCancel,
        };
        self.cancel_active(PointerLifecyclePhase::PointerCancel, pointer_id, reason)
    }

    /// Pointer left the grid viewport.
    pub fn pointer_leave(&mut self, pointer_id: u32) -> PointerDispatch {
        if self.config.cancel_on_leave {
            return self.cancel_active(
                PointerLifecyclePhase::PointerLeave,
                Some(pointer_id),
                DragCancelReason::LeftViewport,
            );
        }
        let Some(active) = self.active else {
            return PointerDispatch::ignored(
                Self::bare_context(PointerLifecyclePhase::PointerLeave, Some(pointer_id)),
                PointerIgnoredReason::NoActivePointer,
            );
        };
        let context = DispatchContext {
            phase: PointerLifecyclePhase::PointerLeave,
            pointer_id: Some(pointer_id),
            kind: Some(active.kind),
            slot: None,
            position: Some(active.last_position),
        };
        if active.pointer_id != pointer_id {
            return PointerDispatch::ignored(context, PointerIgnoredReason::PointerMismatch);
        }
        let transition = self.controller.hover(None);
        PointerDispatch::forwarded(context, transition)
    }

    /// Window lost focus.
    pub fn blur(&mut self) -> PointerDispatch {
        self.cancel_active(PointerLifecyclePhase::Blur, None, DragCancelReason::Blur)
    }

    /// Page became hidden.
    pub fn visibility_hidden(&mut self) -> PointerDispatch {
        self.cancel_active(
            PointerLifecyclePhase::VisibilityHidden,
            None,
            DragCancelReason::Hidden,
        )
    }

    fn bare_context(phase: PointerLifecyclePhase, pointer_id: Option<u32>) -> DispatchContext {
        DispatchContext {
            phase,
            pointer_id,
            kind: None,
            slot: None,
            position: None,
        }
    }

    fn cancel_active(
        &mut self,
        phase: PointerLifecyclePhase,
        pointer_id: Option<u32>,
        reason: DragCancelReason,
    ) -> PointerDispatch {
        let Some(active) = self.active else {
            return PointerDispatch::ignored(
                Self::bare_context(phase, pointer_id),
                PointerIgnoredReason::NoActivePointer,
            );
        };
        let context = DispatchContext {
            phase,
            pointer_id: Some(active.pointer_id),
            kind: Some(active.kind),
            slot: None,
            position: Some(active.last_position),
        };
        if let Some(id) = pointer_id
            && id != active.pointer_id
        {
            return PointerDispatch::ignored(
                DispatchContext {
                    pointer_id: Some(id),
                    ..context
                },
                PointerIgnoredReason::PointerMismatch,
            );
        }

        self.active = None;
        let transition = self.controller.cancel(reason);
        PointerDispatch::forwarded(context, transition)
    }
}
