#![forbid(unsafe_code)]

//! Drag-to-swap lifecycle machine.
//!
//! ```text
//!            begin(source)                 end(release) / cancel
//!   Idle ───────────────────▶ Dragging ─────────────────────────▶ Idle
//!                              │    ▲
//!                              └────┘ hover(slot)
//! ```
//!
//! The machine never mutates content by itself. A completed drop calls
//! [`SlotSwap::swap_slots`] on the sink handed to [`DragSwapController::end`]
//! exactly once, and only when the drop target is a known slot different from
//! the source. Hover updates never swap.
//!
//! Every call returns a [`DragSwapTransition`]; ignored inputs produce a
//! [`DragSwapEffect::Noop`] whose `from` and `to` states are equal.

use offergrid_core::PointerKind;
use offergrid_layout::SlotId;
use offergrid_runtime::{SlotSwap, SwapOutcome};

/// Lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragSwapState {
    #[default]
    Idle,
    Dragging {
        source: SlotId,
        /// Slot under the pointer; never equal to `source`.
        hover: Option<SlotId>,
        kind: PointerKind,
    },
}

impl DragSwapState {
    #[must_use]
    pub const fn source(self) -> Option<SlotId> {
        match self {
            Self::Idle => None,
            Self::Dragging { source, .. } => Some(source),
        }
    }

    #[must_use]
    pub const fn hover(self) -> Option<SlotId> {
        match self {
            Self::Idle => None,
            Self::Dragging { hover, .. } => hover,
        }
    }

    #[must_use]
    pub const fn is_dragging(self) -> bool {
        matches!(self, Self::Dragging { .. })
    }
}

/// Why a gesture was abandoned without a drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragCancelReason {
    /// Browser `pointercancel`.
    PointerCancel,
    /// Touch sequence interrupted (`touchcancel`).
    TouchCancel,
    /// Pointer left the grid viewport.
    LeftViewport,
    /// Window lost focus.
    Blur,
    /// Page became hidden.
    Hidden,
    /// Host-initiated cancel.
    Programmatic,
}

impl DragCancelReason {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PointerCancel => "pointer_cancel",
            Self::TouchCancel => "touch_cancel",
            Self::LeftViewport => "left_viewport",
            Self::Blur => "blur",
            Self::Hidden => "hidden",
            Self::Programmatic => "programmatic",
        }
    }
}

/// Explicit diagnostics for inputs the machine ignores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragSwapNoopReason {
    IdleWithoutActiveDrag,
    ActiveDragAlreadyInProgress,
    UnknownSlot,
    HoverUnchanged,
}

/// What one transition did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragSwapEffect {
    /// A tile was picked up.
    Lifted { source: SlotId, kind: PointerKind },
    /// The drop target under the pointer changed.
    HoverChanged {
        source: SlotId,
        previous: Option<SlotId>,
        current: Option<SlotId>,
    },
    /// Dropped on another slot; `outcome` is what the sink reported.
    Dropped {
        source: SlotId,
        target: SlotId,
        outcome: SwapOutcome,
    },
    /// Released with no target other than the source.
    Released { source: SlotId },
    Canceled {
        source: SlotId,
        reason: DragCancelReason,
    },
    Noop { reason: DragSwapNoopReason },
}

impl DragSwapEffect {
    /// Whether the assignment was changed by this step.
    #[must_use]
    pub const fn swapped(self) -> bool {
        matches!(
            self,
            Self::Dropped {
                outcome: SwapOutcome::Swapped { .. },
                ..
            }
        )
    }
}

/// One controller step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragSwapTransition {
    pub transition_id: u64,
    pub from: DragSwapState,
    pub to: DragSwapState,
    pub effect: DragSwapEffect,
}

/// Turns gesture steps into at most one swap per drag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSwapController {
    state: DragSwapState,
    slot_count: usize,
    transition_counter: u64,
}

impl DragSwapController {
    /// Controller for slots `0..slot_count`.
    #[must_use]
    pub const fn new(slot_count: usize) -> Self {
        Self {
            state: DragSwapState::Idle,
            slot_count,
            transition_counter: 0,
        }
    }

    #[must_use]
    pub const fn state(&self) -> DragSwapState {
        self.state
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.state.is_dragging()
    }

    #[must_use]
    pub const fn slot_count(&self) -> usize {
        self.slot_count
    }

    fn knows(&self, slot: SlotId) -> bool {
        slot.index() < self.slot_count
    }

    /// Start dragging `source`.
    pub fn begin(&mut self, source: SlotId, kind: PointerKind) -> DragSwapTransition {
        if self.state.is_dragging() {
            return self.noop(DragSwapNoopReason::ActiveDragAlreadyInProgress);
        }
        if !self.knows(source) {
            return self.noop(DragSwapNoopReason::UnknownSlot);
        }
        self.step(
            DragSwapState::Dragging {
                source,
                hover: None,
                kind,
            },
            DragSwapEffect::Lifted { source, kind },
        )
    }

    /// Pointer is now over `slot` (`None` when off every tile).
    ///
    /// Hovering the source tile or an unknown slot clears the hover target.
    pub fn hover(&mut self, slot: Option<SlotId>) -> DragSwapTransition {
        let DragSwapState::Dragging {
            source,
            hover: previous,
            kind,
        } = self.state
        else {
            return self.noop(DragSwapNoopReason::IdleWithoutActiveDrag);
        };
        let current = slot.filter(|&s| s != source && self.knows(s));
        if current == previous {
            return self.noop(DragSwapNoopReason::HoverUnchanged);
        }
        self.step(
            DragSwapState::Dragging {
                source,
                hover: current,
                kind,
            },
            DragSwapEffect::HoverChanged {
                source,
                previous,
                current,
            },
        )
    }

    /// Finish the gesture.
    ///
    /// `release` is the slot under the release point when the host knows it;
    /// otherwise the last hover target is used. Always returns to `Idle`.
    pub fn end<S: SlotSwap + ?Sized>(
        &mut self,
        release: Option<SlotId>,
        sink: &mut S,
    ) -> DragSwapTransition {
        let DragSwapState::Dragging { source, hover, .. } = self.state else {
            return self.noop(DragSwapNoopReason::IdleWithoutActiveDrag);
        };
        let _span = tracing::debug_span!(
            target: "offergrid.drag",
            "drop",
            source = %source,
            release = ?release,
            hover = ?hover
        )
        .entered();

        // An unknown release slot defers to the hover target; releasing over
        // the source itself is an explicit put-back.
        let target = release
            .filter(|&t| self.knows(t))
            .or(hover)
            .filter(|&t| t != source);
        let effect = match target {
            Some(target) => DragSwapEffect::Dropped {
                source,
                target,
                outcome: sink.swap_slots(source, target),
            },
            None => DragSwapEffect::Released { source },
        };
        self.step(DragSwapState::Idle, effect)
    }

    /// Abandon the gesture without swapping.
    pub fn cancel(&mut self, reason: DragCancelReason) -> DragSwapTransition {
        let Some(source) = self.state.source() else {
            return self.noop(DragSwapNoopReason::IdleWithoutActiveDrag);
        };
        self.step(
            DragSwapState::Idle,
            DragSwapEffect::Canceled { source, reason },
        )
    }

    /// Reset to `Idle` if active; `None` when already idle.
    pub fn force_cancel(&mut self) -> Option<DragSwapTransition> {
        self.is_active()
            .then(|| self.cancel(DragCancelReason::Programmatic))
    }

    fn noop(&mut self, reason: DragSwapNoopReason) -> DragSwapTransition {
        let transition = self.step(self.state, DragSwapEffect::Noop { reason });
        tracing::trace!(
            target: "offergrid.drag",
            transition_id = transition.transition_id,
            reason = ?reason,
            "drag input ignored"
        );
        transition
    }

    fn step(&mut self, to: DragSwapState, effect: DragSwapEffect) -> DragSwapTransition {
        self.transition_counter = self.transition_counter.saturating_add(1);
        let transition = DragSwapTransition {
            transition_id: self.transition_counter,
            from: self.state,
            to,
            effect,
        };
        self.state = to;
        match effect {
            DragSwapEffect::Noop { .. } => {}
            DragSwapEffect::HoverChanged { .. } => tracing::trace!(
                target: "offergrid.drag",
                transition_id = transition.transition_id,
                effect = ?effect,
                "hover changed"
            ),
            _ => tracing::debug!(
                target: "offergrid.drag",
                transition_id = transition.transition_id,
                effect = ?effect,
                "drag transition"
            ),
        }
        transition
    }
}
