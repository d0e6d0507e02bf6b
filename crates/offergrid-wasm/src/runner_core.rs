#![forbid(unsafe_code)]

//! Platform-independent runner core wrapping [`OfferGrid`].
//!
//! Shared by the wasm-bindgen exports and the native tests. No JS types here:
//! the storage backend is injected and every result is a plain Rust value or
//! a JSON string.

use std::collections::VecDeque;

use offergrid_core::{ContentItem, PointerButton, PointerKind, PointerPosition};
use offergrid_layout::{FlowDirection, GridMetrics, PackError, SlotId};
use offergrid_runtime::{ConfigError, GridConfig, StorageBackend};
use offergrid_web::{
    DragSwapEffect, OfferGrid, PointerDispatch, PointerLogEntry, PointerLogOutcome,
};
use serde::Serialize;

/// Why the runner could not be constructed.
#[derive(Debug)]
pub enum RunnerError {
    Config(ConfigError),
    Pack(PackError),
}

impl std::fmt::Display for RunnerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Pack(e) => write!(f, "layout: {e}"),
        }
    }
}

impl std::error::Error for RunnerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Pack(e) => Some(e),
        }
    }
}

/// Host-facing summary of one dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DispatchSummary {
    pub phase: &'static str,
    pub accepted: bool,
    pub ignored_reason: Option<&'static str>,
    pub effect: Option<&'static str>,
    pub swapped: bool,
    pub source: Option<u8>,
    pub hover: Option<u8>,
}

#[derive(Debug, Serialize)]
struct TileSnapshot<'a> {
    slot: u8,
    size_class: &'static str,
    col: u16,
    row: u16,
    col_span: u16,
    row_span: u16,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    content_index: usize,
    item: Option<&'a ContentItem>,
    lifted: bool,
    drop_target: bool,
}

#[derive(Debug, Serialize)]
struct LayoutSnapshot<'a> {
    direction: FlowDirection,
    columns: u16,
    rows: u16,
    width: u32,
    height: u32,
    tiles: Vec<TileSnapshot<'a>>,
}

/// Map the JS-side pointer kind code (`0` mouse, `1` touch, `2` pen).
#[must_use]
pub fn pointer_kind_from_u8(kind: u8) -> Option<PointerKind> {
    match kind {
        0 => Some(PointerKind::Mouse),
        1 => Some(PointerKind::Touch),
        2 => Some(PointerKind::Pen),
        _ => None,
    }
}

/// Map a DOM slot attribute; negative means "no element".
#[must_use]
pub fn element_slot(raw: i32) -> Option<SlotId> {
    u8::try_from(raw).ok().map(SlotId::new)
}

fn effect_label(effect: DragSwapEffect) -> &'static str {
    match effect {
        DragSwapEffect::Lifted { .. } => "lifted",
        DragSwapEffect::HoverChanged { .. } => "hover_changed",
        DragSwapEffect::Dropped { .. } => "dropped",
        DragSwapEffect::Released { .. } => "released",
        DragSwapEffect::Canceled { .. } => "canceled",
        DragSwapEffect::Noop { .. } => "noop",
    }
}

fn format_log_entry(log: PointerLogEntry) -> String {
    let dash = || "-".to_owned();
    let pointer_id = log.pointer_id.map_or_else(dash, |id| id.to_string());
    let slot = log.slot.map_or_else(dash, |s| s.get().to_string());
    let (x, y) = log
        .position
        .map_or_else(|| (dash(), dash()), |p| (p.x.to_string(), p.y.to_string()));
    let kind = match log.kind {
        Some(PointerKind::Mouse) => "mouse",
        Some(PointerKind::Touch) => "touch",
        Some(PointerKind::Pen) => "pen",
        None => "-",
    };
    let outcome = match log.outcome {
        PointerLogOutcome::Forwarded => "forwarded".to_owned(),
        PointerLogOutcome::Ignored(reason) => format!("ignored:{}", reason.as_str()),
    };
    format!(
        "grid_pointer phase={} pointer={pointer_id} kind={kind} slot={slot} x={x} y={y} outcome={outcome}",
        log.phase.as_str()
    )
}

/// Log lines kept between drains; older lines are dropped first.
const MAX_LOG_LINES: usize = 256;

/// Platform-independent offers grid runner.
pub struct RunnerCore {
    grid: OfferGrid<Box<dyn StorageBackend>>,
    items: Vec<ContentItem>,
    logs: VecDeque<String>,
}

#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
impl RunnerCore {
    /// Build from an optional JSON config and an injected storage backend.
    pub fn new(
        config_json: Option<&str>,
        backend: Box<dyn StorageBackend>,
    ) -> Result<Self, RunnerError> {
        let config = match config_json {
            Some(json) => GridConfig::from_json_str_validated(json).map_err(RunnerError::Config)?,
            None => GridConfig::default(),
        };
        let grid = OfferGrid::offers(&config, backend).map_err(RunnerError::Pack)?;
        Ok(Self {
            grid,
            items: Vec::new(),
            logs: VecDeque::new(),
        })
    }

    #[must_use]
    pub fn grid(&self) -> &OfferGrid<Box<dyn StorageBackend>> {
        &self.grid
    }

    /// Replace the content list. Returns `false` if `json` is not a list of items.
    pub fn set_items_json(&mut self, json: &str) -> bool {
        match serde_json::from_str::<Vec<ContentItem>>(json) {
            Ok(items) => {
                self.items = items;
                true
            }
            Err(e) => {
                self.push_log(format!("grid_items error={e}"));
                false
            }
        }
    }

    /// Switch direction. Returns `false` if the plan cannot be packed.
    pub fn set_direction(&mut self, direction: FlowDirection) -> bool {
        match self.grid.set_direction(direction) {
            Ok(()) => true,
            Err(e) => {
                self.push_log(format!("grid_direction error={e}"));
                false
            }
        }
    }

    /// Derive direction from a BCP 47 tag such as `ar-EG`.
    pub fn set_locale(&mut self, tag: &str) -> bool {
        self.set_direction(FlowDirection::from_locale_tag(tag))
    }

    pub fn set_metrics(&mut self, cell_width: u32, cell_height: u32, gap: u32) {
        self.grid
            .set_metrics(GridMetrics::new(cell_width, cell_height, gap));
    }

    pub fn pointer_down(
        &mut self,
        pointer_id: u32,
        kind: PointerKind,
        button: PointerButton,
        position: PointerPosition,
        element: Option<SlotId>,
    ) -> DispatchSummary {
        let dispatch = self
            .grid
            .pointer_down(pointer_id, kind, button, position, element);
        self.record(dispatch)
    }

    pub fn pointer_move(
        &mut self,
        pointer_id: u32,
        position: PointerPosition,
        element: Option<SlotId>,
    ) -> DispatchSummary {
        let dispatch = self.grid.pointer_move(pointer_id, position, element);
        self.record(dispatch)
    }

    pub fn pointer_up(
        &mut self,
        pointer_id: u32,
        position: PointerPosition,
        element: Option<SlotId>,
    ) -> DispatchSummary {
        let dispatch = self.grid.pointer_up(pointer_id, position, element);
        self.record(dispatch)
    }

    pub fn pointer_cancel(&mut self, pointer_id: Option<u32>) -> DispatchSummary {
        let dispatch = self.grid.pointer_cancel(pointer_id);
        self.record(dispatch)
    }

    pub fn pointer_leave(&mut self, pointer_id: u32) -> DispatchSummary {
        let dispatch = self.grid.pointer_leave(pointer_id);
        self.record(dispatch)
    }

    pub fn blur(&mut self) -> DispatchSummary {
        let dispatch = self.grid.blur();
        self.record(dispatch)
    }

    pub fn visibility_hidden(&mut self) -> DispatchSummary {
        let dispatch = self.grid.visibility_hidden();
        self.record(dispatch)
    }

    /// Summary for input the host could not decode (unknown kind or button).
    pub fn reject(&mut self, phase: &'static str, reason: &'static str) -> DispatchSummary {
        self.push_log(format!("grid_pointer phase={phase} outcome=rejected:{reason}"));
        let state = self.grid.drag_state();
        DispatchSummary {
            phase,
            accepted: false,
            ignored_reason: Some(reason),
            effect: None,
            swapped: false,
            source: state.source().map(SlotId::get),
            hover: state.hover().map(SlotId::get),
        }
    }

    fn push_log(&mut self, line: String) {
        if self.logs.len() == MAX_LOG_LINES {
            self.logs.pop_front();
        }
        self.logs.push_back(line);
    }

    fn record(&mut self, dispatch: PointerDispatch) -> DispatchSummary {
        self.push_log(format_log_entry(dispatch.log));
        let state = self.grid.drag_state();
        DispatchSummary {
            phase: dispatch.log.phase.as_str(),
            accepted: matches!(dispatch.log.outcome, PointerLogOutcome::Forwarded),
            ignored_reason: match dispatch.log.outcome {
                PointerLogOutcome::Ignored(reason) => Some(reason.as_str()),
                PointerLogOutcome::Forwarded => None,
            },
            effect: dispatch.transition.map(|t| effect_label(t.effect)),
            swapped: dispatch.swapped(),
            source: state.source().map(SlotId::get),
            hover: state.hover().map(SlotId::get),
        }
    }

    /// Current content index per slot.
    #[must_use]
    pub fn assignment(&self) -> Vec<u32> {
        self.grid
            .assignment()
            .as_slice()
            .iter()
            .map(|&i| u32::try_from(i).unwrap_or(u32::MAX))
            .collect()
    }

    /// Render snapshot as JSON.
    pub fn layout_json(&self) -> serde_json::Result<String> {
        let grid = self.grid.layout();
        let container = self.grid.container_rect();
        let tiles = self
            .grid
            .tiles(&self.items)
            .into_iter()
            .map(|tile| TileSnapshot {
                slot: tile.slot.get(),
                size_class: tile.size_class.label(),
                col: tile.placement.origin_col,
                row: tile.placement.origin_row,
                col_span: tile.placement.col_span,
                row_span: tile.placement.row_span,
                x: tile.rect.x,
                y: tile.rect.y,
                width: tile.rect.width,
                height: tile.rect.height,
                content_index: tile.content_index,
                item: tile.item,
                lifted: tile.lifted,
                drop_target: tile.drop_target,
            })
            .collect();
        serde_json::to_string(&LayoutSnapshot {
            direction: self.grid.direction(),
            columns: grid.columns(),
            rows: grid.rows(),
            width: container.width,
            height: container.height,
            tiles,
        })
    }

    /// Drain structured dispatch logs.
    pub fn take_logs(&mut self) -> Vec<String> {
        self.logs.drain(..).collect()
    }
}
