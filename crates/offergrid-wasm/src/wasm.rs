#![forbid(unsafe_code)]

//! `wasm-bindgen` exports for the OfferGridRunner.
//!
//! This module wraps [`super::runner_core::RunnerCore`] with JS-friendly types.
//! Only compiled on `wasm32` targets.

use js_sys::{Array, Object, Reflect, Uint32Array};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use super::local_storage::LocalStorage;
use super::runner_core::{DispatchSummary, RunnerCore, element_slot, pointer_kind_from_u8};
use offergrid_core::{PointerButton, PointerPosition};
use offergrid_layout::FlowDirection;
use offergrid_runtime::{MemoryStorage, StorageBackend};

fn console_error(msg: &str) {
    let global = js_sys::global();
    let Ok(console) = Reflect::get(&global, &"console".into()) else {
        return;
    };
    let Ok(error) = Reflect::get(&console, &"error".into()) else {
        return;
    };
    let Ok(error_fn) = error.dyn_into::<js_sys::Function>() else {
        return;
    };
    let _ = error_fn.call1(&console, &JsValue::from_str(msg));
}

fn install_panic_hook() {
    use std::sync::Once;

    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        std::panic::set_hook(Box::new(|info| {
            let msg = if let Some(loc) = info.location() {
                format!(
                    "panic at {}:{}:{}: {info}",
                    loc.file(),
                    loc.line(),
                    loc.column()
                )
            } else {
                format!("panic: {info}")
            };
            console_error(&msg);
        }));
    });
}

fn set_js(obj: &Object, key: &str, value: JsValue) {
    let _ = Reflect::set(obj, &JsValue::from_str(key), &value);
}

fn optional_str(value: Option<&str>) -> JsValue {
    value.map_or(JsValue::NULL, JsValue::from_str)
}

fn optional_slot(slot: Option<u8>) -> JsValue {
    slot.map_or(JsValue::NULL, |s| JsValue::from_f64(f64::from(s)))
}

fn summary_to_js(summary: DispatchSummary) -> JsValue {
    let obj = Object::new();
    set_js(&obj, "phase", JsValue::from_str(summary.phase));
    set_js(&obj, "accepted", JsValue::from_bool(summary.accepted));
    set_js(&obj, "ignored_reason", optional_str(summary.ignored_reason));
    set_js(&obj, "effect", optional_str(summary.effect));
    set_js(&obj, "swapped", JsValue::from_bool(summary.swapped));
    set_js(&obj, "source", optional_slot(summary.source));
    set_js(&obj, "hover", optional_slot(summary.hover));
    obj.into()
}

fn pick_backend() -> Box<dyn StorageBackend> {
    let local = LocalStorage::from_global();
    if local.is_available() {
        Box::new(local)
    } else {
        console_error("offergrid: localStorage unavailable, layout will not persist");
        Box::new(MemoryStorage::new())
    }
}

/// Offers grid runner for browser hosts.
///
/// The host owns the DOM: it forwards pointer events with the slot under the
/// event target (`-1` when none), then re-renders from [`Self::layout`].
#[wasm_bindgen]
pub struct OfferGridRunner {
    inner: RunnerCore,
}

#[wasm_bindgen(start)]
pub fn wasm_start() {
    install_panic_hook();
}

#[wasm_bindgen]
impl OfferGridRunner {
    /// Create a runner from an optional JSON config and load the persisted
    /// assignment. Throws on an invalid config.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<OfferGridRunner, JsValue> {
        install_panic_hook();
        let inner = RunnerCore::new(config_json.as_deref(), pick_backend())
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self { inner })
    }

    /// Replace the content list with a JSON array of `{ id, title, ... }`.
    #[wasm_bindgen(js_name = setItems)]
    pub fn set_items(&mut self, json: &str) -> bool {
        self.inner.set_items_json(json)
    }

    #[wasm_bindgen(js_name = setRtl)]
    pub fn set_rtl(&mut self, rtl: bool) -> bool {
        self.inner.set_direction(FlowDirection::from_rtl(rtl))
    }

    /// Derive direction from `document.documentElement.lang` or similar.
    #[wasm_bindgen(js_name = setLocale)]
    pub fn set_locale(&mut self, tag: &str) -> bool {
        self.inner.set_locale(tag)
    }

    #[wasm_bindgen(js_name = setMetrics)]
    pub fn set_metrics(&mut self, cell_width: u32, cell_height: u32, gap: u32) {
        self.inner.set_metrics(cell_width, cell_height, gap);
    }

    /// `kind`: `0` = mouse, `1` = touch, `2` = pen.
    /// `button`: DOM `PointerEvent.button`.
    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(
        &mut self,
        pointer_id: u32,
        kind: u8,
        button: i16,
        x: i32,
        y: i32,
        element: i32,
    ) -> JsValue {
        let Some(kind) = pointer_kind_from_u8(kind) else {
            return summary_to_js(self.inner.reject("pointer_down", "unsupported_kind"));
        };
        let Some(button) = PointerButton::from_dom(button) else {
            return summary_to_js(self.inner.reject("pointer_down", "button_not_allowed"));
        };
        summary_to_js(self.inner.pointer_down(
            pointer_id,
            kind,
            button,
            PointerPosition::new(x, y),
            element_slot(element),
        ))
    }

    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, pointer_id: u32, x: i32, y: i32, element: i32) -> JsValue {
        summary_to_js(self.inner.pointer_move(
            pointer_id,
            PointerPosition::new(x, y),
            element_slot(element),
        ))
    }

    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&mut self, pointer_id: u32, x: i32, y: i32, element: i32) -> JsValue {
        summary_to_js(self.inner.pointer_up(
            pointer_id,
            PointerPosition::new(x, y),
            element_slot(element),
        ))
    }

    /// `pointercancel` or `touchcancel`; pass `undefined` when the event
    /// carries no pointer id.
    #[wasm_bindgen(js_name = pointerCancel)]
    pub fn pointer_cancel(&mut self, pointer_id: Option<u32>) -> JsValue {
        summary_to_js(self.inner.pointer_cancel(pointer_id))
    }

    #[wasm_bindgen(js_name = pointerLeave)]
    pub fn pointer_leave(&mut self, pointer_id: u32) -> JsValue {
        summary_to_js(self.inner.pointer_leave(pointer_id))
    }

    pub fn blur(&mut self) -> JsValue {
        summary_to_js(self.inner.blur())
    }

    #[wasm_bindgen(js_name = visibilityHidden)]
    pub fn visibility_hidden(&mut self) -> JsValue {
        summary_to_js(self.inner.visibility_hidden())
    }

    /// Layout snapshot as a JSON string, or `null` if it failed to serialize.
    pub fn layout(&self) -> Option<String> {
        match self.inner.layout_json() {
            Ok(json) => Some(json),
            Err(e) => {
                console_error(&format!("offergrid: layout serialization failed: {e}"));
                None
            }
        }
    }

    /// Content index per slot.
    pub fn assignment(&self) -> Uint32Array {
        Uint32Array::from(self.inner.assignment().as_slice())
    }

    /// `persisted`, `missing`, or `recovered`.
    #[wasm_bindgen(js_name = loadSource)]
    pub fn load_source(&self) -> String {
        self.inner.grid().load_source().as_str().to_owned()
    }

    #[wasm_bindgen(js_name = isDragging)]
    pub fn is_dragging(&self) -> bool {
        self.inner.grid().drag_state().is_dragging()
    }

    /// Drain dispatch log lines.
    #[wasm_bindgen(js_name = takeLogs)]
    pub fn take_logs(&mut self) -> Array {
        let logs = self.inner.take_logs();
        let arr = Array::new();
        for log in logs {
            arr.push(&JsValue::from_str(&log));
        }
        arr
    }
}
