#![forbid(unsafe_code)]

//! `localStorage` backend reached through `js_sys` reflection.
//!
//! The global is looked up once. Reading `globalThis.localStorage` throws in
//! sandboxed frames and some private modes; that, and a missing global, both
//! leave the backend unavailable rather than failing construction.

use js_sys::{Array, Function, Reflect};
use offergrid_runtime::{StorageBackend, StorageError, StorageResult};
use wasm_bindgen::{JsCast, JsValue};

pub struct LocalStorage {
    storage: Option<JsValue>,
}

impl LocalStorage {
    /// Look up `globalThis.localStorage` once.
    pub fn from_global() -> Self {
        let storage = Reflect::get(&js_sys::global(), &JsValue::from_str("localStorage"))
            .ok()
            .filter(|value| !value.is_undefined() && !value.is_null());
        Self { storage }
    }

    fn call(&self, method: &str, args: &Array) -> Result<JsValue, JsValue> {
        let Some(storage) = self.storage.as_ref() else {
            return Err(JsValue::from_str("localStorage is not available"));
        };
        let function = Reflect::get(storage, &JsValue::from_str(method))?
            .dyn_into::<Function>()
            .map_err(|_| JsValue::from_str(&format!("localStorage.{method} is not a function")))?;
        Reflect::apply(&function, storage, args)
    }
}

fn js_error_name(err: &JsValue) -> Option<String> {
    Reflect::get(err, &JsValue::from_str("name"))
        .ok()
        .and_then(|name| name.as_string())
}

fn js_error_message(err: &JsValue) -> String {
    err.as_string()
        .or_else(|| {
            Reflect::get(err, &JsValue::from_str("message"))
                .ok()
                .and_then(|message| message.as_string())
        })
        .unwrap_or_else(|| "unknown error".to_owned())
}

fn unavailable(err: &JsValue) -> StorageError {
    StorageError::Unavailable(js_error_message(err))
}

impl StorageBackend for LocalStorage {
    fn name(&self) -> &str {
        "local_storage"
    }

    fn load(&self, key: &str) -> StorageResult<Option<String>> {
        let value = self
            .call("getItem", &Array::of1(&JsValue::from_str(key)))
            .map_err(|e| unavailable(&e))?;
        Ok(value.as_string())
    }

    fn save(&mut self, key: &str, value: &str) -> StorageResult<()> {
        let args = Array::of2(&JsValue::from_str(key), &JsValue::from_str(value));
        match self.call("setItem", &args) {
            Ok(_) => Ok(()),
            Err(e) if js_error_name(&e).as_deref() == Some("QuotaExceededError") => {
                Err(StorageError::QuotaExceeded {
                    key: key.to_owned(),
                    bytes: key.len() + value.len(),
                    quota: None,
                })
            }
            Err(e) => Err(unavailable(&e)),
        }
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        self.call("removeItem", &Array::of1(&JsValue::from_str(key)))
            .map(|_| ())
            .map_err(|e| unavailable(&e))
    }

    fn is_available(&self) -> bool {
        self.storage.is_some()
    }
}
