//! Errors raised at the browser boundary
//!
//! The simulation itself never fails; only DOM and canvas access can.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum UiError {
    #[error("no global window")]
    NoWindow,
    #[error("window has no document")]
    NoDocument,
    #[error("missing element #{0}")]
    MissingElement(String),
    #[error("canvas has no 2d context")]
    NoCanvasContext,
    #[error("javascript error: {0}")]
    Js(String),
}

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for UiError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        UiError::Js(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
    }
}

#[cfg(target_arch = "wasm32")]
impl From<UiError> for wasm_bindgen::JsValue {
    fn from(err: UiError) -> Self {
        wasm_bindgen::JsValue::from_str(&err.to_string())
    }
}
