//! Fire-once `setTimeout` callbacks

use std::time::Duration;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

/// Run `callback` once after `delay`. The timer cannot be cancelled.
pub fn set_timeout(delay: Duration, callback: impl FnOnce() + 'static) -> Result<i32, JsValue> {
    let window = web_sys::window().ok_or("No window")?;
    let callback = Closure::once_into_js(callback);
    let millis = delay.as_millis().min(i32::MAX as u128) as i32;

    window.set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), millis)
}
