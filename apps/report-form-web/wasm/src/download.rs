//! Client-side file download

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Blob, HtmlAnchorElement, Url};

/// Save `blob` as `file_name` through a temporary anchor
pub fn trigger_download(blob: &Blob, file_name: &str) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or("No window")?;
    let document = window.document().ok_or("No document")?;
    let body = document.body().ok_or("No document body")?;

    let url = Url::create_object_url_with_blob(blob)?;
    let anchor: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
    anchor.set_href(&url);
    anchor.set_download(file_name);

    body.append_child(&anchor)?;
    anchor.click();
    Url::revoke_object_url(&url)?;
    body.remove_child(&anchor)?;

    tracing::debug!(file_name, size = blob.size(), "Download triggered");
    Ok(())
}
