//! Calls to the PDF service
//!
//! Both calls map every failure into the core outcome types, so callers
//! never see a raw `JsValue` error.

use crate::download::trigger_download;
use report_form_core::{
    download_file_name, HealthOutcome, SubmissionPayload, SubmitOutcome, IMAGE_PART,
};
use serde_json::Value;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, File, FormData, Request, RequestInit, RequestMode, Response};

/// Build the multipart body for a submission
pub fn build_form_data(payload: &SubmissionPayload<'_, File>) -> Result<FormData, JsValue> {
    let form_data = FormData::new()?;
    for (name, value) in &payload.parts {
        form_data.append_with_str(name, value)?;
    }

    if let Some(image) = payload.image {
        form_data.append_with_blob_and_filename(IMAGE_PART, &image.handle, &image.name)?;
    }

    Ok(form_data)
}

/// POST the report and, on success, download the returned PDF
pub async fn post_report(url: &str, body: &FormData) -> SubmitOutcome {
    match send_report(url, body).await {
        Ok(outcome) => outcome,
        Err(e) => SubmitOutcome::network_failed(js_error_message(&e)),
    }
}

async fn send_report(url: &str, body: &FormData) -> Result<SubmitOutcome, JsValue> {
    let window = web_sys::window().ok_or("No window")?;

    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_mode(RequestMode::Cors);
    opts.set_body(body.as_ref());

    let request = Request::new_with_str_and_init(url, &opts)?;
    let response = JsFuture::from(window.fetch_with_request(&request)).await?;
    let response: Response = response.dyn_into()?;

    if !response.ok() {
        let status = response.status();
        let text = read_text(&response).await;
        tracing::warn!(status, "PDF service rejected the report");
        return Ok(SubmitOutcome::rejected(status, &text));
    }

    let blob = JsFuture::from(response.blob()?).await?;
    let blob: Blob = blob.dyn_into()?;

    let file_name = download_file_name(js_sys::Date::now() as u64);
    trigger_download(&blob, &file_name)?;

    Ok(SubmitOutcome::Downloaded { file_name })
}

/// Response body as text; an unreadable body reads as empty
async fn read_text(response: &Response) -> String {
    let Ok(promise) = response.text() else {
        return String::new();
    };
    JsFuture::from(promise)
        .await
        .ok()
        .and_then(|v| v.as_string())
        .unwrap_or_default()
}

/// Check `GET {target}/health`
pub async fn check_health(url: &str) -> HealthOutcome {
    match fetch_health(url).await {
        Ok(outcome) => outcome,
        Err(e) => HealthOutcome::Unreachable(
            js_error_message(&e).unwrap_or_else(|| "unknown error".to_string()),
        ),
    }
}

async fn fetch_health(url: &str) -> Result<HealthOutcome, JsValue> {
    let window = web_sys::window().ok_or("No window")?;

    let opts = RequestInit::new();
    opts.set_method("GET");
    opts.set_mode(RequestMode::Cors);

    let request = Request::new_with_str_and_init(url, &opts)?;
    let response = JsFuture::from(window.fetch_with_request(&request)).await?;
    let response: Response = response.dyn_into()?;

    if !response.ok() {
        return Ok(HealthOutcome::Unhealthy {
            status: response.status(),
        });
    }

    let json = JsFuture::from(response.json()?).await?;
    let status: Value = serde_wasm_bindgen::from_value(json)?;
    Ok(HealthOutcome::Healthy(status))
}

/// Best human-readable message carried by a JS error value
pub fn js_error_message(error: &JsValue) -> Option<String> {
    if let Some(err) = error.dyn_ref::<js_sys::Error>() {
        return Some(String::from(err.message()));
    }
    error.as_string()
}
