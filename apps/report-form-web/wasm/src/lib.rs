//! WASM controller for the activity report page
//!
//! Rust owns all form state; the page only provides the markup. Mounting
//! looks up the form elements, resolves the PDF service from `?api=`,
//! prefills fields from the query string and checks the service health.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { mount, mountWithConfig } from './pkg/report_form_wasm.js';
//!
//! await init();
//!
//! // Keep the handle: dropping it removes the page listeners
//! const app = mount();
//! console.log(app.target, app.state);
//!
//! // Or override limits and delays
//! const custom = mountWithConfig(JSON.stringify({ max_attachment_mib: 5 }));
//! ```

pub mod controller;
pub mod dom;
pub mod download;
pub mod http;
pub mod logging;
pub mod timers;

use controller::ReportFormController;
use dom::PageElements;
use gloo_events::EventListener;
use report_form_core::{FormConfig, PageLoad, SubmissionState};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

/// Initialize the WASM module
/// Called automatically by wasm-bindgen
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    logging::init();
}

/// Get the library version
#[wasm_bindgen(js_name = getVersion)]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// A mounted report form
#[wasm_bindgen]
pub struct ReportFormApp {
    controller: Rc<ReportFormController>,
    _listeners: Vec<EventListener>,
}

#[wasm_bindgen]
impl ReportFormApp {
    /// Base URL of the PDF service
    #[wasm_bindgen(getter)]
    pub fn target(&self) -> String {
        self.controller.target().base().to_string()
    }

    /// `idle`, `submitting`, `success` or `error`
    #[wasm_bindgen(getter)]
    pub fn state(&self) -> String {
        self.controller
            .with_form(|form| state_name(form.state()))
            .to_string()
    }

    /// Message of the current submission error, if any
    #[wasm_bindgen(getter, js_name = errorMessage)]
    pub fn error_message(&self) -> Option<String> {
        self.controller.with_form(|form| match form.state() {
            SubmissionState::Error(message) => Some(message.clone()),
            _ => None,
        })
    }
}

/// Mount on the current page with the default configuration
#[wasm_bindgen]
pub fn mount() -> Result<ReportFormApp, JsValue> {
    mount_with(FormConfig::default())
}

/// Mount with a JSON [`FormConfig`]; missing keys keep their defaults
#[wasm_bindgen(js_name = mountWithConfig)]
pub fn mount_with_config(json: &str) -> Result<ReportFormApp, JsValue> {
    let config = FormConfig::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    mount_with(config)
}

fn mount_with(config: FormConfig) -> Result<ReportFormApp, JsValue> {
    let window = web_sys::window().ok_or("No window")?;
    let document = window.document().ok_or("No document")?;
    let search = window.location().search()?;

    let load = PageLoad::from_search(&search, &config);
    tracing::info!(api = %load.target, "PDF service target");

    let elements = PageElements::locate(&document)?;
    let controller = ReportFormController::new(elements, load.target, config);
    let listeners = controller.attach();

    spawn_local(Rc::clone(&controller).load(load.prefill));

    Ok(ReportFormApp {
        controller,
        _listeners: listeners,
    })
}

fn state_name(state: &SubmissionState) -> &'static str {
    match state {
        SubmissionState::Idle => "idle",
        SubmissionState::Submitting => "submitting",
        SubmissionState::Success => "success",
        SubmissionState::Error(_) => "error",
    }
}
