//! Cached page elements and rendering
//!
//! Elements are looked up once when the form mounts. Rendering writes the
//! model's status (loading, button, banners, file label) back to the page.
//! Field values are only written when they differ from the input, so typing
//! never loses the caret position.

use report_form_core::{DropZoneStyle, FieldId, ReportForm};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, File, HtmlButtonElement, HtmlElement, HtmlFormElement, HtmlInputElement,
    HtmlTextAreaElement,
};

pub const FORM_ID: &str = "reportForm";
pub const FILE_INPUT_ID: &str = "image";
pub const FILE_LABEL_ID: &str = "fileLabel";
pub const SUBMIT_BUTTON_ID: &str = "submitBtn";
pub const LOADING_ID: &str = "loading";
pub const SUCCESS_BANNER_ID: &str = "successMessage";
pub const ERROR_BANNER_ID: &str = "errorMessage";
pub const HEADING_ID: &str = "webTitle";
pub const SUBHEADING_ID: &str = "webSubTitle";

const ACTIVE_CLASS: &str = "active";
const FILE_SELECTED_CLASS: &str = "file-selected";

/// Handles to every element the form touches
pub struct PageElements {
    pub form: HtmlFormElement,
    pub fields: Vec<(FieldId, HtmlElement)>,
    pub file_input: HtmlInputElement,
    pub file_label: HtmlElement,
    pub submit_button: HtmlButtonElement,
    pub loading: Element,
    pub success_banner: HtmlElement,
    pub error_banner: HtmlElement,
    pub heading: Option<Element>,
    pub subheading: Option<Element>,
}

impl PageElements {
    /// Look up all elements; headings are optional, everything else is required
    pub fn locate(document: &Document) -> Result<Self, JsValue> {
        let fields = FieldId::ALL
            .into_iter()
            .map(|field| Ok((field, require(document, field.element_id())?)))
            .collect::<Result<Vec<_>, JsValue>>()?;

        Ok(Self {
            form: require(document, FORM_ID)?,
            fields,
            file_input: require(document, FILE_INPUT_ID)?,
            file_label: require(document, FILE_LABEL_ID)?,
            submit_button: require(document, SUBMIT_BUTTON_ID)?,
            loading: require(document, LOADING_ID)?,
            success_banner: require(document, SUCCESS_BANNER_ID)?,
            error_banner: require(document, ERROR_BANNER_ID)?,
            heading: document.get_element_by_id(HEADING_ID),
            subheading: document.get_element_by_id(SUBHEADING_ID),
        })
    }

    pub fn field(&self, field: FieldId) -> Option<&HtmlElement> {
        self.fields
            .iter()
            .find(|(id, _)| *id == field)
            .map(|(_, element)| element)
    }

    /// First file in the picker, if any
    pub fn picked_file(&self) -> Option<File> {
        self.file_input.files().and_then(|files| files.get(0))
    }

    pub fn clear_file_input(&self) {
        self.file_input.set_value("");
    }

    /// Native form reset; also clears the file input
    pub fn reset_form(&self) {
        self.form.reset();
    }

    pub fn apply_drop_style(&self, style: DropZoneStyle) -> Result<(), JsValue> {
        let css = self.file_label.style();
        css.set_property("background", style.background)?;
        css.set_property("border-color", style.border_color)?;
        Ok(())
    }

    /// Write one field value, leaving the input alone when it already matches
    pub fn render_field(&self, field: FieldId, value: &str) {
        if let Some(element) = self.field(field) {
            if read_value(element) != value {
                write_value(element, value);
            }
        }
    }

    pub fn render_headings<H>(&self, form: &ReportForm<H>) {
        if let (Some(element), Some(text)) = (&self.heading, form.heading()) {
            element.set_text_content(Some(text));
        }
        if let (Some(element), Some(text)) = (&self.subheading, form.subheading()) {
            element.set_text_content(Some(text));
        }
    }

    /// Loading indicator, submit button, banners and file label
    pub fn render_status<H>(&self, form: &ReportForm<H>) -> Result<(), JsValue> {
        set_class(&self.loading, ACTIVE_CLASS, form.is_loading())?;
        self.submit_button.set_disabled(!form.submit_enabled());

        let banners = form.banners();
        set_visible(&self.success_banner, banners.success_visible())?;
        match banners.error_text() {
            Some(text) => {
                self.error_banner.set_text_content(Some(&text));
                set_visible(&self.error_banner, true)?;
            }
            None => set_visible(&self.error_banner, false)?,
        }

        let intake = form.intake();
        self.file_label.set_text_content(Some(&intake.label_text()));
        set_class(&self.file_label, FILE_SELECTED_CLASS, intake.is_selected())?;
        Ok(())
    }
}

fn require<T: JsCast>(document: &Document, id: &str) -> Result<T, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("Missing element #{}", id)))?
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("Element #{} has an unexpected type", id)))
}

/// Value of an `<input>` or `<textarea>`
pub fn read_value(element: &HtmlElement) -> String {
    if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
        input.value()
    } else if let Some(area) = element.dyn_ref::<HtmlTextAreaElement>() {
        area.value()
    } else {
        element.text_content().unwrap_or_default()
    }
}

pub fn write_value(element: &HtmlElement, value: &str) {
    if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
        input.set_value(value);
    } else if let Some(area) = element.dyn_ref::<HtmlTextAreaElement>() {
        area.set_value(value);
    } else {
        element.set_text_content(Some(value));
    }
}

fn set_class(element: &Element, class: &str, on: bool) -> Result<(), JsValue> {
    let classes = element.class_list();
    if on {
        classes.add_1(class)
    } else {
        classes.remove_1(class)
    }
}

fn set_visible(element: &HtmlElement, visible: bool) -> Result<(), JsValue> {
    element
        .style()
        .set_property("display", if visible { "block" } else { "none" })
}
