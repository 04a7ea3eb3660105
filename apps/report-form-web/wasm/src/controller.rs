//! Event wiring between the page and [`ReportForm`]
//!
//! Every DOM callback holds a `Weak` reference to the controller, takes a
//! short `RefCell` borrow to update the model, then renders. Borrows never
//! live across an `.await`: the multipart body is built inside the borrow
//! and only the owned `FormData` crosses the fetch.
//!
//! The page stays the source of truth for field values. Submit, load and
//! reset all read the inputs back into the model first, so values that
//! changed without an `input` event are still sent.

use crate::dom::{self, PageElements};
use crate::http::{self, build_form_data, js_error_message};
use crate::timers;
use gloo_events::{EventListener, EventListenerOptions};
use report_form_core::{
    Attachment, ConfigTarget, DragPhase, DropZoneStyle, FieldId, FormConfig, FormTimer,
    IntakeSource, PrefillPlan, ReportForm, ReportFormError, SubmitOutcome,
};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{DragEvent, Event, EventTarget, File, FormData};

const DRAG_PHASES: [DragPhase; 4] = [
    DragPhase::Enter,
    DragPhase::Over,
    DragPhase::Leave,
    DragPhase::Drop,
];

pub struct ReportFormController {
    elements: PageElements,
    target: ConfigTarget,
    form: RefCell<ReportForm<File>>,
}

impl ReportFormController {
    pub fn new(elements: PageElements, target: ConfigTarget, config: FormConfig) -> Rc<Self> {
        Rc::new(Self {
            elements,
            target,
            form: RefCell::new(ReportForm::new(config)),
        })
    }

    pub fn target(&self) -> &ConfigTarget {
        &self.target
    }

    /// Read-only access to the model
    pub fn with_form<R>(&self, f: impl FnOnce(&ReportForm<File>) -> R) -> R {
        f(&self.form.borrow())
    }

    /// Register all page listeners. They stay active while the returned
    /// guards are alive.
    pub fn attach(self: &Rc<Self>) -> Vec<EventListener> {
        let mut listeners = Vec::with_capacity(FieldId::ALL.len() + DRAG_PHASES.len() + 2);

        for (field, element) in &self.elements.fields {
            let field = *field;
            listeners.push(self.listen(element, "input", move |c, _| c.sync_field(field)));
        }

        listeners.push(self.listen(&self.elements.file_input, "change", |c, _| {
            c.on_file_change()
        }));

        for phase in DRAG_PHASES {
            listeners.push(self.listen(
                &self.elements.file_label,
                phase.event_type(),
                move |c, event| c.on_drag(phase, event),
            ));
        }

        listeners.push(self.listen(&self.elements.form, "submit", |c, event| {
            c.on_submit(event)
        }));

        tracing::debug!(
            events = ?listeners.iter().map(EventListener::event_type).collect::<Vec<_>>(),
            "Listeners attached"
        );
        listeners
    }

    /// Listeners are non-passive: drag and submit handlers cancel the default.
    fn listen(
        self: &Rc<Self>,
        target: &EventTarget,
        event_type: &'static str,
        handler: impl Fn(&Rc<Self>, &Event) + 'static,
    ) -> EventListener {
        let weak = Rc::downgrade(self);
        EventListener::new_with_options(
            target,
            event_type,
            EventListenerOptions::enable_prevent_default(),
            move |event| {
                if let Some(controller) = weak.upgrade() {
                    handler(&controller, event);
                }
            },
        )
    }

    /// Copy one input into the model, writing it back if it was truncated
    fn sync_field(&self, field: FieldId) {
        let Some(element) = self.elements.field(field) else {
            return;
        };
        let typed = dom::read_value(element);

        let mut form = self.form.borrow_mut();
        let stored = form.input(field, &typed);
        if stored != typed {
            tracing::debug!(field = field.form_name(), "Input truncated");
            dom::write_value(element, stored);
        }
    }

    fn sync_from_page(&self) {
        for field in FieldId::ALL {
            self.sync_field(field);
        }
    }

    fn on_file_change(self: &Rc<Self>) {
        let file = self.elements.picked_file().map(attachment_from);
        let result = self
            .form
            .borrow_mut()
            .offer_file(file, IntakeSource::Picker);

        if let Err(e) = result {
            self.elements.clear_file_input();
            self.show_error(&e);
        }
        self.render();
    }

    fn on_drag(self: &Rc<Self>, phase: DragPhase, event: &Event) {
        event.prevent_default();
        event.stop_propagation();

        if let Err(e) = self
            .elements
            .apply_drop_style(DropZoneStyle::for_phase(phase))
        {
            tracing::warn!(error = ?e, "Could not style the drop zone");
        }

        if phase != DragPhase::Drop {
            return;
        }

        let Some(files) = event
            .dyn_ref::<DragEvent>()
            .and_then(|e| e.data_transfer())
            .and_then(|dt| dt.files())
        else {
            return;
        };
        let Some(file) = files.get(0) else {
            return;
        };

        let result = self
            .form
            .borrow_mut()
            .offer_file(Some(attachment_from(file)), IntakeSource::Drop);

        match result {
            Ok(_) => self.elements.file_input.set_files(Some(&files)),
            Err(e) => self.show_error(&e),
        }
        self.render();
    }

    fn on_submit(self: &Rc<Self>, event: &Event) {
        event.prevent_default();
        let controller = Rc::clone(self);
        spawn_local(async move { controller.submit().await });
    }

    /// Read the page, enter `Submitting` and build the request body.
    ///
    /// The inner error is a failure to assemble the `FormData` itself.
    fn prepare_submit(&self) -> Result<Result<FormData, JsValue>, ReportFormError> {
        self.sync_from_page();
        self.form
            .borrow_mut()
            .begin_submit()
            .map(|payload| build_form_data(&payload))
    }

    async fn submit(self: Rc<Self>) {
        let body = match self.prepare_submit() {
            Ok(body) => body,
            Err(ReportFormError::SubmissionInFlight) => return,
            Err(e) => {
                if e.is_validation() {
                    tracing::info!(error = %e, "Submit blocked by validation");
                }
                self.show_error(&e);
                self.render();
                return;
            }
        };

        self.render();

        let outcome = match body {
            Ok(body) => http::post_report(&self.target.generate_pdf_url(), &body).await,
            Err(e) => SubmitOutcome::network_failed(js_error_message(&e)),
        };

        let timers = self.form.borrow_mut().finish_submit(outcome);
        self.render();
        for timer in timers {
            self.schedule(timer);
        }
    }

    /// Take the page's current values, then overwrite only what the URL sets
    fn apply_prefill(&self, plan: &PrefillPlan) {
        self.sync_from_page();
        if !plan.is_empty() {
            tracing::info!(fields = plan.fields.len(), "Prefilling form from URL");
            self.form.borrow_mut().apply_prefill(plan);
        }

        {
            let form = self.form.borrow();
            self.elements.render_headings(&*form);
            for (field, _) in &plan.fields {
                self.elements.render_field(*field, form.fields().get(*field));
            }
        }
        self.render();
    }

    /// Apply the URL prefill, then check the service health
    pub async fn load(self: Rc<Self>, plan: PrefillPlan) {
        self.apply_prefill(&plan);

        let outcome = http::check_health(&self.target.health_url()).await;
        let timer = self.form.borrow_mut().record_health(outcome);
        self.render();
        if let Some(timer) = timer {
            self.schedule(timer);
        }
    }

    fn show_error(self: &Rc<Self>, error: &ReportFormError) {
        let timer = self.form.borrow_mut().show_error(error.to_string());
        self.schedule(timer);
    }

    fn schedule(self: &Rc<Self>, timer: FormTimer) {
        let delay = timer.delay(self.form.borrow().config());
        let weak = Rc::downgrade(self);

        let scheduled = timers::set_timeout(delay, move || {
            if let Some(controller) = weak.upgrade() {
                controller.fire(timer);
            }
        });

        if let Err(e) = scheduled {
            tracing::error!(?timer, error = ?e, "Could not schedule timer");
        }
    }

    fn fire(&self, timer: FormTimer) {
        self.form.borrow_mut().fire(timer);

        if timer == FormTimer::ResetForm {
            // native reset restores the markup defaults; the model follows them
            self.elements.reset_form();
            self.sync_from_page();
            tracing::debug!("Form reset");
        }
        self.render();
    }

    fn render(&self) {
        if let Err(e) = self.elements.render_status(&*self.form.borrow()) {
            tracing::warn!(error = ?e, "Render failed");
        }
    }
}

fn attachment_from(file: File) -> Attachment<File> {
    Attachment::with_handle(file.name(), file.size() as u64, file.type_(), file)
}

#[cfg(target_arch = "wasm32")]
#[cfg(test)]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;
    use report_form_core::QueryParams;
    use web_sys::{
        DataTransfer, Document, DragEventInit, FilePropertyBag, HtmlButtonElement, HtmlElement,
        HtmlInputElement,
    };

    wasm_bindgen_test_configure!(run_in_browser);

    const FIXTURE: &str = r#"
        <h1 id="webTitle"></h1>
        <p id="webSubTitle"></p>
        <form id="reportForm">
            <input id="committeeName">
            <input id="datetimeLocation">
            <input id="organizer">
            <input id="participants">
            <textarea id="activityContent"></textarea>
            <input id="pdfTitle">
            <input id="reviewerName">
            <input id="image" type="file">
            <label id="fileLabel" for="image"></label>
            <button id="submitBtn" type="submit">Submit</button>
        </form>
        <div id="loading"></div>
        <div id="successMessage"></div>
        <div id="errorMessage"></div>
    "#;

    const MIB: u32 = 1024 * 1024;

    fn fixture_with(html: &str) -> Document {
        let document = web_sys::window().unwrap().document().unwrap();
        document.body().unwrap().set_inner_html(html);
        document
    }

    fn fixture() -> Document {
        fixture_with(FIXTURE)
    }

    fn mounted(document: &Document) -> (Rc<ReportFormController>, Vec<EventListener>) {
        let elements = PageElements::locate(document).unwrap();
        let controller =
            ReportFormController::new(elements, ConfigTarget::default(), FormConfig::default());
        let listeners = controller.attach();
        (controller, listeners)
    }

    fn element<T: JsCast>(document: &Document, id: &str) -> T {
        document.get_element_by_id(id).unwrap().dyn_into().unwrap()
    }

    fn file(name: &str, size: u32, mime: &str) -> File {
        let bits = js_sys::Array::of1(&js_sys::Uint8Array::new_with_length(size));
        let options = FilePropertyBag::new();
        options.set_type(mime);
        File::new_with_u8_array_sequence_and_options(&bits, name, &options).unwrap()
    }

    fn transfer(file: &File) -> DataTransfer {
        let transfer = DataTransfer::new().unwrap();
        transfer.items().add_with_file(file).unwrap();
        transfer
    }

    fn drop_on_label(document: &Document, file: &File) {
        let init = DragEventInit::new();
        init.set_data_transfer(Some(&transfer(file)));
        let event = DragEvent::new_with_event_init_dict("drop", &init).unwrap();
        let label: HtmlElement = element(document, "fileLabel");
        label.dispatch_event(&event).unwrap();
    }

    /// Fill the required fields directly, without any input events
    fn fill_required_silently(document: &Document) {
        for (id, value) in [
            ("committeeName", "Acme"),
            ("datetimeLocation", "5/1 10:00, Hall A"),
            ("organizer", "Bob"),
            ("participants", "Five"),
        ] {
            let input: HtmlInputElement = element(document, id);
            input.set_value(value);
        }
        let area: web_sys::HtmlTextAreaElement = element(document, "activityContent");
        area.set_value("Quarterly planning");
    }

    #[wasm_bindgen_test]
    fn test_input_event_truncates_committee_name() {
        let document = fixture();
        let (controller, _listeners) = mounted(&document);

        let input: HtmlInputElement = element(&document, "committeeName");
        input.set_value(&"가".repeat(60));
        input.dispatch_event(&Event::new("input").unwrap()).unwrap();

        assert_eq!(input.value().chars().count(), 50);
        controller.with_form(|form| {
            assert_eq!(form.fields().get(FieldId::CommitteeName).chars().count(), 50);
        });
    }

    #[wasm_bindgen_test]
    fn test_drag_enter_highlights_label() {
        let document = fixture();
        let (_controller, _listeners) = mounted(&document);

        let label: HtmlElement = element(&document, "fileLabel");
        label
            .dispatch_event(&Event::new("dragenter").unwrap())
            .unwrap();
        assert_eq!(
            label.style().get_property_value("border-top-color").unwrap(),
            "rgb(102, 126, 234)"
        );

        label
            .dispatch_event(&Event::new("dragleave").unwrap())
            .unwrap();
        assert_eq!(
            label.style().get_property_value("border-top-color").unwrap(),
            "rgb(222, 226, 230)"
        );
    }

    #[wasm_bindgen_test]
    fn test_listeners_detach_on_drop() {
        let document = fixture();
        let (controller, listeners) = mounted(&document);
        drop(listeners);

        let input: HtmlInputElement = element(&document, "participants");
        input.set_value(&"a".repeat(150));
        input.dispatch_event(&Event::new("input").unwrap()).unwrap();

        assert_eq!(input.value().len(), 150);
        controller.with_form(|form| assert!(form.fields().is_empty()));
    }

    #[wasm_bindgen_test]
    fn test_render_shows_error_banner_and_prompt() {
        let document = fixture();
        let (controller, _listeners) = mounted(&document);

        controller.form.borrow_mut().show_error("PDF 생성 실패");
        controller.render();

        let banner: HtmlElement = element(&document, "errorMessage");
        assert_eq!(banner.text_content().as_deref(), Some("❌ PDF 생성 실패"));
        assert_eq!(banner.style().get_property_value("display").unwrap(), "block");

        let label: HtmlElement = element(&document, "fileLabel");
        assert_eq!(
            label.text_content().as_deref(),
            Some(report_form_core::DEFAULT_PROMPT)
        );
        assert!(!label.class_list().contains("file-selected"));

        let button: HtmlButtonElement = element(&document, "submitBtn");
        assert!(!button.disabled());
    }

    #[wasm_bindgen_test]
    fn test_submit_reads_values_set_without_input_events() {
        let document = fixture();
        let (controller, _listeners) = mounted(&document);

        fill_required_silently(&document);
        let title: HtmlInputElement = element(&document, "pdfTitle");
        title.set_value("모임 활동 기록");

        let body = controller.prepare_submit().unwrap().unwrap();
        assert_eq!(body.get("committee_name").as_string().as_deref(), Some("Acme"));
        assert_eq!(
            body.get("pdf_title").as_string().as_deref(),
            Some("모임 활동 기록")
        );
        assert!(body.get("image").is_null());
    }

    #[wasm_bindgen_test]
    fn test_prefill_keeps_markup_defaults() {
        let document = fixture_with(&FIXTURE.replace(
            r#"<input id="pdfTitle">"#,
            r#"<input id="pdfTitle" value="모임 활동 기록">"#,
        ));
        let (controller, _listeners) = mounted(&document);

        let plan = PrefillPlan::from_query(
            &QueryParams::parse("?committeeName=Acme&webTitle=Report"),
            report_form_core::HEADING_MARKER,
        );
        controller.apply_prefill(&plan);

        let title: HtmlInputElement = element(&document, "pdfTitle");
        let committee: HtmlInputElement = element(&document, "committeeName");
        let heading: HtmlElement = element(&document, "webTitle");
        assert_eq!(title.value(), "모임 활동 기록");
        assert_eq!(committee.value(), "Acme");
        assert_eq!(heading.text_content().as_deref(), Some("📄 Report"));
        controller.with_form(|form| {
            assert_eq!(form.fields().get(FieldId::PdfTitle), "모임 활동 기록");
        });
    }

    #[wasm_bindgen_test]
    fn test_oversized_pick_clears_the_input() {
        let document = fixture();
        let (controller, _listeners) = mounted(&document);

        let input: HtmlInputElement = element(&document, "image");
        let big = file("big.png", 11 * MIB, "image/png");
        input.set_files(transfer(&big).files().as_ref());
        input.dispatch_event(&Event::new("change").unwrap()).unwrap();

        assert_eq!(input.files().map(|f| f.length()), Some(0));
        controller.with_form(|form| assert!(form.intake().pending().is_none()));

        let banner: HtmlElement = element(&document, "errorMessage");
        assert_eq!(
            banner.text_content().as_deref(),
            Some("❌ 파일 크기는 10MB를 초과할 수 없습니다.")
        );
    }

    #[wasm_bindgen_test]
    fn test_accepted_drop_is_mirrored_into_the_input() {
        let document = fixture();
        let (controller, _listeners) = mounted(&document);

        drop_on_label(&document, &file("photo.png", 1024, "image/png"));

        let input: HtmlInputElement = element(&document, "image");
        let picked = input.files().and_then(|f| f.get(0)).map(|f| f.name());
        assert_eq!(picked.as_deref(), Some("photo.png"));

        let label: HtmlElement = element(&document, "fileLabel");
        assert_eq!(
            label.text_content().as_deref(),
            Some("선택된 파일: photo.png (0.00MB)")
        );
        assert!(label.class_list().contains("file-selected"));
        controller.with_form(|form| assert!(form.intake().is_selected()));
    }

    #[wasm_bindgen_test]
    fn test_non_image_drop_is_rejected() {
        let document = fixture();
        let (controller, _listeners) = mounted(&document);

        drop_on_label(&document, &file("notes.txt", 10, "text/plain"));

        let input: HtmlInputElement = element(&document, "image");
        assert_eq!(input.files().map(|f| f.length()), Some(0));
        controller.with_form(|form| assert!(!form.intake().is_selected()));

        let banner: HtmlElement = element(&document, "errorMessage");
        assert_eq!(
            banner.text_content().as_deref(),
            Some("❌ 이미지 파일만 업로드 가능합니다.")
        );
    }

    #[wasm_bindgen_test]
    fn test_second_submit_refused_while_loading() {
        let document = fixture();
        let (controller, _listeners) = mounted(&document);
        fill_required_silently(&document);

        assert!(controller.prepare_submit().is_ok());
        controller.render();

        let loading: web_sys::Element = element(&document, "loading");
        let button: HtmlButtonElement = element(&document, "submitBtn");
        assert!(loading.class_list().contains("active"));
        assert!(button.disabled());

        assert!(matches!(
            controller.prepare_submit(),
            Err(ReportFormError::SubmissionInFlight)
        ));
    }

    #[wasm_bindgen_test]
    fn test_blank_page_blocks_submit() {
        let document = fixture();
        let (controller, _listeners) = mounted(&document);

        let result = controller.prepare_submit();
        assert!(matches!(result, Err(ReportFormError::MissingRequired(_))));
        controller.with_form(|form| assert!(form.submit_enabled()));
    }
}
