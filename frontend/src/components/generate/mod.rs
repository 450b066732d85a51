//! Generation page: pick a template, then either fill the fields for a
//! single certificate or upload a recipient roster for a batch run.
//!
//! Batch jobs run server-side; this component uploads the roster, gets a
//! job id back, and polls the status endpoint until the job completes or
//! fails, driving the progress bar from the `{current, total}` counters.

use std::collections::HashMap;

use common::jobs::JobStatus;
use common::model::batch::BatchReport;
use common::model::field::{Field, FieldContent};
use common::model::template::Template;
use common::requests::{
    BatchStartResponse, ContactInfo, GenerateRequest, GenerateResponse, StartBatchRequest,
};
use gloo_net::http::Request;
use gloo_timers::future::TimeoutFuture;
use web_sys::{FormData, HtmlInputElement, HtmlSelectElement, MouseEvent};
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::toast::show_toast;

const CATEGORY_OPTIONS: [&str; 4] = [
    "Presenter",
    "Keynote Speaker",
    "Listener",
    "Organizing Committee",
];

const INPUT_STYLE: &str =
    "width:100%;padding:10px;background:#0d0b1e;border:1px solid #3a3856;color:#fff;font-size:13px;border-radius:4px;";
const LABEL_STYLE: &str = "font-size:11px;color:#999;margin-bottom:6px;display:block;";

#[derive(Clone, Copy, PartialEq)]
enum GenMode {
    Single,
    Bulk,
}

pub struct GenerateComponent {
    templates: Vec<Template>,
    selected: Option<Template>,
    mode: GenMode,
    values: HashMap<String, String>,
    contact: ContactInfo,
    generating: bool,
    roster: Option<web_sys::File>,
    progress: Option<(u32, u32)>,
    roster_input_ref: NodeRef,
    show_preview_modal: bool,
}

pub enum Msg {
    TemplatesLoaded(Vec<Template>),
    Select(String),
    ClearSelection,
    SetMode(GenMode),
    SetValue(String, String),
    SetEmail(String),
    SetPhone(String),
    TogglePreviewModal,
    Generate,
    GenerateDone(Result<GenerateResponse, String>),
    RosterPicked(web_sys::File),
    StartBatch,
    BatchStarted(Result<BatchStartResponse, String>),
    Status(String, JobStatus),
    BatchFinished(Result<BatchReport, String>),
}

#[derive(Properties, PartialEq, Clone)]
pub struct GenerateProps {
    /// Fired when a batch completes, to move the user on to history.
    pub on_done: Callback<()>,
}

impl Component for GenerateComponent {
    type Message = Msg;
    type Properties = GenerateProps;

    fn create(ctx: &Context<Self>) -> Self {
        let link = ctx.link().clone();
        spawn_local(async move {
            match Request::get("/api/templates").send().await {
                Ok(resp) if resp.status() == 200 => {
                    if let Ok(templates) = resp.json::<Vec<Template>>().await {
                        link.send_message(Msg::TemplatesLoaded(templates));
                    }
                }
                _ => show_toast("Failed to load templates"),
            }
        });
        Self {
            templates: Vec::new(),
            selected: None,
            mode: GenMode::Single,
            values: HashMap::new(),
            contact: ContactInfo::default(),
            generating: false,
            roster: None,
            progress: None,
            roster_input_ref: NodeRef::default(),
            show_preview_modal: false,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::TemplatesLoaded(templates) => {
                self.templates = templates;
                true
            }
            Msg::Select(id) => {
                self.selected = self.templates.iter().find(|t| t.id == id).cloned();
                self.values.clear();
                true
            }
            Msg::ClearSelection => {
                self.selected = None;
                self.values.clear();
                self.roster = None;
                self.progress = None;
                true
            }
            Msg::SetMode(mode) => {
                self.mode = mode;
                true
            }
            Msg::SetValue(field_id, value) => {
                self.values.insert(field_id, value);
                true
            }
            Msg::SetEmail(email) => {
                self.contact.email = email;
                false
            }
            Msg::SetPhone(phone) => {
                self.contact.phone = phone;
                false
            }
            Msg::TogglePreviewModal => {
                self.show_preview_modal = !self.show_preview_modal;
                true
            }
            Msg::Generate => {
                let Some(template) = &self.selected else {
                    return false;
                };
                self.generating = true;
                let payload = GenerateRequest {
                    template_id: template.id.clone(),
                    values: self.values.clone(),
                    contact: self.contact.clone(),
                    save: true,
                };
                let link = ctx.link().clone();
                spawn_local(async move {
                    let result = match Request::post("/api/generate").json(&payload) {
                        Ok(request) => match request.send().await {
                            Ok(resp) if resp.status() == 200 => resp
                                .json::<GenerateResponse>()
                                .await
                                .map_err(|e| e.to_string()),
                            Ok(resp) => Err(resp.text().await.unwrap_or_default()),
                            Err(e) => Err(e.to_string()),
                        },
                        Err(e) => Err(e.to_string()),
                    };
                    link.send_message(Msg::GenerateDone(result));
                });
                true
            }
            Msg::GenerateDone(result) => {
                self.generating = false;
                match result {
                    Ok(response) => {
                        show_toast("Certificate generated");
                        self.contact = ContactInfo::default();
                        if let (Some(window), Some(url)) =
                            (web_sys::window(), response.file_url.as_deref())
                        {
                            let _ = window.open_with_url_and_target(url, "_blank");
                        }
                    }
                    Err(e) => show_toast(&format!("Error generating certificate: {}", e)),
                }
                true
            }
            Msg::RosterPicked(file) => {
                self.roster = Some(file);
                true
            }
            Msg::StartBatch => {
                let (Some(template), Some(file)) = (&self.selected, &self.roster) else {
                    return false;
                };
                let request = StartBatchRequest {
                    template_id: template.id.clone(),
                    contact: self.contact.clone(),
                };
                let Ok(json) = serde_json::to_string(&request) else {
                    return false;
                };
                let Some(form) = FormData::new().ok().and_then(|form| {
                    form.append_with_str("json", &json).ok()?;
                    form.append_with_blob_and_filename("file", file, &file.name())
                        .ok()?;
                    Some(form)
                }) else {
                    show_toast("Could not read the roster file");
                    return false;
                };

                self.generating = true;
                self.progress = None;
                let link = ctx.link().clone();
                spawn_local(async move {
                    let result = match Request::post("/api/generate/batch").body(form) {
                        Ok(request) => match request.send().await {
                            Ok(resp) if resp.status() == 200 => resp
                                .json::<BatchStartResponse>()
                                .await
                                .map_err(|e| e.to_string()),
                            Ok(resp) => Err(resp.text().await.unwrap_or_default()),
                            Err(e) => Err(e.to_string()),
                        },
                        Err(e) => Err(e.to_string()),
                    };
                    link.send_message(Msg::BatchStarted(result));
                });
                true
            }
            Msg::BatchStarted(result) => match result {
                Ok(response) => {
                    self.progress = Some((0, response.total as u32));
                    poll_status(ctx.link().clone(), response.job_id);
                    true
                }
                Err(e) => {
                    self.generating = false;
                    show_toast(&format!("Error starting batch: {}", e));
                    true
                }
            },
            Msg::Status(job_id, status) => match status {
                JobStatus::Pending => {
                    poll_status(ctx.link().clone(), job_id);
                    false
                }
                JobStatus::InProgress { current, total } => {
                    self.progress = Some((current, total));
                    poll_status(ctx.link().clone(), job_id);
                    true
                }
                JobStatus::Completed(payload) => {
                    let report = serde_json::from_str::<BatchReport>(&payload)
                        .map_err(|e| e.to_string());
                    ctx.link().send_message(Msg::BatchFinished(report));
                    false
                }
                JobStatus::Failed(e) => {
                    ctx.link().send_message(Msg::BatchFinished(Err(e)));
                    false
                }
            },
            Msg::BatchFinished(result) => {
                self.generating = false;
                self.roster = None;
                self.progress = None;
                match result {
                    Ok(report) => {
                        show_toast(&report.summary());
                        ctx.props().on_done.emit(());
                    }
                    Err(e) => {
                        gloo_console::error!(format!("batch generation failed: {}", e));
                        show_toast(&format!("Batch failed: {}", e));
                    }
                }
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        html! {
            <div style="padding:36px 40px;">
                <div style="display:flex;justify-content:space-between;align-items:flex-start;">
                    <div>
                        <h1 style="margin:0;font-size:22px;">{"Generate Certificates"}</h1>
                        <p style="color:#999;font-size:13px;">{"Select a template and recipient to create certificates"}</p>
                    </div>
                    {
                        if self.selected.is_some() {
                            html! {
                                <button onclick={link.callback(|_| Msg::ClearSelection)}
                                    style="padding:8px 12px;background:none;border:1px solid #3a3856;color:#ccc;border-radius:4px;cursor:pointer;font-size:12px;">
                                    {"< Change Template"}
                                </button>
                            }
                        } else {
                            html! {}
                        }
                    }
                </div>
                {
                    match &self.selected {
                        None => self.view_template_picker(ctx),
                        Some(template) => html! {
                            <div style="display:grid;grid-template-columns:minmax(350px,450px) 1fr;gap:30px;margin-top:14px;">
                                { self.view_form(ctx, template) }
                                { self.view_preview(ctx, template) }
                            </div>
                        },
                    }
                }
                { self.view_preview_modal(ctx) }
            </div>
        }
    }
}

impl GenerateComponent {
    fn view_template_picker(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let cards = self
            .templates
            .iter()
            .map(|template| {
                let select = {
                    let id = template.id.clone();
                    link.callback(move |_| Msg::Select(id.clone()))
                };
                html! {
                    <div onclick={select}
                        style="background:#16142a;border:1px solid #2a2840;border-radius:10px;overflow:hidden;cursor:pointer;">
                        <div style="height:140px;background:#000;">
                            {
                                match &template.image_url {
                                    Some(url) => html! { <img src={url.clone()} style="width:100%;height:100%;object-fit:contain;" /> },
                                    None => html! {},
                                }
                            }
                        </div>
                        <div style="padding:12px;text-align:center;font-weight:600;font-size:13px;">{ template.name.clone() }</div>
                    </div>
                }
            })
            .collect::<Html>();
        html! {
            <div style="display:grid;grid-template-columns:repeat(auto-fill,minmax(240px,1fr));gap:18px;margin-top:16px;">
                {
                    if self.templates.is_empty() {
                        html! { <div style="grid-column:1/-1;padding:40px;text-align:center;color:#999;">{"No templates found. Please upload one first."}</div> }
                    } else {
                        cards
                    }
                }
            </div>
        }
    }

    fn view_form(&self, ctx: &Context<Self>, template: &Template) -> Html {
        let link = ctx.link();
        let tab = |label: &str, mode: GenMode| {
            let active = self.mode == mode;
            let onclick = link.callback(move |_| Msg::SetMode(mode));
            html! {
                <div {onclick}
                    style={format!("flex:1;text-align:center;padding:10px;font-size:13px;cursor:pointer;border-bottom:2px solid {};{}",
                        if active { "#4F8EF7" } else { "transparent" },
                        if active { "color:#fff;font-weight:700;" } else { "color:#999;" })}>
                    { label }
                </div>
            }
        };

        html! {
            <div style="display:flex;flex-direction:column;gap:16px;">
                <div style="display:flex;border-bottom:1px solid #2a2840;">
                    { tab("Single", GenMode::Single) }
                    { tab("Bulk (Spreadsheet)", GenMode::Bulk) }
                </div>
                {
                    match self.mode {
                        GenMode::Single => self.view_single_form(ctx, template),
                        GenMode::Bulk => self.view_bulk_form(ctx),
                    }
                }
            </div>
        }
    }

    fn view_single_form(&self, ctx: &Context<Self>, template: &Template) -> Html {
        let link = ctx.link();
        let inputs = template
            .fields
            .iter()
            .filter(|f| f.takes_input())
            .map(|field| self.field_input(ctx, field))
            .collect::<Html>();

        let on_email = link.callback(|e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            Msg::SetEmail(input.value())
        });
        let on_phone = link.callback(|e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            Msg::SetPhone(input.value())
        });

        html! {
            <div style="background:#16142a;border-top:2px solid #4F8EF7;border-radius:8px;padding:20px;">
                <h3 style="font-size:14px;margin:0 0 20px;">{"Certificate Information"}</h3>
                { inputs }
                <div style="margin-bottom:15px;">
                    <label style={LABEL_STYLE}>{"Recipient Email"}</label>
                    <input style={INPUT_STYLE} placeholder="Enter Email (optional)" onchange={on_email} />
                </div>
                <div style="margin-bottom:20px;">
                    <label style={LABEL_STYLE}>{"Recipient Phone (WhatsApp)"}</label>
                    <input style={INPUT_STYLE} placeholder="e.g. 919876543210" onchange={on_phone} />
                </div>
                <button onclick={link.callback(|_| Msg::Generate)} disabled={self.generating}
                    style="width:100%;padding:12px;background:#4F8EF7;color:#fff;border:none;border-radius:6px;font-weight:700;cursor:pointer;">
                    { if self.generating { "Generating..." } else { "Generate & Download" } }
                </button>
            </div>
        }
    }

    fn field_input(&self, ctx: &Context<Self>, field: &Field) -> Html {
        let link = ctx.link();
        let field_id = field.id.clone();
        let value = self.values.get(&field.id).cloned().unwrap_or_default();

        // The category field gets the fixed option list, everything else a
        // free text input.
        let control = if field.label.to_lowercase().contains("category") {
            let onchange = link.callback(move |e: Event| {
                let select: HtmlSelectElement = e.target_unchecked_into();
                Msg::SetValue(field_id.clone(), select.value())
            });
            html! {
                <select style={INPUT_STYLE} {onchange}>
                    <option value="" selected={value.is_empty()}>{"Select Category"}</option>
                    {
                        CATEGORY_OPTIONS.iter().map(|option| html! {
                            <option value={option.to_string()} selected={value == *option}>{ *option }</option>
                        }).collect::<Html>()
                    }
                </select>
            }
        } else {
            let onchange = link.callback(move |e: Event| {
                let input: HtmlInputElement = e.target_unchecked_into();
                Msg::SetValue(field_id.clone(), input.value())
            });
            html! {
                <input style={INPUT_STYLE} placeholder={format!("Enter {}", field.label)}
                       value={value} {onchange} />
            }
        };

        html! {
            <div style="margin-bottom:15px;">
                <label style={LABEL_STYLE}>{ field.label.clone() }</label>
                { control }
            </div>
        }
    }

    fn view_bulk_form(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let onchange = link.batch_callback(|e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            match input.files().and_then(|files| files.get(0)) {
                Some(file) => vec![Msg::RosterPicked(file)],
                None => vec![],
            }
        });
        let roster_input_ref = self.roster_input_ref.clone();
        let open_picker = Callback::from(move |_: MouseEvent| {
            if let Some(input) = roster_input_ref.cast::<HtmlInputElement>() {
                input.click();
            }
        });

        html! {
            <div style="background:#16142a;border-radius:8px;padding:24px;text-align:center;">
                <h3 style="margin:0 0 8px;">{"Bulk Generation"}</h3>
                <p style="font-size:12px;color:#999;margin:0 0 20px;">
                    {"Upload a CSV whose column headers match your template field labels. Email/Phone/WhatsApp columns set per-row contact info."}
                </p>
                <label onclick={open_picker}
                    style="display:block;padding:20px;border:1px dashed #3a3856;border-radius:6px;cursor:pointer;color:#ccc;font-size:13px;">
                    {
                        match &self.roster {
                            Some(file) => format!("{} selected", file.name()),
                            None => "Choose roster file".to_string(),
                        }
                    }
                    <input type="file" hidden={true} accept=".csv,text/csv" ref={self.roster_input_ref.clone()} {onchange} />
                </label>
                {
                    match (&self.roster, &self.progress) {
                        (_, Some((current, total))) => {
                            let pct = if *total > 0 { *current as f64 / *total as f64 * 100.0 } else { 0.0 };
                            html! {
                                <div style="margin-top:16px;">
                                    <div style="font-size:11px;color:#999;margin-bottom:8px;display:flex;justify-content:space-between;">
                                        <span>{"Progress"}</span>
                                        <span>{ format!("{} / {}", current, total) }</span>
                                    </div>
                                    <div style="width:100%;height:4px;background:#0d0b1e;border-radius:2px;overflow:hidden;">
                                        <div style={format!("height:100%;background:#4F8EF7;width:{}%;", pct)} />
                                    </div>
                                </div>
                            }
                        }
                        (Some(_), None) => html! {
                            <button onclick={link.callback(|_| Msg::StartBatch)} disabled={self.generating}
                                style="width:100%;margin-top:16px;padding:12px;background:#4F8EF7;color:#fff;border:none;border-radius:6px;font-weight:700;cursor:pointer;">
                                { if self.generating { "Starting..." } else { "Start Generation" } }
                            </button>
                        },
                        _ => html! {},
                    }
                }
            </div>
        }
    }

    /// Live preview: the 1200×848 design canvas scaled down, fields
    /// positioned by their percentage anchors exactly as the export
    /// renders them.
    fn view_preview(&self, ctx: &Context<Self>, template: &Template) -> Html {
        let link = ctx.link();
        html! {
            <div style="display:flex;flex-direction:column;gap:10px;overflow:hidden;">
                <div style="display:flex;justify-content:space-between;align-items:center;">
                    <span style="font-size:11px;text-transform:uppercase;color:#888;letter-spacing:1px;">{"Live Preview"}</span>
                    <button onclick={link.callback(|_| Msg::TogglePreviewModal)}
                        style="padding:4px 8px;background:none;border:1px solid #3a3856;color:#ccc;border-radius:4px;font-size:11px;cursor:pointer;">
                        {"Full Screen"}
                    </button>
                </div>
                <div style="background:#000;border:1px solid #2a2840;border-radius:12px;padding:12px;display:flex;align-items:center;justify-content:center;">
                    <div style="position:relative;width:100%;aspect-ratio:1200/848;background:#fff;border-radius:4px;overflow:hidden;">
                        <div style="position:absolute;top:50%;left:50%;width:1200px;height:848px;transform:translate(-50%,-50%) scale(0.55);pointer-events:none;">
                            { self.preview_canvas(template) }
                        </div>
                    </div>
                </div>
            </div>
        }
    }

    fn view_preview_modal(&self, ctx: &Context<Self>) -> Html {
        let (Some(template), true) = (&self.selected, self.show_preview_modal) else {
            return html! {};
        };
        let close = ctx.link().callback(|_| Msg::TogglePreviewModal);
        html! {
            <div onclick={close.clone()}
                style="position:fixed;inset:0;z-index:3000;background:rgba(0,0,0,0.85);display:flex;align-items:center;justify-content:center;">
                <button onclick={close}
                    style="position:absolute;top:20px;right:20px;color:#fff;background:rgba(255,255,255,0.1);border:none;border-radius:50%;padding:10px 14px;font-size:16px;cursor:pointer;">
                    {"✕"}
                </button>
                <div style="width:1200px;height:848px;background:#fff;position:relative;transform:scale(0.8);border-radius:8px;overflow:hidden;">
                    { self.preview_canvas(template) }
                </div>
            </div>
        }
    }

    fn preview_canvas(&self, template: &Template) -> Html {
        let fields = template
            .fields
            .iter()
            .map(|field| {
                let style = format!(
                    "position:absolute;top:{}%;left:{}%;transform:translate(-50%,-50%);font-size:{}px;font-weight:{};color:{};font-family:'{}';white-space:pre;",
                    field.y,
                    field.x,
                    field.font_size as f64 * 1.25,
                    field.font_weight,
                    field.color,
                    field.font_family,
                );
                let body = match &field.content {
                    FieldContent::Image { asset_url, .. } => html! {
                        <img src={asset_url.clone()}
                             style={format!("height:{}px;display:block;", field.font_size as f64 * 1.25)} />
                    },
                    FieldContent::VerificationQr => html! {
                        <img src={"/api/qr?size=300&data=PREVIEW".to_string()}
                             style={format!("width:{0}px;height:{0}px;display:block;", field.font_size as f64 * 1.25)} />
                    },
                    FieldContent::Text => {
                        let value = self
                            .values
                            .get(&field.id)
                            .filter(|v| !v.is_empty())
                            .cloned()
                            .unwrap_or_else(|| field.label.clone());
                        html! { { value } }
                    }
                };
                html! { <div style={style}>{ body }</div> }
            })
            .collect::<Html>();

        html! {
            <div style="width:100%;height:100%;position:relative;background:#fff;">
                {
                    match &template.image_url {
                        Some(url) => html! { <img src={url.clone()} style="width:100%;height:100%;object-fit:fill;" /> },
                        None => html! {},
                    }
                }
                { fields }
            </div>
        }
    }
}

fn poll_status(link: yew::html::Scope<GenerateComponent>, job_id: String) {
    spawn_local(async move {
        TimeoutFuture::new(800).await;
        match Request::get(&format!("/api/generate/status/{}", job_id))
            .send()
            .await
        {
            Ok(resp) if resp.status() == 200 => match resp.json::<JobStatus>().await {
                Ok(status) => link.send_message(Msg::Status(job_id, status)),
                Err(e) => link.send_message(Msg::BatchFinished(Err(e.to_string()))),
            },
            Ok(resp) => link.send_message(Msg::BatchFinished(Err(
                resp.text().await.unwrap_or_default()
            ))),
            Err(e) => link.send_message(Msg::BatchFinished(Err(e.to_string()))),
        }
    });
}
