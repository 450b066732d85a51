//! Template library: upload a background to create a template, open the
//! editor, delete.

use common::model::template::Template;
use gloo_net::http::Request;
use web_sys::{FormData, HtmlInputElement, MouseEvent};
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::toast::show_toast;

pub struct TemplatesComponent {
    templates: Vec<Template>,
    uploading: bool,
    file_input_ref: NodeRef,
}

pub enum Msg {
    Loaded(Vec<Template>),
    FileSelected(web_sys::File),
    Uploaded(Result<Template, String>),
    Delete(String),
    Refresh,
}

#[derive(Properties, PartialEq, Clone)]
pub struct TemplatesProps {
    pub on_edit: Callback<String>,
}

impl Component for TemplatesComponent {
    type Message = Msg;
    type Properties = TemplatesProps;

    fn create(ctx: &Context<Self>) -> Self {
        fetch_templates(ctx.link().clone());
        Self {
            templates: Vec::new(),
            uploading: false,
            file_input_ref: NodeRef::default(),
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Loaded(templates) => {
                self.templates = templates;
                true
            }
            Msg::FileSelected(file) => {
                let Some(form) = FormData::new().ok().and_then(|form| {
                    form.append_with_blob_and_filename("file", &file, &file.name())
                        .ok()
                        .map(|_| form)
                }) else {
                    show_toast("Could not read the selected file");
                    return false;
                };
                self.uploading = true;
                let link = ctx.link().clone();
                spawn_local(async move {
                    let request = match Request::post("/api/templates/create").body(form) {
                        Ok(request) => request,
                        Err(e) => {
                            link.send_message(Msg::Uploaded(Err(e.to_string())));
                            return;
                        }
                    };
                    let result = match request.send().await {
                        Ok(resp) if resp.status() == 200 => resp
                            .json::<Template>()
                            .await
                            .map_err(|e| e.to_string()),
                        Ok(resp) => Err(resp.text().await.unwrap_or_default()),
                        Err(e) => Err(e.to_string()),
                    };
                    link.send_message(Msg::Uploaded(result));
                });
                true
            }
            Msg::Uploaded(result) => {
                self.uploading = false;
                match result {
                    Ok(template) => {
                        show_toast("Template uploaded");
                        ctx.props().on_edit.emit(template.id);
                    }
                    Err(e) => show_toast(&format!("Error uploading template: {}", e)),
                }
                true
            }
            Msg::Delete(template_id) => {
                let confirmed = web_sys::window()
                    .and_then(|w| {
                        w.confirm_with_message(
                            "Delete this template? History records keep referencing it.",
                        )
                        .ok()
                    })
                    .unwrap_or(false);
                if !confirmed {
                    return false;
                }
                let link = ctx.link().clone();
                spawn_local(async move {
                    match Request::delete(&format!("/api/templates/{}", template_id))
                        .send()
                        .await
                    {
                        Ok(resp) if resp.status() == 200 => {
                            show_toast("Template deleted");
                            link.send_message(Msg::Refresh);
                        }
                        Ok(resp) => show_toast(&format!(
                            "Cannot delete: {}",
                            resp.text().await.unwrap_or_default()
                        )),
                        Err(e) => show_toast(&format!("Cannot delete: {}", e)),
                    }
                });
                false
            }
            Msg::Refresh => {
                fetch_templates(ctx.link().clone());
                false
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let file_input_ref = self.file_input_ref.clone();
        let open_picker = Callback::from(move |_: MouseEvent| {
            if let Some(input) = file_input_ref.cast::<HtmlInputElement>() {
                input.click();
            }
        });
        let onchange = link.batch_callback(|e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            match input.files().and_then(|files| files.get(0)) {
                Some(file) => vec![Msg::FileSelected(file)],
                None => vec![],
            }
        });

        let cards = self
            .templates
            .iter()
            .map(|template| {
                let edit = {
                    let id = template.id.clone();
                    let on_edit = ctx.props().on_edit.clone();
                    Callback::from(move |_: MouseEvent| on_edit.emit(id.clone()))
                };
                let delete = {
                    let id = template.id.clone();
                    link.callback(move |_| Msg::Delete(id.clone()))
                };
                html! {
                    <div style="background:#16142a;border:1px solid #2a2840;border-radius:10px;overflow:hidden;">
                        <div style="height:150px;background:#000;display:flex;align-items:center;justify-content:center;">
                            {
                                match &template.image_url {
                                    Some(url) => html! {
                                        <img src={url.clone()} style="width:100%;height:100%;object-fit:contain;" />
                                    },
                                    None => html! { <span style="color:#555;">{"No background"}</span> },
                                }
                            }
                        </div>
                        <div style="padding:14px;display:flex;justify-content:space-between;align-items:center;">
                            <div>
                                <div style="font-weight:600;font-size:13px;">{ template.name.clone() }</div>
                                <div style="font-size:11px;color:#777;">{ format!("{} fields mapped", template.fields.len()) }</div>
                            </div>
                            <div style="display:flex;gap:6px;">
                                <button onclick={edit}
                                    style="padding:6px 10px;background:#fff;color:#000;border:none;border-radius:4px;font-size:11px;cursor:pointer;">
                                    {"Edit Design"}
                                </button>
                                <button onclick={delete}
                                    style="padding:6px 10px;background:none;color:#e57373;border:1px solid #3a3856;border-radius:4px;font-size:11px;cursor:pointer;">
                                    {"Delete"}
                                </button>
                            </div>
                        </div>
                    </div>
                }
            })
            .collect::<Html>();

        html! {
            <div style="padding:36px 40px;">
                <div style="display:flex;justify-content:space-between;align-items:center;">
                    <div>
                        <h1 style="margin:0;font-size:22px;">{"Templates Library"}</h1>
                        <p style="color:#999;font-size:13px;">{"Manage and edit your certificate base designs"}</p>
                    </div>
                    <label onclick={open_picker}
                        style="padding:10px 16px;background:#4F8EF7;color:#fff;border-radius:6px;font-size:13px;cursor:pointer;">
                        { if self.uploading { "Uploading..." } else { "+ New Template" } }
                        <input type="file" hidden={true} accept="image/*" ref={self.file_input_ref.clone()} {onchange} />
                    </label>
                </div>
                <div style="display:grid;grid-template-columns:repeat(auto-fill,minmax(260px,1fr));gap:18px;margin-top:20px;">
                    {
                        if self.templates.is_empty() {
                            html! { <div style="grid-column:1/-1;padding:40px;text-align:center;color:#999;">{"No templates found. Upload one to get started."}</div> }
                        } else {
                            cards
                        }
                    }
                </div>
            </div>
        }
    }
}

fn fetch_templates(link: yew::html::Scope<TemplatesComponent>) {
    spawn_local(async move {
        match Request::get("/api/templates").send().await {
            Ok(resp) if resp.status() == 200 => {
                if let Ok(templates) = resp.json::<Vec<Template>>().await {
                    link.send_message(Msg::Loaded(templates));
                }
            }
            _ => show_toast("Failed to load templates"),
        }
    });
}
