//! Generation history: the record table with per-row dispatch actions.
//!
//! WhatsApp dispatch opens a `wa.me` deep link in a new tab, fire and
//! forget. Email dispatch calls the backend and tracks the in-flight
//! record id so only one send button shows as busy at a time.

use common::model::record::{whatsapp_link, GenerationRecord};
use common::requests::SendEmailRequest;
use gloo_net::http::Request;
use web_sys::MouseEvent;
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::toast::show_toast;

pub struct HistoryComponent {
    records: Vec<GenerationRecord>,
    sending_email_id: Option<String>,
}

pub enum Msg {
    Loaded(Vec<GenerationRecord>),
    WhatsApp(String),
    Email(String),
    EmailDone(Result<(), String>),
    Delete(String),
    Refresh,
}

impl Component for HistoryComponent {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        fetch_history(ctx.link().clone());
        Self {
            records: Vec::new(),
            sending_email_id: None,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Loaded(records) => {
                self.records = records;
                true
            }
            Msg::WhatsApp(record_id) => {
                let Some(record) = self.records.iter().find(|r| r.id == record_id) else {
                    return false;
                };
                match whatsapp_link(record, &verify_url(&record.id)) {
                    Some(link) => {
                        if let Some(window) = web_sys::window() {
                            let _ = window.open_with_url_and_target(&link, "_blank");
                        }
                    }
                    None => show_toast("No phone number recorded for this certificate"),
                }
                false
            }
            Msg::Email(record_id) => {
                let Some(record) = self.records.iter().find(|r| r.id == record_id) else {
                    return false;
                };
                let Some(email) = record.recipient_email.clone().filter(|e| !e.is_empty()) else {
                    show_toast("No email address recorded for this certificate");
                    return false;
                };
                self.sending_email_id = Some(record_id);
                let payload = SendEmailRequest {
                    recipient_email: email,
                    recipient_name: record.recipient_name.clone(),
                    certificate_link: verify_url(&record.id),
                    category: record.category.clone(),
                };
                let link = ctx.link().clone();
                spawn_local(async move {
                    let result = match Request::post("/api/dispatch/email").json(&payload) {
                        Ok(request) => match request.send().await {
                            Ok(resp) if resp.status() == 200 => Ok(()),
                            Ok(resp) => Err(resp.text().await.unwrap_or_default()),
                            Err(e) => Err(e.to_string()),
                        },
                        Err(e) => Err(e.to_string()),
                    };
                    link.send_message(Msg::EmailDone(result));
                });
                true
            }
            Msg::EmailDone(result) => {
                self.sending_email_id = None;
                match result {
                    Ok(_) => show_toast("Certificate email sent"),
                    Err(e) => {
                        gloo_console::error!(format!("email dispatch failed: {}", e));
                        show_toast(&format!("Failed to send: {}", e));
                    }
                }
                true
            }
            Msg::Delete(record_id) => {
                let confirmed = web_sys::window()
                    .and_then(|w| w.confirm_with_message("Delete history record?").ok())
                    .unwrap_or(false);
                if !confirmed {
                    return false;
                }
                let link = ctx.link().clone();
                spawn_local(async move {
                    match Request::delete(&format!("/api/records/{}", record_id))
                        .send()
                        .await
                    {
                        Ok(resp) if resp.status() == 200 => link.send_message(Msg::Refresh),
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
                fetch_history(ctx.link().clone());
                false
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let rows = self
            .records
            .iter()
            .map(|record| self.record_row(link, record))
            .collect::<Html>();

        html! {
            <div style="padding:36px 40px;">
                <h1 style="margin:0;font-size:22px;">{"Generated History"}</h1>
                <p style="color:#999;font-size:13px;">{"All certificates generated via single or bulk mode"}</p>
                <div style="background:#16142a;border:1px solid #2a2840;border-radius:10px;overflow:hidden;margin-top:14px;">
                    <table style="width:100%;border-collapse:collapse;font-size:13px;">
                        <thead>
                            <tr style="background:#1a1830;text-align:left;font-size:10px;color:#888;text-transform:uppercase;letter-spacing:1px;">
                                <th style="padding:14px;">{"Recipient"}</th>
                                <th>{"Template"}</th>
                                <th>{"Category"}</th>
                                <th>{"Date"}</th>
                                <th style="text-align:center;">{"Distribute"}</th>
                                <th style="text-align:right;padding-right:20px;">{"Action"}</th>
                            </tr>
                        </thead>
                        <tbody>
                            {
                                if self.records.is_empty() {
                                    html! {
                                        <tr><td colspan="6" style="padding:40px;text-align:center;color:#999;">{"No history found"}</td></tr>
                                    }
                                } else {
                                    rows
                                }
                            }
                        </tbody>
                    </table>
                </div>
            </div>
        }
    }
}

impl HistoryComponent {
    fn record_row(&self, link: &yew::html::Scope<Self>, record: &GenerationRecord) -> Html {
        let has_phone = record
            .recipient_phone
            .as_deref()
            .is_some_and(|p| !p.is_empty());
        let has_email = record
            .recipient_email
            .as_deref()
            .is_some_and(|e| !e.is_empty());
        let sending = self.sending_email_id.as_deref() == Some(record.id.as_str());

        let whatsapp = {
            let id = record.id.clone();
            link.callback(move |_: MouseEvent| Msg::WhatsApp(id.clone()))
        };
        let email = {
            let id = record.id.clone();
            link.callback(move |_: MouseEvent| Msg::Email(id.clone()))
        };
        let delete = {
            let id = record.id.clone();
            link.callback(move |_: MouseEvent| Msg::Delete(id.clone()))
        };

        let short_id: String = record.id.chars().take(8).collect();
        html! {
            <tr style="border-bottom:1px solid #2a2840;">
                <td style="padding:14px;">
                    <div style="font-weight:600;">{ record.recipient_name.clone() }</div>
                    <div style="font-size:11px;color:#777;">{ short_id }</div>
                </td>
                <td>{ record.template_name.clone().unwrap_or_else(|| "Unknown".to_string()) }</td>
                <td>
                    <span style="padding:2px 8px;border-radius:4px;background:rgba(79,142,247,0.12);color:#4F8EF7;font-size:11px;">
                        { record.category.clone() }
                    </span>
                </td>
                <td>{ record.created_at.clone() }</td>
                <td style="text-align:center;">
                    <button onclick={whatsapp} disabled={!has_phone}
                        title={if has_phone { "Share via WhatsApp" } else { "No phone recorded" }}
                        style={format!("padding:6px 10px;background:none;border:none;cursor:pointer;color:#25D366;opacity:{};", if has_phone { "1" } else { "0.35" })}>
                        {"WhatsApp"}
                    </button>
                    <button onclick={email} disabled={!has_email || sending}
                        title={if has_email { "Send by email" } else { "No email recorded" }}
                        style={format!("padding:6px 10px;background:none;border:none;cursor:pointer;color:#4F8EF7;opacity:{};", if has_email { "1" } else { "0.35" })}>
                        { if sending { "Sending..." } else { "Email" } }
                    </button>
                </td>
                <td style="text-align:right;padding-right:20px;">
                    <a href={record.file_url.clone()} target="_blank"
                       style="color:#ccc;text-decoration:none;margin-right:10px;font-size:12px;">
                        {"Download"}
                    </a>
                    <button onclick={delete}
                        style="padding:6px;background:none;border:none;color:#e57373;cursor:pointer;">
                        {"Delete"}
                    </button>
                </td>
            </tr>
        }
    }
}

fn verify_url(record_id: &str) -> String {
    let origin = web_sys::window()
        .and_then(|w| w.location().origin().ok())
        .unwrap_or_default();
    format!("{}/verify/{}", origin, record_id)
}

fn fetch_history(link: yew::html::Scope<HistoryComponent>) {
    spawn_local(async move {
        match Request::get("/api/records").send().await {
            Ok(resp) if resp.status() == 200 => {
                if let Ok(records) = resp.json::<Vec<GenerationRecord>>().await {
                    link.send_message(Msg::Loaded(records));
                }
            }
            _ => show_toast("Failed to load history"),
        }
    });
}
