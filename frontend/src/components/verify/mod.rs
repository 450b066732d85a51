//! Public verification view, reached through the QR payload URL
//! (`/verify/<id>`): shows who the certificate was issued to and links
//! the stored document.

use common::model::record::GenerationRecord;
use gloo_net::http::Request;
use yew::platform::spawn_local;
use yew::prelude::*;

pub struct VerifyComponent {
    record: Option<GenerationRecord>,
    failed: bool,
}

pub enum Msg {
    Loaded(Box<GenerationRecord>),
    NotFound,
}

#[derive(Properties, PartialEq, Clone)]
pub struct VerifyProps {
    pub record_id: String,
}

impl Component for VerifyComponent {
    type Message = Msg;
    type Properties = VerifyProps;

    fn create(ctx: &Context<Self>) -> Self {
        let record_id = ctx.props().record_id.clone();
        let link = ctx.link().clone();
        spawn_local(async move {
            match Request::get(&format!("/api/records/{}", record_id)).send().await {
                Ok(resp) if resp.status() == 200 => match resp.json::<GenerationRecord>().await {
                    Ok(record) => link.send_message(Msg::Loaded(Box::new(record))),
                    Err(_) => link.send_message(Msg::NotFound),
                },
                _ => link.send_message(Msg::NotFound),
            }
        });
        Self {
            record: None,
            failed: false,
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Loaded(record) => {
                self.record = Some(*record);
                true
            }
            Msg::NotFound => {
                self.failed = true;
                true
            }
        }
    }

    fn view(&self, _ctx: &Context<Self>) -> Html {
        let body = match (&self.record, self.failed) {
            (Some(record), _) => html! {
                <div style="background:#16142a;border:1px solid #2a2840;border-radius:12px;padding:30px;max-width:480px;text-align:center;">
                    <div style="font-size:36px;">{"✔"}</div>
                    <h2 style="margin:10px 0 4px;">{"Certificate verified"}</h2>
                    <p style="color:#999;font-size:13px;margin:0 0 18px;">
                        { format!("Issued to {} — {}", record.recipient_name, record.category) }
                    </p>
                    <div style="font-size:11px;color:#777;margin-bottom:18px;">
                        { format!("Issued {} · id {}", record.created_at, record.id) }
                    </div>
                    <a href={record.file_url.clone()} target="_blank"
                       style="display:inline-block;padding:12px 22px;background:#4F8EF7;color:#fff;border-radius:6px;text-decoration:none;font-weight:700;">
                        {"View certificate"}
                    </a>
                </div>
            },
            (None, true) => html! {
                <div style="background:#16142a;border:1px solid #2a2840;border-radius:12px;padding:30px;max-width:480px;text-align:center;">
                    <div style="font-size:36px;">{"✖"}</div>
                    <h2 style="margin:10px 0 4px;">{"Certificate not found"}</h2>
                    <p style="color:#999;font-size:13px;">{"This verification id does not match any issued certificate."}</p>
                </div>
            },
            (None, false) => html! { <div style="color:#999;">{"Verifying..."}</div> },
        };
        html! {
            <div style="min-height:100vh;background:#0d0b1e;color:#eee;font-family:Inter,sans-serif;display:flex;align-items:center;justify-content:center;">
                { body }
            </div>
        }
    }
}
