//! Dashboard overview: issuance and template counts.

use common::model::record::GenerationRecord;
use common::model::template::Template;
use gloo_net::http::Request;
use yew::platform::spawn_local;
use yew::prelude::*;

pub struct DashboardComponent {
    generated: Option<usize>,
    templates: Option<usize>,
}

pub enum Msg {
    Counts {
        generated: Option<usize>,
        templates: Option<usize>,
    },
}

impl Component for DashboardComponent {
    type Message = Msg;
    type Properties = ();

    fn create(ctx: &Context<Self>) -> Self {
        let link = ctx.link().clone();
        spawn_local(async move {
            let generated = match Request::get("/api/records").send().await {
                Ok(resp) if resp.status() == 200 => resp
                    .json::<Vec<GenerationRecord>>()
                    .await
                    .ok()
                    .map(|r| r.len()),
                _ => None,
            };
            let templates = match Request::get("/api/templates").send().await {
                Ok(resp) if resp.status() == 200 => {
                    resp.json::<Vec<Template>>().await.ok().map(|t| t.len())
                }
                _ => None,
            };
            link.send_message(Msg::Counts {
                generated,
                templates,
            });
        });
        Self {
            generated: None,
            templates: None,
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Counts {
                generated,
                templates,
            } => {
                self.generated = generated;
                self.templates = templates;
                true
            }
        }
    }

    fn view(&self, _ctx: &Context<Self>) -> Html {
        let card = |title: &str, value: Option<usize>, hint: &str| {
            html! {
                <div style="background:#16142a;border:1px solid #2a2840;border-radius:10px;padding:20px;min-width:220px;">
                    <div style="font-size:11px;text-transform:uppercase;color:#888;margin-bottom:14px;">{ title }</div>
                    <div style="font-size:26px;font-weight:800;">
                        { value.map(|v| v.to_string()).unwrap_or_else(|| "—".to_string()) }
                    </div>
                    <div style="font-size:11px;color:#777;margin-top:6px;">{ hint }</div>
                </div>
            }
        };
        html! {
            <div style="padding:36px 40px;">
                <h1 style="margin:0;font-size:22px;">{"Dashboard Overview"}</h1>
                <p style="color:#999;font-size:13px;">{"Monitor your certificate issuance and template usage"}</p>
                <div style="display:flex;gap:18px;margin-top:16px;">
                    { card("Total Generated", self.generated, "Across single and bulk runs") }
                    { card("Active Templates", self.templates, "Base designs in the library") }
                </div>
            </div>
        }
    }
}
