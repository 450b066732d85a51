//! Canvas editor: root module wiring the Yew `Component` implementation
//! with submodules for state, update logic, view rendering, and helpers.
//!
//! On first render the template is fetched by the `template_id` prop; the
//! editor then runs entirely on the in-memory field list until Save does
//! a wholesale replace on the backend.

use gloo_net::http::Request;
use yew::platform::spawn_local;
use yew::prelude::*;

mod helpers;
mod messages;
mod props;
mod state;
mod update;
mod view;

use crate::toast::show_toast;
pub use messages::Msg;
pub use props::EditorProps;
pub use state::EditorComponent;

impl Component for EditorComponent {
    type Message = Msg;
    type Properties = EditorProps;

    fn create(_ctx: &Context<Self>) -> Self {
        EditorComponent::new()
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        update::update(self, ctx, msg)
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        view::view(self, ctx)
    }

    fn rendered(&mut self, ctx: &Context<Self>, first_render: bool) {
        if first_render && !self.loaded {
            self.loaded = true;
            let template_id = ctx.props().template_id.clone();
            let link = ctx.link().clone();
            spawn_local(async move {
                let response = Request::get(&format!("/api/templates/{}", template_id))
                    .send()
                    .await;
                match response {
                    Ok(resp) if resp.status() == 200 => {
                        match resp.json::<common::model::template::Template>().await {
                            Ok(template) => link.send_message(Msg::TemplateLoaded(Some(template))),
                            Err(_) => {
                                show_toast("Template could not be parsed");
                                link.send_message(Msg::TemplateLoaded(None));
                            }
                        }
                    }
                    _ => {
                        show_toast("Error loading template");
                        link.send_message(Msg::TemplateLoaded(None));
                    }
                }
            });
        }
    }
}
