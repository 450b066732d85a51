//! Application shell: top navigation plus page switching.
//!
//! Leaving the editor or generate pages drops their components, which is
//! what clears template selection and in-flight editor state. A direct
//! visit to `/verify/<id>` (the QR payload URL) opens the public
//! verification view instead of the admin shell.

use yew::{classes, html, Component, Context, Html};

use crate::components::dashboard::DashboardComponent;
use crate::components::editor::EditorComponent;
use crate::components::generate::GenerateComponent;
use crate::components::history::HistoryComponent;
use crate::components::templates::TemplatesComponent;
use crate::components::verify::VerifyComponent;

#[derive(Clone, PartialEq)]
pub enum Page {
    Dashboard,
    Templates,
    Editor(String),
    Generate,
    History,
    Verify(String),
}

pub struct App {
    page: Page,
}

pub enum Msg {
    Navigate(Page),
}

fn initial_page() -> Page {
    let path = web_sys::window()
        .map(|w| w.location().pathname().unwrap_or_default())
        .unwrap_or_default();
    match path.strip_prefix("/verify/") {
        Some(id) if !id.is_empty() => Page::Verify(id.to_string()),
        _ => Page::Dashboard,
    }
}

impl Component for App {
    type Message = Msg;
    type Properties = ();

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            page: initial_page(),
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Navigate(page) => {
                self.page = page;
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        if let Page::Verify(record_id) = &self.page {
            return html! { <VerifyComponent record_id={record_id.clone()} /> };
        }

        let link = ctx.link();
        let nav_item = |label: &str, target: Page| {
            let active = self.page == target;
            let onclick = link.callback(move |_| Msg::Navigate(target.clone()));
            html! {
                <a {onclick} class={classes!(if active { "active" } else { "" })}
                   style={format!("cursor:pointer;padding:8px 14px;font-size:13px;{}",
                       if active { "color:#4F8EF7;font-weight:700;" } else { "color:#ccc;" })}>
                    { label }
                </a>
            }
        };

        html! {
            <div style="min-height:100vh;background:#0d0b1e;color:#eee;font-family:Inter,sans-serif;">
                <nav style="display:flex;align-items:center;gap:8px;padding:10px 24px;border-bottom:1px solid #2a2840;">
                    <div style="font-weight:800;font-size:15px;margin-right:18px;">{"🎓 CertEngine"}</div>
                    { nav_item("Dashboard", Page::Dashboard) }
                    { nav_item("Templates", Page::Templates) }
                    { nav_item("Generate", Page::Generate) }
                    { nav_item("History", Page::History) }
                </nav>
                {
                    match &self.page {
                        Page::Dashboard => html! { <DashboardComponent /> },
                        Page::Templates => html! {
                            <TemplatesComponent
                                on_edit={link.callback(|id| Msg::Navigate(Page::Editor(id)))} />
                        },
                        Page::Editor(template_id) => html! {
                            <EditorComponent
                                template_id={template_id.clone()}
                                on_back={link.callback(|_| Msg::Navigate(Page::Templates))} />
                        },
                        Page::Generate => html! {
                            <GenerateComponent
                                on_done={link.callback(|_| Msg::Navigate(Page::History))} />
                        },
                        Page::History => html! { <HistoryComponent /> },
                        Page::Verify(_) => html! {},
                    }
                }
            </div>
        }
    }
}
