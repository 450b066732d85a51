//! View rendering for the canvas editor: field palette on the left, the
//! interactive canvas in the middle, the properties panel on the right.

use common::model::field::{AssetRole, Field, FieldContent, FieldPatch};
use common::model::fonts::{SANS_FONTS, SERIF_FONTS};
use web_sys::{HtmlInputElement, HtmlSelectElement, MouseEvent};
use yew::html::Scope;
use yew::prelude::*;

use super::helpers::{parse_number, FIELD_PALETTE};
use super::messages::Msg;
use super::state::EditorComponent;

const PANEL_STYLE: &str =
    "width:240px;min-width:240px;border-right:1px solid #2a2840;padding:14px;display:flex;flex-direction:column;gap:8px;";
const INPUT_STYLE: &str =
    "width:100%;padding:8px;background:#0d0b1e;border:1px solid #3a3856;color:#fff;font-size:12px;border-radius:4px;";
const LABEL_STYLE: &str =
    "font-size:10px;color:#888;text-transform:uppercase;margin-bottom:6px;display:block;";

pub fn view(component: &EditorComponent, ctx: &Context<EditorComponent>) -> Html {
    let link = ctx.link();
    html! {
        <div style="display:flex;height:calc(100vh - 45px);">
            { build_palette(component, ctx) }
            { build_canvas(component, link) }
            { build_properties(component, link) }
        </div>
    }
}

fn build_palette(component: &EditorComponent, ctx: &Context<EditorComponent>) -> Html {
    let link = ctx.link();
    let template_name = component
        .template
        .as_ref()
        .map(|t| t.name.clone())
        .unwrap_or_default();
    let on_back = {
        let cb = ctx.props().on_back.clone();
        Callback::from(move |_: MouseEvent| cb.emit(()))
    };

    let palette_buttons = FIELD_PALETTE
        .iter()
        .map(|label| {
            let label_string = label.to_string();
            let onclick = link.callback(move |_| Msg::AddField(label_string.clone()));
            html! {
                <button {onclick}
                    style="width:100%;text-align:left;margin-bottom:4px;font-size:11px;padding:9px;background:#1a1830;color:#ddd;border:none;border-radius:4px;cursor:pointer;">
                    { format!("+ {}", label) }
                </button>
            }
        })
        .collect::<Html>();

    let placed = component
        .template
        .as_ref()
        .map(|t| t.fields.as_slice())
        .unwrap_or_default()
        .iter()
        .map(|field| placed_row(component, link, field))
        .collect::<Html>();

    html! {
        <div style={PANEL_STYLE}>
            <div style="display:flex;align-items:center;gap:8px;">
                <button onclick={on_back}
                    style="padding:4px 8px;background:none;border:1px solid #3a3856;color:#ccc;border-radius:4px;cursor:pointer;">
                    { "< Back" }
                </button>
                <span style="font-weight:700;font-size:12px;overflow:hidden;text-overflow:ellipsis;white-space:nowrap;">
                    { format!("Editing: {}", template_name) }
                    { if component.is_dirty() { html! { <span title="Unsaved changes" style="color:#e53935;"> {" ●"} </span> } } else { html! {} } }
                </span>
            </div>

            <div style={LABEL_STYLE}>{"Template fields"}</div>
            { palette_buttons }

            <div style="display:grid;grid-template-columns:1fr 1fr;gap:8px;margin-top:8px;">
                { asset_button(component, link, AssetRole::Signature) }
                { asset_button(component, link, AssetRole::Logo) }
            </div>

            {
                if component.template.as_ref().is_some_and(|t| !t.fields.is_empty()) {
                    html! {
                        <>
                            <div style={LABEL_STYLE}>{"Placed"}</div>
                            { placed }
                        </>
                    }
                } else {
                    html! {}
                }
            }

            <div style="margin-top:auto;">
                <button onclick={link.callback(|_| Msg::Save)} disabled={component.saving}
                    style="width:100%;padding:11px;background:#4F8EF7;color:#fff;border:none;border-radius:5px;font-weight:700;cursor:pointer;">
                    { if component.saving { "Saving..." } else { "SAVE TEMPLATE" } }
                </button>
            </div>
        </div>
    }
}

fn placed_row(component: &EditorComponent, link: &Scope<EditorComponent>, field: &Field) -> Html {
    let selected = component.selected_field_id.as_deref() == Some(field.id.as_str());
    let select = {
        let id = field.id.clone();
        link.callback(move |_| Msg::SelectField(id.clone()))
    };
    let remove = {
        let id = field.id.clone();
        link.callback(move |e: MouseEvent| {
            e.stop_propagation();
            Msg::RemoveField(id.clone())
        })
    };
    html! {
        <div onclick={select}
            style={format!("padding:8px 12px;border-radius:6px;font-size:11px;margin-bottom:4px;cursor:pointer;display:flex;justify-content:space-between;background:{};border:1px solid {};",
                if selected { "rgba(79,142,247,0.12)" } else { "#1a1830" },
                if selected { "#4F8EF7" } else { "transparent" })}>
            <span>{ format!("📌 {}", field.label) }</span>
            <span onclick={remove} style="cursor:pointer;color:#e57373;">{"✕"}</span>
        </div>
    }
}

fn asset_button(
    component: &EditorComponent,
    link: &Scope<EditorComponent>,
    role: AssetRole,
) -> Html {
    let input_ref = match role {
        AssetRole::Signature => component.signature_input_ref.clone(),
        AssetRole::Logo => component.logo_input_ref.clone(),
    };
    let open = {
        let input_ref = input_ref.clone();
        Callback::from(move |_: MouseEvent| {
            if let Some(input) = input_ref.cast::<HtmlInputElement>() {
                input.click();
            }
        })
    };
    let onchange = link.batch_callback(move |e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        match input.files().and_then(|files| files.get(0)) {
            Some(file) => vec![Msg::AssetPicked(role, file)],
            None => vec![],
        }
    });
    html! {
        <label onclick={open}
            style="font-size:10px;padding:8px;border:1px dashed #3a3856;border-radius:4px;text-align:center;cursor:pointer;color:#ccc;">
            { format!("+ {}", role.label()) }
            <input type="file" hidden={true} accept="image/*" ref={input_ref} {onchange} />
        </label>
    }
}

fn build_canvas(component: &EditorComponent, link: &Scope<EditorComponent>) -> Html {
    let onmousemove = link.callback(|e: MouseEvent| Msg::PointerMove {
        x: e.client_x() as f64,
        y: e.client_y() as f64,
    });
    let onmouseup = link.callback(|_| Msg::PointerUp);
    let onmouseleave = link.callback(|_| Msg::PointerUp);

    let background = component
        .template
        .as_ref()
        .and_then(|t| t.image_url.clone());
    let fields = component
        .template
        .as_ref()
        .map(|t| t.fields.as_slice())
        .unwrap_or_default()
        .iter()
        .map(|field| canvas_field(component, link, field))
        .collect::<Html>();

    html! {
        <div style="flex:1;display:flex;flex-direction:column;align-items:center;padding:20px;overflow:auto;">
            <div style="width:100%;max-width:800px;display:flex;justify-content:space-between;margin-bottom:10px;font-size:12px;color:#999;">
                <span>{"Drag fields to position them on the template"}</span>
                <span>{"5% grid · center snap"}</span>
            </div>
            <div ref={component.canvas_ref.clone()}
                 {onmousemove} {onmouseup} {onmouseleave}
                 style="position:relative;width:100%;max-width:800px;aspect-ratio:1200/848;background:#fff;overflow:hidden;cursor:crosshair;border-radius:4px;">
                {
                    match background {
                        Some(url) => html! {
                            <img src={url}
                                 style="width:100%;height:100%;position:absolute;object-fit:fill;pointer-events:none;" />
                        },
                        None => html! {},
                    }
                }
                { fields }
            </div>
        </div>
    }
}

fn canvas_field(component: &EditorComponent, link: &Scope<EditorComponent>, field: &Field) -> Html {
    let selected = component.selected_field_id.as_deref() == Some(field.id.as_str());
    let onmousedown = {
        let id = field.id.clone();
        link.callback(move |e: MouseEvent| {
            e.prevent_default();
            Msg::DragStart {
                field_id: id.clone(),
                pointer: (e.client_x() as f64, e.client_y() as f64),
            }
        })
    };
    let on_resize_down = {
        let id = field.id.clone();
        link.callback(move |e: MouseEvent| {
            e.stop_propagation();
            e.prevent_default();
            Msg::ResizeStart {
                field_id: id.clone(),
                pointer_y: e.client_y() as f64,
            }
        })
    };

    let style = format!(
        "position:absolute;top:{}%;left:{}%;transform:translate(-50%,-50%);font-size:{}px;font-weight:{};color:{};font-family:'{}';white-space:pre;z-index:10;user-select:none;cursor:move;{}",
        field.y,
        field.x,
        field.font_size,
        field.font_weight,
        field.color,
        field.font_family,
        if selected { "outline:1px dashed #4F8EF7;" } else { "" }
    );

    html! {
        <div {onmousedown} style={style}>
            {
                if selected {
                    html! {
                        <div style="position:absolute;top:-18px;left:0;font-size:9px;background:#4F8EF7;color:#fff;padding:1px 4px;border-radius:3px;white-space:nowrap;">
                            { field.label.clone() }
                        </div>
                    }
                } else {
                    html! {}
                }
            }
            { field_body(field) }
            {
                if selected {
                    html! {
                        <div onmousedown={on_resize_down}
                            style="position:absolute;bottom:-6px;right:-6px;width:10px;height:10px;background:#4F8EF7;border-radius:2px;cursor:ns-resize;" />
                    }
                } else {
                    html! {}
                }
            }
        </div>
    }
}

fn field_body(field: &Field) -> Html {
    match &field.content {
        FieldContent::Image { asset_url, .. } => html! {
            <img src={asset_url.clone()}
                 style={format!("height:{}px;display:block;pointer-events:none;", field.font_size)} />
        },
        FieldContent::VerificationQr => html! {
            <img src={format!("/api/qr?size=150&data=VERIFY-{}", field.id)}
                 style={format!("width:{0}px;height:{0}px;display:block;pointer-events:none;", field.font_size)} />
        },
        FieldContent::Text => html! { { field.label.clone() } },
    }
}

fn build_properties(component: &EditorComponent, link: &Scope<EditorComponent>) -> Html {
    let field = component.selected_field_id.as_deref().and_then(|id| {
        component
            .template
            .as_ref()
            .and_then(|template| template.field(id))
    });

    let Some(field) = field else {
        return html! {
            <div style="width:240px;min-width:240px;border-left:1px solid #2a2840;display:flex;align-items:center;justify-content:center;padding:40px;text-align:center;color:#777;font-size:12px;">
                {"Select a field on the canvas to edit its properties"}
            </div>
        };
    };

    let font_options = |group: &[&str]| {
        group
            .iter()
            .map(|family| {
                html! { <option value={family.to_string()} selected={field.font_family == *family}>{ *family }</option> }
            })
            .collect::<Html>()
    };

    let on_family = link.callback(|e: Event| {
        let select: HtmlSelectElement = e.target_unchecked_into();
        Msg::ApplyPatch(FieldPatch {
            font_family: Some(select.value()),
            ..FieldPatch::default()
        })
    });
    let on_weight = link.callback(|e: Event| {
        let select: HtmlSelectElement = e.target_unchecked_into();
        Msg::ApplyPatch(FieldPatch {
            font_weight: Some(select.value()),
            ..FieldPatch::default()
        })
    });
    let on_color = link.callback(|e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        Msg::ApplyPatch(FieldPatch {
            color: Some(input.value()),
            ..FieldPatch::default()
        })
    });
    let on_size = link.batch_callback(|e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        match parse_number(&input.value()) {
            Some(v) => vec![Msg::ApplyPatch(FieldPatch {
                font_size: Some(v.max(0.0) as u32),
                ..FieldPatch::default()
            })],
            None => vec![],
        }
    });
    let on_x = link.batch_callback(|e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        match parse_number(&input.value()) {
            Some(v) => vec![Msg::ApplyPatch(FieldPatch {
                x: Some(v),
                ..FieldPatch::default()
            })],
            None => vec![],
        }
    });
    let on_y = link.batch_callback(|e: Event| {
        let input: HtmlInputElement = e.target_unchecked_into();
        match parse_number(&input.value()) {
            Some(v) => vec![Msg::ApplyPatch(FieldPatch {
                y: Some(v),
                ..FieldPatch::default()
            })],
            None => vec![],
        }
    });
    let remove = {
        let id = field.id.clone();
        link.callback(move |_| Msg::RemoveField(id.clone()))
    };

    html! {
        <div style="width:240px;min-width:240px;border-left:1px solid #2a2840;padding:14px;display:flex;flex-direction:column;gap:14px;">
            <div style="font-size:10px;text-transform:uppercase;font-weight:700;color:#888;">{"Properties"}</div>

            <div>
                <label style={LABEL_STYLE}>{"Font family"}</label>
                <select style={INPUT_STYLE} onchange={on_family}>
                    <optgroup label="Serif (Classic)">{ font_options(&SERIF_FONTS) }</optgroup>
                    <optgroup label="Sans-Serif (Modern)">{ font_options(&SANS_FONTS) }</optgroup>
                </select>
            </div>

            <div style="display:flex;gap:8px;">
                <div style="flex:1;">
                    <label style={LABEL_STYLE}>{"Size"}</label>
                    <input type="number" style={INPUT_STYLE} value={field.font_size.to_string()} onchange={on_size} />
                </div>
                <div style="flex:1;">
                    <label style={LABEL_STYLE}>{"Weight"}</label>
                    <select style={INPUT_STYLE} onchange={on_weight}>
                        <option value="400" selected={field.font_weight == "400"}>{"Normal"}</option>
                        <option value="600" selected={field.font_weight == "600"}>{"Semi-Bold"}</option>
                        <option value="700" selected={field.font_weight == "700"}>{"Bold"}</option>
                        <option value="800" selected={field.font_weight == "800"}>{"Black"}</option>
                    </select>
                </div>
            </div>

            <div>
                <label style={LABEL_STYLE}>{"Color"}</label>
                <input type="color" style="width:100%;height:32px;border:1px solid #3a3856;background:none;border-radius:4px;cursor:pointer;"
                       value={field.color.clone()} onchange={on_color} />
            </div>

            <div style="display:flex;gap:8px;">
                <div style="flex:1;">
                    <label style={LABEL_STYLE}>{"X (%)"}</label>
                    <input type="number" step="0.1" style={INPUT_STYLE} value={field.x.to_string()} onchange={on_x} />
                </div>
                <div style="flex:1;">
                    <label style={LABEL_STYLE}>{"Y (%)"}</label>
                    <input type="number" step="0.1" style={INPUT_STYLE} value={field.y.to_string()} onchange={on_y} />
                </div>
            </div>

            <button onclick={remove}
                style="width:100%;font-size:12px;padding:10px;background:#b3261e;color:#fff;border:none;border-radius:5px;cursor:pointer;">
                {"Remove Field"}
            </button>
        </div>
    }
}
