//! Update function for the canvas editor, Elm-style: mutate the state for
//! a message, return whether the view must re-render.
//!
//! The drag/resize machine lives in `common::geometry`; this module only
//! captures gestures on pointer-down, feeds pointer positions through
//! them, and clears them on pointer-up. Field list edits all go through
//! `common::model::template::Template` so clamping and duplicate-label
//! refusal cannot be bypassed.

use common::geometry::{DragGesture, ResizeGesture};
use common::model::field::FieldPatch;
use common::requests::SaveFieldsRequest;
use gloo_net::http::Request;
use uuid::Uuid;
use web_sys::Element;
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::toast::show_toast;

use super::helpers::{fields_digest, single_file_form};
use super::messages::Msg;
use super::state::EditorComponent;

pub fn update(component: &mut EditorComponent, ctx: &Context<EditorComponent>, msg: Msg) -> bool {
    match msg {
        Msg::TemplateLoaded(template) => {
            component.original_digest = template.as_ref().map(|t| fields_digest(&t.fields));
            component.template = template;
            component.selected_field_id = None;
            true
        }

        Msg::AddField(label) => {
            let Some(template) = &mut component.template else {
                return false;
            };
            let id = format!("field-{}", Uuid::new_v4());
            match template.add_field(id.clone(), &label) {
                Some(_) => {
                    component.selected_field_id = Some(id);
                    true
                }
                None => {
                    show_toast("Field already added");
                    false
                }
            }
        }

        Msg::AssetPicked(role, file) => {
            let Some(form) = single_file_form(&file) else {
                show_toast("Could not read the selected file");
                return false;
            };
            let link = ctx.link().clone();
            spawn_local(async move {
                let request = match Request::post("/api/templates/assets").body(form) {
                    Ok(request) => request,
                    Err(e) => {
                        show_toast(&format!("Error uploading asset: {}", e));
                        return;
                    }
                };
                match request.send().await {
                    Ok(resp) if resp.status() == 200 => {
                        #[derive(serde::Deserialize)]
                        struct AssetResponse {
                            asset_url: String,
                        }
                        match resp.json::<AssetResponse>().await {
                            Ok(body) => link.send_message(Msg::AssetUploaded(role, body.asset_url)),
                            Err(e) => show_toast(&format!("Error uploading asset: {}", e)),
                        }
                    }
                    Ok(resp) => show_toast(&format!(
                        "Error uploading asset: {}",
                        resp.text().await.unwrap_or_default()
                    )),
                    Err(e) => show_toast(&format!("Error uploading asset: {}", e)),
                }
            });
            false
        }

        Msg::AssetUploaded(role, asset_url) => {
            let Some(template) = &mut component.template else {
                return false;
            };
            let id = format!("{}-{}", role.label().to_lowercase(), Uuid::new_v4());
            template.add_asset_field(id.clone(), role, asset_url);
            component.selected_field_id = Some(id);
            show_toast(&format!("{} added", role.label()));
            true
        }

        Msg::SelectField(field_id) => {
            component.selected_field_id = Some(field_id);
            true
        }

        Msg::DragStart { field_id, pointer } => {
            let Some(template) = &component.template else {
                return false;
            };
            let Some(field) = template.field(&field_id) else {
                return false;
            };
            let Some(canvas) = component.canvas_ref.cast::<Element>() else {
                return false;
            };
            let rect = canvas.get_bounding_client_rect();
            component.selected_field_id = Some(field_id.clone());
            component.drag = Some(DragGesture::begin(
                field_id,
                pointer,
                (field.x, field.y),
                (rect.width(), rect.height()),
            ));
            true
        }

        Msg::ResizeStart {
            field_id,
            pointer_y,
        } => {
            let Some(template) = &component.template else {
                return false;
            };
            let Some(field) = template.field(&field_id) else {
                return false;
            };
            component.resize = Some(ResizeGesture::begin(field_id, pointer_y, field.font_size));
            true
        }

        Msg::PointerMove { x, y } => {
            // Resizing wins when both are somehow active; the gestures are
            // bound to different handles so this is belt and braces.
            if let Some(resize) = &component.resize {
                let font_size = resize.size_at(y);
                let field_id = resize.field_id.clone();
                if let Some(template) = &mut component.template {
                    return template.update_field(
                        &field_id,
                        &FieldPatch {
                            font_size: Some(font_size),
                            ..FieldPatch::default()
                        },
                    );
                }
                return false;
            }
            if let Some(drag) = &component.drag {
                let (px, py) = drag.position_at((x, y));
                let field_id = drag.field_id.clone();
                if let Some(template) = &mut component.template {
                    return template.update_field(
                        &field_id,
                        &FieldPatch {
                            x: Some(px),
                            y: Some(py),
                            ..FieldPatch::default()
                        },
                    );
                }
            }
            false
        }

        Msg::PointerUp => {
            let was_active = component.drag.is_some() || component.resize.is_some();
            component.drag = None;
            component.resize = None;
            was_active
        }

        Msg::ApplyPatch(patch) => {
            let Some(selected) = component.selected_field_id.clone() else {
                return false;
            };
            match &mut component.template {
                Some(template) => template.update_field(&selected, &patch),
                None => false,
            }
        }

        Msg::RemoveField(field_id) => {
            let Some(template) = &mut component.template else {
                return false;
            };
            if template.remove_field(&field_id) {
                if component.selected_field_id.as_deref() == Some(field_id.as_str()) {
                    component.selected_field_id = None;
                }
                true
            } else {
                false
            }
        }

        Msg::Save => {
            let Some(template) = &component.template else {
                return false;
            };
            component.saving = true;
            let payload = SaveFieldsRequest {
                template_id: template.id.clone(),
                fields: template.fields.clone(),
            };
            let link = ctx.link().clone();
            spawn_local(async move {
                let request = match Request::post("/api/templates/save").json(&payload) {
                    Ok(request) => request,
                    Err(e) => {
                        link.send_message(Msg::SaveFinished(Err(e.to_string())));
                        return;
                    }
                };
                match request.send().await {
                    Ok(resp) if resp.status() == 200 => {
                        link.send_message(Msg::SaveFinished(Ok(())));
                    }
                    Ok(resp) => link.send_message(Msg::SaveFinished(Err(
                        resp.text().await.unwrap_or_default()
                    ))),
                    Err(e) => link.send_message(Msg::SaveFinished(Err(e.to_string()))),
                }
            });
            true
        }

        Msg::SaveFinished(result) => {
            component.saving = false;
            match result {
                Ok(_) => {
                    component.original_digest =
                        component.template.as_ref().map(|t| fields_digest(&t.fields));
                    show_toast("Template configuration saved");
                }
                Err(e) => {
                    // Editor state is kept so the user can retry the save.
                    show_toast(&format!("Error saving changes: {}", e));
                }
            }
            true
        }
    }
}
