//! Component state for the canvas editor.

use common::geometry::{DragGesture, ResizeGesture};
use common::model::template::Template;
use yew::prelude::*;

use super::helpers::fields_digest;

pub struct EditorComponent {
    /// The template under edit; `None` until the fetch resolves.
    pub template: Option<Template>,

    /// Single-field selection. Set on pointer-down before a drag begins;
    /// clicking empty canvas space does not clear it.
    pub selected_field_id: Option<String>,

    /// In-flight drag gesture, if any. `None` means Idle.
    pub drag: Option<DragGesture>,

    /// In-flight resize gesture; independent of dragging.
    pub resize: Option<ResizeGesture>,

    /// The interactive canvas node, used to read its rendered size when a
    /// gesture begins.
    pub canvas_ref: NodeRef,

    pub signature_input_ref: NodeRef,
    pub logo_input_ref: NodeRef,

    pub saving: bool,

    /// Digest of the field list at last load/save, for the unsaved-dot.
    pub original_digest: Option<String>,

    /// Guard so the first-render fetch runs once.
    pub loaded: bool,
}

impl EditorComponent {
    pub fn new() -> Self {
        Self {
            template: None,
            selected_field_id: None,
            drag: None,
            resize: None,
            canvas_ref: NodeRef::default(),
            signature_input_ref: NodeRef::default(),
            logo_input_ref: NodeRef::default(),
            saving: false,
            original_digest: None,
            loaded: false,
        }
    }

    pub fn is_dirty(&self) -> bool {
        match (&self.template, &self.original_digest) {
            (Some(template), Some(original)) => &fields_digest(&template.fields) != original,
            (Some(template), None) => !template.fields.is_empty(),
            _ => false,
        }
    }
}
