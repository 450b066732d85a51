use common::model::field::{AssetRole, FieldPatch};
use common::model::template::Template;

pub enum Msg {
    TemplateLoaded(Option<Template>),
    AddField(String),
    AssetPicked(AssetRole, web_sys::File),
    AssetUploaded(AssetRole, String),
    SelectField(String),
    DragStart { field_id: String, pointer: (f64, f64) },
    ResizeStart { field_id: String, pointer_y: f64 },
    PointerMove { x: f64, y: f64 },
    PointerUp,
    ApplyPatch(FieldPatch),
    RemoveField(String),
    Save,
    SaveFinished(Result<(), String>),
}
