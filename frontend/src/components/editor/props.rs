use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct EditorProps {
    /// The template to load and edit.
    pub template_id: String,
    /// Back to the template library.
    pub on_back: Callback<()>,
}
