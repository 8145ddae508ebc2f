use crate::{FormError, NodeKey, PresetId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormView {
    pub name: String,
    pub name_placeholder: String,
    pub body: FormBody,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormBody {
    /// A configuration error with a Retry action.
    Error(FormError),
    /// Still waiting on one of the lists or on a selection.
    Loading,
    Ready {
        nodes: Vec<NodeChoiceView>,
        presets: Vec<PresetChoiceView>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeChoiceView {
    pub key: NodeKey,
    pub label: String,
    /// Disabled entries are listed but cannot be selected.
    pub enabled: bool,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresetChoiceView {
    pub id: PresetId,
    pub name: String,
    pub selected: bool,
}
