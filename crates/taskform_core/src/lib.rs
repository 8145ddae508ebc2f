//! Taskform core: pure state machine and view-model helpers for the task launch form.
mod effect;
mod error;
mod msg;
mod nodes;
mod presets;
mod state;
mod task;
mod update;
mod view_model;

pub use effect::{Effect, PresetDialogRequest, RequestId, Resource};
pub use error::FormError;
pub use msg::Msg;
pub use nodes::{
    build_node_list, least_loaded, NodeId, NodeKey, NodeLink, NodeOption, NodeSummary,
    ProcessingNode,
};
pub use presets::{default_preset, Preset, PresetAction, PresetId, PresetOption, DEFAULT_PRESET_NAME};
pub use state::{FormSettings, FormState, Lifecycle, DEFAULT_RETRY_DELAY};
pub use task::{TaskInfo, TaskRef};
pub use update::update;
pub use view_model::{FormBody, FormView, NodeChoiceView, PresetChoiceView};
