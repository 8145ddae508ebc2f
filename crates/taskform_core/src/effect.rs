use std::time::Duration;

use crate::{NodeOption, Preset, PresetAction, TaskInfo};

pub type RequestId = u64;

/// Remote collections the form loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    ProcessingNodes,
    Presets,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Fetch `resource` after `delay`. The result must come back tagged with `request_id`.
    Fetch {
        request_id: RequestId,
        resource: Resource,
        delay: Duration,
    },
    /// Abort every in-flight fetch and every pending retry.
    CancelPending,
    /// Both collections loaded; emitted at most once per form.
    NotifyFormLoaded,
    /// Hand the active preset to the preset dialog.
    OpenPresetDialog(PresetDialogRequest),
    /// The user started the task.
    LaunchTask(TaskInfo),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresetDialogRequest {
    pub action: PresetAction,
    pub preset: Preset,
    pub available_options: Vec<NodeOption>,
}
