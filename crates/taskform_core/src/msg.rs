use crate::{NodeSummary, Preset, PresetAction, RequestId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// The form became live; start both loads.
    Mounted,
    /// The form is going away; cancel outstanding work.
    Unmounted,
    /// User edited the name field.
    NameChanged(String),
    /// Node endpoint answered (or failed) for `request_id`.
    NodesFetched {
        request_id: RequestId,
        result: Result<Vec<NodeSummary>, String>,
    },
    /// Preset endpoint answered (or failed) for `request_id`.
    PresetsFetched {
        request_id: RequestId,
        result: Result<Vec<Preset>, String>,
    },
    /// User picked a node; carries the raw dropdown value.
    NodeSelected(String),
    /// User picked a preset; carries the raw dropdown value.
    PresetSelected(String),
    /// User clicked Retry on the error panel.
    RetryClicked,
    /// User chose edit, duplicate or delete next to the preset dropdown.
    PresetActionClicked(PresetAction),
    /// User clicked Start.
    StartClicked,
}
