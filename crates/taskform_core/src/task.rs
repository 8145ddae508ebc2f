use crate::{NodeId, PresetOption, ProcessingNode};

/// The existing task being edited, if any.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskRef {
    pub name: Option<String>,
    /// Node the task was assigned to.
    pub processing_node: Option<NodeId>,
    /// Whether that assignment was made by auto-selection.
    pub auto_processing_node: bool,
}

/// What the launching caller receives once the user starts the task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskInfo {
    pub name: String,
    pub selected_node: Option<ProcessingNode>,
    pub options: Vec<PresetOption>,
}
