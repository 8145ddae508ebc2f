use std::fmt;
use std::time::Duration;

use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::nodes::initial_node_key;
use crate::view_model::{FormBody, FormView, NodeChoiceView, PresetChoiceView};
use crate::{
    build_node_list, default_preset, FormError, NodeKey, NodeSummary, Preset, PresetId,
    ProcessingNode, RequestId, Resource, TaskInfo, TaskRef,
};

/// Delay between a failed fetch and its retry.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Construction parameters for [`FormState`].
#[derive(Debug, Clone)]
pub struct FormSettings {
    /// The task being edited, `None` when creating a new one.
    pub task: Option<TaskRef>,
    /// Name used when the user leaves the name field blank.
    pub name_placeholder: String,
    pub retry_delay: Duration,
    /// Seed for the auto-node tie-break; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl FormSettings {
    pub fn new(name_placeholder: impl Into<String>) -> Self {
        Self {
            task: None,
            name_placeholder: name_placeholder.into(),
            retry_delay: DEFAULT_RETRY_DELAY,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    #[default]
    Created,
    Mounted,
    TornDown,
}

#[derive(Clone)]
pub(crate) struct TieBreaker(SmallRng);

impl fmt::Debug for TieBreaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TieBreaker")
    }
}

#[derive(Debug, Clone)]
pub struct FormState {
    task: Option<TaskRef>,
    name: String,
    name_placeholder: String,
    retry_delay: Duration,
    lifecycle: Lifecycle,
    error: Option<FormError>,
    nodes: Vec<ProcessingNode>,
    presets: Vec<Preset>,
    loaded_nodes: bool,
    loaded_presets: bool,
    selected_node: Option<NodeKey>,
    selected_preset: Option<PresetId>,
    pending_nodes: Option<RequestId>,
    pending_presets: Option<RequestId>,
    next_request_id: RequestId,
    form_loaded_notified: bool,
    tie_breaker: TieBreaker,
    dirty: bool,
}

impl FormState {
    pub fn new(settings: FormSettings) -> Self {
        let rng = match settings.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };
        let name = settings
            .task
            .as_ref()
            .and_then(|task| task.name.clone())
            .unwrap_or_default();
        Self {
            task: settings.task,
            name,
            name_placeholder: settings.name_placeholder,
            retry_delay: settings.retry_delay,
            lifecycle: Lifecycle::Created,
            error: None,
            nodes: Vec::new(),
            presets: Vec::new(),
            loaded_nodes: false,
            loaded_presets: false,
            selected_node: None,
            selected_preset: None,
            pending_nodes: None,
            pending_presets: None,
            next_request_id: 1,
            form_loaded_notified: false,
            tie_breaker: TieBreaker(rng),
            dirty: false,
        }
    }

    pub fn view(&self) -> FormView {
        let body = if let Some(error) = &self.error {
            FormBody::Error(error.clone())
        } else if self.is_ready() {
            FormBody::Ready {
                nodes: self
                    .nodes
                    .iter()
                    .map(|node| NodeChoiceView {
                        key: node.key,
                        label: node.label.clone(),
                        enabled: node.enabled,
                        selected: Some(node.key) == self.selected_node,
                    })
                    .collect(),
                presets: self
                    .presets
                    .iter()
                    .map(|preset| PresetChoiceView {
                        id: preset.id,
                        name: preset.name.clone(),
                        selected: Some(preset.id) == self.selected_preset,
                    })
                    .collect(),
            }
        } else {
            FormBody::Loading
        };

        FormView {
            name: self.name.clone(),
            name_placeholder: self.name_placeholder.clone(),
            body,
        }
    }

    /// Both lists loaded, both selections resolved and no error showing.
    pub fn is_ready(&self) -> bool {
        self.error.is_none()
            && self.loaded_nodes
            && self.loaded_presets
            && self.selected_node().is_some()
            && self.selected_preset().is_some()
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn error(&self) -> Option<&FormError> {
        self.error.as_ref()
    }

    pub fn nodes(&self) -> &[ProcessingNode] {
        &self.nodes
    }

    pub fn presets(&self) -> &[Preset] {
        &self.presets
    }

    pub fn selected_node(&self) -> Option<&ProcessingNode> {
        let key = self.selected_node?;
        self.nodes.iter().find(|node| node.key == key)
    }

    pub fn selected_preset(&self) -> Option<&Preset> {
        let id = self.selected_preset?;
        self.presets.iter().find(|preset| preset.id == id)
    }

    pub fn is_loaded(&self, resource: Resource) -> bool {
        match resource {
            Resource::ProcessingNodes => self.loaded_nodes,
            Resource::Presets => self.loaded_presets,
        }
    }

    /// Describes the task as the launching caller should create it.
    pub fn task_info(&self) -> TaskInfo {
        let name = if self.name.is_empty() {
            self.name_placeholder.clone()
        } else {
            self.name.clone()
        };
        TaskInfo {
            name,
            selected_node: self.selected_node().cloned(),
            options: self
                .selected_preset()
                .map(|preset| preset.options.clone())
                .unwrap_or_default(),
        }
    }

    /// Returns whether the view changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn retry_delay(&self) -> Duration {
        self.retry_delay
    }

    pub(crate) fn set_lifecycle(&mut self, lifecycle: Lifecycle) {
        self.lifecycle = lifecycle;
    }

    pub(crate) fn set_name(&mut self, name: String) {
        if self.name != name {
            self.name = name;
            self.mark_dirty();
        }
    }

    /// Allocates a request id and records it as the one outstanding for `resource`.
    pub(crate) fn begin_request(&mut self, resource: Resource) -> RequestId {
        let request_id = self.next_request_id;
        self.next_request_id += 1;
        match resource {
            Resource::ProcessingNodes => self.pending_nodes = Some(request_id),
            Resource::Presets => self.pending_presets = Some(request_id),
        }
        request_id
    }

    /// Clears the outstanding request for `resource` if `request_id` is it.
    ///
    /// Returns false for superseded or cancelled requests.
    pub(crate) fn complete_request(&mut self, resource: Resource, request_id: RequestId) -> bool {
        let pending = match resource {
            Resource::ProcessingNodes => &mut self.pending_nodes,
            Resource::Presets => &mut self.pending_presets,
        };
        if *pending == Some(request_id) {
            *pending = None;
            true
        } else {
            false
        }
    }

    pub(crate) fn clear_pending(&mut self) {
        self.pending_nodes = None;
        self.pending_presets = None;
    }

    /// Drops everything loaded so far so both lists can load again.
    pub(crate) fn reset_loads(&mut self) {
        self.error = None;
        self.nodes.clear();
        self.presets.clear();
        self.loaded_nodes = false;
        self.loaded_presets = false;
        self.selected_node = None;
        self.selected_preset = None;
        self.mark_dirty();
    }

    pub(crate) fn set_error(&mut self, error: FormError) {
        self.error = Some(error);
        self.mark_dirty();
    }

    pub(crate) fn apply_nodes(&mut self, summaries: &[NodeSummary]) -> Result<(), FormError> {
        let nodes = build_node_list(summaries, self.task.as_ref(), &mut self.tie_breaker.0)?;
        self.nodes = nodes;
        self.loaded_nodes = true;

        let wanted = initial_node_key(self.task.as_ref());
        let listed = self.nodes.iter().any(|node| node.key == wanted);
        // An edited task keeps its node even when offline; a vanished one falls back to auto.
        self.selected_node = Some(if listed { wanted } else { NodeKey::Auto });
        self.mark_dirty();
        Ok(())
    }

    pub(crate) fn apply_presets(&mut self, presets: Vec<Preset>) -> Result<(), FormError> {
        let selected = default_preset(&presets)
            .map(|preset| preset.id)
            .ok_or(FormError::NoPresets)?;
        self.presets = presets;
        self.selected_preset = Some(selected);
        self.loaded_presets = true;
        self.mark_dirty();
        Ok(())
    }

    /// Selects the enabled node under `key`. Unknown or disabled keys are ignored.
    pub(crate) fn select_node(&mut self, key: NodeKey) -> bool {
        let found = self.nodes.iter().any(|node| node.key == key && node.enabled);
        if found && self.selected_node != Some(key) {
            self.selected_node = Some(key);
            self.mark_dirty();
        }
        found
    }

    /// Selects the preset with `id`. Unknown ids are ignored.
    pub(crate) fn select_preset(&mut self, id: PresetId) -> bool {
        let found = self.presets.iter().any(|preset| preset.id == id);
        if found && self.selected_preset != Some(id) {
            self.selected_preset = Some(id);
            self.mark_dirty();
        }
        found
    }

    /// True exactly once: the first time both lists are loaded without error.
    pub(crate) fn take_form_loaded(&mut self) -> bool {
        if self.form_loaded_notified
            || self.error.is_some()
            || !self.loaded_nodes
            || !self.loaded_presets
        {
            return false;
        }
        self.form_loaded_notified = true;
        true
    }
}
