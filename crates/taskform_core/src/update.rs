use std::time::Duration;

use crate::presets::parse_preset_id;
use crate::state::Lifecycle;
use crate::{Effect, FormState, Msg, NodeKey, PresetDialogRequest, RequestId, Resource};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: FormState, msg: Msg) -> (FormState, Vec<Effect>) {
    if state.lifecycle() == Lifecycle::TornDown {
        return (state, Vec::new());
    }

    let effects = match msg {
        Msg::Mounted => {
            if state.lifecycle() != Lifecycle::Created {
                return (state, Vec::new());
            }
            state.set_lifecycle(Lifecycle::Mounted);
            state.mark_dirty();
            start_loads(&mut state)
        }
        Msg::Unmounted => {
            let was_mounted = state.lifecycle() == Lifecycle::Mounted;
            state.set_lifecycle(Lifecycle::TornDown);
            state.clear_pending();
            if was_mounted {
                vec![Effect::CancelPending]
            } else {
                Vec::new()
            }
        }
        Msg::NameChanged(name) => {
            state.set_name(name);
            Vec::new()
        }
        Msg::NodesFetched { request_id, result } => {
            if !accepts_result(&mut state, Resource::ProcessingNodes, request_id) {
                return (state, Vec::new());
            }
            match result {
                Ok(summaries) => {
                    if let Err(error) = state.apply_nodes(&summaries) {
                        state.set_error(error);
                    }
                    form_loaded_effects(&mut state)
                }
                Err(_) => vec![retry(&mut state, Resource::ProcessingNodes)],
            }
        }
        Msg::PresetsFetched { request_id, result } => {
            if !accepts_result(&mut state, Resource::Presets, request_id) {
                return (state, Vec::new());
            }
            match result {
                Ok(presets) => {
                    // An empty list is a configuration problem, not retried.
                    if let Err(error) = state.apply_presets(presets) {
                        state.set_error(error);
                    }
                    form_loaded_effects(&mut state)
                }
                Err(_) => vec![retry(&mut state, Resource::Presets)],
            }
        }
        Msg::NodeSelected(raw) => {
            if let Some(key) = NodeKey::parse(&raw) {
                state.select_node(key);
            }
            Vec::new()
        }
        Msg::PresetSelected(raw) => {
            if let Some(id) = parse_preset_id(&raw) {
                state.select_preset(id);
            }
            Vec::new()
        }
        Msg::RetryClicked => {
            if state.lifecycle() != Lifecycle::Mounted || state.error().is_none() {
                return (state, Vec::new());
            }
            state.reset_loads();
            let mut effects = vec![Effect::CancelPending];
            effects.extend(start_loads(&mut state));
            effects
        }
        Msg::PresetActionClicked(action) => {
            if !state.is_ready() {
                return (state, Vec::new());
            }
            match (state.selected_preset(), state.selected_node()) {
                (Some(preset), Some(node)) => {
                    vec![Effect::OpenPresetDialog(PresetDialogRequest {
                        action,
                        preset: preset.clone(),
                        available_options: node.options.clone(),
                    })]
                }
                _ => Vec::new(),
            }
        }
        Msg::StartClicked => {
            if state.is_ready() {
                vec![Effect::LaunchTask(state.task_info())]
            } else {
                Vec::new()
            }
        }
    };

    (state, effects)
}

fn start_loads(state: &mut FormState) -> Vec<Effect> {
    [Resource::ProcessingNodes, Resource::Presets]
        .into_iter()
        .map(|resource| fetch(state, resource, Duration::ZERO))
        .collect()
}

fn retry(state: &mut FormState, resource: Resource) -> Effect {
    let delay = state.retry_delay();
    fetch(state, resource, delay)
}

fn fetch(state: &mut FormState, resource: Resource, delay: Duration) -> Effect {
    Effect::Fetch {
        request_id: state.begin_request(resource),
        resource,
        delay,
    }
}

fn accepts_result(state: &mut FormState, resource: Resource, request_id: RequestId) -> bool {
    state.lifecycle() == Lifecycle::Mounted && state.complete_request(resource, request_id)
}

fn form_loaded_effects(state: &mut FormState) -> Vec<Effect> {
    if state.take_form_loaded() {
        vec![Effect::NotifyFormLoaded]
    } else {
        Vec::new()
    }
}
