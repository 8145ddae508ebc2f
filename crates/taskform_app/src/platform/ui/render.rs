use taskform_core::{
    FormBody, FormView, NodeChoiceView, PresetAction, PresetChoiceView, PresetDialogRequest,
    TaskInfo,
};

pub fn render(view: &FormView) -> Vec<String> {
    match &view.body {
        FormBody::Error(error) => {
            let mut lines: Vec<String> = error.to_string().lines().map(|l| format!("! {l}")).collect();
            lines.push("[retry] Retry".to_string());
            lines
        }
        FormBody::Loading => vec![
            name_line(view),
            "Loading processing nodes and presets...".to_string(),
        ],
        FormBody::Ready { nodes, presets } => {
            let mut lines = vec![name_line(view), "Processing Node:".to_string()];
            lines.extend(nodes.iter().map(format_node_row));
            lines.push("Options:".to_string());
            lines.extend(presets.iter().map(format_preset_row));
            lines.push("Preset actions: edit | duplicate | delete    Launch: start".to_string());
            lines
        }
    }
}

fn name_line(view: &FormView) -> String {
    if view.name.is_empty() {
        format!("Name: ({})", view.name_placeholder)
    } else {
        format!("Name: {}", view.name)
    }
}

fn format_node_row(node: &NodeChoiceView) -> String {
    let marker = if node.selected { "(*)" } else { "( )" };
    let suffix = if node.enabled { "" } else { "  [offline]" };
    format!("  {marker} [{key}] {label}{suffix}", key = node.key, label = node.label)
}

fn format_preset_row(preset: &PresetChoiceView) -> String {
    let marker = if preset.selected { "(*)" } else { "( )" };
    format!("  {marker} [{}] {}", preset.id, preset.name)
}

pub fn render_task_info(info: &TaskInfo) -> Vec<String> {
    let node = match &info.selected_node {
        Some(node) if node.is_auto() => format!("auto (currently {})", node.url),
        Some(node) => format!("{} ({})", node.label, node.url),
        None => "none".to_string(),
    };
    let mut lines = vec![
        format!("Launching task \"{}\"", info.name),
        format!("  node: {node}"),
    ];
    lines.extend(
        info.options
            .iter()
            .map(|option| format!("  {} = {}", option.name, option.value)),
    );
    lines
}

pub fn render_preset_dialog(request: &PresetDialogRequest) -> Vec<String> {
    let title = match request.action {
        PresetAction::Edit => format!("Edit preset \"{}\"", request.preset.name),
        PresetAction::Duplicate => format!("Duplicate preset \"{}\"", request.preset.name),
        PresetAction::Delete => format!("Delete preset \"{}\"?", request.preset.name),
    };
    let mut lines = vec![title];
    if request.action == PresetAction::Delete {
        return lines;
    }
    for option in &request.available_options {
        let current = request
            .preset
            .options
            .iter()
            .find(|set| set.name == option.name)
            .map(|set| set.value.as_str())
            .unwrap_or(option.value.as_str());
        let help = if option.help.is_empty() {
            String::new()
        } else {
            format!("  -- {}", option.help)
        };
        lines.push(format!("  {} ({}) = {}{}", option.name, option.kind, current, help));
    }
    lines
}
