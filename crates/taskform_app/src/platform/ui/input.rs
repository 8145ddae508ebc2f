use taskform_core::{Msg, PresetAction};

/// A line typed at the prompt, after parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Form(Msg),
    Help,
    Quit,
    Unknown(String),
}

pub const HELP: &[&str] = &[
    "name <text>      set the task name (empty to clear)",
    "node <key>       select a processing node (auto or id)",
    "preset <id>      select an options preset",
    "edit | duplicate | delete   manage the selected preset",
    "retry            reload after an error",
    "start            launch the task",
    "quit             leave without launching",
];

/// Parses one input line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "name" => Command::Form(Msg::NameChanged(rest.to_string())),
        "node" if !rest.is_empty() => Command::Form(Msg::NodeSelected(rest.to_string())),
        "preset" if !rest.is_empty() => Command::Form(Msg::PresetSelected(rest.to_string())),
        "edit" => Command::Form(Msg::PresetActionClicked(PresetAction::Edit)),
        "duplicate" => Command::Form(Msg::PresetActionClicked(PresetAction::Duplicate)),
        "delete" => Command::Form(Msg::PresetActionClicked(PresetAction::Delete)),
        "retry" => Command::Form(Msg::RetryClicked),
        "start" => Command::Form(Msg::StartClicked),
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        _ => Command::Unknown(line.to_string()),
    };
    Some(command)
}
