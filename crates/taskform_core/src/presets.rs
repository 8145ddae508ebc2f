pub type PresetId = i64;

/// Name of the preset selected by default when present. Not translated.
pub const DEFAULT_PRESET_NAME: &str = "Default";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresetOption {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preset {
    pub id: PresetId,
    pub name: String,
    pub options: Vec<PresetOption>,
}

/// The preset named [`DEFAULT_PRESET_NAME`], else the first one.
pub fn default_preset(presets: &[Preset]) -> Option<&Preset> {
    presets
        .iter()
        .find(|preset| preset.name == DEFAULT_PRESET_NAME)
        .or_else(|| presets.first())
}

/// Parses a dropdown value into a preset id.
pub(crate) fn parse_preset_id(raw: &str) -> Option<PresetId> {
    raw.trim().parse().ok()
}

/// Preset management actions offered next to the preset dropdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresetAction {
    Edit,
    Duplicate,
    Delete,
}
