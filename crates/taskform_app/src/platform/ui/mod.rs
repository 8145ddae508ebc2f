pub mod input;
pub mod preset_dialog;
pub mod render;
