use std::io::Write;

use taskform_core::PresetDialogRequest;

use super::render::render_preset_dialog;

/// Collaborator that edits, duplicates or deletes presets.
pub trait PresetDialog: Send {
    fn show(&mut self, request: &PresetDialogRequest);
}

/// Prints the dialog contents to a writer.
pub struct TerminalPresetDialog<W: Write + Send> {
    out: W,
}

impl<W: Write + Send> TerminalPresetDialog<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write + Send> PresetDialog for TerminalPresetDialog<W> {
    fn show(&mut self, request: &PresetDialogRequest) {
        for line in render_preset_dialog(request) {
            let _ = writeln!(self.out, "{line}");
        }
        let _ = self.out.flush();
    }
}
