use eframe::egui;

use super::Action;

pub struct ControlsState {
    pub has_pages: bool,
    pub has_selection: bool,
    pub exporting: bool,
}

pub fn show(ui: &mut egui::Ui, state: &ControlsState, actions: &mut Vec<Action>) {
    ui.horizontal(|ui| {
        if ui.button("➕ Add Files...").clicked() {
            actions.push(Action::PickFiles);
        }

        ui.separator();

        if ui.button("🔍+").on_hover_text("Zoom in").clicked() {
            actions.push(Action::ZoomIn);
        }
        if ui.button("🔍−").on_hover_text("Zoom out").clicked() {
            actions.push(Action::ZoomOut);
        }
        if ui.button("Fit").on_hover_text("Fit pages to width").clicked() {
            actions.push(Action::Fit);
        }

        ui.separator();

        ui.add_enabled_ui(state.has_selection, |ui| {
            if ui.button("⟲").on_hover_text("Rotate left").clicked() {
                actions.push(Action::Rotate(-90));
            }
            if ui.button("⟳").on_hover_text("Rotate right").clicked() {
                actions.push(Action::Rotate(90));
            }
            if ui.button("Duplicate").clicked() {
                actions.push(Action::Duplicate);
            }
            if ui.button("🗑 Delete").clicked() {
                actions.push(Action::Delete);
            }
        });

        ui.separator();

        let can_export = state.has_pages && !state.exporting;
        if ui
            .add_enabled(can_export, egui::Button::new("💾 Export PDF..."))
            .on_hover_text("Ctrl+S")
            .clicked()
        {
            actions.push(Action::Export);
        }
        if state.exporting {
            ui.spinner();
        }

        if ui
            .add_enabled(state.has_pages, egui::Button::new("Clear"))
            .clicked()
        {
            actions.push(Action::Clear);
        }
    });
}

/// Keyboard shortcuts: Delete removes the selected page, Ctrl+S exports
pub fn shortcuts(ctx: &egui::Context, actions: &mut Vec<Action>) {
    ctx.input_mut(|i| {
        if i.consume_key(egui::Modifiers::NONE, egui::Key::Delete) {
            actions.push(Action::Delete);
        }
        if i.consume_key(egui::Modifiers::COMMAND, egui::Key::S) {
            actions.push(Action::Export);
        }
    });
}

/// Files dropped on the window
pub fn dropped_files(ctx: &egui::Context, actions: &mut Vec<Action>) {
    let paths: Vec<_> = ctx.input(|i| {
        i.raw
            .dropped_files
            .iter()
            .filter_map(|file| file.path.clone())
            .collect()
    });
    if !paths.is_empty() {
        actions.push(Action::AddFiles(paths));
    }
}
