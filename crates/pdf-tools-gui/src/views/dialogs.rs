use eframe::egui;
use std::time::{Duration, Instant};

const TOAST_DURATION: Duration = Duration::from_secs(3);

/// Short-lived confirmation shown at the bottom of the window
pub struct Toast {
    message: String,
    shown_at: Instant,
}

impl Toast {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            shown_at: Instant::now(),
        }
    }

    fn expired(&self) -> bool {
        self.shown_at.elapsed() >= TOAST_DURATION
    }
}

pub fn show_toast(ctx: &egui::Context, toast: &mut Option<Toast>) {
    if toast.as_ref().is_some_and(Toast::expired) {
        *toast = None;
    }
    let Some(current) = toast else {
        return;
    };

    egui::Area::new(egui::Id::new("toast"))
        .anchor(egui::Align2::CENTER_BOTTOM, egui::vec2(0.0, -40.0))
        .interactable(false)
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.label(&current.message);
            });
        });

    ctx.request_repaint_after(TOAST_DURATION.saturating_sub(current.shown_at.elapsed()));
}

/// Modal error window; closed with OK or Escape
pub fn show_error(ctx: &egui::Context, error: &mut Option<String>) {
    let Some(message) = error.as_ref() else {
        return;
    };

    let mut close = false;
    let modal = egui::Modal::new(egui::Id::new("error_modal")).show(ctx, |ui| {
        ui.set_max_width(400.0);
        ui.heading("Error");
        ui.add_space(8.0);
        ui.label(message);
        ui.add_space(12.0);
        if ui.button("OK").clicked() {
            close = true;
        }
    });

    if close || modal.should_close() {
        *error = None;
    }
}
