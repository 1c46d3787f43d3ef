use eframe::egui;
use pdf_compose::{PageId, RenderedPage};

use super::Action;

/// A rendered page uploaded to the GPU
pub struct PreviewPage {
    pub page: RenderedPage,
    pub texture: egui::TextureHandle,
}

impl PreviewPage {
    pub fn upload(ctx: &egui::Context, page: RenderedPage) -> Self {
        let size = [page.image.width() as usize, page.image.height() as usize];
        let color_image = egui::ColorImage::from_rgb(size, page.image.as_raw());
        let texture = ctx.load_texture(
            format!("preview_{}", page.id),
            color_image,
            egui::TextureOptions::LINEAR,
        );
        Self { page, texture }
    }
}

pub struct PreviewState<'a> {
    pub pages: &'a [PreviewPage],
    pub selected: Option<PageId>,
    pub loading: bool,
    pub empty: bool,
    pub overlay_margin: f32,
}

pub fn show(ui: &mut egui::Ui, state: &PreviewState<'_>, actions: &mut Vec<Action>) {
    let area = ui.available_rect_before_wrap();

    if state.empty {
        ui.centered_and_justified(|ui| {
            ui.vertical_centered(|ui| {
                ui.heading("No Pages");
                ui.label("Add PDF or image files, or drop them on the window");
            });
        });
        return;
    }

    egui::ScrollArea::both().show(ui, |ui| {
        ui.vertical_centered(|ui| {
            for preview in state.pages {
                let response = ui.add(
                    egui::Image::new((preview.texture.id(), preview.texture.size_vec2()))
                        .sense(egui::Sense::click()),
                );
                if response.clicked() {
                    actions.push(Action::SelectPage(preview.page.id));
                }
                if state.selected == Some(preview.page.id) {
                    ui.painter().rect_stroke(
                        response.rect,
                        0.0,
                        ui.visuals().selection.stroke,
                        egui::StrokeKind::Outside,
                    );
                }
                paint_badge(ui, &preview.page, response.rect, state.overlay_margin);
                ui.add_space(10.0);
            }
        });
    });

    if state.loading {
        paint_loading_overlay(ui, area);
    }
}

/// "Page N" in the bottom-right corner of the page
fn paint_badge(ui: &egui::Ui, page: &RenderedPage, rect: egui::Rect, margin: f32) {
    let painter = ui.painter();
    let galley = painter.layout_no_wrap(
        page.overlay_text(),
        egui::FontId::proportional(14.0),
        egui::Color32::WHITE,
    );
    let padding = egui::vec2(6.0, 3.0);
    let label_size = galley.size() + padding * 2.0;

    let (x, y) = page.overlay_origin(label_size.x, label_size.y, margin);
    let label_rect = egui::Rect::from_min_size(rect.min + egui::vec2(x, y), label_size);

    painter.rect_filled(label_rect, 4.0, egui::Color32::from_black_alpha(160));
    painter.galley(label_rect.min + padding, galley, egui::Color32::WHITE);
}

fn paint_loading_overlay(ui: &mut egui::Ui, area: egui::Rect) {
    ui.painter()
        .rect_filled(area, 0.0, egui::Color32::from_black_alpha(100));
    let spinner_rect = egui::Rect::from_center_size(area.center(), egui::vec2(32.0, 32.0));
    ui.put(spinner_rect, egui::Spinner::new().size(32.0));
}
