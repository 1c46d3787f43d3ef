use eframe::egui;
use pdf_async_runtime::{PdfCommand, PdfUpdate, RasterizerFactory};
use pdf_compose::{ComposeError, Rasterizer, Session};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::logger::AppLogger;
use crate::views::dialogs::{self, Toast};
use crate::views::preview::{PreviewPage, PreviewState};
use crate::views::{Action, controls, page_list, preview};

pub struct ComposerApp {
    session: Session,
    logger: AppLogger,

    // Async infrastructure
    command_tx: mpsc::UnboundedSender<PdfCommand>,
    update_rx: mpsc::UnboundedReceiver<PdfUpdate>,

    // Preview state
    preview_pages: Vec<PreviewPage>,
    preview_generation: u64,
    preview_pending: bool,
    needs_preview: bool,
    last_viewport_width: f32,

    exporting: bool,
    error: Option<String>,
    toast: Option<Toast>,

    _tokio_handle: tokio::runtime::Handle,
}

#[cfg(feature = "pdfium")]
fn rasterizer_factory() -> RasterizerFactory {
    Arc::new(|| {
        pdf_compose::render::PdfiumRasterizer::new().map(|r| Box::new(r) as Box<dyn Rasterizer>)
    })
}

#[cfg(not(feature = "pdfium"))]
fn rasterizer_factory() -> RasterizerFactory {
    Arc::new(|| Ok(Box::new(pdf_compose::NoPdfRasterizer) as Box<dyn Rasterizer>))
}

/// Queue a command for the worker
fn send_command(
    command_tx: &mpsc::UnboundedSender<PdfCommand>,
    command: PdfCommand,
) -> Result<(), String> {
    command_tx
        .send(command)
        .map_err(|_| "Background worker has stopped; restart the application".to_string())
}

impl ComposerApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        tokio_handle: tokio::runtime::Handle,
        logger: AppLogger,
    ) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        // Spawn worker task
        tokio_handle.spawn(pdf_async_runtime::worker_task(
            command_rx,
            update_tx,
            rasterizer_factory(),
        ));

        Self {
            session: Session::default(),
            logger,
            command_tx,
            update_rx,
            preview_pages: Vec::new(),
            preview_generation: 0,
            preview_pending: false,
            needs_preview: false,
            last_viewport_width: 0.0,
            exporting: false,
            error: None,
            toast: None,
            _tokio_handle: tokio_handle,
        }
    }

    fn request_preview(&mut self, viewport_width: f32) {
        self.needs_preview = false;
        self.last_viewport_width = viewport_width;
        self.preview_generation += 1;

        if self.session.composition().is_empty() {
            self.preview_pages.clear();
            self.preview_pending = false;
            return;
        }

        let command = PdfCommand::RenderPreview {
            pages: self.session.composition().snapshot(),
            view: *self.session.view(),
            viewport_width,
            settings: self.session.settings().clone(),
            generation: self.preview_generation,
        };
        self.preview_pending = match send_command(&self.command_tx, command) {
            Ok(()) => true,
            Err(message) => {
                self.show_error(message);
                false
            }
        };
    }

    fn show_error(&mut self, err: impl std::fmt::Display) {
        log::error!("{err}");
        self.error = Some(err.to_string());
    }

    fn add_files(&mut self, paths: &[PathBuf]) {
        let report = self.session.add_files(paths);
        if !report.added.is_empty() {
            log::info!("Added {} pages", report.added.len());
        }
        if !report.failed.is_empty() {
            let lines: Vec<String> = report
                .failed
                .iter()
                .map(|(_, err)| err.to_string())
                .collect();
            self.error = Some(lines.join("\n"));
        }
        self.needs_preview = true;
    }

    fn start_export(&mut self) {
        if self.exporting {
            return;
        }
        if self.session.composition().is_empty() {
            self.show_error(ComposeError::NoPages);
            return;
        }
        let Some(output_path) = rfd::FileDialog::new()
            .add_filter("PDF", &["pdf"])
            .set_file_name("composed.pdf")
            .save_file()
        else {
            return;
        };

        log::info!("Exporting to {}", output_path.display());
        let command = PdfCommand::Export {
            pages: self.session.composition().snapshot(),
            output_path,
            settings: self.session.settings().clone(),
        };
        // No ExportFinished will arrive if the worker is gone
        self.exporting = match send_command(&self.command_tx, command) {
            Ok(()) => true,
            Err(message) => {
                self.show_error(message);
                false
            }
        };
    }

    fn apply(&mut self, action: Action) {
        let result: Result<bool, ComposeError> = match action {
            Action::PickFiles => {
                if let Some(paths) = rfd::FileDialog::new()
                    .add_filter("PDF and images", &["pdf", "png", "jpg", "jpeg"])
                    .pick_files()
                {
                    self.add_files(&paths);
                }
                Ok(false)
            }
            Action::AddFiles(paths) => {
                self.add_files(&paths);
                Ok(false)
            }
            Action::ZoomIn => Ok(self.session.zoom_in()),
            Action::ZoomOut => Ok(self.session.zoom_out()),
            Action::Fit => Ok(self.session.fit()),
            Action::Rotate(degrees) => self
                .session
                .rotate_selected(degrees)
                .map(|r| r.is_some()),
            Action::Duplicate => self.session.duplicate_selected().map(|id| id.is_some()),
            Action::Delete => self.session.delete_selected(),
            Action::Clear => Ok(self.session.clear_all()),
            Action::Select(index) => {
                self.session.select(Some(index));
                Ok(false)
            }
            Action::SelectPage(id) => {
                self.session.select_page(id);
                Ok(false)
            }
            Action::MoveRow { from, to } => self.session.move_row(from, to),
            Action::Export => {
                self.start_export();
                Ok(false)
            }
        };

        match result {
            Ok(true) => self.needs_preview = true,
            Ok(false) => {}
            Err(e) => self.show_error(e),
        }
    }

    fn process_updates(&mut self, ctx: &egui::Context) {
        while let Ok(update) = self.update_rx.try_recv() {
            match update {
                PdfUpdate::PreviewRendered { generation, pages } => {
                    if generation != self.preview_generation {
                        log::debug!("Dropping stale preview {generation}");
                        continue;
                    }
                    self.preview_pages = pages
                        .into_iter()
                        .map(|page| PreviewPage::upload(ctx, page))
                        .collect();
                    self.preview_pending = false;
                }
                PdfUpdate::PreviewFailed {
                    generation,
                    message,
                } => {
                    if generation == self.preview_generation {
                        self.preview_pending = false;
                        self.show_error(message);
                    }
                }
                PdfUpdate::ExportFinished { result } => {
                    self.exporting = false;
                    match result {
                        Ok(summary) => {
                            self.toast = Some(Toast::new(format!(
                                "Exported {} pages → {}",
                                summary.page_count,
                                summary.path.display()
                            )));
                        }
                        Err(message) => self.error = Some(message),
                    }
                }
            }
        }
    }
}

impl eframe::App for ComposerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_updates(ctx);

        let mut actions = Vec::new();
        controls::dropped_files(ctx, &mut actions);
        if self.error.is_none() {
            controls::shortcuts(ctx, &mut actions);
        }

        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            controls::show(
                ui,
                &controls::ControlsState {
                    has_pages: !self.session.composition().is_empty(),
                    has_selection: self.session.selected().is_some(),
                    exporting: self.exporting,
                },
                &mut actions,
            );
        });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(format!("{} pages", self.session.composition().len()));
                ui.separator();
                if let Some(entry) = self.logger.latest() {
                    ui.label(entry.status_line());
                }
            });
        });

        egui::SidePanel::right("page_list")
            .min_width(220.0)
            .show(ctx, |ui| {
                page_list::show(
                    ui,
                    self.session.page_list(),
                    self.session.selected(),
                    &mut actions,
                );
            });

        let mut viewport_width = self.last_viewport_width;
        egui::CentralPanel::default().show(ctx, |ui| {
            viewport_width = ui.available_width();
            let selected = self
                .session
                .selected()
                .and_then(|i| self.session.composition().get(i))
                .map(|p| p.id());
            preview::show(
                ui,
                &PreviewState {
                    pages: &self.preview_pages,
                    selected,
                    loading: self.preview_pending,
                    empty: self.session.composition().is_empty(),
                    overlay_margin: self.session.settings().overlay_margin,
                },
                &mut actions,
            );
        });

        for action in actions {
            self.apply(action);
        }

        // Auto-fit follows the window width
        let resized = self.session.view().auto_fit
            && (viewport_width - self.last_viewport_width).abs() > 1.0;
        if self.needs_preview || resized {
            self.request_preview(viewport_width);
        }

        dialogs::show_error(ctx, &mut self.error);
        dialogs::show_toast(ctx, &mut self.toast);

        if self.preview_pending || self.exporting {
            ctx.request_repaint();
        }
    }
}
