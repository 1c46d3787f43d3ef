use crate::{PdfCommand, PdfUpdate};
use pdf_compose::{ComposeSettings, PageDescriptor, Rasterizer, ViewState, render_preview};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Builds a rasterizer on the blocking thread that uses it
pub type RasterizerFactory =
    Arc<dyn Fn() -> pdf_compose::Result<Box<dyn Rasterizer>> + Send + Sync>;

struct PreviewRequest {
    pages: Vec<PageDescriptor>,
    view: ViewState,
    viewport_width: f32,
    settings: ComposeSettings,
    generation: u64,
}

/// Async worker task that processes PDF commands and sends updates
pub async fn worker_task(
    mut command_rx: mpsc::UnboundedReceiver<PdfCommand>,
    update_tx: mpsc::UnboundedSender<PdfUpdate>,
    rasterizer: RasterizerFactory,
) {
    while let Some(cmd) = command_rx.recv().await {
        process_command(cmd, &rasterizer, &mut command_rx, &update_tx).await;
    }
    log::debug!("Command channel closed, worker exiting");
}

async fn process_command(
    cmd: PdfCommand,
    rasterizer: &RasterizerFactory,
    command_rx: &mut mpsc::UnboundedReceiver<PdfCommand>,
    update_tx: &mpsc::UnboundedSender<PdfUpdate>,
) {
    match cmd {
        PdfCommand::RenderPreview {
            pages,
            view,
            viewport_width,
            settings,
            generation,
        } => {
            let mut request = PreviewRequest {
                pages,
                view,
                viewport_width,
                settings,
                generation,
            };

            // Drain any queued preview commands, keeping only the most recent
            while let Ok(next_cmd) = command_rx.try_recv() {
                match next_cmd {
                    PdfCommand::RenderPreview {
                        pages,
                        view,
                        viewport_width,
                        settings,
                        generation,
                    } => {
                        log::debug!("Discarding queued preview, using generation {generation}");
                        request = PreviewRequest {
                            pages,
                            view,
                            viewport_width,
                            settings,
                            generation,
                        };
                    }
                    // Can't put it back, so run it before the preview
                    other => Box::pin(process_command(other, rasterizer, command_rx, update_tx)).await,
                }
            }

            handle_render_preview(request, rasterizer, update_tx).await;
        }
        PdfCommand::Export {
            pages,
            output_path,
            settings,
        } => {
            handle_export(pages, output_path, settings, update_tx).await;
        }
    }
}

async fn handle_render_preview(
    request: PreviewRequest,
    rasterizer: &RasterizerFactory,
    update_tx: &mpsc::UnboundedSender<PdfUpdate>,
) {
    let generation = request.generation;
    let factory = Arc::clone(rasterizer);

    let result = tokio::task::spawn_blocking(move || {
        let rasterizer = factory()?;
        render_preview(
            &request.pages,
            &request.view,
            request.viewport_width,
            rasterizer.as_ref(),
            &request.settings,
        )
    })
    .await;

    let update = match result {
        Ok(Ok(pages)) => PdfUpdate::PreviewRendered { generation, pages },
        Ok(Err(e)) => PdfUpdate::PreviewFailed {
            generation,
            message: e.to_string(),
        },
        Err(e) => PdfUpdate::PreviewFailed {
            generation,
            message: format!("Task join error: {}", e),
        },
    };
    let _ = update_tx.send(update);
}

async fn handle_export(
    pages: Vec<PageDescriptor>,
    output_path: PathBuf,
    settings: ComposeSettings,
    update_tx: &mpsc::UnboundedSender<PdfUpdate>,
) {
    let result = pdf_compose::export(pages, &output_path, &settings)
        .await
        .map_err(|e| e.to_string());
    if let Err(message) = &result {
        log::error!("{message}");
    }
    let _ = update_tx.send(PdfUpdate::ExportFinished { result });
}
