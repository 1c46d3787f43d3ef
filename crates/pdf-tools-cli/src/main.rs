use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use pdf_compose::{ComposeSettings, Composition, Rasterizer, Session, ViewState, render_preview};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "pdft", about = "Compose PDFs from pages of other PDFs and images", version)]
struct Cli {
    /// Settings file (JSON)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// More output (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the pages the inputs would contribute
    List {
        /// Input PDF or image files
        #[arg(required = true, num_args = 1..)]
        inputs: Vec<PathBuf>,
    },

    /// Build a composition, edit it and export a PDF
    ///
    /// Edits run in this order: rotations, duplicates, deletions, then the
    /// final order. Positions are 1-based and refer to the composition as
    /// it stands when the edit runs.
    Compose {
        /// Input PDF or image files - can specify multiple
        #[arg(short, long, required = true, num_args = 1..)]
        input: Vec<PathBuf>,

        /// Output PDF file
        #[arg(short, long)]
        output: PathBuf,

        /// Rotate a page clockwise, e.g. `2:90` or `3:-90`
        #[arg(long, value_parser = parse_rotation)]
        rotate: Vec<(usize, i32)>,

        /// Duplicate the page at this position
        #[arg(long)]
        duplicate: Vec<usize>,

        /// Delete the page at this position
        #[arg(long)]
        delete: Vec<usize>,

        /// New page order, e.g. `3,1,2`
        #[arg(long, value_delimiter = ',')]
        order: Option<Vec<usize>>,
    },

    /// Render every page to PNG files
    Preview {
        /// Input PDF or image files - can specify multiple
        #[arg(short, long, required = true, num_args = 1..)]
        input: Vec<PathBuf>,

        /// Output directory
        #[arg(short, long)]
        output: PathBuf,

        /// Zoom factor applied to the base rendering
        #[arg(long, conflicts_with = "width")]
        zoom: Option<f32>,

        /// Scale every page to this width in pixels
        #[arg(long)]
        width: Option<u32>,
    },
}

/// Parse `POS:DEG`
fn parse_rotation(s: &str) -> Result<(usize, i32), String> {
    let (pos, deg) = s
        .split_once(':')
        .ok_or_else(|| format!("expected POS:DEG, got `{s}`"))?;
    let pos = pos
        .trim()
        .parse()
        .map_err(|e| format!("bad position `{pos}`: {e}"))?;
    let deg = deg
        .trim()
        .parse()
        .map_err(|e| format!("bad degrees `{deg}`: {e}"))?;
    Ok((pos, deg))
}

/// 1-based position to index
fn index(position: usize) -> Result<usize> {
    if position == 0 {
        bail!("Page positions start at 1");
    }
    Ok(position - 1)
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

async fn load_settings(path: Option<&Path>) -> Result<ComposeSettings> {
    match path {
        Some(path) => ComposeSettings::load(path)
            .await
            .with_context(|| format!("Failed to load settings from {}", path.display())),
        None => Ok(ComposeSettings::default()),
    }
}

/// Add every input, failing on the first file that can't be opened
fn open_session(inputs: &[PathBuf], settings: ComposeSettings) -> Result<Session> {
    let mut session = Session::new(settings);
    let report = session.add_files(inputs);
    if let Some((path, err)) = report.failed.into_iter().next() {
        return Err(err).with_context(|| format!("Failed to add {}", path.display()));
    }
    Ok(session)
}

fn apply_edits(
    composition: &mut Composition,
    rotate: &[(usize, i32)],
    duplicate: &[usize],
    delete: &[usize],
    order: Option<&[usize]>,
) -> Result<()> {
    for &(position, degrees) in rotate {
        composition.rotate(index(position)?, degrees)?;
    }
    for &position in duplicate {
        composition.duplicate(index(position)?)?;
    }
    for &position in delete {
        composition.delete(index(position)?)?;
    }
    if let Some(order) = order {
        let indices = order
            .iter()
            .map(|&p| index(p))
            .collect::<Result<Vec<_>>>()?;
        composition.reorder_indices(&indices)?;
    }
    Ok(())
}

#[cfg(feature = "pdfium")]
fn rasterizer() -> Box<dyn Rasterizer> {
    match pdf_compose::render::PdfiumRasterizer::new() {
        Ok(r) => Box::new(r),
        Err(e) => {
            log::warn!("{e}; PDF pages will not render");
            Box::new(pdf_compose::NoPdfRasterizer)
        }
    }
}

#[cfg(not(feature = "pdfium"))]
fn rasterizer() -> Box<dyn Rasterizer> {
    Box::new(pdf_compose::NoPdfRasterizer)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let settings = load_settings(cli.settings.as_deref()).await?;

    match cli.command {
        Commands::List { inputs } => {
            let session = open_session(&inputs, settings)?;
            for (i, row) in session.page_list().rows().iter().enumerate() {
                println!("{:>4}  {}", i + 1, row.label);
            }
        }

        Commands::Compose {
            input,
            output,
            rotate,
            duplicate,
            delete,
            order,
        } => {
            let mut session = open_session(&input, settings)?;
            apply_edits(
                &mut session.composition_mut(),
                &rotate,
                &duplicate,
                &delete,
                order.as_deref(),
            )?;

            let summary = pdf_compose::export(
                session.composition().snapshot(),
                &output,
                session.settings(),
            )
            .await?;
            println!(
                "Composed {} pages → {}",
                summary.page_count,
                summary.path.display()
            );
        }

        Commands::Preview {
            input,
            output,
            zoom,
            width,
        } => {
            let session = open_session(&input, settings)?;
            let settings = session.settings().clone();

            let (view, viewport_width) = match width {
                Some(width) => (
                    ViewState::default(),
                    width as f32 + settings.preview_margin,
                ),
                None => {
                    let mut view = ViewState::default();
                    view.adjust_zoom(zoom.unwrap_or(1.0));
                    (view, 0.0)
                }
            };

            let pages = session.composition().snapshot();
            let rendered = tokio::task::spawn_blocking(move || {
                render_preview(&pages, &view, viewport_width, rasterizer().as_ref(), &settings)
            })
            .await??;

            tokio::fs::create_dir_all(&output).await?;
            for page in &rendered {
                let path = output.join(format!("page-{:03}.png", page.page_number));
                page.image
                    .save(&path)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                log::info!("Wrote {}", path.display());
            }
            println!("Rendered {} pages → {}", rendered.len(), output.display());
        }
    }

    Ok(())
}
