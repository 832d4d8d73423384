use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use photo_async_runtime::{PhotoCommand, PhotoUpdate, worker_task};
use photo_sheet::layout::{compute_sheet_layout, sheet_statistics};
use photo_sheet::{
    CropTarget, Delivery, InputEvent, NoShare, PaperPreset, Session, SheetConfig, SheetSettings,
    SheetStatistics, ShareTarget, Vec2,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;

mod logger;
mod share;

use logger::CliLogger;
use share::CommandShare;

#[derive(Parser)]
#[command(name = "photot", about = "Document photo cropping and print sheets", version)]
struct Cli {
    /// Settings file (JSON) providing defaults for photo and paper size
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Program used to share results; its last argument is the file path.
    /// Files are saved to the output directory when unset or when it fails.
    #[arg(long, global = true)]
    share_cmd: Option<String>,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Crop a photo to a document photo size
    Crop {
        /// Input photo
        #[arg(short, long)]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        #[command(flatten)]
        crop: CropArgs,
    },

    /// Tile an already cropped photo onto a print sheet
    Sheet {
        /// Cropped photo
        #[arg(short, long)]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        #[command(flatten)]
        paper: PaperArgs,

        /// Show statistics only, don't render the sheet
        #[arg(long)]
        stats_only: bool,
    },

    /// Crop a photo and tile it onto a print sheet in one go
    Run {
        /// Input photo
        #[arg(short, long)]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        #[command(flatten)]
        crop: CropArgs,

        #[command(flatten)]
        paper: PaperArgs,

        /// Write the settings used to this JSON file
        #[arg(long)]
        save_config: Option<PathBuf>,
    },

    /// List paper presets and how many photos of each size fit
    Presets {
        #[command(flatten)]
        crop: CropArgs,
    },
}

#[derive(Args)]
struct CropArgs {
    /// Photo width in mm
    #[arg(long)]
    width_mm: Option<f32>,

    /// Photo height in mm
    #[arg(long)]
    height_mm: Option<f32>,

    /// Zoom on top of the cover fit (0.5 - 3.0)
    #[arg(long, default_value = "1.0")]
    zoom: f32,

    /// Horizontal pan in preview pixels
    #[arg(long, default_value = "0.0", allow_hyphen_values = true)]
    pan_x: f32,

    /// Vertical pan in preview pixels
    #[arg(long, default_value = "0.0", allow_hyphen_values = true)]
    pan_y: f32,

    /// Width of the preview frame the pan was measured in.
    /// Without it, pan is taken in output pixels.
    #[arg(long)]
    preview_width: Option<f32>,
}

#[derive(Args)]
struct PaperArgs {
    /// Paper preset
    #[arg(long, value_enum)]
    paper: Option<PaperArg>,

    /// Paper width in mm (custom paper only)
    #[arg(long)]
    paper_width: Option<f32>,

    /// Paper height in mm (custom paper only)
    #[arg(long)]
    paper_height: Option<f32>,

    /// Page margin in mm
    #[arg(long)]
    margin: Option<f32>,

    /// Gap between photos in mm
    #[arg(long)]
    gap: Option<f32>,
}

#[derive(Clone, Copy, ValueEnum)]
enum PaperArg {
    A4,
    #[value(name = "10x15")]
    Photo10x15,
    A6,
    Custom,
}

impl From<PaperArg> for PaperPreset {
    fn from(arg: PaperArg) -> Self {
        match arg {
            PaperArg::A4 => Self::A4,
            PaperArg::Photo10x15 => Self::Photo10x15,
            PaperArg::A6 => Self::A6,
            PaperArg::Custom => Self::Custom,
        }
    }
}

// =============================================================================
// Settings
// =============================================================================

impl CropArgs {
    /// Apply size, zoom and pan to the session's crop editor
    fn apply(&self, session: &mut Session) {
        if let Some(w) = self.width_mm {
            session.set_crop_width(&w.to_string());
        }
        if let Some(h) = self.height_mm {
            session.set_crop_height(&h.to_string());
        }

        if let Some(width) = self.preview_width {
            let frame = session.preview_frame(width, f32::INFINITY);
            session.set_preview_container(frame);
        }

        session.set_zoom_slider(self.zoom);

        // Replay the pan as a single drag gesture
        let pan = Vec2::new(self.pan_x, self.pan_y);
        if pan != Vec2::ZERO {
            session.input(&InputEvent::MouseDown(Vec2::ZERO));
            session.input(&InputEvent::MouseMove(pan));
            session.input(&InputEvent::MouseUp);
        }
    }

    /// Requested photo size, resolved the way the crop editor resolves it
    fn target(&self, settings: &SheetSettings) -> CropTarget {
        let mut session = Session::with_settings(settings);
        if let Some(w) = self.width_mm {
            session.set_crop_width(&w.to_string());
        }
        if let Some(h) = self.height_mm {
            session.set_crop_height(&h.to_string());
        }
        session.crop_target()
    }
}

impl PaperArgs {
    fn apply(&self, session: &mut Session) {
        if let Some(paper) = self.paper {
            session.select_preset(paper.into());
        }
        if let Some(w) = self.paper_width {
            session.set_paper_width(&w.to_string());
        }
        if let Some(h) = self.paper_height {
            session.set_paper_height(&h.to_string());
        }
        if let Some(m) = self.margin {
            session.set_margin(&m.to_string());
        }
        if let Some(g) = self.gap {
            session.set_gap(&g.to_string());
        }

        if (self.paper_width.is_some() || self.paper_height.is_some())
            && session.sheet_config().preset != PaperPreset::Custom
        {
            log::warn!("--paper-width/--paper-height only apply with --paper custom");
        }
    }

    fn config(&self, defaults: &SheetConfig) -> SheetConfig {
        let mut session = Session::with_settings(&SheetSettings {
            sheet: *defaults,
            ..Default::default()
        });
        self.apply(&mut session);
        *session.sheet_config()
    }
}

async fn load_settings(path: Option<&Path>) -> Result<SheetSettings> {
    match path {
        Some(path) => SheetSettings::load(path)
            .await
            .with_context(|| format!("Failed to load settings from {}", path.display())),
        None => Ok(SheetSettings::default()),
    }
}

fn share_target(share_cmd: Option<&str>) -> Arc<dyn ShareTarget> {
    match share_cmd.and_then(CommandShare::parse) {
        Some(share) => Arc::new(share),
        None => Arc::new(NoShare),
    }
}

fn report_delivery(filename: &str, delivery: &Delivery) {
    match delivery {
        Delivery::Shared => println!("Shared {}", filename),
        Delivery::Saved(path) => println!("Saved → {}", path.display()),
    }
}

fn print_statistics(config: &SheetConfig, stats: &SheetStatistics) {
    println!("Sheet Statistics:");
    println!(
        "  Paper: {} ({}x{} mm)",
        config.preset.name(),
        config.paper_width_mm,
        config.paper_height_mm
    );
    println!("  Grid: {} columns x {} rows", stats.cols, stats.rows);
    println!("  Photos: {}", stats.photos_count);
    println!("  Paper used: {:.1}%", stats.used_area_ratio * 100.0);
}

// =============================================================================
// Commands
// =============================================================================

async fn crop_command(
    input: &Path,
    output: &Path,
    crop: &CropArgs,
    settings: &SheetSettings,
    share: &dyn ShareTarget,
) -> Result<()> {
    let mut session = Session::with_settings(settings);
    let ticket = session.begin_upload();
    let source = photo_sheet::load_image(input)
        .await
        .with_context(|| format!("Failed to load {}", input.display()))?;
    session.complete_upload(ticket, source);

    crop.apply(&mut session);
    let job = session
        .start_crop()
        .context("Photo is not ready for cropping")?;
    let ticket = job.ticket;
    let result = photo_sheet::render_crop_async(job).await?;
    if !session.complete_crop(ticket, Ok(result)) {
        bail!("Cropped photo was not accepted");
    }
    let cropped = session.cropped().context("No cropped photo")?;

    let target = cropped.target;
    let (w, h) = cropped.image.dimensions();
    println!(
        "Cropped to {}x{} px ({}x{} mm)",
        w, h, target.width_mm, target.height_mm
    );

    let filename = cropped.suggested_filename();
    let delivery = photo_sheet::deliver(&cropped.jpeg, &filename, share, output).await?;
    report_delivery(&filename, &delivery);
    Ok(())
}

async fn sheet_command(
    input: &Path,
    output: &Path,
    paper: &PaperArgs,
    stats_only: bool,
    settings: &SheetSettings,
    share: &dyn ShareTarget,
) -> Result<()> {
    let tile = photo_sheet::load_image(input)
        .await
        .with_context(|| format!("Failed to load {}", input.display()))?;

    let config = paper.config(&settings.sheet);
    SheetSettings {
        crop: settings.crop,
        sheet: config,
    }
    .validate()?;

    let layout = compute_sheet_layout(&config, tile.width(), tile.height());
    print_statistics(&config, &sheet_statistics(&layout));
    if stats_only {
        return Ok(());
    }

    let sheet =
        tokio::task::spawn_blocking(move || photo_sheet::render_sheet(&tile.image, &config))
            .await??;

    let filename = sheet.suggested_filename();
    let delivery = photo_sheet::deliver(&sheet.jpeg, &filename, share, output).await?;
    report_delivery(&filename, &delivery);
    Ok(())
}

/// Drive a full session through the background worker
async fn run_command(
    input: PathBuf,
    output: PathBuf,
    crop: &CropArgs,
    paper: &PaperArgs,
    save_config: Option<&Path>,
    settings: &SheetSettings,
    share: Arc<dyn ShareTarget>,
) -> Result<()> {
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (update_tx, mut update_rx) = mpsc::unbounded_channel();
    let worker = tokio::spawn(worker_task(command_rx, update_tx, share));

    let mut session = Session::with_settings(settings);
    paper.apply(&mut session);

    let ticket = session.begin_upload();
    command_tx.send(PhotoCommand::LoadImage {
        ticket,
        path: input,
    })?;

    let mut saves_pending = 0;
    let mut sheet_rendered = false;
    while let Some(update) = update_rx.recv().await {
        match update {
            PhotoUpdate::ImageLoaded { ticket, image } => {
                let (w, h) = (image.width(), image.height());
                if session.complete_upload(ticket, Arc::unwrap_or_clone(image)) {
                    log::info!("Loaded {}x{} photo", w, h);
                    crop.apply(&mut session);
                    if let Some(job) = session.start_crop() {
                        command_tx.send(PhotoCommand::RenderCrop { job })?;
                    }
                }
            }
            PhotoUpdate::CropRendered { ticket, result } => {
                if !session.complete_crop(ticket, Ok(Arc::unwrap_or_clone(result))) {
                    continue;
                }
                let Some(cropped) = session.cropped().cloned() else {
                    continue;
                };
                let (w, h) = cropped.image.dimensions();
                println!("Cropped to {}x{} px", w, h);

                command_tx.send(PhotoCommand::Save {
                    bytes: Arc::new(cropped.jpeg.clone()),
                    filename: cropped.suggested_filename(),
                    dir: output.clone(),
                })?;
                saves_pending += 1;

                if !session.enter_print() {
                    bail!("Cropped photo was not accepted");
                }
                if let Some(job) = session.start_sheet() {
                    command_tx.send(PhotoCommand::RenderSheet { job })?;
                }
            }
            PhotoUpdate::SheetRendered { ticket, sheet } => {
                if !session.complete_sheet(ticket, sheet.clone()) {
                    continue;
                }
                print_statistics(&sheet.config, &sheet.statistics());
                sheet_rendered = true;
                command_tx.send(PhotoCommand::Save {
                    bytes: Arc::new(sheet.jpeg.clone()),
                    filename: sheet.suggested_filename(),
                    dir: output.clone(),
                })?;
                saves_pending += 1;
            }
            PhotoUpdate::Saved { filename, delivery } => {
                report_delivery(&filename, &delivery);
                saves_pending -= 1;
                if saves_pending == 0 && sheet_rendered {
                    break;
                }
            }
            PhotoUpdate::Error { ticket, message } => {
                if let Some(ticket) = ticket {
                    session.fail_upload(ticket);
                }
                bail!("{}", message);
            }
        }
    }

    drop(command_tx);
    worker.await?;

    if let Some(path) = save_config {
        session.settings().save(path).await?;
        println!("Settings saved → {}", path.display());
    }
    Ok(())
}

fn list_presets(crop: &CropArgs, settings: &SheetSettings) {
    let target = crop.target(settings);
    let (tile_w, tile_h) = target.pixel_size();
    println!(
        "Photo {}x{} mm ({}x{} px), margin {} mm, gap {} mm",
        target.width_mm,
        target.height_mm,
        tile_w,
        tile_h,
        settings.sheet.margin_mm,
        settings.sheet.gap_mm
    );

    for preset in PaperPreset::ALL {
        let Some((w, h)) = preset.dimensions_mm() else {
            continue;
        };
        let mut config = settings.sheet;
        config.apply_preset(preset);
        let layout = compute_sheet_layout(&config, tile_w, tile_h);
        println!(
            "  {:<6} {:>5} x {:<5} mm  {} x {} = {} photos",
            preset.name(),
            w,
            h,
            layout.cols,
            layout.rows,
            layout.photos_count()
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    CliLogger::new(cli.verbose).init()?;

    let settings = load_settings(cli.config.as_deref()).await?;
    let share = share_target(cli.share_cmd.as_deref());

    match cli.command {
        Commands::Crop {
            input,
            output,
            crop,
        } => {
            crop_command(&input, &output, &crop, &settings, share.as_ref()).await?;
        }

        Commands::Sheet {
            input,
            output,
            paper,
            stats_only,
        } => {
            sheet_command(&input, &output, &paper, stats_only, &settings, share.as_ref()).await?;
        }

        Commands::Run {
            input,
            output,
            crop,
            paper,
            save_config,
        } => {
            run_command(
                input,
                output,
                &crop,
                &paper,
                save_config.as_deref(),
                &settings,
                share,
            )
            .await?;
        }

        Commands::Presets { crop } => list_presets(&crop, &settings),
    }

    Ok(())
}
