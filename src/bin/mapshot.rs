use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(name = "mapshot", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Capture every configured map as a PNG.
    Capture(CaptureArgs),
    /// Print the images a capture would write, without rendering.
    Plan(ProjectArgs),
    /// Check a project file and exit.
    Validate(ProjectArgs),
}

#[derive(Parser, Debug)]
struct ProjectArgs {
    /// Input project JSON (`{ "scene": ..., "capture": ... }`).
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct CaptureArgs {
    /// Input project JSON (`{ "scene": ..., "capture": ... }`).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Root that `folder_location` is relative to. Defaults to the project file's directory.
    #[arg(long)]
    asset_root: Option<PathBuf>,

    /// Record written captures in `<asset-root>/.mapshot/assets.json`.
    #[arg(long)]
    index: bool,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Capture(args) => cmd_capture(args),
        Command::Plan(args) => cmd_plan(args),
        Command::Validate(args) => cmd_validate(args),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn read_project(path: &Path) -> anyhow::Result<mapshot::CaptureProject> {
    mapshot::CaptureProject::from_path(path)
        .with_context(|| format!("load project '{}'", path.display()))
}

fn project_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn cmd_capture(args: CaptureArgs) -> anyhow::Result<()> {
    let project = read_project(&args.in_path)?;
    let mut scene = project.scene;
    let config = project.capture;
    let asset_root = args
        .asset_root
        .unwrap_or_else(|| project_dir(&args.in_path));

    let mut renderer = mapshot::FlatRenderer::new();
    let mut assets: Box<dyn mapshot::AssetPostProcessor> = if args.index {
        Box::new(mapshot::JsonAssetIndex::open(&asset_root)?)
    } else {
        Box::new(mapshot::NoAssetPipeline)
    };

    let report = match mapshot::capture_maps(
        &config,
        &mut scene,
        &mut renderer,
        assets.as_mut(),
        &asset_root,
    ) {
        Ok(report) => report,
        Err(e) if e.is_warning() => {
            tracing::warn!("{e}, nothing to capture");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    for image in &report.images {
        eprintln!("wrote {}", image.path.display());
    }
    if !report.is_complete() {
        for failure in &report.failures {
            eprintln!("failed {}: {}", failure.path.display(), failure.error);
        }
        anyhow::bail!(
            "{} of {} captures failed",
            report.failures.len(),
            report.failures.len() + report.images.len()
        );
    }
    Ok(())
}

fn cmd_plan(args: ProjectArgs) -> anyhow::Result<()> {
    let project = read_project(&args.in_path)?;
    let plan = match mapshot::plan_captures(&project.capture, &project.scene) {
        Ok(plan) => plan,
        Err(e) if e.is_warning() => {
            tracing::warn!("{e}, nothing to capture");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    for map in &plan.maps {
        for image in &map.images {
            println!("{}\t{}\t{}", map.map, image.viewpoint, image.file_name);
        }
    }
    for position in &plan.skipped_maps {
        eprintln!("skip maps[{position}]: map not assigned or not found");
    }
    for skip in &plan.skipped_cameras {
        eprintln!(
            "skip maps[{}].additional_cameras[{}]: camera not assigned or not found",
            skip.map_position, skip.binding_position
        );
    }
    Ok(())
}

fn cmd_validate(args: ProjectArgs) -> anyhow::Result<()> {
    let project = read_project(&args.in_path)?;
    match mapshot::plan_captures(&project.capture, &project.scene) {
        Ok(plan) => {
            eprintln!(
                "ok: {} maps, {} images",
                plan.maps.len(),
                plan.image_count()
            );
            Ok(())
        }
        Err(e) if e.is_warning() => {
            tracing::warn!("{e}");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
