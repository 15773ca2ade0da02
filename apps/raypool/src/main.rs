mod receipt;

use anyhow::{anyhow, Context, Result};
use chrono::{SecondsFormat, Utc};
use clap::{value_parser, Parser};
use raypool_core::{render, RenderJob};
use raypool_model::SceneFile;
use raypool_render::{save_image, Scene, ViewPlane};
use receipt::{write_json, HostInfo, RenderArgsSummary, RunReceipt, WorkerSummary};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "raypool",
    version,
    about = "Render a sphere scene on a fixed set of worker threads, one column block each"
)]
struct Cli {
    /// Number of render worker threads.
    #[arg(default_value_t = 1, value_parser = value_parser!(u32).range(1..))]
    workers: u32,

    /// Horizontal resolution in pixels.
    #[arg(default_value_t = 600, value_parser = value_parser!(u32).range(1..))]
    width: u32,

    /// Vertical resolution in pixels.
    #[arg(default_value_t = 600, value_parser = value_parser!(u32).range(1..))]
    height: u32,

    /// Samples per pixel.
    #[arg(default_value_t = 1, value_parser = value_parser!(u32).range(1..))]
    samples: u32,

    /// JSON scene description. The built-in scene is rendered when omitted.
    scene: Option<PathBuf>,

    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Write a JSON run receipt to this path.
    #[arg(long)]
    receipt: Option<PathBuf>,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing()?;

    let started_at_utc = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);

    let scene_file = load_scene_file(cli.scene.as_deref())?;
    let scene = Scene::from_file(&scene_file)
        .with_context(|| format!("invalid scene {}", scene_label(cli.scene.as_deref())))?;
    let plane = ViewPlane::standard(cli.width, cli.height);
    let job = RenderJob::new(cli.workers, cli.width, cli.height, cli.samples)?;

    // RenderError messages already include their source.
    let output = render(&scene, &plane, &job).map_err(|err| anyhow!("render failed: {err}"))?;
    println!("Time = {}", output.elapsed_secs());

    if !cli.out_dir.as_os_str().is_empty() {
        fs::create_dir_all(&cli.out_dir).with_context(|| {
            format!("failed to create output directory {}", cli.out_dir.display())
        })?;
    }
    let image_path = cli.out_dir.join(image_file_name(cli.workers));
    save_image(&image_path, &output.image)
        .with_context(|| format!("failed to write image {}", image_path.display()))?;
    info!(path = %image_path.display(), "image written");

    if let Some(receipt_path) = &cli.receipt {
        let finished_at_utc = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        let receipt = RunReceipt {
            version: env!("CARGO_PKG_VERSION").to_string(),
            started_at_utc,
            finished_at_utc,
            args: RenderArgsSummary {
                workers: cli.workers,
                width: cli.width,
                height: cli.height,
                samples: cli.samples,
                scene: cli.scene.clone(),
            },
            elapsed_secs: output.elapsed_secs(),
            image: image_path.clone(),
            workers: output.workers.iter().map(WorkerSummary::from).collect(),
            host: HostInfo {
                os: std::env::consts::OS.to_string(),
                arch: std::env::consts::ARCH.to_string(),
            },
        };
        write_json(receipt_path, &receipt)?;
        info!(path = %receipt_path.display(), "receipt written");
    }

    Ok(())
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|err| anyhow!("failed to initialize logging: {err}"))
}

fn load_scene_file(path: Option<&Path>) -> Result<SceneFile> {
    let Some(path) = path else {
        return Ok(SceneFile::builtin());
    };

    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read scene {}", path.display()))?;
    let scene: SceneFile = serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse scene {}", path.display()))?;
    Ok(scene)
}

fn scene_label(path: Option<&Path>) -> String {
    match path {
        Some(path) => path.display().to_string(),
        None => "(built-in)".to_string(),
    }
}

fn image_file_name(workers: u32) -> String {
    format!("raytracing_{workers}.jpg")
}
