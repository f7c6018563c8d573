mod cli;
mod geometry;
mod output;
mod rendering;
mod scene;
mod shading;

extern crate nalgebra as na;

use crate::cli::Args;
use crate::output::save_image;
use crate::rendering::{render_scene, render_scene_with_progress};
use crate::scene::load_scene;
use anyhow::Context;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, LevelFilter};

fn init_logger(level: LevelFilter) {
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn progress_bar(rows: u32) -> ProgressBar {
    let bar = ProgressBar::new(rows as u64);
    if let Ok(style) = ProgressStyle::with_template("{elapsed_precise} [{bar:40}] {pos}/{len} rows") {
        bar.set_style(style);
    }
    bar
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logger(args.log_level.clone().into());

    let scene = load_scene(&args.input)
        .with_context(|| format!("failed to load scene from {}", args.input.display()))?;
    info!(
        "scene: {} primitives, {} lights",
        scene.primitives.len(),
        scene.lights.len()
    );

    let settings = args.render_settings();
    let rendered = if args.no_progress {
        render_scene(&scene, &settings)
    } else {
        render_scene_with_progress(&scene, &settings, progress_bar(settings.height))
    };

    save_image(&rendered, &args.output, args.ppm_format)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    Ok(())
}
