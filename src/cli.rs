use clap::{Parser, ValueEnum};
use log::LevelFilter;
use std::path::PathBuf;

use crate::output::PpmFormat;
use crate::rendering::RenderSettings;

#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "raytrace")]
#[command(about = "Renders a scene of spheres, planes and lights with recursive ray tracing")]
pub struct Args {
    /// Pixel width of the output image
    #[arg(value_parser = clap::value_parser!(u32).range(1..))]
    pub width: u32,

    /// Pixel height of the output image
    #[arg(value_parser = clap::value_parser!(u32).range(1..))]
    pub height: u32,

    /// Scene description file
    pub input: PathBuf,

    /// Output image (.png, anything else is written as PPM)
    pub output: PathBuf,

    /// Deepest reflection bounce that is still traced
    #[arg(long, default_value_t = 5)]
    pub max_depth: u32,

    #[arg(long, value_enum, default_value = "p3")]
    pub ppm_format: PpmFormat,

    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

impl Args {
    pub fn render_settings(&self) -> RenderSettings {
        RenderSettings {
            width: self.width,
            height: self.height,
            max_depth: self.max_depth,
            ..Default::default()
        }
    }
}
