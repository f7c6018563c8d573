use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use clap::ValueEnum;
use image::{ImageFormat, RgbImage};
use log::info;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image encoding error: {0}")]
    Image(#[from] image::ImageError),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PpmFormat {
    /// Plain-text samples
    P3,
    /// Raw bytes
    P6,
}

pub fn write_ppm(img: &RgbImage, format: PpmFormat, out: &mut impl Write) -> std::io::Result<()> {
    let magic = match format {
        PpmFormat::P3 => "P3",
        PpmFormat::P6 => "P6",
    };
    write!(out, "{}\n{} {}\n255\n", magic, img.width(), img.height())?;
    match format {
        PpmFormat::P3 => {
            for row in img.rows() {
                let samples = row
                    .flat_map(|pixel| pixel.0)
                    .map(|x| x.to_string())
                    .collect::<Vec<_>>();
                writeln!(out, "{}", samples.join(" "))?;
            }
        }
        PpmFormat::P6 => out.write_all(img.as_raw())?,
    }
    Ok(())
}

pub fn save_image(img: &RgbImage, path: &Path, ppm_format: PpmFormat) -> Result<(), OutputError> {
    let is_png = path
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("png"));
    if is_png {
        img.save_with_format(path, ImageFormat::Png)?;
    } else {
        let mut out = BufWriter::new(File::create(path)?);
        write_ppm(img, ppm_format, &mut out)?;
        out.flush()?;
    }
    info!("image saved as {}", path.display());
    Ok(())
}
