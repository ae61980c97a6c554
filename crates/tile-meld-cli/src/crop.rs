//! Padded crops of melds written as PNG files.

use std::{
    fs,
    path::{Path, PathBuf},
};

use image::ImageReader;
use log::{debug, warn};
use tile_meld_core::{GrayImageView, TileBox};

use crate::CliError;

pub fn load_gray(path: &Path) -> Result<image::GrayImage, CliError> {
    Ok(ImageReader::open(path)?.decode()?.to_luma8())
}

/// Crop every meld (grown by `padding`) out of `img` into
/// `out_dir/meld_NNN.png`. Melds entirely outside the image are skipped.
pub fn write_crops(
    img: &image::GrayImage,
    melds: &[TileBox],
    padding: i32,
    out_dir: &Path,
) -> Result<Vec<PathBuf>, CliError> {
    fs::create_dir_all(out_dir)?;
    let view = GrayImageView {
        width: img.width() as usize,
        height: img.height() as usize,
        data: img.as_raw(),
    };

    let mut written = Vec::with_capacity(melds.len());
    for (k, meld) in melds.iter().enumerate() {
        let Some(crop) = view.crop_padded(meld, padding) else {
            warn!("meld {k} lies outside the {}x{} image", view.width, view.height);
            continue;
        };
        let (width, height) = (crop.width as u32, crop.height as u32);
        let buf = image::GrayImage::from_raw(width, height, crop.data)
            .ok_or(CliError::CropBuffer { width, height })?;
        let path = out_dir.join(format!("meld_{k:03}.png"));
        buf.save(&path)?;
        debug!("wrote {}", path.display());
        written.push(path);
    }
    Ok(written)
}
