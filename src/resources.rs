use std::path::Path;

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use rayon::prelude::*;

use crate::error::Error;
use crate::model::ImagePlacement;

pub enum ImageSettlement {
    Loaded(RgbaImage),
    Failed(Error),
}

/// Loads every referenced image in parallel and returns once all have settled.
///
/// Results keep the order of `placements`. A failed load is a settlement too,
/// so one broken image never holds up the export.
pub fn settle_all(placements: &[ImagePlacement], base_dir: &Path) -> Vec<ImageSettlement> {
    placements
        .par_iter()
        .map(|placement| {
            let path = base_dir.join(&placement.path);
            match image::open(&path) {
                Ok(img) => ImageSettlement::Loaded(img.to_rgba8()),
                Err(e) => ImageSettlement::Failed(Error::ImageResourceFailure {
                    source: path,
                    reason: e.to_string(),
                }),
            }
        })
        .collect()
}

/// Pixel rectangle on the surface as `(x, y, width, height)`, clamped to its bounds.
///
/// `dom_y` is measured on the layout, so the surface origin is subtracted first,
/// exactly as for section tops.
fn raster_box(
    placement: &ImagePlacement,
    scale: f64,
    dom_origin_top: f64,
    surface: &RgbaImage,
) -> Option<(u32, u32, u32, u32)> {
    let dom_y = placement.dom_y - dom_origin_top;
    let to_px = |v: f64| (v * scale).round().max(0.0) as u32;
    let x0 = to_px(placement.dom_x);
    let y0 = to_px(dom_y);
    let x1 = to_px(placement.dom_x + placement.dom_width).min(surface.width());
    let y1 = to_px(dom_y + placement.dom_height).min(surface.height());
    (x1 > x0 && y1 > y0).then(|| (x0, y0, x1 - x0, y1 - y0))
}

/// Draws settled images into their boxes; failed ones leave their box blank.
/// Returns how many images failed.
pub fn composite(
    surface: &mut RgbaImage,
    placements: &[ImagePlacement],
    settlements: Vec<ImageSettlement>,
    scale: f64,
    dom_origin_top: f64,
) -> usize {
    let mut failed = 0;
    for (placement, settlement) in placements.iter().zip(settlements) {
        let Some((x, y, w, h)) = raster_box(placement, scale, dom_origin_top, surface) else {
            log::debug!(
                "Image {} lies outside the surface, skipping",
                placement.path.display()
            );
            continue;
        };
        match settlement {
            ImageSettlement::Loaded(img) => {
                let (iw, ih) = img.dimensions();
                if iw == 0 || ih == 0 {
                    continue;
                }
                // Contain: fit inside the box without cropping, centered.
                let ratio = (w as f64 / iw as f64).min(h as f64 / ih as f64);
                let nw = ((iw as f64 * ratio).round() as u32).clamp(1, w);
                let nh = ((ih as f64 * ratio).round() as u32).clamp(1, h);
                let fitted = imageops::resize(&img, nw, nh, FilterType::Triangle);
                let dx = x + (w - nw) / 2;
                let dy = y + (h - nh) / 2;
                imageops::overlay(surface, &fitted, dx as i64, dy as i64);
            }
            ImageSettlement::Failed(e) => {
                log::warn!("{e}; leaving its area blank");
                failed += 1;
                for py in y..y + h {
                    for px in x..x + w {
                        surface.put_pixel(px, py, Rgba([255, 255, 255, 255]));
                    }
                }
            }
        }
    }
    failed
}
