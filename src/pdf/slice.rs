use image::{RgbaImage, imageops};

use crate::error::Error;
use crate::model::Page;

pub(super) struct PageSlice {
    pub(super) width: u32,
    pub(super) height: u32,
    pub(super) rgb: Vec<u8>, // flattened onto white
}

/// Surface rows covered by `page`, widened to whole pixels and clamped to the surface.
pub(super) fn slice_rows(surface: &RgbaImage, page: &Page) -> Result<Option<(u32, u32)>, Error> {
    if page.pixel_height <= 0.0 {
        return Ok(None);
    }
    let top = page.pixel_top.floor().max(0.0);
    if top >= surface.height() as f64 {
        return Err(Error::RasterizationFailure(format!(
            "page at {:.1}px starts below the {}px surface",
            page.pixel_top,
            surface.height()
        )));
    }
    let bottom = page.pixel_bottom().ceil().min(surface.height() as f64);
    let top = top as u32;
    let bottom = bottom as u32;
    Ok((bottom > top).then_some((top, bottom - top)))
}

/// Copies the page's rows out of the surface unchanged, compositing alpha over white.
pub(super) fn slice_page(surface: &RgbaImage, page: &Page) -> Result<Option<PageSlice>, Error> {
    let Some((top, height)) = slice_rows(surface, page)? else {
        return Ok(None);
    };
    let width = surface.width();
    if width == 0 {
        return Err(Error::RasterizationFailure("surface has zero width".into()));
    }

    let rows = imageops::crop_imm(surface, 0, top, width, height).to_image();
    let mut rgb = Vec::with_capacity(width as usize * height as usize * 3);
    for px in rows.pixels() {
        let [r, g, b, a] = px.0;
        let a = a as u16;
        for c in [r, g, b] {
            rgb.push(((c as u16 * a + 255 * (255 - a)) / 255) as u8);
        }
    }
    Ok(Some(PageSlice { width, height, rgb }))
}
