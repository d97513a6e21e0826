use crate::config::ExportConfig;
use crate::model::PageCapacity;

pub const MM_PER_INCH: f64 = 25.4;
const PT_PER_INCH: f64 = 72.0;

pub fn mm_to_pt(mm: f64) -> f32 {
    (mm * PT_PER_INCH / MM_PER_INCH) as f32
}

/// Physical page geometry plus the one pixel-to-millimeter ratio shared by
/// every page of a document.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhysicalLayout {
    pub page_width_mm: f64,
    pub page_height_mm: f64,
    pub margin_mm: f64,
    pub px_to_mm: f64,
    content_scale: f64,
}

impl PhysicalLayout {
    pub fn from_config(config: &ExportConfig) -> Self {
        let natural_px_to_mm = MM_PER_INCH / (config.css_dpi * config.device_scale);
        Self {
            page_width_mm: config.page_width_mm,
            page_height_mm: config.page_height_mm,
            margin_mm: config.margin_mm,
            px_to_mm: natural_px_to_mm * config.content_scale,
            content_scale: config.content_scale,
        }
    }

    pub fn usable_height_mm(&self) -> f64 {
        self.page_height_mm - 2.0 * self.margin_mm
    }

    /// Usable page height expressed in raster pixels.
    pub fn max_usable_px(&self) -> f64 {
        self.usable_height_mm() * self.content_scale / self.px_to_mm
    }

    pub fn capacity(&self, safety_margin_px: f64) -> PageCapacity {
        PageCapacity {
            max_usable_px: self.max_usable_px(),
            safety_margin_px,
        }
    }

    pub fn px_to_pt(&self, px: f64) -> f32 {
        mm_to_pt(px * self.px_to_mm)
    }

    pub fn page_size_pt(&self) -> (f32, f32) {
        (mm_to_pt(self.page_width_mm), mm_to_pt(self.page_height_mm))
    }
}
