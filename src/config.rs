use std::path::Path;

use serde::Deserialize;

use crate::error::Error;

/// Export settings. Defaults produce A4 pages from a surface captured at 3x.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub page_width_mm: f64,
    pub page_height_mm: f64,
    pub margin_mm: f64,
    /// Raster pixels per CSS pixel.
    pub device_scale: f64,
    pub css_dpi: f64,
    /// Fraction of natural size used when placing page images.
    pub content_scale: f64,
    pub safety_margin_px: f64,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            page_width_mm: 210.0,
            page_height_mm: 297.0,
            margin_mm: 8.0,
            device_scale: 3.0,
            css_dpi: 96.0,
            content_scale: 0.9,
            safety_margin_px: 10.0,
        }
    }
}

impl ExportConfig {
    pub fn from_json_file(path: &Path) -> Result<Self, Error> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::Io(std::io::Error::new(e.kind(), format!("{}: {}", e, path.display())))
        })?;
        let config: ExportConfig = serde_json::from_str(&text)
            .map_err(|e| Error::InvalidConfig(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), Error> {
        let positive = [
            ("page_width_mm", self.page_width_mm),
            ("page_height_mm", self.page_height_mm),
            ("device_scale", self.device_scale),
            ("css_dpi", self.css_dpi),
            ("content_scale", self.content_scale),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::InvalidConfig(format!("{name} must be positive, got {value}")));
            }
        }
        if !self.margin_mm.is_finite() || self.margin_mm < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "margin_mm must not be negative, got {}",
                self.margin_mm
            )));
        }
        if 2.0 * self.margin_mm >= self.page_width_mm.min(self.page_height_mm) {
            return Err(Error::InvalidConfig(format!(
                "margin of {}mm leaves no usable area on a {}x{}mm page",
                self.margin_mm, self.page_width_mm, self.page_height_mm
            )));
        }
        if !self.safety_margin_px.is_finite() || self.safety_margin_px < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "safety_margin_px must not be negative, got {}",
                self.safety_margin_px
            )));
        }
        Ok(())
    }
}
