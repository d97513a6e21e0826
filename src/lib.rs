mod config;
mod error;
mod geometry;
mod model;
mod pack;
mod pdf;
mod report;
mod resources;
mod units;

pub use config::ExportConfig;
pub use error::Error;
pub use geometry::{dom_to_raster_scale, extract_from_tree, extract_sections, flatten_tree};
pub use model::{
    Boundary, GeometryManifest, ImagePlacement, ManifestSection, Page, PageCapacity, ReportNode,
    Section, SectionKind, SectionTag,
};
pub use pack::{is_oversized, pack};
pub use report::{Confidence, Diagnosis, DiagnosisResult, report_file_name, sanitize_token, today};
pub use resources::{ImageSettlement, composite, settle_all};
pub use units::{PhysicalLayout, mm_to_pt};

use std::path::{Path, PathBuf};
use std::time::Instant;

use image::RgbaImage;

pub struct Exported {
    pub bytes: Vec<u8>,
    pub pages: Vec<Page>,
    pub failed_images: usize,
}

/// Paginates an already rasterized report surface into a PDF.
///
/// Nothing is written on error; the caller may simply retry the whole export.
pub fn export_report(
    mut surface: RgbaImage,
    manifest: &GeometryManifest,
    resource_dir: &Path,
    diagnosis: Option<&DiagnosisResult>,
    config: &ExportConfig,
) -> Result<Exported, Error> {
    let t0 = Instant::now();
    config.validate()?;

    let mut failed_images = 0;
    if !manifest.images.is_empty() {
        let scale = dom_to_raster_scale(manifest.dom_height, surface.height())?;
        let settled = settle_all(&manifest.images, resource_dir);
        failed_images = composite(
            &mut surface,
            &manifest.images,
            settled,
            scale,
            manifest.dom_origin_top,
        );
    }
    let t_images = t0.elapsed();

    let sections = extract_sections(manifest, surface.height())?;
    let layout = PhysicalLayout::from_config(config);
    let capacity = layout.capacity(config.safety_margin_px);
    let pages = pack(&sections, capacity);
    let oversized = pages
        .iter()
        .filter(|p| is_oversized(p, &sections, capacity))
        .count();
    let t_pack = t0.elapsed();

    let bytes = pdf::render(&surface, &pages, &layout, diagnosis)?;
    let t_render = t0.elapsed();

    log::info!(
        "Timing: images={:.1}ms, pack={:.1}ms, render={:.1}ms ({} sections, {} pages, {} oversized, {} failed images)",
        t_images.as_secs_f64() * 1000.0,
        (t_pack - t_images).as_secs_f64() * 1000.0,
        (t_render - t_pack).as_secs_f64() * 1000.0,
        sections.len(),
        pages.len(),
        oversized,
        failed_images,
    );

    Ok(Exported {
        bytes,
        pages,
        failed_images,
    })
}

pub fn load_manifest(path: &Path) -> Result<GeometryManifest, Error> {
    let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => {
            Error::GeometrySourceMissing(format!("no geometry manifest at {}", path.display()))
        }
        _ => Error::Io(e),
    })?;
    serde_json::from_str(&text)
        .map_err(|e| Error::InvalidManifest(format!("{}: {e}", path.display())))
}

pub fn load_surface(path: &Path) -> Result<RgbaImage, Error> {
    if !path.exists() {
        return Err(Error::GeometrySourceMissing(format!(
            "no rendered surface at {}",
            path.display()
        )));
    }
    let img = image::open(path)
        .map_err(|e| Error::RasterizationFailure(format!("{}: {e}", path.display())))?;
    Ok(img.to_rgba8())
}

/// File-based export. When `output` is a directory the file is named after the
/// plant and today's date. Returns the path written.
pub fn export_report_to_file(
    surface_path: &Path,
    manifest_path: &Path,
    diagnosis: Option<&DiagnosisResult>,
    config: &ExportConfig,
    output: &Path,
) -> Result<PathBuf, Error> {
    let t0 = Instant::now();

    let manifest = load_manifest(manifest_path)?;
    let surface = load_surface(surface_path)?;
    let t_load = t0.elapsed();

    let resource_dir = manifest_path.parent().unwrap_or(Path::new("."));
    let exported = export_report(surface, &manifest, resource_dir, diagnosis, config)?;

    let target = if output.is_dir() {
        let plant = diagnosis.map(|d| d.plant.as_str()).unwrap_or("");
        output.join(report_file_name(plant, today()))
    } else {
        output.to_path_buf()
    };
    std::fs::write(&target, &exported.bytes).map_err(Error::Io)?;
    let t_total = t0.elapsed();

    log::info!(
        "Timing: load={:.1}ms, export+write={:.1}ms, total={:.1}ms (output {} bytes to {})",
        t_load.as_secs_f64() * 1000.0,
        (t_total - t_load).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        exported.bytes.len(),
        target.display(),
    );

    Ok(target)
}
