use crate::error::Error;
use crate::model::{
    Boundary, GeometryManifest, ManifestSection, ReportNode, Section, SectionKind, SectionTag,
};

/// Ratio between the rasterized surface and the layout it was measured on.
///
/// Computed once from total heights and applied to every section, so rounding
/// never accumulates across many small sections.
pub fn dom_to_raster_scale(dom_height: f64, raster_height: u32) -> Result<f64, Error> {
    if !dom_height.is_finite() || dom_height <= 0.0 {
        return Err(Error::GeometrySourceMissing(format!(
            "measured layout has no height ({dom_height})"
        )));
    }
    if raster_height == 0 {
        return Err(Error::GeometrySourceMissing(
            "raster surface has zero height".into(),
        ));
    }
    Ok(raster_height as f64 / dom_height)
}

/// Converts measured section boxes into raster-space sections, in document order.
pub fn extract_sections(
    manifest: &GeometryManifest,
    raster_height: u32,
) -> Result<Vec<Section>, Error> {
    if manifest.sections.is_empty() {
        return Ok(Vec::new());
    }
    let scale = dom_to_raster_scale(manifest.dom_height, raster_height)?;
    log::debug!(
        "Geometry: {} sections, dom height {:.1}px, raster height {}px, scale {:.4}",
        manifest.sections.len(),
        manifest.dom_height,
        raster_height,
        scale,
    );

    let mut sections = Vec::with_capacity(manifest.sections.len());
    let mut prev_top = 0.0f64;
    for (i, entry) in manifest.sections.iter().enumerate() {
        if !entry.dom_top.is_finite() || !entry.dom_height.is_finite() {
            return Err(Error::InvalidManifest(format!(
                "section {i} has a non-finite position or height"
            )));
        }
        if entry.dom_height < 0.0 {
            return Err(Error::InvalidManifest(format!(
                "section {i} has negative height {}",
                entry.dom_height
            )));
        }
        let top = entry.dom_top - manifest.dom_origin_top;
        if top < 0.0 {
            return Err(Error::InvalidManifest(format!(
                "section {i} starts above the surface origin ({top:.1}px)"
            )));
        }
        if top < prev_top {
            return Err(Error::InvalidManifest(format!(
                "section {i} at {top:.1}px precedes section {} at {prev_top:.1}px",
                i - 1
            )));
        }
        prev_top = top;

        let force = entry.force_break_before
            || entry.kind.is_some_and(SectionKind::forces_new_page);
        sections.push(Section::new(top * scale, entry.dom_height * scale, force));
    }
    Ok(sections)
}

/// Collects the atomic sections of a content tree in document order.
///
/// A tagged node is indivisible, so its descendants are never visited.
pub fn flatten_tree(root: &ReportNode) -> Vec<ManifestSection> {
    fn walk(node: &ReportNode, out: &mut Vec<ManifestSection>) {
        match node.boundary {
            Some(boundary) => {
                let tag = if node.kind == Some(SectionKind::Header) {
                    SectionTag::Header
                } else {
                    SectionTag::Section
                };
                out.push(ManifestSection {
                    tag,
                    force_break_before: boundary == Boundary::KeepTogetherNewPage,
                    kind: node.kind,
                    dom_top: node.dom_top,
                    dom_height: node.dom_height,
                });
            }
            None => {
                for child in &node.children {
                    walk(child, out);
                }
            }
        }
    }

    let mut out = Vec::new();
    walk(root, &mut out);
    out
}

/// Same as [`extract_sections`], starting from a content tree whose root spans the surface.
pub fn extract_from_tree(root: &ReportNode, raster_height: u32) -> Result<Vec<Section>, Error> {
    let manifest = GeometryManifest {
        dom_width: 0.0,
        dom_height: root.dom_height,
        dom_origin_top: root.dom_top,
        sections: flatten_tree(root),
        images: Vec::new(),
    };
    extract_sections(&manifest, raster_height)
}
