use std::ops::Range;
use std::path::PathBuf;

use serde::Deserialize;

/// An atomic block of report content, in raster-surface pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Section {
    pub top: f64,
    pub height: f64,
    pub force_break_before: bool,
}

impl Section {
    pub fn new(top: f64, height: f64, force_break_before: bool) -> Self {
        Self {
            top,
            height,
            force_break_before,
        }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// A run of whole consecutive sections assigned to one physical page.
#[derive(Clone, Debug, PartialEq)]
pub struct Page {
    pub start_section: usize,
    pub end_section: usize, // exclusive
    pub pixel_top: f64,
    pub pixel_height: f64,
}

impl Page {
    /// Builds the page for `range`, which must be non-empty and inside `sections`.
    pub(crate) fn covering(sections: &[Section], range: Range<usize>) -> Self {
        let pixel_top = sections[range.start].top;
        let pixel_height = sections[range.end - 1].bottom() - pixel_top;
        Self {
            start_section: range.start,
            end_section: range.end,
            pixel_top,
            pixel_height,
        }
    }

    pub fn sections(&self) -> Range<usize> {
        self.start_section..self.end_section
    }

    pub fn section_count(&self) -> usize {
        self.end_section - self.start_section
    }

    pub fn pixel_bottom(&self) -> f64 {
        self.pixel_top + self.pixel_height
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageCapacity {
    pub max_usable_px: f64,
    pub safety_margin_px: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionTag {
    Header,
    Section,
    Subsection,
}

/// Logical report blocks, as laid out by the report renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Header,
    PlantIdentification,
    PrimaryDiagnosis,
    Summary,
    Reasoning,
    Treatment,
    Prevention,
    SecondaryDiagnosis,
    Images,
}

impl SectionKind {
    /// The secondary diagnosis always opens a fresh page.
    pub fn forces_new_page(self) -> bool {
        matches!(self, SectionKind::SecondaryDiagnosis)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct ManifestSection {
    pub tag: SectionTag,
    #[serde(default)]
    pub force_break_before: bool,
    #[serde(default)]
    pub kind: Option<SectionKind>,
    pub dom_top: f64,
    pub dom_height: f64,
}

/// Box of an embedded image, in DOM pixels relative to the surface origin.
#[derive(Clone, Debug, Deserialize)]
pub struct ImagePlacement {
    pub path: PathBuf,
    pub dom_x: f64,
    pub dom_y: f64,
    pub dom_width: f64,
    pub dom_height: f64,
}

/// Geometry measured on the live layout, delivered alongside the raster surface.
#[derive(Clone, Debug, Deserialize)]
pub struct GeometryManifest {
    pub dom_width: f64,
    pub dom_height: f64,
    #[serde(default)]
    pub dom_origin_top: f64,
    #[serde(default)]
    pub sections: Vec<ManifestSection>,
    #[serde(default)]
    pub images: Vec<ImagePlacement>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Boundary {
    KeepTogether,
    KeepTogetherNewPage,
}

/// A node of the rendered report. Untagged nodes are transparent containers.
#[derive(Clone, Debug)]
pub struct ReportNode {
    pub boundary: Option<Boundary>,
    pub kind: Option<SectionKind>,
    pub dom_top: f64,
    pub dom_height: f64,
    pub children: Vec<ReportNode>,
}

impl ReportNode {
    pub fn container(children: Vec<ReportNode>) -> Self {
        let dom_top = children.first().map(|c| c.dom_top).unwrap_or(0.0);
        let dom_bottom = children
            .iter()
            .map(|c| c.dom_top + c.dom_height)
            .fold(dom_top, f64::max);
        Self {
            boundary: None,
            kind: None,
            dom_top,
            dom_height: dom_bottom - dom_top,
            children,
        }
    }

    pub fn section(boundary: Boundary, dom_top: f64, dom_height: f64) -> Self {
        Self {
            boundary: Some(boundary),
            kind: None,
            dom_top,
            dom_height,
            children: Vec::new(),
        }
    }

    pub fn with_kind(mut self, kind: SectionKind) -> Self {
        self.kind = Some(kind);
        self
    }
}
