#![allow(dead_code)]

use image::{Rgba, RgbaImage};
use lopdf::content::Content;
use lopdf::{Document, Object, Stream};
use plantdoc_pdf::{GeometryManifest, Page, Section};

/// Abutting sections starting at 0, from `(height, force_break_before)` pairs.
pub fn contiguous(specs: &[(f64, bool)]) -> Vec<Section> {
    let mut top = 0.0;
    specs
        .iter()
        .map(|&(height, force)| {
            let s = Section::new(top, height, force);
            top += height;
            s
        })
        .collect()
}

pub fn heights(hs: &[f64]) -> Vec<Section> {
    contiguous(&hs.iter().map(|&h| (h, false)).collect::<Vec<_>>())
}

pub fn spans(pages: &[Page]) -> Vec<(usize, usize)> {
    pages.iter().map(|p| (p.start_section, p.end_section)).collect()
}

/// Pages must cover `0..n` in order, without gaps, overlaps or empty pages.
pub fn assert_partition(pages: &[Page], n: usize) {
    let mut next = 0;
    for (i, page) in pages.iter().enumerate() {
        assert_eq!(page.start_section, next, "page {i} does not start where the previous ended");
        assert!(page.end_section > page.start_section, "page {i} is empty");
        next = page.end_section;
    }
    assert_eq!(next, n, "pages do not cover every section");
}

/// Opaque surface with horizontal bands so slices are distinguishable.
pub fn banded_surface(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |_, y| {
        let band = ((y / 50) % 5) as u8;
        Rgba([40 * band, 200 - 30 * band, 90, 255])
    })
}

pub fn manifest(json: &str) -> GeometryManifest {
    serde_json::from_str(json).expect("valid manifest json")
}

pub fn load_pdf(bytes: &[u8]) -> Document {
    Document::load_mem(bytes).expect("generated PDF parses")
}

pub fn media_boxes(doc: &Document) -> Vec<(f32, f32)> {
    doc.get_pages()
        .values()
        .map(|&id| {
            let dict = doc.get_object(id).and_then(Object::as_dict).expect("page dict");
            let mb = dict.get(b"MediaBox").and_then(Object::as_array).expect("media box");
            let n: Vec<f32> = mb.iter().map(|o| o.as_float().expect("number")).collect();
            (n[2] - n[0], n[3] - n[1])
        })
        .collect()
}

/// `(width, height)` of every image XObject in the file, sorted.
pub fn image_sizes(doc: &Document) -> Vec<(i64, i64)> {
    let mut sizes: Vec<(i64, i64)> = doc
        .objects
        .values()
        .filter_map(|obj| match obj {
            Object::Stream(s) if is_image(s) => {
                let w = s.dict.get(b"Width").and_then(Object::as_i64).ok()?;
                let h = s.dict.get(b"Height").and_then(Object::as_i64).ok()?;
                Some((w, h))
            }
            _ => None,
        })
        .collect();
    sizes.sort();
    sizes
}

fn is_image(stream: &Stream) -> bool {
    matches!(stream.dict.get(b"Subtype"), Ok(Object::Name(n)) if n == b"Image")
}

/// Operands of every `cm` operator, page by page in document order.
pub fn placement_matrices(doc: &Document) -> Vec<Vec<[f32; 6]>> {
    doc.get_pages()
        .values()
        .map(|&id| {
            let raw = doc.get_page_content(id).expect("page content");
            let content = Content::decode(&raw).expect("content stream parses");
            content
                .operations
                .iter()
                .filter(|op| op.operator == "cm")
                .map(|op| {
                    let n: Vec<f32> =
                        op.operands.iter().map(|o| o.as_float().expect("number")).collect();
                    [n[0], n[1], n[2], n[3], n[4], n[5]]
                })
                .collect()
        })
        .collect()
}
