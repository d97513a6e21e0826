mod slice;

use image::RgbaImage;
use pdf_writer::{Content, Filter, Name, Pdf, Rect, Ref, TextStr};

use crate::error::Error;
use crate::model::Page;
use crate::report::DiagnosisResult;
use crate::units::{PhysicalLayout, mm_to_pt};

use slice::slice_page;

/// Writes one physical page per packed page, each showing its slice of `surface`.
///
/// All slices share the document-wide pixel-to-millimeter ratio, so pages only
/// differ in emitted height. An oversized slice keeps its natural size and runs
/// past the bottom margin rather than being squeezed.
pub fn render(
    surface: &RgbaImage,
    pages: &[Page],
    layout: &PhysicalLayout,
    diagnosis: Option<&DiagnosisResult>,
) -> Result<Vec<u8>, Error> {
    let t0 = std::time::Instant::now();
    let mut pdf = Pdf::new();
    let mut next_id = 1i32;
    let mut alloc = || {
        let r = Ref::new(next_id);
        next_id += 1;
        r
    };

    let catalog_id = alloc();
    let pages_id = alloc();

    let (page_w, page_h) = layout.page_size_pt();
    let margin = mm_to_pt(layout.margin_mm);
    let image_w = layout.px_to_pt(surface.width() as f64);

    // Phase 1: slice the surface and embed one image per page
    let mut all_contents: Vec<Content> = Vec::new();
    let mut page_images: Vec<Option<(String, Ref)>> = Vec::new();

    for (i, page) in pages.iter().enumerate() {
        let mut content = Content::new();
        let Some(slice) = slice_page(surface, page)? else {
            log::debug!("Page {}: no pixel rows, emitting a blank page", i + 1);
            all_contents.push(content);
            page_images.push(None);
            continue;
        };

        let xobj_ref = alloc();
        let pdf_name = format!("Im{}", i + 1);
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(&slice.rgb, 6);
        {
            let mut xobj = pdf.image_xobject(xobj_ref, &compressed);
            xobj.filter(Filter::FlateDecode);
            xobj.width(slice.width as i32);
            xobj.height(slice.height as i32);
            xobj.color_space().device_rgb();
            xobj.bits_per_component(8);
        }

        let image_h = layout.px_to_pt(slice.height as f64);
        // PDF origin is bottom-left; anchor the image at the top margin.
        let y_bottom = page_h - margin - image_h;
        content.save_state();
        content.transform([image_w, 0.0, 0.0, image_h, margin, y_bottom]);
        content.x_object(Name(pdf_name.as_bytes()));
        content.restore_state();

        all_contents.push(content);
        page_images.push(Some((pdf_name, xobj_ref)));
    }

    if all_contents.is_empty() {
        log::warn!("Report has no sections; writing a single blank page");
        all_contents.push(Content::new());
        page_images.push(None);
    }

    let t_images = t0.elapsed();

    // Phase 2: page tree
    let n = all_contents.len();
    let page_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();
    let content_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();

    for (i, c) in all_contents.into_iter().enumerate() {
        let raw = c.finish();
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(raw.as_slice(), 6);
        pdf.stream(content_ids[i], &compressed).filter(Filter::FlateDecode);
    }

    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id)
        .kids(page_ids.iter().copied())
        .count(n as i32);

    for i in 0..n {
        let mut page = pdf.page(page_ids[i]);
        page.media_box(Rect::new(0.0, 0.0, page_w, page_h))
            .parent(pages_id)
            .contents(content_ids[i]);
        if let Some((name, xobj_ref)) = &page_images[i] {
            let mut resources = page.resources();
            resources.x_objects().pair(Name(name.as_bytes()), *xobj_ref);
        }
    }

    let producer = concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION"));
    let info_id = alloc();
    {
        let mut info = pdf.document_info(info_id);
        info.producer(TextStr(producer));
        if let Some(d) = diagnosis {
            info.title(TextStr(&d.document_title()));
            info.subject(TextStr(&d.primary.diagnosis));
        }
    }

    let t_assembly = t0.elapsed();

    log::info!(
        "Render phases: images={:.1}ms, assembly={:.1}ms ({} pages)",
        t_images.as_secs_f64() * 1000.0,
        (t_assembly - t_images).as_secs_f64() * 1000.0,
        n,
    );

    Ok(pdf.finish())
}
