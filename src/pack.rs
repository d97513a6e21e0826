use crate::model::{Page, PageCapacity, Section};

/// Greedy single pass over `sections`, never splitting one and never backtracking.
///
/// A section flagged `force_break_before` opens a new page unless it is already
/// first on its page. A section too tall for any page is placed alone. Every
/// iteration consumes at least one section, so the result has at most
/// `sections.len()` pages, and none when `sections` is empty.
///
/// Only section heights count against capacity. Page spans therefore stay within
/// `max_usable_px + safety_margin_px` when sections abut; gaps between sections
/// widen the span without being charged.
pub fn pack(sections: &[Section], capacity: PageCapacity) -> Vec<Page> {
    let PageCapacity {
        max_usable_px,
        safety_margin_px,
    } = capacity;
    let fill_limit = max_usable_px - safety_margin_px;
    let oversize_limit = max_usable_px + safety_margin_px;

    let mut pages = Vec::new();
    let mut page_start = 0;

    while page_start < sections.len() {
        let mut accumulated = 0.0f64;
        let mut end = page_start;

        while end < sections.len() {
            let section = &sections[end];
            let first_on_page = end == page_start;

            if section.force_break_before && !first_on_page {
                break;
            }
            if first_on_page && section.height > oversize_limit {
                log::warn!(
                    "Section {end} is {:.0}px tall, over the {:.0}px page capacity; \
                     placing it alone",
                    section.height,
                    max_usable_px,
                );
                end += 1;
                break;
            }
            // Strict comparison: an exact fit stays on this page.
            if accumulated + section.height > fill_limit {
                break;
            }
            accumulated += section.height;
            end += 1;
        }

        // Fits the oversize threshold but not the fill limit: still alone on its own page.
        if end == page_start {
            end = page_start + 1;
        }

        let page = Page::covering(sections, page_start..end);
        log::debug!(
            "Page {}: sections {}..{}, top {:.1}px, height {:.1}px",
            pages.len() + 1,
            page.start_section,
            page.end_section,
            page.pixel_top,
            page.pixel_height,
        );
        pages.push(page);
        page_start = end;
    }

    pages
}

/// Whether `page` holds a single section taller than the usable page height.
pub fn is_oversized(page: &Page, sections: &[Section], capacity: PageCapacity) -> bool {
    page.section_count() == 1 && sections[page.start_section].height > capacity.max_usable_px
}
