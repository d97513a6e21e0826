mod common;

use common::manifest;
use plantdoc_pdf::{
    Boundary, Error, ReportNode, SectionKind, SectionTag, dom_to_raster_scale, extract_from_tree,
    extract_sections, flatten_tree,
};

#[test]
fn single_scale_applies_to_every_section() {
    let m = manifest(
        r#"{
            "dom_width": 800, "dom_height": 1000,
            "sections": [
                { "tag": "header", "dom_top": 0, "dom_height": 120 },
                { "tag": "section", "dom_top": 140, "dom_height": 333.5 },
                { "tag": "subsection", "dom_top": 480, "dom_height": 520 }
            ]
        }"#,
    );
    let sections = extract_sections(&m, 3000).unwrap();

    assert_eq!(sections.len(), 3);
    assert_eq!(sections[0].top, 0.0);
    assert_eq!(sections[0].height, 360.0);
    assert_eq!(sections[1].top, 420.0);
    assert_eq!(sections[1].height, 1000.5);
    assert_eq!(sections[2].bottom(), 3000.0);
    assert!(sections.iter().all(|s| !s.force_break_before));
}

#[test]
fn scale_comes_from_total_heights() {
    assert_eq!(dom_to_raster_scale(1200.0, 3600).unwrap(), 3.0);
    assert_eq!(dom_to_raster_scale(1000.0, 2500).unwrap(), 2.5);
}

#[test]
fn tops_are_relative_to_surface_origin() {
    let m = manifest(
        r#"{
            "dom_width": 800, "dom_height": 500, "dom_origin_top": 250,
            "sections": [{ "tag": "section", "dom_top": 300, "dom_height": 100 }]
        }"#,
    );
    let sections = extract_sections(&m, 1000).unwrap();
    assert_eq!(sections[0].top, 100.0);
    assert_eq!(sections[0].height, 200.0);
}

#[test]
fn zero_height_section_is_kept() {
    let m = manifest(
        r#"{
            "dom_width": 800, "dom_height": 100,
            "sections": [
                { "tag": "section", "dom_top": 0, "dom_height": 0, "force_break_before": true },
                { "tag": "section", "dom_top": 0, "dom_height": 100 }
            ]
        }"#,
    );
    let sections = extract_sections(&m, 300).unwrap();
    assert_eq!(sections.len(), 2);
    assert_eq!(sections[0].height, 0.0);
    assert!(sections[0].force_break_before);
}

#[test]
fn secondary_diagnosis_forces_a_break() {
    let m = manifest(
        r#"{
            "dom_width": 800, "dom_height": 200,
            "sections": [
                { "tag": "section", "kind": "primary_diagnosis", "dom_top": 0, "dom_height": 100 },
                { "tag": "section", "kind": "secondary_diagnosis", "dom_top": 100, "dom_height": 100 }
            ]
        }"#,
    );
    let sections = extract_sections(&m, 200).unwrap();
    assert!(!sections[0].force_break_before);
    assert!(sections[1].force_break_before);
}

#[test]
fn empty_manifest_yields_no_sections() {
    let m = manifest(r#"{ "dom_width": 0, "dom_height": 0 }"#);
    assert!(extract_sections(&m, 0).unwrap().is_empty());
}

#[test]
fn missing_surface_is_geometry_source_missing() {
    let m = manifest(
        r#"{
            "dom_width": 800, "dom_height": 0,
            "sections": [{ "tag": "section", "dom_top": 0, "dom_height": 10 }]
        }"#,
    );
    assert!(matches!(extract_sections(&m, 300), Err(Error::GeometrySourceMissing(_))));

    let m = manifest(
        r#"{
            "dom_width": 800, "dom_height": 100,
            "sections": [{ "tag": "section", "dom_top": 0, "dom_height": 10 }]
        }"#,
    );
    assert!(matches!(extract_sections(&m, 0), Err(Error::GeometrySourceMissing(_))));
}

#[test]
fn out_of_order_sections_are_rejected() {
    let m = manifest(
        r#"{
            "dom_width": 800, "dom_height": 300,
            "sections": [
                { "tag": "section", "dom_top": 100, "dom_height": 50 },
                { "tag": "section", "dom_top": 40, "dom_height": 50 }
            ]
        }"#,
    );
    let err = extract_sections(&m, 300).unwrap_err();
    assert!(matches!(err, Error::InvalidManifest(_)), "{err}");
}

#[test]
fn negative_height_is_rejected() {
    let m = manifest(
        r#"{
            "dom_width": 800, "dom_height": 300,
            "sections": [{ "tag": "section", "dom_top": 0, "dom_height": -5 }]
        }"#,
    );
    assert!(matches!(extract_sections(&m, 300), Err(Error::InvalidManifest(_))));
}

fn sample_tree() -> ReportNode {
    let header =
        ReportNode::section(Boundary::KeepTogether, 0.0, 80.0).with_kind(SectionKind::Header);
    // Tagged node with tagged children: the children must not be emitted separately.
    let mut primary = ReportNode::section(Boundary::KeepTogether, 100.0, 300.0)
        .with_kind(SectionKind::PrimaryDiagnosis);
    primary.children = vec![
        ReportNode::section(Boundary::KeepTogether, 100.0, 150.0),
        ReportNode::section(Boundary::KeepTogether, 250.0, 150.0),
    ];
    let body = ReportNode::container(vec![
        primary,
        ReportNode::section(Boundary::KeepTogetherNewPage, 420.0, 180.0)
            .with_kind(SectionKind::SecondaryDiagnosis),
    ]);
    ReportNode::container(vec![header, body])
}

#[test]
fn tree_flattens_in_document_order() {
    let flat = flatten_tree(&sample_tree());

    assert_eq!(flat.len(), 3);
    assert_eq!(flat[0].tag, SectionTag::Header);
    assert_eq!(flat[1].kind, Some(SectionKind::PrimaryDiagnosis));
    assert_eq!(flat[1].dom_height, 300.0);
    assert_eq!(flat[2].tag, SectionTag::Section);
    assert!(flat[2].force_break_before);
}

#[test]
fn tree_extraction_scales_like_manifest() {
    let tree = sample_tree();
    assert_eq!(tree.dom_height, 600.0);

    let sections = extract_from_tree(&tree, 1800).unwrap();
    assert_eq!(sections.len(), 3);
    assert_eq!(sections[1].top, 300.0);
    assert_eq!(sections[1].height, 900.0);
    assert_eq!(sections[2].bottom(), 1800.0);
    assert!(sections[2].force_break_before);
}
