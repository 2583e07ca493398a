//! Integration tests for pdf-sidebyside-core
//!
//! These tests verify the end-to-end workflow:
//! - Page count truncation and per-page geometry
//! - Unscaled, top-aligned placement of both source pages
//! - Isolation between calls (no hidden state, no cross-call leakage)
//! - Failure classification for bad input

mod common;

use pdf_sidebyside_core::pdf::fixtures::{ContentLayout, FixturePage, labelled, sample_pdf};
use pdf_sidebyside_core::{ComposeOptions, Composer, Error, ErrorClass, Side, compose};

// =============================================================================
// Page Count
// =============================================================================

#[test]
fn test_output_has_min_page_count() {
    for (p, q) in [(3, 5), (5, 3), (2, 2), (1, 4)] {
        let a = sample_pdf(&labelled("A", p, 100.0, 100.0));
        let b = sample_pdf(&labelled("B", q, 100.0, 100.0));

        let doc = common::load(&compose(&a, &b).unwrap());
        assert_eq!(doc.get_pages().len(), p.min(q), "pages for ({p}, {q})");
    }
}

/// Mismatched page counts are truncated, not rejected. This is the
/// documented contract; extra pages of the longer document are dropped.
#[test]
fn test_truncation_is_silent() {
    let a = sample_pdf(&labelled("A", 4, 100.0, 100.0));
    let b = sample_pdf(&labelled("B", 2, 100.0, 100.0));

    let doc = common::load(&compose(&a, &b).unwrap());
    let text = common::all_stream_text(&doc);
    assert!(text.contains("(A-1)"));
    assert!(!text.contains("(A-2)"));
    assert!(!text.contains("(A-3)"));
}

/// Zero pages on either side gives an empty, valid document and no error.
/// Kept as observed behaviour rather than turned into an error.
#[test]
fn test_zero_page_inputs_give_empty_output() {
    let empty = sample_pdf(&[]);
    let some = sample_pdf(&labelled("A", 2, 100.0, 100.0));

    for (left, right) in [(&empty, &some), (&some, &empty), (&empty, &empty)] {
        let bytes = compose(left, right).unwrap();
        let doc = common::load(&bytes);
        assert_eq!(doc.get_pages().len(), 0);
    }
}

// =============================================================================
// Geometry
// =============================================================================

#[test]
fn test_page_sizes_follow_width_sum_and_max_height() {
    let a_pages = [
        FixturePage::new(595.0, 842.0, "A-0"),
        FixturePage::new(100.0, 200.0, "A-1"),
        FixturePage::new(300.5, 50.25, "A-2"),
    ];
    let b_pages = [
        FixturePage::new(612.0, 792.0, "B-0"),
        FixturePage::new(300.0, 100.0, "B-1"),
        FixturePage::new(10.0, 400.0, "B-2"),
    ];

    let doc = common::load(&compose(&sample_pdf(&a_pages), &sample_pdf(&b_pages)).unwrap());
    let sizes = common::page_sizes(&doc);

    assert_eq!(sizes.len(), 3);
    for ((a, b), (width, height)) in a_pages.iter().zip(&b_pages).zip(sizes) {
        assert_eq!(width, a.width + b.width);
        assert_eq!(height, a.height.max(b.height));
    }
}

#[test]
fn test_reference_example_100x200_and_300x100() {
    let a = sample_pdf(&[FixturePage::new(100.0, 200.0, "left")]);
    let b = sample_pdf(&[FixturePage::new(300.0, 100.0, "right")]);

    let doc = common::load(&compose(&a, &b).unwrap());
    assert_eq!(common::page_sizes(&doc), vec![(400.0, 200.0)]);

    let page = common::page_ids(&doc)[0];
    let draws = common::draws(&doc, page);
    assert_eq!(draws.len(), 2);

    // Left block: x in [0, 100), flush with the top and the bottom
    assert_eq!(draws[0].name, "L");
    assert_eq!(draws[0].matrix, [1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);
    assert_eq!(common::xobject_bbox(&doc, page, "L"), [0.0, 0.0, 100.0, 200.0]);

    // Right block: x in [100, 400), flush with the top, 100pt gap below
    assert_eq!(draws[1].name, "R");
    assert_eq!(draws[1].matrix, [1.0, 0.0, 0.0, 1.0, 100.0, 100.0]);
    assert_eq!(common::xobject_bbox(&doc, page, "R"), [0.0, 0.0, 300.0, 100.0]);
}

#[test]
fn test_pages_are_unscaled_and_top_aligned() {
    let a = sample_pdf(&[FixturePage::new(200.0, 300.0, "A-0"), FixturePage::new(250.0, 100.0, "A-1")]);
    let b = sample_pdf(&[FixturePage::new(150.0, 120.0, "B-0"), FixturePage::new(50.0, 400.0, "B-1")]);

    let doc = common::load(&compose(&a, &b).unwrap());
    let pages = common::page_ids(&doc);

    let first = common::draws(&doc, pages[0]);
    assert_eq!(first[0].matrix, [1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);
    assert_eq!(first[1].matrix, [1.0, 0.0, 0.0, 1.0, 200.0, 180.0]);

    let second = common::draws(&doc, pages[1]);
    assert_eq!(second[0].matrix, [1.0, 0.0, 0.0, 1.0, 0.0, 300.0]);
    assert_eq!(second[1].matrix, [1.0, 0.0, 0.0, 1.0, 250.0, 0.0]);
}

#[test]
fn test_offset_media_box_lands_at_column_origin() {
    let a = sample_pdf(&[FixturePage::new(100.0, 200.0, "A-0").with_origin(30.0, 40.0)]);
    let b = sample_pdf(&[FixturePage::new(300.0, 100.0, "B-0").with_origin(-10.0, 5.0)]);

    let doc = common::load(&compose(&a, &b).unwrap());
    let page = common::page_ids(&doc)[0];
    let draws = common::draws(&doc, page);

    assert_eq!(common::page_sizes(&doc), vec![(400.0, 200.0)]);
    assert_eq!(common::xobject_bbox(&doc, page, "L"), [30.0, 40.0, 130.0, 240.0]);
    // Translation cancels the media box origin
    assert_eq!(draws[0].matrix, [1.0, 0.0, 0.0, 1.0, -30.0, -40.0]);
    assert_eq!(draws[1].matrix, [1.0, 0.0, 0.0, 1.0, 110.0, 95.0]);
}

// =============================================================================
// Content Placement
// =============================================================================

#[test]
fn test_left_and_right_regions_hold_matching_pages() {
    let a = sample_pdf(&labelled("A", 3, 100.0, 100.0));
    let b = sample_pdf(&labelled("B", 3, 120.0, 80.0));

    let doc = common::load(&compose(&a, &b).unwrap());
    for (i, page) in common::page_ids(&doc).into_iter().enumerate() {
        let left = common::xobject_text(&doc, page, "L");
        let right = common::xobject_text(&doc, page, "R");
        assert!(left.contains(&format!("(A-{i})")), "page {i} left: {left}");
        assert!(right.contains(&format!("(B-{i})")), "page {i} right: {right}");
    }
}

#[test]
fn test_embedding_does_not_pull_unrelated_pages() {
    let a = sample_pdf(&labelled("A", 3, 100.0, 100.0));
    let b = sample_pdf(&labelled("B", 1, 100.0, 100.0));

    let doc = common::load(&compose(&a, &b).unwrap());
    let text = common::all_stream_text(&doc);

    assert!(text.contains("(A-0)"));
    assert!(!text.contains("(A-1)"));
    assert!(!text.contains("(A-2)"));
    assert_eq!(doc.get_pages().len(), 1);
}

#[test]
fn test_compressed_and_split_content_streams() {
    let a = sample_pdf(&[FixturePage::new(100.0, 100.0, "A-0").with_layout(ContentLayout::Compressed)]);
    let b = sample_pdf(&[FixturePage::new(100.0, 100.0, "B-0").with_layout(ContentLayout::Split)]);

    let doc = common::load(&compose(&a, &b).unwrap());
    let page = common::page_ids(&doc)[0];

    assert!(common::xobject_text(&doc, page, "L").contains("(A-0)"));
    let right = common::xobject_text(&doc, page, "R");
    assert!(right.starts_with("q 0.5 g\n"));
    assert!(right.contains("(B-0)"));
}

#[test]
fn test_ascii_hex_encoded_content_parts() {
    let a = sample_pdf(&[FixturePage::new(100.0, 100.0, "A-0").with_layout(ContentLayout::SplitAsciiHex)]);
    let b = sample_pdf(&[FixturePage::new(200.0, 50.0, "B-0").with_layout(ContentLayout::SplitAsciiHex)]);

    let doc = common::load(&compose(&a, &b).unwrap());
    let page = common::page_ids(&doc)[0];
    assert_eq!(common::page_sizes(&doc), vec![(300.0, 100.0)]);

    for (name, label) in [("L", "(A-0)"), ("R", "(B-0)")] {
        let text = common::xobject_text(&doc, page, name);
        assert!(text.starts_with("q 0.5 g\n"), "{name}: {text}");
        assert!(text.contains(label), "{name}: {text}");
        assert!(text.trim_end().ends_with('Q'), "{name}: {text}");
    }
}

#[test]
fn test_uncompressed_output_option() {
    let a = sample_pdf(&labelled("A", 1, 100.0, 100.0));
    let composer = Composer::new(ComposeOptions {
        compress: false,
        ..Default::default()
    });

    let bytes = composer.compose(&a, &a).unwrap();
    let doc = common::load(&bytes);
    assert!(doc.objects.values().filter_map(|o| o.as_stream().ok()).all(|s| s.dict.get(b"Filter").is_err()));
}

// =============================================================================
// Isolation
// =============================================================================

#[test]
fn test_repeated_calls_are_identical_and_inputs_untouched() {
    let a = sample_pdf(&labelled("A", 2, 100.0, 200.0));
    let b = sample_pdf(&labelled("B", 2, 300.0, 100.0));
    let (a_before, b_before) = (a.clone(), b.clone());

    let first = compose(&a, &b).unwrap();
    let second = compose(&a, &b).unwrap();

    assert_eq!(first, second);
    assert_eq!(a, a_before);
    assert_eq!(b, b_before);
}

#[test]
fn test_concurrent_calls_do_not_leak() {
    let composer = Composer::default();
    let inputs: Vec<_> = (0..8)
        .map(|i| {
            let width = 100.0 + 10.0 * i as f32;
            (
                i,
                sample_pdf(&labelled(&format!("L{i}"), 2, width, 100.0)),
                sample_pdf(&labelled(&format!("R{i}"), 2, 50.0, width)),
            )
        })
        .collect();

    std::thread::scope(|scope| {
        let handles: Vec<_> = inputs
            .iter()
            .map(|(i, a, b)| {
                let composer = &composer;
                scope.spawn(move || (*i, composer.compose(a, b).unwrap()))
            })
            .collect();

        for handle in handles {
            let (i, bytes) = handle.join().unwrap();
            let doc = common::load(&bytes);
            let width = 100.0 + 10.0 * i as f32;
            assert_eq!(common::page_sizes(&doc), vec![(width + 50.0, width); 2]);

            let text = common::all_stream_text(&doc);
            for other in (0..8).filter(|&o| o != i) {
                assert!(!text.contains(&format!("(L{other}-")), "call {i} saw L{other}");
                assert!(!text.contains(&format!("(R{other}-")), "call {i} saw R{other}");
            }
            assert!(text.contains(&format!("(L{i}-1)")));
        }
    });
}

// =============================================================================
// Failures
// =============================================================================

#[test]
fn test_non_pdf_input_is_processing_failure() {
    let good = sample_pdf(&labelled("A", 1, 100.0, 100.0));

    let err = compose(b"plain text, not a pdf", &good).unwrap_err();
    assert!(matches!(err, Error::PdfParse { side: Side::Left, .. }));
    assert_eq!(err.class(), ErrorClass::ProcessingFailure);

    let err = compose(&good, &[0xff, 0xd8, 0xff, 0xe0]).unwrap_err();
    assert!(matches!(err, Error::PdfParse { side: Side::Right, .. }));
    assert_eq!(err.class(), ErrorClass::ProcessingFailure);
}

#[test]
fn test_missing_input_is_classified() {
    let good = sample_pdf(&labelled("A", 1, 100.0, 100.0));
    let err = Composer::default().compose_inputs(Some(&good), None).unwrap_err();

    assert_eq!(err.class(), ErrorClass::MissingInput);
    assert_eq!(err.to_string(), "missing right document");
}
