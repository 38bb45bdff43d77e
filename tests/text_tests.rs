mod common;

use common::{approx_eq, document, paragraph, pipeline, render, shown_text, text_origins, TestResult};
use folio::{LayoutConfig, Pipeline, PipelineError};
use folio_layout::LayoutError;
use folio_traits::CanvasOp;
use folio_types::Color;
use serde_json::json;

#[test]
fn test_paragraph_wraps_at_word_boundaries() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let rendered = render(50.0, 100.0, document(vec![paragraph("aaaa bbbb cccc")]))?;
    let canvas = &rendered.pages[0].canvas;

    let lines = shown_text(canvas);
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].trim_end(), "aaaa bbbb");
    assert_eq!(lines[1], "cccc");

    let origins = text_origins(canvas);
    assert!(approx_eq(origins[0].1, 90.4), "{:?}", origins);
    assert!(approx_eq(origins[1].1, 78.4), "{:?}", origins);
    Ok(())
}

#[test]
fn test_long_paragraph_continues_on_next_page() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    // Two lines fit on a 30pt page.
    let rendered = render(20.0, 30.0, document(vec![paragraph("aaaa bbbb cccc")]))?;

    assert_eq!(rendered.pages.len(), 2);
    assert_eq!(shown_text(&rendered.pages[0].canvas).len(), 2);
    assert_eq!(shown_text(&rendered.pages[1].canvas), vec!["cccc".to_string()]);
    Ok(())
}

#[test]
fn test_center_alignment_offsets_the_line() -> TestResult {
    let content = json!({
        "type": "paragraph",
        "style": { "text-align": "center" },
        "children": [ { "type": "text", "text": "abcd" } ]
    });
    let rendered = render(100.0, 100.0, content)?;

    let origins = text_origins(&rendered.pages[0].canvas);
    assert!(approx_eq(origins[0].0, 40.0), "{:?}", origins);
    Ok(())
}

#[test]
fn test_text_color_and_underline_are_painted() -> TestResult {
    let content = json!({
        "type": "paragraph",
        "children": [{
            "type": "text",
            "text": "ab",
            "style": { "color": "#ff0000", "text-decoration": "underline" }
        }]
    });
    let rendered = render(100.0, 100.0, content)?;
    let canvas = &rendered.pages[0].canvas;

    assert!(canvas
        .ops()
        .contains(&CanvasOp::SetFillColor { color: Color::rgb(255, 0, 0) }));
    // Underline position is -100 units, 1pt below the baseline at 10pt.
    let underline = canvas.ops().iter().find_map(|op| match op {
        CanvasOp::MoveTo { x, y } => Some((*x, *y)),
        _ => None,
    });
    assert!(matches!(underline, Some((x, y)) if x == 0.0 && approx_eq(y, 89.4)), "{:?}", underline);
    assert!(canvas.ops().contains(&CanvasOp::LineTo { x: 10.0, y: underline.map_or(0.0, |u| u.1) }));
    assert_eq!(canvas.count(|op| matches!(op, CanvasOp::Stroke)), 1);
    Ok(())
}

#[test]
fn test_font_size_scales_advances() -> TestResult {
    let content = json!({
        "type": "paragraph",
        "children": [
            { "type": "text", "text": "ab", "style": { "font-size": 20 } },
            { "type": "text", "text": "cd" }
        ]
    });
    let rendered = render(200.0, 100.0, content)?;

    let origins = text_origins(&rendered.pages[0].canvas);
    assert_eq!(origins.len(), 2);
    assert!(approx_eq(origins[1].0, 20.0), "{:?}", origins);
    Ok(())
}

#[test]
fn test_hyphenation_uses_configured_hyphenator() -> TestResult {
    let hyphenator = folio_traits::DictionaryHyphenator::new().with_words(["hy-phen-ation"]);
    let pipeline = Pipeline::builder()
        .with_config(common::page_config(40.0, 100.0))
        .with_font(
            "Mono",
            folio_style::FontWeight::Regular,
            folio_style::FontStyle::Normal,
            std::sync::Arc::new(common::MonospaceFont),
        )?
        .with_hyphenator(std::sync::Arc::new(hyphenator))
        .build();

    let content = json!({
        "type": "paragraph",
        "style": { "hyphenate": true },
        "children": [ { "type": "text", "text": "hyphenation" } ]
    });
    let rendered = pipeline.render_value(content)?;

    assert_eq!(
        shown_text(&rendered.pages[0].canvas),
        vec!["hyphen-".to_string(), "ation".to_string()]
    );
    Ok(())
}

#[test]
fn test_rtl_paragraph_with_shaped_font_is_reversed_once() -> TestResult {
    let font = concat!(env!("CARGO_MANIFEST_DIR"), "/crates/layout/assets/fonts/DejaVuSans.ttf");
    let pipeline = Pipeline::builder()
        .with_config(LayoutConfig {
            default_font_family: "Sans".to_string(),
            ..common::page_config(200.0, 100.0)
        })
        .with_font_file("Sans", font)?
        .build();

    let content = json!({
        "type": "paragraph",
        "style": { "direction": "rtl" },
        "children": [ { "type": "text", "text": "\u{05D0}\u{05D1}\u{05D2} \u{05D3}\u{05D4}" } ]
    });
    let rendered = pipeline.render_value(content)?;

    assert_eq!(
        shown_text(&rendered.pages[0].canvas),
        vec!["\u{05D4}\u{05D3} \u{05D2}\u{05D1}\u{05D0}".to_string()]
    );
    Ok(())
}

#[test]
fn test_text_without_fonts_is_a_layout_error() {
    let pipeline = Pipeline::builder()
        .with_config(LayoutConfig::default())
        .build();

    let err = pipeline
        .render_value(document(vec![paragraph("hello")]))
        .unwrap_err();
    assert!(matches!(err, PipelineError::Layout(LayoutError::MissingFontProvider)));
}

#[test]
fn test_unknown_font_family_is_reported() -> TestResult {
    let content = json!({
        "type": "paragraph",
        "children": [{ "type": "text", "text": "x", "style": { "font-family": "Nowhere" } }]
    });
    let err = pipeline(common::page_config(100.0, 100.0))?
        .render_value(content)
        .unwrap_err();

    assert!(matches!(err, PipelineError::Layout(LayoutError::FontResolution(_))));
    Ok(())
}
