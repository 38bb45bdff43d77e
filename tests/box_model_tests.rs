mod common;

use common::{block, document, filled_rects, render, TestResult};
use folio::PipelineError;
use folio_traits::CanvasOp;
use folio_types::{Color, Rect, ResourceUri};
use serde_json::json;

#[test]
fn test_margin_and_padding_shape_the_background() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let content = document(vec![json!({
        "type": "div",
        "style": {
            "margin": "10pt 20pt", "padding": "5pt",
            "height": "30pt", "background-color": "#336699"
        }
    })]);
    let rendered = render(200.0, 100.0, content)?;
    let canvas = &rendered.pages[0].canvas;

    assert!(canvas.ops().contains(&CanvasOp::SetFillColor { color: Color::rgb(0x33, 0x66, 0x99) }));
    assert_eq!(filled_rects(canvas), vec![Rect::new(20.0, 50.0, 160.0, 40.0)]);
    Ok(())
}

#[test]
fn test_solid_border_fills_each_edge() -> TestResult {
    let content = document(vec![json!({
        "type": "div",
        "style": { "height": "20pt", "border": "2pt solid #ff0000" }
    })]);
    let rendered = render(200.0, 100.0, content)?;
    let canvas = &rendered.pages[0].canvas;

    assert!(canvas.ops().contains(&CanvasOp::SetFillColor { color: Color::rgb(255, 0, 0) }));
    assert_eq!(canvas.count(|op| matches!(op, CanvasOp::ClosePath)), 4);
    assert_eq!(canvas.count(|op| matches!(op, CanvasOp::Stroke)), 0);
    Ok(())
}

#[test]
fn test_dashed_border_is_stroked() -> TestResult {
    let content = document(vec![json!({
        "type": "div",
        "style": { "height": "20pt", "border": "2pt dashed #ff0000" }
    })]);
    let rendered = render(200.0, 100.0, content)?;
    let canvas = &rendered.pages[0].canvas;

    assert!(canvas.ops().contains(&CanvasOp::SetStrokeColor { color: Color::rgb(255, 0, 0) }));
    assert!(canvas.ops().contains(&CanvasOp::SetLineWidth { width: 2.0 }));
    assert_eq!(canvas.count(|op| matches!(op, CanvasOp::Stroke)), 4);
    Ok(())
}

#[test]
fn test_opacity_wraps_the_element() -> TestResult {
    let content = document(vec![json!({
        "type": "div",
        "style": { "height": "20pt", "opacity": 0.5, "background-color": "#000" }
    })]);
    let rendered = render(200.0, 100.0, content)?;
    let ops = rendered.pages[0].canvas.ops();

    let opacity = ops
        .iter()
        .position(|op| *op == CanvasOp::SetOpacity { fill: 0.5, stroke: 0.5 })
        .ok_or("opacity not set")?;
    assert_eq!(ops[opacity - 1], CanvasOp::SaveState);
    assert_eq!(ops.last(), Some(&CanvasOp::RestoreState));
    Ok(())
}

#[test]
fn test_image_is_drawn_in_its_content_box() -> TestResult {
    let content = document(vec![json!({
        "type": "image", "src": "logo.png", "width": 40, "height": 20,
        "style": { "margin-left": "10pt" }
    })]);
    let rendered = render(200.0, 100.0, content)?;

    assert!(rendered.pages[0].canvas.ops().contains(&CanvasOp::AddImage {
        source: ResourceUri::new("logo.png"),
        rect: Rect::new(10.0, 80.0, 40.0, 20.0),
    }));
    Ok(())
}

#[test]
fn test_relative_offset_shifts_painting_only() -> TestResult {
    let content = document(vec![
        json!({
            "type": "div",
            "style": {
                "position": "relative", "left": "15pt", "top": "5pt",
                "height": "20pt", "background-color": "#000"
            }
        }),
        json!({ "type": "div", "style": { "height": "10pt", "background-color": "#fff" } }),
    ]);
    let rendered = render(200.0, 100.0, content)?;

    assert_eq!(
        filled_rects(&rendered.pages[0].canvas),
        vec![Rect::new(15.0, 75.0, 200.0, 20.0), Rect::new(0.0, 70.0, 200.0, 10.0)]
    );
    Ok(())
}

#[test]
fn test_table_cells_share_row_height() -> TestResult {
    let cell = |content_height: &str, color: &str| {
        json!({
            "type": "cell",
            "style": { "background-color": color },
            "children": [
                { "type": "div", "style": { "height": content_height, "background-color": "#00f" } }
            ]
        })
    };
    let content = document(vec![json!({
        "type": "table",
        "columns": 2,
        "style": { "width": "100pt" },
        "children": [ cell("10pt", "#f00"), cell("30pt", "#0f0") ]
    })]);
    let rendered = render(200.0, 100.0, content)?;
    let canvas = &rendered.pages[0].canvas;
    let rects = filled_rects(canvas);

    // Cells default to 2pt padding inside a 0.5pt border: the row is the
    // taller content plus 5pt.
    assert!(rects.contains(&Rect::new(0.0, 65.0, 50.0, 35.0)), "{:?}", rects);
    assert!(rects.contains(&Rect::new(50.0, 65.0, 50.0, 35.0)), "{:?}", rects);
    assert!(rects.contains(&Rect::new(2.5, 87.5, 45.0, 10.0)), "{:?}", rects);
    assert!(rects.contains(&Rect::new(52.5, 67.5, 45.0, 30.0)), "{:?}", rects);
    assert_eq!(rects.len(), 4);
    assert_eq!(canvas.count(|op| matches!(op, CanvasOp::ClosePath)), 8);
    Ok(())
}

#[test]
fn test_cell_defaults_can_be_overridden() -> TestResult {
    let content = document(vec![json!({
        "type": "table",
        "columns": 1,
        "style": { "width": "100pt" },
        "children": [{
            "type": "cell",
            "style": { "padding": "0pt", "border": "none", "background-color": "#f00" },
            "children": [ { "type": "div", "style": { "height": "30pt" } } ]
        }]
    })]);
    let rendered = render(200.0, 100.0, content)?;
    let canvas = &rendered.pages[0].canvas;

    assert_eq!(filled_rects(canvas), vec![Rect::new(0.0, 70.0, 100.0, 30.0)]);
    assert_eq!(canvas.count(|op| matches!(op, CanvasOp::ClosePath)), 0);
    Ok(())
}

#[test]
fn test_invalid_style_value_names_the_property() {
    let content = document(vec![json!({ "type": "div", "style": { "border": "thick" } })]);
    let err = render(200.0, 100.0, content).unwrap_err();

    assert!(matches!(err, PipelineError::Style { ref key, .. } if key == "border"));
    assert!(err.to_string().contains("border"));
}

#[test]
fn test_malformed_content_is_a_json_error() {
    let err = render(200.0, 100.0, json!({ "type": "section" })).unwrap_err();
    assert!(matches!(err, PipelineError::Json(_)));
}

fn floated(side: &str, width: f32, height: f32, color: &str) -> serde_json::Value {
    json!({
        "type": "div",
        "style": {
            "float": side,
            "width": format!("{width}pt"),
            "height": format!("{height}pt"),
            "background-color": color
        }
    })
}

#[test]
fn test_floats_share_a_band_above_the_flow() -> TestResult {
    let content = document(vec![
        floated("left", 40.0, 20.0, "#f00"),
        floated("left", 40.0, 30.0, "#0f0"),
        floated("right", 50.0, 10.0, "#00f"),
        block(10.0, "#000"),
    ]);
    let rendered = render(200.0, 100.0, content)?;

    // Floats may paint after the flow; compare as a set.
    let rects = filled_rects(&rendered.pages[0].canvas);
    assert_eq!(rects.len(), 4, "{:?}", rects);
    for expected in [
        Rect::new(0.0, 80.0, 40.0, 20.0),
        Rect::new(40.0, 70.0, 40.0, 30.0),
        Rect::new(150.0, 90.0, 50.0, 10.0),
        Rect::new(0.0, 60.0, 200.0, 10.0),
    ] {
        assert!(rects.contains(&expected), "missing {:?} in {:?}", expected, rects);
    }
    Ok(())
}

#[test]
fn test_float_wider_than_the_band_starts_a_new_one() -> TestResult {
    let content = document(vec![json!({
        "type": "div",
        "children": [
            floated("left", 120.0, 20.0, "#f00"),
            floated("left", 120.0, 20.0, "#0f0"),
        ]
    })]);
    let rendered = render(200.0, 100.0, content)?;

    assert_eq!(
        filled_rects(&rendered.pages[0].canvas),
        vec![Rect::new(0.0, 80.0, 120.0, 20.0), Rect::new(0.0, 60.0, 120.0, 20.0)]
    );
    Ok(())
}
