mod common;

use common::{block, document, render, TestResult};
use folio_traits::Annotation;
use folio_types::{AnchorId, Rect};
use serde_json::json;

#[test]
fn test_destination_records_page_and_top_edge() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let content = document(vec![
        block(80.0, "#000"),
        json!({ "type": "div", "style": { "height": "10pt", "id": "section-1" } }),
        json!({ "type": "div", "style": { "height": "30pt", "id": "section-2" } }),
    ]);
    let rendered = render(200.0, 100.0, content)?;

    let destinations = &rendered.document.destinations;
    assert_eq!(destinations.get(&AnchorId::new("section-1")), Some(&(1, 20.0)));
    assert_eq!(destinations.get(&AnchorId::new("section-2")), Some(&(2, 100.0)));
    Ok(())
}

#[test]
fn test_internal_link_covers_border_box() -> TestResult {
    let content = document(vec![json!({
        "type": "div",
        "style": { "height": "20pt", "width": "50pt", "margin": "5pt", "link": "section-1" }
    })]);
    let rendered = render(200.0, 100.0, content)?;

    let annotations: Vec<_> = rendered.document.annotations_on(1).collect();
    assert_eq!(
        annotations,
        vec![&Annotation::Link {
            rect: Rect::new(5.0, 75.0, 50.0, 20.0),
            target: AnchorId::new("section-1"),
        }]
    );
    Ok(())
}

#[test]
fn test_external_action_is_annotated() -> TestResult {
    let content = document(vec![
        block(90.0, "#000"),
        json!({ "type": "div", "style": { "height": "20pt", "href": "https://example.com" } }),
    ]);
    let rendered = render(200.0, 100.0, content)?;

    assert_eq!(rendered.document.annotations_on(1).count(), 0);
    let on_second: Vec<_> = rendered.document.annotations_on(2).collect();
    assert!(matches!(
        on_second.as_slice(),
        [Annotation::Action { uri, .. }] if uri == "https://example.com"
    ));
    Ok(())
}
