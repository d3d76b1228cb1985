use std::sync::Arc;
use svgmetrics_core::{Diagnostic, Document, Length, NodeKind, Paint, TextMetrics};
use svgmetrics_markup::{LoadError, LoadOptions, TextMeasurer, TextStyle, load_str};

fn load(text: &str) -> Document {
    load_str(text, &LoadOptions::default()).unwrap()
}

fn style_of<'d>(doc: &'d Document, id: &str) -> &'d svgmetrics_core::Style {
    &doc.node(doc.find(id).unwrap()).unwrap().style
}

#[test]
fn broken_xml_is_an_error() {
    let err = load_str("<svg", &LoadOptions::default()).unwrap_err();
    assert!(matches!(err, LoadError::Xml(_)));
}

#[test]
fn root_must_be_svg_in_the_svg_namespace() {
    let err = load_str("<svg/>", &LoadOptions::default()).unwrap_err();
    assert!(matches!(err, LoadError::NotSvg { .. }));

    let err = load_str(
        r#"<html xmlns="http://www.w3.org/2000/svg"/>"#,
        &LoadOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, LoadError::NotSvg { found } if found == "html"));
}

#[test]
fn doctype_is_accepted() {
    let doc = load(
        r#"<?xml version="1.0"?>
<!DOCTYPE svg PUBLIC "-//W3C//DTD SVG 1.1//EN" "http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd">
<svg xmlns="http://www.w3.org/2000/svg" width="16" height="16"/>"#,
    );
    assert_eq!(doc.len(), 1);
}

#[test]
fn properties_inherit_down_the_tree() {
    let doc = load(
        r#"<svg xmlns="http://www.w3.org/2000/svg">
             <g stroke="black" style="stroke-width: 4; font-size: 20px" filter="url(#f)">
               <rect id="r" width="10" height="10" fill="none"/>
               <g font-size="50%"><circle id="c" r="1"/></g>
             </g>
           </svg>"#,
    );
    let r = style_of(&doc, "r");
    assert_eq!(r.fill, Paint::None);
    assert_eq!(r.stroke, Paint::Solid);
    assert_eq!(r.stroke_width, Length::px(4.0));
    assert_eq!(r.font_size, Some(20.0));
    assert_eq!(r.filter, None);

    let c = style_of(&doc, "c");
    assert_eq!(c.fill, Paint::Solid);
    assert_eq!(c.font_size, Some(10.0));
}

#[test]
fn root_font_size_defaults_to_medium() {
    let doc = load(r#"<svg xmlns="http://www.w3.org/2000/svg"><rect id="r"/></svg>"#);
    assert_eq!(style_of(&doc, "r").font_size, Some(16.0));
}

#[test]
fn duplicate_ids_are_reported_and_first_wins() {
    let doc = load(
        r#"<svg xmlns="http://www.w3.org/2000/svg">
             <rect id="dup" width="1" height="1"/>
             <circle id="dup" r="1"/>
           </svg>"#,
    );
    let first = doc.find("dup").unwrap();
    assert!(matches!(doc.node(first).unwrap().kind, NodeKind::Shape(_)));
    assert_eq!(doc.node(first).unwrap().kind.tag_name(), "rect");
    assert_eq!(
        doc.diagnostics(),
        &[Diagnostic::DuplicateId {
            id: "dup".to_string()
        }]
    );
}

struct FixedMeasurer;

impl TextMeasurer for FixedMeasurer {
    fn measure(&self, _text: &str, style: &TextStyle) -> TextMetrics {
        TextMetrics {
            advance: 100.0,
            ascent: style.font_size,
            descent: 0.0,
        }
    }
}

#[test]
fn custom_text_measurer_is_used() {
    let options = LoadOptions::default().with_text_measurer(Arc::new(FixedMeasurer));
    let doc = load_str(
        r#"<svg xmlns="http://www.w3.org/2000/svg"><text id="t" font-size="7">x</text></svg>"#,
        &options,
    )
    .unwrap();
    let NodeKind::Text(text) = &doc.node(doc.find("t").unwrap()).unwrap().kind else {
        panic!("not text");
    };
    assert_eq!(
        text.metrics,
        TextMetrics {
            advance: 100.0,
            ascent: 7.0,
            descent: 0.0,
        }
    );
}

/// `depth` elements nested inside one another, the root `svg` and the innermost `rect` included.
fn nested(depth: usize) -> String {
    let groups = depth - 2;
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg">{}<rect id="leaf" width="1" height="1"/>{}</svg>"#,
        "<g>".repeat(groups),
        "</g>".repeat(groups)
    )
}

#[test]
fn nesting_up_to_the_limit_loads() {
    let doc = load(&nested(svgmetrics_markup::MAX_DEPTH));
    let leaf = doc.find("leaf").unwrap();
    assert_eq!(doc.path_from_root(leaf).unwrap().len(), svgmetrics_markup::MAX_DEPTH);
}

#[test]
fn deeper_nesting_is_an_error() {
    for depth in [svgmetrics_markup::MAX_DEPTH + 1, 1000] {
        let err = load_str(&nested(depth), &LoadOptions::default()).unwrap_err();
        assert!(
            matches!(err, LoadError::TooDeep { limit } if limit == svgmetrics_markup::MAX_DEPTH),
            "{depth}: {err}"
        );
    }
}

#[test]
fn letter_spacing_widens_text() {
    let doc = load(
        r#"<svg xmlns="http://www.w3.org/2000/svg" font-size="10">
             <text id="plain">abc</text>
             <g style="letter-spacing: 0.2em"><text id="spaced">abc</text></g>
           </svg>"#,
    );
    let advance = |id: &str| match &doc.node(doc.find(id).unwrap()).unwrap().kind {
        NodeKind::Text(text) => text.metrics.advance,
        other => panic!("expected text, got {other:?}"),
    };
    assert_eq!(advance("plain"), 18.0);
    assert_eq!(advance("spaced"), 24.0);
}
