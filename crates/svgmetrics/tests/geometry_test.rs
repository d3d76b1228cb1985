use svgmetrics::{Dimensions, Measurer, SizeSource};
use svgmetrics_core::{Diagnostic, Document, Rect};
use svgmetrics_markup::{LoadOptions, load_str};

fn svg(body: &str) -> Document {
    let text = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink">{body}</svg>"#
    );
    load_str(&text, &LoadOptions::default()).expect("load ok")
}

fn assert_rect(actual: Option<Rect>, expected: (f64, f64, f64, f64)) {
    let Some(r) = actual else {
        panic!("expected {expected:?}, got no extent");
    };
    let got = (r.x, r.y, r.width, r.height);
    let close = |a: f64, b: f64| (a - b).abs() < 1e-6;
    assert!(
        close(got.0, expected.0)
            && close(got.1, expected.1)
            && close(got.2, expected.2)
            && close(got.3, expected.3),
        "expected {expected:?}, got {got:?}"
    );
}

#[test]
fn use_translates_the_referenced_element() {
    let doc = svg(r##"<defs><rect id="r" width="10" height="20"/></defs>
                      <use id="u" href="#r" x="5" y="7"/>"##);
    let m = Measurer::new(&doc);
    let g = m.geometry(Some("u")).unwrap();
    assert_rect(g.ink, (5.0, 7.0, 10.0, 20.0));

    // The definition itself is never drawn.
    let whole = m.geometry(None).unwrap();
    assert_rect(whole.logical, (5.0, 7.0, 10.0, 20.0));
    assert_eq!(m.document_size().unwrap().source, SizeSource::ContentLogical);
}

#[test]
fn use_of_a_symbol_establishes_a_viewport() {
    let doc = svg(r##"<symbol id="s" viewBox="0 0 10 10"><circle cx="5" cy="5" r="5"/></symbol>
                      <use id="u" xlink:href="#s" x="10" y="10" width="20" height="20"/>"##);
    let g = Measurer::new(&doc).geometry(Some("#u")).unwrap();
    assert_rect(g.ink, (10.0, 10.0, 20.0, 20.0));
    assert_rect(g.logical, (10.0, 10.0, 20.0, 20.0));
}

#[test]
fn self_referencing_use_terminates_with_a_diagnostic() {
    let doc = svg(r##"<g id="a"><use href="#a"/><rect width="5" height="5"/></g>"##);
    let g = Measurer::new(&doc).geometry(Some("a")).unwrap();
    assert_rect(g.ink, (0.0, 0.0, 5.0, 5.0));
    assert!(g.diagnostics.contains(&Diagnostic::CyclicReference {
        id: "a".to_string()
    }));
}

#[test]
fn mutually_referencing_uses_terminate() {
    let doc = svg(r##"<defs>
                        <g id="p"><use href="#q"/><rect width="1" height="1"/></g>
                        <g id="q"><use href="#p"/><rect x="2" width="1" height="1"/></g>
                      </defs>
                      <use id="start" href="#p"/>"##);
    let g = Measurer::new(&doc).geometry(Some("start")).unwrap();
    assert_rect(g.ink, (0.0, 0.0, 3.0, 1.0));
    assert_eq!(
        g.diagnostics
            .iter()
            .filter(|d| matches!(d, Diagnostic::CyclicReference { .. }))
            .count(),
        1
    );
}

#[test]
fn dangling_use_has_no_extent() {
    let doc = svg(r##"<use id="u" href="#missing"/><rect width="4" height="4"/>"##);
    let m = Measurer::new(&doc);
    let g = m.geometry(Some("u")).unwrap();
    assert_eq!(g.ink, None);
    assert_eq!(g.logical, None);
    assert_eq!(
        g.diagnostics,
        vec![Diagnostic::DanglingReference {
            from: "use#u".to_string(),
            target: "missing".to_string(),
        }]
    );
    assert_eq!(m.element_dimensions("u").unwrap(), Dimensions::default());
    assert_eq!(m.document_dimensions().unwrap(), Dimensions { width: 4, height: 4 });
}

#[test]
fn unpainted_shapes_keep_only_the_logical_box() {
    let doc = svg(r#"<rect id="r" x="1" y="2" width="3" height="4" fill="none"/>
                     <rect id="h" width="3" height="4" visibility="hidden"/>"#);
    let m = Measurer::new(&doc);
    for id in ["r", "h"] {
        let g = m.geometry(Some(id)).unwrap();
        assert_eq!(g.ink, None, "{id}");
        assert!(g.logical.is_some(), "{id}");
    }
    assert_eq!(m.element_dimensions("r").unwrap(), Dimensions::default());
}

#[test]
fn display_none_removes_the_subtree() {
    let doc = svg(r#"<g id="g" display="none"><rect id="r" width="3" height="4"/></g>
                     <rect width="1" height="1"/>"#);
    let m = Measurer::new(&doc);
    let whole = m.geometry(None).unwrap();
    assert_rect(whole.ink, (0.0, 0.0, 1.0, 1.0));
    assert_eq!(m.geometry(Some("g")).unwrap().ink, None);
}

#[test]
fn stroke_extends_the_ink_box() {
    let doc = svg(r#"<line id="l" x1="10" y1="10" x2="50" y2="10" stroke="black" stroke-width="4"
                           stroke-linecap="square"/>"#);
    let g = Measurer::new(&doc).geometry(Some("l")).unwrap();
    assert_rect(g.ink, (8.0, 8.0, 44.0, 4.0));
    assert_rect(g.logical, (10.0, 10.0, 40.0, 0.0));
}

#[test]
fn markers_add_to_the_ink() {
    let doc = svg(r##"<marker id="m" markerWidth="4" markerHeight="4" refX="2" refY="2">
                        <rect width="4" height="4"/>
                      </marker>
                      <path id="p" d="M10 10 L50 10" stroke="black" stroke-width="2"
                            marker-end="url(#m)"/>"##);
    let g = Measurer::new(&doc).geometry(Some("p")).unwrap();
    assert_rect(g.ink, (10.0, 6.0, 44.0, 8.0));
    assert_rect(g.logical, (10.0, 10.0, 40.0, 0.0));
}

#[test]
fn missing_marker_is_reported() {
    let doc = svg(r##"<path id="p" d="M0 0 L10 0" stroke="black" marker-start="url(#gone)"/>"##);
    let g = Measurer::new(&doc).geometry(Some("p")).unwrap();
    assert_rect(g.ink, (0.0, -0.5, 10.0, 1.0));
    assert_eq!(
        g.diagnostics,
        vec![Diagnostic::DanglingReference {
            from: "path#p".to_string(),
            target: "gone".to_string(),
        }]
    );
}

#[test]
fn filter_region_replaces_the_ink() {
    let doc = svg(r##"<filter id="f"/>
                      <filter id="abs" filterUnits="userSpaceOnUse" x="0" y="0" width="50" height="50"/>
                      <rect id="r" x="10" y="10" width="100" height="50" filter="url(#f)"/>
                      <rect id="s" x="10" y="10" width="10" height="10" filter="url(#abs)"/>"##);
    let m = Measurer::new(&doc);
    let g = m.geometry(Some("r")).unwrap();
    assert_rect(g.ink, (0.0, 5.0, 120.0, 60.0));
    assert_rect(g.logical, (10.0, 10.0, 100.0, 50.0));

    let g = m.geometry(Some("s")).unwrap();
    assert_rect(g.ink, (0.0, 0.0, 50.0, 50.0));
}

#[test]
fn nested_svg_maps_its_view_box() {
    let doc = svg(r#"<svg x="10" y="10" width="100" height="50" viewBox="0 0 10 10">
                       <rect id="inner" width="10" height="10"/>
                     </svg>"#);
    let g = Measurer::new(&doc).geometry(Some("inner")).unwrap();
    // Meet scales by 5 and centers horizontally.
    assert_rect(g.ink, (35.0, 10.0, 50.0, 50.0));
}

#[test]
fn root_view_box_scales_element_geometry() {
    let text = r#"<svg xmlns="http://www.w3.org/2000/svg" width="200" height="100" viewBox="0 0 20 10">
                    <g transform="rotate(90 5 5)"><rect id="r" width="2" height="1"/></g>
                  </svg>"#;
    let doc = load_str(text, &LoadOptions::default()).unwrap();
    let g = Measurer::new(&doc).geometry(Some("r")).unwrap();
    // rotate(90 5 5) maps (0,0)-(2,1) to (9,0)-(10,2); the view box scales by 10.
    assert_rect(g.ink, (90.0, 0.0, 10.0, 20.0));
}

#[test]
fn text_anchor_shifts_the_box() {
    let doc = svg(r#"<text id="t" x="50" y="20" font-size="10" text-anchor="middle">abcd</text>
                     <text id="s" x="0" y="10" font-size="10" stroke="red" stroke-width="2">ab</text>"#);
    let m = Measurer::new(&doc);
    let g = m.geometry(Some("t")).unwrap();
    assert_rect(g.logical, (38.0, 12.0, 24.0, 10.0));
    assert_eq!(g.ink, g.logical);

    let g = m.geometry(Some("s")).unwrap();
    assert_rect(g.logical, (0.0, 2.0, 12.0, 10.0));
    assert_rect(g.ink, (-1.0, 1.0, 14.0, 12.0));
}

#[test]
fn empty_document_is_zero_sized() {
    let doc = svg("");
    let m = Measurer::new(&doc);
    assert_eq!(m.document_dimensions().unwrap(), Dimensions::default());
    let g = m.geometry(None).unwrap();
    assert_eq!((g.ink, g.logical), (None, None));
}
