use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::fmt::Write as _;
use std::hint::black_box;
use std::time::Duration;
use svgmetrics::Measurer;
use svgmetrics_core::Document;
use svgmetrics_markup::{LoadOptions, load_str};

/// A grid of `use` instances of a stroked, marked path, nested `depth` levels deep.
fn build_scene(columns: usize, rows: usize, depth: usize) -> Document {
    let mut svg = String::from(
        r##"<svg xmlns="http://www.w3.org/2000/svg">
<defs>
  <marker id="arrow" markerWidth="6" markerHeight="6" refX="3" refY="3" orient="auto">
    <path d="M0 0 L6 3 L0 6 Z"/>
  </marker>
  <g id="level0">
    <path d="M0 0 C 10 -10, 20 10, 30 0" fill="none" stroke="black" stroke-width="2"
          marker-end="url(#arrow)"/>
    <rect x="-2" y="-2" width="4" height="4" rx="1"/>
  </g>
"##,
    );
    for level in 1..=depth {
        let _ = writeln!(
            svg,
            r##"  <g id="level{level}"><use href="#level{prev}"/><use href="#level{prev}" x="40" transform="rotate(15)"/></g>"##,
            prev = level - 1
        );
    }
    svg.push_str("</defs>\n");
    for row in 0..rows {
        for col in 0..columns {
            let _ = writeln!(
                svg,
                r##"<use id="cell_{row}_{col}" href="#level{depth}" x="{x}" y="{y}"/>"##,
                x = col * 120,
                y = row * 80
            );
        }
    }
    svg.push_str("</svg>\n");
    load_str(&svg, &LoadOptions::default()).expect("scene loads")
}

fn bench_geometry(c: &mut Criterion) {
    let mut group = c.benchmark_group("geometry");
    group.measurement_time(Duration::from_secs(10));

    let cases = [
        ("grid_10x10_d2", 10usize, 10usize, 2usize),
        ("grid_20x20_d3", 20usize, 20usize, 3usize),
        ("grid_10x10_d6", 10usize, 10usize, 6usize),
    ];

    for (name, columns, rows, depth) in cases {
        let doc = build_scene(columns, rows, depth);
        group.bench_with_input(BenchmarkId::new("document", name), &doc, |b, doc| {
            b.iter(|| {
                let m = Measurer::new(black_box(doc));
                black_box(m.geometry(None).expect("geometry"));
            })
        });
        group.bench_with_input(BenchmarkId::new("element", name), &doc, |b, doc| {
            b.iter(|| {
                let m = Measurer::new(black_box(doc));
                black_box(m.geometry(Some("cell_0_0")).expect("geometry"));
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_geometry);
criterion_main!(benches);
