//! Line breaking micro-benchmarks
//!
//! Measures the raw line breaker over long glyph runs and a full paragraph
//! render through the pipeline.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use folio::{LayoutConfig, Pipeline};
use folio_layout::text::{BreakStatus, GlyphLine, LineBreakRequest, LineMetrics, break_line};
use folio_style::{Edges, FontStyle, FontWeight, PageSize};
use folio_traits::{DictionaryHyphenator, FontMetrics, FontProgram, Glyph};
use serde_json::json;
use std::hint::black_box;
use std::sync::Arc;

#[derive(Debug)]
struct MonospaceFont;

impl FontProgram for MonospaceFont {
    fn postscript_name(&self) -> &str {
        "Mono"
    }

    fn metrics(&self) -> FontMetrics {
        FontMetrics {
            typo_ascender: 800.0,
            typo_descender: -200.0,
            win_ascender: 0.0,
            win_descender: 0.0,
            underline_position: -100.0,
            underline_thickness: 50.0,
        }
    }

    fn shape(&self, text: &str) -> Vec<Glyph> {
        text.chars().map(|c| Glyph::new(c as u16, 500.0, Some(c))).collect()
    }

    fn glyph(&self, ch: char) -> Option<Glyph> {
        Some(Glyph::new(ch as u16, 500.0, Some(ch)))
    }
}

fn sample_text(words: usize) -> String {
    const WORDS: [&str; 8] = [
        "layout", "hyphenation", "paragraph", "a", "glyph", "of", "pagination", "box",
    ];
    (0..words)
        .map(|i| WORDS[i % WORDS.len()])
        .collect::<Vec<_>>()
        .join(" ")
}

/// Breaks the whole run into lines of `width`, returning the line count.
fn break_all(line: &GlyphLine, width: f32, hyphenator: Option<&DictionaryHyphenator>) -> usize {
    let metrics = LineMetrics::for_font(&MonospaceFont.metrics(), 10.0, 0.0);
    let mut rest = line.clone();
    let mut lines = 0;
    loop {
        let result = break_line(&LineBreakRequest {
            line: &rest,
            font_size: 10.0,
            metrics,
            available_width: width,
            available_height: f32::INFINITY,
            style_allowance: 0.0,
            hyphenator: hyphenator.map(|h| h as &dyn folio_traits::Hyphenator),
            hyphen: MonospaceFont.glyph('-'),
            check_height: false,
            line_has_content: false,
        });
        lines += 1;
        match (result.status, result.overflow_start) {
            (BreakStatus::Full, _) | (_, None) => return lines,
            (_, Some(start)) if start >= rest.end => return lines,
            (_, Some(start)) => rest = rest.window(start, rest.end),
        }
    }
}

fn benchmark_break_line(c: &mut Criterion) {
    let mut group = c.benchmark_group("break_line");
    let hyphenator = DictionaryHyphenator::new().with_words(["hy-phen-ation", "pag-i-na-tion"]);

    for words in [50, 500, 5000] {
        let line = GlyphLine::from_text(&sample_text(words), 500.0);
        group.bench_with_input(BenchmarkId::new("plain", words), &line, |b, line| {
            b.iter(|| break_all(black_box(line), 200.0, None));
        });
        group.bench_with_input(BenchmarkId::new("hyphenated", words), &line, |b, line| {
            b.iter(|| break_all(black_box(line), 200.0, Some(&hyphenator)));
        });
    }

    group.finish();
}

fn benchmark_paragraph_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("paragraph_render");
    let config = LayoutConfig {
        page_size: PageSize::A4,
        margins: Edges::all(36.0),
        default_font_family: "Mono".to_string(),
        default_font_size: 10.0,
        ..LayoutConfig::default()
    };
    let pipeline = Pipeline::builder()
        .with_config(config)
        .with_font("Mono", FontWeight::Regular, FontStyle::Normal, Arc::new(MonospaceFont))
        .expect("Failed to register font")
        .build();

    for paragraphs in [1, 20, 200] {
        let children: Vec<_> = (0..paragraphs)
            .map(|_| {
                json!({
                    "type": "paragraph",
                    "style": { "text-align": "justify" },
                    "children": [ { "type": "text", "text": sample_text(120) } ]
                })
            })
            .collect();
        let content = json!({ "type": "document", "children": children });

        group.bench_with_input(BenchmarkId::new("paragraphs", paragraphs), &content, |b, content| {
            b.iter(|| {
                pipeline
                    .render_value(content.clone())
                    .expect("Failed to render document")
            });
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_break_line, benchmark_paragraph_render);
criterion_main!(benches);
