//! Benchmarks for the markdown → DOCX pipeline and report splitting.
//!
//! Run with: cargo bench

use std::io::Cursor;
use std::path::Path;

use criterion::{Criterion, criterion_group, criterion_main};

use mdocx::{Document, Renderer, SectionMap, parse_blocks};
use mdocx::sections::PROFILES;

const SAMPLE_REPORT: &str = include_str!("../tests/fixtures/sample_report.md");

/// The sample report repeated to get a document of realistic length.
fn large_report() -> String {
    SAMPLE_REPORT.repeat(20)
}

// ============================================================================
// Parsing
// ============================================================================

fn bench_parse_blocks(c: &mut Criterion) {
    let source = large_report();
    c.bench_function("parse_blocks", |b| {
        b.iter(|| parse_blocks(&source));
    });
}

fn bench_extract_sections(c: &mut Criterion) {
    c.bench_function("extract_sections", |b| {
        b.iter(|| SectionMap::extract(SAMPLE_REPORT));
    });
}

// ============================================================================
// Rendering
// ============================================================================

fn bench_render(c: &mut Criterion) {
    let blocks = parse_blocks(&large_report());
    let renderer = Renderer::new();
    c.bench_function("render", |b| {
        b.iter(|| {
            let mut doc = Document::new();
            renderer.configure(&mut doc);
            renderer.render(&mut doc, blocks.iter().cloned(), Path::new("."))
        });
    });
}

fn bench_write_docx(c: &mut Criterion) {
    let blocks = parse_blocks(&large_report());
    let renderer = Renderer::new();
    let mut doc = Document::new();
    renderer.configure(&mut doc);
    renderer.render(&mut doc, blocks, Path::new("."));

    c.bench_function("write_docx", |b| {
        b.iter(|| {
            let mut buffer = Cursor::new(Vec::new());
            doc.write_to(&mut buffer).unwrap();
            buffer.into_inner()
        });
    });
}

// ============================================================================
// Recomposition
// ============================================================================

fn bench_render_profiles(c: &mut Criterion) {
    let map = SectionMap::extract(SAMPLE_REPORT);
    c.bench_function("render_profiles", |b| {
        b.iter(|| {
            PROFILES
                .iter()
                .map(|profile| profile.render(&map).unwrap())
                .collect::<Vec<_>>()
        });
    });
}

criterion_group!(parsing, bench_parse_blocks, bench_extract_sections);
criterion_group!(rendering, bench_render, bench_write_docx);
criterion_group!(recomposition, bench_render_profiles);
criterion_main!(parsing, rendering, recomposition);
