//! Benchmarks comparing MarkTree grammars vs pulldown-cmark (Markdown)
//!
//! Run with: cargo bench -p marktree-core

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use marktree_core::code::{code_rules, CodeRules};
use marktree_core::markdown::{markdown_rules, simple_markdown_rules};
use marktree_core::Parser;
use pulldown_cmark::{Options, Parser as MdParser};

const MARKDOWN_SAMPLE: &str = r#"Benchmark Document
==================

# Introduction

This is a paragraph with *emphasis*, **strong text**, __underline__ and `inline code`.
It demonstrates the basic capabilities of the format.

## Lists

* First item with some content
* Second item with **more** content
* Third item concluding the list

Section Header
--------------

Some ~~removed~~ text with escaped \*asterisks\* and _underscored_ words.

```rust
fn fibonacci(n: u64) -> u64 {
    match n {
        0 => 0,
        1 => 1,
        _ => fibonacci(n - 1) + fibonacci(n - 2),
    }
}
```

End of document.
"#;

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    group.throughput(Throughput::Bytes(MARKDOWN_SAMPLE.len() as u64));

    let markdown = Parser::<()>::with_rules(markdown_rules().unwrap());
    group.bench_function("marktree_markdown", |b| {
        b.iter(|| {
            let forest = markdown.parse(black_box(MARKDOWN_SAMPLE), ());
            black_box(forest.len())
        })
    });

    let languages = CodeRules::with_default_languages().unwrap();
    let code = Parser::<()>::with_rules(code_rules(&languages).unwrap());
    group.bench_function("marktree_code", |b| {
        b.iter(|| {
            let forest = code.parse(black_box(MARKDOWN_SAMPLE), ());
            black_box(forest.len())
        })
    });

    group.bench_function("markdown_pulldown", |b| {
        b.iter(|| {
            let parser = MdParser::new_ext(black_box(MARKDOWN_SAMPLE), Options::all());
            let events: Vec<_> = parser.collect();
            black_box(events.len())
        })
    });

    group.finish();
}

fn bench_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("scaling");
    let markdown = Parser::<()>::with_rules(markdown_rules().unwrap());

    for size in [1, 5, 10, 20].iter() {
        let content: String = MARKDOWN_SAMPLE.repeat(*size);
        group.throughput(Throughput::Bytes(content.len() as u64));

        group.bench_with_input(BenchmarkId::new("marktree", size), &content, |b, content| {
            b.iter(|| {
                let forest = markdown.parse(black_box(content), ());
                black_box(forest.len())
            })
        });

        group.bench_with_input(BenchmarkId::new("markdown", size), &content, |b, content| {
            b.iter(|| {
                let parser = MdParser::new_ext(black_box(content), Options::all());
                let events: Vec<_> = parser.collect();
                black_box(events.len())
            })
        });
    }

    group.finish();
}

fn bench_inline_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("inline");

    let inline = "This has *emphasis*, **strong**, __underline__, and ~~strike~~.";

    let with_text = Parser::<()>::with_rules(simple_markdown_rules(true).unwrap());
    group.bench_function("marktree_text_rule", |b| {
        b.iter(|| {
            let forest = with_text.parse(black_box(inline), ());
            black_box(forest.len())
        })
    });

    let fallback = Parser::<()>::with_rules(simple_markdown_rules(false).unwrap());
    group.bench_function("marktree_fallback", |b| {
        b.iter(|| {
            let forest = fallback.parse(black_box(inline), ());
            black_box(forest.len())
        })
    });

    group.bench_function("markdown_inline", |b| {
        b.iter(|| {
            let parser = MdParser::new_ext(black_box(inline), Options::all());
            let events: Vec<_> = parser.collect();
            black_box(events.len())
        })
    });

    group.finish();
}

criterion_group!(benches, bench_parse, bench_scaling, bench_inline_parsing);
criterion_main!(benches);
