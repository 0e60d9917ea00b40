use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use ecss_lexer::{ScanAction, TokenStream, TokenType, tokenize};

/// Generate stylesheet content of various sizes
fn generate_css_content(size_category: &str) -> String {
    match size_category {
        "small" => {
            // ~1KB of typical rules
            let mut content = String::new();
            for i in 0..10 {
                content.push_str(&format!(
                    ".item-{i} > a:hover {{ color: #33{i}; margin: {i}px 2%; background: url(img-{i}.png); }}\n"
                ));
            }
            content
        }
        "medium" => {
            // ~10KB with media queries and comments
            let mut content = String::new();
            for i in 0..60 {
                let min_width = 300 + i;
                let font_size = 1 + i % 3;
                content.push_str(&format!(
                    "/* block {i} */\n\
                     @media (min-width: {min_width}px) {{\n  \
                     #section-{i} .col[data-x=\"{i}\"] {{\n    \
                     width: calc(100% - {i}px);\n    \
                     font: {font_size}em/1.5 sans-serif;\n  }}\n}}\n"
                ));
            }
            content
        }
        "selectors" => {
            // extended selector lists, the dialect-heavy shape
            let mut content = String::new();
            for i in 0..100 {
                content.push_str(&format!(
                    "div.ad-{i}:contains(sponsored ({i})), p:xpath(//div[@id='x{i}']) {{ display: none }}\n"
                ));
            }
            content
        }
        _ => String::new(),
    }
}

fn bench_tokenize(c: &mut Criterion) {
    let mut group = c.benchmark_group("tokenize");

    for size in ["small", "medium", "selectors"] {
        let content = generate_css_content(size);
        group.throughput(Throughput::Bytes(content.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &content, |b, content| {
            b.iter(|| {
                let mut count = 0usize;
                tokenize(black_box(content), |_, _, _| count += 1);
                black_box(count)
            });
        });
    }

    group.finish();
}

fn bench_stream_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("token_stream_construction");

    for size in ["small", "medium"] {
        let content = generate_css_content(size);
        group.throughput(Throughput::Bytes(content.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &content, |b, content| {
            b.iter(|| black_box(TokenStream::new(black_box(content))).token_count());
        });
    }

    group.finish();
}

fn bench_stream_navigation(c: &mut Criterion) {
    let content = generate_css_content("medium");

    c.bench_function("token_stream_walk", |b| {
        b.iter(|| {
            let mut stream = TokenStream::new(black_box(&content));
            let mut significant = 0usize;
            while !stream.eof() {
                stream.skip_sc();
                if !stream.eof() {
                    significant += 1;
                    stream.next();
                }
            }
            black_box(significant)
        });
    });

    c.bench_function("token_stream_lookup_value", |b| {
        let stream = TokenStream::new(&content);
        b.iter(|| {
            let mut matches = 0usize;
            for offset in 0..stream.token_count() {
                if stream.lookup_type(offset) == TokenType::Ident
                    && stream.lookup_value(offset, "width")
                {
                    matches += 1;
                }
            }
            black_box(matches)
        });
    });

    c.bench_function("skip_until_balanced", |b| {
        let source = "f(a, (b, [c, {d: e}]), g) tail";
        b.iter(|| {
            let mut stream = TokenStream::new(black_box(source));
            stream.next();
            let start = stream.token_index();
            stream.skip_until_balanced(start, |_| ScanAction::Continue);
            black_box(stream.token_index())
        });
    });
}

criterion_group!(
    benches,
    bench_tokenize,
    bench_stream_construction,
    bench_stream_navigation
);
criterion_main!(benches);
