use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use doku_highlight::{HighlightConfig, LineStates, NoLanguages, Tokenizer, highlight_text};
use std::sync::Arc;

const PARAGRAPHS: &[&str] = &[
    "== Section {i} ==",
    "Line {i} has **bold**, //italic// and __underlined__ text with a [[ns:page{i}|link]].",
    "  * list item {i} with ''code'' and http://example.com/{i}",
    "^ head {i} ^ value ^",
    "| cell | **{i}** |",
    "<code java>",
    "int x{i} = {i};",
    "</code>",
    "{{media:img{i}.png?200x50|caption}}",
    "",
];

fn large_page(sections: usize) -> String {
    let mut out = String::with_capacity(sections * 256);
    for i in 0..sections {
        for line in PARAGRAPHS {
            out.push_str(&line.replace("{i}", &i.to_string()));
            out.push('\n');
        }
    }
    out.pop();
    out
}

fn tokenizer() -> Tokenizer {
    let config = HighlightConfig {
        extensions: ["struct", "adhoctags", "comment"]
            .into_iter()
            .map(String::from)
            .collect(),
        camelcase: true,
        ..HighlightConfig::default()
    };
    config.tokenizer(Arc::new(NoLanguages)).unwrap()
}

fn bench_build_graph(c: &mut Criterion) {
    c.bench_function("build_graph/default_with_plugins", |b| {
        b.iter(|| {
            let tokenizer = tokenizer();
            black_box(tokenizer.graph().ordered().len());
        })
    });
}

fn bench_highlight_document(c: &mut Criterion) {
    let tokenizer = tokenizer();
    let text = large_page(2_000);
    c.bench_function("highlight_text/20k_lines", |b| {
        b.iter(|| {
            let spans = highlight_text(&tokenizer, black_box(&text));
            black_box(spans.len());
        })
    });
}

fn bench_rehighlight_after_edit(c: &mut Criterion) {
    let tokenizer = tokenizer();
    let text = large_page(2_000);
    let lines: Vec<&str> = text.lines().collect();
    let edited = lines.len() / 2;

    c.bench_function("line_states/rehighlight_60_lines", |b| {
        b.iter_batched(
            || {
                let mut cache = LineStates::new(tokenizer.clone());
                cache.state_before(&lines, lines.len());
                cache
            },
            |mut cache| {
                cache.invalidate_from(edited);
                for line in edited..edited + 60 {
                    black_box(cache.highlight_line(&lines, line));
                }
            },
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(
    benches,
    bench_build_graph,
    bench_highlight_document,
    bench_rehighlight_after_edit
);
criterion_main!(benches);
