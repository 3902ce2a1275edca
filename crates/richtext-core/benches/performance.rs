use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use richtext_core::{FormatCommand, FormatKind, SpanEngine};

fn large_text(line_count: usize) -> String {
    let mut out = String::with_capacity(line_count * 64);
    for i in 0..line_count {
        out.push_str(&format!(
            "{i:06} the quick brown fox jumps over the lazy dog (richtext benchmark line)\n"
        ));
    }
    // Remove the final '\n' to avoid creating an extra trailing empty line.
    out.pop();
    out
}

fn bench_toggle_bold_words(c: &mut Criterion) {
    let text = large_text(2_000);
    c.bench_function("toggle_bold/1000_ranges", |b| {
        b.iter_batched(
            || SpanEngine::new(&text),
            |mut engine| {
                let len = engine.char_count();
                for i in 0..1_000 {
                    let start = (i * 97) % (len - 10);
                    engine.toggle(FormatKind::Bold, start, start + 10).unwrap();
                }
                black_box(engine.spans().count());
            },
            BatchSize::LargeInput,
        )
    });
}

fn bench_typing_in_bulleted_list(c: &mut Criterion) {
    let text = large_text(2_000);
    let mut base = SpanEngine::new(&text);
    let len = base.char_count();
    base.set(FormatKind::Bullet, 0, len).unwrap();
    let decoded = base.formatted_text().clone();

    c.bench_function("typing_bulleted/100_inserts", |b| {
        b.iter_batched(
            || SpanEngine::from_formatted(decoded.clone()).unwrap(),
            |mut engine| {
                let mut offset = engine.char_count() / 2;
                for _ in 0..100 {
                    engine
                        .execute(FormatCommand::Insert {
                            offset,
                            text: "x".to_string(),
                        })
                        .unwrap();
                    offset += 1;
                }
                black_box(engine.char_count());
            },
            BatchSize::LargeInput,
        )
    });
}

fn bench_has_queries(c: &mut Criterion) {
    let text = large_text(5_000);
    let mut engine = SpanEngine::new(&text);
    let len = engine.char_count();
    for start in (0..len - 20).step_by(40) {
        engine.set(FormatKind::Italic, start, start + 20).unwrap();
    }

    c.bench_function("has_italic/point_queries", |b| {
        b.iter(|| {
            let mut hits = 0usize;
            for p in (0..len - 1).step_by(13) {
                if engine.has(FormatKind::Italic, p, p + 1).unwrap() {
                    hits += 1;
                }
            }
            black_box(hits);
        })
    });
}

criterion_group!(
    benches,
    bench_toggle_bold_words,
    bench_typing_in_bulleted_list,
    bench_has_queries
);
criterion_main!(benches);
