//! Paragraph spans: line snapping, atomic removal and normalization after edits.

use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use richtext_core::{FormatKind, Span, SpanEngine};

fn ranges(engine: &SpanEngine, kind: FormatKind) -> Vec<(usize, usize)> {
    engine.spans_of(kind).map(|s| (s.start, s.end)).collect()
}

fn line_ranges(text: &str) -> Vec<(usize, usize)> {
    let mut out = Vec::new();
    let mut start = 0;
    for (idx, ch) in text.chars().enumerate() {
        if ch == '\n' {
            out.push((start, idx));
            start = idx + 1;
        }
    }
    out.push((start, text.chars().count()));
    out
}

/// Every paragraph span covers exactly one non-empty line, and no line carries a kind twice.
fn assert_paragraphs_aligned(engine: &SpanEngine) {
    let lines = line_ranges(&engine.text());
    for kind in FormatKind::PARAGRAPH {
        let spans = ranges(engine, kind);
        for span in &spans {
            assert!(
                lines.contains(span) && span.0 < span.1,
                "{kind} span {span:?} is not a whole line of {:?}",
                engine.text()
            );
        }
        let mut deduped = spans.clone();
        deduped.dedup();
        assert_eq!(deduped, spans, "{kind} spans repeat a line");
    }
}

#[test]
fn test_bullets_snap_to_whole_lines() {
    let mut engine = SpanEngine::new("abc\ndef\nghi");
    engine.set(FormatKind::Bullet, 1, 9).unwrap();
    assert_eq!(
        ranges(&engine, FormatKind::Bullet),
        vec![(0, 3), (4, 7), (8, 11)]
    );
    assert!(engine.has(FormatKind::Bullet, 0, 11).unwrap());
}

#[test]
fn test_remove_deletes_whole_paragraphs() {
    let mut engine = SpanEngine::new("abc\ndef\nghi");
    engine.set(FormatKind::Quote, 0, 11).unwrap();

    engine.remove(FormatKind::Quote, 5, 6).unwrap();
    assert_eq!(ranges(&engine, FormatKind::Quote), vec![(0, 3), (8, 11)]);
    assert!(!engine.has(FormatKind::Quote, 0, 11).unwrap());
}

#[test]
fn test_blank_lines_are_skipped() {
    let mut engine = SpanEngine::new("abc\n\n\ndef");
    engine.toggle(FormatKind::Bullet, 0, 9).unwrap();
    assert_eq!(ranges(&engine, FormatKind::Bullet), vec![(0, 3), (6, 9)]);
    assert!(engine.has(FormatKind::Bullet, 0, 9).unwrap());
    assert!(!engine.has(FormatKind::Bullet, 4, 5).unwrap());

    engine.toggle(FormatKind::Bullet, 0, 9).unwrap();
    assert_eq!(engine.spans().count(), 0);
}

#[test]
fn test_bullet_and_quote_are_independent() {
    let mut engine = SpanEngine::new("abc\ndef");
    engine.set(FormatKind::Bullet, 0, 0).unwrap();
    engine.set(FormatKind::Quote, 0, 7).unwrap();
    engine.remove(FormatKind::Bullet, 0, 7).unwrap();

    assert!(ranges(&engine, FormatKind::Bullet).is_empty());
    assert_eq!(ranges(&engine, FormatKind::Quote), vec![(0, 3), (4, 7)]);
}

#[test]
fn test_split_line_fixed_point() {
    let mut engine = SpanEngine::new("first line");
    engine.set(FormatKind::Quote, 0, 10).unwrap();

    engine.insert_text(5, "\n").unwrap();
    assert_eq!(ranges(&engine, FormatKind::Quote), vec![(0, 5), (6, 11)]);

    let once: Vec<Span> = engine.spans().cloned().collect();
    assert!(!engine.normalize_paragraphs());
    assert!(!engine.normalize_paragraphs());
    assert_eq!(engine.spans().cloned().collect::<Vec<_>>(), once);
}

#[test]
fn test_joined_lines_share_one_span() {
    let mut engine = SpanEngine::new("ab\ncd\nef");
    engine.set(FormatKind::Bullet, 0, 5).unwrap();

    engine.delete_text(2, 3).unwrap();
    assert_eq!(engine.text(), "abcd\nef");
    assert_eq!(ranges(&engine, FormatKind::Bullet), vec![(0, 4)]);

    // Joining a bulleted line with a plain one extends the bullet over the result.
    engine.delete_text(4, 5).unwrap();
    assert_eq!(ranges(&engine, FormatKind::Bullet), vec![(0, 6)]);
}

#[test]
fn test_deleting_a_line_drops_its_span() {
    let mut engine = SpanEngine::new("ab\ncd");
    engine.set(FormatKind::Quote, 3, 3).unwrap();
    engine.delete_text(2, 5).unwrap();
    assert_eq!(engine.text(), "ab");
    assert_eq!(engine.spans().count(), 0);
}

#[test]
fn test_random_edits_keep_paragraphs_aligned() {
    let mut rng = StdRng::seed_from_u64(42);
    let inserts = ["x", "\n", "ab\ncd", " ", "\n\n", "yz"];

    for _ in 0..40 {
        let mut engine = SpanEngine::new("one\ntwo\n\nthree\nfour");
        for _ in 0..40 {
            let len = engine.char_count();
            let a = rng.gen_range(0..=len);
            let b = rng.gen_range(a..=len);
            match rng.gen_range(0..5) {
                0 => {
                    let text = inserts[rng.gen_range(0..inserts.len())];
                    engine.insert_text(a, text).unwrap();
                }
                1 => engine.delete_text(a, b).unwrap(),
                2 => engine.set(FormatKind::Bullet, a, b).unwrap(),
                3 => engine.toggle(FormatKind::Quote, a, b).unwrap(),
                _ => engine.remove(FormatKind::Bullet, a, b).unwrap(),
            }

            assert_paragraphs_aligned(&engine);
            assert!(!engine.normalize_paragraphs());
        }
    }
}
