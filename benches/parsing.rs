//! Benchmarks for markdown lexing.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use marktree::lexer::{ComrakLexer, Lexer};

fn bench_lex_simple(c: &mut Criterion) {
    let md = "# Hello\n\nWorld";
    let lexer = ComrakLexer::new();
    c.bench_function("lex_simple", |b| b.iter(|| lexer.lex(black_box(md)).unwrap()));
}

fn bench_lex_post(c: &mut Criterion) {
    let md = include_str!("../tests/fixtures/post.md");
    let lexer = ComrakLexer::new();
    c.bench_function("lex_post", |b| b.iter(|| lexer.lex(black_box(md)).unwrap()));
}

criterion_group!(benches, bench_lex_simple, bench_lex_post);
criterion_main!(benches);
