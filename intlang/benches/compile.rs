use criterion::{black_box, criterion_group, criterion_main, Criterion};

use intlang::{lex::tokenize, prelude::*};

fn criterion_benchmark(c: &mut Criterion) {
    {
        let source = include_str!("../tests/calls.intl");

        c.bench_function("calls tokenize", |b| b.iter(|| black_box(tokenize(black_box(source)))));
    }

    {
        let source = include_str!("../tests/fib.intl");

        c.bench_function("fib compile", |b| {
            b.iter(|| black_box(compile_str(black_box(source), CompilerConf::default())))
        });
    }
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
