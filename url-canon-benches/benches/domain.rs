use criterion::{criterion_group, criterion_main, Criterion};

use url_canon::Domain;

pub fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("parse ASCII domains", |b| {
        b.iter(|| {
            (
                Domain::parse("example.com"),
                Domain::parse("WWW.Sub.Sub.Example.COM"),
                Domain::parse("xn--bcher-kva.example"),
                Domain::parse("ex%61mple.com"),
            )
        })
    });

    c.bench_function("parse internationalized domains", |b| {
        b.iter(|| {
            (
                Domain::parse("b\u{00FC}cher.example"),
                Domain::parse("\u{65E5}\u{672C}\u{8A9E}.\u{4F8B}"),
                Domain::parse_unicode("xn--wgv71a119e.xn--fsqu00a"),
                Domain::parse("\u{0645}\u{062B}\u{0627}\u{0644}.example"),
            )
        })
    });

    c.bench_function("reject invalid domains", |b| {
        b.iter(|| {
            (
                Domain::parse("exa mple.com"),
                Domain::parse("\u{FFFD}.com"),
                Domain::parse("xn--a.com"),
            )
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
