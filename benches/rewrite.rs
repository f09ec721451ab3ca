//! Benchmarks for in-memory rewriting.
//!
//! These benchmarks measure `rewrite_content` over one-line and deb822
//! inputs of increasing size, both for files that need changes and for files
//! that are already compliant.

use apt_components::config::EngineConfig;
use apt_components::rewrite::rewrite_content;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

const SOURCES_LIST: &str = "\
# See /usr/share/doc/apt/examples/sources.list
deb http://deb.debian.org/debian trixie main
deb-src http://deb.debian.org/debian trixie main

deb http://security.debian.org/debian-security trixie-security main
deb http://deb.debian.org/debian trixie-updates main non-free-firmware
deb [arch=amd64 signed-by=/usr/share/keyrings/docker.gpg] https://download.docker.com/linux/debian trixie stable
";

const DEBIAN_SOURCES: &str = "\
Types: deb deb-src
URIs: http://deb.debian.org/debian
Suites: trixie trixie-updates
Components: main
Signed-By: /usr/share/keyrings/debian-archive-keyring.gpg

Types: deb
URIs: http://security.debian.org/debian-security
Suites: trixie-security
Components: main
Signed-By: /usr/share/keyrings/debian-archive-keyring.gpg
";

/// Generate a one-line file with `entries` lines, alternating official and
/// third-party hosts.
fn generate_list(entries: usize) -> String {
    (0..entries)
        .map(|i| {
            if i % 2 == 0 {
                format!("deb http://deb.debian.org/debian suite{} main\n", i)
            } else {
                format!("deb https://packages.example.com/apt suite{} main\n", i)
            }
        })
        .collect()
}

fn bench_rewrite(c: &mut Criterion) {
    let config = EngineConfig::default();
    let mut group = c.benchmark_group("rewrite");

    group.bench_function("one_line", |b| {
        b.iter(|| rewrite_content(black_box(SOURCES_LIST), &config))
    });

    group.bench_function("deb822", |b| {
        b.iter(|| rewrite_content(black_box(DEBIAN_SOURCES), &config))
    });

    let compliant = rewrite_content(SOURCES_LIST, &config)
        .map(|r| r.content)
        .unwrap_or_default();
    group.bench_function("one_line_compliant", |b| {
        b.iter(|| rewrite_content(black_box(&compliant), &config))
    });

    group.finish();
}

fn bench_rewrite_scaling(c: &mut Criterion) {
    let config = EngineConfig::default();
    let mut group = c.benchmark_group("rewrite_scaling");

    for entries in [10, 100, 1000] {
        let content = generate_list(entries);
        group.bench_with_input(
            BenchmarkId::new("entries", entries),
            &content,
            |b, content| b.iter(|| rewrite_content(black_box(content), &config)),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_rewrite, bench_rewrite_scaling);
criterion_main!(benches);
