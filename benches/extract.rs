// benches/extract.rs
use criterion::{criterion_group, criterion_main, Criterion, black_box};

use lichen_territory::config::rules::RuleSet;
use lichen_territory::extract::extract_nations;

const SAMPLES: &[&str] = &[
    "Credit: J. Doe. territorial acknowledgement to the Secwepemc.",
    "Territorial acknowledgement to the Coast Salish Nations of Musqueam, Tsleil-Waututh and Squamish. Licensed CC-BY.",
    "Collected on the Tahltan territory in 2019. Donated.",
    "Crustose lichen on granite, close-up. Credit: A. Smith.",
];

fn load_descriptions() -> Vec<String> {
    // Real scrape if present; otherwise repeat the samples.
    std::fs::read_to_string(".ignore/descriptions.txt")
        .map(|t| t.lines().map(String::from).collect())
        .unwrap_or_else(|_| SAMPLES.iter().cycle().take(2_000).map(|s| s.to_string()).collect())
}

fn bench_extract(c: &mut Criterion) {
    let docs = load_descriptions();
    let rules = RuleSet::builtin();

    c.bench_function("extract_nations", |b| {
        b.iter(|| {
            let n: usize = docs
                .iter()
                .map(|d| extract_nations(black_box(d), black_box(&rules)).len())
                .sum();
            black_box(n)
        })
    });
}

criterion_group!(benches, bench_extract);
criterion_main!(benches);
