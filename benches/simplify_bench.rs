use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use tinyprep::text::normalize::normalize;
use tinyprep::{SynonymMap, SynonymMapper};

const SENTENCES: [&str; 4] = [
    "We will Utilize the Apparatus to Commence the experiment.",
    "\u{201C}Don\u{2019}t\u{201D} purchase it -- the price is EXCESSIVE!!",
    "Children play outside while the sun is shining.",
    "Subsequently, the committee endeavoured to ascertain the facts...",
];

fn generate_lines(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| format!("{} (line {i})", SENTENCES[i % SENTENCES.len()]))
        .collect()
}

fn bench_mapper(c: &mut Criterion) {
    let map: SynonymMap = [
        ("utilize", "use"),
        ("apparatus", "tool"),
        ("commence", "start"),
        ("purchase", "buy"),
        ("excessive", "too much"),
        ("subsequently", "later"),
        ("endeavoured", "tried"),
        ("ascertain", "find out"),
    ]
    .into_iter()
    .collect();
    let mapper = SynonymMapper::new(&map);

    let mut group = c.benchmark_group("Synonym Mapping");
    for count in [100usize, 1000] {
        let lines = generate_lines(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &lines, |b, lines| {
            b.iter(|| {
                for line in lines {
                    black_box(mapper.simplify(line));
                }
            })
        });
    }
    group.finish();
}

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("Normalize");
    for count in [100usize, 1000] {
        let lines = generate_lines(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &lines, |b, lines| {
            b.iter(|| {
                for line in lines {
                    black_box(normalize(line));
                }
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_mapper, bench_normalize);
criterion_main!(benches);
