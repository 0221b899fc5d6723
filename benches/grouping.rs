//! Grouping and reference resolution throughput.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use lexner::grouping::GroupingEngine;
use lexner::reference::ReferenceResolver;
use lexner::{NamedEntity, NamedEntityType, Segment};

const SURNAMES: &[&str] = &["Diaz", "Ruiz", "García", "Martínez", "López", "Sánchez", "Pérez", "Gómez"];
const GIVEN: &[&str] = &["María", "Ana", "José", "Luis", "Carmen", "Javier"];

fn mentions(n: usize) -> Vec<NamedEntity> {
    (0..n)
        .map(|i| {
            let given = GIVEN[i % GIVEN.len()];
            let surname = SURNAMES[(i / GIVEN.len()) % SURNAMES.len()];
            let text = match i % 3 {
                0 => format!("{} {}", given, surname),
                1 => format!("{}. {}", &given[..1], surname),
                _ => format!("{}, {}", surname, given),
            };
            NamedEntity::new(NamedEntityType::Person, text)
        })
        .collect()
}

fn document(sections: usize) -> Vec<Segment> {
    let mut segments = Vec::with_capacity(sections * 2);
    for i in 0..sections {
        segments.push(Segment::new(format!("{}. Section number {}", i + 1, i + 1), "Section header"));
        segments.push(Segment::from_text(format!(
            "As discussed in \"Section number {}\", the tribunal held that the claim fails.",
            (i + 1) % sections + 1
        )));
    }
    segments
}

fn bench_grouping(c: &mut Criterion) {
    let mut group = c.benchmark_group("grouping");
    for &n in &[50, 200, 800] {
        let entities = mentions(n);
        group.bench_with_input(BenchmarkId::new("persons", n), &entities, |b, entities| {
            b.iter(|| GroupingEngine::default().group(black_box(entities.clone()), &[]))
        });
    }
    group.finish();
}

fn bench_references(c: &mut Criterion) {
    let mut group = c.benchmark_group("references");
    for &sections in &[10, 50] {
        let segments = document(sections);
        group.bench_with_input(BenchmarkId::new("resolve", sections), &segments, |b, segments| {
            b.iter(|| ReferenceResolver::default().resolve(black_box(segments)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_grouping, bench_references);
criterion_main!(benches);
