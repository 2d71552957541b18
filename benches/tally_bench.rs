//! Benchmarks for tally ranking and constituency grouping
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use votedesk::model::{Constituency, PartyTally};
use votedesk::{group_by_constituency, TallySnapshot};

fn create_test_parties(count: usize, constituencies: u64) -> Vec<PartyTally> {
    (0..count)
        .map(|i| {
            let cid = (i as u64 % constituencies) + 1;
            let constituency = Constituency::new(cid, format!("C{}", cid), "KA", cid == 1);
            // spread of counts with plenty of ties
            PartyTally::new(i as u64 + 1, format!("Party {}", i), (i as u64 * 7919) % 500, constituency)
        })
        .collect()
}

fn bench_ranking(c: &mut Criterion) {
    let mut group = c.benchmark_group("ranking");

    for size in [10, 100, 1000] {
        let parties = create_test_parties(size, 1);

        group.throughput(Throughput::Elements(size as u64));

        group.bench_function(format!("snapshot_{}", size), |b| {
            b.iter(|| TallySnapshot::from_tallies(black_box(parties.clone())))
        });

        let snapshot = TallySnapshot::from_tallies(parties.clone());

        group.bench_function(format!("standings_{}", size), |b| {
            b.iter(|| black_box(&snapshot).standings().filter(|s| s.is_leading).count())
        });
    }

    group.finish();
}

fn bench_grouping(c: &mut Criterion) {
    let mut group = c.benchmark_group("grouping");

    for size in [100, 1000, 10000] {
        let parties = create_test_parties(size, 50);

        group.throughput(Throughput::Elements(size as u64));

        group.bench_function(format!("group_{}", size), |b| {
            b.iter(|| group_by_constituency(black_box(&parties)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_ranking, bench_grouping);
criterion_main!(benches);
