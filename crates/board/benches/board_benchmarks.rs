use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use partdesk_board::{Board, BucketLimits, HoverTarget, LoadRecord, project};
use partdesk_core::{BucketKey, ItemId};

fn loaded_board(items_per_bucket: usize) -> (Board, Vec<ItemId>) {
    let buckets = ["pool", "stock", "available"];
    let mut records = Vec::new();
    for bucket in buckets {
        for i in 0..items_per_bucket {
            records.push(LoadRecord {
                id: ItemId::new(),
                weight: (i as u64 % 500) + 1,
                bucket: BucketKey::from(bucket),
            });
        }
    }
    let ids: Vec<ItemId> = records.iter().map(|r| r.id).collect();

    let mut board = Board::new(buckets.map(BucketKey::from));
    board.load(records).unwrap();
    board.set_limits(BucketLimits::from([(BucketKey::from("stock"), 10_000)]));
    (board, ids)
}

fn bench_resolve_and_commit(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_and_commit");

    for size in [50usize, 200, 1000] {
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::new("cross_bucket_move", size), &size, |b, &size| {
            let (mut board, ids) = loaded_board(size);
            let mut i = 0usize;
            b.iter(|| {
                let item = ids[i % ids.len()];
                let target = ids[(i + size) % ids.len()];
                i += 1;
                board.begin_drag(black_box(item)).unwrap();
                board.hover(HoverTarget::Item(target));
                black_box(board.end_drag(true));
            });
        });
    }

    group.finish();
}

fn bench_full_projection(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_projection");

    for size in [50usize, 200, 1000] {
        group.throughput(Throughput::Elements((size * 3) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let (board, _) = loaded_board(size);
            let limits = BucketLimits::from([(BucketKey::from("stock"), 10_000)]);
            b.iter(|| {
                black_box(project(board.partition(), board.registry(), &limits));
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_resolve_and_commit, bench_full_projection);
criterion_main!(benches);
