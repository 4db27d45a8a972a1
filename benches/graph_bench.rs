use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rangegraph_dag::{FormulaDependencyGraph, ZoneSet};
use rangegraph_primitives::{BoundingBox, CellPosition, GridLimits, Range, UnboundedZone, Zone};

const SHEET: u32 = 1;

/// `size` formulas in column B, each reading all of A1:A{size}.
fn shared_range_graph(size: u32) -> FormulaDependencyGraph {
    let shared = BoundingBox::new(SHEET, Zone::new(0, 0, 0, size - 1));
    FormulaDependencyGraph::from_dependencies(
        (0..size).map(|row| (CellPosition::new(SHEET, 1, row), [shared])),
    )
}

/// B1 = A1, C1 = B1, ... one column per link.
fn chain_graph(length: u32) -> FormulaDependencyGraph {
    let mut graph = FormulaDependencyGraph::new();
    for col in 1..=length {
        graph.add_dependencies(
            CellPosition::new(SHEET, col, 0),
            &[BoundingBox::new(SHEET, Zone::cell(col - 1, 0))],
        );
    }
    graph
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");

    for size in [100u32, 1_000, 10_000].iter() {
        group.bench_with_input(BenchmarkId::new("shared_range_incremental", size), size, |b, &size| {
            let shared = BoundingBox::new(SHEET, Zone::new(0, 0, 0, size - 1));
            b.iter(|| {
                let mut graph = FormulaDependencyGraph::new();
                for row in 0..size {
                    graph.add_dependencies(CellPosition::new(SHEET, 1, row), &[shared]);
                }
                black_box(graph)
            })
        });

        group.bench_with_input(BenchmarkId::new("shared_range_bulk", size), size, |b, &size| {
            b.iter(|| black_box(shared_range_graph(size)))
        });
    }

    group.finish();
}

fn bench_dependents(c: &mut Criterion) {
    let mut group = c.benchmark_group("dependents");

    for size in [100u32, 1_000, 10_000].iter() {
        let graph = shared_range_graph(*size);
        let changed = Range::new(SHEET, Zone::cell(0, size / 2));
        group.bench_with_input(BenchmarkId::new("shared_range", size), size, |b, _| {
            b.iter(|| graph.get_cells_depending_on(black_box([changed])))
        });
    }

    for length in [10u32, 100, 1_000].iter() {
        let graph = chain_graph(*length);
        let changed = Range::new(SHEET, Zone::cell(0, 0));
        group.bench_with_input(BenchmarkId::new("chain", length), length, |b, _| {
            b.iter(|| graph.get_cells_depending_on(black_box([changed])))
        });
    }

    let graph = shared_range_graph(1_000);
    let column = Range::from_unbounded(
        SHEET,
        UnboundedZone::full_columns(0, 0),
        &GridLimits::default(),
    );
    group.bench_function("whole_column", |b| {
        b.iter(|| graph.get_cells_depending_on(black_box([column])))
    });

    group.finish();
}

fn bench_remove(c: &mut Criterion) {
    let mut group = c.benchmark_group("remove");

    for size in [100u32, 1_000].iter() {
        group.bench_with_input(BenchmarkId::new("shared_range", size), size, |b, &size| {
            b.iter_batched(
                || shared_range_graph(size),
                |mut graph| {
                    for row in 0..size {
                        graph.remove_all_dependencies(CellPosition::new(SHEET, 1, row));
                    }
                    graph
                },
                criterion::BatchSize::LargeInput,
            )
        });
    }

    group.finish();
}

fn bench_zone_set(c: &mut Criterion) {
    let mut group = c.benchmark_group("zone_set");

    group.bench_function("checkerboard_add", |b| {
        b.iter(|| {
            let mut set = ZoneSet::new();
            for col in 0..32 {
                for row in 0..32 {
                    if (col + row) % 2 == 0 {
                        set.add(Zone::cell(col, row));
                    }
                }
            }
            black_box(set)
        })
    });

    let mut full = ZoneSet::new();
    full.add(Zone::new(0, 0, 63, 63));
    group.bench_function("punch_holes", |b| {
        b.iter(|| {
            let mut set = full.clone();
            for i in 0..32 {
                set.delete(Zone::cell(i * 2, i * 2));
            }
            black_box(set)
        })
    });

    let mut holes = ZoneSet::new();
    for i in 0..32 {
        holes.add(Zone::new(i * 2, 0, i * 2, 63));
    }
    group.bench_function("difference", |b| {
        b.iter(|| black_box(full.difference(black_box(&holes))))
    });

    group.bench_function("iterate", |b| {
        let fragmented = full.difference(&holes);
        b.iter(|| black_box(fragmented.iter().count()))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_build,
    bench_dependents,
    bench_remove,
    bench_zone_set
);
criterion_main!(benches);
