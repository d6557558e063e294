use criterion::{black_box, criterion_group, criterion_main, Criterion};
use gridkit::prelude::*;

fn wide_update(tag: &str, cells: usize) -> Operation<String> {
    let mut op = Operation::default();
    let updates = (0..cells)
        .map(|i| UpdateCell {
            col_id: format!("c{}", i % 8),
            row_id: format!("r{}", i / 8),
            value: format!("{tag}-{i}"),
        })
        .collect();
    op.update_cells = Some(updates);
    op
}

fn bench_compose(c: &mut Criterion) {
    let a = wide_update("a", 64);
    let b = wide_update("b", 64);

    c.bench_function("compose 64x64 cell updates", |bench| {
        bench.iter(|| black_box(compose(a.clone(), b.clone())))
    });

    let delete = Operation::<String> {
        delete_rows: Some((0..8).map(|i| format!("r{i}")).collect()),
        ..Operation::default()
    };
    c.bench_function("compose updates then row deletes", |bench| {
        bench.iter(|| black_box(compose(a.clone(), delete.clone())))
    });
}

fn bench_transform(c: &mut Criterion) {
    let local = wide_update("local", 64);
    let remote = wide_update("remote", 64);

    c.bench_function("transform 64x64 concurrent updates", |bench| {
        bench.iter(|| black_box(transform(local.clone(), remote.clone())))
    });
}

fn bench_apply(c: &mut Criterion) {
    let columns = (0..8)
        .map(|i| Column {
            id: format!("c{i}"),
            name: format!("col {i}"),
            col_type: "text".to_string(),
        })
        .collect();
    let rows = (0..500)
        .map(|i| Row {
            id: format!("r{i}"),
            cells: vec![],
        })
        .collect();
    let grid = Grid::with(columns, rows);
    let op = wide_update("apply", 64);

    c.bench_function("apply 64 updates to 500-row grid", |bench| {
        bench.iter(|| {
            let mut grid = grid.clone();
            grid.apply(&op);
            black_box(grid.row_count())
        })
    });
}

criterion_group!(benches, bench_compose, bench_transform, bench_apply);
criterion_main!(benches);
