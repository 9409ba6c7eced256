use criterion::{criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use mbr_index::{Feature, Mbr, RTree};

#[derive(Clone, PartialEq)]
struct Cell {
    x: i32,
    y: i32,
}

impl Feature for Cell {
    fn mbr(&self) -> Mbr {
        Mbr::from_i32(&[self.x, self.y], &[0, 0]).unwrap()
    }
}

fn grid(n: i32) -> Vec<Cell> {
    let mut cells = Vec::with_capacity((n * n) as usize);
    for x in 0..n {
        for y in 0..n {
            cells.push(Cell { x, y });
        }
    }
    cells
}

fn construct_incremental(cells: &[Cell]) -> RTree<Cell> {
    let mut tree = RTree::new(2, 16);
    for cell in cells {
        tree.insert(cell.clone());
    }
    tree
}

fn bench_construction(c: &mut Criterion) {
    let cells = grid(100);

    c.bench_function("insert 10k points", |b| {
        b.iter(|| construct_incremental(&cells))
    });

    c.bench_function("bulk load 10k points", |b| {
        b.iter(|| RTree::with_features(2, 16, cells.clone()))
    });
}

fn bench_search(c: &mut Criterion) {
    let tree = RTree::with_features(2, 16, grid(100));
    let mut rng = StdRng::seed_from_u64(2024);
    let queries: Vec<Mbr> = (0..1_000)
        .map(|_| {
            let x = rng.gen_range(0..90);
            let y = rng.gen_range(0..90);
            Mbr::from_i32(&[x, y], &[10, 10]).unwrap()
        })
        .collect();

    c.bench_function("1k window queries over 10k points", |b| {
        b.iter(|| {
            let mut total = 0;
            for query in &queries {
                total += tree.search(query).len();
            }
            total
        })
    });
}

criterion_group!(benches, bench_construction, bench_search);
criterion_main!(benches);
