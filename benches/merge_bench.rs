//! Merge + derive over a synthetic league
//!
//! Three sources of ~500 players each, overlapping on most keys, the way a
//! full top-flight season looks once every squad is scraped.
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use footstats_rs::derived::derive;
use footstats_rs::table::{merge, Cell, Row, Table};

const CLUBS: usize = 20;
const PLAYERS_PER_CLUB: usize = 25;

fn source(offset: usize, columns: &[&str]) -> Table {
    let mut table = Table::new();
    for club in 0..CLUBS {
        for n in 0..PLAYERS_PER_CLUB {
            let mut row = Row::with_identity(&format!("Player {}", n + offset), &format!("Club {club}"));
            for (i, c) in columns.iter().enumerate() {
                row.set(*c, Cell::Number(((n * 7 + i * 3 + club) % 60) as f64));
            }
            table.push(row);
        }
    }
    table
}

fn inputs() -> (Table, Table, Table) {
    (
        source(0, &["Goals", "Sh", "Assists", "Cmp", "Att", "Dribbles Succ", "Dribbles Att"]),
        source(2, &["Rating", "Aerial Duels Won", "Aerial Duels Lost"]),
        source(4, &["Goals", "xG", "xA", "Shots", "Key Passes"]),
    )
}

fn benchmark_merge(c: &mut Criterion) {
    c.bench_function("merge 3 sources", |b| {
        b.iter_batched(
            inputs,
            |(a, t, l)| black_box(merge(a, t, l).unwrap()),
            BatchSize::SmallInput,
        );
    });
}

fn benchmark_derive(c: &mut Criterion) {
    let (a, t, l) = inputs();
    let merged = merge(a, t, l).unwrap();

    c.bench_function("derive standard metrics", |b| {
        b.iter(|| black_box(derive(&merged)));
    });
}

criterion_group!(benches, benchmark_merge, benchmark_derive);
criterion_main!(benches);
