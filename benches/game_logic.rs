use criterion::{black_box, criterion_group, criterion_main, Criterion};
use candy_match::core::{detect, find_legal_move, Cascade, GameState, Grid, SimpleRng};
use candy_match::engine::LevelCatalog;
use candy_match::types::Level;

fn bench_generate(c: &mut Criterion) {
    let palette = Level::palette_of(5);
    let mut rng = SimpleRng::new(12345);

    c.bench_function("generate_8x8", |b| {
        b.iter(|| Grid::generate(8, 8, black_box(&palette), &mut rng))
    });
}

fn bench_detect(c: &mut Criterion) {
    let grid = Grid::from_rows(&[
        "CCCHKALL", "HKCALLKA", "ACLHKACL", "LHKACLHK", "KACLHKAC", "CLHKACLH", "HKACLHKA",
        "ACLLLACL",
    ])
    .unwrap();

    c.bench_function("detect_8x8", |b| b.iter(|| detect(black_box(&grid))));
}

fn bench_find_move(c: &mut Criterion) {
    let palette = Level::palette_of(6);
    let grid = Grid::generate(8, 8, &palette, &mut SimpleRng::new(7));

    c.bench_function("find_legal_move", |b| {
        b.iter(|| find_legal_move(black_box(&grid)))
    });
}

fn bench_cascade(c: &mut Criterion) {
    let palette = Level::palette_of(5);
    let start = Grid::from_rows(&[
        "CCCHKALL", "HKCALLKA", "ACLHKACL", "LHKACLHK", "KACLHKAC", "CLHKACLH", "HKACLHKA",
        "ACLLLACL",
    ])
    .unwrap();
    let mut rng = SimpleRng::new(99);

    c.bench_function("cascade_resolve", |b| {
        b.iter(|| {
            let mut grid = start.clone();
            Cascade::new(&mut grid, &mut rng, &palette).count()
        })
    });
}

fn bench_turn(c: &mut Criterion) {
    let level = LevelCatalog::builtin().get(1).cloned().unwrap();
    let mut seed = 0;

    c.bench_function("play_one_turn", |b| {
        b.iter(|| {
            seed += 1;
            let mut game = GameState::new(level.clone(), seed);
            if let Some((from, to)) = find_legal_move(game.grid()) {
                game.attempt_swap(from, to);
            }
            game.score()
        })
    });
}

criterion_group!(
    benches,
    bench_generate,
    bench_detect,
    bench_find_move,
    bench_cascade,
    bench_turn
);
criterion_main!(benches);
