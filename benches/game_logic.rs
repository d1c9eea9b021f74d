use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use blockfall::core::{
    collides, rotate, Board, GameSession, ManualScheduler, Piece, Position, RulesConfig,
};
use blockfall::engine::best_placement;
use blockfall::types::{Intent, PieceKind, TimerKind};

fn new_session() -> GameSession<ManualScheduler> {
    let config = RulesConfig::default().with_seed(12345);
    let mut session = GameSession::new(config, ManualScheduler::new());
    session.start();
    session
}

fn bench_gravity_tick(c: &mut Criterion) {
    let mut session = new_session();

    c.bench_function("gravity_tick", |b| {
        b.iter(|| {
            if !session.on_tick(black_box(TimerKind::Gravity)) {
                session.apply_intent(Intent::Restart);
            }
        })
    });
}

fn bench_line_clear(c: &mut Criterion) {
    c.bench_function("clear_4_lines", |b| {
        b.iter(|| {
            let mut board = Board::from_ascii(&[
                "##########",
                "##########",
                "##########",
                "##########",
            ]);
            let rows = board.scan_full_rows();
            board.mark_clearing(&rows);
            board.commit_clear(black_box(&rows));
        })
    });
}

fn bench_collides(c: &mut Criterion) {
    let board = Board::from_ascii(&["#########.", "##.#######"]);
    let piece = Piece::new(PieceKind::T);

    c.bench_function("collides", |b| {
        b.iter(|| collides(&board, black_box(&piece), black_box(Position::new(4, 17))))
    });
}

fn bench_rotate(c: &mut Criterion) {
    let board = Board::new();
    let piece = Piece::new(PieceKind::I);

    c.bench_function("rotate_with_kicks", |b| {
        b.iter(|| rotate(&board, black_box(&piece), black_box(Position::new(0, 5)), true))
    });
}

fn bench_hard_drop_cycle(c: &mut Criterion) {
    let mut session = new_session();

    c.bench_function("hard_drop_cycle", |b| {
        b.iter(|| {
            if session.game_over() {
                session.apply_intent(Intent::Restart);
            }
            session.apply_intent(Intent::HardDrop);
            session.advance(Duration::from_millis(200));
        })
    });
}

fn bench_best_placement(c: &mut Criterion) {
    let session = new_session();

    c.bench_function("best_placement", |b| b.iter(|| best_placement(black_box(&session))));
}

criterion_group!(
    benches,
    bench_gravity_tick,
    bench_line_clear,
    bench_collides,
    bench_rotate,
    bench_hard_drop_cycle,
    bench_best_placement
);
criterion_main!(benches);
