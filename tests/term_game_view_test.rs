use candy_match::core::find_legal_move;
use candy_match::engine::{Engine, LevelCatalog, ManualClock, MemoryStore};
use candy_match::term::{GameView, HudView, Viewport};

fn started_engine(clock: &ManualClock) -> Engine<MemoryStore, &ManualClock> {
    let mut engine = Engine::new(LevelCatalog::builtin(), MemoryStore::new(), clock, 21);
    engine.start_level(1).unwrap();
    engine
}

#[test]
fn term_view_frames_an_eight_by_eight_board() {
    let clock = ManualClock::new(1_000);
    let engine = started_engine(&clock);
    let snap = engine.get_game_state().unwrap();

    // 8 cells * 3 columns + border => 26 wide, 10 high.
    // Board plus panel is 53 wide and 16 tall, centered in 80x24.
    let fb = GameView::new().render(&snap, &HudView::default(), Viewport::new(80, 24));
    assert_eq!(fb.get(13, 4).unwrap().ch, '┌');
    assert_eq!(fb.get(38, 4).unwrap().ch, '┐');
    assert_eq!(fb.get(13, 13).unwrap().ch, '└');
    assert_eq!(fb.get(38, 13).unwrap().ch, '┘');

    let top_left = snap.grid.symbol_at(0, 0).unwrap();
    assert_eq!(fb.get(15, 5).unwrap().ch, top_left.letter());
    let bottom_right = snap.grid.symbol_at(7, 7).unwrap();
    assert_eq!(fb.get(15 + 7 * 3, 12).unwrap().ch, bottom_right.letter());
}

#[test]
fn term_view_panel_tracks_the_session() {
    let clock = ManualClock::new(1_000);
    let mut engine = started_engine(&clock);

    let snap = engine.get_game_state().unwrap();
    let fb = GameView::new().render(&snap, &HudView::default(), Viewport::new(80, 24));
    assert!(fb.contains_text("LEVEL  1"));
    assert!(fb.contains_text("SCORE  0 / 1000"));
    assert!(fb.contains_text("MOVES  20"));
    assert!(fb.contains_text("C candy 0/10"));

    let (a, b) = find_legal_move(&snap.grid).unwrap();
    assert!(engine.attempt_swap(a.row, a.col, b.row, b.col));
    let snap = engine.get_game_state().unwrap();
    let progress = engine.get_progress();
    let hud = HudView {
        lives: progress.lives,
        next_life_in_ms: engine.next_life_in_ms(),
        ..Default::default()
    };
    let fb = GameView::new().render(&snap, &hud, Viewport::new(80, 24));
    assert!(fb.contains_text("MOVES  19"));
    assert!(fb.contains_text(&format!("SCORE  {} / 1000", snap.score)));
    assert!(fb.contains_text("LIVES  4 (+1 in 30:00)"));
}
