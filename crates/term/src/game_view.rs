//! GameView: maps a `GameSnapshot` into a terminal framebuffer.
//!
//! This module is pure (no I/O) and unit-tested.

use crate::core::{Cell as BoardCell, GameSnapshot, GameStatus};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{Position, Special, Symbol};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Player-side information shown next to the board
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HudView<'a> {
    pub cursor: Option<Position>,
    pub picked: Option<Position>,
    pub lives: u32,
    pub next_life_in_ms: Option<u64>,
    /// Best stars recorded for the level on screen
    pub best_stars: u8,
    pub tokens: u64,
    /// One-line status message (rejections, hints)
    pub message: Option<&'a str>,
}

const BOARD_BG: Rgb = Rgb::new(30, 30, 40);
const CURSOR_BG: Rgb = Rgb::new(70, 70, 95);
const PICKED_BG: Rgb = Rgb::new(120, 100, 40);
const TEXT: CellStyle = CellStyle::new(Rgb::new(220, 220, 220), Rgb::new(0, 0, 0));
const LABEL: CellStyle = CellStyle::new(Rgb::new(150, 150, 160), Rgb::new(0, 0, 0));
const BORDER: CellStyle = CellStyle::new(Rgb::new(200, 200, 200), Rgb::new(0, 0, 0));

/// Terminal columns per board cell: padding, symbol, special marker
const CELL_W: u16 = 3;
const PANEL_GAP: u16 = 3;
/// Rows reserved for the side panel
const PANEL_H: u16 = 16;

/// Renders the match board with a side panel
#[derive(Debug, Clone, Copy, Default)]
pub struct GameView;

impl GameView {
    pub fn new() -> Self {
        Self
    }

    /// Render into an existing framebuffer, resizing it to the viewport.
    pub fn render_into(
        &self,
        snap: &GameSnapshot,
        hud: &HudView<'_>,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().into_cell(' '));

        let grid = &snap.grid;
        let board_w = grid.cols() as u16 * CELL_W;
        let board_h = grid.rows() as u16;
        let frame_w = board_w + 2;
        let frame_h = board_h + 2;
        let panel_w = 24;

        let total_w = frame_w + PANEL_GAP + panel_w;
        let start_x = viewport.width.saturating_sub(total_w) / 2;
        let start_y = viewport.height.saturating_sub(frame_h.max(PANEL_H)) / 2;

        fb.fill_rect(
            start_x + 1,
            start_y + 1,
            board_w,
            board_h,
            ' ',
            CellStyle::new(TEXT.fg, BOARD_BG),
        );
        draw_border(fb, start_x, start_y, frame_w, frame_h);

        for cell in grid.cells() {
            let pos = cell.position();
            let bg = if hud.picked == Some(pos) {
                PICKED_BG
            } else if hud.cursor == Some(pos) {
                CURSOR_BG
            } else {
                BOARD_BG
            };
            let x = start_x + 1 + pos.col as u16 * CELL_W;
            let y = start_y + 1 + pos.row as u16;
            draw_cell(fb, x, y, cell, bg);
        }

        let panel_x = start_x + frame_w + PANEL_GAP;
        let panel_end = draw_panel(fb, snap, hud, panel_x, start_y);

        if let Some(text) = overlay_text(snap.status) {
            draw_overlay(fb, start_x, start_y, frame_w, frame_h, &text);
        }

        if let Some(message) = hud.message {
            let y = (start_y + frame_h)
                .max(panel_end)
                .saturating_add(1)
                .min(viewport.height.saturating_sub(1));
            fb.put_str(start_x, y, message, TEXT.bold());
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &GameSnapshot, hud: &HudView<'_>, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, hud, viewport, &mut fb);
        fb
    }
}

pub fn symbol_color(symbol: Symbol) -> Rgb {
    match symbol {
        Symbol::Candy => Rgb::new(240, 90, 120),
        Symbol::Lollipop => Rgb::new(200, 120, 230),
        Symbol::Chocolate => Rgb::new(170, 110, 60),
        Symbol::Cookie => Rgb::new(230, 190, 100),
        Symbol::Cake => Rgb::new(250, 240, 220),
        Symbol::Donut => Rgb::new(90, 200, 230),
    }
}

fn special_marker(special: Option<Special>) -> char {
    match special {
        Some(Special::RocketH) => '-',
        Some(Special::RocketV) => '|',
        Some(Special::Bomb) => '*',
        None => ' ',
    }
}

fn draw_cell(fb: &mut FrameBuffer, x: u16, y: u16, cell: &BoardCell, bg: Rgb) {
    let base = CellStyle::new(symbol_color(cell.symbol), bg);
    if cell.matched {
        fb.put_str(x, y, " x ", base.dim());
        return;
    }
    let style = if cell.is_new || cell.special.is_some() {
        base.bold()
    } else {
        base
    };
    fb.put_char(x, y, ' ', style);
    fb.put_char(x + 1, y, cell.symbol.letter(), style);
    fb.put_char(x + 2, y, special_marker(cell.special), style);
}

fn draw_border(fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16) {
    if w < 2 || h < 2 {
        return;
    }
    fb.put_char(x, y, '┌', BORDER);
    fb.put_char(x + w - 1, y, '┐', BORDER);
    fb.put_char(x, y + h - 1, '└', BORDER);
    fb.put_char(x + w - 1, y + h - 1, '┘', BORDER);
    for dx in 1..w - 1 {
        fb.put_char(x + dx, y, '─', BORDER);
        fb.put_char(x + dx, y + h - 1, '─', BORDER);
    }
    for dy in 1..h - 1 {
        fb.put_char(x, y + dy, '│', BORDER);
        fb.put_char(x + w - 1, y + dy, '│', BORDER);
    }
}

/// Returns the first row below the panel
fn draw_panel(fb: &mut FrameBuffer, snap: &GameSnapshot, hud: &HudView<'_>, x: u16, y: u16) -> u16 {
    let mut line = y;
    let mut row = |fb: &mut FrameBuffer, label: &str, value: String| {
        let vx = fb.put_str(x, line, label, LABEL);
        fb.put_str(vx, line, &value, TEXT);
        line += 1;
    };

    row(fb, "LEVEL  ", snap.level_id.to_string());
    row(fb, "SCORE  ", format!("{} / {}", snap.score, snap.target_score));
    row(fb, "MOVES  ", snap.moves_remaining.to_string());
    if snap.combo > 1 {
        row(fb, "COMBO  ", format!("x{}", snap.combo));
    } else {
        row(fb, "", String::new());
    }
    row(fb, "", String::new());
    row(fb, "GOALS", String::new());
    for (goal, have) in snap.goal_progress() {
        let done = if have >= goal.required_count { " ok" } else { "" };
        row(
            fb,
            "  ",
            format!(
                "{} {} {}/{}{}",
                goal.symbol.letter(),
                goal.symbol.as_str(),
                have,
                goal.required_count,
                done
            ),
        );
    }
    row(fb, "", String::new());

    let lives = match hud.next_life_in_ms {
        Some(ms) => format!("{} (+1 in {})", hud.lives, format_duration(ms)),
        None => hud.lives.to_string(),
    };
    row(fb, "LIVES  ", lives);
    row(fb, "BEST   ", stars_text(hud.best_stars));
    row(fb, "TOKENS ", hud.tokens.to_string());
    row(fb, "", String::new());
    row(fb, "", "arrows/hjkl move".to_string());
    row(fb, "", "space pick/swap".to_string());
    row(fb, "", "r retry  n next  q quit".to_string());
    line
}

fn overlay_text(status: GameStatus) -> Option<String> {
    match status {
        GameStatus::Playing => None,
        GameStatus::Won { stars } => Some(format!("CLEARED {}", stars_text(stars))),
        GameStatus::Lost => Some("OUT OF MOVES".to_string()),
    }
}

fn draw_overlay(fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16, text: &str) {
    let style = CellStyle::new(Rgb::new(255, 255, 255), Rgb::new(120, 40, 40)).bold();
    let len = text.chars().count() as u16;
    let tx = x + w.saturating_sub(len) / 2;
    let ty = y + h / 2;
    fb.put_str(tx, ty, text, style);
}

pub fn stars_text(stars: u8) -> String {
    (0..3).map(|i| if i < stars { '★' } else { '☆' }).collect()
}

/// `mm:ss`
pub fn format_duration(ms: u64) -> String {
    let secs = ms.div_ceil(1000);
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Grid, SymbolCounts};
    use crate::types::Goal;

    fn snapshot(layout: &[&str]) -> GameSnapshot {
        GameSnapshot {
            grid: Grid::from_rows(layout).unwrap(),
            level_id: 3,
            score: 120,
            target_score: 1000,
            moves_remaining: 17,
            goals: vec![Goal::new(Symbol::Candy, 10)],
            collected: SymbolCounts::new(),
            combo: 0,
            animating: false,
            status: GameStatus::Playing,
        }
    }

    #[test]
    fn renders_board_letters_and_panel() {
        let snap = snapshot(&["CLH", "KAD", "CLH"]);
        let fb = GameView::new().render(&snap, &HudView::default(), Viewport::new(80, 24));
        assert!(fb.contains_text(" C  L  H "));
        assert!(fb.contains_text(" K  A  D "));
        assert!(fb.contains_text("SCORE  120 / 1000"));
        assert!(fb.contains_text("MOVES  17"));
        assert!(fb.contains_text("C candy 0/10"));
        assert!(!fb.contains_text("OUT OF MOVES"));
    }

    #[test]
    fn cursor_and_pick_change_background() {
        let snap = snapshot(&["CLH", "KAD", "CLH"]);
        let view = GameView::new();
        let plain = view.render(&snap, &HudView::default(), Viewport::new(80, 24));
        let hud = HudView {
            cursor: Some(Position::new(0, 1)),
            picked: Some(Position::new(0, 0)),
            ..Default::default()
        };
        let marked = view.render(&snap, &hud, Viewport::new(80, 24));
        let differing: Vec<_> = plain
            .cells()
            .iter()
            .zip(marked.cells())
            .filter(|(a, b)| a != b)
            .map(|(_, b)| b.style.bg)
            .collect();
        assert_eq!(differing.len(), 6);
        assert!(differing.contains(&PICKED_BG));
        assert!(differing.contains(&CURSOR_BG));
    }

    #[test]
    fn specials_and_cleared_cells() {
        let mut snap = snapshot(&["CLH", "KAD", "CLH"]);
        snap.grid.set_special(Position::new(1, 1), Some(Special::Bomb));
        let fb = GameView::new().render(&snap, &HudView::default(), Viewport::new(80, 24));
        assert!(fb.contains_text(" K  A* D "));
    }

    #[test]
    fn end_of_level_overlays() {
        let mut snap = snapshot(&["CLH", "KAD", "CLH"]);
        snap.status = GameStatus::Won { stars: 2 };
        let fb = GameView::new().render(&snap, &HudView::default(), Viewport::new(80, 24));
        assert!(fb.contains_text("CLEARED ★★☆"));

        snap.status = GameStatus::Lost;
        let fb = GameView::new().render(&snap, &HudView::default(), Viewport::new(80, 24));
        assert!(fb.contains_text("OUT OF MOVES"));
    }

    #[test]
    fn hud_lives_and_message() {
        let snap = snapshot(&["CLH", "KAD", "CLH"]);
        let hud = HudView {
            lives: 2,
            next_life_in_ms: Some(90_500),
            message: Some("level 4 is locked"),
            ..Default::default()
        };
        let fb = GameView::new().render(&snap, &hud, Viewport::new(80, 24));
        assert!(fb.contains_text("LIVES  2 (+1 in 01:31)"));
        assert!(fb.contains_text("level 4 is locked"));
    }

    #[test]
    fn tiny_viewport_does_not_panic() {
        let snap = snapshot(&["CLH", "KAD", "CLH"]);
        let fb = GameView::new().render(&snap, &HudView::default(), Viewport::new(5, 3));
        assert_eq!(fb.width(), 5);
    }
}
