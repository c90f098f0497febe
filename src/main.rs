//! Terminal Candy Match runner (default binary).
//!
//! Uses crossterm for input and the framebuffer renderer from the term crate.
//! Logs go to stderr; redirect them (`2>candy.log`) while playing.

use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event};

use candy_match::core::{GameSnapshot, SwapCheck};
use candy_match::engine::{
    Engine, EngineConfig, JsonFileStore, LevelCatalog, SessionOutcome, SystemClock,
};
use candy_match::input::{handle_key_event, should_quit, Selection};
use candy_match::term::{CellStyle, FrameBuffer, GameView, HudView, TerminalRenderer, Viewport};
use candy_match::types::{BoardAction, Position};

type Game = Engine<JsonFileStore, SystemClock>;

/// Idle redraw interval (keeps the life timer moving)
const IDLE_REFRESH: Duration = Duration::from_millis(500);

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = EngineConfig::from_env();
    let catalog = match &config.levels_path {
        Some(path) => LevelCatalog::from_file(path)
            .with_context(|| format!("loading levels from {}", path.display()))?,
        None => LevelCatalog::builtin(),
    };
    let seed = config.seed.unwrap_or_else(rand::random);
    log::info!("starting with seed {}", seed);

    let store = JsonFileStore::new(&config.progress_path);
    let mut engine = Engine::new(catalog, store, SystemClock, seed);

    let mut screen = Screen::new();
    screen.term.enter()?;

    let result = App::new(&config).run(&mut engine, &mut screen);

    // Always try to restore terminal state.
    let _ = screen.term.exit();
    result
}

struct Screen {
    term: TerminalRenderer,
    fb: FrameBuffer,
    view: GameView,
}

impl Screen {
    fn new() -> Self {
        Self {
            term: TerminalRenderer::new(),
            fb: FrameBuffer::new(0, 0),
            view: GameView::new(),
        }
    }

    fn viewport() -> Viewport {
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        Viewport::new(w, h)
    }

    fn draw(&mut self, snap: Option<&GameSnapshot>, hud: &HudView<'_>) -> Result<()> {
        let viewport = Self::viewport();
        match snap {
            Some(snap) => self.view.render_into(snap, hud, viewport, &mut self.fb),
            None => {
                self.fb.resize(viewport.width, viewport.height);
                self.fb.clear(CellStyle::default().into_cell(' '));
                let y = viewport.height / 2;
                let text = hud.message.unwrap_or("no level running");
                self.fb.put_str(2, y, text, CellStyle::default().bold());
                self.fb
                    .put_str(2, y + 1, "r retry  q quit", CellStyle::default().dim());
            }
        }
        self.term.draw_swap(&mut self.fb)
    }
}

struct App {
    selection: Selection,
    message: Option<String>,
    level_id: u32,
    step_delay: Duration,
}

impl App {
    fn new(config: &EngineConfig) -> Self {
        Self {
            selection: Selection::new(0, 0),
            message: None,
            level_id: 1,
            step_delay: Duration::from_millis(config.step_delay_ms as u64),
        }
    }

    fn run(mut self, engine: &mut Game, screen: &mut Screen) -> Result<()> {
        let highest = engine.get_progress().highest_level_unlocked;
        let first = engine
            .catalog()
            .levels()
            .iter()
            .rev()
            .find(|l| l.id <= highest)
            .map(|l| l.id)
            .unwrap_or(1);
        self.start(engine, first);

        loop {
            self.redraw(engine, screen)?;

            if !event::poll(IDLE_REFRESH)? {
                continue;
            }
            match event::read()? {
                Event::Key(key) => {
                    if should_quit(key) {
                        return Ok(());
                    }
                    if let Some(action) = handle_key_event(key) {
                        self.handle(action, engine, screen)?;
                    }
                }
                Event::Resize(..) => screen.term.invalidate(),
                _ => {}
            }
        }
    }

    fn start(&mut self, engine: &mut Game, level_id: u32) {
        match engine.start_level(level_id) {
            Ok(()) => {
                self.level_id = level_id;
                self.message = None;
                if let Some(level) = engine.level() {
                    self.selection.resize(level.rows, level.cols);
                }
            }
            Err(e) => self.message = Some(e.to_string()),
        }
    }

    fn handle(&mut self, action: BoardAction, engine: &mut Game, screen: &mut Screen) -> Result<()> {
        match action {
            BoardAction::Restart => self.start(engine, self.level_id),
            BoardAction::NextLevel => match engine.last_outcome() {
                Some(SessionOutcome::Won(report)) => {
                    match engine.catalog().next_after(report.level_id).map(|l| l.id) {
                        Some(next) => self.start(engine, next),
                        None => self.message = Some("that was the last level".to_string()),
                    }
                }
                _ => self.message = Some("win this level first".to_string()),
            },
            other => {
                if let Some((a, b)) = self.selection.apply(other) {
                    self.play_turn(engine, screen, a, b)?;
                }
            }
        }
        Ok(())
    }

    fn play_turn(
        &mut self,
        engine: &mut Game,
        screen: &mut Screen,
        a: Position,
        b: Position,
    ) -> Result<()> {
        let check = match engine.session() {
            Some(session) if !session.status().is_over() => session.check_swap(a, b),
            Some(_) => {
                self.message = Some("level over: r to retry, n for next".to_string());
                return Ok(());
            }
            None => return Ok(()),
        };
        if !check.is_accepted() {
            self.message = Some(describe_rejection(check).to_string());
            return Ok(());
        }
        self.message = None;

        // The turn borrows the engine, so the panel is computed up front.
        let (lives, next_life_in_ms, best_stars, tokens) = self.progress_line(engine);
        let hud = HudView {
            cursor: None,
            picked: None,
            lives,
            next_life_in_ms,
            best_stars,
            tokens,
            message: None,
        };

        if let Some(mut turn) = engine.begin_swap(a, b) {
            while let Some(step) = turn.next() {
                let mut snap = turn.snapshot();
                snap.grid = step.cleared;
                screen.draw(Some(&snap), &hud)?;
                thread::sleep(self.step_delay);

                snap.grid = step.settled;
                screen.draw(Some(&snap), &hud)?;
                thread::sleep(self.step_delay);
            }
        }

        self.message = match engine.settle() {
            Some(SessionOutcome::Won(report)) => Some(match report.unlocked {
                Some(next) => format!(
                    "cleared with {} stars, +{} tokens, level {} unlocked (n)",
                    report.stars, report.tokens, next
                ),
                None => format!("cleared with {} stars (best {})", report.stars, report.best_stars),
            }),
            Some(SessionOutcome::Lost { score, .. }) => {
                Some(format!("out of moves at {} points, r to retry", score))
            }
            None => None,
        };
        Ok(())
    }

    fn progress_line(&self, engine: &mut Game) -> (u32, Option<u64>, u8, u64) {
        let progress = engine.get_progress();
        let next = engine.next_life_in_ms();
        (
            progress.lives,
            next,
            progress.stars_for(self.level_id),
            progress.tokens_earned,
        )
    }

    fn redraw(&self, engine: &mut Game, screen: &mut Screen) -> Result<()> {
        let (lives, next_life_in_ms, best_stars, tokens) = self.progress_line(engine);
        let hud = HudView {
            cursor: Some(self.selection.cursor()),
            picked: self.selection.picked(),
            lives,
            next_life_in_ms,
            best_stars,
            tokens,
            message: self.message.as_deref(),
        };
        let snap = engine.get_game_state();
        screen.draw(snap.as_ref(), &hud)
    }
}

fn describe_rejection(check: SwapCheck) -> &'static str {
    match check {
        SwapCheck::OutOfBounds => "outside the board",
        SwapCheck::NotAdjacent => "pick two neighbouring cells",
        SwapCheck::NoMatch => "that swap makes no match",
        SwapCheck::Match | SwapCheck::Activation => "",
    }
}
