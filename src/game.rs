//! Session state machine
//!
//! A session goes Idle -> Active -> GameOver -> Idle. While active, the
//! player grabs a dock shape, drags it, and releases it; a successful drop
//! places the shape, and any full lines are cleared after a short pause so
//! the player can see them before they vanish.

use crate::account::{PlayCredits, ScoreSink, SubmitError};
use crate::board::{Board, LineClear};
use crate::dock::{Dock, ShapeGenerator};
use crate::pointer::{GridPos, Point, PointerMapper};
use crate::score::{ComboScorer, MoveScore};
use crate::shape::Shape;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Pause between completing lines and clearing them
pub const DEFAULT_CLEAR_DELAY: Duration = Duration::from_millis(250);

/// Top-level session state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Idle,
    Active(Phase),
    GameOver,
}

/// Turn phase inside an active session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AwaitingInput,
    Dragging,
    /// Only held while `release` runs
    ResolvingPlacement,
    /// Full lines are showing, waiting for the clear deadline
    ResolvingClearDelay,
}

/// The drag gesture in progress, if any
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Drag {
    #[default]
    Idle,
    Dragging { slot: usize, pointer: Point },
}

/// Cues for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEvent {
    Place,
    Reject,
    Clear { lines: usize },
    Combo { multiplier: u32 },
    GameOver,
}

/// What happened when a drag was released
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// No drag was active
    NotDragging,
    /// Nothing changed; the shape is still in its slot
    Rejected,
    Placed {
        origin: GridPos,
        cells: usize,
        lines: usize,
    },
}

/// Why a session could not start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StartError {
    #[error("no play credits left today")]
    NoCredits,
    #[error("a session is already running")]
    AlreadyRunning,
}

/// Placement preview for the active drag
#[derive(Debug, Clone, Copy)]
pub struct Ghost<'a> {
    pub origin: GridPos,
    pub shape: &'a Shape,
}

/// Lines waiting for the clear deadline
#[derive(Debug, Clone)]
struct PendingClear {
    lines: LineClear,
    cells_placed: usize,
    deadline: Instant,
}

/// True when no dock shape fits at any of the 64 origins.
/// An empty dock is about to be refilled and does not end the game.
pub fn is_game_over(board: &Board, dock: &Dock) -> bool {
    if dock.is_empty() {
        return false;
    }
    !dock.shapes().any(|shape| board.fits_anywhere(&shape.matrix))
}

/// The game session
pub struct Game {
    pub board: Board,
    pub dock: Dock,
    pub score: ComboScorer,
    pub state: GameState,
    /// Score of the most recent resolved placement
    pub last_move: Option<MoveScore>,
    drag: Drag,
    generator: ShapeGenerator,
    mapper: PointerMapper,
    clear_delay: Duration,
    pending_clear: Option<PendingClear>,
    sounds: Vec<SoundEvent>,
}

impl Game {
    pub fn new(mapper: PointerMapper, clear_delay: Duration) -> Self {
        Self::with_generator(mapper, clear_delay, ShapeGenerator::new())
    }

    /// Create a game whose shape draws are fixed by the seed
    pub fn with_seed(mapper: PointerMapper, clear_delay: Duration, seed: u64) -> Self {
        Self::with_generator(mapper, clear_delay, ShapeGenerator::with_seed(seed))
    }

    fn with_generator(mapper: PointerMapper, clear_delay: Duration, generator: ShapeGenerator) -> Self {
        Self {
            board: Board::new(),
            dock: Dock::new(),
            score: ComboScorer::new(),
            state: GameState::Idle,
            last_move: None,
            drag: Drag::Idle,
            generator,
            mapper,
            clear_delay,
            pending_clear: None,
            sounds: Vec::new(),
        }
    }

    pub fn drag(&self) -> Drag {
        self.drag
    }

    pub fn mapper(&self) -> &PointerMapper {
        &self.mapper
    }

    /// Update board geometry, e.g. after a terminal resize
    pub fn set_mapper(&mut self, mapper: PointerMapper) {
        self.mapper = mapper;
    }

    /// Lines shown as about to clear
    pub fn pending_lines(&self) -> Option<&LineClear> {
        self.pending_clear.as_ref().map(|p| &p.lines)
    }

    /// Start a session, spending one play credit
    pub fn start(&mut self, credits: &mut impl PlayCredits) -> Result<(), StartError> {
        if self.state != GameState::Idle {
            return Err(StartError::AlreadyRunning);
        }
        if credits.remaining_credits() == 0 {
            info!("Session refused: no play credits left");
            return Err(StartError::NoCredits);
        }
        credits.spend_credit();

        self.reset();
        self.dock = Dock::from_shapes(self.generator.generate_triple());
        self.state = GameState::Active(Phase::AwaitingInput);
        info!(credits_left = credits.remaining_credits(), "Session started");

        self.check_game_over();
        Ok(())
    }

    fn reset(&mut self) {
        self.board = Board::new();
        self.dock = Dock::new();
        self.score = ComboScorer::new();
        self.last_move = None;
        self.drag = Drag::Idle;
        self.pending_clear = None;
        self.sounds.clear();
    }

    /// Pick up the shape in a dock slot. Only one drag at a time.
    pub fn grab(&mut self, slot: usize, pointer: Point) -> bool {
        if self.state != GameState::Active(Phase::AwaitingInput) || self.dock.get(slot).is_none() {
            return false;
        }
        self.drag = Drag::Dragging { slot, pointer };
        self.state = GameState::Active(Phase::Dragging);
        true
    }

    pub fn drag_to(&mut self, pointer: Point) {
        if let Drag::Dragging { pointer: current, .. } = &mut self.drag {
            *current = pointer;
        }
    }

    /// Shape being dragged and where the pointer is
    pub fn dragged(&self) -> Option<(&Shape, Point)> {
        match self.drag {
            Drag::Dragging { slot, pointer } => self.dock.get(slot).map(|shape| (shape, pointer)),
            Drag::Idle => None,
        }
    }

    /// Where the dragged shape would land, if it fits
    pub fn ghost(&self) -> Option<Ghost<'_>> {
        let (shape, pointer) = self.dragged()?;
        let origin = self.mapper.resolve(&self.board, &shape.matrix, pointer)?;
        Some(Ghost { origin, shape })
    }

    /// Put the dragged shape back in its slot
    pub fn cancel_drag(&mut self) {
        if matches!(self.drag, Drag::Dragging { .. }) {
            self.drag = Drag::Idle;
            self.state = GameState::Active(Phase::AwaitingInput);
        }
    }

    /// Drop the dragged shape at the pointer
    pub fn release(&mut self, pointer: Point, now: Instant) -> DropOutcome {
        let Drag::Dragging { slot, .. } = self.drag else {
            return DropOutcome::NotDragging;
        };
        self.drag = Drag::Idle;
        self.state = GameState::Active(Phase::AwaitingInput);

        let target = self
            .dock
            .get(slot)
            .and_then(|shape| self.mapper.resolve(&self.board, &shape.matrix, pointer));
        let Some(origin) = target else {
            debug!(slot, ?pointer, "Drop rejected");
            self.sounds.push(SoundEvent::Reject);
            return DropOutcome::Rejected;
        };
        let Some(shape) = self.dock.take(slot) else {
            return DropOutcome::Rejected;
        };

        self.state = GameState::Active(Phase::ResolvingPlacement);
        let (board, cells) = self.board.place(&shape, origin.row, origin.col);
        self.board = board;
        self.sounds.push(SoundEvent::Place);

        let lines = self.board.full_lines();
        let count = lines.count();
        debug!(
            shape = shape.id,
            kind = ?shape.kind,
            row = origin.row,
            col = origin.col,
            cells,
            rows = ?lines.rows,
            cols = ?lines.cols,
            "Placed shape"
        );

        if lines.is_empty() {
            self.resolve_move(cells, 0);
        } else {
            self.pending_clear = Some(PendingClear {
                lines,
                cells_placed: cells,
                deadline: now + self.clear_delay,
            });
            self.state = GameState::Active(Phase::ResolvingClearDelay);
        }

        DropOutcome::Placed {
            origin,
            cells,
            lines: count,
        }
    }

    /// Apply a pending clear once its deadline has passed (call every frame)
    pub fn update(&mut self, now: Instant) {
        if self.state != GameState::Active(Phase::ResolvingClearDelay) {
            return;
        }
        if !self.pending_clear.as_ref().is_some_and(|p| now >= p.deadline) {
            return;
        }
        let Some(pending) = self.pending_clear.take() else {
            return;
        };

        self.board = self.board.clear(&pending.lines);
        self.resolve_move(pending.cells_placed, pending.lines.count());
    }

    /// Score the move, refill the dock, and check for game over
    fn resolve_move(&mut self, cells: usize, lines: usize) {
        let mv = self.score.score_move(cells, lines);
        if lines > 0 {
            self.sounds.push(SoundEvent::Clear { lines });
            if mv.multiplier > 1 {
                self.sounds.push(SoundEvent::Combo {
                    multiplier: mv.multiplier,
                });
            }
        }
        debug!(cells = mv.cells_placed, points = mv.points, multiplier = mv.multiplier, total = self.score.points, "Move scored");
        self.last_move = Some(mv);

        if self.dock.refill_if_empty(&mut self.generator) {
            debug!("Dock refilled");
        }
        self.state = GameState::Active(Phase::AwaitingInput);
        self.check_game_over();
    }

    fn check_game_over(&mut self) {
        if is_game_over(&self.board, &self.dock) {
            info!(
                score = self.score.points,
                lines = self.score.lines,
                filled = self.board.filled_count(),
                "Game over"
            );
            self.state = GameState::GameOver;
            self.sounds.push(SoundEvent::GameOver);
        }
    }

    /// Hand the final score to the sink and go back to Idle.
    ///
    /// The session ends whether or not the submission succeeds. Returns None
    /// when the session is not over.
    pub fn finish(&mut self, sink: &mut impl ScoreSink, player_id: &str) -> Option<Result<u64, SubmitError>> {
        if self.state != GameState::GameOver {
            return None;
        }
        let score = self.score.points;
        let result = sink.submit_score(player_id, score);
        match &result {
            Ok(()) => info!(player_id, score, "Score submitted"),
            Err(e) => warn!(player_id, score, "Score submission failed: {}", e),
        }
        self.state = GameState::Idle;
        Some(result.map(|()| score))
    }

    /// Leave the session without submitting (back to menu)
    pub fn abandon(&mut self) {
        if self.state != GameState::Idle {
            info!(score = self.score.points, "Session abandoned");
        }
        self.pending_clear = None;
        self.drag = Drag::Idle;
        self.state = GameState::Idle;
    }

    /// Drain sound cues emitted since the last call
    pub fn take_sounds(&mut self) -> Vec<SoundEvent> {
        std::mem::take(&mut self.sounds)
    }
}
