use crate::cell::{Cell, CellCounts};
use crate::food::Food;
use crate::game::GameSession;
use neori_common::{SessionMode, Vec2i};
use serde::{Deserialize, Serialize};

/// What a presentation layer sees of the session after a tick.
#[derive(Debug, Clone, Serialize, Deserialize)] // Derive traits for easy saving/loading
pub struct Snapshot {
    pub tick: u64,
    /// Seconds of active play.
    pub time: f32,
    pub mode: SessionMode,
    pub score: u32,
    pub charge: f32,
    pub frozen: bool,
    pub paused: bool,
    /// Human-readable cause once the game is over.
    pub game_over: Option<String>,
    pub cols: usize,
    pub rows: usize,
    pub cell_counts: CellCounts,
    /// Tail to head.
    pub snake: Vec<Vec2i>,
    pub foods: Vec<Food>,
    pub spawn_points: Vec<Vec2i>,
    /// Row-major cell states; only filled in when requested since it dominates the size.
    pub cells: Option<Vec<Cell>>,
}

impl GameSession {
    pub fn snapshot(&self, include_cells: bool) -> Snapshot {
        let (cols, rows) = self.size();
        Snapshot {
            tick: self.tick_count(),
            time: self.elapsed(),
            mode: self.mode(),
            score: self.score(),
            charge: self.charge(),
            frozen: self.is_frozen(),
            paused: self.is_paused(),
            game_over: self.game_over().map(|cause| cause.to_string()),
            cols,
            rows,
            cell_counts: self.cell_counts(),
            snake: self.snake_body().collect(),
            foods: self.foods().to_vec(),
            spawn_points: self.spawn_points().to_vec(),
            cells: include_cells.then(|| self.state.world.cells().to_vec()),
        }
    }
}
