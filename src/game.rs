use crate::cell::{Cell, CellCounts};
use crate::food::{Food, FoodSpawner, Fruit};
use crate::grid::TimedPromotions;
use crate::snake::Snake;
use crate::timer::Timer;
use crate::world::WorldGrid;
use anyhow::Result;
use log::{info, debug, trace};
use neori_common::{clamp, GameParams, SessionMode, Vec2i};
use rand::prelude::*;
use rand::rngs::StdRng;
use std::fmt;

// Eating an infected cell from under the head
const CLEANSE_RADIUS: i32 = 2;
const CLEANSE_SCORE: u32 = 1;
const CLEANSE_CHARGE: f32 = 0.10;
const FROZEN_CLEANSE_SCORE: u32 = 2;
const FROZEN_CLEANSE_CHARGE: f32 = 0.20;

/// Awarded when the last infected cell disappears.
const INFECTION_CLEARED_BONUS: u32 = 10;

/// Immunity ring used by attract mode to keep the backdrop alive.
const ATTRACT_RING_RADIUS: i32 = 8;
const ATTRACT_RING_THICKNESS: i32 = 2;

const MAX_WAVE_SPAWNS: usize = 3;

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum GameOver {
    LeftMap,
    SelfCollision,
    InfectionWon,
}

impl fmt::Display for GameOver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LeftMap => write!(f, "left the map"),
            Self::SelfCollision => write!(f, "self-collision"),
            Self::InfectionWon => write!(f, "infection won"),
        }
    }
}

/// Discrete player and shell requests fed to [`GameSession::apply`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intent {
    ChangeDirection(Vec2i),
    UseCharge,
    TogglePause,
    /// Fresh session on a new canvas, same mode.
    ResetSession { width_px: u32, height_px: u32, resolution_px: u32 },
    /// Fresh play session on the current canvas.
    StartGame,
    /// Fresh attract-mode session on the current canvas.
    ReturnToMenu,
}

/// The four world-event timers. Owned per session.
#[derive(Debug, Clone, Default)]
pub struct GameEvents {
    /// Food lifecycle cadence.
    pub food: Timer,
    /// Immunity bursts: promotion of spawn markers and expiry of immunity.
    pub flames: Timer,
    /// Infection wave cycle.
    pub infection: Timer,
    /// Length of the freeze effect.
    pub frozen: Timer,
}

/// Everything one session mutates. Replaced wholesale on restart.
#[derive(Debug, Clone)]
pub struct GameState {
    pub world: WorldGrid,
    pub snake: Snake,
    pub foods: Vec<Food>,
    pub score: u32,
    pub charge: f32,
    /// Infected count seen at the end of the last world phase.
    pub infections: usize,
    pub frozen: bool,
    pub paused: bool,
    pub game_over: Option<GameOver>,
    /// Centers of the infection wave in progress.
    pub spawns: Vec<Vec2i>,
}

impl GameState {
    /// Randomly populated world with the snake standing on a random cell.
    pub fn new(params: &GameParams, rng: &mut StdRng) -> Result<Self> {
        let mut world = WorldGrid::new(params.width_px, params.height_px, params.cell_resolution_px)?;
        world.populate(rng, params.initial.initial_density);
        for _ in 0..params.initial.initial_infections {
            let center = world.infect(rng, None);
            debug!("Seeded infection ring at {}.", center);
        }
        let snake = Snake::new(world.random_cell(rng), params.initial.snake_length as usize);

        Ok(Self {
            world,
            snake,
            foods: Vec::new(),
            score: 0,
            charge: 0.0,
            infections: 0,
            frozen: false,
            paused: false,
            game_over: None,
            spawns: Vec::new(),
        })
    }
}

/// Per-tick controller tying the world, the snake and the food together.
pub struct GameSession {
    params: GameParams,
    mode: SessionMode,
    /// Mutable game state, exposed for inspection and scripted setups.
    pub state: GameState,
    pub events: GameEvents,
    /// Elapsed play time.
    clock: Timer,
    spawner: FoodSpawner,
    /// Source of every random choice in the session.
    pub rng: StdRng,
    tick_count: u64,
}

impl GameSession {
    /// Creates a session seeded from `params.initial.seed`, or from the OS when unset.
    pub fn new(params: GameParams) -> Result<Self> {
        let rng = match params.initial.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::with_rng(params, rng)
    }

    pub fn with_rng(params: GameParams, mut rng: StdRng) -> Result<Self> {
        let mode = params.initial.mode;
        let state = GameState::new(&params, &mut rng)?;
        info!(
            "New {:?} session on a {}x{} grid (snake at {}).",
            mode, params.cols, params.rows, state.snake.head()
        );
        Ok(Self {
            params,
            mode,
            state,
            events: GameEvents::default(),
            clock: Timer::new(),
            spawner: FoodSpawner::new()?,
            rng,
            tick_count: 0,
        })
    }

    // --- Read-only query surface ---

    pub fn params(&self) -> &GameParams { &self.params }
    pub fn mode(&self) -> SessionMode { self.mode }
    pub fn size(&self) -> (usize, usize) { self.state.world.size() }
    pub fn cells(&self) -> impl Iterator<Item = (Vec2i, Cell)> + '_ { self.state.world.iter() }
    pub fn cell_counts(&self) -> CellCounts { self.state.world.cell_counts() }
    pub fn snake_body(&self) -> impl Iterator<Item = Vec2i> + '_ { self.state.snake.body() }
    pub fn foods(&self) -> &[Food] { &self.state.foods }
    pub fn score(&self) -> u32 { self.state.score }
    pub fn charge(&self) -> f32 { self.state.charge }
    pub fn is_frozen(&self) -> bool { self.state.frozen }
    pub fn is_paused(&self) -> bool { self.state.paused }
    pub fn game_over(&self) -> Option<GameOver> { self.state.game_over }
    pub fn spawn_points(&self) -> &[Vec2i] { &self.state.spawns }
    /// Seconds of active play so far.
    pub fn elapsed(&self) -> f32 { self.clock.time() }
    pub fn tick_count(&self) -> u64 { self.tick_count }

    /// Neither paused nor over.
    pub fn is_active(&self) -> bool {
        !self.state.paused && self.state.game_over.is_none()
    }

    /// Current ring radius of the wave in progress, if it is growing.
    pub fn wave_radius(&self) -> Option<i32> {
        let t = self.events.infection.time();
        let ev = &self.params.events;
        let growing = !self.state.spawns.is_empty()
            && t >= ev.infection_dormant_s
            && t < ev.infection_wave_end_s;
        growing.then(|| self.params.wave_radius_at(t))
    }

    // --- Intents ---

    pub fn apply(&mut self, intent: Intent) -> Result<()> {
        match intent {
            Intent::ChangeDirection(direction) => {
                self.change_direction(direction);
            }
            Intent::UseCharge => {
                self.use_charge();
            }
            Intent::TogglePause => self.toggle_pause(),
            Intent::ResetSession { width_px, height_px, resolution_px } => {
                self.reset(width_px, height_px, resolution_px)?
            }
            Intent::StartGame => self.restart(self.params.clone(), SessionMode::Play)?,
            Intent::ReturnToMenu => self.restart(self.params.clone(), SessionMode::Attract)?,
        }
        Ok(())
    }

    /// Steers the snake; 180 degree reversals and non-unit steps are ignored.
    pub fn change_direction(&mut self, direction: Vec2i) -> bool {
        if self.state.game_over.is_some() {
            return false;
        }
        self.state.snake.change_direction(direction)
    }

    pub fn toggle_pause(&mut self) {
        if self.state.game_over.is_none() {
            self.state.paused = !self.state.paused;
            debug!("Session {}.", if self.state.paused { "paused" } else { "resumed" });
        }
    }

    /// Spends charge on an immunity burst around the snake head.
    /// A full charge is spent entirely for a wider burst.
    pub fn use_charge(&mut self) -> bool {
        if self.mode != SessionMode::Play || !self.is_active() || self.state.charge < 1.0 {
            return false;
        }
        let ev = &self.params.events;
        let mut strength = ev.charge_burst_radius;
        if self.state.charge >= ev.max_charge {
            self.state.charge = 0.0;
            strength += ev.full_charge_bonus_radius;
        } else {
            self.state.charge -= 1.0;
        }
        let head = self.state.snake.head();
        self.state.world.set_circular_region(head, Cell::SpawnImmune, strength);
        self.events.flames.reset();
        debug!("Immunity burst of radius {} at {} (charge left {:.2}).", strength, head, self.state.charge);
        true
    }

    /// Starts over on a new canvas. Fails without touching the session when the canvas yields an empty grid.
    pub fn reset(&mut self, width_px: u32, height_px: u32, resolution_px: u32) -> Result<()> {
        let params = self.params.resized(width_px, height_px, resolution_px)?;
        self.restart(params, self.mode)
    }

    fn restart(&mut self, params: GameParams, mode: SessionMode) -> Result<()> {
        let state = GameState::new(&params, &mut self.rng)?;
        info!("Restarting as a {:?} session on a {}x{} grid.", mode, params.cols, params.rows);
        self.params = params;
        self.mode = mode;
        self.state = state;
        self.events = GameEvents::default();
        self.clock = Timer::new();
        self.tick_count = 0;
        Ok(())
    }

    // --- Tick ---

    /// Advances the session by one frame of `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        if !self.is_active() {
            return;
        }
        let dt = dt.max(0.0);
        self.clock.update(dt);
        self.tick_count += 1;
        self.advance_timers(dt);

        if self.mode == SessionMode::Play {
            self.update_snake();
            if self.state.game_over.is_some() {
                return;
            }
            self.update_foods();
        }

        if !self.state.frozen {
            self.update_world();
        } else if self.events.frozen.elapsed(self.params.events.freeze_duration_s) {
            self.state.frozen = false;
            self.events.frozen.stop();
            debug!("Freeze over at t={:.2}s.", self.clock.time());
        }

        trace!(
            "Tick {} | score {} | charge {:.2} | infected {} | foods {}",
            self.tick_count, self.state.score, self.state.charge, self.state.infections, self.state.foods.len()
        );
    }

    fn advance_timers(&mut self, dt: f32) {
        self.events.frozen.update(dt);
        if !self.state.frozen {
            self.events.food.update(dt);
            self.events.flames.update(dt);
            self.events.infection.update(dt);
        }
    }

    fn finish(&mut self, cause: GameOver) {
        if self.state.game_over.is_none() {
            info!(
                "Game over: {} (score {}, {:.1}s, tick {}).",
                cause, self.state.score, self.clock.time(), self.tick_count
            );
            self.state.game_over = Some(cause);
        }
    }

    fn update_snake(&mut self) {
        let max_charge = self.params.events.max_charge;
        let GameState { world, snake, score, charge, frozen, .. } = &mut self.state;

        let previous_head = snake.head();
        let under_head = world.get(previous_head);
        snake.advance();

        // The snake eats the infection it was standing on
        if under_head == Some(Cell::Infected) {
            if *frozen {
                world.set_cell(previous_head, Cell::Dead);
                *charge += FROZEN_CLEANSE_CHARGE;
                *score += FROZEN_CLEANSE_SCORE;
            } else {
                world.set_square_region(previous_head, Cell::Dead, CLEANSE_RADIUS);
                *charge += CLEANSE_CHARGE;
                *score += CLEANSE_SCORE;
            }
        }
        *charge = clamp(*charge, 0.0, max_charge);

        let head = snake.head();
        let mut outcome = None;
        if !world.in_bounds(head) {
            outcome = Some(GameOver::LeftMap);
        }

        if !snake.direction().is_zero() {
            for part in snake.trailing() {
                if world.get(part) == Some(Cell::Infected) {
                    world.set_cell(part, Cell::Dead);
                }
            }
            if snake.head_overlaps_body() {
                outcome = outcome.or(Some(GameOver::SelfCollision));
            }
        }

        if let Some(cause) = outcome {
            self.finish(cause);
        }
    }

    fn update_foods(&mut self) {
        let ev = &self.params.events;

        if self.events.food.elapsed(ev.food_lifetime_s) {
            if !self.state.foods.is_empty() {
                debug!("{} uneaten food expired.", self.state.foods.len());
            }
            self.state.foods.clear();
            self.events.food.reset();
        }

        if self.state.foods.is_empty() && self.events.food.elapsed(ev.food_respawn_delay_s) {
            self.state.foods = self.spawner.restock(&mut self.rng, &self.state.world);
            self.events.food.reset();
            debug!("Restocked {} food.", self.state.foods.len());
        }

        // Mark and filter: every food is checked exactly once per tick
        let head = self.state.snake.head();
        let world = &self.state.world;
        let mut eaten = Vec::new();
        self.state.foods.retain(|food| {
            if world.get(food.pos) == Some(Cell::Infected) {
                return false;
            }
            if food.pos == head {
                eaten.push(*food);
                return false;
            }
            true
        });

        for food in eaten {
            self.consume(food);
        }
        self.state.charge = clamp(self.state.charge, 0.0, self.params.events.max_charge);
    }

    fn consume(&mut self, food: Food) {
        debug!("Ate {} at {}.", food.kind, food.pos);
        let state = &mut self.state;
        match food.kind {
            Fruit::Apple => {
                state.snake.grow();
                state.score += 4;
                state.charge += 0.15;
            }
            Fruit::Lemon => {
                state.snake.grow();
                state.score += 2;
                state.charge += 0.25;
                state.world.set_circular_region(food.pos, Cell::SpawnImmune, self.params.events.lemon_burst_radius);
                self.events.flames.reset();
            }
            Fruit::Amora => {
                state.score += 2;
                state.frozen = true;
                self.events.frozen.reset();
                self.events.frozen.resume();
            }
        }
    }

    fn update_world(&mut self) {
        let ev = self.params.events.clone();
        let promotions = TimedPromotions {
            spawn_immune_ready: self.events.flames.elapsed(ev.spawn_immune_delay_s),
            immunity_expired: self.events.flames.elapsed(ev.immune_lifetime_s),
            wave_landed: self.events.infection.elapsed(ev.infection_wave_end_s),
        };
        let counts = self.state.world.step(promotions);
        let infections = counts.infected();

        if infections == 0 && self.state.infections > 0 {
            self.state.score += INFECTION_CLEARED_BONUS;
            debug!("Infection cleared, +{}.", INFECTION_CLEARED_BONUS);
        }

        match self.mode {
            SessionMode::Play => {
                if infections > 0 && counts.healthy() + counts.immune() == 0 {
                    self.finish(GameOver::InfectionWon);
                }
            }
            SessionMode::Attract => {
                if counts.healthy() < ev.attract_healthy_floor && self.events.flames.elapsed(ev.immune_lifetime_s) {
                    self.events.flames.reset();
                    let center = self.state.world.random_cell(&mut self.rng);
                    self.state.world.set_circular_ring(center, Cell::SpawnImmune, ATTRACT_RING_RADIUS, ATTRACT_RING_THICKNESS);
                }
            }
        }

        // A surging infection holds the next wave back
        let growth = infections as i64 - self.state.infections as i64;
        if growth < ev.infection_surge_threshold {
            self.events.infection.resume();
        } else if !self.events.infection.elapsed(ev.infection_surge_window_s) {
            self.events.infection.stop();
            self.state.spawns.clear();
        }

        if self.events.infection.elapsed(ev.infection_wave_end_s) {
            self.events.infection.reset();
            if !self.state.spawns.is_empty() {
                debug!("Infection wave landed at {:?}.", self.state.spawns);
            }
            self.state.spawns.clear();
        } else if self.events.infection.elapsed(ev.infection_dormant_s) {
            if self.state.spawns.is_empty() {
                let n = self.rng.random_range(1..=MAX_WAVE_SPAWNS);
                for _ in 0..n {
                    let spawn = self.state.world.random_cell(&mut self.rng);
                    self.state.spawns.push(spawn);
                }
                debug!("Infection wave incoming at {:?}.", self.state.spawns);
            } else {
                let radius = self.params.wave_radius_at(self.events.infection.time());
                for &spawn in &self.state.spawns {
                    self.state.world.set_circular_ring(spawn, Cell::SpawnInfected, radius, 1);
                }
            }
        }

        self.state.infections = infections;
    }
}
