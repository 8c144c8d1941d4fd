use serde::{Deserialize, Serialize};
use anyhow::Result;
use crate::sim_params::GameParams;
use std::path::Path;

// Pixel canvas and cell size; cols/rows are derived from these
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct GridConfig {
    pub width_px: u32,
    pub height_px: u32,
    pub cell_resolution_px: u32,
}

// Configuration for the headless driver's clock
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct TimingConfig {
    pub frame_dt_s: f32,
    pub total_time_s: f32,
    pub record_interval_s: f32,
}

/// Timer thresholds and stamp radii for the periodic world events.
/// Every field falls back to the stock game value when omitted.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct EventConfig {
    /// All food is cleared once the food timer reaches this.
    #[serde(default = "default_food_lifetime")]
    pub food_lifetime_s: f32,
    /// Minimum food-timer value before an empty board is restocked.
    #[serde(default = "default_food_respawn_delay")]
    pub food_respawn_delay_s: f32,
    /// Flame-timer value at which `SpawnImmune` markers become `Immune`.
    #[serde(default = "default_spawn_immune_delay")]
    pub spawn_immune_delay_s: f32,
    /// Flame-timer value at which `Immune` cells revert to `Healthy`.
    #[serde(default = "default_immune_lifetime")]
    pub immune_lifetime_s: f32,
    /// Infection-timer value at which wave spawn points are chosen.
    #[serde(default = "default_infection_dormant")]
    pub infection_dormant_s: f32,
    /// Infection-timer value at which the wave lands and the cycle restarts.
    #[serde(default = "default_infection_wave_end")]
    pub infection_wave_end_s: f32,
    /// Ring radius reached by a wave at `infection_wave_end_s`.
    #[serde(default = "default_wave_max_radius")]
    pub wave_max_radius: i32,
    /// Per-tick infected growth at or above which the infection timer stalls.
    #[serde(default = "default_infection_surge")]
    pub infection_surge_threshold: i64,
    /// The stall only applies while the infection timer is below this.
    #[serde(default = "default_infection_surge_window")]
    pub infection_surge_window_s: f32,
    #[serde(default = "default_freeze_duration")]
    pub freeze_duration_s: f32,
    #[serde(default = "default_lemon_burst_radius")]
    pub lemon_burst_radius: i32,
    #[serde(default = "default_charge_burst_radius")]
    pub charge_burst_radius: i32,
    /// Extra burst radius when a full charge is spent.
    #[serde(default = "default_full_charge_bonus")]
    pub full_charge_bonus_radius: i32,
    #[serde(default = "default_max_charge")]
    pub max_charge: f32,
    /// Attract mode re-seeds immunity when healthy cells drop below this.
    #[serde(default = "default_attract_healthy_floor")]
    pub attract_healthy_floor: usize,
}

impl Default for EventConfig {
    fn default() -> Self {
        EventConfig {
            food_lifetime_s: default_food_lifetime(),
            food_respawn_delay_s: default_food_respawn_delay(),
            spawn_immune_delay_s: default_spawn_immune_delay(),
            immune_lifetime_s: default_immune_lifetime(),
            infection_dormant_s: default_infection_dormant(),
            infection_wave_end_s: default_infection_wave_end(),
            wave_max_radius: default_wave_max_radius(),
            infection_surge_threshold: default_infection_surge(),
            infection_surge_window_s: default_infection_surge_window(),
            freeze_duration_s: default_freeze_duration(),
            lemon_burst_radius: default_lemon_burst_radius(),
            charge_burst_radius: default_charge_burst_radius(),
            full_charge_bonus_radius: default_full_charge_bonus(),
            max_charge: default_max_charge(),
            attract_healthy_floor: default_attract_healthy_floor(),
        }
    }
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionMode {
    /// A normal game: snake, food and terminal conditions are live.
    Play,
    /// Menu backdrop: only the automaton runs.
    Attract,
}

// Initial conditions for a session, loaded from config.toml
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct InitialConditions {
    /// Fixed RNG seed; a fresh OS seed is used when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Probability that a cell starts `Healthy`.
    #[serde(default = "default_initial_density")]
    pub initial_density: f32,
    /// Infected rings stamped at random spots before the first tick.
    #[serde(default)]
    pub initial_infections: u32,
    #[serde(default = "default_snake_length")]
    pub snake_length: u32,
    #[serde(default = "default_mode")]
    pub mode: SessionMode,
}

impl Default for InitialConditions {
    fn default() -> Self {
        InitialConditions {
            seed: None,
            initial_density: default_initial_density(),
            initial_infections: 0,
            snake_length: default_snake_length(),
            mode: default_mode(),
        }
    }
}

// Configuration for output settings, loaded from config.toml
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct OutputConfig {
    pub base_filename: String,
    pub save_stats: bool,
    #[serde(default)]
    pub save_timeline: bool,
    #[serde(default)]
    pub save_cells_in_snapshot: bool,
    pub format: Option<String>, // Output format: "json", "bincode", "messagepack"
}

// Main game configuration structure, loaded from config.toml.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct GameConfig {
    pub grid: GridConfig,
    pub timing: TimingConfig,
    #[serde(default)]
    pub events: EventConfig,
    #[serde(default)]
    pub initial_conditions: InitialConditions,
    pub output: OutputConfig,
}

impl GameConfig {
    /// Loads the game configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();

        let config_str = std::fs::read_to_string(path_ref)
            .map_err(|e| anyhow::anyhow!("Failed to read config file '{}': {}", path_ref.display(), e))?;
        Self::from_toml_str(&config_str)
            .map_err(|e| anyhow::anyhow!("Invalid config '{}': {}", path_ref.display(), e))
    }

    /// Parses and validates a configuration held in memory.
    pub fn from_toml_str(config_str: &str) -> Result<Self> {
        let config: GameConfig = toml::from_str(config_str)
            .map_err(|e| anyhow::anyhow!("Failed to parse TOML: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        // The derived grid must be non-empty
        GameParams::grid_dims(self.grid.width_px, self.grid.height_px, self.grid.cell_resolution_px)?;

        if self.timing.frame_dt_s <= 0.0 {
            anyhow::bail!("frame_dt_s must be positive.");
        }
        if !(0.0..=1.0).contains(&self.initial_conditions.initial_density) {
            anyhow::bail!("initial_density must lie in [0, 1].");
        }
        if self.initial_conditions.snake_length == 0 {
            anyhow::bail!("snake_length must be greater than 0.");
        }
        if self.events.infection_dormant_s >= self.events.infection_wave_end_s {
            anyhow::bail!("infection_dormant_s must be smaller than infection_wave_end_s.");
        }
        self.events.validate()
    }

    /// Converts the configuration into parameters used at runtime.
    pub fn get_game_params(&self) -> Result<GameParams> {
        GameParams::from_parts(
            self.grid.width_px,
            self.grid.height_px,
            self.grid.cell_resolution_px,
            self.events.clone(),
            self.initial_conditions.clone(),
        )
    }
}

/// Largest stamp radius accepted from a config file.
pub const MAX_STAMP_RADIUS: i32 = 4096;

impl EventConfig {
    /// Durations must be positive and radii within `0..=MAX_STAMP_RADIUS`.
    pub fn validate(&self) -> Result<()> {
        let durations = [
            ("food_lifetime_s", self.food_lifetime_s),
            ("food_respawn_delay_s", self.food_respawn_delay_s),
            ("spawn_immune_delay_s", self.spawn_immune_delay_s),
            ("immune_lifetime_s", self.immune_lifetime_s),
            ("infection_dormant_s", self.infection_dormant_s),
            ("infection_wave_end_s", self.infection_wave_end_s),
            ("infection_surge_window_s", self.infection_surge_window_s),
            ("freeze_duration_s", self.freeze_duration_s),
        ];
        for (name, value) in durations {
            if !(value > 0.0) {
                anyhow::bail!("{} must be positive, got {}.", name, value);
            }
        }

        let radii = [
            ("wave_max_radius", self.wave_max_radius),
            ("lemon_burst_radius", self.lemon_burst_radius),
            ("charge_burst_radius", self.charge_burst_radius),
            ("full_charge_bonus_radius", self.full_charge_bonus_radius),
        ];
        for (name, value) in radii {
            if !(0..=MAX_STAMP_RADIUS).contains(&value) {
                anyhow::bail!("{} must lie in [0, {}], got {}.", name, MAX_STAMP_RADIUS, value);
            }
        }
        if self.wave_max_radius < 1 {
            anyhow::bail!("wave_max_radius must be at least 1.");
        }
        if !(self.max_charge >= 1.0) {
            anyhow::bail!("max_charge must be at least 1, got {}.", self.max_charge);
        }
        Ok(())
    }
}

fn default_food_lifetime() -> f32 { 10.0 }
fn default_food_respawn_delay() -> f32 { 1.0 }
fn default_spawn_immune_delay() -> f32 { 0.2 }
fn default_immune_lifetime() -> f32 { 5.0 }
fn default_infection_dormant() -> f32 { 5.0 }
fn default_infection_wave_end() -> f32 { 9.0 }
fn default_wave_max_radius() -> i32 { 9 }
fn default_infection_surge() -> i64 { 10 }
fn default_infection_surge_window() -> f32 { 1.0 }
fn default_freeze_duration() -> f32 { 6.0 }
fn default_lemon_burst_radius() -> i32 { 6 }
fn default_charge_burst_radius() -> i32 { 8 }
fn default_full_charge_bonus() -> i32 { 4 }
fn default_max_charge() -> f32 { 3.0 }
fn default_attract_healthy_floor() -> usize { 12 }

fn default_initial_density() -> f32 { 0.5 }
fn default_snake_length() -> u32 { 5 }
fn default_mode() -> SessionMode { SessionMode::Play }
