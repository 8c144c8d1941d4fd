use anyhow::Result;
use clap::Parser;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;
use log::{info, warn, error, debug, trace};

use neori_common::{GameConfig, Vec2i};
use neori_engine::{Cell, GameSession, Intent, Snapshot};

/// Headless driver: runs a session at a fixed frame rate and records snapshots.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Path to the TOML configuration.
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Run this many ticks instead of `timing.total_time_s / timing.frame_dt_s`.
    #[arg(short, long)]
    ticks: Option<u32>,

    /// Steer the snake greedily towards the nearest food.
    #[arg(long)]
    autopilot: bool,

    /// Override `initial_conditions.seed`.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    // Initialize the logger
    env_logger::init();
    let args = Args::parse();

    info!("Starting Neori headless session...");

    // --- Load Configuration ---
    let mut config = GameConfig::load(&args.config)?;
    if let Some(seed) = args.seed {
        config.initial_conditions.seed = Some(seed);
    }

    // --- Initialize Session ---
    let params = config.get_game_params()?;
    debug!("Game Parameters: {:#?}", params);
    let mut session = GameSession::new(params)?;

    let dt = config.timing.frame_dt_s;
    let total_ticks = args
        .ticks
        .unwrap_or_else(|| (config.timing.total_time_s / dt).ceil() as u32);
    let mut record_interval_ticks = (config.timing.record_interval_s.max(0.0) / dt).round() as u32;
    if record_interval_ticks == 0 {
        warn!("Record interval ({:.3} s) is smaller than the frame time ({:.3} s). Recording every tick.",
            config.timing.record_interval_s, dt);
        record_interval_ticks = 1;
    }
    info!("Running {} ticks of {:.3} s, recording every {} ticks.", total_ticks, dt, record_interval_ticks);

    let include_cells = config.output.save_cells_in_snapshot;
    let mut snapshots: Vec<Snapshot> = vec![session.snapshot(include_cells)];
    let start_time = Instant::now();

    for tick in 0..total_ticks {
        if args.autopilot {
            if let Some(direction) = autopilot(&session) {
                session.apply(Intent::ChangeDirection(direction))?;
            }
            if session.charge() >= 1.0 && near_infection(&session) {
                session.apply(Intent::UseCharge)?;
            }
        }

        session.tick(dt);

        let is_record_tick = (tick + 1) % record_interval_ticks == 0;
        let is_over = session.game_over().is_some();
        if is_record_tick || is_over || tick + 1 == total_ticks {
            let counts = session.cell_counts();
            info!(
                "Tick [{}/{}] ({:.1} s) | Score: {} | Charge: {:.2} | Infected: {} | Healthy: {} | Foods: {}",
                tick + 1,
                total_ticks,
                session.elapsed(),
                session.score(),
                session.charge(),
                counts.infected(),
                counts.healthy(),
                session.foods().len(),
            );
            snapshots.push(session.snapshot(include_cells));
        } else {
            trace!("Tick [{}/{}] done", tick + 1, total_ticks);
        }

        if let Some(cause) = session.game_over() {
            info!("Session ended after {} ticks: {}.", tick + 1, cause);
            break;
        }
    }

    info!(
        "Finished in {:.3} seconds of wall time; final score {}.",
        start_time.elapsed().as_secs_f64(),
        session.score()
    );

    // --- Save Recorded Data ---
    if config.output.save_stats {
        save_snapshots(&config, &snapshots);
    } else {
        info!("Skipping saving snapshots as per config (save_stats is false).");
    }

    if config.output.save_timeline {
        let filename = format!("{}_timeline.csv", config.output.base_filename);
        match csv::Writer::from_path(&filename) {
            Ok(mut writer) => {
                writer.write_record(["tick", "time_s", "score", "charge", "infected", "healthy", "immune"])?;
                for snap in &snapshots {
                    writer.write_record(&[
                        snap.tick.to_string(),
                        format!("{:.3}", snap.time),
                        snap.score.to_string(),
                        format!("{:.2}", snap.charge),
                        snap.cell_counts.infected().to_string(),
                        snap.cell_counts.healthy().to_string(),
                        snap.cell_counts.immune().to_string(),
                    ])?;
                }
                writer.flush()?;
                info!("Timeline saved to {}", filename);
            }
            Err(e) => error!("Error creating timeline file '{}': {}", filename, e),
        }
    }

    info!("Session Complete.");
    Ok(())
}

fn save_snapshots(config: &GameConfig, snapshots: &[Snapshot]) {
    let base = &config.output.base_filename;
    let output_format = config.output.format.as_deref().unwrap_or("json");

    match output_format {
        "bincode" => {
            let filename = format!("{}_snapshots.bin", base);
            match File::create(&filename) {
                Ok(file) => match bincode::serialize_into(file, snapshots) {
                    Ok(_) => info!("All snapshots saved to {} (binary format)", filename),
                    Err(e) => error!("Error serializing snapshots to bincode: {}", e),
                },
                Err(e) => error!("Error creating snapshot file '{}': {}", filename, e),
            }
        }
        "messagepack" => {
            let filename = format!("{}_snapshots.msgpack", base);
            match &mut File::create(&filename) {
                Ok(file) => match rmp_serde::encode::write(file, snapshots) {
                    Ok(_) => info!("All snapshots saved to {} (MessagePack format)", filename),
                    Err(e) => error!("Error serializing snapshots to MessagePack: {}", e),
                },
                Err(e) => error!("Error creating snapshot file '{}': {}", filename, e),
            }
        }
        other => {
            if other != "json" {
                error!("Unknown output format: {}. Using JSON instead.", other);
            }
            let filename = format!("{}_snapshots.json", base);
            match File::create(&filename) {
                Ok(mut file) => match serde_json::to_string(snapshots) {
                    Ok(json_string) => {
                        if let Err(e) = file.write_all(json_string.as_bytes()) {
                            error!("Error writing snapshot JSON to file '{}': {}", filename, e);
                        } else {
                            info!("All snapshots saved to {}", filename);
                        }
                    }
                    Err(e) => error!("Error serializing snapshots to JSON: {}", e),
                },
                Err(e) => error!("Error creating snapshot file '{}': {}", filename, e),
            }
        }
    }
}

/// Direction that brings the head closer to the nearest food without
/// reversing or leaving the map. `None` keeps the current heading.
fn autopilot(session: &GameSession) -> Option<Vec2i> {
    let head = session.state.snake.head();
    let current = session.state.snake.direction();
    let target = session
        .foods()
        .iter()
        .min_by_key(|food| food.pos.manhattan(head))?
        .pos;

    [Vec2i::LEFT, Vec2i::RIGHT, Vec2i::UP, Vec2i::DOWN]
        .into_iter()
        .filter(|&dir| dir != -current)
        .filter(|&dir| session.state.world.in_bounds(head + dir))
        .filter(|&dir| !session.state.snake.trailing().any(|part| part == head + dir))
        .min_by_key(|&dir| (head + dir).manhattan(target))
}

fn near_infection(session: &GameSession) -> bool {
    let head = session.state.snake.head();
    (-3..=3).any(|dx| {
        (-3..=3).any(|dy| session.state.world.get(head + Vec2i::new(dx, dy)) == Some(Cell::Infected))
    })
}
