use anyhow::Result;
use serde::{Deserialize, Serialize};
use crate::config::{EventConfig, InitialConditions};

/// Game parameters derived from the configuration, read on every tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameParams {
    // Canvas & Grid
    pub width_px: u32,
    pub height_px: u32,
    pub cell_resolution_px: u32,
    pub cols: usize,
    pub rows: usize,

    // Event thresholds and radii
    pub events: EventConfig,

    // Session start
    pub initial: InitialConditions,
}

impl GameParams {
    /// Number of columns and rows a `width x height` canvas yields at `resolution`.
    /// Fails when the resolution is zero or the grid would be empty.
    pub fn grid_dims(width_px: u32, height_px: u32, resolution_px: u32) -> Result<(usize, usize)> {
        if resolution_px == 0 {
            anyhow::bail!("cell resolution must be positive.");
        }
        let cols = (width_px / resolution_px) as usize;
        let rows = (height_px / resolution_px) as usize;
        if cols == 0 || rows == 0 {
            anyhow::bail!(
                "a {}x{} canvas at resolution {} yields an empty {}x{} grid.",
                width_px, height_px, resolution_px, cols, rows
            );
        }
        Ok((cols, rows))
    }

    pub fn from_parts(
        width_px: u32,
        height_px: u32,
        cell_resolution_px: u32,
        events: EventConfig,
        initial: InitialConditions,
    ) -> Result<Self> {
        let (cols, rows) = Self::grid_dims(width_px, height_px, cell_resolution_px)?;
        Ok(Self { width_px, height_px, cell_resolution_px, cols, rows, events, initial })
    }

    /// Stock event settings on a canvas of the given size.
    pub fn for_grid(width_px: u32, height_px: u32, cell_resolution_px: u32) -> Result<Self> {
        Self::from_parts(width_px, height_px, cell_resolution_px, EventConfig::default(), InitialConditions::default())
    }

    /// Same event and start settings on a different canvas.
    pub fn resized(&self, width_px: u32, height_px: u32, cell_resolution_px: u32) -> Result<Self> {
        Self::from_parts(width_px, height_px, cell_resolution_px, self.events.clone(), self.initial.clone())
    }

    /// Ring radius of an infection wave at infection-timer value `t`.
    /// Grows linearly from 1 at the end of the dormant phase to `wave_max_radius` when the wave lands.
    pub fn wave_radius_at(&self, t: f32) -> i32 {
        let ev = &self.events;
        let span = ev.infection_wave_end_s - ev.infection_dormant_s;
        let percent = ((t - ev.infection_dormant_s) / span).clamp(0.0, 1.0);
        1 + (percent * (ev.wave_max_radius - 1) as f32).floor() as i32
    }
}
