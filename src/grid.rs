use crate::cell::Cell;

/// Tally of the up-to-8 cells surrounding a location, by state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NeighborCounts {
    by_state: [u8; Cell::COUNT],
}

impl NeighborCounts {
    #[inline(always)]
    pub fn of(&self, cell: Cell) -> u8 {
        self.by_state[cell.severity() as usize]
    }

    /// Neighbors that count towards density: every non-dead neighbor
    /// except in-flight spawn markers.
    #[inline(always)]
    pub fn qualifying(&self) -> u8 {
        self.of(Cell::Healthy) + self.of(Cell::Infected) + self.of(Cell::Immune)
    }

    #[inline(always)]
    fn add(&mut self, cell: Cell) {
        self.by_state[cell.severity() as usize] += 1;
    }
}

/// Counts the states in the 3x3 window around `(x, y)`, self excluded.
/// The window is clipped at the grid edges; `cells` is row-major `cols x rows`.
#[inline(always)]
pub fn neighbor_counts(cells: &[Cell], cols: usize, rows: usize, x: usize, y: usize) -> NeighborCounts {
    let mut counts = NeighborCounts::default();

    for dy in -1i64..=1 {
        for dx in -1i64..=1 {
            if dx == 0 && dy == 0 { continue; } // Don't count the cell itself

            let check_x = x as i64 + dx;
            let check_y = y as i64 + dy;

            // Check if neighbor is within bounds
            if check_x >= 0 && check_x < cols as i64 && check_y >= 0 && check_y < rows as i64 {
                let idx = check_y as usize * cols + check_x as usize;
                if let Some(&cell) = cells.get(idx) {
                    counts.add(cell);
                } else {
                    log::error!("Neighbor index {} out of bounds for a {}x{} buffer of {} cells.", idx, cols, rows, cells.len());
                }
            }
        }
    }
    counts
}

/// The state a newly born cell takes on, given its neighbors.
/// Infection spreads by contact; immunity only wins where no healthy cell contests it.
#[inline(always)]
pub fn mutation(counts: &NeighborCounts) -> Cell {
    let mut mutation = Cell::Healthy;
    if counts.of(Cell::Infected) > 0 {
        mutation = Cell::Infected;
    }
    if counts.of(Cell::Immune) > 0 && counts.of(Cell::Healthy) == 0 {
        mutation = Cell::Immune;
    }
    mutation
}

/// One automaton step for a single cell.
pub fn transition(cell: Cell, counts: &NeighborCounts) -> Cell {
    let neighbors = counts.qualifying();
    match cell {
        // Held until the flame timer promotes it
        Cell::SpawnImmune => cell,
        Cell::SpawnInfected if counts.of(Cell::Infected) > 0 => mutation(counts),
        // Birth
        Cell::Dead if neighbors == 3 => mutation(counts),
        // Under/overpopulation
        c if c.is_alive() && !(2..=3).contains(&neighbors) => Cell::Dead,
        c => c,
    }
}

/// Timer-driven conversions applied on top of the automaton rule.
///
/// Spawn markers are not promoted by their neighbors but by elapsed time,
/// and immunity wears off the same way.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimedPromotions {
    /// `SpawnImmune` -> `Immune`.
    pub spawn_immune_ready: bool,
    /// `Immune` -> `Healthy`.
    pub immunity_expired: bool,
    /// `SpawnInfected` -> `Infected`.
    pub wave_landed: bool,
}

impl TimedPromotions {
    /// The overriding state for `cell`, if any conversion applies to it.
    #[inline(always)]
    pub fn apply(&self, cell: Cell) -> Option<Cell> {
        match cell {
            Cell::SpawnImmune if self.spawn_immune_ready => Some(Cell::Immune),
            Cell::Immune if self.immunity_expired => Some(Cell::Healthy),
            Cell::SpawnInfected if self.wave_landed => Some(Cell::Infected),
            _ => None,
        }
    }
}
