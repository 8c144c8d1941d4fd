//! Cell states and per-state tallies.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Index;

/// State of one grid location.
///
/// Variants are listed in severity order. Use [`Cell::severity`] for numeric
/// comparisons instead of casting the enum.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Dead,
    Healthy,
    Infected,
    Immune,
    /// In-flight infection wave; becomes `Infected` when the wave lands.
    SpawnInfected,
    /// In-flight immunity burst; becomes `Immune` shortly after being stamped.
    SpawnImmune,
}

impl Cell {
    pub const COUNT: usize = 6;

    pub const ALL: [Cell; Cell::COUNT] = [
        Cell::Dead,
        Cell::Healthy,
        Cell::Infected,
        Cell::Immune,
        Cell::SpawnInfected,
        Cell::SpawnImmune,
    ];

    #[must_use]
    pub const fn severity(self) -> u8 {
        match self {
            Cell::Dead => 0,
            Cell::Healthy => 1,
            Cell::Infected => 2,
            Cell::Immune => 3,
            Cell::SpawnInfected => 4,
            Cell::SpawnImmune => 5,
        }
    }

    /// Inverse of [`Cell::severity`].
    #[must_use]
    pub const fn from_severity(value: u8) -> Option<Cell> {
        match value {
            0 => Some(Cell::Dead),
            1 => Some(Cell::Healthy),
            2 => Some(Cell::Infected),
            3 => Some(Cell::Immune),
            4 => Some(Cell::SpawnInfected),
            5 => Some(Cell::SpawnImmune),
            _ => None,
        }
    }

    /// Organic live states that take part in the birth/death rule.
    #[must_use]
    pub const fn is_alive(self) -> bool {
        matches!(self, Cell::Healthy | Cell::Infected | Cell::Immune)
    }

    #[must_use]
    pub const fn is_spawn_marker(self) -> bool {
        matches!(self, Cell::SpawnInfected | Cell::SpawnImmune)
    }
}

impl PartialOrd for Cell {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cell {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.severity().cmp(&other.severity())
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dead => write!(f, "Dead"),
            Self::Healthy => write!(f, "Healthy"),
            Self::Infected => write!(f, "Infected"),
            Self::Immune => write!(f, "Immune"),
            Self::SpawnInfected => write!(f, "SpawnInfected"),
            Self::SpawnImmune => write!(f, "SpawnImmune"),
        }
    }
}

/// Frequency table over the six cell states.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct CellCounts([usize; Cell::COUNT]);

impl CellCounts {
    pub fn tally<'a>(cells: impl IntoIterator<Item = &'a Cell>) -> Self {
        let mut counts = [0usize; Cell::COUNT];
        for cell in cells {
            counts[cell.severity() as usize] += 1;
        }
        Self(counts)
    }

    #[inline]
    pub fn get(&self, cell: Cell) -> usize {
        self.0[cell.severity() as usize]
    }

    pub fn infected(&self) -> usize { self.get(Cell::Infected) }
    pub fn healthy(&self) -> usize { self.get(Cell::Healthy) }
    pub fn immune(&self) -> usize { self.get(Cell::Immune) }

    pub fn total(&self) -> usize {
        self.0.iter().sum()
    }
}

impl Index<Cell> for CellCounts {
    type Output = usize;
    fn index(&self, cell: Cell) -> &usize {
        &self.0[cell.severity() as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_round_trips_for_every_state() {
        for cell in Cell::ALL {
            assert_eq!(Cell::from_severity(cell.severity()), Some(cell));
        }
        assert_eq!(Cell::from_severity(6), None);
    }

    #[test]
    fn ordering_follows_severity() {
        assert!(Cell::Dead < Cell::Healthy);
        assert!(Cell::Infected < Cell::Immune);
        assert!(Cell::SpawnInfected < Cell::SpawnImmune);
        assert_eq!(Cell::ALL.iter().max(), Some(&Cell::SpawnImmune));
    }

    #[test]
    fn spawn_markers_are_not_alive() {
        assert!(!Cell::Dead.is_alive());
        assert!(!Cell::SpawnInfected.is_alive());
        assert!(!Cell::SpawnImmune.is_alive());
        assert!(Cell::Healthy.is_alive() && Cell::Infected.is_alive() && Cell::Immune.is_alive());
    }

    #[test]
    fn tally_counts_each_state() {
        let cells = [Cell::Dead, Cell::Healthy, Cell::Healthy, Cell::Infected, Cell::SpawnImmune];
        let counts = CellCounts::tally(&cells);
        assert_eq!(counts.healthy(), 2);
        assert_eq!(counts.infected(), 1);
        assert_eq!(counts[Cell::SpawnImmune], 1);
        assert_eq!(counts[Cell::Immune], 0);
        assert_eq!(counts.total(), 5);
    }
}
