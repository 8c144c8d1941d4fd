use anyhow::{Context, Result};
use neori_common::Vec2i;
use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::world::WorldGrid;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Fruit {
    Apple,
    Lemon,
    Amora,
}

impl Fruit {
    pub const ALL: [Fruit; 3] = [Fruit::Apple, Fruit::Lemon, Fruit::Amora];

    /// Relative spawn weight out of 10.
    pub const fn weight(self) -> u32 {
        match self {
            Fruit::Apple => 5,
            Fruit::Lemon => 3,
            Fruit::Amora => 2,
        }
    }

    /// Display color as RGB.
    pub const fn color(self) -> [u8; 3] {
        match self {
            Fruit::Apple => [0xe0, 0x3a, 0x3e],
            Fruit::Lemon => [0xf2, 0xd7, 0x4e],
            Fruit::Amora => [0x8e, 0x3b, 0xb8],
        }
    }
}

impl fmt::Display for Fruit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Apple => write!(f, "Apple"),
            Self::Lemon => write!(f, "Lemon"),
            Self::Amora => write!(f, "Amora"),
        }
    }
}

/// A fruit lying on one grid cell.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Food {
    pub pos: Vec2i,
    pub kind: Fruit,
}

impl Food {
    pub fn color(&self) -> [u8; 3] {
        self.kind.color()
    }
}

/// Produces food with kinds drawn from the fixed fruit weights.
#[derive(Debug, Clone)]
pub struct FoodSpawner {
    pool: WeightedIndex<u32>,
}

impl FoodSpawner {
    pub fn new() -> Result<Self> {
        let pool = WeightedIndex::new(Fruit::ALL.iter().map(|f| f.weight()))
            .context("Invalid fruit weights")?;
        Ok(Self { pool })
    }

    pub fn random_kind<R: Rng>(&self, rng: &mut R) -> Fruit {
        Fruit::ALL[self.pool.sample(rng)]
    }

    /// Food at `pos`; the kind is drawn from the weighted pool when omitted.
    pub fn spawn<R: Rng>(&self, rng: &mut R, pos: Vec2i, kind: Option<Fruit>) -> Food {
        Food { pos, kind: kind.unwrap_or_else(|| self.random_kind(rng)) }
    }

    /// One guaranteed apple, then a lemon and an amora on independent coin flips,
    /// all on random cells. Foods may share a cell.
    pub fn restock<R: Rng>(&self, rng: &mut R, world: &WorldGrid) -> Vec<Food> {
        let mut batch = Vec::with_capacity(3);
        let pos = world.random_cell(rng);
        batch.push(self.spawn(rng, pos, Some(Fruit::Apple)));
        for extra in [Fruit::Lemon, Fruit::Amora] {
            if rng.random_bool(0.5) {
                let pos = world.random_cell(rng);
                batch.push(self.spawn(rng, pos, Some(extra)));
            }
        }
        batch
    }
}
