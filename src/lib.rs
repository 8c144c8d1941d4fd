//! Snake-vs-infection arcade core: a cellular automaton with timed world
//! events, a snake moving over it, and the per-tick rules tying them together.

pub mod cell;
pub mod food;
pub mod game;
pub mod grid;
pub mod snake;
pub mod snapshot;
pub mod timer;
pub mod world;

pub use cell::{Cell, CellCounts};
pub use food::{Food, FoodSpawner, Fruit};
pub use game::{GameEvents, GameOver, GameSession, GameState, Intent};
pub use snake::Snake;
pub use snapshot::Snapshot;
pub use timer::Timer;
pub use world::WorldGrid;
