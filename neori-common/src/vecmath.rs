use serde::{Serialize, Deserialize};
use std::fmt;
use std::ops::{Add, Sub, Neg};

/// Integer 2D vector used for grid coordinates and snake directions.
/// Coordinates are signed so a head that steps off the map is still representable.
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Vec2i {
    pub x: i32,
    pub y: i32,
}

impl Vec2i {
    pub const ZERO: Vec2i = Vec2i { x: 0, y: 0 };
    pub const LEFT: Vec2i = Vec2i { x: -1, y: 0 };
    pub const RIGHT: Vec2i = Vec2i { x: 1, y: 0 };
    pub const UP: Vec2i = Vec2i { x: 0, y: -1 };
    pub const DOWN: Vec2i = Vec2i { x: 0, y: 1 };

    /// The four movement directions plus standing still.
    pub const DIRECTIONS: [Vec2i; 5] = [Self::LEFT, Self::RIGHT, Self::UP, Self::DOWN, Self::ZERO];

    #[inline(always)]
    pub const fn new(x: i32, y: i32) -> Self { Self { x, y } }

    #[inline(always)]
    pub fn is_zero(self) -> bool { self.x == 0 && self.y == 0 }

    #[inline(always)]
    pub fn distance_squared(self, other: Self) -> i32 {
        let dx = self.x - other.x; let dy = self.y - other.y; dx * dx + dy * dy
    }

    #[inline(always)]
    pub fn manhattan(self, other: Self) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// True if `self` lies inside `[0, cols) x [0, rows)`.
    #[inline(always)]
    pub fn in_bounds(self, cols: usize, rows: usize) -> bool {
        self.x >= 0 && (self.x as usize) < cols && self.y >= 0 && (self.y as usize) < rows
    }
}

impl Add for Vec2i {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self { x: self.x + other.x, y: self.y + other.y }
    }
}

impl Sub for Vec2i {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self { x: self.x - other.x, y: self.y - other.y }
    }
}

impl Neg for Vec2i {
    type Output = Self;
    fn neg(self) -> Self {
        Self { x: -self.x, y: -self.y }
    }
}

impl From<(i32, i32)> for Vec2i {
    fn from((x, y): (i32, i32)) -> Self { Self::new(x, y) }
}

impl fmt::Display for Vec2i {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Clamps a value between a minimum and maximum.
#[inline(always)]
pub fn clamp(val: f32, min: f32, max: f32) -> f32 { val.max(min).min(max) }
