use neori_common::Vec2i;
use std::collections::VecDeque;

/// Snake body stored tail-first, head-last. Never empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snake {
    body: VecDeque<Vec2i>,
    direction: Vec2i,
}

impl Snake {
    /// A standing snake of `length` segments stacked on `start`.
    /// The stacked segments unfold behind the head once it moves.
    pub fn new(start: Vec2i, length: usize) -> Self {
        let mut body = VecDeque::with_capacity(length.max(1));
        body.extend(std::iter::repeat(start).take(length.max(1)));
        Self { body, direction: Vec2i::ZERO }
    }

    pub fn head(&self) -> Vec2i {
        // The body always holds at least one segment
        self.body.back().copied().unwrap_or_default()
    }

    pub fn direction(&self) -> Vec2i {
        self.direction
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Segments from tail to head.
    pub fn body(&self) -> impl Iterator<Item = Vec2i> + '_ {
        self.body.iter().copied()
    }

    /// Every segment except the head.
    pub fn trailing(&self) -> impl Iterator<Item = Vec2i> + '_ {
        self.body.iter().take(self.body.len() - 1).copied()
    }

    /// Sets the direction for the next [`Snake::advance`].
    /// Returns `false` and keeps the current direction on a 180 degree reversal
    /// or on anything but a unit step or standstill.
    pub fn change_direction(&mut self, direction: Vec2i) -> bool {
        if !Vec2i::DIRECTIONS.contains(&direction) || direction == -self.direction {
            return false;
        }
        self.direction = direction;
        true
    }

    /// Drops the tail and appends `head + direction`.
    pub fn advance(&mut self) {
        let next = self.head() + self.direction;
        if self.body.len() > 1 {
            self.body.pop_front();
        } else {
            self.body.clear();
        }
        self.body.push_back(next);
    }

    /// Lengthens the body by duplicating the head.
    pub fn grow(&mut self) {
        let head = self.head();
        self.body.push_back(head);
    }

    /// True if the head shares a cell with any other segment.
    pub fn head_overlaps_body(&self) -> bool {
        let head = self.head();
        self.trailing().any(|part| part == head)
    }

    pub fn collides(&self, cell: Vec2i) -> bool {
        self.body.contains(&cell)
    }
}
