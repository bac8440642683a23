// SPDX-License-Identifier: MIT OR Apache-2.0

//! Swipe gesture to move direction mapping

use crate::Direction;

/// Minimum displacement, in input units, for a swipe to count
pub const DEFAULT_SWIPE_THRESHOLD: f32 = 100.0;

/// Displacement between the start and end of a drag.
/// Screen convention: positive `dy` points down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Swipe {
    pub dx: f32,
    pub dy: f32,
}

impl Swipe {
    pub fn new(dx: f32, dy: f32) -> Self {
        Self { dx, dy }
    }

    /// Build from start and end points
    pub fn between(start: (f32, f32), end: (f32, f32)) -> Self {
        Self::new(end.0 - start.0, end.1 - start.1)
    }
}

/// Map a swipe to a direction along its dominant axis.
///
/// The horizontal axis wins only when strictly larger; the displacement along
/// the winning axis must exceed `threshold` or nothing is returned.
pub fn swipe_direction(swipe: Swipe, threshold: f32) -> Option<Direction> {
    if swipe.dx.abs() > swipe.dy.abs() {
        if swipe.dx > threshold {
            Some(Direction::Right)
        } else if swipe.dx < -threshold {
            Some(Direction::Left)
        } else {
            None
        }
    } else if swipe.dy > threshold {
        Some(Direction::Down)
    } else if swipe.dy < -threshold {
        Some(Direction::Up)
    } else {
        None
    }
}
