use std::collections::VecDeque;

use crate::models::{CardCorners, Point};

pub const DEFAULT_SMOOTHING_WINDOW: usize = 5;

/// Moving average over the most recent detections.
///
/// A frame without a card clears the history, so a reappearing card does not
/// get dragged toward where the previous one was.
#[derive(Debug, Clone)]
pub struct CornerSmoother {
    history: VecDeque<CardCorners>,
    capacity: usize,
}

impl CornerSmoother {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_SMOOTHING_WINDOW)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            history: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Record one detection result and return the smoothed corners.
    pub fn add_corners(&mut self, corners: Option<CardCorners>) -> Option<CardCorners> {
        let Some(corners) = corners else {
            self.history.clear();
            return None;
        };

        self.history.push_back(corners);
        while self.history.len() > self.capacity {
            self.history.pop_front();
        }
        Some(self.average())
    }

    fn average(&self) -> CardCorners {
        let n = self.history.len() as f64;
        let mut sums = [Point::default(); 4];
        for corners in &self.history {
            for (sum, p) in sums.iter_mut().zip(corners.points()) {
                sum.x += p.x;
                sum.y += p.y;
            }
        }
        let [top_left, top_right, bottom_right, bottom_left] =
            sums.map(|s| Point::new(s.x / n, s.y / n));
        CardCorners {
            top_left,
            top_right,
            bottom_right,
            bottom_left,
        }
    }

    pub fn reset(&mut self) {
        self.history.clear();
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for CornerSmoother {
    fn default() -> Self {
        Self::new()
    }
}
