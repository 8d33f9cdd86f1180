//! Cobweb diagram construction.
//!
//! A cobweb trace starts with a rise from the axis to the map curve at `y0`,
//! then alternates a horizontal move to the diagonal `y = x` with a vertical
//! move back to the curve, once per iteration. Drawing the curve and the
//! diagonal is left to the renderer, which can sample the map over a
//! [`Domain`].

use crate::error::{Error, Result};
use crate::traits::Map;
use serde::{Deserialize, Serialize};

/// A point in (state, next-state) space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SegmentKind {
    /// Constant state; moves between the diagonal (or axis) and the curve.
    Vertical,
    /// Constant next-state; moves from the curve to the diagonal.
    Horizontal,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CobwebSegment {
    pub start: Point,
    pub end: Point,
    pub kind: SegmentKind,
}

impl CobwebSegment {
    fn vertical(x: f64, from: f64, to: f64) -> Self {
        Self {
            start: Point::new(x, from),
            end: Point::new(x, to),
            kind: SegmentKind::Vertical,
        }
    }

    fn horizontal(y: f64, from: f64, to: f64) -> Self {
        Self {
            start: Point::new(from, y),
            end: Point::new(to, y),
            kind: SegmentKind::Horizontal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Rise,
    Horizontal,
    Vertical,
    Done,
}

/// Lazy cobweb trace: yields exactly `1 + 2 * steps` segments.
///
/// Evaluation is pure, so constructing a new trace with the same inputs
/// replays the same segments.
pub struct CobwebTrace<'a, M: Map<f64> + ?Sized> {
    map: &'a M,
    y_old: f64,
    y_new: f64,
    remaining: usize,
    phase: Phase,
}

impl<'a, M: Map<f64> + ?Sized> CobwebTrace<'a, M> {
    pub fn new(map: &'a M, y0: f64, steps: usize) -> Result<Self> {
        if steps == 0 {
            return Err(Error::InvalidStepCount { steps });
        }
        Ok(Self {
            map,
            y_old: y0,
            y_new: map.apply(y0),
            remaining: steps,
            phase: Phase::Rise,
        })
    }
}

impl<M: Map<f64> + ?Sized> Iterator for CobwebTrace<'_, M> {
    type Item = CobwebSegment;

    fn next(&mut self) -> Option<CobwebSegment> {
        match self.phase {
            Phase::Rise => {
                self.phase = Phase::Horizontal;
                Some(CobwebSegment::vertical(self.y_old, 0.0, self.y_new))
            }
            Phase::Horizontal => {
                self.phase = Phase::Vertical;
                Some(CobwebSegment::horizontal(self.y_new, self.y_old, self.y_new))
            }
            Phase::Vertical => {
                self.y_old = self.y_new;
                self.y_new = self.map.apply(self.y_new);
                self.remaining -= 1;
                self.phase = if self.remaining == 0 {
                    Phase::Done
                } else {
                    Phase::Horizontal
                };
                Some(CobwebSegment::vertical(self.y_old, self.y_old, self.y_new))
            }
            Phase::Done => None,
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let twice = self.remaining.checked_mul(2);
        let left = match self.phase {
            Phase::Rise => twice.and_then(|n| n.checked_add(1)),
            Phase::Horizontal => twice,
            // remaining >= 1 while a vertical segment is pending
            Phase::Vertical => twice.map(|n| n - 1),
            Phase::Done => Some(0),
        };
        match left {
            Some(n) => (n, Some(n)),
            None => (usize::MAX, None),
        }
    }
}

impl<M: Map<f64> + ?Sized> ExactSizeIterator for CobwebTrace<'_, M> {}

/// Collects the full cobweb trace of `steps` iterations from `y0`.
pub fn trace<M: Map<f64> + ?Sized>(map: &M, y0: f64, steps: usize) -> Result<Vec<CobwebSegment>> {
    Ok(CobwebTrace::new(map, y0, steps)?.collect())
}

/// Display interval for the map curve and the diagonal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    pub from: f64,
    pub to: f64,
}

impl Domain {
    pub fn new(from: f64, to: f64) -> Self {
        Self { from, to }
    }

    /// `samples` evenly spaced points `(x, f(x))` including both endpoints.
    pub fn sample<M: Map<f64> + ?Sized>(&self, map: &M, samples: usize) -> Vec<Point> {
        match samples {
            0 => Vec::new(),
            1 => vec![Point::new(self.from, map.apply(self.from))],
            n => {
                let step = (self.to - self.from) / (n - 1) as f64;
                (0..n)
                    .map(|i| {
                        let x = if i == n - 1 {
                            self.to
                        } else {
                            self.from + step * i as f64
                        };
                        Point::new(x, map.apply(x))
                    })
                    .collect()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{trace, CobwebTrace, Domain, Point, SegmentKind};
    use crate::error::Error;
    use crate::maps::{LinearMap, LogisticMap};
    use crate::traits::Map;
    use approx::assert_relative_eq;

    #[test]
    fn trace_has_one_plus_two_steps_segments() {
        let map = LogisticMap::new(2.5, 10.0);
        for steps in [1, 2, 5, 40] {
            let segments = trace(&map, 0.5, steps).expect("valid");
            assert_eq!(segments.len(), 1 + 2 * steps);
        }
        let lazy = CobwebTrace::new(&map, 0.5, 7).expect("valid");
        assert_eq!(lazy.len(), 15);
    }

    #[test]
    fn trace_follows_classic_construction() {
        let map = LinearMap::new(1.0, 0.5);
        let f = |y: f64| Map::<f64>::apply(&map, y);
        let segments = trace(&map, 0.0, 2).expect("valid");

        // rise from the axis to the curve
        assert_eq!(segments[0].kind, SegmentKind::Vertical);
        assert_eq!(segments[0].start, Point::new(0.0, 0.0));
        assert_eq!(segments[0].end, Point::new(0.0, f(0.0)));

        // across to the diagonal, then back to the curve
        let y1 = f(0.0);
        let y2 = f(y1);
        assert_eq!(segments[1].kind, SegmentKind::Horizontal);
        assert_eq!(segments[1].start, Point::new(0.0, y1));
        assert_eq!(segments[1].end, Point::new(y1, y1));
        assert_eq!(segments[2].kind, SegmentKind::Vertical);
        assert_eq!(segments[2].start, Point::new(y1, y1));
        assert_eq!(segments[2].end, Point::new(y1, y2));

        let y3 = f(y2);
        assert_eq!(segments[3].start, Point::new(y1, y2));
        assert_eq!(segments[3].end, Point::new(y2, y2));
        assert_eq!(segments[4].end, Point::new(y2, y3));
    }

    #[test]
    fn segments_are_connected_and_alternate() {
        let map = LogisticMap::new(3.3, 1.0);
        let segments = trace(&map, 0.2, 25).expect("valid");
        for pair in segments.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
            assert_ne!(pair[0].kind, pair[1].kind);
        }
    }

    #[test]
    fn trace_is_restartable() {
        let map = LogisticMap::new(3.9, 1.0);
        let first: Vec<_> = CobwebTrace::new(&map, 0.3, 10).expect("valid").collect();
        let second = trace(&map, 0.3, 10).expect("valid");
        assert_eq!(first, second);
    }

    #[test]
    fn size_hint_saturates_for_huge_step_counts() {
        let map = LinearMap::new(1.0, 0.5);
        let mut lazy = CobwebTrace::new(&map, 0.0, usize::MAX).expect("valid");
        assert_eq!(lazy.size_hint(), (usize::MAX, None));
        lazy.next();
        assert_eq!(lazy.size_hint(), (usize::MAX, None));

        let lazy = CobwebTrace::new(&map, 0.0, usize::MAX / 2).expect("valid");
        assert_eq!(lazy.size_hint(), (usize::MAX, Some(usize::MAX)));
    }

    #[test]
    fn zero_steps_is_rejected() {
        let map = LinearMap::new(0.0, 1.0);
        assert_eq!(trace(&map, 1.0, 0), Err(Error::InvalidStepCount { steps: 0 }));
    }

    #[test]
    fn nan_propagates_through_trace() {
        let map = |_: f64| f64::NAN;
        let segments = trace(&map, 1.0, 2).expect("valid");
        assert_eq!(segments.len(), 5);
        assert!(segments[0].end.y.is_nan());
        assert!(segments[4].end.y.is_nan());
    }

    #[test]
    fn domain_sampling_covers_endpoints() {
        let map = LogisticMap::new(2.0, 4.0);
        let points = Domain::new(0.0, 4.0).sample(&map, 9);
        assert_eq!(points.len(), 9);
        assert_eq!(points[0].x, 0.0);
        assert_eq!(points[8].x, 4.0);
        assert_relative_eq!(points[4].x, 2.0);
        assert_relative_eq!(points[4].y, 2.0);
        assert!(Domain::new(0.0, 1.0).sample(&map, 0).is_empty());
        assert_eq!(Domain::new(0.5, 1.0).sample(&map, 1).len(), 1);
    }
}
