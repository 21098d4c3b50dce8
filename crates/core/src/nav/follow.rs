use crate::geometry::Point2;
use log::trace;
use std::collections::VecDeque;

/// Moves a point along a list of waypoints at a fixed speed. This holds no
/// timing state of its own; the caller decides how much time passes with
/// each [step](Self::step).
#[derive(Clone, Debug)]
pub struct PathFollower {
    position: Point2,
    /// World units per unit of time
    speed: f64,
    waypoints: VecDeque<Point2>,
}

impl PathFollower {
    pub fn new(position: Point2, speed: f64) -> Self {
        Self {
            position,
            speed,
            waypoints: VecDeque::new(),
        }
    }

    /// Replace the current path. Any waypoints from the old path are dropped.
    pub fn set_path(&mut self, path: impl IntoIterator<Item = Point2>) {
        self.waypoints = path.into_iter().collect();
    }

    /// Advance along the path by `speed * dt` world units. Waypoints are
    /// consumed as they're reached, and any leftover movement carries on
    /// toward the next one. Returns the new position.
    pub fn step(&mut self, dt: f64) -> Point2 {
        let mut budget = self.speed * dt;
        if budget.is_nan() || budget <= 0.0 {
            return self.position;
        }

        while let Some(&target) = self.waypoints.front() {
            let distance = self.position.distance_to(target);
            if distance <= budget {
                self.position = target;
                self.waypoints.pop_front();
                budget -= distance;
                trace!("Reached waypoint {}", target);
            } else {
                // distance > budget > 0, so the direction is well-defined
                if let Some(direction) = (target - self.position).normalized()
                {
                    self.position += direction * budget;
                }
                break;
            }
        }
        self.position
    }

    /// Is there nowhere left to go?
    pub fn is_idle(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn position(&self) -> Point2 {
        self.position
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn remaining(&self) -> impl Iterator<Item = &Point2> {
        self.waypoints.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_step_partial() {
        let mut follower = PathFollower::new(Point2::ORIGIN, 2.0);
        follower.set_path(vec![Point2::new(10.0, 0.0)]);
        let position = follower.step(1.5);
        assert_approx_eq!(position.x, 3.0);
        assert_approx_eq!(position.y, 0.0);
        assert!(!follower.is_idle());
    }

    #[test]
    fn test_step_carries_over_corner() {
        let mut follower = PathFollower::new(Point2::ORIGIN, 1.0);
        follower.set_path(vec![Point2::new(1.0, 0.0), Point2::new(1.0, 5.0)]);
        let position = follower.step(3.0);
        assert_approx_eq!(position.x, 1.0);
        assert_approx_eq!(position.y, 2.0);
        assert_eq!(follower.remaining().count(), 1);
    }

    #[test]
    fn test_step_to_end() {
        let mut follower = PathFollower::new(Point2::ORIGIN, 1.0);
        follower.set_path(vec![Point2::new(0.0, 1.0), Point2::new(1.0, 1.0)]);
        let position = follower.step(100.0);
        assert_eq!(position, Point2::new(1.0, 1.0));
        assert!(follower.is_idle());
        // Nothing left, so no more movement
        assert_eq!(follower.step(1.0), Point2::new(1.0, 1.0));
    }

    #[test]
    fn test_zero_dt() {
        let mut follower = PathFollower::new(Point2::ORIGIN, 1.0);
        follower.set_path(vec![Point2::new(1.0, 0.0)]);
        assert_eq!(follower.step(0.0), Point2::ORIGIN);
        assert_eq!(follower.step(-1.0), Point2::ORIGIN);
    }
}
