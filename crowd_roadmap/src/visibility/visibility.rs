use crate::Point;

/// Abstract interface for the line-of-sight oracle over the static obstacle
/// set, supplied by the collision-avoidance layer.
///
/// `visible` reports whether the straight segment between the two points,
/// inflated by `clearance_radius`, crosses no obstacle. The radius passed at
/// roadmap-build time must match or upper-bound the radii passed for agent
/// queries later, otherwise routing may pick a path the agent's body cannot
/// traverse.
pub trait VisibilityOracle {
    fn visible(&self, from: Point, to: Point, clearance_radius: f64) -> bool;
}

impl<F> VisibilityOracle for F
where
    F: Fn(Point, Point, f64) -> bool,
{
    fn visible(&self, from: Point, to: Point, clearance_radius: f64) -> bool {
        self(from, to, clearance_radius)
    }
}
