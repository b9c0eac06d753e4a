use rayon::prelude::*;
use tracing::debug;

use crate::error::RoadmapError;
use crate::visibility::visibility::VisibilityOracle;
use crate::Point;

/// A roadmap vertex: fixed position, directed adjacency populated once at
/// build time, and one precomputed distance per goal vertex.
#[derive(Clone, Debug)]
pub struct Waypoint {
    pub position: Point,
    /// Indices of waypoints visible from this one at the build clearance.
    pub neighbors: Vec<usize>,
    /// One entry per goal; `f64::INFINITY` when no path to that goal exists.
    /// Written exactly once per goal by `compute_goal_distances`.
    pub dist_to_goal: Vec<f64>,
}

/// Visibility graph over hand-placed waypoints. The first `goal_count`
/// waypoints double as the goal vertices. Built once before the simulation
/// starts and read-only afterwards, so it can be shared behind an `Arc`.
pub struct RoadmapGraph {
    pub(crate) waypoints: Vec<Waypoint>,
    pub(crate) goal_count: usize,
}

impl RoadmapGraph {
    /// Connects every ordered pair of waypoints whose straight segment,
    /// inflated by `clearance_radius`, is reported clear by the oracle.
    ///
    /// The oracle is queried independently for (i, j) and (j, i); an
    /// asymmetric answer is preserved as returned rather than symmetrized.
    /// Each vertex's edge list depends only on its own oracle queries, so
    /// the scan runs in parallel over vertices.
    pub fn build<O>(
        positions: &[Point],
        goal_count: usize,
        clearance_radius: f64,
        oracle: &O,
    ) -> Result<Self, RoadmapError>
    where
        O: VisibilityOracle + Sync,
    {
        if positions.is_empty() {
            return Err(RoadmapError::EmptyRoadmap);
        }
        if goal_count > positions.len() {
            return Err(RoadmapError::TooManyGoals {
                goal_count,
                waypoint_count: positions.len(),
            });
        }
        if !clearance_radius.is_finite() || clearance_radius < 0.0 {
            return Err(RoadmapError::InvalidClearanceRadius(clearance_radius));
        }

        let waypoints: Vec<Waypoint> = positions
            .par_iter()
            .enumerate()
            .map(|(i, p)| {
                let neighbors = positions
                    .iter()
                    .enumerate()
                    .filter(|(j, q)| i != *j && oracle.visible(*p, **q, clearance_radius))
                    .map(|(j, _q)| j)
                    .collect();
                Waypoint {
                    position: *p,
                    neighbors,
                    dist_to_goal: vec![f64::INFINITY; goal_count],
                }
            })
            .collect();

        let edge_count: usize = waypoints.iter().map(|w| w.neighbors.len()).sum();
        debug!(
            vertices = waypoints.len(),
            edges = edge_count,
            "built visibility roadmap"
        );

        Ok(RoadmapGraph {
            waypoints,
            goal_count,
        })
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn goal_count(&self) -> usize {
        self.goal_count
    }

    /// Position of a goal vertex. Goals occupy the waypoint prefix, so the
    /// goal index is also the vertex index.
    ///
    /// Panics if `goal` is not within the goal prefix: an out-of-range goal
    /// index is a scenario setup bug, and comparing against a non-goal
    /// waypoint would degrade silently.
    pub fn goal_position(&self, goal: usize) -> Point {
        assert!(
            goal < self.goal_count,
            "goal index {} out of range for {} goals",
            goal,
            self.goal_count
        );
        self.waypoints[goal].position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_corners() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
        ]
    }

    fn always_visible(_p: Point, _q: Point, _r: f64) -> bool {
        true
    }

    #[test]
    fn test_full_visibility_adjacency() {
        let graph = RoadmapGraph::build(&square_corners(), 1, 2.0, &always_visible).unwrap();
        assert_eq!(graph.waypoints().len(), 4);
        for (i, waypoint) in graph.waypoints().iter().enumerate() {
            // Every other vertex, never itself
            assert_eq!(waypoint.neighbors.len(), 3);
            assert!(!waypoint.neighbors.contains(&i));
            assert_eq!(waypoint.dist_to_goal, vec![f64::INFINITY]);
        }
    }

    #[test]
    fn test_asymmetric_oracle_preserved() {
        // Edges only toward increasing x; the build must keep each
        // direction exactly as the oracle answered it.
        let positions = vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(2.0, 0.0),
        ];
        let oracle = |p: Point, q: Point, _r: f64| p.x < q.x;
        let graph = RoadmapGraph::build(&positions, 1, 0.5, &oracle).unwrap();
        assert_eq!(graph.waypoints()[0].neighbors, vec![1, 2]);
        assert_eq!(graph.waypoints()[1].neighbors, vec![2]);
        assert!(graph.waypoints()[2].neighbors.is_empty());
    }

    #[test]
    fn test_blocked_vertex_has_no_neighbors() {
        let never_visible = |_p: Point, _q: Point, _r: f64| false;
        let graph = RoadmapGraph::build(&square_corners(), 1, 2.0, &never_visible).unwrap();
        for waypoint in graph.waypoints() {
            assert!(waypoint.neighbors.is_empty());
        }
    }

    #[test]
    fn test_build_rejects_empty_roadmap() {
        let result = RoadmapGraph::build(&[], 0, 2.0, &always_visible);
        assert_eq!(result.err(), Some(RoadmapError::EmptyRoadmap));
    }

    #[test]
    fn test_build_rejects_too_many_goals() {
        let result = RoadmapGraph::build(&square_corners(), 5, 2.0, &always_visible);
        assert_eq!(
            result.err(),
            Some(RoadmapError::TooManyGoals {
                goal_count: 5,
                waypoint_count: 4
            })
        );
    }

    #[test]
    #[should_panic(expected = "goal index 2 out of range")]
    fn test_goal_position_rejects_non_goal_vertex() {
        let graph = RoadmapGraph::build(&square_corners(), 1, 2.0, &always_visible).unwrap();
        // Vertex 2 exists but is not in the goal prefix
        graph.goal_position(2);
    }

    #[test]
    fn test_build_rejects_bad_clearance() {
        for radius in [-1.0, f64::NAN, f64::INFINITY] {
            let result = RoadmapGraph::build(&square_corners(), 1, radius, &always_visible);
            assert!(matches!(
                result.err(),
                Some(RoadmapError::InvalidClearanceRadius(_))
            ));
        }
    }
}
