use crate::roadmap::roadmap::RoadmapGraph;
use crate::Agent;

/// True iff every agent sits within `tolerance` of its goal vertex.
/// Compares squared distances and short-circuits on the first agent still
/// under way.
///
/// Panics if any agent carries a goal index outside the graph's goal
/// prefix (scenario setup bug, rejected rather than compared against a
/// non-goal waypoint).
pub fn all_reached(agents: &[Agent], graph: &RoadmapGraph, tolerance: f64) -> bool {
    agents.iter().all(|agent| {
        (agent.position - graph.goal_position(agent.goal)).norm_squared() <= tolerance * tolerance
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Point, Vec2f};

    fn two_goal_graph() -> RoadmapGraph {
        let positions = vec![Point::new(0.0, 0.0), Point::new(100.0, 0.0)];
        RoadmapGraph::build(&positions, 2, 1.0, &|_p: Point, _q: Point, _r: f64| true).unwrap()
    }

    fn agent(id: usize, position: Point, goal: usize) -> Agent {
        Agent {
            agent_id: id,
            position,
            radius: 1.0,
            goal,
            preferred_vel: Vec2f::zeros(),
        }
    }

    #[test]
    fn test_all_within_tolerance() {
        let graph = two_goal_graph();
        let agents = vec![
            agent(0, Point::new(3.0, 4.0), 0),
            agent(1, Point::new(98.0, -1.0), 1),
        ];
        assert!(all_reached(&agents, &graph, 20.0));
    }

    #[test]
    fn test_single_straggler_flips_result() {
        let graph = two_goal_graph();
        let mut agents = vec![
            agent(0, Point::new(3.0, 4.0), 0),
            agent(1, Point::new(98.0, -1.0), 1),
        ];
        assert!(all_reached(&agents, &graph, 20.0));

        agents[1].position = Point::new(50.0, 0.0);
        assert!(!all_reached(&agents, &graph, 20.0));
    }

    #[test]
    fn test_boundary_is_inclusive() {
        let graph = two_goal_graph();
        let agents = vec![agent(0, Point::new(20.0, 0.0), 0)];
        assert!(all_reached(&agents, &graph, 20.0));

        let agents = vec![agent(0, Point::new(20.0 + 1e-9, 0.0), 0)];
        assert!(!all_reached(&agents, &graph, 20.0));
    }

    #[test]
    #[should_panic(expected = "goal index 2 out of range")]
    fn test_out_of_range_goal_index_is_rejected() {
        // Two waypoints beyond the goal prefix; an agent parked exactly on
        // one of them must not be counted as converged.
        let positions = vec![
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(50.0, 50.0),
        ];
        let graph =
            RoadmapGraph::build(&positions, 1, 1.0, &|_p: Point, _q: Point, _r: f64| true).unwrap();
        let agents = vec![agent(0, Point::new(50.0, 50.0), 2)];
        all_reached(&agents, &graph, 20.0);
    }

    #[test]
    fn test_empty_population_is_converged() {
        let graph = two_goal_graph();
        assert!(all_reached(&[], &graph, 20.0));
    }
}
