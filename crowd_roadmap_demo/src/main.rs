//! Demo scenario: 100 agents split in four groups, initially positioned in
//! the four corners of the environment. Each agent crosses to the opposite
//! corner through the narrow passages between four square obstacles, guided
//! by a roadmap. Stands in for the external simulator: visibility is a naive
//! segment-clearance check over the obstacle polygons and the local step
//! just integrates the preferred velocities.

use std::sync::Arc;

use crowd_roadmap::{
    all_reached, Agent, Point, RoadmapError, RoadmapGraph, RoadmapPlanner, Vec2f, VisibilityOracle,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::warn;
use tracing_subscriber::EnvFilter;

const TIME_STEP: f64 = 0.25;
const AGENT_RADIUS: f64 = 2.0;
const GOAL_TOLERANCE: f64 = 20.0;
const MAX_TICKS: usize = 50_000;

/// Static obstacle set: simple polygons, vertices counterclockwise.
struct ObstacleField {
    polygons: Vec<Vec<Point>>,
}

impl ObstacleField {
    fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.polygons.iter().flat_map(|polygon| {
            (0..polygon.len()).map(move |i| (polygon[i], polygon[(i + 1) % polygon.len()]))
        })
    }
}

impl VisibilityOracle for ObstacleField {
    /// Clear iff the segment, inflated by the clearance radius, stays at
    /// least that radius away from every obstacle edge.
    fn visible(&self, from: Point, to: Point, clearance_radius: f64) -> bool {
        self.edges()
            .all(|(a, b)| segment_distance(from, to, a, b) >= clearance_radius)
    }
}

/// Signed area of the triangle (a, b, c); sign gives the turn direction.
fn orientation(a: Point, b: Point, c: Point) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

fn segments_intersect(p1: Point, p2: Point, q1: Point, q2: Point) -> bool {
    let d1 = orientation(q1, q2, p1);
    let d2 = orientation(q1, q2, p2);
    let d3 = orientation(p1, p2, q1);
    let d4 = orientation(p1, p2, q2);
    d1 * d2 < 0.0 && d3 * d4 < 0.0
}

fn point_segment_distance(p: Point, a: Point, b: Point) -> f64 {
    let ab = b - a;
    let len_sq = ab.norm_squared();
    if len_sq == 0.0 {
        return (p - a).norm();
    }
    let t = ((p - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
    (p - (a + ab * t)).norm()
}

fn segment_distance(p1: Point, p2: Point, q1: Point, q2: Point) -> f64 {
    if segments_intersect(p1, p2, q1, q2) {
        return 0.0;
    }
    point_segment_distance(p1, q1, q2)
        .min(point_segment_distance(p2, q1, q2))
        .min(point_segment_distance(q1, p1, p2))
        .min(point_segment_distance(q2, p1, p2))
}

/// Four 30x30 squares leaving a plus-shaped corridor system between them.
fn obstacles() -> ObstacleField {
    ObstacleField {
        polygons: vec![
            vec![
                Point::new(-10.0, 40.0),
                Point::new(-40.0, 40.0),
                Point::new(-40.0, 10.0),
                Point::new(-10.0, 10.0),
            ],
            vec![
                Point::new(10.0, 40.0),
                Point::new(10.0, 10.0),
                Point::new(40.0, 10.0),
                Point::new(40.0, 40.0),
            ],
            vec![
                Point::new(10.0, -40.0),
                Point::new(40.0, -40.0),
                Point::new(40.0, -10.0),
                Point::new(10.0, -10.0),
            ],
            vec![
                Point::new(-10.0, -40.0),
                Point::new(-10.0, -10.0),
                Point::new(-40.0, -10.0),
                Point::new(-40.0, -40.0),
            ],
        ],
    }
}

/// The four goal vertices first, then sixteen waypoints hugging the
/// obstacle corners.
fn waypoint_positions() -> Vec<Point> {
    let mut positions = vec![
        Point::new(-75.0, -75.0),
        Point::new(75.0, -75.0),
        Point::new(-75.0, 75.0),
        Point::new(75.0, 75.0),
    ];
    for x in [-42.0, -8.0, 8.0, 42.0] {
        for y in [-42.0, -8.0, 8.0, 42.0] {
            positions.push(Point::new(x, y));
        }
    }
    positions
}

/// 5x5 spawn grids in each corner; every agent is assigned the goal on the
/// diagonally opposite side.
fn spawn_agents() -> Vec<Agent> {
    let mut agents = vec![];
    let spawn = |position: Point, goal: usize, agents: &mut Vec<Agent>| {
        agents.push(Agent {
            agent_id: agents.len(),
            position,
            radius: AGENT_RADIUS,
            goal,
            preferred_vel: Vec2f::zeros(),
        });
    };
    for i in 0..5 {
        for j in 0..5 {
            let di = 55.0 + i as f64 * 10.0;
            let dj = 55.0 + j as f64 * 10.0;
            spawn(Point::new(di, dj), 0, &mut agents);
            spawn(Point::new(-di, dj), 1, &mut agents);
            spawn(Point::new(di, -dj), 2, &mut agents);
            spawn(Point::new(-di, -dj), 3, &mut agents);
        }
    }
    agents
}

fn print_positions(time: f64, agents: &[Agent]) {
    print!("{}", time);
    for agent in agents {
        print!(" ({:.3},{:.3})", agent.position.x, agent.position.y);
    }
    println!();
}

fn main() -> Result<(), RoadmapError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let oracle = Arc::new(obstacles());
    let mut graph = RoadmapGraph::build(&waypoint_positions(), 4, AGENT_RADIUS, oracle.as_ref())?;
    graph.compute_goal_distances();
    let graph = Arc::new(graph);

    let mut planner = RoadmapPlanner::new(graph.clone(), oracle);
    let mut rng = StdRng::from_entropy();
    let mut agents = spawn_agents();

    let mut time = 0.0;
    for _tick in 0..MAX_TICKS {
        print_positions(time, &agents);
        planner.preferred_velocities(&mut agents, &mut rng)?;

        // Pass-through local step; a real deployment hands the preferred
        // velocities to the collision-avoidance layer instead.
        for agent in agents.iter_mut() {
            agent.position += agent.preferred_vel * TIME_STEP;
        }
        time += TIME_STEP;

        if all_reached(&agents, &graph, GOAL_TOLERANCE) {
            print_positions(time, &agents);
            return Ok(());
        }
    }

    warn!(ticks = MAX_TICKS, "stopping before all agents reached goal");
    Ok(())
}
