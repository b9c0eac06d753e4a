use std::cmp::Reverse;
use std::collections::BinaryHeap;

use ordered_float::OrderedFloat;
use rayon::prelude::*;
use tracing::debug;

use super::roadmap::RoadmapGraph;

impl RoadmapGraph {
    /// Fills every waypoint's `dist_to_goal` column by running one Dijkstra
    /// search per goal vertex, with Euclidean edge weights.
    ///
    /// The searches are independent, so they run in parallel; each produces
    /// its own column and the columns are written back afterwards, keeping
    /// every output cell owned by exactly one search. Vertices with no path
    /// to a goal keep `f64::INFINITY` in that column.
    pub fn compute_goal_distances(&mut self) {
        let columns: Vec<Vec<f64>> = (0..self.goal_count)
            .into_par_iter()
            .map(|goal| shortest_distances_from(self, goal))
            .collect();

        for (goal, column) in columns.into_iter().enumerate() {
            for (waypoint, dist) in self.waypoints.iter_mut().zip(column) {
                waypoint.dist_to_goal[goal] = dist;
            }
        }

        debug!(goals = self.goal_count, "computed goal distance columns");
    }
}

/// Single-source Dijkstra over the roadmap. Binary heap with lazy deletion:
/// relaxations push duplicate entries and stale ones are skipped when
/// popped. Edge weights are Euclidean, hence non-negative, so the usual
/// settle-on-pop optimality argument holds.
fn shortest_distances_from(graph: &RoadmapGraph, source: usize) -> Vec<f64> {
    let waypoints = graph.waypoints();
    let mut dist = vec![f64::INFINITY; waypoints.len()];
    let mut heap = BinaryHeap::new();

    dist[source] = 0.0;
    heap.push(Reverse((OrderedFloat(0.0f64), source)));

    while let Some(Reverse((OrderedFloat(d), u))) = heap.pop() {
        if d > dist[u] {
            // Stale entry superseded by an earlier relaxation
            continue;
        }

        for &v in &waypoints[u].neighbors {
            let step = (waypoints[v].position - waypoints[u].position).norm();
            let candidate = d + step;
            if candidate < dist[v] {
                dist[v] = candidate;
                heap.push(Reverse((OrderedFloat(candidate), v)));
            }
        }
    }

    dist
}
