use std::collections::HashMap;
use std::f64::consts::TAU;
use std::sync::Arc;

use rand::Rng;
use tracing::warn;

use crate::error::RoadmapError;
use crate::roadmap::roadmap::RoadmapGraph;
use crate::visibility::visibility::VisibilityOracle;
use crate::{Agent, AgentId, Vec2f};

/// Default upper bound on the symmetry-breaking perturbation magnitude,
/// relative to unit speed.
pub const DEFAULT_PERTURBATION: f64 = 1e-4;

/// Consecutive fallback ticks before an agent is reported as trapped.
const STALL_WARN_THRESHOLD: u32 = 10;

/// Per-tick greedy router: aims each agent at the visible waypoint that
/// minimizes straight-line hop plus precomputed distance to the agent's
/// goal. Holds the roadmap and oracle behind `Arc`s so the same planner can
/// serve every agent while the graph stays read-only.
pub struct RoadmapPlanner<O: VisibilityOracle> {
    graph: Arc<RoadmapGraph>,
    oracle: Arc<O>,
    /// Upper bound on the perturbation magnitude; zero disables it.
    perturbation: f64,
    /// Consecutive zero-velocity fallback ticks per agent.
    stalled_ticks: HashMap<AgentId, u32>,
}

impl<O: VisibilityOracle> RoadmapPlanner<O> {
    pub fn new(graph: Arc<RoadmapGraph>, oracle: Arc<O>) -> Self {
        RoadmapPlanner {
            graph,
            oracle,
            perturbation: DEFAULT_PERTURBATION,
            stalled_ticks: HashMap::new(),
        }
    }

    /// Overrides the perturbation bound. Zero gives fully deterministic
    /// routing, useful for regression tests.
    pub fn with_perturbation(mut self, magnitude: f64) -> Self {
        self.perturbation = magnitude;
        self
    }

    /// Computes one agent's preferred velocity for this tick.
    ///
    /// Candidate waypoints must be visible from the agent at its clearance
    /// radius; among those, the one minimizing `hop + dist_to_goal` wins,
    /// first encountered on ties. The result is a unit vector toward the
    /// winner, except: no candidate at all gives the zero vector (trapped
    /// agent, see the stall diagnostic), and an agent sitting exactly on the
    /// winning waypoint aims straight at its goal vertex instead, or stops
    /// if that waypoint is the goal. A fresh random perturbation is added on
    /// every call to break symmetric deadlocks downstream.
    pub fn preferred_velocity<R: Rng>(
        &mut self,
        agent: &Agent,
        rng: &mut R,
    ) -> Result<Vec2f, RoadmapError> {
        if agent.goal >= self.graph.goal_count() {
            return Err(RoadmapError::GoalOutOfRange {
                goal: agent.goal,
                goal_count: self.graph.goal_count(),
            });
        }

        let mut min_cost = f64::INFINITY;
        let mut best = None;

        for (j, waypoint) in self.graph.waypoints().iter().enumerate() {
            let hop = (waypoint.position - agent.position).norm();
            let cost = hop + waypoint.dist_to_goal[agent.goal];
            // Cost check first so the oracle only runs on improvements
            if cost < min_cost
                && self
                    .oracle
                    .visible(agent.position, waypoint.position, agent.radius)
            {
                min_cost = cost;
                best = Some(j);
            }
        }

        let velocity = match best {
            None => {
                self.note_stalled(agent.agent_id);
                Vec2f::zeros()
            }
            Some(vertex) => {
                self.stalled_ticks.remove(&agent.agent_id);
                let to_vertex = self.graph.waypoints()[vertex].position - agent.position;
                if to_vertex.norm_squared() == 0.0 {
                    if vertex == agent.goal {
                        // Already arrived
                        Vec2f::zeros()
                    } else {
                        // Sitting exactly on an intermediate waypoint: skip
                        // the zero-length hop and head for the goal vertex
                        (self.graph.goal_position(agent.goal) - agent.position).normalize()
                    }
                } else {
                    to_vertex.normalize()
                }
            }
        };

        Ok(velocity + self.perturb(rng))
    }

    /// Routes a whole population, writing each agent's `preferred_vel`.
    pub fn preferred_velocities<R: Rng>(
        &mut self,
        agents: &mut [Agent],
        rng: &mut R,
    ) -> Result<(), RoadmapError> {
        for agent in agents.iter_mut() {
            agent.preferred_vel = self.preferred_velocity(agent, rng)?;
        }
        Ok(())
    }

    /// Drops stall bookkeeping for a despawned agent.
    pub fn remove_agent(&mut self, agent: AgentId) {
        self.stalled_ticks.remove(&agent);
    }

    /// Small random vector, direction uniform in [0, 2pi), magnitude
    /// uniform in [0, perturbation]. Drawn freshly per agent per tick.
    fn perturb<R: Rng>(&self, rng: &mut R) -> Vec2f {
        if self.perturbation == 0.0 {
            return Vec2f::zeros();
        }
        let angle = rng.gen_range(0.0..TAU);
        let magnitude = rng.gen_range(0.0..=self.perturbation);
        Vec2f::new(angle.cos(), angle.sin()) * magnitude
    }

    fn note_stalled(&mut self, agent: AgentId) {
        let ticks = self.stalled_ticks.entry(agent).or_insert(0);
        *ticks += 1;
        if *ticks == STALL_WARN_THRESHOLD {
            warn!(
                agent,
                ticks = *ticks,
                "no roadmap vertex visible; agent appears trapped"
            );
        }
    }
}
