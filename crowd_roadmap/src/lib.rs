pub extern crate nalgebra as na;
use na::Vector2;

pub mod error;
pub mod monitor;
pub mod planners;
pub mod roadmap;
pub mod visibility;

pub use crate::error::RoadmapError;
pub use crate::monitor::goal_monitor::all_reached;
pub use crate::planners::roadmap_planner::RoadmapPlanner;
pub use crate::roadmap::roadmap::{RoadmapGraph, Waypoint};
pub use crate::visibility::visibility::VisibilityOracle;

/// Agent ID
pub type AgentId = usize;

/// Point
pub type Point = Vector2<f64>;

/// 2-vector
pub type Vec2f = Vector2<f64>;

/// The slice of simulator-owned agent state this crate reads and writes.
/// Position is advanced by the external collision-avoidance stepper every
/// tick; the planner only writes `preferred_vel`.
#[derive(Clone, Copy, Debug)]
pub struct Agent {
    /// Unique Agent ID
    pub agent_id: AgentId,
    /// Position of the agent
    pub position: Point,
    /// Clearance radius used in visibility queries, typically the body radius
    pub radius: f64,
    /// Index into the roadmap's goal prefix, assigned at spawn and never changed
    pub goal: usize,
    /// Preferred velocity, written once per tick by the planner
    pub preferred_vel: Vec2f,
}
