use thiserror::Error;

/// Scenario configuration errors. These are programmer errors in setup and
/// are rejected at build or route time rather than degrading silently.
/// Degenerate-but-legal states (a trapped agent, an unreachable goal) are
/// not errors; they surface through the planner's stall diagnostic instead.
#[derive(Debug, Error, PartialEq)]
pub enum RoadmapError {
    #[error("roadmap requires at least one waypoint")]
    EmptyRoadmap,
    #[error("goal count {goal_count} exceeds waypoint count {waypoint_count}")]
    TooManyGoals {
        goal_count: usize,
        waypoint_count: usize,
    },
    #[error("clearance radius must be finite and non-negative, got {0}")]
    InvalidClearanceRadius(f64),
    #[error("goal index {goal} out of range for {goal_count} goals")]
    GoalOutOfRange { goal: usize, goal_count: usize },
}
