pub mod goal_distances;
pub mod roadmap;
