pub mod roadmap_planner;
