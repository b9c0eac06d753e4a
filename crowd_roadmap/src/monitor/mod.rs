pub mod goal_monitor;
