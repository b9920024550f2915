pub mod cluster_feed;
pub mod coordinator;
pub mod result_cache;
pub mod services;
pub mod transition_tracker;
