pub mod cache_key;
pub mod cluster;
pub mod engine_stats;
pub mod restaurant_point;
pub mod transition_state;
pub mod viewport;
