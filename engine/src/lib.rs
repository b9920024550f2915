pub mod engine_actors;
pub mod messages;
