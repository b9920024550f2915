pub mod engine_messages;

pub use engine_messages::*;
