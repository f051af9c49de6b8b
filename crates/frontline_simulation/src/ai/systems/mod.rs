//! AI systems

pub mod fsm;
pub mod movement;

pub use fsm::*;
pub use movement::*;
