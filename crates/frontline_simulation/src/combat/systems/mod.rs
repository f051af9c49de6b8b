//! Combat systems

pub mod attack;
pub mod damage;
pub mod explosive;


pub use attack::*;
pub use damage::*;
pub use explosive::*;
