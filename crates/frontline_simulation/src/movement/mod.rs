//! Movement domain — команды перемещения для внешнего navigation collaborator
//!
//! Core решает КУДА идти, движок решает КАК (navmesh, физика).

pub mod components;

pub use components::*;
