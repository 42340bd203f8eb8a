//! Data access. Functions take the pool and, where permissions matter,
//! the acting user's id as explicit arguments.

pub mod achievement;
pub mod category;
pub mod game;
pub mod performance;
pub mod quiz;
pub mod report;
