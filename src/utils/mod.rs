pub mod duration;
pub mod hash;
pub mod jwt;
