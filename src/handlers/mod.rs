// src/handlers/mod.rs

pub mod auth;
pub mod category;
pub mod game;
pub mod profile;
pub mod quiz;
