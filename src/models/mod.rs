// src/models/mod.rs

pub mod achievement;
pub mod category;
pub mod game;
pub mod question;
pub mod quiz;
pub mod report;
pub mod user;
