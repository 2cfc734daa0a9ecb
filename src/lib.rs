pub mod config;
pub mod data;
pub mod model;
pub mod monitoring;
pub mod runner;
