// src/core/mod.rs

pub mod config_loader;
pub mod job_table;
pub mod parser;
