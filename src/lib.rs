//! `tsh`: a tiny job-control shell.
//!
//! Reads command lines, runs the `quit`, `jobs`, `bg` and `fg` built-ins itself,
//! and launches everything else as a foreground or background job in its own
//! process group.

pub mod cli;
pub mod constants;
pub mod core;
pub mod models;
pub mod state;
pub mod system;
