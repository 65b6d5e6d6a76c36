// src/cli/handlers/mod.rs

// This module contains the logic for each built-in command.

pub mod bgfg;
pub mod commons;
pub mod jobs;
pub mod quit;

/// What the read-eval loop should do after a built-in ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinOutcome {
    Continue,
    Exit,
}
