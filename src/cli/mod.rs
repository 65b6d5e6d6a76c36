// src/cli/mod.rs

use crate::core::config_loader::ShellConfig;
use clap::Parser;
use std::path::PathBuf;

pub mod dispatcher;
pub mod handlers;

/// tsh: a tiny shell with job control.
///
/// Reads one command line at a time. `quit`, `jobs`, `bg <job>` and `fg <job>`
/// are built in; anything else is run as a program, in the background when the
/// line ends with `&`. A job is named by its pid or by `%<jobid>`.
///
/// Settings may also come from a TOML file: `--config`, then `$TSH_CONFIG`,
/// then `<config dir>/tsh/config.toml`. Flags override the file.
#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Print additional diagnostic information.
    #[arg(short, long)]
    pub verbose: bool,

    /// Do not emit a command prompt (handy for automated drivers).
    #[arg(short = 'p', long = "no-prompt")]
    pub no_prompt: bool,

    /// Read settings from this file instead of the default location.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Applies flag overrides on top of the loaded configuration.
    pub fn apply_to(&self, config: &mut ShellConfig) {
        if self.verbose {
            config.verbose = true;
        }
        if self.no_prompt {
            config.emit_prompt = false;
        }
    }
}
