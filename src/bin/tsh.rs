// src/bin/tsh.rs

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use std::io;
use std::sync::Arc;
use tsh::{
    cli::Cli,
    core::config_loader::load_config,
    state::ShellContext,
    system::{
        process_group::KernelSignaller,
        relay::SignalRelay,
        shell::{ExitReason, Shell},
    },
};

/// The main entry point of the `tsh` shell.
/// It loads settings, sets up logging, starts the signal relay, runs the
/// read-eval loop and performs centralized error handling.
fn main() {
    if let Err(e) = run_shell(Cli::parse()) {
        // --- Centralized Error Handling ---
        eprintln!("{}: {:#}", "Error".red().bold(), e);
        std::process::exit(1);
    }
    std::process::exit(0);
}

fn run_shell(cli: Cli) -> Result<()> {
    let mut config = load_config(cli.config.as_deref()).context("Could not load the shell configuration")?;
    cli.apply_to(&mut config);

    let default_filter = if config.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();
    log::debug!("CLI args parsed: {:?}", cli);
    log::debug!("Effective configuration: {:?}", config);

    let ctx = ShellContext::new(config, Arc::new(KernelSignaller));

    // Handlers must be live before the first child can exist.
    let _relay = SignalRelay::new(ctx.jobs.clone(), ctx.signaller.clone())
        .spawn()
        .context("Could not start job control")?;

    let stdin = io::stdin();
    let mut shell = Shell::new(ctx, stdin.lock(), io::stdout());
    match shell.run()? {
        ExitReason::EndOfInput => log::debug!("End of input, exiting"),
        ExitReason::Quit => log::debug!("quit accepted, exiting"),
    }
    Ok(())
}
