// tests/common/mod.rs

// Each integration test file is its own process, so the relay's
// `waitpid(-1)` only ever sees children started by that file.

#![allow(dead_code)]

use std::io::Write;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tsh::{
    cli::dispatcher::{self, Dispatch},
    core::{config_loader::ShellConfig, parser::parse_line},
    state::ShellContext,
    system::{
        executor::{self, LaunchOutcome},
        process_group::KernelSignaller,
        relay::SignalRelay,
    },
};

pub const DEADLINE: Duration = Duration::from_secs(10);

/// A context wired to the real kernel, with the relay thread running.
pub fn live_context() -> ShellContext {
    let config = ShellConfig {
        emit_prompt: false,
        poll_interval: Duration::from_millis(5),
        ..ShellConfig::default()
    };
    let ctx = ShellContext::new(config, Arc::new(KernelSignaller));
    SignalRelay::new(ctx.jobs.clone(), ctx.signaller.clone())
        .spawn()
        .unwrap();
    ctx
}

pub fn launch(ctx: &ShellContext, line: &str) -> (LaunchOutcome, String) {
    let command = parse_line(line).unwrap().unwrap();
    let mut out = Vec::new();
    let outcome = executor::launch(&command, ctx, &mut out).unwrap();
    (outcome, String::from_utf8(out).unwrap())
}

pub fn builtin(ctx: &ShellContext, line: &str) -> (Dispatch, String) {
    let command = parse_line(line).unwrap().unwrap();
    let mut out = Vec::<u8>::new();
    let result = dispatcher::dispatch(&command, ctx, &mut out).unwrap();
    out.flush().unwrap();
    (result, String::from_utf8(out).unwrap())
}

/// Polls until the relay has emptied the job table, failing after `DEADLINE`.
pub fn wait_for_empty_table(ctx: &ShellContext) {
    let start = Instant::now();
    while !ctx.jobs.lock().table.is_empty() {
        assert!(
            start.elapsed() < DEADLINE,
            "jobs never reaped: {:?}",
            ctx.jobs.lock().table.list()
        );
        thread::sleep(Duration::from_millis(10));
    }
}
