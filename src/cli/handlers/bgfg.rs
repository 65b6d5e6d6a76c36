// src/cli/handlers/bgfg.rs

use super::{
    BuiltinOutcome,
    commons::{parse_job_target, resolve_target},
};
use crate::{
    models::JobState,
    state::ShellContext,
    system::{foreground::wait_for_foreground, process_group::deliver},
};
use anyhow::{Context, Result};
use nix::sys::signal::Signal;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verb {
    Bg,
    Fg,
}

impl Verb {
    fn name(self) -> &'static str {
        match self {
            Self::Bg => "bg",
            Self::Fg => "fg",
        }
    }
}

/// Main entry point for the 'bg' command: resume a stopped job in the background.
pub fn handle_bg(args: &[String], ctx: &ShellContext, out: &mut dyn Write) -> Result<BuiltinOutcome> {
    run(Verb::Bg, args, ctx, out)
}

/// Main entry point for the 'fg' command: bring a job to the foreground and wait for it.
pub fn handle_fg(args: &[String], ctx: &ShellContext, out: &mut dyn Write) -> Result<BuiltinOutcome> {
    run(Verb::Fg, args, ctx, out)
}

fn run(verb: Verb, args: &[String], ctx: &ShellContext, out: &mut dyn Write) -> Result<BuiltinOutcome> {
    let target = parse_job_target(verb.name(), args.first().map(String::as_str))?;

    // Resolve and transition under one lock, so the relay can't slip in between.
    let (pid, resume) = {
        let mut guard = ctx.jobs.lock();
        let job = resolve_target(&guard.table, target)?;
        let (pid, current) = (job.pid, job.state);

        let (next, resume) = match (verb, current) {
            (Verb::Bg, JobState::Stopped) => (JobState::Background, true),
            (Verb::Fg, JobState::Stopped) => (JobState::Foreground, true),
            (Verb::Fg, JobState::Background) => (JobState::Foreground, false),
            _ => {
                log::debug!("{} on job {} in state {:?}: nothing to do", verb.name(), pid, current);
                return Ok(BuiltinOutcome::Continue);
            }
        };
        guard.table.set_state(pid, next)?;
        (pid, resume)
    };

    if resume {
        deliver(ctx.signaller.as_ref(), pid, Signal::SIGCONT)
            .with_context(|| format!("Could not resume process group {}", pid))?;
    }

    if verb == Verb::Fg {
        out.flush()?;
        wait_for_foreground(&ctx.jobs, pid, ctx.config.poll_interval);
    }
    Ok(BuiltinOutcome::Continue)
}
