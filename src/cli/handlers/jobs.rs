// src/cli/handlers/jobs.rs

use super::BuiltinOutcome;
use crate::state::ShellContext;
use anyhow::Result;
use std::io::Write;

/// Main entry point for the 'jobs' command: one line per tracked job, in slot order.
pub fn handle(_args: &[String], ctx: &ShellContext, out: &mut dyn Write) -> Result<BuiltinOutcome> {
    // Snapshot first so the lock is not held while writing.
    let lines = ctx.jobs.lock().table.list();
    for line in lines {
        writeln!(out, "{}", line)?;
    }
    Ok(BuiltinOutcome::Continue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::JobState;
    use nix::unistd::Pid;

    #[test]
    fn test_jobs_lists_every_job() {
        let ctx = ShellContext::for_tests();
        {
            let mut guard = ctx.jobs.lock();
            guard.table.add(Pid::from_raw(21), JobState::Background, "sleep 5 &").unwrap();
            guard.table.add(Pid::from_raw(22), JobState::Stopped, "vi").unwrap();
        }
        let mut out = Vec::<u8>::new();
        let outcome = handle(&[], &ctx, &mut out).unwrap();

        assert_eq!(outcome, BuiltinOutcome::Continue);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "[1] (21) Running sleep 5 &\n[2] (22) Stopped vi\n"
        );
    }

    #[test]
    fn test_jobs_with_empty_table_prints_nothing() {
        let ctx = ShellContext::for_tests();
        let mut out = Vec::<u8>::new();
        handle(&[], &ctx, &mut out).unwrap();
        assert!(out.is_empty());
    }
}
