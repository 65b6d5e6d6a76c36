// src/cli/handlers/quit.rs

use super::{BuiltinOutcome, commons::BuiltinError};
use crate::state::ShellContext;
use anyhow::Result;
use std::io::Write;

/// Main entry point for the 'quit' command.
///
/// Refuses while any job is stopped, since leaving would strand it. Running
/// background jobs do not prevent quitting.
pub fn handle(args: &[String], ctx: &ShellContext, _out: &mut dyn Write) -> Result<BuiltinOutcome> {
    if !args.is_empty() {
        return Err(BuiltinError::TooManyArguments("quit").into());
    }
    if ctx.jobs.lock().table.has_stopped() {
        return Err(BuiltinError::StoppedJobs.into());
    }
    log::debug!("quit accepted");
    Ok(BuiltinOutcome::Exit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::JobState;
    use nix::unistd::Pid;

    #[test]
    fn test_quit_with_no_jobs_exits() {
        let ctx = ShellContext::for_tests();
        let outcome = handle(&[], &ctx, &mut std::io::sink()).unwrap();
        assert_eq!(outcome, BuiltinOutcome::Exit);
    }

    #[test]
    fn test_quit_with_background_job_exits() {
        let ctx = ShellContext::for_tests();
        ctx.jobs
            .lock()
            .table
            .add(Pid::from_raw(31), JobState::Background, "sleep 5 &")
            .unwrap();
        let outcome = handle(&[], &ctx, &mut std::io::sink()).unwrap();
        assert_eq!(outcome, BuiltinOutcome::Exit);
    }

    #[test]
    fn test_quit_refused_with_stopped_job() {
        let ctx = ShellContext::for_tests();
        ctx.jobs
            .lock()
            .table
            .add(Pid::from_raw(32), JobState::Stopped, "vi")
            .unwrap();
        let before = ctx.jobs.lock().table.list();

        let err = handle(&[], &ctx, &mut std::io::sink()).unwrap_err();
        assert_eq!(err.downcast_ref::<BuiltinError>(), Some(&BuiltinError::StoppedJobs));
        assert_eq!(ctx.jobs.lock().table.list(), before);
    }

    #[test]
    fn test_quit_rejects_arguments() {
        let ctx = ShellContext::for_tests();
        let err = handle(&["now".to_string()], &ctx, &mut std::io::sink()).unwrap_err();
        assert_eq!(err.to_string(), "quit: too many arguments");
    }
}
