// src/cli/handlers/commons.rs

// Shared pieces of the built-in handlers: user-facing errors and job lookup.

use crate::{
    core::job_table::JobTable,
    models::{Jid, Job},
};
use nix::unistd::Pid;
use thiserror::Error;

/// Mistakes in what the user typed. These are reported and the loop goes on.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum BuiltinError {
    #[error("{0}: command must be a PID or %jobid argument")]
    MissingArgument(&'static str),
    #[error("{0}: argument must be PID or %jobid")]
    BadArgument(&'static str),
    #[error("{0}: No such process")]
    NoSuchProcess(Pid),
    #[error("%{0}: No such Job")]
    NoSuchJob(Jid),
    #[error("There are stopped jobs.")]
    StoppedJobs,
    #[error("{0}: too many arguments")]
    TooManyArguments(&'static str),
}

/// How a `bg`/`fg` argument names its job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobTarget {
    /// A bare number: a process id.
    Pid(Pid),
    /// `%` followed by a number: a job id.
    Jid(Jid),
}

/// Parses the argument of `bg`/`fg`: `<pid>` or `%<jid>`, both positive decimals.
pub fn parse_job_target(command: &'static str, arg: Option<&str>) -> Result<JobTarget, BuiltinError> {
    let arg = arg.ok_or(BuiltinError::MissingArgument(command))?;
    let (digits, is_jid) = match arg.strip_prefix('%') {
        Some(rest) => (rest, true),
        None => (arg, false),
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(BuiltinError::BadArgument(command));
    }

    if is_jid {
        match digits.parse::<Jid>() {
            Ok(jid) if jid > 0 => Ok(JobTarget::Jid(jid)),
            _ => Err(BuiltinError::BadArgument(command)),
        }
    } else {
        match digits.parse::<i32>() {
            Ok(raw) if raw > 0 => Ok(JobTarget::Pid(Pid::from_raw(raw))),
            _ => Err(BuiltinError::BadArgument(command)),
        }
    }
}

/// Finds the job a target names.
pub fn resolve_target(table: &JobTable, target: JobTarget) -> Result<&Job, BuiltinError> {
    match target {
        JobTarget::Pid(pid) => table
            .find_by_pid(pid)
            .ok_or(BuiltinError::NoSuchProcess(pid)),
        JobTarget::Jid(jid) => table.find_by_jid(jid).ok_or(BuiltinError::NoSuchJob(jid)),
    }
}
