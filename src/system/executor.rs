// src/system/executor.rs

//! # Process Launcher
//!
//! Starts external programs as jobs. Each child is placed in a new process group
//! it leads, so keyboard-generated signals aimed at the shell's group never reach
//! background jobs directly.

use crate::{
    constants::MAX_JOBS,
    core::job_table::JobTableError,
    models::{CommandLine, Jid, JobState},
    state::ShellContext,
    system::foreground::wait_for_foreground,
};
use nix::errno::Errno;
use nix::unistd::Pid;
use std::io::{ErrorKind, Write};
use std::os::unix::process::CommandExt;
use std::process::Command as StdCommand;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("Command '{0}' could not be started")]
    Spawn(String, #[source] std::io::Error),
    #[error("Kernel returned an unusable pid {0} for '{1}'")]
    InvalidPid(u32, String),
    #[error("Started '{command}' as pid {pid} but could not track it")]
    Register {
        command: String,
        pid: Pid,
        #[source]
        source: JobTableError,
    },
    #[error("Could not write to the output")]
    Output(#[from] std::io::Error),
}

/// What happened to a launch request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchOutcome {
    /// The job ran in the foreground and has since stopped or terminated.
    Foreground { jid: Jid, pid: Pid },
    /// The job was started in the background and is still tracked.
    Background { jid: Jid, pid: Pid },
    /// The program could not be located or executed; nothing was tracked.
    NotFound,
    /// The job table had no free slot; nothing was started.
    TableFull,
}

/// Launches `command` as a new job.
///
/// The table lock is held from before the spawn until the child is registered,
/// so the relay cannot reap the child first. When the table is already full the
/// program is not started at all. A foreground launch returns only after the
/// job leaves the foreground.
///
/// # Errors
/// Only resource exhaustion while spawning (no process slots, memory or file
/// descriptors) is fatal and returned as `LaunchError::Spawn`. A program that
/// cannot be executed for any other reason is reported as `Command not found`.
pub fn launch<W: Write>(
    command: &CommandLine,
    ctx: &ShellContext,
    out: &mut W,
) -> Result<LaunchOutcome, LaunchError> {
    let program = command.program();
    let state = JobState::for_launch(command.background);

    let mut guard = ctx.jobs.lock();
    if guard.table.len() >= MAX_JOBS {
        drop(guard);
        writeln!(out, "{}", JobTableError::Full)?;
        return Ok(LaunchOutcome::TableFull);
    }

    let child = match StdCommand::new(program)
        .args(command.args())
        .process_group(0)
        .spawn()
    {
        Ok(child) => child,
        Err(e) if is_resource_exhaustion(&e) => {
            return Err(LaunchError::Spawn(command.text.clone(), e));
        }
        Err(e) => {
            drop(guard);
            log::debug!("Could not execute '{}': {}", program, e);
            writeln!(out, "{}: Command not found", program)?;
            return Ok(LaunchOutcome::NotFound);
        }
    };

    let raw_pid = child.id();
    let pid = i32::try_from(raw_pid)
        .map(Pid::from_raw)
        .map_err(|_| LaunchError::InvalidPid(raw_pid, command.text.clone()))?;

    let jid = guard
        .table
        .add(pid, state, &command.text)
        .map_err(|source| LaunchError::Register {
            command: command.text.clone(),
            pid,
            source,
        })?;
    drop(guard);

    if ctx.config.verbose {
        writeln!(out, "Added job [{}] {} {}", jid, pid, command.text)?;
    }

    if command.background {
        writeln!(out, "[{}] ({}) {}", jid, pid, command.text)?;
        Ok(LaunchOutcome::Background { jid, pid })
    } else {
        out.flush()?;
        wait_for_foreground(&ctx.jobs, pid, ctx.config.poll_interval);
        Ok(LaunchOutcome::Foreground { jid, pid })
    }
}

/// True when the spawn failed because the system ran out of resources.
/// Any other failure belongs to the program itself and drops only that command.
fn is_resource_exhaustion(error: &std::io::Error) -> bool {
    if matches!(error.kind(), ErrorKind::WouldBlock | ErrorKind::OutOfMemory) {
        return true;
    }
    error.raw_os_error().map(Errno::from_raw).is_some_and(|errno| {
        matches!(errno, Errno::EAGAIN | Errno::ENOMEM | Errno::EMFILE | Errno::ENFILE)
    })
}
