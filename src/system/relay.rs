// src/system/relay.rs

//! # Signal Relay
//!
//! Turns asynchronous process notifications into job table updates.
//!
//! - `SIGCHLD`: reap every child that exited, was killed or stopped, and update the table.
//! - `SIGINT` / `SIGTSTP`: forward to the whole process group of the foreground job.
//! - `SIGQUIT`: print a fixed message and exit.
//!
//! The relay runs on its own thread, driving a small current-thread `tokio`
//! runtime over `tokio::signal::unix` streams. It never prints job status
//! itself: status lines are queued in the shared state and flushed by the
//! control thread.

use crate::{
    constants::QUIT_SIGNAL_MESSAGE,
    models::JobState,
    state::{JobsState, SharedJobs},
    system::process_group::{GroupSignaller, deliver},
};
use colored::Colorize;
use nix::errno::Errno;
use nix::sys::signal::Signal;
use nix::sys::wait::{WaitPidFlag, WaitStatus, waitpid};
use nix::unistd::Pid;
use std::io::Write;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use thiserror::Error;
use tokio::signal::unix::{SignalKind, signal};

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Could not start the signal runtime")]
    Runtime(#[source] std::io::Error),
    #[error("Could not install a handler for {signal}")]
    Install {
        signal: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("Could not spawn the signal relay thread")]
    Thread(#[source] std::io::Error),
    #[error("waitpid failed")]
    Reap(#[source] Errno),
    #[error("Could not forward {signal} to process group {pgid}")]
    Forward {
        signal: Signal,
        pgid: Pid,
        #[source]
        source: Errno,
    },
}

/// Applies one wait status reported by the kernel to the shared state.
///
/// Terminated jobs are removed (with a notice if a signal killed them); stopped
/// jobs stay in the table as `Stopped`. Statuses for untracked pids are ignored.
pub fn apply_wait_status(state: &mut JobsState, status: WaitStatus) {
    match status {
        WaitStatus::Exited(pid, code) => {
            log::debug!("Child {} exited with status {}", pid, code);
            if state.table.remove(pid).is_none() {
                log::debug!("Reaped untracked child {}", pid);
            }
        }
        WaitStatus::Signaled(pid, sig, _core_dumped) => match state.table.remove(pid) {
            Some(job) => state.push_notice(format!(
                "Job [{}] ({}) terminated by signal {}",
                job.jid, job.pid, sig as i32
            )),
            None => log::warn!("Reaped untracked child {} (killed by {})", pid, sig),
        },
        WaitStatus::Stopped(pid, sig) => {
            let Some(jid) = state.table.find_by_pid(pid).map(|job| job.jid) else {
                log::warn!("Untracked child {} stopped by {}", pid, sig);
                return;
            };
            if let Err(e) = state.table.set_state(pid, JobState::Stopped) {
                log::warn!("Could not mark job {} stopped: {}", pid, e);
                return;
            }
            state.push_notice(format!(
                "Job [{}] ({}) stopped by signal {}",
                jid, pid, sig as i32
            ));
        }
        other => log::debug!("Ignoring wait status {:?}", other),
    }
}

/// Reaps every child with a pending status change, without blocking.
///
/// The table lock is held for the whole sweep, which is what keeps the reap
/// from racing a launch that has not registered its child yet.
pub fn reap_children(jobs: &SharedJobs) -> Result<(), RelayError> {
    let mut guard = jobs.lock();
    loop {
        match waitpid(None, Some(WaitPidFlag::WNOHANG | WaitPidFlag::WUNTRACED)) {
            Ok(WaitStatus::StillAlive) | Err(Errno::ECHILD) => return Ok(()),
            Ok(status) => apply_wait_status(&mut guard, status),
            Err(Errno::EINTR) => continue,
            Err(e) => return Err(RelayError::Reap(e)),
        }
    }
}

/// Forwards `signal` to the foreground job's process group, if there is one.
///
/// Returns the group the signal went to.
pub fn forward_to_foreground(
    jobs: &SharedJobs,
    signaller: &dyn GroupSignaller,
    signal: Signal,
) -> Result<Option<Pid>, RelayError> {
    let Some(pgid) = jobs.lock().table.foreground_pid() else {
        log::debug!("{} received with no foreground job", signal);
        return Ok(None);
    };
    match deliver(signaller, pgid, signal) {
        Ok(true) => Ok(Some(pgid)),
        Ok(false) => Ok(None),
        Err(source) => Err(RelayError::Forward {
            signal,
            pgid,
            source,
        }),
    }
}

/// The asynchronous half of job control.
#[derive(Debug)]
pub struct SignalRelay {
    jobs: SharedJobs,
    signaller: Arc<dyn GroupSignaller>,
}

impl SignalRelay {
    pub fn new(jobs: SharedJobs, signaller: Arc<dyn GroupSignaller>) -> Self {
        Self { jobs, signaller }
    }

    /// Installs the handlers and starts the relay thread.
    ///
    /// Handlers are registered before this returns, so no notification sent
    /// after a successful `spawn` is lost. Any failure here is fatal to the shell.
    pub fn spawn(self) -> Result<JoinHandle<()>, RelayError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(RelayError::Runtime)?;

        let streams = {
            let _context = runtime.enter();
            let install = |kind: SignalKind, name: &'static str| {
                signal(kind).map_err(|source| RelayError::Install {
                    signal: name,
                    source,
                })
            };
            RelayStreams {
                child: install(SignalKind::child(), "SIGCHLD")?,
                interrupt: install(SignalKind::interrupt(), "SIGINT")?,
                suspend: install(SignalKind::from_raw(Signal::SIGTSTP as i32), "SIGTSTP")?,
                quit: install(SignalKind::quit(), "SIGQUIT")?,
            }
        };

        thread::Builder::new()
            .name("signal-relay".to_string())
            .spawn(move || {
                if let Err(e) = runtime.block_on(self.run(streams)) {
                    // Job control can no longer be trusted past this point.
                    eprintln!("{}: {:#}", "Error".red().bold(), anyhow::Error::new(e));
                    std::process::exit(1);
                }
            })
            .map_err(RelayError::Thread)
    }

    async fn run(self, mut streams: RelayStreams) -> Result<(), RelayError> {
        log::debug!("Signal relay running");
        loop {
            tokio::select! {
                Some(()) = streams.child.recv() => reap_children(&self.jobs)?,
                Some(()) = streams.interrupt.recv() => {
                    forward_to_foreground(&self.jobs, self.signaller.as_ref(), Signal::SIGINT)?;
                }
                Some(()) = streams.suspend.recv() => {
                    forward_to_foreground(&self.jobs, self.signaller.as_ref(), Signal::SIGTSTP)?;
                }
                Some(()) = streams.quit.recv() => {
                    let mut stdout = std::io::stdout();
                    let _ = writeln!(stdout, "{}", QUIT_SIGNAL_MESSAGE);
                    let _ = stdout.flush();
                    std::process::exit(1);
                }
                else => return Ok(()),
            }
        }
    }
}

struct RelayStreams {
    child: tokio::signal::unix::Signal,
    interrupt: tokio::signal::unix::Signal,
    suspend: tokio::signal::unix::Signal,
    quit: tokio::signal::unix::Signal,
}
