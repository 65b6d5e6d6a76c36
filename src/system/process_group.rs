// src/system/process_group.rs

use nix::errno::Errno;
use nix::sys::signal::{Signal, killpg};
use nix::unistd::Pid;

/// Delivers a signal to every member of a process group.
///
/// Every job runs in its own group led by the job's pid, so the group id of a
/// job is its pid. Signalling the group rather than the pid is what reaches the
/// children a job may have spawned itself.
pub trait GroupSignaller: Send + Sync + std::fmt::Debug {
    fn signal_group(&self, pgid: Pid, signal: Signal) -> Result<(), Errno>;
}

/// The real thing: `killpg(2)`.
#[derive(Debug, Default, Clone, Copy)]
pub struct KernelSignaller;

impl GroupSignaller for KernelSignaller {
    fn signal_group(&self, pgid: Pid, signal: Signal) -> Result<(), Errno> {
        killpg(pgid, signal)
    }
}

/// Signals a job's group, treating an already vanished group as a no-op.
///
/// Returns `Ok(false)` when nothing was left to signal. The relay reaps such a
/// job on its own, so this is not an error.
pub fn deliver(signaller: &dyn GroupSignaller, pgid: Pid, signal: Signal) -> Result<bool, Errno> {
    match signaller.signal_group(pgid, signal) {
        Ok(()) => {
            log::debug!("Sent {} to process group {}", signal, pgid);
            Ok(true)
        }
        Err(Errno::ESRCH) => {
            log::warn!("Process group {} is gone; {} not delivered", pgid, signal);
            Ok(false)
        }
        Err(e) => Err(e),
    }
}
