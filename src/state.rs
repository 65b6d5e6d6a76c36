// src/state.rs

use crate::{
    core::{config_loader::ShellConfig, job_table::JobTable},
    system::process_group::GroupSignaller,
};
use std::ops::{Deref, DerefMut};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Everything the control thread and the signal relay share.
#[derive(Debug, Default)]
pub struct JobsState {
    pub table: JobTable,
    /// Human-readable status lines produced by the relay, flushed by the control thread.
    notices: Vec<String>,
}

impl JobsState {
    /// Queues a status line for the control thread to print.
    pub fn push_notice(&mut self, notice: String) {
        self.notices.push(notice);
    }

    /// Notices queued and not yet flushed.
    pub fn notices(&self) -> &[String] {
        &self.notices
    }
}

/// The job table shared between the control thread and the signal relay.
///
/// Holding the guard returned by `lock` is the one and only way to touch the
/// table. The launcher keeps it across spawn and registration, the relay keeps
/// it across every reap, so a child can never be reaped before it is tracked.
#[derive(Debug, Clone, Default)]
pub struct SharedJobs {
    inner: Arc<(Mutex<JobsState>, Condvar)>,
}

impl SharedJobs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Locks the shared state.
    ///
    /// A poisoned lock is recovered: every table mutation re-checks its own
    /// invariants, so a panic elsewhere cannot leave it half-updated.
    pub fn lock(&self) -> JobsGuard<'_> {
        let (mutex, condvar) = &*self.inner;
        JobsGuard {
            guard: Some(mutex.lock().unwrap_or_else(PoisonError::into_inner)),
            condvar,
            dirty: false,
        }
    }

    /// Takes every queued notice, oldest first.
    pub fn drain_notices(&self) -> Vec<String> {
        let (mutex, _) = &*self.inner;
        let mut state = mutex.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut state.notices)
    }

    /// Blocks until `done` holds for the shared state.
    ///
    /// The predicate is re-checked whenever a mutating guard is dropped, and at
    /// least once every `poll_interval` regardless.
    pub fn wait_until<F>(&self, poll_interval: Duration, mut done: F)
    where
        F: FnMut(&JobsState) -> bool,
    {
        let (mutex, condvar) = &*self.inner;
        let mut state = mutex.lock().unwrap_or_else(PoisonError::into_inner);
        while !done(&state) {
            state = condvar
                .wait_timeout(state, poll_interval)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
    }
}

/// A lock guard that wakes foreground waiters when it was used to mutate.
pub struct JobsGuard<'a> {
    guard: Option<MutexGuard<'a, JobsState>>,
    condvar: &'a Condvar,
    dirty: bool,
}

impl std::fmt::Debug for JobsGuard<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobsGuard").field("dirty", &self.dirty).finish()
    }
}

impl Deref for JobsGuard<'_> {
    type Target = JobsState;

    fn deref(&self) -> &Self::Target {
        // The guard is only taken out in `drop`.
        self.guard.as_deref().unwrap_or_else(|| unreachable!())
    }
}

impl DerefMut for JobsGuard<'_> {
    fn deref_mut(&mut self) -> &mut JobsState {
        self.dirty = true;
        self.guard.as_deref_mut().unwrap_or_else(|| unreachable!())
    }
}

impl Drop for JobsGuard<'_> {
    fn drop(&mut self) {
        // Release the lock before waking anyone, so waiters don't immediately block on it.
        drop(self.guard.take());
        if self.dirty {
            self.condvar.notify_all();
        }
    }
}

/// Everything a command needs: the shared jobs, the way to signal them, and the settings.
#[derive(Debug, Clone)]
pub struct ShellContext {
    pub jobs: SharedJobs,
    pub signaller: Arc<dyn GroupSignaller>,
    pub config: ShellConfig,
}

impl ShellContext {
    pub fn new(config: ShellConfig, signaller: Arc<dyn GroupSignaller>) -> Self {
        Self {
            jobs: SharedJobs::new(),
            signaller,
            config,
        }
    }

    #[cfg(test)]
    pub(crate) fn for_tests() -> Self {
        Self::with_signaller(Arc::new(
            crate::system::process_group::testing::RecordingSignaller::default(),
        ))
    }

    #[cfg(test)]
    pub(crate) fn with_signaller(signaller: Arc<dyn GroupSignaller>) -> Self {
        let config = ShellConfig {
            poll_interval: Duration::from_millis(5),
            ..ShellConfig::default()
        };
        Self::new(config, signaller)
    }
}
