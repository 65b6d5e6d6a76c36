// src/core/job_table.rs

//! # Job Table
//!
//! A fixed-capacity registry mapping live child processes to their job metadata.
//! Every operation is a linear scan over `MAX_JOBS` slots; the table is small and
//! never grows, so lookups stay trivially bounded.
//!
//! The table itself knows nothing about locking. Callers reach it through
//! `state::SharedJobs`, which serializes the control thread and the signal relay.

use crate::{
    constants::MAX_JOBS,
    models::{Jid, Job, JobState},
};
use log::debug;
use nix::unistd::Pid;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum JobTableError {
    #[error("Invalid process id {0}.")]
    InvalidPid(Pid),
    #[error("Tried to create too many jobs")]
    Full,
    #[error("Process {0} is already tracked as a job.")]
    DuplicatePid(Pid),
    #[error("Job with pid {0} cannot run in the foreground: pid {1} already does.")]
    ForegroundOccupied(Pid, Pid),
    #[error("{0}: No such process")]
    NotFound(Pid),
}

/// The job registry. Slot order is preserved for display.
#[derive(Debug, Default)]
pub struct JobTable {
    slots: [Option<Job>; MAX_JOBS],
}

impl JobTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a job into the first empty slot and returns its assigned jid.
    ///
    /// Fails without touching the table if `pid < 1`, if the pid is already
    /// tracked, if no slot is free, or if a second foreground job is requested.
    pub fn add(&mut self, pid: Pid, state: JobState, command_line: &str) -> Result<Jid, JobTableError> {
        if pid.as_raw() < 1 {
            return Err(JobTableError::InvalidPid(pid));
        }
        if self.find_by_pid(pid).is_some() {
            return Err(JobTableError::DuplicatePid(pid));
        }
        if state == JobState::Foreground {
            if let Some(current) = self.foreground_pid() {
                return Err(JobTableError::ForegroundOccupied(pid, current));
            }
        }

        let jid = self.next_jid();
        let slot = self
            .slots
            .iter_mut()
            .find(|slot| slot.is_none())
            .ok_or(JobTableError::Full)?;

        *slot = Some(Job {
            pid,
            jid,
            state,
            command_line: command_line.to_string(),
        });
        debug!("Added job [{}] ({}) as {:?}", jid, pid, state);
        Ok(jid)
    }

    /// Clears the slot holding `pid` and returns the removed job.
    pub fn remove(&mut self, pid: Pid) -> Option<Job> {
        if pid.as_raw() < 1 {
            return None;
        }
        let removed = self
            .slots
            .iter_mut()
            .find(|slot| slot.as_ref().is_some_and(|job| job.pid == pid))?
            .take();
        if let Some(job) = &removed {
            debug!(
                "Removed job [{}] ({}); next jid is now {}",
                job.jid,
                job.pid,
                self.next_jid()
            );
        }
        removed
    }

    pub fn find_by_pid(&self, pid: Pid) -> Option<&Job> {
        if pid.as_raw() < 1 {
            return None;
        }
        self.iter().find(|job| job.pid == pid)
    }

    pub fn find_by_jid(&self, jid: Jid) -> Option<&Job> {
        if jid < 1 {
            return None;
        }
        self.iter().find(|job| job.jid == jid)
    }

    /// Moves the job with `pid` into `state`, keeping the single-foreground invariant.
    pub fn set_state(&mut self, pid: Pid, state: JobState) -> Result<(), JobTableError> {
        if state == JobState::Foreground {
            if let Some(current) = self.foreground_pid() {
                if current != pid {
                    return Err(JobTableError::ForegroundOccupied(pid, current));
                }
            }
        }
        let job = self
            .slots
            .iter_mut()
            .flatten()
            .find(|job| job.pid == pid)
            .ok_or(JobTableError::NotFound(pid))?;
        debug!("Job [{}] ({}): {:?} -> {:?}", job.jid, job.pid, job.state, state);
        job.state = state;
        Ok(())
    }

    /// Pid of the job currently in the foreground, if any.
    pub fn foreground_pid(&self) -> Option<Pid> {
        self.iter()
            .find(|job| job.state == JobState::Foreground)
            .map(|job| job.pid)
    }

    /// Largest jid currently allocated, `0` for an empty table.
    pub fn max_jid(&self) -> Jid {
        self.iter().map(|job| job.jid).max().unwrap_or(0)
    }

    /// The jid the next `add` will hand out.
    ///
    /// Always `max_jid() + 1`, unless that would exceed the table capacity, in
    /// which case numbering wraps to the lowest free jid starting from 1.
    pub fn next_jid(&self) -> Jid {
        let candidate = self.max_jid() + 1;
        if usize::try_from(candidate).is_ok_and(|c| c <= MAX_JOBS) {
            return candidate;
        }
        (1..)
            .find(|jid| self.find_by_jid(*jid).is_none())
            .unwrap_or(1)
    }

    pub fn has_stopped(&self) -> bool {
        self.iter().any(|job| job.state == JobState::Stopped)
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Occupied slots, in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &Job> {
        self.slots.iter().flatten()
    }

    /// A snapshot of the table for display, one formatted line per job.
    pub fn list(&self) -> Vec<String> {
        self.iter().map(Job::to_string).collect()
    }
}
