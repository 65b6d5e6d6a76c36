// src/system/foreground.rs

use crate::{models::JobState, state::SharedJobs};
use nix::unistd::Pid;
use std::time::Duration;

/// Blocks the control thread until `pid` is no longer the foreground job.
///
/// Returns once the table has no entry for `pid` (the job was reaped) or the
/// entry's state is anything other than `Foreground` (it was stopped). The wait
/// never touches the table; the signal relay makes the transition. There is no
/// timeout: only a state change ends the wait.
pub fn wait_for_foreground(jobs: &SharedJobs, pid: Pid, poll_interval: Duration) {
    log::debug!("Waiting for foreground job {}", pid);
    jobs.wait_until(poll_interval, |state| {
        state
            .table
            .find_by_pid(pid)
            .is_none_or(|job| job.state != JobState::Foreground)
    });
    log::debug!("Job {} left the foreground", pid);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    const POLL: Duration = Duration::from_millis(5);

    #[test]
    fn test_returns_immediately_for_unknown_pid() {
        let jobs = SharedJobs::new();
        wait_for_foreground(&jobs, Pid::from_raw(31337), POLL);
    }

    #[test]
    fn test_returns_immediately_for_background_job() {
        let jobs = SharedJobs::new();
        let pid = Pid::from_raw(10);
        jobs.lock().table.add(pid, JobState::Background, "x &").unwrap();
        wait_for_foreground(&jobs, pid, POLL);
    }

    #[test]
    fn test_waits_until_job_is_reaped() {
        let jobs = SharedJobs::new();
        let pid = Pid::from_raw(11);
        jobs.lock().table.add(pid, JobState::Foreground, "sleep 1").unwrap();

        let relay = jobs.clone();
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(30));
            relay.lock().table.remove(pid);
        });

        wait_for_foreground(&jobs, pid, POLL);
        assert!(jobs.lock().table.find_by_pid(pid).is_none());
        handle.join().unwrap();
    }

    #[test]
    fn test_waits_until_job_is_stopped() {
        let jobs = SharedJobs::new();
        let pid = Pid::from_raw(12);
        jobs.lock().table.add(pid, JobState::Foreground, "vi").unwrap();

        let relay = jobs.clone();
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(30));
            relay.lock().table.set_state(pid, JobState::Stopped).unwrap();
        });

        wait_for_foreground(&jobs, pid, POLL);
        assert_eq!(
            jobs.lock().table.find_by_pid(pid).unwrap().state,
            JobState::Stopped
        );
        handle.join().unwrap();
    }
}
