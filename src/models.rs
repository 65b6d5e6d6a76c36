// src/models.rs

use nix::unistd::Pid;
use std::fmt;

/// Shell-assigned job identifier. Distinct from the kernel's pid numbering.
pub type Jid = u32;

/// The lifecycle state of a tracked job.
///
/// At most one job is `Foreground` at any time. `Undefined` is only the value
/// of a slot that is being cleared; it is never shown as a running state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JobState {
    #[default]
    Undefined,
    Foreground,
    Background,
    Stopped,
}

impl JobState {
    /// The label printed by the `jobs` built-in.
    pub fn label(self) -> &'static str {
        match self {
            Self::Background => "Running",
            Self::Foreground => "Foreground",
            Self::Stopped => "Stopped",
            Self::Undefined => "Undefined",
        }
    }

    /// The state a freshly launched job starts in.
    pub fn for_launch(background: bool) -> Self {
        if background {
            Self::Background
        } else {
            Self::Foreground
        }
    }
}

/// One child process tracked by the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub pid: Pid,
    pub jid: Jid,
    pub state: JobState,
    /// The text typed to launch the job, kept for display.
    pub command_line: String,
}

// `[jid] (pid) Label command line`, one line of `jobs` output.
impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] ({}) {} {}",
            self.jid,
            self.pid,
            self.state.label(),
            self.command_line
        )
    }
}

/// A parsed command line, ready to be dispatched or launched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    /// The argument vector. Never empty.
    pub argv: Vec<String>,
    /// Whether the line ended with a `&` argument.
    pub background: bool,
    /// The raw text of the line without its trailing newline.
    pub text: String,
}

impl CommandLine {
    /// The program name (first argument).
    pub fn program(&self) -> &str {
        self.argv.first().map(String::as_str).unwrap_or_default()
    }

    /// All arguments after the program name.
    pub fn args(&self) -> &[String] {
        self.argv.get(1..).unwrap_or_default()
    }
}
