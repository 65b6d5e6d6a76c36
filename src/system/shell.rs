// src/system/shell.rs

//! The read-eval loop: one command line per iteration, built-ins first,
//! everything else launched as a job.

use crate::{
    cli::dispatcher::{self, Dispatch},
    constants::MAX_LINE,
    core::parser::parse_line,
    state::ShellContext,
    system::executor,
};
use anyhow::{Context, Result};
use std::io::{BufRead, Write};

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// End of input (ctrl-d).
    EndOfInput,
    /// The `quit` built-in was accepted.
    Quit,
}

/// An interactive session over some input and output.
#[derive(Debug)]
pub struct Shell<R, W> {
    ctx: ShellContext,
    input: R,
    out: W,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(ctx: ShellContext, input: R, out: W) -> Self {
        Self { ctx, input, out }
    }

    /// Runs until end of input or `quit`.
    ///
    /// # Errors
    /// Only unrecoverable failures end the loop with an error: an unreadable
    /// input, an unwritable output, or a failed process-control primitive.
    pub fn run(&mut self) -> Result<ExitReason> {
        let mut buf = Vec::new();
        loop {
            self.flush_notices()?;
            if self.ctx.config.emit_prompt {
                write!(self.out, "{}", self.ctx.config.prompt)?;
                self.out.flush()?;
            }

            buf.clear();
            let read = self
                .input
                .read_until(b'\n', &mut buf)
                .context("Could not read the command line")?;
            if read == 0 {
                self.out.flush()?;
                return Ok(ExitReason::EndOfInput);
            }

            // Bytes that are not UTF-8 become U+FFFD; the command still runs or fails on its own.
            let line = String::from_utf8_lossy(&buf);
            if let Some(reason) = self.eval(&line)? {
                self.flush_notices()?;
                return Ok(reason);
            }
            self.out.flush()?;
        }
    }

    /// Evaluates one line. Returns `Some` when the shell should stop.
    pub fn eval(&mut self, line: &str) -> Result<Option<ExitReason>> {
        if line.len() > MAX_LINE {
            writeln!(self.out, "Command line too long (max {} bytes)", MAX_LINE)?;
            return Ok(None);
        }
        let command = match parse_line(line) {
            Ok(Some(command)) => command,
            Ok(None) => return Ok(None),
            Err(e) => {
                writeln!(self.out, "{}", e)?;
                return Ok(None);
            }
        };

        match dispatcher::dispatch(&command, &self.ctx, &mut self.out)? {
            Dispatch::Exit => return Ok(Some(ExitReason::Quit)),
            Dispatch::Handled => {}
            Dispatch::External => {
                executor::launch(&command, &self.ctx, &mut self.out)
                    .with_context(|| format!("Failed to launch '{}'", command.text))?;
            }
        }
        self.flush_notices()?;
        Ok(None)
    }

    /// Prints the status lines queued by the signal relay.
    fn flush_notices(&mut self) -> Result<()> {
        for notice in self.ctx.jobs.drain_notices() {
            writeln!(self.out, "{}", notice)?;
        }
        Ok(())
    }

    /// The output sink, for inspection once the loop has returned.
    pub fn output(&self) -> &W {
        &self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::JobState;
    use nix::unistd::Pid;
    use std::io::Cursor;

    fn session(input: &str) -> Shell<Cursor<Vec<u8>>, Vec<u8>> {
        Shell::new(
            ShellContext::for_tests(),
            Cursor::new(input.as_bytes().to_vec()),
            Vec::new(),
        )
    }

    fn output(shell: &Shell<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(shell.output().clone()).unwrap()
    }

    #[test]
    fn test_end_of_input_exits_cleanly() {
        let mut shell = session("");
        assert_eq!(shell.run().unwrap(), ExitReason::EndOfInput);
        assert_eq!(output(&shell), "tsh> ");
    }

    #[test]
    fn test_blank_lines_and_quit() {
        let mut shell = session("\n   \nquit\njobs\n");
        assert_eq!(shell.run().unwrap(), ExitReason::Quit);
        assert_eq!(output(&shell), "tsh> tsh> tsh> ");
    }

    #[test]
    fn test_quit_refused_then_end_of_input() {
        let mut shell = session("quit\n");
        shell
            .ctx
            .jobs
            .lock()
            .table
            .add(Pid::from_raw(70), JobState::Stopped, "vi")
            .unwrap();
        assert_eq!(shell.run().unwrap(), ExitReason::EndOfInput);
        assert_eq!(output(&shell), "tsh> There are stopped jobs.\ntsh> ");
        assert_eq!(shell.ctx.jobs.lock().table.len(), 1);
    }

    #[test]
    fn test_relay_notices_are_flushed_before_prompt() {
        let mut shell = session("jobs\n");
        shell.ctx.config.emit_prompt = false;
        shell
            .ctx
            .jobs
            .lock()
            .push_notice("Job [1] (71) terminated by signal 2".to_string());
        assert_eq!(shell.run().unwrap(), ExitReason::EndOfInput);
        assert_eq!(output(&shell), "Job [1] (71) terminated by signal 2\n");
    }

    #[test]
    fn test_unknown_command_and_parse_error() {
        let mut shell = session("tsh_no_such_binary_here\necho 'open\n");
        shell.ctx.config.emit_prompt = false;
        shell.run().unwrap();
        let text = output(&shell);
        assert!(text.starts_with("tsh_no_such_binary_here: Command not found\n"));
        assert!(text.contains("unbalanced quotes"));
        assert!(shell.ctx.jobs.lock().table.is_empty());
    }

    #[test]
    fn test_invalid_utf8_does_not_end_the_session() {
        let mut shell = Shell::new(
            ShellContext::for_tests(),
            Cursor::new(b"bg \xff\xfe\njobs\nquit\n".to_vec()),
            Vec::new(),
        );
        shell.ctx.config.emit_prompt = false;
        shell
            .ctx
            .jobs
            .lock()
            .table
            .add(Pid::from_raw(72), JobState::Background, "sleep 9 &")
            .unwrap();

        assert_eq!(shell.run().unwrap(), ExitReason::Quit);
        assert_eq!(
            output(&shell),
            "bg: argument must be PID or %jobid\n[1] (72) Running sleep 9 &\n"
        );
    }

    #[test]
    fn test_unexecutable_path_does_not_end_the_session() {
        let mut shell = session("/etc/passwd/x\njobs\nquit\n");
        shell.ctx.config.emit_prompt = false;
        assert_eq!(shell.run().unwrap(), ExitReason::Quit);
        assert_eq!(output(&shell), "/etc/passwd/x: Command not found\n");
    }

    #[test]
    fn test_overlong_line_is_rejected() {
        let mut shell = session("");
        let long = format!("echo {}\n", "x".repeat(MAX_LINE));
        assert_eq!(shell.eval(&long).unwrap(), None);
        assert_eq!(
            output(&shell),
            format!("Command line too long (max {} bytes)\n", MAX_LINE)
        );
    }
}
