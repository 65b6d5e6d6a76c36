// src/cli/dispatcher.rs

use anyhow::Result;
use std::io::Write;

use crate::{
    cli::handlers::{self, BuiltinOutcome, commons::BuiltinError},
    models::CommandLine,
    state::ShellContext,
};

// --- Command Definition and Registry ---

type Handler = fn(&[String], &ShellContext, &mut dyn Write) -> Result<BuiltinOutcome>;

/// Defines a built-in command and its handler.
struct CommandDefinition {
    name: &'static str,
    handler: Handler,
}

/// The single source of truth for all built-in commands.
static COMMAND_REGISTRY: &[CommandDefinition] = &[
    CommandDefinition {
        name: "quit",
        handler: handlers::quit::handle,
    },
    CommandDefinition {
        name: "jobs",
        handler: handlers::jobs::handle,
    },
    CommandDefinition {
        name: "bg",
        handler: handlers::bgfg::handle_bg,
    },
    CommandDefinition {
        name: "fg",
        handler: handlers::bgfg::handle_fg,
    },
];

fn find_command(name: &str) -> Option<&'static CommandDefinition> {
    COMMAND_REGISTRY.iter().find(|cmd| cmd.name == name)
}

/// The result of offering a command line to the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// Not a built-in; the caller should launch it as a program.
    External,
    /// A built-in ran (or reported a usage error); keep reading.
    Handled,
    /// `quit` was accepted.
    Exit,
}

/// Runs `command` if it names a built-in.
///
/// Usage errors are written to `out` and count as handled. Any other error
/// is an operating-system failure and is returned to the caller.
pub fn dispatch(command: &CommandLine, ctx: &ShellContext, out: &mut dyn Write) -> Result<Dispatch> {
    let Some(definition) = find_command(command.program()) else {
        return Ok(Dispatch::External);
    };
    log::debug!("Dispatching built-in '{}' with {:?}", definition.name, command.args());

    match (definition.handler)(command.args(), ctx, &mut *out) {
        Ok(BuiltinOutcome::Continue) => Ok(Dispatch::Handled),
        Ok(BuiltinOutcome::Exit) => Ok(Dispatch::Exit),
        Err(e) => match e.downcast_ref::<BuiltinError>() {
            Some(user_error) => {
                writeln!(out, "{}", user_error)?;
                Ok(Dispatch::Handled)
            }
            None => Err(e),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::parser::parse_line;
    use crate::models::JobState;
    use nix::unistd::Pid;

    fn run(line: &str, ctx: &ShellContext) -> (Dispatch, String) {
        let command = parse_line(line).unwrap().unwrap();
        let mut out = Vec::<u8>::new();
        let result = dispatch(&command, ctx, &mut out).unwrap();
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_external_commands_are_not_handled() {
        let ctx = ShellContext::for_tests();
        assert_eq!(run("ls -l", &ctx), (Dispatch::External, String::new()));
        assert!(find_command("sleep").is_none());
        assert!(find_command("fg").is_some());
    }

    #[test]
    fn test_user_errors_are_printed_and_handled() {
        let ctx = ShellContext::for_tests();
        assert_eq!(
            run("bg 99999", &ctx),
            (Dispatch::Handled, "99999: No such process\n".to_string())
        );
        assert_eq!(
            run("fg", &ctx),
            (
                Dispatch::Handled,
                "fg: command must be a PID or %jobid argument\n".to_string()
            )
        );
        assert_eq!(
            run("bg %x", &ctx),
            (Dispatch::Handled, "bg: argument must be PID or %jobid\n".to_string())
        );
    }

    #[test]
    fn test_quit_flow() {
        let ctx = ShellContext::for_tests();
        ctx.jobs
            .lock()
            .table
            .add(Pid::from_raw(61), JobState::Stopped, "vi")
            .unwrap();
        assert_eq!(
            run("quit", &ctx),
            (Dispatch::Handled, "There are stopped jobs.\n".to_string())
        );

        ctx.jobs.lock().table.remove(Pid::from_raw(61));
        assert_eq!(run("quit", &ctx), (Dispatch::Exit, String::new()));
    }

    #[test]
    fn test_jobs_output() {
        let ctx = ShellContext::for_tests();
        ctx.jobs
            .lock()
            .table
            .add(Pid::from_raw(62), JobState::Background, "sleep 5 &")
            .unwrap();
        assert_eq!(
            run("jobs", &ctx),
            (Dispatch::Handled, "[1] (62) Running sleep 5 &\n".to_string())
        );
    }
}
