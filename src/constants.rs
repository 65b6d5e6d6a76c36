// src/constants.rs

/// The number of slots in the job table. The table never grows past this.
pub const MAX_JOBS: usize = 16;

/// The maximum number of arguments accepted on one command line.
pub const MAX_ARGS: usize = 128;

/// The maximum number of bytes read for a single command line.
pub const MAX_LINE: usize = 1024;

/// The prompt printed before each command line unless prompting is disabled.
pub const DEFAULT_PROMPT: &str = "tsh> ";

/// Default delay between two checks of the foreground job's state, in milliseconds.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 10;

/// The name of the directory holding tsh configuration (inside the system config dir).
pub const CONFIG_DIR_NAME: &str = "tsh";

/// The name of the optional configuration file (inside the config dir).
pub const CONFIG_FILENAME: &str = "config.toml";

/// Environment variable that points at an explicit configuration file.
pub const CONFIG_ENV_VAR: &str = "TSH_CONFIG";

/// Message printed when the shell receives a quit notification.
pub const QUIT_SIGNAL_MESSAGE: &str = "Terminating after receipt of SIGQUIT signal";
