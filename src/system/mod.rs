//! # System Interaction Layer
//!
//! Everything that touches processes and signals lives here. The rest of the
//! crate only sees the shared job table and the `GroupSignaller` seam.
//!
//! ## Modules
//!
//! - **`executor`**: Spawns external programs in their own process group and
//!   registers them as jobs.
//! - **`foreground`**: Blocks the control thread while a job owns the terminal.
//! - **`process_group`**: Delivers signals to whole process groups.
//! - **`relay`**: The background thread that reaps children and forwards
//!   keyboard signals to the foreground job.
//! - **`shell`**: The read-eval loop.

pub mod executor;
pub mod foreground;
pub mod process_group;
pub mod relay;
pub mod shell;
