//! # Focuspet Core Library
//!
//! Core logic for a focus timer with a virtual pet. The CLI binary is a thin
//! driver over this crate; everything that decides state lives here.
//!
//! ## Architecture
//!
//! - **Countdown engine**: one-second pulses against a remaining-seconds counter,
//!   with run epochs so stale pulses from a previous run never count
//! - **Activity watchdog**: flags the user as distracted when the surface is
//!   hidden or when no activity was seen for longer than the threshold
//! - **Mood**: a pure function of timer status, distraction and the
//!   completion flash
//! - **Tasks**: task list with subtasks, an active task and a creation quota
//! - **Session controller**: single owner of all of the above, driven by
//!   commands, signals and elapsed time on an injected [`Clock`]
//!
//! ## Key Components
//!
//! - [`SessionController`]: applies inputs and returns [`Event`]s
//! - [`SessionView`]: read-only snapshot for rendering
//! - [`Config`]: TOML configuration
//! - [`simulation`]: scripted runs on a [`ManualClock`]

pub mod clock;
pub mod error;
pub mod events;
pub mod mood;
pub mod session;
pub mod simulation;
pub mod stats;
pub mod storage;
pub mod task;
pub mod timer;
pub mod watchdog;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ConfigError, CoreError, Result, ValidationError};
pub use events::Event;
pub use mood::{derive_mood, Mood};
pub use session::{
    parse_line, ActiveTaskView, Command, Input, SessionController, SessionState, SessionView,
    Signal,
};
pub use simulation::{parse_script, run_script, simulate, RejectedStep, ScriptStep, SimulationReport};
pub use stats::StatsSummary;
pub use storage::Config;
pub use task::{Subtask, Task, TaskQuota, TaskTracker};
pub use timer::{format_mm_ss, CountdownEngine, TickOutcome, TimerStatus};
pub use watchdog::{ActivityWatchdog, DistractionReason};
