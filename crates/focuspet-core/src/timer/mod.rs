mod engine;
mod queue;

pub use engine::{format_mm_ss, CountdownEngine, TickOutcome, TimerStatus};
pub use queue::{Timer, TimerQueue};
