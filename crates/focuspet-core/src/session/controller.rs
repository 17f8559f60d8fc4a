//! Session controller.
//!
//! Owns the whole session state and applies one transition per input on a
//! single timeline. Three kinds of input arrive:
//!
//! - user intents ([`Command`]) via [`SessionController::dispatch`]
//! - external signals ([`Signal`]) via [`SessionController::signal`]
//! - elapsed time, via [`SessionController::poll`] / [`SessionController::advance_to`]
//!
//! Before a command or signal is applied, every timer that fell due up to
//! the current clock reading is fired first, so inputs are always processed
//! in arrival order relative to ticks.

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use super::view::SessionView;
use super::{Command, Signal};
use crate::clock::{Clock, SystemClock};
use crate::error::Result;
use crate::events::Event;
use crate::mood::{Mood, MoodTracker};
use crate::stats::StatsSummary;
use crate::storage::Config;
use crate::task::{TaskQuota, TaskTracker};
use crate::timer::{CountdownEngine, TickOutcome, Timer, TimerQueue, TimerStatus};
use crate::watchdog::ActivityWatchdog;

/// Single-owner state of one running app instance.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub countdown: CountdownEngine,
    pub watchdog: ActivityWatchdog,
    pub mood: MoodTracker,
    pub tasks: TaskTracker,
}

pub struct SessionController<C: Clock = SystemClock> {
    state: SessionState,
    timers: TimerQueue,
    clock: C,
    /// Events produced but not yet handed to the caller. A rejected command
    /// leaves its catch-up events here for the next call.
    outbox: Vec<Event>,
}

impl SessionController<SystemClock> {
    pub fn with_system_clock(config: &Config) -> Self {
        Self::new(config, SystemClock)
    }
}

impl<C: Clock> SessionController<C> {
    pub fn new(config: &Config, clock: C) -> Self {
        let now = clock.now();
        Self {
            state: SessionState {
                countdown: CountdownEngine::new(config.session.focus_duration_secs),
                watchdog: ActivityWatchdog::new(&config.watchdog, now),
                mood: MoodTracker::new(&config.mood),
                tasks: TaskTracker::new(TaskQuota::from(&config.quota)),
            },
            timers: TimerQueue::new(),
            clock,
            outbox: Vec::new(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn status(&self) -> TimerStatus {
        self.state.countdown.status()
    }

    pub fn mood(&self) -> Mood {
        self.state.mood.current()
    }

    pub fn is_distracted(&self) -> bool {
        self.state
            .watchdog
            .is_distracted_while(self.state.countdown.is_running())
    }

    pub fn tasks(&self) -> &TaskTracker {
        &self.state.tasks
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Earliest instant at which a timer is due.
    pub fn next_wakeup(&self) -> Option<DateTime<Utc>> {
        self.timers.next_due()
    }

    pub fn stats(&self, window_days: u32) -> StatsSummary {
        let countdown = &self.state.countdown;
        StatsSummary::from_counter(
            countdown.sessions_completed(),
            countdown.total_secs(),
            window_days,
        )
    }

    /// Read-only view for the presentation layer.
    pub fn snapshot(&self) -> SessionView {
        SessionView::capture(&self.state, self.clock.now())
    }

    // ── Inputs ───────────────────────────────────────────────────────

    pub fn set_quota(&mut self, quota: TaskQuota) {
        self.state.tasks.set_quota(quota);
    }

    /// Fire all timers due by the current clock reading.
    pub fn poll(&mut self) -> Vec<Event> {
        let now = self.clock.now();
        self.advance_to(now)
    }

    /// Fire all timers due at or before `now`, each at its own due instant.
    pub fn advance_to(&mut self, now: DateTime<Utc>) -> Vec<Event> {
        self.catch_up(now);
        std::mem::take(&mut self.outbox)
    }

    /// Apply a user intent.
    ///
    /// Illegal timer transitions (pause while idle, start while running)
    /// are accepted and produce no events.
    ///
    /// # Errors
    ///
    /// Validation and quota errors from the task tracker. State is left as
    /// it was before the command.
    pub fn dispatch(&mut self, command: Command) -> Result<Vec<Event>> {
        let now = self.clock.now();
        self.catch_up(now);
        self.apply(command, now)?;
        Ok(std::mem::take(&mut self.outbox))
    }

    /// Apply an external signal.
    pub fn signal(&mut self, signal: Signal) -> Vec<Event> {
        let now = self.clock.now();
        self.catch_up(now);

        let running = self.state.countdown.is_running();
        match signal {
            Signal::Activity => {
                if self.state.watchdog.on_activity(now, running) {
                    self.emit(Event::ResumedFocus { at: now });
                    self.recompute_mood(now);
                }
            }
            Signal::VisibilityHidden => {
                if let Some(reason) = self.state.watchdog.on_hidden(running) {
                    self.emit(Event::DistractedAlarm { reason, at: now });
                    self.recompute_mood(now);
                }
            }
        }
        std::mem::take(&mut self.outbox)
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn emit(&mut self, event: Event) {
        self.outbox.push(event);
    }

    fn catch_up(&mut self, now: DateTime<Utc>) {
        while let Some((at, timer)) = self.timers.pop_due(now) {
            self.fire(at, timer);
        }
    }

    fn apply(&mut self, command: Command, now: DateTime<Utc>) -> Result<()> {
        match command {
            Command::Start => self.start(now),
            Command::Pause => self.pause(now),
            Command::Reset => self.reset(now),
            Command::AddTask { title } => {
                let task = self.state.tasks.add_task(&title, now)?;
                let (task_id, title) = (task.id.clone(), task.title.clone());
                self.emit(Event::TaskCreated {
                    task_id: task_id.clone(),
                    title,
                    at: now,
                });
                self.emit(Event::ActiveTaskChanged {
                    task_id: Some(task_id),
                    at: now,
                });
            }
            Command::AddSubtask { task_id, text } => {
                let subtask = self.state.tasks.add_subtask(&task_id, &text)?;
                let (subtask_id, text) = (subtask.id.clone(), subtask.text.clone());
                self.emit(Event::SubtaskAdded {
                    task_id,
                    subtask_id,
                    text,
                    at: now,
                });
            }
            Command::ToggleSubtask {
                task_id,
                subtask_id,
            } => {
                let completed = self.state.tasks.toggle_subtask(&task_id, &subtask_id)?;
                self.emit(Event::SubtaskToggled {
                    task_id,
                    subtask_id,
                    completed,
                    at: now,
                });
            }
            Command::DeleteTask { task_id } => {
                let was_active = self.state.tasks.active_id() == Some(task_id.as_str());
                self.state.tasks.delete_task(&task_id)?;
                let active_task_id = self.state.tasks.active_id().map(str::to_string);
                self.emit(Event::TaskDeleted {
                    task_id,
                    active_task_id: active_task_id.clone(),
                    at: now,
                });
                if was_active {
                    self.emit(Event::ActiveTaskChanged {
                        task_id: active_task_id,
                        at: now,
                    });
                }
            }
            Command::SelectActiveTask { task_id } => {
                self.state.tasks.select_active(&task_id)?;
                self.emit(Event::ActiveTaskChanged {
                    task_id: Some(task_id),
                    at: now,
                });
            }
        }
        Ok(())
    }

    fn start(&mut self, now: DateTime<Utc>) {
        let Some(from) = self.state.countdown.start() else {
            return;
        };
        self.state.watchdog.clear_for_start();
        self.state.mood.cancel_flash();

        let epoch = self.state.countdown.run_epoch();
        let interval = self.state.watchdog.check_interval();
        self.timers
            .schedule(now + Duration::seconds(1), Timer::CountdownPulse { epoch });
        self.timers.schedule(now + interval, Timer::SelfCheck { epoch });

        self.emit(Event::SessionStarted {
            resumed: from == TimerStatus::Paused,
            remaining_secs: self.state.countdown.remaining_secs(),
            at: now,
        });
        self.recompute_mood(now);
    }

    fn pause(&mut self, now: DateTime<Utc>) {
        let epoch = self.state.countdown.run_epoch();
        let Some(remaining_secs) = self.state.countdown.pause() else {
            return;
        };
        self.timers.cancel_run(epoch);
        self.emit(Event::SessionPaused {
            remaining_secs,
            at: now,
        });
        self.recompute_mood(now);
    }

    fn reset(&mut self, now: DateTime<Utc>) {
        let epoch = self.state.countdown.run_epoch();
        self.state.countdown.reset();
        self.timers.cancel_run(epoch);
        self.state.mood.cancel_flash();
        self.emit(Event::SessionReset { at: now });
        self.recompute_mood(now);
    }

    fn fire(&mut self, at: DateTime<Utc>, timer: Timer) {
        match timer {
            Timer::CountdownPulse { epoch } => match self.state.countdown.tick_for(epoch) {
                TickOutcome::Counted { .. } => {
                    self.timers
                        .schedule(at + Duration::seconds(1), Timer::CountdownPulse { epoch });
                }
                TickOutcome::Completed { sessions_completed } => {
                    self.timers.cancel_run(epoch);
                    self.complete(at, sessions_completed);
                }
                TickOutcome::Suppressed | TickOutcome::Stale => {
                    debug!(epoch, "countdown pulse dropped");
                }
            },
            Timer::SelfCheck { epoch } => {
                let countdown = &self.state.countdown;
                if epoch != countdown.run_epoch() || !countdown.is_running() {
                    debug!(epoch, "self-check dropped");
                    return;
                }
                let interval = self.state.watchdog.check_interval();
                self.timers.schedule(at + interval, Timer::SelfCheck { epoch });
                if let Some(reason) = self.state.watchdog.self_check(at, true) {
                    self.emit(Event::DistractedAlarm { reason, at });
                    self.recompute_mood(at);
                }
            }
            Timer::FlashExpiry => {
                if self.state.mood.expire_flash(at) {
                    self.recompute_mood(at);
                }
            }
            Timer::AlarmPulseExpiry => {
                if self.state.mood.expire_pulse(at) {
                    self.emit(Event::AlarmPulseCleared { at });
                }
            }
        }
    }

    fn complete(&mut self, at: DateTime<Utc>, sessions_completed: u64) {
        let subtask = self.state.tasks.complete_next_subtask();
        let flash_until = self.state.mood.flash(at);
        self.timers.schedule(flash_until, Timer::FlashExpiry);

        self.emit(Event::SessionCompleted {
            subtask: subtask.map(|s| s.text),
            sessions_completed,
            at,
        });
        self.recompute_mood(at);
    }

    fn recompute_mood(&mut self, at: DateTime<Utc>) {
        let status = self.state.countdown.status();
        let distracted = self
            .state
            .watchdog
            .is_distracted_while(status == TimerStatus::Running);
        let update = self.state.mood.recompute(at, status, distracted);

        if let Some((from, to)) = update.changed {
            self.emit(Event::MoodChanged { from, to, at });
        }
        if let Some(until) = update.pulse_until {
            self.timers.schedule(until, Timer::AlarmPulseExpiry);
            self.emit(Event::AlarmPulseStarted { until, at });
        }
    }
}
