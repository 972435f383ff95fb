//! Schedule plugins and the jobs that drive them

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use once_cell::sync::OnceCell;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

use super::interval::{Clock, IntervalSpec};
use crate::application::context::BotContext;
use crate::application::errors::{BotError, ScheduleError};

/// A schedule plugin
#[async_trait]
pub trait Schedule: Send + Sync {
    /// Cron expression or RFC 3339 instant
    fn interval(&self) -> &str;

    /// Run once at registration, before the first tick
    fn run_on_load(&self) -> bool {
        false
    }

    async fn run(&self, ctx: &ScheduleContext) -> Result<(), BotError>;

    /// Called once when the job stops
    async fn on_complete(&self, _ctx: &ScheduleContext) -> Result<(), BotError> {
        Ok(())
    }
}

/// What a schedule sees when it runs. The job handle is attached after the job is built.
pub struct ScheduleContext {
    bot: BotContext,
    name: String,
    job: OnceCell<JobHandle>,
}

impl ScheduleContext {
    pub fn new(bot: BotContext, name: impl Into<String>) -> Self {
        Self {
            bot,
            name: name.into(),
            job: OnceCell::new(),
        }
    }

    pub fn bot(&self) -> &BotContext {
        &self.bot
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Handle of the job running this schedule; set before the first run
    pub fn job(&self) -> Option<&JobHandle> {
        self.job.get()
    }

    fn attach(&self, handle: JobHandle) -> Result<(), ScheduleError> {
        self.job
            .set(handle)
            .map_err(|_| ScheduleError::AlreadyRunning(self.name.clone()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    /// Built, not started yet
    Idle,
    /// Waiting for the next tick
    Scheduled,
    Running,
    Stopped,
}

struct JobShared {
    name: String,
    state: Mutex<JobState>,
    started: AtomicBool,
    stopped: AtomicBool,
    completed: AtomicBool,
    stop: Notify,
    run_lock: tokio::sync::Mutex<()>,
    runs: AtomicU64,
    skipped: AtomicU64,
    task: Mutex<Option<JoinHandle<()>>>,
}

/// Cheap, cloneable view of a job's lifecycle
#[derive(Clone)]
pub struct JobHandle {
    shared: Arc<JobShared>,
}

impl JobHandle {
    fn new(name: String) -> Self {
        Self {
            shared: Arc::new(JobShared {
                name,
                state: Mutex::new(JobState::Idle),
                started: AtomicBool::new(false),
                stopped: AtomicBool::new(false),
                completed: AtomicBool::new(false),
                stop: Notify::new(),
                run_lock: tokio::sync::Mutex::new(()),
                runs: AtomicU64::new(0),
                skipped: AtomicU64::new(0),
                task: Mutex::new(None),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.shared.name
    }

    pub fn state(&self) -> JobState {
        *self.shared.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Completed runs, failed ones included
    pub fn runs(&self) -> u64 {
        self.shared.runs.load(Ordering::SeqCst)
    }

    /// Triggers dropped because the previous run was still going
    pub fn skipped(&self) -> u64 {
        self.shared.skipped.load(Ordering::SeqCst)
    }

    pub fn is_stopped(&self) -> bool {
        self.shared.stopped.load(Ordering::SeqCst)
    }

    /// Ask the job to stop. No further ticks fire; a run in progress finishes.
    pub fn request_stop(&self) {
        self.shared.stopped.store(true, Ordering::SeqCst);
        self.shared.stop.notify_one();
    }

    fn set_state(&self, state: JobState) {
        let mut current = self.shared.state.lock().unwrap_or_else(|e| e.into_inner());
        if *current != JobState::Stopped {
            *current = state;
        }
    }

    fn take_task(&self) -> Option<JoinHandle<()>> {
        self.shared.task.lock().unwrap_or_else(|e| e.into_inner()).take()
    }
}

/// Assembles a job in the required order: context first, then the job, then
/// the job handle goes into the context
pub struct JobBuilder {
    name: String,
    interval: IntervalSpec,
    schedule: Arc<dyn Schedule>,
    context: ScheduleContext,
    clock: Clock,
}

impl JobBuilder {
    pub fn new(name: impl Into<String>, schedule: Box<dyn Schedule>, context: ScheduleContext) -> Result<Self, ScheduleError> {
        let interval = IntervalSpec::parse(schedule.interval())?;
        Ok(Self {
            name: name.into(),
            interval,
            schedule: Arc::from(schedule),
            context,
            clock: Clock::new(),
        })
    }

    pub fn clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn build(self) -> Result<Arc<Job>, ScheduleError> {
        let handle = JobHandle::new(self.name);
        self.context.attach(handle.clone())?;
        Ok(Arc::new(Job {
            handle,
            interval: self.interval,
            schedule: self.schedule,
            context: Arc::new(self.context),
            clock: self.clock,
        }))
    }
}

/// A schedule bound to its interval and execution context
pub struct Job {
    handle: JobHandle,
    interval: IntervalSpec,
    schedule: Arc<dyn Schedule>,
    context: Arc<ScheduleContext>,
    clock: Clock,
}

impl Job {
    pub fn handle(&self) -> &JobHandle {
        &self.handle
    }

    pub fn name(&self) -> &str {
        self.handle.name()
    }

    pub fn interval(&self) -> &IntervalSpec {
        &self.interval
    }

    pub fn run_on_load(&self) -> bool {
        self.schedule.run_on_load()
    }

    /// Run the schedule once. Returns `Ok(false)` when the previous run is
    /// still in progress and this trigger was skipped.
    pub async fn fire(&self) -> Result<bool, BotError> {
        let Ok(_guard) = self.handle.shared.run_lock.try_lock() else {
            self.handle.shared.skipped.fetch_add(1, Ordering::SeqCst);
            tracing::warn!("Schedule {} is still running, skipping this run", self.name());
            return Ok(false);
        };

        self.handle.set_state(JobState::Running);
        let result = self.schedule.run(&self.context).await;
        self.handle.shared.runs.fetch_add(1, Ordering::SeqCst);

        if self.handle.shared.started.load(Ordering::SeqCst) {
            self.handle.set_state(JobState::Scheduled);
        } else {
            self.handle.set_state(JobState::Idle);
        }
        result.map(|()| true)
    }

    /// Spawn the timer loop. Starting twice is a no-op.
    pub fn start(self: &Arc<Self>) {
        if self.handle.shared.started.swap(true, Ordering::SeqCst) {
            return;
        }
        self.handle.set_state(JobState::Scheduled);

        let job = Arc::clone(self);
        let task = tokio::spawn(async move { job.drive().await });
        *self.handle.shared.task.lock().unwrap_or_else(|e| e.into_inner()) = Some(task);
    }

    /// Stop the job and wait for its timer loop to finish
    pub async fn stop(&self) {
        self.handle.request_stop();
        match self.handle.take_task() {
            Some(task) => {
                if let Err(e) = task.await {
                    tracing::error!("Schedule {} task failed: {}", self.name(), e);
                }
            }
            None => self.complete().await,
        }
    }

    async fn drive(self: Arc<Self>) {
        let mut cursor = self.clock.now();
        loop {
            if self.handle.is_stopped() {
                break;
            }
            let Some(next) = self.interval.next_after(&cursor) else {
                tracing::debug!("Schedule {} has no further fires", self.name());
                break;
            };

            tokio::select! {
                _ = self.clock.sleep_until(next) => {}
                _ = self.handle.shared.stop.notified() => break,
            }
            cursor = next;

            // runs are detached so a slow run never delays the timer
            let job = Arc::clone(&self);
            tokio::spawn(async move {
                if let Err(e) = job.fire().await {
                    tracing::error!("Schedule {} failed: {}", job.name(), e);
                }
            });
        }
        self.complete().await;
    }

    async fn complete(&self) {
        if self.handle.shared.completed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.handle.shared.stopped.store(true, Ordering::SeqCst);
        self.handle.set_state(JobState::Stopped);

        if let Err(e) = self.schedule.on_complete(&self.context).await {
            tracing::error!("Completion hook of {} failed: {}", self.name(), e);
        }
        tracing::info!("Schedule {} stopped", self.name());
    }
}
