//! The execution engine: runs a [`CompiledScript`] on a background worker.

use crate::cancel::StopToken;
use crate::command::{Context, Transfer};
use crate::compiler::CompiledScript;
use crate::effector::Effector;
use crate::error::RunError;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

type FinishHandler = Arc<dyn Fn(&RunOutcome) + Send + Sync>;

/// Engine-wide settings that do not belong to any one script.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineConfig {
    /// Pause once before the first instruction of every run.
    pub start_delay: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Idle,
    Running,
}

/// How a run ended.
#[derive(Debug)]
pub enum RunOutcome {
    /// The cursor ran past the last instruction.
    Completed,
    /// [`Engine::stop`] was called or the script executed `Stop`.
    Stopped,
    /// An instruction failed; the run was aborted.
    Failed(RunError),
}

impl RunOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, RunOutcome::Completed)
    }

    pub fn is_stopped(&self) -> bool {
        matches!(self, RunOutcome::Stopped)
    }

    /// `Ok` for completed and stopped runs, the run error otherwise.
    pub fn into_result(self) -> Result<(), RunError> {
        match self {
            RunOutcome::Completed | RunOutcome::Stopped => Ok(()),
            RunOutcome::Failed(err) => Err(err),
        }
    }
}

/// State shared between the caller and the worker.
struct Shared {
    running: AtomicBool,
    cursor: AtomicUsize,
    stop: Mutex<StopToken>,
    on_finished: Mutex<Option<FinishHandler>>,
}

impl Shared {
    fn finish(&self, outcome: &RunOutcome) {
        self.running.store(false, Ordering::Release);
        match outcome {
            RunOutcome::Completed => info!("script completed"),
            RunOutcome::Stopped => info!("script stopped"),
            RunOutcome::Failed(err) => warn!("script failed: {err}"),
        }
        let handler = self
            .on_finished
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(handler) = handler {
            handler(outcome);
        }
    }
}

/// Returns the engine to idle if the worker unwinds or is dropped before
/// reporting an outcome.
struct RunGuard {
    shared: Arc<Shared>,
    armed: bool,
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        if self.armed {
            let outcome = RunOutcome::Failed(RunError::Aborted(
                "worker ended before the script finished".to_string(),
            ));
            self.shared.finish(&outcome);
        }
    }
}

/// Handle to one run started by [`Engine::start`].
#[derive(Debug)]
pub struct RunHandle {
    join: JoinHandle<RunOutcome>,
}

impl RunHandle {
    /// Wait for the run to end. The engine is already idle when this returns.
    pub async fn wait(self) -> RunOutcome {
        match self.join.await {
            Ok(outcome) => outcome,
            Err(err) => RunOutcome::Failed(RunError::Aborted(err.to_string())),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }
}

/// Runs at most one compiled script at a time.
///
/// The engine is cheap to clone; clones control the same run state, so one
/// clone can [`stop`](Self::stop) a run another clone started.
///
/// ```no_run
/// use automate::{Engine, LogEffector, compile_str};
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let script = compile_str("MouseMove 100 100\nMouseClick\n")?;
///     let engine = Engine::new(LogEffector);
///     if let Some(run) = engine.start(script, Duration::from_millis(50)) {
///         run.wait().await.into_result()?;
///     }
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct Engine {
    effector: Arc<dyn Effector>,
    config: EngineConfig,
    shared: Arc<Shared>,
}

impl Engine {
    pub fn new(effector: impl Effector + 'static) -> Self {
        Self::with_config(Arc::new(effector), EngineConfig::default())
    }

    pub fn with_config(effector: Arc<dyn Effector>, config: EngineConfig) -> Self {
        Self {
            effector,
            config,
            shared: Arc::new(Shared {
                running: AtomicBool::new(false),
                cursor: AtomicUsize::new(0),
                stop: Mutex::new(StopToken::new()),
                on_finished: Mutex::new(None),
            }),
        }
    }

    pub fn config(&self) -> EngineConfig {
        self.config
    }

    /// Register a callback fired on the worker after every run, once the
    /// engine is back to [`RunStatus::Idle`]. Replaces any previous callback.
    pub fn on_finished<F>(&self, handler: F)
    where
        F: Fn(&RunOutcome) + Send + Sync + 'static,
    {
        *self
            .shared
            .on_finished
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(handler));
    }

    /// Start running `script` on a background task, pausing `line_delay`
    /// between instructions.
    ///
    /// Returns `None` without touching the current run if a script is already
    /// running, or if called outside a Tokio runtime.
    pub fn start(&self, script: CompiledScript, line_delay: Duration) -> Option<RunHandle> {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!("cannot start script: no Tokio runtime");
            return None;
        };

        // Held until the new token is installed; stop() takes the same lock.
        let mut slot = self.shared.stop.lock().unwrap_or_else(PoisonError::into_inner);
        if self
            .shared
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("start ignored: a script is already running");
            return None;
        }

        self.shared.cursor.store(0, Ordering::Release);
        let stop = StopToken::new();
        *slot = stop.clone();
        drop(slot);

        info!(
            instructions = script.len(),
            line_delay_ms = line_delay.as_millis() as u64,
            "script started"
        );

        let shared = Arc::clone(&self.shared);
        let ctx = Context::new(Arc::clone(&self.effector), stop.clone());
        let start_delay = self.config.start_delay;

        let join = runtime.spawn(async move {
            let mut guard = RunGuard {
                shared: Arc::clone(&shared),
                armed: true,
            };
            let run = Run {
                script,
                ctx,
                stop,
                shared: Arc::clone(&shared),
                line_delay,
                start_delay,
            };
            let outcome = run.execute().await;
            guard.armed = false;
            shared.finish(&outcome);
            outcome
        });

        Some(RunHandle { join })
    }

    /// Ask the current run to stop at its next safe point. Never blocks;
    /// does nothing when idle.
    pub fn stop(&self) {
        let token = self.shared.stop.lock().unwrap_or_else(PoisonError::into_inner);
        if !self.is_running() {
            return;
        }
        debug!("stop requested");
        token.cancel();
    }

    pub fn status(&self) -> RunStatus {
        if self.is_running() {
            RunStatus::Running
        } else {
            RunStatus::Idle
        }
    }

    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::Acquire)
    }

    /// Index of the instruction being executed, while running.
    pub fn cursor(&self) -> Option<usize> {
        self.is_running()
            .then(|| self.shared.cursor.load(Ordering::Acquire))
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("status", &self.status())
            .finish_non_exhaustive()
    }
}

/// One run: the worker-side state.
struct Run {
    script: CompiledScript,
    ctx: Context,
    stop: StopToken,
    shared: Arc<Shared>,
    line_delay: Duration,
    start_delay: Duration,
}

impl Run {
    async fn execute(mut self) -> RunOutcome {
        if !self.stop.sleep(self.start_delay).await {
            return RunOutcome::Stopped;
        }

        let len = self.script.len();
        let mut cursor = 0;

        while cursor < len {
            if self.stop.is_cancelled() {
                return RunOutcome::Stopped;
            }

            self.shared.cursor.store(cursor, Ordering::Release);
            let instruction = &self.script.instructions()[cursor];
            self.ctx.begin(instruction.line);
            debug!(
                line = instruction.line,
                command = instruction.name(),
                "execute"
            );

            if let Err(source) = instruction.command.execute(&mut self.ctx).await {
                return RunOutcome::Failed(RunError::Effect {
                    command: instruction.name(),
                    line: instruction.line,
                    source: source.into(),
                });
            }

            cursor = match self.ctx.take_transfer() {
                Some(Transfer::Line(line)) => {
                    debug!(from = instruction.line, to = line, "jump");
                    // A zero-delay loop must still let other tasks (and stop) run.
                    tokio::task::yield_now().await;
                    self.script.index_for_line(line)
                }
                Some(Transfer::Stop) => return RunOutcome::Stopped,
                None => cursor + 1,
            };

            if cursor < len && !self.stop.sleep(self.line_delay).await {
                return RunOutcome::Stopped;
            }
        }

        if self.stop.is_cancelled() {
            RunOutcome::Stopped
        } else {
            RunOutcome::Completed
        }
    }
}
