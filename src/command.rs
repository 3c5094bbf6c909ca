//! The [`MacroCommand`] trait, the [`PrepareScope`] commands validate against
//! at compile time and the [`Context`] they receive when executed.

use crate::cancel::StopToken;
use crate::compiler::ScriptSource;
use crate::effector::Effector;
use crate::error::PrepareError;
use anyhow::Result;
use async_trait::async_trait;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

/// Compile-time view handed to [`MacroCommand::prepare`].
///
/// Gives access to the line's parameters (which may be rewritten once, e.g.
/// to replace a label with a line number) and a read-only view of the whole
/// script for target resolution.
pub struct PrepareScope<'a> {
    pub(crate) line: usize,
    pub(crate) parameters: &'a mut Vec<String>,
    pub(crate) source: &'a ScriptSource,
}

impl PrepareScope<'_> {
    /// The 1-based source line being prepared.
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn parameters(&self) -> &[String] {
        self.parameters.as_slice()
    }

    pub fn param(&self, index: usize) -> Option<&str> {
        self.parameters.get(index).map(String::as_str)
    }

    /// Parse parameter `index` as `T`, naming it `what` in the error.
    pub fn parse_param<T: FromStr>(&self, index: usize, what: &str) -> Result<T, PrepareError> {
        let raw = self
            .param(index)
            .ok_or_else(|| PrepareError::invalid(format!("missing {what}")))?;
        raw.parse()
            .map_err(|_| PrepareError::invalid(format!("invalid {what}: '{raw}'")))
    }

    /// Rewrite parameter `index`. Only valid during preparation.
    pub fn set_param(&mut self, index: usize, value: impl Into<String>) {
        if let Some(slot) = self.parameters.get_mut(index) {
            *slot = value.into();
        }
    }

    /// Total number of source lines, including blank and comment lines.
    pub fn line_count(&self) -> usize {
        self.source.line_count()
    }

    /// Find the 0-based source line index a jump named `name` refers to.
    ///
    /// `Label <name>` lines win; otherwise the first line other than the
    /// current one whose command keyword matches `name` case-insensitively.
    pub fn find_target(&self, name: &str) -> Option<usize> {
        self.source.find_target(name, self.line)
    }
}

/// Control transfer requested by the instruction that just executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Transfer {
    /// Continue at this 1-based source line.
    Line(usize),
    Stop,
}

/// Execution context passed to [`MacroCommand::execute`].
///
/// Provides the effector, a cancellable sleep and the cursor-mutation
/// capability used by control-transfer commands.
pub struct Context {
    effector: Arc<dyn Effector>,
    stop: StopToken,
    line: usize,
    transfer: Option<Transfer>,
}

impl Context {
    pub(crate) fn new(effector: Arc<dyn Effector>, stop: StopToken) -> Self {
        Self {
            effector,
            stop,
            line: 0,
            transfer: None,
        }
    }

    pub(crate) fn begin(&mut self, line: usize) {
        self.line = line;
        self.transfer = None;
    }

    pub(crate) fn take_transfer(&mut self) -> Option<Transfer> {
        self.transfer.take()
    }

    pub fn effector(&self) -> &dyn Effector {
        self.effector.as_ref()
    }

    /// The 1-based source line of the executing instruction.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Sleep for `duration`, returning early if the run is stopped.
    ///
    /// Returns `false` if the sleep was cut short.
    pub async fn sleep(&self, duration: Duration) -> bool {
        self.stop.sleep(duration).await
    }

    pub fn is_stopping(&self) -> bool {
        self.stop.is_cancelled()
    }

    /// Continue execution at the 1-based source `line` instead of the next
    /// instruction. There is no call stack: this is a goto.
    pub fn jump_to_line(&mut self, line: usize) {
        self.transfer = Some(Transfer::Line(line));
    }

    /// End the run after the current instruction.
    pub fn request_stop(&mut self) {
        self.transfer = Some(Transfer::Stop);
        self.stop.cancel();
    }
}

/// A single script command.
///
/// To add a new command:
///
/// 1. Define `pub const NAME: &'static str` on a `Default` struct.
/// 2. Re-export the struct from `src/commands/mod.rs`.
/// 3. Add one entry to the built-in table in [`crate::catalog`]:
///    `CommandDescriptor::new(MyCmd::NAME, Arity::exactly(1), "usage", MyCmd::create)`.
#[async_trait]
pub trait MacroCommand: Send + Sync + 'static {
    /// The command name, accessible at runtime through a trait object.
    fn name(&self) -> &'static str;

    /// Factory stored in the catalog: a fresh, unprepared instance.
    fn create() -> Box<dyn MacroCommand>
    where
        Self: Default + Sized,
    {
        Box::new(Self::default())
    }

    /// Validate parameters and perform one-time resolution.
    ///
    /// Must not cause any OS-level effect.
    fn prepare(&mut self, scope: &mut PrepareScope<'_>) -> Result<(), PrepareError>;

    /// Perform the runtime effect.
    async fn execute(&self, ctx: &mut Context) -> Result<()>;
}

/// Run `prepare` on `command` with `params` against an empty script.
#[cfg(test)]
pub(crate) fn prepare_params<C: MacroCommand>(
    command: &mut C,
    params: &[&str],
) -> Result<Vec<String>, PrepareError> {
    let source = ScriptSource::default();
    let mut parameters: Vec<String> = params.iter().map(|p| p.to_string()).collect();
    let mut scope = PrepareScope {
        line: 1,
        parameters: &mut parameters,
        source: &source,
    };
    command.prepare(&mut scope)?;
    Ok(parameters)
}
