//! [`Stop`] command: ends the run from inside the script.
//!
//! Script syntax: `Stop`

use crate::command::{Context, MacroCommand, PrepareScope};
use crate::error::PrepareError;
use anyhow::Result;
use async_trait::async_trait;

#[derive(Debug, Default)]
pub struct Stop;

impl Stop {
    pub const NAME: &'static str = "Stop";
}

#[async_trait]
impl MacroCommand for Stop {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn prepare(&mut self, _scope: &mut PrepareScope<'_>) -> Result<(), PrepareError> {
        Ok(())
    }

    async fn execute(&self, ctx: &mut Context) -> Result<()> {
        ctx.request_stop();
        Ok(())
    }
}
