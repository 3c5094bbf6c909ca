//! [`Label`] command: a named jump anchor.
//!
//! Script syntax: `Label loop`

use crate::command::{Context, MacroCommand, PrepareScope};
use crate::error::PrepareError;
use anyhow::Result;
use async_trait::async_trait;

/// Marks a line that `Call <name>` can jump to. Does nothing when executed.
#[derive(Debug, Default)]
pub struct Label {
    pub name: String,
}

impl Label {
    pub const NAME: &'static str = "Label";
}

#[async_trait]
impl MacroCommand for Label {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn prepare(&mut self, scope: &mut PrepareScope<'_>) -> Result<(), PrepareError> {
        let name = scope.param(0).unwrap_or_default();
        if name.parse::<i64>().is_ok() {
            return Err(PrepareError::invalid(format!(
                "label '{name}' would be read as a line number"
            )));
        }
        self.name = name.to_string();
        Ok(())
    }

    async fn execute(&self, _ctx: &mut Context) -> Result<()> {
        Ok(())
    }
}
