//! [`Call`] command: transfers control to another line.
//!
//! Script syntax:
//! - `Call 3`: continue at line 3
//! - `Call top`: continue at `Label top`, or at the first line whose command
//!   is named `top`

use crate::command::{Context, MacroCommand, PrepareScope};
use crate::error::PrepareError;
use anyhow::Result;
use async_trait::async_trait;

/// Goto-style jump. No return address is kept, so jumping backwards loops
/// until the run is stopped.
///
/// A target of zero or below does nothing; a target past the last line ends
/// the run.
#[derive(Debug, Default)]
pub struct Call {
    /// 1-based target line.
    pub target: i64,
}

impl Call {
    pub const NAME: &'static str = "Call";
}

#[async_trait]
impl MacroCommand for Call {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn prepare(&mut self, scope: &mut PrepareScope<'_>) -> Result<(), PrepareError> {
        let raw = scope
            .param(0)
            .ok_or_else(|| PrepareError::invalid("missing jump target"))?
            .to_string();

        self.target = match raw.parse::<i64>() {
            Ok(line) => line,
            Err(_) => {
                let index = scope
                    .find_target(&raw)
                    .ok_or_else(|| PrepareError::UnresolvedTarget(raw.clone()))?;
                let line = index + 1;
                scope.set_param(0, line.to_string());
                line as i64
            }
        };
        Ok(())
    }

    async fn execute(&self, ctx: &mut Context) -> Result<()> {
        if self.target > 0 {
            ctx.jump_to_line(self.target as usize);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::compiler::compile_str;

    fn target(text: &str, index: usize) -> String {
        compile_str(text).unwrap().instructions()[index].parameters[0].clone()
    }

    #[test]
    fn test_numeric_target_is_kept() {
        assert_eq!(target("Wait 1\nCall 1\n", 1), "1");
    }

    #[test]
    fn test_keyword_target_counts_comment_lines() {
        let text = "# header\n\nKeyPress A\nCall KeyPress\n";
        assert_eq!(target(text, 1), "3");
    }

    #[test]
    fn test_label_target() {
        let text = "Label start\nKeyPress A\nCall start\n";
        assert_eq!(target(text, 2), "1");
    }

    #[test]
    fn test_does_not_match_itself() {
        assert!(compile_str("KeyPress A\nCall Call\n").is_err());
    }

    #[test]
    fn test_any_integer_target_compiles() {
        for text in ["Call 0", "Call -2", "KeyPress A\nCall 99\n"] {
            let script = compile_str(text).unwrap();
            let call = script.instructions().last().unwrap();
            assert_eq!(call.name(), "Call");
        }
        assert_eq!(target("Call -2", 0), "-2");
    }

    #[test]
    fn test_non_numeric_suffix_is_a_name() {
        assert!(compile_str("KeyPress A\nCall 3x\n").is_err());
    }
}
