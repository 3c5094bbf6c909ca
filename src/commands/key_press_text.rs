//! [`KeyPressText`] command: types a string one character at a time.
//!
//! Script syntax: `KeyPressText "hello world"` or `KeyPressText "hi" 40`

use crate::command::{Context, MacroCommand, PrepareScope};
use crate::compiler::parse_duration;
use crate::error::PrepareError;
use crate::keys::{InputState, Key};
use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Sends a press/release for every character of `text`, optionally pausing
/// `delay` between characters. Upper-case letters and other shifted symbols
/// are sent as-is; mapping them to physical keys is the effector's job.
#[derive(Debug, Default)]
pub struct KeyPressText {
    pub text: String,
    pub delay: Duration,
}

impl KeyPressText {
    pub const NAME: &'static str = "KeyPressText";

    fn key_for(ch: char) -> Key {
        match ch {
            '\n' => Key::Enter,
            '\t' => Key::Tab,
            ' ' => Key::Space,
            other => Key::Char(other),
        }
    }
}

#[async_trait]
impl MacroCommand for KeyPressText {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn prepare(&mut self, scope: &mut PrepareScope<'_>) -> Result<(), PrepareError> {
        self.text = scope.param(0).unwrap_or_default().to_string();
        if let Some(raw) = scope.param(1) {
            self.delay = parse_duration(raw).map_err(PrepareError::InvalidParameters)?;
        }
        Ok(())
    }

    async fn execute(&self, ctx: &mut Context) -> Result<()> {
        for (i, ch) in self.text.chars().enumerate() {
            if i > 0 && !self.delay.is_zero() && !ctx.sleep(self.delay).await {
                break;
            }
            let key = Self::key_for(ch);
            ctx.effector().send_key(key, InputState::Down)?;
            ctx.effector().send_key(key, InputState::Up)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::prepare_params;

    #[test]
    fn test_parse() {
        let mut cmd = KeyPressText::default();
        prepare_params(&mut cmd, &["hello world"]).unwrap();
        assert_eq!(cmd.text, "hello world");
        assert!(cmd.delay.is_zero());
    }

    #[test]
    fn test_parse_with_delay() {
        let mut cmd = KeyPressText::default();
        prepare_params(&mut cmd, &["hi", "40"]).unwrap();
        assert_eq!(cmd.delay, Duration::from_millis(40));
    }

    #[test]
    fn test_invalid_delay() {
        let mut cmd = KeyPressText::default();
        assert!(prepare_params(&mut cmd, &["hi", "soon"]).is_err());
    }

    #[test]
    fn test_whitespace_maps_to_named_keys() {
        assert_eq!(KeyPressText::key_for(' '), Key::Space);
        assert_eq!(KeyPressText::key_for('\n'), Key::Enter);
        assert_eq!(KeyPressText::key_for('a'), Key::Char('a'));
    }
}
