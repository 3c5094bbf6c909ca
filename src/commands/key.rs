//! Keyboard commands: [`KeyPress`], [`KeyDown`] and [`KeyUp`].
//!
//! Script syntax:
//! - `KeyPress Enter`, `KeyPress Ctrl+Shift+S`
//! - `KeyDown Shift` / `KeyUp Shift`

use crate::command::{Context, MacroCommand, PrepareScope};
use crate::error::PrepareError;
use crate::keys::{InputState, Key, KeyChord};
use anyhow::Result;
use async_trait::async_trait;

fn parse_key(scope: &PrepareScope<'_>) -> Result<Key, PrepareError> {
    scope
        .param(0)
        .unwrap_or_default()
        .parse()
        .map_err(PrepareError::InvalidParameters)
}

/// Presses and releases a key, holding any chord modifiers around it.
///
/// Modifiers go down in order and come up in reverse order.
#[derive(Debug)]
pub struct KeyPress {
    pub chord: KeyChord,
}

impl Default for KeyPress {
    fn default() -> Self {
        Self {
            chord: KeyChord {
                modifiers: Vec::new(),
                key: Key::Enter,
            },
        }
    }
}

impl KeyPress {
    pub const NAME: &'static str = "KeyPress";
}

#[async_trait]
impl MacroCommand for KeyPress {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn prepare(&mut self, scope: &mut PrepareScope<'_>) -> Result<(), PrepareError> {
        self.chord = scope
            .param(0)
            .unwrap_or_default()
            .parse()
            .map_err(PrepareError::InvalidParameters)?;
        Ok(())
    }

    async fn execute(&self, ctx: &mut Context) -> Result<()> {
        let fx = ctx.effector();
        for m in &self.chord.modifiers {
            fx.send_key(*m, InputState::Down)?;
        }
        fx.send_key(self.chord.key, InputState::Down)?;
        fx.send_key(self.chord.key, InputState::Up)?;
        for m in self.chord.modifiers.iter().rev() {
            fx.send_key(*m, InputState::Up)?;
        }
        Ok(())
    }
}

/// Presses a key without releasing it.
#[derive(Debug)]
pub struct KeyDown {
    pub key: Key,
}

impl Default for KeyDown {
    fn default() -> Self {
        Self { key: Key::Shift }
    }
}

impl KeyDown {
    pub const NAME: &'static str = "KeyDown";
}

#[async_trait]
impl MacroCommand for KeyDown {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn prepare(&mut self, scope: &mut PrepareScope<'_>) -> Result<(), PrepareError> {
        self.key = parse_key(scope)?;
        Ok(())
    }

    async fn execute(&self, ctx: &mut Context) -> Result<()> {
        ctx.effector().send_key(self.key, InputState::Down)
    }
}

/// Releases a key.
#[derive(Debug)]
pub struct KeyUp {
    pub key: Key,
}

impl Default for KeyUp {
    fn default() -> Self {
        Self { key: Key::Shift }
    }
}

impl KeyUp {
    pub const NAME: &'static str = "KeyUp";
}

#[async_trait]
impl MacroCommand for KeyUp {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn prepare(&mut self, scope: &mut PrepareScope<'_>) -> Result<(), PrepareError> {
        self.key = parse_key(scope)?;
        Ok(())
    }

    async fn execute(&self, ctx: &mut Context) -> Result<()> {
        ctx.effector().send_key(self.key, InputState::Up)
    }
}
