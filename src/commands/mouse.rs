//! Mouse commands.
//!
//! Script syntax:
//! - `MouseMove 640 480`
//! - `MouseDown`, `MouseUp Right`, `MouseClick Middle`
//! - `MouseWheel -3`

use crate::command::{Context, MacroCommand, PrepareScope};
use crate::error::PrepareError;
use crate::keys::{InputState, MouseButton};
use anyhow::Result;
use async_trait::async_trait;

fn parse_button(scope: &PrepareScope<'_>) -> Result<MouseButton, PrepareError> {
    match scope.param(0) {
        Some(raw) => raw.parse().map_err(PrepareError::InvalidParameters),
        None => Ok(MouseButton::default()),
    }
}

/// Moves the pointer to absolute screen coordinates.
#[derive(Debug, Default)]
pub struct MouseMove {
    pub x: i32,
    pub y: i32,
}

impl MouseMove {
    pub const NAME: &'static str = "MouseMove";
}

#[async_trait]
impl MacroCommand for MouseMove {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn prepare(&mut self, scope: &mut PrepareScope<'_>) -> Result<(), PrepareError> {
        self.x = scope.parse_param(0, "x coordinate")?;
        self.y = scope.parse_param(1, "y coordinate")?;
        Ok(())
    }

    async fn execute(&self, ctx: &mut Context) -> Result<()> {
        ctx.effector().move_mouse_to(self.x, self.y)
    }
}

/// Presses a mouse button (left by default).
#[derive(Debug, Default)]
pub struct MouseDown {
    pub button: MouseButton,
}

impl MouseDown {
    pub const NAME: &'static str = "MouseDown";
}

#[async_trait]
impl MacroCommand for MouseDown {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn prepare(&mut self, scope: &mut PrepareScope<'_>) -> Result<(), PrepareError> {
        self.button = parse_button(scope)?;
        Ok(())
    }

    async fn execute(&self, ctx: &mut Context) -> Result<()> {
        ctx.effector().mouse_button(self.button, InputState::Down)
    }
}

/// Releases a mouse button (left by default).
#[derive(Debug, Default)]
pub struct MouseUp {
    pub button: MouseButton,
}

impl MouseUp {
    pub const NAME: &'static str = "MouseUp";
}

#[async_trait]
impl MacroCommand for MouseUp {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn prepare(&mut self, scope: &mut PrepareScope<'_>) -> Result<(), PrepareError> {
        self.button = parse_button(scope)?;
        Ok(())
    }

    async fn execute(&self, ctx: &mut Context) -> Result<()> {
        ctx.effector().mouse_button(self.button, InputState::Up)
    }
}

/// Presses and releases a mouse button (left by default).
#[derive(Debug, Default)]
pub struct MouseClick {
    pub button: MouseButton,
}

impl MouseClick {
    pub const NAME: &'static str = "MouseClick";
}

#[async_trait]
impl MacroCommand for MouseClick {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn prepare(&mut self, scope: &mut PrepareScope<'_>) -> Result<(), PrepareError> {
        self.button = parse_button(scope)?;
        Ok(())
    }

    async fn execute(&self, ctx: &mut Context) -> Result<()> {
        ctx.effector().mouse_button(self.button, InputState::Down)?;
        ctx.effector().mouse_button(self.button, InputState::Up)
    }
}

/// Scrolls the wheel; positive values scroll up.
#[derive(Debug, Default)]
pub struct MouseWheel {
    pub delta: i32,
}

impl MouseWheel {
    pub const NAME: &'static str = "MouseWheel";
}

#[async_trait]
impl MacroCommand for MouseWheel {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn prepare(&mut self, scope: &mut PrepareScope<'_>) -> Result<(), PrepareError> {
        self.delta = scope.parse_param(0, "wheel delta")?;
        Ok(())
    }

    async fn execute(&self, ctx: &mut Context) -> Result<()> {
        ctx.effector().scroll_wheel(self.delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::prepare_params;

    #[test]
    fn test_mouse_move() {
        let mut cmd = MouseMove::default();
        prepare_params(&mut cmd, &["640", "-10"]).unwrap();
        assert_eq!((cmd.x, cmd.y), (640, -10));
    }

    #[test]
    fn test_mouse_move_rejects_non_numeric() {
        let mut cmd = MouseMove::default();
        let err = prepare_params(&mut cmd, &["640", "top"]).unwrap_err();
        assert_eq!(err, PrepareError::invalid("invalid y coordinate: 'top'"));
    }

    #[test]
    fn test_default_button_is_left() {
        let mut cmd = MouseClick::default();
        prepare_params(&mut cmd, &[]).unwrap();
        assert_eq!(cmd.button, MouseButton::Left);

        let mut cmd = MouseDown::default();
        prepare_params(&mut cmd, &["right"]).unwrap();
        assert_eq!(cmd.button, MouseButton::Right);
    }

    #[test]
    fn test_invalid_button() {
        let mut cmd = MouseUp::default();
        assert!(prepare_params(&mut cmd, &["thumb"]).is_err());
    }

    #[test]
    fn test_mouse_wheel() {
        let mut cmd = MouseWheel::default();
        prepare_params(&mut cmd, &["-3"]).unwrap();
        assert_eq!(cmd.delta, -3);
    }
}
