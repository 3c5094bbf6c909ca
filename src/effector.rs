//! The [`Effector`] trait: the OS input capability commands drive.

use crate::keys::{InputState, Key, MouseButton};
use anyhow::Result;
use tracing::info;

/// Performs the actual input-simulation side effects.
///
/// The engine never talks to the operating system directly; a platform
/// binding implements this trait and is injected into [`Engine`](crate::Engine).
/// Calls are expected to be synchronous and fast. Delays are handled by the
/// engine's cancellable timer, not by the effector.
pub trait Effector: Send + Sync {
    /// Move the pointer to absolute screen coordinates.
    fn move_mouse_to(&self, x: i32, y: i32) -> Result<()>;

    /// Press or release a keyboard key.
    fn send_key(&self, key: Key, state: InputState) -> Result<()>;

    /// Press or release a mouse button at the current pointer position.
    fn mouse_button(&self, button: MouseButton, state: InputState) -> Result<()>;

    /// Scroll the wheel by `delta` notches; positive scrolls up.
    fn scroll_wheel(&self, delta: i32) -> Result<()>;
}

/// Dry-run effector that logs each effect instead of performing it.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogEffector;

impl Effector for LogEffector {
    fn move_mouse_to(&self, x: i32, y: i32) -> Result<()> {
        info!(target: "effector", "move_mouse_to({x}, {y})");
        Ok(())
    }

    fn send_key(&self, key: Key, state: InputState) -> Result<()> {
        info!(target: "effector", "send_key({key}, {state:?})");
        Ok(())
    }

    fn mouse_button(&self, button: MouseButton, state: InputState) -> Result<()> {
        info!(target: "effector", "mouse_button({button:?}, {state:?})");
        Ok(())
    }

    fn scroll_wheel(&self, delta: i32) -> Result<()> {
        info!(target: "effector", "scroll_wheel({delta})");
        Ok(())
    }
}
