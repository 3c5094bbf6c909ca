//! # Automate
//!
//! A line-based macro scripting engine for automating keyboard and mouse input.
//!
//! Scripts are compiled up front into a validated instruction sequence and run
//! on a background task, one instruction per line, with an optional delay
//! between lines. The actual input events are sent through an injected
//! [`Effector`], so the engine itself never talks to the operating system.
//!
//! ## Quick start
//!
//! ```no_run
//! use automate::{Engine, LogEffector, compile_str};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let script = compile_str(r#"
//! Label start
//! MouseMove 400 300
//! MouseClick
//! KeyPressText "hello"
//! KeyPress Enter
//! Wait 1s
//! Call start
//! "#)?;
//!
//!     let engine = Engine::new(LogEffector);
//!     let run = engine.start(script, Duration::from_millis(20)).expect("idle engine");
//!
//!     tokio::time::sleep(Duration::from_secs(5)).await;
//!     engine.stop();
//!     run.wait().await.into_result()?;
//!     Ok(())
//! }
//! ```
//!
//! ## Script syntax
//!
//! One command per line, `Name param1 param2 …`. Parameters are separated by
//! whitespace; a double-quoted string is a single parameter. Command names are
//! case-insensitive.
//!
//! | Command | Description |
//! |---------|-------------|
//! | `KeyPress Enter` | Press and release a key; chords like `Ctrl+Shift+S` allowed |
//! | `KeyDown Shift` / `KeyUp Shift` | Press or release a key |
//! | `KeyPressText "text" [ms]` | Type each character, optionally pausing between them |
//! | `MouseMove 100 200` | Move the pointer to absolute coordinates |
//! | `MouseDown [button]` / `MouseUp [button]` | Press or release a mouse button |
//! | `MouseClick [button]` | Click (left by default) |
//! | `MouseWheel -3` | Scroll the wheel |
//! | `Wait 500` | Pause (`500`, `500ms`, `1.5s`); `Wait 100 300` picks a random pause |
//! | `Label name` | Jump anchor |
//! | `Call 3` / `Call name` | Continue at line 3, at `Label name`, or at a `name` command |
//! | `Stop` | End the run |
//! | `# comment` | Full-line or inline comment |
//!
//! Blank and comment lines still count towards line numbers, so `Call 5`
//! always means the fifth line of the file. `Call` is a goto: there is no
//! return, and jumping backwards loops until [`Engine::stop`] is called.
//!
//! ## Implementing a custom command
//!
//! Implement [`MacroCommand`] and register it in a [`Catalog`]:
//!
//! ```no_run
//! use automate::{
//!     Arity, Catalog, CommandDescriptor, Compiler, Context, MacroCommand, PrepareScope,
//! };
//! use automate::error::PrepareError;
//! use automate::keys::{InputState, Key};
//! use async_trait::async_trait;
//!
//! #[derive(Default)]
//! pub struct Escape;
//!
//! impl Escape {
//!     pub const NAME: &'static str = "Escape";
//! }
//!
//! #[async_trait]
//! impl MacroCommand for Escape {
//!     fn name(&self) -> &'static str { Self::NAME }
//!
//!     fn prepare(&mut self, _scope: &mut PrepareScope<'_>) -> Result<(), PrepareError> {
//!         Ok(())
//!     }
//!
//!     async fn execute(&self, ctx: &mut Context) -> anyhow::Result<()> {
//!         ctx.effector().send_key(Key::Escape, InputState::Down)?;
//!         ctx.effector().send_key(Key::Escape, InputState::Up)
//!     }
//! }
//!
//! let mut catalog = Catalog::builtin().clone();
//! catalog.register(CommandDescriptor::new(
//!     Escape::NAME,
//!     Arity::exactly(0),
//!     "Escape",
//!     Escape::create,
//! ))?;
//! let script = Compiler::new(&catalog).compile_str("Escape\nWait 100\nEscape\n")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cancel;
pub mod catalog;
pub mod command;
pub mod commands;
pub mod compiler;
pub mod effector;
pub mod engine;
pub mod error;
pub mod keys;
pub mod settings;
pub mod token;

pub use catalog::{Arity, Catalog, CommandDescriptor};
pub use command::{Context, MacroCommand, PrepareScope};
pub use compiler::{CompiledScript, Compiler, Instruction, compile, compile_file, compile_str};
pub use effector::{Effector, LogEffector};
pub use engine::{Engine, EngineConfig, RunHandle, RunOutcome, RunStatus};
pub use error::{CompileError, Error, RunError};
pub use settings::{ScriptInfo, Settings};
pub use token::{Token, TokenKind, Tokenizer, tokenize};
