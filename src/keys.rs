//! Key and mouse-button names understood by script commands.

use std::fmt;
use std::str::FromStr;

/// A single keyboard key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// A printable character. Letters are stored upper-case.
    Char(char),
    Enter,
    Tab,
    Escape,
    Space,
    Backspace,
    Delete,
    Insert,
    Home,
    End,
    PageUp,
    PageDown,
    Up,
    Down,
    Left,
    Right,
    /// Function keys `F1`..=`F24`.
    F(u8),
    Shift,
    Control,
    Alt,
    Meta,
    CapsLock,
}

impl Key {
    /// Whether this key is a modifier that may prefix a chord.
    pub fn is_modifier(self) -> bool {
        matches!(self, Key::Shift | Key::Control | Key::Alt | Key::Meta)
    }
}

impl FromStr for Key {
    type Err = String;

    /// Parse a key name case-insensitively (`Enter`, `esc`, `F5`, `a`, `7`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let mut chars = s.chars();
        if let (Some(ch), None) = (chars.next(), chars.next()) {
            return Ok(Key::Char(ch.to_ascii_uppercase()));
        }

        let lower = s.to_ascii_lowercase();
        let key = match lower.as_str() {
            "" => return Err("empty key name".to_string()),
            "enter" | "return" => Key::Enter,
            "tab" => Key::Tab,
            "escape" | "esc" => Key::Escape,
            "space" | "spacebar" => Key::Space,
            "backspace" | "back" => Key::Backspace,
            "delete" | "del" => Key::Delete,
            "insert" | "ins" => Key::Insert,
            "home" => Key::Home,
            "end" => Key::End,
            "pageup" | "pgup" | "prior" => Key::PageUp,
            "pagedown" | "pgdn" | "next" => Key::PageDown,
            "up" => Key::Up,
            "down" => Key::Down,
            "left" => Key::Left,
            "right" => Key::Right,
            "shift" | "shiftkey" => Key::Shift,
            "ctrl" | "control" | "controlkey" => Key::Control,
            "alt" | "menu" => Key::Alt,
            "meta" | "win" | "super" | "cmd" => Key::Meta,
            "capslock" | "capital" => Key::CapsLock,
            other => {
                if let Some(Ok(n @ 1..=24)) = other.strip_prefix('f').map(str::parse::<u8>) {
                    return Ok(Key::F(n));
                }
                return Err(format!("unknown key: {s}"));
            }
        };
        Ok(key)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Char(c) => write!(f, "{c}"),
            Key::F(n) => write!(f, "F{n}"),
            other => write!(f, "{other:?}"),
        }
    }
}

/// A key with zero or more modifiers held around it, e.g. `Ctrl+Shift+S`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyChord {
    pub modifiers: Vec<Key>,
    pub key: Key,
}

impl FromStr for KeyChord {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // A lone "+" is the plus key, not an empty chord.
        if s.trim() == "+" {
            return Ok(KeyChord {
                modifiers: Vec::new(),
                key: Key::Char('+'),
            });
        }

        let parts: Vec<&str> = s.split('+').collect();
        let (last, mods) = parts
            .split_last()
            .ok_or_else(|| "empty key chord".to_string())?;

        let mut modifiers = Vec::with_capacity(mods.len());
        for part in mods {
            let key: Key = part.parse()?;
            if !key.is_modifier() {
                return Err(format!("'{part}' is not a modifier key"));
            }
            modifiers.push(key);
        }

        Ok(KeyChord {
            modifiers,
            key: last.parse()?,
        })
    }
}

/// Press or release transition for keys and mouse buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputState {
    Down,
    Up,
}

/// A mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MouseButton {
    #[default]
    Left,
    Right,
    Middle,
}

impl FromStr for MouseButton {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" | "l" => Ok(MouseButton::Left),
            "right" | "r" => Ok(MouseButton::Right),
            "middle" | "m" => Ok(MouseButton::Middle),
            _ => Err(format!("unknown mouse button: {s}")),
        }
    }
}
