//! Keyboard input and output types for the simulated keyboard.

mod simulated;
pub use simulated::*;

use crate::keys::KeyCode;
use std::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum KeyValue {
    Release = 0,
    Press = 1,
}

/// A physical key transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub value: KeyValue,
}

impl KeyEvent {
    pub fn new(code: KeyCode, value: KeyValue) -> Self {
        Self { code, value }
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let direction = match self.value {
            KeyValue::Press => "↓",
            KeyValue::Release => "↑",
        };
        write!(f, "{direction}{}", self.code)
    }
}
