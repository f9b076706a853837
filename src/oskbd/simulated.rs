//! Output that records key reports as text instead of sending them anywhere.

use crate::arbiter::KeyOutput;
use crate::keys::KeyCode;

/// Log of everything sent downstream.
///
/// Each report is written as `dn:<key>` or `up:<key>`. When virtual time passed since the previous
/// report (or since the start), a `t:<N>ms` marker is written first.
#[derive(Debug, Default)]
pub struct KbdOut {
    pub outputs: Vec<String>,
    ms_since_output: u64,
}

impl KbdOut {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the output clock by one millisecond.
    pub fn tick(&mut self) {
        self.ms_since_output += 1;
    }

    pub fn write(&mut self, output: KeyOutput) {
        if self.ms_since_output > 0 {
            self.outputs.push(format!("t:{}ms", self.ms_since_output));
            self.ms_since_output = 0;
        }
        log::trace!("out:{output}");
        self.outputs.push(output.to_string());
    }

    pub fn press_key(&mut self, key: KeyCode) {
        self.write(KeyOutput::Down(key))
    }

    pub fn release_key(&mut self, key: KeyCode) {
        self.write(KeyOutput::Up(key))
    }

    /// All reports so far, space separated.
    pub fn events(&self) -> String {
        self.outputs.join(" ")
    }

    pub fn clear(&mut self) {
        self.outputs.clear();
        self.ms_since_output = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_markers_only_between_reports() {
        let mut out = KbdOut::new();
        out.press_key(KeyCode::F);
        out.release_key(KeyCode::F);
        for _ in 0..150 {
            out.tick();
        }
        out.press_key(KeyCode::LShift);
        out.tick();
        assert_eq!(out.events(), "dn:F up:F t:150ms dn:LShift");
        out.clear();
        assert_eq!(out.events(), "");
        out.release_key(KeyCode::LShift);
        assert_eq!(out.events(), "up:LShift");
    }
}
