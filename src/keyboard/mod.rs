//! The simulated keyboard: routes physical key events through the hold-tap arbiter and keeps the
//! hold timers in virtual time.

use anyhow::Result;

use crate::arbiter::{Arbiter, HoldTapKey, KeyOutput};
use crate::cfg::{self, Cfg, HoldTapBinding, MResult};
use crate::keys::KeyCode;
use crate::oskbd::{KbdOut, KeyEvent, KeyValue};

mod sim;
pub use sim::*;

type HashMap<K, V> = rustc_hash::FxHashMap<K, V>;
type HashSet<T> = rustc_hash::FxHashSet<T>;

/// One-shot hold timer of a pressed hold-tap key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HoldTimer {
    deadline_ms: u64,
    key: HoldTapKey,
}

pub struct Keyboard {
    cfg: Cfg,
    arbiter: Arbiter,
    /// Everything the arbiter released, in order.
    pub kbd_out: KbdOut,
    /// Virtual time in milliseconds since the keyboard was created.
    now_ms: u64,
    /// Pending hold timers in the order their keys were pressed.
    timers: Vec<HoldTimer>,
    /// Bound input keys that are physically held.
    held: HashMap<KeyCode, HoldTapKey>,
    /// Bound input keys whose press was dropped; their release is dropped too.
    suppressed: HashSet<KeyCode>,
}

impl Keyboard {
    pub fn new(cfg: Cfg) -> Self {
        Self {
            cfg,
            arbiter: Arbiter::new(),
            kbd_out: KbdOut::new(),
            now_ms: 0,
            timers: vec![],
            held: HashMap::default(),
            suppressed: HashSet::default(),
        }
    }

    pub fn new_from_str(cfg: &str) -> MResult<Self> {
        Ok(Self::new(cfg::new_from_str(cfg)?))
    }

    pub fn cfg(&self) -> &Cfg {
        &self.cfg
    }

    pub fn arbiter(&self) -> &Arbiter {
        &self.arbiter
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// True when no key is held, nothing is buffered and no timer is running.
    pub fn is_idle(&self) -> bool {
        self.arbiter.is_idle() && self.held.is_empty() && self.timers.is_empty()
    }

    /// Process one physical key transition.
    pub fn handle_input_event(&mut self, event: &KeyEvent) -> Result<()> {
        log::debug!("process recv ev {event} at {}ms", self.now_ms);
        let outputs = match self.cfg.binding(event.code).copied() {
            Some(binding) => match event.value {
                KeyValue::Press => self.hold_tap_press(binding)?,
                KeyValue::Release => self.hold_tap_release(binding)?,
            },
            None => match event.value {
                KeyValue::Press => self.arbiter.plain_down(event.code)?,
                KeyValue::Release => self.arbiter.plain_up(event.code)?,
            },
        };
        self.write_outputs(outputs);
        Ok(())
    }

    /// Advance virtual time by `ms`, one millisecond at a time, firing hold timers as they
    /// expire.
    pub fn tick_ms(&mut self, ms: u64) -> Result<()> {
        for _ in 0..ms {
            self.now_ms += 1;
            self.kbd_out.tick();
            self.fire_due_timers()?;
        }
        Ok(())
    }

    fn hold_tap_press(&mut self, binding: HoldTapBinding) -> Result<Vec<KeyOutput>> {
        let input = binding.input;
        if self.held.contains_key(&input) {
            log::warn!("ignoring repeated press of {input} while it is held");
            return Ok(vec![]);
        }
        if self.arbiter.record(&binding.key).is_some() {
            // The previous press is still in flight: its release has not left the queue yet.
            log::warn!(
                "ignoring press of {input}: {} is still active from the previous press",
                binding.key
            );
            self.suppressed.insert(input);
            return Ok(vec![]);
        }
        let outputs = self.arbiter.key_down(binding.key, binding.policy)?;
        self.held.insert(input, binding.key);
        self.timers.push(HoldTimer {
            deadline_ms: self.now_ms + u64::from(binding.hold_ms),
            key: binding.key,
        });
        Ok(outputs)
    }

    fn hold_tap_release(&mut self, binding: HoldTapBinding) -> Result<Vec<KeyOutput>> {
        let input = binding.input;
        if self.suppressed.remove(&input) {
            log::debug!("dropping release of {input} matching an ignored press");
            return Ok(vec![]);
        }
        let Some(&key) = self.held.get(&input) else {
            log::warn!("ignoring release of {input}, it is not held");
            return Ok(vec![]);
        };
        // A refused release leaves the key held and its timer running.
        let outputs = self.arbiter.key_up(key)?;
        self.held.remove(&input);
        self.timers.retain(|t| t.key != key);
        Ok(outputs)
    }

    fn fire_due_timers(&mut self) -> Result<()> {
        while let Some(i) = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.deadline_ms <= self.now_ms)
            .min_by_key(|(_, t)| t.deadline_ms)
            .map(|(i, _)| i)
        {
            let timer = self.timers.remove(i);
            log::debug!("hold timer of {} expired at {}ms", timer.key, self.now_ms);
            let outputs = self.arbiter.timeout(timer.key)?;
            self.write_outputs(outputs);
        }
        Ok(())
    }

    fn write_outputs(&mut self, outputs: Vec<KeyOutput>) {
        for output in outputs {
            match output {
                KeyOutput::Down(k) => self.kbd_out.press_key(k),
                KeyOutput::Up(k) => self.kbd_out.release_key(k),
            }
        }
    }
}
