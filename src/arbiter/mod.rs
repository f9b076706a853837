//! The hold-tap arbiter.
//!
//! A hold-tap key means one thing when tapped and another when held, and which one cannot be known
//! when it is pressed. The [Arbiter] buffers the output of such a key, and of every key pressed
//! after it, in an [ActionQueue] until the key's [DecisionRecord] is decided by its [Policy] or by
//! a timeout. Buffered actions are then replayed in the order their inputs arrived.
//!
//! Every input goes through [Arbiter::handle], which always drains the longest decided prefix of
//! the queue before returning. The convenience methods ([Arbiter::key_down] etc.) are thin
//! wrappers around it.

mod error;
pub mod policy;
mod queue;
mod record;

pub use error::ArbiterError;
pub use policy::{Hooks, Policy, PolicyEvent, Reaction, Resolution};
pub use queue::{ActionQueue, QueuedAction, QUEUE_SIZE};
pub use record::{DecisionRecord, Registry};

use crate::keys::KeyCode;
use std::fmt;

/// Maximum number of hold-tap keys that can be live at the same time.
pub const MAX_HELD: usize = 10;

pub type Result<T> = std::result::Result<T, ArbiterError>;

/// Identity of a hold-tap binding: the symbol sent on tap and the symbol sent on hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HoldTapKey {
    pub tap: KeyCode,
    pub hold: KeyCode,
}

impl HoldTapKey {
    pub const fn new(tap: KeyCode, hold: KeyCode) -> Self {
        Self { tap, hold }
    }
}

impl fmt::Display for HoldTapKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.tap, self.hold)
    }
}

/// A key report to send downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyOutput {
    Down(KeyCode),
    Up(KeyCode),
}

impl fmt::Display for KeyOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyOutput::Down(k) => write!(f, "dn:{k}"),
            KeyOutput::Up(k) => write!(f, "up:{k}"),
        }
    }
}

/// An input to the arbiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArbiterEvent {
    HoldTapDown(HoldTapKey, Policy),
    HoldTapUp(HoldTapKey),
    /// The hold duration of a hold-tap key elapsed.
    Timeout(HoldTapKey),
    PlainDown(KeyCode),
    PlainUp(KeyCode),
}

/// Owns the action queue and the registry of live decision records.
#[derive(Debug, Default)]
pub struct Arbiter {
    queue: ActionQueue,
    registry: Registry,
    next_seq: u64,
}

impl Arbiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process one input event and return the key reports it released, in order.
    ///
    /// Errors are returned before any state is changed.
    pub fn handle(&mut self, event: ArbiterEvent) -> Result<Vec<KeyOutput>> {
        log::debug!("handling {event:?}");
        let mut out = Vec::new();
        match event {
            ArbiterEvent::HoldTapDown(key, policy) => self.hold_tap_down(key, policy, &mut out)?,
            ArbiterEvent::HoldTapUp(key) => self.hold_tap_up(key, &mut out)?,
            ArbiterEvent::Timeout(key) => self.hold_tap_timeout(key, &mut out)?,
            ArbiterEvent::PlainDown(code) => self.plain_key_down(code, &mut out)?,
            ArbiterEvent::PlainUp(code) => self.plain_key_up(code, &mut out)?,
        }
        if !self.queue.is_empty() {
            log::debug!(
                "{} actions buffered, {} keys undecided",
                self.queue.len(),
                self.registry.pending().count()
            );
        }
        Ok(out)
    }

    pub fn key_down(&mut self, key: HoldTapKey, policy: Policy) -> Result<Vec<KeyOutput>> {
        self.handle(ArbiterEvent::HoldTapDown(key, policy))
    }

    pub fn key_up(&mut self, key: HoldTapKey) -> Result<Vec<KeyOutput>> {
        self.handle(ArbiterEvent::HoldTapUp(key))
    }

    /// Force `key` to hold. Does nothing if the key is already decided, so a timer that fires
    /// late is harmless.
    pub fn timeout(&mut self, key: HoldTapKey) -> Result<Vec<KeyOutput>> {
        self.handle(ArbiterEvent::Timeout(key))
    }

    pub fn plain_down(&mut self, code: KeyCode) -> Result<Vec<KeyOutput>> {
        self.handle(ArbiterEvent::PlainDown(code))
    }

    pub fn plain_up(&mut self, code: KeyCode) -> Result<Vec<KeyOutput>> {
        self.handle(ArbiterEvent::PlainUp(code))
    }

    /// True when nothing is buffered and no hold-tap key is live.
    pub fn is_idle(&self) -> bool {
        self.queue.is_empty() && self.registry.is_empty()
    }

    /// Return to the power-on state. Only valid when idle.
    pub fn reset(&mut self) -> Result<()> {
        if !self.is_idle() {
            return Err(ArbiterError::NotIdle {
                queued: self.queue.len(),
                live: self.registry.len(),
            });
        }
        self.next_seq = 0;
        Ok(())
    }

    /// Hold-tap keys still waiting for a decision.
    pub fn pending(&self) -> impl Iterator<Item = HoldTapKey> + '_ {
        self.registry.pending().map(|r| r.key())
    }

    pub fn record(&self, key: &HoldTapKey) -> Option<&DecisionRecord> {
        self.registry.get(key)
    }

    pub fn queued(&self) -> impl Iterator<Item = &QueuedAction> + '_ {
        self.queue.iter()
    }

    pub fn queued_len(&self) -> usize {
        self.queue.len()
    }

    pub fn live_len(&self) -> usize {
        self.registry.len()
    }

    fn take_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    /// Fail unless an action can be queued once the records `decides` accepts are decided and
    /// the queue is flushed. Only a full queue whose front stays undecided has no room.
    fn ensure_room(&self, decides: impl Fn(&DecisionRecord) -> bool) -> Result<()> {
        if !self.queue.is_full() {
            return Ok(());
        }
        let front_drains = match self.queue.front().and_then(|a| a.hold_tap()) {
            Some(key) => self.registry.get(&key).is_some_and(|r| decides(r)),
            None => true,
        };
        if front_drains {
            return Ok(());
        }
        Err(ArbiterError::QueueFull {
            capacity: QUEUE_SIZE,
        })
    }

    fn enqueue(&mut self, action: QueuedAction) -> Result<()> {
        self.queue.push(action).map_err(|_| ArbiterError::QueueFull {
            capacity: QUEUE_SIZE,
        })
    }

    fn hold_tap_down(
        &mut self,
        key: HoldTapKey,
        policy: Policy,
        out: &mut Vec<KeyOutput>,
    ) -> Result<()> {
        if self.registry.contains(&key) {
            return Err(ArbiterError::DuplicateKey(key));
        }
        if self.registry.len() >= MAX_HELD {
            return Err(ArbiterError::TooManyHeld { max: MAX_HELD });
        }
        let seq = self.next_seq;
        self.ensure_room(|r| r.decided_by(PolicyEvent::OtherDown, seq))?;

        let seq = self.take_seq();
        self.registry.broadcast(PolicyEvent::OtherDown, None, seq);
        self.registry.create(key, policy, seq)?;
        if let Some(record) = self.registry.get_mut(&key) {
            record.on_event(PolicyEvent::OwnDown);
        }
        self.flush(out);
        self.enqueue(QueuedAction::AmbiguousDown(key))?;
        self.flush(out);
        Ok(())
    }

    fn hold_tap_up(&mut self, key: HoldTapKey, out: &mut Vec<KeyOutput>) -> Result<()> {
        let record = match self.registry.get(&key) {
            Some(r) if !r.is_released() => r,
            _ => return Err(ArbiterError::UnknownKey(key)),
        };
        let resolution = match record
            .resolution()
            .or_else(|| record.policy().react(PolicyEvent::OwnUp))
        {
            Some(r) => r,
            None => return Err(ArbiterError::Undecided(key)),
        };
        let since = record.seq();
        let own_down = QueuedAction::AmbiguousDown(key);
        // A tap whose press already left the queue is released directly and needs no slot.
        if resolution == Resolution::Hold || self.queue.contains(&own_down) {
            self.ensure_room(|r| r.key() == key || r.decided_by(PolicyEvent::OtherUp, since))?;
        }

        if let Some(record) = self.registry.get_mut(&key) {
            record.on_event(PolicyEvent::OwnUp);
            record.mark_released();
        }
        // Only keys that were already pending when this one was pressed saw it go down and up.
        self.registry.broadcast(PolicyEvent::OtherUp, Some(key), since);
        self.flush(out);

        match resolution {
            Resolution::Tap if self.queue.contains(&own_down) => {
                // The tap press itself is still stuck behind an undecided key, so the release
                // must wait its turn too.
                self.enqueue(QueuedAction::AmbiguousUp(key))?;
            }
            Resolution::Tap => {
                // Release taps right away so a pending sibling cannot cause key repeat.
                log::trace!("early release of {key}");
                out.push(KeyOutput::Up(key.tap));
                self.registry.destroy(&key);
            }
            Resolution::Hold => {
                self.enqueue(QueuedAction::AmbiguousUp(key))?;
                self.flush(out);
            }
        }
        Ok(())
    }

    fn hold_tap_timeout(&mut self, key: HoldTapKey, out: &mut Vec<KeyOutput>) -> Result<()> {
        let record = self
            .registry
            .get_mut(&key)
            .ok_or(ArbiterError::UnknownKey(key))?;
        if record.is_decided() {
            log::trace!("timeout for {key} ignored, already decided");
            return Ok(());
        }
        record.on_event(PolicyEvent::Timeout);
        record.resolve(Resolution::Hold);
        self.flush(out);
        Ok(())
    }

    fn plain_key_down(&mut self, code: KeyCode, out: &mut Vec<KeyOutput>) -> Result<()> {
        if self.queue.is_empty() {
            out.push(KeyOutput::Down(code));
            return Ok(());
        }
        let seq = self.next_seq;
        self.ensure_room(|r| r.decided_by(PolicyEvent::OtherDown, seq))?;
        let seq = self.take_seq();
        self.registry.broadcast(PolicyEvent::OtherDown, None, seq);
        self.flush(out);
        self.enqueue(QueuedAction::PlainDown { key: code, seq })?;
        self.flush(out);
        Ok(())
    }

    fn plain_key_up(&mut self, code: KeyCode, out: &mut Vec<KeyOutput>) -> Result<()> {
        if self.queue.is_empty() {
            out.push(KeyOutput::Up(code));
            return Ok(());
        }
        let pressed_at = self.queue.last_plain_down(code);
        if pressed_at.is_none() && !code.is_modifier() {
            // The press already went out, so there is nothing to keep in order with.
            out.push(KeyOutput::Up(code));
            return Ok(());
        }
        self.ensure_room(|r| {
            pressed_at.is_some_and(|since| r.decided_by(PolicyEvent::OtherUp, since))
        })?;
        if let Some(since) = pressed_at {
            self.registry.broadcast(PolicyEvent::OtherUp, None, since);
        }
        self.flush(out);
        self.enqueue(QueuedAction::PlainUp(code))?;
        self.flush(out);
        Ok(())
    }

    /// Emit every action at the front of the queue up to the first undecided hold-tap key.
    fn flush(&mut self, out: &mut Vec<KeyOutput>) {
        while let Some(&action) = self.queue.front() {
            let output = match action {
                QueuedAction::AmbiguousDown(key) | QueuedAction::AmbiguousUp(key) => {
                    let Some(symbol) = self.registry.get(&key).and_then(|r| r.symbol()) else {
                        log::trace!("queue blocked by {key}");
                        break;
                    };
                    match action {
                        QueuedAction::AmbiguousDown(_) => KeyOutput::Down(symbol),
                        _ => KeyOutput::Up(symbol),
                    }
                }
                QueuedAction::PlainDown { key, .. } => KeyOutput::Down(key),
                QueuedAction::PlainUp(key) => KeyOutput::Up(key),
            };
            self.queue.pop();
            if let QueuedAction::AmbiguousUp(key) = action {
                self.registry.destroy(&key);
            }
            log::trace!("emit {output}");
            out.push(output);
        }
    }
}
