use super::policy::{Policy, PolicyEvent, Resolution};
use super::{ArbiterError, HoldTapKey};
use crate::keys::KeyCode;

type HashMap<K, V> = rustc_hash::FxHashMap<K, V>;

/// Mutable decision state of one pending or active hold-tap key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionRecord {
    key: HoldTapKey,
    policy: Policy,
    resolution: Option<Resolution>,
    /// Insertion order of this key's down action among all queued downs. Records and plain downs
    /// with a lower sequence number were pressed earlier.
    seq: u64,
    released: bool,
}

impl DecisionRecord {
    pub fn new(key: HoldTapKey, policy: Policy, seq: u64) -> Self {
        Self {
            key,
            policy,
            resolution: None,
            seq,
            released: false,
        }
    }

    pub fn key(&self) -> HoldTapKey {
        self.key
    }

    pub fn policy(&self) -> Policy {
        self.policy
    }

    pub fn resolution(&self) -> Option<Resolution> {
        self.resolution
    }

    pub fn is_decided(&self) -> bool {
        self.resolution.is_some()
    }

    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    pub(super) fn mark_released(&mut self) {
        self.released = true;
    }

    /// Decide the record. Has no effect if the record is already decided.
    pub fn resolve(&mut self, resolution: Resolution) {
        match self.resolution {
            None => {
                log::debug!("{} resolved as {resolution:?}", self.key);
                self.resolution = Some(resolution);
            }
            Some(current) => {
                log::trace!("{} already {current:?}, ignoring {resolution:?}", self.key);
            }
        }
    }

    /// Run the policy hook for `event`.
    pub fn on_event(&mut self, event: PolicyEvent) {
        if self.is_decided() {
            return;
        }
        if let Some(resolution) = self.policy.react(event) {
            log::trace!("{} reacting to {event:?} ({})", self.key, self.policy);
            self.resolve(resolution);
        }
    }

    /// True if the record is decided, or would be by `event` sent to keys pressed before the key
    /// with sequence number `before`.
    pub fn decided_by(&self, event: PolicyEvent, before: u64) -> bool {
        self.is_decided() || (self.seq < before && self.policy.react(event).is_some())
    }

    /// The symbol this key currently stands for. `None` while undecided.
    pub fn symbol(&self) -> Option<KeyCode> {
        self.resolution.map(|r| match r {
            Resolution::Tap => self.key.tap,
            Resolution::Hold => self.key.hold,
        })
    }
}

/// The live decision records, at most one per [HoldTapKey].
#[derive(Debug, Default)]
pub struct Registry {
    records: HashMap<HoldTapKey, DecisionRecord>,
}

impl Registry {
    pub fn create(&mut self, key: HoldTapKey, policy: Policy, seq: u64) -> Result<(), ArbiterError> {
        if self.records.contains_key(&key) {
            return Err(ArbiterError::DuplicateKey(key));
        }
        log::debug!("{key} pending with {policy} policy");
        self.records.insert(key, DecisionRecord::new(key, policy, seq));
        Ok(())
    }

    pub fn get(&self, key: &HoldTapKey) -> Option<&DecisionRecord> {
        self.records.get(key)
    }

    pub fn get_mut(&mut self, key: &HoldTapKey) -> Option<&mut DecisionRecord> {
        self.records.get_mut(key)
    }

    pub fn contains(&self, key: &HoldTapKey) -> bool {
        self.records.contains_key(key)
    }

    pub fn destroy(&mut self, key: &HoldTapKey) -> Option<DecisionRecord> {
        let removed = self.records.remove(key);
        if removed.is_some() {
            log::debug!("{key} done");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records that are still waiting for a decision.
    pub fn pending(&self) -> impl Iterator<Item = &DecisionRecord> + '_ {
        self.records.values().filter(|r| !r.is_decided())
    }

    /// Deliver `event` to every undecided record other than `except` that was pressed before
    /// the key with sequence number `before`.
    pub fn broadcast(&mut self, event: PolicyEvent, except: Option<HoldTapKey>, before: u64) {
        for record in self.records.values_mut() {
            if Some(record.key) == except || record.seq >= before {
                continue;
            }
            record.on_event(event);
        }
    }
}
