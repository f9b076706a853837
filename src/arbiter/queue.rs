use super::HoldTapKey;
use crate::keys::KeyCode;
use arraydeque::ArrayDeque;

/// Maximum number of actions that can be buffered while hold-tap keys are undecided.
pub const QUEUE_SIZE: usize = 32;

/// An output action waiting for every hold-tap key in front of it to be decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueuedAction {
    AmbiguousDown(HoldTapKey),
    AmbiguousUp(HoldTapKey),
    /// `seq` orders this press relative to the hold-tap keys pressed around it.
    PlainDown { key: KeyCode, seq: u64 },
    PlainUp(KeyCode),
}

impl QueuedAction {
    pub fn hold_tap(&self) -> Option<HoldTapKey> {
        match *self {
            QueuedAction::AmbiguousDown(k) | QueuedAction::AmbiguousUp(k) => Some(k),
            QueuedAction::PlainDown { .. } | QueuedAction::PlainUp(_) => None,
        }
    }
}

/// Pending causal trace of output actions. Only ever popped from the front.
#[derive(Debug, Default)]
pub struct ActionQueue {
    actions: ArrayDeque<[QueuedAction; QUEUE_SIZE]>,
}

impl ActionQueue {
    pub fn push(&mut self, action: QueuedAction) -> Result<(), QueuedAction> {
        self.actions.push_back(action).map_err(|e| e.element)
    }

    pub fn front(&self) -> Option<&QueuedAction> {
        self.actions.front()
    }

    pub fn pop(&mut self) -> Option<QueuedAction> {
        self.actions.pop_front()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.actions.is_full()
    }

    pub fn iter(&self) -> impl Iterator<Item = &QueuedAction> + '_ {
        self.actions.iter()
    }

    pub fn contains(&self, action: &QueuedAction) -> bool {
        self.actions.iter().any(|a| a == action)
    }

    /// The most recent buffered press of `key`, if it has not been emitted yet.
    pub fn last_plain_down(&self, key: KeyCode) -> Option<u64> {
        self.actions
            .iter()
            .filter_map(|a| match *a {
                QueuedAction::PlainDown { key: k, seq } if k == key => Some(seq),
                _ => None,
            })
            .last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fifo_order() {
        let mut q = ActionQueue::default();
        let fs = HoldTapKey::new(KeyCode::F, KeyCode::LShift);
        q.push(QueuedAction::AmbiguousDown(fs)).unwrap();
        q.push(QueuedAction::PlainDown {
            key: KeyCode::J,
            seq: 1,
        })
        .unwrap();
        q.push(QueuedAction::PlainUp(KeyCode::J)).unwrap();
        assert_eq!(q.len(), 3);
        assert_eq!(q.pop(), Some(QueuedAction::AmbiguousDown(fs)));
        assert_eq!(q.front().and_then(|a| a.hold_tap()), None);
        assert_eq!(
            q.pop(),
            Some(QueuedAction::PlainDown {
                key: KeyCode::J,
                seq: 1
            })
        );
        assert_eq!(q.pop(), Some(QueuedAction::PlainUp(KeyCode::J)));
        assert!(q.is_empty());
    }

    #[test]
    fn finds_latest_press() {
        let mut q = ActionQueue::default();
        q.push(QueuedAction::PlainDown {
            key: KeyCode::J,
            seq: 1,
        })
        .unwrap();
        q.push(QueuedAction::PlainUp(KeyCode::J)).unwrap();
        q.push(QueuedAction::PlainDown {
            key: KeyCode::J,
            seq: 4,
        })
        .unwrap();
        assert_eq!(q.last_plain_down(KeyCode::J), Some(4));
        assert_eq!(q.last_plain_down(KeyCode::K), None);
    }

    #[test]
    fn rejects_when_full() {
        let mut q = ActionQueue::default();
        for _ in 0..QUEUE_SIZE {
            q.push(QueuedAction::PlainUp(KeyCode::A)).unwrap();
        }
        assert!(q.is_full());
        assert_eq!(
            q.push(QueuedAction::PlainUp(KeyCode::B)),
            Err(QueuedAction::PlainUp(KeyCode::B))
        );
        assert_eq!(q.len(), QUEUE_SIZE);
    }
}
