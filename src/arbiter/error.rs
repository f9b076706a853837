use super::HoldTapKey;
use thiserror::Error;

/// A broken call discipline. None of these can be recovered from locally: continuing would
/// corrupt the order of emitted keys, so the driver is expected to abort.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArbiterError {
    #[error("{0} was pressed while it is still active")]
    DuplicateKey(HoldTapKey),

    #[error("{0} is not pressed")]
    UnknownKey(HoldTapKey),

    #[error("{0} is still undecided after its release; its policy does not resolve on release")]
    Undecided(HoldTapKey),

    #[error("action queue is full ({capacity} buffered actions)")]
    QueueFull { capacity: usize },

    #[error("too many hold-tap keys held at once (max {max})")]
    TooManyHeld { max: usize },

    #[error("cannot reset with {queued} queued actions and {live} live hold-tap keys")]
    NotIdle { queued: usize, live: usize },
}
