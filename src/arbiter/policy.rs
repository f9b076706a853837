//! Tie-break policies for hold-tap keys.
//!
//! A policy is a fixed table of reactions to the five events a pending hold-tap key can observe.
//! Every policy resolves to [Resolution::Tap] when its own key is released first and to
//! [Resolution::Hold] on timeout; they only differ in how they react to other keys.

use std::fmt;

/// The final interpretation of a hold-tap key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resolution {
    /// Emit the primary symbol as an ordinary keystroke.
    Tap,
    /// Emit the secondary symbol and keep it active until the key is released.
    Hold,
}

/// The events a pending hold-tap key reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolicyEvent {
    OwnDown,
    OwnUp,
    Timeout,
    /// Some other key was pressed while this one was pending.
    OtherDown,
    /// Some other key, pressed while this one was pending, was released.
    OtherUp,
}

/// A reaction of a policy to one event: `None` leaves the key undecided.
pub type Reaction = Option<Resolution>;

/// Reaction table for one policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hooks {
    pub on_own_down: Reaction,
    pub on_own_up: Reaction,
    pub on_timeout: Reaction,
    pub on_other_down: Reaction,
    pub on_other_up: Reaction,
}

const BALANCED: Hooks = Hooks {
    on_own_down: None,
    on_own_up: Some(Resolution::Tap),
    on_timeout: Some(Resolution::Hold),
    on_other_down: None,
    on_other_up: Some(Resolution::Hold),
};

const TAP_PREFERRED: Hooks = Hooks {
    on_own_down: None,
    on_own_up: Some(Resolution::Tap),
    on_timeout: Some(Resolution::Hold),
    on_other_down: None,
    on_other_up: None,
};

const MOD_PREFERRED: Hooks = Hooks {
    on_own_down: None,
    on_own_up: Some(Resolution::Tap),
    on_timeout: Some(Resolution::Hold),
    on_other_down: Some(Resolution::Hold),
    on_other_up: None,
};

/// Behavior configuration of a hold-tap key.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Policy {
    /// If another key is pressed and released while this key is pending, the hold action is
    /// activated.
    ///
    /// A full press and release of a sibling key is taken as evidence of an intentional chord.
    #[default]
    Balanced,
    /// Only the timeout will determine between hold and tap action.
    TapPreferred,
    /// If there is a key press, the hold action is activated.
    ///
    /// Interesting for keys whose tap action is rarely used in the flow of typing.
    ModPreferred,
}

impl Policy {
    pub const ALL: [Policy; 3] = [
        Policy::Balanced,
        Policy::TapPreferred,
        Policy::ModPreferred,
    ];

    pub fn hooks(self) -> &'static Hooks {
        match self {
            Policy::Balanced => &BALANCED,
            Policy::TapPreferred => &TAP_PREFERRED,
            Policy::ModPreferred => &MOD_PREFERRED,
        }
    }

    pub fn react(self, event: PolicyEvent) -> Reaction {
        let hooks = self.hooks();
        match event {
            PolicyEvent::OwnDown => hooks.on_own_down,
            PolicyEvent::OwnUp => hooks.on_own_up,
            PolicyEvent::Timeout => hooks.on_timeout,
            PolicyEvent::OtherDown => hooks.on_other_down,
            PolicyEvent::OtherUp => hooks.on_other_up,
        }
    }

    /// Parse a policy name as written in the configuration file.
    pub fn try_from_str(s: &str) -> Result<Self, String> {
        match s {
            "balanced" | "permissive-hold" => Ok(Policy::Balanced),
            "tap-preferred" | "timeout" => Ok(Policy::TapPreferred),
            "mod-preferred" | "hold-preferred" | "hold-on-other-key-press" => {
                Ok(Policy::ModPreferred)
            }
            _ => Err(format!(
                "unknown hold-tap policy: {s}\nvalid policies: balanced, tap-preferred, mod-preferred"
            )),
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Policy::Balanced => "balanced",
            Policy::TapPreferred => "tap-preferred",
            Policy::ModPreferred => "mod-preferred",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_rules() {
        for p in Policy::ALL {
            assert_eq!(p.react(PolicyEvent::OwnDown), None, "{p}");
            assert_eq!(p.react(PolicyEvent::OwnUp), Some(Resolution::Tap), "{p}");
            assert_eq!(p.react(PolicyEvent::Timeout), Some(Resolution::Hold), "{p}");
        }
    }

    #[test]
    fn sibling_reactions() {
        use PolicyEvent::*;
        assert_eq!(Policy::Balanced.react(OtherDown), None);
        assert_eq!(Policy::Balanced.react(OtherUp), Some(Resolution::Hold));
        assert_eq!(Policy::TapPreferred.react(OtherDown), None);
        assert_eq!(Policy::TapPreferred.react(OtherUp), None);
        assert_eq!(Policy::ModPreferred.react(OtherDown), Some(Resolution::Hold));
        assert_eq!(Policy::ModPreferred.react(OtherUp), None);
    }

    #[test]
    fn names() {
        for p in Policy::ALL {
            assert_eq!(Policy::try_from_str(&p.to_string()), Ok(p));
        }
        assert_eq!(
            Policy::try_from_str("hold-on-other-key-press"),
            Ok(Policy::ModPreferred)
        );
        assert_eq!(
            Policy::try_from_str("permissive-hold"),
            Ok(Policy::Balanced)
        );
        assert!(Policy::try_from_str("tap-unless-interrupted").is_err());
    }
}
