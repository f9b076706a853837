//! Key names understood by the keymap and simulation files, and the symbols emitted as output.

use std::fmt;

/// A keyboard symbol. Used both for the physical inputs of the simulator and for the tap/hold
/// outputs of a hold-tap binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KeyCode {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,
    Kb0,
    Kb1,
    Kb2,
    Kb3,
    Kb4,
    Kb5,
    Kb6,
    Kb7,
    Kb8,
    Kb9,
    Grave,
    Minus,
    Equal,
    LBracket,
    RBracket,
    Bslash,
    SColon,
    Quote,
    Comma,
    Dot,
    Slash,
    Space,
    Enter,
    Escape,
    Tab,
    BSpace,
    Delete,
    CapsLock,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PgUp,
    PgDown,
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
    LShift,
    RShift,
    LCtrl,
    RCtrl,
    LAlt,
    RAlt,
    LGui,
    RGui,
}

impl KeyCode {
    /// Modifiers are never passed through early on release; see `Arbiter::plain_up`.
    pub fn is_modifier(self) -> bool {
        matches!(
            self,
            KeyCode::LShift
                | KeyCode::RShift
                | KeyCode::LCtrl
                | KeyCode::RCtrl
                | KeyCode::LAlt
                | KeyCode::RAlt
                | KeyCode::LGui
                | KeyCode::RGui
        )
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Parse a key name. Accepts the short lowercase names used in configuration files, a few long
/// aliases, and the variant names as printed by `Display`.
#[rustfmt::skip]
pub fn str_to_keycode(s: &str) -> Option<KeyCode> {
    use KeyCode::*;
    Some(match s {
        "a" | "A" => A,
        "b" | "B" => B,
        "c" | "C" => C,
        "d" | "D" => D,
        "e" | "E" => E,
        "f" | "F" => F,
        "g" | "G" => G,
        "h" | "H" => H,
        "i" | "I" => I,
        "j" | "J" => J,
        "k" | "K" => K,
        "l" | "L" => L,
        "m" | "M" => M,
        "n" | "N" => N,
        "o" | "O" => O,
        "p" | "P" => P,
        "q" | "Q" => Q,
        "r" | "R" => R,
        "s" | "S" => S,
        "t" | "T" => T,
        "u" | "U" => U,
        "v" | "V" => V,
        "w" | "W" => W,
        "x" | "X" => X,
        "y" | "Y" => Y,
        "z" | "Z" => Z,
        "0" | "Kb0" => Kb0,
        "1" | "Kb1" => Kb1,
        "2" | "Kb2" => Kb2,
        "3" | "Kb3" => Kb3,
        "4" | "Kb4" => Kb4,
        "5" | "Kb5" => Kb5,
        "6" | "Kb6" => Kb6,
        "7" | "Kb7" => Kb7,
        "8" | "Kb8" => Kb8,
        "9" | "Kb9" => Kb9,
        "grv" | "Grave" => Grave,
        "min" | "-" | "Minus" => Minus,
        "eql" | "=" | "Equal" => Equal,
        "lbrc" | "LBracket" => LBracket,
        "rbrc" | "RBracket" => RBracket,
        "bksl" | "Bslash" => Bslash,
        "scln" | "SColon" => SColon,
        "apo" | "apos" | "Quote" => Quote,
        "comm" | "," | "Comma" => Comma,
        "." | "Dot" => Dot,
        "/" | "Slash" => Slash,
        "spc" | "space" | "Space" => Space,
        "ret" | "ent" | "enter" | "Enter" => Enter,
        "esc" | "Escape" => Escape,
        "tab" | "Tab" => Tab,
        "bspc" | "BSpace" => BSpace,
        "del" | "Delete" => Delete,
        "caps" | "CapsLock" => CapsLock,
        "left" | "Left" => Left,
        "rght" | "right" | "Right" => Right,
        "up" | "Up" => Up,
        "down" | "Down" => Down,
        "home" | "Home" => Home,
        "end" | "End" => End,
        "pgup" | "PgUp" => PgUp,
        "pgdn" | "PgDown" => PgDown,
        "f1" | "F1" => F1,
        "f2" | "F2" => F2,
        "f3" | "F3" => F3,
        "f4" | "F4" => F4,
        "f5" | "F5" => F5,
        "f6" | "F6" => F6,
        "f7" | "F7" => F7,
        "f8" | "F8" => F8,
        "f9" | "F9" => F9,
        "f10" | "F10" => F10,
        "f11" | "F11" => F11,
        "f12" | "F12" => F12,
        "lsft" | "lshift" | "sft" | "shift" | "LShift" => LShift,
        "rsft" | "rshift" | "RShift" => RShift,
        "lctl" | "lctrl" | "ctl" | "ctrl" | "LCtrl" => LCtrl,
        "rctl" | "rctrl" | "RCtrl" => RCtrl,
        "lalt" | "alt" | "LAlt" => LAlt,
        "ralt" | "RAlt" => RAlt,
        "lmet" | "lgui" | "met" | "gui" | "LGui" => LGui,
        "rmet" | "rgui" | "RGui" => RGui,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_map_to_same_key() {
        for s in ["lsft", "shift", "sft", "LShift"] {
            assert_eq!(str_to_keycode(s), Some(KeyCode::LShift), "{s}");
        }
        assert_eq!(str_to_keycode("ctrl"), Some(KeyCode::LCtrl));
        assert_eq!(str_to_keycode("gui"), Some(KeyCode::LGui));
        assert_eq!(str_to_keycode("nope"), None);
    }

    #[test]
    fn display_round_trips_through_parser() {
        for k in [KeyCode::F, KeyCode::Kb1, KeyCode::RAlt, KeyCode::PgDown, KeyCode::SColon] {
            assert_eq!(str_to_keycode(&k.to_string()), Some(k));
        }
    }

    #[test]
    fn modifiers() {
        assert!(KeyCode::LShift.is_modifier());
        assert!(KeyCode::RGui.is_modifier());
        assert!(!KeyCode::J.is_modifier());
        assert!(!KeyCode::CapsLock.is_modifier());
    }
}
