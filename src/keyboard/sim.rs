//! Simulation scripts: whitespace separated items of the form `d:<key>`, `u:<key>` and `t:<ms>`.
//!
//! Longer prefixes `press:`, `release:`, `tick:` are accepted as well, as are the glyphs `↓`, `↑`
//! and `🕐`, which may also be written without the colon (`↓j 🕐200 ↑j`).

use anyhow::{anyhow, bail, Result};

use super::Keyboard;
use crate::keys::str_to_keycode;
use crate::oskbd::{KeyEvent, KeyValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimItem {
    Tick(u64),
    Key(KeyEvent),
}

fn split_at_1(s: &str) -> (&str, &str) {
    match s.chars().next() {
        Some(c) => s.split_at(c.len_utf8()),
        None => s.split_at(0),
    }
}

fn key_event(val: &str, value: KeyValue) -> Result<SimItem> {
    let code = str_to_keycode(val).ok_or_else(|| anyhow!("unknown key: {val}"))?;
    Ok(SimItem::Key(KeyEvent::new(code, value)))
}

pub fn parse_sim_item(item: &str) -> Result<SimItem> {
    let (kind, val) = match item.split_once(':') {
        Some(pair) => pair,
        None => match split_at_1(item) {
            // allow skipping the separator for the glyphs
            (glyph @ ("🕐" | "↓" | "↑"), val) => (glyph, val),
            _ => bail!("invalid item: {item}"),
        },
    };
    match kind {
        "tick" | "🕐" | "t" => Ok(SimItem::Tick(
            val.parse::<u64>()
                .map_err(|e| anyhow!("invalid tick {val}: {e}"))?,
        )),
        "press" | "↓" | "d" | "down" => key_event(val, KeyValue::Press),
        "release" | "↑" | "u" | "up" => key_event(val, KeyValue::Release),
        _ => bail!("invalid item prefix: {kind}"),
    }
}

pub fn parse_sim(sim: &str) -> Result<Vec<SimItem>> {
    sim.split_whitespace().map(parse_sim_item).collect()
}

impl Keyboard {
    /// Parse `sim` and feed it to the keyboard. Nothing runs if the script does not parse.
    pub fn run_sim(&mut self, sim: &str) -> Result<()> {
        for item in parse_sim(sim)? {
            match item {
                SimItem::Tick(ms) => self.tick_ms(ms)?,
                SimItem::Key(event) => self.handle_input_event(&event)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::KeyCode;

    #[test]
    fn item_spellings() {
        let press_j = SimItem::Key(KeyEvent::new(KeyCode::J, KeyValue::Press));
        let release_j = SimItem::Key(KeyEvent::new(KeyCode::J, KeyValue::Release));
        for s in ["d:j", "press:j", "down:j", "↓:j", "↓j"] {
            assert_eq!(parse_sim_item(s).unwrap(), press_j, "{s}");
        }
        for s in ["u:j", "release:j", "up:j", "↑:j", "↑j"] {
            assert_eq!(parse_sim_item(s).unwrap(), release_j, "{s}");
        }
        for s in ["t:150", "tick:150", "🕐:150", "🕐150"] {
            assert_eq!(parse_sim_item(s).unwrap(), SimItem::Tick(150), "{s}");
        }
    }

    #[test]
    fn bad_items() {
        for s in ["j", "x:j", "d:nokey", "t:soon", "t:-1"] {
            assert!(parse_sim_item(s).is_err(), "{s}");
        }
        assert!(parse_sim("d:j t:10 bogus").is_err());
    }
}
