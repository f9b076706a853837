use crate::tests::*;
use crate::Keyboard;

mod input_discipline_tests;
mod nested_sim_tests;
mod policy_sim_tests;
mod tap_hold_tests;

fn run(cfg: &str, sim: &str) -> Keyboard {
    init_log();
    let mut k = Keyboard::new_from_str(cfg).expect("failed to parse cfg");
    k.run_sim(sim).expect("input handles fine");
    k
}

/// Run `sim` against `cfg` and return the key reports. Every sim is expected to release all keys
/// and leave nothing buffered.
fn simulate(cfg: &str, sim: &str) -> String {
    let k = run(cfg, sim);
    assert!(k.is_idle(), "keyboard not idle after: {sim}");
    k.kbd_out.events()
}
