use std::path::PathBuf;

pub mod arbiter;
pub mod cfg;
pub mod keyboard;
pub mod keys;
pub mod oskbd;

pub use arbiter::{Arbiter, ArbiterError, HoldTapKey, KeyOutput, Policy, Resolution};
pub use keyboard::Keyboard;
pub use keys::{str_to_keycode, KeyCode};


type CfgPath = PathBuf;

pub struct ValidatedArgs {
    pub cfg_path: CfgPath,
    pub sim_paths: Vec<PathBuf>,
}

/// Configuration files to try when none is given: `holdtap.kbd` in the working directory, then
/// the one in the platform configuration directory.
pub fn default_cfg() -> Vec<PathBuf> {
    let mut cfgs = Vec::new();

    let default = PathBuf::from("holdtap.kbd");
    if default.is_file() {
        cfgs.push(default);
    }

    if let Some(config_dir) = dirs::config_dir() {
        let fallback = config_dir.join("holdtap").join("holdtap.kbd");
        if fallback.is_file() {
            cfgs.push(fallback);
        }
    }

    cfgs
}

pub fn default_sim() -> Vec<PathBuf> {
    let mut sims = Vec::new();

    let default = PathBuf::from("test/sim.txt");
    if default.is_file() {
        sims.push(default);
    }

    if let Some(config_dir) = dirs::config_dir() {
        let fallback = config_dir.join("holdtap").join("test").join("sim.txt");
        if fallback.is_file() {
            sims.push(fallback);
        }
    }

    sims
}
