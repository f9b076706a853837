use anyhow::{bail, Result};
use clap::Parser;
use holdtap_state_machine::{cfg, default_cfg, default_sim, Keyboard, ValidatedArgs};
use simplelog::{format_description, *};

use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, verbatim_doc_comment)]
/// holdtap: replays recorded key events through hold-tap arbitration
///
/// Each simulation file is a list of key events and delays, such as
///
///     d:f t:50 d:j u:j u:f t:300
///
/// The keys bound in the configuration's defholdtap act as hold-tap keys; all
/// others are plain keys. For every simulation file, one line with the key
/// reports that would be sent is printed, such as
///
///     t:50ms dn:LShift dn:J up:J up:LShift
struct Args {
    // Display different platform specific paths based on the target OS
    #[cfg_attr(
        target_os = "windows",
        doc = r"Configuration file to use. If not specified, defaults to
holdtap.kbd in the current working directory and
'C:\Users\user\AppData\Roaming\holdtap\holdtap.kbd'"
    )]
    #[cfg_attr(
        target_os = "macos",
        doc = "Configuration file to use. If not specified, defaults to
holdtap.kbd in the current working directory and
'$HOME/Library/Application Support/holdtap/holdtap.kbd.'"
    )]
    #[cfg_attr(
        not(any(target_os = "macos", target_os = "windows")),
        doc = "Configuration file to use. If not specified, defaults to
holdtap.kbd in the current working directory and
'$XDG_CONFIG_HOME/holdtap/holdtap.kbd'"
    )]
    #[arg(short, long, verbatim_doc_comment)]
    cfg: Option<PathBuf>,

    /// Simulation file(s) to run. If not specified, defaults to test/sim.txt
    /// in the current working directory and test/sim.txt in the holdtap
    /// configuration directory.
    #[arg(short = 's', long, verbatim_doc_comment)]
    sim: Option<Vec<PathBuf>>,

    /// Enable debug logging.
    #[arg(short, long)]
    debug: bool,

    /// Enable trace logging; implies --debug as well.
    #[arg(short, long)]
    trace: bool,

    /// Only log errors.
    #[arg(short, long, conflicts_with_all = ["debug", "trace"])]
    quiet: bool,

    /// Validate configuration file and exit
    #[arg(long, verbatim_doc_comment)]
    check: bool,
}

fn log_init(log_lvl: LevelFilter) {
    let mut log_cfg = ConfigBuilder::new();
    if let Err(e) = log_cfg.set_time_offset_to_local() {
        eprintln!("WARNING: could not set log TZ to local: {e:?}");
    };
    log_cfg.set_time_format_custom(format_description!(
        version = 2,
        "[hour]:[minute]:[second].[subsecond digits:4]"
    ));
    CombinedLogger::init(vec![TermLogger::new(
        log_lvl,
        log_cfg.build(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )])
    .expect("logger can init");
}

/// Parse CLI arguments and initialize logging.
fn cli_init() -> Result<ValidatedArgs> {
    let args = Args::parse();

    let log_lvl = match (args.quiet, args.debug, args.trace) {
        (true, _, _) => LevelFilter::Error,
        (_, _, true) => LevelFilter::Trace,
        (_, true, false) => LevelFilter::Debug,
        (false, false, false) => LevelFilter::Info,
    };
    log_init(log_lvl);
    log::info!("holdtap v{} starting", env!("CARGO_PKG_VERSION"));

    let cfg_path = match args.cfg {
        Some(p) => p,
        None => match default_cfg().into_iter().next() {
            Some(p) => p,
            None => bail!("No config file provided\nFor more info, pass the `-h` or `--help` flags."),
        },
    };
    if !cfg_path.exists() {
        bail!(
            "Could not find the config file ({})\nFor more info, pass the `-h` or `--help` flags.",
            cfg_path.display()
        )
    }

    if args.check {
        log::info!("validating config only and exiting");
        let status = match cfg::new_from_file(&cfg_path) {
            Ok(_) => 0,
            Err(e) => {
                log::error!("{e:?}");
                1
            }
        };
        std::process::exit(status);
    }

    let sim_paths = args
        .sim
        .unwrap_or_else(|| default_sim().into_iter().take(1).collect());
    match sim_paths.iter().find(|p| !p.exists()) {
        Some(missing) => bail!(
            "Could not find the simulation file ({})\nFor more info, pass the `-h` or `--help` flags.",
            missing.display()
        ),
        None if sim_paths.is_empty() => bail!(
            "No simulation files provided\nFor more info, pass the `-h` or `--help` flags."
        ),
        None => {}
    }

    Ok(ValidatedArgs {
        cfg_path,
        sim_paths,
    })
}

fn main_impl() -> Result<()> {
    let args = cli_init()?;
    let cfg = cfg::new_from_file(&args.cfg_path).map_err(|e| {
        log::error!("{e:?}");
        anyhow::anyhow!("failed to parse the config file {}", args.cfg_path.display())
    })?;

    for sim_path in &args.sim_paths {
        log::info!("Evaluating simulation file = {}", sim_path.display());
        let sim = std::fs::read_to_string(sim_path)?;
        let mut k = Keyboard::new(cfg.clone());
        k.run_sim(&sim)?;
        if !k.is_idle() {
            log::warn!(
                "{} ended with keys still held or pending",
                sim_path.display()
            );
        }
        println!("{}", k.kbd_out.events());
    }

    Ok(())
}

fn main() -> Result<()> {
    let ret = main_impl();
    if let Err(ref e) = ret {
        log::error!("{e}\n");
    }
    ret
}
