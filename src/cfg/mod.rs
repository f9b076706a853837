//! Parses the keymap configuration into the set of hold-tap bindings the simulator routes input
//! through.
//!
//! A configuration looks like:
//!
//! ```text
//! (defcfg
//!   hold-ms 200
//!   default-policy balanced)
//!
//! (defholdtap
//!   f (f lsft)
//!   d (d lctl tap-preferred)
//!   j (j rsft mod-preferred 150))
//! ```
//!
//! Every key named on the left side of `defholdtap` becomes a hold-tap key: tapping `f` types `f`
//! and holding it acts as left shift. All other keys pass through as plain keys.
//!
//! `defcfg` is optional and may appear at most once. `defholdtap` may appear several times but
//! each input key and each tap/hold pair can only be bound once across all of them.

macro_rules! bail_expr {
    ($expr:expr, $fmt:expr $(,)?) => {
        return Err(ParseError::from_expr($expr, format!($fmt)))
    };
    ($expr:expr, $fmt:expr, $($arg:tt)*) => {
        return Err(ParseError::from_expr($expr, format!($fmt, $($arg)*)))
    };
}

macro_rules! anyhow_expr {
    ($expr:expr, $fmt:expr $(,)?) => {
        ParseError::from_expr($expr, format!($fmt))
    };
    ($expr:expr, $fmt:expr, $($arg:tt)*) => {
        ParseError::from_expr($expr, format!($fmt, $($arg)*))
    };
}

macro_rules! bail_span {
    ($expr:expr, $fmt:expr $(,)?) => {
        return Err(ParseError::from_spanned($expr, format!($fmt)))
    };
    ($expr:expr, $fmt:expr, $($arg:tt)*) => {
        return Err(ParseError::from_spanned($expr, format!($fmt, $($arg)*)))
    };
}

macro_rules! anyhow_span {
    ($expr:expr, $fmt:expr $(,)?) => {
        ParseError::from_spanned($expr, format!($fmt))
    };
    ($expr:expr, $fmt:expr, $($arg:tt)*) => {
        ParseError::from_spanned($expr, format!($fmt, $($arg)*))
    };
}

pub mod sexpr;

mod error;
pub use error::*;

mod defcfg;
pub use defcfg::*;

mod defholdtap;
pub use defholdtap::*;


use crate::keys::KeyCode;
use sexpr::{SExpr, TopLevel};
use std::path::Path;

type HashSet<T> = rustc_hash::FxHashSet<T>;
type HashMap<K, V> = rustc_hash::FxHashMap<K, V>;

#[derive(Debug, Clone, Default)]
pub struct Cfg {
    /// Configuration items in `defcfg`.
    pub options: CfgOptions,
    /// Hold-tap bindings from every `defholdtap`, keyed by input key.
    pub bindings: HoldTapBindings,
}

impl Cfg {
    pub fn binding(&self, input: KeyCode) -> Option<&HoldTapBinding> {
        self.bindings.get(&input)
    }
}

/// Parse a new configuration from a file.
pub fn new_from_file(p: &Path) -> MResult<Cfg> {
    let text = std::fs::read_to_string(p).map_err(|e| {
        miette::miette!("Failed to read configuration file {}: {e}", p.display())
    })?;
    let file_name = p
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| p.to_string_lossy().into_owned());
    let cfg = parse_cfg_raw_string(&text, &file_name).map_err(error_with_source)?;
    log::info!("config file is valid");
    Ok(cfg)
}

/// Parse a new configuration from in-memory text.
pub fn new_from_str(cfg_text: &str) -> MResult<Cfg> {
    parse_cfg_raw_string(cfg_text, "configuration").map_err(error_with_source)
}

pub fn parse_cfg_raw_string(text: &str, file_name: &str) -> Result<Cfg> {
    let root_exprs = sexpr::parse(text, file_name)?;
    error_on_unknown_top_level_atoms(&root_exprs)?;

    let mut cfgs = root_exprs.iter().filter(gen_first_atom_filter("defcfg"));
    let options = match cfgs.next() {
        Some(cfg) => {
            if let Some(extra) = cfgs.next() {
                bail_span!(extra, "Only one defcfg is allowed in the configuration");
            }
            parse_defcfg(&cfg.t)?
        }
        None => CfgOptions::default(),
    };

    let mut bindings = HoldTapBindings::default();
    let mut holdtap_count = 0;
    for expr in root_exprs
        .iter()
        .filter(gen_first_atom_filter("defholdtap"))
    {
        parse_defholdtap(&expr.t, &options, &mut bindings)?;
        holdtap_count += 1;
    }
    if holdtap_count == 0 {
        return Err(ParseError::new_without_span(
            "No defholdtap expressions exist. At least one hold-tap key must be defined.",
        ));
    }
    log::debug!(
        "{} hold-tap bindings, hold-ms {}, default policy {}",
        bindings.len(),
        options.hold_ms,
        options.default_policy
    );
    Ok(Cfg { options, bindings })
}

fn error_on_unknown_top_level_atoms(exprs: &[TopLevel]) -> Result<()> {
    for expr in exprs {
        let first = expr.t.first().ok_or_else(|| {
            anyhow_span!(
                expr,
                "Found empty list as a configuration item, you should delete this"
            )
        })?;
        match first.atom() {
            Some("defcfg" | "defholdtap") => {}
            Some(other) => bail_expr!(
                first,
                "Found unknown configuration item: {other}\nvalid items: defcfg, defholdtap"
            ),
            None => bail_expr!(
                first,
                "Invalid: found list as first item in a configuration item"
            ),
        }
    }
    Ok(())
}

/// Return a closure that filters a root expression by the content of the first element.
fn gen_first_atom_filter(a: &str) -> impl Fn(&&TopLevel) -> bool + '_ {
    move |expr| expr.t.first().and_then(SExpr::atom) == Some(a)
}

/// Consume the first expression from the iterator and check that it is the atom
/// `expected_first`.
fn check_first_expr<'a>(
    mut exprs: impl Iterator<Item = &'a SExpr>,
    expected_first: &str,
) -> Result<impl Iterator<Item = &'a SExpr>> {
    let first = exprs.next().ok_or_else(|| {
        ParseError::new_without_span(format!("Passed empty list to {expected_first}"))
    })?;
    match first.atom() {
        Some(a) if a == expected_first => Ok(exprs),
        Some(a) => bail_expr!(
            first,
            "Passed non-{expected_first} expression to {expected_first}: {a}"
        ),
        None => bail_expr!(
            first,
            "First entry is expected to be an atom for {expected_first}"
        ),
    }
}
