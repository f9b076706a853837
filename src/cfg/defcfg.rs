use super::sexpr::SExpr;
use super::*;

use crate::arbiter::Policy;

pub const DEFAULT_HOLD_MS: u16 = 200;

/// Global options from `defcfg`. Bindings that do not say otherwise use these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CfgOptions {
    /// Time in milliseconds after which a pending hold-tap key is forced to hold.
    pub hold_ms: u16,
    pub default_policy: Policy,
}

impl Default for CfgOptions {
    fn default() -> Self {
        Self {
            hold_ms: DEFAULT_HOLD_MS,
            default_policy: Policy::default(),
        }
    }
}

/// Parse configuration entries from an expression starting with defcfg.
pub fn parse_defcfg(expr: &[SExpr]) -> Result<CfgOptions> {
    let mut seen_keys = HashSet::default();
    let mut cfg = CfgOptions::default();
    let mut exprs = check_first_expr(expr.iter(), "defcfg")?;
    // Read k-v pairs from the configuration
    loop {
        let key = match exprs.next() {
            Some(k) => k,
            None => return Ok(cfg),
        };
        let val = match exprs.next() {
            Some(v) => v,
            None => bail_expr!(key, "Found a defcfg option missing a value"),
        };
        match (key, val) {
            (SExpr::Atom(k), SExpr::Atom(_)) => {
                if !seen_keys.insert(k.t.as_str()) {
                    bail_expr!(key, "Duplicate defcfg option {}", k.t);
                }
                match k.t.as_str() {
                    label @ "hold-ms" => {
                        cfg.hold_ms = parse_non_zero_u16(val, label)?;
                    }
                    "default-policy" => {
                        cfg.default_policy = parse_policy(val)?;
                    }
                    _ => bail_expr!(
                        key,
                        "Unknown defcfg option {}\nvalid options: hold-ms, default-policy",
                        k.t
                    ),
                }
            }
            (SExpr::List(_), _) => {
                bail_expr!(key, "Lists are not allowed as defcfg option names")
            }
            (_, SExpr::List(_)) => {
                bail_expr!(val, "Lists are not allowed as defcfg option values")
            }
        }
    }
}

pub(super) fn parse_non_zero_u16(expr: &SExpr, label: &str) -> Result<u16> {
    expr.atom()
        .map(str::parse::<u16>)
        .and_then(|u| match u {
            Ok(u @ 1..) => Some(u),
            _ => None,
        })
        .ok_or_else(|| anyhow_expr!(expr, "{label} must be 1-65535"))
}

pub(super) fn parse_policy(expr: &SExpr) -> Result<Policy> {
    let name = expr
        .atom()
        .ok_or_else(|| anyhow_expr!(expr, "Expected a policy name, found a list"))?;
    Policy::try_from_str(name).map_err(|e| anyhow_expr!(expr, "{e}"))
}
