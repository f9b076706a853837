use super::defcfg::{parse_non_zero_u16, parse_policy};
use super::sexpr::SExpr;
use super::*;

use crate::arbiter::{HoldTapKey, Policy};
use crate::keys::*;

/// What pressing an input key means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoldTapBinding {
    pub input: KeyCode,
    pub key: HoldTapKey,
    pub policy: Policy,
    pub hold_ms: u16,
}

pub type HoldTapBindings = HashMap<KeyCode, HoldTapBinding>;

/// Parse an expression starting with defholdtap into `bindings`.
///
/// Entries are pairs of an input key and `(tap hold [policy] [hold-ms])`. Missing settings come
/// from `options`.
pub fn parse_defholdtap(
    expr: &[SExpr],
    options: &CfgOptions,
    bindings: &mut HoldTapBindings,
) -> Result<()> {
    let mut exprs = check_first_expr(expr.iter(), "defholdtap")?.peekable();
    if exprs.peek().is_none() {
        bail_expr!(&expr[0], "defholdtap must contain at least one binding");
    }
    while let Some(input_expr) = exprs.next() {
        let input = parse_key(input_expr, "input")?;
        let action = match exprs.next() {
            Some(a) => a,
            None => bail_expr!(
                input_expr,
                "Found an input key with no hold-tap action after it"
            ),
        };
        let binding = parse_holdtap_action(input, action, options)?;
        if bindings.contains_key(&input) {
            bail_expr!(input_expr, "Input key {input} is bound more than once");
        }
        if let Some(other) = bindings.values().find(|b| b.key == binding.key) {
            bail_expr!(
                action,
                "{} is already bound to input key {}\nEach tap/hold pair may be used once",
                binding.key,
                other.input
            );
        }
        log::trace!("{input} -> {} ({}, {}ms)", binding.key, binding.policy, binding.hold_ms);
        bindings.insert(input, binding);
    }
    Ok(())
}

fn parse_holdtap_action(
    input: KeyCode,
    expr: &SExpr,
    options: &CfgOptions,
) -> Result<HoldTapBinding> {
    const SYNTAX: &str = "(tap hold [policy] [hold-ms])";
    let params = expr
        .list()
        .ok_or_else(|| anyhow_expr!(expr, "Expected a hold-tap action {SYNTAX}"))?;
    let (tap, hold, rest) = match params {
        [tap, hold, rest @ ..] if rest.len() <= 2 => (tap, hold, rest),
        _ => bail_expr!(expr, "Expected a hold-tap action {SYNTAX}"),
    };
    let key = HoldTapKey::new(parse_key(tap, "tap")?, parse_key(hold, "hold")?);

    let mut policy = None;
    let mut hold_ms = None;
    for param in rest {
        let is_number = param
            .atom()
            .is_some_and(|a| a.bytes().all(|b| b.is_ascii_digit()));
        if is_number {
            if hold_ms.is_some() {
                bail_expr!(param, "hold-ms is given more than once");
            }
            hold_ms = Some(parse_non_zero_u16(param, "hold-ms")?);
        } else {
            if policy.is_some() {
                bail_expr!(param, "The policy is given more than once");
            }
            policy = Some(parse_policy(param)?);
        }
    }

    Ok(HoldTapBinding {
        input,
        key,
        policy: policy.unwrap_or(options.default_policy),
        hold_ms: hold_ms.unwrap_or(options.hold_ms),
    })
}

fn parse_key(expr: &SExpr, label: &str) -> Result<KeyCode> {
    let name = expr
        .atom()
        .ok_or_else(|| anyhow_expr!(expr, "Expected a key name for {label}, found a list"))?;
    str_to_keycode(name).ok_or_else(|| anyhow_expr!(expr, "Unknown key name for {label}: {name}"))
}
