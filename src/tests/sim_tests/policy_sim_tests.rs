use super::*;

const CFG: &str = "
(defholdtap
  f (f lsft balanced)
  d (d lctl tap-preferred)
  s (s lalt mod-preferred))
";

#[test]
fn every_policy_taps_when_released_alone() {
    for key in ["f", "d", "s"] {
        let result = simulate(CFG, &format!("d:{key} t:30 u:{key}"));
        let tap = key.to_uppercase();
        assert_eq!(format!("t:30ms dn:{tap} up:{tap}"), result);
    }
}

#[test]
fn balanced_holds_when_a_key_is_tapped_inside() {
    let result = simulate(CFG, "d:f t:50 d:j t:20 u:j t:30 u:f");
    assert_eq!("t:70ms dn:LShift dn:J up:J t:30ms up:LShift", result);
}

#[test]
fn balanced_taps_on_rolled_release() {
    let result = simulate(CFG, "d:f t:50 d:j t:20 u:f t:30 u:j");
    assert_eq!("t:70ms dn:F dn:J up:F t:30ms up:J", result);
}

#[test]
fn balanced_sibling_held_until_timeout() {
    let result = simulate(CFG, "d:f t:50 d:j t:200 u:j u:f");
    assert_eq!("t:200ms dn:LShift dn:J t:50ms up:J up:LShift", result);
}

#[test]
fn tap_preferred_ignores_other_keys() {
    let result = simulate(CFG, "d:d t:50 d:j t:20 u:j t:30 u:d");
    assert_eq!("t:100ms dn:D dn:J up:J up:D", result);
    let result = simulate(CFG, "d:d t:50 d:j t:20 u:j t:200 u:d");
    assert_eq!("t:200ms dn:LCtrl dn:J up:J t:70ms up:LCtrl", result);
}

#[test]
fn mod_preferred_holds_on_any_press() {
    let result = simulate(CFG, "d:s t:50 d:j t:20 u:j t:30 u:s");
    assert_eq!("t:50ms dn:LAlt dn:J t:20ms up:J t:30ms up:LAlt", result);
    let result = simulate(CFG, "d:s t:50 d:j t:20 u:s t:30 u:j");
    assert_eq!("t:50ms dn:LAlt dn:J t:20ms up:LAlt t:30ms up:J", result);
}
