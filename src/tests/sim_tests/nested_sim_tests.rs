use super::*;

const CFG: &str = "
(defholdtap
  f (f lsft balanced)
  d (d lctl tap-preferred)
  j (j rsft tap-preferred 100))
";

#[test]
fn inner_tap_completes_outer_hold() {
    let result = simulate(CFG, "d:f t:10 d:d t:10 d:j t:10 u:j t:10 u:f t:10 u:d");
    assert_eq!("t:30ms dn:LShift t:20ms dn:D dn:J up:J up:LShift up:D", result);
}

#[test]
fn both_held_past_timeout() {
    let result = simulate(CFG, "d:f t:10 d:d t:300 u:d u:f");
    assert_eq!("t:200ms dn:LShift t:10ms dn:LCtrl t:100ms up:LCtrl up:LShift", result);
}

#[test]
fn inner_timeout_waits_for_outer() {
    let result = simulate(CFG, "d:f t:50 d:j t:200 u:j u:f");
    assert_eq!("t:200ms dn:LShift dn:RShift t:50ms up:RShift up:LShift", result);
}
