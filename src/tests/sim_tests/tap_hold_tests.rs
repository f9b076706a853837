use super::*;

const CFG: &str = "
(defcfg hold-ms 200)
(defholdtap
  f (f lsft)
  j (j rsft 150))
";

#[test]
fn quick_tap_types_the_key() {
    let result = simulate(CFG, "d:f t:50 u:f t:50");
    assert_eq!("t:50ms dn:F up:F", result);
}

#[test]
fn held_past_timeout_becomes_modifier() {
    let result = simulate(CFG, "d:f t:300 u:f t:10");
    assert_eq!("t:200ms dn:LShift t:100ms up:LShift", result);
}

#[test]
fn release_on_the_deadline_tick_still_holds() {
    let result = simulate(CFG, "d:f t:200 u:f");
    assert_eq!("t:200ms dn:LShift up:LShift", result);
    let result = simulate(CFG, "d:f t:199 u:f");
    assert_eq!("t:199ms dn:F up:F", result);
}

#[test]
fn per_binding_hold_time() {
    let result = simulate(CFG, "d:j t:160 u:j");
    assert_eq!("t:150ms dn:RShift t:10ms up:RShift", result);
}

#[test]
fn plain_keys_pass_through_when_nothing_is_pending() {
    let result = simulate(CFG, "d:a t:10 u:a t:10 d:spc u:spc");
    assert_eq!("dn:A t:10ms up:A t:10ms dn:Space up:Space", result);
}

#[test]
fn plain_key_pressed_during_tap_is_delayed_until_tap() {
    let result = simulate(CFG, "d:f t:50 d:a t:20 u:f t:30 u:a");
    assert_eq!("t:70ms dn:F dn:A up:F t:30ms up:A", result);
}

#[test]
fn modifier_released_during_tap_is_kept_in_order() {
    let result = simulate(CFG, "d:lctl t:10 d:f t:10 u:lctl t:10 u:f");
    assert_eq!("dn:LCtrl t:30ms dn:F up:LCtrl up:F", result);
}

#[test]
fn modifier_released_during_hold_is_kept_in_order() {
    let result = simulate(CFG, "d:lctl t:10 d:f t:10 u:lctl t:300 u:f");
    assert_eq!("dn:LCtrl t:210ms dn:LShift up:LCtrl t:110ms up:LShift", result);
}

#[test]
fn earlier_plain_key_release_passes_through() {
    let result = simulate(CFG, "d:a t:10 d:f t:10 u:a t:300 u:f");
    assert_eq!("dn:A t:20ms up:A t:190ms dn:LShift t:110ms up:LShift", result);
}

#[test]
fn glyph_script() {
    let result = simulate(CFG, "↓f 🕐50 ↓a 🕐20 ↑a 🕐30 ↑f");
    assert_eq!("t:70ms dn:LShift dn:A up:A t:30ms up:LShift", result);
}
