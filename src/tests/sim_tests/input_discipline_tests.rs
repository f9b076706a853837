use super::*;
use crate::arbiter::ArbiterError;

const CFG: &str = "
(defholdtap
  f (f lsft)
  d (d lctl tap-preferred))
";

#[test]
fn repeated_press_is_ignored() {
    let result = simulate(CFG, "d:f t:10 d:f t:10 u:f");
    assert_eq!("t:20ms dn:F up:F", result);
}

#[test]
fn release_without_press_is_ignored() {
    let result = simulate(CFG, "u:f t:10 d:f u:f");
    assert_eq!("t:10ms dn:F up:F", result);
}

#[test]
fn press_while_previous_release_is_buffered_is_dropped() {
    let result = simulate(CFG, "d:d t:10 d:f t:10 u:f t:10 d:f t:10 u:f t:10 u:d");
    assert_eq!("t:50ms dn:D dn:F up:F up:D", result);
}

#[test]
fn held_keys_keep_the_keyboard_busy() {
    let k = run(CFG, "d:f t:20 d:a");
    assert_eq!(k.now_ms(), 20);
    assert!(!k.is_idle());
    assert_eq!(k.arbiter().pending().count(), 1);
    assert_eq!(k.cfg().bindings.len(), 2);
    assert_eq!(k.kbd_out.events(), "");
}

#[test]
fn queue_overflow_is_an_error() {
    init_log();
    let mut k = Keyboard::new_from_str("(defholdtap f (f lsft tap-preferred))").unwrap();
    let mut sim = String::from("d:f");
    for _ in 0..15 {
        sim.push_str(" d:a u:a");
    }
    sim.push_str(" d:a");
    k.run_sim(&sim).unwrap();
    assert_eq!(k.arbiter().queued_len(), 32);
    let err = k.run_sim("u:a").unwrap_err();
    assert_eq!(
        err.downcast_ref::<ArbiterError>(),
        Some(&ArbiterError::QueueFull { capacity: 32 })
    );
}

#[test]
fn refused_release_keeps_the_key_held() {
    init_log();
    let mut k = Keyboard::new_from_str(
        "(defholdtap d (d lctl tap-preferred) f (f lsft tap-preferred))",
    )
    .unwrap();
    let mut sim = String::from("d:d d:f");
    for _ in 2..32 {
        sim.push_str(" d:a");
    }
    k.run_sim(&sim).unwrap();
    let err = k.run_sim("u:f").unwrap_err();
    assert_eq!(
        err.downcast_ref::<ArbiterError>(),
        Some(&ArbiterError::QueueFull { capacity: 32 })
    );
    assert!(!k.is_idle());

    // Both hold timers are still running and the release can be repeated.
    k.run_sim("t:300 u:f u:d u:a").unwrap();
    assert!(k.is_idle());
    let expected = format!(
        "t:200ms dn:LCtrl dn:LShift{} t:100ms up:LShift up:LCtrl up:A",
        " dn:A".repeat(30)
    );
    assert_eq!(expected, k.kbd_out.events());
}

#[test]
fn invalid_cfg_is_rejected() {
    assert!(Keyboard::new_from_str("(defholdtap f)").is_err());
    assert!(Keyboard::new_from_str("(defcfg hold-ms 100)").is_err());
}
