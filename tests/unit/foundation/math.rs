use super::*;

#[test]
fn fnv_seeded_hash_is_stable() {
    let mut a = Fnv1a64::new_default();
    a.write_bytes(b"framecue");
    let mut b = Fnv1a64::new(Fnv1a64::OFFSET_BASIS);
    b.write_u8(b'f');
    b.write_bytes(b"ramecue");
    assert_eq!(a.finish(), b.finish());
}

#[test]
fn fnv_distinguishes_signed_zero() {
    let mut a = Fnv1a64::new_default();
    a.write_f64(0.0);
    let mut b = Fnv1a64::new_default();
    b.write_f64(-0.0);
    assert_ne!(a.finish(), b.finish());
}

#[test]
fn ensure_finite_rejects_nan() {
    assert!(ensure_finite("range", &[0.0, 1.0]).is_ok());
    assert!(ensure_finite("range", &[0.0, f64::NAN]).is_err());
    assert!(ensure_finite("range", &[f64::INFINITY]).is_err());
}
