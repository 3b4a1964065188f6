use super::*;

#[test]
fn lerp_hits_both_endpoints() {
    let a = Rgba8::new(0, 100, 200, 0);
    let b = Rgba8::new(255, 0, 100, 255);
    assert_eq!(a.lerp(b, 0.0), a);
    assert_eq!(a.lerp(b, 1.0), b);
    assert_eq!(a.lerp(b, 0.5), Rgba8::new(128, 50, 150, 128));
}

#[test]
fn premul_roundtrip_is_exact_for_opaque_and_zero_for_transparent() {
    let c = Rgba8::opaque(12, 34, 56);
    assert_eq!(c.to_premul(), [12, 34, 56, 255]);
    assert_eq!(Rgba8::from_premul(c.to_premul()), c);
    assert_eq!(Rgba8::from_premul([9, 9, 9, 0]), Rgba8::TRANSPARENT);
}

#[test]
fn premul_roundtrip_is_close_for_translucent() {
    let c = Rgba8::new(200, 100, 50, 128);
    let back = Rgba8::from_premul(c.to_premul());
    assert_eq!(back.a, 128);
    assert!((i32::from(back.r) - 200).abs() <= 1);
    assert!((i32::from(back.g) - 100).abs() <= 1);
    assert!((i32::from(back.b) - 50).abs() <= 1);
}

#[test]
fn with_opacity_scales_alpha_only() {
    let c = Rgba8::opaque(1, 2, 3).with_opacity(0.5);
    assert_eq!(c, Rgba8::new(1, 2, 3, 128));
}
