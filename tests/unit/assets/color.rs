use super::*;

#[test]
fn parses_hex_short_and_long() {
    assert_eq!(parse_color("#ff0000"), Rgba8::new(255, 0, 0, 255));
    assert_eq!(parse_color("#f00"), Rgba8::new(255, 0, 0, 255));
    assert_eq!(parse_color("#000"), Rgba8::BLACK);
    assert_eq!(parse_color("#0000ff80"), Rgba8::new(0, 0, 255, 128));
}

#[test]
fn parses_rgb_and_rgba_functions() {
    assert_eq!(parse_color("rgb(1, 2, 3)"), Rgba8::new(1, 2, 3, 255));
    assert_eq!(parse_color("rgba(10,20,30,0.5)"), Rgba8::new(10, 20, 30, 128));
    assert_eq!(parse_color("  RGBA(10, 20, 30, 1) "), Rgba8::new(10, 20, 30, 255));
    assert_eq!(parse_color("rgb(300, -4, 2.6)"), Rgba8::new(255, 0, 3, 255));
}

#[test]
fn unparseable_falls_back_to_white_and_strict_errors() {
    for bad in ["", "red", "#12", "rgb(1,2)", "rgba(a,b,c,d)", "#ggg"] {
        assert_eq!(parse_color(bad), Rgba8::WHITE, "input {bad:?}");
        assert!(try_parse_color(bad).is_err(), "input {bad:?}");
    }
}

#[test]
fn format_rounds_alpha_to_three_decimals() {
    assert_eq!(
        format_color(10, 20, 30, 128.0 / 255.0),
        "rgba(10, 20, 30, 0.502)"
    );
    assert_eq!(format_color(1, 2, 3, 1.0), "rgba(1, 2, 3, 1)");
    assert_eq!(format_color(1, 2, 3, 0.0), "rgba(1, 2, 3, 0)");
}

#[test]
fn format_of_parse_keeps_channels() {
    let c = parse_color("rgba(10,20,30,0.5)");
    assert_eq!(c.to_css(), "rgba(10, 20, 30, 0.502)");
    assert_eq!(parse_color(&c.to_css()), c);
}

#[test]
fn cache_skips_repeated_parses() {
    let mut cache = ColorCache::new();
    assert_eq!(cache.parse("#f00"), Rgba8::opaque(255, 0, 0));
    assert_eq!(cache.parse("#f00"), Rgba8::opaque(255, 0, 0));
    assert_eq!(cache.parse_count(), 1);

    assert_eq!(cache.parse("#0f0"), Rgba8::opaque(0, 255, 0));
    assert_eq!(cache.parse("#0f0"), Rgba8::opaque(0, 255, 0));
    assert_eq!(cache.parse_count(), 2);
}

#[test]
fn cache_keeps_both_ends_of_a_ramp() {
    let mut cache = ColorCache::new();
    for _ in 0..10 {
        assert_eq!(cache.parse("#000"), Rgba8::opaque(0, 0, 0));
        assert_eq!(cache.parse("rgba(0, 0, 255, 1)"), Rgba8::opaque(0, 0, 255));
    }
    assert_eq!(cache.parse_count(), 2);
}

#[test]
fn cache_evicts_the_oldest_entry() {
    let mut cache = ColorCache::new();
    let keys = ["#100", "#200", "#300", "#400", "#500"];
    for k in &keys[..COLOR_CACHE_SLOTS] {
        cache.parse(k);
    }
    cache.parse(keys[COLOR_CACHE_SLOTS]);
    cache.parse(keys[1]);
    assert_eq!(cache.parse_count(), COLOR_CACHE_SLOTS as u64 + 1);
    cache.parse(keys[0]);
    assert_eq!(cache.parse_count(), COLOR_CACHE_SLOTS as u64 + 2);
}
