use super::*;
use crate::animation::ease::Ease;

fn env() -> HostEnv {
    HostEnv {
        viewport_width: 800.0,
        viewport_height: 600.0,
        device_pixel_ratio: 2.0,
    }
}

#[test]
fn empty_json_yields_documented_defaults() {
    let o = MorphOptions::from_json("{}").unwrap();
    assert!(o.images.is_empty());
    assert_eq!(o.duration, 1000.0);
    assert_eq!(o.delay, 1000.0);
    assert_eq!(o.background, "#000");
    assert_eq!(o.pixel_step, 4.0);
    assert_eq!(o.alpha_threshold, 0);
    assert_eq!(o.point_size, 1.0);
    assert_eq!(o.point_shape, PointShape::Circle);
    assert_eq!(o.jitter, 0.0);
    assert_eq!(o.fit, FitMode::Contain);
    assert_eq!(o.align_x, Align::Center);
    assert_eq!(o.align_y, Align::Center);
    assert_eq!(o.composite_operation, CompositeOp::SourceOver);
    assert_eq!(o.fade, 1.0);
    assert!(o.sample_from_canvas);
    assert_eq!(o.color_sampling, ColorSampling::Scaled);
    assert!(!o.infinity);
    assert!(!o.is_update_from_last_position);
    assert_eq!(o.interaction, InteractionSetting::Flag(false));
    assert!((o.easing.apply(0.25) - Ease::InOutCubic.apply(0.25)).abs() < 1e-12);
}

#[test]
fn parses_camel_case_fields() {
    let o = MorphOptions::from_json(
        r##"{
            "images": ["a.png", "b.png"],
            "isUpdateFromLastPosition": true,
            "pixelStep": 6,
            "maxParticles": 5000,
            "pointShape": "square",
            "easing": "easeOutBounce",
            "compositeOperation": "lighter",
            "alignX": "left",
            "colorSampling": "source",
            "seed": 42
        }"##,
    )
    .unwrap();
    assert_eq!(o.images, vec!["a.png".to_owned(), "b.png".to_owned()]);
    assert!(o.is_update_from_last_position);
    assert_eq!(o.pixel_step, 6.0);
    assert_eq!(o.max_particles, Some(5000));
    assert_eq!(o.point_shape, PointShape::Square);
    assert!((o.easing.apply(0.5) - Ease::OutBounce.apply(0.5)).abs() < 1e-12);
    assert_eq!(o.composite_operation, CompositeOp::Lighter);
    assert_eq!(o.align_x, Align::Start);
    assert_eq!(o.color_sampling, ColorSampling::Source);
    assert_eq!(o.seed, Some(42));
}

#[test]
fn bad_json_is_a_serde_error() {
    let err = MorphOptions::from_json("{\"duration\": \"slow\"}").unwrap_err();
    assert!(matches!(err, PixmorphError::Serde(_)), "{err:?}");
}

#[test]
fn interaction_true_enables_defaults() {
    let o = MorphOptions::from_json(r#"{"interaction": true}"#).unwrap();
    let i = o.resolve(&env()).interaction.unwrap();
    assert_eq!(i.mode, InteractionMode::Repel);
    assert_eq!(i.radius, 120.0);
    assert_eq!(i.strength, 900.0);
    assert_eq!(i.damping, 0.88);
    assert_eq!(i.spring, 36.0);
    assert_eq!(i.burst, Some((220.0, 1100.0)));
}

#[test]
fn interaction_object_fills_missing_fields() {
    let o = MorphOptions::from_json(r#"{"interaction": {"mode": "vortex", "radius": 50}}"#)
        .unwrap();
    let i = o.resolve(&env()).interaction.unwrap();
    assert_eq!(i.mode, InteractionMode::Vortex);
    assert_eq!(i.radius, 50.0);
    assert_eq!(i.strength, 900.0);

    let off = MorphOptions::from_json(r#"{"interaction": {"enabled": false}}"#).unwrap();
    assert!(off.resolve(&env()).interaction.is_none());
    let off = MorphOptions::from_json(r#"{"interaction": false}"#).unwrap();
    assert!(off.resolve(&env()).interaction.is_none());
}

#[test]
fn resolve_sizes_surface_by_device_pixel_ratio() {
    let cfg = MorphOptions::default().resolve(&env());
    assert_eq!(cfg.display_width, 800.0);
    assert_eq!(cfg.surface_width, 1600);
    assert_eq!(cfg.surface_height, 1200);

    let sized = MorphOptions {
        width: Some(300.0),
        height: Some(150.0),
        ..MorphOptions::default()
    }
    .resolve(&env());
    assert_eq!((sized.surface_width, sized.surface_height), (600, 300));
}

#[test]
fn resolve_clamps_and_parses() {
    let cfg = MorphOptions {
        fade: 3.0,
        duration: -5.0,
        pixel_step: 0.0,
        jitter: f64::NAN,
        background: "rgb(1, 2, 3)".to_owned(),
        max_particles: Some(0),
        ..MorphOptions::default()
    }
    .resolve(&HostEnv::default());
    assert_eq!(cfg.fade, 1.0);
    assert_eq!(cfg.duration, 1.0);
    assert_eq!(cfg.sample.pixel_step, 1.0);
    assert_eq!(cfg.jitter, 0.0);
    assert_eq!(cfg.background, Rgba8::opaque(1, 2, 3));
    assert_eq!(cfg.sample.max_particles, None);
}

#[test]
fn unparseable_background_falls_back_to_white() {
    let cfg = MorphOptions {
        background: "not a colour".to_owned(),
        ..MorphOptions::default()
    }
    .resolve(&HostEnv::default());
    assert_eq!(cfg.background, Rgba8::WHITE);
}

#[test]
fn custom_easing_fn_is_used_verbatim() {
    let cfg = MorphOptions::default()
        .with_easing_fn(|t| t * 0.5)
        .resolve(&HostEnv::default());
    assert_eq!(cfg.easing.apply(0.8), 0.4);
}
