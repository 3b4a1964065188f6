use super::*;
use crate::assets::store::PixelData;

fn params() -> SampleParams {
    SampleParams {
        pixel_step: 1.0,
        viewport_width: 800.0,
        max_particles: None,
        alpha_threshold: 0,
        fit: FitMode::None,
        align_x: Align::Start,
        align_y: Align::Start,
        color_sampling: ColorSampling::Source,
    }
}

/// 4x2 image: left half opaque red, right half transparent.
fn half_red() -> LoadedImage {
    let mut rgba = Vec::new();
    for _y in 0..2 {
        for x in 0..4 {
            if x < 2 {
                rgba.extend_from_slice(&[255, 0, 0, 255]);
            } else {
                rgba.extend_from_slice(&[0, 0, 0, 0]);
            }
        }
    }
    LoadedImage::new(ImageId(7), "half", PixelData::new(4, 2, rgba).unwrap())
}

#[test]
fn transparent_pixels_never_become_targets() {
    let mut cache = ResampleCache::new();
    let s = sample_targets(&half_red(), 10, 10, &params(), &mut cache).unwrap();
    assert_eq!(s.step, 1);
    assert_eq!(s.points.len(), 4);
    for p in &s.points {
        assert!(p.pos.x < 2.0);
        assert_eq!(p.color, Rgba8::opaque(255, 0, 0));
    }
}

#[test]
fn alpha_threshold_is_exclusive() {
    let img = LoadedImage::new(
        ImageId(1),
        "a",
        PixelData::new(2, 1, vec![1, 1, 1, 10, 1, 1, 1, 11]).unwrap(),
    );
    let mut cache = ResampleCache::new();
    let p = SampleParams {
        alpha_threshold: 10,
        ..params()
    };
    let s = sample_targets(&img, 2, 1, &p, &mut cache).unwrap();
    assert_eq!(s.points.len(), 1);
    assert_eq!(s.points[0].pos, Point::new(1.0, 0.0));
}

#[test]
fn positions_follow_the_fit_transform() {
    let mut cache = ResampleCache::new();
    let p = SampleParams {
        fit: FitMode::Contain,
        align_x: Align::Center,
        align_y: Align::Center,
        pixel_step: 2.0,
        ..params()
    };
    // 4x2 contained in 16x16 -> scale 4, drawn 16x8 at y offset 4.
    let s = sample_targets(&half_red(), 16, 16, &p, &mut cache).unwrap();
    assert!((s.transform.offset_y - 4.0).abs() < 1e-12);
    assert!(s.points.iter().all(|t| t.pos.x < 8.0));
    assert!(s.points.iter().all(|t| t.pos.y >= 4.0 && t.pos.y < 12.0));
    assert_eq!(s.points.len(), 4 * 4);
}

#[test]
fn scaled_sampling_caches_per_size() {
    let mut cache = ResampleCache::new();
    let p = SampleParams {
        fit: FitMode::Stretch,
        color_sampling: ColorSampling::Scaled,
        ..params()
    };
    let img = half_red();
    let a = sample_targets(&img, 8, 4, &p, &mut cache).unwrap();
    let b = sample_targets(&img, 8, 4, &p, &mut cache).unwrap();
    assert_eq!(a.points.len(), b.points.len());
    assert_eq!(cache.resample_count(), 1);

    sample_targets(&img, 12, 4, &p, &mut cache).unwrap();
    assert_eq!(cache.resample_count(), 2);
    assert_eq!(cache.len(), 2);
}

#[test]
fn scaled_edges_keep_their_colour_as_alpha_falls_off() {
    let img = LoadedImage::new(
        ImageId(3),
        "edge",
        PixelData::new(2, 1, vec![255, 0, 0, 255, 0, 0, 0, 0]).unwrap(),
    );
    let mut cache = ResampleCache::new();
    let p = SampleParams {
        fit: FitMode::Stretch,
        color_sampling: ColorSampling::Scaled,
        ..params()
    };
    let s = sample_targets(&img, 8, 1, &p, &mut cache).unwrap();
    assert!(s.points.iter().any(|t| t.color.a < 255));
    for t in &s.points {
        assert_eq!((t.color.r, t.color.g, t.color.b), (255, 0, 0), "at x={}", t.pos.x);
    }
}

#[test]
fn targets_outside_the_surface_are_dropped() {
    let mut cache = ResampleCache::new();
    let p = SampleParams {
        align_x: Align::End,
        ..params()
    };
    // Native 4x2 image right-aligned on a 3 px wide surface: offset -1 clips column 0.
    let s = sample_targets(&half_red(), 3, 2, &p, &mut cache).unwrap();
    assert_eq!(s.points.len(), 2);
    assert!(s.points.iter().all(|t| t.pos.x == 0.0));
}

#[test]
fn step_widens_for_wide_viewports_and_caps() {
    assert_eq!(effective_step(4.0, 800.0, 100.0, 100.0, None), 4);
    assert_eq!(effective_step(4.0, 2400.0, 100.0, 100.0, None), 8);
    assert_eq!(effective_step(1.0, 800.0, 100.0, 100.0, Some(100)), 10);
    assert_eq!(effective_step(0.0, 800.0, 10.0, 10.0, None), 1);
    assert_eq!(effective_step(f64::NAN, 800.0, 10.0, 10.0, Some(0)), 1);
}
