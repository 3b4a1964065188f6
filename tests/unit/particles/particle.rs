use super::*;
use crate::animation::ease::Ease;
use crate::foundation::error::PixmorphResult;
use crate::particles::physics::InteractionMode;
use crate::render::surface::{CompositeOp, ReadError};

#[derive(Debug, PartialEq)]
enum Draw {
    Circle(Point, f64, Rgba8),
    Square(Point, f64, Rgba8),
}

#[derive(Default)]
struct RecordingSurface {
    draws: Vec<Draw>,
}

impl Surface for RecordingSurface {
    fn size(&self) -> (u32, u32) {
        (100, 100)
    }
    fn attach(&mut self, _container: &str) -> PixmorphResult<()> {
        Ok(())
    }
    fn detach(&mut self) {}
    fn clear(&mut self, _backdrop: Rgba8) {}
    fn fill_all(&mut self, _color: Rgba8, _alpha: f64) {}
    fn set_composite(&mut self, _op: CompositeOp) {}
    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba8) {
        self.draws.push(Draw::Circle(center, radius, color));
    }
    fn fill_square(&mut self, center: Point, half_extent: f64, color: Rgba8) {
        self.draws.push(Draw::Square(center, half_extent, color));
    }
    fn read_pixel(&self, _x: i64, _y: i64) -> Result<Rgba8, ReadError> {
        Err(ReadError::Unavailable)
    }
}

fn init(ease: Ease) -> ParticleInit {
    ParticleInit {
        target: Point::new(100.0, 50.0),
        start: Some(Point::new(0.0, 0.0)),
        bounds: Vec2::new(100.0, 100.0),
        size: 2.0,
        shape: PointShape::Circle,
        jitter: 0.0,
        from_color: Rgba8::opaque(0, 0, 0),
        to_color: Rgba8::opaque(200, 100, 0),
        easing: Easing::Named(ease),
        duration: 1000.0,
        now: 500.0,
    }
}

#[test]
fn completes_only_at_the_end_of_the_duration() {
    let mut rng = fastrand::Rng::with_seed(1);
    let mut p = Particle::new(0, init(Ease::Linear), &mut rng);

    let mut last = 0.0;
    for i in 0..=998 {
        p.update(500.0 + f64::from(i), None);
        assert!(!p.is_completed(), "completed early at {i}");
        assert!(p.progress() >= last);
        last = p.progress();
    }
    p.update(1500.0, None);
    assert!(p.is_completed());
    assert_eq!(p.position(), Point::new(100.0, 50.0));
}

#[test]
fn base_position_interpolates_with_eased_progress() {
    let mut rng = fastrand::Rng::with_seed(1);
    let mut p = Particle::new(0, init(Ease::Linear), &mut rng);
    p.update(1000.0, None);
    assert_eq!(p.progress(), 0.5);
    assert_eq!(p.position(), Point::new(50.0, 25.0));

    let mut p = Particle::new(0, init(Ease::InQuad), &mut rng);
    p.update(1000.0, None);
    assert_eq!(p.progress(), 0.25);
    assert_eq!(p.position(), Point::new(25.0, 12.5));
}

#[test]
fn random_start_lies_inside_bounds() {
    let mut rng = fastrand::Rng::with_seed(42);
    for _ in 0..100 {
        let p = Particle::new(
            0,
            ParticleInit {
                start: None,
                ..init(Ease::Linear)
            },
            &mut rng,
        );
        let s = p.start();
        assert!((0.0..=100.0).contains(&s.x));
        assert!((0.0..=100.0).contains(&s.y));
    }
}

#[test]
fn colour_is_cached_until_progress_moves() {
    let mut rng = fastrand::Rng::with_seed(1);
    let mut p = Particle::new(0, init(Ease::Linear), &mut rng);

    p.update(1000.0, None);
    let half = p.current_color();
    assert_eq!(half, Rgba8::opaque(100, 50, 0));

    // +0.005 progress: below the refresh step, colour is reused.
    p.update(1005.0, None);
    assert_eq!(p.current_color(), half);

    // +0.02 progress: recomputed.
    p.update(1020.0, None);
    assert_eq!(p.current_color(), Rgba8::opaque(104, 52, 0));
}

#[test]
fn render_uses_target_colour_once_complete() {
    let mut rng = fastrand::Rng::with_seed(1);
    let mut p = Particle::new(0, init(Ease::Linear), &mut rng);
    let mut s = RecordingSurface::default();

    p.update(1500.0, None);
    p.render(&mut s, &mut rng);
    assert_eq!(
        s.draws,
        vec![Draw::Circle(
            Point::new(100.0, 50.0),
            2.0,
            Rgba8::opaque(200, 100, 0)
        )]
    );
}

#[test]
fn squares_and_jitter() {
    let mut rng = fastrand::Rng::with_seed(3);
    let mut p = Particle::new(
        0,
        ParticleInit {
            shape: PointShape::Square,
            jitter: 4.0,
            ..init(Ease::Linear)
        },
        &mut rng,
    );
    let mut s = RecordingSurface::default();
    p.update(1500.0, None);
    for _ in 0..50 {
        p.render(&mut s, &mut rng);
    }
    for d in &s.draws {
        let Draw::Square(c, half, _) = d else {
            panic!("expected a square, got {d:?}");
        };
        assert_eq!(*half, 2.0);
        assert!((c.x - 100.0).abs() <= 2.0);
        assert!((c.y - 50.0).abs() <= 2.0);
    }
}

#[test]
fn interaction_offsets_and_reset_clears_them() {
    let mut rng = fastrand::Rng::with_seed(1);
    let mut p = Particle::new(0, init(Ease::Linear), &mut rng);
    let frame = InteractionFrame {
        mode: InteractionMode::Repel,
        pointer: Some(Point::new(95.0, 50.0)),
        radius: 120.0,
        strength: 900.0,
        damping: 0.88,
        spring: 36.0,
        burst: None,
        dt: 1.0 / 60.0,
    };
    p.update(1500.0, Some(&frame));
    assert!(p.offset().x > 0.0);
    assert!(p.position().x > 100.0);
    assert!(p.is_completed());

    p.update(1500.0, None);
    assert_eq!(p.offset(), Vec2::ZERO);
    assert_eq!(p.position(), Point::new(100.0, 50.0));

    p.update(1500.0, Some(&frame));
    p.reset(init(Ease::Linear), &mut rng);
    assert_eq!(p.offset(), Vec2::ZERO);
    assert_eq!(p.progress(), 0.0);
    assert!(!p.is_completed());
}
