use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;

use pixmorph::{
    CpuSurface, FsImageLoader, HeadlessRun, HostEnv, ImageLoader, MemoryImageLoader, MorphEngine,
    MorphOptions,
};

/// Usage: `render_morph_frames [out_dir] [image ...]`
///
/// Without images, two generated pictures are morphed into each other.
fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let out_dir = PathBuf::from(args.next().unwrap_or_else(|| "target/morph_frames".to_string()));
    let images: Vec<String> = args.collect();
    std::fs::create_dir_all(&out_dir)?;

    let (loader, urls): (Arc<dyn ImageLoader>, Vec<String>) = if images.is_empty() {
        let mut mem = MemoryImageLoader::new();
        mem.insert("disc", encode_png(96, 96, disc)?);
        mem.insert("stripes", encode_png(96, 96, stripes)?);
        (Arc::new(mem) as Arc<dyn ImageLoader>, vec!["disc".to_string(), "stripes".to_string()])
    } else {
        (Arc::new(FsImageLoader::new(".")) as Arc<dyn ImageLoader>, images)
    };

    let options = MorphOptions {
        images: urls,
        duration: 900.0,
        delay: 300.0,
        pixel_step: 3.0,
        point_size: 1.2,
        fade: 0.85,
        is_update_from_last_position: true,
        seed: Some(1),
        ..MorphOptions::default()
    };
    let env = HostEnv {
        viewport_width: 320.0,
        viewport_height: 240.0,
        device_pixel_ratio: 1.0,
    };

    let mut engine = MorphEngine::start(
        options,
        &env,
        loader,
        CpuSurface::new,
        Some(Box::new(|| tracing::info!("all images shown"))),
    )?;

    let mut written = 0u64;
    let mut write_err = None;
    let (w, h) = (env.viewport_width as u32, env.viewport_height as u32);
    engine.run_headless(
        HeadlessRun {
            fps: 30.0,
            max_frames: 240,
            start_ms: 0.0,
        },
        |i, surface| {
            if write_err.is_some() {
                return;
            }
            let path = out_dir.join(format!("frame_{i:04}.png"));
            match image::save_buffer(&path, &surface.frame_rgba(), w, h, image::ColorType::Rgba8) {
                Ok(()) => written += 1,
                Err(e) => write_err = Some(e),
            }
        },
    )?;
    if let Some(e) = write_err {
        return Err(e.into());
    }

    let stats = engine.stats();
    println!(
        "wrote {written} frames to {} ({} generations, {} matched, {} pooled, {} created)",
        out_dir.display(),
        stats.generations,
        stats.particles_matched,
        stats.particles_pooled,
        stats.particles_created,
    );
    Ok(())
}

fn disc(x: u32, y: u32) -> [u8; 4] {
    let dx = x as f64 - 48.0;
    let dy = y as f64 - 48.0;
    if dx * dx + dy * dy <= 40.0 * 40.0 {
        [255, (x * 2) as u8, 64, 255]
    } else {
        [0, 0, 0, 0]
    }
}

fn stripes(x: u32, y: u32) -> [u8; 4] {
    if (x + y) / 12 % 2 == 0 {
        [40, 180, 255, 255]
    } else {
        [0, 0, 0, 0]
    }
}

fn encode_png(w: u32, h: u32, f: fn(u32, u32) -> [u8; 4]) -> anyhow::Result<Vec<u8>> {
    let img = image::RgbaImage::from_fn(w, h, |x, y| image::Rgba(f(x, y)));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)?;
    Ok(buf)
}
