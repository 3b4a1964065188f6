use std::io::Cursor;

use super::*;

fn png_bytes(w: u32, h: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba(rgba));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "pixmorph_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

#[test]
fn load_all_keeps_order_and_drops_failures() {
    let mut loader = MemoryImageLoader::new();
    loader.insert("a", png_bytes(2, 1, [255, 0, 0, 255]));
    loader.insert("c", png_bytes(1, 3, [0, 0, 255, 255]));
    loader.insert("bad", b"nope".to_vec());

    let urls: Vec<String> = ["a", "missing", "bad", "c"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let images = load_all(&loader, &urls);

    assert_eq!(images.len(), 2);
    assert_eq!(&*images[0].url, "a");
    assert_eq!((images[0].width, images[0].height), (2, 1));
    assert_eq!(&*images[1].url, "c");
    assert_eq!((images[1].width, images[1].height), (1, 3));
    assert_ne!(images[0].id, images[1].id);
}

#[test]
fn closures_are_loaders() {
    let loader = |url: &str| -> PixmorphResult<PixelData> {
        if url == "ok" {
            PixelData::new(1, 1, vec![1, 2, 3, 4])
        } else {
            Err(PixmorphError::decode("nope"))
        }
    };
    let images = load_all(&loader, &["ok".to_string(), "x".to_string()]);
    assert_eq!(images.len(), 1);
    assert_eq!(images[0].pixel(0, 0), Some(crate::Rgba8::new(1, 2, 3, 4)));
    assert_eq!(images[0].pixel(1, 0), None);
}

#[test]
fn fs_loader_reads_relative_and_file_urls() {
    let tmp = temp_dir("fs_loader");
    std::fs::create_dir_all(&tmp).unwrap();
    std::fs::write(tmp.join("img.png"), png_bytes(3, 2, [9, 8, 7, 255])).unwrap();

    let loader = FsImageLoader::new(&tmp);
    let px = loader.load("img.png").unwrap();
    assert_eq!((px.width, px.height), (3, 2));

    let abs = format!("file://{}", tmp.join("img.png").display());
    assert!(loader.load(&abs).is_ok());
    assert!(loader.load("absent.png").is_err());

    std::fs::remove_dir_all(&tmp).ok();
}
