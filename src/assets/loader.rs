use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use rayon::prelude::*;

use crate::assets::decode::decode_image;
use crate::assets::store::{ImageId, LoadedImage, PixelData};
use crate::foundation::error::{PixmorphError, PixmorphResult};

/// Fetches and decodes the image behind a URL.
///
/// Loads for all URLs of a run are issued concurrently, so implementations must be thread-safe.
pub trait ImageLoader: Send + Sync {
    /// Fetch and decode `url` into straight RGBA8.
    fn load(&self, url: &str) -> PixmorphResult<PixelData>;
}

impl<F> ImageLoader for F
where
    F: Fn(&str) -> PixmorphResult<PixelData> + Send + Sync,
{
    fn load(&self, url: &str) -> PixmorphResult<PixelData> {
        self(url)
    }
}

/// Reads plain paths and `file://` URLs, resolving relative ones against `root`.
#[derive(Clone, Debug)]
pub struct FsImageLoader {
    root: PathBuf,
}

impl FsImageLoader {
    /// Loader rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, url: &str) -> PathBuf {
        let path = Path::new(url.strip_prefix("file://").unwrap_or(url));
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

impl ImageLoader for FsImageLoader {
    fn load(&self, url: &str) -> PixmorphResult<PixelData> {
        let path = self.resolve(url);
        let bytes =
            std::fs::read(&path).with_context(|| format!("read image '{}'", path.display()))?;
        decode_image(&bytes)
    }
}

/// Serves encoded image bytes registered under a key.
#[derive(Clone, Debug, Default)]
pub struct MemoryImageLoader {
    entries: HashMap<String, Arc<[u8]>>,
}

impl MemoryImageLoader {
    /// Empty loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register encoded image bytes under `url`.
    pub fn insert(&mut self, url: impl Into<String>, encoded: impl Into<Arc<[u8]>>) {
        self.entries.insert(url.into(), encoded.into());
    }
}

impl ImageLoader for MemoryImageLoader {
    fn load(&self, url: &str) -> PixmorphResult<PixelData> {
        let bytes = self
            .entries
            .get(url)
            .ok_or_else(|| PixmorphError::decode(format!("no image registered for '{url}'")))?;
        decode_image(bytes)
    }
}

/// Load every URL concurrently and keep the ones that succeed, in URL order.
///
/// Failures are logged and dropped; they never abort the run.
#[tracing::instrument(skip(loader, urls), fields(count = urls.len()))]
pub fn load_all(loader: &dyn ImageLoader, urls: &[String]) -> Vec<LoadedImage> {
    let results: Vec<PixmorphResult<PixelData>> =
        urls.par_iter().map(|url| loader.load(url)).collect();

    let mut out = Vec::with_capacity(results.len());
    for (i, (url, res)) in urls.iter().zip(results).enumerate() {
        match res {
            Ok(pixels) if pixels.width > 0 && pixels.height > 0 => {
                out.push(LoadedImage::new(ImageId(i as u32), url.as_str(), pixels));
            }
            Ok(_) => tracing::warn!(url = %url, "image has no pixels, skipping"),
            Err(err) => tracing::warn!(url = %url, error = %err, "image failed to load, skipping"),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/assets/loader.rs"]
mod tests;
