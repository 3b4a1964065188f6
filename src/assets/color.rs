use smallvec::SmallVec;

use crate::foundation::core::Rgba8;
use crate::foundation::error::{PixmorphError, PixmorphResult};

/// Parse a CSS-style colour, falling back to opaque white when the input is not understood.
///
/// Accepted forms: `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`, `rgb(r, g, b)` and
/// `rgba(r, g, b, a)` with `a` in `0..=1`.
pub fn parse_color(s: &str) -> Rgba8 {
    try_parse_color(s).unwrap_or(Rgba8::WHITE)
}

/// Strict variant of [`parse_color`].
pub fn try_parse_color(s: &str) -> PixmorphResult<Rgba8> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex);
    }

    let lower = s.to_ascii_lowercase();
    let body = lower
        .strip_prefix("rgba(")
        .or_else(|| lower.strip_prefix("rgb("))
        .and_then(|rest| rest.strip_suffix(')'))
        .ok_or_else(|| PixmorphError::validation(format!("unrecognized colour \"{s}\"")))?;

    let parts: Vec<&str> = body.split(',').map(str::trim).collect();
    if parts.len() != 3 && parts.len() != 4 {
        return Err(PixmorphError::validation(format!(
            "colour \"{s}\" must have 3 or 4 components"
        )));
    }

    fn number(part: &str) -> PixmorphResult<f64> {
        let v: f64 = part
            .parse()
            .map_err(|_| PixmorphError::validation(format!("invalid colour component \"{part}\"")))?;
        if !v.is_finite() {
            return Err(PixmorphError::validation("colour component must be finite"));
        }
        Ok(v)
    }

    let channel = |part: &str| -> PixmorphResult<u8> {
        Ok(number(part)?.round().clamp(0.0, 255.0) as u8)
    };

    let a = match parts.get(3) {
        Some(part) => (number(part)?.clamp(0.0, 1.0) * 255.0).round() as u8,
        None => 255,
    };
    Ok(Rgba8::new(
        channel(parts[0])?,
        channel(parts[1])?,
        channel(parts[2])?,
        a,
    ))
}

fn parse_hex(hex: &str) -> PixmorphResult<Rgba8> {
    fn nibble(c: u8) -> PixmorphResult<u8> {
        (c as char)
            .to_digit(16)
            .map(|d| d as u8)
            .ok_or_else(|| PixmorphError::validation(format!("invalid hex digit '{}'", c as char)))
    }

    let b = hex.as_bytes();
    let short = |i: usize| -> PixmorphResult<u8> { nibble(b[i]).map(|n| n * 17) };
    let long = |i: usize| -> PixmorphResult<u8> { Ok(nibble(b[i])? * 16 + nibble(b[i + 1])?) };

    match b.len() {
        3 => Ok(Rgba8::opaque(short(0)?, short(1)?, short(2)?)),
        4 => Ok(Rgba8::new(short(0)?, short(1)?, short(2)?, short(3)?)),
        6 => Ok(Rgba8::opaque(long(0)?, long(2)?, long(4)?)),
        8 => Ok(Rgba8::new(long(0)?, long(2)?, long(4)?, long(6)?)),
        _ => Err(PixmorphError::validation(
            "hex colour must be #rgb, #rgba, #rrggbb or #rrggbbaa",
        )),
    }
}

/// Render `rgba(r, g, b, a)` with `alpha` in `0..=1` rounded to three decimals.
pub fn format_color(r: u8, g: u8, b: u8, alpha: f64) -> String {
    let a = (alpha.clamp(0.0, 1.0) * 1000.0).round() / 1000.0;
    format!("rgba({r}, {g}, {b}, {a})")
}

impl Rgba8 {
    /// Display form of this colour, see [`format_color`].
    pub fn to_css(self) -> String {
        format_color(self.r, self.g, self.b, self.alpha_f64())
    }
}

/// Entries kept by a [`ColorCache`].
pub const COLOR_CACHE_SLOTS: usize = 4;

/// Remembers the most recently parsed strings so repeated lookups skip parsing.
///
/// A handful of keys are kept, so a pair of endpoints looked up alternately (start and target
/// colour of a ramp) both stay cached. The oldest entry is evicted first.
#[derive(Debug, Default, Clone)]
pub struct ColorCache {
    entries: SmallVec<[(String, Rgba8); COLOR_CACHE_SLOTS]>,
    next_evict: usize,
    parses: u64,
}

impl ColorCache {
    /// Empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Lenient parse through the cache.
    pub fn parse(&mut self, s: &str) -> Rgba8 {
        if let Some((_, value)) = self.entries.iter().find(|(key, _)| key == s) {
            return *value;
        }
        self.parses += 1;
        let value = parse_color(s);
        if self.entries.len() < COLOR_CACHE_SLOTS {
            self.entries.push((s.to_owned(), value));
        } else {
            let (key, cached) = &mut self.entries[self.next_evict];
            key.clear();
            key.push_str(s);
            *cached = value;
            self.next_evict = (self.next_evict + 1) % COLOR_CACHE_SLOTS;
        }
        value
    }

    /// Number of times the cache actually had to parse.
    pub fn parse_count(&self) -> u64 {
        self.parses
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/color.rs"]
mod tests;
