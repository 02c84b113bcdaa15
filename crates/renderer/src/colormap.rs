//! Named 256-entry colormaps.
//!
//! Index layout follows the plotting library convention:
//! - `0..=15`: fixed basic colors (0 white, 1 black, ...)
//! - `16..=239`: the colormap's ramp, used for data fills
//! - `240..=255`: light-to-dark grays

use crate::error::{RenderError, RenderResult};

/// First colormap index of the fill ramp.
pub const RAMP_START: u8 = 16;
/// Last colormap index of the fill ramp.
pub const RAMP_END: u8 = 239;

/// Color value in RGBA format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::new(255, 255, 255, 255);
    pub const BLACK: Color = Color::new(0, 0, 0, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Parse `#rrggbb`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 6 {
            return None;
        }

        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

        Some(Self::rgb(r, g, b))
    }

    pub fn to_skia(self) -> tiny_skia::Color {
        tiny_skia::Color::from_rgba8(self.r, self.g, self.b, self.a)
    }
}

/// Linear color interpolation
fn interpolate_color(color1: Color, color2: Color, t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    let t_inv = 1.0 - t;

    Color::new(
        ((color1.r as f32 * t_inv) + (color2.r as f32 * t)).round() as u8,
        ((color1.g as f32 * t_inv) + (color2.g as f32 * t)).round() as u8,
        ((color1.b as f32 * t_inv) + (color2.b as f32 * t)).round() as u8,
        ((color1.a as f32 * t_inv) + (color2.a as f32 * t)).round() as u8,
    )
}

/// Ramp stops per named colormap, evenly spaced over `16..=239`.
const RAMPS: &[(&str, &[&str])] = &[
    (
        "default",
        &["#000080", "#0000ff", "#00a0ff", "#00ffc0", "#80ff00", "#ffe000", "#ff6000", "#c00000"],
    ),
    (
        "rainbow",
        &["#8000ff", "#0000ff", "#00ffff", "#00ff00", "#ffff00", "#ff8000", "#ff0000"],
    ),
    (
        "viridis",
        &[
            "#440154", "#482878", "#3e4989", "#31688e", "#26828e", "#1f9e89", "#35b779",
            "#6ece58", "#b5de2b", "#fde725",
        ],
    ),
    ("grayscale", &["#000000", "#ffffff"]),
    (
        "bl_to_darkred",
        &["#000090", "#3060ff", "#a0d0ff", "#ffffff", "#ffd080", "#ff4020", "#800000"],
    ),
];

/// Fixed colors at indices `0..=15`.
const BASIC_COLORS: [Color; 16] = [
    Color::WHITE,
    Color::BLACK,
    Color::rgb(255, 0, 0),
    Color::rgb(0, 255, 0),
    Color::rgb(0, 0, 255),
    Color::rgb(255, 255, 0),
    Color::rgb(0, 255, 255),
    Color::rgb(255, 0, 255),
    Color::rgb(255, 128, 0),
    Color::rgb(128, 0, 255),
    Color::rgb(0, 128, 0),
    Color::rgb(128, 64, 0),
    Color::rgb(192, 192, 192),
    Color::rgb(128, 128, 128),
    Color::rgb(64, 64, 64),
    Color::rgb(32, 32, 32),
];

/// A named table of 256 colors.
#[derive(Debug, Clone, PartialEq)]
pub struct Colormap {
    name: String,
    colors: Vec<Color>,
}

impl Colormap {
    /// Names accepted by [`Colormap::named`].
    pub fn available() -> Vec<&'static str> {
        RAMPS.iter().map(|(name, _)| *name).collect()
    }

    /// Look up a colormap by name (case-insensitive).
    pub fn named(name: &str) -> RenderResult<Self> {
        let key = name.trim().to_ascii_lowercase();
        let stops = RAMPS
            .iter()
            .find(|(n, _)| *n == key)
            .map(|(_, stops)| *stops)
            .ok_or_else(|| RenderError::UnknownColormap {
                name: name.to_string(),
                available: Self::available().join(", "),
            })?;

        let stops: Vec<Color> = stops.iter().filter_map(|hex| Color::from_hex(hex)).collect();
        let mut colors = Vec::with_capacity(256);
        colors.extend_from_slice(&BASIC_COLORS);

        let ramp_len = (RAMP_END - RAMP_START) as usize + 1;
        let segments = (stops.len() - 1) as f32;
        for k in 0..ramp_len {
            let pos = k as f32 / (ramp_len - 1) as f32 * segments;
            let seg = (pos.floor() as usize).min(stops.len() - 2);
            colors.push(interpolate_color(stops[seg], stops[seg + 1], pos - seg as f32));
        }

        for k in 0..16u32 {
            let v = (240 - k * 14) as u8;
            colors.push(Color::rgb(v, v, v));
        }

        Ok(Self {
            name: key,
            colors,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn color(&self, index: u8) -> Color {
        self.colors[index as usize]
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }
}

impl Default for Colormap {
    fn default() -> Self {
        // The built-in table always exists.
        Self::named("default").unwrap_or_else(|_| Self {
            name: "default".to_string(),
            colors: vec![Color::WHITE; 256],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_named_maps_have_256_entries() {
        for name in Colormap::available() {
            let map = Colormap::named(name).unwrap();
            assert_eq!(map.colors().len(), 256, "{}", name);
        }
    }

    #[test]
    fn test_rainbow_ramp_endpoints() {
        let map = Colormap::named("rainbow").unwrap();
        assert_eq!(map.color(RAMP_START), Color::rgb(128, 0, 255));
        assert_eq!(map.color(RAMP_END), Color::rgb(255, 0, 0));
        assert_eq!(map.color(0), Color::WHITE);
        assert_eq!(map.color(1), Color::BLACK);
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        assert_eq!(Colormap::named("Rainbow").unwrap().name(), "rainbow");
    }

    #[test]
    fn test_unknown_colormap() {
        let err = Colormap::named("sunset").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("sunset"));
        assert!(message.contains("rainbow"));
    }

    #[test]
    fn test_hex_parsing() {
        assert_eq!(Color::from_hex("#ff8000"), Some(Color::rgb(255, 128, 0)));
        assert_eq!(Color::from_hex("fff"), None);
        assert_eq!(Color::from_hex("#gg0000"), None);
    }

    #[test]
    fn test_grayscale_is_monotonic() {
        let map = Colormap::named("grayscale").unwrap();
        let ramp: Vec<u8> = (RAMP_START..=RAMP_END).map(|i| map.color(i).r).collect();
        assert!(ramp.windows(2).all(|w| w[0] <= w[1]));
    }
}
