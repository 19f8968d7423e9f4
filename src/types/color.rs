//! Color representation for W2D graphics state

use once_cell::sync::Lazy;
use std::fmt;

/// A 32-bit color, channel order R, G, B, A on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Create a color from its four channels
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Rgba { r, g, b, a }
    }

    /// Create an opaque color
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Rgba { r, g, b, a: 255 }
    }

    pub const BLACK: Rgba = Rgba::opaque(0, 0, 0);
    pub const WHITE: Rgba = Rgba::opaque(255, 255, 255);

    /// Channels in wire order
    pub fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RGBA({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

/// Current drawing color: either a palette index or a true color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    /// Index into the active color map
    Index(u8),
    /// True color
    Rgba(Rgba),
}

impl Default for Color {
    fn default() -> Self {
        Color::Rgba(Rgba::WHITE)
    }
}

impl Color {
    /// Resolve to a true color through `map`
    pub fn resolve(&self, map: &ColorMap) -> Rgba {
        match self {
            Color::Index(i) => map.get(*i),
            Color::Rgba(c) => *c,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Index(i) => write!(f, "Index({})", i),
            Color::Rgba(c) => write!(f, "{}", c),
        }
    }
}

/// Palette used to resolve indexed colors.
///
/// Streams may replace it with an explicit color-map opcode; maps shorter
/// than 256 entries resolve missing indices to black.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorMap {
    entries: Vec<Rgba>,
}

impl ColorMap {
    /// Create a map from explicit entries
    pub fn new(entries: Vec<Rgba>) -> Self {
        ColorMap { entries }
    }

    /// Look up an index
    pub fn get(&self, index: u8) -> Rgba {
        self.entries
            .get(index as usize)
            .copied()
            .unwrap_or(Rgba::BLACK)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the map has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in index order
    pub fn entries(&self) -> &[Rgba] {
        &self.entries
    }
}

impl Default for ColorMap {
    fn default() -> Self {
        DEFAULT_COLOR_MAP.clone()
    }
}

/// The 256-entry map in effect before any color-map opcode.
///
/// Indices 0-9 are the fixed CAD colors, 10-249 follow the 24-hue wheel
/// (ten shades per hue), 250-255 are grays.
pub static DEFAULT_COLOR_MAP: Lazy<ColorMap> = Lazy::new(|| {
    let mut entries = vec![
        Rgba::BLACK,
        Rgba::opaque(255, 0, 0),
        Rgba::opaque(255, 255, 0),
        Rgba::opaque(0, 255, 0),
        Rgba::opaque(0, 255, 255),
        Rgba::opaque(0, 0, 255),
        Rgba::opaque(255, 0, 255),
        Rgba::WHITE,
        Rgba::opaque(128, 128, 128),
        Rgba::opaque(192, 192, 192),
    ];

    const SHADES: [f64; 5] = [1.0, 0.65, 0.5, 0.3, 0.15];
    for i in 10..250u32 {
        let hue = ((i - 10) / 10) as f64 * 15.0;
        let shade = ((i - 10) % 10) as usize;
        let value = SHADES[shade / 2];
        let saturation = if shade % 2 == 0 { 1.0 } else { 0.5 };
        entries.push(hsv_to_rgba(hue, saturation, value));
    }

    for gray in [51u8, 80, 105, 130, 190, 255] {
        entries.push(Rgba::opaque(gray, gray, gray));
    }

    ColorMap::new(entries)
});

fn hsv_to_rgba(hue: f64, saturation: f64, value: f64) -> Rgba {
    let c = value * saturation;
    let h = hue / 60.0;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = value - c;
    let channel = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    Rgba::opaque(channel(r), channel(g), channel(b))
}
