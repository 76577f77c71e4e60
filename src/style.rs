//! Display helpers for station and cluster markers.
//!
//! Colours are returned as [`Rgba`] so any backend can consume them; `Display`
//! renders the CSS `rgba(...)` form.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An sRGB colour with straight alpha.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// Alpha, 0 to 1
    pub a: f32,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0.0);

    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque colour.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Parse `#rrggbb`.
    ///
    /// ```
    /// use station_flow::Rgba;
    /// assert_eq!(Rgba::from_hex("#38bdf8"), Some(Rgba::rgb(56, 189, 248)));
    /// assert_eq!(Rgba::from_hex("38bdf8"), None);
    /// ```
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#')?;
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    /// `#rrggbb`, alpha dropped.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Component-wise blend, `t` clamped to [0, 1].
    pub fn lerp(self, other: Rgba, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Self {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: (self.a as f64 + (other.a as f64 - self.a as f64) * t) as f32,
        }
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

// Station availability scale
const AVAILABILITY_HIGH: Rgba = Rgba::rgb(0x38, 0xbd, 0xf8);
const AVAILABILITY_MEDIUM: Rgba = Rgba::rgb(0x81, 0x8c, 0xf8);
const AVAILABILITY_LOW: Rgba = Rgba::rgb(0xf5, 0x9e, 0x0b);
const AVAILABILITY_EMPTY: Rgba = Rgba::rgb(0xf8, 0x71, 0x71);

// Cluster fill scale
const CLUSTER_HIGH: Rgba = Rgba::rgb(0x0e, 0xa5, 0xe9);
const CLUSTER_MEDIUM: Rgba = Rgba::rgb(0x63, 0x66, 0xf1);
const CLUSTER_LOW: Rgba = Rgba::rgb(0xd9, 0x46, 0xef);
const CLUSTER_EMPTY: Rgba = Rgba::rgb(0x64, 0x74, 0x8b);

/// Marker colour for a single station's bikes-over-capacity ratio.
pub fn availability_color(ratio: f64) -> Rgba {
    if ratio >= 0.5 {
        AVAILABILITY_HIGH
    } else if ratio >= 0.3 {
        AVAILABILITY_MEDIUM
    } else if ratio >= 0.15 {
        AVAILABILITY_LOW
    } else {
        AVAILABILITY_EMPTY
    }
}

/// Fill colour for a cluster bubble.
pub fn cluster_color(total_bikes: u64, capacity: u64) -> Rgba {
    let ratio = if capacity > 0 {
        total_bikes as f64 / capacity as f64
    } else {
        0.0
    };
    if ratio >= 0.5 {
        CLUSTER_HIGH
    } else if ratio >= 0.25 {
        CLUSTER_MEDIUM
    } else if ratio >= 0.1 {
        CLUSTER_LOW
    } else {
        CLUSTER_EMPTY
    }
}

/// Cluster bubble radius in CSS pixels, growing with the log of its size.
pub fn cluster_radius(point_count: u32) -> f64 {
    let scale = (point_count as f64 + 1.0).log10();
    (20.0 + scale * 15.0).min(50.0)
}

/// Compact count label: `1234` becomes `1.2k`.
pub fn format_count(n: u64) -> String {
    if n >= 1000 {
        format!("{:.1}k", n as f64 / 1000.0)
    } else {
        n.to_string()
    }
}
