//! Color transforms
//!
//! The handful of conversions the planet palette needs: hex parsing, HSL for
//! hue rotation, and CIE Lab (D65) for lightness scaling and perceptual
//! gradients.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorError {
    #[error("expected a #rrggbb color, got {0:?}")]
    Malformed(String),
}

/// 8-bit RGB triple. Serializes as `"#rrggbb"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// HSL with hue in degrees [0, 360), saturation and lightness in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

/// CIE L*a*b* relative to the D65 white point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lab {
    pub l: f64,
    pub a: f64,
    pub b: f64,
}

// D65 reference white and the piecewise constants of the Lab transfer curve
const XN: f64 = 0.950470;
const YN: f64 = 1.0;
const ZN: f64 = 1.088830;
const T0: f64 = 0.137931034; // 4 / 29
const T1: f64 = 0.206896552; // 6 / 29
const T2: f64 = 0.12841855; // 3 * T1^2
const T3: f64 = 0.008856452; // T1^3

#[inline]
fn to_channel(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

#[inline]
fn srgb_to_linear(c: u8) -> f64 {
    let c = c as f64 / 255.0;
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[inline]
fn linear_to_srgb(c: f64) -> f64 {
    255.0
        * if c <= 0.00304 {
            12.92 * c
        } else {
            1.055 * c.powf(1.0 / 2.4) - 0.055
        }
}

#[inline]
fn xyz_to_lab_curve(t: f64) -> f64 {
    if t > T3 {
        t.cbrt()
    } else {
        t / T2 + T0
    }
}

#[inline]
fn lab_to_xyz_curve(t: f64) -> f64 {
    if t > T1 {
        t * t * t
    } else {
        T2 * (t - T0)
    }
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// From a packed `0xRRGGBB` value
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as u8,
            g: ((hex >> 8) & 0xff) as u8,
            b: (hex & 0xff) as u8,
        }
    }

    pub const fn to_hex(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    pub fn to_hsl(self) -> Hsl {
        let r = self.r as f64 / 255.0;
        let g = self.g as f64 / 255.0;
        let b = self.b as f64 / 255.0;
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;

        if max == min {
            // Achromatic: hue is meaningless, leave it at 0
            return Hsl { h: 0.0, s: 0.0, l };
        }

        let d = max - min;
        let s = if l > 0.5 {
            d / (2.0 - max - min)
        } else {
            d / (max + min)
        };
        let h = if max == r {
            (g - b) / d + if g < b { 6.0 } else { 0.0 }
        } else if max == g {
            (b - r) / d + 2.0
        } else {
            (r - g) / d + 4.0
        };

        Hsl { h: h * 60.0, s, l }
    }

    pub fn from_hsl(hsl: Hsl) -> Self {
        let c = (1.0 - (2.0 * hsl.l - 1.0).abs()) * hsl.s;
        let h_prime = hsl.h.rem_euclid(360.0) / 60.0;
        let x = c * (1.0 - ((h_prime % 2.0) - 1.0).abs());
        let m = hsl.l - c / 2.0;

        let (r1, g1, b1) = match h_prime as i32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };

        Self {
            r: to_channel((r1 + m) * 255.0),
            g: to_channel((g1 + m) * 255.0),
            b: to_channel((b1 + m) * 255.0),
        }
    }

    pub fn to_lab(self) -> Lab {
        let r = srgb_to_linear(self.r);
        let g = srgb_to_linear(self.g);
        let b = srgb_to_linear(self.b);
        let x = xyz_to_lab_curve((0.4124564 * r + 0.3575761 * g + 0.1804375 * b) / XN);
        let y = xyz_to_lab_curve((0.2126729 * r + 0.7151522 * g + 0.0721750 * b) / YN);
        let z = xyz_to_lab_curve((0.0193339 * r + 0.1191920 * g + 0.9503041 * b) / ZN);
        Lab {
            l: (116.0 * y - 16.0).max(0.0),
            a: 500.0 * (x - y),
            b: 200.0 * (y - z),
        }
    }

    /// Out-of-gamut Lab values are clipped per channel.
    pub fn from_lab(lab: Lab) -> Self {
        let fy = (lab.l + 16.0) / 116.0;
        let fx = fy + lab.a / 500.0;
        let fz = fy - lab.b / 200.0;
        let x = XN * lab_to_xyz_curve(fx);
        let y = YN * lab_to_xyz_curve(fy);
        let z = ZN * lab_to_xyz_curve(fz);

        Self {
            r: to_channel(linear_to_srgb(3.2404542 * x - 1.5371385 * y - 0.4985314 * z)),
            g: to_channel(linear_to_srgb(-0.9692660 * x + 1.8760108 * y + 0.0415560 * z)),
            b: to_channel(linear_to_srgb(0.0556434 * x - 0.2040259 * y + 1.0572252 * z)),
        }
    }

    /// Rotate the HSL hue by `degrees`, keeping saturation and lightness
    pub fn rotate_hue(self, degrees: f64) -> Self {
        let mut hsl = self.to_hsl();
        hsl.h = (hsl.h + degrees).rem_euclid(360.0);
        Self::from_hsl(hsl)
    }

    /// Multiply Lab lightness by `factor` (result clamped to [0, 100])
    pub fn scale_lightness(self, factor: f64) -> Self {
        let mut lab = self.to_lab();
        lab.l = (lab.l * factor).clamp(0.0, 100.0);
        Self::from_lab(lab)
    }

    /// Pull LCh chroma toward gray by `18 * amount`
    pub fn desaturate(self, amount: f64) -> Self {
        let mut lab = self.to_lab();
        let chroma = lab.a.hypot(lab.b);
        if chroma > 0.0 {
            let k = (chroma - 18.0 * amount).max(0.0) / chroma;
            lab.a *= k;
            lab.b *= k;
        }
        Self::from_lab(lab)
    }

    /// Perceptual interpolation through Lab space
    pub fn lerp_lab(a: Self, b: Self, t: f64) -> Self {
        let la = a.to_lab();
        let lb = b.to_lab();
        Self::from_lab(Lab {
            l: la.l + (lb.l - la.l) * t,
            a: la.a + (lb.a - la.a) * t,
            b: la.b + (lb.b - la.b) * t,
        })
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix('#')
            .or_else(|| trimmed.strip_prefix("0x"))
            .unwrap_or(trimmed);
        if digits.len() != 6 {
            return Err(ColorError::Malformed(s.to_string()));
        }
        u32::from_str_radix(digits, 16)
            .map(Self::from_hex)
            .map_err(|_| ColorError::Malformed(s.to_string()))
    }
}

impl TryFrom<String> for Rgb {
    type Error = ColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_string()
    }
}
