use eframe::egui::Color32;
use palette::{LinSrgb, Mix, Srgb};

// ---------------------------------------------------------------------------
// Viridis colour map
// ---------------------------------------------------------------------------

/// Viridis anchor colours, evenly spaced from low to high.
const VIRIDIS: [(u8, u8, u8); 9] = [
    (0x44, 0x01, 0x54),
    (0x47, 0x2d, 0x7b),
    (0x3b, 0x52, 0x8b),
    (0x2c, 0x72, 0x8e),
    (0x21, 0x91, 0x8c),
    (0x28, 0xae, 0x80),
    (0x5e, 0xc9, 0x62),
    (0xad, 0xdc, 0x30),
    (0xfd, 0xe7, 0x25),
];

fn linear((r, g, b): (u8, u8, u8)) -> LinSrgb {
    Srgb::new(r, g, b).into_format::<f32>().into_linear()
}

/// Sample viridis at `t` in `[0, 1]`; out-of-range input is clamped,
/// NaN maps to the low end.
pub fn viridis(t: f64) -> Color32 {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) } as f32;
    let scaled = t * (VIRIDIS.len() - 1) as f32;
    let i = (scaled.floor() as usize).min(VIRIDIS.len() - 2);
    let frac = scaled - i as f32;

    // Interpolate in linear light so midpoints are not muddy.
    let mixed = linear(VIRIDIS[i]).mix(linear(VIRIDIS[i + 1]), frac);
    let rgb: Srgb<f32> = Srgb::from_linear(mixed);
    let rgb: Srgb<u8> = rgb.into_format();
    Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
}

/// Darken a colour by a lighting intensity in `[0, 1]`.
pub fn shade(color: Color32, intensity: f64) -> Color32 {
    let k = intensity.clamp(0.0, 1.0);
    let f = |c: u8| (c as f64 * k).round() as u8;
    Color32::from_rgb(f(color.r()), f(color.g()), f(color.b()))
}

/// Position of `v` between `lo` and `hi`, clamped to `[0, 1]`.
///
/// Only an empty range (`hi <= lo`) is degenerate and maps to 0.5; tiny but
/// non-empty ranges are kept. Ranges wider than `f64::MAX` are halved first.
pub fn fraction(v: f64, lo: f64, hi: f64) -> f64 {
    if !(hi > lo) {
        return 0.5;
    }
    let span = hi - lo;
    let t = if span.is_finite() {
        (v - lo) / span
    } else {
        (v / 2.0 - lo / 2.0) / (hi / 2.0 - lo / 2.0)
    };
    t.clamp(0.0, 1.0)
}

// ---------------------------------------------------------------------------
// ColorScale: z value → Color32
// ---------------------------------------------------------------------------

/// Maps z values onto viridis over a fixed range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorScale {
    pub min: f64,
    pub max: f64,
}

impl ColorScale {
    pub fn new(min: f64, max: f64) -> Self {
        ColorScale { min, max }
    }

    /// Position of `z` in the range; a flat range maps everything to 0.5.
    pub fn normalize(&self, z: f64) -> f64 {
        fraction(z, self.min, self.max)
    }

    pub fn color_for(&self, z: f64) -> Color32 {
        viridis(self.normalize(z))
    }

    /// `n` evenly spaced (value, colour) stops from max down to min,
    /// used to draw the colour bar.
    pub fn legend_entries(&self, n: usize) -> Vec<(f64, Color32)> {
        if n < 2 {
            return vec![(self.max, self.color_for(self.max))];
        }
        (0..n)
            .map(|i| {
                let t = 1.0 - i as f64 / (n - 1) as f64;
                let v = self.min * (1.0 - t) + self.max * t;
                (v, viridis(t))
            })
            .collect()
    }
}
